//! Aggregated failure of a cascading plan.

use std::{error::Error as StdError, fmt};

use filecascade_core::{fs::PersistedObject, type_tag::TypeTag};

use crate::{error::Error, parser::Parser};

/// Maximum number of causes kept in the abbreviated trace of a failure.
const MAX_TRACE_DEPTH: usize = 3;

/// Stage of a cascading plan at which a candidate failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    PlanConstruction,
    Execution,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlanConstruction => f.write_str("plan construction"),
            Self::Execution => f.write_str("execution"),
        }
    }
}

/// The captured failure of one cascade candidate.
///
/// Captures do not borrow the [`Error`]: they keep the failure
/// class name, its message and the first few entries of its cause chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFailure {
    index: usize,
    candidate: String,
    phase: Phase,
    kind: &'static str,
    message: String,
    trace: Vec<String>,
}

impl CandidateFailure {
    /// Captures `error` raised by the candidate at `index`.
    pub fn capture(index: usize, candidate: &dyn Parser, phase: Phase, error: &Error) -> Self {
        let mut trace = Vec::new();
        let mut cause = StdError::source(error);
        while let Some(current) = cause {
            if trace.len() == MAX_TRACE_DEPTH {
                break;
            }
            trace.push(current.to_string());
            cause = current.source();
        }

        Self {
            index,
            candidate: candidate.to_string(),
            phase,
            kind: error.kind(),
            message: error.to_string(),
            trace,
        }
    }

    /// Position of the candidate in the cascade.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn candidate(&self) -> &str {
        &self.candidate
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Abbreviated cause chain, outermost cause first.
    pub fn trace(&self) -> &[String] {
        &self.trace
    }

    /// One-line rendering used in log records.
    pub fn summary(&self) -> String {
        let first_line = self.message.lines().next().unwrap_or_default();
        format!("{}: {first_line}", self.kind)
    }
}

impl fmt::Display for CandidateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "--------------- From '{}' caught during {}:",
            self.candidate, self.phase
        )?;
        write!(f, "  {}: {}", self.kind, indent(&self.message, "  "))?;
        for cause in &self.trace {
            write!(f, "\n    caused by: {}", indent(cause, "    "))?;
        }
        Ok(())
    }
}

fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .collect::<Vec<_>>()
        .join(&format!("\n{prefix}"))
}

/// Raised once every candidate of a cascading plan has failed.
///
/// Holds the failed query (object, desired type, cascade) and one
/// [`CandidateFailure`] per attempted candidate, in priority order.
///
/// Instances are created through [`CascadeError::for_plan_construction`] and
/// [`CascadeError::for_execution`]; the two only differ in their header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeError {
    phase: Phase,
    parser: String,
    object: String,
    desired_type: TypeTag,
    failures: Vec<CandidateFailure>,
}

impl CascadeError {
    /// Aggregate raised when no candidate could build a plan.
    pub fn for_plan_construction(
        parser: &dyn Parser,
        desired_type: TypeTag,
        object: &PersistedObject,
        failures: Vec<CandidateFailure>,
    ) -> Self {
        Self::new(Phase::PlanConstruction, parser, desired_type, object, failures)
    }

    /// Aggregate raised when the last remaining candidate failed after an
    /// execution failure.
    pub fn for_execution(
        parser: &dyn Parser,
        desired_type: TypeTag,
        object: &PersistedObject,
        failures: Vec<CandidateFailure>,
    ) -> Self {
        Self::new(Phase::Execution, parser, desired_type, object, failures)
    }

    fn new(
        phase: Phase,
        parser: &dyn Parser,
        desired_type: TypeTag,
        object: &PersistedObject,
        failures: Vec<CandidateFailure>,
    ) -> Self {
        Self {
            phase,
            parser: parser.to_string(),
            object: object.to_string(),
            desired_type,
            failures,
        }
    }

    /// Phase during which the cascade got exhausted.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn parser(&self) -> &str {
        &self.parser
    }

    pub fn object(&self) -> &str {
        &self.object
    }

    pub fn desired_type(&self) -> TypeTag {
        self.desired_type
    }

    /// Captured failures in candidate priority order.
    pub fn failures(&self) -> &[CandidateFailure] {
        &self.failures
    }

    /// First line of the rendering, without the failure blocks.
    pub fn headline(&self) -> String {
        let action = match self.phase {
            Phase::PlanConstruction => "building a parsing plan",
            Phase::Execution => "executing a parsing plan",
        };
        format!(
            "Error while {action} to parse {} as a {} with parser '{}'. \
             Caught the following failures, in candidate order:",
            self.object, self.desired_type, self.parser
        )
    }
}

impl fmt::Display for CascadeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.headline())?;
        for failure in &self.failures {
            write!(f, "\n{failure}")?;
        }
        Ok(())
    }
}

impl StdError for CascadeError {}
