//! Cascading parser: ordered candidates tried until one succeeds.
//!
//! A [`CascadingParser`] holds candidate parsers in priority order. Its plans
//! ([`CascadingPlan`]) activate the first candidate able to build a plan, and
//! roll forward to the next candidate whenever the active one fails, at plan
//! construction or at execution. Once every candidate has failed, a single
//! [`crate::error::CascadeError`] reports all of their failures.

mod plan;

use std::{fmt, path::Path, sync::Arc};

use log::debug;

use filecascade_core::{
    capabilities::Capabilities, fs::PersistedObject, type_tag::TypeTag, value::Value,
};

use crate::{
    delegating::{DelegatingParser, unreachable_primitive},
    error::{Error, Result},
    parser::{ParseOptions, Parser, PlanContext},
    plan::{ChildPlans, PlanBox},
};

pub use plan::{ActivePlan, CascadeState, CascadingPlan};

/// A parser trying its candidates in order.
///
/// The first candidate added fixes the capabilities of the cascade. Every
/// later candidate must support at least as much: the same file modes, a
/// superset of the types and a superset of the extensions.
///
/// # Examples
///
/// ```
/// use filecascade_parser::cascade::CascadingParser;
///
/// let cascade = CascadingParser::new();
/// assert!(cascade.is_empty());
/// assert_eq!(cascade.to_string(), "Cascade[Empty]");
/// ```
pub struct CascadingParser {
    candidates: Vec<Arc<dyn Parser>>,
    capabilities: Capabilities,
    configured: bool,
}

impl CascadingParser {
    pub fn new() -> Self {
        Self {
            candidates: Vec::new(),
            capabilities: Capabilities::unconfigured(),
            configured: false,
        }
    }

    /// Creates a cascade and adds `candidates` in order.
    ///
    /// # Errors
    ///
    /// Returns the first [`Error::IncompatibleCandidate`] encountered.
    pub fn with_candidates(candidates: impl IntoIterator<Item = Arc<dyn Parser>>) -> Result<Self> {
        let mut cascade = Self::new();
        for candidate in candidates {
            cascade.add_candidate(candidate)?;
        }
        Ok(cascade)
    }

    /// Appends `candidate` with the lowest priority.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompatibleCandidate`] when the candidate supports
    /// no file mode, declares no extension for single files, or supports less
    /// than the cascade. The cascade is left unchanged.
    pub fn add_candidate(&mut self, candidate: Arc<dyn Parser>) -> Result<()> {
        if !candidate.capabilities().is_well_formed() {
            return Err(Error::IncompatibleCandidate {
                cascade: self.to_string(),
                candidate: candidate.to_string(),
                reason: format!(
                    "its capabilities ({}) are not well formed",
                    candidate.capabilities()
                ),
            });
        }

        if self.configured {
            self.check_candidate(candidate.as_ref())?;
        } else {
            self.capabilities = candidate.capabilities().clone();
            self.configured = true;
        }

        debug!(cascade:% = self, candidate:% = candidate; "Adding cascade candidate");
        self.candidates.push(candidate);
        Ok(())
    }

    fn check_candidate(&self, candidate: &dyn Parser) -> Result<()> {
        let mine = &self.capabilities;
        let theirs = candidate.capabilities();

        let reason = if mine.supports_single_file() && !theirs.supports_single_file() {
            "it does not support single files".to_string()
        } else if mine.supports_multi_file() && !theirs.supports_multi_file() {
            "it does not support multi-file objects".to_string()
        } else if !theirs.types().covers(mine.types()) {
            if mine.types().is_any() {
                "the cascade supports any type but the candidate does not".to_string()
            } else {
                let missing: Vec<String> = theirs
                    .types()
                    .missing_from(mine.types())
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                format!("it does not support types {}", missing.join(", "))
            }
        } else if !theirs.covers_extensions(mine) {
            let missing: Vec<&str> = mine
                .extensions()
                .difference(theirs.extensions())
                .map(String::as_str)
                .collect();
            format!("it does not support extensions {}", missing.join(", "))
        } else {
            return Ok(());
        };

        Err(Error::IncompatibleCandidate {
            cascade: self.to_string(),
            candidate: candidate.to_string(),
            reason,
        })
    }

    /// Candidates in priority order.
    pub fn candidates(&self) -> &[Arc<dyn Parser>] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl Default for CascadingParser {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CascadingParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let delegates = self.delegates();
        if delegates.is_empty() {
            return f.write_str("Cascade[Empty]");
        }
        f.write_str("Cascade[Try ")?;
        for (i, candidate) in delegates.iter().enumerate() {
            if i > 0 {
                f.write_str(" then ")?;
            }
            write!(f, "'{candidate}'")?;
        }
        f.write_str("]")
    }
}

impl DelegatingParser for CascadingParser {
    fn delegates(&self) -> &[Arc<dyn Parser>] {
        &self.candidates
    }
}

impl Parser for CascadingParser {
    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Builds a [`CascadingPlan`] over a snapshot of the current candidates.
    ///
    /// Candidates added afterwards do not affect the returned plan.
    fn build_plan<'a>(
        self: Arc<Self>,
        desired: TypeTag,
        object: &'a PersistedObject,
        ctx: PlanContext<'a>,
    ) -> Result<PlanBox<'a>> {
        let candidates = self.delegates().to_vec();
        let plan = CascadingPlan::new(self, candidates, desired, object, ctx)?;
        Ok(Box::new(plan))
    }

    fn parse_single_file(
        &self,
        _desired: TypeTag,
        _path: &Path,
        _encoding: &str,
        _options: &ParseOptions,
    ) -> Result<Value> {
        Err(unreachable_primitive(self, "parse_single_file"))
    }

    fn children_plans<'a>(
        &self,
        _desired: TypeTag,
        _object: &'a PersistedObject,
        _ctx: PlanContext<'a>,
    ) -> Result<ChildPlans<'a>> {
        Err(unreachable_primitive(self, "children_plans"))
    }

    fn parse_multi_file(
        &self,
        _desired: TypeTag,
        _object: &PersistedObject,
        _children: &mut ChildPlans<'_>,
        _options: &ParseOptions,
    ) -> Result<Value> {
        Err(unreachable_primitive(self, "parse_multi_file"))
    }
}
