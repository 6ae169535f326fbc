use std::{fmt, sync::Arc};

use log::{info, warn};

use filecascade_core::{fs::PersistedObject, type_tag::TypeTag, value::Value};

use crate::{
    error::{CandidateFailure, CascadeError, Error, Phase, Result},
    parser::{ParseOptions, Parser, PlanContext},
    plan::{ChildPlans, ParsingPlan, PlanBox, log_plan},
};

/// Observable state of a [`CascadingPlan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeState {
    /// The candidate at `index` provides the current plan.
    Active { index: usize },
    /// Every candidate failed; executions keep returning the same error.
    Exhausted,
    /// The cascade had no candidates when the plan was built.
    Empty,
    /// Activating a candidate raised an internal error; executions keep
    /// returning it.
    Broken,
}

/// The plan of a [`super::CascadingParser`].
///
/// Candidates are tried strictly in order and never twice: a candidate whose
/// plan fails to execute is dropped and the next one is activated. Failures
/// are recorded in candidate order and reported together once the candidates
/// run out.
pub struct CascadingPlan<'a> {
    cascade: Arc<dyn Parser>,
    candidates: Vec<Arc<dyn Parser>>,
    desired: TypeTag,
    object: &'a PersistedObject,
    ctx: PlanContext<'a>,
    next_candidate: usize,
    active: Option<(usize, ActivePlan<'a>)>,
    failures: Vec<CandidateFailure>,
    exhausted: Option<CascadeError>,
    broken: Option<String>,
}

impl<'a> CascadingPlan<'a> {
    /// Builds the plan and activates the first candidate able to plan.
    ///
    /// An empty candidate list yields an [`CascadeState::Empty`] plan.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cascade`] when no candidate can build a plan, and
    /// propagates [`Error::Internal`] failures untouched.
    pub fn new(
        cascade: Arc<dyn Parser>,
        candidates: Vec<Arc<dyn Parser>>,
        desired: TypeTag,
        object: &'a PersistedObject,
        ctx: PlanContext<'a>,
    ) -> Result<Self> {
        let mut plan = Self {
            cascade,
            candidates,
            desired,
            object,
            ctx,
            next_candidate: 0,
            active: None,
            failures: Vec::new(),
            exhausted: None,
            broken: None,
        };

        if plan.candidates.is_empty() {
            warn!(cascade:% = plan.cascade, object:% = object; "Cascade has no candidates");
        } else {
            plan.activate_next(Phase::PlanConstruction)?;
        }
        log_plan(ctx, &plan);
        Ok(plan)
    }

    /// Activates the next candidate able to build a plan.
    ///
    /// `trigger` tells which phase started the activation and selects the
    /// header of the aggregate error.
    fn activate_next(&mut self, trigger: Phase) -> Result<()> {
        while self.next_candidate < self.candidates.len() {
            let index = self.next_candidate;
            self.next_candidate += 1;
            let candidate = Arc::clone(&self.candidates[index]);

            if index > 0 {
                info!(
                    cascade:% = self.cascade,
                    candidate:% = candidate,
                    index = index;
                    "Trying next cascade candidate"
                );
            }

            match Arc::clone(&candidate).build_plan(self.desired, self.object, self.ctx.nested()) {
                Ok(inner) => {
                    let active = ActivePlan::new(inner, self.cascade.to_string());
                    self.active = Some((index, active));
                    return Ok(());
                }
                Err(err) if err.is_internal() => {
                    self.broken = Some(internal_message(&err));
                    return Err(err);
                }
                Err(err) => self.record(index, candidate.as_ref(), Phase::PlanConstruction, &err),
            }
        }

        let failures = self.failures.clone();
        let error = match trigger {
            Phase::PlanConstruction => CascadeError::for_plan_construction(
                self.cascade.as_ref(),
                self.desired,
                self.object,
                failures,
            ),
            Phase::Execution => CascadeError::for_execution(
                self.cascade.as_ref(),
                self.desired,
                self.object,
                failures,
            ),
        };
        self.exhausted = Some(error.clone());
        Err(error.into())
    }

    fn record(&mut self, index: usize, candidate: &dyn Parser, phase: Phase, error: &Error) {
        let failure = CandidateFailure::capture(index, candidate, phase, error);
        warn!(
            cascade:% = self.cascade,
            candidate = failure.candidate(),
            phase:% = phase;
            "Cascade candidate failed, {}",
            failure.summary()
        );
        self.failures.push(failure);
    }

    pub fn state(&self) -> CascadeState {
        if self.exhausted.is_some() {
            return CascadeState::Exhausted;
        }
        if self.broken.is_some() {
            return CascadeState::Broken;
        }
        match &self.active {
            Some((index, _)) => CascadeState::Active { index: *index },
            None => CascadeState::Empty,
        }
    }

    /// Index of the active candidate, if any.
    pub fn active_index(&self) -> Option<usize> {
        self.active.as_ref().map(|(index, _)| *index)
    }

    /// Failures recorded so far, in candidate order.
    pub fn failures(&self) -> &[CandidateFailure] {
        &self.failures
    }

    /// Candidates captured when the plan was built.
    pub fn candidates(&self) -> &[Arc<dyn Parser>] {
        &self.candidates
    }
}

impl<'a> ParsingPlan<'a> for CascadingPlan<'a> {
    fn desired_type(&self) -> TypeTag {
        self.desired
    }

    fn object(&self) -> &'a PersistedObject {
        self.object
    }

    fn parser(&self) -> &Arc<dyn Parser> {
        &self.cascade
    }

    fn children_plans(&self) -> Option<&ChildPlans<'a>> {
        self.active
            .as_ref()
            .and_then(|(_, active)| active.children_plans())
    }

    /// Executes the active plan, rolling forward on failure.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cascade`] once every candidate has failed, and the
    /// same error on every later call. Returns [`Error::Internal`] for a
    /// cascade without candidates.
    fn execute(&mut self, options: &ParseOptions) -> Result<Value> {
        if let Some(error) = &self.exhausted {
            return Err(error.clone().into());
        }
        if let Some(message) = &self.broken {
            return Err(Error::internal(message.clone()));
        }

        loop {
            let Some((index, active)) = self.active.as_mut() else {
                return Err(Error::internal(format!(
                    "cannot execute a plan of '{}': the parser list is empty",
                    self.cascade
                )));
            };
            let index = *index;

            match active.execute(options) {
                Ok(value) => return Ok(value),
                Err(err) if err.is_internal() => return Err(err),
                Err(err) => {
                    let candidate = Arc::clone(&self.candidates[index]);
                    self.record(index, candidate.as_ref(), Phase::Execution, &err);
                    self.active = None;
                    self.activate_next(Phase::Execution)?;
                }
            }
        }
    }
}

fn internal_message(error: &Error) -> String {
    match error {
        Error::Internal { message } => message.clone(),
        other => other.to_string(),
    }
}

impl fmt::Display for CascadingPlan<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self.state() {
            CascadeState::Active { .. } => None,
            CascadeState::Exhausted => Some("exhausted"),
            CascadeState::Empty => Some("no candidates"),
            CascadeState::Broken => Some("broken"),
        };
        match (&self.active, status) {
            (Some((_, active)), None) => write!(f, "{active}"),
            (_, status) => write!(
                f,
                "{} > {} using {} ({})",
                self.object,
                self.desired,
                self.cascade,
                status.unwrap_or("no active plan")
            ),
        }
    }
}

/// Wraps the plan of the active cascade candidate.
///
/// Behaves exactly as the wrapped plan and only changes its rendering.
pub struct ActivePlan<'a> {
    inner: PlanBox<'a>,
    cascade: String,
}

impl<'a> ActivePlan<'a> {
    pub fn new(inner: PlanBox<'a>, cascade: String) -> Self {
        Self { inner, cascade }
    }

    pub fn inner(&self) -> &dyn ParsingPlan<'a> {
        self.inner.as_ref()
    }
}

impl<'a> ParsingPlan<'a> for ActivePlan<'a> {
    fn desired_type(&self) -> TypeTag {
        self.inner.desired_type()
    }

    fn object(&self) -> &'a PersistedObject {
        self.inner.object()
    }

    fn parser(&self) -> &Arc<dyn Parser> {
        self.inner.parser()
    }

    fn children_plans(&self) -> Option<&ChildPlans<'a>> {
        self.inner.children_plans()
    }

    fn execute(&mut self, options: &ParseOptions) -> Result<Value> {
        self.inner.execute(options)
    }
}

impl fmt::Display for ActivePlan<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (currently active plan in {})",
            self.inner, self.cascade
        )
    }
}
