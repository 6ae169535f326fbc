//! The parser capability and the context handed to plan construction.

use std::{fmt, path::Path, sync::Arc};

use filecascade_core::{
    capabilities::Capabilities, fs::PersistedObject, type_tag::TypeTag, value::Value,
};

use crate::{
    error::{Error, Result},
    plan::{ChildPlans, PlanBox, RecursivePlan},
};

/// Options applied while executing plans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Parse the children of multi-file objects in the background.
    ///
    /// Not supported: collection parsers fail fast when it is set.
    pub background_children: bool,
}

/// Looks up a parser able to produce `desired` from `object`.
///
/// Multi-file parsers receive a finder through [`PlanContext`] to build plans
/// for their children.
pub trait ParserFinder {
    /// # Errors
    ///
    /// Returns [`Error::NoParserFound`] when no registered parser fits.
    fn find_parser(&self, desired: TypeTag, object: &PersistedObject) -> Result<Arc<dyn Parser>>;
}

/// Context of a plan construction request.
///
/// The depth tells root requests (depth 0) from nested ones, which only log
/// at debug level.
#[derive(Clone, Copy)]
pub struct PlanContext<'a> {
    finder: Option<&'a dyn ParserFinder>,
    depth: usize,
}

impl<'a> PlanContext<'a> {
    /// Root context without a parser finder.
    pub fn root() -> Self {
        Self {
            finder: None,
            depth: 0,
        }
    }

    /// Root context resolving children through `finder`.
    pub fn with_finder(finder: &'a dyn ParserFinder) -> Self {
        Self {
            finder: Some(finder),
            depth: 0,
        }
    }

    /// Context for a plan built on behalf of another plan.
    pub fn nested(self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self
        }
    }

    pub fn is_root(&self) -> bool {
        self.depth == 0
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn finder(&self) -> Option<&'a dyn ParserFinder> {
        self.finder
    }
}

impl Default for PlanContext<'_> {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Debug for PlanContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlanContext")
            .field("has_finder", &self.finder.is_some())
            .field("depth", &self.depth)
            .finish()
    }
}

/// Upcasts a shared concrete parser to a shared trait object.
///
/// Implemented for every sized [`Parser`]; lets provided trait methods hand
/// `self` over to plans as an `Arc<dyn Parser>`.
pub trait IntoDynParser {
    fn into_dyn_parser(self: Arc<Self>) -> Arc<dyn Parser>;
}

impl<P: Parser + 'static> IntoDynParser for P {
    fn into_dyn_parser(self: Arc<Self>) -> Arc<dyn Parser> {
        self
    }
}

/// Turns filesystem objects into values.
///
/// A parser either reads single files directly ([`Parser::parse_single_file`])
/// or decomposes a multi-file object into child plans
/// ([`Parser::children_plans`]) and assembles their results
/// ([`Parser::parse_multi_file`]). The provided [`Parser::build_plan`] wires
/// these primitives into a [`RecursivePlan`]; parsers routing their work
/// elsewhere override it.
pub trait Parser: IntoDynParser + fmt::Display + Send + Sync {
    /// What this parser supports.
    fn capabilities(&self) -> &Capabilities;

    /// Number of steps this parser stands for, used to rank candidates.
    fn size(&self) -> usize {
        1
    }

    /// Builds a plan producing `desired` from `object`.
    ///
    /// # Errors
    ///
    /// Returns an error when this parser cannot handle `object`, or when a
    /// child plan cannot be built.
    fn build_plan<'a>(
        self: Arc<Self>,
        desired: TypeTag,
        object: &'a PersistedObject,
        ctx: PlanContext<'a>,
    ) -> Result<PlanBox<'a>> {
        let plan = RecursivePlan::build(self.into_dyn_parser(), desired, object, ctx)?;
        Ok(Box::new(plan))
    }

    /// Parses a single file.
    ///
    /// # Errors
    ///
    /// The provided implementation always fails: parsers supporting single
    /// files must override it.
    fn parse_single_file(
        &self,
        desired: TypeTag,
        path: &Path,
        encoding: &str,
        options: &ParseOptions,
    ) -> Result<Value> {
        let _ = (encoding, options);
        Err(Error::InvalidParser {
            parser: self.to_string(),
            object: path.display().to_string(),
            desired,
            reason: "single files are not supported".to_string(),
        })
    }

    /// Builds the plans of the children of a multi-file object.
    ///
    /// # Errors
    ///
    /// The provided implementation always fails: parsers supporting
    /// multi-file objects must override it.
    fn children_plans<'a>(
        &self,
        desired: TypeTag,
        object: &'a PersistedObject,
        ctx: PlanContext<'a>,
    ) -> Result<ChildPlans<'a>> {
        let _ = ctx;
        Err(Error::InvalidParser {
            parser: self.to_string(),
            object: object.to_string(),
            desired,
            reason: "multi-file objects are not supported".to_string(),
        })
    }

    /// Assembles a multi-file object from its executed children.
    ///
    /// # Errors
    ///
    /// The provided implementation always fails: parsers supporting
    /// multi-file objects must override it.
    fn parse_multi_file(
        &self,
        desired: TypeTag,
        object: &PersistedObject,
        children: &mut ChildPlans<'_>,
        options: &ParseOptions,
    ) -> Result<Value> {
        let _ = (children, options);
        Err(Error::InvalidParser {
            parser: self.to_string(),
            object: object.to_string(),
            desired,
            reason: "multi-file objects are not supported".to_string(),
        })
    }
}
