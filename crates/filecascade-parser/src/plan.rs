//! Parsing plans: executable recipes bound to one parser and one object.

use std::{collections::BTreeMap, fmt, sync::Arc};

use log::{debug, info};

use filecascade_core::{fs::PersistedObject, type_tag::TypeTag, value::Value};

use crate::{
    error::{Error, Result},
    parser::{ParseOptions, Parser, PlanContext},
};

/// A boxed plan borrowing the object it parses.
pub type PlanBox<'a> = Box<dyn ParsingPlan<'a> + 'a>;

/// Plans of the children of a multi-file object, sorted by child name.
pub type ChildPlans<'a> = BTreeMap<String, PlanBox<'a>>;

/// A materialized recipe producing a value of the desired type from an
/// object.
///
/// A plan is tied to one parser and one object for its whole life. Child
/// plans of multi-file objects are built once, together with their parent.
/// Executing a plan again re-runs the underlying parsers; nothing is cached.
pub trait ParsingPlan<'a>: fmt::Display {
    fn desired_type(&self) -> TypeTag;

    fn object(&self) -> &'a PersistedObject;

    /// The parser this plan was built for.
    fn parser(&self) -> &Arc<dyn Parser>;

    /// Child plans, for plans over multi-file objects.
    fn children_plans(&self) -> Option<&ChildPlans<'a>> {
        None
    }

    /// Runs the plan.
    ///
    /// # Errors
    ///
    /// Returns the failure of the underlying parser.
    fn execute(&mut self, options: &ParseOptions) -> Result<Value>;
}

/// Logs a freshly built plan: `info` for root requests, `debug` otherwise.
pub(crate) fn log_plan(ctx: PlanContext<'_>, plan: &dyn fmt::Display) {
    if ctx.is_root() {
        info!(plan:% = plan; "Parsing plan created");
    } else {
        debug!(depth = ctx.depth(); "{plan}");
    }
}

/// The plan of an ordinary parser.
///
/// Single-file objects are parsed directly; multi-file objects get one child
/// plan per child, built eagerly through [`Parser::children_plans`].
pub struct RecursivePlan<'a> {
    parser: Arc<dyn Parser>,
    desired: TypeTag,
    object: &'a PersistedObject,
    children: Option<ChildPlans<'a>>,
}

impl<'a> RecursivePlan<'a> {
    /// Checks that `parser` can handle `object` and builds the plan.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParser`] when the parser does not support the
    /// object's file mode, extension or the desired type, and propagates
    /// failures of child plan construction.
    pub fn build(
        parser: Arc<dyn Parser>,
        desired: TypeTag,
        object: &'a PersistedObject,
        ctx: PlanContext<'a>,
    ) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidParser {
            parser: parser.to_string(),
            object: object.to_string(),
            desired,
            reason,
        };

        let caps = parser.capabilities();
        if !caps.types().contains(desired) {
            return Err(invalid(format!("it only produces {}", caps.types())));
        }

        let children = if object.is_multifile() {
            if !caps.supports_multi_file() {
                return Err(invalid("multi-file objects are not supported".to_string()));
            }
            Some(parser.children_plans(desired, object, ctx.nested())?)
        } else {
            if !caps.supports_single_file() {
                return Err(invalid("single files are not supported".to_string()));
            }
            let ext = object.extension().unwrap_or_default();
            if !caps.supports_extension(ext) {
                return Err(invalid(format!("extension '{ext}' is not supported")));
            }
            None
        };

        let plan = Self {
            parser,
            desired,
            object,
            children,
        };
        log_plan(ctx, &plan);
        Ok(plan)
    }

    fn run(&mut self, options: &ParseOptions) -> Result<Value> {
        match &mut self.children {
            Some(children) => {
                self.parser
                    .parse_multi_file(self.desired, self.object, children, options)
            }
            None => {
                let (Some(path), Some(encoding)) = (self.object.file_path(), self.object.encoding())
                else {
                    return Err(Error::internal(format!(
                        "single-file plan over {} has no file",
                        self.object
                    )));
                };
                self.parser
                    .parse_single_file(self.desired, path, encoding, options)
            }
        }
    }
}

impl<'a> ParsingPlan<'a> for RecursivePlan<'a> {
    fn desired_type(&self) -> TypeTag {
        self.desired
    }

    fn object(&self) -> &'a PersistedObject {
        self.object
    }

    fn parser(&self) -> &Arc<dyn Parser> {
        &self.parser
    }

    fn children_plans(&self) -> Option<&ChildPlans<'a>> {
        self.children.as_ref()
    }

    fn execute(&mut self, options: &ParseOptions) -> Result<Value> {
        let value = self
            .run(options)
            .map_err(|err| Error::parsing(&self.parser, self.object, self.desired, err))?;

        if value.type_tag() != self.desired {
            return Err(Error::WrongResultType {
                parser: self.parser.to_string(),
                object: self.object.to_string(),
                expected: self.desired,
                found: value.type_tag(),
            });
        }
        Ok(value)
    }
}

impl fmt::Display for RecursivePlan<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} > {} using {}", self.object, self.desired, self.parser)
    }
}
