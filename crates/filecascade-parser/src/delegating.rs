//! Parsers that route all their work through other parsers.

use std::sync::Arc;

use log::error;

use crate::{error::Error, parser::Parser};

/// A parser whose parsing primitives must never run.
///
/// [`Parser::parse_single_file`], [`Parser::children_plans`] and
/// [`Parser::parse_multi_file`] of a delegating parser return
/// [`Error::Internal`]: the real work always happens in the parsers it
/// delegates to, reached through the specialized plan returned by its
/// [`Parser::build_plan`] override.
pub trait DelegatingParser: Parser {
    /// Parsers this one delegates to, in priority order.
    fn delegates(&self) -> &[Arc<dyn Parser>];
}

/// Failure returned by the primitives of a delegating parser.
pub(crate) fn unreachable_primitive(parser: &dyn DelegatingParser, primitive: &str) -> Error {
    let delegates = parser.delegates().len();
    error!(
        parser:% = parser,
        primitive = primitive,
        delegates = delegates;
        "Delegating parser primitive invoked"
    );
    Error::internal(format!(
        "'{primitive}' of delegating parser '{parser}' must never be invoked directly, \
         its {delegates} delegate(s) are reached through its plan"
    ))
}
