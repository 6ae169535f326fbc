//! FileCascade Parsing Engine
//!
//! This crate builds and runs *parsing plans*: recipes that turn a
//! filesystem object into a value of a desired type.
//!
//! # Overview
//!
//! - [`parser::Parser`] is the capability every parser implements. Its
//!   provided [`parser::Parser::build_plan`] returns a [`plan::RecursivePlan`]
//!   that parses single files directly and builds child plans for multi-file
//!   objects.
//! - [`cascade::CascadingParser`] tries several candidate parsers in order.
//!   Its [`cascade::CascadingPlan`] rolls forward to the next candidate on any
//!   failure and reports all of them at once through
//!   [`error::CascadeError`].
//! - [`chain::ParsingChain`] appends a [`converter::Converter`] to a parser to
//!   reach a type the parser cannot produce by itself.
//! - [`delegating::DelegatingParser`] marks parsers whose parsing primitives
//!   must never run.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use filecascade_core::{fs::PersistedObject, type_tag::TypeTag};
//! use filecascade_parser::{
//!     cascade::CascadingParser,
//!     error::Error,
//!     parser::{Parser, PlanContext},
//!     plan::ParsingPlan,
//! };
//!
//! let cascade = Arc::new(CascadingParser::new());
//! let object = PersistedObject::single_file("notes", "notes.txt");
//! let mut plan = cascade
//!     .build_plan(TypeTag::of::<String>(), &object, PlanContext::root())
//!     .unwrap();
//!
//! // No candidates: executing is a framework error, not a cascade failure.
//! let err = plan.execute(&Default::default()).unwrap_err();
//! assert!(matches!(err, Error::Internal { .. }));
//! ```

pub mod cascade;
pub mod chain;
pub mod converter;
pub mod delegating;
pub mod error;
pub mod parser;
pub mod plan;

#[cfg(test)]
mod testing;

pub use cascade::CascadingParser;
pub use chain::ParsingChain;
pub use error::{CascadeError, Error, Result};
pub use parser::{ParseOptions, Parser, ParserFinder, PlanContext};
pub use plan::{ParsingPlan, PlanBox};
