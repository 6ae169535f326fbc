//! Error types for FileCascade operations.
//!
//! This module provides the main error type [`FileCascadeError`] which wraps
//! the failures of discovery, plan construction and plan execution.

use std::io;

use thiserror::Error;

use filecascade_core::type_tag::TypeTag;
use filecascade_parser::Error as ParseError;

/// The main error type for FileCascade operations.
#[derive(Debug, Error)]
pub enum FileCascadeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parsed a {found} where a {expected} was requested")]
    UnexpectedType { expected: TypeTag, found: TypeTag },
}

impl From<filecascade_core::fs::FileMappingError> for FileCascadeError {
    fn from(error: filecascade_core::fs::FileMappingError) -> Self {
        Self::Parse(ParseError::FileMapping(error))
    }
}
