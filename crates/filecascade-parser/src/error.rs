//! Error types for the parsing engine.
//!
//! [`Error`] covers every failure a parser, converter or plan can report.
//! Two of its variants have special meaning inside a cascade:
//!
//! - [`Error::Cascade`] is the aggregate raised once every candidate of a
//!   cascading plan has failed (see [`CascadeError`]).
//! - [`Error::Internal`] signals a broken framework invariant. It is never
//!   captured nor retried by a cascade and always propagates immediately.

mod cascade_error;

use std::{io, path::PathBuf};

use thiserror::Error;

use filecascade_core::{fs::FileMappingError, type_tag::TypeTag};

pub use cascade_error::{CandidateFailure, CascadeError, Phase};

/// A type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while building or executing parsing plans.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Cascade(#[from] CascadeError),

    #[error("cannot add candidate '{candidate}' to '{cascade}': {reason}")]
    IncompatibleCandidate {
        cascade: String,
        candidate: String,
        reason: String,
    },

    #[error("ambiguous parsing chain from '{base}': {reason}")]
    AmbiguousChain { base: String, reason: String },

    #[error("cannot chain '{base}' with '{converter}': {reason}")]
    IncompatibleChain {
        base: String,
        converter: String,
        reason: String,
    },

    #[error("parser '{parser}' cannot parse {object} as a {desired}: {reason}")]
    InvalidParser {
        parser: String,
        object: String,
        desired: TypeTag,
        reason: String,
    },

    #[error("parser '{parser}' produced a {found} instead of a {expected} for {object}")]
    WrongResultType {
        parser: String,
        object: String,
        expected: TypeTag,
        found: TypeTag,
    },

    #[error("error while parsing {object} as a {desired} with parser '{parser}'")]
    Parsing {
        parser: String,
        object: String,
        desired: TypeTag,
        #[source]
        source: Box<Error>,
    },

    #[error("converter '{converter}' failed: {message}")]
    Conversion { converter: String, message: String },

    #[error("invalid content in '{}': {message}", .path.display())]
    Format { path: PathBuf, message: String },

    #[error("no parser found to parse {object} as a {desired}")]
    NoParserFound { object: String, desired: TypeTag },

    #[error(transparent)]
    FileMapping(#[from] FileMappingError),

    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{feature} is not supported")]
    Unsupported { feature: String },

    #[error("internal error, this should never happen: {message}")]
    Internal { message: String },

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wraps the failure of a parsing primitive with its context.
    ///
    /// Internal errors are returned unchanged so that they keep propagating
    /// as such.
    pub fn parsing(
        parser: impl ToString,
        object: impl ToString,
        desired: TypeTag,
        source: Error,
    ) -> Self {
        if source.is_internal() {
            return source;
        }
        Self::Parsing {
            parser: parser.to_string(),
            object: object.to_string(),
            desired,
            source: Box::new(source),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn unsupported(feature: impl Into<String>) -> Self {
        Self::Unsupported {
            feature: feature.into(),
        }
    }

    /// Returns `true` for broken framework invariants.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }

    /// Returns the name of the failure class, used in aggregated reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Cascade(_) => "CascadeError",
            Self::IncompatibleCandidate { .. } => "IncompatibleCandidateError",
            Self::AmbiguousChain { .. } => "AmbiguousChainError",
            Self::IncompatibleChain { .. } => "IncompatibleChainError",
            Self::InvalidParser { .. } => "InvalidParserError",
            Self::WrongResultType { .. } => "WrongResultTypeError",
            Self::Parsing { .. } => "ParsingError",
            Self::Conversion { .. } => "ConversionError",
            Self::Format { .. } => "FormatError",
            Self::NoParserFound { .. } => "NoParserFoundError",
            Self::FileMapping(_) => "FileMappingError",
            Self::Io { .. } => "IoError",
            Self::Unsupported { .. } => "UnsupportedError",
            Self::Internal { .. } => "InternalError",
            Self::Other(_) => "Error",
        }
    }
}
