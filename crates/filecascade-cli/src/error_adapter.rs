//! Error adapter for converting FileCascadeError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! # Cascade Failures
//!
//! When every candidate of a cascade failed, the cascade headline and each
//! candidate failure are rendered independently, in candidate order.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use filecascade::{FileCascadeError, fs::FileMappingError};
use filecascade_parser::{
    Error,
    error::{CandidateFailure, Phase},
};

/// Adapter for a single failed cascade candidate.
pub struct FailureAdapter<'a> {
    failure: &'a CandidateFailure,
}

impl<'a> FailureAdapter<'a> {
    /// Create a new failure adapter.
    pub fn new(failure: &'a CandidateFailure) -> Self {
        Self { failure }
    }
}

impl fmt::Debug for FailureAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FailureAdapter")
            .field("failure", &self.failure)
            .finish()
    }
}

impl fmt::Display for FailureAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "candidate #{} '{}' failed: {}",
            self.failure.index() + 1,
            self.failure.candidate(),
            self.failure.message()
        )
    }
}

impl std::error::Error for FailureAdapter<'_> {}

impl MietteDiagnostic for FailureAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.failure.phase() {
            Phase::PlanConstruction => "filecascade::candidate::plan",
            Phase::Execution => "filecascade::candidate::execution",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let trace = self.failure.trace();
        if trace.is_empty() {
            return None;
        }
        let causes = trace
            .iter()
            .map(|cause| format!("caused by: {cause}"))
            .collect::<Vec<_>>()
            .join("\n");
        Some(Box::new(causes))
    }
}

/// Adapter for [`FileCascadeError`] values.
///
/// Cascade errors only render their headline here; their failures are
/// reported through [`FailureAdapter`].
pub struct ErrorAdapter<'a>(pub &'a FileCascadeError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            FileCascadeError::Parse(Error::Cascade(cascade)) => f.write_str(&cascade.headline()),
            err => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.0 {
            FileCascadeError::Io(_) => "filecascade::io",
            FileCascadeError::Config(_) => "filecascade::config",
            FileCascadeError::UnexpectedType { .. } => "filecascade::type",
            FileCascadeError::Parse(err) => match err {
                Error::Cascade(_) => "filecascade::cascade",
                Error::NoParserFound { .. } => "filecascade::no_parser",
                Error::FileMapping(_) => "filecascade::mapping",
                Error::Unsupported { .. } => "filecascade::unsupported",
                Error::Internal { .. } => "filecascade::internal",
                _ => "filecascade::parse",
            },
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.0 {
            FileCascadeError::Parse(Error::NoParserFound { .. }) => {
                "no registered parser or converter chain produces this type; try another --type"
            }
            FileCascadeError::Parse(Error::FileMapping(FileMappingError::ObjectNotFound {
                ..
            })) => "the location may omit the file extension, but must name an existing item",
            FileCascadeError::Parse(Error::FileMapping(
                FileMappingError::PresentMultipleTimes { .. },
            )) => "keep a single file or directory with this name",
            FileCascadeError::Parse(Error::Internal { .. }) => {
                "this is a bug in filecascade, please report it"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// The failure of one cascade candidate.
    Failure(FailureAdapter<'a>),
    /// A top-level error.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Failure(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Failure(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Failure(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Failure(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }
}

/// Convert a [`FileCascadeError`] into a list of reportable errors.
///
/// A cascade error yields its headline followed by one [`Reportable`] per
/// candidate failure. Other errors yield a single [`Reportable`].
pub fn to_reportables(err: &FileCascadeError) -> Vec<Reportable<'_>> {
    let mut reportables = vec![Reportable::Error(ErrorAdapter(err))];
    if let FileCascadeError::Parse(Error::Cascade(cascade)) = err {
        reportables.extend(
            cascade
                .failures()
                .iter()
                .map(|failure| Reportable::Failure(FailureAdapter::new(failure))),
        );
    }
    reportables
}
