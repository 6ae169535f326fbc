use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised while mapping a location to files on disk.
#[derive(Debug, Error)]
pub enum FileMappingError {
    #[error("object '{location}' cannot be found: no file or directory matches it")]
    ObjectNotFound { location: PathBuf },

    #[error("object '{location}' is present multiple times: {}", format_paths(.found))]
    PresentMultipleTimes {
        location: PathBuf,
        found: Vec<PathBuf>,
    },

    #[error("illegal item name '{name}' in '{parent}': names may contain at most one dot")]
    IllegalContentName { parent: PathBuf, name: String },

    #[error("I/O error while reading '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| format!("'{}'", path.display()))
        .collect::<Vec<_>>()
        .join(", ")
}
