use std::{
    collections::BTreeMap,
    fmt,
    path::{Path, PathBuf},
};

use crate::capabilities::normalize_extension;

/// Default text encoding of single files.
pub const DEFAULT_ENCODING: &str = "utf-8";

/// How an object is laid out on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    SingleFile,
    MultiFile,
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleFile => f.write_str("singlefile"),
            Self::MultiFile => f.write_str("multifile"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectKind {
    /// A single file with its text encoding.
    SingleFile { path: PathBuf, encoding: String },
    /// A directory whose children are named objects.
    MultiFile {
        children: BTreeMap<String, PersistedObject>,
    },
}

/// A parseable item located on the filesystem.
///
/// # Examples
///
/// ```
/// use filecascade_core::fs::PersistedObject;
///
/// let obj = PersistedObject::single_file("data/config", "data/config.TOML");
/// assert_eq!(obj.extension(), Some(".toml"));
/// assert_eq!(obj.to_string(), "data/config (singlefile, .toml)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedObject {
    location: PathBuf,
    extension: Option<String>,
    kind: ObjectKind,
}

impl PersistedObject {
    /// Creates a single-file object. The extension is taken from `path`.
    pub fn single_file(location: impl Into<PathBuf>, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let extension = path
            .extension()
            .map(|ext| normalize_extension(&ext.to_string_lossy()));
        Self {
            location: location.into(),
            extension,
            kind: ObjectKind::SingleFile {
                path,
                encoding: DEFAULT_ENCODING.to_string(),
            },
        }
    }

    /// Creates a multi-file object from its children.
    pub fn multi_file(
        location: impl Into<PathBuf>,
        children: BTreeMap<String, PersistedObject>,
    ) -> Self {
        Self {
            location: location.into(),
            extension: None,
            kind: ObjectKind::MultiFile { children },
        }
    }

    /// Sets the text encoding of a single-file object. No effect otherwise.
    pub fn with_encoding(mut self, new_encoding: impl Into<String>) -> Self {
        if let ObjectKind::SingleFile { encoding, .. } = &mut self.kind {
            *encoding = new_encoding.into();
        }
        self
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Returns the last component of the location.
    pub fn name(&self) -> String {
        self.location
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    pub fn file_mode(&self) -> FileMode {
        match self.kind {
            ObjectKind::SingleFile { .. } => FileMode::SingleFile,
            ObjectKind::MultiFile { .. } => FileMode::MultiFile,
        }
    }

    pub fn is_multifile(&self) -> bool {
        self.file_mode() == FileMode::MultiFile
    }

    /// Returns the normalized extension of a single-file object.
    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    pub fn file_path(&self) -> Option<&Path> {
        match &self.kind {
            ObjectKind::SingleFile { path, .. } => Some(path),
            ObjectKind::MultiFile { .. } => None,
        }
    }

    pub fn encoding(&self) -> Option<&str> {
        match &self.kind {
            ObjectKind::SingleFile { encoding, .. } => Some(encoding),
            ObjectKind::MultiFile { .. } => None,
        }
    }

    pub fn children(&self) -> Option<&BTreeMap<String, PersistedObject>> {
        match &self.kind {
            ObjectKind::SingleFile { .. } => None,
            ObjectKind::MultiFile { children } => Some(children),
        }
    }
}

impl fmt::Display for PersistedObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.extension {
            Some(ext) => write!(f, "{} ({}, {ext})", self.location.display(), self.file_mode()),
            None => write!(f, "{} ({})", self.location.display(), self.file_mode()),
        }
    }
}
