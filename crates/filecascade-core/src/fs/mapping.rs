use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use log::{debug, trace};

use super::{DEFAULT_ENCODING, FileMappingError, PersistedObject};

/// Maps locations to [`PersistedObject`]s by inspecting the filesystem.
///
/// The layout is "wrapped": a multi-file object is a directory, and each child
/// is either a file `<name>.<ext>` or a subdirectory `<name>/`. Hidden entries
/// (starting with a dot) are ignored.
#[derive(Debug, Clone)]
pub struct FileMapping {
    encoding: String,
}

impl FileMapping {
    pub fn new() -> Self {
        Self {
            encoding: DEFAULT_ENCODING.to_string(),
        }
    }

    /// Sets the encoding recorded on every discovered single file.
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    /// Resolves `location` to an object.
    ///
    /// `location` may be an existing file path, a directory, or a path prefix
    /// without extension that matches exactly one `<prefix>.<ext>` file.
    ///
    /// # Errors
    ///
    /// Returns [`FileMappingError::ObjectNotFound`] when nothing matches,
    /// [`FileMappingError::PresentMultipleTimes`] when several candidates
    /// match, and [`FileMappingError::IllegalContentName`] when a directory
    /// holds an entry whose name contains more than one dot.
    pub fn discover(&self, location: impl AsRef<Path>) -> Result<PersistedObject, FileMappingError> {
        let location = location.as_ref();
        debug!(location:? = location; "Discovering object");

        if location.is_file() {
            let stem = location.with_extension("");
            return Ok(PersistedObject::single_file(stem, location).with_encoding(&self.encoding));
        }

        let mut found = Vec::new();
        if location.is_dir() {
            found.push(location.to_path_buf());
        }
        found.extend(sibling_files(location)?);

        match found.len() {
            0 => Err(FileMappingError::ObjectNotFound {
                location: location.to_path_buf(),
            }),
            1 => {
                let path = found.remove(0);
                self.load(location.to_path_buf(), path)
            }
            _ => Err(FileMappingError::PresentMultipleTimes {
                location: location.to_path_buf(),
                found,
            }),
        }
    }

    fn load(&self, location: PathBuf, path: PathBuf) -> Result<PersistedObject, FileMappingError> {
        if !path.is_dir() {
            trace!(path:? = path; "Found single file");
            return Ok(PersistedObject::single_file(location, path).with_encoding(&self.encoding));
        }

        let mut entries: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
        for entry in read_dir_sorted(&path)? {
            let file_name = entry
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            if file_name.is_empty() || file_name.starts_with('.') {
                continue;
            }

            let name = if entry.is_dir() {
                file_name
            } else {
                match file_name.split_once('.') {
                    Some((_, ext)) if ext.contains('.') => {
                        return Err(FileMappingError::IllegalContentName {
                            parent: path.clone(),
                            name: file_name,
                        });
                    }
                    Some((stem, _)) => stem.to_string(),
                    None => file_name,
                }
            };
            entries.entry(name).or_default().push(entry);
        }

        let mut children = BTreeMap::new();
        for (name, mut paths) in entries {
            let child_location = path.join(&name);
            if paths.len() > 1 {
                return Err(FileMappingError::PresentMultipleTimes {
                    location: child_location,
                    found: paths,
                });
            }
            let child_path = paths.remove(0);
            children.insert(name, self.load(child_location, child_path)?);
        }

        trace!(path:? = path, children = children.len(); "Found directory");
        Ok(PersistedObject::multi_file(location, children))
    }
}

impl Default for FileMapping {
    fn default() -> Self {
        Self::new()
    }
}

/// Lists the files named `<stem>.<ext>` next to `location`, with a single
/// dot after the stem.
fn sibling_files(location: &Path) -> Result<Vec<PathBuf>, FileMappingError> {
    let Some(stem) = location.file_name().map(|name| name.to_string_lossy().into_owned()) else {
        return Ok(Vec::new());
    };
    let parent = match location.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if !parent.is_dir() {
        return Ok(Vec::new());
    }

    let prefix = format!("{stem}.");
    let matches = read_dir_sorted(&parent)?
        .into_iter()
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .map(|name| is_sibling(&name.to_string_lossy(), &prefix))
                .unwrap_or(false)
        })
        .map(|path| location.with_file_name(path.file_name().unwrap_or_default()))
        .collect();
    Ok(matches)
}

fn is_sibling(file_name: &str, prefix: &str) -> bool {
    file_name
        .strip_prefix(prefix)
        .is_some_and(|ext| !ext.is_empty() && !ext.contains('.'))
}

fn read_dir_sorted(dir: &Path) -> Result<Vec<PathBuf>, FileMappingError> {
    let io_error = |source| FileMappingError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        paths.push(entry.map_err(io_error)?.path());
    }
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::fs::FileMode;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_discover_prefix_single_file() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "item.txt", "hello");

        let obj = FileMapping::new().discover(dir.path().join("item")).unwrap();

        assert_eq!(obj.file_mode(), FileMode::SingleFile);
        assert_eq!(obj.extension(), Some(".txt"));
        assert_eq!(obj.location(), dir.path().join("item"));
    }

    #[test]
    fn test_discover_explicit_file() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "item.toml", "a = 1");

        let obj = FileMapping::new().discover(dir.path().join("item.toml")).unwrap();

        assert_eq!(obj.extension(), Some(".toml"));
        assert_eq!(obj.location(), dir.path().join("item"));
    }

    #[test]
    fn test_discover_directory() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("coll");
        fs::create_dir_all(root.join("nested")).unwrap();
        write(&root, "a.txt", "1");
        write(&root, "b.toml", "x = 2");
        write(&root, ".hidden", "ignored");
        write(&root.join("nested"), "c.txt", "3");

        let obj = FileMapping::new().discover(&root).unwrap();
        let children = obj.children().unwrap();

        assert_eq!(
            children.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["a", "b", "nested"]
        );
        assert!(children["nested"].is_multifile());
        assert_eq!(children["b"].extension(), Some(".toml"));
    }

    #[test]
    fn test_discover_applies_encoding() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "item.txt", "hello");

        let obj = FileMapping::new()
            .with_encoding("latin-1")
            .discover(dir.path().join("item"))
            .unwrap();

        assert_eq!(obj.encoding(), Some("latin-1"));
    }

    #[test]
    fn test_discover_not_found() {
        let dir = TempDir::new().unwrap();
        let err = FileMapping::new().discover(dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, FileMappingError::ObjectNotFound { .. }));
    }

    #[test]
    fn test_discover_present_multiple_times() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "item.txt", "a");
        write(dir.path(), "item.toml", "a = 1");

        let err = FileMapping::new().discover(dir.path().join("item")).unwrap_err();
        match err {
            FileMappingError::PresentMultipleTimes { found, .. } => assert_eq!(found.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_discover_ignores_files_with_extra_dots() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "item.txt", "a");
        write(dir.path(), "item.backup.txt", "b");

        let obj = FileMapping::new().discover(dir.path().join("item")).unwrap();

        assert_eq!(obj.file_path(), Some(dir.path().join("item.txt").as_path()));
    }

    #[test]
    fn test_discover_extra_dots_alone_is_not_found() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "item.backup.txt", "b");

        let err = FileMapping::new().discover(dir.path().join("item")).unwrap_err();
        assert!(matches!(err, FileMappingError::ObjectNotFound { .. }));
    }

    #[test]
    fn test_discover_directory_and_file_conflict() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("item")).unwrap();
        write(dir.path(), "item.txt", "a");

        let err = FileMapping::new().discover(dir.path().join("item")).unwrap_err();
        assert!(matches!(err, FileMappingError::PresentMultipleTimes { .. }));
    }

    #[test]
    fn test_discover_illegal_child_name() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("coll");
        fs::create_dir(&root).unwrap();
        write(&root, "a.b.txt", "1");

        let err = FileMapping::new().discover(&root).unwrap_err();
        assert!(matches!(err, FileMappingError::IllegalContentName { .. }));
    }
}
