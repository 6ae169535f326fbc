//! Persisted objects and their discovery on disk.
//!
//! An object lives at a *location*: a path without extension. It is either a
//! single file `<location>.<ext>` or a directory `<location>/` whose entries
//! are the object's children.

mod error;
mod mapping;
mod object;

pub use error::FileMappingError;
pub use mapping::FileMapping;
pub use object::{DEFAULT_ENCODING, FileMode, ObjectKind, PersistedObject};
