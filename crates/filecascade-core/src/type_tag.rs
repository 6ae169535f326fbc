//! Runtime type identities.
//!
//! A [`TypeTag`] pairs a [`TypeId`] with the type's name so that the desired
//! type of a parse request can be compared, ordered, and printed in
//! diagnostics.

use std::{
    any::{self, Any, TypeId},
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

/// Identity of a Rust type travelling through parsing plans.
///
/// Equality and hashing only consider the [`TypeId`]; the name is kept for
/// display and for a stable ordering.
///
/// # Examples
///
/// ```
/// use filecascade_core::type_tag::TypeTag;
///
/// let tag = TypeTag::of::<String>();
/// assert!(tag.is::<String>());
/// assert_eq!(tag.to_string(), "String");
/// ```
#[derive(Clone, Copy)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
}

impl TypeTag {
    /// Returns the tag of `T`.
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: any::type_name::<T>(),
        }
    }

    /// Returns the underlying [`TypeId`].
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the fully qualified type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` if this tag identifies `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    /// Returns the type name with module paths stripped.
    ///
    /// `alloc::collections::btree::map::BTreeMap<alloc::string::String, i64>`
    /// becomes `BTreeMap<String, i64>`.
    pub fn pretty_name(&self) -> String {
        let mut pretty = String::with_capacity(self.name.len());
        let mut word = String::new();

        for ch in self.name.chars() {
            if ch.is_alphanumeric() || ch == '_' || ch == ':' {
                word.push(ch);
            } else {
                push_last_segment(&mut pretty, &word);
                word.clear();
                pretty.push(ch);
            }
        }
        push_last_segment(&mut pretty, &word);

        pretty
    }
}

fn push_last_segment(out: &mut String, path: &str) {
    if let Some(segment) = path.rsplit("::").next() {
        out.push_str(segment);
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for TypeTag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeTag {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(other.name)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeTag({})", self.name)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pretty_name())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn test_tag_equality_follows_type() {
        assert_eq!(TypeTag::of::<String>(), TypeTag::of::<String>());
        assert_ne!(TypeTag::of::<String>(), TypeTag::of::<i64>());
        assert!(TypeTag::of::<i64>().is::<i64>());
        assert!(!TypeTag::of::<i64>().is::<i32>());
    }

    #[test]
    fn test_pretty_name_strips_paths() {
        assert_eq!(TypeTag::of::<String>().pretty_name(), "String");
        assert_eq!(TypeTag::of::<i64>().pretty_name(), "i64");
        assert_eq!(
            TypeTag::of::<BTreeMap<String, Vec<u8>>>().pretty_name(),
            "BTreeMap<String, Vec<u8>>"
        );
    }

    #[test]
    fn test_ordering_is_by_name() {
        let mut tags = vec![
            TypeTag::of::<String>(),
            TypeTag::of::<bool>(),
            TypeTag::of::<f64>(),
        ];
        tags.sort();

        let names: Vec<_> = tags.iter().map(|tag| tag.pretty_name()).collect();
        assert_eq!(names, vec!["String", "bool", "f64"]);
    }
}
