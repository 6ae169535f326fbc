//! Capability descriptors for parsers and converters.
//!
//! A [`Capabilities`] value describes what a parser can produce, which file
//! extensions it reads, and whether it handles single-file and/or multi-file
//! objects. The cascading parser relies on these descriptors to decide which
//! candidates are compatible with each other.

use std::{collections::BTreeSet, fmt};

use crate::type_tag::TypeTag;

/// Set of types a parser or converter is able to produce.
///
/// [`SupportedTypes::Any`] is the wildcard: the parser adapts to whatever type
/// is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupportedTypes {
    /// Every type is supported.
    Any,
    /// Only the listed types are supported.
    Only(BTreeSet<TypeTag>),
}

impl SupportedTypes {
    /// Builds a finite set from an iterator of tags.
    pub fn only(types: impl IntoIterator<Item = TypeTag>) -> Self {
        Self::Only(types.into_iter().collect())
    }

    /// Builds a set holding exactly one tag.
    pub fn single(tag: TypeTag) -> Self {
        Self::only([tag])
    }

    /// Returns `true` for the wildcard.
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Returns `true` if `tag` can be produced.
    pub fn contains(&self, tag: TypeTag) -> bool {
        match self {
            Self::Any => true,
            Self::Only(types) => types.contains(&tag),
        }
    }

    /// Returns `true` if every type in `other` is also in `self`.
    ///
    /// The wildcard covers everything, while a finite set never covers the
    /// wildcard.
    pub fn covers(&self, other: &SupportedTypes) -> bool {
        match (self, other) {
            (Self::Any, _) => true,
            (Self::Only(_), Self::Any) => false,
            (Self::Only(mine), Self::Only(theirs)) => theirs.is_subset(mine),
        }
    }

    /// Returns the types of `other` that `self` does not contain.
    ///
    /// Empty when `self` is the wildcard or when `other` is the wildcard, since
    /// in the latter case no finite list describes the gap.
    pub fn missing_from(&self, other: &SupportedTypes) -> Vec<TypeTag> {
        match (self, other) {
            (Self::Only(mine), Self::Only(theirs)) => theirs.difference(mine).copied().collect(),
            _ => Vec::new(),
        }
    }

    /// Returns the finite set, or `None` for the wildcard.
    pub fn as_set(&self) -> Option<&BTreeSet<TypeTag>> {
        match self {
            Self::Any => None,
            Self::Only(types) => Some(types),
        }
    }
}

impl fmt::Display for SupportedTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::Only(types) => {
                f.write_str("{")?;
                for (i, tag) in types.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{tag}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Describes what a parser supports.
///
/// Extensions are normalized on construction: they always carry a leading
/// dot and are lowercase.
///
/// # Examples
///
/// ```
/// use filecascade_core::{
///     capabilities::{Capabilities, SupportedTypes},
///     type_tag::TypeTag,
/// };
///
/// let caps = Capabilities::single_file(SupportedTypes::single(TypeTag::of::<String>()), ["TXT"]);
/// assert!(caps.supports_extension(".txt"));
/// assert!(caps.supports_single_file());
/// assert!(!caps.supports_multi_file());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    types: SupportedTypes,
    extensions: BTreeSet<String>,
    single_file: bool,
    multi_file: bool,
    chainable: bool,
}

impl Capabilities {
    /// Creates a descriptor from all its parts.
    pub fn new<S: AsRef<str>>(
        types: SupportedTypes,
        extensions: impl IntoIterator<Item = S>,
        single_file: bool,
        multi_file: bool,
    ) -> Self {
        Self {
            types,
            extensions: extensions
                .into_iter()
                .map(|ext| normalize_extension(ext.as_ref()))
                .collect(),
            single_file,
            multi_file,
            chainable: true,
        }
    }

    /// Creates a descriptor for a parser reading single files.
    pub fn single_file<S: AsRef<str>>(
        types: SupportedTypes,
        extensions: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::new(types, extensions, true, false)
    }

    /// Creates a descriptor for a parser reading multi-file objects.
    pub fn multi_file(types: SupportedTypes) -> Self {
        Self::new(types, Vec::<String>::new(), false, true)
    }

    /// Descriptor of a cascade that has not adopted any candidate yet.
    pub fn unconfigured() -> Self {
        Self::new(SupportedTypes::Only(BTreeSet::new()), Vec::<String>::new(), false, false)
    }

    /// Sets whether converters may be appended to this parser.
    pub fn with_chainable(mut self, chainable: bool) -> Self {
        self.chainable = chainable;
        self
    }

    /// Replaces the supported types, keeping everything else.
    pub fn with_types(mut self, types: SupportedTypes) -> Self {
        self.types = types;
        self
    }

    pub fn types(&self) -> &SupportedTypes {
        &self.types
    }

    pub fn extensions(&self) -> &BTreeSet<String> {
        &self.extensions
    }

    pub fn supports_single_file(&self) -> bool {
        self.single_file
    }

    pub fn supports_multi_file(&self) -> bool {
        self.multi_file
    }

    pub fn is_chainable(&self) -> bool {
        self.chainable
    }

    /// Returns `true` if the given extension is declared, ignoring case and
    /// the leading dot.
    pub fn supports_extension(&self, ext: &str) -> bool {
        self.extensions.contains(&normalize_extension(ext))
    }

    /// Returns `true` if every extension of `other` is also declared here.
    pub fn covers_extensions(&self, other: &Capabilities) -> bool {
        other.extensions.is_subset(&self.extensions)
    }

    /// A descriptor is well formed when it supports at least one file mode and,
    /// for single files, declares at least one extension.
    pub fn is_well_formed(&self) -> bool {
        (self.single_file || self.multi_file)
            && (!self.single_file || !self.extensions.is_empty())
    }
}

/// Normalizes an extension to `.ext` in lowercase.
pub fn normalize_extension(ext: &str) -> String {
    let trimmed = ext.trim().trim_start_matches('.');
    format!(".{}", trimmed.to_lowercase())
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modes = match (self.single_file, self.multi_file) {
            (true, true) => "singlefile+multifile",
            (true, false) => "singlefile",
            (false, true) => "multifile",
            (false, false) => "none",
        };
        write!(f, "types {} / {modes}", self.types)?;
        if !self.extensions.is_empty() {
            let exts: Vec<&str> = self.extensions.iter().map(String::as_str).collect();
            write!(f, " / {}", exts.join(" "))?;
        }
        Ok(())
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    // =========================================================================
    // Strategies
    // =========================================================================

    fn tag_pool() -> Vec<TypeTag> {
        vec![
            TypeTag::of::<String>(),
            TypeTag::of::<i64>(),
            TypeTag::of::<f64>(),
            TypeTag::of::<bool>(),
            TypeTag::of::<u8>(),
        ]
    }

    /// Generates either the wildcard or a subset of a fixed tag pool.
    fn arb_supported_types() -> impl Strategy<Value = SupportedTypes> {
        prop_oneof![
            1 => Just(SupportedTypes::Any),
            4 => proptest::sample::subsequence(tag_pool(), 0..=5).prop_map(SupportedTypes::only),
        ]
    }

    // =========================================================================
    // Property Test Functions
    // =========================================================================

    fn check_covers_is_reflexive(types: &SupportedTypes) -> Result<(), TestCaseError> {
        prop_assert!(types.covers(types));
        Ok(())
    }

    fn check_covers_is_transitive(
        a: &SupportedTypes,
        b: &SupportedTypes,
        c: &SupportedTypes,
    ) -> Result<(), TestCaseError> {
        if a.covers(b) && b.covers(c) {
            prop_assert!(a.covers(c));
        }
        Ok(())
    }

    fn check_missing_is_empty_when_covered(
        a: &SupportedTypes,
        b: &SupportedTypes,
    ) -> Result<(), TestCaseError> {
        if a.covers(b) {
            prop_assert!(a.missing_from(b).is_empty());
        } else if !b.is_any() {
            prop_assert!(!a.missing_from(b).is_empty());
        }
        Ok(())
    }

    fn check_normalize_is_idempotent(ext: &str) -> Result<(), TestCaseError> {
        let once = normalize_extension(ext);
        prop_assert_eq!(normalize_extension(&once), once.clone());
        prop_assert!(once.starts_with('.'));
        Ok(())
    }

    // =========================================================================
    // Proptest Wrappers
    // =========================================================================

    proptest! {
        #[test]
        fn covers_is_reflexive(types in arb_supported_types()) {
            check_covers_is_reflexive(&types)?;
        }

        #[test]
        fn covers_is_transitive(
            a in arb_supported_types(),
            b in arb_supported_types(),
            c in arb_supported_types(),
        ) {
            check_covers_is_transitive(&a, &b, &c)?;
        }

        #[test]
        fn missing_is_empty_when_covered(a in arb_supported_types(), b in arb_supported_types()) {
            check_missing_is_empty_when_covered(&a, &b)?;
        }

        #[test]
        fn normalize_is_idempotent(ext in "[.]{0,2}[a-zA-Z]{1,5}") {
            check_normalize_is_idempotent(&ext)?;
        }
    }
}
