//! Converters: transformations of already-parsed values.
//!
//! A [`Converter`] turns a value of its source type into a value of its
//! destination type. Converters are combined with [`ConversionChain`] and
//! appended to parsers by [`crate::chain::ParsingChain`].

mod chain;
mod function;

use std::fmt;

use filecascade_core::{type_tag::TypeTag, value::Value};

use crate::{error::Result, parser::ParseOptions};

pub use chain::ConversionChain;
pub use function::ConverterFn;

/// Destination type of a converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputType {
    /// The converter produces whatever type is requested.
    Any,
    Type(TypeTag),
}

impl OutputType {
    /// Returns `true` if a value of `desired` can come out.
    pub fn allows(&self, desired: TypeTag) -> bool {
        match self {
            Self::Any => true,
            Self::Type(tag) => *tag == desired,
        }
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::Type(tag) => write!(f, "{tag}"),
        }
    }
}

/// Transforms a value of [`Converter::from_type`] into [`Converter::to_type`].
pub trait Converter: fmt::Display + Send + Sync {
    /// Source type. Never a wildcard.
    fn from_type(&self) -> TypeTag;

    fn to_type(&self) -> OutputType;

    /// Tells whether this converter can go from `from` to `to`.
    ///
    /// `None` leaves the corresponding side unconstrained. The provided
    /// implementation compares the types exactly; `strict` is handed to
    /// converters with their own acceptance rules.
    fn accepts(&self, strict: bool, from: Option<TypeTag>, to: Option<TypeTag>) -> bool {
        let _ = strict;
        types_match(self.from_type(), self.to_type(), from, to)
    }

    /// Converts `value` into a value of `desired`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Conversion`] when the value cannot be
    /// converted.
    fn convert(&self, desired: TypeTag, value: Value, options: &ParseOptions) -> Result<Value>;

    /// Number of conversion steps, used to rank chains.
    fn size(&self) -> usize {
        1
    }
}

/// Exact type compatibility used by [`Converter::accepts`].
pub fn types_match(
    from_type: TypeTag,
    to_type: OutputType,
    from: Option<TypeTag>,
    to: Option<TypeTag>,
) -> bool {
    from.is_none_or(|from| from == from_type) && to.is_none_or(|to| to_type.allows(to))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_types_match() {
        let string = TypeTag::of::<String>();
        let int = TypeTag::of::<i64>();

        assert!(types_match(string, OutputType::Type(int), Some(string), Some(int)));
        assert!(types_match(string, OutputType::Type(int), None, None));
        assert!(!types_match(string, OutputType::Type(int), Some(int), None));
        assert!(!types_match(string, OutputType::Type(int), None, Some(string)));
        assert!(types_match(string, OutputType::Any, Some(string), Some(string)));
    }
}
