//! Type-erased parsed values.

use std::{any::Any, collections::BTreeMap, fmt};

use crate::type_tag::TypeTag;

/// Dictionary of named values produced by multi-file parsers.
pub type ValueMap = BTreeMap<String, Value>;

/// Values of a multi-file object's children, sorted by child name.
pub type ValueList = Vec<Value>;

/// An owned, type-erased parse result tagged with its concrete type.
///
/// # Examples
///
/// ```
/// use filecascade_core::{type_tag::TypeTag, value::Value};
///
/// let value = Value::new(42_i64);
/// assert_eq!(value.type_tag(), TypeTag::of::<i64>());
/// assert_eq!(value.downcast::<i64>().ok(), Some(42));
/// ```
pub struct Value {
    tag: TypeTag,
    inner: Box<dyn Any + Send>,
    debug: fn(&(dyn Any + Send), &mut fmt::Formatter<'_>) -> fmt::Result,
}

impl Value {
    pub fn new<T: Any + Send + fmt::Debug>(value: T) -> Self {
        Self {
            tag: TypeTag::of::<T>(),
            inner: Box::new(value),
            debug: debug_as::<T>,
        }
    }

    /// Returns the tag of the contained type.
    pub fn type_tag(&self) -> TypeTag {
        self.tag
    }

    /// Returns `true` if the contained value is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.tag.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Takes the contained value out as a `T`.
    ///
    /// # Errors
    ///
    /// Returns the untouched value when it does not hold a `T`.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        let Self { tag, inner, debug } = self;
        inner
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|inner| Self { tag, inner, debug })
    }
}

fn debug_as<T: Any + fmt::Debug>(
    value: &(dyn Any + Send),
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    match value.downcast_ref::<T>() {
        Some(value) => fmt::Debug::fmt(value, f),
        None => f.write_str("<opaque>"),
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.debug)(self.inner.as_ref(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downcast_success() {
        let value = Value::new(String::from("hello"));
        assert!(value.is::<String>());
        assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("hello"));
        assert_eq!(value.downcast::<String>().ok().as_deref(), Some("hello"));
    }

    #[test]
    fn test_downcast_failure_returns_value() {
        let value = Value::new(3.5_f64);
        let value = value.downcast::<i64>().unwrap_err();
        assert_eq!(value.type_tag(), TypeTag::of::<f64>());
        assert_eq!(value.downcast::<f64>().ok(), Some(3.5));
    }

    #[test]
    fn test_debug_uses_inner_value() {
        let mut map = ValueMap::new();
        map.insert("a".to_string(), Value::new(1_i64));
        map.insert("b".to_string(), Value::new(true));

        assert_eq!(format!("{:?}", Value::new(map)), r#"{"a": 1, "b": true}"#);
    }
}
