use std::{any::Any, fmt, sync::Arc};

use filecascade_core::{type_tag::TypeTag, value::Value};

use super::{Converter, OutputType, types_match};
use crate::{
    error::{Error, Result},
    parser::ParseOptions,
};

type ConvertFn = dyn Fn(TypeTag, Value, &ParseOptions) -> Result<Value> + Send + Sync;
type AcceptFn = dyn Fn(bool, Option<TypeTag>, Option<TypeTag>) -> bool + Send + Sync;

/// A converter backed by a closure.
///
/// # Examples
///
/// ```
/// use filecascade_core::{type_tag::TypeTag, value::Value};
/// use filecascade_parser::{
///     converter::{Converter, ConverterFn},
///     parser::ParseOptions,
/// };
///
/// let to_len = ConverterFn::new("length", |s: String| Ok::<_, String>(s.len()));
/// let value = to_len
///     .convert(TypeTag::of::<usize>(), Value::new("abc".to_string()), &ParseOptions::default())
///     .unwrap();
/// assert_eq!(value.downcast::<usize>().ok(), Some(3));
/// ```
#[derive(Clone)]
pub struct ConverterFn {
    name: String,
    from: TypeTag,
    to: OutputType,
    convert: Arc<ConvertFn>,
    acceptance: Option<Arc<AcceptFn>>,
}

impl ConverterFn {
    /// Creates a converter from `S` to `T`.
    ///
    /// Errors returned by `f` become [`Error::Conversion`] failures carrying
    /// their message.
    pub fn new<S, T, E, F>(name: impl Into<String>, f: F) -> Self
    where
        S: Any,
        T: Any + Send + fmt::Debug,
        E: fmt::Display,
        F: Fn(S) -> std::result::Result<T, E> + Send + Sync + 'static,
    {
        let name = name.into();
        let converter = name.clone();
        Self {
            name,
            from: TypeTag::of::<S>(),
            to: OutputType::Type(TypeTag::of::<T>()),
            convert: Arc::new(move |_: TypeTag, value: Value, _: &ParseOptions| {
                let input = take::<S>(&converter, value)?;
                f(input).map(Value::new).map_err(|err| Error::Conversion {
                    converter: converter.clone(),
                    message: err.to_string(),
                })
            }),
            acceptance: None,
        }
    }

    /// Creates a converter from `S` to whatever type is requested.
    ///
    /// `f` receives the desired type and must return a value of that type.
    pub fn generic<S, F>(name: impl Into<String>, f: F) -> Self
    where
        S: Any,
        F: Fn(TypeTag, S) -> Result<Value> + Send + Sync + 'static,
    {
        let name = name.into();
        let converter = name.clone();
        Self {
            name,
            from: TypeTag::of::<S>(),
            to: OutputType::Any,
            convert: Arc::new(move |desired: TypeTag, value: Value, _: &ParseOptions| {
                f(desired, take::<S>(&converter, value)?)
            }),
            acceptance: None,
        }
    }

    /// Adds a predicate that may veto conversions.
    ///
    /// The predicate is only consulted once the types match; it receives the
    /// strict flag and the requested source and destination types.
    pub fn with_acceptance<F>(mut self, predicate: F) -> Self
    where
        F: Fn(bool, Option<TypeTag>, Option<TypeTag>) -> bool + Send + Sync + 'static,
    {
        self.acceptance = Some(Arc::new(predicate));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

fn take<S: Any>(converter: &str, value: Value) -> Result<S> {
    value.downcast::<S>().map_err(|value| Error::Conversion {
        converter: converter.to_string(),
        message: format!(
            "expected a {} but received a {}",
            TypeTag::of::<S>(),
            value.type_tag()
        ),
    })
}

impl Converter for ConverterFn {
    fn from_type(&self) -> TypeTag {
        self.from
    }

    fn to_type(&self) -> OutputType {
        self.to
    }

    fn accepts(&self, strict: bool, from: Option<TypeTag>, to: Option<TypeTag>) -> bool {
        types_match(self.from, self.to, from, to)
            && self
                .acceptance
                .as_ref()
                .is_none_or(|predicate| predicate(strict, from, to))
    }

    fn convert(&self, desired: TypeTag, value: Value, options: &ParseOptions) -> Result<Value> {
        (self.convert)(desired, value, options)
    }
}

impl fmt::Display for ConverterFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}: {} -> {}>", self.name, self.from, self.to)
    }
}

impl fmt::Debug for ConverterFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterFn")
            .field("name", &self.name)
            .field("from", &self.from)
            .field("to", &self.to)
            .finish_non_exhaustive()
    }
}
