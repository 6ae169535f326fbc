//! Parsing chains: a parser followed by a converter.
//!
//! A [`ParsingChain`] reaches a type its base parser cannot produce by
//! parsing into one concrete type and converting the result.

use std::{fmt, path::Path, sync::Arc};

use filecascade_core::{
    capabilities::{Capabilities, SupportedTypes},
    fs::PersistedObject,
    type_tag::TypeTag,
    value::Value,
};

use crate::{
    converter::{Converter, OutputType},
    error::{Error, Result},
    parser::{ParseOptions, Parser, PlanContext},
    plan::ChildPlans,
};

/// A base parser restricted to one output type, followed by a converter.
///
/// The chain supports the same files as its base parser; only its output
/// type differs, being the converter's destination type.
pub struct ParsingChain {
    base: Arc<dyn Parser>,
    converter: Arc<dyn Converter>,
    strict: bool,
    base_output: TypeTag,
    capabilities: Capabilities,
}

impl ParsingChain {
    /// Chains `base` with `converter`.
    ///
    /// `chosen` selects the output type of `base` to convert from. It may be
    /// omitted when `base` produces a single type.
    ///
    /// # Errors
    ///
    /// - [`Error::AmbiguousChain`] when `base` supports any type, or supports
    ///   several types and `chosen` is `None`.
    /// - [`Error::IncompatibleChain`] when `base` cannot be chained, does not
    ///   produce `chosen`, or when `converter` does not accept the chosen type
    ///   under the given strictness.
    pub fn new(
        base: Arc<dyn Parser>,
        converter: Arc<dyn Converter>,
        strict: bool,
        chosen: Option<TypeTag>,
    ) -> Result<Self> {
        let incompatible = |reason: String| Error::IncompatibleChain {
            base: base.to_string(),
            converter: converter.to_string(),
            reason,
        };
        let ambiguous = |reason: String| Error::AmbiguousChain {
            base: base.to_string(),
            reason,
        };

        let caps = base.capabilities();
        if !caps.is_chainable() {
            return Err(incompatible("the parser output cannot be chained".to_string()));
        }
        let SupportedTypes::Only(types) = caps.types() else {
            return Err(ambiguous(
                "the parser supports any type, chaining from it is not allowed".to_string(),
            ));
        };

        let base_output = match chosen {
            Some(tag) if types.contains(&tag) => tag,
            Some(tag) => {
                return Err(incompatible(format!("the parser does not produce {tag}")));
            }
            None => {
                let mut types_iter = types.iter();
                match (types_iter.next(), types_iter.next()) {
                    (Some(tag), None) => *tag,
                    (None, _) => {
                        return Err(incompatible("the parser produces no type".to_string()));
                    }
                    (Some(_), Some(_)) => {
                        return Err(ambiguous(format!(
                            "the parser supports {}, the type to convert from must be chosen",
                            caps.types()
                        )));
                    }
                }
            }
        };

        if !converter.accepts(strict, Some(base_output), None) {
            return Err(incompatible(format!(
                "the converter does not accept a {base_output}"
            )));
        }

        let types = match converter.to_type() {
            OutputType::Any => SupportedTypes::Any,
            OutputType::Type(tag) => SupportedTypes::single(tag),
        };
        let capabilities = caps.clone().with_types(types);

        Ok(Self {
            base,
            converter,
            strict,
            base_output,
            capabilities,
        })
    }

    pub fn base(&self) -> &Arc<dyn Parser> {
        &self.base
    }

    pub fn converter(&self) -> &Arc<dyn Converter> {
        &self.converter
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Output type of the base parser the conversion starts from.
    pub fn base_output_type(&self) -> TypeTag {
        self.base_output
    }
}

impl fmt::Display for ParsingChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.base, self.converter)
    }
}

impl Parser for ParsingChain {
    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    fn size(&self) -> usize {
        self.base.size() + self.converter.size()
    }

    fn parse_single_file(
        &self,
        desired: TypeTag,
        path: &Path,
        encoding: &str,
        options: &ParseOptions,
    ) -> Result<Value> {
        let parsed =
            self.base
                .parse_single_file(self.converter.from_type(), path, encoding, options)?;
        self.converter.convert(desired, parsed, options)
    }

    fn children_plans<'a>(
        &self,
        _desired: TypeTag,
        object: &'a PersistedObject,
        ctx: PlanContext<'a>,
    ) -> Result<ChildPlans<'a>> {
        self.base
            .children_plans(self.converter.from_type(), object, ctx)
    }

    fn parse_multi_file(
        &self,
        desired: TypeTag,
        object: &PersistedObject,
        children: &mut ChildPlans<'_>,
        options: &ParseOptions,
    ) -> Result<Value> {
        let assembled = self.base.parse_multi_file(
            self.converter.from_type(),
            object,
            children,
            options,
        )?;
        self.converter.convert(desired, assembled, options)
    }
}
