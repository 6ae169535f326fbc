//! Parser and converter registry.
//!
//! The [`ParserRegistry`] answers "which parsers can produce this type from
//! this object?" and assembles the answer into a single parser, cascading
//! over all candidates when there are several.

use std::sync::Arc;

use log::{debug, trace};

use filecascade_core::{fs::PersistedObject, type_tag::TypeTag};
use filecascade_parser::{
    CascadingParser, Error, Parser, ParserFinder, ParsingChain, Result,
    converter::{ConversionChain, Converter, OutputType},
};

use crate::builtin::{TextParser, TomlParser, default_converters};

/// Registered parsers and converters.
///
/// Candidates for a query are ordered as follows:
///
/// 1. parsers producing exactly the desired type, in registration order;
/// 2. parsers producing any type, in registration order;
/// 3. parsing chains (a parser followed by one or two converters), shortest
///    first.
pub struct ParserRegistry {
    parsers: Vec<Arc<dyn Parser>>,
    converters: Vec<Arc<dyn Converter>>,
    strict: bool,
}

impl ParserRegistry {
    /// Creates an empty registry.
    ///
    /// # Arguments
    ///
    /// * `strict` - Strict mode handed to converter acceptance checks.
    pub fn new(strict: bool) -> Self {
        Self {
            parsers: Vec::new(),
            converters: Vec::new(),
            strict,
        }
    }

    /// Creates a registry holding the stock parsers and converters.
    pub fn with_defaults(strict: bool) -> Self {
        let mut registry = Self::new(strict);
        registry.register_parser(Arc::new(TextParser::new()));
        registry.register_parser(Arc::new(TomlParser::new()));
        for converter in default_converters() {
            registry.register_converter(converter);
        }
        registry
    }

    pub fn register_parser(&mut self, parser: Arc<dyn Parser>) {
        debug!(parser:% = parser; "Registering parser");
        self.parsers.push(parser);
    }

    pub fn register_converter(&mut self, converter: Arc<dyn Converter>) {
        debug!(converter:% = converter; "Registering converter");
        self.converters.push(converter);
    }

    pub fn parsers(&self) -> &[Arc<dyn Parser>] {
        &self.parsers
    }

    pub fn converters(&self) -> &[Arc<dyn Converter>] {
        &self.converters
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Lists the candidate parsers for `desired` and `object`, best first.
    pub fn candidates(&self, desired: TypeTag, object: &PersistedObject) -> Vec<Arc<dyn Parser>> {
        let capable: Vec<&Arc<dyn Parser>> = self
            .parsers
            .iter()
            .filter(|parser| supports_object(parser.as_ref(), object))
            .collect();

        let exact = capable.iter().filter(|parser| {
            let types = parser.capabilities().types();
            !types.is_any() && types.contains(desired)
        });
        let generic = capable
            .iter()
            .filter(|parser| parser.capabilities().types().is_any());

        let mut candidates: Vec<Arc<dyn Parser>> =
            exact.chain(generic).map(|parser| Arc::clone(*parser)).collect();

        let mut chains = self.chains(&capable, desired);
        chains.sort_by_key(|chain| chain.size());
        candidates.extend(chains);

        trace!(candidates = candidates.len(), desired:% = desired; "Collected parser candidates");
        candidates
    }

    /// Builds chains from the capable parsers to `desired`.
    fn chains(&self, capable: &[&Arc<dyn Parser>], desired: TypeTag) -> Vec<Arc<dyn Parser>> {
        let mut chains = Vec::new();
        for base in capable {
            let caps = base.capabilities();
            let Some(types) = caps.types().as_set() else {
                continue;
            };
            if !caps.is_chainable() {
                continue;
            }

            for &source in types.iter().filter(|tag| **tag != desired) {
                for converter in self.conversions(source, desired) {
                    match ParsingChain::new(Arc::clone(*base), converter, self.strict, Some(source)) {
                        Ok(chain) => chains.push(Arc::new(chain) as Arc<dyn Parser>),
                        Err(err) => trace!(err:% = err; "Skipping parsing chain"),
                    }
                }
            }
        }
        chains
    }

    /// Converters, single or paired, going from `source` to `desired`.
    fn conversions(&self, source: TypeTag, desired: TypeTag) -> Vec<Arc<dyn Converter>> {
        let mut found: Vec<Arc<dyn Converter>> = Vec::new();

        for first in &self.converters {
            if !first.accepts(self.strict, Some(source), None) {
                continue;
            }
            if first.accepts(self.strict, Some(source), Some(desired)) {
                found.push(Arc::clone(first));
                continue;
            }
            let OutputType::Type(middle) = first.to_type() else {
                continue;
            };
            for second in &self.converters {
                if !second.accepts(self.strict, Some(middle), Some(desired)) {
                    continue;
                }
                let steps = vec![Arc::clone(first), Arc::clone(second)];
                if let Ok(chain) = ConversionChain::new(steps, self.strict) {
                    found.push(Arc::new(chain));
                }
            }
        }
        found
    }

    /// Returns a parser for `desired` and `object`.
    ///
    /// A single candidate is returned as is; several are wrapped in a
    /// [`CascadingParser`] in candidate order. Candidates the cascade rejects
    /// as incompatible are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoParserFound`] when there is no candidate.
    pub fn build_parser(&self, desired: TypeTag, object: &PersistedObject) -> Result<Arc<dyn Parser>> {
        let mut candidates = self.candidates(desired, object);
        if candidates.len() <= 1 {
            return candidates.pop().ok_or_else(|| Error::NoParserFound {
                object: object.to_string(),
                desired,
            });
        }

        let mut cascade = CascadingParser::new();
        for candidate in candidates {
            match cascade.add_candidate(candidate) {
                Ok(()) => {}
                Err(err @ Error::IncompatibleCandidate { .. }) => {
                    debug!(err:% = err; "Skipping incompatible candidate");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(Arc::new(cascade))
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::with_defaults(false)
    }
}

impl ParserFinder for ParserRegistry {
    fn find_parser(&self, desired: TypeTag, object: &PersistedObject) -> Result<Arc<dyn Parser>> {
        self.build_parser(desired, object)
    }
}

/// Returns `true` if `parser` handles the file mode and extension of `object`.
fn supports_object(parser: &dyn Parser, object: &PersistedObject) -> bool {
    let caps = parser.capabilities();
    if object.is_multifile() {
        caps.supports_multi_file()
    } else {
        caps.supports_single_file()
            && object
                .extension()
                .is_some_and(|ext| caps.supports_extension(ext))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use filecascade_core::value::ValueMap;

    use super::*;
    use crate::builtin::{CollectionParser, parse_integer};

    fn text_object() -> PersistedObject {
        PersistedObject::single_file("item", "item.txt")
    }

    #[test]
    fn test_exact_parser_is_returned_alone() {
        let registry = ParserRegistry::with_defaults(false);
        let parser = registry
            .build_parser(TypeTag::of::<String>(), &text_object())
            .unwrap();

        assert_eq!(parser.to_string(), "text");
    }

    #[test]
    fn test_chain_reaches_converted_type() {
        let registry = ParserRegistry::with_defaults(false);
        let parser = registry
            .build_parser(TypeTag::of::<i64>(), &text_object())
            .unwrap();

        assert_eq!(
            parser.to_string(),
            "text => <parse_integer: String -> i64>"
        );
        assert_eq!(parser.size(), 2);
    }

    #[test]
    fn test_several_candidates_make_a_cascade() {
        let mut registry = ParserRegistry::with_defaults(false);
        registry.register_parser(Arc::new(TextParser::new()));

        let parser = registry
            .build_parser(TypeTag::of::<String>(), &text_object())
            .unwrap();

        assert_eq!(parser.to_string(), "Cascade[Try 'text' then 'text']");
    }

    #[test]
    fn test_shorter_chains_come_first() {
        let mut registry = ParserRegistry::new(false);
        registry.register_parser(Arc::new(TextParser::new()));
        registry.register_converter(Arc::new(parse_integer()));
        registry.register_converter(Arc::new(filecascade_parser::converter::ConverterFn::new(
            "to_float",
            |n: i64| Ok::<_, String>(n as f64),
        )));
        registry.register_converter(Arc::new(crate::builtin::parse_float()));

        let candidates = registry.candidates(TypeTag::of::<f64>(), &text_object());
        let names: Vec<String> = candidates.iter().map(ToString::to_string).collect();

        assert_eq!(
            names,
            vec![
                "text => <parse_float: String -> f64>",
                "text => <parse_integer: String -> i64> -> <to_float: i64 -> f64>",
            ]
        );
    }

    #[test]
    fn test_no_candidate() {
        let registry = ParserRegistry::with_defaults(false);
        let err = registry
            .build_parser(TypeTag::of::<Vec<u8>>(), &text_object())
            .map(|parser| parser.to_string())
            .unwrap_err();

        assert!(matches!(err, Error::NoParserFound { .. }));
    }

    #[test]
    fn test_collection_is_not_chained() {
        let mut registry = ParserRegistry::new(false);
        registry.register_parser(Arc::new(CollectionParser::new(TypeTag::of::<String>())));
        let object = PersistedObject::multi_file("dir", BTreeMap::new());

        assert_eq!(registry.candidates(TypeTag::of::<ValueMap>(), &object).len(), 1);
        assert!(registry.candidates(TypeTag::of::<String>(), &object).is_empty());
    }
}
