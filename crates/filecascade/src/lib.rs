//! FileCascade - Parse files and directory trees into typed values.
//!
//! Given a location on disk and a desired type, FileCascade discovers the
//! object stored there, selects every parser (or parser + converter chain)
//! able to produce the type, and tries them in order until one succeeds.

pub mod builtin;
pub mod config;
pub mod registry;

mod error;

pub use filecascade_core::{capabilities, fs, type_tag, value};
pub use filecascade_parser as engine;

pub use error::FileCascadeError;

use std::{any::Any, path::Path, sync::Arc};

use log::{debug, info, trace};

use filecascade_core::{
    fs::{FileMapping, PersistedObject},
    type_tag::TypeTag,
    value::{Value, ValueList, ValueMap},
};
use filecascade_parser::{Parser, ParsingPlan, PlanContext};

use builtin::CollectionParser;
use config::AppConfig;
use registry::ParserRegistry;

/// Entry point for parsing items from the filesystem.
///
/// # Examples
///
/// ```rust,no_run
/// use filecascade::{FileParser, config::AppConfig};
///
/// let parser = FileParser::new(AppConfig::default());
///
/// // Reads `settings/port.txt` and converts its content.
/// let port: i64 = parser.parse_item("settings/port")
///     .expect("Failed to parse");
///
/// // Or use default config
/// let parser = FileParser::default();
/// ```
pub struct FileParser {
    config: AppConfig,
    registry: ParserRegistry,
    mapping: FileMapping,
}

impl FileParser {
    /// Create a new file parser with the stock parsers and converters.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration
    pub fn new(config: AppConfig) -> Self {
        let registry = ParserRegistry::with_defaults(config.parsing().strict_matching());
        let mapping = FileMapping::new().with_encoding(config.parsing().encoding());
        Self {
            config,
            registry,
            mapping,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn registry(&self) -> &ParserRegistry {
        &self.registry
    }

    /// Gives access to the registry, to add parsers and converters.
    pub fn registry_mut(&mut self) -> &mut ParserRegistry {
        &mut self.registry
    }

    /// Resolve `location` to an object on disk.
    ///
    /// # Errors
    ///
    /// Returns `FileCascadeError` when the location matches nothing, matches
    /// several objects, or cannot be read.
    pub fn discover(&self, location: impl AsRef<Path>) -> Result<PersistedObject, FileCascadeError> {
        let object = self.mapping.discover(location)?;
        debug!(object:% = object; "Object discovered");
        Ok(object)
    }

    /// Parse the item at `location` as a `T`.
    ///
    /// # Arguments
    ///
    /// * `location` - Path of the item, with or without its extension
    ///
    /// # Errors
    ///
    /// Returns `FileCascadeError` for discovery errors, when no parser can
    /// produce a `T`, or when every candidate parser failed.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use filecascade::FileParser;
    ///
    /// let text: String = FileParser::default()
    ///     .parse_item("notes/today")
    ///     .expect("Failed to parse notes");
    /// ```
    pub fn parse_item<T: Any>(&self, location: impl AsRef<Path>) -> Result<T, FileCascadeError> {
        let object = self.discover(location)?;
        let value = self.parse_object(TypeTag::of::<T>(), &object)?;
        downcast(value)
    }

    /// Parse an already discovered object as `desired`.
    ///
    /// # Errors
    ///
    /// Returns `FileCascadeError` when no parser can produce `desired` or
    /// when parsing fails.
    pub fn parse_object(
        &self,
        desired: TypeTag,
        object: &PersistedObject,
    ) -> Result<Value, FileCascadeError> {
        let parser = self.registry.build_parser(desired, object)?;
        self.run(parser, desired, object)
    }

    /// Parse the directory at `location` into a map of `T` items.
    ///
    /// Each entry of the directory is parsed as a `T` on its own, with every
    /// registered parser able to produce it.
    ///
    /// # Errors
    ///
    /// Returns `FileCascadeError` when `location` is not a directory, or when
    /// an item cannot be parsed.
    pub fn parse_collection<T: Any>(
        &self,
        location: impl AsRef<Path>,
    ) -> Result<ValueMap, FileCascadeError> {
        let object = self.discover(location)?;
        let parser = Arc::new(CollectionParser::new(TypeTag::of::<T>()));
        let value = self.run(parser, TypeTag::of::<ValueMap>(), &object)?;
        downcast(value)
    }

    /// Parse the directory at `location` into a list of `T` items, sorted by
    /// item name.
    ///
    /// # Errors
    ///
    /// Returns `FileCascadeError` when `location` is not a directory, or when
    /// an item cannot be parsed.
    pub fn parse_list<T: Any>(&self, location: impl AsRef<Path>) -> Result<ValueList, FileCascadeError> {
        let object = self.discover(location)?;
        let parser = Arc::new(CollectionParser::new(TypeTag::of::<T>()));
        let value = self.run(parser, TypeTag::of::<ValueList>(), &object)?;
        downcast(value)
    }

    fn run(
        &self,
        parser: Arc<dyn Parser>,
        desired: TypeTag,
        object: &PersistedObject,
    ) -> Result<Value, FileCascadeError> {
        info!(object:% = object, desired:% = desired, parser:% = parser; "Building a parsing plan");
        let mut plan = parser.build_plan(desired, object, PlanContext::with_finder(&self.registry))?;

        info!(plan:% = plan; "Executing parsing plan");
        let value = plan.execute(&self.config.parsing().parse_options())?;

        info!(object:% = object; "Parsed successfully");
        trace!(value:?; "Parsed value");
        Ok(value)
    }
}

impl Default for FileParser {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

fn downcast<T: Any>(value: Value) -> Result<T, FileCascadeError> {
    value
        .downcast::<T>()
        .map_err(|value| FileCascadeError::UnexpectedType {
            expected: TypeTag::of::<T>(),
            found: value.type_tag(),
        })
}
