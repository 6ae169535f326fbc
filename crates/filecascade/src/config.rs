//! Configuration types for FileCascade parsing.
//!
//! All types implement [`serde::Deserialize`] for loading from external
//! sources such as TOML files.
//!
//! # Example
//!
//! ```
//! # use filecascade::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.parsing().encoding(), "utf-8");
//! assert!(!config.parsing().strict_matching());
//! ```

use serde::Deserialize;

use filecascade_core::fs::DEFAULT_ENCODING;
use filecascade_parser::ParseOptions;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Parsing configuration section.
    #[serde(default)]
    parsing: ParsingConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified parsing configuration.
    ///
    /// # Arguments
    ///
    /// * `parsing` - Parser selection and execution settings.
    pub fn new(parsing: ParsingConfig) -> Self {
        Self { parsing }
    }

    /// Returns the parsing configuration.
    pub fn parsing(&self) -> &ParsingConfig {
        &self.parsing
    }
}

/// Parser selection and execution settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ParsingConfig {
    /// Passed to converter acceptance predicates when building chains.
    #[serde(default)]
    strict_matching: bool,

    /// Text encoding of the files to parse.
    #[serde(default = "default_encoding")]
    encoding: String,

    /// Parse collection items in the background. Not supported.
    #[serde(default)]
    background_children: bool,
}

fn default_encoding() -> String {
    DEFAULT_ENCODING.to_string()
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            strict_matching: false,
            encoding: default_encoding(),
            background_children: false,
        }
    }
}

impl ParsingConfig {
    /// Creates a new [`ParsingConfig`].
    ///
    /// # Arguments
    ///
    /// * `strict_matching` - Strict mode handed to converters.
    /// * `encoding` - Text encoding of parsed files.
    /// * `background_children` - Request background parsing of collection items.
    pub fn new(strict_matching: bool, encoding: impl Into<String>, background_children: bool) -> Self {
        Self {
            strict_matching,
            encoding: encoding.into(),
            background_children,
        }
    }

    pub fn strict_matching(&self) -> bool {
        self.strict_matching
    }

    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    pub fn background_children(&self) -> bool {
        self.background_children
    }

    /// Returns the execution options derived from this configuration.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            background_children: self.background_children,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_section_uses_defaults() {
        let config: AppConfig = toml::from_str("[parsing]\nstrict_matching = true\n").unwrap();

        assert!(config.parsing().strict_matching());
        assert_eq!(config.parsing().encoding(), "utf-8");
        assert!(!config.parsing().background_children());
    }

    #[test]
    fn test_empty_document_is_default() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.parsing().encoding(), DEFAULT_ENCODING);
    }

    #[test]
    fn test_parse_options() {
        let config = ParsingConfig::new(false, "utf-8", true);
        assert!(config.parse_options().background_children);
    }
}
