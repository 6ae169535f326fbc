use std::{fmt, path::Path};

use filecascade_core::{
    capabilities::{Capabilities, SupportedTypes},
    type_tag::TypeTag,
    value::Value,
};
use filecascade_parser::{ParseOptions, Parser, Result};

use super::read_text;

/// Reads `.txt` files as a [`String`].
pub struct TextParser {
    capabilities: Capabilities,
}

impl TextParser {
    pub fn new() -> Self {
        Self {
            capabilities: Capabilities::single_file(
                SupportedTypes::single(TypeTag::of::<String>()),
                ["txt"],
            ),
        }
    }
}

impl Default for TextParser {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TextParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("text")
    }
}

impl Parser for TextParser {
    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    fn parse_single_file(
        &self,
        _desired: TypeTag,
        path: &Path,
        encoding: &str,
        _options: &ParseOptions,
    ) -> Result<Value> {
        read_text(path, encoding).map(Value::new)
    }
}
