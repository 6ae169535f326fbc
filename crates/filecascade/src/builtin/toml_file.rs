use std::{fmt, path::Path};

use filecascade_core::{
    capabilities::{Capabilities, SupportedTypes},
    type_tag::TypeTag,
    value::Value,
};
use filecascade_parser::{Error, ParseOptions, Parser, Result};

use super::read_text;

/// Reads `.toml` files as a [`toml::Table`].
pub struct TomlParser {
    capabilities: Capabilities,
}

impl TomlParser {
    pub fn new() -> Self {
        Self {
            capabilities: Capabilities::single_file(
                SupportedTypes::single(TypeTag::of::<toml::Table>()),
                ["toml"],
            ),
        }
    }
}

impl Default for TomlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TomlParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("toml")
    }
}

impl Parser for TomlParser {
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
        let content = read_text(path, encoding)?;
        let table: toml::Table = toml::from_str(&content).map_err(|err| Error::Format {
            path: path.to_path_buf(),
            message: err.to_string().trim_end().to_string(),
        })?;
        Ok(Value::new(table))
    }
}
