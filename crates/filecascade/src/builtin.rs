//! Stock parsers and converters.
//!
//! - [`TextParser`]: `.txt` files as [`String`].
//! - [`TomlParser`]: `.toml` files as [`toml::Table`].
//! - [`CollectionParser`]: directories as a [`ValueMap`] of parsed items.
//! - [`parse_integer`], [`parse_float`], [`parse_bool`]: converters from
//!   [`String`].
//!
//! [`ValueMap`]: filecascade_core::value::ValueMap

mod collection;
mod convert;
mod text;
mod toml_file;

use std::{fs, path::Path};

use filecascade_parser::{Error, Result};

pub use collection::CollectionParser;
pub use convert::{default_converters, parse_bool, parse_float, parse_integer};
pub use text::TextParser;
pub use toml_file::TomlParser;

/// Whether the stock parsers can decode files written in `encoding`.
///
/// Only UTF-8 is supported, spelled in any case with or without separators.
pub fn is_supported_encoding(encoding: &str) -> bool {
    encoding.trim().to_ascii_lowercase().replace(['-', '_'], "") == "utf8"
}

/// Reads a whole text file.
///
/// Only UTF-8 is decoded; any other encoding is reported as unsupported.
fn read_text(path: &Path, encoding: &str) -> Result<String> {
    if !is_supported_encoding(encoding) {
        return Err(Error::unsupported(format!("reading files encoded as '{encoding}'")));
    }

    fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}
