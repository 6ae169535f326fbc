//! Command-line argument definitions for the FileCascade CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the item to parse, the type to parse it
//! as, configuration file selection, and logging verbosity.

use clap::{Parser, ValueEnum};

/// Command-line arguments for the FileCascade tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Location of the item to parse, with or without its extension
    #[arg(help = "Location of the item to parse")]
    pub input: String,

    /// Type to parse the item as
    #[arg(short = 't', long = "type", value_enum, default_value_t = ValueKind::String)]
    pub kind: ValueKind,

    /// Type of each item when parsing a directory as a `dict` or a `list`
    #[arg(long, value_enum, default_value_t = ItemKind::String)]
    pub item_type: ItemKind,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Types an item can be parsed as.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Int,
    Float,
    Bool,
    Toml,
    /// A directory parsed into a map of items
    Dict,
    /// A directory parsed into a list of items, sorted by name
    List,
}

/// Types the items of a `dict` can be parsed as.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    String,
    Int,
    Float,
    Bool,
    Toml,
}
