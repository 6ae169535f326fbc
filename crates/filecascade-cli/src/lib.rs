//! CLI logic for the FileCascade tool.
//!
//! This module contains the core CLI logic: it loads the configuration,
//! parses the requested item and renders the resulting value.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, ItemKind, ValueKind};

use std::fmt::Debug;

use log::info;

use filecascade::{
    FileCascadeError, FileParser,
    value::{ValueList, ValueMap},
};

/// Run the FileCascade CLI application
///
/// This function parses the item at `args.input` as the requested type and
/// returns its rendering. Text is returned as is, other values use their
/// pretty-printed debug representation.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `FileCascadeError` for:
/// - Configuration loading errors
/// - Discovery errors
/// - Parser selection and parsing errors
pub fn run(args: &Args) -> Result<String, FileCascadeError> {
    info!(
        input_path = args.input,
        kind:? = args.kind;
        "Processing item"
    );

    // Load configuration
    let app_config = config::load_config(args.config.as_ref())?;
    let parser = FileParser::new(app_config);

    let rendered = match args.kind {
        ValueKind::String => parser.parse_item::<String>(&args.input)?,
        ValueKind::Int => render(parser.parse_item::<i64>(&args.input)?),
        ValueKind::Float => render(parser.parse_item::<f64>(&args.input)?),
        ValueKind::Bool => render(parser.parse_item::<bool>(&args.input)?),
        ValueKind::Toml => render(parser.parse_item::<toml::Table>(&args.input)?),
        ValueKind::Dict => render(parse_collection(&parser, args)?),
        ValueKind::List => render(parse_list(&parser, args)?),
    };

    info!(input_path = args.input; "Item parsed successfully");

    Ok(rendered)
}

fn parse_collection(parser: &FileParser, args: &Args) -> Result<ValueMap, FileCascadeError> {
    match args.item_type {
        ItemKind::String => parser.parse_collection::<String>(&args.input),
        ItemKind::Int => parser.parse_collection::<i64>(&args.input),
        ItemKind::Float => parser.parse_collection::<f64>(&args.input),
        ItemKind::Bool => parser.parse_collection::<bool>(&args.input),
        ItemKind::Toml => parser.parse_collection::<toml::Table>(&args.input),
    }
}

fn parse_list(parser: &FileParser, args: &Args) -> Result<ValueList, FileCascadeError> {
    match args.item_type {
        ItemKind::String => parser.parse_list::<String>(&args.input),
        ItemKind::Int => parser.parse_list::<i64>(&args.input),
        ItemKind::Float => parser.parse_list::<f64>(&args.input),
        ItemKind::Bool => parser.parse_list::<bool>(&args.input),
        ItemKind::Toml => parser.parse_list::<toml::Table>(&args.input),
    }
}

fn render<T: Debug>(value: T) -> String {
    format!("{value:#?}")
}
