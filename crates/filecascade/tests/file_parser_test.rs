use std::{fmt, fs, path::Path, sync::Arc};

use tempfile::TempDir;

use filecascade::{
    FileCascadeError, FileParser,
    capabilities::{Capabilities, SupportedTypes},
    config::{AppConfig, ParsingConfig},
    engine::{Error, ParseOptions, Parser, Result},
    type_tag::TypeTag,
    value::{Value, ValueList, ValueMap},
};

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

/// A `.txt` parser that always fails to read.
struct BrokenTextParser;

impl fmt::Display for BrokenTextParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("broken")
    }
}

impl Parser for BrokenTextParser {
    fn capabilities(&self) -> &Capabilities {
        static CAPS: std::sync::OnceLock<Capabilities> = std::sync::OnceLock::new();
        CAPS.get_or_init(|| {
            Capabilities::single_file(SupportedTypes::single(TypeTag::of::<String>()), ["txt"])
        })
    }

    fn parse_single_file(
        &self,
        _desired: TypeTag,
        path: &Path,
        _encoding: &str,
        _options: &ParseOptions,
    ) -> Result<Value> {
        Err(Error::Format {
            path: path.to_path_buf(),
            message: "unreadable on purpose".to_string(),
        })
    }
}

#[test]
fn parses_text_item() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "greeting.txt", "hello world\n");

    let text: String = FileParser::default()
        .parse_item(dir.path().join("greeting"))
        .unwrap();

    assert_eq!(text, "hello world\n");
}

#[test]
fn parses_through_conversion_chain() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "port.txt", " 8080\n");
    write(dir.path(), "ratio.txt", "0.25");
    write(dir.path(), "enabled.txt", "yes");

    let parser = FileParser::default();

    assert_eq!(parser.parse_item::<i64>(dir.path().join("port")).unwrap(), 8080);
    assert_eq!(parser.parse_item::<f64>(dir.path().join("ratio")).unwrap(), 0.25);
    assert!(parser.parse_item::<bool>(dir.path().join("enabled")).unwrap());
}

#[test]
fn parses_toml_item() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "server.toml", "host = \"localhost\"\nport = 80\n");

    let table: toml::Table = FileParser::default()
        .parse_item(dir.path().join("server"))
        .unwrap();

    assert_eq!(table["host"].as_str(), Some("localhost"));
    assert_eq!(table["port"].as_integer(), Some(80));
}

#[test]
fn invalid_toml_reports_format_error() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "broken.toml", "host = ");

    let err = FileParser::default()
        .parse_item::<toml::Table>(dir.path().join("broken"))
        .unwrap_err();

    match err {
        FileCascadeError::Parse(Error::Parsing { source, .. }) => {
            assert!(matches!(*source, Error::Format { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn cascade_falls_back_to_next_parser() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "note.txt", "fallback works");

    let mut parser = FileParser::new(AppConfig::default());
    let mut registry = filecascade::registry::ParserRegistry::new(false);
    registry.register_parser(Arc::new(BrokenTextParser));
    for existing in parser.registry().parsers() {
        registry.register_parser(Arc::clone(existing));
    }
    *parser.registry_mut() = registry;

    let text: String = parser.parse_item(dir.path().join("note")).unwrap();
    assert_eq!(text, "fallback works");
}

#[test]
fn exhausted_cascade_lists_every_candidate() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "note.txt", "never read");

    let mut parser = FileParser::new(AppConfig::default());
    *parser.registry_mut() = filecascade::registry::ParserRegistry::new(false);
    parser.registry_mut().register_parser(Arc::new(BrokenTextParser));
    parser.registry_mut().register_parser(Arc::new(BrokenTextParser));

    let err = parser
        .parse_item::<String>(dir.path().join("note"))
        .unwrap_err();

    let cascade = match err {
        FileCascadeError::Parse(Error::Cascade(cascade)) => cascade,
        other => panic!("expected a cascade error, got {other}"),
    };
    assert_eq!(cascade.failures().len(), 2);
    assert!(cascade.to_string().contains("unreadable on purpose"));
}

#[test]
fn parses_collection_of_items() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("limits");
    fs::create_dir(&root).unwrap();
    write(&root, "min.txt", "1");
    write(&root, "max.txt", "10");

    let items: ValueMap = FileParser::default().parse_collection::<i64>(&root).unwrap();

    let parsed: Vec<(String, i64)> = items
        .into_iter()
        .map(|(name, value)| (name, value.downcast::<i64>().unwrap()))
        .collect();
    assert_eq!(parsed, vec![("max".to_string(), 10), ("min".to_string(), 1)]);
}

#[test]
fn parses_list_of_items_in_name_order() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("words");
    fs::create_dir(&root).unwrap();
    write(&root, "2_second.txt", "beta");
    write(&root, "1_first.txt", "alpha");
    write(&root, "3_third.txt", "gamma");

    let items: ValueList = FileParser::default().parse_list::<String>(&root).unwrap();

    let words: Vec<String> = items
        .into_iter()
        .map(|value| value.downcast::<String>().unwrap())
        .collect();
    assert_eq!(words, vec!["alpha", "beta", "gamma"]);
}

#[test]
fn background_children_is_unsupported() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("items");
    fs::create_dir(&root).unwrap();
    write(&root, "a.txt", "1");

    let config = AppConfig::new(ParsingConfig::new(false, "utf-8", true));
    let err = FileParser::new(config)
        .parse_collection::<i64>(&root)
        .unwrap_err();

    match err {
        FileCascadeError::Parse(Error::Parsing { source, .. }) => {
            assert!(matches!(*source, Error::Unsupported { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_item_is_reported() {
    let dir = TempDir::new().unwrap();
    let err = FileParser::default()
        .parse_item::<String>(dir.path().join("absent"))
        .unwrap_err();

    assert!(matches!(err, FileCascadeError::Parse(Error::FileMapping(_))));
}

#[test]
fn unknown_type_has_no_parser() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "data.txt", "x");

    let err = FileParser::default()
        .parse_item::<Vec<u8>>(dir.path().join("data"))
        .unwrap_err();

    assert!(matches!(err, FileCascadeError::Parse(Error::NoParserFound { .. })));
}
