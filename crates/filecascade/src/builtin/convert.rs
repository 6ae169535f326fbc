use std::sync::Arc;

use filecascade_parser::converter::{Converter, ConverterFn};

/// `String` to `i64`, ignoring surrounding whitespace.
pub fn parse_integer() -> ConverterFn {
    ConverterFn::new("parse_integer", |text: String| text.trim().parse::<i64>())
}

/// `String` to `f64`, ignoring surrounding whitespace.
pub fn parse_float() -> ConverterFn {
    ConverterFn::new("parse_float", |text: String| text.trim().parse::<f64>())
}

/// `String` to `bool`.
///
/// Accepts `true`/`false`, `yes`/`no`, `on`/`off` and `1`/`0`, in any case.
pub fn parse_bool() -> ConverterFn {
    ConverterFn::new("parse_bool", |text: String| {
        match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            other => Err(format!("'{other}' is not a boolean")),
        }
    })
}

/// Converters registered by default.
pub fn default_converters() -> Vec<Arc<dyn Converter>> {
    vec![
        Arc::new(parse_integer()),
        Arc::new(parse_float()),
        Arc::new(parse_bool()),
    ]
}

#[cfg(test)]
mod tests {
    use filecascade_core::{type_tag::TypeTag, value::Value};
    use filecascade_parser::ParseOptions;

    use super::*;

    fn convert<T: 'static>(converter: &ConverterFn, text: &str) -> Option<T> {
        converter
            .convert(
                TypeTag::of::<T>(),
                Value::new(text.to_string()),
                &ParseOptions::default(),
            )
            .ok()
            .and_then(|value| value.downcast::<T>().ok())
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(convert::<i64>(&parse_integer(), " 12\n"), Some(12));
        assert_eq!(convert::<i64>(&parse_integer(), "1.5"), None);
    }

    #[test]
    fn test_parse_float() {
        assert_eq!(convert::<f64>(&parse_float(), "1.5"), Some(1.5));
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(convert::<bool>(&parse_bool(), "Yes"), Some(true));
        assert_eq!(convert::<bool>(&parse_bool(), "0"), Some(false));
        assert_eq!(convert::<bool>(&parse_bool(), "maybe"), None);
    }
}
