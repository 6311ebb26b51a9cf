//! Rendering of model values into document text.

use cruet::Inflector;
use serde_json::{Number, Value};
use thiserror::Error;

use crate::extractor::type_name;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Format '{format}' cannot be applied to a {found} value.")]
    UnsupportedFormat { format: String, found: &'static str },

    #[error("Value could not be serialized: {0}")]
    Serialization(String),
}

/// Turns a value and an optional format string into text.
///
/// One formatter is shared by every execution that uses its configuration,
/// possibly from several threads at once.
pub trait ValueFormatter: Send + Sync {
    /// # Errors
    /// * `FormatError` when `format` does not apply to `value`
    fn format_value(&self, value: &Value, format: Option<&str>) -> Result<String, FormatError>;
}

/// Formatter used unless the caller configures another one.
///
/// | value    | no format          | formats                                         |
/// |----------|--------------------|-------------------------------------------------|
/// | null     | empty              | any, still empty                                |
/// | string   | verbatim           | `upper` `lower` `snake` `camel` `pascal` `kebab` `title` `screaming` |
/// | boolean  | `true` / `false`   | `Yes\|No` picks the left or right side           |
/// | number   | shortest display   | `F2` fixed decimals, `D4` zero-padded, `X`/`x` hex |
/// | array/object | compact JSON   | none                                            |
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultValueFormatter;

impl DefaultValueFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl ValueFormatter for DefaultValueFormatter {
    fn format_value(&self, value: &Value, format: Option<&str>) -> Result<String, FormatError> {
        let format = format.map(str::trim).filter(|format| !format.is_empty());
        let Some(format) = format else {
            return match value {
                Value::Null => Ok(String::new()),
                Value::String(text) => Ok(text.clone()),
                Value::Bool(flag) => Ok(flag.to_string()),
                Value::Number(number) => Ok(number.to_string()),
                Value::Array(_) | Value::Object(_) => serde_json::to_string(value)
                    .map_err(|e| FormatError::Serialization(e.to_string())),
            };
        };

        let formatted = match value {
            Value::Null => Some(String::new()),
            Value::String(text) => format_text(text, format),
            Value::Bool(flag) => format
                .split_once('|')
                .map(|(yes, no)| (if *flag { yes } else { no }).to_string()),
            Value::Number(number) => format_number(number, format),
            Value::Array(_) | Value::Object(_) => None,
        };
        formatted.ok_or_else(|| FormatError::UnsupportedFormat {
            format: format.to_string(),
            found: type_name(value),
        })
    }
}

fn format_text(text: &str, format: &str) -> Option<String> {
    let converted = match format {
        "upper" => text.to_uppercase(),
        "lower" => text.to_lowercase(),
        "snake" => text.to_snake_case(),
        "camel" => text.to_camel_case(),
        "pascal" => text.to_pascal_case(),
        "kebab" => text.to_kebab_case(),
        "title" => text.to_title_case(),
        "screaming" => text.to_screaming_snake_case(),
        _ => return None,
    };
    Some(converted)
}

fn format_number(number: &Number, format: &str) -> Option<String> {
    let mut chars = format.chars();
    let specifier = chars.next()?;
    let width = match chars.as_str() {
        "" => None,
        digits => Some(digits.parse::<usize>().ok()?),
    };

    if let 'F' | 'f' = specifier {
        let decimals = width.unwrap_or(2);
        return number
            .as_f64()
            .map(|n| format!("{:.decimals$}", round_half_away(n, decimals)));
    }
    let width = width.unwrap_or(0);
    match specifier {
        'D' | 'd' => {
            let n = number.as_i64()?;
            let digits = format!("{:0width$}", n.unsigned_abs());
            Some(if n < 0 { format!("-{digits}") } else { digits })
        }
        'X' => number.as_u64().map(|n| format!("{n:0width$X}")),
        'x' => number.as_u64().map(|n| format!("{n:0width$x}")),
        _ => None,
    }
}

/// Midpoints round away from zero (`2.25` → `2.3`), not to even.
fn round_half_away(n: f64, decimals: usize) -> f64 {
    let Ok(exponent) = i32::try_from(decimals) else {
        return n;
    };
    let factor = 10f64.powi(exponent);
    let scaled = n * factor;
    if scaled.is_finite() {
        scaled.round() / factor
    } else {
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_format_parsing() {
        let number = Number::from(255);
        assert_eq!(format_number(&number, "X").as_deref(), Some("FF"));
        assert_eq!(format_number(&number, "x4").as_deref(), Some("00ff"));
        assert_eq!(format_number(&number, "D5").as_deref(), Some("00255"));
        assert_eq!(format_number(&number, "Dx"), None);
        assert_eq!(format_number(&number, "Q"), None);
        assert_eq!(
            format_number(&Number::from_f64(2.5).unwrap(), "F").as_deref(),
            Some("2.50")
        );
    }

    #[test]
    fn test_negative_zero_padding_keeps_sign() {
        let number = Number::from(-7);
        assert_eq!(format_number(&number, "D3").as_deref(), Some("-007"));
    }

    #[test]
    fn test_fixed_point_midpoints_round_away_from_zero() {
        assert_eq!(round_half_away(2.25, 1), 2.3);
        assert_eq!(round_half_away(-2.25, 1), -2.3);
        assert_eq!(round_half_away(0.125, 2), 0.13);
        assert_eq!(round_half_away(1.5, 0), 2.0);
    }
}
