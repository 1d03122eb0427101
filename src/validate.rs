//! Per-value-type acceptance and normalization rules.
//!
//! Validators are pure functions from a decoded raw value to a normalized
//! value or a [`Reject`]. They never panic and never return a Rust error:
//! rejection is data, turned into an invalid token by the tokenizer and
//! surfaced through explain output.

use std::fmt::Write as _;

use chrono::{Datelike, NaiveDate};

use crate::constants::DEFAULT_DATE_PATTERN;
use crate::error::SchemaError;
use crate::token::Reject;

/// Which character plays the decimal point in decimal facet values.
///
/// The other of the two is treated as a grouping separator and stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecimalSeparator {
    /// `.` is the decimal point, `,` groups (e.g. `1,234.5`)
    #[default]
    Point,
    /// `,` is the decimal point, `.` groups (e.g. `1.234,5`)
    Comma,
}

/// Locale configuration for the tokenizer and its validators.
///
/// This is explicit per-collection state handed to
/// [`Tokenizer::new`](crate::Tokenizer::new); there are no process-wide
/// validator instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseConfig {
    decimal_separator: DecimalSeparator,
    date_pattern: String,
}

impl ParseConfig {
    /// Creates a config with the given decimal convention and date pattern
    /// (`chrono` format syntax).
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::InvalidDatePattern` if the pattern cannot
    /// format and re-parse a date; a pattern that fails here would otherwise
    /// turn every date value into a rejection at request time.
    pub fn new(
        decimal_separator: DecimalSeparator,
        date_pattern: &str,
    ) -> Result<Self, SchemaError> {
        let probe = NaiveDate::default();
        let mut rendered = String::new();
        if write!(rendered, "{}", probe.format(date_pattern)).is_err()
            || NaiveDate::parse_from_str(&rendered, date_pattern).is_err()
        {
            return Err(SchemaError::InvalidDatePattern {
                pattern: date_pattern.to_string(),
            });
        }
        Ok(Self {
            decimal_separator,
            date_pattern: date_pattern.to_string(),
        })
    }

    /// Returns the decimal convention.
    #[must_use]
    pub const fn decimal_separator(&self) -> DecimalSeparator {
        self.decimal_separator
    }

    /// Returns the date pattern.
    #[must_use]
    pub fn date_pattern(&self) -> &str {
        &self.date_pattern
    }
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            decimal_separator: DecimalSeparator::Point,
            date_pattern: DEFAULT_DATE_PATTERN.to_string(),
        }
    }
}

/// A normalized value paired with the ordinal used for range comparison.
///
/// For decimals the ordinal is the parsed value; for dates it is the day
/// number from the common era. Equality compares the canonical text only —
/// the ordinal is a function of it.
#[derive(Debug, Clone)]
pub struct OrdinalValue {
    text: String,
    ordinal: f64,
}

impl OrdinalValue {
    pub(crate) const fn new(text: String, ordinal: f64) -> Self {
        Self { text, ordinal }
    }

    /// Returns the canonical text form.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the comparison ordinal.
    #[must_use]
    pub const fn ordinal(&self) -> f64 {
        self.ordinal
    }
}

impl PartialEq for OrdinalValue {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

/// Validates a number value (page number, page size).
///
/// Strips every non-digit character and parses the remainder.
///
/// # Errors
///
/// Rejects when no digits remain or the value overflows `u64`.
pub fn validate_number(raw: &str) -> Result<u64, Reject> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(Reject::NotNumeric {
            raw: raw.to_string(),
        });
    }
    digits.parse().map_err(|_| Reject::NotNumeric {
        raw: raw.to_string(),
    })
}

/// Validates a decimal value under the configured separator convention.
///
/// Strips every character outside `[0-9.,]`, removes the grouping
/// separator, then parses with `.` as the decimal point. The canonical text
/// is re-rendered from the parsed value using the configured separator.
///
/// # Errors
///
/// Rejects when nothing parseable remains.
pub fn validate_decimal(raw: &str, config: &ParseConfig) -> Result<OrdinalValue, Reject> {
    let kept: String = raw.chars().filter(|c| matches!(c, '0'..='9' | '.' | ',')).collect();
    let normalized = match config.decimal_separator() {
        DecimalSeparator::Point => kept.replace(',', ""),
        DecimalSeparator::Comma => kept.replace('.', "").replace(',', "."),
    };
    let value: f64 = normalized.parse().map_err(|_| Reject::NotDecimal {
        raw: raw.to_string(),
    })?;
    if !value.is_finite() {
        return Err(Reject::NotDecimal {
            raw: raw.to_string(),
        });
    }
    let mut text = format!("{value}");
    if config.decimal_separator() == DecimalSeparator::Comma {
        text = text.replace('.', ",");
    }
    Ok(OrdinalValue::new(text, value))
}

/// Validates a date value against the configured pattern.
///
/// The canonical text is the date re-formatted with the same pattern; the
/// ordinal is the day number from the common era.
///
/// # Errors
///
/// Rejects when the value does not match the pattern.
pub fn validate_date(raw: &str, config: &ParseConfig) -> Result<OrdinalValue, Reject> {
    let trimmed = raw.trim();
    let date = NaiveDate::parse_from_str(trimmed, config.date_pattern()).map_err(|_| {
        Reject::DateMismatch {
            raw: raw.to_string(),
            pattern: config.date_pattern().to_string(),
        }
    })?;
    let text = date.format(config.date_pattern()).to_string();
    let ordinal = f64::from(date.num_days_from_ce());
    Ok(OrdinalValue::new(text, ordinal))
}

/// Validates a free-text value: collapses whitespace runs to single spaces
/// and trims the ends.
///
/// # Errors
///
/// Rejects when nothing remains after normalization.
pub fn validate_text(raw: &str) -> Result<String, Reject> {
    let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return Err(Reject::EmptyValue);
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_strips_noise() {
        assert_eq!(validate_number("p42x").unwrap(), 42);
        assert_eq!(validate_number("007").unwrap(), 7);
    }

    #[test]
    fn number_rejects_empty_remainder() {
        assert!(matches!(
            validate_number("abc"),
            Err(Reject::NotNumeric { .. })
        ));
    }

    #[test]
    fn number_rejects_overflow() {
        let huge = "9".repeat(40);
        assert!(matches!(
            validate_number(&huge),
            Err(Reject::NotNumeric { .. })
        ));
    }

    #[test]
    fn decimal_point_convention() {
        let config = ParseConfig::default();
        let v = validate_decimal("1,234.5", &config).unwrap();
        assert_eq!(v.text(), "1234.5");
        assert!((v.ordinal() - 1234.5).abs() < f64::EPSILON);
    }

    #[test]
    fn decimal_comma_convention() {
        let config = ParseConfig::new(DecimalSeparator::Comma, "%Y-%m-%d").unwrap();
        let v = validate_decimal("1.234,5", &config).unwrap();
        assert_eq!(v.text(), "1234,5");
        assert!((v.ordinal() - 1234.5).abs() < f64::EPSILON);
    }

    #[test]
    fn decimal_integer_has_no_point_in_text() {
        let config = ParseConfig::default();
        assert_eq!(validate_decimal("39", &config).unwrap().text(), "39");
        assert_eq!(validate_decimal("39.0", &config).unwrap().text(), "39");
    }

    #[test]
    fn decimal_rejects_garbage() {
        let config = ParseConfig::default();
        assert!(matches!(
            validate_decimal("abc", &config),
            Err(Reject::NotDecimal { .. })
        ));
        assert!(matches!(
            validate_decimal("1.2.3", &config),
            Err(Reject::NotDecimal { .. })
        ));
    }

    #[test]
    fn decimal_text_reparses_to_same_value() {
        let config = ParseConfig::default();
        for raw in ["17", "17.5", "0.125", "1000000"] {
            let v = validate_decimal(raw, &config).unwrap();
            let again = validate_decimal(v.text(), &config).unwrap();
            assert_eq!(v, again);
        }
    }

    #[test]
    fn date_roundtrip() {
        let config = ParseConfig::default();
        let v = validate_date("2024-03-09", &config).unwrap();
        assert_eq!(v.text(), "2024-03-09");
        let again = validate_date(v.text(), &config).unwrap();
        assert_eq!(v, again);
    }

    #[test]
    fn date_ordinal_orders_chronologically() {
        let config = ParseConfig::default();
        let early = validate_date("2020-01-01", &config).unwrap();
        let late = validate_date("2024-06-15", &config).unwrap();
        assert!(early.ordinal() < late.ordinal());
    }

    #[test]
    fn date_rejects_mismatch() {
        let config = ParseConfig::default();
        assert!(matches!(
            validate_date("09/03/2024", &config),
            Err(Reject::DateMismatch { .. })
        ));
        assert!(matches!(
            validate_date("2024-13-40", &config),
            Err(Reject::DateMismatch { .. })
        ));
    }

    #[test]
    fn custom_date_pattern() {
        let config = ParseConfig::new(DecimalSeparator::Point, "%d.%m.%Y").unwrap();
        let v = validate_date("09.03.2024", &config).unwrap();
        assert_eq!(v.text(), "09.03.2024");
    }

    #[test]
    fn bad_date_pattern_is_schema_fatal() {
        let result = ParseConfig::new(DecimalSeparator::Point, "%Q");
        assert!(matches!(
            result,
            Err(SchemaError::InvalidDatePattern { .. })
        ));
    }

    #[test]
    fn text_collapses_whitespace() {
        assert_eq!(validate_text("  navy   blue\tshoes ").unwrap(), "navy blue shoes");
    }

    #[test]
    fn text_rejects_blank() {
        assert!(matches!(validate_text("   "), Err(Reject::EmptyValue)));
    }
}
