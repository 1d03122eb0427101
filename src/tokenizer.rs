//! The tokenizer: from a raw state path to a sequence of typed tokens.
//!
//! A state path is `/<value-segment>*/<op-segment>/`. The final non-empty
//! segment is the op segment; it is walked left-to-right in steps of the
//! schema's code width, and each group consumes zero or more of the
//! preceding value segments in order. No input can make tokenizing fail:
//! the worst case is a sequence of invalid tokens, which resolves to the
//! default state.

use crate::constants::{MAX_FACET_VALUES, MAX_PATH_LENGTH, MAX_PATH_SEGMENTS, MAX_VALUE_LENGTH};
use crate::delimiter::decode_value;
use crate::schema::{CollectionSchema, FieldEntry, FieldKind};
use crate::token::{Bound, LpseToken, Reject, SortDirection};
use crate::validate::{ParseConfig, validate_date, validate_decimal, validate_number, validate_text};

/// Splits a state path into typed tokens against a collection schema.
///
/// # Examples
///
/// ```
/// use lpse::{CollectionSchema, ParseConfig, Tokenizer};
///
/// let schema = CollectionSchema::builder("products")
///     .string_facet("b", "brand")
///     .page_number("p")
///     .build()
///     .unwrap();
/// let tokenizer = Tokenizer::new(&schema, ParseConfig::default());
///
/// let tokens = tokenizer.tokenize("/Black/2/bp/");
/// assert_eq!(tokens.len(), 2);
/// assert!(tokens.iter().all(lpse::LpseToken::is_valid));
/// ```
#[derive(Debug, Clone)]
pub struct Tokenizer<'s> {
    schema: &'s CollectionSchema,
    config: ParseConfig,
}

impl<'s> Tokenizer<'s> {
    /// Creates a tokenizer for the given schema and locale configuration.
    #[must_use]
    pub const fn new(schema: &'s CollectionSchema, config: ParseConfig) -> Self {
        Self { schema, config }
    }

    /// Returns the locale configuration.
    #[must_use]
    pub const fn config(&self) -> &ParseConfig {
        &self.config
    }

    /// Tokenizes a state path.
    ///
    /// Emission follows input order. Groups that cannot be decoded become
    /// invalid tokens rather than errors; an empty or structureless path
    /// yields an empty sequence.
    #[must_use]
    pub fn tokenize(&self, path: &str) -> Vec<LpseToken> {
        let path = truncate_at_boundary(path, MAX_PATH_LENGTH);
        let segments: Vec<&str> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .take(MAX_PATH_SEGMENTS)
            .collect();
        let Some((&op_segment, values)) = segments.split_last() else {
            return Vec::new();
        };

        let op: Vec<char> = op_segment.chars().collect();
        let width = self.schema.code_width();
        let mut tokens = Vec::new();
        let mut i = 0;
        let mut vi = 0;

        while i < op.len() {
            if op.len() - i < width {
                let found: String = op[i..].iter().collect();
                tokens.push(LpseToken::Unknown {
                    code: None,
                    raw: found.clone(),
                    reject: Reject::TruncatedCode { found },
                });
                break;
            }
            let code: String = op[i..i + width].iter().collect();
            i += width;

            match self.schema.entry(&code) {
                None => {
                    // Resync on the common one-value group shape.
                    let raw = take_value(values, &mut vi).unwrap_or_default();
                    tokens.push(LpseToken::Unknown {
                        code: Some(code.clone()),
                        raw,
                        reject: Reject::UnknownCode { code },
                    });
                }
                Some(entry) => {
                    tokens.push(self.group(entry, &op, &mut i, values, &mut vi));
                }
            }
        }

        while vi < values.len() {
            let raw = decode_value(values[vi]);
            vi += 1;
            tokens.push(LpseToken::Unknown {
                code: None,
                raw: raw.clone(),
                reject: Reject::DanglingValue { raw },
            });
        }

        tokens
    }

    fn group(
        &self,
        entry: &FieldEntry,
        op: &[char],
        i: &mut usize,
        values: &[&str],
        vi: &mut usize,
    ) -> LpseToken {
        let code = entry.code().to_string();
        match entry.kind() {
            FieldKind::String => string_group(code, values, vi),
            FieldKind::Multivalue => multi_group(entry, values, vi),
            FieldKind::Boolean => {
                let value = !matches!(read_marker(op, i), Some('-'));
                LpseToken::Flag { code, value }
            }
            FieldKind::Range => match read_bound(op, i) {
                Some(side) => self.bound_group(code, side, FieldKind::Range, values, vi),
                None => {
                    let raw = take_value(values, vi).unwrap_or_default();
                    LpseToken::RangeBound {
                        code: code.clone(),
                        side: Bound::Lower,
                        raw,
                        value: None,
                        reject: Some(Reject::MissingBoundMarker { code }),
                    }
                }
            },
            FieldKind::Date => match read_bound(op, i) {
                Some(side) => self.bound_group(code, side, FieldKind::Date, values, vi),
                None => self.date_group(code, values, vi),
            },
            FieldKind::Sort => self.sort_group(code, op, i),
            FieldKind::PageNumber => {
                let (raw, value, reject) = number_group(&code, values, vi);
                LpseToken::Page {
                    code,
                    raw,
                    value,
                    reject,
                }
            }
            FieldKind::PageSize => {
                let (raw, value, reject) = number_group(&code, values, vi);
                LpseToken::PageSize {
                    code,
                    raw,
                    value,
                    reject,
                }
            }
            FieldKind::Query => {
                let (raw, value, reject) = text_group(&code, values, vi);
                LpseToken::Query {
                    code,
                    raw,
                    value,
                    reject,
                }
            }
        }
    }

    fn bound_group(
        &self,
        code: String,
        side: Bound,
        kind: FieldKind,
        values: &[&str],
        vi: &mut usize,
    ) -> LpseToken {
        let Some(raw) = take_value(values, vi) else {
            return LpseToken::RangeBound {
                code: code.clone(),
                side,
                raw: String::new(),
                value: None,
                reject: Some(Reject::MissingValue { code }),
            };
        };
        let validated = match kind {
            FieldKind::Date => validate_date(&raw, &self.config),
            _ => validate_decimal(&raw, &self.config),
        };
        match validated {
            Ok(value) => LpseToken::RangeBound {
                code,
                side,
                raw,
                value: Some(value),
                reject: None,
            },
            Err(reject) => LpseToken::RangeBound {
                code,
                side,
                raw,
                value: None,
                reject: Some(reject),
            },
        }
    }

    fn date_group(&self, code: String, values: &[&str], vi: &mut usize) -> LpseToken {
        let Some(raw) = take_value(values, vi) else {
            return LpseToken::DateFacet {
                code: code.clone(),
                raw: String::new(),
                value: None,
                reject: Some(Reject::MissingValue { code }),
            };
        };
        match validate_date(&raw, &self.config) {
            Ok(value) => LpseToken::DateFacet {
                code,
                raw,
                value: Some(value.text().to_string()),
                reject: None,
            },
            Err(reject) => LpseToken::DateFacet {
                code,
                raw,
                value: None,
                reject: Some(reject),
            },
        }
    }

    fn sort_group(&self, code: String, op: &[char], i: &mut usize) -> LpseToken {
        let width = self.schema.code_width();
        if op.len() - *i < width {
            let found: String = op[*i..].iter().collect();
            *i = op.len();
            return LpseToken::Unknown {
                code: Some(code),
                raw: found.clone(),
                reject: Reject::TruncatedCode { found },
            };
        }
        let field: String = op[*i..*i + width].iter().collect();
        *i += width;
        let direction = match read_marker(op, i) {
            Some('-') => SortDirection::Descending,
            _ => SortDirection::Ascending,
        };
        let reject = match self.schema.entry(&field) {
            None => Some(Reject::UnknownSortField {
                code: field.clone(),
            }),
            Some(target) if !target.sortable() => Some(Reject::NotSortable {
                code: field.clone(),
            }),
            Some(_) => None,
        };
        LpseToken::Sort {
            code,
            field,
            direction,
            reject,
        }
    }
}

fn string_group(code: String, values: &[&str], vi: &mut usize) -> LpseToken {
    let (raw, value, reject) = text_group(&code, values, vi);
    LpseToken::Facet {
        code,
        raw,
        value,
        reject,
    }
}

fn multi_group(entry: &FieldEntry, values: &[&str], vi: &mut usize) -> LpseToken {
    let code = entry.code().to_string();
    let Some(segment) = values.get(*vi) else {
        return LpseToken::MultiFacet {
            code: code.clone(),
            raw: String::new(),
            values: Vec::new(),
            reject: Some(Reject::MissingValue { code }),
        };
    };
    *vi += 1;

    // Split before decoding: a separator byte inside a value is
    // percent-encoded and survives the split.
    let mut parts = Vec::new();
    for piece in segment.split(entry.separator()) {
        let decoded = decode_value(piece);
        if let Ok(value) = validate_text(&decoded) {
            if value.len() <= MAX_VALUE_LENGTH && !parts.contains(&value) {
                parts.push(value);
            }
        }
        if parts.len() == MAX_FACET_VALUES {
            break;
        }
    }

    let raw = decode_value(segment);
    if parts.is_empty() {
        return LpseToken::MultiFacet {
            code,
            raw,
            values: Vec::new(),
            reject: Some(Reject::EmptyValue),
        };
    }
    LpseToken::MultiFacet {
        code,
        raw,
        values: parts,
        reject: None,
    }
}

fn number_group(
    code: &str,
    values: &[&str],
    vi: &mut usize,
) -> (String, Option<u64>, Option<Reject>) {
    let Some(raw) = take_value(values, vi) else {
        return (
            String::new(),
            None,
            Some(Reject::MissingValue {
                code: code.to_string(),
            }),
        );
    };
    match validate_number(&raw) {
        Ok(value) => (raw, Some(value), None),
        Err(reject) => (raw, None, Some(reject)),
    }
}

fn text_group(
    code: &str,
    values: &[&str],
    vi: &mut usize,
) -> (String, Option<String>, Option<Reject>) {
    let Some(raw) = take_value(values, vi) else {
        return (
            String::new(),
            None,
            Some(Reject::MissingValue {
                code: code.to_string(),
            }),
        );
    };
    if raw.len() > MAX_VALUE_LENGTH {
        let actual = raw.len();
        return (
            raw,
            None,
            Some(Reject::ValueTooLong {
                max: MAX_VALUE_LENGTH,
                actual,
            }),
        );
    }
    match validate_text(&raw) {
        Ok(value) => (raw, Some(value), None),
        Err(reject) => (raw, None, Some(reject)),
    }
}

fn take_value(values: &[&str], vi: &mut usize) -> Option<String> {
    let raw = values.get(*vi)?;
    *vi += 1;
    Some(decode_value(raw))
}

fn read_marker(op: &[char], i: &mut usize) -> Option<char> {
    match op.get(*i).copied() {
        Some(c @ ('+' | '-')) => {
            *i += 1;
            Some(c)
        }
        _ => None,
    }
}

fn read_bound(op: &[char], i: &mut usize) -> Option<Bound> {
    match read_marker(op, i) {
        Some('-') => Some(Bound::Lower),
        Some('+') => Some(Bound::Upper),
        _ => None,
    }
}

fn truncate_at_boundary(path: &str, max: usize) -> &str {
    if path.len() <= max {
        return path;
    }
    let mut end = max;
    while !path.is_char_boundary(end) {
        end -= 1;
    }
    &path[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> CollectionSchema {
        CollectionSchema::builder("products")
            .string_facet("b", "brand").sortable()
            .string_facet("N", "name").sortable()
            .multivalue_facet("c", "colour").or_group()
            .range_facet("w", "weight")
            .date_facet("d", "released")
            .boolean_facet("a", "available")
            .sort("s")
            .page_number("p")
            .page_size("n")
            .query("q")
            .build()
            .unwrap()
    }

    fn tokenize(path: &str) -> Vec<LpseToken> {
        let schema = schema();
        let tokenizer = Tokenizer::new(&schema, ParseConfig::default());
        tokenizer.tokenize(path)
    }

    #[test]
    fn empty_and_root_paths_yield_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("/").is_empty());
        assert!(tokenize("///").is_empty());
    }

    #[test]
    fn single_facet_group() {
        let tokens = tokenize("/Black/b/");
        assert_eq!(tokens.len(), 1);
        assert!(matches!(
            &tokens[0],
            LpseToken::Facet { code, value: Some(v), .. }
                if code == "b" && v == "Black"
        ));
    }

    #[test]
    fn percent_decoding_applies_to_values() {
        let tokens = tokenize("/Navy%20Blue/b/");
        assert!(matches!(
            &tokens[0],
            LpseToken::Facet { value: Some(v), .. } if v == "Navy Blue"
        ));
    }

    #[test]
    fn multivalue_splits_on_separator() {
        let tokens = tokenize("/Black,Navy/c/");
        assert!(matches!(
            &tokens[0],
            LpseToken::MultiFacet { values, .. }
                if values == &["Black".to_string(), "Navy".to_string()]
        ));
    }

    #[test]
    fn encoded_separator_stays_inside_value() {
        let tokens = tokenize("/Black%2CNavy/c/");
        assert!(matches!(
            &tokens[0],
            LpseToken::MultiFacet { values, .. }
                if values == &["Black,Navy".to_string()]
        ));
    }

    #[test]
    fn multivalue_drops_duplicate_values() {
        let tokens = tokenize("/Black,Black,Navy/c/");
        assert!(matches!(
            &tokens[0],
            LpseToken::MultiFacet { values, .. } if values.len() == 2
        ));
    }

    #[test]
    fn range_pair_tokenizes_both_sides() {
        let tokens = tokenize("/17/39/w-w+/");
        assert_eq!(tokens.len(), 2);
        assert!(matches!(
            &tokens[0],
            LpseToken::RangeBound { side: Bound::Lower, value: Some(v), .. }
                if v.text() == "17"
        ));
        assert!(matches!(
            &tokens[1],
            LpseToken::RangeBound { side: Bound::Upper, value: Some(v), .. }
                if v.text() == "39"
        ));
    }

    #[test]
    fn range_without_marker_is_rejected_but_consumes_its_value() {
        let tokens = tokenize("/17/Black/wb/");
        assert_eq!(tokens.len(), 2);
        assert!(matches!(
            &tokens[0],
            LpseToken::RangeBound { reject: Some(Reject::MissingBoundMarker { .. }), .. }
        ));
        assert!(matches!(
            &tokens[1],
            LpseToken::Facet { value: Some(v), .. } if v == "Black"
        ));
    }

    #[test]
    fn date_equality_and_date_bound() {
        let tokens = tokenize("/2024-01-01/2024-06-30/dd+/");
        assert_eq!(tokens.len(), 2);
        assert!(matches!(
            &tokens[0],
            LpseToken::DateFacet { value: Some(v), .. } if v == "2024-01-01"
        ));
        assert!(matches!(
            &tokens[1],
            LpseToken::RangeBound { side: Bound::Upper, value: Some(_), .. }
        ));
    }

    #[test]
    fn boolean_forms() {
        assert!(matches!(
            &tokenize("/a/")[0],
            LpseToken::Flag { value: true, .. }
        ));
        assert!(matches!(
            &tokenize("/a+/")[0],
            LpseToken::Flag { value: true, .. }
        ));
        assert!(matches!(
            &tokenize("/a-/")[0],
            LpseToken::Flag { value: false, .. }
        ));
    }

    #[test]
    fn sort_groups_parse_direction() {
        let tokens = tokenize("/sb-sN+/");
        assert_eq!(tokens.len(), 2);
        assert!(matches!(
            &tokens[0],
            LpseToken::Sort { field, direction: SortDirection::Descending, reject: None, .. }
                if field == "b"
        ));
        assert!(matches!(
            &tokens[1],
            LpseToken::Sort { field, direction: SortDirection::Ascending, reject: None, .. }
                if field == "N"
        ));
    }

    #[test]
    fn bare_sort_defaults_to_ascending() {
        let tokens = tokenize("/sb/");
        assert!(matches!(
            &tokens[0],
            LpseToken::Sort { direction: SortDirection::Ascending, reject: None, .. }
        ));
    }

    #[test]
    fn sort_on_unsortable_field_is_rejected() {
        let tokens = tokenize("/sc/");
        assert!(matches!(
            &tokens[0],
            LpseToken::Sort { reject: Some(Reject::NotSortable { .. }), .. }
        ));
    }

    #[test]
    fn sort_on_unknown_field_is_rejected() {
        let tokens = tokenize("/sz/");
        assert!(matches!(
            &tokens[0],
            LpseToken::Sort { reject: Some(Reject::UnknownSortField { .. }), .. }
        ));
    }

    #[test]
    fn page_and_size_parse_as_numbers() {
        let tokens = tokenize("/2/50/pn/");
        assert!(matches!(&tokens[0], LpseToken::Page { value: Some(2), .. }));
        assert!(matches!(
            &tokens[1],
            LpseToken::PageSize { value: Some(50), .. }
        ));
    }

    #[test]
    fn query_normalizes_whitespace() {
        let tokens = tokenize("/navy++blue/q/");
        assert!(matches!(
            &tokens[0],
            LpseToken::Query { value: Some(v), .. } if v == "navy blue"
        ));
    }

    #[test]
    fn unknown_code_drops_group_and_resyncs() {
        let tokens = tokenize("/Black/2/zbp/");
        assert_eq!(tokens.len(), 3);
        assert!(matches!(
            &tokens[0],
            LpseToken::Unknown { reject: Reject::UnknownCode { .. }, .. }
        ));
        // 'b' then consumes "2", 'p' is left without a value
        assert!(matches!(&tokens[1], LpseToken::Facet { .. }));
        assert!(matches!(
            &tokens[2],
            LpseToken::Page { reject: Some(Reject::MissingValue { .. }), .. }
        ));
    }

    #[test]
    fn dangling_values_are_recorded() {
        let tokens = tokenize("/Black/Extra/b/");
        assert_eq!(tokens.len(), 2);
        assert!(matches!(
            &tokens[1],
            LpseToken::Unknown { reject: Reject::DanglingValue { .. }, .. }
        ));
    }

    #[test]
    fn truncated_sort_code_ends_walk() {
        let tokens = tokenize("/s/");
        assert!(matches!(
            &tokens[0],
            LpseToken::Unknown { reject: Reject::TruncatedCode { .. }, .. }
        ));
    }

    #[test]
    fn garbage_paths_never_panic() {
        for path in [
            "/%%%2F%/b/",
            "/b/b/b/b/",
            "/Black",
            "Black/b",
            "/\u{fffd}\u{2603}/b/",
            "//+//-//",
            "/sb-sN+extra/",
        ] {
            let _ = tokenize(path);
        }
    }

    #[test]
    fn overlong_path_is_cut_not_fatal() {
        let long = format!("/{}/b/", "x".repeat(5000));
        let _ = tokenize(&long);
    }

    #[test]
    fn overlong_value_is_rejected() {
        let long = format!("/{}/b/", "x".repeat(300));
        let tokens = tokenize(&long);
        assert!(matches!(
            &tokens[0],
            LpseToken::Facet { reject: Some(Reject::ValueTooLong { .. }), .. }
        ));
    }

    #[test]
    fn wide_codes_tokenize() {
        let schema = CollectionSchema::builder("c")
            .code_width(2)
            .string_facet("br", "brand").sortable()
            .sort("so")
            .build()
            .unwrap();
        let tokenizer = Tokenizer::new(&schema, ParseConfig::default());
        let tokens = tokenizer.tokenize("/Acme/brsobr-/");
        assert_eq!(tokens.len(), 2);
        assert!(matches!(
            &tokens[0],
            LpseToken::Facet { value: Some(v), .. } if v == "Acme"
        ));
        assert!(matches!(
            &tokens[1],
            LpseToken::Sort { field, direction: SortDirection::Descending, .. } if field == "br"
        ));
    }
}
