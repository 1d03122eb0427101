//! Diagnostic rendering of a token sequence.
//!
//! One line per decoded group, `VALID` or `INVALID` with a reason, driven
//! by the same tokens the resolver consumes — including the rejected ones
//! the resolver ignores. This is how a stale bookmark or a hand-edited URL
//! is debugged without turning malformed input into an error.

use std::fmt;

use crate::token::{Bound, LpseToken};

/// One line of explain output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplainLine {
    valid: bool,
    detail: String,
}

impl ExplainLine {
    /// Returns true if the group was accepted.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns the human-readable description of the group.
    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl fmt::Display for ExplainLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.valid { "VALID  " } else { "INVALID" };
        write!(f, "{verdict} {}", self.detail)
    }
}

/// A per-group account of how a path tokenized.
///
/// # Examples
///
/// ```
/// use lpse::{CollectionSchema, Explanation, ParseConfig, Tokenizer};
///
/// let schema = CollectionSchema::builder("products")
///     .string_facet("b", "brand")
///     .build()
///     .unwrap();
/// let tokenizer = Tokenizer::new(&schema, ParseConfig::default());
///
/// let explanation = Explanation::of(&tokenizer.tokenize("/Black/stray/b/"));
/// assert_eq!(explanation.lines().len(), 2);
/// assert!(explanation.lines()[0].is_valid());
/// assert!(!explanation.lines()[1].is_valid());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explanation {
    lines: Vec<ExplainLine>,
}

impl Explanation {
    /// Builds the explanation for a token sequence.
    #[must_use]
    pub fn of(tokens: &[LpseToken]) -> Self {
        let lines = tokens
            .iter()
            .map(|token| ExplainLine {
                valid: token.is_valid(),
                detail: describe(token),
            })
            .collect();
        Self { lines }
    }

    /// Returns the lines in input order.
    #[must_use]
    pub fn lines(&self) -> &[ExplainLine] {
        &self.lines
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

fn describe(token: &LpseToken) -> String {
    if let Some(reject) = token.reject() {
        return match token.code() {
            Some(code) => format!("{code}: {reject}"),
            None => reject.to_string(),
        };
    }
    match token {
        LpseToken::Facet { code, value, .. } | LpseToken::Query { code, value, .. } => {
            format!("{code} = \"{}\"", value.as_deref().unwrap_or_default())
        }
        LpseToken::MultiFacet { code, values, .. } => {
            format!("{code} = [{}]", values.join(", "))
        }
        LpseToken::RangeBound {
            code, side, value, ..
        } => {
            let side_name = match side {
                Bound::Lower => "lower",
                Bound::Upper => "upper",
            };
            let bound = value.as_ref().map_or_else(String::new, |v| v.text().to_string());
            format!("{code} {side_name} bound = {bound}")
        }
        LpseToken::Flag { code, value } => format!("{code} = {value}"),
        LpseToken::DateFacet { code, value, .. } => {
            format!("{code} = {}", value.as_deref().unwrap_or_default())
        }
        LpseToken::Sort {
            field, direction, ..
        } => format!("sort by {field}, {direction}"),
        LpseToken::Page { code, value, .. } => {
            format!("{code}: page {}", value.unwrap_or_default())
        }
        LpseToken::PageSize { code, value, .. } => {
            format!("{code}: page size {}", value.unwrap_or_default())
        }
        LpseToken::Unknown { raw, .. } => format!("unparsed input '{raw}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::CollectionSchema;
    use crate::tokenizer::Tokenizer;
    use crate::validate::ParseConfig;

    fn explanation(path: &str) -> Explanation {
        let schema = CollectionSchema::builder("products")
            .string_facet("b", "brand").sortable()
            .range_facet("w", "weight")
            .sort("s")
            .page_number("p")
            .build()
            .unwrap();
        let tokenizer = Tokenizer::new(&schema, ParseConfig::default());
        Explanation::of(&tokenizer.tokenize(path))
    }

    #[test]
    fn valid_groups_are_reported_valid() {
        let explanation = explanation("/Black/17/39/bw-w+/");
        assert_eq!(explanation.lines().len(), 3);
        assert!(explanation.lines().iter().all(ExplainLine::is_valid));
    }

    #[test]
    fn invalid_groups_carry_a_reason() {
        let explanation = explanation("/Black/zb/");
        let rendered = explanation.to_string();
        assert!(rendered.contains("INVALID"));
        assert!(rendered.contains("unknown code 'z'"));
    }

    #[test]
    fn rendering_marks_each_line() {
        let explanation = explanation("/Acme/notanumber/bp/");
        let rendered = explanation.to_string();
        assert!(rendered.lines().any(|l| l.starts_with("VALID")));
        assert!(rendered.lines().any(|l| l.starts_with("INVALID")));
    }

    #[test]
    fn empty_path_explains_to_nothing() {
        assert!(explanation("/").lines().is_empty());
    }
}
