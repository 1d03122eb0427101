//! Error types for schema construction.
//!
//! Per-request problems (unknown codes, bad values, inverted ranges) are
//! never errors: they degrade to invalid tokens or dropped selections and
//! surface only through [`crate::Explanation`]. A malformed schema is the
//! one condition the engine cannot guess around, so it is the one condition
//! that aborts collection setup.

use std::fmt;

/// Errors that can occur when building a [`crate::CollectionSchema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Collection name is empty
    EmptyCollection,
    /// Code width is zero
    ZeroCodeWidth,
    /// Default page size is zero
    ZeroPageSize,
    /// A field entry has an empty code
    EmptyCode {
        /// Backend field name of the offending entry
        field: String,
    },
    /// A code does not match the schema's fixed code width
    CodeWidthMismatch {
        /// The offending code
        code: String,
        /// Declared code width
        width: usize,
        /// Actual code length
        actual: usize,
    },
    /// Two entries share a code
    DuplicateCode {
        /// The duplicated code
        code: String,
    },
    /// A code contains a character reserved by the encoding
    ReservedChar {
        /// The offending code
        code: String,
        /// The reserved character
        char: char,
    },
    /// A meta kind (sort, page number, page size, query) appears twice
    DuplicateMeta {
        /// Kind name (e.g. "sort")
        kind: &'static str,
        /// Code of the second entry
        code: String,
    },
    /// A facet entry has an empty backend field name
    EmptyField {
        /// Code of the offending entry
        code: String,
    },
    /// A multivalue separator that cannot be distinguished from value bytes
    InvalidSeparator {
        /// Code of the offending entry
        code: String,
        /// The rejected separator
        separator: char,
    },
    /// A modifier was applied to an entry kind that does not support it
    ModifierMismatch {
        /// Code of the offending entry
        code: String,
        /// The modifier name (e.g. "or_group")
        modifier: &'static str,
    },
    /// An unless set references a code that is not in the schema
    UnknownUnlessCode {
        /// Code of the entry carrying the unless set
        code: String,
        /// The unresolved code
        unless: String,
    },
    /// An unless set references a non-facet code
    NonFacetUnless {
        /// Code of the entry carrying the unless set
        code: String,
        /// The non-facet code
        unless: String,
    },
    /// A date pattern that chrono cannot format or re-parse
    InvalidDatePattern {
        /// The rejected pattern
        pattern: String,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCollection => write!(f, "collection name cannot be empty"),
            Self::ZeroCodeWidth => write!(f, "code width must be at least 1"),
            Self::ZeroPageSize => write!(f, "default page size must be at least 1"),
            Self::EmptyCode { field } => {
                write!(f, "entry for field '{field}' has an empty code")
            }
            Self::CodeWidthMismatch {
                code,
                width,
                actual,
            } => {
                write!(f, "code '{code}' is {actual} chars, schema width is {width}")
            }
            Self::DuplicateCode { code } => write!(f, "duplicate code '{code}'"),
            Self::ReservedChar { code, char } => {
                write!(
                    f,
                    "code '{code}' contains reserved character '{char}'; codes may not contain '/', '%', '+', '-', or whitespace"
                )
            }
            Self::DuplicateMeta { kind, code } => {
                write!(f, "second {kind} entry '{code}'; at most one is allowed")
            }
            Self::EmptyField { code } => {
                write!(f, "facet entry '{code}' has an empty backend field name")
            }
            Self::InvalidSeparator { code, separator } => {
                write!(
                    f,
                    "separator '{separator}' for '{code}' would be ambiguous; use a non-alphanumeric character other than '/' and '%'"
                )
            }
            Self::ModifierMismatch { code, modifier } => {
                write!(f, "modifier '{modifier}' does not apply to entry '{code}'")
            }
            Self::UnknownUnlessCode { code, unless } => {
                write!(f, "entry '{code}' lists unknown code '{unless}' in its unless set")
            }
            Self::NonFacetUnless { code, unless } => {
                write!(f, "entry '{code}' lists non-facet code '{unless}' in its unless set")
            }
            Self::InvalidDatePattern { pattern } => {
                write!(f, "date pattern '{pattern}' cannot format and re-parse a date")
            }
        }
    }
}

impl std::error::Error for SchemaError {}
