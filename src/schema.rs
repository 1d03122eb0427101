//! Collection schema: the read-only map from LPSE codes to query dimensions.
//!
//! A schema is built once per collection at startup through
//! [`SchemaBuilder`](crate::SchemaBuilder) and shared read-only across
//! requests; every stage of the engine borrows it and none mutates it.

use std::collections::BTreeMap;

use crate::builder::SchemaBuilder;

/// The semantic kind of a schema entry.
///
/// This is a closed set: every stage of the engine matches it exhaustively,
/// so adding a kind is a compile-time-checked change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Single-valued string facet
    String,
    /// Boolean facet; the op marker is the value
    Boolean,
    /// Numeric range facet, selected one bound at a time
    Range,
    /// Date facet; supports equality and range bounds
    Date,
    /// Multi-valued facet, optionally OR-grouped
    Multivalue,
    /// The sort marker; at most one per schema
    Sort,
    /// The page number dimension; at most one per schema
    PageNumber,
    /// The page size dimension; at most one per schema
    PageSize,
    /// The free-text query dimension; at most one per schema
    Query,
}

impl FieldKind {
    /// Returns the kind name used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string facet",
            Self::Boolean => "boolean facet",
            Self::Range => "range facet",
            Self::Date => "date facet",
            Self::Multivalue => "multivalue facet",
            Self::Sort => "sort",
            Self::PageNumber => "page number",
            Self::PageSize => "page size",
            Self::Query => "query",
        }
    }

    /// Returns true for the facet kinds (entries that select on a field).
    #[must_use]
    pub const fn is_facet(self) -> bool {
        matches!(
            self,
            Self::String | Self::Boolean | Self::Range | Self::Date | Self::Multivalue
        )
    }

    /// Returns true for the meta kinds, which may appear at most once each.
    #[must_use]
    pub const fn is_meta(self) -> bool {
        !self.is_facet()
    }
}

/// One schema entry: a code bound to a query dimension and its encoding
/// policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEntry {
    pub(crate) code: String,
    pub(crate) field: String,
    pub(crate) label: String,
    pub(crate) kind: FieldKind,
    pub(crate) or_group: bool,
    pub(crate) separator: char,
    pub(crate) unless: Vec<String>,
    pub(crate) sortable: bool,
}

impl FieldEntry {
    /// Returns the LPSE code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the backend field name. Empty for meta entries.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the semantic kind.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Returns true if this multivalue facet combines values with OR.
    #[must_use]
    pub const fn or_group(&self) -> bool {
        self.or_group
    }

    /// Returns the value separator used by multivalue encoding.
    #[must_use]
    pub const fn separator(&self) -> char {
        self.separator
    }

    /// Returns the codes whose activity suppresses this entry from the
    /// available-facets list.
    #[must_use]
    pub fn unless(&self) -> &[String] {
        &self.unless
    }

    /// Returns true if this field may appear in the sort chain.
    #[must_use]
    pub const fn sortable(&self) -> bool {
        self.sortable
    }
}

/// A validated, read-only collection schema.
///
/// # Examples
///
/// ```
/// use lpse::CollectionSchema;
///
/// let schema = CollectionSchema::builder("products")
///     .string_facet("b", "brand").sortable()
///     .range_facet("w", "weight")
///     .sort("s")
///     .page_number("p")
///     .build()
///     .unwrap();
///
/// assert_eq!(schema.entry("b").unwrap().field(), "brand");
/// assert_eq!(schema.code_width(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSchema {
    pub(crate) collection: String,
    pub(crate) entries: Vec<FieldEntry>,
    pub(crate) index: BTreeMap<String, usize>,
    pub(crate) code_width: usize,
    pub(crate) default_page_size: u64,
}

impl CollectionSchema {
    /// Returns a builder for a schema of the named collection.
    #[must_use]
    pub fn builder(collection: &str) -> SchemaBuilder {
        SchemaBuilder::new(collection)
    }

    /// Returns the collection name.
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Returns the entries in declaration order.
    #[must_use]
    pub fn entries(&self) -> &[FieldEntry] {
        &self.entries
    }

    /// Returns the entry for a code, if any.
    #[must_use]
    pub fn entry(&self, code: &str) -> Option<&FieldEntry> {
        self.index.get(code).map(|&i| &self.entries[i])
    }

    /// Returns the declaration position of a code, if any.
    #[must_use]
    pub fn position(&self, code: &str) -> Option<usize> {
        self.index.get(code).copied()
    }

    /// Returns the fixed code width in characters.
    #[must_use]
    pub const fn code_width(&self) -> usize {
        self.code_width
    }

    /// Returns the page size used when the path does not carry one.
    #[must_use]
    pub const fn default_page_size(&self) -> u64 {
        self.default_page_size
    }

    /// Returns the unique entry of a meta kind, if the schema declares one.
    #[must_use]
    pub fn meta(&self, kind: FieldKind) -> Option<&FieldEntry> {
        debug_assert!(kind.is_meta());
        self.entries.iter().find(|e| e.kind == kind)
    }
}
