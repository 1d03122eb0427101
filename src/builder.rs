//! Builder for [`CollectionSchema`] instances.
//!
//! Entry-adding methods append a dimension; modifier methods configure the
//! most recently added entry. All validation happens in [`SchemaBuilder::build`],
//! which is the single gate between collection configuration and the engine:
//! a schema that builds is safe for every later stage to trust.

use std::collections::BTreeMap;

use crate::constants::{DEFAULT_CODE_WIDTH, DEFAULT_PAGE_SIZE};
use crate::error::SchemaError;
use crate::schema::{CollectionSchema, FieldEntry, FieldKind};

/// Default separator for multivalue facet encoding.
const DEFAULT_SEPARATOR: char = ',';

/// Characters that may never appear in a code: they carry structure in the
/// op segment or the path itself.
const RESERVED_CODE_CHARS: [char; 4] = ['/', '%', '+', '-'];

/// A builder for [`CollectionSchema`].
///
/// # Examples
///
/// ```
/// use lpse::CollectionSchema;
///
/// let schema = CollectionSchema::builder("products")
///     .string_facet("b", "brand").sortable()
///     .string_facet("N", "name").sortable()
///     .multivalue_facet("c", "colour").or_group()
///     .range_facet("w", "weight")
///     .boolean_facet("a", "available")
///     .string_facet("m", "material").unless(&["b"])
///     .sort("s")
///     .page_number("p")
///     .page_size("n")
///     .query("q")
///     .build()
///     .unwrap();
///
/// assert_eq!(schema.entries().len(), 10);
/// ```
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    collection: String,
    entries: Vec<FieldEntry>,
    code_width: usize,
    default_page_size: u64,
}

impl SchemaBuilder {
    /// Creates a builder for the named collection.
    #[must_use]
    pub fn new(collection: &str) -> Self {
        Self {
            collection: collection.to_string(),
            entries: Vec::new(),
            code_width: DEFAULT_CODE_WIDTH,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Sets the fixed code width for every code in this schema.
    #[must_use]
    pub fn code_width(mut self, width: usize) -> Self {
        self.code_width = width;
        self
    }

    /// Sets the page size used when the path does not carry one.
    #[must_use]
    pub fn default_page_size(mut self, size: u64) -> Self {
        self.default_page_size = size;
        self
    }

    /// Adds a single-valued string facet.
    #[must_use]
    pub fn string_facet(self, code: &str, field: &str) -> Self {
        self.push(code, field, FieldKind::String)
    }

    /// Adds a multivalue facet.
    #[must_use]
    pub fn multivalue_facet(self, code: &str, field: &str) -> Self {
        self.push(code, field, FieldKind::Multivalue)
    }

    /// Adds a numeric range facet.
    #[must_use]
    pub fn range_facet(self, code: &str, field: &str) -> Self {
        self.push(code, field, FieldKind::Range)
    }

    /// Adds a date facet.
    #[must_use]
    pub fn date_facet(self, code: &str, field: &str) -> Self {
        self.push(code, field, FieldKind::Date)
    }

    /// Adds a boolean facet.
    #[must_use]
    pub fn boolean_facet(self, code: &str, field: &str) -> Self {
        self.push(code, field, FieldKind::Boolean)
    }

    /// Adds the sort marker.
    #[must_use]
    pub fn sort(self, code: &str) -> Self {
        self.push(code, "", FieldKind::Sort)
    }

    /// Adds the page number dimension.
    #[must_use]
    pub fn page_number(self, code: &str) -> Self {
        self.push(code, "", FieldKind::PageNumber)
    }

    /// Adds the page size dimension.
    #[must_use]
    pub fn page_size(self, code: &str) -> Self {
        self.push(code, "", FieldKind::PageSize)
    }

    /// Adds the free-text query dimension.
    #[must_use]
    pub fn query(self, code: &str) -> Self {
        self.push(code, "", FieldKind::Query)
    }

    /// Sets the display label of the most recently added entry.
    #[must_use]
    pub fn label(mut self, label: &str) -> Self {
        if let Some(entry) = self.entries.last_mut() {
            entry.label = label.to_string();
        }
        self
    }

    /// Marks the most recently added entry as OR-grouped.
    #[must_use]
    pub fn or_group(mut self) -> Self {
        if let Some(entry) = self.entries.last_mut() {
            entry.or_group = true;
        }
        self
    }

    /// Sets the multivalue separator of the most recently added entry.
    #[must_use]
    pub fn separator(mut self, separator: char) -> Self {
        if let Some(entry) = self.entries.last_mut() {
            entry.separator = separator;
        }
        self
    }

    /// Sets the unless set of the most recently added entry.
    #[must_use]
    pub fn unless(mut self, codes: &[&str]) -> Self {
        if let Some(entry) = self.entries.last_mut() {
            entry.unless = codes.iter().map(|c| (*c).to_string()).collect();
        }
        self
    }

    /// Marks the most recently added entry as sortable.
    #[must_use]
    pub fn sortable(mut self) -> Self {
        if let Some(entry) = self.entries.last_mut() {
            entry.sortable = true;
        }
        self
    }

    /// Validates the accumulated entries and builds the schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` on the first defect found: empty collection
    /// name, zero width or page size, empty/duplicate/misshapen codes,
    /// reserved characters in a code, duplicate meta entries, modifiers on
    /// kinds that do not support them, unresolved or non-facet unless
    /// references, or an ambiguous multivalue separator.
    pub fn build(self) -> Result<CollectionSchema, SchemaError> {
        if self.collection.is_empty() {
            return Err(SchemaError::EmptyCollection);
        }
        if self.code_width == 0 {
            return Err(SchemaError::ZeroCodeWidth);
        }
        if self.default_page_size == 0 {
            return Err(SchemaError::ZeroPageSize);
        }

        let mut index = BTreeMap::new();
        for (i, entry) in self.entries.iter().enumerate() {
            Self::check_code(entry, self.code_width)?;
            Self::check_kind(entry)?;
            if index.insert(entry.code.clone(), i).is_some() {
                return Err(SchemaError::DuplicateCode {
                    code: entry.code.clone(),
                });
            }
        }

        for kind in [
            FieldKind::Sort,
            FieldKind::PageNumber,
            FieldKind::PageSize,
            FieldKind::Query,
        ] {
            let mut seen = false;
            for entry in &self.entries {
                if entry.kind == kind {
                    if seen {
                        return Err(SchemaError::DuplicateMeta {
                            kind: kind.as_str(),
                            code: entry.code.clone(),
                        });
                    }
                    seen = true;
                }
            }
        }

        for entry in &self.entries {
            for unless in &entry.unless {
                match self.entries.iter().find(|e| &e.code == unless) {
                    None => {
                        return Err(SchemaError::UnknownUnlessCode {
                            code: entry.code.clone(),
                            unless: unless.clone(),
                        });
                    }
                    Some(target) if !target.kind.is_facet() => {
                        return Err(SchemaError::NonFacetUnless {
                            code: entry.code.clone(),
                            unless: unless.clone(),
                        });
                    }
                    Some(_) => {}
                }
            }
        }

        Ok(CollectionSchema {
            collection: self.collection,
            entries: self.entries,
            index,
            code_width: self.code_width,
            default_page_size: self.default_page_size,
        })
    }

    fn push(mut self, code: &str, field: &str, kind: FieldKind) -> Self {
        self.entries.push(FieldEntry {
            code: code.to_string(),
            field: field.to_string(),
            label: field.to_string(),
            kind,
            or_group: false,
            separator: DEFAULT_SEPARATOR,
            unless: Vec::new(),
            sortable: false,
        });
        self
    }

    fn check_code(entry: &FieldEntry, width: usize) -> Result<(), SchemaError> {
        if entry.code.is_empty() {
            return Err(SchemaError::EmptyCode {
                field: entry.field.clone(),
            });
        }
        let actual = entry.code.chars().count();
        if actual != width {
            return Err(SchemaError::CodeWidthMismatch {
                code: entry.code.clone(),
                width,
                actual,
            });
        }
        for c in entry.code.chars() {
            if RESERVED_CODE_CHARS.contains(&c) || c.is_whitespace() {
                return Err(SchemaError::ReservedChar {
                    code: entry.code.clone(),
                    char: c,
                });
            }
        }
        Ok(())
    }

    fn check_kind(entry: &FieldEntry) -> Result<(), SchemaError> {
        if entry.kind.is_facet() && entry.field.is_empty() {
            return Err(SchemaError::EmptyField {
                code: entry.code.clone(),
            });
        }
        if entry.kind != FieldKind::Multivalue {
            if entry.or_group {
                return Err(SchemaError::ModifierMismatch {
                    code: entry.code.clone(),
                    modifier: "or_group",
                });
            }
            if entry.separator != DEFAULT_SEPARATOR {
                return Err(SchemaError::ModifierMismatch {
                    code: entry.code.clone(),
                    modifier: "separator",
                });
            }
        }
        if entry.kind.is_meta() {
            if entry.sortable {
                return Err(SchemaError::ModifierMismatch {
                    code: entry.code.clone(),
                    modifier: "sortable",
                });
            }
            if !entry.unless.is_empty() {
                return Err(SchemaError::ModifierMismatch {
                    code: entry.code.clone(),
                    modifier: "unless",
                });
            }
        }
        if entry.kind == FieldKind::Multivalue {
            let sep = entry.separator;
            if sep == '/' || sep == '%' || sep.is_ascii_alphanumeric() {
                return Err(SchemaError::InvalidSeparator {
                    code: entry.code.clone(),
                    separator: sep,
                });
            }
        }
        Ok(())
    }
}
