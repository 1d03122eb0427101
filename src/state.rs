//! The canonical merged query state.
//!
//! An [`ActiveState`] is produced once per request by
//! [`resolve`](crate::resolve) and is immutable afterwards: both the URI
//! generator and the query translator read from the same value. The
//! transform methods never mutate; each returns a new state, which is how
//! navigation links are derived.
//!
//! Facet selections are held in schema declaration order. Multivalue
//! selections keep their values in first-seen order for display, but
//! equality treats those values as a set — two states that differ only in
//! value arrival order are the same state.

use crate::schema::{CollectionSchema, FieldEntry, FieldKind};
use crate::token::SortDirection;
use crate::validate::OrdinalValue;

/// One active facet selection.
#[derive(Debug, Clone)]
pub enum FacetSelection {
    /// One or more selected values of a string, date, or multivalue facet
    Value {
        /// The facet code
        code: String,
        /// Selected values, first-seen order, duplicate-free
        values: Vec<String>,
    },
    /// A range selection; at least one bound is present
    Range {
        /// The facet code
        code: String,
        /// Lower bound, if selected
        lower: Option<OrdinalValue>,
        /// Upper bound, if selected
        upper: Option<OrdinalValue>,
    },
    /// A boolean selection
    Flag {
        /// The facet code
        code: String,
        /// The selected truth value
        value: bool,
    },
}

impl FacetSelection {
    /// Returns the facet code of this selection.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Value { code, .. } | Self::Range { code, .. } | Self::Flag { code, .. } => code,
        }
    }

    /// Returns the selected values for a value selection, empty otherwise.
    #[must_use]
    pub fn values(&self) -> &[String] {
        match self {
            Self::Value { values, .. } => values,
            Self::Range { .. } | Self::Flag { .. } => &[],
        }
    }

    /// Returns true if this selection contains the given value.
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.values().iter().any(|v| v == value)
    }
}

impl PartialEq for FacetSelection {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::Value { code, values },
                Self::Value {
                    code: other_code,
                    values: other_values,
                },
            ) => {
                if code != other_code || values.len() != other_values.len() {
                    return false;
                }
                let mut a: Vec<&str> = values.iter().map(String::as_str).collect();
                let mut b: Vec<&str> = other_values.iter().map(String::as_str).collect();
                a.sort_unstable();
                b.sort_unstable();
                a == b
            }
            (
                Self::Range { code, lower, upper },
                Self::Range {
                    code: other_code,
                    lower: other_lower,
                    upper: other_upper,
                },
            ) => code == other_code && lower == other_lower && upper == other_upper,
            (
                Self::Flag { code, value },
                Self::Flag {
                    code: other_code,
                    value: other_value,
                },
            ) => code == other_code && value == other_value,
            _ => false,
        }
    }
}

/// One entry of the sort chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortEntry {
    pub(crate) code: String,
    pub(crate) direction: SortDirection,
}

impl SortEntry {
    /// Returns the sorted field's code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the sort direction.
    #[must_use]
    pub const fn direction(&self) -> SortDirection {
        self.direction
    }
}

/// The fully merged, canonical query state for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveState {
    pub(crate) facets: Vec<FacetSelection>,
    pub(crate) sort: Vec<SortEntry>,
    pub(crate) page: u64,
    pub(crate) page_size: u64,
    pub(crate) query: Option<String>,
}

impl ActiveState {
    /// Returns the default state for a collection: no selections, no sort,
    /// page 1 at the schema's default page size, no query.
    #[must_use]
    pub fn empty(schema: &CollectionSchema) -> Self {
        Self {
            facets: Vec::new(),
            sort: Vec::new(),
            page: 1,
            page_size: schema.default_page_size(),
            query: None,
        }
    }

    /// Returns the facet selections in schema declaration order.
    #[must_use]
    pub fn facets(&self) -> &[FacetSelection] {
        &self.facets
    }

    /// Returns the selection for a code, if active.
    #[must_use]
    pub fn facet(&self, code: &str) -> Option<&FacetSelection> {
        self.facets.iter().find(|f| f.code() == code)
    }

    /// Returns the sort chain in priority order.
    #[must_use]
    pub fn sort(&self) -> &[SortEntry] {
        &self.sort
    }

    /// Returns the page number (≥ 1).
    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    /// Returns the page size (≥ 1).
    #[must_use]
    pub const fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Returns the free-text query term, if set.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Returns true if anything beyond pagination defaults is selected.
    #[must_use]
    pub fn has_selections(&self) -> bool {
        !self.facets.is_empty() || !self.sort.is_empty() || self.query.is_some()
    }

    /// Returns a state with a value added to (or replacing) the selection
    /// of a string, date, or multivalue facet.
    ///
    /// Single-valued kinds replace; multivalue kinds append without
    /// duplicating. The value is whitespace-normalized exactly as the
    /// tokenizer would normalize it, so the state holds what a round trip
    /// through its own canonical path would hold. Date values are taken
    /// verbatim beyond that; callers supply text in the collection's date
    /// pattern. Codes the schema does not know, kinds that do not take
    /// values, and values that normalize to nothing return the state
    /// unchanged.
    #[must_use]
    pub fn with_facet_value(&self, schema: &CollectionSchema, code: &str, value: &str) -> Self {
        let Some(entry) = schema.entry(code) else {
            return self.clone();
        };
        let Ok(value) = crate::validate::validate_text(value) else {
            return self.clone();
        };
        let value = value.as_str();
        let replace = match entry.kind() {
            FieldKind::String | FieldKind::Date => true,
            FieldKind::Multivalue => false,
            _ => return self.clone(),
        };

        let mut next = self.clone();
        if let Some(selection) = next.facets.iter_mut().find(|f| f.code() == code) {
            if let FacetSelection::Value { values, .. } = selection {
                if replace {
                    values.clear();
                    values.push(value.to_string());
                } else if !values.iter().any(|v| v == value) {
                    values.push(value.to_string());
                }
            } else {
                // A date range gives way to an equality pick.
                *selection = FacetSelection::Value {
                    code: code.to_string(),
                    values: vec![value.to_string()],
                };
            }
            return next;
        }
        next.insert_selection(
            schema,
            FacetSelection::Value {
                code: code.to_string(),
                values: vec![value.to_string()],
            },
        );
        next
    }

    /// Returns a state with one value removed from a facet selection; the
    /// selection disappears when its last value goes.
    #[must_use]
    pub fn without_facet_value(&self, code: &str, value: &str) -> Self {
        let mut next = self.clone();
        if let Some(idx) = next.facets.iter().position(|f| f.code() == code) {
            if let FacetSelection::Value { values, .. } = &mut next.facets[idx] {
                values.retain(|v| v != value);
                if values.is_empty() {
                    next.facets.remove(idx);
                }
            }
        }
        next
    }

    /// Returns a state without any selection for the given code.
    #[must_use]
    pub fn without_facet(&self, code: &str) -> Self {
        let mut next = self.clone();
        next.facets.retain(|f| f.code() != code);
        next
    }

    /// Returns a state with a range selection replacing any previous
    /// selection of the code. An inverted pair (upper below lower) or an
    /// empty pair clears the selection instead — the engine never holds a
    /// range it would refuse to re-parse.
    #[must_use]
    pub fn with_range(
        &self,
        schema: &CollectionSchema,
        code: &str,
        lower: Option<OrdinalValue>,
        upper: Option<OrdinalValue>,
    ) -> Self {
        let kind = schema.entry(code).map(FieldEntry::kind);
        if !matches!(kind, Some(FieldKind::Range | FieldKind::Date)) {
            return self.clone();
        }
        let mut next = self.without_facet(code);
        let inverted = match (&lower, &upper) {
            (Some(l), Some(u)) => u.ordinal() < l.ordinal(),
            _ => false,
        };
        if inverted || (lower.is_none() && upper.is_none()) {
            return next;
        }
        next.insert_selection(
            schema,
            FacetSelection::Range {
                code: code.to_string(),
                lower,
                upper,
            },
        );
        next
    }

    /// Returns a state with a boolean selection replacing any previous
    /// selection of the code.
    #[must_use]
    pub fn with_flag(&self, schema: &CollectionSchema, code: &str, value: bool) -> Self {
        if schema.entry(code).map(FieldEntry::kind) != Some(FieldKind::Boolean) {
            return self.clone();
        }
        let mut next = self.without_facet(code);
        next.insert_selection(
            schema,
            FacetSelection::Flag {
                code: code.to_string(),
                value,
            },
        );
        next
    }

    /// Returns a state with the given field in the sort chain.
    ///
    /// A field already in the chain keeps its position and takes the new
    /// direction; a new field appends. Codes the schema does not mark
    /// sortable return the state unchanged.
    #[must_use]
    pub fn with_sort(
        &self,
        schema: &CollectionSchema,
        code: &str,
        direction: SortDirection,
    ) -> Self {
        let mut next = self.clone();
        if !schema.entry(code).is_some_and(FieldEntry::sortable) {
            return next;
        }
        if let Some(entry) = next.sort.iter_mut().find(|s| s.code == code) {
            entry.direction = direction;
        } else {
            next.sort.push(SortEntry {
                code: code.to_string(),
                direction,
            });
        }
        next
    }

    /// Returns a state with the given field removed from the sort chain;
    /// the remaining entries keep their relative order.
    #[must_use]
    pub fn without_sort(&self, code: &str) -> Self {
        let mut next = self.clone();
        next.sort.retain(|s| s.code != code);
        next
    }

    /// Returns a state on the given page, clamped to ≥ 1.
    #[must_use]
    pub fn with_page(&self, page: u64) -> Self {
        let mut next = self.clone();
        next.page = page.max(1);
        next
    }

    /// Returns a state with the given page size, clamped to ≥ 1.
    #[must_use]
    pub fn with_page_size(&self, page_size: u64) -> Self {
        let mut next = self.clone();
        next.page_size = page_size.max(1);
        next
    }

    /// Returns a state with the query term set to the whitespace-normalized
    /// text, or cleared when nothing remains.
    #[must_use]
    pub fn with_query(&self, text: &str) -> Self {
        let mut next = self.clone();
        let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
        next.query = (!normalized.is_empty()).then_some(normalized);
        next
    }

    /// Returns a state without a query term.
    #[must_use]
    pub fn without_query(&self) -> Self {
        let mut next = self.clone();
        next.query = None;
        next
    }

    /// Inserts a selection keeping the facet list in schema declaration
    /// order. Unknown codes sort last, which cannot happen for selections
    /// built through the public transforms.
    pub(crate) fn insert_selection(
        &mut self,
        schema: &CollectionSchema,
        selection: FacetSelection,
    ) {
        let position = schema.position(selection.code()).unwrap_or(usize::MAX);
        let at = self
            .facets
            .iter()
            .position(|f| schema.position(f.code()).unwrap_or(usize::MAX) > position)
            .unwrap_or(self.facets.len());
        self.facets.insert(at, selection);
    }
}
