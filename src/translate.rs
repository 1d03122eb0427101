//! The boundary to the backend search engine.
//!
//! Translation is one-way: an [`ActiveState`] maps to the backend's
//! filter/sort/pagination request shape, and the only thing that flows back
//! into the engine is the result count needed for pagination math. Nothing
//! here participates in token or state logic.

use crate::schema::{CollectionSchema, FieldKind};
use crate::state::{ActiveState, FacetSelection};
use crate::token::SortDirection;

/// One backend filter clause.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FilterClause {
    /// Field equals the value
    Equals {
        /// Backend field name
        field: String,
        /// The selected value
        value: String,
    },
    /// Field matches every value (intersecting multivalue selection)
    AllOf {
        /// Backend field name
        field: String,
        /// The selected values
        values: Vec<String>,
    },
    /// Field matches any value (OR-grouped multivalue selection)
    AnyOf {
        /// Backend field name
        field: String,
        /// The selected values
        values: Vec<String>,
    },
    /// Field lies in the range; open sides are unbounded
    Range {
        /// Backend field name
        field: String,
        /// Lower bound, inclusive
        lower: Option<String>,
        /// Upper bound, inclusive
        upper: Option<String>,
    },
    /// Field equals the boolean
    Flag {
        /// Backend field name
        field: String,
        /// The selected truth value
        value: bool,
    },
}

/// One backend sort clause.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SortClause {
    /// Backend field name
    pub field: String,
    /// Sort direction
    pub direction: SortDirection,
}

/// The backend request shape for one resolved state.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchRequest {
    /// Filter clauses, one per facet selection, in schema order
    pub filters: Vec<FilterClause>,
    /// Sort clauses in chain priority order
    pub sort: Vec<SortClause>,
    /// Zero-based result offset: `(page - 1) * page_size`
    pub offset: u64,
    /// Result window size
    pub limit: u64,
    /// Free-text query term, if set
    pub query: Option<String>,
}

/// Maps a resolved state onto the backend request shape.
#[must_use]
pub fn translate(state: &ActiveState, schema: &CollectionSchema) -> SearchRequest {
    let mut filters = Vec::with_capacity(state.facets().len());
    for selection in state.facets() {
        let Some(entry) = schema.entry(selection.code()) else {
            continue;
        };
        let field = entry.field().to_string();
        match selection {
            FacetSelection::Value { values, .. } => match entry.kind() {
                FieldKind::Multivalue if entry.or_group() => filters.push(FilterClause::AnyOf {
                    field,
                    values: values.clone(),
                }),
                FieldKind::Multivalue => filters.push(FilterClause::AllOf {
                    field,
                    values: values.clone(),
                }),
                _ => {
                    if let Some(value) = values.first() {
                        filters.push(FilterClause::Equals {
                            field,
                            value: value.clone(),
                        });
                    }
                }
            },
            FacetSelection::Range { lower, upper, .. } => filters.push(FilterClause::Range {
                field,
                lower: lower.as_ref().map(|v| v.text().to_string()),
                upper: upper.as_ref().map(|v| v.text().to_string()),
            }),
            FacetSelection::Flag { value, .. } => filters.push(FilterClause::Flag {
                field,
                value: *value,
            }),
        }
    }

    let sort = state
        .sort()
        .iter()
        .filter_map(|entry| {
            schema.entry(entry.code()).map(|e| SortClause {
                field: e.field().to_string(),
                direction: entry.direction(),
            })
        })
        .collect();

    SearchRequest {
        filters,
        sort,
        offset: (state.page() - 1).saturating_mul(state.page_size()),
        limit: state.page_size(),
        query: state.query().map(str::to_string),
    }
}

/// Pagination math over a result count — the only value the backend feeds
/// back into the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResultPaging {
    /// Current page number
    pub page: u64,
    /// Page size
    pub page_size: u64,
    /// Total result count reported by the backend
    pub total_hits: u64,
    /// Number of pages covering the result set (≥ 1)
    pub pages: u64,
    /// True when a previous page exists
    pub has_previous: bool,
    /// True when a next page exists
    pub has_next: bool,
}

impl ResultPaging {
    /// Computes the page window for a state and a backend result count.
    #[must_use]
    pub fn new(state: &ActiveState, total_hits: u64) -> Self {
        let page = state.page();
        let page_size = state.page_size();
        let pages = total_hits.div_ceil(page_size).max(1);
        Self {
            page,
            page_size,
            total_hits,
            pages,
            has_previous: page > 1,
            has_next: page < pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::resolve;
    use crate::tokenizer::Tokenizer;
    use crate::validate::ParseConfig;

    fn schema() -> CollectionSchema {
        CollectionSchema::builder("products")
            .string_facet("b", "brand").sortable()
            .multivalue_facet("c", "colour").or_group()
            .multivalue_facet("t", "tag")
            .range_facet("w", "weight")
            .boolean_facet("a", "available")
            .sort("s")
            .page_number("p")
            .page_size("n")
            .query("q")
            .build()
            .unwrap()
    }

    fn request(path: &str) -> SearchRequest {
        let schema = schema();
        let tokenizer = Tokenizer::new(&schema, ParseConfig::default());
        let state = resolve(&tokenizer.tokenize(path), &schema);
        translate(&state, &schema)
    }

    #[test]
    fn equality_filter_for_single_value() {
        let req = request("/Acme/b/");
        assert_eq!(
            req.filters,
            [FilterClause::Equals {
                field: "brand".to_string(),
                value: "Acme".to_string(),
            }]
        );
    }

    #[test]
    fn or_group_becomes_any_of() {
        let req = request("/Black,Navy/c/");
        assert!(matches!(
            &req.filters[0],
            FilterClause::AnyOf { field, values }
                if field == "colour" && values.len() == 2
        ));
    }

    #[test]
    fn plain_multivalue_becomes_all_of() {
        let req = request("/new,sale/t/");
        assert!(matches!(&req.filters[0], FilterClause::AllOf { .. }));
    }

    #[test]
    fn range_filter_keeps_open_sides() {
        let req = request("/17/w-/");
        assert!(matches!(
            &req.filters[0],
            FilterClause::Range {
                lower: Some(l),
                upper: None,
                ..
            } if l == "17"
        ));
    }

    #[test]
    fn flag_filter_carries_polarity() {
        let req = request("/a-/");
        assert!(matches!(
            &req.filters[0],
            FilterClause::Flag { value: false, .. }
        ));
    }

    #[test]
    fn sort_chain_maps_to_backend_fields() {
        let req = request("/sb-/");
        assert_eq!(
            req.sort,
            [SortClause {
                field: "brand".to_string(),
                direction: SortDirection::Descending,
            }]
        );
    }

    #[test]
    fn pagination_window() {
        let req = request("/3/25/pn/");
        assert_eq!(req.offset, 50);
        assert_eq!(req.limit, 25);
    }

    #[test]
    fn query_term_passes_through() {
        let req = request("/navy%20shoes/q/");
        assert_eq!(req.query.as_deref(), Some("navy shoes"));
    }

    #[test]
    fn result_paging_math() {
        let schema = schema();
        let tokenizer = Tokenizer::new(&schema, ParseConfig::default());
        let state = resolve(&tokenizer.tokenize("/2/10/pn/"), &schema);

        let paging = ResultPaging::new(&state, 35);
        assert_eq!(paging.pages, 4);
        assert!(paging.has_previous);
        assert!(paging.has_next);

        let last = ResultPaging::new(&state.with_page(4), 35);
        assert!(!last.has_next);

        let empty = ResultPaging::new(&state.with_page(1), 0);
        assert_eq!(empty.pages, 1);
        assert!(!empty.has_next);
        assert!(!empty.has_previous);
    }
}
