//! The state resolver: one fold from a token sequence to an [`ActiveState`].
//!
//! Merge rules are applied per code in input order; later tokens for the
//! same single-value code replace earlier ones. Resolution never fails —
//! inconsistent input degrades to the nearest valid state, and an empty or
//! fully invalid token sequence resolves to the default state.

use std::collections::BTreeMap;

use crate::constants::{MAX_FACET_VALUES, MAX_SORT_FIELDS};
use crate::schema::{CollectionSchema, FieldEntry};
use crate::state::{ActiveState, FacetSelection};
use crate::token::{Bound, LpseToken};
use crate::validate::OrdinalValue;

/// Merges a token sequence into the canonical active state.
///
/// Invalid tokens contribute nothing. Range sides combine per code and an
/// inverted pair (upper below lower) drops the whole range selection
/// rather than applying one side.
#[must_use]
pub fn resolve(tokens: &[LpseToken], schema: &CollectionSchema) -> ActiveState {
    let mut state = ActiveState::empty(schema);
    let mut ranges: BTreeMap<&str, (Option<OrdinalValue>, Option<OrdinalValue>)> =
        BTreeMap::new();

    for token in tokens.iter().filter(|t| t.is_valid()) {
        match token {
            LpseToken::Facet {
                code,
                value: Some(value),
                ..
            }
            | LpseToken::DateFacet {
                code,
                value: Some(value),
                ..
            } => {
                state = state.with_facet_value(schema, code, value);
            }
            LpseToken::MultiFacet { code, values, .. } => {
                for value in values {
                    let at_cap = state
                        .facet(code)
                        .is_some_and(|f| f.values().len() >= MAX_FACET_VALUES);
                    if at_cap {
                        break;
                    }
                    state = state.with_facet_value(schema, code, value);
                }
            }
            LpseToken::RangeBound {
                code,
                side,
                value: Some(value),
                ..
            } => {
                let slot = ranges.entry(code).or_default();
                match side {
                    Bound::Lower => slot.0 = Some(value.clone()),
                    Bound::Upper => slot.1 = Some(value.clone()),
                }
            }
            LpseToken::Flag { code, value } => {
                state = state.with_flag(schema, code, *value);
            }
            LpseToken::Sort {
                field, direction, ..
            } => {
                let new_entry = !state.sort().iter().any(|s| s.code() == field);
                if new_entry && state.sort().len() >= MAX_SORT_FIELDS {
                    continue;
                }
                state = state.with_sort(schema, field, *direction);
            }
            LpseToken::Page {
                value: Some(page), ..
            } => {
                state = state.with_page(*page);
            }
            LpseToken::PageSize {
                value: Some(size), ..
            } => {
                state = state.with_page_size(*size);
            }
            LpseToken::Query {
                value: Some(term), ..
            } => {
                state = state.with_query(term);
            }
            _ => {}
        }
    }

    for (code, (lower, upper)) in ranges {
        state = state.with_range(schema, code, lower, upper);
    }

    state
}

/// Returns the facet entries currently offered for selection: every facet
/// entry whose unless set names no active facet code.
///
/// Suppression hides the offer only. A suppressed facet that is already
/// selected stays selected — it is simply absent from this list. The
/// relation is evaluated once, not iterated to a fixed point.
#[must_use]
pub fn available_facets<'s>(
    state: &ActiveState,
    schema: &'s CollectionSchema,
) -> Vec<&'s FieldEntry> {
    let active: Vec<&str> = state.facets().iter().map(FacetSelection::code).collect();
    schema
        .entries()
        .iter()
        .filter(|e| e.kind().is_facet())
        .filter(|e| !e.unless().iter().any(|u| active.contains(&u.as_str())))
        .collect()
}
