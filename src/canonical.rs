//! Canonical serialization and navigation link generation.
//!
//! Many input paths decode to the same [`ActiveState`]; this module picks
//! the one spelling the engine stands behind. Codes are emitted strictly in
//! schema declaration order regardless of the order they arrived in, page
//! and page size are omitted at their defaults, and multivalue values are
//! emitted sorted so that semantically equal states serialize to
//! byte-identical paths.
//!
//! Links are always full canonical paths, never deltas: following any link
//! from any state lands on the unique canonical form of the resulting
//! state. Facet values themselves come from the backend's counts, so
//! "add" links for not-yet-selected values are provided as templates — a
//! `before`/`after` pair the response layer closes over each encoded value.

use crate::delimiter::encode_value;
use crate::resolve::available_facets;
use crate::schema::{CollectionSchema, FieldEntry, FieldKind};
use crate::state::{ActiveState, FacetSelection, SortEntry};
use crate::token::SortDirection;
use crate::validate::OrdinalValue;

/// Where a template's value slot sits in the emitted path.
#[derive(Debug, Clone, Copy)]
enum InsertPoint {
    /// A new value segment at this index, with op text at this byte offset
    Segment {
        /// Index into the value segment list
        seg: usize,
        /// Byte offset into the op segment
        op: usize,
    },
    /// Append to the existing multivalue segment at this index
    Append {
        /// Index into the value segment list
        seg: usize,
    },
}

/// A remove link for one active facet value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveLink {
    /// Facet code
    pub code: String,
    /// Display label from the schema
    pub label: String,
    /// The selected value as it is displayed
    pub value: String,
    /// Canonical path of the state without this value
    pub remove: String,
}

/// An add template for a facet offered for selection.
///
/// Splicing `before + encode_value(v) + after` yields a path that resolves
/// to the current state plus `v`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AddTemplate {
    /// Facet code
    pub code: String,
    /// Display label from the schema
    pub label: String,
    /// Path up to the value slot
    pub before: String,
    /// Path after the value slot
    pub after: String,
}

/// A set template and remove link for a range facet.
///
/// Splicing `before + encode_value(lower) + "/" + encode_value(upper) +
/// after` yields a path selecting that range, replacing any current one.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeTemplate {
    /// Facet code
    pub code: String,
    /// Display label from the schema
    pub label: String,
    /// Path up to the lower bound slot
    pub before: String,
    /// Path after the upper bound slot
    pub after: String,
    /// Currently selected bounds as display text, when active
    pub selected: Option<(Option<String>, Option<String>)>,
    /// Canonical path of the state without this range, when active
    pub remove: Option<String>,
}

/// Set links for a boolean facet.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlagLink {
    /// Facet code
    pub code: String,
    /// Display label from the schema
    pub label: String,
    /// Current selection, when active
    pub selected: Option<bool>,
    /// Canonical path of the state with this flag set true
    pub set_true: String,
    /// Canonical path of the state with this flag set false
    pub set_false: String,
    /// Canonical path of the state without this flag, when active
    pub remove: Option<String>,
}

/// Set links for one sortable field.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SortLink {
    /// Field code
    pub code: String,
    /// Display label from the schema
    pub label: String,
    /// Current chain direction, when the field is in the chain
    pub selected: Option<SortDirection>,
    /// Canonical path sorting this field ascending
    pub ascending: String,
    /// Canonical path sorting this field descending
    pub descending: String,
    /// Canonical path of the state without this field in the chain
    pub remove: Option<String>,
}

/// Pagination links.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PagingLinks {
    /// Canonical path of the previous page, when not on page 1
    pub previous: Option<String>,
    /// Canonical path of the next page; the caller gates it on the result
    /// count
    pub next: String,
    /// Template for jumping to an arbitrary page, when the schema declares
    /// a page dimension
    pub set: Option<AddTemplate>,
}

/// The complete navigation surface derived from one state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Navigation {
    /// Remove links for every active facet value
    pub active: Vec<ActiveLink>,
    /// Add templates for offered value facets, suppression applied
    pub available: Vec<AddTemplate>,
    /// Range facet templates, suppression applied
    pub ranges: Vec<RangeTemplate>,
    /// Boolean facet links, suppression applied
    pub flags: Vec<FlagLink>,
    /// Sort links for every sortable field
    pub sort: Vec<SortLink>,
    /// Pagination links
    pub paging: PagingLinks,
}

/// Serializes states to canonical paths and derives navigation links.
///
/// # Examples
///
/// ```
/// use lpse::{ActiveState, CollectionSchema, SortDirection, UriGenerator};
///
/// let schema = CollectionSchema::builder("products")
///     .string_facet("b", "brand").sortable()
///     .string_facet("N", "name").sortable()
///     .sort("s")
///     .build()
///     .unwrap();
/// let generator = UriGenerator::new(&schema);
///
/// let state = ActiveState::empty(&schema).with_sort(&schema, "b", SortDirection::Descending);
/// assert_eq!(generator.canonicalize(&state), "/sb-/");
/// ```
#[derive(Debug, Clone)]
pub struct UriGenerator<'s> {
    schema: &'s CollectionSchema,
}

impl<'s> UriGenerator<'s> {
    /// Creates a generator for the given schema.
    #[must_use]
    pub const fn new(schema: &'s CollectionSchema) -> Self {
        Self { schema }
    }

    /// Serializes a state to its unique canonical path.
    #[must_use]
    pub fn canonicalize(&self, state: &ActiveState) -> String {
        let (pieces, op, _) = self.emit(state, None);
        assemble(&pieces, &op)
    }

    /// Canonical path of the state with one facet value added.
    #[must_use]
    pub fn add_value_uri(&self, state: &ActiveState, code: &str, value: &str) -> String {
        self.canonicalize(&state.with_facet_value(self.schema, code, value))
    }

    /// Canonical path of the state with one facet value removed.
    #[must_use]
    pub fn remove_value_uri(&self, state: &ActiveState, code: &str, value: &str) -> String {
        self.canonicalize(&state.without_facet_value(code, value))
    }

    /// Derives the full navigation surface for a state.
    #[must_use]
    pub fn links(&self, state: &ActiveState) -> Navigation {
        let offered: Vec<&str> = available_facets(state, self.schema)
            .iter()
            .map(|e| e.code())
            .collect();

        let mut available = Vec::new();
        let mut ranges = Vec::new();
        let mut flags = Vec::new();
        for entry in self.schema.entries().iter().filter(|e| e.kind().is_facet()) {
            if !offered.contains(&entry.code()) {
                continue;
            }
            match entry.kind() {
                FieldKind::String | FieldKind::Date | FieldKind::Multivalue => {
                    // An active date range is replaced by an equality pick,
                    // so the template builds on the state without it.
                    let base = match state.facet(entry.code()) {
                        Some(FacetSelection::Range { .. }) => state.without_facet(entry.code()),
                        _ => state.clone(),
                    };
                    let (before, after) = self.template(&base, entry.code(), entry.code());
                    available.push(AddTemplate {
                        code: entry.code().to_string(),
                        label: entry.label().to_string(),
                        before,
                        after,
                    });
                    if entry.kind() == FieldKind::Date {
                        ranges.push(self.range_links(state, entry));
                    }
                }
                FieldKind::Range => ranges.push(self.range_links(state, entry)),
                FieldKind::Boolean => flags.push(self.flag_links(state, entry)),
                _ => {}
            }
        }

        Navigation {
            active: self.active_links(state),
            available,
            ranges,
            flags,
            sort: self.sort_links(state),
            paging: self.paging_links(state),
        }
    }

    fn active_links(&self, state: &ActiveState) -> Vec<ActiveLink> {
        let mut active = Vec::new();
        for selection in state.facets() {
            let label = self.label_of(selection.code());
            match selection {
                FacetSelection::Value { code, values } => {
                    for value in values {
                        active.push(ActiveLink {
                            code: code.clone(),
                            label: label.clone(),
                            value: value.clone(),
                            remove: self.remove_value_uri(state, code, value),
                        });
                    }
                }
                FacetSelection::Flag { code, value } => {
                    active.push(ActiveLink {
                        code: code.clone(),
                        label,
                        value: value.to_string(),
                        remove: self.canonicalize(&state.without_facet(code)),
                    });
                }
                FacetSelection::Range { .. } => {
                    // Surfaced through the range templates instead.
                }
            }
        }
        active
    }

    fn range_links(&self, state: &ActiveState, entry: &FieldEntry) -> RangeTemplate {
        let base = state.without_facet(entry.code());
        let inserted = format!("{code}-{code}+", code = entry.code());
        let (before, after) = self.template(&base, entry.code(), &inserted);
        let selected = match state.facet(entry.code()) {
            Some(FacetSelection::Range { lower, upper, .. }) => Some((
                lower.as_ref().map(|v| v.text().to_string()),
                upper.as_ref().map(|v| v.text().to_string()),
            )),
            _ => None,
        };
        let remove = selected.is_some().then(|| self.canonicalize(&base));
        RangeTemplate {
            code: entry.code().to_string(),
            label: entry.label().to_string(),
            before,
            after,
            selected,
            remove,
        }
    }

    fn flag_links(&self, state: &ActiveState, entry: &FieldEntry) -> FlagLink {
        let selected = match state.facet(entry.code()) {
            Some(FacetSelection::Flag { value, .. }) => Some(*value),
            _ => None,
        };
        FlagLink {
            code: entry.code().to_string(),
            label: entry.label().to_string(),
            selected,
            set_true: self.canonicalize(&state.with_flag(self.schema, entry.code(), true)),
            set_false: self.canonicalize(&state.with_flag(self.schema, entry.code(), false)),
            remove: selected
                .is_some()
                .then(|| self.canonicalize(&state.without_facet(entry.code()))),
        }
    }

    fn sort_links(&self, state: &ActiveState) -> Vec<SortLink> {
        let mut sort = Vec::new();
        for entry in self.schema.entries().iter().filter(|e| e.sortable()) {
            let selected = state
                .sort()
                .iter()
                .find(|s| s.code() == entry.code())
                .map(SortEntry::direction);
            sort.push(SortLink {
                code: entry.code().to_string(),
                label: entry.label().to_string(),
                selected,
                ascending: self
                    .canonicalize(&state.with_sort(self.schema, entry.code(), SortDirection::Ascending)),
                descending: self
                    .canonicalize(&state.with_sort(self.schema, entry.code(), SortDirection::Descending)),
                remove: selected
                    .is_some()
                    .then(|| self.canonicalize(&state.without_sort(entry.code()))),
            });
        }
        sort
    }

    fn paging_links(&self, state: &ActiveState) -> PagingLinks {
        PagingLinks {
            previous: (state.page() > 1)
                .then(|| self.canonicalize(&state.with_page(state.page() - 1))),
            next: self.canonicalize(&state.with_page(state.page().saturating_add(1))),
            set: self.schema.meta(FieldKind::PageNumber).map(|entry| {
                let base = state.with_page(1);
                let (before, after) = self.template(&base, entry.code(), entry.code());
                AddTemplate {
                    code: entry.code().to_string(),
                    label: entry.label().to_string(),
                    before,
                    after,
                }
            }),
        }
    }

    fn label_of(&self, code: &str) -> String {
        self.schema
            .entry(code)
            .map_or_else(|| code.to_string(), |e| e.label().to_string())
    }

    /// Builds a `before`/`after` pair around the value slot for `code`,
    /// with `inserted` as the op text the splice contributes.
    fn template(&self, state: &ActiveState, code: &str, inserted: &str) -> (String, String) {
        let (pieces, op, insert) = self.emit(state, Some(code));
        match insert {
            Some(InsertPoint::Segment { seg, op: offset }) => {
                let mut new_op = String::with_capacity(op.len() + inserted.len());
                new_op.push_str(&op[..offset]);
                new_op.push_str(inserted);
                new_op.push_str(&op[offset..]);
                (before_of(&pieces[..seg]), after_of(&pieces[seg..], &new_op))
            }
            Some(InsertPoint::Append { seg }) => {
                let separator = self
                    .schema
                    .entry(code)
                    .map_or(',', FieldEntry::separator);
                let mut before = before_of(&pieces[..seg]);
                before.push_str(&pieces[seg]);
                before.push(separator);
                (before, after_of(&pieces[seg + 1..], &op))
            }
            // Unknown code: the slot degenerates to the end of the path,
            // which tokenizes to a dangling value and resolves away.
            None => (before_of(&pieces), after_of(&[], &op)),
        }
    }

    /// Emits value segments and the op segment in schema order, capturing
    /// the insertion point for `target` when given.
    fn emit(
        &self,
        state: &ActiveState,
        target: Option<&str>,
    ) -> (Vec<String>, String, Option<InsertPoint>) {
        let mut pieces: Vec<String> = Vec::new();
        let mut op = String::new();
        let mut insert = None;

        for entry in self.schema.entries() {
            let selection = state.facet(entry.code());
            if target == Some(entry.code()) {
                insert = match (entry.kind(), selection) {
                    (FieldKind::Multivalue, Some(FacetSelection::Value { .. })) => {
                        Some(InsertPoint::Append { seg: pieces.len() })
                    }
                    _ => Some(InsertPoint::Segment {
                        seg: pieces.len(),
                        op: op.len(),
                    }),
                };
            }
            match entry.kind() {
                FieldKind::String => {
                    if let Some(FacetSelection::Value { values, .. }) = selection {
                        if let Some(value) = values.first() {
                            pieces.push(encode_value(value));
                            op.push_str(entry.code());
                        }
                    }
                }
                FieldKind::Date => match selection {
                    Some(FacetSelection::Value { values, .. }) => {
                        if let Some(value) = values.first() {
                            pieces.push(encode_value(value));
                            op.push_str(entry.code());
                        }
                    }
                    Some(FacetSelection::Range { lower, upper, .. }) => {
                        push_bounds(
                            &mut pieces,
                            &mut op,
                            entry.code(),
                            lower.as_ref(),
                            upper.as_ref(),
                        );
                    }
                    _ => {}
                },
                FieldKind::Multivalue => {
                    if let Some(FacetSelection::Value { values, .. }) = selection {
                        if !values.is_empty() {
                            let mut encoded: Vec<String> =
                                values.iter().map(|v| encode_value(v)).collect();
                            encoded.sort_unstable();
                            pieces.push(encoded.join(&entry.separator().to_string()));
                            op.push_str(entry.code());
                        }
                    }
                }
                FieldKind::Range => {
                    if let Some(FacetSelection::Range { lower, upper, .. }) = selection {
                        push_bounds(
                            &mut pieces,
                            &mut op,
                            entry.code(),
                            lower.as_ref(),
                            upper.as_ref(),
                        );
                    }
                }
                FieldKind::Boolean => {
                    if let Some(FacetSelection::Flag { value, .. }) = selection {
                        op.push_str(entry.code());
                        op.push(if *value { '+' } else { '-' });
                    }
                }
                FieldKind::Sort => {
                    for chain in state.sort() {
                        op.push_str(entry.code());
                        op.push_str(chain.code());
                        op.push(chain.direction().marker());
                    }
                }
                FieldKind::PageNumber => {
                    if state.page() != 1 {
                        pieces.push(state.page().to_string());
                        op.push_str(entry.code());
                    }
                }
                FieldKind::PageSize => {
                    if state.page_size() != self.schema.default_page_size() {
                        pieces.push(state.page_size().to_string());
                        op.push_str(entry.code());
                    }
                }
                FieldKind::Query => {
                    if let Some(term) = state.query() {
                        pieces.push(encode_value(term));
                        op.push_str(entry.code());
                    }
                }
            }
        }

        (pieces, op, insert)
    }
}

fn push_bounds(
    pieces: &mut Vec<String>,
    op: &mut String,
    code: &str,
    lower: Option<&OrdinalValue>,
    upper: Option<&OrdinalValue>,
) {
    if let Some(bound) = lower {
        pieces.push(encode_value(bound.text()));
        op.push_str(code);
        op.push('-');
    }
    if let Some(bound) = upper {
        pieces.push(encode_value(bound.text()));
        op.push_str(code);
        op.push('+');
    }
}

fn assemble(pieces: &[String], op: &str) -> String {
    if pieces.is_empty() && op.is_empty() {
        return "/".to_string();
    }
    let mut path = String::new();
    for piece in pieces {
        path.push('/');
        path.push_str(piece);
    }
    path.push('/');
    path.push_str(op);
    path.push('/');
    path
}

fn before_of(pieces: &[String]) -> String {
    let mut before = String::from("/");
    for piece in pieces {
        before.push_str(piece);
        before.push('/');
    }
    before
}

fn after_of(pieces: &[String], op: &str) -> String {
    let mut after = String::new();
    for piece in pieces {
        after.push('/');
        after.push_str(piece);
    }
    after.push('/');
    after.push_str(op);
    after.push('/');
    after
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::resolve;
    use crate::tokenizer::Tokenizer;
    use crate::validate::{ParseConfig, validate_decimal};

    fn schema() -> CollectionSchema {
        CollectionSchema::builder("products")
            .string_facet("b", "brand").sortable()
            .string_facet("N", "name").sortable()
            .multivalue_facet("c", "colour").or_group()
            .range_facet("w", "weight")
            .date_facet("d", "released")
            .boolean_facet("a", "available")
            .string_facet("m", "material").unless(&["b"])
            .sort("s")
            .page_number("p")
            .page_size("n")
            .query("q")
            .build()
            .unwrap()
    }

    fn roundtrip(schema: &CollectionSchema, path: &str) -> ActiveState {
        let tokenizer = Tokenizer::new(schema, ParseConfig::default());
        resolve(&tokenizer.tokenize(path), schema)
    }

    #[test]
    fn empty_state_is_root() {
        let s = schema();
        let state = ActiveState::empty(&s);
        assert_eq!(UriGenerator::new(&s).canonicalize(&state), "/");
    }

    #[test]
    fn codes_emit_in_schema_order_regardless_of_input_order() {
        let s = schema();
        let generator = UriGenerator::new(&s);
        let a = roundtrip(&s, "/Black/Acme/cb/");
        let b = roundtrip(&s, "/Acme/Black/bc/");
        assert_eq!(generator.canonicalize(&a), "/Acme/Black/bc/");
        assert_eq!(generator.canonicalize(&a), generator.canonicalize(&b));
    }

    #[test]
    fn multivalue_values_emit_sorted() {
        let s = schema();
        let generator = UriGenerator::new(&s);
        let state = roundtrip(&s, "/Navy,Black/c/");
        assert_eq!(generator.canonicalize(&state), "/Black,Navy/c/");
    }

    #[test]
    fn range_emits_bound_pair() {
        let s = schema();
        let generator = UriGenerator::new(&s);
        let state = roundtrip(&s, "/17/39/w-w+/");
        assert_eq!(generator.canonicalize(&state), "/17/39/w-w+/");
    }

    #[test]
    fn date_range_canonicalizes_like_a_range() {
        let s = schema();
        let generator = UriGenerator::new(&s);
        let state = roundtrip(&s, "/2024-01-01/2024-06-30/d-d+/");
        assert_eq!(
            generator.canonicalize(&state),
            "/2024-01-01/2024-06-30/d-d+/"
        );
        assert_eq!(roundtrip(&s, &generator.canonicalize(&state)), state);
    }

    #[test]
    fn equality_pick_replaces_an_active_date_range() {
        let s = schema();
        let state = roundtrip(&s, "/2024-01-01/d-/");
        let picked = state.with_facet_value(&s, "d", "2024-03-09");
        assert_eq!(picked.facet("d").unwrap().values(), ["2024-03-09".to_string()]);
    }

    #[test]
    fn page_one_and_default_size_are_omitted() {
        let s = schema();
        let generator = UriGenerator::new(&s);
        let state = ActiveState::empty(&s).with_page(1);
        assert_eq!(generator.canonicalize(&state), "/");
        let paged = state.with_page(3).with_page_size(50);
        assert_eq!(generator.canonicalize(&paged), "/3/50/pn/");
    }

    #[test]
    fn values_are_percent_encoded() {
        let s = schema();
        let generator = UriGenerator::new(&s);
        let state = ActiveState::empty(&s).with_facet_value(&s, "b", "Bang & Olufsen");
        assert_eq!(generator.canonicalize(&state), "/Bang%20%26%20Olufsen/b/");
    }

    #[test]
    fn sort_chain_scenario() {
        let s = schema();
        let generator = UriGenerator::new(&s);
        let state = roundtrip(&s, "/sb-/");
        assert_eq!(state.sort().len(), 1);

        let links = generator.links(&state);
        let name = links.sort.iter().find(|l| l.code == "N").unwrap();
        assert_eq!(name.ascending, "/sb-sN+/");
        let brand = links.sort.iter().find(|l| l.code == "b").unwrap();
        assert_eq!(brand.ascending, "/sb+/");
        assert_eq!(brand.remove.as_deref(), Some("/"));
    }

    #[test]
    fn add_template_splices_to_the_added_state() {
        let s = schema();
        let generator = UriGenerator::new(&s);
        let state = roundtrip(&s, "/Acme/2/bp/");

        let links = generator.links(&state);
        let colour = links.available.iter().find(|t| t.code == "c").unwrap();
        let spliced = format!("{}{}{}", colour.before, encode_value("Navy"), colour.after);
        assert_eq!(
            roundtrip(&s, &spliced),
            state.with_facet_value(&s, "c", "Navy")
        );
    }

    #[test]
    fn append_template_extends_active_multivalue() {
        let s = schema();
        let generator = UriGenerator::new(&s);
        let state = roundtrip(&s, "/Black/c/");

        let links = generator.links(&state);
        let colour = links.available.iter().find(|t| t.code == "c").unwrap();
        let spliced = format!("{}{}{}", colour.before, encode_value("Navy"), colour.after);
        assert_eq!(
            roundtrip(&s, &spliced),
            state.with_facet_value(&s, "c", "Navy")
        );
    }

    #[test]
    fn range_template_splices_to_a_range_selection() {
        let s = schema();
        let generator = UriGenerator::new(&s);
        let state = roundtrip(&s, "/Acme/b/");

        let links = generator.links(&state);
        let weight = links.ranges.iter().find(|t| t.code == "w").unwrap();
        assert!(weight.remove.is_none());
        let spliced = format!("{}17/39{}", weight.before, weight.after);
        let config = ParseConfig::default();
        let expected = state.with_range(
            &s,
            "w",
            Some(validate_decimal("17", &config).unwrap()),
            Some(validate_decimal("39", &config).unwrap()),
        );
        assert_eq!(roundtrip(&s, &spliced), expected);
    }

    #[test]
    fn remove_links_drop_exactly_one_value() {
        let s = schema();
        let generator = UriGenerator::new(&s);
        let state = roundtrip(&s, "/Black,Navy/c/");

        let links = generator.links(&state);
        let navy = links
            .active
            .iter()
            .find(|l| l.code == "c" && l.value == "Navy")
            .unwrap();
        assert_eq!(roundtrip(&s, &navy.remove), roundtrip(&s, "/Black/c/"));
    }

    #[test]
    fn suppressed_facets_are_not_offered() {
        let s = schema();
        let generator = UriGenerator::new(&s);

        let free = roundtrip(&s, "/");
        assert!(generator.links(&free).available.iter().any(|t| t.code == "m"));

        let brandish = roundtrip(&s, "/Acme/b/");
        assert!(
            !generator
                .links(&brandish)
                .available
                .iter()
                .any(|t| t.code == "m")
        );
    }

    #[test]
    fn flag_links_cover_both_polarities() {
        let s = schema();
        let generator = UriGenerator::new(&s);
        let state = roundtrip(&s, "/");

        let links = generator.links(&state);
        let available = links.flags.iter().find(|l| l.code == "a").unwrap();
        assert_eq!(available.set_true, "/a+/");
        assert_eq!(available.set_false, "/a-/");
        assert_eq!(available.selected, None);

        let active = roundtrip(&s, "/a+/");
        let links = generator.links(&active);
        let flag = links.flags.iter().find(|l| l.code == "a").unwrap();
        assert_eq!(flag.selected, Some(true));
        assert_eq!(flag.remove.as_deref(), Some("/"));
    }

    #[test]
    fn paging_links_move_one_page() {
        let s = schema();
        let generator = UriGenerator::new(&s);

        let first = roundtrip(&s, "/Acme/b/");
        let links = generator.links(&first);
        assert_eq!(links.paging.previous, None);
        assert_eq!(links.paging.next, "/Acme/2/bp/");

        let third = roundtrip(&s, "/Acme/3/bp/");
        let links = generator.links(&third);
        assert_eq!(links.paging.previous.as_deref(), Some("/Acme/2/bp/"));
        assert_eq!(links.paging.next, "/Acme/4/bp/");

        let set = links.paging.set.unwrap();
        let spliced = format!("{}7{}", set.before, set.after);
        assert_eq!(roundtrip(&s, &spliced), first.with_page(7));
    }

    #[test]
    fn query_emits_and_roundtrips() {
        let s = schema();
        let generator = UriGenerator::new(&s);
        let state = roundtrip(&s, "/navy%20shoes/q/");
        assert_eq!(generator.canonicalize(&state), "/navy%20shoes/q/");
    }

    #[test]
    fn wide_codes_canonicalize() {
        let s = CollectionSchema::builder("c")
            .code_width(2)
            .string_facet("br", "brand").sortable()
            .sort("so")
            .build()
            .unwrap();
        let generator = UriGenerator::new(&s);
        let state = ActiveState::empty(&s)
            .with_facet_value(&s, "br", "Acme")
            .with_sort(&s, "br", SortDirection::Descending);
        assert_eq!(generator.canonicalize(&state), "/Acme/brsobr-/");
    }
}
