//! Kani Arbitrary implementations and proof harnesses for property
//! verification.
//!
//! This module provides `kani::Arbitrary`-style generators for small states
//! over a fixed schema, enabling verification of the round-trip contract
//! with the Kani model checker.
//!
//! # Usage
//!
//! Kani is not a Cargo dependency. Install and run with:
//!
//! ```bash
//! cargo install --locked kani-verifier
//! cargo kani setup
//! cargo kani --features kani
//! ```
//!
//! This module is only compiled when using Kani (`#[cfg(kani)]`).

use crate::{
    ActiveState, CollectionSchema, ParseConfig, SortDirection, Tokenizer, UriGenerator, resolve,
};

/// Small value alphabet; enough to distinguish selections while keeping the
/// search space tractable.
const VALUES: [&str; 4] = ["alpha", "beta", "gamma", "delta"];

fn proof_schema() -> CollectionSchema {
    CollectionSchema::builder("proof")
        .string_facet("b", "brand")
        .sortable()
        .multivalue_facet("c", "colour")
        .or_group()
        .boolean_facet("a", "available")
        .sort("s")
        .page_number("p")
        .query("q")
        .build()
        .expect("proof schema is valid by construction")
}

fn arbitrary_value() -> &'static str {
    let idx: usize = kani::any();
    VALUES[idx % VALUES.len()]
}

fn arbitrary_direction() -> SortDirection {
    if kani::any() {
        SortDirection::Ascending
    } else {
        SortDirection::Descending
    }
}

fn arbitrary_state(schema: &CollectionSchema) -> ActiveState {
    let mut state = ActiveState::empty(schema);
    if kani::any() {
        state = state.with_facet_value(schema, "b", arbitrary_value());
    }
    if kani::any() {
        state = state.with_facet_value(schema, "c", arbitrary_value());
    }
    if kani::any() {
        state = state.with_flag(schema, "a", kani::any());
    }
    if kani::any() {
        state = state.with_sort(schema, "b", arbitrary_direction());
    }
    let page: u8 = kani::any();
    state.with_page(u64::from(page).max(1))
}

/// Proof: canonicalize then tokenize+resolve reproduces the state.
#[kani::proof]
#[kani::unwind(12)]
fn proof_canonical_roundtrip() {
    let schema = proof_schema();
    let state = arbitrary_state(&schema);

    let generator = UriGenerator::new(&schema);
    let canonical = generator.canonicalize(&state);

    let tokenizer = Tokenizer::new(&schema, ParseConfig::default());
    let resolved = resolve(&tokenizer.tokenize(&canonical), &schema);

    assert_eq!(resolved, state);
}

/// Proof: canonicalization is idempotent across a second round trip.
#[kani::proof]
#[kani::unwind(12)]
fn proof_canonical_is_stable() {
    let schema = proof_schema();
    let state = arbitrary_state(&schema);

    let generator = UriGenerator::new(&schema);
    let tokenizer = Tokenizer::new(&schema, ParseConfig::default());

    let first = generator.canonicalize(&state);
    let second = generator.canonicalize(&resolve(&tokenizer.tokenize(&first), &schema));
    assert_eq!(first, second);
}

/// Proof: adding then removing a facet value is the identity.
#[kani::proof]
#[kani::unwind(12)]
fn proof_add_remove_involution() {
    let schema = proof_schema();
    let state = arbitrary_state(&schema);
    let value = arbitrary_value();

    let added = state.with_facet_value(&schema, "c", value);
    kani::assume(!state.facet("c").is_some_and(|f| f.contains(value)));

    let removed = added.without_facet_value("c", value);
    assert_eq!(removed, state);
}

/// Proof: the empty state canonicalizes to the root path.
#[kani::proof]
fn proof_empty_state_is_root() {
    let schema = proof_schema();
    let generator = UriGenerator::new(&schema);
    assert_eq!(generator.canonicalize(&ActiveState::empty(&schema)), "/");
}
