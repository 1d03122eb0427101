//! Lightweight path-state encoding for faceted search URLs.
//!
//! This crate translates between two representations of the same query
//! state: a compact, bookmarkable URL path and a structured search request.
//! A per-collection [`CollectionSchema`] assigns every query dimension — a
//! facet field, a sort field, page number, page size, the free-text query —
//! a short code and an encoding policy.
//!
//! # Pipeline
//!
//! ```text
//! raw path → Tokenizer → tokens → resolve → ActiveState → UriGenerator
//!                                              ↘ translate → SearchRequest
//! ```
//!
//! Every stage is a pure function over immutable inputs. The schema is
//! built once at startup and shared read-only; nothing in the pipeline
//! blocks, allocates shared state, or can fail on request data — malformed
//! input degrades to invalid tokens and ultimately to the default state.
//!
//! # Quick Start
//!
//! ```rust
//! use lpse::{CollectionSchema, ParseConfig, Tokenizer, UriGenerator, resolve};
//!
//! let schema = CollectionSchema::builder("products")
//!     .string_facet("b", "brand").sortable().label("Brand")
//!     .multivalue_facet("c", "colour").or_group()
//!     .range_facet("w", "weight")
//!     .sort("s")
//!     .page_number("p")
//!     .query("q")
//!     .build()
//!     .unwrap();
//!
//! let tokenizer = Tokenizer::new(&schema, ParseConfig::default());
//! let tokens = tokenizer.tokenize("/Black,Navy/17/39/cw-w+/");
//! let state = resolve(&tokens, &schema);
//!
//! let generator = UriGenerator::new(&schema);
//! assert_eq!(generator.canonicalize(&state), "/Black,Navy/17/39/cw-w+/");
//!
//! // Every link is a full canonical path for the resulting state.
//! let links = generator.links(&state);
//! assert!(!links.active.is_empty());
//! ```
//!
//! # Encoding
//!
//! A state path is `/<value-segment>*/<op-segment>/`: percent-encoded value
//! segments followed by one op segment naming, in fixed-width codes, which
//! dimension consumes each value. `/Black/2/bp/` selects brand "Black" on
//! page 2; `/sb-sN+/` sorts by brand descending, then name ascending.
//!
//! Many paths decode to the same state; [`UriGenerator::canonicalize`]
//! picks the unique spelling with codes in schema declaration order. That
//! round trip is the crate's core contract: for any state `s`,
//! `resolve(tokenize(canonicalize(s))) == s`.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod builder;
mod canonical;
mod constants;
mod delimiter;
mod error;
mod explain;
#[cfg(kani)]
mod kani_impls;
pub mod prelude;
mod resolve;
mod schema;
mod state;
mod token;
mod tokenizer;
mod translate;
mod validate;

pub use builder::SchemaBuilder;
pub use canonical::{
    ActiveLink, AddTemplate, FlagLink, Navigation, PagingLinks, RangeTemplate, SortLink,
    UriGenerator,
};
pub use constants::{
    DEFAULT_CODE_WIDTH, DEFAULT_DATE_PATTERN, DEFAULT_PAGE_SIZE, MAX_FACET_VALUES,
    MAX_PATH_LENGTH, MAX_PATH_SEGMENTS, MAX_SORT_FIELDS, MAX_VALUE_LENGTH,
};
pub use delimiter::{
    decode_value, encode_value, is_generic_delimiter, is_sub_delimiter, is_unreserved,
};
pub use error::SchemaError;
pub use explain::{ExplainLine, Explanation};
pub use resolve::{available_facets, resolve};
pub use schema::{CollectionSchema, FieldEntry, FieldKind};
pub use state::{ActiveState, FacetSelection, SortEntry};
pub use token::{Bound, LpseToken, Reject, SortDirection};
pub use tokenizer::Tokenizer;
pub use translate::{FilterClause, ResultPaging, SearchRequest, SortClause, translate};
pub use validate::{
    DecimalSeparator, OrdinalValue, ParseConfig, validate_date, validate_decimal,
    validate_number, validate_text,
};
