//! Convenient re-exports for glob imports.
//!
//! This module provides a single import for all common types:
//!
//! ```rust
//! use lpse::prelude::*;
//!
//! let schema = CollectionSchema::builder("products")
//!     .string_facet("b", "brand")
//!     .build()
//!     .unwrap();
//! let tokenizer = Tokenizer::new(&schema, ParseConfig::default());
//! let state = resolve(&tokenizer.tokenize("/Black/b/"), &schema);
//! assert_eq!(UriGenerator::new(&schema).canonicalize(&state), "/Black/b/");
//! ```

pub use crate::{
    // Core types
    ActiveState, Bound, CollectionSchema, FacetSelection, FieldEntry, FieldKind, LpseToken,
    OrdinalValue, SortDirection, SortEntry,
    // Pipeline
    Explanation, Tokenizer, UriGenerator, available_facets, resolve, translate,
    // Configuration
    DecimalSeparator, ParseConfig, SchemaBuilder,
    // Backend boundary
    FilterClause, ResultPaging, SearchRequest, SortClause,
    // Navigation
    ActiveLink, AddTemplate, FlagLink, Navigation, PagingLinks, RangeTemplate, SortLink,
    // Errors and diagnostics
    ExplainLine, Reject, SchemaError,
};
