//! Constants for path-state encoding and validation.

/// Maximum state path length in bytes; longer inputs are cut at the limit
/// before tokenizing, so the tail degrades to at most one invalid group.
pub const MAX_PATH_LENGTH: usize = 2048;

/// Maximum number of path segments considered per request.
pub const MAX_PATH_SEGMENTS: usize = 64;

/// Maximum decoded length of a single facet value in bytes.
pub const MAX_VALUE_LENGTH: usize = 256;

/// Maximum number of values retained per multivalue facet selection.
pub const MAX_FACET_VALUES: usize = 32;

/// Maximum number of fields in a sort chain.
pub const MAX_SORT_FIELDS: usize = 8;

/// Default LPSE code width in characters.
pub const DEFAULT_CODE_WIDTH: usize = 1;

/// Default page size when the schema does not override it.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Default date pattern for the date validator (`chrono` format syntax).
pub const DEFAULT_DATE_PATTERN: &str = "%Y-%m-%d";
