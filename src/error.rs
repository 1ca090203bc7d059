//! Errors reported by the checked quad API.
//!
//! The hot-path API trusts its caller and only asserts preconditions in
//! debug builds (or with the `checked` feature). The `try_*` variants check
//! the same preconditions in every build and report them here.

use thiserror::Error;

use crate::quad::QuadType;

/// Result type for checked quad operations.
pub type Result<T> = std::result::Result<T, QuadError>;

/// A violated quad precondition.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuadError {
    #[error("quad index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("declared quad type {declared:?} is less general than the quad's points ({actual:?})")]
    TypeTooSpecific { declared: QuadType, actual: QuadType },

    #[error("rect-only query on a {0:?} quad")]
    NotRect(QuadType),
}
