//! Error type for the hard failure modes of the engine.
//!
//! Not-found and no-path results are *not* errors here — they surface as
//! empty [`crate::graph::Path`] values, per the predicate/search contract.
//! Only malformed input and I/O failures raise.

/// Errors raised by preconditions and I/O boundaries.
#[derive(thiserror::Error, Debug)]
pub enum AirwaysError {
    /// A precondition was violated: a turn-angle query on a point without a
    /// projected coordinate, or a path concatenation whose join points
    /// don't coincide.
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// Loading or saving the graph or world file failed.
    #[error("io failure: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, AirwaysError>;
