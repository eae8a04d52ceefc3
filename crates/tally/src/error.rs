//! Error types for sequence allocation.
//!
//! This module defines the central `Error` enum, which captures every
//! reportable failure in the allocation system.
//!
//! ## Error Cases
//! - `StorageUnavailable`: The persisted counter store could not be reached
//!   or the atomic increment did not complete.
//! - `InvalidSequenceName`: The caller passed an empty sequence name.
//! - `InvalidInput`: An entity-creation input failed required-field
//!   validation.
//! - `SequenceExhausted`: A counter reached the end of its numeric range.

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for sequence allocation and entity creation.
#[derive(Clone, thiserror::Error, Debug)]
pub enum Error {
    /// The persisted store could not be reached, or the atomic
    /// read-modify-write did not complete.
    ///
    /// A caller that receives this must abort entity creation; it must never
    /// fall back to a cached or guessed identifier.
    #[error("Storage unavailable: {context}")]
    StorageUnavailable { context: String },

    /// The sequence name was rejected before any store call was made.
    #[error("Invalid sequence name: {reason}")]
    InvalidSequenceName { reason: String },

    /// An entity-creation input failed validation. Raised before the
    /// allocator is invoked, so a rejected input never consumes a value.
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// The named counter reached `u64::MAX`. Values are never wrapped or
    /// reused.
    #[error("Sequence `{name}` is exhausted")]
    SequenceExhausted { name: String },
}
