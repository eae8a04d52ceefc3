mod file;
mod memory;

pub use file::*;
pub use memory::*;

use crate::Result;
use serde::{Deserialize, Serialize};

/// The persisted shape of a single named counter.
///
/// This is the only externally observable contract of a store backend:
/// one record per sequence name, holding the current high-water mark. A
/// record is created implicitly on first allocation (at value 1) and is
/// never deleted by normal operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceRecord {
    /// Sequence identifier, e.g. `"pantryIdCounter"`.
    pub name: String,
    /// Current high-water mark; the next allocation returns `value + 1`.
    pub value: u64,
}

/// The single primitive a counter store must provide.
///
/// Implementations perform one indivisible "find record by name; create it
/// at 1 if absent; otherwise increment by 1; return the post-increment
/// value" operation. Two concurrent callers for the same name must never
/// observe the same result, and no caller may observe an intermediate
/// state. All correctness of [`SequenceAllocator`] rests on this contract;
/// there is no application-level locking above it.
///
/// Counters are `u64` and never wrap: an increment past `u64::MAX` fails
/// with [`Error::SequenceExhausted`] and leaves the record unchanged.
///
/// [`SequenceAllocator`]: crate::SequenceAllocator
/// [`Error::SequenceExhausted`]: crate::Error::SequenceExhausted
pub trait SequenceStore {
    /// Atomically increments the named counter, creating it at 1 if absent,
    /// and returns the post-increment value.
    fn fetch_and_increment(&self, name: &str) -> impl Future<Output = Result<u64>> + Send;
}

// A shared reference to a store is itself a store; callers hand out
// `&store` to as many allocators as they like.
impl<S> SequenceStore for &S
where
    S: SequenceStore + Sync,
{
    fn fetch_and_increment(&self, name: &str) -> impl Future<Output = Result<u64>> + Send {
        (**self).fetch_and_increment(name)
    }
}
