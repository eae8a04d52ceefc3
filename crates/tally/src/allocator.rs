use crate::{Error, Result, SequenceStore};
#[cfg(feature = "tracing")]
use tracing::instrument;

/// Issues unique, strictly increasing identifiers per named sequence.
///
/// The allocator is a thin service over a [`SequenceStore`]: it validates
/// the sequence name, performs exactly one store round-trip, and renders
/// the post-increment counter value as its decimal string form. It holds
/// no counter state of its own — every call goes to the store, and the
/// uniqueness guarantee rests entirely on the store's atomic
/// read-modify-write.
///
/// There are no retries and no rollback: a value that is allocated but
/// never embedded in an entity (because the owning creation flow failed
/// afterwards) is a permanent, tolerated gap in the sequence.
///
/// Construct one per store and pass it by reference to whichever
/// entity-creation workflow needs it; there is no ambient singleton.
///
/// # Example
///
/// ```
/// use tally::{MemoryStore, SequenceAllocator};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> tally::Result<()> {
/// let allocator = SequenceAllocator::new(MemoryStore::new());
/// assert_eq!(allocator.allocate("pantryIdCounter").await?, "1");
/// assert_eq!(allocator.allocate("pantryIdCounter").await?, "2");
/// # Ok(())
/// # }
/// ```
pub struct SequenceAllocator<S> {
    store: S,
}

impl<S> SequenceAllocator<S>
where
    S: SequenceStore,
{
    /// Creates an allocator backed by `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Allocates a fresh identifier for `name`, rendered as a decimal
    /// string.
    ///
    /// A never-before-seen name yields `"1"`; each subsequent call yields
    /// the next integer. Names are fully independent identifier spaces.
    ///
    /// # Errors
    /// - [`Error::InvalidSequenceName`] if `name` is empty (no store call
    ///   is made)
    /// - [`Error::StorageUnavailable`] if the store cannot complete the
    ///   atomic increment
    /// - [`Error::SequenceExhausted`] if the counter reached `u64::MAX`
    pub async fn allocate(&self, name: &str) -> Result<String> {
        Ok(self.allocate_value(name).await?.to_string())
    }

    /// Like [`Self::allocate`], but returns the raw post-increment value.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self)))]
    pub async fn allocate_value(&self, name: &str) -> Result<u64> {
        if name.is_empty() {
            return Err(Error::InvalidSequenceName {
                reason: "sequence name must be non-empty".to_owned(),
            });
        }
        self.store.fetch_and_increment(name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryStore, SequenceRecord};

    /// A store double that must never be reached.
    struct UnreachableStore;

    impl SequenceStore for UnreachableStore {
        async fn fetch_and_increment(&self, name: &str) -> Result<u64> {
            panic!("store was called for `{name}` before validation");
        }
    }

    #[tokio::test]
    async fn empty_name_fails_before_any_store_call() {
        let allocator = SequenceAllocator::new(UnreachableStore);
        let err = allocator.allocate("").await.unwrap_err();
        assert!(matches!(err, Error::InvalidSequenceName { .. }));
    }

    #[tokio::test]
    async fn values_render_as_decimal_strings() {
        let allocator = SequenceAllocator::new(MemoryStore::from_records([SequenceRecord {
            name: "pantryIdCounter".to_owned(),
            value: 41,
        }]));
        assert_eq!(allocator.allocate("pantryIdCounter").await.unwrap(), "42");
    }

    #[tokio::test]
    async fn exhausted_counter_surfaces_and_stays_put() {
        let store = MemoryStore::from_records([SequenceRecord {
            name: "badgeIdCounter".to_owned(),
            value: u64::MAX,
        }]);
        let allocator = SequenceAllocator::new(&store);

        let err = allocator.allocate("badgeIdCounter").await.unwrap_err();
        assert!(matches!(err, Error::SequenceExhausted { .. }));

        // The counter did not wrap, and other names remain usable.
        assert_eq!(store.records()[0].value, u64::MAX);
        assert_eq!(allocator.allocate("allergyIdCounter").await.unwrap(), "1");
    }
}
