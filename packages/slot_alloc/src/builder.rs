use std::marker::PhantomData;

use crate::ExtensiblePoolAllocator;

/// Builder for creating an instance of [`ExtensiblePoolAllocator`].
///
/// You only need to use this builder if you want to customize the allocator configuration.
/// The default configuration used by [`ExtensiblePoolAllocator::new()`][1] is sufficient for
/// most use cases.
///
/// # Examples
///
/// ```
/// use slot_alloc::ExtensiblePoolAllocator;
///
/// let allocator = ExtensiblePoolAllocator::<u32, 16>::builder()
///     .pool_count(4)
///     .build();
///
/// assert_eq!(allocator.capacity(), 64);
/// ```
///
/// [1]: ExtensiblePoolAllocator::new
#[must_use]
pub struct ExtensiblePoolAllocatorBuilder<T, const POOL_SIZE: usize> {
    pool_count: usize,

    _item: PhantomData<T>,
}

impl<T, const POOL_SIZE: usize> std::fmt::Debug for ExtensiblePoolAllocatorBuilder<T, POOL_SIZE> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensiblePoolAllocatorBuilder")
            .field(
                "item_type",
                &std::format_args!("{}", std::any::type_name::<T>()),
            )
            .field("pool_size", &POOL_SIZE)
            .field("pool_count", &self.pool_count)
            .finish()
    }
}

impl<T, const POOL_SIZE: usize> ExtensiblePoolAllocatorBuilder<T, POOL_SIZE> {
    pub(crate) fn new() -> Self {
        Self {
            pool_count: 1,
            _item: PhantomData,
        }
    }

    /// Sets the number of pools to allocate up front. Defaults to one.
    ///
    /// A value of zero is treated as one, as the allocator always starts with a pool.
    pub fn pool_count(mut self, pool_count: usize) -> Self {
        self.pool_count = pool_count;
        self
    }

    /// Builds the allocator with the specified configuration.
    ///
    /// # Panics
    ///
    /// Panics if `POOL_SIZE` is zero or `T` is zero-sized.
    #[must_use]
    pub fn build(self) -> ExtensiblePoolAllocator<T, POOL_SIZE> {
        ExtensiblePoolAllocator::with_pool_count(self.pool_count)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn default_builds_single_pool() {
        let allocator = ExtensiblePoolAllocator::<u64, 4>::builder().build();

        assert_eq!(allocator.pool_count(), 1);
        assert_eq!(allocator.capacity(), 4);
    }

    #[test]
    fn pool_count_is_applied() {
        let allocator = ExtensiblePoolAllocator::<u64, 4>::builder()
            .pool_count(3)
            .build();

        assert_eq!(allocator.pool_count(), 3);
        assert_eq!(allocator.capacity(), 12);
    }

    #[test]
    fn zero_pool_count_is_clamped() {
        let allocator = ExtensiblePoolAllocator::<u64, 4>::builder()
            .pool_count(0)
            .build();

        assert_eq!(allocator.pool_count(), 1);
    }

    #[test]
    fn debug_shows_configuration() {
        let builder = ExtensiblePoolAllocator::<u16, 4>::builder().pool_count(2);

        let output = format!("{builder:?}");
        assert!(output.contains("u16"));
        assert!(output.contains("pool_count: 2"));
    }
}
