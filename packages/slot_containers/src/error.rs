use thiserror::Error;

/// Errors that can occur when modifying a container.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The container's allocator could not provide storage for a new node.
    ///
    /// The container is unchanged by the failed operation.
    #[error("container allocator failed: {0}")]
    Allocation(#[from] slot_alloc::Error),
}

/// A specialized `Result` type for container operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Error: Send, Sync, Debug);

    #[test]
    fn wraps_allocator_error() {
        let error = Error::from(slot_alloc::Error::InvalidArgument { count: 2 });

        assert!(matches!(
            error,
            Error::Allocation(slot_alloc::Error::InvalidArgument { count: 2 })
        ));
        assert!(error.to_string().starts_with("container allocator failed: "));
    }
}
