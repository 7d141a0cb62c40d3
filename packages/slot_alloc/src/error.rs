use thiserror::Error;

/// Errors returned by the allocators in this crate.
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The allocator cannot satisfy the request without exceeding its fixed capacity.
    ///
    /// The allocator state is unchanged by the failed call.
    #[error(
        "cannot allocate {requested} more items: {allocated} of {capacity} items already allocated"
    )]
    OutOfCapacity {
        /// Number of items the caller asked for.
        requested: usize,

        /// Number of items already allocated when the request was made.
        allocated: usize,

        /// The total capacity of the allocator, in items.
        capacity: usize,
    },

    /// The caller asked to allocate or deallocate an unsupported number of items at once.
    #[error("invalid item count {count}: only one item can be allocated or deallocated at a time")]
    InvalidArgument {
        /// The item count the caller provided.
        count: usize,
    },
}

/// A specialized `Result` type for allocator operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Error: Send, Sync, Debug, Copy);

    #[test]
    fn out_of_capacity_message_names_the_numbers() {
        let error = Error::OutOfCapacity {
            requested: 2,
            allocated: 3,
            capacity: 4,
        };

        assert_eq!(
            error.to_string(),
            "cannot allocate 2 more items: 3 of 4 items already allocated"
        );
    }

    #[test]
    fn invalid_argument_message_names_the_count() {
        let error = Error::InvalidArgument { count: 3 };

        let message = error.to_string();
        assert!(message.contains("invalid item count 3"));

        let result: Result<()> = Err(error);
        assert!(result.is_err());
    }
}
