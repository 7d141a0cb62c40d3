use num_integer::Integer;

/// Location of a slot within the pool sequence of an extensible allocator.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct SlotCoordinates {
    /// The index of the pool containing this slot.
    pool_index: usize,

    /// The index within the pool where this slot is located.
    index_in_pool: usize,
}

impl SlotCoordinates {
    /// Splits a flat slot index (as used by the occupancy bitmap) into pool coordinates.
    #[must_use]
    pub(crate) fn from_slot(slot: usize, pool_size: usize) -> Self {
        let (pool_index, index_in_pool) = slot.div_rem(&pool_size);

        Self {
            pool_index,
            index_in_pool,
        }
    }

    /// Returns the index of the pool containing this slot.
    #[must_use]
    pub(crate) fn pool_index(&self) -> usize {
        self.pool_index
    }

    /// Returns the index within the pool where this slot is located.
    #[must_use]
    pub(crate) fn index_in_pool(&self) -> usize {
        self.index_in_pool
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn splits_flat_index() {
        let first = SlotCoordinates::from_slot(0, 4);
        assert_eq!(first.pool_index(), 0);
        assert_eq!(first.index_in_pool(), 0);

        let last_in_first_pool = SlotCoordinates::from_slot(3, 4);
        assert_eq!(last_in_first_pool.pool_index(), 0);
        assert_eq!(last_in_first_pool.index_in_pool(), 3);

        let first_in_third_pool = SlotCoordinates::from_slot(8, 4);
        assert_eq!(first_in_third_pool.pool_index(), 2);
        assert_eq!(first_in_third_pool.index_in_pool(), 0);
    }

    #[test]
    fn single_slot_pools() {
        let coordinates = SlotCoordinates::from_slot(5, 1);
        assert_eq!(coordinates.pool_index(), 5);
        assert_eq!(coordinates.index_in_pool(), 0);
    }
}
