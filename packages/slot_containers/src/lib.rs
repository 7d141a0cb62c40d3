#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Node-based containers that obtain their storage from a [`slot_alloc`] allocator.
//!
//! * [`List<T, A>`][List] - a singly linked list with a forward-only read cursor.
//! * [`OrderedMap<K, V, A>`][OrderedMap] - an ordered map stored in a binary search tree.
//!
//! Each container is generic over an allocator `A` implementing
//! [`SlotAllocator`][slot_alloc::SlotAllocator] and defaults to
//! [`HeapAllocator`][slot_alloc::HeapAllocator]. The container rebinds the allocator to its own
//! node type and requests storage for exactly one node at a time.
//!
//! Allocation failures are reported as [`Error::Allocation`] and leave the container unchanged.
//!
//! # Examples
//!
//! ```
//! use slot_alloc::{ExtensiblePoolAllocator, FixedAllocator};
//! use slot_containers::{Error, List, OrderedMap};
//!
//! let mut squares = OrderedMap::<u32, u64, ExtensiblePoolAllocator<(u32, u64), 4>>::new();
//!
//! for n in 1..=10 {
//!     squares.insert(n, u64::from(n * n)).unwrap();
//! }
//!
//! assert_eq!(squares.get(&7), Some(&49));
//!
//! let mut short = List::<u8, FixedAllocator<u8, 2>>::new();
//! short.append(1).unwrap();
//! short.append(2).unwrap();
//!
//! assert!(matches!(short.append(3), Err(Error::Allocation(_))));
//! ```

mod error;
mod list;
mod ordered_map;

pub use error::Error;
pub(crate) use error::Result;
pub use list::{List, ListNode};
pub use ordered_map::{Iter, MapNode, OrderedMap};
