#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Memory allocators for containers that manage item lifetimes themselves.
//!
//! This crate provides two allocation strategies that hand out raw storage for items of a single
//! type, plus a trait that lets containers be generic over the strategy:
//!
//! * [`FixedAllocator<T, CAPACITY>`][FixedAllocator] - a bump allocator over one pre-sized
//!   arena. Allocations are consecutive and fail once the arena is exhausted. Deallocating
//!   anything resets the entire arena.
//! * [`ExtensiblePoolAllocator<T, POOL_SIZE>`][ExtensiblePoolAllocator] - a single-item
//!   allocator over a growing sequence of fixed-size pools with slot reuse. It never runs out
//!   of capacity; when all slots are taken, it appends another pool.
//! * [`HeapAllocator<T>`][HeapAllocator] - forwards every request to the global allocator.
//!   Containers use this when no other allocator is specified.
//!
//! All of them implement [`SlotAllocator`], which also describes how containers obtain an
//! allocator for their internal node type ([`SlotAllocator::Rebind`]) and how they obtain an
//! allocator when the container itself is copied ([`SlotAllocator::select_on_copy`]).
//!
//! The allocators never create, read or drop items. Callers write items into the storage they
//! receive and are responsible for dropping them before returning the storage.
//!
//! # Equality
//!
//! The fixed and extensible allocators compare equal when the raw bytes of their storage are
//! identical (see the type-level documentation for the exact extent compared). This makes an
//! allocator comparable as a value, independent of its identity.
//!
//! # Examples
//!
//! ```
//! use slot_alloc::{ExtensiblePoolAllocator, SlotAllocator};
//!
//! fn store_all<A: SlotAllocator<Item = u64>>(allocator: &mut A, values: &[u64]) {
//!     for value in values {
//!         let ptr = allocator.allocate(1).unwrap();
//!
//!         // SAFETY: The allocator returned storage for one u64.
//!         unsafe { ptr.write(*value) };
//!     }
//! }
//!
//! let mut allocator = ExtensiblePoolAllocator::<u64, 4>::new();
//! store_all(&mut allocator, &[1, 2, 3, 5, 8]);
//!
//! assert_eq!(allocator.allocated_count(), 5);
//! assert_eq!(allocator.capacity(), 8);
//! ```
//!
//! # Thread safety
//!
//! The allocators can be moved between threads if `T` can but are not thread-safe: all
//! mutating operations require exclusive access.

mod block;
mod builder;
mod coordinates;
mod error;
mod extensible;
mod fixed;
mod heap;
mod slot_allocator;

pub(crate) use block::*;
pub use builder::*;
pub(crate) use coordinates::*;
pub use error::Error;
pub(crate) use error::Result;
pub use extensible::ExtensiblePoolAllocator;
pub use fixed::FixedAllocator;
pub use heap::HeapAllocator;
pub use slot_allocator::SlotAllocator;
