use std::any::type_name;
use std::cmp::Ordering;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

use slot_alloc::{HeapAllocator, SlotAllocator};
use tracing::debug;

use crate::Result;

type Link<K, V> = Option<NonNull<MapNode<K, V>>>;

/// A node of an [`OrderedMap`]. This is an implementation detail of the map, named publicly
/// only so that the node allocator type can be spelled out.
#[derive(Debug)]
pub struct MapNode<K, V> {
    key: K,
    value: V,
    left: Link<K, V>,
    right: Link<K, V>,
}

// SAFETY: A node is only ever reachable through the map that owns it and the child links are
// part of that ownership, so a node is as thread-mobile as its entry.
unsafe impl<K: Send, V: Send> Send for MapNode<K, V> {}

/// Outcome of searching the tree for a key.
enum Search<K, V> {
    Found(NonNull<MapNode<K, V>>),

    /// The key is absent. The pointer refers to the empty link where a node with the key
    /// would be attached.
    Vacant(NonNull<Link<K, V>>),
}

/// An ordered map from keys to values, stored in a binary search tree whose nodes are
/// allocated one at a time from an allocator of type `A`.
///
/// The map owns an allocator of type `A::Rebind<MapNode<K, V>>` and requests storage for
/// exactly one node per `allocate(1)` call, returning it with `deallocate(ptr, 1)` when the
/// map is dropped. The tree is not rebalanced.
///
/// Cloning the map does not clone the allocator: the copy obtains its allocator via
/// [`SlotAllocator::select_on_copy`] and allocates all of its nodes from scratch. Moving or
/// [swapping][1] maps moves the allocators together with the contents.
///
/// # Examples
///
/// ```
/// use slot_alloc::ExtensiblePoolAllocator;
/// use slot_containers::OrderedMap;
///
/// let mut map = OrderedMap::<u32, String, ExtensiblePoolAllocator<(u32, String), 3>>::new();
///
/// map.insert(2, "two".to_string()).unwrap();
/// map.insert(1, "one".to_string()).unwrap();
///
/// assert_eq!(map.get(&1).map(String::as_str), Some("one"));
/// assert_eq!(map.keys_in_order(), vec![1, 2]);
///
/// let copy = map.clone();
/// assert_eq!(copy, map);
/// ```
///
/// [1]: Self::swap
pub struct OrderedMap<K, V, A = HeapAllocator<(K, V)>>
where
    A: SlotAllocator<Item = (K, V)>,
{
    root: Link<K, V>,

    len: usize,

    node_allocator: A::Rebind<MapNode<K, V>>,
}

impl<K, V, A> OrderedMap<K, V, A>
where
    K: Ord,
    A: SlotAllocator<Item = (K, V)>,
    A::Rebind<MapNode<K, V>>: Default,
{
    /// Creates an empty map with a default-constructed node allocator.
    #[must_use]
    pub fn new() -> Self {
        Self::new_in(Default::default())
    }
}

impl<K, V, A> OrderedMap<K, V, A>
where
    K: Ord,
    A: SlotAllocator<Item = (K, V)>,
{
    /// Creates an empty map that allocates its nodes from `node_allocator`.
    #[must_use]
    pub fn new_in(node_allocator: A::Rebind<MapNode<K, V>>) -> Self {
        Self {
            root: None,
            len: 0,
            node_allocator,
        }
    }

    fn search(&mut self, key: &K) -> Search<K, V> {
        let mut link = NonNull::from(&mut self.root);

        loop {
            // SAFETY: `link` points either at `self.root` or at a child link of a live node
            // owned by this map, which we hold exclusively.
            let Some(node) = (unsafe { link.read() }) else {
                return Search::Vacant(link);
            };

            let node_ptr = node.as_ptr();

            // SAFETY: `node` is a live node owned by this map.
            match key.cmp(unsafe { &(*node_ptr).key }) {
                Ordering::Equal => return Search::Found(node),
                // SAFETY: `node` is a live node owned by this map; we only take the address
                // of its child link without creating a reference to the node.
                Ordering::Less => {
                    link = unsafe { NonNull::new_unchecked(&raw mut (*node_ptr).left) };
                }
                // SAFETY: As above.
                Ordering::Greater => {
                    link = unsafe { NonNull::new_unchecked(&raw mut (*node_ptr).right) };
                }
            }
        }
    }

    fn find(&self, key: &K) -> Link<K, V> {
        let mut cursor = self.root;

        while let Some(node) = cursor {
            // SAFETY: Every node reachable from `root` is live and owned by this map.
            let node_ref = unsafe { node.as_ref() };

            cursor = match key.cmp(&node_ref.key) {
                Ordering::Equal => return Some(node),
                Ordering::Less => node_ref.left,
                Ordering::Greater => node_ref.right,
            };
        }

        None
    }

    /// Allocates a node for the entry and attaches it to the empty `link`.
    ///
    /// Takes the fields it modifies separately so that `link`, which may point into
    /// `self.root`, stays valid.
    fn attach(
        node_allocator: &mut A::Rebind<MapNode<K, V>>,
        len: &mut usize,
        link: NonNull<Link<K, V>>,
        key: K,
        value: V,
    ) -> Result<NonNull<MapNode<K, V>>> {
        let node = node_allocator.allocate(1)?;

        // SAFETY: The allocator returned storage for one node that nothing else refers to.
        unsafe {
            node.write(MapNode {
                key,
                value,
                left: None,
                right: None,
            });
        }

        // SAFETY: `link` came from `search()` on this map and no node has been added or
        // removed since, so it still points at an empty link owned by this map.
        unsafe {
            link.write(Some(node));
        }

        // Cannot overflow because every node occupies memory.
        *len = len.wrapping_add(1);

        Ok(node)
    }

    /// Inserts a key-value pair, returning the previous value if the key was present.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is absent and the allocator cannot provide storage for a
    /// new node. The map is unchanged in that case.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>> {
        match self.search(&key) {
            Search::Found(mut node) => {
                // SAFETY: The node is live and owned by this map, which we hold exclusively.
                let existing = unsafe { &mut node.as_mut().value };
                Ok(Some(mem::replace(existing, value)))
            }
            Search::Vacant(link) => {
                Self::attach(&mut self.node_allocator, &mut self.len, link, key, value)?;
                Ok(None)
            }
        }
    }

    /// Returns a mutable reference to the value for `key`, inserting the value produced by
    /// `make_value` first if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is absent and the allocator cannot provide storage for a
    /// new node. The map is unchanged in that case.
    pub fn get_or_insert_with(&mut self, key: K, make_value: impl FnOnce() -> V) -> Result<&mut V> {
        let mut node = match self.search(&key) {
            Search::Found(node) => node,
            Search::Vacant(link) => Self::attach(
                &mut self.node_allocator,
                &mut self.len,
                link,
                key,
                make_value(),
            )?,
        };

        // SAFETY: The node is live and owned by this map. The returned reference borrows the
        // map exclusively, so the node cannot be dropped while the reference exists.
        Ok(unsafe { &mut node.as_mut().value })
    }

    /// Returns a reference to the value for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        // SAFETY: The node is live and owned by this map. The returned reference borrows the
        // map, so the node cannot be dropped while the reference exists.
        self.find(key).map(|node| unsafe { &node.as_ref().value })
    }

    /// Returns a mutable reference to the value for `key`, if present.
    #[must_use]
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        // SAFETY: As in `get()`, with the map borrowed exclusively.
        self.find(key)
            .map(|mut node| unsafe { &mut node.as_mut().value })
    }

    /// Whether the map contains a value for `key`.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Returns the keys of the map in ascending order.
    #[must_use]
    pub fn keys_in_order(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.iter().map(|(key, _)| key.clone()).collect()
    }

    /// Creates a copy of the map whose nodes are allocated from a fresh allocator obtained via
    /// [`SlotAllocator::select_on_copy`].
    ///
    /// The copy has the same tree shape as the original.
    ///
    /// # Errors
    ///
    /// Returns an error if the new allocator cannot provide storage for every node.
    pub fn try_clone(&self) -> Result<Self>
    where
        K: Clone,
        V: Clone,
    {
        let mut copy = Self::new_in(self.node_allocator.select_on_copy());

        // Pre-order traversal re-creates the same tree shape in the copy.
        let mut pending = Vec::from_iter(self.root);

        while let Some(node) = pending.pop() {
            // SAFETY: Every node reachable from `root` is live and owned by this map.
            let node = unsafe { node.as_ref() };

            copy.insert(node.key.clone(), node.value.clone())?;

            pending.extend(node.right);
            pending.extend(node.left);
        }

        Ok(copy)
    }

    /// Exchanges the contents of two maps, including their allocators.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }
}

impl<K, V, A> OrderedMap<K, V, A>
where
    A: SlotAllocator<Item = (K, V)>,
{
    /// The number of entries in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the map contains no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns an iterator over the entries of the map in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.root, self.len)
    }

    /// The allocator the map obtains node storage from.
    #[must_use]
    pub fn allocator(&self) -> &A::Rebind<MapNode<K, V>> {
        &self.node_allocator
    }
}

// SAFETY: The map exclusively owns its nodes and the entries in them, so moving the map to
// another thread moves the entries and the node storage with it.
unsafe impl<K, V, A> Send for OrderedMap<K, V, A>
where
    K: Send,
    V: Send,
    A: SlotAllocator<Item = (K, V)>,
    A::Rebind<MapNode<K, V>>: Send,
{
}

impl<K, V, A> Default for OrderedMap<K, V, A>
where
    K: Ord,
    A: SlotAllocator<Item = (K, V)>,
    A::Rebind<MapNode<K, V>>: Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, A> Clone for OrderedMap<K, V, A>
where
    K: Ord + Clone,
    V: Clone,
    A: SlotAllocator<Item = (K, V)>,
{
    /// # Panics
    ///
    /// Panics if the allocator of the copy cannot provide storage for every entry. Use
    /// [`try_clone()`][OrderedMap::try_clone] to handle this case.
    fn clone(&self) -> Self {
        self.try_clone()
            .expect("allocator of the copied map must have room for every entry")
    }
}

impl<K, V, A> PartialEq for OrderedMap<K, V, A>
where
    K: PartialEq,
    V: PartialEq,
    A: SlotAllocator<Item = (K, V)>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<K, V, A> Eq for OrderedMap<K, V, A>
where
    K: Eq,
    V: Eq,
    A: SlotAllocator<Item = (K, V)>,
{
}

impl<K, V, A> Drop for OrderedMap<K, V, A>
where
    A: SlotAllocator<Item = (K, V)>,
{
    fn drop(&mut self) {
        let mut pending = Vec::from_iter(self.root.take());

        while let Some(node) = pending.pop() {
            // SAFETY: The node is live and owned by this map. We read its links before
            // dropping it and never touch it again afterwards.
            let (left, right) = unsafe {
                let node_ref = node.as_ref();
                (node_ref.left, node_ref.right)
            };

            pending.extend(left);
            pending.extend(right);

            // SAFETY: As above. Each node is reachable through exactly one link, so it is
            // dropped exactly once.
            unsafe {
                node.drop_in_place();
            }

            // SAFETY: The node came from `allocate(1)` on this allocator and is released once.
            if let Err(error) = unsafe { self.node_allocator.deallocate(node, 1) } {
                debug!(
                    key = type_name::<K>(),
                    value = type_name::<V>(),
                    %error,
                    "failed to release map node storage"
                );
            }
        }

        self.len = 0;
    }
}

impl<K, V, A> std::fmt::Debug for OrderedMap<K, V, A>
where
    K: std::fmt::Debug,
    V: std::fmt::Debug,
    A: SlotAllocator<Item = (K, V)>,
    A::Rebind<MapNode<K, V>>: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        struct Entries<'a, K, V>(Iter<'a, K, V>);

        impl<K: std::fmt::Debug, V: std::fmt::Debug> std::fmt::Debug for Entries<'_, K, V> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_map().entries(self.0.clone()).finish()
            }
        }

        f.debug_struct("OrderedMap")
            .field("entries", &Entries(self.iter()))
            .field("len", &self.len)
            .field("node_allocator", &self.node_allocator)
            .finish()
    }
}

impl<'a, K, V, A> IntoIterator for &'a OrderedMap<K, V, A>
where
    A: SlotAllocator<Item = (K, V)>,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the entries of an [`OrderedMap`] in ascending key order.
///
/// Created by [`OrderedMap::iter()`].
#[derive(Debug)]
pub struct Iter<'a, K, V> {
    /// Nodes whose own entry and right subtree are yet to be visited, innermost last.
    pending: Vec<NonNull<MapNode<K, V>>>,

    remaining: usize,

    _map: PhantomData<&'a MapNode<K, V>>,
}

impl<K, V> Iter<'_, K, V> {
    fn new(root: Link<K, V>, len: usize) -> Self {
        let mut iter = Self {
            pending: Vec::new(),
            remaining: len,
            _map: PhantomData,
        };

        iter.descend_left(root);
        iter
    }

    fn descend_left(&mut self, mut link: Link<K, V>) {
        while let Some(node) = link {
            self.pending.push(node);

            // SAFETY: The iterator borrows the map, so every reachable node stays live.
            link = unsafe { node.as_ref() }.left;
        }
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            pending: self.pending.clone(),
            remaining: self.remaining,
            _map: PhantomData,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.pending.pop()?;

        // SAFETY: The iterator borrows the map for 'a, so the node stays live for 'a.
        let node: &'a MapNode<K, V> = unsafe { node.as_ref() };

        self.descend_left(node.right);
        self.remaining = self.remaining.saturating_sub(1);

        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

#[cfg(test)]
#[allow(
    clippy::undocumented_unsafe_blocks,
    reason = "test code doesn't need the same safety rigor as production code"
)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use slot_alloc::{Error as AllocError, ExtensiblePoolAllocator, FixedAllocator};
    use static_assertions::{assert_impl_all, assert_not_impl_any};

    use super::*;
    use crate::Error;

    assert_impl_all!(OrderedMap<u32, String>: Send);
    assert_impl_all!(PoolMap: Send, Clone, Eq);
    assert_not_impl_any!(OrderedMap<u32, Rc<u32>>: Send);
    assert_not_impl_any!(OrderedMap<u32, u32>: Sync);

    type PoolMap = OrderedMap<u32, String, ExtensiblePoolAllocator<(u32, String), 3>>;
    type FixedMap = OrderedMap<u32, String, FixedAllocator<(u32, String), 3>>;

    #[test]
    fn empty_map() {
        let map = OrderedMap::<u32, u32>::new();

        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
        assert_eq!(map.get(&1), None);
        assert_eq!(map.iter().next(), None);
    }

    #[test]
    fn insert_and_get() {
        let mut map = PoolMap::new();

        assert_eq!(map.insert(5, "five".to_string()).unwrap(), None);
        assert_eq!(map.insert(3, "three".to_string()).unwrap(), None);
        assert_eq!(map.insert(8, "eight".to_string()).unwrap(), None);

        assert_eq!(map.len(), 3);
        assert_eq!(map.get(&3).map(String::as_str), Some("three"));
        assert_eq!(map.get(&5).map(String::as_str), Some("five"));
        assert_eq!(map.get(&8).map(String::as_str), Some("eight"));
        assert_eq!(map.get(&4), None);
        assert!(map.contains_key(&8));
        assert!(!map.contains_key(&9));
    }

    #[test]
    fn insert_existing_key_replaces_value() {
        let mut map = PoolMap::new();

        map.insert(1, "one".to_string()).unwrap();
        let previous = map.insert(1, "uno".to_string()).unwrap();

        assert_eq!(previous.as_deref(), Some("one"));
        assert_eq!(map.len(), 1);
        assert_eq!(map.allocator().allocated_count(), 1);
        assert_eq!(map.get(&1).map(String::as_str), Some("uno"));
    }

    #[test]
    fn iterates_in_key_order() {
        let mut map = OrderedMap::<i32, i32>::new();

        for key in [50, 20, 70, 10, 30, 60, 80, 25] {
            map.insert(key, key * 2).unwrap();
        }

        let entries = map.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>();
        assert_eq!(
            entries,
            vec![
                (10, 20),
                (20, 40),
                (25, 50),
                (30, 60),
                (50, 100),
                (60, 120),
                (70, 140),
                (80, 160)
            ]
        );
        assert_eq!(map.iter().len(), 8);
        assert_eq!(map.keys_in_order(), vec![10, 20, 25, 30, 50, 60, 70, 80]);
    }

    #[test]
    fn get_mut_modifies_value() {
        let mut map = OrderedMap::<u32, u32>::new();
        map.insert(1, 10).unwrap();

        *map.get_mut(&1).unwrap() += 5;

        assert_eq!(map.get(&1), Some(&15));
        assert_eq!(map.get_mut(&2), None);
    }

    #[test]
    fn get_or_insert_with_inserts_once() {
        let mut map = PoolMap::new();

        map.get_or_insert_with(0, String::new).unwrap().push_str("test0");
        map.get_or_insert_with(0, || unreachable!()).unwrap().push('!');

        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&0).map(String::as_str), Some("test0!"));
    }

    #[test]
    fn clone_uses_fresh_allocator() {
        let mut map1 = FixedMap::new();
        map1.insert(0, "test0".to_string()).unwrap();
        map1.insert(1, "test1".to_string()).unwrap();

        let mut map2 = map1.clone();

        assert_eq!(map1, map2);
        assert_eq!(map2.allocator().allocated_count(), 2);

        map2.insert(2, "test2".to_string()).unwrap();

        assert_eq!(map1.len(), 2);
        assert_eq!(map2.len(), 3);
        assert_ne!(map1, map2);
        assert_eq!(map1.allocator().allocated_count(), 2);

        let error = map2.insert(3, "test3".to_string()).unwrap_err();
        assert!(matches!(
            error,
            Error::Allocation(AllocError::OutOfCapacity { .. })
        ));
        assert_eq!(map2.len(), 3);
        assert!(!map2.contains_key(&3));
    }

    #[test]
    fn clone_preserves_shape() {
        let mut map = PoolMap::new();

        for key in [4, 2, 6, 1, 3, 5, 7] {
            map.insert(key, key.to_string()).unwrap();
        }

        let copy = map.try_clone().unwrap();

        // The root of a copy made in pre-order is the original root.
        let root_key = unsafe { copy.root.unwrap().as_ref() }.key;
        assert_eq!(root_key, 4);
        assert_eq!(copy, map);
    }

    #[test]
    fn swap_exchanges_allocators() {
        let mut small = PoolMap::new();
        small.insert(1, "one".to_string()).unwrap();

        let mut large = PoolMap::new();
        for key in 0..7 {
            large.insert(key, key.to_string()).unwrap();
        }

        small.swap(&mut large);

        assert_eq!(small.len(), 7);
        assert_eq!(small.allocator().capacity(), 9);
        assert_eq!(large.len(), 1);
        assert_eq!(large.allocator().capacity(), 3);
    }

    #[test]
    fn drop_releases_every_value() {
        #[derive(Clone)]
        struct Tracked(Rc<Cell<usize>>);

        impl Drop for Tracked {
            fn drop(&mut self) {
                self.0.set(self.0.get() + 1);
            }
        }

        let drops = Rc::new(Cell::new(0));

        {
            let mut map = OrderedMap::<u32, Tracked>::new();

            for key in [3, 1, 4, 0, 2, 5] {
                map.insert(key, Tracked(Rc::clone(&drops))).unwrap();
            }

            // Replacing drops the previous value immediately.
            drop(map.insert(4, Tracked(Rc::clone(&drops))).unwrap());
            assert_eq!(drops.get(), 1);
        }

        assert_eq!(drops.get(), 7);
    }

    #[test]
    fn debug_lists_entries() {
        let mut map = OrderedMap::<u32, &str>::new();
        map.insert(2, "b").unwrap();
        map.insert(1, "a").unwrap();

        let output = format!("{map:?}");
        assert!(output.contains(r#"{1: "a", 2: "b"}"#));
    }
}
