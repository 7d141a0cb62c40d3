use std::any::type_name;
use std::ptr::NonNull;

use slot_alloc::{HeapAllocator, SlotAllocator};
use tracing::debug;

use crate::Result;

/// A node of a [`List`]. This is an implementation detail of the list, named publicly only so
/// that the node allocator type can be spelled out.
#[derive(Debug)]
pub struct ListNode<T> {
    value: T,
    next: Option<NonNull<ListNode<T>>>,
}

// SAFETY: A node is only ever reachable through the list that owns it and the link to the next
// node is part of that ownership, so a node is as thread-mobile as its value.
unsafe impl<T: Send> Send for ListNode<T> {}

/// A singly linked list that obtains storage for its nodes from an allocator of type `A`.
///
/// The list owns an allocator of type `A::Rebind<ListNode<T>>`, which it uses to allocate
/// one node per appended value.
///
/// Values are read back with a forward-only cursor: [`next_value()`][1] returns the value
/// under the cursor and advances it. Once the cursor has reached the end, the next appended
/// value becomes the value under the cursor.
///
/// # Examples
///
/// ```
/// use slot_alloc::ExtensiblePoolAllocator;
/// use slot_containers::List;
///
/// let mut list = List::<String, ExtensiblePoolAllocator<String, 3>>::new();
///
/// list.append("first".to_string()).unwrap();
/// list.append("second".to_string()).unwrap();
///
/// assert_eq!(list.next_value().as_deref(), Some("first"));
/// assert_eq!(list.next_value().as_deref(), Some("second"));
/// assert_eq!(list.next_value(), None);
///
/// list.append("third".to_string()).unwrap();
/// assert_eq!(list.next_value().as_deref(), Some("third"));
/// ```
///
/// [1]: Self::next_value
pub struct List<T, A = HeapAllocator<T>>
where
    A: SlotAllocator<Item = T>,
{
    head: Option<NonNull<ListNode<T>>>,

    /// The node whose value `next_value()` returns next. `None` once the cursor has passed
    /// the last node (or if the list is empty).
    current: Option<NonNull<ListNode<T>>>,

    len: usize,

    node_allocator: A::Rebind<ListNode<T>>,
}

impl<T, A> List<T, A>
where
    A: SlotAllocator<Item = T>,
    A::Rebind<ListNode<T>>: Default,
{
    /// Creates an empty list with a default-constructed node allocator.
    #[must_use]
    pub fn new() -> Self {
        Self::new_in(Default::default())
    }
}

impl<T, A> List<T, A>
where
    A: SlotAllocator<Item = T>,
{
    /// Creates an empty list that allocates its nodes from `node_allocator`.
    #[must_use]
    pub fn new_in(node_allocator: A::Rebind<ListNode<T>>) -> Self {
        Self {
            head: None,
            current: None,
            len: 0,
            node_allocator,
        }
    }

    /// Appends a value to the end of the list.
    ///
    /// Finding the end of the list takes time proportional to its length.
    ///
    /// # Errors
    ///
    /// Returns an error if the allocator cannot provide storage for another node. The list is
    /// unchanged and `value` is dropped in that case.
    pub fn append(&mut self, value: T) -> Result<()> {
        let node = self.node_allocator.allocate(1)?;

        // SAFETY: The allocator returned storage for one node that nothing else refers to.
        unsafe {
            node.write(ListNode { value, next: None });
        }

        match self.head {
            None => {
                self.head = Some(node);
                self.current = Some(node);
            }
            Some(head) => {
                let mut last = head;

                // SAFETY: Every node reachable from `head` was initialized by `append()` and is
                // owned by this list, which we hold exclusively.
                while let Some(next) = unsafe { last.as_ref() }.next {
                    last = next;
                }

                // SAFETY: As above; `last` is a live node owned by this list.
                unsafe { last.as_mut() }.next = Some(node);

                if self.current.is_none() {
                    self.current = Some(node);
                }
            }
        }

        // Cannot overflow because every node occupies memory.
        self.len = self.len.wrapping_add(1);

        Ok(())
    }

    /// Returns a copy of the value under the cursor and advances the cursor, or returns `None`
    /// if the cursor has reached the end of the list.
    pub fn next_value(&mut self) -> Option<T>
    where
        T: Clone,
    {
        let current = self.current?;

        // SAFETY: The cursor only ever points to live nodes owned by this list.
        let node = unsafe { current.as_ref() };

        self.current = node.next;
        Some(node.value.clone())
    }

    /// Moves the cursor back to the first value of the list.
    pub fn back_to_head(&mut self) {
        self.current = self.head;
    }

    /// Whether the cursor points at the first value of the list.
    ///
    /// An empty list is considered to be on its head.
    #[must_use]
    pub fn on_head(&self) -> bool {
        self.head == self.current
    }

    /// The number of values in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the list contains no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The allocator the list obtains node storage from.
    #[must_use]
    pub fn allocator(&self) -> &A::Rebind<ListNode<T>> {
        &self.node_allocator
    }
}

// SAFETY: The list exclusively owns its nodes and the values in them, so moving the list to
// another thread moves the values and the node storage with it.
unsafe impl<T, A> Send for List<T, A>
where
    T: Send,
    A: SlotAllocator<Item = T>,
    A::Rebind<ListNode<T>>: Send,
{
}

impl<T, A> Default for List<T, A>
where
    A: SlotAllocator<Item = T>,
    A::Rebind<ListNode<T>>: Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, A> Drop for List<T, A>
where
    A: SlotAllocator<Item = T>,
{
    fn drop(&mut self) {
        let mut next = self.head.take();
        self.current = None;

        while let Some(node) = next {
            // SAFETY: The node is live and owned by this list. We read its link before
            // dropping it and never touch it again afterwards.
            next = unsafe { node.as_ref() }.next;

            // SAFETY: As above. Each node is dropped exactly once as we walk the chain.
            unsafe {
                node.drop_in_place();
            }

            // SAFETY: The node came from `allocate(1)` on this allocator and is released once.
            if let Err(error) = unsafe { self.node_allocator.deallocate(node, 1) } {
                debug!(
                    item = type_name::<T>(),
                    %error,
                    "failed to release list node storage"
                );
            }
        }
    }
}

impl<T, A> std::fmt::Debug for List<T, A>
where
    T: std::fmt::Debug,
    A: SlotAllocator<Item = T>,
    A::Rebind<ListNode<T>>: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut values = Vec::with_capacity(self.len);
        let mut next = self.head;

        while let Some(node) = next {
            // SAFETY: Every node reachable from `head` is live and owned by this list.
            let node = unsafe { node.as_ref() };
            values.push(&node.value);
            next = node.next;
        }

        f.debug_struct("List")
            .field("values", &values)
            .field("len", &self.len)
            .field("on_head", &self.on_head())
            .field("node_allocator", &self.node_allocator)
            .finish()
    }
}

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

    assert_impl_all!(List<u32>: Send);
    assert_impl_all!(List<u32, ExtensiblePoolAllocator<u32, 4>>: Send);
    assert_not_impl_any!(List<Rc<u32>>: Send);
    assert_not_impl_any!(List<u32>: Sync, Clone);

    #[test]
    fn empty_list() {
        let mut list = List::<u32>::new();

        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert!(list.on_head());
        assert_eq!(list.next_value(), None);
    }

    #[test]
    fn values_come_back_in_order() {
        let mut list = List::<u32, ExtensiblePoolAllocator<u32, 2>>::new();

        for value in 0..5 {
            list.append(value).unwrap();
        }

        assert_eq!(list.len(), 5);
        assert_eq!(list.allocator().allocated_count(), 5);
        assert_eq!(list.allocator().capacity(), 6);

        let values = std::iter::from_fn(|| list.next_value()).collect::<Vec<_>>();
        assert_eq!(values, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn cursor_picks_up_values_appended_at_end() {
        let mut list = List::<String, ExtensiblePoolAllocator<String, 3>>::new();

        list.append("first".to_string()).unwrap();
        list.append("second".to_string()).unwrap();
        list.append("third".to_string()).unwrap();

        assert_eq!(list.next_value().as_deref(), Some("first"));
        assert_eq!(list.next_value().as_deref(), Some("second"));
        assert_eq!(list.next_value().as_deref(), Some("third"));

        list.append("fourth".to_string()).unwrap();

        assert_eq!(list.next_value().as_deref(), Some("fourth"));
        assert_eq!(list.next_value(), None);
    }

    #[test]
    fn cursor_does_not_skip_ahead_when_mid_list() {
        let mut list = List::<u32>::new();

        list.append(1).unwrap();
        list.append(2).unwrap();

        assert_eq!(list.next_value(), Some(1));

        list.append(3).unwrap();

        assert_eq!(list.next_value(), Some(2));
        assert_eq!(list.next_value(), Some(3));
    }

    #[test]
    fn back_to_head_restarts_cursor() {
        let mut list = List::<u32>::new();

        list.append(10).unwrap();
        list.append(20).unwrap();
        assert!(list.on_head());

        assert_eq!(list.next_value(), Some(10));
        assert!(!list.on_head());

        list.back_to_head();
        assert!(list.on_head());
        assert_eq!(list.next_value(), Some(10));
        assert_eq!(list.next_value(), Some(20));
    }

    #[test]
    fn fixed_allocator_limits_length() {
        let mut list = List::<u64, FixedAllocator<u64, 2>>::new();

        list.append(1).unwrap();
        list.append(2).unwrap();

        let error = list.append(3).unwrap_err();
        assert!(matches!(
            error,
            Error::Allocation(AllocError::OutOfCapacity { capacity: 2, .. })
        ));

        assert_eq!(list.len(), 2);
        assert_eq!(list.next_value(), Some(1));
        assert_eq!(list.next_value(), Some(2));
        assert_eq!(list.next_value(), None);
    }

    #[test]
    fn drop_releases_values_and_storage() {
        #[derive(Clone)]
        struct Tracked(Rc<Cell<usize>>);

        impl Drop for Tracked {
            fn drop(&mut self) {
                self.0.set(self.0.get() + 1);
            }
        }

        let drops = Rc::new(Cell::new(0));

        {
            let mut list = List::<Tracked>::new();

            for _ in 0..4 {
                list.append(Tracked(Rc::clone(&drops))).unwrap();
            }

            assert_eq!(list.allocator().allocated_count(), 4);
        }

        assert_eq!(drops.get(), 4);
    }

    #[test]
    fn new_in_uses_given_allocator() {
        let node_allocator = ExtensiblePoolAllocator::<ListNode<u32>, 4>::with_pool_count(3);

        let mut list = List::<u32, ExtensiblePoolAllocator<u32, 4>>::new_in(node_allocator);
        list.append(7).unwrap();

        assert_eq!(list.allocator().pool_count(), 3);
        assert_eq!(list.allocator().allocated_count(), 1);
    }

    #[test]
    fn debug_lists_values() {
        let mut list = List::<u32>::new();
        list.append(4).unwrap();
        list.append(2).unwrap();

        let output = format!("{list:?}");
        assert!(output.contains("[4, 2]"));
    }
}
