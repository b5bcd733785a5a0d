//! Singly linked lists with nodes drawn from a [`NodePool`].
//!
//! A [`List`] exclusively owns its pool and threads allocated slots together
//! through their link fields, starting at a head index. Nodes are identified
//! by the slot index they occupy; an index stays valid until its node is
//! deleted, after which the slot goes back on the free chain and may be
//! handed out again.
//!
//! # Examples
//! ```
//! use pooled_list::InlineList;
//!
//! let mut list = InlineList::<&str, 8>::new();
//! list.insert_sorted("pear").unwrap();
//! list.insert_sorted("apple").unwrap();
//! let fig = list.insert_sorted("fig").unwrap();
//!
//! list.insert_after(fig, "grape").unwrap();
//! assert!(list.iter().eq(["apple", "fig", "grape", "pear"].iter()));
//!
//! assert_eq!(list.delete_after(fig), Ok("grape"));
//! assert_eq!(list.to_string(), "apple fig pear\nfree list head: 3");
//! ```

use core::fmt::{self, Debug, Display, Formatter};
use core::iter::FusedIterator;

use crate::error::{Error, Result};
use crate::pool::{NodePool, Slot};
use crate::storage::{Capacity, InlineStorage, OwnedStorage, SliceStorage, SlotStorage};

/// Node count used by the interactive tester and a sensible default for
/// inline lists.
pub const DEFAULT_CAPACITY: usize = 2048;

/// A singly linked list backed by a fixed-capacity node pool.
///
/// All slots allocated from the pool belong to this list, so any occupied
/// slot index is a valid position for [`insert_after`](List::insert_after)
/// and [`delete_after`](List::delete_after).
pub struct List<T, S: SlotStorage<T, I>, I: Capacity = usize> {
    pool: NodePool<T, S, I>,
    head: I,
}

impl<T, S: SlotStorage<T, I>, I: Capacity> From<S> for List<T, S, I> {
    #[track_caller]
    fn from(buf: S) -> Self {
        List {
            pool: NodePool::from(buf),
            head: I::NONE,
        }
    }
}

impl<T, S: SlotStorage<T, I>, I: Capacity> List<T, S, I> {
    /// Returns the number of elements the list can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    /// Returns [`true`] if the list contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head == I::NONE
    }

    /// Returns [`true`] if no further element can be inserted.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.pool.is_full()
    }

    /// Returns the number of elements in the list.
    ///
    /// This walks the whole chain and takes O(n) time.
    pub fn len(&self) -> usize {
        self.indexed().count()
    }

    /// Returns the first slot of the pool's free chain.
    #[inline]
    pub fn free_head(&self) -> Option<I> {
        self.pool.free_head()
    }

    /// Returns the underlying pool for inspection.
    #[inline]
    pub fn pool(&self) -> &NodePool<T, S, I> {
        &self.pool
    }

    /// Returns the index of the first node.
    #[inline]
    pub fn head(&self) -> Option<I> {
        if self.is_empty() {
            None
        } else {
            Some(self.head)
        }
    }

    /// Returns a reference to the first element.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.head().and_then(|head| self.pool.get(head))
    }

    /// Returns the element stored at `index`, or [`None`] if no node of this
    /// list occupies that slot.
    #[inline]
    pub fn get(&self, index: I) -> Option<&T> {
        self.pool.get(index)
    }

    /// Returns the element stored at `index` mutably.
    #[inline]
    pub fn get_mut(&mut self, index: I) -> Option<&mut T> {
        self.pool.get_mut(index)
    }

    /// Returns an iterator over the elements, from head to tail.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T, I> {
        Iter {
            inner: self.indexed(),
        }
    }

    /// Returns an iterator over `(index, element)` pairs, from head to tail.
    #[inline]
    pub fn indexed(&self) -> Indexed<'_, T, I> {
        Indexed {
            slots: self.pool.slots(),
            cursor: self.head,
        }
    }

    /// Calls `visit` on every element, from head to tail.
    pub fn traverse<F: FnMut(&T)>(&self, visit: F) {
        self.iter().for_each(visit)
    }

    /// Returns the index of the first node equal to `value`.
    ///
    /// # Examples
    /// ```
    /// let mut list = pooled_list::InlineList::<char, 4>::new();
    /// list.insert_front('n').unwrap();
    /// let m = list.insert_front('m').unwrap();
    /// list.insert_front('k').unwrap();
    ///
    /// assert_eq!(list.find(&'m'), Some(m));
    /// assert_eq!(list.find(&'z'), None);
    /// ```
    pub fn find(&self, value: &T) -> Option<I>
    where
        T: PartialEq,
    {
        self.indexed()
            .find(|(_, item)| *item == value)
            .map(|(index, _)| index)
    }

    /// Inserts `value` at the front of the list, returning its index.
    ///
    /// # Errors
    /// Returns [`Error::Exhausted`] if the pool has no free slot.
    pub fn insert_front(&mut self, value: T) -> Result<I> {
        let index = self.link(value, self.head)?;
        self.head = index;
        Ok(index)
    }

    /// Removes and returns the first element.
    ///
    /// # Errors
    /// Returns [`Error::EmptyList`] if there is nothing to remove.
    pub fn delete_front(&mut self) -> Result<T> {
        if self.is_empty() {
            return Err(Error::EmptyList);
        }
        self.unlink_front().ok_or(Error::EmptyList)
    }

    /// Inserts `value` directly behind the node at `position`, returning the
    /// index of the new node.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPosition`] if `position` is the null sentinel,
    /// out of range, or a free slot, and [`Error::Exhausted`] if the pool has
    /// no free slot. The list is unchanged on error.
    pub fn insert_after(&mut self, position: I, value: T) -> Result<I> {
        self.check_position(position)?;
        let next = self.pool.slot(position).next;
        let index = self.link(value, next)?;
        self.pool.slot_mut(position).next = index;
        Ok(index)
    }

    /// Removes and returns the element directly behind the node at
    /// `position`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPosition`] under the same conditions as
    /// [`insert_after`](List::insert_after), and [`Error::NoSuccessor`] if
    /// `position` is the last node.
    pub fn delete_after(&mut self, position: I) -> Result<T> {
        let raw = self.check_position(position)?;
        self.unlink_after(position)
            .ok_or(Error::NoSuccessor { position: raw })
    }

    /// Inserts `value` in front of the first element it orders strictly
    /// before, so equal elements keep their order of arrival.
    ///
    /// On a list built only through this method, iteration yields an
    /// ascending sequence.
    ///
    /// # Errors
    /// Returns [`Error::Exhausted`] if the pool has no free slot.
    ///
    /// # Examples
    /// ```
    /// let mut list = pooled_list::InlineList::<(u8, char), 8>::new();
    /// for pair in [(2, 'a'), (1, 'b'), (2, 'c'), (0, 'd')] {
    ///     list.insert_sorted(pair).unwrap();
    /// }
    /// let firsts: Vec<u8> = list.iter().map(|&(n, _)| n).collect();
    /// assert_eq!(firsts, [0, 1, 2, 2]);
    /// ```
    pub fn insert_sorted(&mut self, value: T) -> Result<I>
    where
        T: PartialOrd,
    {
        if self.front().map_or(true, |head| value < *head) {
            return self.insert_front(value);
        }

        let mut prev = self.head;
        loop {
            let next = self.pool.slot(prev).next;
            if next == I::NONE {
                break;
            }
            match self.pool.slot(next).get() {
                Some(item) if !(value < *item) => prev = next,
                _ => break,
            }
        }

        self.insert_after(prev, value)
    }

    /// Removes the first element equal to `value`, returning whether one was
    /// found.
    pub fn remove(&mut self, value: &T) -> bool
    where
        T: PartialEq,
    {
        let head_matches = match self.front() {
            None => return false,
            Some(head) => head == value,
        };
        if head_matches {
            self.unlink_front();
            return true;
        }

        let mut prev = self.head;
        loop {
            let current = self.pool.slot(prev).next;
            if current == I::NONE {
                return false;
            }
            if self.pool.slot(current).get() == Some(value) {
                self.unlink_after(prev);
                return true;
            }
            prev = current;
        }
    }

    /// Removes all elements, returning every slot to the free chain.
    pub fn clear(&mut self) {
        let mut removed = 0usize;
        while !self.is_empty() {
            self.unlink_front();
            removed += 1;
        }
        if removed > 0 {
            log::debug!("cleared {} nodes", removed);
        }
    }

    /// Sorts the list in ascending order by relinking its nodes.
    ///
    /// The sort is stable and does not move any element, so indices keep
    /// referring to the same values. It runs in O(n log n) time without
    /// allocating.
    ///
    /// # Examples
    /// ```
    /// let mut list = pooled_list::InlineList::<i32, 8>::new();
    /// for n in [3, -1, 4, 1, 5] {
    ///     list.insert_front(n).unwrap();
    /// }
    /// let four = list.find(&4).unwrap();
    ///
    /// list.sort();
    /// assert!(list.iter().eq([-1, 1, 3, 4, 5].iter()));
    /// assert_eq!(list.get(four), Some(&4));
    /// ```
    pub fn sort(&mut self)
    where
        T: PartialOrd,
    {
        if self.is_empty() {
            return;
        }

        // Bottom-up merge sort: merge adjacent runs of length `run`, doubling
        // it each pass, until a pass performs a single merge.
        let mut run = 1usize;
        let mut passes = 0usize;
        loop {
            let mut left = self.head;
            let mut head = I::NONE;
            let mut tail = I::NONE;
            let mut merges = 0usize;

            while left != I::NONE {
                merges += 1;

                let mut right = left;
                let mut left_len = 0usize;
                while left_len < run && right != I::NONE {
                    left_len += 1;
                    right = self.pool.slot(right).next;
                }
                let mut right_len = run;

                while left_len > 0 || (right_len > 0 && right != I::NONE) {
                    let take_left = if left_len == 0 {
                        false
                    } else if right_len == 0 || right == I::NONE {
                        true
                    } else {
                        !(self.pool.slot(right).item < self.pool.slot(left).item)
                    };

                    let node = if take_left {
                        let node = left;
                        left = self.pool.slot(node).next;
                        left_len -= 1;
                        node
                    } else {
                        let node = right;
                        right = self.pool.slot(node).next;
                        right_len -= 1;
                        node
                    };

                    if tail == I::NONE {
                        head = node;
                    } else {
                        self.pool.slot_mut(tail).next = node;
                    }
                    tail = node;
                }

                left = right;
            }

            self.pool.slot_mut(tail).next = I::NONE;
            self.head = head;
            passes += 1;

            if merges <= 1 {
                break;
            }
            run *= 2;
        }

        log::debug!("sorted list in {} passes", passes);
    }

    /// Removes consecutive repeated elements, keeping the first of each run.
    /// Returns the number of removed elements.
    ///
    /// # Examples
    /// ```
    /// let mut list = pooled_list::InlineList::<u8, 8>::new();
    /// for n in [3, 3, 1, 3, 1, 1] {
    ///     list.insert_front(n).unwrap();
    /// }
    /// assert_eq!(list.dedup(), 2);
    /// assert!(list.iter().eq([1, 3, 1, 3].iter()));
    /// ```
    pub fn dedup(&mut self) -> usize
    where
        T: PartialEq,
    {
        let mut removed = 0usize;
        let mut current = self.head;
        while current != I::NONE {
            let next = self.pool.slot(current).next;
            if next != I::NONE && self.pool.slot(next).item == self.pool.slot(current).item {
                self.unlink_after(current);
                removed += 1;
            } else {
                current = next;
            }
        }

        if removed > 0 {
            log::debug!("dedup removed {} nodes", removed);
        }
        removed
    }

    /// Replaces the contents of `self` with clones of the elements of
    /// `source`, which may use a different kind of storage.
    ///
    /// # Errors
    /// Returns [`Error::Exhausted`] without touching `self` if `source` holds
    /// more elements than `self` can.
    pub fn assign_from<S2>(&mut self, source: &List<T, S2, I>) -> Result<()>
    where
        T: Clone,
        S2: SlotStorage<T, I>,
    {
        let needed = source.len();
        if needed > self.capacity() {
            return Err(Error::Exhausted {
                capacity: self.capacity(),
            });
        }

        self.clear();
        let mut tail = None;
        for value in source.iter() {
            self.insert_back(&mut tail, value.clone())?;
        }

        log::debug!("copied {} nodes", needed);
        Ok(())
    }

    /// Appends `value` behind `tail`, the cached index of the last node, and
    /// advances the cache. `None` means the list is empty.
    fn insert_back(&mut self, tail: &mut Option<I>, value: T) -> Result<()> {
        let index = match *tail {
            None => self.insert_front(value)?,
            Some(last) => self.insert_after(last, value)?,
        };
        *tail = Some(index);
        Ok(())
    }

    fn link(&mut self, value: T, next: I) -> Result<I> {
        let index = self.pool.allocate()?;
        let slot = self.pool.slot_mut(index);
        slot.item = Some(value);
        slot.next = next;
        Ok(index)
    }

    fn unlink_front(&mut self) -> Option<T> {
        let old = self.head;
        self.head = self.pool.slot(old).next;
        self.pool.release(old.as_usize())
    }

    fn unlink_after(&mut self, position: I) -> Option<T> {
        let target = self.pool.slot(position).next;
        if target == I::NONE {
            return None;
        }
        let after = self.pool.slot(target).next;
        self.pool.slot_mut(position).next = after;
        self.pool.release(target.as_usize())
    }

    /// Occupied slots are exactly the nodes of this list.
    fn check_position(&self, position: I) -> Result<usize> {
        let capacity = self.capacity();
        if position == I::NONE {
            return Err(Error::InvalidPosition {
                position: None,
                capacity,
            });
        }

        let raw = position.as_usize();
        match self.pool.slots().get(raw) {
            Some(slot) if slot.item.is_some() => Ok(raw),
            _ => Err(Error::InvalidPosition {
                position: Some(raw),
                capacity,
            }),
        }
    }
}

impl<T, S: OwnedStorage<T, I>, I: Capacity> List<T, S, I> {
    /// Creates an empty list backed by freshly created storage.
    ///
    /// # Panics
    /// Panics if the storage cannot provide `capacity` slots, or if `I`
    /// cannot index them.
    #[track_caller]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from(S::with_capacity(capacity))
    }
}

impl<T, I: Capacity, const C: usize> List<T, InlineStorage<T, I, C>, I> {
    /// Creates an empty list storing its nodes in an inline array.
    #[track_caller]
    pub fn new() -> Self {
        Self::with_capacity(C)
    }
}

impl<T, I: Capacity, const C: usize> Default for List<T, InlineStorage<T, I, C>, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, S: OwnedStorage<T, I>, I: Capacity> Clone for List<T, S, I> {
    fn clone(&self) -> Self {
        let mut copy = Self::with_capacity(self.capacity());
        copy.clone_from(self);
        copy
    }

    /// # Panics
    /// Panics if `self` has less capacity than `source` has elements.
    fn clone_from(&mut self, source: &Self) {
        #[cold]
        #[inline(never)]
        #[track_caller]
        fn assert_failed(error: Error) -> ! {
            panic!("cannot copy list: {}", error)
        }

        if let Err(error) = self.assign_from(source) {
            assert_failed(error);
        }
    }
}

impl<T, S: SlotStorage<T, I>, I: Capacity> Drop for List<T, S, I> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T, S, I, S2, I2> PartialEq<List<T, S2, I2>> for List<T, S, I>
where
    T: PartialEq,
    S: SlotStorage<T, I>,
    S2: SlotStorage<T, I2>,
    I: Capacity,
    I2: Capacity,
{
    fn eq(&self, other: &List<T, S2, I2>) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<T: Eq, S: SlotStorage<T, I>, I: Capacity> Eq for List<T, S, I> {}

impl<T: Debug, S: SlotStorage<T, I>, I: Capacity> Debug for List<T, S, I> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Renders the elements separated by spaces, followed by a line naming the
/// head of the free chain. Meant for people, not for parsing.
impl<T: Display, S: SlotStorage<T, I>, I: Capacity> Display for List<T, S, I> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (n, item) in self.iter().enumerate() {
            if n > 0 {
                f.write_str(" ")?;
            }
            Display::fmt(item, f)?;
        }

        match self.free_head() {
            Some(index) => write!(f, "\nfree list head: {}", index.as_usize()),
            None => f.write_str("\nfree list head: none"),
        }
    }
}

impl<'a, T, S: SlotStorage<T, I>, I: Capacity> IntoIterator for &'a List<T, S, I> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, I>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over `(index, element)` pairs of a [`List`], created by
/// [`List::indexed`].
pub struct Indexed<'a, T, I> {
    slots: &'a [Slot<T, I>],
    cursor: I,
}

impl<'a, T, I: Capacity> Iterator for Indexed<'a, T, I> {
    type Item = (I, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == I::NONE {
            return None;
        }

        let slot = &self.slots[self.cursor.as_usize()];
        let item = slot.item.as_ref()?;
        let index = self.cursor;
        self.cursor = slot.next;
        Some((index, item))
    }
}

impl<T, I: Capacity> FusedIterator for Indexed<'_, T, I> {}

/// Iterator over the elements of a [`List`], created by [`List::iter`].
pub struct Iter<'a, T, I> {
    inner: Indexed<'a, T, I>,
}

impl<'a, T, I: Capacity> Iterator for Iter<'a, T, I> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        self.inner.next().map(|(_, item)| item)
    }
}

impl<T, I: Capacity> FusedIterator for Iter<'_, T, I> {}

/// A list storing its nodes in an inline array.
///
/// # Examples
/// ```
/// let mut list = pooled_list::InlineList::<&str, 4>::new();
/// list.insert_front("b").unwrap();
/// list.insert_front("a").unwrap();
/// assert_eq!(format!("{:?}", list), r#"["a", "b"]"#);
/// ```
pub type InlineList<T, const C: usize> = List<T, InlineStorage<T, usize, C>, usize>;

/// A list storing its nodes in an inline array, generic over the index type.
///
/// # Examples
/// ```
/// let mut list = pooled_list::TiInlineList::<char, u8, 3>::new();
/// let a: u8 = list.insert_front('a').unwrap();
/// assert_eq!(list.get(a), Some(&'a'));
/// ```
pub type TiInlineList<T, I, const C: usize> = List<T, InlineStorage<T, I, C>, I>;

/// A list using a mutable slice of slots for storage.
///
/// Dropping the list clears it, leaving the slice ready for reuse.
///
/// # Examples
/// ```
/// use pooled_list::{SliceList, Slot};
///
/// let mut backing: [Slot<u32>; 16] = Default::default();
/// {
///     let mut list = SliceList::<u32>::from(&mut backing[..]);
///     list.insert_front(1).unwrap();
/// }
/// assert!(backing.iter().all(|slot| slot.get().is_none()));
/// ```
pub type SliceList<'a, T, I = usize> = List<T, SliceStorage<'a, T, I>, I>;

/// A list using a heap-allocated slice for storage.
///
/// Note this still has a fixed capacity, and will never reallocate.
///
/// # Examples
/// ```
/// let mut list = pooled_list::AllocList::<u64>::with_capacity(2);
/// list.insert_front(1).unwrap();
/// list.insert_front(2).unwrap();
/// assert!(list.insert_front(3).is_err());
/// ```
#[cfg(feature = "alloc")]
#[cfg_attr(docs_rs, doc(cfg(feature = "alloc")))]
pub type AllocList<T, I = usize> = List<T, crate::storage::AllocStorage<T, I>, I>;

#[cfg(test)]
mod tests {
    use super::*;
    use core::hash::BuildHasherDefault;
    use rand::{rngs::SmallRng, Rng, SeedableRng};
    use rustc_hash::FxHasher;
    use std::collections::HashSet;
    use std::string::{String, ToString};
    use std::vec::Vec;

    type FxHashSet<T> = HashSet<T, BuildHasherDefault<FxHasher>>;

    fn contents<T: Clone, S: SlotStorage<T, I>, I: Capacity>(list: &List<T, S, I>) -> Vec<T> {
        let mut out = Vec::new();
        list.traverse(|item| out.push(item.clone()));
        out
    }

    /// Linked and free slots must partition the pool.
    fn assert_partitioned<T, S: SlotStorage<T, I>, I: Capacity>(list: &List<T, S, I>) {
        let linked: FxHashSet<usize> = list.indexed().map(|(i, _)| i.as_usize()).collect();
        let free: FxHashSet<usize> = list.pool().free_slots().map(|i| i.as_usize()).collect();

        assert_eq!(linked.len(), list.len(), "cycle in the list");
        assert_eq!(free.len(), list.pool().free_slots().count(), "cycle in the free chain");
        assert!(linked.is_disjoint(&free));
        assert_eq!(linked.len() + free.len(), list.capacity());
        assert_eq!(list.pool().len(), linked.len());
    }

    #[test]
    fn insert_front_reverses_arrival() {
        let mut list = InlineList::<&str, 4>::new();
        list.insert_front("b").unwrap();
        list.insert_front("a").unwrap();
        assert_eq!(contents(&list), ["a", "b"]);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn delete_front_on_empty_list() {
        let mut list = InlineList::<&str, 4>::new();
        assert_eq!(list.delete_front(), Err(Error::EmptyList));
        assert!(list.is_empty());
        assert_eq!(list.free_head(), Some(0));
    }

    #[test]
    fn insert_then_delete_front_keeps_shape() {
        let mut list = InlineList::<i32, 8>::new();
        for n in [4, 5, 6] {
            list.insert_front(n).unwrap();
        }
        let before = contents(&list);

        list.insert_front(99).unwrap();
        assert_eq!(list.delete_front(), Ok(99));
        assert_eq!(contents(&list), before);
        assert_partitioned(&list);
    }

    #[test]
    fn insert_sorted_orders_values() {
        let mut list = InlineList::<&str, 4>::new();
        for s in ["z", "x", "y"] {
            list.insert_sorted(s).unwrap();
        }
        assert_eq!(contents(&list), ["x", "y", "z"]);
    }

    #[test]
    fn insert_sorted_keeps_ties_in_arrival_order() {
        let mut list = InlineList::<(u8, u8), 8>::new();

        #[derive(Clone, Copy, Debug, PartialEq)]
        struct Key(u8, u8);
        impl PartialOrd for Key {
            fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
                self.0.partial_cmp(&other.0)
            }
        }

        let mut keyed = InlineList::<Key, 8>::new();
        for (i, k) in [1u8, 0, 1, 1, 0].iter().enumerate() {
            keyed.insert_sorted(Key(*k, i as u8)).unwrap();
            list.insert_sorted((*k, i as u8)).unwrap();
        }

        let arrival: Vec<u8> = keyed.iter().map(|k| k.1).collect();
        assert_eq!(arrival, [1, 4, 0, 2, 3]);
        assert_eq!(contents(&list), [(0, 1), (0, 4), (1, 0), (1, 2), (1, 3)]);
    }

    #[test]
    fn insert_and_delete_after() {
        let mut list = InlineList::<&str, 4>::new();
        let a = list.insert_front("a").unwrap();
        let b = list.insert_after(a, "b").unwrap();
        assert_eq!(contents(&list), ["a", "b"]);

        assert_eq!(list.delete_after(a), Ok("b"));
        assert_eq!(contents(&list), ["a"]);
        assert!(list.pool().free_slots().any(|i| i == b));
        assert_eq!(list.free_head(), Some(b));
        assert_partitioned(&list);
    }

    #[test]
    fn positions_are_validated_before_mutation() {
        let mut list = InlineList::<u32, 4>::new();
        let a = list.insert_front(1).unwrap();

        assert_eq!(
            list.insert_after(usize::MAX, 2),
            Err(Error::InvalidPosition {
                position: None,
                capacity: 4
            })
        );
        assert_eq!(
            list.delete_after(4),
            Err(Error::InvalidPosition {
                position: Some(4),
                capacity: 4
            })
        );
        // Slot 2 is in range but on the free chain.
        assert_eq!(
            list.insert_after(2, 2),
            Err(Error::InvalidPosition {
                position: Some(2),
                capacity: 4
            })
        );
        assert_eq!(
            list.delete_after(a),
            Err(Error::NoSuccessor { position: a })
        );

        assert_eq!(contents(&list), [1]);
        assert_partitioned(&list);
    }

    #[test]
    fn remove_by_value() {
        let mut list = InlineList::<char, 8>::new();
        for c in ['d', 'c', 'b', 'c', 'a'] {
            list.insert_front(c).unwrap();
        }

        assert!(!list.remove(&'q'));
        assert_eq!(contents(&list), ['a', 'c', 'b', 'c', 'd']);

        assert!(list.remove(&'a'));
        assert!(list.remove(&'c'));
        assert_eq!(contents(&list), ['b', 'c', 'd']);
        assert!(list.remove(&'d'));
        assert_eq!(contents(&list), ['b', 'c']);
        assert_partitioned(&list);

        let mut empty = InlineList::<char, 2>::new();
        assert!(!empty.remove(&'a'));
    }

    #[test]
    fn find_returns_first_match() {
        let mut list = InlineList::<&str, 8>::new();
        list.insert_front("n").unwrap();
        let m = list.insert_front("m").unwrap();
        list.insert_front("k").unwrap();

        assert_eq!(list.find(&"m"), Some(m));
        assert_eq!(list.get(m), Some(&"m"));
        assert_eq!(list.find(&"z"), None);

        let m2 = list.insert_front("m").unwrap();
        assert_eq!(list.find(&"m"), Some(m2));
    }

    #[test]
    fn capacity_is_enforced() {
        let mut list = InlineList::<usize, 3>::new();
        for n in 0..3 {
            list.insert_front(n).unwrap();
        }
        assert!(list.is_full());
        assert_eq!(list.insert_front(3), Err(Error::Exhausted { capacity: 3 }));
        assert_eq!(list.insert_sorted(3), Err(Error::Exhausted { capacity: 3 }));
        let head = list.head().unwrap();
        assert_eq!(
            list.insert_after(head, 3),
            Err(Error::Exhausted { capacity: 3 })
        );
        assert_eq!(list.len(), 3);

        list.delete_front().unwrap();
        list.insert_front(3).unwrap();
        assert_eq!(contents(&list), [3, 1, 0]);
    }

    #[test]
    fn clear_frees_every_slot() {
        let mut list = InlineList::<String, 4>::new();
        for s in ["a", "b", "c"] {
            list.insert_front(s.to_string()).unwrap();
        }
        list.clear();

        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert_eq!(list.pool().free_slots().count(), 4);
        assert_partitioned(&list);
    }

    #[test]
    fn clones_are_independent() {
        let mut original = InlineList::<String, 8>::new();
        for s in ["c", "b", "a"] {
            original.insert_front(s.to_string()).unwrap();
        }

        let mut copy = original.clone();
        assert_eq!(copy, original);
        assert_eq!(contents(&copy), ["a", "b", "c"]);

        copy.delete_front().unwrap();
        copy.insert_front("z".to_string()).unwrap();
        assert_eq!(contents(&original), ["a", "b", "c"]);
        assert_eq!(contents(&copy), ["z", "b", "c"]);

        copy.clone_from(&original);
        assert_eq!(copy, original);
        assert_partitioned(&copy);
    }

    #[test]
    fn assign_across_storage_kinds() {
        let mut source = InlineList::<u16, 8>::new();
        for n in [3, 2, 1] {
            source.insert_front(n).unwrap();
        }

        let mut backing: [Slot<u16>; 4] = Default::default();
        let mut target = SliceList::<u16>::from(&mut backing[..]);
        target.insert_front(42).unwrap();

        target.assign_from(&source).unwrap();
        assert_eq!(target, source);

        source.insert_front(0).unwrap();
        source.insert_front(0).unwrap();
        assert_eq!(
            target.assign_from(&source),
            Err(Error::Exhausted { capacity: 4 })
        );
        assert_eq!(contents(&target), [1, 2, 3]);
    }

    #[test]
    #[should_panic(expected = "cannot copy list")]
    #[cfg(feature = "alloc")]
    fn clone_from_into_smaller_list_panics() {
        let mut big = AllocList::<u8>::with_capacity(4);
        for n in 0..4 {
            big.insert_front(n).unwrap();
        }
        let mut small = AllocList::<u8>::with_capacity(2);
        small.clone_from(&big);
    }

    #[test]
    fn sort_relinks_in_place() {
        let mut list = InlineList::<i32, 16>::new();
        for n in [5, 3, 9, 1, 3, 7, 2, 8] {
            list.insert_front(n).unwrap();
        }
        let nine = list.find(&9).unwrap();

        list.sort();
        assert_eq!(contents(&list), [1, 2, 3, 3, 5, 7, 8, 9]);
        assert_eq!(list.get(nine), Some(&9));
        assert_partitioned(&list);

        let mut single = InlineList::<i32, 1>::new();
        single.sort();
        single.insert_front(1).unwrap();
        single.sort();
        assert_eq!(contents(&single), [1]);
    }

    #[test]
    fn dedup_removes_consecutive_runs() {
        let mut list = InlineList::<char, 8>::new();
        for c in ['c', 'c', 'b', 'a', 'a', 'a', 'b'] {
            list.insert_front(c).unwrap();
        }

        assert_eq!(list.dedup(), 3);
        assert_eq!(contents(&list), ['b', 'a', 'b', 'c']);
        assert_eq!(list.dedup(), 0);
        assert_partitioned(&list);
    }

    #[test]
    fn display_lists_values_and_free_head() {
        let mut list = InlineList::<u8, 2>::new();
        assert_eq!(list.to_string(), "\nfree list head: 0");

        list.insert_front(2).unwrap();
        list.insert_front(1).unwrap();
        assert_eq!(list.to_string(), "1 2\nfree list head: none");
    }

    #[test]
    fn drop_releases_payloads() {
        use core::cell::Cell;

        struct Droppable<'a> {
            drop_count: &'a Cell<usize>,
        }

        impl Drop for Droppable<'_> {
            fn drop(&mut self) {
                self.drop_count.set(self.drop_count.get() + 1);
            }
        }

        let drop_count = Cell::new(0);
        let mut backing: [Slot<Droppable<'_>>; 4] = Default::default();
        {
            let mut list = SliceList::<Droppable<'_>>::from(&mut backing[..]);
            for _ in 0..3 {
                list.insert_front(Droppable {
                    drop_count: &drop_count,
                })
                .unwrap();
            }
            drop(list.delete_front());
            assert_eq!(drop_count.get(), 1);
        }

        assert_eq!(drop_count.get(), 3);
        assert!(backing.iter().all(|slot| slot.get().is_none()));
    }

    #[test]
    fn narrow_index_type() {
        crate::index_type! { Handle: u8 }

        let mut list = TiInlineList::<u32, Handle, 200>::new();
        let first = list.insert_front(7).unwrap();
        assert_eq!(first, Handle::from_usize(0));
        list.insert_after(first, 8).unwrap();
        assert_eq!(contents(&list), [7, 8]);
        assert_eq!(list.free_head(), Some(Handle::from_usize(2)));
    }

    #[test]
    fn matches_vec_model() {
        const CAP: usize = 32;
        let mut rng = SmallRng::seed_from_u64(0x5432_1012_3454_3210);
        let mut list = InlineList::<u8, CAP>::new();
        let mut model: Vec<u8> = Vec::new();

        for _ in 0..5000 {
            let value = rng.gen_range(0..10u8);
            match rng.gen_range(0..9) {
                0 | 1 => {
                    let result = list.insert_front(value);
                    if model.len() == CAP {
                        assert_eq!(result, Err(Error::Exhausted { capacity: CAP }));
                    } else {
                        result.unwrap();
                        model.insert(0, value);
                    }
                }
                2 => {
                    let result = list.delete_front();
                    if model.is_empty() {
                        assert_eq!(result, Err(Error::EmptyList));
                    } else {
                        assert_eq!(result, Ok(model.remove(0)));
                    }
                }
                3 if !model.is_empty() => {
                    let at = rng.gen_range(0..model.len());
                    let (position, _) = list.indexed().nth(at).unwrap();
                    let result = list.insert_after(position, value);
                    if model.len() == CAP {
                        assert_eq!(result, Err(Error::Exhausted { capacity: CAP }));
                    } else {
                        result.unwrap();
                        model.insert(at + 1, value);
                    }
                }
                4 if !model.is_empty() => {
                    let at = rng.gen_range(0..model.len());
                    let (position, _) = list.indexed().nth(at).unwrap();
                    let result = list.delete_after(position);
                    if at + 1 == model.len() {
                        assert_eq!(
                            result,
                            Err(Error::NoSuccessor {
                                position: position.as_usize()
                            })
                        );
                    } else {
                        assert_eq!(result, Ok(model.remove(at + 1)));
                    }
                }
                5 => {
                    let result = list.insert_sorted(value);
                    if model.len() == CAP {
                        assert!(result.is_err());
                    } else {
                        result.unwrap();
                        let at = match model.first() {
                            None => 0,
                            Some(head) if value < *head => 0,
                            Some(_) => model[1..]
                                .iter()
                                .position(|item| value < *item)
                                .map_or(model.len(), |p| p + 1),
                        };
                        model.insert(at, value);
                    }
                }
                6 => {
                    let removed = list.remove(&value);
                    match model.iter().position(|item| *item == value) {
                        Some(at) => {
                            assert!(removed);
                            model.remove(at);
                        }
                        None => assert!(!removed),
                    }
                }
                7 => {
                    let found = list.find(&value).and_then(|i| list.get(i)).copied();
                    assert_eq!(found, model.iter().find(|item| **item == value).copied());
                }
                _ => {
                    if rng.gen_bool(0.1) {
                        list.sort();
                        model.sort();
                    } else if rng.gen_bool(0.1) {
                        list.dedup();
                        model.dedup();
                    }
                }
            }

            assert_eq!(list.len(), model.len());
            assert_eq!(contents(&list), model);
            assert_partitioned(&list);
        }
    }

    #[test]
    fn sorted_insertion_yields_non_decreasing_sequence() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut list = InlineList::<i16, 256>::new();
        while !list.is_full() {
            list.insert_sorted(rng.gen_range(-50..50)).unwrap();
        }

        let values = contents(&list);
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
    }
}
