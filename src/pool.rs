//! Fixed-capacity node pools with an intrusive free list.
//!
//! A [`NodePool`] hands out slot indices instead of pointers. Every slot
//! stores a payload next to a link field; while a slot is unallocated the
//! link threads it into the pool's free chain, and once it is allocated the
//! owner of the index is free to use the link for its own purposes (a
//! [`List`](crate::list::List) uses it to point at the next node).
//!
//! Allocation pops the head of the free chain and recycling pushes onto it,
//! so both are O(1) and never touch the global allocator.

use core::fmt::{self, Debug, Formatter};
use core::iter::FusedIterator;
use core::marker::PhantomData;

use crate::error::{Error, Result};
use crate::storage::{Capacity, InlineStorage, OwnedStorage, SliceStorage, SlotStorage};

/// One unit of pool storage: a payload and a link to another slot.
pub struct Slot<T, I = usize> {
    pub(crate) item: Option<T>,
    pub(crate) next: I,
}

impl<T, I: Capacity> Slot<T, I> {
    /// Creates an empty slot that links nowhere.
    #[inline]
    pub fn vacant() -> Self {
        Slot {
            item: None,
            next: I::NONE,
        }
    }

    /// Returns a reference to the payload, if any.
    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.item.as_ref()
    }

    /// Returns a mutable reference to the payload, if any.
    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.item.as_mut()
    }

    /// Stores `value` in the slot, returning the previous payload.
    #[inline]
    pub fn replace(&mut self, value: T) -> Option<T> {
        self.item.replace(value)
    }

    /// Moves the payload out of the slot.
    #[inline]
    pub fn take(&mut self) -> Option<T> {
        self.item.take()
    }

    /// Returns the index this slot links to, `None` for the null sentinel.
    #[inline]
    pub fn next(&self) -> Option<I> {
        if self.next == I::NONE {
            None
        } else {
            Some(self.next)
        }
    }

    /// Overwrites the link field.
    #[inline]
    pub fn set_next(&mut self, next: Option<I>) {
        self.next = next.unwrap_or(I::NONE);
    }
}

impl<T, I: Capacity> Default for Slot<T, I> {
    fn default() -> Self {
        Self::vacant()
    }
}

impl<T: Debug, I: Capacity> Debug for Slot<T, I> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("item", &self.item)
            .field("next", &self.next())
            .finish()
    }
}

/// A pool of slots with constant capacity.
///
/// See the [module documentation](crate::pool) for an overview.
///
/// The pool does not track which slots are allocated. Recycling an index
/// that is already free is not detected and corrupts the free chain; the
/// owner of the indices is responsible for returning each one exactly once.
pub struct NodePool<T, S: SlotStorage<T, I>, I: Capacity = usize> {
    buf: S,
    len: usize,
    free_head: I,
    items: PhantomData<T>,
}

impl<T, S: SlotStorage<T, I>, I: Capacity> From<S> for NodePool<T, S, I> {
    /// Wraps `buf` and links all of its slots into the free chain.
    ///
    /// # Panics
    /// Panics if the storage has more slots than `I` can index without
    /// colliding with the null sentinel.
    #[track_caller]
    fn from(buf: S) -> Self {
        let mut pool = NodePool {
            buf,
            len: 0,
            free_head: I::NONE,
            items: PhantomData,
        };
        pool.initialize();
        pool
    }
}

impl<T, S: SlotStorage<T, I>, I: Capacity> NodePool<T, S, I> {
    /// Links slot `i` to slot `i + 1` for every slot, terminates the chain
    /// with the null sentinel and makes slot 0 the free head.
    ///
    /// Any payloads still stored in the pool are dropped. Indices handed out
    /// before the call must not be used afterwards.
    ///
    /// # Panics
    /// Panics if the storage has more slots than `I` can index without
    /// colliding with the null sentinel.
    #[track_caller]
    pub fn initialize(&mut self) {
        let slots = self.buf.slots_mut();
        let cap = slots.len();
        if cap > 0 {
            assert!(
                I::from_usize(cap - 1) != I::NONE,
                "capacity {} collides with the index type's null sentinel",
                cap
            );
        }

        for (i, slot) in slots.iter_mut().enumerate() {
            slot.item = None;
            slot.next = if i + 1 < cap {
                I::from_usize(i + 1)
            } else {
                I::NONE
            };
        }

        self.free_head = if cap > 0 { I::from_usize(0) } else { I::NONE };
        self.len = 0;
        log::debug!("initialized node pool with {} slots", cap);
    }

    /// Returns the number of slots the pool can hand out.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Returns the number of slots currently allocated.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns [`true`] if no slot is allocated.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns [`true`] if the free chain is empty.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.free_head == I::NONE
    }

    /// Pops the head of the free chain and returns its index.
    ///
    /// The returned slot links nowhere and holds no payload; the caller is
    /// expected to fill in both.
    ///
    /// # Errors
    /// Returns [`Error::Exhausted`] if every slot is allocated.
    ///
    /// # Examples
    /// ```
    /// use pooled_list::{Error, InlinePool};
    ///
    /// let mut pool = InlinePool::<&str, 2>::new();
    /// assert_eq!(pool.allocate(), Ok(0));
    /// assert_eq!(pool.allocate(), Ok(1));
    /// assert_eq!(pool.allocate(), Err(Error::Exhausted { capacity: 2 }));
    /// ```
    pub fn allocate(&mut self) -> Result<I> {
        let index = self.free_head;
        if index == I::NONE {
            log::debug!("node pool exhausted at {} slots", self.capacity());
            return Err(Error::Exhausted {
                capacity: self.capacity(),
            });
        }

        let slot = &mut self.buf.slots_mut()[index.as_usize()];
        self.free_head = slot.next;
        slot.next = I::NONE;
        self.len += 1;

        log::trace!("allocated slot {:?}", index);
        Ok(index)
    }

    /// Pushes the slot at `index` onto the front of the free chain, returning
    /// the payload it held.
    ///
    /// # Errors
    /// Returns [`Error::InvalidIndex`] if `index` is out of range.
    ///
    /// # Examples
    /// ```
    /// use pooled_list::InlinePool;
    ///
    /// let mut pool = InlinePool::<u32, 4>::new();
    /// let a = pool.allocate().unwrap();
    /// pool.slot_mut(a).replace(7);
    ///
    /// assert_eq!(pool.recycle(a), Ok(Some(7)));
    /// assert_eq!(pool.free_head(), Some(a));
    /// assert!(pool.recycle(4).is_err());
    /// ```
    pub fn recycle(&mut self, index: I) -> Result<Option<T>> {
        let capacity = self.capacity();
        let raw = index.as_usize();
        if raw >= capacity {
            return Err(Error::InvalidIndex {
                index: raw,
                capacity,
            });
        }

        Ok(self.release(raw))
    }

    /// Unchecked counterpart of [`recycle`](NodePool::recycle) for indices
    /// known to be in range.
    pub(crate) fn release(&mut self, index: usize) -> Option<T> {
        let free_head = self.free_head;
        let slot = &mut self.buf.slots_mut()[index];
        let item = slot.item.take();
        slot.next = free_head;

        self.free_head = I::from_usize(index);
        self.len = self.len.saturating_sub(1);

        log::trace!("recycled slot {}", index);
        item
    }

    /// Returns the slot at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of range. No other validation takes place,
    /// the slot may well be on the free chain.
    #[inline]
    #[track_caller]
    pub fn slot(&self, index: I) -> &Slot<T, I> {
        &self.buf.slots()[index.as_usize()]
    }

    /// Returns the slot at `index` mutably.
    ///
    /// # Panics
    /// Panics if `index` is out of range. No other validation takes place,
    /// the slot may well be on the free chain.
    #[inline]
    #[track_caller]
    pub fn slot_mut(&mut self, index: I) -> &mut Slot<T, I> {
        &mut self.buf.slots_mut()[index.as_usize()]
    }

    /// Returns the payload at `index`, or [`None`] if `index` is out of
    /// range or the slot holds nothing.
    #[inline]
    pub fn get(&self, index: I) -> Option<&T> {
        self.buf.slots().get(index.as_usize())?.item.as_ref()
    }

    /// Returns the payload at `index` mutably, or [`None`] if `index` is out
    /// of range or the slot holds nothing.
    #[inline]
    pub fn get_mut(&mut self, index: I) -> Option<&mut T> {
        self.buf.slots_mut().get_mut(index.as_usize())?.item.as_mut()
    }

    /// Returns the first slot of the free chain, or [`None`] if the pool is
    /// exhausted.
    #[inline]
    pub fn free_head(&self) -> Option<I> {
        if self.free_head == I::NONE {
            None
        } else {
            Some(self.free_head)
        }
    }

    /// Returns an iterator walking the free chain from its head.
    ///
    /// The walk stops after `capacity` steps, so a chain corrupted by
    /// recycling an index twice cannot make it loop forever.
    pub fn free_slots(&self) -> FreeSlots<'_, T, I> {
        FreeSlots {
            slots: self.buf.slots(),
            cursor: self.free_head,
            remaining: self.capacity(),
        }
    }

    #[inline]
    pub(crate) fn slots(&self) -> &[Slot<T, I>] {
        self.buf.slots()
    }
}

impl<T, S: OwnedStorage<T, I>, I: Capacity> NodePool<T, S, I> {
    /// Creates a pool backed by freshly created storage.
    ///
    /// # Panics
    /// Panics if the storage cannot provide `capacity` slots, or if `I`
    /// cannot index them.
    #[track_caller]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from(S::with_capacity(capacity))
    }
}

impl<T, I: Capacity, const C: usize> NodePool<T, InlineStorage<T, I, C>, I> {
    /// Creates a pool storing its slots in an inline array.
    ///
    /// # Examples
    /// ```
    /// let pool = pooled_list::TiInlinePool::<char, u8, 16>::new();
    /// assert_eq!(pool.capacity(), 16);
    /// assert_eq!(pool.free_head(), Some(0u8));
    /// ```
    #[track_caller]
    pub fn new() -> Self {
        Self::with_capacity(C)
    }
}

impl<T, I: Capacity, const C: usize> Default for NodePool<T, InlineStorage<T, I, C>, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S: SlotStorage<T, I>, I: Capacity> Debug for NodePool<T, S, I> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodePool")
            .field("capacity", &self.capacity())
            .field("len", &self.len)
            .field("free_head", &self.free_head())
            .finish()
    }
}

/// Iterator over the free chain of a [`NodePool`], created by
/// [`NodePool::free_slots`].
pub struct FreeSlots<'a, T, I> {
    slots: &'a [Slot<T, I>],
    cursor: I,
    remaining: usize,
}

impl<T, I: Capacity> Iterator for FreeSlots<'_, T, I> {
    type Item = I;

    fn next(&mut self) -> Option<I> {
        if self.cursor == I::NONE || self.remaining == 0 {
            return None;
        }

        let index = self.cursor;
        self.cursor = self.slots[index.as_usize()].next;
        self.remaining -= 1;
        Some(index)
    }
}

impl<T, I: Capacity> FusedIterator for FreeSlots<'_, T, I> {}

/// A pool storing its slots in an inline array.
pub type InlinePool<T, const C: usize> = NodePool<T, InlineStorage<T, usize, C>, usize>;

/// A pool storing its slots in an inline array, generic over the index type.
pub type TiInlinePool<T, I, const C: usize> = NodePool<T, InlineStorage<T, I, C>, I>;

/// A pool using a mutable slice of slots for storage.
///
/// # Examples
/// ```
/// use pooled_list::{SlicePool, Slot};
///
/// let mut backing: [Slot<i64>; 8] = Default::default();
/// let (left, right) = backing.split_at_mut(4);
/// let mut pool_a = SlicePool::<i64>::from(left);
/// let pool_b = SlicePool::<i64>::from(right);
///
/// pool_a.allocate().unwrap();
/// assert_eq!(pool_a.len(), 1);
/// assert_eq!(pool_b.capacity(), 4);
/// ```
pub type SlicePool<'a, T, I = usize> = NodePool<T, SliceStorage<'a, T, I>, I>;

/// A pool using a heap-allocated slice for storage.
///
/// Note this still has a fixed capacity, and will never reallocate.
///
/// # Examples
/// ```
/// let mut pool = pooled_list::AllocPool::<String>::with_capacity(3);
/// for _ in 0..3 {
///     pool.allocate().unwrap();
/// }
/// assert!(pool.is_full());
/// assert!(pool.allocate().is_err());
/// ```
#[cfg(feature = "alloc")]
#[cfg_attr(docs_rs, doc(cfg(feature = "alloc")))]
pub type AllocPool<T, I = usize> = NodePool<T, crate::storage::AllocStorage<T, I>, I>;
