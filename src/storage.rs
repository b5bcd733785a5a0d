//! Traits providing genericity over slot storage and index types.

use core::convert::TryInto;
use core::fmt::Debug;

use crate::pool::Slot;

/// Two-way conversion between `Self` and `usize`, plus a reserved sentinel.
///
/// Slot indices are stored as `Self` inside every [`Slot`], so picking a
/// narrow type such as `u8` or `u16` shrinks the pool, at the cost of a
/// lower maximum capacity. The value [`NONE`](Capacity::NONE) is reserved to
/// mean "no node" and is never handed out as a slot index.
///
/// Implementors must ensure the conversion functions are each other's inverse,
/// i.e. `Capacity::from_usize(i).as_usize()` must either evaluate to `i`, or
/// panic for all `usize` values.
///
/// Using [`index_type!`](crate::index_type) should be preferred over
/// implementing this manually.
pub trait Capacity: Copy + Eq + Debug {
    /// The null sentinel, the largest representable value.
    const NONE: Self;

    /// Convert a `usize` into `Self`.
    fn from_usize(i: usize) -> Self;
    /// Convert `self` into `usize`.
    fn as_usize(&self) -> usize;
}

#[inline(never)]
#[cold]
#[track_caller]
fn from_value_out_of_range(i: usize) -> ! {
    panic!("called `from_usize` with value out of range (is {})", i)
}

#[inline(never)]
#[cold]
#[track_caller]
fn into_value_out_of_range() -> ! {
    panic!("called `as_usize` with value out of range")
}

macro_rules! impl_capacity {
    ($($ty:ty),*) => {$(
        impl Capacity for $ty {
            const NONE: Self = <$ty>::MAX;

            #[inline]
            #[track_caller]
            fn from_usize(i: usize) -> Self {
                if let Ok(t) = i.try_into() {
                    t
                } else {
                    from_value_out_of_range(i);
                }
            }

            #[inline]
            #[track_caller]
            fn as_usize(&self) -> usize {
                if let Ok(t) = (*self).try_into() {
                    t
                } else {
                    into_value_out_of_range();
                }
            }
        }
    )*};
}

impl_capacity!(u8, u16, u32, u64);

impl Capacity for usize {
    const NONE: Self = usize::MAX;

    #[inline]
    fn from_usize(i: usize) -> Self {
        i
    }

    #[inline]
    fn as_usize(&self) -> usize {
        *self
    }
}

/// Generates a newtype wrapping an implementor of [`Capacity`].
///
/// This can help in avoiding use of an index obtained from one list with
/// another list of a different index type.
///
/// # Examples
/// ```compile_fail
/// use pooled_list::{index_type, TiInlineList};
///
/// index_type! { pub IndexA: u8 };
/// index_type! { IndexB: u8 };
///
/// let mut list_a = TiInlineList::<u32, IndexA, 20>::new();
/// let a = list_a.insert_front(1).unwrap();
///
/// let mut list_b = TiInlineList::<u32, IndexB, 30>::new();
/// list_b.insert_after(a, 2).unwrap();
/// //                  ^ expected `IndexB`, found `IndexA`
/// ```
#[macro_export]
macro_rules! index_type {
    ($v:vis $name:ident: $repr:ty) => {
        #[derive(
            core::marker::Copy,
            core::clone::Clone,
            core::fmt::Debug,
            core::hash::Hash,
            core::cmp::PartialEq,
            core::cmp::Eq,
            core::cmp::PartialOrd,
            core::cmp::Ord)]
        $v struct $name($repr);

        impl $crate::storage::Capacity for $name {
            const NONE: Self = Self(<$repr as $crate::storage::Capacity>::NONE);

            #[inline]
            #[track_caller]
            fn from_usize(i: usize) -> Self {
                Self(<$repr as $crate::storage::Capacity>::from_usize(i))
            }

            #[inline]
            #[track_caller]
            fn as_usize(&self) -> usize {
                <$repr as $crate::storage::Capacity>::as_usize(&self.0)
            }
        }
    }
}

/// An interface for a contiguous block of slots for use by a [`NodePool`](crate::pool::NodePool).
///
/// Implementors must ensure the length of the returned slices never changes.
pub trait SlotStorage<T, I: Capacity> {
    /// Extracts a slice over the entire block.
    fn slots(&self) -> &[Slot<T, I>];
    /// Extracts a mutable slice over the entire block.
    fn slots_mut(&mut self) -> &mut [Slot<T, I>];

    /// Returns the size of the block in slots.
    #[inline]
    fn capacity(&self) -> usize {
        self.slots().len()
    }
}

/// Storage that can be created from nothing, enabling `Clone` for the
/// structures built on it.
pub trait OwnedStorage<T, I: Capacity>: SlotStorage<T, I> + Sized {
    /// Creates a block of at least `capacity` vacant slots.
    ///
    /// Fixed-size storage ignores the request and uses its own size, but
    /// panics if that size is smaller than `capacity`.
    fn with_capacity(capacity: usize) -> Self;
}

/// Shorthand for `&'a mut [Slot<T, I>]` for use with generic data structures.
pub type SliceStorage<'a, T, I> = &'a mut [Slot<T, I>];

impl<T, I: Capacity> SlotStorage<T, I> for SliceStorage<'_, T, I> {
    #[inline]
    fn slots(&self) -> &[Slot<T, I>] {
        &self[..]
    }
    #[inline]
    fn slots_mut(&mut self) -> &mut [Slot<T, I>] {
        self
    }
}

/// Shorthand for `[Slot<T, I>; C]` for use with generic data structures.
pub type InlineStorage<T, I, const C: usize> = [Slot<T, I>; C];

impl<T, I: Capacity, const C: usize> SlotStorage<T, I> for InlineStorage<T, I, C> {
    #[inline]
    fn slots(&self) -> &[Slot<T, I>] {
        &self[..]
    }
    #[inline]
    fn slots_mut(&mut self) -> &mut [Slot<T, I>] {
        &mut self[..]
    }
    #[inline]
    fn capacity(&self) -> usize {
        C
    }
}

impl<T, I: Capacity, const C: usize> OwnedStorage<T, I> for InlineStorage<T, I, C> {
    #[track_caller]
    fn with_capacity(capacity: usize) -> Self {
        assert!(
            capacity <= C,
            "requested capacity {} exceeds inline capacity {}",
            capacity,
            C
        );
        core::array::from_fn(|_| Slot::vacant())
    }
}

/// Shorthand for [`alloc::Box<[Slot<T, I>]>`](alloc::boxed::Box) for use
/// with generic data structures.
///
/// Note this still has a fixed capacity, and will never reallocate.
#[cfg(feature = "alloc")]
#[cfg_attr(docs_rs, doc(cfg(feature = "alloc")))]
pub type AllocStorage<T, I> = alloc::boxed::Box<[Slot<T, I>]>;

#[cfg(feature = "alloc")]
#[cfg_attr(docs_rs, doc(cfg(feature = "alloc")))]
impl<T, I: Capacity> SlotStorage<T, I> for AllocStorage<T, I> {
    #[inline]
    fn slots(&self) -> &[Slot<T, I>] {
        self
    }
    #[inline]
    fn slots_mut(&mut self) -> &mut [Slot<T, I>] {
        self
    }
}

#[cfg(feature = "alloc")]
#[cfg_attr(docs_rs, doc(cfg(feature = "alloc")))]
impl<T, I: Capacity> OwnedStorage<T, I> for AllocStorage<T, I> {
    fn with_capacity(capacity: usize) -> Self {
        core::iter::repeat_with(Slot::vacant).take(capacity).collect()
    }
}
