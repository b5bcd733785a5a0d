#![no_std]
#![cfg_attr(docs_rs, feature(doc_cfg))]
#![warn(missing_docs)]

//! Singly linked lists whose nodes live in a fixed-capacity node pool.
//!
//! Nodes are referenced by slot index rather than by address. The pool keeps
//! its unused slots on an intrusive free chain, so inserting and deleting
//! nodes never touches the global allocator.
//!
//! Storage is pluggable: an inline array (`InlineList`), a borrowed slice
//! (`SliceList`), or a boxed slice (`AllocList`, requires the `alloc`
//! feature). In every case the capacity is fixed when the list is created.

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod error;
pub mod list;
pub mod pool;
pub mod storage;

pub use crate::error::{Error, Result};
pub use crate::list::{InlineList, List, SliceList, TiInlineList, DEFAULT_CAPACITY};
pub use crate::pool::{InlinePool, NodePool, SlicePool, Slot, TiInlinePool};
pub use crate::storage::Capacity;

#[cfg(feature = "alloc")]
pub use crate::list::AllocList;
#[cfg(feature = "alloc")]
pub use crate::pool::AllocPool;
