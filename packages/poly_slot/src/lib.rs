//! Value-semantic storage for polymorphic objects, inline when they fit.
//!
//! This crate provides [`PolySlot`], a single-object container for values
//! of any type implementing a chosen base trait. Values whose size and
//! alignment fit a configurable inline region are stored in the slot
//! itself; larger values spill into their own heap allocation. Either way
//! the slot owns the object: dropping, cloning, and moving the slot drop,
//! clone, and move the stored object.
//!
//! # Key Features
//!
//! - **Value semantics for trait objects**: Clone and move polymorphic values like plain data
//! - **Small-buffer optimization**: Values up to the inline capacity involve no allocation
//! - **Configurable capacity**: Any type can donate its layout as the inline region
//! - **Capability control**: Demand `Clone` of every placed value, or admit move-only types
//! - **Heap control**: [`InlineSlot`] rejects oversized values at compile time instead of spilling
//! - **Exact downcasts**: Typed access checks the stored type's identity, with descriptive errors
//!
//! # Examples
//!
//! ## Basic usage
//!
//! ```rust
//! use std::any::Any;
//!
//! use poly_slot::PolySlot;
//!
//! let mut slot: PolySlot<dyn Any> = PolySlot::empty();
//!
//! // A u64 fits the default 64-byte inline region.
//! slot.place(42_u64);
//! assert!(!slot.is_heap());
//! assert_eq!(*slot.value::<u64>().unwrap(), 42);
//!
//! // Replacing drops the previous value; 128 bytes exceed the inline
//! // region, so this value lives in its own allocation.
//! slot.place([0_u64; 16]);
//! assert!(slot.is_heap());
//! ```
//!
//! ## Custom base traits
//!
//! Any trait can govern a slot once registered with
//! [`impl_base!`][crate::impl_base]:
//!
//! ```rust
//! use poly_slot::{PolySlot, impl_base};
//!
//! trait Greet {
//!     fn hello(&self) -> String;
//! }
//!
//! impl_base!(Greet);
//!
//! #[derive(Clone)]
//! struct English;
//!
//! impl Greet for English {
//!     fn hello(&self) -> String {
//!         "hello".to_string()
//!     }
//! }
//!
//! let slot: PolySlot<dyn Greet> = PolySlot::holding(English);
//! assert_eq!(slot.get().unwrap().hello(), "hello");
//! ```
//!
//! ## Custom inline capacity
//!
//! The inline region borrows its layout from the `S` type parameter, so
//! any size and alignment can be donated:
//!
//! ```rust
//! use std::any::Any;
//!
//! use poly_slot::PolySlot;
//!
//! /// 128 bytes at cache-line alignment.
//! #[repr(C, align(64))]
//! struct TwoCacheLines([u8; 128]);
//!
//! let mut slot: PolySlot<dyn Any, TwoCacheLines> = PolySlot::empty();
//! slot.place([7_u64; 16]);
//! assert!(!slot.is_heap());
//! ```
//!
//! ## Move-only values
//!
//! ```rust
//! use std::any::Any;
//!
//! use poly_slot::{MoveOnly, PolySlot, S64};
//!
//! struct Connection;
//!
//! let mut slot: PolySlot<dyn Any, S64, MoveOnly> = PolySlot::empty();
//! slot.place(Connection);
//!
//! // Duplication is refused at runtime rather than compile time.
//! assert!(slot.try_clone().is_err());
//! ```

mod base;
mod capability;
mod cell;
mod error;
mod slot;
mod space;
mod table;

pub use base::Base;
pub use capability::{Admits, CloneCapability, Cloneable, MoveOnly};
pub use error::Error;
pub use slot::{InlineSlot, PolySlot};
pub use space::{NoSpace, S8, S16, S32, S64, S128, S256, S512};
