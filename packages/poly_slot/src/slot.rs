use std::any::{TypeId, type_name};
use std::fmt;
use std::marker::PhantomData;
use std::mem;

use crate::base::Base;
use crate::capability::{Admits, CloneCapability, Cloneable, MoveOnly};
use crate::cell::RawCell;
use crate::error::{Error, Result};
use crate::space::{S64, fits};
use crate::table::OpsTable;

/// A single-object container that stores any type implementing the base
/// `B`, inline when the value fits and in its own heap allocation when it
/// does not.
///
/// The slot owns its object outright: dropping the slot drops the object,
/// cloning the slot clones the object, and [`take`][Self::take] moves the
/// object into a fresh slot while leaving the source empty. Unlike
/// `Box<dyn B>`, values up to the inline capacity involve no allocation at
/// all.
///
/// Three knobs tune the behavior, all decided at the type level:
///
/// * `S` donates the layout of the inline region; see [`S64`] and its
///   siblings, or donate any type with the desired size and alignment.
/// * `C` decides whether placed values must be cloneable; see
///   [`Cloneable`] and [`MoveOnly`].
/// * `HEAP` permits or forbids spilling; [`InlineSlot`] is the alias with
///   spilling forbidden.
///
/// A base must be registered with [`Base`] before it can govern a slot;
/// the [`impl_base!`][crate::impl_base] macro does this in one line, and
/// the `dyn Any` forms come pre-registered.
///
/// # Example
///
/// ```
/// use poly_slot::{PolySlot, impl_base};
///
/// trait Shape {
///     fn area(&self) -> f64;
/// }
///
/// impl_base!(Shape);
///
/// #[derive(Clone)]
/// struct Circle {
///     radius: f64,
/// }
///
/// impl Shape for Circle {
///     fn area(&self) -> f64 {
///         std::f64::consts::PI * self.radius * self.radius
///     }
/// }
///
/// let mut slot: PolySlot<dyn Shape> = PolySlot::empty();
/// slot.place(Circle { radius: 1.0 });
///
/// // The copy owns its own Circle.
/// let copy = slot.clone();
/// assert!(copy.get().unwrap().area() > 3.0);
/// ```
pub struct PolySlot<B, S = S64, C = Cloneable, const HEAP: bool = true>
where
    B: ?Sized + 'static,
    C: CloneCapability,
{
    table: &'static OpsTable<B>,
    cell: RawCell<S>,
    _capability: PhantomData<C>,
}

/// A [`PolySlot`] that never touches the heap.
///
/// Placement of a type that does not fit the inline region is rejected at
/// compile time, so every operation on this slot is allocation-free.
///
/// # Example
///
/// ```
/// use std::any::Any;
///
/// use poly_slot::InlineSlot;
///
/// let mut slot: InlineSlot<dyn Any> = InlineSlot::empty();
/// slot.place(7_u64);
/// assert!(!slot.is_heap());
/// ```
///
/// A value too large for the donated space does not compile:
///
/// ```compile_fail
/// use std::any::Any;
///
/// use poly_slot::{InlineSlot, S8};
///
/// let mut slot: InlineSlot<dyn Any, S8> = InlineSlot::empty();
/// slot.place([0_u8; 64]);
/// ```
pub type InlineSlot<B, S = S64, C = Cloneable> = PolySlot<B, S, C, false>;

impl<B, S, C, const HEAP: bool> PolySlot<B, S, C, HEAP>
where
    B: ?Sized,
    C: CloneCapability,
{
    /// Creates a slot holding no value.
    ///
    /// Does not allocate; an empty slot is a table reference and dead
    /// bytes.
    ///
    /// # Example
    ///
    /// ```
    /// use std::any::Any;
    ///
    /// use poly_slot::PolySlot;
    ///
    /// let slot: PolySlot<dyn Any> = PolySlot::empty();
    /// assert!(!slot.has_value());
    /// ```
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            table: OpsTable::EMPTY,
            cell: RawCell::vacant(),
            _capability: PhantomData,
        }
    }

    /// Creates a slot holding `value`.
    ///
    /// # Example
    ///
    /// ```
    /// use std::any::Any;
    ///
    /// use poly_slot::PolySlot;
    ///
    /// let slot: PolySlot<dyn Any> = PolySlot::holding(7_u32);
    /// assert!(slot.is::<u32>());
    /// ```
    #[must_use]
    pub fn holding<U>(value: U) -> Self
    where
        B: Base<U>,
        C: Admits<U>,
        U: 'static,
    {
        let mut slot = Self::empty();
        slot.place(value);
        slot
    }

    /// Stores `value` in the slot, dropping any previous value first.
    ///
    /// The value lands in the inline region when its size and alignment
    /// fit the space donor `S`, and in its own heap allocation otherwise.
    /// The choice is made at compile time per concrete type. Returns a
    /// reference to the stored value.
    ///
    /// # Example
    ///
    /// ```
    /// use std::any::Any;
    ///
    /// use poly_slot::PolySlot;
    ///
    /// let mut slot: PolySlot<dyn Any> = PolySlot::empty();
    ///
    /// slot.place("first".to_string());
    /// slot.place(2_u64);
    ///
    /// assert!(slot.is::<u64>());
    /// ```
    pub fn place<U>(&mut self, value: U) -> &mut U
    where
        B: Base<U>,
        C: Admits<U>,
        U: 'static,
    {
        self.install::<U, C>(value)
    }

    /// Stores the value produced by `make`, dropping any previous value
    /// first.
    ///
    /// The producer runs before the slot is touched, so a panic inside it
    /// leaves the previous value in place.
    pub fn place_with<U, F>(&mut self, make: F) -> &mut U
    where
        B: Base<U>,
        C: Admits<U>,
        U: 'static,
        F: FnOnce() -> U,
    {
        self.install::<U, C>(make())
    }

    /// Moves the stored value into a returned slot, leaving this one
    /// empty.
    ///
    /// The value keeps its storage strategy: an inline value is moved
    /// bitwise, a spilled value transfers its allocation without the
    /// object itself moving. Taking from an empty slot returns another
    /// empty slot.
    ///
    /// # Example
    ///
    /// ```
    /// use std::any::Any;
    ///
    /// use poly_slot::PolySlot;
    ///
    /// let mut slot: PolySlot<dyn Any> = PolySlot::holding("message".to_string());
    /// let taken = slot.take();
    ///
    /// assert!(!slot.has_value());
    /// assert_eq!(taken.value::<String>().unwrap(), "message");
    /// ```
    #[must_use]
    pub fn take(&mut self) -> Self {
        let mut taken = Self::empty();

        // SAFETY: the source cell is governed by its table and the taken
        // cell is vacant; the source becomes dead bytes, matching the
        // empty table installed over it below.
        unsafe { (self.table.relocate)(taken.cell.erased_mut(), self.cell.erased_mut()) };
        taken.table = mem::replace(&mut self.table, OpsTable::EMPTY);

        taken
    }

    /// Duplicates the slot, cloning the stored value.
    ///
    /// An empty slot duplicates to an empty slot. Since the slot decides
    /// inline or spilled storage per type, the copy uses the same storage
    /// strategy as the original.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotCloneable`] when the stored value was placed
    /// without clone support, which only arises under the [`MoveOnly`]
    /// capability.
    ///
    /// # Example
    ///
    /// ```
    /// use std::any::Any;
    ///
    /// use poly_slot::PolySlot;
    ///
    /// let slot: PolySlot<dyn Any> = PolySlot::holding(7_u32);
    /// let copy = slot.try_clone().unwrap();
    ///
    /// assert_eq!(*copy.value::<u32>().unwrap(), 7);
    /// ```
    pub fn try_clone(&self) -> Result<Self> {
        let Some(clone_into) = self.table.clone_into else {
            return Err(Error::NotCloneable {
                type_name: (self.table.type_name)(),
            });
        };

        let mut copy = Self::empty();

        // SAFETY: the source cell is governed by its table and the copy's
        // cell is vacant. If the value's clone panics, the copy is still
        // an intact empty slot.
        unsafe { clone_into(copy.cell.erased_mut(), self.cell.erased()) };
        copy.table = self.table;

        Ok(copy)
    }

    /// Drops the stored value, if any.
    ///
    /// The slot is empty afterwards and can be reused. Resetting an empty
    /// slot does nothing.
    pub fn reset(&mut self) {
        let table = mem::replace(&mut self.table, OpsTable::EMPTY);

        // SAFETY: the cell is governed by the table just removed; the
        // dead bytes left behind match the empty table now installed.
        unsafe { (table.destroy)(self.cell.erased_mut()) };
    }

    /// Whether the slot currently holds a value.
    #[inline]
    #[must_use]
    pub fn has_value(&self) -> bool {
        self.get().is_some()
    }

    /// Borrows the stored value through the base type.
    ///
    /// Returns `None` when the slot is empty.
    ///
    /// # Example
    ///
    /// ```
    /// use std::any::Any;
    ///
    /// use poly_slot::PolySlot;
    ///
    /// let slot: PolySlot<dyn Any> = PolySlot::holding(7_u32);
    /// let value: &dyn Any = slot.get().unwrap();
    ///
    /// assert!(value.is::<u32>());
    /// ```
    #[inline]
    #[must_use]
    pub fn get(&self) -> Option<&B> {
        // SAFETY: the cell is governed by self.table.
        let view = unsafe { (self.table.get)(self.cell.erased()) }?;

        // SAFETY: the table vouches for a live object at this address;
        // the shared borrow of self keeps it alive and unmoved.
        Some(unsafe { view.as_ref() })
    }

    /// Mutably borrows the stored value through the base type.
    ///
    /// Returns `None` when the slot is empty.
    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut B> {
        // SAFETY: the cell is governed by self.table.
        let mut view = unsafe { (self.table.get)(self.cell.erased_mut()) }?;

        // SAFETY: the table vouches for a live object at this address;
        // the exclusive borrow of self grants exclusive access to it.
        Some(unsafe { view.as_mut() })
    }

    /// Whether the stored value is exactly of type `U`.
    ///
    /// Always `false` for an empty slot.
    ///
    /// # Example
    ///
    /// ```
    /// use std::any::Any;
    ///
    /// use poly_slot::PolySlot;
    ///
    /// let slot: PolySlot<dyn Any> = PolySlot::holding(7_u32);
    ///
    /// assert!(slot.is::<u32>());
    /// assert!(!slot.is::<u64>());
    /// ```
    #[inline]
    #[must_use]
    pub fn is<U>(&self) -> bool
    where
        U: 'static,
    {
        (self.table.type_id)() == TypeId::of::<U>()
    }

    /// Borrows the stored value as its concrete type `U`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Empty`] when the slot holds nothing and
    /// [`Error::WrongType`] when it holds a value of another type.
    ///
    /// # Example
    ///
    /// ```
    /// use std::any::Any;
    ///
    /// use poly_slot::{Error, PolySlot};
    ///
    /// let slot: PolySlot<dyn Any> = PolySlot::holding(7_u32);
    ///
    /// assert_eq!(*slot.value::<u32>().unwrap(), 7);
    /// assert!(matches!(slot.value::<u64>(), Err(Error::WrongType { .. })));
    /// ```
    pub fn value<U>(&self) -> Result<&U>
    where
        U: 'static,
    {
        if !self.is::<U>() {
            return Err(self.absence::<U>());
        }

        // SAFETY: the cell is governed by self.table.
        let view = unsafe { (self.table.get)(self.cell.erased()) }
            .expect("type identity matched a concrete type, so a value is present");

        // SAFETY: the table's type identity is exactly U, so the view's
        // address is the address of a live U; the shared borrow of self
        // keeps it alive and unmoved.
        Ok(unsafe { view.cast::<U>().as_ref() })
    }

    /// Mutably borrows the stored value as its concrete type `U`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Empty`] when the slot holds nothing and
    /// [`Error::WrongType`] when it holds a value of another type.
    pub fn value_mut<U>(&mut self) -> Result<&mut U>
    where
        U: 'static,
    {
        if !self.is::<U>() {
            return Err(self.absence::<U>());
        }

        // SAFETY: the cell is governed by self.table.
        let view = unsafe { (self.table.get)(self.cell.erased_mut()) }
            .expect("type identity matched a concrete type, so a value is present");

        // SAFETY: the table's type identity is exactly U, so the view's
        // address is the address of a live U; the exclusive borrow of
        // self grants exclusive access to it.
        Ok(unsafe { view.cast::<U>().as_mut() })
    }

    /// Returns a copy of the stored value if it is a `U`, or `default`
    /// otherwise.
    ///
    /// # Example
    ///
    /// ```
    /// use std::any::Any;
    ///
    /// use poly_slot::PolySlot;
    ///
    /// let slot: PolySlot<dyn Any> = PolySlot::holding(7_u32);
    ///
    /// assert_eq!(slot.value_or(0_u32), 7);
    /// assert_eq!(slot.value_or(0_u64), 0);
    /// ```
    #[must_use]
    pub fn value_or<U>(&self, default: U) -> U
    where
        U: Clone + 'static,
    {
        self.value::<U>().map_or(default, Clone::clone)
    }

    /// Returns a copy of the stored value if it is a `U`, or the result
    /// of `fallback` otherwise.
    #[must_use]
    pub fn or_else<U, F>(&self, fallback: F) -> U
    where
        U: Clone + 'static,
        F: FnOnce() -> U,
    {
        self.value::<U>().ok().cloned().unwrap_or_else(fallback)
    }

    /// Applies `f` to the stored value if it is a `U`.
    ///
    /// Returns `None` when the slot is empty, holds another type, or `f`
    /// itself returns `None`.
    ///
    /// # Example
    ///
    /// ```
    /// use std::any::Any;
    ///
    /// use poly_slot::PolySlot;
    ///
    /// let slot: PolySlot<dyn Any> = PolySlot::holding("meow".to_string());
    ///
    /// let len = slot.and_then(|s: &String| Some(s.len()));
    /// assert_eq!(len, Some(4));
    /// ```
    pub fn and_then<U, R, F>(&self, f: F) -> Option<R>
    where
        U: 'static,
        F: FnOnce(&U) -> Option<R>,
    {
        f(self.value::<U>().ok()?)
    }

    /// Applies `f` to the stored value mutably if it is a `U`.
    ///
    /// Returns `None` when the slot is empty, holds another type, or `f`
    /// itself returns `None`.
    pub fn and_then_mut<U, R, F>(&mut self, f: F) -> Option<R>
    where
        U: 'static,
        F: FnOnce(&mut U) -> Option<R>,
    {
        f(self.value_mut::<U>().ok()?)
    }

    /// Maps the stored value through `f` if it is a `U`.
    ///
    /// # Example
    ///
    /// ```
    /// use std::any::Any;
    ///
    /// use poly_slot::PolySlot;
    ///
    /// let slot: PolySlot<dyn Any> = PolySlot::holding(7_u32);
    ///
    /// assert_eq!(slot.transform(|x: &u32| x.to_string()), Some("7".to_string()));
    /// assert_eq!(slot.transform(|x: &u64| x.to_string()), None);
    /// ```
    pub fn transform<U, R, F>(&self, f: F) -> Option<R>
    where
        U: 'static,
        F: FnOnce(&U) -> R,
    {
        self.value::<U>().ok().map(f)
    }

    /// Maps the stored value mutably through `f` if it is a `U`.
    pub fn transform_mut<U, R, F>(&mut self, f: F) -> Option<R>
    where
        U: 'static,
        F: FnOnce(&mut U) -> R,
    {
        self.value_mut::<U>().ok().map(f)
    }

    /// Whether the stored value lives in its own heap allocation.
    ///
    /// `false` for inline values and for empty slots.
    ///
    /// # Example
    ///
    /// ```
    /// use std::any::Any;
    ///
    /// use poly_slot::{PolySlot, S8};
    ///
    /// let mut slot: PolySlot<dyn Any, S8> = PolySlot::empty();
    ///
    /// slot.place(1_u64);
    /// assert!(!slot.is_heap());
    ///
    /// slot.place([1_u64; 4]);
    /// assert!(slot.is_heap());
    /// ```
    #[inline]
    #[must_use]
    pub fn is_heap(&self) -> bool {
        self.table.spilled
    }

    /// Places a value under the capability `P`, which decides the clone
    /// entries of the installed table.
    fn install<U, P>(&mut self, value: U) -> &mut U
    where
        B: Base<U>,
        P: Admits<U>,
        U: 'static,
    {
        const {
            assert!(
                HEAP || fits::<U, S>(),
                "this type does not fit the inline space of a slot that may not use the heap"
            );
        }

        self.reset();

        let place_inline = const { fits::<U, S>() };

        if place_inline {
            // SAFETY: the slot was just reset, so the cell has no live
            // alternative, and the fit was verified above.
            let mut object = unsafe { self.cell.put_inline(value) };
            self.table = OpsTable::inline_for::<U, P>();

            // SAFETY: the object was just written; the exclusive borrow
            // of self keeps it alive and unmoved for the returned
            // lifetime.
            unsafe { object.as_mut() }
        } else {
            let mut object = self.cell.put_spilled(value);
            self.table = OpsTable::spilled_for::<U, P>();

            // SAFETY: the object lives in its own allocation owned by the
            // slot; the exclusive borrow of self keeps it alive for the
            // returned lifetime.
            unsafe { object.as_mut() }
        }
    }

    /// The error explaining why `value::<U>` found nothing.
    fn absence<U>(&self) -> Error {
        if self.has_value() {
            Error::WrongType {
                requested: type_name::<U>(),
                actual: (self.table.type_name)(),
            }
        } else {
            Error::Empty
        }
    }
}

impl<B, S, const HEAP: bool> PolySlot<B, S, MoveOnly, HEAP>
where
    B: ?Sized,
{
    /// Stores `value` with clone support despite the slot's [`MoveOnly`]
    /// capability, dropping any previous value first.
    ///
    /// The capability sets the default demanded of placed values, not a
    /// ceiling: a value that happens to implement `Clone` can opt in per
    /// placement, making [`try_clone`][Self::try_clone] succeed while it
    /// is stored.
    ///
    /// # Example
    ///
    /// ```
    /// use std::any::Any;
    ///
    /// use poly_slot::{MoveOnly, PolySlot, S64};
    ///
    /// struct Token;
    ///
    /// let mut slot: PolySlot<dyn Any, S64, MoveOnly> = PolySlot::empty();
    ///
    /// slot.place(Token);
    /// assert!(slot.try_clone().is_err());
    ///
    /// slot.place_cloneable(7_u64);
    /// assert!(slot.try_clone().is_ok());
    /// ```
    pub fn place_cloneable<U>(&mut self, value: U) -> &mut U
    where
        B: Base<U>,
        U: Clone + 'static,
    {
        self.install::<U, Cloneable>(value)
    }
}

impl<B, S, const HEAP: bool> Clone for PolySlot<B, S, Cloneable, HEAP>
where
    B: ?Sized,
{
    fn clone(&self) -> Self {
        self.try_clone()
            .expect("every value placed under the Cloneable capability carries clone support")
    }
}

impl<B, S, C, const HEAP: bool> Default for PolySlot<B, S, C, HEAP>
where
    B: ?Sized,
    C: CloneCapability,
{
    fn default() -> Self {
        Self::empty()
    }
}

impl<B, S, C, const HEAP: bool> fmt::Debug for PolySlot<B, S, C, HEAP>
where
    B: ?Sized,
    C: CloneCapability,
{
    #[cfg_attr(test, mutants::skip)] // This is diagnostic output, mutation is meaningless.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stored = self.get().map(|_| (self.table.type_name)());

        f.debug_struct("PolySlot")
            .field("stored", &stored)
            .field("spilled", &self.table.spilled)
            .finish_non_exhaustive()
    }
}

impl<B, S, C, const HEAP: bool> Drop for PolySlot<B, S, C, HEAP>
where
    B: ?Sized,
    C: CloneCapability,
{
    fn drop(&mut self) {
        self.reset();
    }
}

// SAFETY: the slot owns its stored object outright, and the base relation's
// contract restricts placement to types satisfying the base's auto traits,
// so a slot whose base is `Send` only ever holds `Send` objects.
unsafe impl<B, S, C, const HEAP: bool> Send for PolySlot<B, S, C, HEAP>
where
    B: ?Sized + Send,
    C: CloneCapability,
{
}

// SAFETY: shared access to the slot only hands out shared references to the
// stored object, and the base relation's contract restricts placement to
// types satisfying the base's auto traits, so a slot whose base is `Sync`
// only ever holds `Sync` objects.
unsafe impl<B, S, C, const HEAP: bool> Sync for PolySlot<B, S, C, HEAP>
where
    B: ?Sized + Sync,
    C: CloneCapability,
{
}
