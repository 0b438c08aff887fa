//! Per-type dispatch tables for the erased storage cell.
//!
//! A table plays the role a vtable plays for a trait object. It is selected
//! once, when a concrete type is placed into a slot, and from then on it is
//! the only party that knows how to interpret the cell bytes: where the
//! object is (in the cell or behind the recorded pointer), how to clone it,
//! how to relocate it, and how to destroy it.
//!
//! Tables are stateless structs of function pointers, produced as promoted
//! `'static` constants by [`OpsTable::inline_for`] and
//! [`OpsTable::spilled_for`]. There is no registry and no lazy
//! initialization: each placement call site names its concrete type, and
//! monomorphization mints the matching table. Propagating a value's type
//! identity to another slot (during clone or relocation) is therefore a
//! plain copy of the table reference.

use std::any::{TypeId, type_name};
use std::ptr::NonNull;

use crate::base::Base;
use crate::capability::Admits;

/// Dispatch table governing one storage cell.
///
/// # Contract
///
/// Every function here must be given the erased address of a cell currently
/// governed by this exact table; the slot maintains that pairing by only
/// ever replacing table and cell contents together. The functions never
/// leave a cell half-updated: each either completes or (for a panicking
/// user `clone`) leaves the destination untouched.
pub(crate) struct OpsTable<B: ?Sized> {
    /// Base-typed view of the stored object. `None` from the empty table.
    pub(crate) get: unsafe fn(cell: NonNull<u8>) -> Option<NonNull<B>>,

    /// Constructs a copy of the object in `src`'s cell inside `dst`'s cell.
    /// `None` when the value was placed without clone support.
    pub(crate) clone_into: Option<unsafe fn(dst: NonNull<u8>, src: NonNull<u8>)>,

    /// Moves the object from `src`'s cell into `dst`'s cell, bitwise. The
    /// source cell is dead bytes afterwards and must immediately be handed
    /// the empty table.
    pub(crate) relocate: unsafe fn(dst: NonNull<u8>, src: NonNull<u8>),

    /// Destroys the stored object, releasing its allocation if spilled.
    pub(crate) destroy: unsafe fn(cell: NonNull<u8>),

    /// Exact dynamic type of the stored object.
    pub(crate) type_id: fn() -> TypeId,

    /// Diagnostic name of the stored type.
    pub(crate) type_name: fn() -> &'static str,

    /// Whether the object lives in its own heap allocation.
    pub(crate) spilled: bool,
}

/// Reported as the dynamic type of an empty slot.
///
/// Unnameable outside the crate, so no user downcast can match it.
enum Vacant {}

impl<B: ?Sized + 'static> OpsTable<B> {
    /// The neutral table: no value present, every operation a no-op.
    ///
    /// Cloning through it succeeds (an empty slot copies to an empty slot),
    /// which is why its clone entry is present rather than `None`.
    pub(crate) const EMPTY: &'static Self = &Self {
        get: vacant_get::<B>,
        clone_into: Some(vacant_clone),
        relocate: vacant_relocate,
        destroy: vacant_destroy,
        type_id: TypeId::of::<Vacant>,
        type_name: type_name::<Vacant>,
        spilled: false,
    };

    /// The table governing a `U` stored in the inline region, with clone
    /// entries as granted by the capability `C`.
    pub(crate) fn inline_for<U, C>() -> &'static Self
    where
        B: Base<U>,
        C: Admits<U>,
        U: 'static,
    {
        const {
            &Self {
                get: inline_get::<B, U>,
                clone_into: <C as Admits<U>>::INLINE_CLONE,
                relocate: inline_relocate::<U>,
                destroy: inline_destroy::<U>,
                type_id: TypeId::of::<U>,
                type_name: type_name::<U>,
                spilled: false,
            }
        }
    }

    /// The table governing a `U` stored in its own heap allocation, with
    /// clone entries as granted by the capability `C`.
    pub(crate) fn spilled_for<U, C>() -> &'static Self
    where
        B: Base<U>,
        C: Admits<U>,
        U: 'static,
    {
        const {
            &Self {
                get: spilled_get::<B, U>,
                clone_into: <C as Admits<U>>::SPILLED_CLONE,
                relocate: spilled_relocate,
                destroy: spilled_destroy::<U>,
                type_id: TypeId::of::<U>,
                type_name: type_name::<U>,
                spilled: true,
            }
        }
    }
}

/// `get` for the empty table.
unsafe fn vacant_get<B: ?Sized>(_cell: NonNull<u8>) -> Option<NonNull<B>> {
    None
}

/// `clone_into` for the empty table: cloning nothing produces nothing.
unsafe fn vacant_clone(_dst: NonNull<u8>, _src: NonNull<u8>) {}

/// `relocate` for the empty table.
unsafe fn vacant_relocate(_dst: NonNull<u8>, _src: NonNull<u8>) {}

/// `destroy` for the empty table. Keeping this a no-op is what makes
/// destruction idempotent: destroying twice is only possible through the
/// empty table, never through an occupied one.
unsafe fn vacant_destroy(_cell: NonNull<u8>) {}

/// `get` for inline storage: the object's bytes are the cell's bytes.
///
/// # Safety
///
/// `cell` must be governed by the inline table of `U`.
#[expect(
    clippy::unnecessary_wraps,
    reason = "signature must match the table's function pointer type"
)]
unsafe fn inline_get<B: ?Sized + Base<U>, U: 'static>(cell: NonNull<u8>) -> Option<NonNull<B>> {
    Some(B::upcast(cell.cast::<U>()))
}

/// `get` for spilled storage: the cell holds the pointer to the object.
///
/// # Safety
///
/// `cell` must be governed by the spilled table of `U`.
#[expect(
    clippy::unnecessary_wraps,
    reason = "signature must match the table's function pointer type"
)]
unsafe fn spilled_get<B: ?Sized + Base<U>, U: 'static>(cell: NonNull<u8>) -> Option<NonNull<B>> {
    // SAFETY: a cell governed by a spilled table has the recorded pointer
    // as its live alternative.
    let object = unsafe { cell.cast::<NonNull<u8>>().read() };
    Some(B::upcast(object.cast::<U>()))
}

/// `relocate` for inline storage: moves the object's bytes between cells.
///
/// # Safety
///
/// `src` must be governed by the inline table of `U`; `dst` must be a cell
/// with no live alternative whose inline region covers `U`.
unsafe fn inline_relocate<U>(dst: NonNull<u8>, src: NonNull<u8>) {
    // SAFETY: both regions cover U per the contract; the regions belong to
    // distinct cells, so they do not overlap.
    unsafe { dst.cast::<U>().copy_from_nonoverlapping(src.cast::<U>(), 1) };
}

/// `relocate` for spilled storage: transfers the allocation pointer. The
/// object itself never moves, so this entry does not depend on its type.
///
/// # Safety
///
/// `src` must be governed by a spilled table; `dst` must be a cell with no
/// live alternative.
unsafe fn spilled_relocate(dst: NonNull<u8>, src: NonNull<u8>) {
    // SAFETY: the source's live alternative is the recorded pointer.
    let object = unsafe { src.cast::<NonNull<u8>>().read() };
    // SAFETY: the destination holds dead bytes; recording the pointer
    // transfers ownership of the allocation.
    unsafe { dst.cast::<NonNull<u8>>().write(object) };
}

/// `destroy` for inline storage: drops the object in place.
///
/// # Safety
///
/// `cell` must be governed by the inline table of `U`, and the empty table
/// must be installed over it afterwards.
unsafe fn inline_destroy<U>(cell: NonNull<u8>) {
    // SAFETY: the inline alternative holds a live U; this ends its
    // lifetime.
    unsafe { cell.cast::<U>().drop_in_place() };
}

/// `destroy` for spilled storage: drops the object and frees its
/// allocation.
///
/// # Safety
///
/// `cell` must be governed by the spilled table of `U`, and the empty table
/// must be installed over it afterwards.
unsafe fn spilled_destroy<U>(cell: NonNull<u8>) {
    // SAFETY: the live alternative is the pointer recorded at placement.
    let object = unsafe { cell.cast::<NonNull<u8>>().read() }.cast::<U>();
    // SAFETY: the pointer came from `Box::leak` over this exact type, so
    // rebuilding the box drops the object and releases the allocation.
    drop(unsafe { Box::from_raw(object.as_ptr()) });
}
