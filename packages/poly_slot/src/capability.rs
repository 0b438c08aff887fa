//! Capability markers deciding, per slot type, whether placed values must
//! be cloneable.
//!
//! The capability is a type parameter of the slot rather than a runtime
//! property: a slot typed with [`Cloneable`] only admits `Clone` values and
//! is itself `Clone`, while a slot typed with [`MoveOnly`] admits anything
//! but refuses to copy. The decision is made where the slot type is named,
//! so a given slot field either always supports duplication or never does.

use std::ptr::NonNull;

trait Sealed {}

/// Marker types that decide whether a slot's values can be duplicated.
///
/// Implemented only by [`Cloneable`] and [`MoveOnly`].
#[expect(private_bounds, reason = "intentional - sealed trait")]
pub trait CloneCapability: Sealed + 'static {}

/// Grants clone table entries for a concrete type `U` under a capability.
///
/// This is what a placement call requires of the slot's capability marker:
/// [`Cloneable`] admits only `Clone` types and supplies working entries,
/// [`MoveOnly`] admits every type and supplies none.
pub trait Admits<U>: CloneCapability {
    /// Clone entry for a `U` stored in the inline region, if granted.
    #[doc(hidden)]
    const INLINE_CLONE: Option<unsafe fn(NonNull<u8>, NonNull<u8>)>;

    /// Clone entry for a `U` stored in its own heap allocation, if granted.
    #[doc(hidden)]
    const SPILLED_CLONE: Option<unsafe fn(NonNull<u8>, NonNull<u8>)>;
}

/// Capability of slots whose every value supports duplication.
///
/// Such a slot only accepts `Clone` types, and in exchange the slot itself
/// implements `Clone`. This is the default capability.
#[derive(Debug)]
pub struct Cloneable {
    _private: (),
}

/// Capability of slots that accept values without demanding `Clone`.
///
/// Duplication of such a slot is refused at runtime rather than ruled out
/// at compile time: `try_clone` reports the stored type instead. Values
/// that do happen to be cloneable can opt back in per placement via
/// `place_cloneable`.
#[derive(Debug)]
pub struct MoveOnly {
    _private: (),
}

impl Sealed for Cloneable {}
impl CloneCapability for Cloneable {}

impl Sealed for MoveOnly {}
impl CloneCapability for MoveOnly {}

impl<U> Admits<U> for Cloneable
where
    U: Clone + 'static,
{
    const INLINE_CLONE: Option<unsafe fn(NonNull<u8>, NonNull<u8>)> = Some(clone_inline::<U>);
    const SPILLED_CLONE: Option<unsafe fn(NonNull<u8>, NonNull<u8>)> = Some(clone_spilled::<U>);
}

impl<U> Admits<U> for MoveOnly {
    const INLINE_CLONE: Option<unsafe fn(NonNull<u8>, NonNull<u8>)> = None;
    const SPILLED_CLONE: Option<unsafe fn(NonNull<u8>, NonNull<u8>)> = None;
}

/// Clones an inline `U` from `src`'s region into `dst`'s region.
///
/// # Safety
///
/// `src` must hold an initialized `U`; `dst` must be dead bytes covering
/// `U`. The regions must not overlap.
unsafe fn clone_inline<U: Clone>(dst: NonNull<u8>, src: NonNull<u8>) {
    // SAFETY: the source region holds an initialized U per the contract.
    let source = unsafe { src.cast::<U>().as_ref() };
    // SAFETY: the destination region covers U and holds no live value, so
    // writing without dropping is correct.
    unsafe { dst.cast::<U>().write(source.clone()) };
}

/// Clones a spilled `U`: reads the allocation pointer recorded in `src`'s
/// region, clones the object into a fresh allocation, and records the new
/// pointer in `dst`'s region.
///
/// # Safety
///
/// `src` must record the pointer to a live spilled `U`; `dst` must be dead
/// bytes. The regions must not overlap.
unsafe fn clone_spilled<U: Clone>(dst: NonNull<u8>, src: NonNull<u8>) {
    // SAFETY: the source region records the allocation pointer per the
    // contract.
    let object = unsafe { src.cast::<NonNull<u8>>().read() };
    // SAFETY: the pointer refers to a live U placed earlier.
    let source = unsafe { object.cast::<U>().as_ref() };
    let copy = NonNull::from(Box::leak(Box::new(source.clone())));
    // SAFETY: the destination region holds no live value; recording the
    // pointer hands it ownership of the new allocation.
    unsafe { dst.cast::<NonNull<u8>>().write(copy.cast::<u8>()) };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cloneable_grants_entries() {
        assert!(<Cloneable as Admits<u64>>::INLINE_CLONE.is_some());
        assert!(<Cloneable as Admits<u64>>::SPILLED_CLONE.is_some());
    }

    #[test]
    fn move_only_grants_nothing() {
        assert!(<MoveOnly as Admits<u64>>::INLINE_CLONE.is_none());
        assert!(<MoveOnly as Admits<u64>>::SPILLED_CLONE.is_none());
    }

    #[test]
    fn inline_entry_clones_into_destination() {
        let entry = <Cloneable as Admits<u64>>::INLINE_CLONE.expect("granted above");

        let src = 41_u64;
        let mut dst = 0_u64;

        // SAFETY: distinct initialized u64 locations that do not overlap;
        // overwriting the destination without dropping is correct for a
        // Copy type.
        unsafe { entry(NonNull::from(&mut dst).cast(), NonNull::from(&src).cast()) };

        assert_eq!(dst, 41);
    }
}
