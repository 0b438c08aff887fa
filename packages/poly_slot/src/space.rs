//! Donor types that set the size and alignment of a slot's inline region.
//!
//! A slot never inspects its space donor's contents. The donor exists only
//! so its layout can be borrowed: a value whose size and alignment both fit
//! the donor is stored inline, anything else spills to its own heap
//! allocation. The presets here cover common capacities at alignment 8;
//! any other layout can be donated by a user type with the desired
//! `#[repr(align(...))]`. An example lives in the crate documentation.

/// Whether a value of type `U` can live in the inline region donated by
/// `S`.
///
/// Both dimensions must fit: the value's size and its alignment demand.
pub(crate) const fn fits<U, S>() -> bool {
    size_of::<U>() <= size_of::<S>() && align_of::<U>() <= align_of::<S>()
}

/// Inline space for values up to 8 bytes with alignment up to 8.
#[derive(Debug)]
#[repr(C, align(8))]
pub struct S8 {
    _space: [u8; 8],
}

/// Inline space for values up to 16 bytes with alignment up to 8.
#[derive(Debug)]
#[repr(C, align(8))]
pub struct S16 {
    _space: [u8; 16],
}

/// Inline space for values up to 32 bytes with alignment up to 8.
#[derive(Debug)]
#[repr(C, align(8))]
pub struct S32 {
    _space: [u8; 32],
}

/// Inline space for values up to 64 bytes with alignment up to 8.
///
/// The default donor of [`PolySlot`][crate::PolySlot].
#[derive(Debug)]
#[repr(C, align(8))]
pub struct S64 {
    _space: [u8; 64],
}

/// Inline space for values up to 128 bytes with alignment up to 8.
#[derive(Debug)]
#[repr(C, align(8))]
pub struct S128 {
    _space: [u8; 128],
}

/// Inline space for values up to 256 bytes with alignment up to 8.
#[derive(Debug)]
#[repr(C, align(8))]
pub struct S256 {
    _space: [u8; 256],
}

/// Inline space for values up to 512 bytes with alignment up to 8.
#[derive(Debug)]
#[repr(C, align(8))]
pub struct S512 {
    _space: [u8; 512],
}

/// The zero-capacity donor: spills every value with a nonzero size.
///
/// Useful when heap placement is wanted unconditionally, for example to
/// keep the slot itself small or to hand out addresses that survive the
/// slot being moved. Zero-sized values still fit, trivially.
#[derive(Debug)]
pub struct NoSpace {
    _space: (),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_layouts() {
        assert_eq!(size_of::<S8>(), 8);
        assert_eq!(size_of::<S16>(), 16);
        assert_eq!(size_of::<S32>(), 32);
        assert_eq!(size_of::<S64>(), 64);
        assert_eq!(size_of::<S128>(), 128);
        assert_eq!(size_of::<S256>(), 256);
        assert_eq!(size_of::<S512>(), 512);

        assert_eq!(align_of::<S8>(), 8);
        assert_eq!(align_of::<S512>(), 8);

        assert_eq!(size_of::<NoSpace>(), 0);
    }

    #[test]
    fn fits_checks_both_size_and_alignment() {
        #[repr(C, align(64))]
        struct Overaligned(u8);

        assert!(fits::<u64, S8>());
        assert!(fits::<[u8; 9], S16>());
        assert!(!fits::<[u8; 9], S8>());

        // Size alone would fit; the alignment demand disqualifies it.
        assert!(size_of::<Overaligned>() <= size_of::<S64>());
        assert!(!fits::<Overaligned, S64>());
    }

    #[test]
    fn no_space_admits_only_zero_sized() {
        assert!(!fits::<u8, NoSpace>());
        assert!(!fits::<u64, NoSpace>());
        assert!(fits::<(), NoSpace>());
    }
}
