//! The untagged storage cell underneath a slot.

use std::mem::{ManuallyDrop, MaybeUninit};
use std::ptr::NonNull;

/// Storage for one object: either the object's own bytes in the inline
/// region donated by `S`, or a pointer to the object's dedicated heap
/// allocation.
///
/// The cell carries no tag. The dispatch table installed next to it is the
/// tag: an inline table variant means the `inline` alternative is live, a
/// spilled variant means `spilled` is live, and the empty table means the
/// cell is dead bytes. `#[repr(C)]` keeps both alternatives at offset zero
/// so table operations address the cell uniformly through its erased
/// address.
///
/// Note that the cell is as large as the *larger* alternative: even a
/// zero-sized donor leaves room for the pointer. Placement decisions are
/// made against `S` itself, never against the widened cell.
#[repr(C)]
pub(crate) union RawCell<S> {
    /// The stored object's bytes, when an inline-kind table is installed.
    /// Union fields may not have drop glue, hence the `ManuallyDrop` wrap;
    /// actual destruction always goes through the installed table.
    inline: ManuallyDrop<MaybeUninit<S>>,
    /// The allocation owning the object, when a spilled-kind table is
    /// installed.
    spilled: NonNull<u8>,
}

impl<S> RawCell<S> {
    /// A cell with no live alternative.
    pub(crate) const fn vacant() -> Self {
        Self {
            inline: ManuallyDrop::new(MaybeUninit::uninit()),
        }
    }

    /// Address of the cell, for table operations that read.
    pub(crate) fn erased(&self) -> NonNull<u8> {
        NonNull::from(self).cast()
    }

    /// Address of the cell, for table operations that write. Deriving the
    /// pointer from a unique borrow is what entitles those operations to
    /// mutate through it.
    pub(crate) fn erased_mut(&mut self) -> NonNull<u8> {
        NonNull::from(self).cast()
    }

    /// Moves `value` into the inline region and returns its address.
    ///
    /// # Safety
    ///
    /// The cell must have no live alternative, and `U` must satisfy
    /// `fits::<U, S>()` so the inline region covers its size and alignment.
    pub(crate) unsafe fn put_inline<U>(&mut self, value: U) -> NonNull<U> {
        let object = self.erased_mut().cast::<U>();
        // SAFETY: the region covers U's layout per the caller's guarantee
        // and holds nothing live to overwrite.
        unsafe { object.write(value) };
        object
    }

    /// Moves `value` into its own allocation and records the pointer in the
    /// spilled alternative.
    ///
    /// The allocation is owned by whichever table the caller installs next;
    /// until then it is reachable only through the returned pointer.
    pub(crate) fn put_spilled<U>(&mut self, value: U) -> NonNull<U> {
        let object = NonNull::from(Box::leak(Box::new(value)));
        self.spilled = object.cast();
        object
    }
}
