//! The base-type relation connecting trait objects to storable values.
//!
//! A slot declared as `PolySlot<dyn Trait>` must turn a pointer to some
//! concrete `U` back into a `dyn Trait` pointer when handing out views.
//! That conversion needs the trait object type spelled out where the
//! compiler can see it, which is why each base trait is registered once
//! with [`impl_base!`]: the macro implements [`Base`] on the trait object
//! type itself, for every implementor of the trait.
//!
//! `dyn Any` (plain, `+ Send`, and `+ Send + Sync`) is registered by this
//! crate, so any-typed slots work with no setup.

use std::any::Any;
use std::ptr::NonNull;

/// The relation between a trait object type and the concrete types storable
/// under it.
///
/// `B: Base<U>` reads as "`B` is a base of `U`": a slot over `B` may hold a
/// `U` and can reattach `B`'s metadata to a pointer at it. Implementations
/// live on the trait object type, which keeps a downstream
/// [`impl_base!`] registration for a downstream trait coherent.
///
/// # Safety
///
/// The slot relies on implementations for memory safety. They must
/// guarantee both of the following:
///
/// - [`upcast`](Self::upcast) returns a pointer to the same object, at the
///   same address, with metadata matching the object's actual type.
/// - Every admitted `U` satisfies all auto traits of `Self`: a
///   `dyn Trait + Send` implementation must bound `U: Send`, and likewise
///   for `Sync`. Slots forward `Send` and `Sync` from `B` on the strength
///   of this guarantee.
///
/// [`impl_base!`] generates implementations satisfying both by
/// construction; prefer it over a handwritten implementation.
pub unsafe trait Base<U>: 'static {
    /// Reattaches base-type metadata to a pointer at a concrete object.
    ///
    /// Pure pointer bookkeeping: nothing is read, nothing moves.
    fn upcast(object: NonNull<U>) -> NonNull<Self>;
}

/// Registers a trait as a storable base, implementing [`Base`] on its trait
/// object type for every implementor.
///
/// Invoke it once next to the trait definition, naming the trait and any
/// auto-trait markers the stored values must carry:
///
/// ```
/// use poly_slot::{PolySlot, impl_base};
///
/// trait Instrument {
///     fn play(&self) -> String;
/// }
///
/// impl_base!(Instrument);
/// impl_base!(Instrument + Send);
///
/// #[derive(Clone)]
/// struct Cello;
///
/// impl Instrument for Cello {
///     fn play(&self) -> String {
///         "C2".to_string()
///     }
/// }
///
/// let slot: PolySlot<dyn Instrument + Send> = PolySlot::holding(Cello);
/// assert_eq!(slot.get().map(|i| i.play()), Some("C2".to_string()));
/// ```
///
/// The trait must be named by a plain identifier; `use` it into scope first
/// when it lives in another module.
#[macro_export]
macro_rules! impl_base {
    ($base:ident $(+ $auto:ident)*) => {
        unsafe impl<U: $base $(+ $auto)* + 'static> $crate::Base<U> for dyn $base $(+ $auto)* {
            fn upcast(object: ::core::ptr::NonNull<U>) -> ::core::ptr::NonNull<Self> {
                object
            }
        }
    };
}

impl_base!(Any);
impl_base!(Any + Send);
impl_base!(Any + Send + Sync);
