//! Allocation behavior of slots, verified against a tracking allocator.
//!
//! Inline placement must not allocate at all; a spilled placement must
//! allocate exactly the payload's size, exactly once. Moving a value
//! between slots must never allocate, whichever way it is stored.

#![cfg(not(miri))] // Miri replaces the global allocator, so cannot be used here.

use std::any::Any;

use alloc_tracker::{Allocator, Session};
use poly_slot::{NoSpace, PolySlot};

#[global_allocator]
static ALLOCATOR: Allocator<std::alloc::System> = Allocator::system();

/// 512 bytes, which spills out of the default 64-byte inline region.
#[derive(Clone)]
struct Massive {
    _bulk: [u64; 64],
}

impl Massive {
    fn new() -> Self {
        Self { _bulk: [0; 64] }
    }
}

#[test]
fn inline_placement_does_not_allocate() {
    let session = Session::new();
    let op = session.operation("place_inline");

    let mut slot: PolySlot<dyn Any> = PolySlot::empty();

    {
        let _span = op.measure_thread();
        slot.place(7_u64);
    }

    assert_eq!(op.total_bytes_allocated(), 0);
    assert!(!slot.is_heap());
}

#[test]
fn spilled_placement_allocates_exactly_the_payload() {
    let session = Session::new();
    let op = session.operation("place_spilled");

    let mut slot: PolySlot<dyn Any> = PolySlot::empty();

    {
        let _span = op.measure_thread();
        slot.place(Massive::new());
    }

    assert_eq!(op.total_bytes_allocated(), 512);
    assert!(slot.is_heap());
}

#[test]
fn cloning_an_inline_value_does_not_allocate() {
    let session = Session::new();
    let op = session.operation("clone_inline");

    let slot: PolySlot<dyn Any> = PolySlot::holding(7_u64);

    let copy = {
        let _span = op.measure_thread();
        slot.clone()
    };

    assert_eq!(op.total_bytes_allocated(), 0);
    assert!(copy.is::<u64>());
}

#[test]
fn cloning_a_spilled_value_allocates_exactly_the_payload() {
    let session = Session::new();
    let op = session.operation("clone_spilled");

    let slot: PolySlot<dyn Any> = PolySlot::holding(Massive::new());

    let copy = {
        let _span = op.measure_thread();
        slot.clone()
    };

    assert_eq!(op.total_bytes_allocated(), 512);
    assert!(copy.is_heap());
}

#[test]
fn take_does_not_allocate() {
    let session = Session::new();
    let op = session.operation("take_spilled");

    let mut slot: PolySlot<dyn Any> = PolySlot::holding(Massive::new());

    let taken = {
        let _span = op.measure_thread();
        slot.take()
    };

    assert_eq!(op.total_bytes_allocated(), 0);
    assert!(taken.is_heap());
}

#[test]
fn heap_only_slots_allocate_exactly_the_value_size() {
    let session = Session::new();
    let op = session.operation("place_no_space");

    let mut slot: PolySlot<dyn Any, NoSpace> = PolySlot::empty();

    {
        let _span = op.measure_thread();
        slot.place(7_u64);
    }

    assert_eq!(op.total_bytes_allocated(), 8);
    assert!(slot.is_heap());
}
