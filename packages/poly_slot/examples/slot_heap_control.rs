//! Controlling where `PolySlot` stores its values.
//!
//! This example demonstrates the type-level storage knobs:
//! * Sizing the inline region with a space donor
//! * Forcing every value to the heap with `NoSpace`
//! * Forbidding the heap entirely with `InlineSlot`
//! * Refusing duplication with the `MoveOnly` capability

use std::any::Any;

use poly_slot::{CloneCapability, InlineSlot, MoveOnly, NoSpace, PolySlot, S8, S64};

fn storage_of<S, C, const HEAP: bool>(slot: &PolySlot<dyn Any, S, C, HEAP>) -> &'static str
where
    C: CloneCapability,
{
    if slot.is_heap() { "heap" } else { "inline" }
}

/// Demonstrates how the space donor decides inline versus spilled storage.
fn demonstrate_space_donors() {
    println!("Example 1: Space donors");
    println!("-----------------------");

    // Eight bytes of inline space: a u64 fits, nine bytes do not.
    let mut tight: PolySlot<dyn Any, S8> = PolySlot::empty();

    tight.place(7_u64);
    println!("u64 in an 8-byte region: {}", storage_of(&tight));

    tight.place([0_u8; 9]);
    println!("9 bytes in an 8-byte region: {}", storage_of(&tight));

    // The same 9 bytes fit a larger donor.
    let mut roomy: PolySlot<dyn Any, S64> = PolySlot::empty();
    roomy.place([0_u8; 9]);
    println!("9 bytes in a 64-byte region: {}", storage_of(&roomy));

    // NoSpace donates nothing, so everything spills.
    let mut heap_only: PolySlot<dyn Any, NoSpace> = PolySlot::empty();
    heap_only.place(7_u64);
    println!("u64 with no inline region: {}", storage_of(&heap_only));

    println!();
}

/// Demonstrates the slot flavor that can never allocate.
fn demonstrate_inline_only() {
    println!("Example 2: Inline-only slots");
    println!("----------------------------");

    let mut slot: InlineSlot<dyn Any> = InlineSlot::empty();
    slot.place(7_u64);

    // A value too large for the region would be rejected at compile time
    // rather than spilled, so this slot never touches the heap.
    println!("u64 in an inline-only slot: {}", storage_of(&slot));

    println!();
}

/// Demonstrates refusing and selectively allowing duplication.
fn demonstrate_move_only() {
    println!("Example 3: Move-only slots");
    println!("--------------------------");

    struct SessionHandle;

    let mut slot: PolySlot<dyn Any, S64, MoveOnly> = PolySlot::empty();

    // The slot accepts the handle even though it implements no Clone.
    slot.place(SessionHandle);

    match slot.try_clone() {
        Ok(_) => println!("unexpectedly cloned a move-only value"),
        Err(error) => println!("duplication refused: {error}"),
    }

    // A cloneable value can opt in per placement.
    slot.place_cloneable(7_u64);
    match slot.try_clone() {
        Ok(copy) => println!("cloned after opting in: {}", copy.value_or(0_u64)),
        Err(error) => println!("unexpected refusal: {error}"),
    }

    println!();
}

fn main() {
    println!("PolySlot Storage Control Example");
    println!("================================");
    println!();

    demonstrate_space_donors();
    demonstrate_inline_only();
    demonstrate_move_only();

    println!("Example completed successfully!");
    println!();
    println!("Key insights:");
    println!("- The space donor type sets the inline region's size and alignment");
    println!("- NoSpace forces heap placement; InlineSlot forbids it at compile time");
    println!("- MoveOnly refuses duplication at runtime, with per-placement opt-in");
}
