//! Trait object storage with `PolySlot`.
//!
//! This example demonstrates value semantics for polymorphic objects:
//! * Placing concrete types behind a shared base trait
//! * Inline storage for small values, heap spilling for large ones
//! * Cloning and moving slots like plain values

use poly_slot::{PolySlot, impl_base};

// Define the base trait all stored values implement.
trait Sensor {
    fn label(&self) -> String;
    fn read(&self) -> f64;
    fn calibrate(&mut self, offset: f64);
}

impl_base!(Sensor);

// Small enough to live in the default 64-byte inline region.
#[derive(Clone)]
struct Thermometer {
    celsius: f64,
}

impl Sensor for Thermometer {
    fn label(&self) -> String {
        "thermometer".to_string()
    }

    fn read(&self) -> f64 {
        self.celsius
    }

    fn calibrate(&mut self, offset: f64) {
        self.celsius += offset;
    }
}

// Far too large for the inline region, so it spills to the heap.
#[derive(Clone)]
struct Spectrometer {
    bands: [f64; 32],
    gain: f64,
}

impl Spectrometer {
    fn new() -> Self {
        Self {
            bands: [0.5; 32],
            gain: 2.0,
        }
    }
}

impl Sensor for Spectrometer {
    fn label(&self) -> String {
        "spectrometer".to_string()
    }

    fn read(&self) -> f64 {
        self.bands.iter().sum::<f64>() * self.gain
    }

    fn calibrate(&mut self, offset: f64) {
        self.gain += offset;
    }
}

// Function that works with any slot regardless of the stored type.
fn describe(slot: &PolySlot<dyn Sensor>) {
    let Some(sensor) = slot.get() else {
        println!("  empty slot");
        return;
    };

    let storage = if slot.is_heap() { "heap" } else { "inline" };
    println!(
        "  {} reading {:.2} (stored {storage})",
        sensor.label(),
        sensor.read()
    );
}

/// Demonstrates that cloning a slot deep-copies the stored object.
fn demonstrate_value_semantics() {
    println!("Example 1: Value semantics");
    println!("--------------------------");

    let mut original: PolySlot<dyn Sensor> = PolySlot::holding(Thermometer { celsius: 21.5 });
    let copy = original.clone();

    // Calibrating the original leaves the copy untouched.
    if let Some(sensor) = original.get_mut() {
        sensor.calibrate(1.5);
    }

    print!("original:");
    describe(&original);
    print!("copy:    ");
    describe(&copy);

    println!();
}

/// Demonstrates inline versus spilled storage and moving between slots.
fn demonstrate_spilling_and_moves() {
    println!("Example 2: Spilling and moves");
    println!("-----------------------------");

    let mut slot: PolySlot<dyn Sensor> = PolySlot::empty();

    slot.place(Thermometer { celsius: 21.5 });
    describe(&slot);

    // The spectrometer does not fit the inline region.
    slot.place(Spectrometer::new());
    describe(&slot);

    // Moving the value keeps its storage strategy; the source empties.
    let mut taken = slot.take();
    describe(&slot);
    describe(&taken);

    // The concrete type is still reachable behind the base.
    if let Ok(spectrometer) = taken.value_mut::<Spectrometer>() {
        spectrometer.gain = 1.0;
    }
    describe(&taken);

    println!();
}

fn main() {
    println!("PolySlot Trait Object Example");
    println!("=============================");
    println!();

    demonstrate_value_semantics();
    demonstrate_spilling_and_moves();

    println!("Example completed successfully!");
    println!();
    println!("Key insights:");
    println!("- A slot owns one polymorphic value and exposes it through the base trait");
    println!("- Small values are stored inline; large ones spill to their own allocation");
    println!("- Cloning a slot clones the stored object; taking moves it without copying");
}
