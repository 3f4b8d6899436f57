//! Pagefall Engine - rigid-body physics sandbox core in WASM
//!
//! Architecture:
//! - events/     - Multi-channel ring-buffer event bus
//! - ccd/        - Continuous collision detection (swept SAT, rays)
//! - physics/    - Rigid body system (integration, CCD, sleep, impulses)
//! - scheduler/  - Priority-ordered systems and the fixed-step driver
//! - simulation/ - Orchestration and the JS-facing facade

pub mod ccd;
pub mod events;
pub mod physics;
pub mod scheduler;
pub mod simulation;

use wasm_bindgen::prelude::*;

// Re-export main types
pub use simulation::{PerfStats, SettingsBundle, World};

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the engine
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    web_sys::console::log_1(&"🦀 Pagefall WASM Engine initialized!".into());
}

/// Get engine version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
