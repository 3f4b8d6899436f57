//! System scheduling: a priority-ordered world of game systems plus a
//! fixed-timestep driver with frame-time accumulation.

mod driver;
mod world;

pub use driver::FixedStepDriver;
pub use world::{EngineWorld, GameSystem};
