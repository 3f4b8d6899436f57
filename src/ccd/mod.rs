//! Continuous collision detection: swept TOI tests and ray/circle queries.
//!
//! Sweeps assume no angular motion during the sweep window: a shape's
//! orientation is fixed for the duration of one sweep.

mod vec2;
mod shapes;
mod sweep;
mod ray;

pub use vec2::Vec2;
pub use shapes::{Aabb, Obb};
pub use sweep::{advance_with_ccd, sweep_toi, SweepHit, DEFAULT_EPSILON};
pub use ray::{circle_toi, ray_vs_aabb, ray_vs_obb, RayHit};
