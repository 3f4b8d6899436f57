//! Rigid Physics System - per-tick integration, CCD, collision response
//!
//! Bodies are owned exclusively by the system for their lifetime and indexed
//! by a stable id. Sleep state lives in a parallel array indexed the same
//! way as the body arena. Static obstacles are queried, never cached.

mod body;
mod sat;
mod sleep;
mod system;

pub use body::{BodySnapshot, RigidBody};
pub use sat::{obb_vs_aabb, obb_vs_obb, Overlap};
pub use sleep::SleepConfig;
pub use system::{CcdConfig, ObstacleQuery, RigidPhysicsSystem};
