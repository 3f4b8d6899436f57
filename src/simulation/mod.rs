//! World - orchestration of the sandbox simulation
//!
//! WorldCore wires the event bus, the rigid physics system and the
//! scheduler together and owns the flat transfer buffers handed to JS.
//! All actual simulation logic lives in events/, ccd/, physics/ and
//! scheduler/; this module only orchestrates.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ccd::Aabb;
use crate::events::{Channel, EventBus};
use crate::physics::RigidPhysicsSystem;
use crate::scheduler::{EngineWorld, FixedStepDriver};

#[path = "perf/perf_timer.rs"]
mod perf_timer;
#[path = "perf/perf_stats.rs"]
mod perf_stats;
#[path = "init/init.rs"]
mod init;
#[path = "init/settings.rs"]
mod settings;
#[path = "commands/commands.rs"]
mod commands;
#[path = "step/step.rs"]
mod step;
mod facade;

pub use facade::World;
pub use perf_stats::PerfStats;
pub use settings::SettingsBundle;

use perf_timer::PerfTimer;

/// Subscriber id reserved for the JS render loop.
pub(crate) const RENDER_SUBSCRIBER: u32 = 1;

/// Flat f32 layout of one drained event in the transfer buffer:
/// `[kind, tick, u0, u1, f0, f1, f2, f3, f4, 0, 0, 0]`.
pub(crate) const EVENT_STRIDE: usize = 12;

/// Flat f32 layout of one body in the debug snapshot buffer:
/// `[id, cx, cy, half_w, half_h]`.
pub(crate) const BODY_STRIDE: usize = 5;

/// The simulation world
pub struct WorldCore {
    bus: Rc<EventBus>,
    engine: EngineWorld,
    driver: FixedStepDriver,
    physics: Rc<RefCell<RigidPhysicsSystem>>,
    obstacles: Rc<RefCell<Vec<Aabb>>>,

    // State
    frame: u64,

    // Perf metrics
    perf_enabled: bool,
    perf_stats: PerfStats,

    // Transfer buffers (pointer/len handed to JS)
    event_buffer: Vec<f32>,
    body_buffer: Vec<f32>,
}

impl WorldCore {
    pub fn new() -> Self {
        init::create_world_core()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn paused(&self) -> bool {
        self.engine.paused()
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.engine.set_paused(paused);
    }

    pub fn fixed_dt(&self) -> f32 {
        self.driver.fixed_dt()
    }

    pub fn bus(&self) -> &Rc<EventBus> {
        &self.bus
    }

    /// Replace the whole settings bundle from JSON. Out-of-range values are
    /// clamped back to defaults.
    pub fn load_settings_json(&mut self, json: &str) -> Result<(), String> {
        let bundle = SettingsBundle::from_json(json)?;
        settings::apply_bundle(self, &bundle);
        Ok(())
    }

    pub fn settings_json(&self) -> String {
        settings::current_bundle(self).to_json()
    }

    pub fn set_gravity(&mut self, x: f32, y: f32) {
        settings::set_gravity(self, x, y);
    }

    pub fn configure_ccd(&mut self, speed_threshold: f32, epsilon: f32, enabled: bool) {
        settings::configure_ccd(self, speed_threshold, epsilon, enabled);
    }

    pub fn configure_sleep(&mut self, speed_threshold: f32, frame_threshold: u32) {
        settings::configure_sleep(self, speed_threshold, frame_threshold);
    }

    pub fn set_dynamic_pairs(&mut self, enabled: bool) {
        settings::set_dynamic_pairs(self, enabled);
    }

    /// Enable or disable per-frame perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        settings::enable_perf_metrics(self, enabled);
    }

    /// Get last frame perf snapshot (zeros when perf disabled)
    pub fn get_perf_stats(&self) -> PerfStats {
        settings::get_perf_stats(self)
    }

    // === BODY / OBSTACLE API ===

    /// Spawn a rigid box at position (x, y) with the given half extents
    /// Returns the body ID
    pub fn spawn_body(&mut self, x: f32, y: f32, half_w: f32, half_h: f32) -> u32 {
        commands::spawn_body(self, x, y, half_w, half_h)
    }

    pub fn spawn_body_with_mass(
        &mut self,
        x: f32,
        y: f32,
        half_w: f32,
        half_h: f32,
        mass: f32,
    ) -> u32 {
        commands::spawn_body_with_mass(self, x, y, half_w, half_h, mass)
    }

    /// Remove a rigid body by ID
    pub fn remove_body(&mut self, id: u32) -> bool {
        commands::remove_body(self, id)
    }

    /// Get number of active rigid bodies
    pub fn body_count(&self) -> usize {
        self.physics.borrow().body_count()
    }

    pub fn set_body_velocity(&mut self, id: u32, vx: f32, vy: f32) {
        commands::set_body_velocity(self, id, vx, vy)
    }

    pub fn wake_body(&mut self, id: u32) {
        commands::wake_body(self, id)
    }

    /// Pick the first body under a world-space point, if any.
    pub fn pick_at(&mut self, x: f32, y: f32) -> Option<u32> {
        commands::pick_at(self, x, y)
    }

    /// Forward a pointer position to interested subscribers.
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        commands::pointer_moved(self, x, y)
    }

    /// Add a static obstacle. Takes effect on the next tick.
    pub fn add_obstacle(&mut self, min_x: f32, min_y: f32, max_x: f32, max_y: f32) {
        commands::add_obstacle(self, min_x, min_y, max_x, max_y)
    }

    pub fn clear_obstacles(&mut self) {
        commands::clear_obstacles(self)
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacles.borrow().len()
    }

    /// Remove all bodies and obstacles
    pub fn clear(&mut self) {
        commands::clear(self)
    }

    // === STEPPING ===

    /// Advance by one rendered frame; frame_dt is in seconds.
    /// Returns the number of fixed steps taken.
    pub fn frame_advance(&mut self, frame_dt: f32) -> u32 {
        step::frame_advance(self, frame_dt)
    }

    /// Run fixed steps immediately, ignoring pause (debug stepping).
    pub fn step_manual(&mut self, substeps: u32) -> u32 {
        step::step_manual(self, substeps)
    }

    // === TRANSFER BUFFERS ===

    /// Drain the render subscriber's mailbox for one channel into the flat
    /// event buffer. Returns the number of events written.
    pub fn collect_events(&mut self, channel: Channel, limit: usize) -> usize {
        step::collect_events(self, channel, limit)
    }

    /// Get pointer to the event transfer buffer (for JS)
    pub fn events_ptr(&self) -> *const f32 {
        self.event_buffer.as_ptr()
    }

    pub fn events_len(&self) -> usize {
        self.event_buffer.len()
    }

    /// Refresh the body snapshot buffer. Returns the number of bodies.
    pub fn collect_bodies(&mut self) -> usize {
        step::collect_bodies(self)
    }

    /// Get pointer to the body snapshot buffer (for JS)
    pub fn bodies_ptr(&self) -> *const f32 {
        self.body_buffer.as_ptr()
    }

    pub fn bodies_len(&self) -> usize {
        self.body_buffer.len()
    }
}

impl Default for WorldCore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
