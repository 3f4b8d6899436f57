use wasm_bindgen::prelude::*;

use crate::events::Channel;

use super::perf_stats::PerfStats;
use super::WorldCore;

#[wasm_bindgen]
pub struct World {
    core: WorldCore,
}

#[wasm_bindgen]
impl World {
    /// Create a new world
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            core: WorldCore::new(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn frame(&self) -> u64 {
        self.core.frame()
    }

    #[wasm_bindgen(getter)]
    pub fn body_count(&self) -> usize {
        self.core.body_count()
    }

    #[wasm_bindgen(getter)]
    pub fn obstacle_count(&self) -> usize {
        self.core.obstacle_count()
    }

    #[wasm_bindgen(getter)]
    pub fn paused(&self) -> bool {
        self.core.paused()
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.core.set_paused(paused);
    }

    #[wasm_bindgen(getter)]
    pub fn fixed_dt(&self) -> f32 {
        self.core.fixed_dt()
    }

    /// Replace the whole settings bundle from a JSON string
    pub fn load_settings(&mut self, json: String) -> Result<(), JsValue> {
        self.core
            .load_settings_json(&json)
            .map_err(|e| JsValue::from_str(&e))?;
        Ok(())
    }

    /// Current settings bundle as JSON
    pub fn get_settings_json(&self) -> String {
        self.core.settings_json()
    }

    pub fn set_gravity(&mut self, x: f32, y: f32) {
        self.core.set_gravity(x, y);
    }

    pub fn configure_ccd(&mut self, speed_threshold: f32, epsilon: f32, enabled: bool) {
        self.core.configure_ccd(speed_threshold, epsilon, enabled);
    }

    pub fn configure_sleep(&mut self, speed_threshold: f32, frame_threshold: u32) {
        self.core.configure_sleep(speed_threshold, frame_threshold);
    }

    pub fn set_dynamic_pairs(&mut self, enabled: bool) {
        self.core.set_dynamic_pairs(enabled);
    }

    /// Enable or disable per-frame perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        self.core.enable_perf_metrics(enabled);
    }

    /// Get last frame perf snapshot (zeros when perf disabled)
    pub fn get_perf_stats(&self) -> PerfStats {
        self.core.get_perf_stats()
    }

    // === BODY / OBSTACLE API ===

    /// Spawn a rigid box at position (x, y) with the given half extents
    /// Returns the body ID
    pub fn spawn_body(&mut self, x: f32, y: f32, half_w: f32, half_h: f32) -> u32 {
        self.core.spawn_body(x, y, half_w, half_h)
    }

    pub fn spawn_body_with_mass(
        &mut self,
        x: f32,
        y: f32,
        half_w: f32,
        half_h: f32,
        mass: f32,
    ) -> u32 {
        self.core.spawn_body_with_mass(x, y, half_w, half_h, mass)
    }

    /// Remove a rigid body by ID
    pub fn remove_body(&mut self, id: u32) -> bool {
        self.core.remove_body(id)
    }

    pub fn set_body_velocity(&mut self, id: u32, vx: f32, vy: f32) {
        self.core.set_body_velocity(id, vx, vy);
    }

    pub fn wake_body(&mut self, id: u32) {
        self.core.wake_body(id);
    }

    /// Pick the first body under a world-space point. Returns 0 on miss.
    pub fn pick_at(&mut self, x: f32, y: f32) -> u32 {
        self.core.pick_at(x, y).unwrap_or(0)
    }

    /// Forward a pointer position to interested subscribers
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.core.pointer_moved(x, y);
    }

    /// Add a static obstacle (axis-aligned box)
    pub fn add_obstacle(&mut self, min_x: f32, min_y: f32, max_x: f32, max_y: f32) {
        self.core.add_obstacle(min_x, min_y, max_x, max_y);
    }

    pub fn clear_obstacles(&mut self) {
        self.core.clear_obstacles();
    }

    /// Remove all bodies and obstacles
    pub fn clear(&mut self) {
        self.core.clear();
    }

    // === STEPPING ===

    /// Advance by one rendered frame; frame_dt is in seconds.
    /// Returns the number of fixed steps taken.
    pub fn frame_advance(&mut self, frame_dt: f32) -> u32 {
        self.core.frame_advance(frame_dt)
    }

    /// Run fixed steps immediately, ignoring pause (debug stepping)
    pub fn step_manual(&mut self, substeps: u32) -> u32 {
        self.core.step_manual(substeps)
    }

    // === TRANSFER BUFFERS ===

    /// Drain pending events for a channel (0..=3) into the event buffer.
    /// Returns the number of events written.
    pub fn collect_events(&mut self, channel: u32, limit: usize) -> usize {
        match Channel::from_index(channel as usize) {
            Some(channel) => self.core.collect_events(channel, limit),
            None => 0,
        }
    }

    /// Get pointer to the event transfer buffer (for JS)
    pub fn events_ptr(&self) -> *const f32 {
        self.core.events_ptr()
    }

    pub fn events_len(&self) -> usize {
        self.core.events_len()
    }

    /// Floats per event in the transfer buffer
    pub fn event_stride(&self) -> usize {
        super::EVENT_STRIDE
    }

    /// Refresh the body snapshot buffer. Returns the number of bodies.
    pub fn collect_bodies(&mut self) -> usize {
        self.core.collect_bodies()
    }

    /// Get pointer to the body snapshot buffer (for JS)
    pub fn bodies_ptr(&self) -> *const f32 {
        self.core.bodies_ptr()
    }

    pub fn bodies_len(&self) -> usize {
        self.core.bodies_len()
    }

    /// Floats per body in the snapshot buffer
    pub fn body_stride(&self) -> usize {
        super::BODY_STRIDE
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
