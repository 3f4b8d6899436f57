use wasm_bindgen::prelude::*;

/// Snapshot of the last advanced frame, refreshed only while perf metrics
/// are enabled.
#[wasm_bindgen]
#[derive(Clone, Default)]
pub struct PerfStats {
    pub(super) frame_ms: f64,
    pub(super) fixed_steps: u32,
    pub(super) body_count: u32,
    pub(super) sleeping_bodies: u32,
    pub(super) obstacle_count: u32,
    pub(super) collisions: u32,
    pub(super) sweep_tests: u32,
    pub(super) event_overwrite_drops: u32,
    pub(super) event_mailbox_drops: u32,
}

impl PerfStats {
    pub(crate) fn reset(&mut self) {
        *self = PerfStats::default();
    }
}

#[wasm_bindgen]
impl PerfStats {
    #[wasm_bindgen(getter)]
    pub fn frame_ms(&self) -> f64 { self.frame_ms }
    #[wasm_bindgen(getter)]
    pub fn fixed_steps(&self) -> u32 { self.fixed_steps }
    #[wasm_bindgen(getter)]
    pub fn body_count(&self) -> u32 { self.body_count }
    #[wasm_bindgen(getter)]
    pub fn sleeping_bodies(&self) -> u32 { self.sleeping_bodies }
    #[wasm_bindgen(getter)]
    pub fn obstacle_count(&self) -> u32 { self.obstacle_count }
    #[wasm_bindgen(getter)]
    pub fn collisions(&self) -> u32 { self.collisions }
    #[wasm_bindgen(getter)]
    pub fn sweep_tests(&self) -> u32 { self.sweep_tests }
    #[wasm_bindgen(getter)]
    pub fn event_overwrite_drops(&self) -> u32 { self.event_overwrite_drops }
    #[wasm_bindgen(getter)]
    pub fn event_mailbox_drops(&self) -> u32 { self.event_mailbox_drops }
}
