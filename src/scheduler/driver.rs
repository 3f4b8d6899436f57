use super::world::EngineWorld;

const DEFAULT_FIXED_DT: f32 = 1.0 / 60.0;
const MAX_CATCH_UP_STEPS: u32 = 5;
const MAX_SUBSTEPS: u32 = 8;

/// Frame-time accumulator that converts irregular frame deltas into
/// fixed-size simulation steps, with a catch-up cap so a long stall never
/// snowballs into a spiral of death.
///
/// Pause is not the driver's concern: fixed steps keep flowing and the world
/// gates each system individually, so the accumulator survives a pause.
pub struct FixedStepDriver {
    fixed_dt: f32,
    accumulator: f32,
    max_catch_up: u32,
}

impl FixedStepDriver {
    pub fn new(fixed_dt: f32) -> Self {
        Self {
            fixed_dt: sanitize_dt(fixed_dt),
            accumulator: 0.0,
            max_catch_up: MAX_CATCH_UP_STEPS,
        }
    }

    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    pub fn set_fixed_dt(&mut self, fixed_dt: f32) {
        self.fixed_dt = sanitize_dt(fixed_dt);
    }

    pub fn set_max_catch_up(&mut self, steps: u32) {
        self.max_catch_up = steps.max(1);
    }

    /// Advance by one rendered frame. Runs as many fixed steps as the
    /// accumulated time allows (capped), then the per-frame update. Returns
    /// the number of fixed steps taken.
    pub fn advance(&mut self, world: &mut EngineWorld, frame_dt: f32) -> u32 {
        let frame_dt = if frame_dt.is_finite() && frame_dt > 0.0 {
            frame_dt
        } else {
            0.0
        };

        self.accumulator += frame_dt;
        let mut steps = 0;
        while self.accumulator >= self.fixed_dt && steps < self.max_catch_up {
            world.fixed_step(self.fixed_dt);
            self.accumulator -= self.fixed_dt;
            steps += 1;
        }
        // Drop backlog beyond one step's worth after hitting the cap.
        if self.accumulator > self.fixed_dt {
            self.accumulator = self.fixed_dt;
        }

        world.frame(frame_dt);
        steps
    }

    /// Run exactly one fixed delta's worth of simulation immediately, split
    /// into `substeps` equal slices, bypassing both pause gating and the
    /// accumulator. Used by single-step debugging controls. Returns the
    /// clamped substep count.
    pub fn step_manual(&mut self, world: &mut EngineWorld, substeps: u32) -> u32 {
        let substeps = substeps.clamp(1, MAX_SUBSTEPS);
        let sub_dt = self.fixed_dt / substeps as f32;
        for _ in 0..substeps {
            world.single_step(sub_dt);
        }
        substeps
    }
}

impl Default for FixedStepDriver {
    fn default() -> Self {
        Self::new(DEFAULT_FIXED_DT)
    }
}

fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 {
        dt
    } else {
        DEFAULT_FIXED_DT
    }
}
