use serde::{Deserialize, Serialize};

use crate::ccd::Vec2;
use crate::physics::SleepConfig;

use super::{PerfStats, WorldCore};

/// Whole-world tuning bundle, exchanged with JS as JSON. Missing fields
/// fall back to the defaults below.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SettingsBundle {
    #[serde(default = "default_gravity_x")]
    pub gravity_x: f32,
    #[serde(default = "default_gravity_y")]
    pub gravity_y: f32,
    #[serde(default = "default_fixed_dt")]
    pub fixed_dt: f32,
    #[serde(default = "default_true")]
    pub ccd_enabled: bool,
    #[serde(default = "default_ccd_speed_threshold")]
    pub ccd_speed_threshold: f32,
    #[serde(default = "default_ccd_epsilon")]
    pub ccd_epsilon: f32,
    #[serde(default = "default_sleep_speed_threshold")]
    pub sleep_speed_threshold: f32,
    #[serde(default = "default_sleep_frame_threshold")]
    pub sleep_frame_threshold: u32,
    #[serde(default)]
    pub dynamic_pairs: bool,
}

fn default_gravity_x() -> f32 {
    0.0
}

fn default_gravity_y() -> f32 {
    9.8
}

fn default_fixed_dt() -> f32 {
    1.0 / 60.0
}

fn default_true() -> bool {
    true
}

fn default_ccd_speed_threshold() -> f32 {
    2.0
}

fn default_ccd_epsilon() -> f32 {
    1e-3
}

fn default_sleep_speed_threshold() -> f32 {
    SleepConfig::default().speed_threshold
}

fn default_sleep_frame_threshold() -> u32 {
    SleepConfig::default().frame_threshold
}

impl Default for SettingsBundle {
    fn default() -> Self {
        Self {
            gravity_x: default_gravity_x(),
            gravity_y: default_gravity_y(),
            fixed_dt: default_fixed_dt(),
            ccd_enabled: true,
            ccd_speed_threshold: default_ccd_speed_threshold(),
            ccd_epsilon: default_ccd_epsilon(),
            sleep_speed_threshold: default_sleep_speed_threshold(),
            sleep_frame_threshold: default_sleep_frame_threshold(),
            dynamic_pairs: false,
        }
    }
}

impl SettingsBundle {
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("invalid settings bundle: {}", e))
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

pub(super) fn apply_bundle(world: &mut WorldCore, bundle: &SettingsBundle) {
    set_gravity(world, bundle.gravity_x, bundle.gravity_y);
    world.driver.set_fixed_dt(bundle.fixed_dt);
    configure_ccd(
        world,
        bundle.ccd_speed_threshold,
        bundle.ccd_epsilon,
        bundle.ccd_enabled,
    );
    configure_sleep(
        world,
        bundle.sleep_speed_threshold,
        bundle.sleep_frame_threshold,
    );
    set_dynamic_pairs(world, bundle.dynamic_pairs);
}

pub(super) fn current_bundle(world: &WorldCore) -> SettingsBundle {
    let physics = world.physics.borrow();
    let gravity = physics.gravity();
    let ccd = physics.ccd_config();
    let sleep = physics.sleep_settings();
    SettingsBundle {
        gravity_x: gravity.x,
        gravity_y: gravity.y,
        fixed_dt: world.driver.fixed_dt(),
        ccd_enabled: ccd.enabled,
        ccd_speed_threshold: ccd.speed_threshold,
        ccd_epsilon: ccd.epsilon,
        sleep_speed_threshold: sleep.speed_threshold,
        sleep_frame_threshold: sleep.frame_threshold,
        dynamic_pairs: physics.dynamic_pairs(),
    }
}

pub(super) fn set_gravity(world: &mut WorldCore, x: f32, y: f32) {
    world.physics.borrow_mut().set_gravity(Vec2::new(x, y));
}

pub(super) fn configure_ccd(
    world: &mut WorldCore,
    speed_threshold: f32,
    epsilon: f32,
    enabled: bool,
) {
    world
        .physics
        .borrow_mut()
        .configure_ccd(speed_threshold, epsilon, enabled);
}

pub(super) fn configure_sleep(world: &mut WorldCore, speed_threshold: f32, frame_threshold: u32) {
    world
        .physics
        .borrow_mut()
        .configure_sleep(speed_threshold, frame_threshold);
}

pub(super) fn set_dynamic_pairs(world: &mut WorldCore, enabled: bool) {
    world.physics.borrow_mut().set_dynamic_pairs(enabled);
}

pub(super) fn enable_perf_metrics(world: &mut WorldCore, enabled: bool) {
    world.perf_enabled = enabled;
    if !enabled {
        world.perf_stats.reset();
    }
}

pub(super) fn get_perf_stats(world: &WorldCore) -> PerfStats {
    world.perf_stats.clone()
}
