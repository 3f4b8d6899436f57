use std::cell::RefCell;
use std::rc::Rc;

use crate::ccd::Aabb;
use crate::events::kinds::{
    EV_BODY_ADDED, EV_BODY_REMOVED, EV_BODY_UPDATED, EV_COLLISION, EV_IMPULSE, EV_PICK, EV_SLEEP,
    EV_WAKE,
};
use crate::events::{BusConfig, Channel, EventBus};
use crate::physics::RigidPhysicsSystem;
use crate::scheduler::{EngineWorld, FixedStepDriver, GameSystem};

use super::perf_stats::PerfStats;
use super::{WorldCore, RENDER_SUBSCRIBER};

/// Physics runs before any other system that might get registered later.
const PHYSICS_PRIORITY: i32 = 100;

/// Adapter that lets the scheduler drive the shared physics system.
struct PhysicsHandle(Rc<RefCell<RigidPhysicsSystem>>);

impl GameSystem for PhysicsHandle {
    fn fixed_update(&mut self, dt: f32) {
        self.0.borrow_mut().tick(dt);
    }
}

pub(super) fn create_world_core() -> WorldCore {
    let bus = Rc::new(EventBus::new(BusConfig::default()));
    let obstacles: Rc<RefCell<Vec<Aabb>>> = Rc::new(RefCell::new(Vec::new()));

    let query_obstacles = Rc::clone(&obstacles);
    let physics = Rc::new(RefCell::new(RigidPhysicsSystem::new(
        Rc::clone(&bus),
        Box::new(move || query_obstacles.borrow().clone()),
    )));

    let mut engine = EngineWorld::new();
    engine.add_system(PHYSICS_PRIORITY, Box::new(PhysicsHandle(Rc::clone(&physics))));

    // The render loop drains these through the flat transfer buffer.
    bus.subscribe(
        RENDER_SUBSCRIBER,
        &[
            (Channel::AfterFixedStep, EV_COLLISION),
            (Channel::AfterFixedStep, EV_IMPULSE),
            (Channel::AfterFixedStep, EV_SLEEP),
            (Channel::AfterFixedStep, EV_WAKE),
            (Channel::AfterFixedStep, EV_BODY_ADDED),
            (Channel::AfterFixedStep, EV_BODY_REMOVED),
            (Channel::AfterFixedStep, EV_BODY_UPDATED),
            (Channel::Immediate, EV_PICK),
        ],
        false,
    );

    WorldCore {
        bus,
        engine,
        driver: FixedStepDriver::default(),
        physics,
        obstacles,
        frame: 0,
        perf_enabled: false,
        perf_stats: PerfStats::default(),
        event_buffer: Vec::new(),
        body_buffer: Vec::new(),
    }
}
