/// A unit of simulation logic driven by the scheduler.
///
/// `fixed_update` runs at the fixed timestep; `frame_update` runs once per
/// rendered frame with the raw frame delta. The lifecycle hooks fire when
/// the system joins or leaves the world.
pub trait GameSystem {
    fn fixed_update(&mut self, dt: f32);

    fn frame_update(&mut self, _dt: f32) {}

    /// Whether fixed updates keep running while the world is paused.
    fn runs_while_paused(&self) -> bool {
        false
    }

    fn attached(&mut self) {}

    fn detached(&mut self) {}
}

struct Slot {
    id: u32,
    priority: i32,
    system: Box<dyn GameSystem>,
}

/// Owns the registered systems and dispatches updates in priority order
/// (highest first; ties keep registration order).
pub struct EngineWorld {
    slots: Vec<Slot>,
    next_id: u32,
    paused: bool,
}

impl EngineWorld {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            next_id: 1,
            paused: false,
        }
    }

    /// Register a system. Returns a handle usable with `remove_system`.
    pub fn add_system(&mut self, priority: i32, mut system: Box<dyn GameSystem>) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        system.attached();

        // Insert after every slot of >= priority so ties stay stable.
        let pos = self
            .slots
            .iter()
            .position(|s| s.priority < priority)
            .unwrap_or(self.slots.len());
        self.slots.insert(
            pos,
            Slot {
                id,
                priority,
                system,
            },
        );
        id
    }

    pub fn remove_system(&mut self, id: u32) -> bool {
        if let Some(pos) = self.slots.iter().position(|s| s.id == id) {
            let mut slot = self.slots.remove(pos);
            slot.system.detached();
            return true;
        }
        false
    }

    pub fn system_count(&self) -> usize {
        self.slots.len()
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    /// One fixed step through every system. While paused, only systems that
    /// opt into running while paused are invoked.
    pub fn fixed_step(&mut self, dt: f32) {
        let gate_paused = self.paused;
        self.run_fixed(dt, gate_paused);
    }

    /// One fixed step that bypasses pause gating entirely (manual stepping).
    pub fn single_step(&mut self, dt: f32) {
        self.run_fixed(dt, false);
    }

    /// Per-frame update, dispatched even while paused so overlays and
    /// interpolation keep running.
    pub fn frame(&mut self, dt: f32) {
        for id in self.snapshot_ids() {
            if let Some(slot) = self.slots.iter_mut().find(|s| s.id == id) {
                slot.system.frame_update(dt);
            }
        }
    }

    fn run_fixed(&mut self, dt: f32, gate_paused: bool) {
        for id in self.snapshot_ids() {
            if let Some(slot) = self.slots.iter_mut().find(|s| s.id == id) {
                if gate_paused && !slot.system.runs_while_paused() {
                    continue;
                }
                slot.system.fixed_update(dt);
            }
        }
    }

    // Iterate over a snapshot of ids so a system removed mid-dispatch is
    // simply skipped instead of invalidating the walk.
    fn snapshot_ids(&self) -> Vec<u32> {
        self.slots.iter().map(|s| s.id).collect()
    }
}

impl Default for EngineWorld {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Recorder {
        name: &'static str,
        log: Log,
        while_paused: bool,
    }

    impl GameSystem for Recorder {
        fn fixed_update(&mut self, _dt: f32) {
            self.log.borrow_mut().push(format!("{}:fixed", self.name));
        }

        fn frame_update(&mut self, _dt: f32) {
            self.log.borrow_mut().push(format!("{}:frame", self.name));
        }

        fn runs_while_paused(&self) -> bool {
            self.while_paused
        }

        fn attached(&mut self) {
            self.log.borrow_mut().push(format!("{}:attached", self.name));
        }

        fn detached(&mut self) {
            self.log.borrow_mut().push(format!("{}:detached", self.name));
        }
    }

    fn recorder(name: &'static str, log: &Log) -> Box<Recorder> {
        Box::new(Recorder {
            name,
            log: Rc::clone(log),
            while_paused: false,
        })
    }

    fn pause_proof_recorder(name: &'static str, log: &Log) -> Box<Recorder> {
        Box::new(Recorder {
            name,
            log: Rc::clone(log),
            while_paused: true,
        })
    }

    #[test]
    fn fixed_updates_run_in_descending_priority() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut world = EngineWorld::new();
        world.add_system(1, recorder("low", &log));
        world.add_system(5, recorder("high", &log));
        world.add_system(3, recorder("mid", &log));

        log.borrow_mut().clear();
        world.fixed_step(0.016);
        assert_eq!(
            *log.borrow(),
            vec!["high:fixed", "mid:fixed", "low:fixed"]
        );
    }

    #[test]
    fn equal_priority_keeps_registration_order() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut world = EngineWorld::new();
        world.add_system(2, recorder("first", &log));
        world.add_system(2, recorder("second", &log));

        log.borrow_mut().clear();
        world.fixed_step(0.016);
        assert_eq!(*log.borrow(), vec!["first:fixed", "second:fixed"]);
    }

    #[test]
    fn lifecycle_hooks_fire_on_add_and_remove() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut world = EngineWorld::new();
        let id = world.add_system(0, recorder("sys", &log));
        assert!(world.remove_system(id));
        assert!(!world.remove_system(id));
        assert_eq!(*log.borrow(), vec!["sys:attached", "sys:detached"]);
    }

    #[test]
    fn pause_gates_per_system_and_never_frames() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut world = EngineWorld::new();
        world.add_system(2, recorder("gated", &log));
        world.add_system(1, pause_proof_recorder("overlay", &log));
        world.set_paused(true);

        log.borrow_mut().clear();
        world.fixed_step(0.016);
        world.frame(0.016);
        assert_eq!(
            *log.borrow(),
            vec!["overlay:fixed", "gated:frame", "overlay:frame"]
        );
    }

    #[test]
    fn single_step_bypasses_pause_gating() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut world = EngineWorld::new();
        world.add_system(0, recorder("sys", &log));
        world.set_paused(true);

        log.borrow_mut().clear();
        world.single_step(0.016);
        assert_eq!(*log.borrow(), vec!["sys:fixed"]);
    }
}
