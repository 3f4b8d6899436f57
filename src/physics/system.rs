use std::rc::Rc;

use crate::ccd::{advance_with_ccd, Aabb, Vec2, DEFAULT_EPSILON};
use crate::events::kinds::{
    EV_BODY_ADDED, EV_BODY_REMOVED, EV_BODY_UPDATED, EV_COLLISION, EV_IMPULSE, EV_PICK, EV_SLEEP,
    EV_WAKE,
};
use crate::events::{Channel, EventBus};

use super::body::{BodySnapshot, RigidBody};
use super::sat::{obb_vs_aabb, obb_vs_obb, Overlap};
use super::sleep::{SleepConfig, SleepState};

/// Static obstacles are supplied by this query and re-fetched every tick;
/// the obstacle set may change between ticks and is never cached.
pub type ObstacleQuery = Box<dyn Fn() -> Vec<Aabb>>;

#[derive(Clone, Copy, Debug)]
pub struct CcdConfig {
    pub enabled: bool,
    /// Bodies at or above this speed (units per second) sweep instead of
    /// integrating naively, unless their per-body override says otherwise.
    pub speed_threshold: f32,
    /// Back-off distance along the contact normal after a CCD clamp.
    pub epsilon: f32,
}

impl Default for CcdConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            speed_threshold: 2.0,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl CcdConfig {
    pub fn clamped(speed_threshold: f32, epsilon: f32, enabled: bool) -> Self {
        let defaults = Self::default();
        Self {
            enabled,
            speed_threshold: if speed_threshold.is_finite() && speed_threshold >= 0.0 {
                speed_threshold
            } else {
                defaults.speed_threshold
            },
            epsilon: if epsilon.is_finite() && epsilon >= 0.0 {
                epsilon
            } else {
                defaults.epsilon
            },
        }
    }
}

/// Manages all rigid bodies in the simulation.
pub struct RigidPhysicsSystem {
    bus: Rc<EventBus>,
    obstacle_query: ObstacleQuery,
    bodies: Vec<RigidBody>,
    sleep: Vec<SleepState>,
    gravity: Vec2,
    ccd: CcdConfig,
    sleep_config: SleepConfig,
    dynamic_pairs: bool,
    next_id: u32,
    steps: u64,
    last_collisions: u32,
    last_sweep_tests: u32,
}

impl RigidPhysicsSystem {
    pub fn new(bus: Rc<EventBus>, obstacle_query: ObstacleQuery) -> Self {
        Self {
            bus,
            obstacle_query,
            bodies: Vec::new(),
            sleep: Vec::new(),
            gravity: Vec2::new(0.0, 9.8),
            ccd: CcdConfig::default(),
            sleep_config: SleepConfig::default(),
            dynamic_pairs: false,
            next_id: 1,
            steps: 0,
            last_collisions: 0,
            last_sweep_tests: 0,
        }
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        if gravity.is_finite() {
            self.gravity = gravity;
        }
    }

    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    pub fn configure_ccd(&mut self, speed_threshold: f32, epsilon: f32, enabled: bool) {
        self.ccd = CcdConfig::clamped(speed_threshold, epsilon, enabled);
    }

    pub fn configure_sleep(&mut self, speed_threshold: f32, frame_threshold: u32) {
        self.sleep_config = SleepConfig::clamped(speed_threshold, frame_threshold);
    }

    pub fn set_dynamic_pairs(&mut self, enabled: bool) {
        self.dynamic_pairs = enabled;
    }

    pub fn ccd_config(&self) -> CcdConfig {
        self.ccd
    }

    pub fn sleep_settings(&self) -> SleepConfig {
        self.sleep_config
    }

    pub fn dynamic_pairs(&self) -> bool {
        self.dynamic_pairs
    }

    /// Add a body. An id of 0 is assigned automatically; an explicit
    /// duplicate id is a programming error and panics.
    pub fn add_body(&mut self, mut body: RigidBody) -> u32 {
        if body.id == 0 {
            body.id = self.next_id;
        } else if self.bodies.iter().any(|b| b.id == body.id) {
            panic!("duplicate rigid body id {}", body.id);
        }
        self.next_id = self.next_id.max(body.id).saturating_add(1);

        publish_body(&self.bus, EV_BODY_ADDED, &body);
        let id = body.id;
        self.bodies.push(body);
        self.sleep.push(SleepState::default());
        id
    }

    /// Remove a body by id, immediately. Returns false for an unknown id.
    pub fn remove_body(&mut self, id: u32) -> bool {
        if let Some(idx) = self.bodies.iter().position(|b| b.id == id) {
            publish_body(&self.bus, EV_BODY_REMOVED, &self.bodies[idx]);
            self.bodies.swap_remove(idx);
            self.sleep.swap_remove(idx);
            return true;
        }
        false
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn sleeping_count(&self) -> usize {
        self.sleep.iter().filter(|s| s.sleeping).count()
    }

    /// Force-wake a body (used by dragging/picking tooling).
    pub fn wake_body(&mut self, id: u32) {
        if let Some(idx) = self.bodies.iter().position(|b| b.id == id) {
            if self.sleep[idx].wake() {
                publish_entity(&self.bus, EV_WAKE, self.bodies[idx].id);
            }
        }
    }

    /// Overwrite a body's velocity (dragging tooling). Wakes the body and
    /// publishes a registry update.
    pub fn set_body_velocity(&mut self, id: u32, velocity: Vec2) {
        if !velocity.is_finite() {
            return;
        }
        if let Some(idx) = self.bodies.iter().position(|b| b.id == id) {
            self.bodies[idx].velocity = velocity;
            if self.sleep[idx].wake() {
                publish_entity(&self.bus, EV_WAKE, self.bodies[idx].id);
            }
            publish_body(&self.bus, EV_BODY_UPDATED, &self.bodies[idx]);
        }
    }

    /// Snapshot of all bodies for overlays and tests.
    pub fn debug_bodies(&self) -> Vec<BodySnapshot> {
        self.bodies
            .iter()
            .map(|b| BodySnapshot {
                id: b.id,
                center: b.center,
                half: b.half,
            })
            .collect()
    }

    /// Best-effort point pick: first axis-aligned hit among tracked bodies.
    /// Publishes a pick event on the immediate channel.
    pub fn pick_at(&self, point: Vec2) -> Option<u32> {
        let hit = self.bodies.iter().find(|b| b.pick_aabb().contains(point))?;
        let id = hit.id;
        self.bus.publish(Channel::Immediate, EV_PICK, |w| {
            w.u(0, id);
            w.f(0, point.x);
            w.f(1, point.y);
        });
        Some(id)
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Collisions resolved during the last tick.
    pub fn last_collisions(&self) -> u32 {
        self.last_collisions
    }

    /// Sweep tests evaluated during the last tick.
    pub fn last_sweep_tests(&self) -> u32 {
        self.last_sweep_tests
    }

    /// One fixed step.
    pub fn tick(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.steps += 1;
        self.bus.set_tick(Channel::AfterFixedStep, self.steps);
        self.last_collisions = 0;
        self.last_sweep_tests = 0;

        let bus = Rc::clone(&self.bus);
        let obstacles = (self.obstacle_query)();
        let sleep_threshold_sq =
            self.sleep_config.speed_threshold * self.sleep_config.speed_threshold;
        let ccd_threshold_sq = self.ccd.speed_threshold * self.ccd.speed_threshold;

        for i in 0..self.bodies.len() {
            if self.sleep[i].sleeping {
                continue;
            }

            if self.bodies[i].speed_squared() < sleep_threshold_sq {
                if self.sleep[i].note_slow_frame(&self.sleep_config) {
                    // Crossed into sleep: zero out and skip the rest of the
                    // tick for this body.
                    self.bodies[i].velocity = Vec2::zero();
                    publish_entity(&bus, EV_SLEEP, self.bodies[i].id);
                    continue;
                }
            } else {
                self.sleep[i].frames_below = 0;
            }

            let gravity_dv = self.gravity * dt;
            self.bodies[i].velocity += gravity_dv;

            let velocity = self.bodies[i].velocity;
            let use_ccd = self.ccd.enabled
                && !obstacles.is_empty()
                && match self.bodies[i].ccd {
                    Some(forced) => forced,
                    None => velocity.length_squared() >= ccd_threshold_sq,
                };

            let mut sweep_hit = None;
            if use_ccd {
                self.last_sweep_tests += obstacles.len() as u32;
                let (center, hit) = advance_with_ccd(
                    &self.bodies[i].as_obb(),
                    velocity,
                    dt,
                    &obstacles,
                    self.ccd.epsilon,
                );
                self.bodies[i].center = center;
                sweep_hit = hit;
            } else {
                self.bodies[i].center += velocity * dt;
            }

            // Post-move SAT against every static obstacle: positional MTV
            // separation, then normal + friction impulses.
            let mut residual_contact = false;
            for obstacle in &obstacles {
                let Some(overlap) = obb_vs_aabb(&self.bodies[i].as_obb(), obstacle) else {
                    continue;
                };
                residual_contact = true;
                self.bodies[i].center += overlap.normal * overlap.depth;
                respond_static(&mut self.bodies[i], overlap.normal);
                publish_collision(
                    &bus,
                    self.bodies[i].id,
                    0,
                    overlap.normal,
                    overlap.point,
                    overlap.depth,
                );
                self.last_collisions += 1;
            }

            if let Some(hit) = sweep_hit {
                if !residual_contact {
                    // The CCD clamp already prevented the overlap: apply a
                    // velocity-only response sourced from the sweep result.
                    let body = &mut self.bodies[i];
                    let vn = body.velocity.dot(hit.normal);
                    if vn < 0.0 {
                        body.velocity -= hit.normal * ((1.0 + body.restitution) * vn);
                    }
                    let point = hit.point.unwrap_or(body.center);
                    let id = body.id;
                    publish_collision(&bus, id, 0, hit.normal, point, 0.0);
                    self.last_collisions += 1;
                }
            }
        }

        if self.dynamic_pairs {
            self.resolve_dynamic_pairs(&bus);
        }
    }

    /// Pairwise dynamic-dynamic resolution, after all static resolution.
    fn resolve_dynamic_pairs(&mut self, bus: &EventBus) {
        for i in 0..self.bodies.len() {
            for j in (i + 1)..self.bodies.len() {
                if self.sleep[i].sleeping && self.sleep[j].sleeping {
                    continue;
                }
                let a_obb = self.bodies[i].as_obb();
                let b_obb = self.bodies[j].as_obb();

                // Test both orientations and keep the shallower result to
                // reduce jitter.
                let ab = obb_vs_obb(&a_obb, &b_obb);
                let ba = obb_vs_obb(&b_obb, &a_obb).map(|mut ov| {
                    ov.normal = -ov.normal;
                    ov
                });
                let overlap = match (ab, ba) {
                    (Some(x), Some(y)) => {
                        if x.depth <= y.depth {
                            x
                        } else {
                            y
                        }
                    }
                    (Some(x), None) => x,
                    (None, Some(y)) => y,
                    (None, None) => continue,
                };

                self.resolve_pair(i, j, overlap, bus);

                // A dynamic impact always wakes, regardless of prior state.
                if self.sleep[i].wake() {
                    publish_entity(bus, EV_WAKE, self.bodies[i].id);
                }
                if self.sleep[j].wake() {
                    publish_entity(bus, EV_WAKE, self.bodies[j].id);
                }
            }
        }
    }

    fn resolve_pair(&mut self, i: usize, j: usize, overlap: Overlap, bus: &EventBus) {
        debug_assert!(i < j);
        let (left, right) = self.bodies.split_at_mut(j);
        let a = &mut left[i];
        let b = &mut right[0];

        let inv_a = a.inv_mass();
        let inv_b = b.inv_mass();
        let inv_sum = inv_a + inv_b;
        if inv_sum <= 0.0 {
            return;
        }
        let normal = overlap.normal;

        // Positional correction split by inverse-mass ratio.
        a.center += normal * (overlap.depth * (inv_a / inv_sum));
        b.center -= normal * (overlap.depth * (inv_b / inv_sum));

        let closing = (a.velocity - b.velocity).dot(normal);
        if closing < 0.0 {
            let e = a.restitution.min(b.restitution);
            let jn = -(1.0 + e) * closing / inv_sum;
            a.velocity += normal * (jn * inv_a);
            b.velocity -= normal * (jn * inv_b);

            let mut impulse_a = normal * jn;
            let rel = a.velocity - b.velocity;
            let tangent_vel = rel - normal * rel.dot(normal);
            let tangent_speed = tangent_vel.length();
            if tangent_speed > 1e-6 {
                let tangent = tangent_vel * (1.0 / tangent_speed);
                let max_jt = ((a.friction + b.friction) * 0.5) * jn;
                let jt = (-tangent_speed / inv_sum).max(-max_jt);
                a.velocity += tangent * (jt * inv_a);
                b.velocity -= tangent * (jt * inv_b);
                impulse_a += tangent * jt;
            }
            publish_impulse(bus, a.id, impulse_a);
            publish_impulse(bus, b.id, -impulse_a);
        }

        publish_collision(bus, a.id, b.id, normal, overlap.point, overlap.depth);
        self.last_collisions += 1;
    }
}

/// Normal + Coulomb-clamped friction impulse against an immovable obstacle.
fn respond_static(body: &mut RigidBody, normal: Vec2) {
    let closing = body.velocity.dot(normal);
    if closing >= 0.0 {
        return;
    }
    let inv_m = body.inv_mass();
    if inv_m <= 0.0 {
        return;
    }
    let jn = -(1.0 + body.restitution) * closing / inv_m;
    body.velocity += normal * (jn * inv_m);

    let tangent_vel = body.velocity - normal * body.velocity.dot(normal);
    let tangent_speed = tangent_vel.length();
    if tangent_speed > 1e-6 {
        let tangent = tangent_vel * (1.0 / tangent_speed);
        let jt = (-tangent_speed / inv_m).max(-(body.friction * jn));
        body.velocity += tangent * (jt * inv_m);
    }
}

fn publish_collision(bus: &EventBus, a: u32, b: u32, normal: Vec2, point: Vec2, depth: f32) {
    bus.publish(Channel::AfterFixedStep, EV_COLLISION, |w| {
        w.u(0, a);
        w.u(1, b);
        w.f(0, normal.x);
        w.f(1, normal.y);
        w.f(2, point.x);
        w.f(3, point.y);
        w.f(4, depth);
    });
}

fn publish_impulse(bus: &EventBus, id: u32, impulse: Vec2) {
    bus.publish(Channel::AfterFixedStep, EV_IMPULSE, |w| {
        w.u(0, id);
        w.f(0, impulse.x);
        w.f(1, impulse.y);
    });
}

fn publish_entity(bus: &EventBus, kind: u16, id: u32) {
    bus.publish(Channel::AfterFixedStep, kind, |w| {
        w.u(0, id);
    });
}

fn publish_body(bus: &EventBus, kind: u16, body: &RigidBody) {
    bus.publish(Channel::AfterFixedStep, kind, |w| {
        w.u(0, body.id);
        w.f(0, body.center.x);
        w.f(1, body.center.y);
        w.f(2, body.half.x);
        w.f(3, body.half.y);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    const SUB: u32 = 1;
    const DT: f32 = 1.0 / 60.0;

    fn system_with(obstacles: Vec<Aabb>) -> (Rc<EventBus>, RigidPhysicsSystem) {
        let bus = Rc::new(EventBus::default());
        let mut sys =
            RigidPhysicsSystem::new(Rc::clone(&bus), Box::new(move || obstacles.clone()));
        sys.set_gravity(Vec2::zero());
        (bus, sys)
    }

    fn subscribe_physics(bus: &EventBus) {
        bus.subscribe(
            SUB,
            &[
                (Channel::AfterFixedStep, EV_COLLISION),
                (Channel::AfterFixedStep, EV_SLEEP),
                (Channel::AfterFixedStep, EV_WAKE),
                (Channel::AfterFixedStep, EV_IMPULSE),
            ],
            false,
        );
    }

    fn drain_kinds(bus: &EventBus) -> Vec<u16> {
        let mut kinds = Vec::new();
        bus.read(SUB, Channel::AfterFixedStep, None, |ev| kinds.push(ev.kind));
        kinds
    }

    fn thin_wall() -> Aabb {
        Aabb::new(Vec2::new(0.25, -1.0), Vec2::new(0.26, 1.0))
    }

    #[test]
    fn fast_body_is_clamped_at_the_wall_and_reports_collision() {
        let (bus, mut sys) = system_with(vec![thin_wall()]);
        subscribe_physics(&bus);

        let mut body = RigidBody::new(0.0, 0.0, 0.1, 0.1);
        body.velocity = Vec2::new(20.0, 0.0);
        let id = sys.add_body(body);

        sys.tick(DT);

        let snapshot = sys.debug_bodies();
        assert_eq!(snapshot[0].id, id);
        assert!(snapshot[0].center.x + 0.1 <= 0.25 + 1e-3);

        let kinds = drain_kinds(&bus);
        assert!(kinds.contains(&EV_COLLISION));
    }

    #[test]
    fn ccd_override_false_integrates_naively() {
        let (bus, mut sys) = system_with(vec![thin_wall()]);
        subscribe_physics(&bus);

        let mut body = RigidBody::new(0.0, 0.0, 0.1, 0.1);
        body.velocity = Vec2::new(20.0, 0.0);
        body.ccd = Some(false);
        sys.add_body(body);

        sys.tick(DT);

        // The naive step lands past the wall: tunneled, no contact found.
        assert!(sys.debug_bodies()[0].center.x - 0.1 > 0.26);
        assert!(drain_kinds(&bus).is_empty());
    }

    #[test]
    fn ccd_override_true_sweeps_below_the_speed_threshold() {
        let (_bus, mut sys) = system_with(vec![thin_wall()]);
        sys.configure_ccd(1000.0, 1e-3, true);

        let mut body = RigidBody::new(0.2, 0.0, 0.1, 0.1);
        body.velocity = Vec2::new(1.0, 0.0);
        body.ccd = Some(true);
        sys.add_body(body);

        sys.tick(DT);
        assert!(sys.last_sweep_tests() > 0);
    }

    #[test]
    fn slow_body_sleeps_once_and_stops_moving() {
        let (bus, mut sys) = system_with(vec![]);
        subscribe_physics(&bus);
        sys.set_gravity(Vec2::new(0.0, 0.1));
        sys.configure_sleep(0.05, 3);

        let id = sys.add_body(RigidBody::new(0.0, 0.0, 0.1, 0.1));

        for _ in 0..3 {
            sys.tick(DT);
        }
        let mut sleep_ids = Vec::new();
        bus.read(SUB, Channel::AfterFixedStep, None, |ev| {
            if ev.kind == EV_SLEEP {
                sleep_ids.push(ev.u(0));
            }
        });
        assert_eq!(sleep_ids, vec![id]);
        assert_eq!(sys.sleeping_count(), 1);

        // Fully inert from now on, even with gravity still applied.
        let resting = sys.debug_bodies()[0].center;
        for _ in 0..10 {
            sys.tick(DT);
        }
        assert_eq!(sys.debug_bodies()[0].center, resting);
        assert!(sleep_ids.len() == 1);
        assert!(drain_kinds(&bus).is_empty());
    }

    #[test]
    fn dynamic_impact_wakes_a_sleeping_body() {
        let (bus, mut sys) = system_with(vec![]);
        subscribe_physics(&bus);
        sys.set_dynamic_pairs(true);
        sys.configure_sleep(0.05, 1);

        let sleeper = sys.add_body(RigidBody::new(0.0, 0.0, 0.1, 0.1));
        sys.tick(DT);
        assert_eq!(sys.sleeping_count(), 1);

        let mut mover = RigidBody::new(-0.15, 0.0, 0.1, 0.1);
        mover.velocity = Vec2::new(2.0, 0.0);
        sys.add_body(mover);

        sys.tick(DT);

        let mut wake_ids = Vec::new();
        bus.read(SUB, Channel::AfterFixedStep, None, |ev| {
            if ev.kind == EV_WAKE {
                wake_ids.push(ev.u(0));
            }
        });
        assert!(wake_ids.contains(&sleeper));
        assert_eq!(sys.sleeping_count(), 0);

        // The woken body integrates again on the next tick.
        let before = sys.debug_bodies()[0].center;
        sys.tick(DT);
        assert_ne!(sys.debug_bodies()[0].center, before);
    }

    #[test]
    fn equal_mass_impact_restitutes_and_conserves_momentum() {
        let (bus, mut sys) = system_with(vec![]);
        subscribe_physics(&bus);
        sys.set_dynamic_pairs(true);

        let e = 0.5;
        let mut a = RigidBody::new(-0.15, 0.0, 0.1, 0.1);
        a.velocity = Vec2::new(2.0, 0.0);
        a.set_restitution(e);
        a.set_friction(0.0);
        let mut b = RigidBody::new(0.0, 0.0, 0.1, 0.1);
        b.set_restitution(e);
        b.set_friction(0.0);

        sys.add_body(a);
        sys.add_body(b);

        let pre_rel = 2.0f32;
        sys.tick(DT);

        let bodies = &sys.bodies;
        let momentum = bodies[0].velocity.x + bodies[1].velocity.x;
        assert!((momentum - 2.0).abs() < 1e-4);
        let post_rel = bodies[1].velocity.x - bodies[0].velocity.x;
        assert!((post_rel - e * pre_rel).abs() < 1e-4);

        let kinds = drain_kinds(&bus);
        assert_eq!(kinds.iter().filter(|&&k| k == EV_COLLISION).count(), 1);
        assert_eq!(kinds.iter().filter(|&&k| k == EV_IMPULSE).count(), 2);
    }

    #[test]
    #[should_panic(expected = "duplicate rigid body id")]
    fn duplicate_explicit_id_panics() {
        let (_bus, mut sys) = system_with(vec![]);
        let mut a = RigidBody::new(0.0, 0.0, 1.0, 1.0);
        a.id = 42;
        let mut b = RigidBody::new(5.0, 5.0, 1.0, 1.0);
        b.id = 42;
        sys.add_body(a);
        sys.add_body(b);
    }

    #[test]
    fn remove_body_is_immediate() {
        let (_bus, mut sys) = system_with(vec![]);
        let id = sys.add_body(RigidBody::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(sys.body_count(), 1);
        assert!(sys.remove_body(id));
        assert!(!sys.remove_body(id));
        assert_eq!(sys.body_count(), 0);
    }

    #[test]
    fn obstacle_query_is_refetched_every_tick() {
        let shared: Rc<RefCell<Vec<Aabb>>> = Rc::new(RefCell::new(vec![]));
        let query = Rc::clone(&shared);
        let bus = Rc::new(EventBus::default());
        let mut sys = RigidPhysicsSystem::new(
            Rc::clone(&bus),
            Box::new(move || query.borrow().clone()),
        );
        sys.set_gravity(Vec2::zero());
        subscribe_physics(&bus);

        let mut body = RigidBody::new(0.0, 0.0, 0.1, 0.1);
        body.velocity = Vec2::new(20.0, 0.0);
        body.ccd = Some(true);
        sys.add_body(body);

        sys.tick(DT); // no obstacles yet: flies freely
        assert!(drain_kinds(&bus).is_empty());

        shared.borrow_mut().push(Aabb::new(
            Vec2::new(0.5, -1.0),
            Vec2::new(0.51, 1.0),
        ));
        sys.tick(DT); // the new wall is picked up without re-registration
        assert!(drain_kinds(&bus).contains(&EV_COLLISION));
    }

    #[test]
    fn pick_at_returns_first_axis_aligned_hit() {
        let (bus, mut sys) = system_with(vec![]);
        bus.subscribe(SUB, &[(Channel::Immediate, EV_PICK)], false);

        let id = sys.add_body(RigidBody::new(1.0, 1.0, 0.5, 0.5));
        assert_eq!(sys.pick_at(Vec2::new(1.2, 0.8)), Some(id));
        assert_eq!(sys.pick_at(Vec2::new(3.0, 3.0)), None);

        let mut picks = Vec::new();
        bus.read(SUB, Channel::Immediate, None, |ev| picks.push((ev.u(0), ev.f(0))));
        assert_eq!(picks, vec![(id, 1.2)]);
    }

    #[test]
    fn body_registry_events_are_published() {
        let (bus, mut sys) = system_with(vec![]);
        bus.subscribe(
            SUB,
            &[
                (Channel::AfterFixedStep, EV_BODY_ADDED),
                (Channel::AfterFixedStep, EV_BODY_REMOVED),
                (Channel::AfterFixedStep, EV_BODY_UPDATED),
            ],
            false,
        );

        let id = sys.add_body(RigidBody::new(2.0, 3.0, 0.5, 0.5));
        sys.set_body_velocity(id, Vec2::new(1.0, 0.0));
        sys.remove_body(id);

        let mut seen = Vec::new();
        bus.read(SUB, Channel::AfterFixedStep, None, |ev| {
            seen.push((ev.kind, ev.u(0)))
        });
        assert_eq!(
            seen,
            vec![(EV_BODY_ADDED, id), (EV_BODY_UPDATED, id), (EV_BODY_REMOVED, id)]
        );
    }

    #[test]
    fn resting_contact_settles_on_a_floor() {
        let floor = Aabb::new(Vec2::new(-5.0, 1.0), Vec2::new(5.0, 2.0));
        let (_bus, mut sys) = system_with(vec![floor]);
        sys.set_gravity(Vec2::new(0.0, 9.8));

        let mut body = RigidBody::new(0.0, 0.0, 0.2, 0.2);
        body.set_restitution(0.0);
        sys.add_body(body);

        for _ in 0..120 {
            sys.tick(DT);
        }
        let center = sys.debug_bodies()[0].center;
        // Resting on the floor surface, within the CCD epsilon.
        assert!((center.y + 0.2 - 1.0).abs() < 0.01);
        assert!(sys.sleeping_count() == 1 || sys.debug_bodies()[0].center.y <= 1.0);
    }
}
