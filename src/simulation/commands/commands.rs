use crate::ccd::{Aabb, Vec2};
use crate::events::kinds::EV_POINTER_MOVE;
use crate::events::Channel;
use crate::physics::RigidBody;

use super::WorldCore;

pub(super) fn spawn_body(world: &mut WorldCore, x: f32, y: f32, half_w: f32, half_h: f32) -> u32 {
    world
        .physics
        .borrow_mut()
        .add_body(RigidBody::new(x, y, half_w, half_h))
}

pub(super) fn spawn_body_with_mass(
    world: &mut WorldCore,
    x: f32,
    y: f32,
    half_w: f32,
    half_h: f32,
    mass: f32,
) -> u32 {
    world
        .physics
        .borrow_mut()
        .add_body(RigidBody::new(x, y, half_w, half_h).with_mass(mass))
}

pub(super) fn remove_body(world: &mut WorldCore, id: u32) -> bool {
    world.physics.borrow_mut().remove_body(id)
}

pub(super) fn set_body_velocity(world: &mut WorldCore, id: u32, vx: f32, vy: f32) {
    world
        .physics
        .borrow_mut()
        .set_body_velocity(id, Vec2::new(vx, vy));
}

pub(super) fn wake_body(world: &mut WorldCore, id: u32) {
    world.physics.borrow_mut().wake_body(id);
}

pub(super) fn pick_at(world: &mut WorldCore, x: f32, y: f32) -> Option<u32> {
    world.physics.borrow().pick_at(Vec2::new(x, y))
}

pub(super) fn pointer_moved(world: &mut WorldCore, x: f32, y: f32) {
    if !x.is_finite() || !y.is_finite() {
        return;
    }
    world
        .bus
        .publish(Channel::BeforeFrame, EV_POINTER_MOVE, |w| {
            w.f(0, x);
            w.f(1, y);
        });
}

pub(super) fn add_obstacle(world: &mut WorldCore, min_x: f32, min_y: f32, max_x: f32, max_y: f32) {
    let aabb = Aabb::new(Vec2::new(min_x, min_y), Vec2::new(max_x, max_y));
    if !aabb.is_finite() || aabb.is_degenerate() {
        return;
    }
    world.obstacles.borrow_mut().push(aabb);
}

pub(super) fn clear_obstacles(world: &mut WorldCore) {
    world.obstacles.borrow_mut().clear();
}

pub(super) fn clear(world: &mut WorldCore) {
    let ids: Vec<u32> = world
        .physics
        .borrow()
        .debug_bodies()
        .iter()
        .map(|b| b.id)
        .collect();
    let mut physics = world.physics.borrow_mut();
    for id in ids {
        physics.remove_body(id);
    }
    drop(physics);
    world.obstacles.borrow_mut().clear();
    world.event_buffer.clear();
    world.body_buffer.clear();
}
