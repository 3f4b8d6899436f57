use crate::events::kinds::EV_PERF_ROW;
use crate::events::Channel;

use super::{PerfTimer, WorldCore, BODY_STRIDE, EVENT_STRIDE, RENDER_SUBSCRIBER};

pub(super) fn frame_advance(world: &mut WorldCore, frame_dt: f32) -> u32 {
    let timer = world.perf_enabled.then(PerfTimer::start);

    world.frame += 1;
    world.bus.set_tick(Channel::BeforeFrame, world.frame);
    world.bus.set_tick(Channel::AfterFrame, world.frame);
    world.bus.set_tick(Channel::Immediate, world.frame);

    let steps = world.driver.advance(&mut world.engine, frame_dt);

    if let Some(timer) = timer {
        record_perf(world, timer.elapsed_ms(), steps);
    }
    steps
}

pub(super) fn step_manual(world: &mut WorldCore, substeps: u32) -> u32 {
    let timer = world.perf_enabled.then(PerfTimer::start);

    world.frame += 1;
    world.bus.set_tick(Channel::BeforeFrame, world.frame);
    world.bus.set_tick(Channel::AfterFrame, world.frame);
    world.bus.set_tick(Channel::Immediate, world.frame);

    let steps = world.driver.step_manual(&mut world.engine, substeps);

    if let Some(timer) = timer {
        record_perf(world, timer.elapsed_ms(), steps);
    }
    steps
}

fn record_perf(world: &mut WorldCore, frame_ms: f64, steps: u32) {
    let physics = world.physics.borrow();
    let bus_stats = world.bus.stats();

    let stats = &mut world.perf_stats;
    stats.frame_ms = frame_ms;
    stats.fixed_steps = steps;
    stats.body_count = physics.body_count() as u32;
    stats.sleeping_bodies = physics.sleeping_count() as u32;
    stats.collisions = physics.last_collisions();
    stats.sweep_tests = physics.last_sweep_tests();
    stats.obstacle_count = world.obstacles.borrow().len() as u32;
    stats.event_overwrite_drops = bus_stats
        .channels
        .iter()
        .map(|c| c.overwrite_drops)
        .sum::<u64>() as u32;
    stats.event_mailbox_drops = bus_stats.mailbox_drops as u32;

    let step_ms = if steps > 0 {
        frame_ms / f64::from(steps)
    } else {
        0.0
    };
    let body_count = stats.body_count;
    world.bus.publish(Channel::AfterFrame, EV_PERF_ROW, |w| {
        w.u(0, steps);
        w.u(1, body_count);
        w.f(0, frame_ms as f32);
        w.f(1, step_ms as f32);
    });
}

/// Drain up to `limit` pending events into the flat f32 transfer buffer.
pub(super) fn collect_events(world: &mut WorldCore, channel: Channel, limit: usize) -> usize {
    let buffer = &mut world.event_buffer;
    buffer.clear();

    let drained = world.bus.read(RENDER_SUBSCRIBER, channel, Some(limit), |ev| {
        buffer.push(ev.kind as f32);
        buffer.push(ev.tick as f32);
        buffer.push(ev.u(0) as f32);
        buffer.push(ev.u(1) as f32);
        for lane in 0..5 {
            buffer.push(ev.f(lane));
        }
        // Pad to the stride so JS can index by event number.
        buffer.extend_from_slice(&[0.0; 3]);
    });
    debug_assert_eq!(world.event_buffer.len(), drained * EVENT_STRIDE);
    drained
}

/// Snapshot every body into the flat f32 buffer for debug overlays.
pub(super) fn collect_bodies(world: &mut WorldCore) -> usize {
    let snapshots = world.physics.borrow().debug_bodies();
    let buffer = &mut world.body_buffer;
    buffer.clear();
    buffer.reserve(snapshots.len() * BODY_STRIDE);
    for body in &snapshots {
        buffer.push(body.id as f32);
        buffer.push(body.center.x);
        buffer.push(body.center.y);
        buffer.push(body.half.x);
        buffer.push(body.half.y);
    }
    snapshots.len()
}
