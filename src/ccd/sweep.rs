//! Swept separating-axis TOI tests and the CCD-aware advance helper.

use super::shapes::{Aabb, Obb};
use super::vec2::Vec2;

/// Back-off distance along the contact normal after a CCD clamp.
pub const DEFAULT_EPSILON: f32 = 1e-3;

/// Rotations closer than this to 0 or pi take the axis-aligned fast path.
const ROTATION_EPS: f32 = 1e-3;

/// Below this, an axis displacement is treated as zero to avoid near-zero
/// divisions.
const AXIS_DISP_EPS: f32 = 1e-9;

const X_AXIS: Vec2 = Vec2 { x: 1.0, y: 0.0 };
const Y_AXIS: Vec2 = Vec2 { x: 0.0, y: 1.0 };

/// First time of impact within one step. `normal` is unit length and opposes
/// the relative motion (`normal . rel_vel <= 0`).
#[derive(Clone, Copy, Debug)]
pub struct SweepHit {
    /// Fraction of the step, in `[0, 1]`.
    pub t: f32,
    pub normal: Vec2,
    pub point: Option<Vec2>,
}

/// Time window during which two 1D intervals overlap, given the moving
/// interval's displacement `d` over the step.
fn axis_window(mmin: f32, mmax: f32, smin: f32, smax: f32, d: f32) -> Option<(f32, f32)> {
    if d.abs() < AXIS_DISP_EPS {
        if mmax < smin || mmin > smax {
            return None;
        }
        return Some((f32::NEG_INFINITY, f32::INFINITY));
    }
    let t1 = (smin - mmax) / d;
    let t2 = (smax - mmin) / d;
    Some(if t1 <= t2 { (t1, t2) } else { (t2, t1) })
}

fn sweep_axes(
    axes: &[Vec2],
    moving: &Obb,
    rel_vel: Vec2,
    other: &Aabb,
    dt: f32,
) -> Option<SweepHit> {
    let disp = rel_vel * dt;
    let mut entry = f32::NEG_INFINITY;
    let mut exit = f32::INFINITY;
    let mut entry_axis = X_AXIS;
    let mut entry_d = 0.0f32;

    for &axis in axes {
        let (mmin, mmax) = moving.project(axis);
        let (smin, smax) = other.project(axis);
        let d = disp.dot(axis);
        let (t1, t2) = axis_window(mmin, mmax, smin, smax, d)?;
        if t1 > entry {
            entry = t1;
            entry_axis = axis;
            entry_d = d;
        }
        exit = exit.min(t2);
    }

    if entry > exit || entry > 1.0 || exit < 0.0 {
        return None;
    }

    let (t, normal) = if entry < 0.0 {
        // Already overlapping at t=0: synthesize a normal opposing the
        // relative velocity, or fall back to a fixed axis.
        let n = if rel_vel.length_squared() > 0.0 {
            -rel_vel.normalize()
        } else {
            Vec2::new(0.0, -1.0)
        };
        (0.0, n)
    } else {
        (entry, entry_axis * (-entry_d.signum()))
    };

    let at = moving.center + disp * t;
    let point = Vec2::new(
        at.x.clamp(other.min.x, other.max.x),
        at.y.clamp(other.min.y, other.max.y),
    );

    Some(SweepHit {
        t,
        normal: normal.normalize(),
        point: Some(point),
    })
}

/// Sweep `moving` along `rel_vel * dt` against a static box.
///
/// Axis-aligned pairs use the classic swept-interval test; rotated boxes use
/// a swept SAT over the four face-normal directions. Degenerate shapes,
/// non-finite inputs, and non-positive `dt` resolve to no hit.
pub fn sweep_toi(moving: &Obb, rel_vel: Vec2, other: &Aabb, dt: f32) -> Option<SweepHit> {
    if !moving.is_finite() || !rel_vel.is_finite() || !other.is_finite() || !dt.is_finite() {
        return None;
    }
    if dt <= 0.0 || moving.is_degenerate() || other.is_degenerate() {
        return None;
    }

    if moving.is_axis_aligned(ROTATION_EPS) {
        sweep_axes(&[X_AXIS, Y_AXIS], moving, rel_vel, other, dt)
    } else {
        let [u1, u2] = moving.axes();
        sweep_axes(&[X_AXIS, Y_AXIS, u1, u2], moving, rel_vel, other, dt)
    }
}

/// Advance a body by `velocity * dt`, clamping at the earliest TOI among
/// `obstacles`. The first blocking obstacle wins; a nearer obstacle is never
/// skipped to reach a farther one. On hit, the returned center is backed off
/// by `epsilon` along the contact normal to avoid residual interpenetration.
pub fn advance_with_ccd(
    moving: &Obb,
    velocity: Vec2,
    dt: f32,
    obstacles: &[Aabb],
    epsilon: f32,
) -> (Vec2, Option<SweepHit>) {
    let epsilon = if epsilon.is_finite() && epsilon >= 0.0 {
        epsilon
    } else {
        DEFAULT_EPSILON
    };

    let mut best: Option<SweepHit> = None;
    for obstacle in obstacles {
        if let Some(hit) = sweep_toi(moving, velocity, obstacle, dt) {
            if best.as_ref().map_or(true, |b| hit.t < b.t) {
                best = Some(hit);
            }
        }
    }

    match best {
        None => (moving.center + velocity * dt, None),
        Some(hit) => {
            let center = moving.center + velocity * (dt * hit.t) + hit.normal * epsilon;
            (center, Some(hit))
        }
    }
}
