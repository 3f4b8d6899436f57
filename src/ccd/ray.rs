//! Ray and circle queries used by picking/probing tooling.
//!
//! Shares the sweep module's conventions: normals are unit length and oppose
//! the incoming direction, `t` is a fraction of the query range.

use super::shapes::{Aabb, Obb};
use super::sweep::SweepHit;
use super::vec2::Vec2;

const DIR_EPS: f32 = 1e-9;

#[derive(Clone, Copy, Debug)]
pub struct RayHit {
    /// Distance along the ray, in units of `dir`'s length.
    pub t: f32,
    pub point: Vec2,
    pub normal: Vec2,
}

/// Slab test against an axis-aligned box. `max_t` bounds the parametric
/// range; an origin inside the box reports `t = 0`.
pub fn ray_vs_aabb(origin: Vec2, dir: Vec2, aabb: &Aabb, max_t: f32) -> Option<RayHit> {
    if !origin.is_finite() || !dir.is_finite() || !aabb.is_finite() || !max_t.is_finite() {
        return None;
    }
    if aabb.is_degenerate() || max_t <= 0.0 || dir.length_squared() < DIR_EPS {
        return None;
    }

    let mut tmin = 0.0f32;
    let mut tmax = max_t;
    let mut normal = Vec2::zero();

    for axis in 0..2 {
        let (o, d, lo, hi) = if axis == 0 {
            (origin.x, dir.x, aabb.min.x, aabb.max.x)
        } else {
            (origin.y, dir.y, aabb.min.y, aabb.max.y)
        };
        if d.abs() < DIR_EPS {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut t1 = (lo - o) * inv;
        let mut t2 = (hi - o) * inv;
        let mut n = if axis == 0 {
            Vec2::new(-d.signum(), 0.0)
        } else {
            Vec2::new(0.0, -d.signum())
        };
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
            n = -n;
        }
        if t1 > tmin {
            tmin = t1;
            normal = n;
        }
        tmax = tmax.min(t2);
        if tmin > tmax {
            return None;
        }
    }

    if normal == Vec2::zero() {
        // Origin inside the box.
        normal = -dir.normalize();
    }
    Some(RayHit {
        t: tmin,
        point: origin + dir * tmin,
        normal,
    })
}

/// Ray against an oriented box: transform into the box's local frame, run the
/// slab test, transform the hit back.
pub fn ray_vs_obb(origin: Vec2, dir: Vec2, obb: &Obb, max_t: f32) -> Option<RayHit> {
    if !obb.is_finite() || obb.is_degenerate() {
        return None;
    }
    let local_origin = (origin - obb.center).rotated(-obb.angle);
    let local_dir = dir.rotated(-obb.angle);
    let local_box = Aabb::from_center_half(Vec2::zero(), obb.half);

    let hit = ray_vs_aabb(local_origin, local_dir, &local_box, max_t)?;
    Some(RayHit {
        t: hit.t,
        point: obb.center + hit.point.rotated(obb.angle),
        normal: hit.normal.rotated(obb.angle),
    })
}

/// Analytic circle-vs-circle TOI over one step: solves
/// `|s + v*t| = ra + rb` for the earliest `t` in `[0, 1]`.
pub fn circle_toi(
    ca: Vec2,
    ra: f32,
    va: Vec2,
    cb: Vec2,
    rb: f32,
    vb: Vec2,
    dt: f32,
) -> Option<SweepHit> {
    if !ca.is_finite() || !cb.is_finite() || !va.is_finite() || !vb.is_finite() {
        return None;
    }
    let r = ra + rb;
    if !r.is_finite() || r <= 0.0 || !dt.is_finite() || dt <= 0.0 {
        return None;
    }

    let s = ca - cb;
    let v = (va - vb) * dt;
    let c = s.length_squared() - r * r;
    let a = v.length_squared();

    let t = if c <= 0.0 {
        // Already touching or overlapping.
        0.0
    } else if a < DIR_EPS {
        return None;
    } else {
        let b = 2.0 * s.dot(v);
        let disc = b * b - 4.0 * a * c;
        if disc < 0.0 {
            return None;
        }
        let t = (-b - disc.sqrt()) / (2.0 * a);
        if !(0.0..=1.0).contains(&t) {
            return None;
        }
        t
    };

    let normal = {
        let n = (s + v * t).normalize();
        if n == Vec2::zero() {
            Vec2::new(0.0, -1.0)
        } else {
            n
        }
    };
    let point = cb + vb * (dt * t) + normal * rb;

    Some(SweepHit {
        t,
        normal,
        point: Some(point),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slab_ray_hits_near_face() {
        let aabb = Aabb::new(Vec2::new(2.0, -1.0), Vec2::new(3.0, 1.0));
        let hit = ray_vs_aabb(Vec2::zero(), Vec2::new(1.0, 0.0), &aabb, 10.0).expect("hit");
        assert!((hit.t - 2.0).abs() < 1e-6);
        assert_eq!(hit.normal, Vec2::new(-1.0, 0.0));
        assert!((hit.point.x - 2.0).abs() < 1e-6);
    }

    #[test]
    fn slab_ray_parallel_outside_misses() {
        let aabb = Aabb::new(Vec2::new(2.0, -1.0), Vec2::new(3.0, 1.0));
        assert!(ray_vs_aabb(Vec2::new(0.0, 5.0), Vec2::new(1.0, 0.0), &aabb, 10.0).is_none());
        assert!(ray_vs_aabb(Vec2::zero(), Vec2::zero(), &aabb, 10.0).is_none());
        assert!(ray_vs_aabb(Vec2::zero(), Vec2::new(-1.0, 0.0), &aabb, 10.0).is_none());
    }

    #[test]
    fn origin_inside_reports_t_zero() {
        let aabb = Aabb::new(Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0));
        let hit = ray_vs_aabb(Vec2::zero(), Vec2::new(1.0, 0.0), &aabb, 10.0).expect("hit");
        assert_eq!(hit.t, 0.0);
        assert!(hit.normal.dot(Vec2::new(1.0, 0.0)) <= 0.0);
    }

    #[test]
    fn obb_ray_matches_aabb_when_unrotated() {
        let obb = Obb::new(Vec2::new(2.5, 0.0), Vec2::new(0.5, 1.0), 0.0);
        let aabb = Aabb::new(Vec2::new(2.0, -1.0), Vec2::new(3.0, 1.0));
        let a = ray_vs_aabb(Vec2::zero(), Vec2::new(1.0, 0.0), &aabb, 10.0).expect("hit");
        let b = ray_vs_obb(Vec2::zero(), Vec2::new(1.0, 0.0), &obb, 10.0).expect("hit");
        assert!((a.t - b.t).abs() < 1e-5);
    }

    #[test]
    fn obb_ray_respects_rotation() {
        // A 45-degree box presents its corner to the ray: first contact is
        // nearer than the unrotated face would be.
        let obb = Obb::new(
            Vec2::new(3.0, 0.0),
            Vec2::new(1.0, 1.0),
            std::f32::consts::FRAC_PI_4,
        );
        let hit = ray_vs_obb(Vec2::zero(), Vec2::new(1.0, 0.0), &obb, 10.0).expect("hit");
        let corner_x = 3.0 - std::f32::consts::SQRT_2;
        assert!((hit.t - corner_x).abs() < 1e-3);
    }

    #[test]
    fn circle_toi_head_on() {
        let hit = circle_toi(
            Vec2::zero(),
            0.5,
            Vec2::new(10.0, 0.0),
            Vec2::new(3.0, 0.0),
            0.5,
            Vec2::zero(),
            0.2,
        )
        .expect("hit");
        // Gap of 2.0 closes at 10 units/s: t = 2.0 / (10 * 0.2).
        assert!((hit.t - 1.0).abs() < 1e-4);
        assert!(hit.normal.dot(Vec2::new(10.0, 0.0)) <= 0.0);
    }

    #[test]
    fn circle_toi_misses_and_degenerates() {
        // Moving apart.
        assert!(circle_toi(
            Vec2::zero(),
            0.5,
            Vec2::new(-1.0, 0.0),
            Vec2::new(3.0, 0.0),
            0.5,
            Vec2::zero(),
            1.0,
        )
        .is_none());
        // No relative velocity, separated.
        assert!(circle_toi(
            Vec2::zero(),
            0.5,
            Vec2::zero(),
            Vec2::new(3.0, 0.0),
            0.5,
            Vec2::zero(),
            1.0,
        )
        .is_none());
        // Zero radius pair.
        assert!(circle_toi(
            Vec2::zero(),
            0.0,
            Vec2::new(1.0, 0.0),
            Vec2::new(3.0, 0.0),
            0.0,
            Vec2::zero(),
            1.0,
        )
        .is_none());
    }

    #[test]
    fn circle_toi_overlapping_reports_t_zero() {
        let hit = circle_toi(
            Vec2::new(0.1, 0.0),
            0.5,
            Vec2::zero(),
            Vec2::zero(),
            0.5,
            Vec2::zero(),
            1.0,
        )
        .expect("hit");
        assert_eq!(hit.t, 0.0);
    }
}
