//! Separating-axis overlap tests with minimum-translation output.

use crate::ccd::{Aabb, Obb, Vec2};

/// Resolved overlap: pushing the first shape by `normal * depth` separates
/// the pair. `normal` points from the second shape toward the first.
#[derive(Clone, Copy, Debug)]
pub struct Overlap {
    pub normal: Vec2,
    pub depth: f32,
    pub point: Vec2,
}

fn sat_axes(a: &Obb, b: &Obb, axes: &[Vec2]) -> Option<Overlap> {
    let mut best_depth = f32::INFINITY;
    let mut best_axis = Vec2::zero();

    for &axis in axes {
        let (amin, amax) = a.project(axis);
        let (bmin, bmax) = b.project(axis);
        let depth = amax.min(bmax) - amin.max(bmin);
        if depth <= 0.0 {
            return None;
        }
        if depth < best_depth {
            best_depth = depth;
            best_axis = axis;
        }
    }

    // Orient the normal so it pushes `a` away from `b`.
    let mut normal = best_axis;
    if (a.center - b.center).dot(normal) < 0.0 {
        normal = -normal;
    }

    // Approximate contact: a's surface point toward b along the normal.
    let (amin, amax) = a.project(normal);
    let radius = (amax - amin) * 0.5;
    let point = a.center - normal * (radius - best_depth * 0.5);

    Some(Overlap {
        normal,
        depth: best_depth,
        point,
    })
}

/// SAT over both boxes' face normals. Degenerate or non-finite shapes never
/// overlap.
pub fn obb_vs_obb(a: &Obb, b: &Obb) -> Option<Overlap> {
    if !a.is_finite() || !b.is_finite() || a.is_degenerate() || b.is_degenerate() {
        return None;
    }
    let [a1, a2] = a.axes();
    let [b1, b2] = b.axes();
    sat_axes(a, b, &[a1, a2, b1, b2])
}

pub fn obb_vs_aabb(a: &Obb, b: &Aabb) -> Option<Overlap> {
    if !b.is_finite() || b.is_degenerate() {
        return None;
    }
    let b_obb = Obb::new(b.center(), b.half(), 0.0);
    obb_vs_obb(a, &b_obb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separated_boxes_do_not_overlap() {
        let a = Obb::new(Vec2::zero(), Vec2::new(1.0, 1.0), 0.0);
        let b = Aabb::new(Vec2::new(3.0, -1.0), Vec2::new(5.0, 1.0));
        assert!(obb_vs_aabb(&a, &b).is_none());
    }

    #[test]
    fn mtv_uses_minimum_penetration_axis() {
        // Deep on y, shallow on x: the MTV must resolve along x.
        let a = Obb::new(Vec2::new(1.8, 0.0), Vec2::new(1.0, 1.0), 0.0);
        let b = Aabb::new(Vec2::new(2.5, -5.0), Vec2::new(4.5, 5.0));
        let ov = obb_vs_aabb(&a, &b).expect("overlap");
        assert_eq!(ov.normal, Vec2::new(-1.0, 0.0));
        assert!((ov.depth - 0.3).abs() < 1e-5);

        // Applying the MTV separates the pair.
        let mut resolved = a;
        resolved.center += ov.normal * ov.depth;
        assert!(obb_vs_aabb(&resolved, &b).is_none());
    }

    #[test]
    fn normal_points_from_second_toward_first() {
        let below = Obb::new(Vec2::new(0.0, 1.6), Vec2::new(1.0, 1.0), 0.0);
        let b = Aabb::new(Vec2::new(-2.0, -1.0), Vec2::new(2.0, 1.0));
        let ov = obb_vs_aabb(&below, &b).expect("overlap");
        assert_eq!(ov.normal, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn rotated_corner_contact_is_detected() {
        // A diamond whose corner dips into the box top; its AABB footprint
        // overlaps more than the SAT depth.
        let diamond = Obb::new(
            Vec2::new(0.0, -1.3),
            Vec2::new(1.0, 1.0),
            std::f32::consts::FRAC_PI_4,
        );
        let floor = Aabb::new(Vec2::new(-5.0, 0.0), Vec2::new(5.0, 1.0));
        let ov = obb_vs_obb(&diamond, &Obb::new(floor.center(), floor.half(), 0.0));
        let ov = ov.expect("corner overlap");
        // Corner reaches sqrt(2) below the center: penetration past y=0.
        assert!((ov.depth - (std::f32::consts::SQRT_2 - 1.3)).abs() < 1e-4);
        assert_eq!(ov.normal, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn degenerate_box_never_overlaps() {
        let flat = Obb::new(Vec2::zero(), Vec2::new(0.0, 1.0), 0.0);
        let b = Aabb::new(Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0));
        assert!(obb_vs_aabb(&flat, &b).is_none());
    }
}
