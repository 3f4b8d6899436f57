use super::vec2::Vec2;

/// Axis-aligned box, min/max corners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center_half(center: Vec2, half: Vec2) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn half(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Zero or negative extent on either axis.
    pub fn is_degenerate(&self) -> bool {
        self.max.x <= self.min.x || self.max.y <= self.min.y
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Projection interval onto a unit axis.
    pub fn project(&self, axis: Vec2) -> (f32, f32) {
        let c = self.center().dot(axis);
        let h = self.half();
        let r = h.x * axis.x.abs() + h.y * axis.y.abs();
        (c - r, c + r)
    }
}

/// Oriented box: center, half extents, rotation angle in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Obb {
    pub center: Vec2,
    pub half: Vec2,
    pub angle: f32,
}

impl Obb {
    pub fn new(center: Vec2, half: Vec2, angle: f32) -> Self {
        Self { center, half, angle }
    }

    /// Local x/y face-normal directions in world space (unit vectors).
    pub fn axes(&self) -> [Vec2; 2] {
        let (sin, cos) = self.angle.sin_cos();
        [Vec2::new(cos, sin), Vec2::new(-sin, cos)]
    }

    /// True when the rotation is within `eps` of 0 or pi (box symmetry makes
    /// both cases axis-aligned).
    pub fn is_axis_aligned(&self, eps: f32) -> bool {
        let r = self.angle.rem_euclid(std::f32::consts::PI);
        r < eps || std::f32::consts::PI - r < eps
    }

    /// Bounding AABB ignoring rotation; exact when axis-aligned.
    pub fn local_aabb(&self) -> Aabb {
        Aabb::from_center_half(self.center, self.half)
    }

    pub fn is_degenerate(&self) -> bool {
        self.half.x <= 0.0 || self.half.y <= 0.0
    }

    pub fn is_finite(&self) -> bool {
        self.center.is_finite() && self.half.is_finite() && self.angle.is_finite()
    }

    /// Projection interval onto a unit axis.
    pub fn project(&self, axis: Vec2) -> (f32, f32) {
        let [u1, u2] = self.axes();
        let c = self.center.dot(axis);
        let r = self.half.x * u1.dot(axis).abs() + self.half.y * u2.dot(axis).abs();
        (c - r, c + r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn obb_projection_matches_aabb_when_unrotated() {
        let obb = Obb::new(Vec2::new(3.0, 4.0), Vec2::new(1.0, 2.0), 0.0);
        let aabb = Aabb::from_center_half(Vec2::new(3.0, 4.0), Vec2::new(1.0, 2.0));
        let axis = Vec2::new(1.0, 0.0);
        assert_eq!(obb.project(axis), aabb.project(axis));
        let axis = Vec2::new(0.0, 1.0);
        assert_eq!(obb.project(axis), aabb.project(axis));
    }

    #[test]
    fn axis_aligned_detection_handles_pi() {
        let eps = 1e-3;
        assert!(Obb::new(Vec2::zero(), Vec2::new(1.0, 1.0), 0.0).is_axis_aligned(eps));
        assert!(Obb::new(Vec2::zero(), Vec2::new(1.0, 1.0), std::f32::consts::PI).is_axis_aligned(eps));
        assert!(!Obb::new(Vec2::zero(), Vec2::new(1.0, 1.0), 0.5).is_axis_aligned(eps));
    }
}
