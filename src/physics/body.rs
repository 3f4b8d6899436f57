use crate::ccd::{Aabb, Obb, Vec2};

/// Rigid Body - an oriented box that moves as a single unit
pub struct RigidBody {
    /// Unique ID for this body (0 = unassigned, the system fills it in)
    pub id: u32,
    /// World position (center of mass)
    pub center: Vec2,
    /// Half extents along the local axes
    pub half: Vec2,
    /// Rotation angle (radians)
    pub angle: f32,
    /// Velocity vector (units per second)
    pub velocity: Vec2,
    /// Total mass
    pub mass: f32,
    /// Bounciness (0.0 = no bounce, 1.0 = full elastic)
    pub restitution: f32,
    /// Coulomb friction coefficient
    pub friction: f32,
    /// Per-body CCD override: `None` defers to the speed threshold
    pub ccd: Option<bool>,
}

impl RigidBody {
    pub fn new(x: f32, y: f32, half_w: f32, half_h: f32) -> Self {
        Self {
            id: 0,
            center: Vec2::new(x, y),
            half: Vec2::new(half_w.abs(), half_h.abs()),
            angle: 0.0,
            velocity: Vec2::zero(),
            mass: 1.0,
            restitution: 0.3,
            friction: 0.2,
            ccd: None,
        }
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = if mass.is_finite() && mass > 0.0 { mass } else { 1.0 };
        self
    }

    pub fn set_restitution(&mut self, r: f32) {
        self.restitution = if r.is_finite() { r.clamp(0.0, 1.0) } else { 0.3 };
    }

    pub fn set_friction(&mut self, f: f32) {
        self.friction = if f.is_finite() { f.clamp(0.0, 1.0) } else { 0.2 };
    }

    #[inline]
    pub fn inv_mass(&self) -> f32 {
        if self.mass > 0.0 {
            1.0 / self.mass
        } else {
            0.0
        }
    }

    #[inline]
    pub fn as_obb(&self) -> Obb {
        Obb::new(self.center, self.half, self.angle)
    }

    /// Axis-aligned bounds ignoring rotation; used by best-effort picking.
    #[inline]
    pub fn pick_aabb(&self) -> Aabb {
        Aabb::from_center_half(self.center, self.half)
    }

    /// Apply impulse at center of mass
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        self.velocity += impulse * self.inv_mass();
    }

    #[inline]
    pub fn speed_squared(&self) -> f32 {
        self.velocity.length_squared()
    }
}

/// Id/center/half snapshot of one body, for overlays and tests.
#[derive(Clone, Copy, Debug)]
pub struct BodySnapshot {
    pub id: u32,
    pub center: Vec2,
    pub half: Vec2,
}
