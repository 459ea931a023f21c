//! Half-space planes and the pool slot that carries one.

use crate::math::{Vec3, Vec4};

/// An unbounded plane `dot(normal, x) = offset`.
///
/// When used for clipping, the half-space on the normal's side is kept.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub offset: f32,
}

impl Default for Plane {
    fn default() -> Self {
        Self::new(Vec3::UP, 0.0)
    }
}

impl Plane {
    pub const fn new(normal: Vec3, offset: f32) -> Self {
        Self { normal, offset }
    }

    /// Plane through `point` with the given normal.
    pub fn from_normal_and_point(normal: Vec3, point: Vec3) -> Self {
        Self::new(normal, normal.dot(point))
    }

    /// Positive on the kept side, zero on the plane, negative on the
    /// clipped side. Scaled by the normal's length.
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) - self.offset
    }

    /// Homogeneous equation `(nx, ny, nz, -offset)` as loaded into a clip
    /// unit; its dot product with a point (w=1) is the signed distance.
    pub fn equation(&self) -> Vec4 {
        Vec4::new(self.normal.x, self.normal.y, self.normal.z, -self.offset)
    }
}

/// One slot of the [`ClippingPlanePool`](super::ClippingPlanePool).
///
/// `allocated` reserves the slot for a locator for that locator's whole
/// life; `active` says the plane should clip the scene right now. An
/// unallocated slot is never active.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClippingPlane {
    plane: Plane,
    allocated: bool,
    active: bool,
}

impl ClippingPlane {
    pub fn plane(&self) -> Plane {
        self.plane
    }

    pub fn is_allocated(&self) -> bool {
        self.allocated
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn set_plane(&mut self, plane: Plane) {
        self.plane = plane;
    }

    pub(crate) fn set_allocated(&mut self, allocated: bool) {
        self.allocated = allocated;
        if !allocated {
            self.active = false;
        }
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        debug_assert!(
            !active || self.allocated,
            "activating an unallocated clipping plane"
        );
        self.active = active && self.allocated;
    }
}
