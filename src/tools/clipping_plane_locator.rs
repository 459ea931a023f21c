use log::{debug, warn};

use super::{AnalysisTool, Locator, LocatorState, ToolId};
use crate::clipping::{ClippingPlanePool, Plane, SlotId};
use crate::math::{Mat4, Vec3};

/// A locator that owns one clipping plane for its whole life.
///
/// While the tool's button is held the plane is active and follows the
/// tool: it passes through the tool's origin, facing the tool's local up
/// direction. Releasing the button freezes and disables the plane without
/// giving the slot back, so the user can grab it again later.
#[derive(Debug)]
pub struct ClippingPlaneLocator {
    tool: ToolId,
    slot: Option<SlotId>,
}

impl ClippingPlaneLocator {
    /// Bind `tool` to the lowest free slot of `pool`. If the pool is full
    /// the locator is created unbound.
    pub fn new(tool: ToolId, pool: &mut ClippingPlanePool) -> Self {
        let slot = pool.allocate();
        match slot {
            Some(slot) => debug!("{tool} claimed clipping plane {slot}"),
            None => warn!(
                "{tool} gets no clipping plane: all {} are in use",
                pool.capacity()
            ),
        }
        Self { tool, slot }
    }

    /// The claimed slot, if any. Never changes after construction.
    pub fn slot(&self) -> Option<SlotId> {
        self.slot
    }

    /// Plane through the tool's origin, normal along its local up axis.
    pub fn plane_for_pose(transform: &Mat4) -> Plane {
        Plane::from_normal_and_point(transform.transform_vector(Vec3::UP), transform.origin())
    }
}

impl Locator for ClippingPlaneLocator {
    fn tool(&self) -> ToolId {
        self.tool
    }

    fn kind(&self) -> AnalysisTool {
        AnalysisTool::ClippingPlane
    }

    fn state(&self, pool: &ClippingPlanePool) -> LocatorState {
        match self.slot {
            None => LocatorState::Unbound,
            Some(slot) if pool.get(slot).is_active() => LocatorState::Active,
            Some(_) => LocatorState::Inactive,
        }
    }

    fn clipping_plane(&self) -> Option<SlotId> {
        self.slot
    }

    fn button_press(&mut self, pool: &mut ClippingPlanePool) {
        if let Some(slot) = self.slot {
            pool.set_active(slot, true);
        }
    }

    fn button_release(&mut self, pool: &mut ClippingPlanePool) {
        if let Some(slot) = self.slot {
            pool.set_active(slot, false);
        }
    }

    fn motion(&mut self, pool: &mut ClippingPlanePool, transform: &Mat4) {
        let Some(slot) = self.slot else {
            return;
        };
        if pool.get(slot).is_active() {
            pool.set_plane(slot, Self::plane_for_pose(transform));
        }
    }

    fn destroy(self: Box<Self>, pool: &mut ClippingPlanePool) {
        if let Some(slot) = self.slot {
            pool.release(slot);
            debug!("{} released clipping plane {slot}", self.tool);
        }
    }
}
