use super::{AnalysisTool, ToolId};
use crate::clipping::{ClippingPlanePool, SlotId};
use crate::math::Mat4;

/// Observable state of a locator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocatorState {
    /// Holds no resource (e.g. every clipping plane was taken when it was
    /// created) and never will; gestures are ignored.
    Unbound,
    /// Holds its resource but is not affecting the scene.
    Inactive,
    /// Holds its resource and is affecting the scene.
    Active,
}

/// Adapts one tool to one analysis behaviour.
///
/// Locators keep handles into shared scene state rather than references,
/// so every callback receives the pool it operates on. A locator must be
/// torn down with [`destroy`](Locator::destroy) to give its resources back.
pub trait Locator: std::fmt::Debug {
    /// The tool this locator is bound to.
    fn tool(&self) -> ToolId;

    fn kind(&self) -> AnalysisTool;

    fn state(&self, pool: &ClippingPlanePool) -> LocatorState;

    /// The clipping-plane slot this locator holds, if it holds one.
    fn clipping_plane(&self) -> Option<SlotId> {
        None
    }

    fn button_press(&mut self, pool: &mut ClippingPlanePool);

    fn button_release(&mut self, pool: &mut ClippingPlanePool);

    /// The tool moved; `transform` maps tool space to world space.
    fn motion(&mut self, pool: &mut ClippingPlanePool, transform: &Mat4);

    /// Release everything this locator holds.
    fn destroy(self: Box<Self>, pool: &mut ClippingPlanePool);
}
