//! Maps the pool's active planes onto a graphics context's clip units.
//!
//! The context exposes a small, runtime-queried number of clip units. Each
//! draw walks the pool in slot order and gives units to active planes
//! first come, first served; anything past the last unit is skipped for
//! that draw only. The result depends only on the pool contents and the
//! unit count, never on activation history.

use log::{info, trace, warn};

use super::pool::{ClippingPlanePool, SlotId};
use crate::math::Vec4;

/// The parts of a graphics context the clip mapping needs.
pub trait ClipContext {
    /// How many clip units can be enabled at once.
    fn max_clip_planes(&self) -> usize;

    /// Save transform, viewport and attribute state.
    fn push_state(&mut self);

    /// Restore the state saved by the matching [`push_state`](Self::push_state).
    fn pop_state(&mut self);

    /// Load `equation` into clip unit `unit`. Points `p` with
    /// `equation · (p, 1) >= 0` are kept.
    fn set_clip_plane(&mut self, unit: usize, equation: Vec4);

    fn enable_clip_plane(&mut self, unit: usize);

    fn disable_clip_plane(&mut self, unit: usize);
}

/// A pool slot bound to a clip unit for one draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClipBinding {
    pub slot: SlotId,
    pub unit: usize,
}

/// The clip units enabled by [`ClipPlaneRenderer::begin`], to be handed
/// back to [`ClipPlaneRenderer::end`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClipRegion {
    bindings: Vec<ClipBinding>,
    dropped: Vec<SlotId>,
}

impl ClipRegion {
    /// Bound slots in ascending slot order; units are `0..len`.
    pub fn bindings(&self) -> &[ClipBinding] {
        &self.bindings
    }

    /// Active slots that found no free clip unit.
    pub fn dropped(&self) -> &[SlotId] {
        &self.dropped
    }

    pub fn enabled_slots(&self) -> impl Iterator<Item = SlotId> + '_ {
        self.bindings.iter().map(|binding| binding.slot)
    }
}

/// Brackets scene drawing with the clip state of the pool.
#[derive(Debug, Default)]
pub struct ClipPlaneRenderer {
    /// Dropped-plane count of the previous draw, for logging only.
    last_dropped: usize,
}

impl ClipPlaneRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save context state and enable one clip unit per active plane, in
    /// slot order, up to the context's limit.
    #[must_use = "the region must be closed with ClipPlaneRenderer::end"]
    pub fn begin<C: ClipContext + ?Sized>(
        &mut self,
        pool: &ClippingPlanePool,
        ctx: &mut C,
    ) -> ClipRegion {
        ctx.push_state();

        let max_units = ctx.max_clip_planes();
        let mut region = ClipRegion::default();

        for (slot, plane) in pool.slots().filter(|(_, plane)| plane.is_active()) {
            let unit = region.bindings.len();
            if unit < max_units {
                ctx.set_clip_plane(unit, plane.plane().equation());
                ctx.enable_clip_plane(unit);
                region.bindings.push(ClipBinding { slot, unit });
            } else {
                region.dropped.push(slot);
            }
        }

        self.note_overflow(&region, max_units);
        trace!("enabled {} clip plane(s)", region.bindings.len());
        region
    }

    /// Disable exactly the units `region` enabled and restore the state
    /// saved by [`begin`](Self::begin).
    pub fn end<C: ClipContext + ?Sized>(&mut self, region: &ClipRegion, ctx: &mut C) {
        for binding in &region.bindings {
            ctx.disable_clip_plane(binding.unit);
        }
        ctx.pop_state();
    }

    /// Run `draw` with the pool's active planes enabled. Returns the region
    /// that was in effect.
    pub fn draw<C, F>(&mut self, pool: &ClippingPlanePool, ctx: &mut C, draw: F) -> ClipRegion
    where
        C: ClipContext + ?Sized,
        F: FnOnce(&mut C),
    {
        let region = self.begin(pool, ctx);
        draw(ctx);
        self.end(&region, ctx);
        region
    }

    fn note_overflow(&mut self, region: &ClipRegion, max_units: usize) {
        let dropped = region.dropped.len();
        if dropped > 0 && self.last_dropped == 0 {
            warn!(
                "{} active clipping plane(s) exceed the {max_units} available clip units; \
                 skipping the highest slots",
                dropped
            );
        } else if dropped == 0 && self.last_dropped > 0 {
            info!("all active clipping planes fit in the available clip units again");
        }
        self.last_dropped = dropped;
    }
}
