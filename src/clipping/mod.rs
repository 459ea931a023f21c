//! Clipping: user clipping planes and the view volume.
//!
//! - [`ClippingPlanePool`] holds a fixed number of [`ClippingPlane`] slots
//!   that interactive tools claim for their lifetime.
//! - [`ClipPlaneRenderer`] maps the active slots onto the limited clip units
//!   of a [`ClipContext`] around each scene draw.
//! - [`Polygon`] and [`clip_to_view_volume`] do the geometric clipping
//!   inside the software renderer.

pub mod frustum;
pub mod plane;
pub mod polygon;
pub mod pool;
pub mod renderer;

pub use frustum::{clip_to_view_volume, FrustumPlane};
pub use plane::{ClippingPlane, Plane};
pub use polygon::{Lerp, Polygon};
pub use pool::{ClippingPlanePool, SlotId};
pub use renderer::{ClipBinding, ClipContext, ClipPlaneRenderer, ClipRegion};
