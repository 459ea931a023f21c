//! Interactive carving of a model with tool-held clipping planes.
//!
//! Tracked tools each claim one plane from a fixed [`ClippingPlanePool`]
//! while they exist. Holding a tool's button makes its plane active and
//! lets it follow the tool. Every frame the active planes are mapped onto
//! the render context's limited clip units, which cut the model.
//!
//! Rendering is done on the CPU. SDL2 is used only for the window of the
//! demo application.
//!
//! # Quick Start
//!
//! ```ignore
//! use carver::prelude::*;
//!
//! let mut engine = Engine::new(800, 600, 6, 6);
//! engine.handle_tool_event(ToolEvent::Created {
//!     tool: ToolId(1),
//!     capabilities: ToolCapabilities::LOCATOR,
//! });
//! engine.handle_tool_event(ToolEvent::ButtonPress { tool: ToolId(1) });
//! engine.render();
//! ```

pub mod clipping;
pub mod colors;
pub mod config;
pub mod engine;
pub mod math;
pub mod mesh;
pub mod projection;
pub mod render;
pub mod tools;
pub mod transform;
pub mod window;

pub use clipping::{ClipContext, ClipPlaneRenderer, ClipRegion, ClippingPlanePool, SlotId};
pub use config::{Config, ConfigError};
pub use engine::{Engine, RenderMode};
pub use mesh::{LoadError, Mesh};
pub use tools::{ToolEvent, ToolId, ToolLifecycleManager};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::clipping::{
        ClipContext, ClipPlaneRenderer, ClipRegion, ClippingPlane, ClippingPlanePool, Plane, SlotId,
    };
    pub use crate::engine::{Engine, RenderMode};
    pub use crate::math::{Mat4, Vec3, Vec4};
    pub use crate::mesh::Mesh;
    pub use crate::projection::Projection;
    pub use crate::tools::{
        AnalysisTool, Locator, LocatorState, ToolCapabilities, ToolEvent, ToolId,
        ToolLifecycleManager,
    };
    pub use crate::transform::Transform;
    pub use crate::window::{FrameLimiter, InputState, Key, Window, WindowEvent};
}

/// Module exposing internals for benchmarking. Not part of the stable API.
pub mod bench {
    pub use crate::clipping::{clip_to_view_volume, Polygon};
    pub use crate::render::{fill_triangle, FrameBuffer, Renderer, Triangle};
}
