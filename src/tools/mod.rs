//! Interactive tools and the analysis behaviour bound to them.
//!
//! The host application owns input devices and reports them as tools: it
//! announces when a tool appears or goes away and forwards button and
//! tracking gestures. A [`ToolLifecycleManager`] turns those notifications
//! into [`Locator`]s, each adapting one tool to one analysis behaviour.

mod clipping_plane_locator;
mod locator;
mod manager;

pub use clipping_plane_locator::ClippingPlaneLocator;
pub use locator::{Locator, LocatorState};
pub use manager::ToolLifecycleManager;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::math::Mat4;

/// Opaque identity of a tool, assigned by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToolId(pub u32);

impl std::fmt::Display for ToolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tool #{}", self.0)
    }
}

bitflags! {
    /// What a tool can do, as reported when it is created.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ToolCapabilities: u8 {
        /// Reports a tracked 6-DOF pose and a button; can drive a locator.
        const LOCATOR = 1 << 0;
        /// Drags scene objects.
        const DRAGGER = 1 << 1;
        /// Moves the viewer through the scene.
        const NAVIGATION = 1 << 2;
        /// Opens menus.
        const MENU = 1 << 3;
    }
}

/// Analysis behaviour given to newly created locator tools.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisTool {
    /// Each tool carries one clipping plane that cuts the model while the
    /// tool's button is held.
    ClippingPlane,
}

impl AnalysisTool {
    pub fn name(self) -> &'static str {
        match self {
            Self::ClippingPlane => "Clipping Plane",
        }
    }
}

/// A notification from the host about a tool.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ToolEvent {
    Created {
        tool: ToolId,
        capabilities: ToolCapabilities,
    },
    Destroyed {
        tool: ToolId,
    },
    ButtonPress {
        tool: ToolId,
    },
    ButtonRelease {
        tool: ToolId,
    },
    /// New tracked pose; a rigid transform from tool space to world space.
    Motion {
        tool: ToolId,
        transform: Mat4,
    },
}

impl ToolEvent {
    pub fn tool(&self) -> ToolId {
        match *self {
            Self::Created { tool, .. }
            | Self::Destroyed { tool }
            | Self::ButtonPress { tool }
            | Self::ButtonRelease { tool }
            | Self::Motion { tool, .. } => tool,
        }
    }
}
