use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::clipping::{ClipPlaneRenderer, ClipRegion, Plane};
use crate::colors;
use crate::config::Config;
use crate::math::{Mat4, Vec3};
use crate::mesh::{LoadError, Mesh};
use crate::projection::Projection;
use crate::render::Renderer;
use crate::tools::{ToolEvent, ToolLifecycleManager};
use crate::transform::Transform;

const GRID_SPACING: u32 = 50;
/// Half the side length of the square drawn for each clipping plane,
/// relative to the model's bounding radius.
const PLANE_GIZMO_SCALE: f32 = 1.2;
/// Extra room around the model when framing it.
const FRAMING_MARGIN: f32 = 1.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    #[default]
    Filled,
    Wireframe,
    FilledWireframe,
}

impl RenderMode {
    /// Cycle Filled -> Wireframe -> FilledWireframe -> Filled.
    pub fn next(self) -> Self {
        match self {
            Self::Filled => Self::Wireframe,
            Self::Wireframe => Self::FilledWireframe,
            Self::FilledWireframe => Self::Filled,
        }
    }

    fn fill(self) -> Option<u32> {
        (self != Self::Wireframe).then_some(colors::MODEL)
    }

    fn outline(self) -> Option<u32> {
        (self != Self::Filled).then_some(colors::WIREFRAME)
    }
}

/// The scene, the interactive tools and the renderer, driven once per frame.
pub struct Engine {
    renderer: Renderer,
    tools: ToolLifecycleManager,
    clip_renderer: ClipPlaneRenderer,
    clip_region: ClipRegion,
    mesh: Mesh,
    model: Transform,
    projection: Projection,
    camera_eye: Vec3,
    camera_target: Vec3,
    render_mode: RenderMode,
    pub show_model: bool,
    pub draw_grid: bool,
}

impl Engine {
    /// `planes` clipping-plane slots, `max_clip_planes` clip units.
    pub fn new(width: u32, height: u32, planes: usize, max_clip_planes: usize) -> Self {
        let mut engine = Self {
            renderer: Renderer::new(width, height, max_clip_planes),
            tools: ToolLifecycleManager::new(planes),
            clip_renderer: ClipPlaneRenderer::new(),
            clip_region: ClipRegion::default(),
            mesh: Mesh::cube(),
            model: Transform::default(),
            projection: Projection::from_degrees(
                45.0,
                width as f32 / height.max(1) as f32,
                0.1,
                100.0,
            ),
            camera_eye: Vec3::ZERO,
            camera_target: Vec3::FORWARD,
            render_mode: RenderMode::default(),
            show_model: true,
            draw_grid: true,
        };
        engine.center_display();
        engine
    }

    pub fn from_config(config: &Config) -> Result<Self, LoadError> {
        let mut engine = Self::new(
            config.window.width,
            config.window.height,
            config.clipping.planes,
            config.clipping.max_clip_planes,
        );
        engine.tools.set_analysis_tool(config.analysis_tool);
        engine.render_mode = config.render_mode;
        if let Some(path) = &config.model {
            engine.load_mesh(path)?;
        }
        Ok(engine)
    }

    pub fn load_mesh(&mut self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        self.mesh = Mesh::from_obj(path)?;
        self.center_display();
        Ok(())
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn model_transform_mut(&mut self) -> &mut Transform {
        &mut self.model
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.renderer.resize(width, height);
        self.projection
            .set_aspect_ratio(width as f32 / height.max(1) as f32);
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.render_mode = mode;
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    pub fn camera_eye(&self) -> Vec3 {
        self.camera_eye
    }

    pub fn camera_target(&self) -> Vec3 {
        self.camera_target
    }

    /// Reset the model transform and point the camera at the model so that
    /// its bounding sphere fills the view.
    pub fn center_display(&mut self) {
        self.model = Transform::default();
        let (center, radius) = self.model_sphere();
        let distance = self.projection.framing_distance(radius) * FRAMING_MARGIN;
        self.camera_target = center;
        self.camera_eye = center - Vec3::FORWARD * distance;
        log::debug!("centered display on {center:?} (radius {radius})");
    }

    /// Bounding sphere of the untransformed mesh.
    fn model_sphere(&self) -> (Vec3, f32) {
        match self.mesh.bounds() {
            Some((lo, hi)) => {
                let center = (lo + hi) * 0.5;
                (center, ((hi - lo) * 0.5).magnitude().max(f32::EPSILON))
            }
            None => (Vec3::ZERO, 1.0),
        }
    }

    pub fn tools(&self) -> &ToolLifecycleManager {
        &self.tools
    }

    pub fn tools_mut(&mut self) -> &mut ToolLifecycleManager {
        &mut self.tools
    }

    pub fn handle_tool_event(&mut self, event: ToolEvent) {
        self.tools.handle(event);
    }

    /// Clip-unit assignment of the last rendered frame.
    pub fn clip_region(&self) -> &ClipRegion {
        &self.clip_region
    }

    /// Returns the rendered frame as bytes (ARGB8888 format)
    pub fn frame_buffer(&self) -> &[u8] {
        self.renderer.as_bytes()
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Render the current frame.
    ///
    /// The model is drawn between `ClipPlaneRenderer::begin` and `end`, so
    /// active clipping planes cut it. Plane gizmos are drawn afterwards and
    /// are never clipped.
    pub fn render(&mut self) {
        self.renderer.clear(colors::BACKGROUND);
        self.renderer.clear_depth();
        if self.draw_grid {
            self.renderer.draw_grid(GRID_SPACING, colors::GRID);
        }

        let view = Mat4::look_at_lh(self.camera_eye, self.camera_target, Vec3::UP);
        self.renderer
            .set_view_projection(self.projection.matrix() * view);

        let model = self.model.to_matrix();
        let light = (self.camera_eye - self.camera_target).normalize();
        let (fill, outline) = (self.render_mode.fill(), self.render_mode.outline());
        let mesh = &self.mesh;
        let show_model = self.show_model;

        self.clip_region = self
            .clip_renderer
            .draw(self.tools.pool(), &mut self.renderer, |renderer| {
                if !show_model {
                    return;
                }
                for triangle in mesh.triangles() {
                    let world = triangle.map(|v| model.transform_point(v));
                    let fill = fill.map(|color| shade(color, &world, light));
                    renderer.draw_triangle(world, fill, outline);
                }
            });

        self.draw_plane_gizmos();
    }

    fn draw_plane_gizmos(&mut self) {
        let (center, radius) = self.model_sphere();
        let center = self.model.to_matrix().transform_point(center);
        let half = radius * PLANE_GIZMO_SCALE;

        let planes: Vec<(Plane, bool)> = self
            .tools
            .pool()
            .slots()
            .filter(|(_, slot)| slot.is_allocated())
            .map(|(_, slot)| (slot.plane(), slot.is_active()))
            .collect();

        for (plane, active) in planes {
            let color = if active {
                colors::PLANE_ACTIVE
            } else {
                colors::PLANE_IDLE
            };
            let corners = plane_square(&plane, center, half);
            for i in 0..4 {
                self.renderer
                    .draw_line_3d(corners[i], corners[(i + 1) % 4], color);
            }
        }
    }
}

/// Two-sided flat shading, so faces exposed by a cut stay lit from inside.
fn shade(color: u32, &[a, b, c]: &[Vec3; 3], light: Vec3) -> u32 {
    let normal = (b - a).cross(c - a).normalize();
    colors::shade(color, 0.3 + 0.7 * normal.dot(light).abs())
}

/// Corners of a square lying in `plane`, centred on the projection of
/// `near` onto it.
fn plane_square(plane: &Plane, near: Vec3, half: f32) -> [Vec3; 4] {
    let n = plane.normal;
    let center = near - n * plane.signed_distance(near);
    let helper = if n.x.abs() < 0.9 { Vec3::RIGHT } else { Vec3::UP };
    let u = n.cross(helper).normalize() * half;
    let v = n.cross(u).normalize() * half;
    [
        center + u + v,
        center - u + v,
        center - u - v,
        center + u - v,
    ]
}
