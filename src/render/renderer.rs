//! The software render context.
//!
//! [`Renderer`] owns the color and depth buffers together with the state a
//! hardware context would hold: the view-projection transform, the viewport
//! and a small, fixed number of user clip units. It implements
//! [`ClipContext`], so a [`ClipPlaneRenderer`](crate::clipping::ClipPlaneRenderer)
//! can drive it exactly like a GPU.
//!
//! Clip units hold world-space plane equations. Geometry is clipped against
//! every enabled unit before projection, then against the view volume, then
//! rasterized.

use log::trace;

use super::framebuffer::FrameBuffer;
use super::rasterizer::{draw_line, fill_triangle, Triangle};
use crate::clipping::{clip_to_view_volume, ClipContext, FrustumPlane, Polygon};
use crate::colors;
use crate::math::{Mat4, Vec3, Vec4};

/// Pixel rectangle that normalized device coordinates are mapped onto.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }
}

/// One user clip unit: a plane equation and whether it is applied.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClipUnit {
    pub equation: Vec4,
    pub enabled: bool,
}

impl ClipUnit {
    /// Signed distance of a world-space point, kept when `>= 0`.
    #[inline]
    fn distance(&self, p: &Vec3) -> f32 {
        self.equation.dot(Vec4::point(*p))
    }
}

/// Everything `push_state`/`pop_state` saves and restores.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderState {
    pub view_projection: Mat4,
    pub viewport: Viewport,
    clip_units: Vec<ClipUnit>,
}

impl RenderState {
    fn new(width: u32, height: u32, clip_units: usize) -> Self {
        Self {
            view_projection: Mat4::identity(),
            viewport: Viewport::full(width, height),
            clip_units: vec![ClipUnit::default(); clip_units],
        }
    }

    pub fn clip_units(&self) -> &[ClipUnit] {
        &self.clip_units
    }

    fn enabled_units(&self) -> impl Iterator<Item = &ClipUnit> + '_ {
        self.clip_units.iter().filter(|unit| unit.enabled)
    }
}

pub struct Renderer {
    color_buffer: Vec<u32>,
    depth_buffer: Vec<f32>,
    width: u32,
    height: u32,
    state: RenderState,
    saved_states: Vec<RenderState>,
}

impl Renderer {
    /// Create a renderer with `clip_units` user clip units.
    pub fn new(width: u32, height: u32, clip_units: usize) -> Self {
        let size = (width * height) as usize;
        Self {
            color_buffer: vec![colors::BACKGROUND; size],
            depth_buffer: vec![0.0; size], // 0.0 = infinitely far (1/w where w -> infinity)
            width,
            height,
            state: RenderState::new(width, height, clip_units),
            saved_states: Vec::new(),
        }
    }

    /// Reallocate the buffers and reset the viewport to cover them.
    pub fn resize(&mut self, width: u32, height: u32) {
        let size = (width * height) as usize;
        self.color_buffer = vec![colors::BACKGROUND; size];
        self.depth_buffer = vec![0.0; size];
        self.width = width;
        self.height = height;
        self.state.viewport = Viewport::full(width, height);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    /// Number of states currently saved by `push_state`.
    pub fn state_depth(&self) -> usize {
        self.saved_states.len()
    }

    pub fn set_view_projection(&mut self, view_projection: Mat4) {
        self.state.view_projection = view_projection;
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.state.viewport = viewport;
    }

    pub fn clear(&mut self, color: u32) {
        self.color_buffer.fill(color);
    }

    /// Reset every depth to 0.0, i.e. infinitely far.
    pub fn clear_depth(&mut self) {
        self.depth_buffer.fill(0.0);
    }

    pub fn draw_grid(&mut self, spacing: u32, color: u32) {
        let spacing = spacing.max(1);
        for y in 0..self.height {
            for x in 0..self.width {
                if x % spacing == 0 || y % spacing == 0 {
                    self.color_buffer[(y * self.width + x) as usize] = color;
                }
            }
        }
    }

    /// Draw a world-space triangle.
    ///
    /// The triangle is cut by every enabled clip unit and by the view volume.
    /// What survives is filled with `fill` and/or outlined with `outline`.
    /// The outline follows the clipped boundary, so cuts show up as edges.
    pub fn draw_triangle(&mut self, vertices: [Vec3; 3], fill: Option<u32>, outline: Option<u32>) {
        let [a, b, c] = vertices;
        let world = Polygon::from_triangle(a, b, c).clip_all(
            self.state
                .enabled_units()
                .map(|unit| move |p: &Vec3| unit.distance(p)),
        );
        if world.is_empty() {
            return;
        }

        let view_projection = self.state.view_projection;
        let clip = clip_to_view_volume(Polygon {
            vertices: world
                .vertices
                .iter()
                .map(|&p| view_projection * Vec4::point(p))
                .collect(),
        });
        if clip.is_empty() {
            return;
        }

        let screen = Polygon {
            vertices: clip.vertices.iter().map(|&p| self.to_screen(p)).collect(),
        };

        let mut fb = self.as_framebuffer();
        if let Some(color) = fill {
            for points in screen.triangulate() {
                fill_triangle(&Triangle::new(points, color), &mut fb);
            }
        }
        if let Some(color) = outline {
            let n = screen.vertices.len();
            for i in 0..n {
                draw_line(screen.vertices[i], screen.vertices[(i + 1) % n], color, &mut fb);
            }
        }
    }

    /// Draw a world-space line segment, clipped like triangles are.
    pub fn draw_line_3d(&mut self, from: Vec3, to: Vec3, color: u32) {
        let Some((from, to)) = clip_segment(
            from,
            to,
            self.state
                .enabled_units()
                .map(|unit| move |p: &Vec3| unit.distance(p)),
        ) else {
            return;
        };

        let view_projection = self.state.view_projection;
        let Some((from, to)) = clip_segment(
            view_projection * Vec4::point(from),
            view_projection * Vec4::point(to),
            FrustumPlane::ALL
                .into_iter()
                .map(|plane| move |p: &Vec4| plane.signed_distance(p)),
        ) else {
            return;
        };

        let (from, to) = (self.to_screen(from), self.to_screen(to));
        draw_line(from, to, color, &mut self.as_framebuffer());
    }

    /// Clip space to screen space. `z` carries w for the depth buffer.
    fn to_screen(&self, p: Vec4) -> Vec3 {
        let ndc = p.to_ndc();
        let vp = self.state.viewport;
        Vec3::new(
            vp.x as f32 + (ndc.x + 1.0) * 0.5 * vp.width as f32,
            vp.y as f32 + (1.0 - ndc.y) * 0.5 * vp.height as f32,
            p.w,
        )
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        (x < self.width && y < self.height)
            .then(|| self.color_buffer[(y * self.width + x) as usize])
    }

    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: u32 has no padding and u8 has alignment 1, so the color
        // buffer can be viewed as 4 * len bytes for the borrow's lifetime.
        unsafe {
            std::slice::from_raw_parts(
                self.color_buffer.as_ptr() as *const u8,
                self.color_buffer.len() * 4,
            )
        }
    }

    /// Get a mutable FrameBuffer view into the color and depth buffers.
    pub fn as_framebuffer(&mut self) -> FrameBuffer<'_> {
        FrameBuffer::new(
            &mut self.color_buffer,
            &mut self.depth_buffer,
            self.width,
            self.height,
        )
    }
}

impl ClipContext for Renderer {
    fn max_clip_planes(&self) -> usize {
        self.state.clip_units.len()
    }

    fn push_state(&mut self) {
        self.saved_states.push(self.state.clone());
    }

    fn pop_state(&mut self) {
        match self.saved_states.pop() {
            Some(state) => self.state = state,
            None => debug_assert!(false, "pop_state without matching push_state"),
        }
    }

    fn set_clip_plane(&mut self, unit: usize, equation: Vec4) {
        trace!("clip unit {unit} <- {equation:?}");
        self.state.clip_units[unit].equation = equation;
    }

    fn enable_clip_plane(&mut self, unit: usize) {
        self.state.clip_units[unit].enabled = true;
    }

    fn disable_clip_plane(&mut self, unit: usize) {
        self.state.clip_units[unit].enabled = false;
    }
}

/// Clip the segment `from..to` against half-spaces (positive inside).
/// Returns `None` once nothing is left.
fn clip_segment<V, F>(
    mut from: V,
    mut to: V,
    distances: impl IntoIterator<Item = F>,
) -> Option<(V, V)>
where
    V: crate::clipping::Lerp,
    F: Fn(&V) -> f32,
{
    for distance in distances {
        let d0 = distance(&from);
        let d1 = distance(&to);
        match (d0 >= 0.0, d1 >= 0.0) {
            (true, true) => {}
            (false, false) => return None,
            (true, false) => to = from.lerp(to, d0 / (d0 - d1)),
            (false, true) => from = from.lerp(to, d0 / (d0 - d1)),
        }
    }
    Some((from, to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipping::{ClipPlaneRenderer, ClippingPlanePool, Plane};

    const SIZE: u32 = 32;
    const RED: u32 = 0xFFFF0000;

    /// Covers the whole viewport under an identity view-projection.
    fn full_screen_triangle() -> [Vec3; 3] {
        [
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(3.0, -1.0, 0.0),
            Vec3::new(-1.0, 3.0, 0.0),
        ]
    }

    fn renderer() -> Renderer {
        let mut renderer = Renderer::new(SIZE, SIZE, 6);
        renderer.clear(colors::BACKGROUND);
        renderer
    }

    #[test]
    fn units_start_disabled() {
        let renderer = renderer();
        assert_eq!(renderer.max_clip_planes(), 6);
        assert!(renderer.state().clip_units().iter().all(|u| !u.enabled));
    }

    #[test]
    fn pop_restores_pushed_state() {
        let mut renderer = renderer();
        let before = renderer.state().clone();

        renderer.push_state();
        renderer.set_clip_plane(2, Vec4::new(1.0, 0.0, 0.0, -1.0));
        renderer.enable_clip_plane(2);
        renderer.set_view_projection(Mat4::scaling(Vec3::ONE * 2.0));
        renderer.set_viewport(Viewport::full(4, 4));
        assert_ne!(renderer.state(), &before);

        renderer.pop_state();
        assert_eq!(renderer.state(), &before);
        assert_eq!(renderer.state_depth(), 0);
    }

    #[test]
    fn unclipped_triangle_covers_viewport() {
        let mut renderer = renderer();
        renderer.draw_triangle(full_screen_triangle(), Some(RED), None);
        assert_eq!(renderer.pixel(8, 16), Some(RED));
        assert_eq!(renderer.pixel(24, 16), Some(RED));
    }

    #[test]
    fn enabled_unit_removes_negative_side() {
        let mut renderer = renderer();
        // keep x >= 0
        renderer.set_clip_plane(0, Plane::new(Vec3::RIGHT, 0.0).equation());
        renderer.enable_clip_plane(0);

        renderer.draw_triangle(full_screen_triangle(), Some(RED), None);
        assert_eq!(renderer.pixel(8, 16), Some(colors::BACKGROUND));
        assert_eq!(renderer.pixel(24, 16), Some(RED));
    }

    #[test]
    fn disabled_unit_has_no_effect() {
        let mut renderer = renderer();
        renderer.set_clip_plane(0, Plane::new(Vec3::RIGHT, 5.0).equation());

        renderer.draw_triangle(full_screen_triangle(), Some(RED), None);
        assert_eq!(renderer.pixel(8, 16), Some(RED));
    }

    #[test]
    fn fully_clipped_triangle_draws_nothing() {
        let mut renderer = renderer();
        renderer.set_clip_plane(3, Plane::new(Vec3::RIGHT, 2.0).equation());
        renderer.enable_clip_plane(3);

        renderer.draw_triangle(full_screen_triangle(), Some(RED), Some(RED));
        assert!(renderer.color_buffer.iter().all(|&c| c == colors::BACKGROUND));
    }

    #[test]
    fn lines_are_clipped_by_units() {
        let mut renderer = renderer();
        renderer.set_clip_plane(0, Plane::new(Vec3::RIGHT, 0.0).equation());
        renderer.enable_clip_plane(0);

        renderer.draw_line_3d(Vec3::new(-0.9, 0.0, 0.0), Vec3::new(0.9, 0.0, 0.0), RED);
        assert_eq!(renderer.pixel(4, 16), Some(colors::BACKGROUND));
        assert_eq!(renderer.pixel(28, 16), Some(RED));
    }

    #[test]
    fn clip_plane_renderer_drives_the_software_context() {
        let mut renderer = renderer();
        let mut pool = ClippingPlanePool::new(8);
        let slot = pool.allocate().unwrap();
        pool.set_plane(slot, Plane::new(Vec3::RIGHT, 0.0));
        pool.set_active(slot, true);

        let mut clip_renderer = ClipPlaneRenderer::new();
        let region = clip_renderer.draw(&pool, &mut renderer, |ctx| {
            assert!(ctx.state().clip_units()[0].enabled);
            ctx.draw_triangle(full_screen_triangle(), Some(RED), None);
        });

        assert_eq!(region.bindings().len(), 1);
        assert_eq!(renderer.pixel(8, 16), Some(colors::BACKGROUND));
        assert_eq!(renderer.pixel(24, 16), Some(RED));
        assert!(renderer.state().clip_units().iter().all(|u| !u.enabled));
        assert_eq!(renderer.state_depth(), 0);
    }
}
