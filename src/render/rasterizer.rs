//! Triangle and line rasterization with depth testing.
//!
//! Triangles are filled with the edge-function method: every pixel centre in
//! the triangle's bounding box is tested against the three edges
//!
//! ```text
//! E(P) = (P.x - A.x) * (B.y - A.y) - (P.y - A.y) * (B.x - A.x)
//! ```
//!
//! and is inside when all three share the sign of the triangle's area. The
//! normalized edge values are barycentric weights, used here to interpolate
//! 1/w for the depth test.

use super::framebuffer::FrameBuffer;
use crate::math::Vec3;

/// Depth bias so outlines win against the faces they lie on.
const LINE_DEPTH_BIAS: f32 = 0.0001;

/// A triangle in screen space. `x`/`y` are pixels, `z` holds clip-space w.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub points: [Vec3; 3],
    pub color: u32,
}

impl Triangle {
    pub fn new(points: [Vec3; 3], color: u32) -> Self {
        Self { points, color }
    }
}

#[inline]
fn edge_function(a: Vec3, b: Vec3, p: Vec3) -> f32 {
    (p.x - a.x) * (b.y - a.y) - (p.y - a.y) * (b.x - a.x)
}

/// Fill `triangle` into `buffer` with a flat color and per-pixel depth.
pub fn fill_triangle(triangle: &Triangle, buffer: &mut FrameBuffer) {
    let [v0, v1, v2] = triangle.points;

    let area = edge_function(v0, v1, v2);
    if area.abs() < f32::EPSILON {
        return;
    }
    let inv_area = 1.0 / area;
    let inv_w = [1.0 / v0.z, 1.0 / v1.z, 1.0 / v2.z];

    let min_x = (v0.x.min(v1.x).min(v2.x).floor() as i32).max(0);
    let max_x = (v0.x.max(v1.x).max(v2.x).ceil() as i32).min(buffer.width() as i32 - 1);
    let min_y = (v0.y.min(v1.y).min(v2.y).floor() as i32).max(0);
    let max_y = (v0.y.max(v1.y).max(v2.y).ceil() as i32).min(buffer.height() as i32 - 1);

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = Vec3::new(x as f32 + 0.5, y as f32 + 0.5, 0.0);
            let w0 = edge_function(v1, v2, p) * inv_area;
            let w1 = edge_function(v2, v0, p) * inv_area;
            let w2 = edge_function(v0, v1, p) * inv_area;

            // Normalized weights are all non-negative inside, for either winding
            if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                let inv_depth = w0 * inv_w[0] + w1 * inv_w[1] + w2 * inv_w[2];
                buffer.set_pixel_with_depth(x, y, inv_depth, triangle.color);
            }
        }
    }
}

/// Bresenham line from `a` to `b` (screen space, `z` = clip w) with 1/w
/// interpolated along the line for depth testing.
pub fn draw_line(a: Vec3, b: Vec3, color: u32, buffer: &mut FrameBuffer) {
    let (x0, y0) = (a.x as i32, a.y as i32);
    let (x1, y1) = (b.x as i32, b.y as i32);
    let inv_w0 = 1.0 / a.z + LINE_DEPTH_BIAS;
    let inv_w1 = 1.0 / b.z + LINE_DEPTH_BIAS;

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let steps = dx.max(dy).max(1);
    let step_x = if x0 < x1 { 1 } else { -1 };
    let step_y = if y0 < y1 { 1 } else { -1 };

    let mut err = dx - dy;
    let (mut x, mut y) = (x0, y0);
    let mut step = 0;

    loop {
        let t = step as f32 / steps as f32;
        buffer.set_pixel_with_depth(x, y, inv_w0 + t * (inv_w1 - inv_w0), color);

        if x == x1 && y == y1 {
            break;
        }
        step += 1;

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += step_x;
        }
        if e2 < dx {
            err += dx;
            y += step_y;
        }
    }
}
