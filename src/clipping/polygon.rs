//! Convex polygon clipping (Sutherland-Hodgman).
//!
//! The same routine serves both clipping stages of the renderer: user
//! clipping planes in world space (vertices are [`Vec3`]) and the view
//! volume in homogeneous clip space (vertices are [`Vec4`]). Each stage
//! supplies a signed-distance function; vertices with a non-negative
//! distance are inside.

use crate::math::{Vec3, Vec4};

/// Vertex data that can be interpolated along a clipped edge.
pub trait Lerp: Copy {
    fn lerp(self, other: Self, t: f32) -> Self;
}

impl Lerp for Vec3 {
    fn lerp(self, other: Self, t: f32) -> Self {
        Vec3::lerp(self, other, t)
    }
}

impl Lerp for Vec4 {
    fn lerp(self, other: Self, t: f32) -> Self {
        Vec4::lerp(self, other, t)
    }
}

/// A convex polygon represented as a list of vertices.
///
/// Built from a triangle, clipped against any number of half-spaces, then
/// fanned back into triangles for rasterization.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon<V> {
    pub vertices: Vec<V>,
}

impl<V: Lerp> Polygon<V> {
    /// Create a polygon from a triangle (3 vertices).
    pub fn from_triangle(v0: V, v1: V, v2: V) -> Self {
        Self {
            vertices: vec![v0, v1, v2],
        }
    }

    /// Returns true if the polygon has been completely clipped away.
    pub fn is_empty(&self) -> bool {
        self.vertices.len() < 3
    }

    /// Clip against one half-space. `distance` is positive inside.
    pub fn clip(&self, distance: impl Fn(&V) -> f32) -> Self {
        if self.is_empty() {
            return Self { vertices: vec![] };
        }

        let mut output = Vec::with_capacity(self.vertices.len() + 1);

        for (i, current) in self.vertices.iter().enumerate() {
            let next = &self.vertices[(i + 1) % self.vertices.len()];

            let d1 = distance(current);
            let d2 = distance(next);

            let current_inside = d1 >= 0.0;
            let next_inside = d2 >= 0.0;

            if current_inside {
                output.push(*current);
            }
            // Edge crosses the boundary: emit the intersection
            if current_inside != next_inside {
                let t = d1 / (d1 - d2);
                output.push(current.lerp(*next, t));
            }
        }

        Self { vertices: output }
    }

    /// Clip against every half-space in turn, stopping early once nothing
    /// is left.
    pub fn clip_all<F>(self, distances: impl IntoIterator<Item = F>) -> Self
    where
        F: Fn(&V) -> f32,
    {
        let mut result = self;
        for distance in distances {
            if result.is_empty() {
                break;
            }
            result = result.clip(distance);
        }
        result
    }

    /// Fan triangulation of the (convex) polygon.
    pub fn triangulate(&self) -> impl Iterator<Item = [V; 3]> + '_ {
        (1..self.vertices.len().saturating_sub(1))
            .map(move |i| [self.vertices[0], self.vertices[i], self.vertices[i + 1]])
    }
}
