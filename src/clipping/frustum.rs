//! Clipping against the canonical view volume in homogeneous clip space.
//!
//! Runs after projection and before the perspective divide. The volume is
//!
//! ```text
//! -w <= x <= w
//! -w <= y <= w
//! -w <= z <= w
//! ```
//!
//! Clipping the near boundary here also removes everything behind the eye,
//! so the divide never sees `w <= 0`.

use super::polygon::Polygon;
use crate::math::Vec4;

/// One of the six boundaries of the clip-space cube.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrustumPlane {
    /// x >= -w
    Left,
    /// x <= w
    Right,
    /// y >= -w
    Bottom,
    /// y <= w
    Top,
    /// z >= -w
    Near,
    /// z <= w
    Far,
}

impl FrustumPlane {
    pub const ALL: [FrustumPlane; 6] = [
        Self::Left,
        Self::Right,
        Self::Bottom,
        Self::Top,
        Self::Near,
        Self::Far,
    ];

    /// Signed distance of a clip-space position, positive inside.
    pub fn signed_distance(self, p: &Vec4) -> f32 {
        match self {
            Self::Left => p.w + p.x,
            Self::Right => p.w - p.x,
            Self::Bottom => p.w + p.y,
            Self::Top => p.w - p.y,
            Self::Near => p.w + p.z,
            Self::Far => p.w - p.z,
        }
    }
}

/// Clip a clip-space polygon to the view volume. The result may be empty.
pub fn clip_to_view_volume(polygon: Polygon<Vec4>) -> Polygon<Vec4> {
    polygon.clip_all(
        FrustumPlane::ALL
            .into_iter()
            .map(|plane| move |p: &Vec4| plane.signed_distance(p)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_inside_volume_survives() {
        let poly = Polygon::from_triangle(
            Vec4::new(-0.5, -0.5, 0.0, 1.0),
            Vec4::new(0.5, -0.5, 0.0, 1.0),
            Vec4::new(0.0, 0.5, 0.0, 1.0),
        );
        assert_eq!(clip_to_view_volume(poly.clone()), poly);
    }

    #[test]
    fn geometry_behind_the_eye_is_removed() {
        let poly = Polygon::from_triangle(
            Vec4::new(-0.5, -0.5, -2.0, -1.0),
            Vec4::new(0.5, -0.5, -2.0, -1.0),
            Vec4::new(0.0, 0.5, -2.0, -1.0),
        );
        assert!(clip_to_view_volume(poly).is_empty());
    }

    #[test]
    fn straddling_triangle_is_trimmed_to_the_cube() {
        let poly = Polygon::from_triangle(
            Vec4::new(-3.0, 0.0, 0.0, 1.0),
            Vec4::new(3.0, 0.0, 0.0, 1.0),
            Vec4::new(0.0, 0.5, 0.0, 1.0),
        );
        let clipped = clip_to_view_volume(poly);
        assert!(!clipped.is_empty());
        assert!(clipped.vertices.iter().all(|v| v.x.abs() <= v.w + 1e-5));
    }
}
