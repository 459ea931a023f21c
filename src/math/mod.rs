//! Small linear-algebra kit used by the renderer and the tool poses.
//!
//! Everything is `f32` and `Copy`. Matrices use column vectors on the right,
//! so `a * b * v` applies `b` first.

pub mod mat4;
pub mod vec3;
pub mod vec4;

pub use mat4::Mat4;
pub use vec3::Vec3;
pub use vec4::Vec4;
