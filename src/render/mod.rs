//! Software rendering: buffers, rasterization and the clip-unit context.

mod framebuffer;
mod rasterizer;
mod renderer;

pub use framebuffer::FrameBuffer;
pub use rasterizer::{draw_line, fill_triangle, Triangle};
pub use renderer::{ClipUnit, RenderState, Renderer, Viewport};
