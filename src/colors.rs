//! Packed ARGB8888 colors and the palette used by the renderer.

pub const BACKGROUND: u32 = 0xFF1E1E24;
pub const GRID: u32 = 0xFF2C2C34;
pub const MODEL: u32 = 0xFFC8A050;
pub const WIREFRAME: u32 = 0xFF50D0F0;
pub const PLANE_ACTIVE: u32 = 0xFFF05050;
pub const PLANE_IDLE: u32 = 0xFF808090;

/// Pack floating point channels in `[0, 1]` into an ARGB8888 value.
pub fn pack_color(r: f32, g: f32, b: f32, a: f32) -> u32 {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
    (channel(a) << 24) | (channel(r) << 16) | (channel(g) << 8) | channel(b)
}

/// Unpack the RGB channels of an ARGB8888 value into `[0, 1]`.
pub fn unpack_color(color: u32) -> (f32, f32, f32) {
    let channel = |shift: u32| ((color >> shift) & 0xFF) as f32 / 255.0;
    (channel(16), channel(8), channel(0))
}

/// Scale the RGB channels of `color` by `intensity`, keeping it opaque.
pub fn shade(color: u32, intensity: f32) -> u32 {
    let (r, g, b) = unpack_color(color);
    pack_color(r * intensity, g * intensity, b * intensity, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_unpack_preserves_channels() {
        let (r, g, b) = unpack_color(pack_color(1.0, 0.0, 0.5, 1.0));
        assert_eq!((r, g), (1.0, 0.0));
        assert!((b - 0.5).abs() < 1.0 / 255.0);
    }

    #[test]
    fn shade_darkens_and_clamps() {
        assert_eq!(shade(0xFFFFFFFF, 0.0), 0xFF000000);
        assert_eq!(shade(0xFF808080, 4.0), 0xFFFFFFFF);
    }
}
