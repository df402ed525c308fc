//! Flat Phong-style surface material
//!
//! Figures only need a base color and a specular exponent, so a material is a small
//! `Copy` value stored directly on each scene node.

/// Surface appearance of a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Linear RGBA base color
    pub base_color: [f32; 4],
    /// Specular exponent
    pub shininess: f32,
}

impl Material {
    pub const DEFAULT_SHININESS: f32 = 30.0;

    pub fn new(base_color: [f32; 4], shininess: f32) -> Self {
        Self {
            base_color,
            shininess,
        }
    }

    /// Opaque material from a 24-bit `0xRRGGBB` color
    pub fn phong(hex: u32) -> Self {
        Self::new(hex_to_rgba(hex), Self::DEFAULT_SHININESS)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new([0.8, 0.8, 0.8, 1.0], Self::DEFAULT_SHININESS)
    }
}

/// Converts `0xRRGGBB` into normalized RGBA with full alpha
pub fn hex_to_rgba(hex: u32) -> [f32; 4] {
    let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
    [channel(16), channel(8), channel(0), 1.0]
}
