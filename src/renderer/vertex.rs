//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

use crate::palette::Rgba;

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: Rgba,
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: Rgba) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    /// Location 0 is the clip-space position, location 1 the color
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// sRGB-encoded channel to linear
#[inline]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Linearize a color authored in sRGB (alpha untouched)
pub fn linearize(color: Rgba) -> Rgba {
    [
        srgb_to_linear(color[0]),
        srgb_to_linear(color[1]),
        srgb_to_linear(color[2]),
        color[3],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
        let desc = Vertex::desc();
        assert_eq!(desc.array_stride, 24);
        assert_eq!(desc.attributes[1].offset, 8);
    }

    #[test]
    fn test_linearize_keeps_endpoints_and_alpha() {
        assert_eq!(linearize([0.0, 1.0, 0.0, 0.5]), [0.0, 1.0, 0.0, 0.5]);
        let mid = srgb_to_linear(0.5);
        assert!((mid - 0.214).abs() < 1e-3);
    }
}
