//! Demo shell settings.
//!
//! Terrain settings live in [`crate::terrain::TerrainConfig`]; everything here
//! is about the window and the way the terrain is presented. Values that need
//! to change after startup go through [`crate::flow::Out::Configure`].

/// Window, camera and rasterizer settings for the demo.
#[derive(Clone, Debug)]
pub struct DemoConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub clear_colour: wgpu::Color,
    pub eye: [f32; 3],
    pub target: [f32; 3],
    /// Vertical field of view in degrees.
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
    /// Draw triangle edges only. Falls back to filled triangles when the
    /// adapter can't rasterize lines.
    pub wireframe: bool,
    pub cull_mode: Option<wgpu::Face>,
    /// World units the camera moves per mouse-wheel line.
    pub zoom_speed: f32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            title: "Simple Terrain Rendering".to_string(),
            width: 800,
            height: 600,
            clear_colour: rgb8_to_linear(45, 50, 170),
            eye: [0.0, 50.0, 90.0],
            target: [0.0, 0.0, 0.0],
            fovy: 45.0,
            znear: 1.0,
            zfar: 1000.0,
            wireframe: true,
            cull_mode: None,
            zoom_speed: 2.0,
        }
    }
}

/// Convert an 8-bit sRGB colour into the linear colour wgpu expects for an
/// sRGB surface.
pub fn rgb8_to_linear(r: u8, g: u8, b: u8) -> wgpu::Color {
    let decode = |c: u8| {
        let c = c as f64 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    wgpu::Color {
        r: decode(r),
        g: decode(g),
        b: decode(b),
        a: 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_conversion_keeps_extremes() {
        let black = rgb8_to_linear(0, 0, 0);
        let white = rgb8_to_linear(255, 255, 255);
        assert_eq!(black.r, 0.0);
        assert!((white.b - 1.0).abs() < 1e-9);
        let mid = rgb8_to_linear(128, 128, 128);
        assert!(mid.g > 0.2 && mid.g < 0.22);
    }
}
