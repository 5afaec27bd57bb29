//! On-screen diagnostics: the adapter name and the current frame rate.
//!
//! With the `ui` feature the text is drawn into the top-left corner of the
//! frame with glyphon. Without it the same information goes into the window
//! title.

use crate::context::Context;

/// Overlay text: adapter name on the first line, frame rate on the second.
///
/// Before the first frame rate is measured only the adapter name is shown.
pub fn overlay_text(device_name: &str, frame_rate: &str) -> String {
    if frame_rate.is_empty() {
        device_name.to_string()
    } else {
        format!("{}\n{}", device_name, frame_rate)
    }
}

/// Window title used when the text overlay is not compiled in.
pub fn window_title(title: &str, device_name: &str, frame_rate: &str) -> String {
    if frame_rate.is_empty() {
        format!("{} - {}", title, device_name)
    } else {
        format!("{} - {} - {}", title, device_name, frame_rate)
    }
}

pub struct DiagnosticOverlay {
    #[cfg_attr(feature = "ui", allow(dead_code))]
    title: String,
    device_name: String,
    frame_rate: String,
    #[cfg(feature = "ui")]
    text: text::TextOverlay,
}

impl DiagnosticOverlay {
    /// The adapter name is visible from the first frame on.
    pub fn new(ctx: &Context, title: &str) -> Self {
        let mut overlay = Self {
            title: title.to_string(),
            device_name: ctx.adapter_name.clone(),
            frame_rate: String::new(),
            #[cfg(feature = "ui")]
            text: text::TextOverlay::new(ctx),
        };
        overlay.refresh(ctx);
        overlay
    }

    pub fn text(&self) -> String {
        overlay_text(&self.device_name, &self.frame_rate)
    }

    pub fn set_frame_rate(&mut self, ctx: &Context, frame_rate: String) {
        self.frame_rate = frame_rate;
        log::trace!("{}", self.frame_rate);
        self.refresh(ctx);
    }

    #[allow(unused_variables)]
    fn refresh(&mut self, ctx: &Context) {
        #[cfg(feature = "ui")]
        {
            let text = self.text();
            self.text.set_text(&text);
        }
        #[cfg(not(feature = "ui"))]
        ctx.window().set_title(&window_title(
            &self.title,
            &self.device_name,
            &self.frame_rate,
        ));
    }

    #[allow(unused_variables)]
    pub fn resize(&mut self, width: u32, height: u32) {
        #[cfg(feature = "ui")]
        self.text.resize(width, height);
    }

    /// Lay out the glyphs for this frame. Must run before the render pass
    /// that draws them is opened.
    #[allow(unused_variables)]
    pub fn prepare(&mut self, ctx: &Context) -> anyhow::Result<()> {
        #[cfg(feature = "ui")]
        self.text.prepare(ctx)?;
        Ok(())
    }

    #[allow(unused_variables)]
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) -> anyhow::Result<()> {
        #[cfg(feature = "ui")]
        self.text.draw(render_pass)?;
        Ok(())
    }
}

#[cfg(feature = "ui")]
mod text {
    use glyphon::{
        Attrs, Buffer, Cache, Color, Family, FontSystem, Metrics, Resolution, Shaping, SwashCache,
        TextArea, TextAtlas, TextBounds, TextRenderer, Viewport,
    };

    use crate::{context::Context, data_structures::texture::Texture};

    const LEFT: f32 = 5.0;
    const TOP: f32 = 5.0;

    pub(super) struct TextOverlay {
        font_system: FontSystem,
        swash_cache: SwashCache,
        viewport: Viewport,
        atlas: TextAtlas,
        renderer: TextRenderer,
        buffer: Buffer,
    }

    impl TextOverlay {
        pub(super) fn new(ctx: &Context) -> Self {
            let mut font_system = FontSystem::new();
            let swash_cache = SwashCache::new();
            let cache = Cache::new(&ctx.device);
            let viewport = Viewport::new(&ctx.device, &cache);
            let mut atlas = TextAtlas::new(&ctx.device, &ctx.queue, &cache, ctx.config.format);
            let renderer = TextRenderer::new(
                &mut atlas,
                &ctx.device,
                wgpu::MultisampleState::default(),
                Some(wgpu::DepthStencilState {
                    format: Texture::DEPTH_FORMAT,
                    depth_write_enabled: false,
                    depth_compare: wgpu::CompareFunction::Always,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
            );
            let mut buffer = Buffer::new(&mut font_system, Metrics::new(16.0, 20.0));
            buffer.set_size(
                &mut font_system,
                Some(ctx.config.width as f32),
                Some(ctx.config.height as f32),
            );
            Self {
                font_system,
                swash_cache,
                viewport,
                atlas,
                renderer,
                buffer,
            }
        }

        pub(super) fn set_text(&mut self, text: &str) {
            self.buffer.set_text(
                &mut self.font_system,
                text,
                &Attrs::new().family(Family::SansSerif),
                Shaping::Advanced,
            );
            self.buffer.shape_until_scroll(&mut self.font_system, false);
        }

        pub(super) fn resize(&mut self, width: u32, height: u32) {
            self.buffer.set_size(
                &mut self.font_system,
                Some(width as f32),
                Some(height as f32),
            );
        }

        pub(super) fn prepare(&mut self, ctx: &Context) -> anyhow::Result<()> {
            // Drop glyphs the previous frame no longer used.
            self.atlas.trim();
            let (width, height) = (ctx.config.width, ctx.config.height);
            self.viewport.update(&ctx.queue, Resolution { width, height });
            self.renderer.prepare(
                &ctx.device,
                &ctx.queue,
                &mut self.font_system,
                &mut self.atlas,
                &self.viewport,
                [TextArea {
                    buffer: &self.buffer,
                    left: LEFT,
                    top: TOP,
                    scale: 1.0,
                    bounds: TextBounds {
                        left: 0,
                        top: 0,
                        right: width as i32,
                        bottom: height as i32,
                    },
                    default_color: Color::rgba(255, 255, 255, 200),
                    custom_glyphs: &[],
                }],
                &mut self.swash_cache,
            )?;
            Ok(())
        }

        pub(super) fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) -> anyhow::Result<()> {
            self.renderer
                .render(&self.atlas, &self.viewport, render_pass)?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_puts_frame_rate_under_device_name() {
        assert_eq!(
            overlay_text("Test Adapter", "FPS: 60.0"),
            "Test Adapter\nFPS: 60.0"
        );
    }

    #[test]
    fn device_name_shows_before_first_frame_rate() {
        assert_eq!(overlay_text("Test Adapter", ""), "Test Adapter");
        assert_eq!(
            window_title("Simple Terrain Rendering", "Test Adapter", ""),
            "Simple Terrain Rendering - Test Adapter"
        );
    }

    #[test]
    fn title_carries_all_diagnostics() {
        let title = window_title("Simple Terrain Rendering", "Test Adapter", "FPS: 60.0");
        assert!(title.starts_with("Simple Terrain Rendering"));
        assert!(title.contains("Test Adapter"));
        assert!(title.ends_with("FPS: 60.0"));
    }
}
