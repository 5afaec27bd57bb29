//! The terrain demo scene.
//!
//! Loads the heightmap once, triangulates it once and draws the resulting
//! buffers every frame. A heightmap that can't be loaded or triangulated
//! leaves the scene empty instead of stopping the demo.

use cgmath::{Matrix4, vec3};
use instant::Duration;
use winit::{
    event::{ElementState, KeyEvent, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::{
    context::{Context, InitContext},
    flow::{GraphicsFlow, Out},
    render::{Flat, Render},
    resources::{self, TerrainBuffers},
    terrain::{LoadedHeightGrid, TerrainConfig, TerrainMesh},
};

pub struct TerrainScene {
    config: TerrainConfig,
    buffers: Option<TerrainBuffers>,
}

impl TerrainScene {
    /// Load the configured heightmap and upload its mesh.
    pub fn new(init: &InitContext, config: TerrainConfig) -> Self {
        let buffers = match resources::load_heightmap(&config) {
            Ok(loaded) => Self::upload(init, &config, &loaded),
            Err(e) => {
                log::error!("Terrain disabled, heightmap failed to load: {}", e);
                None
            }
        };
        Self { config, buffers }
    }

    /// A scene for an already loaded grid, skipping the asset lookup.
    pub fn from_grid(init: &InitContext, config: TerrainConfig, loaded: &LoadedHeightGrid) -> Self {
        let buffers = Self::upload(init, &config, loaded);
        Self { config, buffers }
    }

    fn upload(init: &InitContext, config: &TerrainConfig, loaded: &LoadedHeightGrid) -> Option<TerrainBuffers> {
        let mesh = match TerrainMesh::build(&loaded.grid, config.height_divisor) {
            Ok(mesh) => mesh,
            Err(e) => {
                log::error!("Terrain disabled, mesh could not be built: {}", e);
                return None;
            }
        };
        let (lo, hi) = loaded.grid.min_max();
        log::info!(
            "terrain {}: {} vertices, {} triangles, samples {}..={}",
            config.heightmap,
            mesh.vertices.len(),
            mesh.triangle_count(),
            lo,
            hi
        );
        Some(TerrainBuffers::new(&init.device, &mesh, &config.heightmap))
    }

    pub fn is_loaded(&self) -> bool {
        self.buffers.is_some()
    }

    /// Centres the terrain on x in front of the camera.
    pub fn world_transform(&self) -> Matrix4<f32> {
        Matrix4::from_translation(vec3(-(self.config.cells_x as f32) / 2.0, 0.0, 0.0))
    }
}

impl<S> GraphicsFlow<S> for TerrainScene {
    fn on_init(&mut self, ctx: &mut Context, _: &mut S) -> Out {
        ctx.camera.world = self.world_transform();
        Out::Empty
    }

    fn on_update(&mut self, _: &Context, _: &mut S, _: Duration) -> Out {
        Out::Empty
    }

    fn on_window_events(&mut self, _: &Context, _: &mut S, event: &WindowEvent) -> Out {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => Out::Exit,
            _ => Out::Empty,
        }
    }

    fn on_render(&self) -> Render<'_> {
        match &self.buffers {
            Some(buffers) => Render::Terrain(Flat {
                vertex: &buffers.vertex_buffer,
                index: &buffers.index_buffer,
                amount: buffers.num_elements as usize,
            }),
            None => Render::None,
        }
    }

    fn on_shutdown(&mut self, _: &Context, _: &mut S) {
        if let Some(buffers) = self.buffers.take() {
            buffers.vertex_buffer.destroy();
            buffers.index_buffer.destroy();
        }
    }
}
