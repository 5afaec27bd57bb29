//! Loading assets from disk and turning them into GPU resources.

use std::path::{Path, PathBuf};

use wgpu::util::DeviceExt;

use crate::terrain::{LoadError, LoadedHeightGrid, TerrainConfig, TerrainMesh, loader};

/// Location of an asset below `./assets/`.
pub fn asset_path(file_name: &str) -> PathBuf {
    // TODO: let the binary pass an absolute asset root instead of relying on the working directory
    Path::new("./").join("assets").join(file_name)
}

/// Load the heightmap named in `config` with the configured dimensions and
/// short-read policy.
pub fn load_heightmap(config: &TerrainConfig) -> Result<LoadedHeightGrid, LoadError> {
    loader::load_height_grid(
        asset_path(&config.heightmap),
        config.cells_x,
        config.cells_z,
        config.short_read,
    )
}

/// Vertex and index buffers of a terrain mesh, ready to draw.
#[derive(Debug)]
pub struct TerrainBuffers {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    /// Number of `u16` indices in `index_buffer`.
    pub num_elements: u32,
}

impl TerrainBuffers {
    pub fn new(device: &wgpu::Device, mesh: &TerrainMesh, name: &str) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Vertex Buffer", name)),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        // Six indices per cell keep the buffer a multiple of 4 bytes.
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Index Buffer", name)),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            num_elements: mesh.indices.len() as u32,
        }
    }
}
