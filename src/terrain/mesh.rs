//! Grid-to-mesh triangulation.
//!
//! Every sample becomes one vertex and every cell two triangles. The split
//! runs along the cell diagonal from `(x, z)` to `(x + 1, z + 1)` for the
//! whole terrain:
//!
//! ```text
//!  (x,z) ---- (x+1,z)
//!    |  \   A    |
//!    |    \      |
//!    |  B   \    |
//!  (x,z+1) -- (x+1,z+1)
//! ```
//!
//! Triangle A is `(x,z) (x+1,z) (x+1,z+1)`, triangle B is
//! `(x,z) (x+1,z+1) (x,z+1)`. Seen from above (+y) both wind clockwise.

use super::{
    MAX_U16_VERTICES,
    grid::{self, HeightGrid},
};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum MeshError {
    #[error("a {cells_x}x{cells_z} terrain needs {vertices} vertices, more than 16-bit indices can address")]
    IndexOverflow {
        cells_x: usize,
        cells_z: usize,
        vertices: usize,
    },
    #[error("a terrain needs at least one cell in each direction, got {cells_x}x{cells_z}")]
    Empty { cells_x: usize, cells_z: usize },
    #[error("height divisor must be finite and positive, got {0}")]
    InvalidHeightDivisor(f32),
}

pub(crate) fn check_dimensions(cells_x: usize, cells_z: usize) -> Result<(), MeshError> {
    if cells_x == 0 || cells_z == 0 {
        return Err(MeshError::Empty { cells_x, cells_z });
    }
    let vertices = grid::sample_count(cells_x, cells_z).unwrap_or(usize::MAX);
    if vertices > MAX_U16_VERTICES {
        return Err(MeshError::IndexOverflow {
            cells_x,
            cells_z,
            vertices,
        });
    }
    Ok(())
}

pub(crate) fn check_divisor(divisor: f32) -> Result<(), MeshError> {
    if divisor.is_finite() && divisor > 0.0 {
        Ok(())
    } else {
        Err(MeshError::InvalidHeightDivisor(divisor))
    }
}

/// A terrain vertex as the GPU reads it: world position plus an RGBA8 colour.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub color: [u8; 4],
}

impl TerrainVertex {
    /// Grayscale vertex for a raw sample at grid position `(x, z)`.
    pub fn from_sample(x: usize, z: usize, sample: u8, height_divisor: f32) -> Self {
        Self {
            position: [x as f32, sample as f32 / height_divisor, z as f32],
            color: [sample, sample, sample, u8::MAX],
        }
    }

    pub fn rgb(&self) -> [u8; 3] {
        [self.color[0], self.color[1], self.color[2]]
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<TerrainVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Unorm8x4,
                },
            ],
        }
    }
}

/// An indexed triangle list covering a [`HeightGrid`].
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainMesh {
    cells_x: usize,
    cells_z: usize,
    pub vertices: Vec<TerrainVertex>,
    pub indices: Vec<u16>,
}

impl TerrainMesh {
    /// Triangulate `grid`, dividing every sample by `height_divisor` for the
    /// vertex height.
    ///
    /// Fails before allocating anything if the grid has more vertices than
    /// `u16` indices can reach or the divisor is unusable.
    pub fn build(grid: &HeightGrid, height_divisor: f32) -> Result<Self, MeshError> {
        let (cells_x, cells_z) = (grid.cells_x(), grid.cells_z());
        check_dimensions(cells_x, cells_z)?;
        check_divisor(height_divisor)?;

        let samples_x = cells_x + 1;
        let vertices = grid
            .samples()
            .iter()
            .enumerate()
            .map(|(i, &sample)| {
                TerrainVertex::from_sample(i % samples_x, i / samples_x, sample, height_divisor)
            })
            .collect::<Vec<_>>();

        // Fits: the dimension check bounds every index by u16::MAX.
        let at = |x: usize, z: usize| (x + z * samples_x) as u16;
        let mut indices = Vec::with_capacity(cells_x * cells_z * 6);
        for z in 0..cells_z {
            for x in 0..cells_x {
                indices.extend_from_slice(&[
                    at(x, z),
                    at(x + 1, z),
                    at(x + 1, z + 1),
                    at(x, z),
                    at(x + 1, z + 1),
                    at(x, z + 1),
                ]);
            }
        }

        log::debug!(
            "built terrain mesh: {} vertices, {} triangles",
            vertices.len(),
            indices.len() / 3
        );

        Ok(Self {
            cells_x,
            cells_z,
            vertices,
            indices,
        })
    }

    pub fn cells_x(&self) -> usize {
        self.cells_x
    }

    pub fn cells_z(&self) -> usize {
        self.cells_z
    }

    /// Position of grid point `(x, z)` in [`Self::vertices`].
    pub fn vertex_index(&self, x: usize, z: usize) -> usize {
        x + z * (self.cells_x + 1)
    }

    pub fn vertex(&self, x: usize, z: usize) -> Option<&TerrainVertex> {
        if x > self.cells_x || z > self.cells_z {
            return None;
        }
        self.vertices.get(self.vertex_index(x, z))
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u16; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }
}
