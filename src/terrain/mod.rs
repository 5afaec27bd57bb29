//! Heightmap terrain: sample grid, raw file loading and mesh construction.
//!
//! This module has no GPU dependency. It turns a flat file of `u8` elevation
//! samples into a [`HeightGrid`] and the grid into an indexed triangle list
//! ([`TerrainMesh`]) that the render pipeline can upload as-is.
//!
//! - `grid` holds the `(W+1) x (H+1)` sample buffer
//! - `loader` reads raw heightmap files with an explicit short-read policy
//! - `mesh` builds vertices (position + grayscale colour) and `u16` indices

pub mod grid;
pub mod loader;
pub mod mesh;

pub use grid::{GridError, HeightGrid};
pub use loader::{LoadError, LoadStatus, LoadedHeightGrid, ShortReadPolicy};
pub use mesh::{MeshError, TerrainMesh, TerrainVertex};

/// Number of grid cells along x in the reference configuration.
pub const TERRAIN_WIDTH: usize = 64;
/// Number of grid cells along z in the reference configuration.
pub const TERRAIN_HEIGHT: usize = 64;
/// Raw samples are divided by this to get the world-space height.
pub const HEIGHT_DIVISOR: f32 = 10.0;
/// Largest vertex count addressable with 16-bit indices.
pub const MAX_U16_VERTICES: usize = u16::MAX as usize + 1;

/// Everything needed to load and triangulate one terrain.
///
/// Defaults reproduce the reference demo: a 64 x 64 cell terrain read from
/// `heightmap.raw` with heights scaled by 1/10.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainConfig {
    /// Cells along x (`W`). The grid has `W + 1` samples per row.
    pub cells_x: usize,
    /// Cells along z (`H`). The grid has `H + 1` rows.
    pub cells_z: usize,
    pub height_divisor: f32,
    /// File name below `./assets/`.
    pub heightmap: String,
    pub short_read: ShortReadPolicy,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            cells_x: TERRAIN_WIDTH,
            cells_z: TERRAIN_HEIGHT,
            height_divisor: HEIGHT_DIVISOR,
            heightmap: "heightmap.raw".to_string(),
            short_read: ShortReadPolicy::default(),
        }
    }
}

impl TerrainConfig {
    /// Reject configurations the mesh builder cannot honour.
    ///
    /// Called once at startup, before anything is loaded.
    pub fn validate(&self) -> Result<(), MeshError> {
        mesh::check_dimensions(self.cells_x, self.cells_z)?;
        mesh::check_divisor(self.height_divisor)
    }

    /// Saturates at `usize::MAX` for configurations [`Self::validate`] rejects.
    pub fn vertex_count(&self) -> usize {
        grid::sample_count(self.cells_x, self.cells_z).unwrap_or(usize::MAX)
    }

    /// Saturates like [`Self::vertex_count`].
    pub fn index_count(&self) -> usize {
        self.cells_x
            .checked_mul(self.cells_z)
            .and_then(|cells| cells.checked_mul(6))
            .unwrap_or(usize::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_the_reference_terrain() {
        let config = TerrainConfig::default();
        assert_eq!(config.vertex_count(), 65 * 65);
        assert_eq!(config.index_count(), 64 * 64 * 6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn absurd_dimensions_are_rejected_not_overflowed() {
        let config = TerrainConfig {
            cells_x: usize::MAX,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(MeshError::IndexOverflow {
                cells_x: usize::MAX,
                cells_z: TERRAIN_HEIGHT,
                vertices: usize::MAX
            })
        );
        assert_eq!(config.vertex_count(), usize::MAX);
        assert_eq!(config.index_count(), usize::MAX);

        let tall = TerrainConfig {
            cells_z: usize::MAX,
            ..Default::default()
        };
        assert!(matches!(tall.validate(), Err(MeshError::IndexOverflow { .. })));
    }

    #[test]
    fn zero_divisor_is_rejected() {
        let config = TerrainConfig {
            height_divisor: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(MeshError::InvalidHeightDivisor(_))
        ));
    }
}
