#![allow(dead_code)]

use std::{collections::HashMap, io::Write, path::PathBuf};

use simple_terrain::terrain::TerrainMesh;
use tempfile::TempDir;

/// A heightmap written to a scratch directory that is removed on drop.
pub(crate) struct HeightmapFile {
    _dir: TempDir,
    pub path: PathBuf,
}

impl HeightmapFile {
    pub fn new(bytes: &[u8]) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create a scratch directory");
        let path = dir.path().join("heightmap.raw");
        let mut file = std::fs::File::create(&path).expect("Failed to create heightmap file");
        file.write_all(bytes).expect("Failed to write heightmap file");
        Self { _dir: dir, path }
    }

    /// A file of `len` bytes all set to `value`.
    pub fn filled(len: usize, value: u8) -> Self {
        Self::new(&vec![value; len])
    }
}

/// Grid coordinates of a vertex index.
pub(crate) fn coords(index: u16, samples_x: usize) -> (usize, usize) {
    let index = index as usize;
    (index % samples_x, index / samples_x)
}

/// Groups triangles by the grid cell they sit in.
///
/// Panics if a triangle spans more than one cell.
pub(crate) fn triangles_by_cell(mesh: &TerrainMesh) -> HashMap<(usize, usize), Vec<[(usize, usize); 3]>> {
    let samples_x = mesh.cells_x() + 1;
    let mut cells: HashMap<(usize, usize), Vec<[(usize, usize); 3]>> = HashMap::new();
    for triangle in mesh.triangles() {
        let corners = triangle.map(|i| coords(i, samples_x));
        let x = corners.iter().map(|c| c.0).min().unwrap();
        let z = corners.iter().map(|c| c.1).min().unwrap();
        for (cx, cz) in corners {
            assert!(
                cx <= x + 1 && cz <= z + 1,
                "triangle {:?} spans more than one cell",
                corners
            );
        }
        cells.entry((x, z)).or_default().push(corners);
    }
    cells
}

/// Asserts that every cell holds exactly the two triangles of the fixed
/// diagonal split and that no cell is missing.
pub(crate) fn assert_tiles_grid(mesh: &TerrainMesh) {
    let cells = triangles_by_cell(mesh);
    assert_eq!(cells.len(), mesh.cells_x() * mesh.cells_z());
    for z in 0..mesh.cells_z() {
        for x in 0..mesh.cells_x() {
            let triangles = cells
                .get(&(x, z))
                .unwrap_or_else(|| panic!("cell ({}, {}) is not covered", x, z));
            assert_eq!(triangles.len(), 2, "cell ({}, {})", x, z);
            let mut third_corners: Vec<(usize, usize)> = Vec::new();
            for triangle in triangles {
                assert!(triangle.contains(&(x, z)));
                assert!(triangle.contains(&(x + 1, z + 1)));
                third_corners.extend(
                    triangle
                        .iter()
                        .filter(|c| **c != (x, z) && **c != (x + 1, z + 1)),
                );
            }
            third_corners.sort();
            assert_eq!(third_corners, vec![(x, z + 1), (x + 1, z)]);
        }
    }
}
