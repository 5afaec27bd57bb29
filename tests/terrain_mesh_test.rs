use proptest::prelude::*;
use simple_terrain::terrain::{
    HEIGHT_DIVISOR, HeightGrid, MeshError, ShortReadPolicy, TERRAIN_HEIGHT, TERRAIN_WIDTH,
    TerrainConfig, TerrainMesh, loader::load_height_grid,
};

use crate::common::test_utils::{HeightmapFile, assert_tiles_grid, coords};

mod common;

fn small_hill() -> HeightGrid {
    HeightGrid::from_rows(&[[0u8, 10, 20], [10, 20, 30], [20, 30, 40]]).unwrap()
}

/// y component of the face normal of a triangle given by grid coordinates.
fn normal_y(corners: [(usize, usize); 3]) -> i64 {
    let [a, b, c] = corners.map(|(x, z)| (x as i64, z as i64));
    let (e1x, e1z) = (b.0 - a.0, b.1 - a.1);
    let (e2x, e2z) = (c.0 - a.0, c.1 - a.1);
    e1z * e2x - e1x * e2z
}

#[test]
fn should_build_one_vertex_per_sample() {
    let mesh = TerrainMesh::build(&small_hill(), HEIGHT_DIVISOR).unwrap();

    assert_eq!(mesh.vertices.len(), 9);
    assert_eq!(mesh.triangle_count(), 8);
    assert_eq!(mesh.indices.len(), 24);

    let centre = mesh.vertex(1, 1).unwrap();
    assert_eq!(mesh.vertex_index(1, 1), 4);
    assert_eq!(centre.position, [1.0, 2.0, 1.0]);
    assert_eq!(centre.rgb(), [20, 20, 20]);
}

#[test]
fn should_place_every_vertex_on_its_sample() {
    let grid = small_hill();
    let mesh = TerrainMesh::build(&grid, HEIGHT_DIVISOR).unwrap();

    for z in 0..=2 {
        for x in 0..=2 {
            let sample = grid[(x, z)];
            let vertex = mesh.vertex(x, z).unwrap();
            assert_eq!(vertex.position[0], x as f32);
            assert_eq!(vertex.position[1], sample as f32 / 10.0);
            assert_eq!(vertex.position[2], z as f32);
            assert_eq!(vertex.color, [sample, sample, sample, 255]);
        }
    }
    assert!(mesh.vertex(3, 0).is_none());
}

#[test]
fn should_split_every_cell_along_the_same_diagonal() {
    let mesh = TerrainMesh::build(&small_hill(), HEIGHT_DIVISOR).unwrap();

    assert_tiles_grid(&mesh);
    let first: Vec<[u16; 3]> = mesh.triangles().take(2).collect();
    assert_eq!(first, vec![[0, 1, 4], [0, 4, 3]]);
}

#[test]
fn should_wind_all_triangles_the_same_way() {
    let mesh = TerrainMesh::build(&small_hill(), HEIGHT_DIVISOR).unwrap();

    for triangle in mesh.triangles() {
        let corners = triangle.map(|i| coords(i, 3));
        assert!(normal_y(corners) < 0, "triangle {:?} winds the other way", corners);
    }
}

#[test]
fn should_keep_indices_in_range() {
    let grid = HeightGrid::new(TERRAIN_WIDTH, TERRAIN_HEIGHT, 3).unwrap();
    let mesh = TerrainMesh::build(&grid, HEIGHT_DIVISOR).unwrap();
    let config = TerrainConfig::default();

    assert_eq!(mesh.vertices.len(), config.vertex_count());
    assert_eq!(mesh.indices.len(), config.index_count());
    assert_eq!(mesh.indices.len(), 24576);
    assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
}

#[test]
fn should_render_all_zero_file_as_flat_black_ground() {
    let file = HeightmapFile::filled((TERRAIN_WIDTH + 1) * (TERRAIN_HEIGHT + 1), 0);
    let loaded = load_height_grid(&file.path, TERRAIN_WIDTH, TERRAIN_HEIGHT, ShortReadPolicy::Reject).unwrap();

    let mesh = TerrainMesh::build(&loaded.grid, HEIGHT_DIVISOR).unwrap();

    assert_eq!(mesh.vertices.len(), 4225);
    assert!(mesh.vertices.iter().all(|v| v.position[1] == 0.0));
    assert!(mesh.vertices.iter().all(|v| v.rgb() == [0, 0, 0]));
}

#[test]
fn should_render_all_max_file_as_white_plateau() {
    let file = HeightmapFile::filled((TERRAIN_WIDTH + 1) * (TERRAIN_HEIGHT + 1), 255);
    let loaded = load_height_grid(&file.path, TERRAIN_WIDTH, TERRAIN_HEIGHT, ShortReadPolicy::Reject).unwrap();

    let mesh = TerrainMesh::build(&loaded.grid, HEIGHT_DIVISOR).unwrap();

    assert!(mesh.vertices.iter().all(|v| v.position[1] == 25.5));
    assert!(mesh.vertices.iter().all(|v| v.rgb() == [255, 255, 255]));
}

#[test]
fn should_scale_heights_by_the_configured_divisor() {
    let mesh = TerrainMesh::build(&small_hill(), 20.0).unwrap();

    assert_eq!(mesh.vertex(2, 2).unwrap().position[1], 2.0);
}

#[test]
fn should_reject_unusable_divisor() {
    for divisor in [0.0, -1.0, f32::INFINITY] {
        assert!(matches!(
            TerrainMesh::build(&small_hill(), divisor),
            Err(MeshError::InvalidHeightDivisor(_))
        ));
    }
}

#[test]
fn should_refuse_terrain_beyond_16_bit_indices() {
    let grid = HeightGrid::new(256, 256, 0).unwrap();

    let err = TerrainMesh::build(&grid, HEIGHT_DIVISOR).unwrap_err();

    assert_eq!(
        err,
        MeshError::IndexOverflow {
            cells_x: 256,
            cells_z: 256,
            vertices: 257 * 257
        }
    );
}

#[test]
fn should_build_largest_terrain_16_bit_indices_can_reach() {
    let grid = HeightGrid::new(255, 255, 1).unwrap();

    let mesh = TerrainMesh::build(&grid, HEIGHT_DIVISOR).unwrap();

    assert_eq!(mesh.vertices.len(), 65536);
    assert_eq!(mesh.indices.iter().copied().max(), Some(u16::MAX));
}

proptest! {
    #[test]
    fn random_grids_tile_without_gaps(
        (cells_x, cells_z, samples) in (1usize..20, 1usize..20).prop_flat_map(|(cx, cz)| {
            (Just(cx), Just(cz), prop::collection::vec(any::<u8>(), (cx + 1) * (cz + 1)))
        })
    ) {
        let grid = HeightGrid::from_samples(cells_x, cells_z, samples.clone()).unwrap();
        let mesh = TerrainMesh::build(&grid, HEIGHT_DIVISOR).unwrap();

        prop_assert_eq!(mesh.vertices.len(), samples.len());
        prop_assert_eq!(mesh.triangle_count(), 2 * cells_x * cells_z);
        assert_tiles_grid(&mesh);
        for (i, vertex) in mesh.vertices.iter().enumerate() {
            let (x, z) = coords(i as u16, cells_x + 1);
            prop_assert_eq!(vertex.position, [x as f32, samples[i] as f32 / HEIGHT_DIVISOR, z as f32]);
            prop_assert_eq!(vertex.rgb(), [samples[i]; 3]);
        }
    }
}
