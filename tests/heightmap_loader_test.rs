use std::io::Cursor;

use simple_terrain::terrain::{
    GridError, LoadError, LoadStatus, ShortReadPolicy, TERRAIN_HEIGHT, TERRAIN_WIDTH,
    loader::{load_height_grid, read_height_grid},
};

use crate::common::test_utils::HeightmapFile;

mod common;

const SAMPLES: usize = (TERRAIN_WIDTH + 1) * (TERRAIN_HEIGHT + 1);

#[test]
fn should_load_reference_sized_file_completely() {
    let bytes: Vec<u8> = (0..SAMPLES).map(|i| (i % 251) as u8).collect();
    let file = HeightmapFile::new(&bytes);

    let loaded = load_height_grid(&file.path, TERRAIN_WIDTH, TERRAIN_HEIGHT, ShortReadPolicy::Reject)
        .expect("a full heightmap must load");

    assert!(loaded.is_complete());
    assert_eq!(loaded.grid.samples_x(), 65);
    assert_eq!(loaded.grid.samples_z(), 65);
    for z in 0..=TERRAIN_HEIGHT {
        for x in 0..=TERRAIN_WIDTH {
            assert_eq!(loaded.grid[(x, z)], bytes[x + z * 65], "sample ({}, {})", x, z);
        }
    }
}

#[test]
fn should_fill_rows_with_x_increasing_fastest() {
    let file = HeightmapFile::new(&[0, 1, 2, 3, 4, 5, 6, 7, 8]);

    let loaded = load_height_grid(&file.path, 2, 2, ShortReadPolicy::Reject).unwrap();

    assert_eq!(loaded.grid.get(1, 0), Some(1));
    assert_eq!(loaded.grid.get(2, 0), Some(2));
    assert_eq!(loaded.grid.get(0, 1), Some(3));
    assert_eq!(loaded.grid.get(2, 2), Some(8));
}

#[test]
fn should_zero_fill_short_file() {
    let file = HeightmapFile::filled(5, 7);

    let loaded = load_height_grid(&file.path, 2, 2, ShortReadPolicy::ZeroFill).unwrap();

    assert_eq!(
        loaded.status,
        LoadStatus::ShortRead {
            read: 5,
            expected: 9
        }
    );
    assert_eq!(loaded.grid.samples(), &[7, 7, 7, 7, 7, 0, 0, 0, 0]);
}

#[test]
fn should_fill_short_file_with_sentinel() {
    let file = HeightmapFile::filled(3, 1);

    let loaded = load_height_grid(&file.path, 2, 2, ShortReadPolicy::Sentinel).unwrap();

    assert!(!loaded.is_complete());
    assert_eq!(loaded.grid.samples(), &[1, 1, 1, 255, 255, 255, 255, 255, 255]);
}

#[test]
fn should_reject_short_file_when_asked_to() {
    let file = HeightmapFile::filled(8, 1);

    let err = load_height_grid(&file.path, 2, 2, ShortReadPolicy::Reject).unwrap_err();

    assert!(matches!(
        err,
        LoadError::ShortRead {
            read: 8,
            expected: 9
        }
    ));
}

#[test]
fn should_treat_empty_file_as_short_read() {
    let file = HeightmapFile::new(&[]);

    let loaded = load_height_grid(&file.path, 64, 64, ShortReadPolicy::ZeroFill).unwrap();

    assert_eq!(
        loaded.status,
        LoadStatus::ShortRead {
            read: 0,
            expected: SAMPLES
        }
    );
    assert!(loaded.grid.samples().iter().all(|&s| s == 0));
}

#[test]
fn should_report_missing_file_as_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does-not-exist.raw");

    let err = load_height_grid(&path, 2, 2, ShortReadPolicy::ZeroFill).unwrap_err();

    match err {
        LoadError::Unreadable { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("expected an unreadable heightmap, got {:?}", other),
    }
}

#[test]
fn should_ignore_trailing_bytes() {
    let file = HeightmapFile::new(&[9, 9, 9, 9, 9, 9, 9, 9, 9, 1, 2, 3]);

    let loaded = load_height_grid(&file.path, 2, 2, ShortReadPolicy::Reject).unwrap();

    assert!(loaded.is_complete());
    assert_eq!(loaded.grid.samples(), &[9; 9]);
}

#[test]
fn should_read_from_any_reader() {
    let mut source = Cursor::new(vec![5u8; 6]);

    let loaded = read_height_grid(&mut source, 1, 2, ShortReadPolicy::Reject).unwrap();

    assert!(loaded.is_complete());
    assert_eq!(loaded.grid.cells_x(), 1);
    assert_eq!(loaded.grid.cells_z(), 2);
    assert_eq!(source.position(), 6);
}

#[test]
fn should_leave_bytes_after_the_grid_in_the_reader() {
    let mut source = Cursor::new(vec![5u8; 10]);

    let loaded = read_height_grid(&mut source, 1, 2, ShortReadPolicy::Reject).unwrap();

    assert!(loaded.is_complete());
    assert_eq!(source.position(), 6);
    let next = read_height_grid(&mut source, 1, 1, ShortReadPolicy::Reject).unwrap();
    assert_eq!(next.grid.samples(), &[5, 5, 5, 5]);
    assert_eq!(source.position(), 10);
}

#[test]
fn should_refuse_dimensions_that_overflow() {
    let err = read_height_grid(Cursor::new(Vec::<u8>::new()), usize::MAX, 1, ShortReadPolicy::ZeroFill).unwrap_err();

    assert!(matches!(err, LoadError::Grid(GridError::TooLarge { .. })));
}

#[test]
fn should_refuse_zero_sized_terrain() {
    let err = read_height_grid(Cursor::new(vec![0u8; 4]), 0, 3, ShortReadPolicy::ZeroFill).unwrap_err();

    assert!(matches!(err, LoadError::Grid(_)));
}
