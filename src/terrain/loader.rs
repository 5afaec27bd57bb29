//! Raw heightmap loading.
//!
//! A heightmap file is a headerless run of `(W+1) * (H+1)` unsigned bytes,
//! rows of constant z one after another, x increasing fastest. The
//! dimensions are not stored in the file; producer and consumer share them
//! through [`TerrainConfig`](super::TerrainConfig).

use std::{
    fs::File,
    io::{self, BufReader, Read},
    path::{Path, PathBuf},
};

use super::grid::{GridError, HeightGrid, sample_count};

/// What to do with the cells a short file leaves unread.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShortReadPolicy {
    /// Unread cells become 0 (flat ground).
    #[default]
    ZeroFill,
    /// Unread cells become 0xFF, the end-of-stream value a naive
    /// byte-at-a-time reader stores once the file runs out.
    Sentinel,
    /// A short file is an error.
    Reject,
}

impl ShortReadPolicy {
    fn fill_value(self) -> Option<u8> {
        match self {
            ShortReadPolicy::ZeroFill => Some(0),
            ShortReadPolicy::Sentinel => Some(u8::MAX),
            ShortReadPolicy::Reject => None,
        }
    }
}

/// How completely the grid was populated from the source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadStatus {
    Complete,
    /// Only `read` of `expected` samples came from the source; the rest were
    /// filled according to the [`ShortReadPolicy`].
    ShortRead { read: usize, expected: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("heightmap {path:?} could not be read")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("heightmap stream failed")]
    Read(#[from] io::Error),
    #[error("heightmap holds {read} of {expected} samples")]
    ShortRead { read: usize, expected: usize },
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// A populated grid together with how it was populated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedHeightGrid {
    pub grid: HeightGrid,
    pub status: LoadStatus,
}

impl LoadedHeightGrid {
    pub fn is_complete(&self) -> bool {
        self.status == LoadStatus::Complete
    }
}

/// Read a `cells_x` x `cells_z` terrain from any byte source.
///
/// Exactly `(cells_x + 1) * (cells_z + 1)` bytes are consumed; anything after
/// them is left alone.
pub fn read_height_grid<R: Read>(
    reader: R,
    cells_x: usize,
    cells_z: usize,
    policy: ShortReadPolicy,
) -> Result<LoadedHeightGrid, LoadError> {
    let expected = sample_count(cells_x, cells_z).ok_or(GridError::TooLarge { cells_x, cells_z })?;
    let mut samples = Vec::new();
    reader.take(expected as u64).read_to_end(&mut samples)?;
    let read = samples.len();

    let status = if read == expected {
        LoadStatus::Complete
    } else {
        match policy.fill_value() {
            Some(fill) => {
                samples.resize(expected, fill);
                LoadStatus::ShortRead { read, expected }
            }
            None => return Err(LoadError::ShortRead { read, expected }),
        }
    };

    let grid = HeightGrid::from_samples(cells_x, cells_z, samples)?;
    Ok(LoadedHeightGrid { grid, status })
}

/// Open `path` and read a `cells_x` x `cells_z` terrain from it.
///
/// The file is closed before this returns.
pub fn load_height_grid<P: AsRef<Path>>(
    path: P,
    cells_x: usize,
    cells_z: usize,
    policy: ShortReadPolicy,
) -> Result<LoadedHeightGrid, LoadError> {
    let path = path.as_ref();
    let unreadable = |source| LoadError::Unreadable {
        path: path.to_path_buf(),
        source,
    };
    let mut file = BufReader::new(File::open(path).map_err(unreadable)?);
    let loaded = match read_height_grid(&mut file, cells_x, cells_z, policy) {
        Err(LoadError::Read(source)) => return Err(unreadable(source)),
        other => other?,
    };
    if loaded.is_complete() && matches!(file.read(&mut [0u8; 1]), Ok(n) if n > 0) {
        log::debug!("heightmap {:?} has data after its samples, ignoring it", path);
    }

    if let LoadStatus::ShortRead { read, expected } = loaded.status {
        log::warn!(
            "heightmap {:?} is short: {} of {} samples, filled the rest ({:?})",
            path,
            read,
            expected,
            policy
        );
    } else {
        log::info!("loaded {}x{} heightmap from {:?}", cells_x + 1, cells_z + 1, path);
    }
    Ok(loaded)
}
