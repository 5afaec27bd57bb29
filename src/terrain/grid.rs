use std::ops::Index;

/// Errors raised when a grid is constructed from caller-supplied samples.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GridError {
    #[error("a terrain needs at least one cell in each direction, got {cells_x} x {cells_z}")]
    Empty { cells_x: usize, cells_z: usize },
    #[error("expected {expected} samples for the grid, got {actual}")]
    SampleCount { expected: usize, actual: usize },
    #[error("rows have uneven lengths")]
    Ragged,
    #[error("a {cells_x} x {cells_z} terrain has more samples than memory can address")]
    TooLarge { cells_x: usize, cells_z: usize },
}

/// `(cells_x + 1) * (cells_z + 1)`, or `None` if that overflows.
pub(crate) fn sample_count(cells_x: usize, cells_z: usize) -> Option<usize> {
    cells_x
        .checked_add(1)
        .and_then(|w| cells_z.checked_add(1).and_then(|h| w.checked_mul(h)))
}

/// A rectangular grid of `u8` elevation samples.
///
/// A terrain of `cells_x` x `cells_z` cells has `(cells_x + 1) x (cells_z + 1)`
/// samples. They are stored z-major, so sample `(x, z)` lives at
/// `x + z * (cells_x + 1)`: the same order as the heightmap file and the
/// vertex buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeightGrid {
    cells_x: usize,
    cells_z: usize,
    samples: Vec<u8>,
}

impl HeightGrid {
    /// A flat grid with every sample set to `fill`.
    pub fn new(cells_x: usize, cells_z: usize, fill: u8) -> Result<Self, GridError> {
        if cells_x == 0 || cells_z == 0 {
            return Err(GridError::Empty { cells_x, cells_z });
        }
        let len = sample_count(cells_x, cells_z).ok_or(GridError::TooLarge { cells_x, cells_z })?;
        Ok(Self {
            cells_x,
            cells_z,
            samples: vec![fill; len],
        })
    }

    /// Wrap an already ordered (z-major) sample buffer.
    pub fn from_samples(cells_x: usize, cells_z: usize, samples: Vec<u8>) -> Result<Self, GridError> {
        if cells_x == 0 || cells_z == 0 {
            return Err(GridError::Empty { cells_x, cells_z });
        }
        let expected = sample_count(cells_x, cells_z).ok_or(GridError::TooLarge { cells_x, cells_z })?;
        if samples.len() != expected {
            return Err(GridError::SampleCount {
                expected,
                actual: samples.len(),
            });
        }
        Ok(Self {
            cells_x,
            cells_z,
            samples,
        })
    }

    /// Build a grid from rows of samples, `rows[z][x]`.
    ///
    /// Handy for small hand-written terrains.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, GridError> {
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        if rows.iter().any(|row| row.as_ref().len() != width) {
            return Err(GridError::Ragged);
        }
        let samples = rows
            .iter()
            .flat_map(|row| row.as_ref().iter().copied())
            .collect();
        Self::from_samples(
            width.saturating_sub(1),
            rows.len().saturating_sub(1),
            samples,
        )
    }

    pub fn cells_x(&self) -> usize {
        self.cells_x
    }

    pub fn cells_z(&self) -> usize {
        self.cells_z
    }

    /// Samples per row (`cells_x + 1`).
    pub fn samples_x(&self) -> usize {
        self.cells_x + 1
    }

    /// Number of rows (`cells_z + 1`).
    pub fn samples_z(&self) -> usize {
        self.cells_z + 1
    }

    /// Flat position of `(x, z)` in the sample buffer, if it is on the grid.
    pub fn offset(&self, x: usize, z: usize) -> Option<usize> {
        (x < self.samples_x() && z < self.samples_z()).then(|| x + z * self.samples_x())
    }

    pub fn get(&self, x: usize, z: usize) -> Option<u8> {
        self.offset(x, z).map(|i| self.samples[i])
    }

    /// Overwrite one sample. Returns `false` when `(x, z)` is off the grid.
    pub fn set(&mut self, x: usize, z: usize, value: u8) -> bool {
        match self.offset(x, z) {
            Some(i) => {
                self.samples[i] = value;
                true
            }
            None => false,
        }
    }

    /// The raw samples in z-major order.
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    pub fn min_max(&self) -> (u8, u8) {
        self.samples
            .iter()
            .fold((u8::MAX, u8::MIN), |(lo, hi), &s| (lo.min(s), hi.max(s)))
    }
}

impl Index<(usize, usize)> for HeightGrid {
    type Output = u8;

    /// Panics when `(x, z)` is off the grid; use [`HeightGrid::get`] otherwise.
    fn index(&self, (x, z): (usize, usize)) -> &u8 {
        match self.offset(x, z) {
            Some(i) => &self.samples[i],
            None => panic!(
                "sample ({}, {}) is outside a {}x{} grid",
                x,
                z,
                self.samples_x(),
                self.samples_z()
            ),
        }
    }
}
