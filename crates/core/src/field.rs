//! Gridded field container

use crate::error::{Error, Result};
use ndarray::Array2;

/// A rectangular field of single-precision values, indexed `[y][x]`.
///
/// NaN marks missing data (see [`crate::is_valid`]). The field carries no
/// georeferencing of its own; alignment with a [`crate::Grid`] is the
/// caller's responsibility and is checked at algorithm boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    data: Array2<f32>,
}

impl Field {
    /// Create a field filled with zeros.
    pub fn new(ny: usize, nx: usize) -> Self {
        Self {
            data: Array2::zeros((ny, nx)),
        }
    }

    /// Create a field filled with a specific value.
    pub fn filled(ny: usize, nx: usize, value: f32) -> Self {
        Self {
            data: Array2::from_elem((ny, nx), value),
        }
    }

    /// Create a field from row-major data.
    pub fn from_vec(data: Vec<f32>, ny: usize, nx: usize) -> Result<Self> {
        if data.len() != ny * nx {
            return Err(Error::SizeMismatch {
                what: "field data",
                expected: format!("{} values", ny * nx),
                actual: format!("{} values", data.len()),
            });
        }
        let array = Array2::from_shape_vec((ny, nx), data).map_err(|_| Error::SizeMismatch {
            what: "field data",
            expected: format!("({}, {})", ny, nx),
            actual: "unshapeable vector".to_string(),
        })?;
        Ok(Self { data: array })
    }

    /// Create a field from an ndarray.
    pub fn from_array(data: Array2<f32>) -> Self {
        Self { data }
    }

    /// Create a field of the same shape filled with a value.
    pub fn like(&self, fill_value: f32) -> Self {
        Self {
            data: Array2::from_elem(self.data.dim(), fill_value),
        }
    }

    /// Number of rows (y dimension).
    pub fn ny(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns (x dimension).
    pub fn nx(&self) -> usize {
        self.data.ncols()
    }

    /// Dimensions as (ny, nx).
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the field has no cells.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get value at (y, x).
    pub fn get(&self, y: usize, x: usize) -> Result<f32> {
        self.data
            .get((y, x))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row: y,
                col: x,
                rows: self.ny(),
                cols: self.nx(),
            })
    }

    /// Get value at (y, x) without bounds checking.
    ///
    /// # Safety
    /// Caller must ensure `y < self.ny()` and `x < self.nx()`.
    pub unsafe fn get_unchecked(&self, y: usize, x: usize) -> f32 {
        unsafe { *self.data.uget((y, x)) }
    }

    /// Set value at (y, x).
    pub fn set(&mut self, y: usize, x: usize, value: f32) -> Result<()> {
        if y >= self.ny() || x >= self.nx() {
            return Err(Error::IndexOutOfBounds {
                row: y,
                col: x,
                rows: self.ny(),
                cols: self.nx(),
            });
        }
        self.data[(y, x)] = value;
        Ok(())
    }

    /// Reference to the underlying array.
    pub fn values(&self) -> &Array2<f32> {
        &self.data
    }

    /// Mutable reference to the underlying array.
    pub fn values_mut(&mut self) -> &mut Array2<f32> {
        &mut self.data
    }

    /// Consume the field and return the underlying array.
    pub fn into_array(self) -> Array2<f32> {
        self.data
    }
}
