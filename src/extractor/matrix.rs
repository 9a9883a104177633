//! Dense row-major matrix used for band data and mask selections

/// A row-major 2D array
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Copy> Matrix<T> {
    /// Wrap `data` as a `rows` x `cols` matrix
    ///
    /// Returns `None` when the data length does not match the shape.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Option<Self> {
        if rows * cols != data.len() {
            return None;
        }
        Some(Matrix { rows, cols, data })
    }

    /// Matrix of the given shape filled with `value`
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Matrix {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Value at (`row`, `col`), or None if out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col).copied()
    }

    /// Overwrite the value at (`row`, `col`); out of bounds writes are ignored
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        if row < self.rows && col < self.cols {
            self.data[row * self.cols + col] = value;
        }
    }

    /// Raw row-major samples
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Element-wise conversion into a new matrix of the same shape
    pub fn map<U: Copy, F: Fn(T) -> U>(&self, f: F) -> Matrix<U> {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|v| f(*v)).collect(),
        }
    }

    /// Gather the values at paired (row, col) positions
    ///
    /// Positions must be in bounds; the indexer guarantees this.
    pub fn gather(&self, rows: &[u32], cols: &[u32]) -> Vec<T> {
        rows.iter()
            .zip(cols.iter())
            .map(|(r, c)| self.data[*r as usize * self.cols + *c as usize])
            .collect()
    }
}
