use crate::backend::Backend;
use std::fmt;
use std::marker::PhantomData;

/// Backend-typed 2D tensor, row-major.
///
/// A one-hot encoded categorical feature is a `Tensor2D` of shape
/// `[batch, dim + 1]`.
#[derive(Clone)]
pub struct Tensor2D<B: Backend> {
    pub(crate) data: B::Tensor2D,
    pub(crate) backend: PhantomData<B>,
}

impl<B: Backend> Tensor2D<B> {
    /// Creates a tensor from row-major data.
    ///
    /// # Panics
    /// If `data.len() != rows * cols`.
    pub fn new(data: Vec<f32>, rows: usize, cols: usize) -> Self {
        Self {
            data: B::from_vec_2d(data, rows, cols),
            backend: PhantomData,
        }
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: B::zeros_2d(rows, cols),
            backend: PhantomData,
        }
    }

    /// Returns `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        B::shape(&self.data)
    }

    /// Copies the values out in row-major order.
    pub fn to_vec(&self) -> Vec<f32> {
        B::to_vec_2d(&self.data)
    }

    /// Copies one row out to host memory.
    ///
    /// # Panics
    /// If `row >= rows`.
    pub fn row(&self, row: usize) -> Vec<f32> {
        let (rows, cols) = self.shape();
        assert!(row < rows, "Row {} out of bounds ({} rows)", row, rows);
        let data = self.to_vec();
        data[row * cols..(row + 1) * cols].to_vec()
    }

    /// Index of the largest element in each row.
    pub fn argmax_rows(&self) -> Vec<Option<usize>> {
        B::argmax_rows_2d(&self.data)
    }
}

impl<B: Backend> fmt::Debug for Tensor2D<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rows, cols) = self.shape();
        f.debug_struct("Tensor2D")
            .field("shape", &(rows, cols))
            .field("data", &self.to_vec())
            .finish()
    }
}

impl<B: Backend> PartialEq for Tensor2D<B> {
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape() && self.to_vec() == other.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_tensor2d_row() {
        let t = Tensor2D::<CpuBackend>::new(vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0], 2, 3);
        assert_eq!(t.row(0), vec![1.0, 0.0, 0.0]);
        assert_eq!(t.row(1), vec![0.0, 1.0, 0.0]);
    }

    #[test]
    #[should_panic]
    fn test_tensor2d_row_out_of_bounds() {
        let t = Tensor2D::<CpuBackend>::zeros(1, 2);
        t.row(1);
    }

    #[test]
    fn test_tensor2d_eq_checks_shape() {
        let a = Tensor2D::<CpuBackend>::zeros(2, 3);
        let b = Tensor2D::<CpuBackend>::zeros(3, 2);
        assert_ne!(a, b);
        assert_eq!(a, Tensor2D::<CpuBackend>::zeros(2, 3));
    }
}
