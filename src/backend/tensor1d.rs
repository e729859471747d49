use crate::backend::Backend;
use std::fmt;
use std::marker::PhantomData;

/// Backend-typed 1D tensor.
///
/// Wraps a backend's native 1D tensor representation (`B::Tensor1D`) while
/// carrying phantom type information about its originating backend, so
/// outputs of different backends cannot be mixed by accident.
///
/// The min-max scaler produces one of these per numerical feature, one
/// element per record of the batch.
///
/// # Example
/// ```
/// use clinical_transform::backend::{CpuBackend, Tensor1D};
///
/// let x: Tensor1D<CpuBackend> = Tensor1D::new(vec![0.0f32, 0.5, 1.0]);
/// assert_eq!(x.len(), 3);
/// assert_eq!(x.to_vec(), vec![0.0, 0.5, 1.0]);
/// ```
#[derive(Clone)]
pub struct Tensor1D<B: Backend> {
    pub(crate) data: B::Tensor1D,
    pub(crate) backend: PhantomData<B>,
}

impl<B: Backend> Tensor1D<B> {
    /// Creates a new 1D tensor from a vector of `f32` values.
    pub fn new(data: Vec<f32>) -> Self {
        Self {
            data: B::from_vec_1d(data),
            backend: PhantomData,
        }
    }

    /// Creates a zero-filled 1D tensor of the specified length.
    pub fn zeros(len: usize) -> Self {
        Self {
            data: B::zeros_1d(len),
            backend: PhantomData,
        }
    }

    /// Copies the values out to host memory.
    pub fn to_vec(&self) -> Vec<f32> {
        B::to_vec_1d(&self.data)
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        B::len_1d(&self.data)
    }

    /// Returns `true` if the tensor contains no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clamps every element into `[lo, hi]`.
    pub fn clamp(&self, lo: f32, hi: f32) -> Self {
        Self {
            data: B::clamp_1d(&self.data, lo, hi),
            backend: PhantomData,
        }
    }
}

impl<B: Backend> fmt::Debug for Tensor1D<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Tensor1D").field(&self.to_vec()).finish()
    }
}

impl<B: Backend> PartialEq for Tensor1D<B> {
    fn eq(&self, other: &Self) -> bool {
        self.to_vec() == other.to_vec()
    }
}
