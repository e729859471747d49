//! # Backend Abstraction
//!
//! Storage for the batched outputs of the feature transforms. The one-hot
//! encoder writes a `[batch, dim + 1]` matrix and the scaler writes a
//! `[batch]` vector; both are held by a backend-native tensor so the
//! downstream model can consume them without another copy.
//!
//! ## Available Backends
//!
//! | Backend          | Feature   | Use Case                          |
//! |------------------|-----------|-----------------------------------|
//! | `CpuBackend`     | `cpu`     | Default, pure-Rust implementation |
//! | `NdarrayBackend` | `ndarray` | Interop with `ndarray` ecosystem  |
//!
//! ## Example
//!
//! ```rust
//! use clinical_transform::backend::{CpuBackend, Tensor1D, Tensor2D};
//!
//! let scaled: Tensor1D<CpuBackend> = Tensor1D::new(vec![0.0, 0.5, 1.0]);
//! let one_hot: Tensor2D<CpuBackend> = Tensor2D::new(vec![1.0, 0.0, 0.0, 1.0], 2, 2);
//!
//! assert_eq!(scaled.len(), 3);
//! assert_eq!(one_hot.shape(), (2, 2));
//! ```

#[cfg(feature = "cpu")]
mod cpu;
#[cfg(feature = "cpu")]
/// Pure-Rust CPU backend implementation with zero external dependencies.
pub use cpu::{CpuBackend, CpuTensor2D};

#[cfg(feature = "ndarray")]
mod ndarray_backend;
#[cfg(feature = "ndarray")]
/// Backend backed by the `ndarray` crate for ecosystem interoperability.
pub use ndarray_backend::{NdarrayBackend, NdarrayTensor2D};

/// One-dimensional tensor abstraction.
pub mod tensor1d;
/// Two-dimensional tensor abstraction.
pub mod tensor2d;

pub use tensor1d::Tensor1D;
pub use tensor2d::Tensor2D;

/// Storage operations a backend must provide for transformed features.
///
/// Values cross the trait boundary as `f32`, the precision the downstream
/// model consumes. Implementations are free to store them natively in any
/// layout as long as 2D tensors round-trip in row-major order.
///
/// All tensor types are `Send + Sync` so fitted statistics and their
/// outputs can be shared across threads applying the same transform.
pub trait Backend: Clone + Copy + Send + Sync + 'static {
    /// One-dimensional tensor type.
    type Tensor1D: Clone + Send + Sync + std::fmt::Debug;

    /// Two-dimensional tensor type.
    type Tensor2D: Clone + Send + Sync + std::fmt::Debug;

    // --- Constructors ---

    /// Creates a 1D tensor filled with zeros of given length.
    fn zeros_1d(len: usize) -> Self::Tensor1D;

    /// Creates a 2D tensor filled with zeros of given dimensions.
    fn zeros_2d(rows: usize, cols: usize) -> Self::Tensor2D;

    /// Constructs a 1D tensor from owned data.
    fn from_vec_1d(data: Vec<f32>) -> Self::Tensor1D;

    /// Constructs a 2D tensor from row-major ordered data.
    ///
    /// # Panics
    /// If `data.len() != rows * cols`.
    fn from_vec_2d(data: Vec<f32>, rows: usize, cols: usize) -> Self::Tensor2D;

    // --- Element-wise operations ---

    /// Clamps every element into `[lo, hi]`.
    fn clamp_1d(t: &Self::Tensor1D, lo: f32, hi: f32) -> Self::Tensor1D;

    /// Index of the largest element of each row (first one on ties).
    ///
    /// Rows of a zero-column tensor have no maximum and yield `None`.
    fn argmax_rows_2d(t: &Self::Tensor2D) -> Vec<Option<usize>>;

    // --- Access ---

    /// Copies the tensor out to host memory.
    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f32>;

    /// Copies the tensor out to host memory in row-major order.
    fn to_vec_2d(t: &Self::Tensor2D) -> Vec<f32>;

    /// Returns the number of elements in a 1D tensor.
    fn len_1d(t: &Self::Tensor1D) -> usize;

    /// Returns `(rows, cols)` of a 2D tensor.
    fn shape(t: &Self::Tensor2D) -> (usize, usize);
}
