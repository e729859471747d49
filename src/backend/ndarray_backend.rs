use ndarray::{Array1, Array2};

use super::Backend;

#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub struct NdarrayBackend;

#[derive(Debug, Clone)]
pub struct NdarrayTensor2D(pub Array2<f32>);

impl Backend for NdarrayBackend {
    type Tensor1D = Array1<f32>;
    type Tensor2D = NdarrayTensor2D;

    fn zeros_1d(len: usize) -> Self::Tensor1D {
        Array1::zeros(len)
    }

    fn zeros_2d(rows: usize, cols: usize) -> Self::Tensor2D {
        NdarrayTensor2D(Array2::zeros((rows, cols)))
    }

    fn from_vec_1d(data: Vec<f32>) -> Self::Tensor1D {
        Array1::from_vec(data)
    }

    fn from_vec_2d(data: Vec<f32>, rows: usize, cols: usize) -> Self::Tensor2D {
        assert_eq!(data.len(), rows * cols, "Inconsistent shape");
        match Array2::from_shape_vec((rows, cols), data) {
            Ok(array) => NdarrayTensor2D(array),
            Err(e) => panic!("Inconsistent shape: {e}"),
        }
    }

    fn clamp_1d(t: &Self::Tensor1D, lo: f32, hi: f32) -> Self::Tensor1D {
        t.mapv(|x| x.clamp(lo, hi))
    }

    fn argmax_rows_2d(t: &Self::Tensor2D) -> Vec<Option<usize>> {
        t.0.rows()
            .into_iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .fold(None, |best: Option<(usize, f32)>, (i, &v)| match best {
                        Some((_, b)) if v <= b => best,
                        _ => Some((i, v)),
                    })
                    .map(|(i, _)| i)
            })
            .collect()
    }

    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f32> {
        t.to_vec()
    }

    fn to_vec_2d(t: &Self::Tensor2D) -> Vec<f32> {
        t.0.iter().copied().collect()
    }

    fn len_1d(t: &Self::Tensor1D) -> usize {
        t.len()
    }

    fn shape(t: &Self::Tensor2D) -> (usize, usize) {
        t.0.dim()
    }
}
