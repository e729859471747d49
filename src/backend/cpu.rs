use super::Backend;

#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub struct CpuBackend;

/// Row-major matrix: `(data, rows, cols)`.
#[derive(Debug, Clone)]
pub struct CpuTensor2D(pub Vec<f32>, pub usize, pub usize);

impl CpuTensor2D {
    pub fn new(data: Vec<f32>, rows: usize, cols: usize) -> Self {
        assert_eq!(data.len(), rows * cols, "Inconsistent shape");
        Self(data, rows, cols)
    }
}

impl Backend for CpuBackend {
    type Tensor1D = Vec<f32>;
    type Tensor2D = CpuTensor2D;

    fn zeros_1d(len: usize) -> Self::Tensor1D {
        vec![0.0; len]
    }

    fn zeros_2d(rows: usize, cols: usize) -> Self::Tensor2D {
        CpuTensor2D::new(vec![0.0; rows * cols], rows, cols)
    }

    fn from_vec_1d(data: Vec<f32>) -> Self::Tensor1D {
        data
    }

    fn from_vec_2d(data: Vec<f32>, rows: usize, cols: usize) -> Self::Tensor2D {
        CpuTensor2D::new(data, rows, cols)
    }

    fn clamp_1d(t: &Self::Tensor1D, lo: f32, hi: f32) -> Self::Tensor1D {
        t.iter().map(|x| x.clamp(lo, hi)).collect()
    }

    fn argmax_rows_2d(t: &Self::Tensor2D) -> Vec<Option<usize>> {
        let (rows, cols) = (t.1, t.2);
        if cols == 0 {
            return vec![None; rows];
        }
        t.0.chunks(cols)
            .map(|row| {
                let mut best = 0;
                for (i, &v) in row.iter().enumerate().skip(1) {
                    if v > row[best] {
                        best = i;
                    }
                }
                Some(best)
            })
            .collect()
    }

    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f32> {
        t.clone()
    }

    fn to_vec_2d(t: &Self::Tensor2D) -> Vec<f32> {
        t.0.clone()
    }

    fn len_1d(t: &Self::Tensor1D) -> usize {
        t.len()
    }

    fn shape(t: &Self::Tensor2D) -> (usize, usize) {
        (t.1, t.2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_tensor2d_row_major() {
        let t = CpuBackend::from_vec_2d(vec![1.0, 0.0, 0.0, 1.0, 0.0, 1.0], 3, 2);
        assert_eq!(CpuBackend::shape(&t), (3, 2));
        assert_eq!(CpuBackend::to_vec_2d(&t), vec![1.0, 0.0, 0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    #[should_panic(expected = "Inconsistent shape")]
    fn test_cpu_tensor2d_inconsistent_shape() {
        CpuTensor2D::new(vec![1.0, 2.0, 3.0], 2, 2);
    }

    #[test]
    fn test_argmax_rows_first_on_ties() {
        let t = CpuBackend::from_vec_2d(vec![0.0, 1.0, 1.0, 0.0, 0.0, 0.0], 2, 3);
        assert_eq!(CpuBackend::argmax_rows_2d(&t), vec![Some(1), Some(0)]);
    }

    #[test]
    fn test_argmax_rows_no_columns() {
        let t = CpuBackend::zeros_2d(2, 0);
        assert_eq!(CpuBackend::argmax_rows_2d(&t), vec![None, None]);
    }

    #[test]
    fn test_clamp_1d() {
        let t = CpuBackend::from_vec_1d(vec![-0.5, 0.25, 1.5]);
        assert_eq!(CpuBackend::clamp_1d(&t, 0.0, 1.0), vec![0.0, 0.25, 1.0]);
    }
}
