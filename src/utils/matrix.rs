//! Row-major matrix storage and the GEMM helpers used by the engine.
//!
//! Matrices are flat `Vec<f64>` buffers in row-major order, the same layout the
//! flat parameter vector uses for W1 and W2. Products go through `cblas::dgemm`.

use cblas::{dgemm, Layout, Transpose};

use crate::error::{NetworkError, Result};

/// Dense row-major matrix of `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Matrix of the given shape filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Wrap a row-major buffer. Fails if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(NetworkError::shape(format!(
                "buffer of length {} cannot be viewed as {}x{}",
                data.len(),
                rows,
                cols
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// Build a matrix from nested rows. All rows must have the same length.
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_neural_gradcheck::Matrix;
    ///
    /// let m = Matrix::from_rows(&[vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
    /// assert_eq!(m.shape(), (2, 2));
    /// assert_eq!(m.get(1, 1), 1.0);
    /// ```
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(NetworkError::shape(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    cols
                )));
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Borrow row `r`.
    pub fn row(&self, r: usize) -> &[f64] {
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    pub fn get(&self, r: usize, c: usize) -> f64 {
        self.data[r * self.cols + c]
    }

    /// Iterate over rows as slices.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact(0) panics, and a zero-column matrix has no row data anyway.
        self.data.chunks_exact(self.cols.max(1)).take(self.rows)
    }

    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }
}

/// Thin wrapper over `cblas::dgemm` for row-major buffers.
///
/// Computes `C = alpha * op(A) * op(B) + beta * C` where `op(A)` is `m x k`,
/// `op(B)` is `k x n` and `C` is `m x n`.
///
/// # Panics
///
/// If a leading dimension is smaller than its row width, or a buffer is too
/// short for the shape it is read or written as.
#[allow(clippy::too_many_arguments)]
pub fn dgemm_wrapper(
    m: usize,
    n: usize,
    k: usize,
    a: &[f64],
    lda: usize,
    b: &[f64],
    ldb: usize,
    c: &mut [f64],
    ldc: usize,
    transpose_a: bool,
    transpose_b: bool,
    alpha: f64,
    beta: f64,
) {
    // Stored shapes: op(X) = Xᵀ reads X as (cols x rows).
    let (a_rows, a_cols) = if transpose_a { (k, m) } else { (m, k) };
    let (b_rows, b_cols) = if transpose_b { (n, k) } else { (k, n) };
    check_operand("A", a.len(), a_rows, a_cols, lda);
    check_operand("B", b.len(), b_rows, b_cols, ldb);
    check_operand("C", c.len(), m, n, ldc);

    let trans_a = if transpose_a {
        Transpose::Ordinary
    } else {
        Transpose::None
    };
    let trans_b = if transpose_b {
        Transpose::Ordinary
    } else {
        Transpose::None
    };

    unsafe {
        dgemm(
            Layout::RowMajor,
            trans_a,
            trans_b,
            m as i32,
            n as i32,
            k as i32,
            alpha,
            a,
            lda as i32,
            b,
            ldb as i32,
            beta,
            c,
            ldc as i32,
        );
    }
}

fn check_operand(name: &str, len: usize, rows: usize, cols: usize, ld: usize) {
    assert!(
        ld >= cols.max(1),
        "gemm: leading dimension of {} is {}, row width is {}",
        name,
        ld,
        cols
    );
    let needed = if rows == 0 || cols == 0 {
        0
    } else {
        (rows - 1) * ld + cols
    };
    assert!(
        len >= needed,
        "gemm: {} has {} elements, {}x{} with stride {} needs {}",
        name,
        len,
        rows,
        cols,
        ld,
        needed
    );
}

/// `A · B`.
///
/// # Panics
///
/// If `a.cols() != b.rows()`.
pub fn matmul(a: &Matrix, b: &Matrix) -> Matrix {
    assert_eq!(a.cols, b.rows, "matmul inner dimension mismatch");
    let mut out = Matrix::zeros(a.rows, b.cols);
    dgemm_wrapper(
        a.rows,
        b.cols,
        a.cols,
        &a.data,
        a.cols,
        &b.data,
        b.cols,
        &mut out.data,
        b.cols,
        false,
        false,
        1.0,
        0.0,
    );
    out
}

/// `Aᵀ · B`.
///
/// # Panics
///
/// If `a.rows() != b.rows()`.
pub fn matmul_at_b(a: &Matrix, b: &Matrix) -> Matrix {
    assert_eq!(a.rows, b.rows, "matmul_at_b inner dimension mismatch");
    let mut out = Matrix::zeros(a.cols, b.cols);
    dgemm_wrapper(
        a.cols,
        b.cols,
        a.rows,
        &a.data,
        a.cols,
        &b.data,
        b.cols,
        &mut out.data,
        b.cols,
        true,
        false,
        1.0,
        0.0,
    );
    out
}

/// `A · Bᵀ`.
///
/// # Panics
///
/// If `a.cols() != b.cols()`.
pub fn matmul_a_bt(a: &Matrix, b: &Matrix) -> Matrix {
    assert_eq!(a.cols, b.cols, "matmul_a_bt inner dimension mismatch");
    let mut out = Matrix::zeros(a.rows, b.rows);
    dgemm_wrapper(
        a.rows,
        b.rows,
        a.cols,
        &a.data,
        a.cols,
        &b.data,
        b.cols,
        &mut out.data,
        b.rows,
        false,
        true,
        1.0,
        0.0,
    );
    out
}

/// Add `bias` to every row of a row-major buffer.
pub fn add_bias(data: &mut [f64], rows: usize, cols: usize, bias: &[f64]) {
    for row in data.chunks_exact_mut(cols).take(rows) {
        for (value, b) in row.iter_mut().zip(bias) {
            *value += *b;
        }
    }
}

/// Column sums of a row-major buffer, written into `out` (length `cols`).
pub fn sum_rows(data: &[f64], rows: usize, cols: usize, out: &mut [f64]) {
    for value in out.iter_mut().take(cols) {
        *value = 0.0;
    }

    for row in data.chunks_exact(cols).take(rows) {
        for (value, sum) in row.iter().zip(out.iter_mut()) {
            *sum += *value;
        }
    }
}
