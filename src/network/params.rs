//! Parameter codec for the two-layer network
//!
//! All weights and biases travel as one flat vector laid out as:
//!
//! ```text
//! [ W1 (Dx x H, row-major) | b1 (H) | W2 (H x Dy, row-major) | b2 (Dy) ]
//! ```
//!
//! Internally the network works on [`Parameters`], a record with the four
//! named blocks. [`unpack`] and [`pack`] are the only places that know the
//! offsets, so gradients come back in exactly the layout the parameters went in.

use crate::error::{NetworkError, Result};
use crate::utils::Matrix;

/// Layer sizes `(input_size, hidden_size, output_size)`, all positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub input_size: usize,
    pub hidden_size: usize,
    pub output_size: usize,
}

impl Dimensions {
    /// Create dimensions, rejecting zero-sized layers.
    pub fn new(input_size: usize, hidden_size: usize, output_size: usize) -> Result<Self> {
        if input_size == 0 || hidden_size == 0 || output_size == 0 {
            return Err(NetworkError::shape(format!(
                "dimensions must be positive, got ({}, {}, {})",
                input_size, hidden_size, output_size
            )));
        }
        Ok(Self {
            input_size,
            hidden_size,
            output_size,
        })
    }

    /// Total number of scalars in the flat parameter vector.
    ///
    /// `Dx*H + H + H*Dy + Dy`
    pub fn param_count(&self) -> usize {
        self.input_size * self.hidden_size
            + self.hidden_size
            + self.hidden_size * self.output_size
            + self.output_size
    }

    fn validate(&self) -> Result<()> {
        Self::new(self.input_size, self.hidden_size, self.output_size).map(|_| ())
    }
}

/// Structured view of the flat parameter (or gradient) vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    /// First-layer weights, `Dx x H`.
    pub w1: Matrix,
    /// First-layer bias, length `H`.
    pub b1: Vec<f64>,
    /// Second-layer weights, `H x Dy`.
    pub w2: Matrix,
    /// Second-layer bias, length `Dy`.
    pub b2: Vec<f64>,
}

impl Parameters {
    /// Layer sizes implied by the stored blocks.
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            input_size: self.w1.rows(),
            hidden_size: self.w1.cols(),
            output_size: self.w2.cols(),
        }
    }

    /// Check that the four blocks agree with each other and return their sizes.
    ///
    /// The fields are public, so a hand-built record can disagree with itself:
    /// `b1.len()` and `w2.rows()` must equal `w1.cols()`, and `b2.len()` must
    /// equal `w2.cols()`. Every size must be positive.
    pub fn validate(&self) -> Result<Dimensions> {
        let dims = self.dimensions();
        dims.validate()?;
        if self.b1.len() != dims.hidden_size {
            return Err(NetworkError::shape(format!(
                "b1 has length {}, expected hidden size {}",
                self.b1.len(),
                dims.hidden_size
            )));
        }
        if self.w2.rows() != dims.hidden_size {
            return Err(NetworkError::shape(format!(
                "w2 has {} rows, expected hidden size {}",
                self.w2.rows(),
                dims.hidden_size
            )));
        }
        if self.b2.len() != dims.output_size {
            return Err(NetworkError::shape(format!(
                "b2 has length {}, expected output size {}",
                self.b2.len(),
                dims.output_size
            )));
        }
        Ok(dims)
    }

    /// Serialize back to the flat layout.
    pub fn to_flat(&self) -> Vec<f64> {
        pack(&self.w1, &self.b1, &self.w2, &self.b2)
    }
}

/// Slice a flat parameter vector into its four blocks.
///
/// Fails with [`NetworkError::Shape`] when `flat_params.len()` differs from
/// `dims.param_count()` or when any dimension is zero.
///
/// # Examples
///
/// ```
/// use rust_neural_gradcheck::network::{unpack, Dimensions};
///
/// let dims = Dimensions::new(2, 3, 1).unwrap();
/// let flat: Vec<f64> = (0..dims.param_count()).map(|i| i as f64).collect();
/// let params = unpack(&flat, dims).unwrap();
/// assert_eq!(params.w1.shape(), (2, 3));
/// assert_eq!(params.b1, vec![6.0, 7.0, 8.0]);
/// assert_eq!(params.b2, vec![12.0]);
/// ```
pub fn unpack(flat_params: &[f64], dims: Dimensions) -> Result<Parameters> {
    dims.validate()?;
    let expected = dims.param_count();
    if flat_params.len() != expected {
        return Err(NetworkError::shape(format!(
            "flat parameter vector has length {}, expected {} for dims ({}, {}, {})",
            flat_params.len(),
            expected,
            dims.input_size,
            dims.hidden_size,
            dims.output_size
        )));
    }

    let Dimensions {
        input_size: dx,
        hidden_size: h,
        output_size: dy,
    } = dims;

    let (w1, rest) = flat_params.split_at(dx * h);
    let (b1, rest) = rest.split_at(h);
    let (w2, b2) = rest.split_at(h * dy);

    Ok(Parameters {
        w1: Matrix::from_vec(dx, h, w1.to_vec())?,
        b1: b1.to_vec(),
        w2: Matrix::from_vec(h, dy, w2.to_vec())?,
        b2: b2.to_vec(),
    })
}

/// Concatenate the four blocks in the flat layout order.
///
/// Used for gradients: packing `gradW1, gradb1, gradW2, gradb2` of matching
/// shapes yields a vector aligned position-by-position with the parameters.
pub fn pack(w1: &Matrix, b1: &[f64], w2: &Matrix, b2: &[f64]) -> Vec<f64> {
    let len = w1.as_slice().len() + b1.len() + w2.as_slice().len() + b2.len();
    let mut flat = Vec::with_capacity(len);
    flat.extend_from_slice(w1.as_slice());
    flat.extend_from_slice(b1);
    flat.extend_from_slice(w2.as_slice());
    flat.extend_from_slice(b2);
    flat
}
