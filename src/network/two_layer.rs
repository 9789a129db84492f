//! Forward and backward propagation for the two-layer network
//!
//! Architecture: `data -> dense(W1, b1) -> sigmoid -> dense(W2, b2) -> softmax`,
//! trained against one-hot labels with mean cross-entropy.
//!
//! Every call is pure: parameters come in as a flat vector, the cost and a
//! gradient vector with the same layout come out.

use tracing::debug;

use super::params::{unpack, Dimensions, Parameters};
use crate::error::{NetworkError, Result};
use crate::utils::{
    add_bias, matmul, matmul_a_bt, matmul_at_b, sigmoid_grad, sigmoid_inplace, softmax_rows,
    sum_rows, Matrix,
};

/// Activations cached by the forward pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Activations {
    /// Hidden layer output `sigmoid(data·W1 + b1)`, `N x H`.
    pub a1: Matrix,
    /// Output probabilities `softmax(a1·W2 + b2)`, `N x Dy`. Rows sum to 1.
    pub a2: Matrix,
}

/// Run the forward pass.
///
/// Fails with [`NetworkError::Shape`] if the blocks of `params` disagree with
/// each other, if `data` is empty, or if its column count differs from the
/// input size of `params`.
pub fn forward(data: &Matrix, params: &Parameters) -> Result<Activations> {
    let dims = params.validate()?;
    check_data(data, dims)?;

    let n = data.rows();

    let mut a1 = matmul(data, &params.w1);
    add_bias(a1.as_mut_slice(), n, dims.hidden_size, &params.b1);
    sigmoid_inplace(a1.as_mut_slice());

    let mut a2 = matmul(&a1, &params.w2);
    add_bias(a2.as_mut_slice(), n, dims.output_size, &params.b2);
    softmax_rows(a2.as_mut_slice(), n, dims.output_size);

    Ok(Activations { a1, a2 })
}

/// Mean cross-entropy `-(1/N) Σ ln a2[r, c]` over the entries where `labels == 1`.
///
/// A true-label probability of exactly zero makes the cost infinite; that is
/// reported as [`NetworkError::Numeric`] rather than clamped.
pub fn cross_entropy(a2: &Matrix, labels: &Matrix) -> Result<f64> {
    if a2.shape() != labels.shape() {
        return Err(NetworkError::shape(format!(
            "labels are {}x{}, predictions are {}x{}",
            labels.rows(),
            labels.cols(),
            a2.rows(),
            a2.cols()
        )));
    }
    if a2.rows() == 0 {
        return Err(NetworkError::shape("empty batch"));
    }

    let log_likelihood: f64 = a2
        .as_slice()
        .iter()
        .zip(labels.as_slice())
        .filter(|&(_, &t)| t == 1.0)
        .map(|(&p, _)| p.ln())
        .sum();
    let cost = -log_likelihood / a2.rows() as f64;

    if !cost.is_finite() {
        return Err(NetworkError::numeric(format!(
            "cross-entropy cost is {} (a true-label probability underflowed to zero)",
            cost
        )));
    }
    Ok(cost)
}

/// Compute the cost and the gradient of every packed parameter.
///
/// `data` is `N x Dx`, `labels` is one-hot `N x Dy`, `flat_params` has
/// `dims.param_count()` entries. The returned gradient has the same length and
/// ordering as `flat_params`.
///
/// # Errors
///
/// - [`NetworkError::Shape`] when dims, parameters, data and labels disagree.
/// - [`NetworkError::Numeric`] when inputs contain non-finite values or the
///   cost comes out non-finite.
///
/// # Examples
///
/// ```
/// use rust_neural_gradcheck::network::{forward_backward, Dimensions};
/// use rust_neural_gradcheck::Matrix;
///
/// let dims = Dimensions::new(2, 2, 2).unwrap();
/// let data = Matrix::from_rows(&[vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
/// let labels = Matrix::from_rows(&[vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
/// let params = vec![0.0; dims.param_count()];
///
/// let (cost, grad) = forward_backward(&data, &labels, &params, dims).unwrap();
/// assert!((cost - std::f64::consts::LN_2).abs() < 1e-12);
/// assert_eq!(grad.len(), params.len());
/// ```
pub fn forward_backward(
    data: &Matrix,
    labels: &Matrix,
    flat_params: &[f64],
    dims: Dimensions,
) -> Result<(f64, Vec<f64>)> {
    check_batch(data, labels, dims)?;
    let params = unpack(flat_params, dims)?;
    if let Some(idx) = flat_params.iter().position(|v| !v.is_finite()) {
        return Err(NetworkError::numeric(format!(
            "parameter {} is {}",
            idx, flat_params[idx]
        )));
    }

    let activations = forward(data, &params)?;
    let cost = cross_entropy(&activations.a2, labels)?;
    let grads = backward(data, labels, &params, &activations);

    debug!(
        batch_size = data.rows(),
        input_size = dims.input_size,
        hidden_size = dims.hidden_size,
        output_size = dims.output_size,
        cost,
        "forward/backward pass"
    );

    Ok((cost, grads.to_flat()))
}

/// Data must be non-empty with one column per input.
fn check_data(data: &Matrix, dims: Dimensions) -> Result<()> {
    if data.rows() == 0 {
        return Err(NetworkError::shape("data has no rows"));
    }
    if data.cols() != dims.input_size {
        return Err(NetworkError::shape(format!(
            "data has {} columns, expected input size {}",
            data.cols(),
            dims.input_size
        )));
    }
    Ok(())
}

fn check_batch(data: &Matrix, labels: &Matrix, dims: Dimensions) -> Result<()> {
    check_data(data, dims)?;
    if labels.cols() != dims.output_size {
        return Err(NetworkError::shape(format!(
            "labels have {} columns, expected output size {}",
            labels.cols(),
            dims.output_size
        )));
    }
    if labels.rows() != data.rows() {
        return Err(NetworkError::shape(format!(
            "labels have {} rows, data has {}",
            labels.rows(),
            data.rows()
        )));
    }
    if !data.is_finite() {
        return Err(NetworkError::numeric("data contains non-finite values"));
    }
    if !labels.is_finite() {
        return Err(NetworkError::numeric("labels contain non-finite values"));
    }
    Ok(())
}

/// Backpropagate softmax + cross-entropy through both layers.
///
/// The returned record has the same block shapes as `params`.
fn backward(
    data: &Matrix,
    labels: &Matrix,
    params: &Parameters,
    activations: &Activations,
) -> Parameters {
    let dims = params.dimensions();
    let n = data.rows();
    let inv_n = 1.0 / n as f64;

    // Softmax and cross-entropy combine to (a2 - labels) / N.
    let mut grad_z2 = activations.a2.clone();
    for (g, &t) in grad_z2.as_mut_slice().iter_mut().zip(labels.as_slice()) {
        *g = (*g - t) * inv_n;
    }

    let grad_w2 = matmul_at_b(&activations.a1, &grad_z2);
    let mut grad_b2 = vec![0.0; dims.output_size];
    sum_rows(grad_z2.as_slice(), n, dims.output_size, &mut grad_b2);

    let mut grad_z1 = matmul_a_bt(&grad_z2, &params.w2);
    for (g, &a) in grad_z1
        .as_mut_slice()
        .iter_mut()
        .zip(activations.a1.as_slice())
    {
        *g *= sigmoid_grad(a);
    }

    let grad_w1 = matmul_at_b(data, &grad_z1);
    let mut grad_b1 = vec![0.0; dims.hidden_size];
    sum_rows(grad_z1.as_slice(), n, dims.hidden_size, &mut grad_b1);

    Parameters {
        w1: grad_w1,
        b1: grad_b1,
        w2: grad_w2,
        b2: grad_b2,
    }
}
