//! Activation functions for the two-layer network
//!
//! - Sigmoid for the hidden layer, with its gradient expressed through the output
//! - Softmax applied row-wise for the output layer

/// Sigmoid activation function.
///
/// Returns the sigmoid of the input: 1 / (1 + exp(-x))
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Sigmoid gradient assuming `f = sigmoid(z)`.
///
/// Returns `f - f²`. Only meaningful when `f` is itself a sigmoid output;
/// passing a raw pre-activation gives a wrong derivative.
pub fn sigmoid_grad(f: f64) -> f64 {
    f - f * f
}

/// Apply sigmoid element-wise in place.
pub fn sigmoid_inplace(data: &mut [f64]) {
    for value in data.iter_mut() {
        *value = sigmoid(*value);
    }
}

/// Softmax applied row-wise.
///
/// Converts logits to probabilities for each row. Uses the max-subtraction
/// trick for numerical stability to avoid overflow with large values.
///
/// # Arguments
/// * `outputs` - Flat array containing row-major matrix data
/// * `rows` - Number of rows in the matrix
/// * `cols` - Number of columns in the matrix
pub fn softmax_rows(outputs: &mut [f64], rows: usize, cols: usize) {
    if cols == 0 {
        return;
    }
    assert_eq!(outputs.len(), rows * cols, "outputs length mismatch in softmax_rows");

    for row in outputs.chunks_exact_mut(cols).take(rows) {
        let max_value = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let mut sum = 0.0f64;
        for value in row.iter_mut() {
            *value = (*value - max_value).exp();
            sum += *value;
        }

        let inv_sum = 1.0 / sum;
        for value in row.iter_mut() {
            *value *= inv_sum;
        }
    }
}
