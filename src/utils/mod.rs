//! Shared numeric utilities
//!
//! Activation functions and the row-major matrix helpers used by the engine.

pub mod activations;
pub mod matrix;

pub use activations::{sigmoid, sigmoid_grad, sigmoid_inplace, softmax_rows};
pub use matrix::{add_bias, matmul, matmul_a_bt, matmul_at_b, sum_rows, Matrix};
