//! Two-layer neural network with a numerical gradient checker
//!
//! A sigmoid hidden layer and a softmax output layer trained against one-hot
//! labels with mean cross-entropy. All parameters travel as a single flat
//! vector; `forward_backward` returns the cost and a gradient with the same
//! layout, and `gradcheck` verifies that gradient with central differences.
//!
//! # Modules
//!
//! - `network`: parameter codec and the forward/backward engine
//! - `gradcheck`: finite-difference gradient checker and its report
//! - `utils`: activation functions and row-major matrix helpers (BLAS GEMM)
//! - `data`: seeded random batches and parameters
//! - `config`: JSON configuration for the sanity check
//! - `sanity`: end-to-end gradient sanity check
//! - `error`: error type shared by all of the above

extern crate blas_src;

pub mod config;
pub mod data;
pub mod error;
pub mod gradcheck;
pub mod network;
pub mod sanity;
pub mod utils;

pub use error::{NetworkError, Result};
pub use gradcheck::{check, check_with, GradCheckConfig, GradCheckReport, MismatchPolicy};
pub use network::{forward_backward, pack, unpack, Dimensions, Parameters};
pub use utils::Matrix;
