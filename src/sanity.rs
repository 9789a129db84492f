//! Gradient sanity check for the two-layer network
//!
//! Builds a seeded random batch and parameter vector, then runs the gradient
//! checker against [`forward_backward`].

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::config::{validate_config, SanityCheckConfig};
use crate::data::{random_batch, random_params};
use crate::error::Result;
use crate::gradcheck::{check_with, GradCheckReport};
use crate::network::forward_backward;

/// Run the gradient check described by `config`.
///
/// The same seed always produces the same data, labels and parameters.
pub fn run_sanity_check(config: &SanityCheckConfig) -> Result<GradCheckReport> {
    validate_config(config)?;
    let dims = config.dimensions()?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let (data, labels) = random_batch(&mut rng, config.batch_size, dims)?;
    let params = random_params(&mut rng, dims);

    info!(
        input_size = dims.input_size,
        hidden_size = dims.hidden_size,
        output_size = dims.output_size,
        batch_size = config.batch_size,
        parameters = params.len(),
        seed = config.seed,
        "running gradient sanity check"
    );

    check_with(
        |p: &[f64]| forward_backward(&data, &labels, p, dims),
        &params,
        &config.grad_check(),
    )
}
