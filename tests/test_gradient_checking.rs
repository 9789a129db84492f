// Tests for numerical gradient checking of the two-layer network.
// These tests verify that analytical gradients from forward_backward match
// central-difference approximations at every parameter index.

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_neural_gradcheck::data::{one_hot, random_batch, random_params};
use rust_neural_gradcheck::gradcheck::{
    check, check_with, relative_error, GradCheckConfig, MismatchPolicy,
};
use rust_neural_gradcheck::network::{forward_backward, unpack, Dimensions};
use rust_neural_gradcheck::{Matrix, Result};

// ============================================================================
// Helpers
// ============================================================================

// Random network and batch for a given seed.
fn random_problem(
    seed: u64,
    batch_size: usize,
    dims: Dimensions,
) -> (Matrix, Matrix, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let (data, labels) = random_batch(&mut rng, batch_size, dims).unwrap();
    let params = random_params(&mut rng, dims);
    (data, labels, params)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // End-to-end gradient checks
    // ========================================================================

    #[test]
    fn test_gradient_checking_reference_network() {
        // Dx=10, H=5, Dy=10, N=20 with Gaussian data and parameters.
        let dims = Dimensions::new(10, 5, 10).unwrap();

        for seed in [0u64, 1, 2, 31415] {
            let (data, labels, params) = random_problem(seed, 20, dims);
            let report = check(
                |p: &[f64]| forward_backward(&data, &labels, p, dims),
                &params,
            )
            .unwrap();

            assert_eq!(report.checked, 115);
            assert!(
                report.passed(),
                "seed {}: first mismatch {:?}, max relative error {:.3e}",
                seed,
                report.first_mismatch(),
                report.max_relative_error
            );
        }
    }

    #[test]
    fn test_gradient_checking_single_sample_binary() {
        let dims = Dimensions::new(3, 4, 2).unwrap();
        let (data, labels, params) = random_problem(11, 1, dims);
        let report = check(
            |p: &[f64]| forward_backward(&data, &labels, p, dims),
            &params,
        )
        .unwrap();
        assert!(report.passed(), "{:?}", report.mismatches);
    }

    #[test]
    fn test_gradient_checking_hand_written_batch() {
        let dims = Dimensions::new(2, 3, 3).unwrap();
        let data = Matrix::from_rows(&[
            vec![0.5, -1.0],
            vec![2.0, 0.25],
            vec![-0.75, 1.5],
            vec![0.0, 0.0],
        ])
        .unwrap();
        let labels = one_hot(&[0, 2, 1, 2], 3).unwrap();
        let params: Vec<f64> = (0..dims.param_count())
            .map(|i| ((i * 7 % 11) as f64 - 5.0) * 0.1)
            .collect();

        let report = check(
            |p: &[f64]| forward_backward(&data, &labels, p, dims),
            &params,
        )
        .unwrap();
        assert!(report.passed(), "{:?}", report.mismatches);
    }

    // ========================================================================
    // Detecting broken gradients
    // ========================================================================

    #[test]
    fn test_gradient_checking_detects_missing_bias_gradient() {
        let dims = Dimensions::new(4, 3, 3).unwrap();
        let (data, labels, params) = random_problem(5, 6, dims);
        let b1_start = dims.input_size * dims.hidden_size;

        // Drop the hidden-bias gradient.
        let broken = |p: &[f64]| -> Result<(f64, Vec<f64>)> {
            let (cost, mut grad) = forward_backward(&data, &labels, p, dims)?;
            for g in &mut grad[b1_start..b1_start + dims.hidden_size] {
                *g = 0.0;
            }
            Ok((cost, grad))
        };

        let report = check(broken, &params).unwrap();
        assert!(!report.passed());
        assert_eq!(report.checked, dims.param_count());
        for mismatch in &report.mismatches {
            assert!(mismatch.index >= b1_start && mismatch.index < b1_start + dims.hidden_size);
            assert_eq!(mismatch.analytical, 0.0);
        }
    }

    #[test]
    fn test_gradient_checking_stop_at_first() {
        let dims = Dimensions::new(4, 3, 3).unwrap();
        let (data, labels, params) = random_problem(6, 6, dims);

        // Flip the sign of every gradient entry.
        let flipped = |p: &[f64]| -> Result<(f64, Vec<f64>)> {
            let (cost, grad) = forward_backward(&data, &labels, p, dims)?;
            Ok((cost, grad.into_iter().map(|g| -g).collect()))
        };
        let config = GradCheckConfig {
            policy: MismatchPolicy::StopAtFirst,
            ..GradCheckConfig::default()
        };

        let report = check_with(flipped, &params, &config).unwrap();
        assert_eq!(report.mismatches.len(), 1);
        assert_eq!(report.checked, report.mismatches[0].index + 1);
    }

    // ========================================================================
    // Numerical gradient agrees with a one-sided estimate
    // ========================================================================

    #[test]
    fn test_central_difference_against_forward_difference() {
        let dims = Dimensions::new(3, 2, 2).unwrap();
        let (data, labels, params) = random_problem(21, 4, dims);
        let (cost, grad) = forward_backward(&data, &labels, &params, dims).unwrap();

        let h = 1e-7;
        for i in 0..params.len() {
            let mut shifted = params.clone();
            shifted[i] += h;
            let (cost_h, _) = forward_backward(&data, &labels, &shifted, dims).unwrap();
            let forward_diff = (cost_h - cost) / h;
            assert!(
                relative_error(forward_diff, grad[i]) < 1e-5,
                "index {}: forward difference {}, analytical {}",
                i,
                forward_diff,
                grad[i]
            );
        }
    }

    #[test]
    fn test_baseline_cost_matches_forward_backward() {
        let dims = Dimensions::new(5, 4, 3).unwrap();
        let (data, labels, params) = random_problem(8, 7, dims);
        let (cost, _) = forward_backward(&data, &labels, &params, dims).unwrap();

        let report = check(
            |p: &[f64]| forward_backward(&data, &labels, p, dims),
            &params,
        )
        .unwrap();
        assert_relative_eq!(report.baseline_cost, cost, epsilon = 1e-15);
        // Parameters are untouched by the check.
        assert_eq!(unpack(&params, dims).unwrap().to_flat(), params);
    }
}
