//! Numerical gradient checking with central differences
//!
//! [`check`] takes any function mapping a flat parameter vector to
//! `(cost, gradient)` and compares the analytic gradient against
//! `(f(x + ε·eᵢ) - f(x - ε·eᵢ)) / 2ε` for every index `i`.
//!
//! # Comparison
//!
//! Each index is scored with
//!
//! ```text
//! |numerical - analytical| / max(1, |numerical|, |analytical|)
//! ```
//!
//! which acts as an absolute test for gradients smaller than 1 and as a
//! relative test above that. An index is a mismatch when the score exceeds
//! `tolerance`.
//!
//! # Reporting
//!
//! Mismatches are data, not errors. With [`MismatchPolicy::CollectAll`] (the
//! default) every index is visited and every mismatch is recorded; with
//! [`MismatchPolicy::StopAtFirst`] checking stops at the first one. Errors
//! returned by the checked function are propagated immediately.

use tracing::{debug, info, warn};

use crate::error::{NetworkError, Result};

/// Default perturbation size.
pub const DEFAULT_EPSILON: f64 = 1e-4;

/// Default tolerance on the per-index error score.
pub const DEFAULT_TOLERANCE: f64 = 1e-5;

/// What to do once a mismatch is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MismatchPolicy {
    /// Visit every index and record every mismatch.
    #[default]
    CollectAll,
    /// Stop after the first mismatch.
    StopAtFirst,
}

/// Settings for [`check_with`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradCheckConfig {
    pub epsilon: f64,
    pub tolerance: f64,
    pub policy: MismatchPolicy,
}

impl Default for GradCheckConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            tolerance: DEFAULT_TOLERANCE,
            policy: MismatchPolicy::CollectAll,
        }
    }
}

impl GradCheckConfig {
    fn validate(&self) -> Result<()> {
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(NetworkError::Config(format!(
                "epsilon must be finite and positive, got {}",
                self.epsilon
            )));
        }
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(NetworkError::Config(format!(
                "tolerance must be finite and non-negative, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// One index where the analytic and numerical gradients disagree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientMismatch {
    pub index: usize,
    pub numerical: f64,
    pub analytical: f64,
    pub relative_error: f64,
}

/// Outcome of a gradient check.
#[derive(Debug, Clone, PartialEq)]
pub struct GradCheckReport {
    /// Cost at the unperturbed parameters.
    pub baseline_cost: f64,
    /// Number of indices compared.
    pub checked: usize,
    /// Largest error score among the compared indices; NaN once any score is NaN.
    pub max_relative_error: f64,
    pub mismatches: Vec<GradientMismatch>,
}

impl GradCheckReport {
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }

    pub fn first_mismatch(&self) -> Option<&GradientMismatch> {
        self.mismatches.first()
    }
}

/// Error score used to compare a numerical and an analytical derivative.
///
/// `|numerical - analytical| / max(1, |numerical|, |analytical|)`
pub fn relative_error(numerical: f64, analytical: f64) -> f64 {
    let numerator = (numerical - analytical).abs();
    let denominator = numerical.abs().max(analytical.abs()).max(1.0);
    numerator / denominator
}

/// Check `f` at `params` with ε = 1e-4, tolerance 1e-5, collecting all mismatches.
///
/// # Examples
///
/// ```
/// use rust_neural_gradcheck::gradcheck::check;
///
/// // f(x) = Σ x², ∇f = 2x
/// let quad = |x: &[f64]| -> rust_neural_gradcheck::Result<(f64, Vec<f64>)> {
///     Ok((x.iter().map(|v| v * v).sum(), x.iter().map(|v| 2.0 * v).collect()))
/// };
/// let report = check(quad, &[1.0, -2.0, 0.5]).unwrap();
/// assert!(report.passed());
/// assert_eq!(report.checked, 3);
/// ```
pub fn check<F>(f: F, params: &[f64]) -> Result<GradCheckReport>
where
    F: FnMut(&[f64]) -> Result<(f64, Vec<f64>)>,
{
    check_with(f, params, &GradCheckConfig::default())
}

/// Check `f` at `params` with explicit settings.
///
/// Indices are visited in ascending order, each exactly once. Perturbations
/// are applied to a private copy of `params` and undone before the next index,
/// so every trial sees the original values everywhere except at its own index.
pub fn check_with<F>(
    mut f: F,
    params: &[f64],
    config: &GradCheckConfig,
) -> Result<GradCheckReport>
where
    F: FnMut(&[f64]) -> Result<(f64, Vec<f64>)>,
{
    config.validate()?;

    let (baseline_cost, analytic) = f(params)?;
    if analytic.len() != params.len() {
        return Err(NetworkError::shape(format!(
            "gradient has length {}, parameters have length {}",
            analytic.len(),
            params.len()
        )));
    }

    let eps = config.epsilon;
    let mut x = params.to_vec();
    let mut report = GradCheckReport {
        baseline_cost,
        checked: 0,
        max_relative_error: 0.0,
        mismatches: Vec::new(),
    };

    for (i, &analytical) in analytic.iter().enumerate() {
        let original = x[i];

        x[i] = original + eps;
        let (cost_plus, _) = f(&x)?;
        x[i] = original - eps;
        let (cost_minus, _) = f(&x)?;
        x[i] = original;

        let numerical = (cost_plus - cost_minus) / (2.0 * eps);
        let err = relative_error(numerical, analytical);
        report.checked += 1;
        // f64::max would drop a NaN score.
        if err.is_nan() || err > report.max_relative_error {
            report.max_relative_error = err;
        }

        if err.is_nan() || err > config.tolerance {
            debug!(
                index = i,
                numerical,
                analytical,
                relative_error = err,
                "gradient mismatch"
            );
            report.mismatches.push(GradientMismatch {
                index: i,
                numerical,
                analytical,
                relative_error: err,
            });
            if config.policy == MismatchPolicy::StopAtFirst {
                break;
            }
        }
    }

    if report.passed() {
        info!(
            checked = report.checked,
            max_relative_error = report.max_relative_error,
            "gradient check passed"
        );
    } else {
        warn!(
            checked = report.checked,
            mismatches = report.mismatches.len(),
            max_relative_error = report.max_relative_error,
            "gradient check failed"
        );
    }

    Ok(report)
}
