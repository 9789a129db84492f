//! Random test data for gradient checks
//!
//! All constructors take the generator as an argument, so a seeded
//! `StdRng` gives reproducible batches.

use rand::Rng;
use rand_distr::StandardNormal;

use crate::error::{NetworkError, Result};
use crate::network::Dimensions;
use crate::utils::Matrix;

/// One-hot encode class indices into an `N x num_classes` matrix.
///
/// # Examples
///
/// ```
/// use rust_neural_gradcheck::data::one_hot;
///
/// let labels = one_hot(&[2, 0], 3).unwrap();
/// assert_eq!(labels.as_slice(), &[0.0, 0.0, 1.0, 1.0, 0.0, 0.0]);
/// ```
pub fn one_hot(classes: &[usize], num_classes: usize) -> Result<Matrix> {
    let mut labels = Matrix::zeros(classes.len(), num_classes);
    for (row, &class) in classes.iter().enumerate() {
        if class >= num_classes {
            return Err(NetworkError::shape(format!(
                "class {} at row {} is out of range for {} classes",
                class, row, num_classes
            )));
        }
        labels.as_mut_slice()[row * num_classes + class] = 1.0;
    }
    Ok(labels)
}

/// Standard-normal data (`batch_size x Dx`) with one-hot labels
/// (`batch_size x Dy`) whose classes are drawn uniformly.
pub fn random_batch<R: Rng>(
    rng: &mut R,
    batch_size: usize,
    dims: Dimensions,
) -> Result<(Matrix, Matrix)> {
    if batch_size == 0 {
        return Err(NetworkError::shape("batch size must be positive"));
    }

    let values = (0..batch_size * dims.input_size)
        .map(|_| rng.sample::<f64, _>(StandardNormal))
        .collect();
    let data = Matrix::from_vec(batch_size, dims.input_size, values)?;

    let classes: Vec<usize> = (0..batch_size)
        .map(|_| rng.gen_range(0..dims.output_size))
        .collect();
    let labels = one_hot(&classes, dims.output_size)?;

    Ok((data, labels))
}

/// Standard-normal flat parameter vector of length `dims.param_count()`.
pub fn random_params<R: Rng>(rng: &mut R, dims: Dimensions) -> Vec<f64> {
    (0..dims.param_count())
        .map(|_| rng.sample::<f64, _>(StandardNormal))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_one_hot_rejects_out_of_range() {
        assert!(matches!(one_hot(&[0, 3], 3), Err(NetworkError::Shape(_))));
    }

    #[test]
    fn test_random_batch_shapes_and_one_hot_rows() {
        let dims = Dimensions::new(10, 5, 10).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let (data, labels) = random_batch(&mut rng, 20, dims).unwrap();

        assert_eq!(data.shape(), (20, 10));
        assert_eq!(labels.shape(), (20, 10));
        for row in labels.iter_rows() {
            assert_eq!(row.iter().sum::<f64>(), 1.0);
            assert_eq!(row.iter().filter(|&&v| v == 1.0).count(), 1);
        }
    }

    #[test]
    fn test_same_seed_same_data() {
        let dims = Dimensions::new(4, 3, 2).unwrap();
        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);

        assert_eq!(
            random_batch(&mut rng1, 5, dims).unwrap(),
            random_batch(&mut rng2, 5, dims).unwrap()
        );
        assert_eq!(random_params(&mut rng1, dims), random_params(&mut rng2, dims));
    }

    #[test]
    fn test_random_params_length() {
        let dims = Dimensions::new(10, 5, 10).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(random_params(&mut rng, dims).len(), 115);
    }

    #[test]
    fn test_zero_batch_rejected() {
        let dims = Dimensions::new(2, 2, 2).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(random_batch(&mut rng, 0, dims).is_err());
    }
}
