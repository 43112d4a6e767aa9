//! Random weights (e.g. Manning's n per land classification)
use ndarray::{Array1, Array2};
use ndarray_rand::rand::rngs::StdRng;
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

/// Weight vector of length `num_basis`, uniform in `[low, high)`
///
/// # Panics
/// `low >= high`
pub fn sample_weights(num_basis: usize, low: f64, high: f64) -> Array1<f64> {
    Array1::random(num_basis, Uniform::new(low, high))
}

/// `num_samples` weight vectors stored as columns, size (`num_basis`, `num_samples`),
/// uniform in `[low, high)`.
///
/// Can be combined in one go with [`crate::combine::combine_dense_many`].
///
/// # Panics
/// `low >= high`
pub fn sample_weight_sets(num_basis: usize, num_samples: usize, low: f64, high: f64) -> Array2<f64> {
    Array2::random((num_basis, num_samples), Uniform::new(low, high))
}

/// Reproducible version of [`sample_weight_sets`]
///
/// # Panics
/// `low >= high`
pub fn sample_weight_sets_seeded(
    num_basis: usize,
    num_samples: usize,
    low: f64,
    high: f64,
    seed: u64,
) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::random_using((num_basis, num_samples), Uniform::new(low, high), &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_weights_in_range() {
        let w = sample_weights(10, 0.012, 0.2);
        assert_eq!(w.len(), 10);
        assert!(w.iter().all(|v| *v >= 0.012 && *v < 0.2));
    }

    #[test]
    fn test_sample_weight_sets_shape() {
        let w = sample_weight_sets(4, 7, 0., 1.);
        assert_eq!(w.shape(), &[4, 7]);
        assert!(w.iter().all(|v| *v >= 0. && *v < 1.));
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let a = sample_weight_sets_seeded(3, 5, 0.02, 0.1, 42);
        let b = sample_weight_sets_seeded(3, 5, 0.02, 0.1, 42);
        assert_eq!(a, b);
    }
}
