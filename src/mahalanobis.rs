extern crate ndarray;
extern crate ndarray_linalg;

use ndarray::*;

use crate::errors::*;
use crate::batch_input::*;
use crate::covariance::*;
use crate::parallel::*;

///Computes the squared Mahalanobis distance of one row from the mean,
///given the upper-triangular factor R of the covariance: solves
///R^T z = (row - mean) by forward substitution and returns ||z||^2.
///O(d^2) per row; no inverse of the covariance is ever formed.
pub(crate) fn mahalanobis_sq_row(chol : &CovarianceFactor,
                                 mean : ArrayView1<f64>,
                                 row : ArrayView1<f64>,
                                 z : &mut [f64]) -> f64 {
    let R = &chol.factor;
    let d = z.len();
    let mut result = 0.0f64;
    for i in 0..d {
        //R^T is lower-triangular, so entry (i, j) of it is R[j, i]
        let mut elem = row[[i,]] - mean[[i,]];
        for j in 0..i {
            elem -= R[[j, i]] * z[j];
        }
        let z_i = elem / R[[i, i]];
        z[i] = z_i;
        result += z_i * z_i;
    }
    result
}

///Per-block kernel: fills out with the squared distances of the rows
///of x_block. The arithmetic within each row is fixed, so the result
///does not depend on how the batch was partitioned.
pub(crate) fn mahalanobis_sq_block(chol : &CovarianceFactor,
                                   mean : ArrayView1<f64>,
                                   x_block : ArrayView2<f64>,
                                   mut out : ArrayViewMut1<f64>) {
    let d = chol.dim();
    let mut z = vec![0.0f64; d];
    for i in 0..x_block.shape()[0] {
        out[[i,]] = mahalanobis_sq_row(chol, mean.clone(), x_block.row(i), &mut z);
    }
}

///Squared Mahalanobis distances of every row of x from mean, under the
///covariance (or pre-computed factor) in sigma, computed across
///num_workers workers. Identical inputs give identical outputs for any
///worker count.
pub fn mahalanobis_sq(x : &BatchInput, mean : ArrayView1<f64>,
                      sigma : &CovarianceSpec,
                      num_workers : usize) -> Result<Array1<f64>> {
    let n = x.num_points();
    let num_workers = resolve_workers(num_workers, n)?;
    let chol = CovarianceFactor::from_spec(sigma)?;
    check_batch_dims(x.dim(), mean.shape()[0], chol.dim())?;

    let x_mat = x.as_matrix();
    let mut out = Array::zeros((n,));
    run_row_blocks(out.view_mut(), num_workers, |_, start, block| {
        let x_block = x_mat.slice(s![start..start + block.len(), ..]);
        mahalanobis_sq_block(&chol, mean.clone(), x_block, block);
    });
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::*;
    use crate::test_utils::*;

    #[test]
    fn test_identity_covariance_gives_euclidean_distance() {
        let x = random_matrix(20, 3);
        let mean = random_vector(3);
        let eye : Array2<f64> = Array::eye(3);
        let result = mahalanobis_sq(&BatchInput::Matrix(x.view()), mean.view(),
                                    &CovarianceSpec::Raw(eye.view()), 1).unwrap();
        for i in 0..20 {
            let diff = &x.row(i) - &mean;
            assert_equal_scalars(result[[i,]], diff.dot(&diff));
        }
    }

    #[test]
    fn test_distance_at_the_mean_is_zero() {
        let dim = 4;
        let mean = random_vector(dim);
        let covariance = random_spd_matrix(dim);
        let mut x = Array::zeros((10, dim));
        for i in 0..10 {
            x.row_mut(i).assign(&mean);
        }
        let result = mahalanobis_sq(&BatchInput::Matrix(x.view()), mean.view(),
                                    &CovarianceSpec::Raw(covariance.view()), 2).unwrap();
        for i in 0..10 {
            assert_equal_scalars(result[[i,]], 0.0f64);
        }
    }

    #[test]
    fn test_known_diagonal_case() {
        let covariance = array![[4.0f64, 0.0f64], [0.0f64, 9.0f64]];
        let mean = array![0.0f64, 0.0f64];
        let x = array![2.0f64, 3.0f64];
        let result = mahalanobis_sq(&BatchInput::Single(x.view()), mean.view(),
                                    &CovarianceSpec::Raw(covariance.view()), 1).unwrap();
        //(2^2)/4 + (3^2)/9 = 2
        assert_equal_scalars(result[[0,]], 2.0f64);
    }

    #[test]
    fn test_trusted_factor_matches_internal_factorization() {
        let dim = 5;
        let covariance = random_spd_matrix(dim);
        let chol = CovarianceFactor::from_covariance(covariance.view()).unwrap();
        let x = random_matrix(50, dim);
        let mean = random_vector(dim);

        let from_raw = mahalanobis_sq(&BatchInput::Matrix(x.view()), mean.view(),
                                      &CovarianceSpec::Raw(covariance.view()), 1).unwrap();
        let from_factor = mahalanobis_sq(&BatchInput::Matrix(x.view()), mean.view(),
                                         &CovarianceSpec::CholeskyFactor(chol.factor.view()),
                                         1).unwrap();
        assert_equal_vectors(&from_raw, &from_factor);
    }

    #[test]
    fn test_worker_count_does_not_change_the_result() {
        let dim = 3;
        let covariance = random_spd_matrix(dim);
        let x = random_matrix(101, dim);
        let mean = random_vector(dim);
        let sequential = mahalanobis_sq(&BatchInput::Matrix(x.view()), mean.view(),
                                        &CovarianceSpec::Raw(covariance.view()), 1).unwrap();
        let parallel = mahalanobis_sq(&BatchInput::Matrix(x.view()), mean.view(),
                                      &CovarianceSpec::Raw(covariance.view()), 2).unwrap();
        //Bit-identical, since per-row arithmetic is partition-independent
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_dimension_mismatch_is_rejected() {
        let covariance = random_spd_matrix(3);
        let x = random_matrix(4, 2);
        let mean = random_vector(2);
        let result = mahalanobis_sq(&BatchInput::Matrix(x.view()), mean.view(),
                                    &CovarianceSpec::Raw(covariance.view()), 1);
        assert!(matches!(result.err(),
                Option::Some(FastMvError::DimensionMismatch(_))));
    }
}
