extern crate ndarray;
extern crate ndarray_linalg;

use ndarray::*;
use statrs::function::gamma::ln_gamma;

use crate::errors::*;
use crate::params::*;
use crate::batch_input::*;
use crate::covariance::*;
use crate::mahalanobis::*;
use crate::parallel::*;

///The distribution-specific part of the log-density: the normalizing
///constant and the map from a row's squared Mahalanobis distance to
///its log-density. Computed once per call and shared read-only by all
///workers. df of None selects the multivariate normal, df of Some(v)
///the multivariate Student's-t with v degrees of freedom.
pub(crate) struct LogDensityKernel {
    norm_const : f64,
    half_df_plus_dim : f64,
    df : Option<f64>
}

impl LogDensityKernel {
    pub fn new(chol : &CovarianceFactor, df : Option<f64>) -> LogDensityKernel {
        let d = chol.dim() as f64;
        match (df) {
            Option::None => {
                let norm_const = -0.5f64 * (d * LN_TWO_PI + chol.log_det);
                LogDensityKernel {
                    norm_const,
                    half_df_plus_dim : 0.0f64,
                    df
                }
            },
            Option::Some(v) => {
                let norm_const = ln_gamma(0.5f64 * (v + d)) - ln_gamma(0.5f64 * v)
                               - 0.5f64 * d * (v * std::f64::consts::PI).ln()
                               - 0.5f64 * chol.log_det;
                LogDensityKernel {
                    norm_const,
                    half_df_plus_dim : 0.5f64 * (v + d),
                    df
                }
            }
        }
    }

    ///Log-density of a row whose squared Mahalanobis distance is maha_sq
    pub fn log_density(&self, maha_sq : f64) -> f64 {
        match (self.df) {
            Option::None => self.norm_const - 0.5f64 * maha_sq,
            Option::Some(v) => {
                self.norm_const - self.half_df_plus_dim * (1.0f64 + maha_sq / v).ln()
            }
        }
    }
}

///Per-block kernel: log-densities of the rows of x_block into out.
pub(crate) fn log_density_block(chol : &CovarianceFactor,
                                kernel : &LogDensityKernel,
                                mean : ArrayView1<f64>,
                                x_block : ArrayView2<f64>,
                                mut out : ArrayViewMut1<f64>) {
    mahalanobis_sq_block(chol, mean.clone(), x_block, out.view_mut());
    out.mapv_inplace(|maha_sq| kernel.log_density(maha_sq));
}

///Log-densities of every row of x_mat under the distribution given by
///(mean, chol, df). Dimensions and worker count are assumed already
///validated by the public entry point.
pub(crate) fn log_density_batch(x_mat : ArrayView2<f64>, mean : ArrayView1<f64>,
                                chol : &CovarianceFactor, df : Option<f64>,
                                num_workers : usize) -> Array1<f64> {
    let kernel = LogDensityKernel::new(chol, df);
    let mut out = Array::zeros((x_mat.shape()[0],));
    run_row_blocks(out.view_mut(), num_workers, |_, start, block| {
        let x_block = x_mat.slice(s![start..start + block.len(), ..]);
        log_density_block(chol, &kernel, mean.clone(), x_block, block);
    });
    out
}

fn density_impl(x : &BatchInput, mean : ArrayView1<f64>, sigma : &CovarianceSpec,
                df : Option<f64>, log_scale : bool,
                num_workers : usize) -> Result<Array1<f64>> {
    let n = x.num_points();
    let num_workers = resolve_workers(num_workers, n)?;
    let chol = CovarianceFactor::from_spec(sigma)?;
    check_batch_dims(x.dim(), mean.shape()[0], chol.dim())?;

    let mut out = log_density_batch(x.as_matrix(), mean, &chol, df, num_workers);
    if (!log_scale) {
        //The natural scale always goes through the log form, so the
        //normalizing constant is never exponentiated on its own
        out.mapv_inplace(|v| v.exp());
    }
    Ok(out)
}

///Multivariate normal (log-)density of every row of x, evaluated with
///num_workers workers. With log_scale false the log-density is
///exponentiated per row.
pub fn mvn_density(x : &BatchInput, mean : ArrayView1<f64>, sigma : &CovarianceSpec,
                   log_scale : bool, num_workers : usize) -> Result<Array1<f64>> {
    density_impl(x, mean, sigma, Option::None, log_scale, num_workers)
}

///Multivariate Student's-t (log-)density with df degrees of freedom.
///df must be finite and strictly positive.
pub fn mvt_density(x : &BatchInput, mean : ArrayView1<f64>, sigma : &CovarianceSpec,
                   df : f64, log_scale : bool,
                   num_workers : usize) -> Result<Array1<f64>> {
    if (!(df > 0.0f64) || !df.is_finite()) {
        return Err(FastMvError::InvalidParameter(
                   format!("degrees of freedom must be positive and finite, got {}", df)));
    }
    density_impl(x, mean, sigma, Option::Some(df), log_scale, num_workers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_log_density_is_log_of_density() {
        let dim = 3;
        let covariance = random_spd_matrix(dim);
        let mean = random_vector(dim);
        let x = random_matrix(40, dim);
        let log_result = mvn_density(&BatchInput::Matrix(x.view()), mean.view(),
                                     &CovarianceSpec::Raw(covariance.view()),
                                     true, 1).unwrap();
        let raw_result = mvn_density(&BatchInput::Matrix(x.view()), mean.view(),
                                     &CovarianceSpec::Raw(covariance.view()),
                                     false, 1).unwrap();
        for i in 0..40 {
            assert_equal_scalars(raw_result[[i,]].ln(), log_result[[i,]]);
        }
    }

    #[test]
    fn test_univariate_normal_matches_closed_form() {
        let sigma_sq = 2.25f64;
        let mu = 0.7f64;
        let covariance = array![[sigma_sq]];
        let mean = array![mu];
        let x = array![[0.0f64], [1.0f64], [-2.5f64], [4.0f64]];
        let result = mvn_density(&BatchInput::Matrix(x.view()), mean.view(),
                                 &CovarianceSpec::Raw(covariance.view()),
                                 false, 1).unwrap();
        for i in 0..4 {
            let diff = x[[i, 0]] - mu;
            let expected = (-0.5f64 * diff * diff / sigma_sq).exp()
                         / (sigma_sq * 2.0f64 * std::f64::consts::PI).sqrt();
            assert_equal_scalars(result[[i,]], expected);
        }
    }

    #[test]
    fn test_univariate_normal_integrates_to_one() {
        let covariance = array![[2.25f64]];
        let mean = array![0.7f64];
        let step = 0.001f64;
        let num_points = 24000;
        let mut grid = Array::zeros((num_points, 1));
        for i in 0..num_points {
            grid[[i, 0]] = -12.0f64 + step * (i as f64);
        }
        let density = mvn_density(&BatchInput::Matrix(grid.view()), mean.view(),
                                  &CovarianceSpec::Raw(covariance.view()),
                                  false, 2).unwrap();
        let mass = density.sum() * step;
        assert!((mass - 1.0f64).abs() < 0.001f64,
                "mass was {}", mass);
    }

    #[test]
    fn test_bivariate_t_integrates_to_one() {
        let covariance = array![[1.0f64, 0.4f64], [0.4f64, 1.5f64]];
        let mean = array![0.0f64, 0.0f64];
        let df = 4.0f64;
        let step = 0.05f64;
        let half_width = 20.0f64;
        let num_per_axis = (2.0f64 * half_width / step) as usize;
        let mut grid = Array::zeros((num_per_axis * num_per_axis, 2));
        for i in 0..num_per_axis {
            for j in 0..num_per_axis {
                grid[[i * num_per_axis + j, 0]] = -half_width + step * (i as f64);
                grid[[i * num_per_axis + j, 1]] = -half_width + step * (j as f64);
            }
        }
        let density = mvt_density(&BatchInput::Matrix(grid.view()), mean.view(),
                                  &CovarianceSpec::Raw(covariance.view()),
                                  df, false, 2).unwrap();
        let mass = density.sum() * step * step;
        assert!((mass - 1.0f64).abs() < 0.01f64,
                "mass was {}", mass);
    }

    #[test]
    fn test_t_density_approaches_normal_for_large_df() {
        let dim = 3;
        let covariance = random_spd_matrix(dim);
        let mean = random_vector(dim);
        let x = random_matrix(30, dim);
        let normal = mvn_density(&BatchInput::Matrix(x.view()), mean.view(),
                                 &CovarianceSpec::Raw(covariance.view()),
                                 true, 1).unwrap();
        let student = mvt_density(&BatchInput::Matrix(x.view()), mean.view(),
                                  &CovarianceSpec::Raw(covariance.view()),
                                  1.0e8f64, true, 1).unwrap();
        assert_equal_vectors(&normal, &student);
    }

    #[test]
    fn test_worker_count_does_not_change_the_result() {
        let dim = 2;
        let covariance = random_spd_matrix(dim);
        let mean = random_vector(dim);
        let x = random_matrix(97, dim);
        let sequential = mvn_density(&BatchInput::Matrix(x.view()), mean.view(),
                                     &CovarianceSpec::Raw(covariance.view()),
                                     true, 1).unwrap();
        let parallel = mvn_density(&BatchInput::Matrix(x.view()), mean.view(),
                                   &CovarianceSpec::Raw(covariance.view()),
                                   true, 2).unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_non_positive_df_is_rejected() {
        let covariance = random_spd_matrix(2);
        let mean = random_vector(2);
        let x = random_matrix(3, 2);
        for &df in [0.0f64, -1.0f64, std::f64::NAN].iter() {
            let result = mvt_density(&BatchInput::Matrix(x.view()), mean.view(),
                                     &CovarianceSpec::Raw(covariance.view()),
                                     df, true, 1);
            assert!(matches!(result.err(),
                    Option::Some(FastMvError::InvalidParameter(_))));
        }
    }
}
