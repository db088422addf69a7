extern crate ndarray;
extern crate ndarray_linalg;

use ndarray::*;
use ndarray_linalg::*;

use crate::errors::*;

use ndarray_linalg::cholesky::*;

///The covariance argument of a batch operation. The caller states
///up-front whether it is handing over a raw covariance matrix or an
///upper-triangular Cholesky factor of one -- the two are never told
///apart by inspecting the values.
pub enum CovarianceSpec<'a> {
    ///A d x d symmetric positive-definite covariance matrix,
    ///to be factorized.
    Raw(ArrayView2<'a, f64>),
    ///An upper-triangular factor R with R^T R = covariance.
    ///Taken on trust, see [`CovarianceFactor::from_cholesky`].
    CholeskyFactor(ArrayView2<'a, f64>)
}

impl <'a> CovarianceSpec<'a> {
    pub fn dim(&self) -> usize {
        match (self) {
            CovarianceSpec::Raw(mat) => mat.shape()[0],
            CovarianceSpec::CholeskyFactor(mat) => mat.shape()[0]
        }
    }
}

///An upper-triangular Cholesky factor R of a covariance matrix,
///together with the log-determinant of the covariance. Built once per
///batch call and shared read-only by every worker for its duration.
pub struct CovarianceFactor {
    pub factor : Array2<f64>,
    pub log_det : f64
}

fn check_square(mat : &ArrayView2<f64>, what : &str) -> Result<()> {
    if (mat.shape()[0] != mat.shape()[1]) {
        return Err(FastMvError::DimensionMismatch(
                   format!("{} is {}x{}, expected square",
                           what, mat.shape()[0], mat.shape()[1])));
    }
    Ok(())
}

///Validates that an n x d batch, a mean vector and a factor all agree
///on the dimension d. Called by every batch operation before any
///parallel work is dispatched.
pub(crate) fn check_batch_dims(x_cols : usize, mean_len : usize,
                               factor_dim : usize) -> Result<()> {
    if (x_cols != mean_len || mean_len != factor_dim) {
        return Err(FastMvError::DimensionMismatch(
                   format!("batch has {} columns, mean has length {}, covariance is {}x{}",
                           x_cols, mean_len, factor_dim, factor_dim)));
    }
    Ok(())
}

fn log_det_from_factor(factor : &Array2<f64>) -> f64 {
    let mut result = 0.0f64;
    for i in 0..factor.shape()[0] {
        result += factor[[i, i]].ln();
    }
    2.0f64 * result
}

impl CovarianceFactor {
    ///Factorizes a symmetric positive-definite covariance matrix.
    ///Fails with [`FastMvError::NotPositiveDefinite`] if a diagonal
    ///pivot of the factorization comes out non-positive.
    pub fn from_covariance(covariance : ArrayView2<f64>) -> Result<CovarianceFactor> {
        check_square(&covariance, "covariance")?;
        let factor = covariance.cholesky(UPLO::Upper).map_err(|_| {
            error!("Covariance matrix could not be factorized");
            FastMvError::NotPositiveDefinite
        })?;
        let log_det = log_det_from_factor(&factor);
        Ok(CovarianceFactor {
            factor,
            log_det
        })
    }

    ///Accepts a pre-computed upper-triangular factor verbatim.
    ///
    ///Only the shape is checked. Whether the matrix actually is an
    ///upper-triangular factor of a positive-definite covariance is
    ///taken on trust from the caller; a malformed factor silently
    ///yields garbage downstream. This is the documented fast path for
    ///callers which factorize once and re-use the factor across calls.
    pub fn from_cholesky(factor : ArrayView2<f64>) -> Result<CovarianceFactor> {
        check_square(&factor, "cholesky factor")?;
        let factor = factor.to_owned();
        let log_det = log_det_from_factor(&factor);
        Ok(CovarianceFactor {
            factor,
            log_det
        })
    }

    pub fn from_spec(spec : &CovarianceSpec) -> Result<CovarianceFactor> {
        match (spec) {
            CovarianceSpec::Raw(mat) => CovarianceFactor::from_covariance(mat.clone()),
            CovarianceSpec::CholeskyFactor(mat) => CovarianceFactor::from_cholesky(mat.clone())
        }
    }

    pub fn dim(&self) -> usize {
        self.factor.shape()[0]
    }
}
