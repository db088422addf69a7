extern crate ndarray;
extern crate ndarray_linalg;

use ndarray::*;

use rand::prelude::*;
use rand_distr::StandardNormal;
use rand_distr::ChiSquared;

use crate::errors::*;
use crate::covariance::*;
use crate::parallel::*;
use crate::rng::*;

///Fills one output row with mean + R^T z, where z holds standard
///normal draws pre-scaled by the t adjustment when applicable.
///The affine map is a triangular multiply, O(d^2) per row.
fn affine_row(chol : &CovarianceFactor, mean : ArrayView1<f64>,
              z : &[f64], mut out_row : ArrayViewMut1<f64>) {
    let R = &chol.factor;
    let d = z.len();
    for j in 0..d {
        //R^T is lower-triangular, so row j of it touches z[0..=j]
        let mut elem = mean[[j,]];
        for i in 0..(j + 1) {
            elem += R[[i, j]] * z[i];
        }
        out_row[[j,]] = elem;
    }
}

fn sample_impl(mean : ArrayView1<f64>, chol : &CovarianceFactor,
               chi : Option<ChiSquared<f64>>, df : Option<f64>,
               base_seed : u64, num_workers : usize,
               out : ArrayViewMut2<f64>) {
    let d = chol.dim();
    run_row_blocks(out, num_workers, |worker, _, mut block| {
        let mut rng = stream_rng(base_seed, worker);
        let mut z = vec![0.0f64; d];
        for i in 0..block.shape()[0] {
            for j in 0..d {
                z[j] = rng.sample(StandardNormal);
            }
            if let (Option::Some(chi), Option::Some(v)) = (chi, df) {
                //Student's-t: rescale the normal block by sqrt(df / s)
                //with s a chi-squared draw
                let s : f64 = chi.sample(&mut rng);
                let scale = (v / s).sqrt();
                for j in 0..d {
                    z[j] *= scale;
                }
            }
            affine_row(chol, mean.clone(), &z, block.row_mut(i));
        }
    });
}

fn validate_and_factor(n : usize, mean : ArrayView1<f64>, sigma : &CovarianceSpec,
                       num_workers : usize) -> Result<(CovarianceFactor, usize)> {
    let num_workers = resolve_workers(num_workers, n)?;
    let chol = CovarianceFactor::from_spec(sigma)?;
    check_batch_dims(mean.shape()[0], mean.shape()[0], chol.dim())?;
    Ok((chol, num_workers))
}

fn chi_squared_for(df : f64) -> Result<ChiSquared<f64>> {
    if (!(df > 0.0f64) || !df.is_finite()) {
        return Err(FastMvError::InvalidParameter(
                   format!("degrees of freedom must be positive and finite, got {}", df)));
    }
    ChiSquared::new(df).map_err(|_|
        FastMvError::InvalidParameter(
            format!("degrees of freedom {} rejected by chi-squared sampler", df)))
}

fn check_buffer(n : usize, d : usize, out : &ArrayViewMut2<f64>) -> Result<()> {
    if (out.shape()[0] != n || out.shape()[1] != d) {
        return Err(FastMvError::BufferSize {
            expected : (n, d),
            actual : (out.shape()[0], out.shape()[1])
        });
    }
    Ok(())
}

///Draws n samples from the multivariate normal with the given mean and
///covariance (or factor), returning a freshly-allocated n x d batch.
///Each worker draws from its own stream keyed on (base_seed, worker),
///so the same seed and worker count reproduce the batch exactly.
pub fn sample_mvn(n : usize, mean : ArrayView1<f64>, sigma : &CovarianceSpec,
                  base_seed : u64, num_workers : usize) -> Result<Array2<f64>> {
    let (chol, num_workers) = validate_and_factor(n, mean.clone(), sigma, num_workers)?;
    let mut out = Array::zeros((n, chol.dim()));
    sample_impl(mean, &chol, Option::None, Option::None,
                base_seed, num_workers, out.view_mut());
    Ok(out)
}

///Write-through variant of [`sample_mvn`]: fills the caller-supplied
///n x d buffer in place and allocates nothing. The buffer shape is
///checked before any work happens.
pub fn sample_mvn_into(n : usize, mean : ArrayView1<f64>, sigma : &CovarianceSpec,
                       base_seed : u64, num_workers : usize,
                       out : ArrayViewMut2<f64>) -> Result<()> {
    let (chol, num_workers) = validate_and_factor(n, mean.clone(), sigma, num_workers)?;
    check_buffer(n, chol.dim(), &out)?;
    sample_impl(mean, &chol, Option::None, Option::None,
                base_seed, num_workers, out);
    Ok(())
}

///Draws n samples from the multivariate Student's-t with df degrees of
///freedom: a standard normal block rescaled by sqrt(df/s) for a
///chi-squared s, then pushed through the same affine map as the
///normal sampler.
pub fn sample_mvt(n : usize, mean : ArrayView1<f64>, sigma : &CovarianceSpec,
                  df : f64, base_seed : u64,
                  num_workers : usize) -> Result<Array2<f64>> {
    let chi = chi_squared_for(df)?;
    let (chol, num_workers) = validate_and_factor(n, mean.clone(), sigma, num_workers)?;
    let mut out = Array::zeros((n, chol.dim()));
    sample_impl(mean, &chol, Option::Some(chi), Option::Some(df),
                base_seed, num_workers, out.view_mut());
    Ok(out)
}

///Write-through variant of [`sample_mvt`].
pub fn sample_mvt_into(n : usize, mean : ArrayView1<f64>, sigma : &CovarianceSpec,
                       df : f64, base_seed : u64, num_workers : usize,
                       out : ArrayViewMut2<f64>) -> Result<()> {
    let chi = chi_squared_for(df)?;
    let (chol, num_workers) = validate_and_factor(n, mean.clone(), sigma, num_workers)?;
    check_buffer(n, chol.dim(), &out)?;
    sample_impl(mean, &chol, Option::Some(chi), Option::Some(df),
                base_seed, num_workers, out);
    Ok(())
}
