extern crate ndarray;
extern crate ndarray_linalg;

use ndarray::*;

use crate::errors::*;
use crate::covariance::*;
use crate::density::*;
use crate::parallel::*;

///Where a mean-shift run ended up. Running only ever occurs while the
///iteration is in flight; a returned result carries one of the two
///terminal states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeanShiftStatus {
    Running,
    ///The step between successive iterates dropped below the tolerance
    Converged,
    ///The iteration budget ran out first
    Exhausted
}

pub struct MeanShiftResult {
    pub point : Array1<f64>,
    pub status : MeanShiftStatus,
    ///Every iterate from the initial point onward, in order.
    ///Only materialized when the caller asked for it.
    pub trajectory : Option<Vec<Array1<f64>>>
}

///Mean-shift mode seeking: starting from y0, repeatedly recenters the
///query point at the Gaussian-kernel-weighted mean of the sample x,
///with the kernel shaped by the bandwidth matrix. The kernel weights
///of each iteration are the normal log-densities of the whole sample
///around the current iterate, evaluated across num_workers workers and
///exponentiated after subtracting their maximum so far-away queries
///cannot underflow every weight to zero.
pub fn mean_shift(y0 : ArrayView1<f64>, x : ArrayView2<f64>,
                  bandwidth : ArrayView2<f64>, num_workers : usize,
                  max_iters : usize, tol : f64,
                  record_trajectory : bool) -> Result<MeanShiftResult> {
    if (!(tol > 0.0f64) || !tol.is_finite()) {
        return Err(FastMvError::InvalidParameter(
                   format!("convergence tolerance must be positive and finite, got {}", tol)));
    }
    if (max_iters == 0) {
        return Err(FastMvError::InvalidParameter(
                   "iteration budget must be at least 1".to_string()));
    }
    let n = x.shape()[0];
    if (n == 0) {
        return Err(FastMvError::InvalidParameter(
                   "mean shift needs a non-empty sample".to_string()));
    }
    let num_workers = resolve_workers(num_workers, n)?;
    let chol = CovarianceFactor::from_covariance(bandwidth)?;
    check_batch_dims(x.shape()[1], y0.shape()[0], chol.dim())?;

    let d = chol.dim();
    let mut y = y0.to_owned();
    let mut trajectory = if (record_trajectory) {
        Option::Some(vec![y.clone()])
    } else {
        Option::None
    };

    let mut status = MeanShiftStatus::Running;
    let mut num_iters = 0;
    while (num_iters < max_iters) {
        let log_weights = log_density_batch(x.clone(), y.view(), &chol,
                                            Option::None, num_workers);
        let mut max_log_weight = f64::NEG_INFINITY;
        for i in 0..n {
            max_log_weight = max_log_weight.max(log_weights[[i,]]);
        }

        //Density-weighted average of the sample; the max-subtraction
        //pins the largest weight at 1, so the denominator is never 0
        let mut weight_sum = 0.0f64;
        let mut weighted = Array::zeros((d,));
        for i in 0..n {
            let weight = (log_weights[[i,]] - max_log_weight).exp();
            weight_sum += weight;
            weighted.scaled_add(weight, &x.row(i));
        }
        let next = weighted / weight_sum;

        let step = &next - &y;
        let step_norm = step.dot(&step).sqrt();
        y = next;
        num_iters += 1;
        if let Option::Some(trajectory) = trajectory.as_mut() {
            trajectory.push(y.clone());
        }
        if (step_norm < tol) {
            status = MeanShiftStatus::Converged;
            break;
        }
    }
    if (status == MeanShiftStatus::Running) {
        status = MeanShiftStatus::Exhausted;
    }
    debug!("Mean shift finished as {:?} after {} iterations", status, num_iters);

    Ok(MeanShiftResult {
        point : y,
        status,
        trajectory
    })
}
