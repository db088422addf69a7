extern crate ndarray;
extern crate ndarray_linalg;

use ndarray::*;

use crate::errors::*;
use crate::batch_input::*;
use crate::covariance::*;
use crate::density::*;
use crate::parallel::*;

///One component of a finite mixture: a mean paired with a covariance
///or its pre-computed factor. Component weights travel separately as a
///parallel sequence and need not be normalized.
pub struct MixtureComponent<'a> {
    pub mean : ArrayView1<'a, f64>,
    pub sigma : CovarianceSpec<'a>
}

fn validate_weights(weights : &[f64], num_components : usize) -> Result<f64> {
    if (weights.len() != num_components) {
        return Err(FastMvError::DimensionMismatch(
                   format!("{} mixture components but {} weights",
                           num_components, weights.len())));
    }
    let mut total = 0.0f64;
    for &w in weights.iter() {
        if (!w.is_finite() || w < 0.0f64) {
            return Err(FastMvError::InvalidParameter(
                       format!("mixture weights must be finite and non-negative, got {}", w)));
        }
        total += w;
    }
    if (!(total > 0.0f64)) {
        return Err(FastMvError::InvalidParameter(
                   "mixture weights must not all be zero".to_string()));
    }
    Ok(total)
}

fn mixture_density_impl(x : &BatchInput, components : &[MixtureComponent],
                        weights : &[f64], df : Option<f64>, log_scale : bool,
                        num_workers : usize) -> Result<Array1<f64>> {
    if (components.is_empty()) {
        return Err(FastMvError::InvalidParameter(
                   "mixture must have at least one component".to_string()));
    }
    let total_weight = validate_weights(weights, components.len())?;
    let n = x.num_points();
    let num_workers = resolve_workers(num_workers, n)?;

    //Factorize and dimension-check every component up front, so that
    //no work at all happens on a batch with any malformed component
    let mut chols = Vec::with_capacity(components.len());
    for component in components.iter() {
        let chol = CovarianceFactor::from_spec(&component.sigma)?;
        check_batch_dims(x.dim(), component.mean.shape()[0], chol.dim())?;
        chols.push(chol);
    }

    let x_mat = x.as_matrix();
    let num_components = components.len();
    let mut per_component = Array::zeros((n, num_components));
    for k in 0..num_components {
        let log_density = log_density_batch(x_mat.clone(), components[k].mean.clone(),
                                            &chols[k], df, num_workers);
        let log_weight = weights[k].ln();
        let mut column = per_component.column_mut(k);
        for i in 0..n {
            column[[i,]] = log_weight + log_density[[i,]];
        }
    }

    //Combine the K weighted log-densities of each row by log-sum-exp,
    //then normalize by the total weight
    let log_total_weight = total_weight.ln();
    let mut out = Array::zeros((n,));
    for i in 0..n {
        let row = per_component.row(i);
        let mut row_max = f64::NEG_INFINITY;
        for k in 0..num_components {
            row_max = row_max.max(row[[k,]]);
        }
        let mut exp_sum = 0.0f64;
        for k in 0..num_components {
            exp_sum += (row[[k,]] - row_max).exp();
        }
        out[[i,]] = row_max + exp_sum.ln() - log_total_weight;
    }

    if (!log_scale) {
        out.mapv_inplace(|v| v.exp());
    }
    Ok(out)
}

///Density of a finite mixture of multivariate normals at every row of
///x. Weights are normalized by their sum; the per-row combination of
///component densities is done in the log domain by log-sum-exp.
pub fn mvn_mixture_density(x : &BatchInput, components : &[MixtureComponent],
                           weights : &[f64], log_scale : bool,
                           num_workers : usize) -> Result<Array1<f64>> {
    mixture_density_impl(x, components, weights, Option::None, log_scale, num_workers)
}

///Density of a finite mixture of multivariate Student's-t components
///sharing one df value.
pub fn mvt_mixture_density(x : &BatchInput, components : &[MixtureComponent],
                           weights : &[f64], df : f64, log_scale : bool,
                           num_workers : usize) -> Result<Array1<f64>> {
    if (!(df > 0.0f64) || !df.is_finite()) {
        return Err(FastMvError::InvalidParameter(
                   format!("degrees of freedom must be positive and finite, got {}", df)));
    }
    mixture_density_impl(x, components, weights, Option::Some(df), log_scale, num_workers)
}
