//! Fast batched operations on multivariate normal and Student's-t
//! distributions.
//!
//! The covariance matrix is Cholesky-factorized once per call
//! (see [`crate::covariance::CovarianceFactor`]) and the factor is then
//! re-used across every row of the batch: squared Mahalanobis distances
//! ([`crate::mahalanobis`]), normal and Student's-t (log-)densities
//! ([`crate::density`]), finite mixtures of those ([`crate::mixture`]),
//! simulation ([`crate::simulate`]) and mean-shift mode seeking
//! ([`crate::meanshift`]).
//!
//! Batches are split into contiguous per-worker row blocks
//! ([`crate::parallel`]) and each worker draws from its own
//! collision-free counter-based random stream ([`crate::rng`]),
//! so no mutable state is ever shared between workers.

#![allow(dead_code)]
#![allow(non_snake_case)]
#![allow(unused_imports)]
#![allow(unused_parens)]

#[macro_use] extern crate log;
pub mod errors;
pub mod params;
pub mod batch_input;
pub mod covariance;
pub mod parallel;
pub mod rng;
pub mod mahalanobis;
pub mod density;
pub mod mixture;
pub mod simulate;
pub mod meanshift;
pub mod test_utils;
