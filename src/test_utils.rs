extern crate ndarray;
extern crate ndarray_linalg;

use ndarray::*;
use ndarray_linalg::*;
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::StandardNormal;

use crate::params::*;

pub fn random_matrix(t : usize, s : usize) -> Array2<f64> {
    Array::random((t, s), StandardNormal)
}

pub fn random_vector(t : usize) -> Array1<f64> {
    Array::random((t,), StandardNormal)
}

///A random symmetric positive-definite matrix with smallest eigenvalue
///at least 1, so factorizations in tests never sit near the boundary
pub fn random_spd_matrix(t : usize) -> Array2<f64> {
    let A = random_matrix(t, t);
    let mut result = A.t().dot(&A);
    for i in 0..t {
        result[[i, i]] += 1.0f64;
    }
    result
}

pub fn assert_equal_scalars_to_within(one : f64, two : f64, thresh : f64) {
    if ((one - two).abs() > thresh) {
        panic!("Expected {} to equal {} to within {}", one, two, thresh);
    }
}

pub fn assert_equal_scalars(one : f64, two : f64) {
    assert_equal_scalars_to_within(one, two, DEFAULT_TEST_THRESH);
}

pub fn assert_equal_vectors_to_within(one : &Array1<f64>, two : &Array1<f64>, thresh : f64) {
    let diff = one - two;
    let norm = diff.dot(&diff).sqrt();
    if (norm > thresh) {
        panic!("Expected {} to equal {} to within {}", one, two, thresh);
    }
}

pub fn assert_equal_vectors(one : &Array1<f64>, two : &Array1<f64>) {
    assert_equal_vectors_to_within(one, two, DEFAULT_TEST_THRESH);
}

pub fn assert_equal_matrices_to_within(one : &Array2<f64>, two : &Array2<f64>, thresh : f64) {
    let diff = one - two;
    let frob_norm = diff.opnorm_fro().unwrap();
    if (frob_norm > thresh) {
        panic!("Expected {} to equal {} to within {}", one, two, thresh);
    }
}

pub fn assert_equal_matrices(one : &Array2<f64>, two : &Array2<f64>) {
    assert_equal_matrices_to_within(one, two, DEFAULT_TEST_THRESH);
}
