use thiserror::Error;

///Errors surfaced by the batch operations. Every input is validated
///before any parallel work is dispatched, so a returned error always
///means no partial output was produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FastMvError {
    ///Cholesky factorization hit a non-positive diagonal pivot,
    ///so the supplied covariance was not positive-definite.
    #[error("covariance matrix is not positive-definite")]
    NotPositiveDefinite,

    ///The dimensions of the batch, the mean and/or the covariance
    ///disagree with each other.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    ///A scalar parameter is outside its valid range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    ///A caller-supplied output buffer has the wrong shape.
    #[error("output buffer has shape {actual:?}, expected {expected:?}")]
    BufferSize {
        expected : (usize, usize),
        actual : (usize, usize)
    }
}

pub type Result<T> = std::result::Result<T, FastMvError>;
