extern crate ndarray;

use ndarray::*;

///A batch of query points for the row-wise operations.
///A single length-d vector is accepted, but the caller has to say so
///explicitly by picking the [`BatchInput::Single`] variant -- there is
///no runtime shape-sniffing to guess what a borrowed array means.
pub enum BatchInput<'a> {
    ///An n x d matrix, one point per row.
    Matrix(ArrayView2<'a, f64>),
    ///A single length-d point, treated as a 1 x d batch.
    Single(ArrayView1<'a, f64>)
}

impl <'a> BatchInput<'a> {
    ///View of this input as an n x d matrix.
    pub fn as_matrix(&self) -> ArrayView2<'a, f64> {
        match (self) {
            BatchInput::Matrix(mat) => mat.clone(),
            BatchInput::Single(vec) => vec.clone().insert_axis(Axis(0))
        }
    }

    pub fn num_points(&self) -> usize {
        match (self) {
            BatchInput::Matrix(mat) => mat.shape()[0],
            BatchInput::Single(_) => 1
        }
    }

    pub fn dim(&self) -> usize {
        match (self) {
            BatchInput::Matrix(mat) => mat.shape()[1],
            BatchInput::Single(vec) => vec.shape()[0]
        }
    }
}
