extern crate ndarray;

use ndarray::*;
use rayon::prelude::*;

use crate::errors::*;

///Splits n rows into num_workers contiguous blocks whose sizes differ
///by at most one. Block w is the half-open row range blocks[w].
///A worker count of zero is treated as one.
pub fn split_row_blocks(n : usize, num_workers : usize) -> Vec<(usize, usize)> {
    let num_workers = num_workers.max(1);
    let quot = n / num_workers;
    let rem = n % num_workers;
    let mut result = Vec::with_capacity(num_workers);
    let mut start = 0;
    for w in 0..num_workers {
        let size = if (w < rem) { quot + 1 } else { quot };
        result.push((start, start + size));
        start += size;
    }
    result
}

///Turns the requested worker count into the count actually used for a
///batch of n rows. A request of zero is an error. A request exceeding
///the available hardware parallelism silently degrades to sequential
///execution, and the count never exceeds the row count.
pub fn resolve_workers(requested : usize, n : usize) -> Result<usize> {
    if (requested == 0) {
        return Err(FastMvError::InvalidParameter(
                   "worker count must be at least 1".to_string()));
    }
    let mut num_workers = requested;
    if (num_workers > rayon::current_num_threads()) {
        num_workers = 1;
    }
    num_workers = num_workers.min(n).max(1);
    Ok(num_workers)
}

///Runs one task per worker over disjoint row blocks of the output.
///The task receives (worker index, first row of its block, mutable
///view of its block). All workers join before this returns.
pub(crate) fn run_row_blocks<'a, D, F>(out : ArrayViewMut<'a, f64, D>,
                                       num_workers : usize, task : F)
    where D : Dimension,
          F : Fn(usize, usize, ArrayViewMut<'a, f64, D>) + Sync + Send {
    let n = out.shape()[0];
    let blocks = split_row_blocks(n, num_workers);

    let mut views = Vec::with_capacity(blocks.len());
    let mut rest = out;
    for &(start, end) in blocks.iter() {
        let (head, tail) = rest.split_at(Axis(0), end - start);
        views.push((start, head));
        rest = tail;
    }

    views.into_par_iter()
         .enumerate()
         .for_each(|(worker, (start, block))| task(worker, start, block));
}
