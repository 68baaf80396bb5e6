//! Indirect (gather) indexing.
//!
//! The position read from the source array is itself read from an array of
//! integers, so it can only be validated when it is known: every coordinate
//! is checked against the source shape at the moment it is resolved, and a
//! bad one fails with [`Error::IndexOutOfBounds`]. Nothing is clamped.

use super::{Error, Result, Shape, Index, Array, View, Coordinate, Evaluator};

/// Convert run-time coordinates into an [`Index`] that is valid for `shape`.
pub fn resolve<C: Coordinate, const N: usize>(shape: Shape<N>, coords: [C; N]) -> Result<Index<N>> {
    let mut index = [0; N];
    for d in 0..N {
        match coords[d].to_coordinate() {
            Some(i) if i < shape.0[d] => { index[d] = i; },
            _ => {
                return Err(Error::IndexOutOfBounds {
                    index: coords.iter().map(|c| c.to_report()).collect(),
                    shape: shape.0.to_vec(),
                });
            },
        }
    }
    Ok(index)
}

/// Returns `x.at(coords)`, or fails if `coords` is not a valid index.
pub fn lookup<V: View<N>, C: Coordinate, const N: usize>(x: &V, coords: [C; N]) -> Result<V::T> {
    Ok(x.at(resolve(x.shape(), coords)?))
}

impl Evaluator {
    /// Returns `z` with `z.shape() == indices.shape()` and
    /// `z[idx] == x[indices[idx]]`.
    ///
    /// ```
    /// use comprehension::{Evaluator, Array, Shape, Error};
    /// let x = Array::new(Shape([3]), [10.0, 20.0, 30.0]).unwrap();
    /// let i = Array::new(Shape([2, 2]), [2, 0, 1, 1]).unwrap();
    /// let z = Evaluator::default().gather(&x, &i).unwrap();
    /// assert_eq!(z.as_ref(), [30.0, 10.0, 20.0, 20.0]);
    /// let bad = Array::new(Shape([1]), [3]).unwrap();
    /// assert!(matches!(Evaluator::default().gather(&x, &bad), Err(Error::IndexOutOfBounds {..})));
    /// ```
    pub fn gather<T, C, const M: usize>(&self, x: &Array<1, T>, indices: &Array<M, C>) -> Result<Array<M, T>> where
        T: Clone + Send + Sync,
        C: Coordinate,
    {
        self.map(indices.shape(), |idx| lookup(x, [indices[idx]]))
    }

    /// Like [`gather()`], but each element of `indices` holds all `N`
    /// coordinates of an element of `x`.
    ///
    /// [`gather()`]: Self::gather()
    pub fn gather_nd<T, C, const N: usize, const M: usize>(
        &self,
        x: &Array<N, T>,
        indices: &Array<M, [C; N]>,
    ) -> Result<Array<M, T>> where
        T: Clone + Send + Sync,
        C: Coordinate,
    {
        self.map(indices.shape(), |idx| lookup(x, indices[idx]))
    }
}

/// [`Evaluator::gather()`] with the default configuration.
pub fn gather<T, C, const M: usize>(x: &Array<1, T>, indices: &Array<M, C>) -> Result<Array<M, T>> where
    T: Clone + Send + Sync,
    C: Coordinate,
{
    Evaluator::default().gather(x, indices)
}

// ----------------------------------------------------------------------------
