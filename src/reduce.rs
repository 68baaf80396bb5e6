//! Associative, commutative reductions.
//!
//! A [`Reduction`] collapses all the values computed over an inner
//! [`Domain`] into one. Because the combining operator is associative and
//! commutative, the order in which values are combined does not affect the
//! result (up to floating-point rounding), and partial results from disjoint
//! sub-ranges may be combined in any order.

use super::{Error, Result, Scalar, Domain, Index, ops};

/// A reduction operator on `T`.
///
/// Like the operators in [`ops`], implementations are types that cannot be
/// instantiated.
pub trait Reduction<T: Scalar>: Send + Sync {
    /// The identity element, if there is one.
    ///
    /// Reducing an empty domain returns this, or fails with
    /// [`Error::EmptyReduction`] if it is `None`.
    fn identity() -> Option<T>;

    /// Combine two partial results.
    fn combine(a: T, b: T) -> T;

    /// Combine zero or more partial results.
    fn fold(values: impl IntoIterator<Item=T>) -> Result<T> {
        let mut values = values.into_iter();
        let first = match Self::identity() {
            Some(zero) => zero,
            None => values.next().ok_or(Error::EmptyReduction)?,
        };
        Ok(values.fold(first, Self::combine))
    }
}

/// Addition, with identity `0`.
pub enum Sum {}

impl<T: Scalar> Reduction<T> for Sum {
    fn identity() -> Option<T> { Some(T::zero()) }
    #[inline(always)]
    fn combine(a: T, b: T) -> T { <ops::Add as ops::Binary<T, T>>::call(a, b) }
}

/// Maximum, with no identity.
///
/// "The maximum of nothing" has no natural numeric answer, so reducing an
/// empty domain fails with [`Error::EmptyReduction`]. A NaN anywhere in the
/// domain makes the result NaN.
pub enum Max {}

impl<T: Scalar> Reduction<T> for Max {
    fn identity() -> Option<T> { None }
    #[inline(always)]
    fn combine(a: T, b: T) -> T { <ops::Max as ops::Binary<T, T>>::call(a, b) }
}

// ----------------------------------------------------------------------------

/// Reduce the values `f(index)` for every `index` in `domain` using `R`.
///
/// Stops at the first error returned by `f`.
///
/// ```
/// use comprehension::{Domain, reduce, Sum, Max, Error};
/// let d = Domain::new([0, 0], [2, 3]).unwrap();
/// assert_eq!(reduce::<Sum, _, 2>(d, |[i, j]| Ok(i * 3 + j)), Ok(15));
/// assert_eq!(reduce::<Max, _, 2>(d, |[i, j]| Ok(i * 3 + j)), Ok(5));
/// let e = Domain::new([0], [0]).unwrap();
/// assert_eq!(reduce::<Sum, f32, 1>(e, |_| Ok(1.0)), Ok(0.0));
/// assert_eq!(reduce::<Max, f32, 1>(e, |_| Ok(1.0)), Err(Error::EmptyReduction));
/// ```
pub fn reduce<R: Reduction<T>, T: Scalar, const N: usize>(
    domain: Domain<N>,
    mut f: impl FnMut(Index<N>) -> Result<T>,
) -> Result<T> {
    let mut acc = R::identity();
    for index in domain.iter() {
        let value = f(index)?;
        acc = Some(match acc {
            Some(a) => R::combine(a, value),
            None => value,
        });
    }
    acc.ok_or(Error::EmptyReduction)
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold() {
        assert_eq!(<Sum as Reduction<i32>>::fold([1, 2, 3]), Ok(6));
        assert_eq!(<Max as Reduction<i32>>::fold([1, 5, 3]), Ok(5));
        assert_eq!(<Sum as Reduction<f64>>::fold([]), Ok(0.0));
        assert_eq!(<Max as Reduction<f64>>::fold([]), Err(Error::EmptyReduction));
    }

    #[test]
    fn max_of_negatives() {
        let d = Domain::new([0], [4]).unwrap();
        assert_eq!(reduce::<Max, _, 1>(d, |[i]| Ok(-(i as f32) - 1.0)), Ok(-1.0));
    }

    #[test]
    fn max_propagates_nan_wherever_it_is() {
        let d = Domain::new([0], [4]).unwrap();
        for nan_at in 0..4 {
            let r = reduce::<Max, f64, 1>(d, |[i]| Ok(if i == nan_at { f64::NAN } else { i as f64 }));
            assert!(r.unwrap().is_nan());
        }
    }

    #[test]
    fn propagates_errors() {
        let d = Domain::new([0], [4]).unwrap();
        let r = reduce::<Sum, i32, 1>(d, |[i]| {
            if i == 2 { Err(Error::out_of_bounds(&[i], &[2])) } else { Ok(1) }
        });
        assert!(matches!(r, Err(Error::IndexOutOfBounds {..})));
    }
}
