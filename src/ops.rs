//! Generic programming over binary element-wise operators.
//!
//! Each operator is a type that cannot be instantiated and that implements
//! [`Binary`]. It can be passed as a type parameter to generic code, e.g.
//! [`View::binary()`] and [`Array::binary()`].
//!
//! [`View::binary()`]: super::View::binary()
//! [`Array::binary()`]: super::Array::binary()

use super::{Scalar};

/// A function that combines `T` with `U`.
///
/// This trait has no methods that take `self`. It makes sense to implement it
/// for types that cannot be instantiated, such as empty enumerations.
pub trait Binary<T, U> {
    type Output: Clone;

    fn call(t: T, u: U) -> Self::Output;
}

// ----------------------------------------------------------------------------

/// An implementation of [`Binary`] that constructs a pair.
pub enum Pair {}

impl<T: Clone, U: Clone> Binary<T, U> for Pair {
    type Output = (T, U);
    #[inline(always)]
    fn call(t: T, u: U) -> Self::Output { (t, u) }
}

// ----------------------------------------------------------------------------

pub enum Add {}

impl<T: Scalar> Binary<T, T> for Add {
    type Output = T;
    #[inline(always)]
    fn call(t: T, u: T) -> Self::Output { t + u }
}

// ----------------------------------------------------------------------------

pub enum Mul {}

impl<T: Scalar> Binary<T, T> for Mul {
    type Output = T;
    #[inline(always)]
    fn call(t: T, u: T) -> Self::Output { t * u }
}

// ----------------------------------------------------------------------------

pub enum Max {}

impl<T: Scalar> Binary<T, T> for Max {
    type Output = T;
    #[inline(always)]
    fn call(t: T, u: T) -> Self::Output { t.max_of(u) }
}
