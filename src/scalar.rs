//! Traits for the element types of arrays.

use std::cmp::{Ordering};
use std::fmt::{Debug};
use std::ops::{Add, Mul};

use num_traits::{One, ToPrimitive, Zero};

/// A numeric array element: anything that can be added, multiplied and
/// compared, and that can be shared between threads.
///
/// Implemented automatically, e.g. for `f32`, `f64`, `i32` and `i64`.
pub trait Scalar:
    'static + Debug + Copy + Send + Sync + PartialOrd
    + Zero + One + Add<Output=Self> + Mul<Output=Self>
{
    /// The larger of `self` and `other`.
    ///
    /// If the two are unordered (e.g. one is NaN) this returns whichever is
    /// unordered with itself, so a NaN wins from either side.
    #[inline(always)]
    fn max_of(self, other: Self) -> Self {
        match self.partial_cmp(&other) {
            Some(Ordering::Less) => other,
            Some(_) => self,
            None => if other.partial_cmp(&other).is_some() { self } else { other },
        }
    }
}

impl<T> Scalar for T where
    T: 'static + Debug + Copy + Send + Sync + PartialOrd
        + Zero + One + Add<Output=T> + Mul<Output=T>,
{}

// ----------------------------------------------------------------------------

/// An integer array element that can be used as a coordinate into another
/// array, as in [`gather()`].
///
/// [`gather()`]: super::gather()
pub trait Coordinate: 'static + Debug + Copy + Send + Sync + ToPrimitive {
    /// Returns `None` if `self` is negative or too large for a `usize`.
    fn to_coordinate(self) -> Option<usize> { self.to_usize() }

    /// `self` as an `i128`, used only for error reports.
    fn to_report(self) -> i128 { self.to_i128().unwrap_or(i128::MAX) }
}

macro_rules! impl_coordinate {
    ($($t:ty),*) => { $(impl Coordinate for $t {})* };
}

impl_coordinate!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

// ----------------------------------------------------------------------------
