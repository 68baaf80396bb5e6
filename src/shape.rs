use std::fmt::{Debug};

use super::{Error, Result};

/// A coordinate into an array of rank `N`.
pub type Index<const N: usize> = [usize; N];

/// The extents of an array of rank `N`.
///
/// The rank is part of the type, so it cannot change after construction.
/// Every extent is a `usize`, so it is never negative. An extent of zero is
/// allowed, and makes the `Shape` empty.
///
/// Elements are laid out in row-major order: the last dimension varies
/// fastest.
#[derive(Copy, Clone, Hash, PartialEq, Eq)]
pub struct Shape<const N: usize>(pub [usize; N]);

impl<const N: usize> Shape<N> {
    pub const fn new(extents: [usize; N]) -> Self { Self(extents) }

    /// The number of dimensions.
    pub const fn rank(&self) -> usize { N }

    pub fn extents(&self) -> [usize; N] { self.0 }

    /// The extent of dimension `d`.
    pub fn extent(&self, d: usize) -> usize { self.0[d] }

    /// The number of elements, i.e. the product of the extents.
    ///
    /// The empty product is `1`, so a rank-0 `Shape` has one element.
    pub fn len(&self) -> usize { self.0.iter().product() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Returns `true` if `index` addresses an element of this `Shape`.
    pub fn contains(&self, index: Index<N>) -> bool {
        index.iter().zip(self.0.iter()).all(|(&i, &e)| i < e)
    }

    /// Returns an error unless `index` addresses an element of this `Shape`.
    pub fn check(&self, index: Index<N>) -> Result<()> {
        if self.contains(index) { Ok(()) } else { Err(Error::out_of_bounds(&index, &self.0)) }
    }

    /// Returns the position (in `0..len()`) of `index` in row-major order.
    ///
    /// Panics if `index` is not valid for this `Shape`.
    pub fn to_offset(&self, index: Index<N>) -> usize {
        let mut offset = 0;
        for d in 0..N {
            assert!(
                index[d] < self.0[d],
                "Index {:?} is out of bounds for shape {:?}", index, self.0,
            );
            offset = offset * self.0[d] + index[d];
        }
        offset
    }

    /// The inverse of `to_offset()`.
    pub fn from_offset(&self, mut offset: usize) -> Index<N> {
        let mut index = [0; N];
        for d in (0..N).rev() {
            let e = self.0[d];
            index[d] = offset % e;
            offset /= e;
        }
        index
    }

    /// Equivalent to, but more efficient than,
    /// ```text
    /// for i in 0..self.len() { f(self.from_offset(i)); }
    /// ```
    pub fn each(&self, mut f: impl FnMut(Index<N>)) {
        if self.is_empty() { return; }
        let mut index = [0; N];
        loop {
            f(index);
            let mut d = N;
            loop {
                if d == 0 { return; }
                d -= 1;
                index[d] += 1;
                if index[d] < self.0[d] { break; }
                index[d] = 0;
            }
        }
    }

    /// Returns an error unless `other` has exactly the same extents.
    pub fn check_same(&self, other: &Self) -> Result<()> {
        if self == other { Ok(()) } else { Err(Error::shape_mismatch(&self.0, &other.0)) }
    }
}

impl<const N: usize> Debug for Shape<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl<const N: usize> From<[usize; N]> for Shape<N> {
    fn from(extents: [usize; N]) -> Self { Self(extents) }
}

impl<const N: usize> TryFrom<&[usize]> for Shape<N> {
    type Error = Error;

    fn try_from(extents: &[usize]) -> Result<Self> {
        let extents: [usize; N] = extents.try_into().map_err(|_| Error::RankMismatch {
            expected: N,
            actual: extents.len(),
        })?;
        Ok(Self(extents))
    }
}

impl<const N: usize> AsRef<[usize]> for Shape<N> {
    fn as_ref(&self) -> &[usize] { &self.0 }
}

// ----------------------------------------------------------------------------
