use super::{Error, Result, Shape, Index};

/// A rectangular, possibly strided, range of [`Index`]es.
///
/// Dimension `d` covers `lower[d], lower[d] + step[d], ...` up to but not
/// including `upper[d]`. If any dimension covers nothing, the whole `Domain`
/// is empty. That is not an error.
///
/// A `Domain` is `Copy` and holds no iteration state, so it can be iterated
/// any number of times.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub struct Domain<const N: usize> {
    lower: Index<N>,
    upper: Index<N>,
    step: [usize; N],
}

impl<const N: usize> Domain<N> {
    /// Constructs a `Domain` with unit step.
    ///
    /// Fails if `lower[d] > upper[d]` for any `d`.
    pub fn new(lower: Index<N>, upper: Index<N>) -> Result<Self> {
        Self::with_step(lower, upper, [1; N])
    }

    /// Constructs a `Domain` stepping by `step[d]` in each dimension `d`.
    pub fn with_step(lower: Index<N>, upper: Index<N>, step: [usize; N]) -> Result<Self> {
        for d in 0..N {
            if lower[d] > upper[d] {
                return Err(Error::InvalidDomain {dim: d, lower: lower[d], upper: upper[d]});
            }
            if step[d] == 0 { return Err(Error::InvalidStride {dim: d}); }
        }
        Ok(Self {lower, upper, step})
    }

    /// Constructs a `Domain` from run-time sequences, which must all have
    /// length `N`. `step` may be empty, meaning unit step.
    pub fn try_new(lower: &[usize], upper: &[usize], step: &[usize]) -> Result<Self> {
        if lower.len() != upper.len() {
            return Err(Error::shape_mismatch(lower, upper));
        }
        let lower = Shape::<N>::try_from(lower)?.0;
        let upper = Shape::<N>::try_from(upper)?.0;
        let step = if step.is_empty() { [1; N] } else { Shape::<N>::try_from(step)?.0 };
        Self::with_step(lower, upper, step)
    }

    /// The `Domain` of all valid indices into an array of shape `shape`.
    pub fn of(shape: Shape<N>) -> Self {
        Self {lower: [0; N], upper: shape.0, step: [1; N]}
    }

    pub fn lower(&self) -> Index<N> { self.lower }

    pub fn upper(&self) -> Index<N> { self.upper }

    pub fn step(&self) -> [usize; N] { self.step }

    /// The number of indices covered in each dimension.
    pub fn counts(&self) -> Shape<N> {
        let mut counts = [0; N];
        for d in 0..N {
            let span = self.upper[d] - self.lower[d];
            counts[d] = if span == 0 { 0 } else { (span - 1) / self.step[d] + 1 };
        }
        Shape(counts)
    }

    /// The total number of indices, i.e. the product of `counts()`.
    pub fn len(&self) -> usize { self.counts().len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Returns `true` if iterating `self` would yield `index`.
    pub fn contains(&self, index: Index<N>) -> bool {
        (0..N).all(|d| {
            self.lower[d] <= index[d] && index[d] < self.upper[d]
                && (index[d] - self.lower[d]) % self.step[d] == 0
        })
    }

    /// Map a position in `counts()` to the `Index` it stands for.
    pub fn at(&self, position: Index<N>) -> Index<N> {
        let mut index = [0; N];
        for d in 0..N { index[d] = self.lower[d] + position[d] * self.step[d]; }
        index
    }

    /// Call `f` on every `Index` in row-major order.
    pub fn each(&self, mut f: impl FnMut(Index<N>)) {
        self.counts().each(|p| f(self.at(p)));
    }

    /// Iterate over every `Index` in row-major order.
    pub fn iter(&self) -> DomainIter<N> {
        DomainIter {domain: *self, counts: self.counts(), next: 0, end: self.len()}
    }
}

impl<const N: usize> IntoIterator for Domain<N> {
    type Item = Index<N>;
    type IntoIter = DomainIter<N>;
    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

impl<const N: usize> IntoIterator for &Domain<N> {
    type Item = Index<N>;
    type IntoIter = DomainIter<N>;
    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

impl<const N: usize> From<Shape<N>> for Domain<N> {
    fn from(shape: Shape<N>) -> Self { Self::of(shape) }
}

// ----------------------------------------------------------------------------

/// The return type of [`Domain::iter()`].
#[derive(Debug, Clone)]
pub struct DomainIter<const N: usize> {
    domain: Domain<N>,
    counts: Shape<N>,
    next: usize,
    end: usize,
}

impl<const N: usize> Iterator for DomainIter<N> {
    type Item = Index<N>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end { return None; }
        let position = self.counts.from_offset(self.next);
        self.next += 1;
        Some(self.domain.at(position))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.end - self.next;
        (n, Some(n))
    }
}

impl<const N: usize> DoubleEndedIterator for DomainIter<N> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.next >= self.end { return None; }
        self.end -= 1;
        Some(self.domain.at(self.counts.from_offset(self.end)))
    }
}

impl<const N: usize> ExactSizeIterator for DomainIter<N> {}

impl<const N: usize> std::iter::FusedIterator for DomainIter<N> {}

// ----------------------------------------------------------------------------
