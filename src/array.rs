use super::{Error, Result, Scalar, Shape, Index, View, ops::{self, Binary}};

/// A dense, immutable array of `T`s of rank `N`.
///
/// Operations never modify an `Array` in place; they return a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct Array<const N: usize, T> {
    shape: Shape<N>,
    items: Box<[T]>,
}

impl<const N: usize, T> Array<N, T> {
    pub(crate) fn new_inner(shape: Shape<N>, items: Box<[T]>) -> Self {
        debug_assert_eq!(shape.len(), items.len());
        Self {shape, items}
    }

    /// Constructs an `Array` of shape `shape` given its elements in row-major
    /// order.
    ///
    /// Fails with [`Error::ShapeMismatch`] if the number of elements is
    /// wrong.
    ///
    /// ```
    /// use comprehension::{Array, Shape};
    /// let a = Array::new(Shape([2, 2]), [1.0, 2.0, 3.0, 4.0]).unwrap();
    /// assert_eq!(a[[1, 0]], 3.0);
    /// assert!(Array::new(Shape([2, 2]), [1.0, 2.0, 3.0]).is_err());
    /// ```
    pub fn new(shape: impl Into<Shape<N>>, items: impl Into<Box<[T]>>) -> Result<Self> {
        let shape = shape.into();
        let items = items.into();
        if shape.len() != items.len() {
            return Err(Error::shape_mismatch(&shape.0, &[items.len()]));
        }
        Ok(Self::new_inner(shape, items))
    }

    /// Constructs an `Array` of shape `shape` by calling `f` once at every
    /// index, in row-major order.
    ///
    /// ```
    /// use comprehension::{Array, Shape};
    /// let a = Array::from_fn(Shape([10]), |[x]| x % 3 == 0);
    /// assert_eq!(a.as_ref(), [true, false, false, true, false, false, true, false, false, true]);
    /// ```
    pub fn from_fn(shape: impl Into<Shape<N>>, mut f: impl FnMut(Index<N>) -> T) -> Self {
        let shape = shape.into();
        let mut items = Vec::with_capacity(shape.len());
        shape.each(|i| items.push(f(i)));
        Self::new_inner(shape, items.into())
    }

    /// Like [`from_fn()`] but `f` may fail. There is no partially-filled
    /// result: the first error is returned.
    ///
    /// [`from_fn()`]: Self::from_fn()
    pub fn try_from_fn(
        shape: impl Into<Shape<N>>,
        mut f: impl FnMut(Index<N>) -> Result<T>,
    ) -> Result<Self> {
        let shape = shape.into();
        let mut items = Vec::with_capacity(shape.len());
        for i in super::Domain::of(shape) { items.push(f(i)?); }
        Ok(Self::new_inner(shape, items.into()))
    }

    pub fn shape(&self) -> Shape<N> { self.shape }

    /// Returns the raw array elements.
    pub fn to_raw(self) -> Box<[T]> { self.items }

    /// Returns a reference to the element at `index`, or fails with
    /// [`Error::IndexOutOfBounds`].
    pub fn get_ref(&self, index: Index<N>) -> Result<&T> {
        self.shape.check(index)?;
        Ok(&self.items[self.shape.to_offset(index)])
    }

    /// Apply `f` to every element, in row-major order, returning a new
    /// `Array` of the same shape.
    ///
    /// This consumes `self`. For a lazy alternative that borrows, call
    /// [`View::map()`] on `&self`.
    ///
    /// ```
    /// use comprehension::{Array, Shape};
    /// let a = Array::new(Shape([2, 2]), [1, 2, 3, 4]).unwrap();
    /// let b = a.map(|x| x as f64 / 2.0);
    /// assert_eq!(b.as_ref(), [0.5, 1.0, 1.5, 2.0]);
    /// ```
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Array<N, U> {
        let items: Vec<U> = self.items.into_vec().into_iter().map(f).collect();
        Array::new_inner(self.shape, items.into())
    }

    /// Combine corresponding elements of `self` and `other` using `f`, in
    /// row-major order.
    ///
    /// Fails with [`Error::ShapeMismatch`] unless the shapes are identical.
    ///
    /// ```
    /// use comprehension::{Array, Shape};
    /// let a = Array::new(Shape([3]), [1, 2, 3]).unwrap();
    /// let b = Array::new(Shape([3]), [true, false, true]).unwrap();
    /// let c = a.zip_with(&b, |&x, &keep| if keep { x } else { 0 }).unwrap();
    /// assert_eq!(c.as_ref(), [1, 0, 3]);
    /// ```
    pub fn zip_with<U, V>(
        &self,
        other: &Array<N, U>,
        mut f: impl FnMut(&T, &U) -> V,
    ) -> Result<Array<N, V>> {
        self.shape.check_same(&other.shape)?;
        let items: Vec<V> = self.items.iter().zip(other.items.iter()).map(|(t, u)| f(t, u)).collect();
        Ok(Array::new_inner(self.shape, items.into()))
    }
}

impl<T> Array<0, T> {
    /// An `Array` holding the single element `t`.
    pub fn scalar(t: T) -> Self { Self::new_inner(Shape([]), vec![t].into()) }
}

impl<const N: usize, T: Clone> Array<N, T> {
    /// Fix the leading `P` coordinates and return the remaining rank-`M`
    /// sub-array as a new `Array`.
    ///
    /// Fails with [`Error::RankMismatch`] unless `P + M == N`, and with
    /// [`Error::IndexOutOfBounds`] if `prefix` is out of bounds.
    ///
    /// ```
    /// use comprehension::{Array, Shape};
    /// let a = Array::from_fn(Shape([2, 3]), |[i, j]| 10 * i + j);
    /// let row = a.slice::<1, 1>([1]).unwrap();
    /// assert_eq!(row.shape(), Shape([3]));
    /// assert_eq!(row.as_ref(), [10, 11, 12]);
    /// ```
    pub fn slice<const P: usize, const M: usize>(&self, prefix: [usize; P]) -> Result<Array<M, T>> {
        if P > N { return Err(Error::RankMismatch {expected: N, actual: P}); }
        if P + M != N { return Err(Error::RankMismatch {expected: N - P, actual: M}); }
        for d in 0..P {
            if prefix[d] >= self.shape.0[d] {
                return Err(Error::out_of_bounds(&prefix, &self.shape.0[..P]));
            }
        }
        let mut sub = [0; M];
        sub.copy_from_slice(&self.shape.0[P..]);
        let sub = Shape(sub);
        let start = (0..P).fold(0, |acc, d| acc * self.shape.0[d] + prefix[d]) * sub.len();
        let items = self.items[start..start + sub.len()].to_vec();
        Ok(Array::new_inner(sub, items.into()))
    }

    /// Combine corresponding elements of `self` and `other` using `B`.
    ///
    /// Fails with [`Error::ShapeMismatch`] unless the shapes are identical.
    pub fn binary<U: Clone, B: Binary<T, U>>(&self, other: &Array<N, U>) -> Result<Array<N, B::Output>> {
        Ok(View::binary::<_, B>(self, other)?.collect())
    }
}

impl<const N: usize, T: Scalar> Array<N, T> {
    /// Element-wise sum.
    pub fn add(&self, other: &Self) -> Result<Self> { self.binary::<T, ops::Add>(other) }

    /// Element-wise product.
    pub fn mul(&self, other: &Self) -> Result<Self> { self.binary::<T, ops::Mul>(other) }

    /// Element-wise maximum.
    pub fn max(&self, other: &Self) -> Result<Self> { self.binary::<T, ops::Max>(other) }
}

impl<const N: usize, T> AsRef<[T]> for Array<N, T> {
    fn as_ref(&self) -> &[T] { &self.items }
}

impl<const N: usize, T> std::ops::Index<Index<N>> for Array<N, T> {
    type Output = T;

    /// Panics if `index` is out of bounds. See [`Array::get_ref()`] for a
    /// checked alternative.
    fn index(&self, index: Index<N>) -> &T { &self.items[self.shape.to_offset(index)] }
}

impl<const N: usize, T: Clone> View<N> for Array<N, T> {
    type T = T;
    #[inline(always)]
    fn shape(&self) -> Shape<N> { self.shape }
    #[inline(always)]
    fn len(&self) -> usize { self.items.len() }
    #[inline(always)]
    fn at(&self, index: Index<N>) -> T { self[index].clone() }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn count(shape: [usize; 3]) -> Array<3, i32> {
        let mut n = 0;
        Array::from_fn(Shape(shape), |_| { n += 1; n - 1 })
    }

    #[test]
    fn from_fn_is_faithful() {
        let a = Array::from_fn(Shape([2, 3]), |[i, j]| (i, j));
        Shape([2, 3]).each(|i| assert_eq!(a[i], (i[0], i[1])));
        assert_eq!(a.len(), 6);
    }

    #[test]
    fn new_checks_length() {
        assert_eq!(
            Array::<2, i32>::new(Shape([2, 2]), vec![1, 2, 3]),
            Err(Error::ShapeMismatch {left: vec![2, 2], right: vec![3]}),
        );
    }

    #[test]
    fn try_from_fn_stops_at_first_error() {
        let mut calls = 0;
        let r = Array::try_from_fn(Shape([4]), |[i]| {
            calls += 1;
            if i == 1 { Err(Error::EmptyReduction) } else { Ok(i) }
        });
        assert_eq!(r, Err(Error::EmptyReduction));
        assert_eq!(calls, 2);
    }

    #[test]
    fn get() {
        let a = count([2, 3, 4]);
        assert_eq!(a.get([1, 2, 3]), Ok(23));
        assert_eq!(a.get_ref([0, 1, 0]), Ok(&4));
        assert_eq!(
            a.get([0, 3, 0]),
            Err(Error::IndexOutOfBounds {index: vec![0, 3, 0], shape: vec![2, 3, 4]}),
        );
    }

    #[test]
    fn slice() {
        let a = count([2, 3, 4]);
        let plane = a.slice::<1, 2>([1]).unwrap();
        assert_eq!(plane.shape(), Shape([3, 4]));
        assert_eq!(plane[[0, 0]], 12);
        let row = a.slice::<2, 1>([1, 2]).unwrap();
        assert_eq!(row.as_ref(), [20, 21, 22, 23]);
        let elem = a.slice::<3, 0>([1, 2, 3]).unwrap();
        assert_eq!(elem.as_ref(), [23]);
        let whole = a.slice::<0, 3>([]).unwrap();
        assert_eq!(whole, a);
        assert_eq!(a.slice::<4, 0>([0; 4]), Err(Error::RankMismatch {expected: 3, actual: 4}));
        assert_eq!(a.slice::<1, 1>([0]), Err(Error::RankMismatch {expected: 2, actual: 1}));
        assert!(matches!(a.slice::<1, 2>([2]), Err(Error::IndexOutOfBounds {..})));
    }

    #[test]
    fn slice_does_not_alias() {
        let a = count([2, 2, 1]);
        let s = a.slice::<1, 2>([0]).unwrap();
        let doubled = s.map(|x| 2 * x);
        assert_eq!(doubled.shape(), Shape([2, 1]));
        assert_eq!(doubled.as_ref(), [0, 2]);
        assert_eq!(a.as_ref(), [0, 1, 2, 3]);
    }

    #[test]
    fn map_is_eager() {
        let a = count([1, 2, 3]);
        let b = a.clone().map(|x| x as f64 * 0.5);
        assert_eq!(b.shape(), a.shape());
        assert_eq!(b[[0, 1, 2]], 2.5);
        let lazy = (&a).map(|x| x + 1).collect();
        assert_eq!(lazy.as_ref(), [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn zip_with() {
        let a = Array::new(Shape([2, 2]), [1, 2, 3, 4]).unwrap();
        let b = Array::from_fn(Shape([2, 2]), |[i, j]| i == j);
        let c = a.zip_with(&b, |&x, &diag| if diag { x * 10 } else { x }).unwrap();
        assert_eq!(c.as_ref(), [10, 2, 3, 40]);
        let d = Array::new(Shape([4, 1]), [1, 2, 3, 4]).unwrap();
        let e = Array::new(Shape([1, 4]), [1, 2, 3, 4]).unwrap();
        assert_eq!(
            d.zip_with(&e, |x, y| x + y),
            Err(Error::ShapeMismatch {left: vec![4, 1], right: vec![1, 4]}),
        );
        assert_eq!(a.as_ref(), [1, 2, 3, 4]);
    }

    #[test]
    fn elementwise() {
        let a = Array::new(Shape([2]), [1.0, -2.0]).unwrap();
        let b = Array::new(Shape([2]), [3.0, -4.0]).unwrap();
        assert_eq!(a.add(&b).unwrap().as_ref(), [4.0, -6.0]);
        assert_eq!(a.mul(&b).unwrap().as_ref(), [3.0, 8.0]);
        assert_eq!(a.max(&b).unwrap().as_ref(), [3.0, -2.0]);
        let c = Array::new(Shape([1, 2]), [3.0, 4.0]).unwrap();
        let d = Array::new(Shape([2, 1]), [3.0, 4.0]).unwrap();
        assert!(matches!(c.add(&d), Err(Error::ShapeMismatch {..})));
    }

    #[test]
    fn scalar() {
        let s = Array::scalar(2.5);
        assert_eq!(s.shape().len(), 1);
        assert_eq!(s.as_ref(), [2.5]);
    }
}
