use std::ops::{Deref};

use super::{Result, Shape, Index, Array, ops::{Binary, Pair}};

/// Implemented by types that behave like an array of `Self::T`s of rank `N`,
/// but whose elements are computed on demand.
///
/// Unlike [`Iterator`], `View`s are immutable; getting values using
/// [`View::at()`] does not mutate the `View`. You are encouraged to use
/// `View`s compositionally, and to [`collect()`] the results into an
/// [`Array`] only at the end of a chain of operations.
///
/// ### Ownership
///
/// If `V` implements `View`, then so do `&V`, `Box<V>`, `Rc<V>` and all other
/// types that [`Deref`] to `V`. This means that the `View` structures you can
/// build are agnostic about the ownership of the data they access.
///
/// ```
/// use comprehension::{View, Shape, fn_view};
/// let v = std::rc::Rc::new(fn_view(Shape([5]), |[i]| i * i));
/// assert_eq!(v.collect().as_ref(), [0, 1, 4, 9, 16]);
/// ```
///
/// [`collect()`]: View::collect()
pub trait View<const N: usize>: Sized {
    /// The element type.
    type T: Clone;

    /// The shape of the array.
    fn shape(&self) -> Shape<N>;

    /// The number of elements in `Self`.
    fn len(&self) -> usize { self.shape().len() }

    /// Compute the element at `index`.
    ///
    /// `index` must be valid for `self.shape()`. If it is not, this may
    /// panic or return a meaningless value. See [`get()`] for a checked
    /// alternative.
    ///
    /// [`get()`]: View::get()
    fn at(&self, index: Index<N>) -> Self::T;

    /// Compute the element at `index`, or fail with
    /// [`Error::IndexOutOfBounds`].
    ///
    /// [`Error::IndexOutOfBounds`]: super::Error::IndexOutOfBounds
    fn get(&self, index: Index<N>) -> Result<Self::T> {
        self.shape().check(index)?;
        Ok(self.at(index))
    }

    /// Apply `f` to every element of this `View` in row-major order.
    fn each(&self, mut f: impl FnMut(Self::T)) {
        self.shape().each(|i| f(self.at(i)));
    }

    /// Materialises this `View` into an [`Array`].
    ///
    /// This method guarantees to call [`self.at()`] exactly once for each
    /// index.
    ///
    /// [`self.at()`]: Self::at()
    fn collect(&self) -> Array<N, Self::T> {
        Array::from_fn(self.shape(), |i| self.at(i))
    }

    /// Creates a `View` such that `at(i)` returns `(i, self.at(i))`.
    fn enumerate(self) -> Enumerate<Self> { Enumerate(self) }

    /// Creates a `View` that applies `f` to the elements of `Self`.
    ///
    /// There is no guarantee that the elements will be passed to `f` in a
    /// particular order, only once, or at all.
    ///
    /// ```
    /// use comprehension::{View, Shape, fn_view};
    /// let a = fn_view(Shape([5]), |[i]| i).map(|x| x * x).collect();
    /// assert_eq!(a.as_ref(), [0, 1, 4, 9, 16]);
    /// ```
    fn map<U: Clone, F: Fn(Self::T) -> U>(self, f: F) -> Map<Self, F> { Map(self, f) }

    /// Creates a `View` of pairs. Fails unless `other` has exactly the same
    /// shape as `self`.
    fn zip<V: View<N>>(self, other: V) -> Result<Zip<Self, V, Pair>> {
        self.binary(other)
    }

    /// Creates a `View` that combines corresponding elements of `self` and
    /// `other` using `B`.
    ///
    /// There is no broadcasting: fails with [`Error::ShapeMismatch`] unless
    /// `other` has exactly the same shape as `self`.
    ///
    /// ```
    /// use comprehension::{View, Shape, fn_view, ops};
    /// let a = fn_view(Shape([3]), |[i]| i as f32);
    /// let b = fn_view(Shape([3]), |[i]| 10.0 * i as f32);
    /// let c = a.binary::<_, ops::Add>(b).unwrap().collect();
    /// assert_eq!(c.as_ref(), [0.0, 11.0, 22.0]);
    /// let d = fn_view(Shape([4]), |[i]| i as f32);
    /// assert!(fn_view(Shape([3]), |[i]| i as f32).binary::<_, ops::Add>(d).is_err());
    /// ```
    ///
    /// [`Error::ShapeMismatch`]: super::Error::ShapeMismatch
    fn binary<V: View<N>, B: Binary<Self::T, V::T>>(self, other: V) -> Result<Zip<Self, V, B>> {
        self.shape().check_same(&other.shape())?;
        Ok(Zip(self, other, std::marker::PhantomData))
    }
}

impl<const N: usize, V: View<N>, P: Deref<Target=V>> View<N> for P {
    type T = V::T;
    #[inline(always)]
    fn shape(&self) -> Shape<N> { V::shape(self) }
    #[inline(always)]
    fn at(&self, index: Index<N>) -> Self::T { V::at(self, index) }
}

// ----------------------------------------------------------------------------

/// The return type of [`fn_view()`].
#[derive(Debug, Copy, Clone)]
pub struct FnView<const N: usize, F>(Shape<N>, F);

impl<const N: usize, T: Clone, F: Fn(Index<N>) -> T> View<N> for FnView<N, F> {
    type T = T;
    fn shape(&self) -> Shape<N> { self.0 }
    fn at(&self, index: Index<N>) -> Self::T { self.1(index) }
}

/// Returns a [`View`] of shape `shape` whose element at `index` is
/// `f(index)`.
///
/// Consider also [`Array::from_fn()`], which computes every element once and
/// stores it.
pub fn fn_view<const N: usize, T: Clone, F: Fn(Index<N>) -> T>(shape: Shape<N>, f: F) -> FnView<N, F> {
    FnView(shape, f)
}

// ----------------------------------------------------------------------------

/// The return type of [`View::enumerate()`].
#[derive(Debug, Copy, Clone)]
pub struct Enumerate<V>(V);

impl<const N: usize, V: View<N>> View<N> for Enumerate<V> {
    type T = (Index<N>, V::T);
    fn shape(&self) -> Shape<N> { self.0.shape() }
    fn at(&self, index: Index<N>) -> Self::T { (index, self.0.at(index)) }
}

// ----------------------------------------------------------------------------

/// The return type of [`View::map()`].
#[derive(Debug, Copy, Clone)]
pub struct Map<V, F>(V, F);

impl<const N: usize, V: View<N>, U: Clone, F: Fn(V::T) -> U> View<N> for Map<V, F> {
    type T = U;
    fn shape(&self) -> Shape<N> { self.0.shape() }
    fn at(&self, index: Index<N>) -> Self::T { self.1(self.0.at(index)) }
}

// ----------------------------------------------------------------------------

/// The return type of [`View::zip()`] and [`View::binary()`].
#[derive(Debug, Copy, Clone)]
pub struct Zip<V, W, B>(V, W, std::marker::PhantomData<B>);

impl<const N: usize, V: View<N>, W: View<N>, B: Binary<V::T, W::T>> View<N> for Zip<V, W, B> {
    type T = B::Output;
    fn shape(&self) -> Shape<N> { self.0.shape() }
    fn at(&self, index: Index<N>) -> Self::T { B::call(self.0.at(index), self.1.at(index)) }
}

// ----------------------------------------------------------------------------
