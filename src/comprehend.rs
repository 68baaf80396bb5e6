//! The comprehension evaluator.
//!
//! Every kernel in this crate is a client of two operations:
//!
//! - [`Evaluator::map()`]: `output[idx] = f(idx)`.
//! - [`Evaluator::reduce_map()`]:
//!   `output[idx] = R::fold(g(idx, inner) for inner in inner_domain)`.
//!
//! Each output element is a pure function of its index, so the output domain
//! may be evaluated in parallel. Output positions are disjoint, and each is
//! written exactly once.

use super::{Result, Scalar, Shape, Index, Domain, Array, View, Reduction, reduce};

/// Settings for an [`Evaluator`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EvalConfig {
    /// Whether to evaluate large output domains on the `rayon` thread pool.
    ///
    /// Has no effect unless the `parallel` feature is enabled.
    pub parallel: bool,

    /// Output domains with fewer elements than this are evaluated on the
    /// calling thread.
    pub min_parallel_len: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {parallel: true, min_parallel_len: 4096}
    }
}

impl EvalConfig {
    /// A configuration that never evaluates in parallel.
    pub fn sequential() -> Self { Self {parallel: false, ..Self::default()} }

    pub fn with_parallel(self, parallel: bool) -> Self { Self {parallel, ..self} }

    pub fn with_min_parallel_len(self, min_parallel_len: usize) -> Self {
        Self {min_parallel_len, ..self}
    }
}

// ----------------------------------------------------------------------------

/// Evaluates comprehensions. An `Evaluator` holds only its [`EvalConfig`];
/// there is no state carried between calls.
#[derive(Debug, Default, Copy, Clone)]
pub struct Evaluator {
    config: EvalConfig,
}

impl Evaluator {
    pub fn new(config: EvalConfig) -> Self { Self {config} }

    pub fn config(&self) -> EvalConfig { self.config }

    fn use_parallel(&self, len: usize) -> bool {
        cfg!(feature = "parallel") && self.config.parallel && len >= self.config.min_parallel_len
    }

    /// Pointwise map: builds an `Array` of shape `shape` whose element at
    /// `idx` is `f(idx)`.
    ///
    /// `f` must be total over the domain: if it fails anywhere, this fails,
    /// and no array is produced.
    ///
    /// ```
    /// use comprehension::{Evaluator, Shape};
    /// let a = Evaluator::default().map(Shape([2, 2]), |[i, j]| Ok(i * 2 + j)).unwrap();
    /// assert_eq!(a.as_ref(), [0, 1, 2, 3]);
    /// ```
    pub fn map<const N: usize, T, F>(&self, shape: Shape<N>, f: F) -> Result<Array<N, T>> where
        T: Send,
        F: Fn(Index<N>) -> Result<T> + Sync,
    {
        let len = shape.len();
        let parallel = self.use_parallel(len);
        log::trace!("map over {:?} ({} elements, parallel: {})", shape, len, parallel);
        let items = if parallel {
            parallel_items(shape, &f)?
        } else {
            let mut items = Vec::with_capacity(len);
            for index in Domain::of(shape) { items.push(f(index)?); }
            items
        };
        Ok(Array::new_inner(shape, items.into()))
    }

    /// Reduced map: builds an `Array` of shape `shape` whose element at `idx`
    /// is the reduction using `R` of `g(idx, inner)` over every `inner` in
    /// `inner_domain`.
    ///
    /// An empty `inner_domain` gives `R`'s identity, or fails with
    /// [`Error::EmptyReduction`] if `R` has none. This is checked before any
    /// element is computed.
    ///
    /// ```
    /// use comprehension::{Evaluator, Shape, Domain, Sum};
    /// // Row sums of a 2x3 matrix.
    /// let m = |i: usize, k: usize| (i * 3 + k) as f32;
    /// let k = Domain::of(Shape([3]));
    /// let a = Evaluator::default()
    ///     .reduce_map::<Sum, _, 1, 1, _>(Shape([2]), k, |[i], [k]| Ok(m(i, k)))
    ///     .unwrap();
    /// assert_eq!(a.as_ref(), [3.0, 12.0]);
    /// ```
    ///
    /// [`Error::EmptyReduction`]: super::Error::EmptyReduction
    pub fn reduce_map<R, T, const N: usize, const K: usize, G>(
        &self,
        shape: Shape<N>,
        inner_domain: Domain<K>,
        g: G,
    ) -> Result<Array<N, T>> where
        R: Reduction<T>,
        T: Scalar,
        G: Fn(Index<N>, Index<K>) -> Result<T> + Sync,
    {
        log::trace!("reducing over {:?} ({} elements)", inner_domain, inner_domain.len());
        if inner_domain.is_empty() && !shape.is_empty() {
            <R as Reduction<T>>::fold(std::iter::empty())?;
        }
        self.map(shape, |index| reduce::<R, T, K>(inner_domain, |inner| g(index, inner)))
    }

    /// Combine each element of `base` with a reduction, i.e.
    /// `output[idx] = combine(base[idx], reduce(R, g(idx, inner)))`.
    ///
    /// This is how an initialization pass (e.g. `C <- beta * C`, or a bias) is
    /// composed with an accumulation pass without mutating anything.
    pub fn zip_map<R, T, const N: usize, const K: usize, V, G, C>(
        &self,
        base: &V,
        inner_domain: Domain<K>,
        g: G,
        combine: C,
    ) -> Result<Array<N, T>> where
        R: Reduction<T>,
        T: Scalar,
        V: View<N, T=T> + Sync,
        G: Fn(Index<N>, Index<K>) -> Result<T> + Sync,
        C: Fn(T, T) -> T + Sync,
    {
        let reduced = self.reduce_map::<R, T, N, K, G>(base.shape(), inner_domain, g)?;
        self.map(base.shape(), |index| Ok(combine(base.at(index), reduced.at(index))))
    }
}

#[cfg(feature = "parallel")]
fn parallel_items<const N: usize, T: Send, F>(shape: Shape<N>, f: &F) -> Result<Vec<T>> where
    F: Fn(Index<N>) -> Result<T> + Sync,
{
    use rayon::prelude::*;
    (0..shape.len()).into_par_iter().map(|offset| f(shape.from_offset(offset))).collect()
}

#[cfg(not(feature = "parallel"))]
fn parallel_items<const N: usize, T: Send, F>(_: Shape<N>, _: &F) -> Result<Vec<T>> where
    F: Fn(Index<N>) -> Result<T> + Sync,
{
    unreachable!("parallel evaluation requested without the `parallel` feature")
}

// ----------------------------------------------------------------------------

/// [`Evaluator::map()`] with the default configuration.
pub fn map<const N: usize, T: Send, F>(shape: Shape<N>, f: F) -> Result<Array<N, T>> where
    F: Fn(Index<N>) -> Result<T> + Sync,
{
    Evaluator::default().map(shape, f)
}

/// [`Evaluator::reduce_map()`] with the default configuration.
pub fn reduce_map<R: Reduction<T>, T: Scalar, const N: usize, const K: usize, G>(
    shape: Shape<N>,
    inner_domain: Domain<K>,
    g: G,
) -> Result<Array<N, T>> where
    G: Fn(Index<N>, Index<K>) -> Result<T> + Sync,
{
    Evaluator::default().reduce_map::<R, T, N, K, G>(shape, inner_domain, g)
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, Sum, Max};

    fn evaluators() -> [Evaluator; 2] {
        [
            Evaluator::new(EvalConfig::sequential()),
            Evaluator::new(EvalConfig::default().with_min_parallel_len(1)),
        ]
    }

    #[test]
    fn map_matches_from_fn() {
        for e in evaluators() {
            let a = e.map(Shape([3, 4, 5]), |[i, j, k]| Ok(i * 100 + j * 10 + k)).unwrap();
            let b = Array::from_fn(Shape([3, 4, 5]), |[i, j, k]| i * 100 + j * 10 + k);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn map_reports_failure() {
        for e in evaluators() {
            let r = e.map(Shape([8]), |[i]| if i == 5 { Err(Error::EmptyReduction) } else { Ok(i) });
            assert_eq!(r, Err(Error::EmptyReduction));
        }
    }

    #[test]
    fn reduce_map_empty_inner() {
        for e in evaluators() {
            let empty = Domain::new([0], [0]).unwrap();
            let s = e.reduce_map::<Sum, f32, 1, 1, _>(Shape([3]), empty, |_, _| Ok(1.0)).unwrap();
            assert_eq!(s.as_ref(), [0.0, 0.0, 0.0]);
            let m = e.reduce_map::<Max, f32, 1, 1, _>(Shape([3]), empty, |_, _| Ok(1.0));
            assert_eq!(m, Err(Error::EmptyReduction));
        }
    }

    #[test]
    fn reduce_map_max() {
        let inner = Domain::of(Shape([4]));
        let a = reduce_map::<Max, i32, 1, 1, _>(
            Shape([2]), inner, |[i], [k]| Ok(((k as i32) - 2 * (i as i32)) * if i == 0 { 1 } else { -1 }),
        ).unwrap();
        assert_eq!(a.as_ref(), [3, 2]);
    }

    #[test]
    fn zip_map_adds_base() {
        let base = Array::new(Shape([2]), [10.0, 20.0]).unwrap();
        let a = Evaluator::default().zip_map::<Sum, f64, 1, 1, _, _, _>(
            &base, Domain::of(Shape([3])), |[i], [k]| Ok((i + k) as f64), |b, s| b + s,
        ).unwrap();
        assert_eq!(a.as_ref(), [13.0, 26.0]);
    }

    #[test]
    fn config() {
        let c = EvalConfig::default().with_parallel(false).with_min_parallel_len(7);
        assert_eq!(c, EvalConfig {parallel: false, min_parallel_len: 7});
        assert_eq!(Evaluator::new(c).config(), c);
    }
}
