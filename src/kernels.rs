//! Array-processing kernels, each written as a client of the
//! [`Evaluator`].
//!
//! A kernel checks that its operands conform, declares its output shape
//! (using [`Window`] bound inference where it slides a window), and then
//! evaluates one or more comprehensions. Kernels that start from a base value
//! (a bias, or `beta * C`) build the base with a pointwise map and combine it
//! with the reduction using [`Evaluator::zip_map()`]; nothing is accumulated
//! in place.

use super::{Error, Result, Scalar, Shape, Domain, Array, Coordinate, Evaluator, Window, Sum, Max};
use super::gather::{resolve};

/// Fails with [`Error::ShapeMismatch`] unless `left_extent == right_extent`.
fn conform(left_extent: usize, right_extent: usize, left: &[usize], right: &[usize]) -> Result<()> {
    if left_extent == right_extent { Ok(()) } else { Err(Error::shape_mismatch(left, right)) }
}

impl Evaluator {
    /// Matrix-vector product: `y[i] = sum_k a[i, k] * x[k]`.
    ///
    /// ```
    /// use comprehension::{Evaluator, Array, Shape};
    /// let a = Array::new(Shape([2, 3]), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    /// let x = Array::new(Shape([3]), [1.0, 1.0, 1.0]).unwrap();
    /// assert_eq!(Evaluator::default().matvec(&a, &x).unwrap().as_ref(), [6.0, 15.0]);
    /// ```
    pub fn matvec<T: Scalar>(&self, a: &Array<2, T>, x: &Array<1, T>) -> Result<Array<1, T>> {
        let Shape([m, k]) = a.shape();
        conform(k, x.shape().0[0], a.shape().as_ref(), x.shape().as_ref())?;
        self.reduce_map::<Sum, T, 1, 1, _>(
            Shape([m]),
            Domain::of(Shape([k])),
            |[i], [k]| Ok(a[[i, k]] * x[[k]]),
        )
    }

    /// General matrix multiply: `alpha * a . b + beta * c`.
    ///
    /// `a` is `[n, m]`, `b` is `[m, k]` and `c` is `[n, k]`.
    pub fn gemm<T: Scalar>(
        &self,
        alpha: T,
        beta: T,
        a: &Array<2, T>,
        b: &Array<2, T>,
        c: &Array<2, T>,
    ) -> Result<Array<2, T>> {
        let Shape([n, m]) = a.shape();
        let Shape([bm, k]) = b.shape();
        conform(m, bm, a.shape().as_ref(), b.shape().as_ref())?;
        c.shape().check_same(&Shape([n, k]))?;
        let scaled = self.map(c.shape(), |index| Ok(beta * c[index]))?;
        self.zip_map::<Sum, T, 2, 1, _, _, _>(
            &scaled,
            Domain::of(Shape([m])),
            |[i, j], [l]| Ok(alpha * a[[i, l]] * b[[l, j]]),
            |base, sum| base + sum,
        )
    }

    /// Fully-connected layer followed by ReLU:
    /// `max(sum_i input[b, i] * weight[o, i] + bias[o], 0)`.
    pub fn fully_connected_relu<T: Scalar>(
        &self,
        input: &Array<2, T>,
        weight: &Array<2, T>,
        bias: &Array<1, T>,
    ) -> Result<Array<2, T>> {
        let Shape([batch, i]) = input.shape();
        let Shape([o, wi]) = weight.shape();
        conform(i, wi, input.shape().as_ref(), weight.shape().as_ref())?;
        conform(o, bias.shape().0[0], weight.shape().as_ref(), bias.shape().as_ref())?;
        let base = self.map(Shape([batch, o]), |[_, o]| Ok(bias[[o]]))?;
        let dense = self.zip_map::<Sum, T, 2, 1, _, _, _>(
            &base,
            Domain::of(Shape([i])),
            |[b, o], [i]| Ok(input[[b, i]] * weight[[o, i]]),
            |base, sum| base + sum,
        )?;
        self.map(dense.shape(), |index| Ok(dense[index].max_of(T::zero())))
    }

    /// 2-D convolution with unit stride and no padding.
    ///
    /// `input` is `[batch, in_channels, h, w]` and `weight` is
    /// `[out_channels, in_channels, kh, kw]`. The result is
    /// `[batch, out_channels, h - kh + 1, w - kw + 1]`.
    pub fn conv2d<T: Scalar>(&self, input: &Array<4, T>, weight: &Array<4, T>) -> Result<Array<4, T>> {
        let Shape([_, ip, _, _]) = input.shape();
        let Shape([op, wip, kh, kw]) = weight.shape();
        conform(ip, wip, input.shape().as_ref(), weight.shape().as_ref())?;
        let window = Window::new([kh, kw]);
        let mut output = window.output_shape(input.shape())?;
        output.0[1] = op;
        self.reduce_map::<Sum, T, 4, 3, _>(
            output,
            Domain::of(Shape([ip, kh, kw])),
            |[b, o, y, x], [c, ky, kx]| {
                let source = window.source_index([b, c, y, x], [ky, kx]);
                Ok(input[source] * weight[[o, c, ky, kx]])
            },
        )
    }

    /// 2x2 max pooling with stride 2. `[b, c, h, w]` becomes
    /// `[b, c, h / 2, w / 2]`.
    pub fn max_pool_2x2<T: Scalar>(&self, input: &Array<4, T>) -> Result<Array<4, T>> {
        let window = Window::<2>::pool(2)?;
        self.reduce_map::<Max, T, 4, 2, _>(
            window.output_shape(input.shape())?,
            window.inner_domain(),
            |index, inner| Ok(input[window.source_index(index, inner)]),
        )
    }

    /// Strided 2-D convolution plus bias.
    ///
    /// `input` is `[n, c, h, w]`, `weight` is `[f, c, kh, kw]` and `bias` is
    /// `[f]`. The result is `[n, f, (h - kh) / sh + 1, (w - kw) / sw + 1]`.
    pub fn strided_conv2d<T: Scalar>(
        &self,
        sh: usize,
        sw: usize,
        input: &Array<4, T>,
        weight: &Array<4, T>,
        bias: &Array<1, T>,
    ) -> Result<Array<4, T>> {
        let Shape([_, c, _, _]) = input.shape();
        let Shape([f, wc, kh, kw]) = weight.shape();
        conform(c, wc, input.shape().as_ref(), weight.shape().as_ref())?;
        conform(f, bias.shape().0[0], weight.shape().as_ref(), bias.shape().as_ref())?;
        let window = Window::with_stride([kh, kw], [sh, sw])?;
        let mut output = window.output_shape(input.shape())?;
        output.0[1] = f;
        let base = self.map(output, |[_, f, _, _]| Ok(bias[[f]]))?;
        self.zip_map::<Sum, T, 4, 3, _, _, _>(
            &base,
            Domain::of(Shape([c, kh, kw])),
            |[n, f, y, x], [c, ky, kx]| {
                let source = window.source_index([n, c, y, x], [ky, kx]);
                Ok(input[source] * weight[[f, c, ky, kx]])
            },
            |base, sum| base + sum,
        )
    }

    /// 1-D convolution (correlation): `out[i] = sum_n input[i + n] * kernel[n]`.
    ///
    /// ```
    /// use comprehension::{Evaluator, Array, Shape};
    /// let i = Array::new(Shape([3]), [4, 5, 6]).unwrap();
    /// let k = Array::new(Shape([3]), [1, 1, 1]).unwrap();
    /// assert_eq!(Evaluator::default().conv1d(&i, &k).unwrap().as_ref(), [15]);
    /// ```
    pub fn conv1d<T: Scalar>(&self, input: &Array<1, T>, kernel: &Array<1, T>) -> Result<Array<1, T>> {
        let window = Window::new(kernel.shape().0);
        self.reduce_map::<Sum, T, 1, 1, _>(
            window.output_shape(input.shape())?,
            window.inner_domain(),
            |index, inner| Ok(input[window.source_index(index, inner)] * kernel[inner]),
        )
    }

    /// Outer-product batched matmul:
    /// `out[p, s, q, t] = sum_r a[p, q, r] * b[s, r, t]`.
    pub fn outer_matmul<T: Scalar>(&self, a: &Array<3, T>, b: &Array<3, T>) -> Result<Array<4, T>> {
        let Shape([p, q, r]) = a.shape();
        let Shape([s, br, t]) = b.shape();
        conform(r, br, a.shape().as_ref(), b.shape().as_ref())?;
        self.reduce_map::<Sum, T, 4, 1, _>(
            Shape([p, s, q, t]),
            Domain::of(Shape([r])),
            |[p, s, q, t], [r]| Ok(a[[p, q, r]] * b[[s, r, t]]),
        )
    }

    /// Matmul with the second operand transposed:
    /// `out[i, j] = sum_k a[i, k] * b[j, k]`.
    pub fn matmul_transposed<T: Scalar>(&self, a: &Array<2, T>, b: &Array<2, T>) -> Result<Array<2, T>> {
        let Shape([m, k]) = a.shape();
        let Shape([n, bk]) = b.shape();
        conform(k, bk, a.shape().as_ref(), b.shape().as_ref())?;
        self.reduce_map::<Sum, T, 2, 1, _>(
            Shape([m, n]),
            Domain::of(Shape([k])),
            |[i, j], [k]| Ok(a[[i, k]] * b[[j, k]]),
        )
    }

    /// Batched matmul with the second operand transposed:
    /// `out[b, i, j] = sum_m x[b, i, m] * y[b, j, m]`.
    pub fn batch_matmul_transposed<T: Scalar>(&self, x: &Array<3, T>, y: &Array<3, T>) -> Result<Array<3, T>> {
        let Shape([b, n, m]) = x.shape();
        let Shape([yb, k, ym]) = y.shape();
        conform(b, yb, x.shape().as_ref(), y.shape().as_ref())?;
        conform(m, ym, x.shape().as_ref(), y.shape().as_ref())?;
        self.reduce_map::<Sum, T, 3, 1, _>(
            Shape([b, n, k]),
            Domain::of(Shape([m])),
            |[b, i, j], [l]| Ok(x[[b, i, l]] * y[[b, j, l]]),
        )
    }

    /// Grouped 2-D convolution with unit stride, scaled by a per-channel
    /// bias.
    ///
    /// `input` is `[n, g, c, h, w]`, `weight` is `[g, f, c, kh, kw]` and
    /// `bias` is `[g, f]`. The result is `[n, g, f, h - kh + 1, w - kw + 1]`
    /// where each output channel `(g, f)` is multiplied by `bias[g, f]`.
    pub fn grouped_conv2d<T: Scalar>(
        &self,
        input: &Array<5, T>,
        weight: &Array<5, T>,
        bias: &Array<2, T>,
    ) -> Result<Array<5, T>> {
        let Shape([_, g, c, _, _]) = input.shape();
        let Shape([wg, f, wc, kh, kw]) = weight.shape();
        conform(g, wg, input.shape().as_ref(), weight.shape().as_ref())?;
        conform(c, wc, input.shape().as_ref(), weight.shape().as_ref())?;
        bias.shape().check_same(&Shape([g, f]))?;
        let window = Window::new([kh, kw]);
        let mut output = window.output_shape(input.shape())?;
        output.0[2] = f;
        let base = self.map(output, |[_, g, f, _, _]| Ok(bias[[g, f]]))?;
        self.zip_map::<Sum, T, 5, 3, _, _, _>(
            &base,
            Domain::of(Shape([c, kh, kw])),
            |[n, g, f, y, x], [c, ky, kx]| {
                let source = window.source_index([n, g, c, y, x], [ky, kx]);
                Ok(input[source] * weight[[g, f, c, ky, kx]])
            },
            |scale, sum| scale * sum,
        )
    }

    /// Sum of embeddings: `out[b, d] = sum_l table[ids[b, l], d]`.
    ///
    /// Each id is validated against the number of rows of `table` when it is
    /// read.
    pub fn embedding_sum<T: Scalar, C: Coordinate>(
        &self,
        table: &Array<2, T>,
        ids: &Array<2, C>,
    ) -> Result<Array<2, T>> {
        let Shape([rows, d]) = table.shape();
        let Shape([b, l]) = ids.shape();
        self.reduce_map::<Sum, T, 2, 1, _>(
            Shape([b, d]),
            Domain::of(Shape([l])),
            |[b, d], [l]| {
                let [row] = resolve(Shape([rows]), [ids[[b, l]]])?;
                Ok(table[[row, d]])
            },
        )
    }

    /// Two independent embedding lookups, as used by a dual lookup-table
    /// layer. Returns `(embedding_sum(lut1, ids1), embedding_sum(lut2, ids2))`.
    pub fn dual_embedding<T: Scalar, C: Coordinate>(
        &self,
        lut1: &Array<2, T>,
        lut2: &Array<2, T>,
        ids1: &Array<2, C>,
        ids2: &Array<2, C>,
    ) -> Result<(Array<2, T>, Array<2, T>)> {
        Ok((self.embedding_sum(lut1, ids1)?, self.embedding_sum(lut2, ids2)?))
    }
}

// ----------------------------------------------------------------------------
