//! Bound inference for sliding-window operations such as convolution and
//! pooling.
//!
//! A [`Window`] of rank `W` slides over the trailing `W` dimensions of an
//! input of rank `N >= W`. The leading `N - W` dimensions (e.g. batch and
//! channel) pass through unchanged. Along each windowed dimension `d`:
//!
//! ```text
//! output[d] = (input[d] - window[d]) / stride[d] + 1
//! ```
//!
//! Every shape-dependent check happens in [`Window::output_shape()`], before
//! any element is read. Afterwards, [`Window::source_index()`] is in bounds
//! for every output index and every index of [`Window::inner_domain()`].

use super::{Error, Result, Shape, Index, Domain};

/// The extent and stride of a sliding window of rank `W`.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub struct Window<const W: usize> {
    extent: [usize; W],
    stride: [usize; W],
}

impl<const W: usize> Window<W> {
    /// A window with unit stride.
    pub fn new(extent: [usize; W]) -> Self {
        Self {extent, stride: [1; W]}
    }

    /// A window moving `stride[d]` elements at a time along dimension `d`.
    ///
    /// Fails with [`Error::InvalidStride`] if any stride is zero.
    pub fn with_stride(extent: [usize; W], stride: [usize; W]) -> Result<Self> {
        if let Some(d) = stride.iter().position(|&s| s == 0) {
            return Err(Error::InvalidStride {dim: d});
        }
        Ok(Self {extent, stride})
    }

    /// Non-overlapping `size`-by-`size` (etc.) tiles, as used by pooling.
    pub fn pool(size: usize) -> Result<Self> { Self::with_stride([size; W], [size; W]) }

    pub fn extent(&self) -> [usize; W] { self.extent }

    pub fn stride(&self) -> [usize; W] { self.stride }

    /// The indices of one window, i.e. `0 <= inner[d] < extent[d]`.
    pub fn inner_domain(&self) -> Domain<W> { Domain::of(Shape(self.extent)) }

    /// The shape of the output when sliding over `input`.
    ///
    /// Fails with [`Error::RankMismatch`] if `W > N`, and with
    /// [`Error::InvalidWindow`] if the window is larger than the input along
    /// any windowed dimension.
    ///
    /// ```
    /// use comprehension::{Window, Shape};
    /// let w = Window::with_stride([3, 3], [2, 1]).unwrap();
    /// assert_eq!(w.output_shape(Shape([1, 8, 7, 5])).unwrap(), Shape([1, 8, 3, 3]));
    /// assert!(w.output_shape(Shape([1, 8, 2, 5])).is_err());
    /// ```
    pub fn output_shape<const N: usize>(&self, input: Shape<N>) -> Result<Shape<N>> {
        if W > N { return Err(Error::RankMismatch {expected: N, actual: W}); }
        let mut output = input.0;
        for w in 0..W {
            let d = N - W + w;
            if self.extent[w] > input.0[d] {
                log::debug!("window {:?} does not fit input {:?} in dimension {}", self.extent, input, d);
                return Err(Error::InvalidWindow {dim: d, input: input.0[d], window: self.extent[w]});
            }
            output[d] = (input.0[d] - self.extent[w]) / self.stride[w] + 1;
        }
        Ok(Shape(output))
    }

    /// The domain of valid output indices when sliding over `input`.
    pub fn output_domain<const N: usize>(&self, input: Shape<N>) -> Result<Domain<N>> {
        Ok(Domain::of(self.output_shape(input)?))
    }

    /// The input index read at offset `inner` within the window placed at
    /// `output`.
    ///
    /// Leading (non-windowed) coordinates are copied from `output`.
    pub fn source_index<const N: usize>(&self, output: Index<N>, inner: Index<W>) -> Index<N> {
        let mut source = output;
        for w in 0..W {
            let d = N - W + w;
            source[d] = output[d] * self.stride[w] + inner[w];
        }
        source
    }
}

// ----------------------------------------------------------------------------
