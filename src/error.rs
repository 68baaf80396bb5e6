//! The failure type shared by every operation in this crate.
//!
//! All conditions are detected at the point the offending operation is
//! requested, and none of them is retried: identical arguments always fail in
//! the same way.

/// Why an operation could not produce an array.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("shape mismatch: {left:?} is not compatible with {right:?}")]
    ShapeMismatch { left: Vec<usize>, right: Vec<usize> },

    #[error("rank mismatch: expected {expected} dimensions, got {actual}")]
    RankMismatch { expected: usize, actual: usize },

    #[error("index {index:?} out of bounds for shape {shape:?}")]
    IndexOutOfBounds { index: Vec<i128>, shape: Vec<usize> },

    #[error("window of extent {window} exceeds input extent {input} in dimension {dim}")]
    InvalidWindow { dim: usize, input: usize, window: usize },

    #[error("zero stride in dimension {dim}")]
    InvalidStride { dim: usize },

    #[error("lower bound {lower} exceeds upper bound {upper} in dimension {dim}")]
    InvalidDomain { dim: usize, lower: usize, upper: usize },

    #[error("maximum of an empty domain")]
    EmptyReduction,
}

/// The `Result` type of this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn shape_mismatch(left: &[usize], right: &[usize]) -> Self {
        Error::ShapeMismatch { left: left.to_vec(), right: right.to_vec() }
    }

    pub(crate) fn out_of_bounds(index: &[usize], shape: &[usize]) -> Self {
        Error::IndexOutOfBounds {
            index: index.iter().map(|&i| i as i128).collect(),
            shape: shape.to_vec(),
        }
    }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let e = Error::shape_mismatch(&[2, 3], &[3, 2]);
        assert_eq!(e.to_string(), "shape mismatch: [2, 3] is not compatible with [3, 2]");
        let e = Error::out_of_bounds(&[4], &[4]);
        assert_eq!(e.to_string(), "index [4] out of bounds for shape [4]");
        let e = Error::InvalidWindow { dim: 1, input: 2, window: 3 };
        assert_eq!(e.to_string(), "window of extent 3 exceeds input extent 2 in dimension 1");
    }
}
