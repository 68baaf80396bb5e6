//! A pure-Rust engine for building multi-dimensional arrays by array
//! comprehension.
//!
//! [`Array<N, T>`] is a dense, immutable array of `T` with rank `N`. Its
//! [`Shape<N>`] is fixed at construction. Every transformation produces a new
//! `Array`.
//!
//! The engine has one central operation: evaluate an expression at every
//! [`Index`] of an output [`Domain`], optionally reducing over an inner
//! `Domain` with an associative, commutative [`Reduction`] ([`Sum`] or
//! [`Max`]). This is [`Evaluator::map()`] and [`Evaluator::reduce_map()`].
//! Sliding-window operations use [`Window`] to infer the output shape so
//! that every access stays in bounds, and indirect indexing uses
//! [`gather()`], which validates each coordinate as it is read.
//!
//! The kernels in [`kernels`] (matrix-vector product, convolutions, pooling,
//! matrix multiplications, embeddings) are written entirely in terms of these
//! operations:
//!
//! ```
//! use comprehension::{Array, Shape, Domain, Sum, reduce_map};
//! let a = Array::new(Shape([2, 3]), [1, 2, 3, 4, 5, 6]).unwrap();
//! let x = Array::new(Shape([3]), [1, 1, 1]).unwrap();
//! let y = reduce_map::<Sum, _, 1, 1, _>(
//!     Shape([2]),
//!     Domain::of(Shape([3])),
//!     |[i], [k]| Ok(a[[i, k]] * x[[k]]),
//! ).unwrap();
//! assert_eq!(y.as_ref(), [6, 15]);
//! ```
//!
//! Failures are reported as an [`Error`]; nothing is clamped, broadcast or
//! retried.
//!
//! With the default `parallel` feature, large comprehensions are evaluated on
//! the `rayon` thread pool. See [`EvalConfig`].

mod error;
pub use error::{Error, Result};

mod shape;
pub use shape::{Shape, Index};

mod domain;
pub use domain::{Domain, DomainIter};

mod scalar;
pub use scalar::{Scalar, Coordinate};

pub mod ops;

mod reduce;
pub use reduce::{Reduction, Sum, Max, reduce};

pub mod view;
pub use view::{View, fn_view};

mod array;
pub use array::{Array};

mod comprehend;
pub use comprehend::{EvalConfig, Evaluator, map, reduce_map};

mod window;
pub use window::{Window};

mod gather;
pub use gather::{gather, lookup, resolve};

pub mod kernels;
