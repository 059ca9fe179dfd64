#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! Tensors are plain row-major buffers with a compile-time number of dimensions. They are
//! the data structure exchanged with the pose-regression model: batched crops go in,
//! hypothesis tensors come out.
//!
//! ```rust
//! use objpose_tensor::Tensor;
//!
//! let t = Tensor::<f32, 2>::from_shape_vec([2, 3], vec![1., 2., 3., 4., 5., 6.]).unwrap();
//! assert_eq!(t.get([1, 2]), Some(&6.0));
//! assert_eq!(t.outer(1), &[4., 5., 6.]);
//! ```

/// Tensor data structure and its error type.
pub mod tensor;

pub use crate::tensor::{get_strides_from_shape, Tensor, TensorError};

/// Type alias for a 1-dimensional tensor.
pub type Tensor1<T> = Tensor<T, 1>;

/// Type alias for a 2-dimensional tensor.
pub type Tensor2<T> = Tensor<T, 2>;

/// Type alias for a 3-dimensional tensor.
pub type Tensor3<T> = Tensor<T, 3>;

/// Type alias for a 4-dimensional tensor.
pub type Tensor4<T> = Tensor<T, 4>;
