use thiserror::Error;

/// An error type for tensor operations.
#[derive(Error, Debug, PartialEq)]
pub enum TensorError {
    /// Tensor shape does not match the provided data.
    #[error("Shape mismatch: expected {expected} elements for shape, but got {actual} elements in data")]
    InvalidShape {
        /// Expected number of elements based on shape
        expected: usize,
        /// Actual number of elements in the data
        actual: usize,
    },

    /// Index exceeds tensor bounds.
    #[error("Index {index} out of bounds for dimension of size {size}")]
    IndexOutOfBounds {
        /// The invalid index that was attempted
        index: usize,
        /// The size of the dimension being indexed
        size: usize,
    },

    /// Tensor dimensions incompatible for the requested operation.
    #[error("Dimension mismatch: {message}. Expected shape: {expected}, got: {actual}")]
    DimensionMismatch {
        /// Human-readable description of the mismatch
        message: String,
        /// Expected shape description
        expected: String,
        /// Actual shape description
        actual: String,
    },
}

impl TensorError {
    /// Creates an InvalidShape error.
    pub fn invalid_shape(expected: usize, actual: usize) -> Self {
        Self::InvalidShape { expected, actual }
    }

    /// Creates an IndexOutOfBounds error.
    pub fn index_out_of_bounds(index: usize, size: usize) -> Self {
        Self::IndexOutOfBounds { index, size }
    }

    /// Creates a DimensionMismatch error with formatted shapes.
    pub fn dimension_mismatch(
        message: impl Into<String>,
        expected: &[usize],
        actual: &[usize],
    ) -> Self {
        Self::DimensionMismatch {
            message: message.into(),
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        }
    }
}

/// Computes the strides for a row-major (C-contiguous) tensor layout.
///
/// # Examples
///
/// ```rust
/// use objpose_tensor::get_strides_from_shape;
///
/// assert_eq!(get_strides_from_shape([2, 3]), [3, 1]);
/// assert_eq!(get_strides_from_shape([2, 3, 4]), [12, 4, 1]);
/// ```
pub fn get_strides_from_shape<const N: usize>(shape: [usize; N]) -> [usize; N] {
    let mut strides: [usize; N] = [0; N];
    let mut stride = 1;
    for i in (0..shape.len()).rev() {
        strides[i] = stride;
        stride *= shape[i];
    }
    strides
}

/// A multi-dimensional array with owned, contiguous, row-major data.
///
/// # Type Parameters
///
/// * `T` - The element type stored in the tensor
/// * `N` - The number of dimensions
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor<T, const N: usize> {
    /// The storage of the tensor.
    pub storage: Vec<T>,
    /// The shape of the tensor.
    pub shape: [usize; N],
    /// The strides of the tensor data in memory.
    pub strides: [usize; N],
}

impl<T, const N: usize> Tensor<T, N> {
    /// Creates a new tensor with the given shape and data.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::InvalidShape`] if the number of elements in `data` does not
    /// match the product of the shape.
    pub fn from_shape_vec(shape: [usize; N], data: Vec<T>) -> Result<Self, TensorError> {
        let numel = shape.iter().product::<usize>();
        if numel != data.len() {
            return Err(TensorError::invalid_shape(numel, data.len()));
        }
        Ok(Self {
            storage: data,
            shape,
            strides: get_strides_from_shape(shape),
        })
    }

    /// Creates a new tensor filled with `value`.
    pub fn from_shape_val(shape: [usize; N], value: T) -> Self
    where
        T: Clone,
    {
        let numel = shape.iter().product::<usize>();
        Self {
            storage: vec![value; numel],
            shape,
            strides: get_strides_from_shape(shape),
        }
    }

    /// Stacks equally shaped tensors along a new leading axis.
    ///
    /// The output rank `N` must be the rank of the parts plus one. The first axis of the
    /// result indexes the parts, in order.
    ///
    /// # Errors
    ///
    /// Fails if `parts` is empty, if the ranks are not compatible or if the parts do not
    /// share the same shape.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use objpose_tensor::Tensor;
    ///
    /// let a = Tensor::<u8, 1>::from_shape_vec([2], vec![1, 2]).unwrap();
    /// let b = Tensor::<u8, 1>::from_shape_vec([2], vec![3, 4]).unwrap();
    /// let ab = Tensor::<u8, 2>::stack(&[a, b]).unwrap();
    /// assert_eq!(ab.shape, [2, 2]);
    /// assert_eq!(ab.as_slice(), &[1, 2, 3, 4]);
    /// ```
    pub fn stack<const M: usize>(parts: &[Tensor<T, M>]) -> Result<Self, TensorError>
    where
        T: Clone,
    {
        if M + 1 != N {
            return Err(TensorError::dimension_mismatch(
                "stacked rank must be the part rank plus one",
                &[M + 1],
                &[N],
            ));
        }
        let first = parts.first().ok_or_else(|| {
            TensorError::dimension_mismatch("cannot stack an empty sequence", &[1], &[0])
        })?;

        let mut shape = [0; N];
        shape[0] = parts.len();
        shape[1..].copy_from_slice(&first.shape);

        let mut data = Vec::with_capacity(shape.iter().product());
        for part in parts {
            if part.shape != first.shape {
                return Err(TensorError::dimension_mismatch(
                    "all stacked tensors must share a shape",
                    &first.shape,
                    &part.shape,
                ));
            }
            data.extend_from_slice(part.as_slice());
        }

        Self::from_shape_vec(shape, data)
    }

    /// Returns the number of elements in the tensor.
    #[inline]
    pub fn numel(&self) -> usize {
        self.storage.len()
    }

    /// Returns the tensor data as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.storage
    }

    /// Returns the tensor data as a mutable slice.
    #[inline]
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.storage
    }

    /// Consumes the tensor and returns its data.
    pub fn into_vec(self) -> Vec<T> {
        self.storage
    }

    /// Computes the linear offset of a multi-dimensional index, if it is in bounds.
    pub fn get_iter_offset(&self, index: [usize; N]) -> Option<usize> {
        let mut offset = 0;
        for ((&idx, &dim_size), &stride) in index.iter().zip(&self.shape).zip(&self.strides) {
            if idx >= dim_size {
                return None;
            }
            offset += idx * stride;
        }
        Some(offset)
    }

    /// Returns a reference to the element at `index`, or `None` if out of bounds.
    pub fn get(&self, index: [usize; N]) -> Option<&T> {
        self.get_iter_offset(index)
            .and_then(|offset| self.storage.get(offset))
    }

    /// Returns a mutable reference to the element at `index`, or `None` if out of bounds.
    pub fn get_mut(&mut self, index: [usize; N]) -> Option<&mut T> {
        self.get_iter_offset(index)
            .and_then(move |offset| self.storage.get_mut(offset))
    }

    /// Returns the contiguous block of elements at position `i` of the first axis.
    ///
    /// PRECONDITION: `i < self.shape[0]`. Panics otherwise.
    pub fn outer(&self, i: usize) -> &[T] {
        let len = self.strides.first().copied().unwrap_or(0);
        &self.storage[i * len..(i + 1) * len]
    }

    /// Reshapes the tensor, keeping the data untouched.
    pub fn reshape<const M: usize>(self, shape: [usize; M]) -> Result<Tensor<T, M>, TensorError> {
        Tensor::from_shape_vec(shape, self.storage)
    }

    /// Applies `f` to every element, producing a new tensor of the same shape.
    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> Tensor<U, N> {
        Tensor {
            storage: self.storage.iter().map(f).collect(),
            shape: self.shape,
            strides: self.strides,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_shape_vec() -> Result<(), TensorError> {
        let t = Tensor::<u8, 3>::from_shape_vec([2, 1, 3], vec![0, 1, 2, 3, 4, 5])?;
        assert_eq!(t.strides, [3, 3, 1]);
        assert_eq!(t.get([1, 0, 2]), Some(&5));
        assert_eq!(t.get([2, 0, 0]), None);
        Ok(())
    }

    #[test]
    fn from_shape_vec_wrong_len() {
        let res = Tensor::<u8, 2>::from_shape_vec([2, 2], vec![0; 3]);
        assert_eq!(res, Err(TensorError::invalid_shape(4, 3)));
    }

    #[test]
    fn stack_parts() -> Result<(), TensorError> {
        let a = Tensor::<f32, 2>::from_shape_val([2, 2], 1.0);
        let b = Tensor::<f32, 2>::from_shape_val([2, 2], 2.0);
        let ab = Tensor::<f32, 3>::stack(&[a, b])?;
        assert_eq!(ab.shape, [2, 2, 2]);
        assert_eq!(ab.outer(0), &[1.0; 4]);
        assert_eq!(ab.outer(1), &[2.0; 4]);
        Ok(())
    }

    #[test]
    fn stack_rejects_bad_input() {
        let empty: [Tensor<f32, 1>; 0] = [];
        assert!(Tensor::<f32, 2>::stack(&empty).is_err());

        let a = Tensor::<f32, 1>::from_shape_val([2], 0.0);
        let b = Tensor::<f32, 1>::from_shape_val([3], 0.0);
        assert!(Tensor::<f32, 2>::stack(&[a.clone(), b]).is_err());
        assert!(Tensor::<f32, 3>::stack(&[a]).is_err());
    }

    #[test]
    fn reshape_and_map() -> Result<(), TensorError> {
        let t = Tensor::<i32, 1>::from_shape_vec([4], vec![1, 2, 3, 4])?;
        let t = t.reshape([2, 2])?;
        let doubled = t.map(|x| x * 2);
        assert_eq!(doubled.outer(1), &[6, 8]);
        Ok(())
    }
}
