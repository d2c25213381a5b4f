//! Checked row-major shape for flat volume buffers

use crate::error::{MorphError, Result};

/// Logical shape `(outer, middle, inner)` of a C-ordered volume
///
/// Construction fails if the element count overflows, or if the product of
/// the non-zero axes exceeds `isize::MAX`, so any `Dims3` can back an
/// ndarray allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dims3 {
    outer: usize,
    middle: usize,
    inner: usize,
    len: usize,
}

impl Dims3 {
    pub fn new(outer: usize, middle: usize, inner: usize) -> Result<Self> {
        let extent = [outer, middle, inner]
            .into_iter()
            .filter(|&n| n != 0)
            .try_fold(1usize, |acc, n| acc.checked_mul(n))
            .filter(|&n| n <= isize::MAX as usize)
            .ok_or(MorphError::ShapeOverflow)?;
        let len = if outer == 0 || middle == 0 || inner == 0 {
            0
        } else {
            extent
        };
        Ok(Self {
            outer,
            middle,
            inner,
            len,
        })
    }

    #[inline]
    pub fn outer(&self) -> usize {
        self.outer
    }

    #[inline]
    pub fn middle(&self) -> usize {
        self.middle
    }

    #[inline]
    pub fn inner(&self) -> usize {
        self.inner
    }

    /// Total number of samples
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Samples per outer slice
    #[inline]
    pub fn slice_len(&self) -> usize {
        self.middle * self.inner
    }

    /// Check that a flat buffer holds exactly this many samples
    #[inline]
    pub fn check_buffer(&self, buffer: &'static str, actual: usize) -> Result<()> {
        if actual != self.len {
            return Err(MorphError::LengthMismatch {
                buffer,
                expected: self.len,
                actual,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn as_tuple(&self) -> (usize, usize, usize) {
        (self.outer, self.middle, self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lengths() {
        let dims = Dims3::new(2, 3, 4).unwrap();
        assert_eq!(dims.len(), 24);
        assert_eq!(dims.slice_len(), 12);
        assert_eq!(dims.as_tuple(), (2, 3, 4));

        let empty = Dims3::new(0, 3, 4).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.slice_len(), 12);
    }

    #[test]
    fn test_overflow_is_rejected() {
        assert_eq!(
            Dims3::new(usize::MAX, 2, 1),
            Err(MorphError::ShapeOverflow)
        );
    }

    #[test]
    fn test_empty_shape_with_huge_axes_is_rejected() {
        // Zero elements, but too large for an ndarray allocation
        assert_eq!(
            Dims3::new(0, 1, 1 << (usize::BITS - 1)),
            Err(MorphError::ShapeOverflow)
        );
        assert_eq!(
            Dims3::new(0, 1 << 40, 1 << 40),
            Err(MorphError::ShapeOverflow)
        );
        assert!(Dims3::new(0, 1, isize::MAX as usize).is_ok());
    }

    #[test]
    fn test_check_buffer() {
        let dims = Dims3::new(1, 2, 2).unwrap();
        assert!(dims.check_buffer("input", 4).is_ok());
        assert_eq!(
            dims.check_buffer("output", 5),
            Err(MorphError::LengthMismatch {
                buffer: "output",
                expected: 4,
                actual: 5
            })
        );
    }
}
