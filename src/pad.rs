//! Allocating inner-axis padding
//!
//! [`apply_pad`] allocates the padded volume filled with the pad value and
//! then lets [`kernel::apply_padding`](crate::kernel::apply_padding) copy
//! the rows into the centre, so the margins hold the pad value.

use log::{debug, warn};
use ndarray::{Array3, ArrayView3};

use crate::error::{MorphError, Result};
use crate::shape::Dims3;
use crate::{kernel, Voxel};

/// Options for [`apply_pad`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PadConfig {
    /// Padded inner width. `None` picks `ceil(dz * sqrt(2))`, which keeps a
    /// rotated square projection inside the padded row.
    pub npad: Option<usize>,
    /// Value written to the margins
    pub value: f64,
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            npad: None,
            value: 0.0,
        }
    }
}

impl PadConfig {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_npad(mut self, npad: usize) -> Self {
        self.npad = Some(npad);
        self
    }

    #[inline]
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    /// Padded width for rows of length `dz`
    ///
    /// A requested width below `dz` is raised to `dz`.
    pub fn resolve_width(&self, dz: usize) -> usize {
        match self.npad {
            None => default_pad_width(dz),
            Some(npad) if npad < dz => {
                warn!("requested pad width {} is below row width {}, using {}", npad, dz, dz);
                dz
            }
            Some(npad) => npad,
        }
    }
}

/// `ceil(dz * sqrt(2))`
#[inline]
pub fn default_pad_width(dz: usize) -> usize {
    (dz as f64 * std::f64::consts::SQRT_2).ceil() as usize
}

/// Pad the inner axis of a `(dx, dy, dz)` volume to `(dx, dy, npad)`
///
/// # Arguments
///
/// * `input` - C-contiguous input volume
/// * `config` - Padded width and margin value
///
/// # Returns
///
/// A new volume with each row centred at offset `(npad - dz) / 2` and the
/// margins set to `config.value`
pub fn apply_pad<T: Voxel>(input: &ArrayView3<T>, config: &PadConfig) -> Result<Array3<T>> {
    let (dx, dy, dz) = input.dim();
    let npad = config.resolve_width(dz);
    let dst = Dims3::new(dx, dy, npad)?;
    let data = input.as_slice().ok_or(MorphError::NotContiguous)?;

    let mut output = Array3::from_elem(dst.as_tuple(), T::from_f64(config.value));
    let out = output.as_slice_mut().ok_or(MorphError::NotContiguous)?;
    kernel::apply_padding(data, dx, dy, dz, npad, out)?;

    debug!("apply_pad: {:?} -> {:?}", (dx, dy, dz), output.dim());
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_width() {
        assert_eq!(default_pad_width(0), 0);
        assert_eq!(default_pad_width(4), 6);
        assert_eq!(default_pad_width(100), 142);
        assert_eq!(PadConfig::default().resolve_width(10), 15);
    }

    #[test]
    fn test_narrow_width_is_clamped() {
        let config = PadConfig::new().with_npad(3);
        assert_eq!(config.resolve_width(8), 8);
        assert_eq!(config.resolve_width(2), 3);
    }

    #[test]
    fn test_margins_hold_pad_value() {
        let input = Array3::from_shape_fn((2, 2, 2), |(i, j, k)| (i * 4 + j * 2 + k) as f32);
        let config = PadConfig::new().with_npad(6).with_value(-1.0);

        let output = apply_pad(&input.view(), &config).unwrap();

        assert_eq!(output.dim(), (2, 2, 6));
        for i in 0..2 {
            for j in 0..2 {
                assert_eq!(output[[i, j, 0]], -1.0);
                assert_eq!(output[[i, j, 1]], -1.0);
                assert_eq!(output[[i, j, 2]], input[[i, j, 0]]);
                assert_eq!(output[[i, j, 3]], input[[i, j, 1]]);
                assert_eq!(output[[i, j, 4]], -1.0);
                assert_eq!(output[[i, j, 5]], -1.0);
            }
        }
    }

    #[test]
    fn test_clamped_pad_is_a_copy() {
        let input = Array3::from_shape_fn((1, 3, 4), |(_, j, k)| (j * 4 + k) as f64);
        let config = PadConfig::new().with_npad(1);

        let output = apply_pad(&input.view(), &config).unwrap();

        assert_eq!(output, input);
    }

    #[test]
    fn test_empty_volume_with_huge_width_is_rejected() {
        let input = Array3::<f32>::zeros((0, 2, 2));
        let config = PadConfig::new().with_npad(usize::MAX);

        let err = apply_pad(&input.view(), &config).unwrap_err();

        assert_eq!(err, MorphError::ShapeOverflow);
    }

    #[test]
    fn test_rejects_non_contiguous_view() {
        let input = Array3::<f32>::zeros((2, 3, 4));
        let transposed = input.view().reversed_axes();

        let err = apply_pad(&transposed, &PadConfig::default()).unwrap_err();

        assert_eq!(err, MorphError::NotContiguous);
    }
}
