//! Padding, binning and replication kernels for 3D tomographic volumes
//!
//! This crate provides the low-level resampling steps a reconstruction
//! pipeline wraps around its solver: pad projections along the detector
//! axis, bin them down by a power of two, reconstruct, then replicate the
//! result back up to full resolution.
//!
//! # Features
//!
//! - **Checked kernels**: every shape, divisibility and buffer-length
//!   precondition is validated before the first write
//! - **Flat-buffer API**: [`kernel`] works on caller-owned slices
//! - **ndarray integration**: allocating wrappers work directly with ndarray arrays
//! - **f32, f64 and f16 samples** through the [`Voxel`] trait
//!
//! # Example
//!
//! ```rust
//! use ndarray::Array3;
//! use tomo_morph::{downsample_3d, upsample_3d};
//!
//! // 10 projections of 64 x 64 pixels
//! let input = Array3::<f32>::ones((10, 64, 64));
//!
//! // Bin by 4 in both detector axes, then replicate back
//! let binned = downsample_3d(&input.view(), 2).unwrap();
//! assert_eq!(binned.dim(), (10, 16, 16));
//!
//! let restored = upsample_3d(&binned.view(), 2).unwrap();
//! assert_eq!(restored.dim(), (10, 64, 64));
//! ```

pub mod error;
pub mod kernel;
pub mod level;
pub mod pad;
pub mod shape;

#[cfg(feature = "python")]
mod python;

pub use error::{MorphError, Result};
pub use half::f16;
pub use level::bin_factor;
pub use pad::{apply_pad, default_pad_width, PadConfig};
pub use shape::Dims3;

use log::debug;
use ndarray::{Array2, Array3, ArrayView2, ArrayView3};

use crate::level::ensure_divisible;

/// Sample types the kernels can bin and replicate
pub trait Voxel: Copy + Send + Sync + Default + PartialEq + std::fmt::Debug + 'static {
    /// `self + sample / count`, the per-sample step of a bin mean
    fn accumulate_mean(self, sample: Self, count: usize) -> Self;
    fn from_f64(v: f64) -> Self;
}

impl Voxel for f32 {
    #[inline]
    fn accumulate_mean(self, sample: Self, count: usize) -> Self {
        self + sample / count as f32
    }
    #[inline]
    fn from_f64(v: f64) -> Self {
        v as f32
    }
}

impl Voxel for f64 {
    #[inline]
    fn accumulate_mean(self, sample: Self, count: usize) -> Self {
        self + sample / count as f64
    }
    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }
}

/// Half precision is accumulated in f32 and rounded after every step
impl Voxel for f16 {
    #[inline]
    fn accumulate_mean(self, sample: Self, count: usize) -> Self {
        f16::from_f32(self.to_f32() + sample.to_f32() / count as f32)
    }
    #[inline]
    fn from_f64(v: f64) -> Self {
        f16::from_f64(v)
    }
}

/// Bin the inner axis of a `(dx, dy, dz)` volume by `2^level`
///
/// # Arguments
///
/// * `input` - C-contiguous input volume
/// * `level` - Binning level; the bin size is `2^level`
///
/// # Returns
///
/// Volume of shape `(dx, dy, dz / 2^level)` holding the bin means
pub fn downsample_2d<T: Voxel>(input: &ArrayView3<T>, level: u32) -> Result<Array3<T>> {
    let (dx, dy, dz) = input.dim();
    let binsize = bin_factor(level)?;
    ensure_divisible("inner", dz, binsize)?;
    let data = input.as_slice().ok_or(MorphError::NotContiguous)?;

    let mut output = Array3::from_elem((dx, dy, dz / binsize), T::default());
    let out = output.as_slice_mut().ok_or(MorphError::NotContiguous)?;
    kernel::downsample2d(data, dx, dy, dz, level, out)?;

    debug!("downsample_2d: {:?} -> {:?}", (dx, dy, dz), output.dim());
    Ok(output)
}

/// Bin the middle and inner axes of a `(dx, dy, dz)` volume by `2^level`
///
/// # Returns
///
/// Volume of shape `(dx, dy / 2^level, dz / 2^level)` holding the means of
/// each `2^level x 2^level` block
pub fn downsample_3d<T: Voxel>(input: &ArrayView3<T>, level: u32) -> Result<Array3<T>> {
    let (dx, dy, dz) = input.dim();
    let binsize = bin_factor(level)?;
    ensure_divisible("middle", dy, binsize)?;
    ensure_divisible("inner", dz, binsize)?;
    let data = input.as_slice().ok_or(MorphError::NotContiguous)?;

    let mut output = Array3::from_elem((dx, dy / binsize, dz / binsize), T::default());
    let out = output.as_slice_mut().ok_or(MorphError::NotContiguous)?;
    kernel::downsample3d(data, dx, dy, dz, level, out)?;

    debug!("downsample_3d: {:?} -> {:?}", (dx, dy, dz), output.dim());
    Ok(output)
}

/// Replicate every sample of a `(dy, dz)` slab `2^level` times along the
/// inner axis
pub fn upsample_2d<T: Voxel>(input: &ArrayView2<T>, level: u32) -> Result<Array2<T>> {
    let (dy, dz) = input.dim();
    let binsize = bin_factor(level)?;
    let dst = Dims3::new(1, dy, kernel::scaled(dz, binsize)?)?;
    let data = input.as_slice().ok_or(MorphError::NotContiguous)?;

    let mut output = Array2::from_elem((dst.middle(), dst.inner()), T::default());
    let out = output.as_slice_mut().ok_or(MorphError::NotContiguous)?;
    kernel::upsample2d(data, dy, dz, level, out)?;

    debug!("upsample_2d: {:?} -> {:?}", (dy, dz), output.dim());
    Ok(output)
}

/// Replicate each slice of an `(n, rows, cols)` stack into
/// `2^level x 2^level` blocks
///
/// Unlike [`kernel::upsample3d`] the slices need not be square.
///
/// # Returns
///
/// Volume of shape `(n, rows * 2^level, cols * 2^level)`
pub fn upsample_3d<T: Voxel>(input: &ArrayView3<T>, level: u32) -> Result<Array3<T>> {
    upsample_stack(input, level, false)
}

/// Replicate an `(n, rows, cols)` stack by `2^level` along all three axes
///
/// # Returns
///
/// Volume of shape `(n * 2^level, rows * 2^level, cols * 2^level)`
pub fn upsample_isotropic_3d<T: Voxel>(input: &ArrayView3<T>, level: u32) -> Result<Array3<T>> {
    upsample_stack(input, level, true)
}

fn upsample_stack<T: Voxel>(
    input: &ArrayView3<T>,
    level: u32,
    repeat_slices: bool,
) -> Result<Array3<T>> {
    let (n, rows, cols) = input.dim();
    let src = Dims3::new(n, rows, cols)?;
    let binsize = bin_factor(level)?;
    let slice_repeat = if repeat_slices { binsize } else { 1 };
    let dst = Dims3::new(
        kernel::scaled(src.outer(), slice_repeat)?,
        kernel::scaled(src.middle(), binsize)?,
        kernel::scaled(src.inner(), binsize)?,
    )?;
    let data = input.as_slice().ok_or(MorphError::NotContiguous)?;

    let mut output = Array3::from_elem(dst.as_tuple(), T::default());
    let out = output.as_slice_mut().ok_or(MorphError::NotContiguous)?;
    kernel::upsample_slices(data, src, binsize, slice_repeat, out)?;

    debug!("upsample: {:?} -> {:?}", src.as_tuple(), output.dim());
    Ok(output)
}
