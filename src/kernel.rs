//! Flat-buffer resampling kernels
//!
//! These operate on caller-owned, C-ordered slices with explicit dimensions,
//! mirroring the shape of a raw numeric kernel but with every precondition
//! checked up front. A kernel either returns `Ok(())` having written its
//! output, or returns an error before touching `out`.
//!
//! The allocating functions at the crate root wrap these for `ndarray` users.

use log::trace;

use crate::error::{MorphError, Result};
use crate::level::{bin_factor, ensure_divisible};
use crate::shape::Dims3;
use crate::Voxel;

#[inline]
pub(crate) fn scaled(len: usize, factor: usize) -> Result<usize> {
    len.checked_mul(factor).ok_or(MorphError::ShapeOverflow)
}

// =============================================================================
// Padding
// =============================================================================

/// Copy each inner row of a `(dx, dy, dz)` volume into a `(dx, dy, npad)`
/// volume, centred at offset `(npad - dz) / 2`
///
/// Only the copied range of each output row is written. The margins keep
/// whatever `out` held before the call, so callers wanting zero padding
/// must zero `out` first (see [`crate::apply_pad`]).
pub fn apply_padding<T: Voxel>(
    data: &[T],
    dx: usize,
    dy: usize,
    dz: usize,
    npad: usize,
    out: &mut [T],
) -> Result<()> {
    if npad < dz {
        return Err(MorphError::PadTooNarrow { npad, dz });
    }
    let src = Dims3::new(dx, dy, dz)?;
    let dst = Dims3::new(dx, dy, npad)?;
    src.check_buffer("input", data.len())?;
    dst.check_buffer("output", out.len())?;

    let pad_width = (npad - dz) / 2;
    trace!("apply_padding: {:?} -> {:?}, pad_width {}", src.as_tuple(), dst.as_tuple(), pad_width);

    if src.is_empty() {
        return Ok(());
    }

    for (row, padded) in data.chunks_exact(dz).zip(out.chunks_exact_mut(npad)) {
        padded[pad_width..pad_width + dz].copy_from_slice(row);
    }
    Ok(())
}

// =============================================================================
// Downsampling
// =============================================================================

/// Bin the inner axis of a `(dx, dy, dz)` volume by `2^level`
///
/// Output shape is `(dx, dy, dz / 2^level)`. Each output sample is the mean
/// of its bin, accumulated one `sample / binsize` term at a time in input
/// storage order. `out` is reset to zero before accumulation.
pub fn downsample2d<T: Voxel>(
    data: &[T],
    dx: usize,
    dy: usize,
    dz: usize,
    level: u32,
    out: &mut [T],
) -> Result<()> {
    let binsize = bin_factor(level)?;
    let src = Dims3::new(dx, dy, dz)?;
    ensure_divisible("inner", dz, binsize)?;
    let dst = Dims3::new(dx, dy, dz / binsize)?;
    src.check_buffer("input", data.len())?;
    dst.check_buffer("output", out.len())?;

    trace!("downsample2d: {:?} -> {:?}, binsize {}", src.as_tuple(), dst.as_tuple(), binsize);

    out.fill(T::default());

    // Output cells are contiguous runs of `binsize` input samples
    for (cell, bin) in out.iter_mut().zip(data.chunks_exact(binsize)) {
        for &sample in bin {
            *cell = cell.accumulate_mean(sample, binsize);
        }
    }
    Ok(())
}

/// Bin the middle and inner axes of a `(dx, dy, dz)` volume by `2^level`
///
/// Output shape is `(dx, dy / 2^level, dz / 2^level)` and each output sample
/// is the mean of a `binsize x binsize` block. The input is consumed in
/// storage order: a full strip of `binsize` input rows feeds one output row
/// before moving on to the next.
pub fn downsample3d<T: Voxel>(
    data: &[T],
    dx: usize,
    dy: usize,
    dz: usize,
    level: u32,
    out: &mut [T],
) -> Result<()> {
    let binsize = bin_factor(level)?;
    let src = Dims3::new(dx, dy, dz)?;
    ensure_divisible("middle", dy, binsize)?;
    ensure_divisible("inner", dz, binsize)?;
    let dst = Dims3::new(dx, dy / binsize, dz / binsize)?;
    src.check_buffer("input", data.len())?;
    dst.check_buffer("output", out.len())?;

    trace!("downsample3d: {:?} -> {:?}, binsize {}", src.as_tuple(), dst.as_tuple(), binsize);

    out.fill(T::default());
    if dst.is_empty() {
        return Ok(());
    }

    // binsize <= dy and binsize <= dz here, so the block fits in dy * dz
    let block = binsize * binsize;
    let strips = data.chunks_exact(dz * binsize);
    for (out_row, strip) in out.chunks_exact_mut(dst.inner()).zip(strips) {
        for src_row in strip.chunks_exact(dz) {
            for (cell, bin) in out_row.iter_mut().zip(src_row.chunks_exact(binsize)) {
                for &sample in bin {
                    *cell = cell.accumulate_mean(sample, block);
                }
            }
        }
    }
    Ok(())
}

// =============================================================================
// Upsampling
// =============================================================================

/// Replicate each sample of a `(dy, dz)` slab `2^level` times along the
/// inner axis, giving `(dy, dz * 2^level)`
pub fn upsample2d<T: Voxel>(
    data: &[T],
    dy: usize,
    dz: usize,
    level: u32,
    out: &mut [T],
) -> Result<()> {
    let binsize = bin_factor(level)?;
    let src = Dims3::new(1, dy, dz)?;
    let dst = Dims3::new(1, dy, scaled(dz, binsize)?)?;
    src.check_buffer("input", data.len())?;
    dst.check_buffer("output", out.len())?;

    trace!("upsample2d: {:?} -> {:?}, binsize {}", src.as_tuple(), dst.as_tuple(), binsize);

    for (cells, &sample) in out.chunks_exact_mut(binsize).zip(data) {
        cells.fill(sample);
    }
    Ok(())
}

/// Replicate a stack of `dy` square `(dz, dz)` slices by `2^level` along
/// both in-slice axes, giving `(dy, dz * 2^level, dz * 2^level)`
pub fn upsample3d<T: Voxel>(
    data: &[T],
    dy: usize,
    dz: usize,
    level: u32,
    out: &mut [T],
) -> Result<()> {
    let binsize = bin_factor(level)?;
    upsample_slices(data, Dims3::new(dy, dz, dz)?, binsize, 1, out)
}

/// Replicate a stack of `dy` square `(dz, dz)` slices by `2^level` along
/// all three axes, giving `(dy * 2^level, dz * 2^level, dz * 2^level)`
pub fn upsample_isotropic<T: Voxel>(
    data: &[T],
    dy: usize,
    dz: usize,
    level: u32,
    out: &mut [T],
) -> Result<()> {
    let binsize = bin_factor(level)?;
    upsample_slices(data, Dims3::new(dy, dz, dz)?, binsize, binsize, out)
}

/// Shared body of the slice-replicating kernels
///
/// Every source slice expands to `(rows * binsize, cols * binsize)` and is
/// emitted `slice_repeat` times in a row.
pub(crate) fn upsample_slices<T: Voxel>(
    data: &[T],
    src: Dims3,
    binsize: usize,
    slice_repeat: usize,
    out: &mut [T],
) -> Result<()> {
    let dst = Dims3::new(
        scaled(src.outer(), slice_repeat)?,
        scaled(src.middle(), binsize)?,
        scaled(src.inner(), binsize)?,
    )?;
    src.check_buffer("input", data.len())?;
    dst.check_buffer("output", out.len())?;

    trace!(
        "upsample_slices: {:?} -> {:?}, binsize {}",
        src.as_tuple(),
        dst.as_tuple(),
        binsize
    );

    if src.is_empty() {
        return Ok(());
    }

    let wide = dst.inner();
    let slice_len = dst.slice_len();
    let mut ind = 0;
    for slice in data.chunks_exact(src.slice_len()) {
        let slice_start = ind;
        for row in slice.chunks_exact(src.inner()) {
            let row_start = ind;
            for (cells, &sample) in out[row_start..row_start + wide]
                .chunks_exact_mut(binsize)
                .zip(row)
            {
                cells.fill(sample);
            }
            ind += wide;
            // Remaining copies of the row
            for _ in 1..binsize {
                out.copy_within(row_start..row_start + wide, ind);
                ind += wide;
            }
        }
        for _ in 1..slice_repeat {
            out.copy_within(slice_start..slice_start + slice_len, ind);
            ind += slice_len;
        }
    }
    debug_assert_eq!(ind, out.len());
    Ok(())
}
