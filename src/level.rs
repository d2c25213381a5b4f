//! Bin factor derived from a resampling level

use crate::error::{MorphError, Result};

/// Bin/replication factor `2^level`, computed as a shift
#[inline]
pub fn bin_factor(level: u32) -> Result<usize> {
    1usize
        .checked_shl(level)
        .ok_or(MorphError::InvalidLevel { level })
}

/// Check that `len` splits into whole bins of `factor` samples
#[inline]
pub(crate) fn ensure_divisible(axis: &'static str, len: usize, factor: usize) -> Result<()> {
    if len % factor != 0 {
        return Err(MorphError::NotDivisible { axis, len, factor });
    }
    Ok(())
}
