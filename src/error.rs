//! Error type for the resampling kernels
//!
//! Every kernel validates its arguments before touching the output buffer,
//! so an `Err` always means `out` was left as the caller handed it in.

use thiserror::Error;

/// Precondition violations reported by the kernels
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MorphError {
    /// `2^level` does not fit in `usize`
    #[error("invalid level {level}: bin factor 2^{level} overflows usize")]
    InvalidLevel { level: u32 },

    /// An axis is not an exact multiple of the bin factor
    #[error("{axis} axis of length {len} is not divisible by bin factor {factor}")]
    NotDivisible {
        axis: &'static str,
        len: usize,
        factor: usize,
    },

    /// Padded width is smaller than the row being padded
    #[error("padded width {npad} is smaller than row width {dz}")]
    PadTooNarrow { npad: usize, dz: usize },

    /// A flat buffer does not hold exactly the declared number of samples
    #[error("{buffer} buffer has {actual} samples, expected {expected}")]
    LengthMismatch {
        buffer: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The product of the dimensions overflows `usize`
    #[error("dimension product overflows usize")]
    ShapeOverflow,

    /// An ndarray view is not in standard (C-contiguous) layout
    #[error("array must be C-contiguous")]
    NotContiguous,
}

pub type Result<T> = std::result::Result<T, MorphError>;
