//! Python bindings using PyO3
//!
//! The functions take and return float32 numpy arrays. Non-contiguous
//! inputs are copied to C order first. A negative `level` returns a copy of
//! the input unchanged.

use ndarray::{Array2, Array3, ArrayView2, ArrayView3};
use numpy::{IntoPyArray, PyArray2, PyArray3, PyReadonlyArray2, PyReadonlyArray3};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::{
    apply_pad, downsample_2d, downsample_3d, upsample_2d, upsample_3d, upsample_isotropic_3d,
    MorphError, PadConfig, Result,
};

impl From<MorphError> for PyErr {
    fn from(err: MorphError) -> Self {
        PyValueError::new_err(err.to_string())
    }
}

// =============================================================================
// Helper functions
// =============================================================================

fn resample_volume<'py>(
    py: Python<'py>,
    data: PyReadonlyArray3<'py, f32>,
    level: i32,
    op: fn(&ArrayView3<'_, f32>, u32) -> Result<Array3<f32>>,
) -> PyResult<Bound<'py, PyArray3<f32>>> {
    let input = data.as_array();
    let input = input.as_standard_layout();
    let output = match u32::try_from(level) {
        Ok(level) => op(&input.view(), level)?,
        Err(_) => input.into_owned(),
    };
    Ok(output.into_pyarray(py))
}

fn resample_slab<'py>(
    py: Python<'py>,
    data: PyReadonlyArray2<'py, f32>,
    level: i32,
    op: fn(&ArrayView2<'_, f32>, u32) -> Result<Array2<f32>>,
) -> PyResult<Bound<'py, PyArray2<f32>>> {
    let input = data.as_array();
    let input = input.as_standard_layout();
    let output = match u32::try_from(level) {
        Ok(level) => op(&input.view(), level)?,
        Err(_) => input.into_owned(),
    };
    Ok(output.into_pyarray(py))
}

// =============================================================================
// Build Info
// =============================================================================

/// Get build information
///
/// Returns a dictionary with:
/// - version: Package version
/// - dtypes: Sample types supported by the Rust API
#[pyfunction]
fn build_info(py: Python<'_>) -> PyResult<Bound<'_, PyDict>> {
    let info = PyDict::new(py);
    info.set_item("version", env!("CARGO_PKG_VERSION"))?;
    info.set_item("dtypes", vec!["float32", "float64", "float16"])?;
    Ok(info)
}

// =============================================================================
// Padding
// =============================================================================

/// Extend the last axis of a 3D array by padding with a constant value
///
/// Args:
///     arr: 3D float32 array [projections, slices, pixels]
///     npad: New size of the last axis. Defaults to ceil(pixels * sqrt(2));
///         values below the current size are raised to it.
///     val: Pad value (default: 0.0)
///
/// Returns:
///     Padded array with the original rows centred
#[pyfunction]
#[pyo3(name = "apply_pad", signature = (arr, npad=None, val=0.0))]
fn py_apply_pad<'py>(
    py: Python<'py>,
    arr: PyReadonlyArray3<'py, f32>,
    npad: Option<usize>,
    val: f64,
) -> PyResult<Bound<'py, PyArray3<f32>>> {
    let input = arr.as_array();
    let input = input.as_standard_layout();

    let mut config = PadConfig::new().with_value(val);
    if let Some(npad) = npad {
        config = config.with_npad(npad);
    }

    let output = apply_pad(&input.view(), &config)?;
    Ok(output.into_pyarray(py))
}

// =============================================================================
// Binning
// =============================================================================

/// Downsample the pixels of each slice by binning
///
/// Args:
///     data: 3D float32 array [projections, slices, pixels]
///     level: Bin size is 2**level (default: 1)
///
/// Returns:
///     Array of shape [projections, slices, pixels / 2**level]
#[pyfunction]
#[pyo3(name = "downsample2d", signature = (data, level=1))]
fn py_downsample2d<'py>(
    py: Python<'py>,
    data: PyReadonlyArray3<'py, f32>,
    level: i32,
) -> PyResult<Bound<'py, PyArray3<f32>>> {
    resample_volume(py, data, level, downsample_2d::<f32>)
}

/// Downsample slices and pixels by binning
///
/// Args:
///     data: 3D float32 array [projections, slices, pixels]
///     level: Bin size is 2**level along both axes (default: 1)
///
/// Returns:
///     Array of shape [projections, slices / 2**level, pixels / 2**level]
#[pyfunction]
#[pyo3(name = "downsample3d", signature = (data, level=1))]
fn py_downsample3d<'py>(
    py: Python<'py>,
    data: PyReadonlyArray3<'py, f32>,
    level: i32,
) -> PyResult<Bound<'py, PyArray3<f32>>> {
    resample_volume(py, data, level, downsample_3d::<f32>)
}

// =============================================================================
// Replication
// =============================================================================

/// Replicate each sample of a 2D slab 2**level times along its last axis
#[pyfunction]
#[pyo3(name = "upsample2d", signature = (data, level=1))]
fn py_upsample2d<'py>(
    py: Python<'py>,
    data: PyReadonlyArray2<'py, f32>,
    level: i32,
) -> PyResult<Bound<'py, PyArray2<f32>>> {
    resample_slab(py, data, level, upsample_2d::<f32>)
}

/// Replicate each slice of a 3D stack into 2**level x 2**level blocks
#[pyfunction]
#[pyo3(name = "upsample3d", signature = (data, level=1))]
fn py_upsample3d<'py>(
    py: Python<'py>,
    data: PyReadonlyArray3<'py, f32>,
    level: i32,
) -> PyResult<Bound<'py, PyArray3<f32>>> {
    resample_volume(py, data, level, upsample_3d::<f32>)
}

/// Replicate a 3D stack by 2**level along all three axes
#[pyfunction]
#[pyo3(name = "upsample_isotropic", signature = (data, level=1))]
fn py_upsample_isotropic<'py>(
    py: Python<'py>,
    data: PyReadonlyArray3<'py, f32>,
    level: i32,
) -> PyResult<Bound<'py, PyArray3<f32>>> {
    resample_volume(py, data, level, upsample_isotropic_3d::<f32>)
}

// =============================================================================
// Module registration
// =============================================================================

/// Padding, binning and replication for tomographic volumes
///
/// - apply_pad(): pad the pixel axis
/// - downsample2d(), downsample3d(): power-of-two binning
/// - upsample2d(), upsample3d(), upsample_isotropic(): power-of-two replication
#[pymodule]
fn tomo_morph(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(py_apply_pad, m)?)?;

    m.add_function(wrap_pyfunction!(py_downsample2d, m)?)?;
    m.add_function(wrap_pyfunction!(py_downsample3d, m)?)?;

    m.add_function(wrap_pyfunction!(py_upsample2d, m)?)?;
    m.add_function(wrap_pyfunction!(py_upsample3d, m)?)?;
    m.add_function(wrap_pyfunction!(py_upsample_isotropic, m)?)?;

    m.add_function(wrap_pyfunction!(build_info, m)?)?;
    Ok(())
}
