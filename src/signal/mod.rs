// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! Contains containers for calibrated data: axes, two-dimensional signals,
//! stacks of diffraction frames and per-frame centre positions.

use getset::{CopyGetters, Getters};
use ndarray::{Array1, Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::errors::{InvalidRangeError, StackError};

pub mod centre;
pub mod stack;

pub use centre::CentreArrays;
pub use stack::{DiffractionStack, FrameSource, MaskStack};

/// Uniformly sampled, calibrated axis of a dataset.
#[derive(Debug, Clone, PartialEq, Getters, CopyGetters, Serialize, Deserialize)]
pub struct DataAxis {
    /// Name of the axis.
    #[getset(get = "pub")]
    name: String,
    /// Physical units of the axis values.
    #[getset(get = "pub")]
    units: Option<String>,
    /// Value of the first sample.
    #[getset(get_copy = "pub")]
    offset: f64,
    /// Distance between two neighbouring samples.
    #[getset(get_copy = "pub")]
    scale: f64,
    /// Number of samples.
    #[getset(get_copy = "pub")]
    size: usize,
}

impl DataAxis {
    /// Create an uncalibrated axis (offset 0, scale 1).
    pub fn new(name: &str, size: usize) -> Self {
        DataAxis {
            name: name.to_owned(),
            units: None,
            offset: 0.0,
            scale: 1.0,
            size,
        }
    }

    /// Create a calibrated axis.
    ///
    /// Fails if the scale is zero or not finite or if the offset is not finite.
    pub fn calibrated(
        name: &str,
        size: usize,
        offset: f64,
        scale: f64,
        units: Option<&str>,
    ) -> Result<Self, StackError> {
        if !scale.is_finite() || scale == 0.0 || !offset.is_finite() {
            return Err(StackError::InvalidScale(name.to_owned()));
        }

        Ok(DataAxis {
            name: name.to_owned(),
            units: units.map(str::to_owned),
            offset,
            scale,
            size,
        })
    }

    /// Value at the given index.
    #[inline(always)]
    pub fn value(&self, index: usize) -> f64 {
        self.offset + index as f64 * self.scale
    }

    /// Value of the first sample.
    #[inline(always)]
    pub fn low_value(&self) -> f64 {
        self.offset
    }

    /// Value of the last sample.
    #[inline(always)]
    pub fn high_value(&self) -> f64 {
        self.value(self.size.saturating_sub(1))
    }

    /// All values of the axis.
    pub fn values(&self) -> Array1<f64> {
        Array1::from_iter((0..self.size).map(|i| self.value(i)))
    }

    /// Index of the sample closest to `value`. Ties are rounded to even.
    pub fn value2index(&self, value: f64) -> Result<usize, InvalidRangeError> {
        if !value.is_finite() {
            return Err(InvalidRangeError::NonFinite);
        }

        let index = ((value - self.offset) / self.scale).round_ties_even();
        if index < 0.0 || index >= self.size as f64 {
            return Err(InvalidRangeError::ValueOutsideAxis {
                value,
                low: self.low_value(),
                high: self.high_value(),
            });
        }

        Ok(index as usize)
    }

    /// Return a copy of this axis with a different offset.
    pub(crate) fn with_offset(&self, offset: f64) -> Self {
        DataAxis {
            offset,
            ..self.clone()
        }
    }

    /// Return a copy of this axis with a different name.
    pub(crate) fn with_name(&self, name: &str) -> Self {
        DataAxis {
            name: name.to_owned(),
            ..self.clone()
        }
    }

    /// Return a copy of this axis with a different size.
    pub(crate) fn with_size(&self, size: usize) -> Self {
        DataAxis {
            size,
            ..self.clone()
        }
    }
}

/// Two-dimensional calibrated signal.
///
/// Rows of `data` run along the y-axis (`axes[1]`), columns along the x-axis (`axes[0]`).
#[derive(Debug, Clone, PartialEq, Getters, Serialize)]
pub struct Signal2D {
    #[getset(get = "pub")]
    data: Array2<f64>,
    #[getset(get = "pub")]
    axes: [DataAxis; 2],
}

impl Signal2D {
    /// Wrap an array into a signal with uncalibrated axes.
    pub fn new(data: Array2<f64>) -> Self {
        let (rows, cols) = data.dim();
        Signal2D {
            data,
            axes: [DataAxis::new("x", cols), DataAxis::new("y", rows)],
        }
    }

    /// Wrap an array into a signal with the provided axes.
    pub fn with_axes(data: Array2<f64>, axes: [DataAxis; 2]) -> Result<Self, StackError> {
        let (rows, cols) = data.dim();
        check_axis_size(&axes[0], cols)?;
        check_axis_size(&axes[1], rows)?;

        Ok(Signal2D { data, axes })
    }

    /// Assemble a signal from data and axes known to match.
    pub(crate) fn from_parts(data: Array2<f64>, axes: [DataAxis; 2]) -> Self {
        Signal2D { data, axes }
    }

    /// View of the underlying data.
    #[inline(always)]
    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    /// Axis running along the columns.
    #[inline(always)]
    pub fn x_axis(&self) -> &DataAxis {
        &self.axes[0]
    }

    /// Axis running along the rows.
    #[inline(always)]
    pub fn y_axis(&self) -> &DataAxis {
        &self.axes[1]
    }

    /// Consume the signal and return the underlying array.
    pub fn into_data(self) -> Array2<f64> {
        self.data
    }
}

/// Check that the size of the axis matches the size of the data dimension.
pub(crate) fn check_axis_size(axis: &DataAxis, data: usize) -> Result<(), StackError> {
    if axis.size() != data {
        Err(StackError::AxisSize {
            name: axis.name().clone(),
            axis: axis.size(),
            data,
        })
    } else {
        Ok(())
    }
}
