// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! Normalization of arrays and display limits of images.

use ndarray::{s, Array, ArrayView, ArrayView2, Dimension};

use crate::errors::DegenerateInputError;
use crate::input::DisplayLimits;

/// Fraction of each axis ignored at both of its ends when `ignore_edges` is set.
const EDGE_FRACTION: f64 = 0.05;

/// Rescale an array linearly so that its minimum becomes 0 and its maximum becomes `max_number`.
///
/// ## Example
/// ```
/// use ndarray::arr1;
/// use pixstem::prelude::*;
///
/// let normalized = normalize_array(arr1(&[2.0, 4.0, 6.0]).view(), 1.0).unwrap();
/// assert_eq!(normalized, arr1(&[0.0, 0.5, 1.0]));
/// ```
pub fn normalize_array<D: Dimension>(
    array: ArrayView<f64, D>,
    max_number: f64,
) -> Result<Array<f64, D>, DegenerateInputError> {
    if array.is_empty() {
        return Err(DegenerateInputError::Empty);
    }

    let (min, max) = array
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &v| {
            (min.min(v), max.max(v))
        });

    if max == min {
        return Err(DegenerateInputError::ConstantArray(min));
    }

    let factor = max_number / (max - min);
    Ok(array.mapv(|v| (v - min) * factor))
}

impl DisplayLimits {
    /// Determine the display range `(low, high)` of an image as the mean value
    /// plus and minus `sigma` standard deviations, clamped to the range of the values.
    ///
    /// Non-finite values are ignored.
    pub fn compute(&self, image: ArrayView2<f64>) -> Result<(f64, f64), DegenerateInputError> {
        let region = if self.ignore_edges() {
            let (rows, cols) = image.dim();
            let border_y = (rows as f64 * EDGE_FRACTION) as usize;
            let border_x = (cols as f64 * EDGE_FRACTION) as usize;
            image.slice_move(s![border_y..rows - border_y, border_x..cols - border_x])
        } else {
            image
        };

        let values: Vec<f64> = region
            .iter()
            .copied()
            .filter(|v| v.is_finite() && !(self.ignore_zeros() && *v == 0.0))
            .collect();

        if values.is_empty() {
            return Err(DegenerateInputError::EmptySelection);
        }

        let mean = statistical::mean(&values);
        let std = statistical::population_standard_deviation(&values, Some(mean));

        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &v| {
                (min.min(v), max.max(v))
            });

        let low = (mean - self.sigma() * std).max(min);
        let high = (mean + self.sigma() * std).min(max);
        log::debug!("Display limits: {} to {}", low, high);

        Ok((low, high))
    }
}
