// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! Two-dimensional histograms of pairs of quantities.

use ndarray::{Array2, ArrayView, Dimension};

use crate::errors::{
    DegenerateInputError, InvalidMaskShapeError, InvalidRangeError, ProcessingError,
};
use crate::input::histogram::validate_range;
use crate::input::BivariateHistogram;
use crate::signal::{DataAxis, Signal2D};

/// Uniform binning of a closed interval.
#[derive(Debug, Clone, Copy)]
struct Binning {
    low: f64,
    high: f64,
    bins: usize,
}

impl Binning {
    fn new(range: [f64; 2], bins: usize) -> Result<Self, InvalidRangeError> {
        if range[1] == range[0] {
            return Err(InvalidRangeError::ZeroWidth(range[0]));
        }
        validate_range(range)?;

        Ok(Binning {
            low: range[0],
            high: range[1],
            bins,
        })
    }

    #[inline(always)]
    fn width(&self) -> f64 {
        (self.high - self.low) / self.bins as f64
    }

    /// Index of the bin containing the value. The last bin includes the upper edge.
    #[inline]
    fn index(&self, value: f64) -> Option<usize> {
        if !(self.low..=self.high).contains(&value) {
            return None;
        }

        let index = ((value - self.low) / (self.high - self.low) * self.bins as f64) as usize;
        Some(index.min(self.bins - 1))
    }

    fn axis(&self, name: &str) -> Result<DataAxis, ProcessingError> {
        Ok(DataAxis::calibrated(
            name,
            self.bins,
            self.low,
            self.width(),
            None,
        )?)
    }
}

impl BivariateHistogram {
    /// Calculate the two-dimensional histogram of `x` and `y` values.
    ///
    /// Elements for which `masked` is `true` are not included. Pairs containing a non-finite value
    /// and pairs lying outside of the histogram range are not counted.
    ///
    /// If no range is provided, both axes span `spatial_std` times the larger of the two standard deviations
    /// around the mean of the respective quantity.
    ///
    /// Rows of the returned signal correspond to `y` bins, columns to `x` bins.
    /// The offset of each axis is the lower edge of the first bin and the scale is the bin width.
    pub fn compute<D: Dimension>(
        &self,
        x: ArrayView<f64, D>,
        y: ArrayView<f64, D>,
        masked: Option<ArrayView<bool, D>>,
    ) -> Result<Signal2D, ProcessingError> {
        if x.shape() != y.shape() {
            return Err(
                InvalidMaskShapeError::Inconsistent(x.shape().to_vec(), y.shape().to_vec()).into(),
            );
        }

        if let Some(masked) = &masked {
            if masked.shape() != x.shape() {
                return Err(InvalidMaskShapeError::Inconsistent(
                    masked.shape().to_vec(),
                    x.shape().to_vec(),
                )
                .into());
            }
        }

        let (xs, ys): (Vec<f64>, Vec<f64>) = match &masked {
            Some(masked) => x
                .iter()
                .zip(y.iter())
                .zip(masked.iter())
                .filter(|(_, m)| !**m)
                .map(|((&a, &b), _)| (a, b))
                .filter(|(a, b)| a.is_finite() && b.is_finite())
                .unzip(),
            None => x
                .iter()
                .zip(y.iter())
                .map(|(&a, &b)| (a, b))
                .filter(|(a, b)| a.is_finite() && b.is_finite())
                .unzip(),
        };

        if xs.is_empty() {
            return Err(DegenerateInputError::EmptySelection.into());
        }

        let (x_range, y_range) = match self.range() {
            Some(range) => (range, range),
            None => {
                let mean_x = statistical::mean(&xs);
                let mean_y = statistical::mean(&ys);
                let std_x = statistical::population_standard_deviation(&xs, Some(mean_x));
                let std_y = statistical::population_standard_deviation(&ys, Some(mean_y));
                let half = std_x.max(std_y) * self.spatial_std();
                log::debug!(
                    "Histogram range derived from the data: x {} ± {}, y {} ± {}",
                    mean_x,
                    half,
                    mean_y,
                    half
                );

                (
                    [mean_x - half, mean_x + half],
                    [mean_y - half, mean_y + half],
                )
            }
        };

        let x_bins = Binning::new(x_range, self.bins())?;
        let y_bins = Binning::new(y_range, self.bins())?;

        let mut histogram = Array2::<f64>::zeros((self.bins(), self.bins()));
        for (&a, &b) in xs.iter().zip(ys.iter()) {
            if let (Some(col), Some(row)) = (x_bins.index(a), y_bins.index(b)) {
                histogram[[row, col]] += 1.0;
            }
        }

        let axes = [x_bins.axis("x")?, y_bins.axis("y")?];
        Ok(Signal2D::with_axes(histogram, axes)?)
    }
}
