// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! Contains the results of the radial integration.

use getset::Getters;
use ndarray::{indices, ArrayD, ArrayView1, Axis, Dimension, Slice};
use serde::Serialize;

use crate::errors::{FrameError, InvalidRangeError};
use crate::signal::DataAxis;

/// Radial profiles of all frames of a stack.
///
/// `data` has the shape `navigation_shape + (radial_size,)`.
#[derive(Debug, Clone, Getters, Serialize)]
pub struct RadialProfiles {
    /// Profiles of all frames.
    #[getset(get = "pub")]
    data: ArrayD<f64>,
    /// Calibration of the navigation dimensions.
    #[getset(get = "pub")]
    navigation_axes: Vec<DataAxis>,
    /// Calibration of the radial dimension.
    #[getset(get = "pub")]
    radial_axis: DataAxis,
    /// Frames that could not be integrated. Their profiles are zero.
    #[getset(get = "pub")]
    #[serde(skip)]
    skipped_frames: Vec<FrameError>,
}

impl RadialProfiles {
    pub(crate) fn new(
        data: ArrayD<f64>,
        navigation_axes: Vec<DataAxis>,
        radial_axis: DataAxis,
        skipped_frames: Vec<FrameError>,
    ) -> Self {
        RadialProfiles {
            data,
            navigation_axes,
            radial_axis,
            skipped_frames,
        }
    }

    /// Shape of the navigation dimensions.
    pub fn navigation_shape(&self) -> &[usize] {
        let shape = self.data.shape();
        &shape[..shape.len() - 1]
    }

    /// Number of bins of every profile.
    #[inline(always)]
    pub fn radial_size(&self) -> usize {
        self.radial_axis.size()
    }

    /// Profile of the frame with the given navigation index.
    /// Returns `None` if the index is out of bounds.
    pub fn profile(&self, index: &[usize]) -> Option<ArrayView1<'_, f64>> {
        let navigation = self.navigation_shape();
        if index.len() != navigation.len() || index.iter().zip(navigation).any(|(i, n)| i >= n) {
            return None;
        }

        let mut view = self.data.view();
        for &i in index {
            view = view.index_axis_move(Axis(0), i);
        }

        view.into_dimensionality().ok()
    }

    /// Smallest index (over all integrated frames) of the first zero-valued bin of a profile.
    /// Profiles without a zero bin count as the full radial size.
    /// Skipped frames are not considered.
    pub fn lowest_zero_index(&self) -> usize {
        indices(self.navigation_shape())
            .into_iter()
            .map(|index| index.slice().to_vec())
            .filter(|index| !self.skipped_frames.iter().any(|f| &f.index == index))
            .filter_map(|index| self.profile(&index))
            .map(|lane| {
                lane.iter()
                    .position(|&v| v == 0.0)
                    .unwrap_or(lane.len())
            })
            .min()
            .unwrap_or(self.radial_size())
    }

    /// Keep only the first `length` bins of every profile.
    pub fn crop(&self, length: usize) -> Result<RadialProfiles, InvalidRangeError> {
        if length > self.radial_size() {
            return Err(InvalidRangeError::CropTooLong(length, self.radial_size()));
        }

        let last = Axis(self.data.ndim() - 1);
        let data = self
            .data
            .slice_axis(last, Slice::from(..length))
            .to_owned();

        Ok(RadialProfiles {
            data,
            navigation_axes: self.navigation_axes.clone(),
            radial_axis: self.radial_axis.with_size(length),
            skipped_frames: self.skipped_frames.clone(),
        })
    }
}
