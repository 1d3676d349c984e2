// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! Per-frame centre positions.

use getset::Getters;
use ndarray::{ArrayD, IxDyn};
use serde::Serialize;

use crate::errors::{InvalidMaskShapeError, InvalidRangeError, StackError};

use super::FrameSource;

/// Centre position for every frame of a stack, in pixel-index space.
///
/// Both arrays have the navigation shape of the stack they belong to.
#[derive(Debug, Clone, PartialEq, Getters, Serialize)]
pub struct CentreArrays {
    /// Column coordinates of the centres.
    #[getset(get = "pub")]
    x: ArrayD<f64>,
    /// Row coordinates of the centres.
    #[getset(get = "pub")]
    y: ArrayD<f64>,
}

impl CentreArrays {
    /// The same centre for every frame of a stack with the given navigation shape.
    pub fn uniform(navigation_shape: &[usize], centre_x: f64, centre_y: f64) -> Self {
        CentreArrays {
            x: ArrayD::from_elem(IxDyn(navigation_shape), centre_x),
            y: ArrayD::from_elem(IxDyn(navigation_shape), centre_y),
        }
    }

    /// Construct from two arrays of the same shape.
    pub fn from_arrays(x: ArrayD<f64>, y: ArrayD<f64>) -> Result<Self, InvalidMaskShapeError> {
        if x.shape() != y.shape() {
            return Err(InvalidMaskShapeError::Inconsistent(
                x.shape().to_vec(),
                y.shape().to_vec(),
            ));
        }

        Ok(CentreArrays { x, y })
    }

    /// Centres placed at the pixel closest to the zero value of the signal axes.
    pub fn from_signal<S: FrameSource + ?Sized>(source: &S) -> Result<Self, InvalidRangeError> {
        let axes = source.signal_axes();
        let centre_x = axes[0].value2index(0.0)? as f64;
        let centre_y = axes[1].value2index(0.0)? as f64;

        Ok(CentreArrays::uniform(
            source.navigation_shape(),
            centre_x,
            centre_y,
        ))
    }

    /// Shape of the centre arrays.
    pub fn shape(&self) -> &[usize] {
        self.x.shape()
    }

    /// Check that the centre arrays match the navigation shape of the source.
    pub(crate) fn validate<S: FrameSource + ?Sized>(&self, source: &S) -> Result<(), StackError> {
        if self.shape() != source.navigation_shape() {
            Err(StackError::CentreShape {
                centre: self.shape().to_vec(),
                navigation: source.navigation_shape().to_vec(),
            })
        } else {
            Ok(())
        }
    }

    /// Centre `(x, y)` of the frame with the given navigation index.
    pub fn get(&self, index: &[usize]) -> Option<(f64, f64)> {
        match (self.x.get(IxDyn(index)), self.y.get(IxDyn(index))) {
            (Some(&x), Some(&y)) => Some((x, y)),
            _ => None,
        }
    }

    /// Smallest x-coordinate of all centres.
    pub fn min_x(&self) -> f64 {
        self.x.fold(f64::INFINITY, |acc, &v| acc.min(v))
    }

    /// Largest x-coordinate of all centres.
    pub fn max_x(&self) -> f64 {
        self.x.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v))
    }

    /// Smallest y-coordinate of all centres.
    pub fn min_y(&self) -> f64 {
        self.y.fold(f64::INFINITY, |acc, &v| acc.min(v))
    }

    /// Largest y-coordinate of all centres.
    pub fn max_y(&self) -> f64 {
        self.y.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v))
    }
}
