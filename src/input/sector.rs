// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! Contains structures and methods for specifying angular sectors of diffraction frames.

use std::f64::consts::TAU;

use getset::CopyGetters;
use serde::Deserialize;

use crate::errors::InvalidRangeError;
use crate::signal::CentreArrays;

/// Angular sector between `angle0` and `angle1` (in radians, both in `[0, 2π]`).
///
/// Angles are measured as `atan2(y, x) + π` around the centre of the sector,
/// i.e. they start at the negative x-axis.
#[derive(Debug, Clone, Copy, PartialEq, CopyGetters, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AngleSector {
    #[getset(get_copy = "pub")]
    angle0: f64,
    #[getset(get_copy = "pub")]
    angle1: f64,
}

impl AngleSector {
    /// Create a new valid angular sector.
    ///
    /// Fails if either angle lies outside of `[0, 2π]` or if `angle0` is not smaller than `angle1`.
    pub fn new(angle0: f64, angle1: f64) -> Result<AngleSector, InvalidRangeError> {
        let sector = AngleSector { angle0, angle1 };
        sector.validate()?;
        Ok(sector)
    }

    /// Check that the sector is valid. Used after deserialization.
    pub(crate) fn validate(&self) -> Result<(), InvalidRangeError> {
        for angle in [self.angle0, self.angle1] {
            if !angle.is_finite() {
                return Err(InvalidRangeError::NonFinite);
            }

            if !(0.0..=TAU).contains(&angle) {
                return Err(InvalidRangeError::AngleOutOfBounds(angle));
            }
        }

        if self.angle0 >= self.angle1 {
            return Err(InvalidRangeError::Reversed(self.angle0, self.angle1));
        }

        Ok(())
    }

    /// Is the angle strictly inside the sector?
    #[inline(always)]
    pub fn contains(&self, angle: f64) -> bool {
        angle > self.angle0 && angle < self.angle1
    }
}

/// Centre around which the angles of an `AngleSector` are measured.
#[derive(Debug, Clone, Copy)]
pub enum SectorCentre<'a> {
    /// Zero of the calibrated signal axes of each frame.
    Calibrated,
    /// The same centre for every frame.
    Fixed { x: f64, y: f64 },
    /// Individual centre for each frame.
    PerFrame(&'a CentreArrays),
}
