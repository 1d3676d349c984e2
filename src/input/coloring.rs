// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! Contains structures and methods for specifying the colouring of vector fields.

use std::f64::consts::TAU;

use derive_builder::Builder;
use getset::CopyGetters;
use serde::Deserialize;

use crate::errors::{ConfigError, InvalidRangeError};

use super::histogram::validate_range;

/// Parameters for converting a vector field given by its angle and magnitude
/// into an RGB image (angle is mapped to hue, magnitude to value).
#[derive(Debug, Clone, Builder, CopyGetters, Deserialize)]
#[serde(deny_unknown_fields)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct VectorColoring {
    /// Rotation added to every angle (in degrees). The default value is 0.
    #[builder(default = "0.0")]
    #[serde(default)]
    #[getset(get_copy = "pub")]
    rotation: f64,
    /// If provided, angles are clipped into this range and used directly as the hue.
    /// Both limits must lie within `[0, 1]`.
    /// If not specified, the angles are normalized using their own minimum and maximum.
    #[builder(setter(strip_option), default)]
    #[serde(default)]
    #[getset(get_copy = "pub")]
    angle_limits: Option<[f64; 2]>,
    /// If provided, magnitudes are clipped into this range before normalization.
    #[builder(setter(strip_option), default)]
    #[serde(default)]
    #[getset(get_copy = "pub")]
    magnitude_limits: Option<[f64; 2]>,
    /// Period of the angles after rotation (in radians). The default value is 2π.
    #[builder(default = "TAU")]
    #[serde(default = "default_max_angle")]
    #[getset(get_copy = "pub")]
    max_angle: f64,
}

impl Default for VectorColoring {
    fn default() -> Self {
        VectorColoring {
            rotation: 0.0,
            angle_limits: None,
            magnitude_limits: None,
            max_angle: TAU,
        }
    }
}

fn default_max_angle() -> f64 {
    TAU
}

fn validate_rotation(rotation: f64) -> Result<(), ConfigError> {
    if !rotation.is_finite() {
        Err(ConfigError::InvalidRange(InvalidRangeError::NonFinite))
    } else {
        Ok(())
    }
}

fn validate_angle_limits(limits: [f64; 2]) -> Result<(), InvalidRangeError> {
    validate_range(limits)?;
    match limits.into_iter().find(|l| !(0.0..=1.0).contains(l)) {
        Some(l) => Err(InvalidRangeError::HueOutOfBounds(l)),
        None => Ok(()),
    }
}

fn validate_max_angle(max_angle: f64) -> Result<(), ConfigError> {
    if !max_angle.is_finite() || max_angle <= 0.0 {
        Err(ConfigError::NotPositive("max_angle".to_owned(), max_angle))
    } else {
        Ok(())
    }
}

impl VectorColoring {
    /// Start providing colouring parameters.
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> VectorColoringBuilder {
        VectorColoringBuilder::default()
    }

    /// Check that the parameters are valid. Used after deserialization.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        validate_rotation(self.rotation)?;
        validate_max_angle(self.max_angle)?;
        if let Some(limits) = self.angle_limits {
            validate_angle_limits(limits).map_err(ConfigError::InvalidRange)?;
        }
        if let Some(limits) = self.magnitude_limits {
            validate_range(limits).map_err(ConfigError::InvalidRange)?;
        }

        Ok(())
    }
}

impl VectorColoringBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(rotation) = self.rotation {
            validate_rotation(rotation).map_err(|e| e.to_string())?;
        }

        if let Some(max_angle) = self.max_angle {
            validate_max_angle(max_angle).map_err(|e| e.to_string())?;
        }

        if let Some(Some(limits)) = self.angle_limits {
            validate_angle_limits(limits).map_err(|e| e.to_string())?;
        }

        if let Some(Some(limits)) = self.magnitude_limits {
            validate_range(limits).map_err(|e| e.to_string())?;
        }

        Ok(())
    }
}
