// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! Contains structures and methods for specifying background ramp fitting.

use derive_builder::Builder;
use getset::CopyGetters;
use serde::Deserialize;

use crate::errors::ConfigError;

/// Parameters of a planar background (ramp) fit to the corners of an image.
#[derive(Debug, Clone, Builder, CopyGetters, Deserialize)]
#[serde(deny_unknown_fields)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct RampFit {
    /// Size of each sampled corner as a fraction of the axis range.
    /// The default value is 0.05.
    #[builder(default = "0.05")]
    #[serde(default = "default_corner_size")]
    #[getset(get_copy = "pub")]
    corner_size: f64,
}

impl Default for RampFit {
    fn default() -> Self {
        RampFit { corner_size: 0.05 }
    }
}

fn default_corner_size() -> f64 {
    0.05
}

fn validate_corner_size(size: f64) -> Result<(), ConfigError> {
    if !size.is_finite() || size <= 0.0 || size > 0.5 {
        Err(ConfigError::InvalidCornerSize(size))
    } else {
        Ok(())
    }
}

impl RampFit {
    /// Start providing ramp fit parameters.
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> RampFitBuilder {
        RampFitBuilder::default()
    }

    /// Check that the parameters are valid. Used after deserialization.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        validate_corner_size(self.corner_size)
    }
}

impl RampFitBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(size) = self.corner_size {
            validate_corner_size(size).map_err(|e| e.to_string())?;
        }

        Ok(())
    }
}
