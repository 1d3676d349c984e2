// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! Contains structures and methods for specifying the centre of mass calculation.

use derive_builder::Builder;
use getset::CopyGetters;
use serde::Deserialize;

use crate::errors::ConfigError;

use super::{default_one, validate_n_threads};

/// Parameters of the centre of mass calculation for a stack of diffraction frames.
#[derive(Debug, Clone, Builder, CopyGetters, Deserialize)]
#[serde(deny_unknown_fields)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct CentreOfMass {
    /// If provided, each frame is binarized before calculating the centre of mass:
    /// pixels brighter than `threshold` times the mean (masked) intensity become 1, all others 0.
    #[builder(setter(strip_option), default)]
    #[serde(default)]
    #[getset(get_copy = "pub")]
    threshold: Option<f64>,
    /// Number of threads to use for the calculation.
    /// If not specified, the default value is 1.
    #[builder(default = "1")]
    #[serde(default = "default_one")]
    #[getset(get_copy = "pub")]
    n_threads: usize,
}

impl Default for CentreOfMass {
    fn default() -> Self {
        CentreOfMass {
            threshold: None,
            n_threads: 1,
        }
    }
}

fn validate_threshold(threshold: f64) -> Result<(), ConfigError> {
    if !threshold.is_finite() || threshold <= 0.0 {
        Err(ConfigError::NotPositive("threshold".to_owned(), threshold))
    } else {
        Ok(())
    }
}

impl CentreOfMass {
    /// Start providing centre of mass parameters.
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> CentreOfMassBuilder {
        CentreOfMassBuilder::default()
    }

    /// Check that the parameters are valid. Used after deserialization.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        validate_n_threads(self.n_threads)?;
        if let Some(threshold) = self.threshold {
            validate_threshold(threshold)?;
        }

        Ok(())
    }
}

impl CentreOfMassBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(n_threads) = self.n_threads {
            validate_n_threads(n_threads).map_err(|e| e.to_string())?;
        }

        if let Some(Some(threshold)) = self.threshold {
            validate_threshold(threshold).map_err(|e| e.to_string())?;
        }

        Ok(())
    }
}
