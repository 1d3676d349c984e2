// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! Contains structures and methods for specifying bivariate histograms.

use derive_builder::Builder;
use getset::CopyGetters;
use serde::Deserialize;

use crate::errors::{ConfigError, InvalidRangeError};

/// Parameters of a two-dimensional histogram of two same-shaped quantities
/// (e.g. the x and y components of a beam shift field).
#[derive(Debug, Clone, Builder, CopyGetters, Deserialize)]
#[serde(deny_unknown_fields)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct BivariateHistogram {
    /// Number of bins along each axis of the histogram.
    /// The default value is 200.
    #[builder(default = "200")]
    #[serde(default = "default_bins")]
    #[getset(get_copy = "pub")]
    bins: usize,
    /// Half-width of the automatically determined histogram range in multiples
    /// of the standard deviation of the data. The default value is 3.
    #[builder(default = "3.0")]
    #[serde(default = "default_spatial_std")]
    #[getset(get_copy = "pub")]
    spatial_std: f64,
    /// Range of the histogram applied to both axes.
    /// If not specified, the range is derived from the data.
    #[builder(setter(strip_option), default)]
    #[serde(default)]
    #[getset(get_copy = "pub")]
    range: Option<[f64; 2]>,
}

impl Default for BivariateHistogram {
    fn default() -> Self {
        BivariateHistogram {
            bins: 200,
            spatial_std: 3.0,
            range: None,
        }
    }
}

fn default_bins() -> usize {
    200
}

fn default_spatial_std() -> f64 {
    3.0
}

fn validate_bins(bins: usize) -> Result<(), ConfigError> {
    if bins == 0 {
        Err(ConfigError::InvalidBins)
    } else {
        Ok(())
    }
}

fn validate_spatial_std(std: f64) -> Result<(), ConfigError> {
    if !std.is_finite() || std <= 0.0 {
        Err(ConfigError::NotPositive("spatial_std".to_owned(), std))
    } else {
        Ok(())
    }
}

/// Check that the range is finite and ordered.
pub(crate) fn validate_range(range: [f64; 2]) -> Result<(), InvalidRangeError> {
    if !range[0].is_finite() || !range[1].is_finite() {
        Err(InvalidRangeError::NonFinite)
    } else if range[0] >= range[1] {
        Err(InvalidRangeError::Reversed(range[0], range[1]))
    } else {
        Ok(())
    }
}

impl BivariateHistogram {
    /// Start providing histogram parameters.
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> BivariateHistogramBuilder {
        BivariateHistogramBuilder::default()
    }

    /// Check that the parameters are valid. Used after deserialization.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        validate_bins(self.bins)?;
        validate_spatial_std(self.spatial_std)?;
        if let Some(range) = self.range {
            validate_range(range).map_err(ConfigError::InvalidRange)?;
        }

        Ok(())
    }
}

impl BivariateHistogramBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(bins) = self.bins {
            validate_bins(bins).map_err(|e| e.to_string())?;
        }

        if let Some(std) = self.spatial_std {
            validate_spatial_std(std).map_err(|e| e.to_string())?;
        }

        if let Some(Some(range)) = self.range {
            validate_range(range).map_err(|e| e.to_string())?;
        }

        Ok(())
    }
}
