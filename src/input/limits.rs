// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! Contains structures and methods for specifying display limits of images.

use derive_builder::Builder;
use getset::CopyGetters;
use serde::Deserialize;

use crate::errors::ConfigError;

/// Parameters for determining the display range (contrast limits) of an image.
#[derive(Debug, Clone, Builder, CopyGetters, Deserialize)]
#[serde(deny_unknown_fields)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct DisplayLimits {
    /// Half-width of the range in multiples of the standard deviation.
    /// The default value is 4.
    #[builder(default = "4.0")]
    #[serde(default = "default_sigma")]
    #[getset(get_copy = "pub")]
    sigma: f64,
    /// Ignore pixels with a value of exactly zero.
    #[builder(setter(custom), default = "false")]
    #[serde(default)]
    #[getset(get_copy = "pub")]
    ignore_zeros: bool,
    /// Ignore a border of 5% of the image size along each axis.
    #[builder(setter(custom), default = "false")]
    #[serde(default)]
    #[getset(get_copy = "pub")]
    ignore_edges: bool,
}

impl Default for DisplayLimits {
    fn default() -> Self {
        DisplayLimits {
            sigma: 4.0,
            ignore_zeros: false,
            ignore_edges: false,
        }
    }
}

fn default_sigma() -> f64 {
    4.0
}

fn validate_sigma(sigma: f64) -> Result<(), ConfigError> {
    if !sigma.is_finite() || sigma <= 0.0 {
        Err(ConfigError::NotPositive("sigma".to_owned(), sigma))
    } else {
        Ok(())
    }
}

impl DisplayLimits {
    /// Start providing display limit parameters.
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> DisplayLimitsBuilder {
        DisplayLimitsBuilder::default()
    }

    /// Check that the parameters are valid. Used after deserialization.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        validate_sigma(self.sigma)
    }
}

impl DisplayLimitsBuilder {
    /// Ignore pixels with a value of exactly zero.
    #[inline(always)]
    pub fn ignore_zeros(&mut self) -> &mut Self {
        self.ignore_zeros = Some(true);
        self
    }

    /// Ignore a border of 5% of the image size along each axis.
    #[inline(always)]
    pub fn ignore_edges(&mut self) -> &mut Self {
        self.ignore_edges = Some(true);
        self
    }

    fn validate(&self) -> Result<(), String> {
        if let Some(sigma) = self.sigma {
            validate_sigma(sigma).map_err(|e| e.to_string())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn limits_pass() {
        let limits = DisplayLimits::new().build().unwrap();
        assert_relative_eq!(limits.sigma(), 4.0);
        assert!(!limits.ignore_zeros());
        assert!(!limits.ignore_edges());

        let limits = DisplayLimits::new()
            .sigma(2.0)
            .ignore_zeros()
            .ignore_edges()
            .build()
            .unwrap();
        assert_relative_eq!(limits.sigma(), 2.0);
        assert!(limits.ignore_zeros());
        assert!(limits.ignore_edges());
    }

    #[test]
    fn limits_fail_sigma() {
        match DisplayLimits::new().sigma(f64::NAN).build() {
            Ok(_) => panic!("Function should have failed but it succeeded."),
            Err(DisplayLimitsBuilderError::ValidationError(x)) => assert!(x.contains("sigma")),
            Err(e) => panic!("Unexpected error type returned {}", e),
        }
    }
}
