// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! Contains the implementation of the `Config` structure collecting parameters of all operations.

use std::fs::read_to_string;
use std::path::Path;

use getset::Getters;
use serde::Deserialize;

use crate::errors::ConfigError;

use super::{
    AngleSector, BivariateHistogram, CentreOfMass, DisplayLimits, RadialIntegration, RampFit,
    VectorColoring,
};

/// Parameters of a processing session, typically read from a yaml file.
/// Every section is optional and takes its default values if not provided.
///
/// ```yaml
/// radial:
///   n_threads: 4
/// histogram:
///   bins: 100
///   range: [-1.0, 1.0]
/// sector: { angle0: 0.0, angle1: 3.14 }
/// ```
#[derive(Debug, Clone, Default, Getters, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Radial integration.
    #[serde(default, alias = "radial_integration")]
    #[getset(get = "pub")]
    radial: RadialIntegration,
    /// Centre of mass calculation.
    #[serde(default, alias = "com")]
    #[getset(get = "pub")]
    centre_of_mass: CentreOfMass,
    /// Bivariate histogram.
    #[serde(default)]
    #[getset(get = "pub")]
    histogram: BivariateHistogram,
    /// Display limits.
    #[serde(default)]
    #[getset(get = "pub")]
    limits: DisplayLimits,
    /// Background ramp fit.
    #[serde(default)]
    #[getset(get = "pub")]
    ramp: RampFit,
    /// Colouring of vector fields.
    #[serde(default, alias = "colouring")]
    #[getset(get = "pub")]
    coloring: VectorColoring,
    /// Angular sector used for masking.
    /// If not specified, no sector is defined.
    #[serde(default)]
    #[getset(get = "pub")]
    sector: Option<AngleSector>,
}

impl Config {
    /// Read the configuration from a yaml file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let name = path.as_ref().to_string_lossy().into_owned();

        let string =
            read_to_string(&path).map_err(|_| ConfigError::CouldNotOpenConfig(name.clone()))?;
        let config: Config = serde_yaml::from_str(&string)
            .map_err(|e| ConfigError::CouldNotParseConfig(name.clone(), e))?;

        config.validate()?;
        log::debug!("Read configuration from '{}'.", name);
        Ok(config)
    }

    /// Check that all sections are valid. Used after deserialization.
    fn validate(&self) -> Result<(), ConfigError> {
        self.radial.validate()?;
        self.centre_of_mass.validate()?;
        self.histogram.validate()?;
        self.limits.validate()?;
        self.ramp.validate()?;
        self.coloring.validate()?;
        if let Some(sector) = &self.sector {
            sector.validate().map_err(ConfigError::InvalidRange)?;
        }

        Ok(())
    }
}
