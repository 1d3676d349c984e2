// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! This module contains structures and methods for specifying parameters of the individual operations.

use crate::errors::ConfigError;

pub mod coloring;
pub mod com;
pub mod config;
pub mod histogram;
pub mod limits;
pub mod radial;
pub mod ramp;
pub mod sector;

pub use coloring::VectorColoring;
pub use com::CentreOfMass;
pub use config::Config;
pub use histogram::BivariateHistogram;
pub use limits::DisplayLimits;
pub use radial::RadialIntegration;
pub use ramp::RampFit;
pub use sector::{AngleSector, SectorCentre};

fn default_one() -> usize {
    1
}

/// Check that at least one thread is requested.
fn validate_n_threads(n_threads: usize) -> Result<(), ConfigError> {
    if n_threads == 0 {
        Err(ConfigError::InvalidNThreads)
    } else {
        Ok(())
    }
}
