// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! This module contains structures for presenting the results of the analysis.

pub mod profiles;

pub use profiles::RadialProfiles;
