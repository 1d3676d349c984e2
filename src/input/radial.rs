// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! Contains structures and methods for specifying the radial integration of a stack.

use derive_builder::Builder;
use getset::CopyGetters;
use serde::Deserialize;

use crate::errors::ConfigError;

use super::{default_one, validate_n_threads};

/// Parameters of the radial integration of a stack of diffraction frames.
#[derive(Debug, Clone, Builder, CopyGetters, Deserialize)]
#[serde(deny_unknown_fields)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct RadialIntegration {
    /// Number of threads to use for the integration.
    /// If not specified, the default value is 1.
    #[builder(default = "1")]
    #[serde(default = "default_one")]
    #[getset(get_copy = "pub")]
    n_threads: usize,
    /// Abort the whole integration if any frame fails.
    /// If `false` (default), failed frames are left zero and reported in the results.
    #[builder(setter(custom), default = "false")]
    #[serde(default)]
    #[getset(get_copy = "pub")]
    strict: bool,
}

impl Default for RadialIntegration {
    fn default() -> Self {
        RadialIntegration {
            n_threads: 1,
            strict: false,
        }
    }
}

impl RadialIntegration {
    /// Start providing radial integration parameters.
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> RadialIntegrationBuilder {
        RadialIntegrationBuilder::default()
    }

    /// Check that the parameters are valid. Used after deserialization.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        validate_n_threads(self.n_threads)
    }
}

impl RadialIntegrationBuilder {
    /// Abort the whole integration if any frame fails.
    #[inline(always)]
    pub fn strict(&mut self) -> &mut Self {
        self.strict = Some(true);
        self
    }

    fn validate(&self) -> Result<(), String> {
        if let Some(n_threads) = self.n_threads {
            validate_n_threads(n_threads).map_err(|e| e.to_string())?;
        }

        Ok(())
    }
}
