// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! # pixstem: Radial integration and image tools for pixelated STEM data
//!
//! Crate for processing four-dimensional scanning transmission electron microscopy (4D-STEM) datasets,
//! i.e. stacks of two-dimensional diffraction frames recorded at every probe position of a scan.
//!
//! `pixstem` can
//! - calculate radial (azimuthally averaged) profiles of all frames of a stack, in parallel,
//! - construct circular and angular sector masks,
//! - calculate the centre of mass of the frames,
//! - fit and subtract planar background ramps,
//! - determine display limits of images,
//! - construct bivariate histograms of beam shifts and colour vector fields.
//!
//! ## Usage
//!
//! Run:
//!
//! ```bash
//! $ cargo add pixstem
//! ```
//!
//! Import the crate in your Rust code:
//!
//! ```rust
//! use pixstem::prelude::*;
//! ```
//!
//! ## Frame sources
//!
//! All stack-level operations read frames through the [`FrameSource`](crate::signal::FrameSource) trait.
//! [`DiffractionStack`](crate::signal::DiffractionStack) holds all frames in memory,
//! but the trait can be implemented for any container that is able to provide one frame at a time.
//!
//! ## Examples
//!
//! Radial integration of a stack with the centre of every frame determined by its centre of mass.
//! ```
//! use ndarray::{Array, IxDyn};
//! use pixstem::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     // 3x4 scan of 32x32 pixel frames
//!     let data = Array::from_shape_fn(IxDyn(&[3, 4, 32, 32]), |idx| {
//!         let dx = idx[3] as f64 - 15.0;
//!         let dy = idx[2] as f64 - 16.0;
//!         (-(dx * dx + dy * dy) / 20.0).exp()
//!     });
//!     let stack = DiffractionStack::new(data)?;
//!
//!     // activate colog if you want logging (requires the `colog` crate)
//!     colog::init();
//!
//!     // centre of every frame
//!     let centres = CentreOfMass::new()
//!             .threshold(0.5)                            // binarize frames before the calculation
//!             .n_threads(2)                              // number of threads to use
//!             .build()?
//!             .run(&stack, None)?;
//!
//!     // radial profile of every frame
//!     let profiles = RadialIntegration::new()
//!             .n_threads(2)                              // number of threads to use
//!             .build()?
//!             .run(&stack, &centres, None)?;             // no masks are applied
//!
//!     assert_eq!(profiles.navigation_shape(), &[3, 4]);
//!     assert!(profiles.skipped_frames().is_empty());
//!
//!     // drop the trailing bins which are zero for some frames
//!     let profiles = profiles.crop(profiles.lowest_zero_index())?;
//!     println!("{:?}", profiles.profile(&[0, 0]));
//!
//!     Ok(())
//! }
//! ```
//!
//! ***
//!
//! Parameters of all operations can also be loaded from a YAML file.
//!
//! ```no_run
//! use pixstem::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let config = Config::from_file("pixstem.yaml")?;
//!
//!     let image = ndarray::Array2::from_shape_fn((64, 64), |(y, x)| (x + 2 * y) as f64);
//!     let flat = config.ramp().subtract_ramp(&Signal2D::new(image))?;
//!     let (low, high) = config.limits().compute(flat.view())?;
//!     println!("Display range: {} to {}", low, high);
//!
//!     Ok(())
//! }
//! ```

/// Version of the `pixstem` crate.
pub const PIXSTEM_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Message that should be added to every panic.
pub(crate) const PANIC_MESSAGE: &str =
    "\n\n\n            >>> THIS SHOULD NOT HAVE HAPPENED! PLEASE REPORT THIS ERROR <<<\n\n";

mod analysis;
pub mod errors;
pub mod input;
pub mod presentation;
pub mod signal;

/// This module contains re-exported public structures and functions of the `pixstem` crate.
pub mod prelude {
    pub use super::input::{
        coloring::VectorColoringBuilder, com::CentreOfMassBuilder,
        histogram::BivariateHistogramBuilder, limits::DisplayLimitsBuilder,
        radial::RadialIntegrationBuilder, ramp::RampFitBuilder, AngleSector, BivariateHistogram,
        CentreOfMass, Config, DisplayLimits, RadialIntegration, RampFit, SectorCentre,
        VectorColoring,
    };

    pub use super::analysis::{
        color::hsv_to_rgb,
        com::centre_of_mass,
        limits::normalize_array,
        mask::make_circular_mask,
        radial::{find_longest_distance, frame_radial_size, radial_profile},
        ramp::{fit_plane, Plane},
    };

    pub use super::presentation::RadialProfiles;

    pub use super::signal::{
        CentreArrays, DataAxis, DiffractionStack, FrameSource, MaskStack, Signal2D,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_message_asks_for_report() {
        assert!(PANIC_MESSAGE.contains("PLEASE REPORT THIS ERROR"));
        assert!(!PANIC_MESSAGE.contains('@'));
    }
}
