// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! Azimuthal averaging of images around a centre.

use ndarray::{s, Array1, ArrayView2, IxDyn};

use crate::errors::{
    DegenerateInputError, ImageError, InvalidMaskShapeError, InvalidRangeError, ProcessingError,
};
use crate::input::RadialIntegration;
use crate::presentation::RadialProfiles;
use crate::signal::{CentreArrays, FrameSource, MaskStack};
use crate::PANIC_MESSAGE;

use super::{frame_tasks, process_frames};

/// Calculate the radial profile of an image around the given centre.
///
/// Every pixel `(x, y)` (with `mask[[y, x]]` true, if a mask is provided) is assigned to
/// the bin `floor(sqrt((x - centre_x)² + (y - centre_y)²))` and the profile contains the mean
/// intensity of each bin. Bins with no pixels are zero.
///
/// The returned profile always has `radial_array_size` elements.
/// Fails if any pixel lands in a bin that does not fit into the profile.
///
/// ## Example
/// ```
/// use ndarray::Array2;
/// use pixstem::prelude::*;
///
/// let image = Array2::from_elem((5, 5), 5.0);
/// let profile = radial_profile(image.view(), 2.0, 2.0, 3, None).unwrap();
/// assert_eq!(profile.to_vec(), vec![5.0, 5.0, 5.0]);
/// ```
pub fn radial_profile(
    image: ArrayView2<f64>,
    centre_x: f64,
    centre_y: f64,
    radial_array_size: usize,
    mask: Option<ArrayView2<bool>>,
) -> Result<Array1<f64>, ImageError> {
    if let Some(mask) = mask {
        if mask.dim() != image.dim() {
            return Err(InvalidMaskShapeError::Image {
                mask: mask.shape().to_vec(),
                image: image.shape().to_vec(),
            }
            .into());
        }
    }

    if !centre_x.is_finite() || !centre_y.is_finite() {
        return Err(InvalidRangeError::NonFinite.into());
    }

    let mut sums = vec![0.0; radial_array_size];
    let mut counts = vec![0usize; radial_array_size];
    let mut required = 0;

    for ((y, x), &value) in image.indexed_iter() {
        if mask.is_some_and(|m| !m[[y, x]]) {
            continue;
        }

        let dx = x as f64 - centre_x;
        let dy = y as f64 - centre_y;
        let bin = (dx * dx + dy * dy).sqrt() as usize;

        if bin >= radial_array_size {
            required = required.max(bin + 1);
            continue;
        }

        sums[bin] += value;
        counts[bin] += 1;
    }

    if required > 0 {
        return Err(InvalidRangeError::RadialArrayTooSmall {
            required,
            requested: radial_array_size,
        }
        .into());
    }

    Ok(sums
        .into_iter()
        .zip(counts)
        .map(|(sum, count)| sum / count.max(1) as f64)
        .collect())
}

/// Number of radial bins needed to hold the profile of a `width` x `height` image
/// centred at `(centre_x, centre_y)`.
pub fn frame_radial_size(
    width: usize,
    height: usize,
    centre_x: f64,
    centre_y: f64,
) -> Result<usize, InvalidRangeError> {
    if !centre_x.is_finite() || !centre_y.is_finite() {
        return Err(InvalidRangeError::NonFinite);
    }

    let last_x = width.saturating_sub(1) as f64;
    let last_y = height.saturating_sub(1) as f64;

    let farthest = [(0.0, 0.0), (last_x, 0.0), (0.0, last_y), (last_x, last_y)]
        .into_iter()
        .map(|(x, y)| distance(x, y, centre_x, centre_y))
        .fold(0.0, f64::max);

    Ok(farthest as usize + 1)
}

/// Largest distance between a corner of a `width` x `height` image and the extreme centres.
///
/// Each image corner is paired with the opposite corner of the bounding box of all centres,
/// so that the result bounds the distance of any pixel from any of the centres.
///
/// ## Example
/// ```
/// use pixstem::prelude::*;
///
/// assert_eq!(find_longest_distance(100, 100, 50.0, 50.0, 50.0, 50.0), 70);
/// assert_eq!(find_longest_distance(100, 100, 40.0, 50.0, 60.0, 50.0), 78);
/// ```
pub fn find_longest_distance(
    width: usize,
    height: usize,
    centre_x_min: f64,
    centre_y_min: f64,
    centre_x_max: f64,
    centre_y_max: f64,
) -> usize {
    let width = width as f64;
    let height = height as f64;

    let distances = [
        distance(width, height, centre_x_min, centre_y_min),
        distance(0.0, height, centre_x_max, centre_y_min),
        distance(width, 0.0, centre_x_min, centre_y_max),
        distance(0.0, 0.0, centre_x_max, centre_y_max),
    ];

    distances.into_iter().fold(0.0, f64::max) as usize
}

#[inline(always)]
fn distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    ((x1 - x2).powi(2) + (y1 - y2).powi(2)).sqrt()
}

impl RadialIntegration {
    /// Calculate the radial profile of every frame of the source.
    ///
    /// `centres` must have the navigation shape of the source. All profiles share the same length
    /// which is large enough for the most extreme centre; bins beyond the extent of a frame are zero.
    /// Frames that cannot be integrated are zero and listed in the results,
    /// unless `strict` is set in which case the integration fails.
    pub fn run<S: FrameSource + ?Sized>(
        &self,
        source: &S,
        centres: &CentreArrays,
        masks: Option<&MaskStack>,
    ) -> Result<RadialProfiles, ProcessingError> {
        if source.n_frames() == 0 {
            return Err(DegenerateInputError::NoFrames.into());
        }

        centres.validate(source)?;
        if let Some(masks) = masks {
            masks.validate(source)?;
        }

        let extremes = [
            centres.min_x(),
            centres.min_y(),
            centres.max_x(),
            centres.max_y(),
        ];
        if extremes.iter().any(|v| !v.is_finite()) {
            return Err(InvalidRangeError::NonFinite.into());
        }

        let (rows, cols) = source.signal_shape();
        let radial_array_size = find_longest_distance(
            cols,
            rows,
            extremes[0],
            extremes[1],
            extremes[2],
            extremes[3],
        ) + 1;

        log::info!(
            "Radially integrating {} frames using {} thread(s)...",
            source.n_frames(),
            self.n_threads()
        );
        log::debug!("Radial array size: {}", radial_array_size);

        let tasks = frame_tasks(source, Some(centres), masks);
        let (output, skipped) = process_frames(
            source,
            &tasks,
            radial_array_size,
            self.n_threads(),
            self.strict(),
            |task, image, mut row| {
                let (centre_x, centre_y) = task.centre.unwrap_or_else(|| {
                    panic!(
                        "FATAL PIXSTEM ERROR | RadialIntegration::run | Every task should have a centre. {}",
                        PANIC_MESSAGE
                    )
                });

                let (rows, cols) = image.dim();
                let size = frame_radial_size(cols, rows, centre_x, centre_y)?;
                if size > radial_array_size {
                    return Err(InvalidRangeError::RadialArrayTooSmall {
                        required: size,
                        requested: radial_array_size,
                    }
                    .into());
                }

                let profile = radial_profile(image, centre_x, centre_y, size, task.mask)?;
                row.slice_mut(s![..size]).assign(&profile);
                Ok(())
            },
        )?;

        let mut shape = source.navigation_shape().to_vec();
        shape.push(radial_array_size);
        let data = output.into_shape_with_order(IxDyn(&shape)).unwrap_or_else(|_| {
            panic!(
                "FATAL PIXSTEM ERROR | RadialIntegration::run | Output buffer should match the navigation shape. {}",
                PANIC_MESSAGE
            )
        });

        let radial_axis = source.signal_axes()[0]
            .with_name("radius")
            .with_offset(0.0)
            .with_size(radial_array_size);

        log::info!(
            "Radial integration finished ({} frame(s) skipped).",
            skipped.len()
        );

        Ok(RadialProfiles::new(
            data,
            source.navigation_axes().to_vec(),
            radial_axis,
            skipped,
        ))
    }
}
