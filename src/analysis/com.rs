// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! Centre of mass of images.

use ndarray::{ArrayView2, Axis, IxDyn};

use crate::errors::{DegenerateInputError, ImageError, InvalidMaskShapeError, ProcessingError};
use crate::input::CentreOfMass;
use crate::signal::{CentreArrays, FrameSource, MaskStack};
use crate::PANIC_MESSAGE;

use super::{frame_tasks, process_frames};

/// Calculate the intensity-weighted centre of an image in pixel coordinates.
///
/// Only pixels with `mask[[y, x]]` true are considered, if a mask is provided.
/// If `threshold` is provided, the image is binarized first: pixels with intensity
/// lower than or equal to `threshold` times the mean intensity of the considered
/// pixels become 0, all other pixels become 1.
///
/// Returns the centre as `(x, y)`.
///
/// ## Example
/// ```
/// use ndarray::Array2;
/// use pixstem::prelude::*;
///
/// let mut image = Array2::zeros((5, 7));
/// image[[1, 4]] = 10.0;
/// let (x, y) = centre_of_mass(image.view(), None, None).unwrap();
/// assert_eq!((x, y), (4.0, 1.0));
/// ```
pub fn centre_of_mass(
    image: ArrayView2<f64>,
    threshold: Option<f64>,
    mask: Option<ArrayView2<bool>>,
) -> Result<(f64, f64), ImageError> {
    if let Some(mask) = mask {
        if mask.dim() != image.dim() {
            return Err(InvalidMaskShapeError::Image {
                mask: mask.shape().to_vec(),
                image: image.shape().to_vec(),
            }
            .into());
        }
    }

    let included = |y: usize, x: usize| mask.is_none_or(|m| m[[y, x]]);

    let limit = match threshold {
        Some(threshold) => {
            let (sum, count) = image
                .indexed_iter()
                .filter(|&((y, x), _)| included(y, x))
                .fold((0.0, 0usize), |(sum, count), (_, &v)| (sum + v, count + 1));

            if count == 0 {
                return Err(DegenerateInputError::EmptySelection.into());
            }

            Some(sum / count as f64 * threshold)
        }
        None => None,
    };

    let mut total = 0.0;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    for ((y, x), &value) in image.indexed_iter() {
        if !included(y, x) {
            continue;
        }

        let weight = match limit {
            Some(limit) if value <= limit => 0.0,
            Some(_) => 1.0,
            None => value,
        };

        total += weight;
        sum_x += weight * x as f64;
        sum_y += weight * y as f64;
    }

    if total == 0.0 || !total.is_finite() {
        return Err(DegenerateInputError::ZeroMass.into());
    }

    Ok((sum_x / total, sum_y / total))
}

impl CentreOfMass {
    /// Calculate the centre of mass of every frame of the source.
    ///
    /// Fails if the centre of mass of any frame cannot be calculated.
    pub fn run<S: FrameSource + ?Sized>(
        &self,
        source: &S,
        masks: Option<&MaskStack>,
    ) -> Result<CentreArrays, ProcessingError> {
        if source.n_frames() == 0 {
            return Err(DegenerateInputError::NoFrames.into());
        }

        if let Some(masks) = masks {
            masks.validate(source)?;
        }

        log::info!(
            "Calculating centre of mass of {} frames using {} thread(s)...",
            source.n_frames(),
            self.n_threads()
        );

        let threshold = self.threshold();
        let tasks = frame_tasks(source, None, masks);
        let (output, _) = process_frames(
            source,
            &tasks,
            2,
            self.n_threads(),
            true,
            |task, image, mut row| {
                let (x, y) = centre_of_mass(image, threshold, task.mask)?;
                row[0] = x;
                row[1] = y;
                Ok(())
            },
        )?;

        let navigation = IxDyn(source.navigation_shape());
        let reshape = |column: usize| {
            output
                .index_axis(Axis(1), column)
                .to_owned()
                .into_shape_with_order(navigation.clone())
                .unwrap_or_else(|_| {
                    panic!(
                        "FATAL PIXSTEM ERROR | CentreOfMass::run | Output buffer should match the navigation shape. {}",
                        PANIC_MESSAGE
                    )
                })
        };

        let centres = CentreArrays::from_arrays(reshape(0), reshape(1))?;
        log::info!("Centre of mass calculation finished.");

        Ok(centres)
    }
}
