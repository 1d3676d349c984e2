// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! Construction of geometric masks over image grids.

use std::f64::consts::PI;

use ndarray::{Array2, ArrayD, Axis, Ix2, IxDyn};

use crate::errors::{InvalidRangeError, ProcessingError};
use crate::input::{AngleSector, SectorCentre};
use crate::signal::FrameSource;
use crate::PANIC_MESSAGE;

/// Make a circular mask for a region of an image.
///
/// Returns an array of shape `(size_y, size_x)` in which pixel `(x, y)` is `true`
/// if `(x - centre_x)² + (y - centre_y)² <= radius²`. Pixels exactly at `radius` are included.
///
/// ## Example
/// ```
/// use pixstem::prelude::*;
///
/// let mask = make_circular_mask(4.0, 4.0, 9, 9, 2.0).unwrap();
/// assert!(mask[[4, 4]]);
/// assert!(mask[[6, 4]]);
/// assert!(!mask[[7, 4]]);
/// ```
pub fn make_circular_mask(
    centre_x: f64,
    centre_y: f64,
    size_x: usize,
    size_y: usize,
    radius: f64,
) -> Result<Array2<bool>, InvalidRangeError> {
    if !centre_x.is_finite() || !centre_y.is_finite() || !radius.is_finite() {
        return Err(InvalidRangeError::NonFinite);
    }

    if radius < 0.0 {
        return Err(InvalidRangeError::NegativeRadius(radius));
    }

    let radius2 = radius * radius;
    Ok(Array2::from_shape_fn((size_y, size_x), |(y, x)| {
        let dx = x as f64 - centre_x;
        let dy = y as f64 - centre_y;
        dx * dx + dy * dy <= radius2
    }))
}

impl AngleSector {
    /// Construct a mask selecting pixels of every frame whose angle around the centre lies
    /// strictly inside the sector. The mask has the shape of the full stack.
    ///
    /// Angles are calculated in the calibrated coordinates of the frame. If a centre is provided,
    /// the offsets of the signal axes are replaced by the negative centre coordinates,
    /// i.e. the coordinate of pixel `i` is `i * scale - centre`.
    pub fn mask<S: FrameSource + ?Sized>(
        &self,
        source: &S,
        centre: SectorCentre,
    ) -> Result<ArrayD<bool>, ProcessingError> {
        if let SectorCentre::PerFrame(centres) = centre {
            centres.validate(source)?;
        }

        let (rows, cols) = source.signal_shape();
        let mut shape = source.navigation_shape().to_vec();
        shape.extend([rows, cols]);
        let mut mask = ArrayD::from_elem(IxDyn(&shape), false);

        let axes = source.signal_axes();

        for index in source.frame_indices() {
            let (x_axis, y_axis) = match centre {
                SectorCentre::Calibrated => (axes[0].clone(), axes[1].clone()),
                SectorCentre::Fixed { x, y } => (axes[0].with_offset(-x), axes[1].with_offset(-y)),
                SectorCentre::PerFrame(centres) => {
                    let (x, y) = centres.get(&index).unwrap_or_else(|| {
                        panic!(
                            "FATAL PIXSTEM ERROR | AngleSector::mask | Centre arrays should match the navigation shape. {}",
                            PANIC_MESSAGE
                        )
                    });
                    (axes[0].with_offset(-x), axes[1].with_offset(-y))
                }
            };

            let mut frame = mask.view_mut();
            for &i in &index {
                frame = frame.index_axis_move(Axis(0), i);
            }

            let mut frame = frame.into_dimensionality::<Ix2>().unwrap_or_else(|_| {
                panic!(
                    "FATAL PIXSTEM ERROR | AngleSector::mask | Frame mask should be two-dimensional. {}",
                    PANIC_MESSAGE
                )
            });

            let xs = x_axis.values();
            let ys = y_axis.values();
            for ((row, col), value) in frame.indexed_iter_mut() {
                let angle = ys[row].atan2(xs[col]) + PI;
                *value = self.contains(angle);
            }
        }

        Ok(mask)
    }
}
