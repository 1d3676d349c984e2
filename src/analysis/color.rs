// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! Conversion of vector fields into RGB images.

use ndarray::{Array2, Array3, ArrayView2, Axis, Zip};

use crate::errors::{InvalidMaskShapeError, ProcessingError};
use crate::input::VectorColoring;

use super::limits::normalize_array;

/// Convert a colour from HSV to RGB. All components lie in `[0, 1]`.
///
/// ## Example
/// ```
/// use pixstem::prelude::*;
///
/// assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), [1.0, 0.0, 0.0]);
/// assert_eq!(hsv_to_rgb(0.5, 1.0, 1.0), [0.0, 1.0, 1.0]);
/// ```
pub fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> [f64; 3] {
    if saturation == 0.0 {
        return [value, value, value];
    }

    let sector = (hue * 6.0).floor();
    let f = hue * 6.0 - sector;
    let p = value * (1.0 - saturation);
    let q = value * (1.0 - saturation * f);
    let t = value * (1.0 - saturation * (1.0 - f));

    match (sector as i64).rem_euclid(6) {
        0 => [value, t, p],
        1 => [q, value, p],
        2 => [p, value, t],
        3 => [p, q, value],
        4 => [t, p, value],
        _ => [value, p, q],
    }
}

impl VectorColoring {
    /// Convert a vector field given by its angle (in radians) and magnitude into an RGB image
    /// of shape `(rows, columns, 3)`.
    ///
    /// The angle determines the hue and the magnitude determines the value of the colour.
    /// Saturation is always 1.
    ///
    /// Angles are rotated and wrapped into `[0, max_angle)` only if the rotation is non-zero.
    /// With angle limits, the clipped angles are used as the hue directly.
    pub fn rgb(
        &self,
        angle: ArrayView2<f64>,
        magnitude: ArrayView2<f64>,
    ) -> Result<Array3<f64>, ProcessingError> {
        if angle.dim() != magnitude.dim() {
            return Err(InvalidMaskShapeError::Inconsistent(
                angle.shape().to_vec(),
                magnitude.shape().to_vec(),
            )
            .into());
        }

        let angle = if self.rotation() != 0.0 {
            let rotation = self.rotation().to_radians();
            angle.mapv(|a| (a + rotation).rem_euclid(self.max_angle()))
        } else {
            angle.to_owned()
        };

        let hue = match self.angle_limits() {
            Some([low, high]) => angle.mapv(|a| a.clamp(low, high)),
            None => normalize_array(angle.view(), 1.0)?,
        };

        let value = match self.magnitude_limits() {
            Some([low, high]) => {
                normalize_array(magnitude.mapv(|m| m.clamp(low, high)).view(), 1.0)?
            }
            None => normalize_array(magnitude, 1.0)?,
        };

        Ok(hsv_image(&hue, &value))
    }
}

/// Assemble an RGB image from hue and value planes (saturation 1).
fn hsv_image(hue: &Array2<f64>, value: &Array2<f64>) -> Array3<f64> {
    let (rows, cols) = hue.dim();
    let mut rgb = Array3::zeros((rows, cols, 3));

    Zip::from(rgb.lanes_mut(Axis(2)))
        .and(hue)
        .and(value)
        .for_each(|mut pixel, &h, &v| {
            let [r, g, b] = hsv_to_rgb(h, 1.0, v);
            pixel[0] = r;
            pixel[1] = g;
            pixel[2] = b;
        });

    rgb
}
