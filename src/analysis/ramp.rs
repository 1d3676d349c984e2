// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! Fitting of a planar background (ramp) to the corners of an image.

use std::ops::Range;

use nalgebra::{Matrix3, SymmetricEigen, Vector3};
use ndarray::{s, Array2};

use crate::errors::DegenerateInputError;
use crate::input::RampFit;
use crate::signal::{DataAxis, Signal2D};

/// Planes with the magnitude of the z-component of the normal below this value are vertical.
const VERTICAL_LIMIT: f64 = 1e-12;

/// Plane `a·x + b·y + c·z + d = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal `(a, b, c)` of the plane.
    pub normal: [f64; 3],
    /// Offset `d` of the plane.
    pub offset: f64,
}

impl Plane {
    /// Height of the plane at `(x, y)`.
    ///
    /// Fails if the plane is vertical.
    pub fn z(&self, x: f64, y: f64) -> Result<f64, DegenerateInputError> {
        let [a, b, c] = self.normal;
        if c.abs() < VERTICAL_LIMIT {
            return Err(DegenerateInputError::VerticalPlane(c));
        }

        Ok(-(a * x + b * y + self.offset) / c)
    }
}

/// Fit a plane to a set of points minimizing the sum of squared perpendicular distances.
///
/// The normal of the plane is the eigenvector of the scatter matrix of the points
/// with the smallest eigenvalue; the plane passes through the centroid of the points.
/// At least three points are required.
pub fn fit_plane(points: &[[f64; 3]]) -> Result<Plane, DegenerateInputError> {
    if points.len() < 3 {
        return Err(DegenerateInputError::Empty);
    }

    let centroid = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + Vector3::from(*p))
        / points.len() as f64;

    let scatter = points.iter().fold(Matrix3::zeros(), |acc, p| {
        let diff = Vector3::from(*p) - centroid;
        acc + diff * diff.transpose()
    });

    let eigen = SymmetricEigen::new(scatter);
    let smallest = eigen
        .eigenvalues
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i)
        .unwrap_or(0);

    let normal = eigen.eigenvectors.column(smallest).normalize();

    Ok(Plane {
        normal: [normal[0], normal[1], normal[2]],
        offset: -normal.dot(&centroid),
    })
}

/// Index ranges of the low and the high corner of an axis.
fn corner_ranges(axis: &DataAxis, corner_size: f64) -> [Range<usize>; 2] {
    let n = axis.size();
    let extent = n.saturating_sub(1) as f64 * corner_size;

    let low_end = ((extent + 1.0).round_ties_even() as usize).clamp(1, n);
    let high_start =
        ((n.saturating_sub(1) as f64 - extent).round_ties_even() as usize).min(n.saturating_sub(1));

    [0..low_end, high_start..n]
}

/// Mean value of the axis over the given index range.
fn mean_value(axis: &DataAxis, range: &Range<usize>) -> f64 {
    axis.value(range.start) + (range.len() - 1) as f64 * 0.5 * axis.scale()
}

impl RampFit {
    /// Sample the four corners of the signal.
    ///
    /// Returns `(mean x value, mean y value, mean intensity)` for each corner,
    /// in the order (low x, low y), (low x, high y), (high x, low y), (high x, high y).
    pub fn corner_values(&self, signal: &Signal2D) -> Result<[[f64; 3]; 4], DegenerateInputError> {
        if signal.data().is_empty() {
            return Err(DegenerateInputError::Empty);
        }

        let x_ranges = corner_ranges(signal.x_axis(), self.corner_size());
        let y_ranges = corner_ranges(signal.y_axis(), self.corner_size());

        let mut corners = [[0.0; 3]; 4];
        for (i, x_range) in x_ranges.iter().enumerate() {
            for (j, y_range) in y_ranges.iter().enumerate() {
                let region = signal
                    .data()
                    .slice(s![y_range.clone(), x_range.clone()]);
                let intensity = region.sum() / region.len() as f64;

                corners[2 * i + j] = [
                    mean_value(signal.x_axis(), x_range),
                    mean_value(signal.y_axis(), y_range),
                    intensity,
                ];
            }
        }

        Ok(corners)
    }

    /// Fit a plane to the corners of the signal and evaluate it at every pixel.
    ///
    /// The returned signal has the same shape and axes as the input.
    pub fn fit_ramp(&self, signal: &Signal2D) -> Result<Signal2D, DegenerateInputError> {
        let corners = self.corner_values(signal)?;
        let plane = fit_plane(&corners)?;
        log::debug!(
            "Fitted ramp plane: normal {:?}, offset {}",
            plane.normal,
            plane.offset
        );

        // z = z0 + gx·x + gy·y
        let z0 = plane.z(0.0, 0.0)?;
        let [a, b, c] = plane.normal;
        let (gx, gy) = (-a / c, -b / c);

        let xs = signal.x_axis().values();
        let ys = signal.y_axis().values();
        let ramp = Array2::from_shape_fn(signal.data().dim(), |(row, col)| {
            z0 + gx * xs[col] + gy * ys[row]
        });

        Ok(Signal2D::from_parts(ramp, signal.axes().clone()))
    }

    /// Subtract the fitted ramp from the signal.
    pub fn subtract_ramp(&self, signal: &Signal2D) -> Result<Signal2D, DegenerateInputError> {
        let ramp = self.fit_ramp(signal)?;
        Ok(Signal2D::from_parts(
            signal.data() - ramp.data(),
            signal.axes().clone(),
        ))
    }
}
