// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! Functions and structures used in various integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use approx::assert_relative_eq;
use ndarray::{Array, Array2, ArrayView1, CowArray, Ix2, IxDyn};
use pixstem::errors::StackError;
use pixstem::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Test utility. Stack of frames filled with random values from `[0, 10)`.
#[allow(dead_code)]
pub(super) fn random_stack(shape: &[usize], seed: u64) -> DiffractionStack {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = Array::from_shape_simple_fn(IxDyn(shape), || rng.random_range(0.0..10.0));
    DiffractionStack::new(data).unwrap()
}

/// Test utility. Random centres lying inside frames of the given size.
#[allow(dead_code)]
pub(super) fn random_centres(
    navigation: &[usize],
    rows: usize,
    cols: usize,
    seed: u64,
) -> CentreArrays {
    let mut rng = StdRng::seed_from_u64(seed);
    let x = Array::from_shape_simple_fn(IxDyn(navigation), || {
        rng.random_range(0.0..(cols - 1) as f64)
    });
    let y = Array::from_shape_simple_fn(IxDyn(navigation), || {
        rng.random_range(0.0..(rows - 1) as f64)
    });

    CentreArrays::from_arrays(x, y).unwrap()
}

/// Test utility. Assert that two profiles are the same.
#[allow(dead_code)]
pub(super) fn assert_eq_profiles(a: ArrayView1<f64>, b: ArrayView1<f64>) {
    assert_eq!(a.len(), b.len(), "Profiles have different lengths");
    for (x, y) in a.iter().zip(b.iter()) {
        assert_relative_eq!(x, y, epsilon = 1e-10);
    }
}

/// Frames generated on request. Every frame is a ring of the given radius around `(cx, cy)`
/// shifted by the navigation index along the x-axis.
/// Frames with index listed in `broken` cannot be read.
#[allow(dead_code)]
pub(super) struct GeneratedFrames {
    navigation_shape: Vec<usize>,
    navigation_axes: Vec<DataAxis>,
    signal_axes: [DataAxis; 2],
    centre: (f64, f64),
    radius: f64,
    broken: Vec<Vec<usize>>,
    requests: AtomicUsize,
}

#[allow(dead_code)]
impl GeneratedFrames {
    pub(super) fn new(
        navigation_shape: &[usize],
        rows: usize,
        cols: usize,
        centre: (f64, f64),
        radius: f64,
    ) -> Self {
        GeneratedFrames {
            navigation_shape: navigation_shape.to_vec(),
            navigation_axes: navigation_shape
                .iter()
                .enumerate()
                .map(|(i, &size)| DataAxis::new(&format!("scan{}", i), size))
                .collect(),
            signal_axes: [DataAxis::new("kx", cols), DataAxis::new("ky", rows)],
            centre,
            radius,
            broken: Vec::new(),
            requests: AtomicUsize::new(0),
        }
    }

    pub(super) fn with_broken(mut self, index: &[usize]) -> Self {
        self.broken.push(index.to_vec());
        self
    }

    /// Centre of the ring of the given frame.
    pub(super) fn centre_of(&self, index: &[usize]) -> (f64, f64) {
        let shift = index.last().copied().unwrap_or(0) as f64;
        (self.centre.0 + shift, self.centre.1)
    }

    /// Number of frames requested so far.
    pub(super) fn requests(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }
}

impl FrameSource for GeneratedFrames {
    fn navigation_shape(&self) -> &[usize] {
        &self.navigation_shape
    }

    fn navigation_axes(&self) -> &[DataAxis] {
        &self.navigation_axes
    }

    fn signal_axes(&self) -> &[DataAxis; 2] {
        &self.signal_axes
    }

    fn frame(&self, index: &[usize]) -> Result<CowArray<'_, f64, Ix2>, StackError> {
        self.requests.fetch_add(1, Ordering::Relaxed);

        if self.broken.iter().any(|b| b == index) {
            return Err(StackError::IndexOutOfBounds {
                index: index.to_vec(),
                navigation: self.navigation_shape.clone(),
            });
        }

        let (cx, cy) = self.centre_of(index);
        let (rows, cols) = self.signal_shape();
        let frame = Array2::from_shape_fn((rows, cols), |(y, x)| {
            let r = ((x as f64 - cx).powi(2) + (y as f64 - cy).powi(2)).sqrt();
            if (r - self.radius).abs() < 1.0 {
                10.0
            } else {
                0.0
            }
        });

        Ok(CowArray::from(frame))
    }
}
