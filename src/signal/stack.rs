// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! Stacks of diffraction frames and masks applied to them.

use getset::Getters;
use ndarray::{Array2, ArrayD, ArrayView2, Axis, CowArray, Ix2};

use crate::errors::{InvalidMaskShapeError, StackError};
use crate::PANIC_MESSAGE;

use super::{check_axis_size, DataAxis};

/// Source of two-dimensional frames indexed by a navigation index.
///
/// This is the seam between `pixstem` and whatever framework holds the data.
/// Implementors may keep all frames in memory (see [`DiffractionStack`]) or
/// materialize each frame on request; every operation of this crate only asks
/// for one frame at a time.
pub trait FrameSource: Sync {
    /// Shape of the navigation dimensions (slowest dimension first).
    /// Empty for a single frame.
    fn navigation_shape(&self) -> &[usize];

    /// Calibration of the navigation dimensions, in the same order as `navigation_shape`.
    fn navigation_axes(&self) -> &[DataAxis];

    /// Calibration of the frame: x-axis (columns) first, y-axis (rows) second.
    fn signal_axes(&self) -> &[DataAxis; 2];

    /// Get the frame at the given navigation index.
    fn frame(&self, index: &[usize]) -> Result<CowArray<'_, f64, Ix2>, StackError>;

    /// Number of frames.
    fn n_frames(&self) -> usize {
        self.navigation_shape().iter().product()
    }

    /// Shape of a single frame as `(rows, columns)`.
    fn signal_shape(&self) -> (usize, usize) {
        let axes = self.signal_axes();
        (axes[1].size(), axes[0].size())
    }

    /// Navigation indices of all frames in row-major order.
    fn frame_indices(&self) -> Vec<Vec<usize>> {
        (0..self.n_frames())
            .map(|flat| unravel_index(flat, self.navigation_shape()))
            .collect()
    }
}

/// Convert a flat row-major index into a multi-dimensional index.
pub(crate) fn unravel_index(mut flat: usize, shape: &[usize]) -> Vec<usize> {
    let mut index = vec![0; shape.len()];
    for (i, &dim) in shape.iter().enumerate().rev() {
        index[i] = flat % dim;
        flat /= dim;
    }

    index
}

/// Check that the navigation index lies inside the navigation shape.
pub(crate) fn check_index(index: &[usize], navigation: &[usize]) -> Result<(), StackError> {
    if index.len() != navigation.len() || index.iter().zip(navigation).any(|(i, n)| i >= n) {
        Err(StackError::IndexOutOfBounds {
            index: index.to_vec(),
            navigation: navigation.to_vec(),
        })
    } else {
        Ok(())
    }
}

/// Stack of diffraction frames held in memory.
///
/// The last two dimensions of the data are the frame rows and columns,
/// all preceding dimensions are navigation dimensions.
#[derive(Debug, Clone, Getters)]
pub struct DiffractionStack {
    #[getset(get = "pub")]
    data: ArrayD<f64>,
    navigation_shape: Vec<usize>,
    navigation_axes: Vec<DataAxis>,
    signal_axes: [DataAxis; 2],
}

impl DiffractionStack {
    /// Create a stack with uncalibrated axes.
    pub fn new(data: ArrayD<f64>) -> Result<DiffractionStack, StackError> {
        let ndim = data.ndim();
        if ndim < 2 {
            return Err(StackError::NotEnoughDimensions(ndim));
        }

        let shape = data.shape();
        let navigation_axes = shape[..ndim - 2]
            .iter()
            .enumerate()
            .map(|(i, &size)| DataAxis::new(&format!("nav{}", i), size))
            .collect();
        let signal_axes = [
            DataAxis::new("x", shape[ndim - 1]),
            DataAxis::new("y", shape[ndim - 2]),
        ];

        DiffractionStack::with_axes(data, navigation_axes, signal_axes)
    }

    /// Create a stack with the provided calibration.
    pub fn with_axes(
        data: ArrayD<f64>,
        navigation_axes: Vec<DataAxis>,
        signal_axes: [DataAxis; 2],
    ) -> Result<DiffractionStack, StackError> {
        let ndim = data.ndim();
        if ndim < 2 {
            return Err(StackError::NotEnoughDimensions(ndim));
        }

        let shape = data.shape().to_vec();
        let (rows, cols) = (shape[ndim - 2], shape[ndim - 1]);
        if rows == 0 || cols == 0 {
            return Err(StackError::EmptyFrames(shape));
        }

        if navigation_axes.len() != ndim - 2 {
            return Err(StackError::AxesCount {
                expected: ndim - 2,
                got: navigation_axes.len(),
            });
        }

        for (axis, &size) in navigation_axes.iter().zip(shape.iter()) {
            check_axis_size(axis, size)?;
        }
        check_axis_size(&signal_axes[0], cols)?;
        check_axis_size(&signal_axes[1], rows)?;

        Ok(DiffractionStack {
            data,
            navigation_shape: shape[..ndim - 2].to_vec(),
            navigation_axes,
            signal_axes,
        })
    }

    /// Shape of the full stack.
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }
}

impl FrameSource for DiffractionStack {
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
        check_index(index, &self.navigation_shape)?;

        let mut view = self.data.view();
        for &i in index {
            view = view.index_axis_move(Axis(0), i);
        }

        let frame = view.into_dimensionality::<Ix2>().unwrap_or_else(|_| {
            panic!(
                "FATAL PIXSTEM ERROR | DiffractionStack::frame | Frame should be two-dimensional. {}",
                PANIC_MESSAGE
            )
        });

        Ok(CowArray::from(frame))
    }
}

/// Boolean masks for a stack of frames. `true` marks pixels that are included.
#[derive(Debug, Clone, PartialEq)]
pub enum MaskStack {
    /// The same mask is applied to every frame.
    Single(Array2<bool>),
    /// Each frame has its own mask; shape is `navigation_shape + (rows, columns)`.
    PerFrame(ArrayD<bool>),
}

impl MaskStack {
    /// Check that the masks can be applied to frames of the given source.
    pub(crate) fn validate<S: FrameSource + ?Sized>(
        &self,
        source: &S,
    ) -> Result<(), InvalidMaskShapeError> {
        let (rows, cols) = source.signal_shape();

        match self {
            MaskStack::Single(mask) => {
                if mask.dim() != (rows, cols) {
                    return Err(InvalidMaskShapeError::Image {
                        mask: mask.shape().to_vec(),
                        image: vec![rows, cols],
                    });
                }
            }
            MaskStack::PerFrame(masks) => {
                let mut expected = source.navigation_shape().to_vec();
                expected.extend([rows, cols]);

                if masks.shape() != expected.as_slice() {
                    return Err(InvalidMaskShapeError::Stack {
                        mask: masks.shape().to_vec(),
                        stack: expected,
                    });
                }
            }
        }

        Ok(())
    }

    /// Get the mask for the frame with the given navigation index.
    /// The mask stack must have been validated against the source.
    pub(crate) fn frame_mask(&self, index: &[usize]) -> ArrayView2<'_, bool> {
        match self {
            MaskStack::Single(mask) => mask.view(),
            MaskStack::PerFrame(masks) => {
                let mut view = masks.view();
                for &i in index {
                    view = view.index_axis_move(Axis(0), i);
                }

                view.into_dimensionality::<Ix2>().unwrap_or_else(|_| {
                    panic!(
                        "FATAL PIXSTEM ERROR | MaskStack::frame_mask | Mask should be two-dimensional. {}",
                        PANIC_MESSAGE
                    )
                })
            }
        }
    }
}
