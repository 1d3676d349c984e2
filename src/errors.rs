// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! This module contains error types that can be returned by the `pixstem` crate.

use colored::Colorize;
use thiserror::Error;

fn shape_to_yellow(shape: &[usize]) -> colored::ColoredString {
    format!("{:?}", shape).yellow()
}

/// Errors that can occur when the input data do not contain enough information
/// to perform the requested calculation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DegenerateInputError {
    #[error("{} array is empty", "error:".red().bold())]
    Empty,

    #[error("{} array is constant (all values are '{}') and cannot be normalized", "error:".red().bold(), .0.to_string().yellow())]
    ConstantArray(f64),

    #[error("{} no values are left after masking and filtering", "error:".red().bold())]
    EmptySelection,

    #[error("{} total intensity of the image is zero, centre of mass is undefined", "error:".red().bold())]
    ZeroMass,

    #[error("{} fitted plane is vertical (z-component of the normal is '{}'), ramp cannot be evaluated", "error:".red().bold(), .0.to_string().yellow())]
    VerticalPlane(f64),

    #[error("{} the stack contains no frames", "error:".red().bold())]
    NoFrames,
}

/// Errors that can occur when a mask does not match the data it is applied to.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidMaskShapeError {
    #[error("{} mask of shape '{}' does not match image of shape '{}'", "error:".red().bold(), shape_to_yellow(.mask), shape_to_yellow(.image))]
    Image { mask: Vec<usize>, image: Vec<usize> },

    #[error("{} mask stack of shape '{}' does not match stack of shape '{}'", "error:".red().bold(), shape_to_yellow(.mask), shape_to_yellow(.stack))]
    Stack { mask: Vec<usize>, stack: Vec<usize> },

    #[error("{} arrays have different shapes ('{}' vs '{}')", "error:".red().bold(), shape_to_yellow(.0), shape_to_yellow(.1))]
    Inconsistent(Vec<usize>, Vec<usize>),
}

/// Errors that can occur when a numeric parameter or range is invalid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidRangeError {
    #[error("{} lower bound '{}' is not smaller than upper bound '{}'", "error:".red().bold(), .0.to_string().yellow(), .1.to_string().yellow())]
    Reversed(f64, f64),

    #[error("{} angle '{}' is outside the interval [0, 2π]", "error:".red().bold(), .0.to_string().yellow())]
    AngleOutOfBounds(f64),

    #[error("{} hue limit '{}' is outside the interval [0, 1]", "error:".red().bold(), .0.to_string().yellow())]
    HueOutOfBounds(f64),

    #[error("{} radius '{}' is negative", "error:".red().bold(), .0.to_string().yellow())]
    NegativeRadius(f64),

    #[error("{} value is not finite", "error:".red().bold())]
    NonFinite,

    #[error("{} value '{}' lies outside of the axis (from '{}' to '{}')", "error:".red().bold(), .value.to_string().yellow(), .low.to_string().yellow(), .high.to_string().yellow())]
    ValueOutsideAxis { value: f64, low: f64, high: f64 },

    #[error("{} radial profile requires '{}' bins but only '{}' were requested", "error:".red().bold(), .required.to_string().yellow(), .requested.to_string().yellow())]
    RadialArrayTooSmall { required: usize, requested: usize },

    #[error("{} histogram range has zero width ('{}')", "error:".red().bold(), .0.to_string().yellow())]
    ZeroWidth(f64),

    #[error("{} requested length '{}' is larger than the radial dimension '{}'", "error:".red().bold(), .0.to_string().yellow(), .1.to_string().yellow())]
    CropTooLong(usize, usize),
}

/// Errors that can occur when constructing or accessing a stack of frames.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StackError {
    #[error("{} stack must have at least 2 dimensions, got '{}'", "error:".red().bold(), .0.to_string().yellow())]
    NotEnoughDimensions(usize),

    #[error("{} frames of the stack are empty (shape '{}')", "error:".red().bold(), shape_to_yellow(.0))]
    EmptyFrames(Vec<usize>),

    #[error("{} expected '{}' axes but got '{}'", "error:".red().bold(), .expected.to_string().yellow(), .got.to_string().yellow())]
    AxesCount { expected: usize, got: usize },

    #[error("{} axis '{}' has size '{}' but the data dimension has size '{}'", "error:".red().bold(), .name.yellow(), .axis.to_string().yellow(), .data.to_string().yellow())]
    AxisSize { name: String, axis: usize, data: usize },

    #[error("{} axis '{}' has a zero or non-finite scale", "error:".red().bold(), .0.yellow())]
    InvalidScale(String),

    #[error("{} centre arrays of shape '{}' do not match navigation shape '{}'", "error:".red().bold(), shape_to_yellow(.centre), shape_to_yellow(.navigation))]
    CentreShape { centre: Vec<usize>, navigation: Vec<usize> },

    #[error("{} navigation index '{}' is outside of navigation shape '{}'", "error:".red().bold(), shape_to_yellow(.index), shape_to_yellow(.navigation))]
    IndexOutOfBounds { index: Vec<usize>, navigation: Vec<usize> },
}

/// Errors that can occur when reading or validating a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{} could not open the configuration file '{}'", "error:".red().bold(), .0.yellow())]
    CouldNotOpenConfig(String),

    #[error("{} could not understand the contents of the configuration file '{}' ({})", "error:".red().bold(), .0.yellow(), .1)]
    CouldNotParseConfig(String, serde_yaml::Error),

    #[error("{} number of threads must be at least 1", "error:".red().bold())]
    InvalidNThreads,

    #[error("{} number of histogram bins must be at least 1", "error:".red().bold())]
    InvalidBins,

    #[error("{} '{}' must be positive and finite, got '{}'", "error:".red().bold(), .0.yellow(), .1.to_string().yellow())]
    NotPositive(String, f64),

    #[error("{} corner size '{}' must lie in the interval (0, 0.5]", "error:".red().bold(), .0.to_string().yellow())]
    InvalidCornerSize(f64),

    #[error("{}", .0)]
    InvalidRange(InvalidRangeError),
}

/// Error raised while processing a single frame of a stack.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("frame '{}': {}", shape_to_yellow(.index), .source)]
pub struct FrameError {
    /// Navigation index of the frame.
    pub index: Vec<usize>,
    /// Cause of the failure.
    pub source: ImageError,
}

/// Errors that can occur when processing a single image.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImageError {
    #[error("{}", .0)]
    Degenerate(#[from] DegenerateInputError),

    #[error("{}", .0)]
    Mask(#[from] InvalidMaskShapeError),

    #[error("{}", .0)]
    Range(#[from] InvalidRangeError),

    #[error("{}", .0)]
    Source(#[from] StackError),
}

/// Errors that can be returned by the stack-level operations.
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("{}", .0)]
    Degenerate(#[from] DegenerateInputError),

    #[error("{}", .0)]
    Mask(#[from] InvalidMaskShapeError),

    #[error("{}", .0)]
    Range(#[from] InvalidRangeError),

    #[error("{}", .0)]
    Stack(#[from] StackError),

    #[error("{} analysis failed for {}", "error:".red().bold(), .0)]
    Frame(#[from] FrameError),

    #[error("{} could not construct a thread pool ({})", "error:".red().bold(), .0)]
    ThreadPool(String),
}
