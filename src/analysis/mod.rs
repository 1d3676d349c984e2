// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! This module contains the implementation of the analysis logic.

use ndarray::{Array2, ArrayView2, ArrayViewMut1, Axis};
use rayon::prelude::*;

use crate::errors::{FrameError, ImageError, ProcessingError};
use crate::signal::{CentreArrays, FrameSource, MaskStack};
use crate::PANIC_MESSAGE;

pub mod color;
pub mod com;
pub mod histogram;
pub mod limits;
pub mod mask;
pub mod radial;
pub mod ramp;

/// Everything needed to analyze a single frame, except for the image itself.
/// The image is requested from the `FrameSource` by the worker processing the task.
#[derive(Debug, Clone)]
pub(crate) struct FrameTask<'a> {
    /// Navigation index of the frame.
    pub(crate) index: Vec<usize>,
    /// Centre `(x, y)` assigned to the frame, if any.
    pub(crate) centre: Option<(f64, f64)>,
    /// Mask applied to the frame, if any.
    pub(crate) mask: Option<ArrayView2<'a, bool>>,
}

/// Build a flat list of tasks, one for each frame of the source (in row-major order).
/// Centres and masks must have been validated against the source.
pub(crate) fn frame_tasks<'a, S: FrameSource + ?Sized>(
    source: &S,
    centres: Option<&CentreArrays>,
    masks: Option<&'a MaskStack>,
) -> Vec<FrameTask<'a>> {
    source
        .frame_indices()
        .into_iter()
        .map(|index| {
            let centre = centres.map(|c| {
                c.get(&index).unwrap_or_else(|| {
                    panic!(
                        "FATAL PIXSTEM ERROR | analysis::frame_tasks | Centre arrays should match the navigation shape. {}",
                        PANIC_MESSAGE
                    )
                })
            });
            let mask = masks.map(|m| m.frame_mask(&index));

            FrameTask {
                index,
                centre,
                mask,
            }
        })
        .collect()
}

/// Construct a thread pool with the given number of threads.
fn build_pool(n_threads: usize) -> Result<rayon::ThreadPool, ProcessingError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .build()
        .map_err(|e| ProcessingError::ThreadPool(e.to_string()))
}

/// Analyze all frames in parallel. Each frame writes its result into its own row of
/// a zero-initialized `(n_tasks, row_length)` array.
///
/// Frames that fail are left zero and returned as a list of errors.
/// If `strict` is set, the first failure (in frame order) is returned as an error instead.
pub(crate) fn process_frames<S, F>(
    source: &S,
    tasks: &[FrameTask],
    row_length: usize,
    n_threads: usize,
    strict: bool,
    analyze: F,
) -> Result<(Array2<f64>, Vec<FrameError>), ProcessingError>
where
    S: FrameSource + ?Sized,
    F: Fn(&FrameTask, ArrayView2<f64>, ArrayViewMut1<f64>) -> Result<(), ImageError> + Sync,
{
    let mut output = Array2::<f64>::zeros((tasks.len(), row_length));
    let pool = build_pool(n_threads)?;

    let results: Vec<Result<(), FrameError>> = pool.install(|| {
        output
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .zip(tasks.par_iter())
            .map(|(row, task)| {
                source
                    .frame(&task.index)
                    .map_err(ImageError::from)
                    .and_then(|image| analyze(task, image.view(), row))
                    .map_err(|source| FrameError {
                        index: task.index.clone(),
                        source,
                    })
            })
            .collect()
    });

    let mut failures = Vec::new();
    for result in results {
        if let Err(e) = result {
            if strict {
                return Err(ProcessingError::Frame(e));
            }

            log::warn!("Skipping {}", e);
            failures.push(e);
        }
    }

    Ok((output, failures))
}
