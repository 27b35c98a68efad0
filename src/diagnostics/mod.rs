//! Structured reports describing what the detector did.
//!
//! Reports serialize to camelCase JSON for the command-line tool.
mod timing;

pub use timing::{elapsed_ms, StageTiming, TimingBreakdown};

use crate::detect::Validation;
use serde::Serialize;

/// Counts per line-extraction stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineStage {
    pub peaks: usize,
    pub raw: usize,
    pub merged: usize,
    pub kept: usize,
}

/// Slices found on each side of the seed slice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropagationStage {
    pub forward: usize,
    pub backward: usize,
}

/// Trace of one detection call at one seed point.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionReport {
    pub seed: [f32; 2],
    pub window_size: usize,
    pub lines: LineStage,
    /// Corner candidates in global coordinates.
    pub vertices: Vec<[f32; 2]>,
    /// Fit of the structured candidate as built.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_fit: Option<u32>,
    /// Validation of the relabeled structured candidate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured: Option<Validation>,
    pub used_ransac: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ransac_trials: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slice_fit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub propagation: Option<PropagationStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub miss: Option<String>,
    pub timings: TimingBreakdown,
}
