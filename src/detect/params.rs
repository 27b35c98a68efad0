use crate::error::OptionsError;
use serde::{Deserialize, Serialize};

/// Smallest window the detector accepts.
pub const MIN_WINDOW_SIZE: usize = 16;

/// User-facing detection settings.
///
/// The scale-dependent defaults (`merge_distance`, `first_fit`,
/// `minimum_fit`) follow the window size; use [`ProcessingOptions::for_window`]
/// to derive them for a size other than the default 420 px.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingOptions {
    /// Side of the square search window in pixels.
    pub window_size: usize,
    /// Fraction of the strongest accumulator cell a peak must exceed.
    pub hough_vote_threshold: f32,
    /// Endpoint distance under which two Hough lines are fused, in pixels.
    pub merge_distance: f32,
    /// Maximum number of lines kept after trimming.
    pub max_lines: usize,
    /// Fit a structured candidate must exceed to validate.
    pub first_fit: f32,
    /// Fit a propagated slice must reach to be accepted.
    pub minimum_fit: f32,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self::for_window(420)
    }
}

impl ProcessingOptions {
    pub fn for_window(window_size: usize) -> Self {
        let s = window_size as f32;
        Self {
            window_size,
            hough_vote_threshold: 0.4,
            merge_distance: s / 4.0,
            max_lines: 6,
            first_fit: s / 2.0,
            minimum_fit: s / 2.0,
        }
    }

    pub fn with_vote_threshold(mut self, threshold: f32) -> Self {
        self.hough_vote_threshold = threshold;
        self
    }

    pub fn with_merge_distance(mut self, distance: f32) -> Self {
        self.merge_distance = distance;
        self
    }

    pub fn with_minimum_fit(mut self, fit: f32) -> Self {
        self.minimum_fit = fit;
        self
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.window_size < MIN_WINDOW_SIZE {
            return Err(OptionsError::WindowTooSmall {
                size: self.window_size,
                minimum: MIN_WINDOW_SIZE,
            });
        }
        let t = self.hough_vote_threshold;
        if !t.is_finite() || !(0.0..=1.0).contains(&t) {
            return Err(OptionsError::VoteThresholdOutOfRange { value: t });
        }
        if !self.merge_distance.is_finite() || self.merge_distance <= 0.0 {
            return Err(OptionsError::NonPositiveMergeDistance {
                value: self.merge_distance,
            });
        }
        if self.max_lines == 0 {
            return Err(OptionsError::NoLinesRetained);
        }
        for (name, value) in [("first_fit", self.first_fit), ("minimum_fit", self.minimum_fit)] {
            if !value.is_finite() || value < 0.0 {
                return Err(OptionsError::InvalidFitThreshold { name, value });
            }
        }
        Ok(())
    }
}
