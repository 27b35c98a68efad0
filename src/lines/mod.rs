//! Hough-based line extraction inside a window.
//!
//! Overview
//! - [`accumulator`] votes every edge pixel into a 180 × r accumulator with a
//!   5-cell spread and picks non-maximum-suppressed peaks.
//! - [`extractor`] turns peaks into full-window segments and drives the
//!   stages below through [`LineExtractor`].
//! - [`merge`] fuses near-duplicate segments by a running weighted average.
//! - [`trim`] replaces nominal endpoints by the first/last pixel-supported
//!   samples, then ranks the survivors by support.
//!
//! All coordinates here are window-local.

pub mod accumulator;
pub mod extractor;
pub mod merge;
pub mod trim;

pub use accumulator::{HoughAccumulator, HoughPeak};
pub use extractor::{clip_to_window, LineExtraction, LineExtractor};

use crate::angle::normalize_half_pi;
use crate::geometry::{distance, normalized, sub};
use serde::Serialize;

/// Line in Hough normal form `x·cosθ + y·sinθ = r` with two endpoints on it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSegment {
    /// Normal angle in degrees, `[0, 180)`.
    pub theta_deg: f32,
    pub r: f32,
    pub p0: [f32; 2],
    pub p1: [f32; 2],
}

impl LineSegment {
    /// Segment through two points, with the polar form derived from them.
    /// `None` when the points coincide.
    pub fn through(p0: [f32; 2], p1: [f32; 2]) -> Option<Self> {
        let d = normalized(sub(p1, p0))?;
        let theta = normalize_half_pi(d[1].atan2(d[0]) + std::f32::consts::FRAC_PI_2);
        let r = p0[0] * theta.cos() + p0[1] * theta.sin();
        Some(Self {
            theta_deg: theta.to_degrees(),
            r,
            p0,
            p1,
        })
    }

    pub fn length(&self) -> f32 {
        distance(self.p0, self.p1)
    }

    pub fn direction(&self) -> Option<[f32; 2]> {
        normalized(sub(self.p1, self.p0))
    }
}

/// Segment after pixel-substantiated trimming. `extent` keeps the untrimmed
/// full-window line for intersection tests; `segment` spans the supported
/// part only.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedLine {
    pub extent: LineSegment,
    pub segment: LineSegment,
    /// Number of unit-step samples that hit an edge pixel.
    pub support: usize,
}

#[cfg(test)]
mod tests;
