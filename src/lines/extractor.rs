//! Hough line extraction driver.
//!
//! [`LineExtractor`] runs accumulate → peaks → clip → merge → trim on a
//! window and keeps every intermediate stage in [`LineExtraction`] so the
//! detector can report per-stage counts.
use super::accumulator::{HoughAccumulator, HoughPeak};
use super::merge::merge_lines;
use super::trim::trim_to_support;
use super::{LineSegment, SupportedLine};
use crate::detect::ProcessingOptions;
use crate::geometry::{distance, EPS};
use crate::window::Window;
use log::debug;

/// Tolerance for accepting a border crossing as lying on the window edge.
const BORDER_TOL: f32 = 1e-3;

/// Output of every stage of the extractor.
#[derive(Clone, Debug, Default)]
pub struct LineExtraction {
    pub peaks: Vec<HoughPeak>,
    /// One full-window segment per peak.
    pub raw: Vec<LineSegment>,
    /// Near-duplicates fused, short lines dropped.
    pub merged: Vec<LineSegment>,
    /// Pixel-substantiated lines ranked by support, capped at `max_lines`.
    pub lines: Vec<SupportedLine>,
}

pub struct LineExtractor<'a> {
    window: &'a Window,
    vote_threshold: f32,
    merge_distance: f32,
    max_lines: usize,
}

impl<'a> LineExtractor<'a> {
    pub fn new(window: &'a Window, options: &ProcessingOptions) -> Self {
        Self {
            window,
            vote_threshold: options.hough_vote_threshold,
            merge_distance: options.merge_distance,
            max_lines: options.max_lines,
        }
    }

    pub fn extract(&self) -> LineExtraction {
        let size = self.window.size();
        let acc = HoughAccumulator::accumulate(self.window);
        let peaks = acc.peaks(self.vote_threshold);
        let raw: Vec<LineSegment> = peaks
            .iter()
            .filter_map(|p| clip_to_window(p.theta_deg as f32, p.r as f32, size))
            .collect();
        let merged = merge_lines(&raw, self.merge_distance, 0.5 * size as f32);
        let lines = trim_to_support(self.window, &merged, 0.1 * size as f32, self.max_lines);
        debug!(
            "LineExtractor: peaks={} raw={} merged={} kept={} (max votes {})",
            peaks.len(),
            raw.len(),
            merged.len(),
            lines.len(),
            acc.max_votes()
        );
        LineExtraction {
            peaks,
            raw,
            merged,
            lines,
        }
    }
}

/// Clips the line `x·cosθ + y·sinθ = r` (θ in degrees) to the square
/// `[0, size]²`.
///
/// Crossings with the left/right borders are only computed when `sinθ` is
/// non-zero and with the top/bottom borders only when `cosθ` is non-zero, so
/// axis-aligned lines never divide by zero. The two crossings farthest apart
/// become the endpoints, ordered by x then y. `None` if the line misses the
/// window or only touches a corner.
pub fn clip_to_window(theta_deg: f32, r: f32, size: usize) -> Option<LineSegment> {
    let theta = theta_deg.to_radians();
    let (sin, cos) = theta.sin_cos();
    let s = size as f32;

    let mut crossings: Vec<[f32; 2]> = Vec::with_capacity(4);
    if sin.abs() > EPS {
        crossings.push([0.0, r / sin]);
        crossings.push([s, (r - s * cos) / sin]);
    }
    if cos.abs() > EPS {
        crossings.push([r / cos, 0.0]);
        crossings.push([(r - s * sin) / cos, s]);
    }

    let mut inside: Vec<[f32; 2]> = Vec::with_capacity(4);
    for p in crossings {
        let on_window = (-BORDER_TOL..=s + BORDER_TOL).contains(&p[0])
            && (-BORDER_TOL..=s + BORDER_TOL).contains(&p[1]);
        if on_window && inside.iter().all(|q| distance(p, *q) > BORDER_TOL) {
            inside.push([p[0].clamp(0.0, s), p[1].clamp(0.0, s)]);
        }
    }

    let mut best: Option<([f32; 2], [f32; 2], f32)> = None;
    for i in 0..inside.len() {
        for j in (i + 1)..inside.len() {
            let d = distance(inside[i], inside[j]);
            if best.map_or(true, |(_, _, bd)| d > bd) {
                best = Some((inside[i], inside[j], d));
            }
        }
    }
    let (mut a, mut b, d) = best?;
    if d <= EPS {
        return None;
    }
    if (b[0], b[1]) < (a[0], a[1]) {
        std::mem::swap(&mut a, &mut b);
    }
    Some(LineSegment {
        theta_deg,
        r,
        p0: a,
        p1: b,
    })
}
