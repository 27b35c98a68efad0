//! Detector pipeline from a seed point to a slice or a whole ribbon.
//!
//! Typical usage:
//! ```no_run
//! use ribbon_detector::detect::{ProcessingOptions, SliceDetector};
//! use ribbon_detector::image::EdgeMap;
//!
//! # fn example(edges: EdgeMap) -> Result<(), Box<dyn std::error::Error>> {
//! let detector = SliceDetector::new(ProcessingOptions::default())?;
//! let found = detector.detect_ribbon(&edges, [640.0, 480.0]);
//! println!("{} slices", found.slices.len());
//! # Ok(())
//! # }
//! ```
use super::builder::best_candidate;
use super::canonical::canonicalize;
use super::fit::fit_score;
use super::optimize::{optimize_corners, PatternSearch};
use super::ransac::{ransac_quad, RansacParams};
use super::validate::{validate_slice, Validation};
use super::vertices::resolve_vertices;
use super::ProcessingOptions;
use crate::budget::SearchBudget;
use crate::diagnostics::{elapsed_ms, DetectionReport, LineStage, PropagationStage};
use crate::error::OptionsError;
use crate::geometry::Quad;
use crate::image::EdgeMap;
use crate::lines::LineExtractor;
use crate::ribbon::propagate::{propagate, ChainLink, PropagationParams};
use crate::window::Window;
use log::{debug, warn};
use rand::prelude::*;
use serde::Serialize;
use std::time::Instant;

/// Which stage produced a slice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SliceSource {
    Structured,
    Ransac,
}

/// A slice found at a seed point, in global coordinates.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedSlice {
    pub quad: Quad,
    pub fit: u32,
    pub source: SliceSource,
}

/// Why no slice was found at a seed point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetectionMiss {
    /// The structured candidate failed and no random hypothesis passed the
    /// area gate with a non-zero fit.
    NoCandidate,
    /// The search budget ran out before a fallback hypothesis was found.
    Cancelled,
}

impl std::fmt::Display for DetectionMiss {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectionMiss::NoCandidate => write!(f, "no slice found at the seed point"),
            DetectionMiss::Cancelled => write!(f, "slice search was cancelled"),
        }
    }
}

impl std::error::Error for DetectionMiss {}

/// Ordered slices of one ribbon plus the trace of the call.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RibbonDetection {
    pub slices: Vec<ChainLink>,
    pub report: DetectionReport,
}

/// Detector bound to one validated option set.
#[derive(Clone, Debug)]
pub struct SliceDetector {
    options: ProcessingOptions,
    ransac: RansacParams,
    search: PatternSearch,
    propagation: PropagationParams,
    rng_seed: u64,
    budget: SearchBudget,
}

impl SliceDetector {
    /// Validates `options` once; the detector never changes them afterwards.
    pub fn new(options: ProcessingOptions) -> Result<Self, OptionsError> {
        if let Err(err) = options.validate() {
            warn!("rejecting processing options: {err}");
            return Err(err);
        }
        Ok(Self {
            options,
            ransac: RansacParams::default(),
            search: PatternSearch::coarse(),
            propagation: PropagationParams::default(),
            rng_seed: 0,
            budget: SearchBudget::unlimited(),
        })
    }

    pub fn with_ransac(mut self, params: RansacParams) -> Self {
        self.ransac = params;
        self
    }

    pub fn with_search(mut self, search: PatternSearch) -> Self {
        self.search = search;
        self
    }

    pub fn with_propagation(mut self, params: PropagationParams) -> Self {
        self.propagation = params;
        self
    }

    /// Seed of the random source used by the fallback search.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }

    pub fn with_budget(mut self, budget: SearchBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn options(&self) -> &ProcessingOptions {
        &self.options
    }

    /// Finds one slice around `seed` (global coordinates).
    pub fn detect_slice(
        &self,
        edges: &EdgeMap<'_>,
        seed: [f32; 2],
    ) -> Result<DetectedSlice, DetectionMiss> {
        let mut rng = StdRng::seed_from_u64(self.rng_seed);
        self.detect_slice_with_rng(edges, seed, &mut rng).0
    }

    /// As [`detect_slice`](Self::detect_slice) with a caller-supplied random
    /// source; also returns the trace.
    pub fn detect_slice_with_rng<R: Rng>(
        &self,
        edges: &EdgeMap<'_>,
        seed: [f32; 2],
        rng: &mut R,
    ) -> (Result<DetectedSlice, DetectionMiss>, DetectionReport) {
        let total = Instant::now();
        let size = self.options.window_size;
        let mut report = DetectionReport {
            seed,
            window_size: size,
            ..Default::default()
        };

        let window = Window::extract(edges, seed, size);
        let extraction = report
            .timings
            .measure("lines", || LineExtractor::new(&window, &self.options).extract());
        report.lines = LineStage {
            peaks: extraction.peaks.len(),
            raw: extraction.raw.len(),
            merged: extraction.merged.len(),
            kept: extraction.lines.len(),
        };
        let vertices = resolve_vertices(&extraction.lines, size);
        report.vertices = vertices.iter().map(|&p| window.to_global(p)).collect();

        let structured = report.timings.measure("structured", || {
            self.structured_slice(&window, &vertices, seed)
        });
        if let Some((fit, validation, slice)) = structured {
            report.structured_fit = Some(fit);
            report.structured = validation;
            if let Some(slice) = slice {
                report.slice_fit = Some(slice.fit);
                report.timings.total_ms = elapsed_ms(total);
                debug!(
                    "detect_slice at ({:.1}, {:.1}): structured fit {}",
                    seed[0], seed[1], slice.fit
                );
                return (Ok(slice), report);
            }
        }

        report.used_ransac = true;
        if self.budget.is_exhausted() {
            return self.finish_miss(report, total, DetectionMiss::Cancelled);
        }
        let start = Instant::now();
        let hit = ransac_quad(&window, &vertices, &self.ransac, rng, &self.budget);
        report.timings.push("ransac", elapsed_ms(start));
        let Some(hit) = hit else {
            let miss = if self.budget.is_exhausted() {
                DetectionMiss::Cancelled
            } else {
                DetectionMiss::NoCandidate
            };
            return self.finish_miss(report, total, miss);
        };
        report.ransac_trials = Some(hit.trials);
        if hit.fit == 0 {
            return self.finish_miss(report, total, DetectionMiss::NoCandidate);
        }

        let refined = report
            .timings
            .measure("optimize", || optimize_corners(&window, &hit.quad, &self.search));
        let Some(quad) = canonicalize(&refined.quad) else {
            return self.finish_miss(report, total, DetectionMiss::NoCandidate);
        };
        let fit = fit_score(&window, &quad);
        report.slice_fit = Some(fit);
        report.timings.total_ms = elapsed_ms(total);
        debug!(
            "detect_slice at ({:.1}, {:.1}): ransac fit {} after {} trials",
            seed[0], seed[1], fit, hit.trials
        );
        (
            Ok(DetectedSlice {
                quad,
                fit,
                source: SliceSource::Ransac,
            }),
            report,
        )
    }

    /// Structured path: candidate → relabel → validate. The compass search
    /// only refines random hypotheses; a validated candidate is kept as
    /// built. Returns the candidate's fit, the validation of the relabeled
    /// shape and the slice when it validates.
    fn structured_slice(
        &self,
        window: &Window,
        vertices: &[[f32; 2]],
        seed: [f32; 2],
    ) -> Option<(u32, Option<Validation>, Option<DetectedSlice>)> {
        let candidate = best_candidate(window, vertices, seed, &self.options)?;
        if !candidate.validation.is_valid() {
            return Some((candidate.fit, Some(candidate.validation), None));
        }
        let Some(quad) = canonicalize(&candidate.quad) else {
            return Some((candidate.fit, None, None));
        };
        let fit = fit_score(window, &quad);
        let validation = validate_slice(&quad, fit, seed, &self.options);
        let slice = validation.is_valid().then_some(DetectedSlice {
            quad,
            fit,
            source: SliceSource::Structured,
        });
        Some((candidate.fit, Some(validation), slice))
    }

    fn finish_miss(
        &self,
        mut report: DetectionReport,
        total: Instant,
        miss: DetectionMiss,
    ) -> (Result<DetectedSlice, DetectionMiss>, DetectionReport) {
        debug!(
            "detect_slice at ({:.1}, {:.1}): {miss}",
            report.seed[0], report.seed[1]
        );
        report.miss = Some(miss.to_string());
        report.timings.total_ms = elapsed_ms(total);
        (Err(miss), report)
    }

    /// Detects the slice at `seed` and walks the ribbon in both directions.
    /// A miss at the seed yields an empty slice list.
    pub fn detect_ribbon(&self, edges: &EdgeMap<'_>, seed: [f32; 2]) -> RibbonDetection {
        let mut rng = StdRng::seed_from_u64(self.rng_seed);
        self.detect_ribbon_with_rng(edges, seed, &mut rng)
    }

    pub fn detect_ribbon_with_rng<R: Rng>(
        &self,
        edges: &EdgeMap<'_>,
        seed: [f32; 2],
        rng: &mut R,
    ) -> RibbonDetection {
        let total = Instant::now();
        let (found, mut report) = self.detect_slice_with_rng(edges, seed, rng);
        let Ok(first) = found else {
            return RibbonDetection {
                slices: Vec::new(),
                report,
            };
        };

        let start = Instant::now();
        let chain = propagate(
            edges,
            ChainLink {
                quad: first.quad,
                fit: first.fit,
            },
            &self.options,
            &self.propagation,
        );
        report.timings.push("propagate", elapsed_ms(start));
        report.propagation = Some(PropagationStage {
            forward: chain.forward,
            backward: chain.backward,
        });
        report.timings.total_ms = elapsed_ms(total);
        debug!(
            "detect_ribbon at ({:.1}, {:.1}): {} slices ({} forward, {} backward)",
            seed[0],
            seed[1],
            chain.slices.len(),
            chain.forward,
            chain.backward
        );
        RibbonDetection {
            slices: chain.slices,
            report,
        }
    }
}
