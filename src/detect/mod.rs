//! Single-slice detection around a seed point.
//!
//! Overview
//! - Copies a window around the seed, extracts Hough lines and resolves
//!   corner candidates ([`vertices`]).
//! - Builds a labeled quadrilateral from the candidates ([`builder`]),
//!   relabels it ([`canonical`]) and checks it ([`validate`]).
//! - Falls back to a randomized search ([`ransac`]) when the structured
//!   candidate is missing or invalid; the winning hypothesis is refined with
//!   a compass search ([`optimize`]) before relabeling.
//!
//! Modules
//! - [`params`] – user options (`ProcessingOptions`).
//! - [`fit`] – the boundary fit score every search maximizes.
//! - `pipeline` – [`SliceDetector`], which also drives ribbon propagation.
//!
//! Coordinates
//! - Lines and corner candidates are window-local; every `Quad` leaving a
//!   function in this module is in global image coordinates.

pub mod builder;
pub mod canonical;
pub mod fit;
pub mod optimize;
pub mod params;
mod pipeline;
pub mod ransac;
pub mod validate;
pub mod vertices;

pub use builder::{best_candidate, build_quad, Candidate};
pub use canonical::canonicalize;
pub use fit::fit_score;
pub use optimize::{optimize_corners, optimize_rigid, Optimized, PatternSearch, RigidSearch};
pub use params::ProcessingOptions;
pub use pipeline::{DetectedSlice, DetectionMiss, RibbonDetection, SliceDetector, SliceSource};
pub use ransac::{ransac_quad, RansacHit, RansacParams};
pub use validate::{validate_slice, Validation};
pub use vertices::resolve_vertices;
