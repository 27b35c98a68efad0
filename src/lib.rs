#![doc = include_str!("../README.md")]

pub mod angle;
pub mod budget;
pub mod config;
pub mod detect;
pub mod diagnostics;
pub mod error;
pub mod geometry;
pub mod image;
pub mod lines;
pub mod ribbon;
pub mod window;

// --- High-level re-exports -------------------------------------------------

pub use crate::detect::{
    DetectedSlice, DetectionMiss, ProcessingOptions, RibbonDetection, SliceDetector, SliceSource,
};
pub use crate::diagnostics::DetectionReport;
pub use crate::error::{OptionsError, RibbonError};
pub use crate::geometry::{Corner, Edge, Quad};
pub use crate::ribbon::{Ribbon, RibbonStatus, Slice, SliceId};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use ribbon_detector::prelude::*;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let (w, h) = (640usize, 480usize);
/// let raster = vec![0u8; w * h];
/// let edges = EdgeMap::new(w, h, &raster).ok_or("short buffer")?;
///
/// let detector = SliceDetector::new(ProcessingOptions::for_window(200))?;
/// let found = detector.detect_ribbon(&edges, [320.0, 240.0]);
/// let ribbon = Ribbon::from_links(&found.slices);
/// println!("slices={} total_ms={:.3}", ribbon.len(), found.report.timings.total_ms);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::EdgeMap;
    pub use crate::{ProcessingOptions, Quad, Ribbon, SliceDetector};
}
