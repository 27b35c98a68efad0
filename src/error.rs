//! Error types for configuration and ribbon editing.
use crate::ribbon::{RibbonStatus, SliceId};

/// Reasons why a [`ProcessingOptions`](crate::detect::ProcessingOptions)
/// value is rejected.
#[derive(Clone, Debug, PartialEq)]
pub enum OptionsError {
    WindowTooSmall { size: usize, minimum: usize },
    VoteThresholdOutOfRange { value: f32 },
    NonPositiveMergeDistance { value: f32 },
    NoLinesRetained,
    InvalidFitThreshold { name: &'static str, value: f32 },
}

impl std::fmt::Display for OptionsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionsError::WindowTooSmall { size, minimum } => {
                write!(f, "window size {size} px is below the minimum of {minimum} px")
            }
            OptionsError::VoteThresholdOutOfRange { value } => {
                write!(f, "Hough vote threshold {value} must lie in [0, 1]")
            }
            OptionsError::NonPositiveMergeDistance { value } => {
                write!(f, "merge distance {value} must be positive")
            }
            OptionsError::NoLinesRetained => write!(f, "max_lines must be at least 1"),
            OptionsError::InvalidFitThreshold { name, value } => {
                write!(f, "{name} must be finite and non-negative, got {value}")
            }
        }
    }
}

impl std::error::Error for OptionsError {}

/// Rejected edits on a [`Ribbon`](crate::ribbon::Ribbon).
#[derive(Clone, Debug, PartialEq)]
pub enum RibbonError {
    InvalidTransition {
        from: RibbonStatus,
        to: RibbonStatus,
    },
    NotEditable {
        status: RibbonStatus,
    },
    UnknownSlice(SliceId),
    EmptyRibbon,
    /// Reference points can only be set while matching.
    NotMatching {
        status: RibbonStatus,
    },
    /// The slice is too degenerate to derive a translation from.
    DegenerateSlice(SliceId),
    /// The point used for reference matching lies outside the slice.
    PointOutsideSlice {
        slice: SliceId,
        point: [f32; 2],
    },
    /// An appended slice would have a vertex outside the image.
    SliceOutOfImage,
}

impl std::fmt::Display for RibbonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RibbonError::InvalidTransition { from, to } => {
                write!(f, "ribbon cannot move from {from:?} to {to:?}")
            }
            RibbonError::NotEditable { status } => {
                write!(f, "ribbon geometry is locked while {status:?}")
            }
            RibbonError::UnknownSlice(id) => write!(f, "no slice with id {}", id.0),
            RibbonError::EmptyRibbon => write!(f, "ribbon has no slices"),
            RibbonError::NotMatching { status } => {
                write!(f, "reference points need a matching ribbon, status is {status:?}")
            }
            RibbonError::DegenerateSlice(id) => {
                write!(f, "slice {} has no usable ribbon axis", id.0)
            }
            RibbonError::PointOutsideSlice { slice, point } => write!(
                f,
                "point ({:.1}, {:.1}) is not inside slice {}",
                point[0], point[1], slice.0
            ),
            RibbonError::SliceOutOfImage => write!(f, "appended slice would leave the image"),
        }
    }
}

impl std::error::Error for RibbonError {}
