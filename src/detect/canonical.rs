//! Role re-resolution after optimization.
//!
//! Optimizers move corners while keeping their labels, so a corner labeled
//! top-left can end up right of top-right or fold the outline over itself.
//! [`canonicalize`] forgets the labels and assigns them again with the same
//! rules used to build the initial quadrilateral.
use crate::geometry::{assign_roles, Quad};

/// Relabels the corners of `quad`; `None` for degenerate vertex sets.
pub fn canonicalize(quad: &Quad) -> Option<Quad> {
    if quad.has_non_finite() {
        return None;
    }
    assign_roles(quad.vertices())
}
