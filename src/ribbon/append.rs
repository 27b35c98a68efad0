//! Manual slice append at either end of a ribbon.
use super::genetic::{refine_genetic, GeneticParams};
use super::hit::is_out_of_bounds;
use super::propagate::translation_vector;
use super::{Ribbon, SliceId};
use crate::budget::SearchBudget;
use crate::detect::ProcessingOptions;
use crate::error::RibbonError;
use crate::geometry::{scale, sub, Quad};
use crate::image::EdgeMap;
use crate::window::Window;
use log::debug;
use rand::Rng;

/// End of the ribbon: `Head` is the first (top-most) slice, `Tail` the last.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RibbonEnd {
    Head,
    Tail,
}

/// Initial guess for a new slice beyond `end`.
///
/// A single slice is translated by one slice height (towards its top edge
/// for `Head`). Otherwise the two end slices are extrapolated corner by
/// corner: `last + (last - previous)`.
pub fn extrapolate(ribbon: &Ribbon, end: RibbonEnd) -> Result<Quad, RibbonError> {
    let slices = ribbon.slices();
    match slices {
        [] => Err(RibbonError::EmptyRibbon),
        [only] => {
            let shift = translation_vector(&only.quad).ok_or(RibbonError::DegenerateSlice(only.id))?;
            let sign = match end {
                RibbonEnd::Head => 1.0,
                RibbonEnd::Tail => -1.0,
            };
            Ok(only.quad.translated(scale(shift, sign)))
        }
        [first, second, ..] if end == RibbonEnd::Head => Ok(step_beyond(&first.quad, &second.quad)),
        [.., previous, last] => Ok(step_beyond(&last.quad, &previous.quad)),
    }
}

fn step_beyond(end: &Quad, neighbour: &Quad) -> Quad {
    let n = neighbour.vertices();
    let e = end.vertices();
    Quad::from_vertices(std::array::from_fn(|i| {
        let d = sub(e[i], n[i]);
        [e[i][0] + d[0], e[i][1] + d[1]]
    }))
}

impl Ribbon {
    /// Extrapolates a slice beyond `end`, refines it against the edge map and
    /// inserts it there. Returns the new slice id; a refined slice with a
    /// vertex outside the image is not inserted.
    pub fn append_slice<R: Rng>(
        &mut self,
        edges: &EdgeMap<'_>,
        end: RibbonEnd,
        options: &ProcessingOptions,
        params: &GeneticParams,
        rng: &mut R,
        budget: &SearchBudget,
    ) -> Result<SliceId, RibbonError> {
        self.ensure_editable()?;
        let guess = extrapolate(self, end)?;
        let window = Window::extract(edges, guess.centroid(), options.window_size);
        let outcome = refine_genetic(&window, &guess, params, rng, budget);
        if is_out_of_bounds(&outcome.quad, edges.w, edges.h) {
            debug!("appended slice at {:?} would leave the image", end);
            return Err(RibbonError::SliceOutOfImage);
        }
        let index = match end {
            RibbonEnd::Head => 0,
            RibbonEnd::Tail => self.len(),
        };
        let id = self.insert(index, outcome.quad, outcome.fit);
        debug!(
            "appended slice {} at {:?} with fit {} after {} generations",
            id.0, end, outcome.fit, outcome.generations
        );
        Ok(id)
    }
}
