//! Ribbon propagation: walking outward from one slice along the ribbon axis.
//!
//! Each step translates the previous slice by one slice height along the
//! ribbon axis, windows the edge map around the shifted shape, re-fits it with
//! a rigid search followed by a short per-corner polish and accepts it when
//! the fit clears `ProcessingOptions::minimum_fit`. Both ends of the ribbon
//! are walked by the same function; the results are merged and ordered by
//! their projection on the seed slice's axis.
use crate::angle::mean_direction;
use crate::detect::optimize::{optimize_corners, optimize_rigid, PatternSearch, RigidSearch};
use crate::detect::{canonicalize, fit_score, ProcessingOptions};
use crate::geometry::{distance, dot, norm, scale, Quad};
use crate::image::EdgeMap;
use crate::window::Window;
use log::trace;
use serde::{Deserialize, Serialize};

/// Limits and search schedules of one propagation run.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PropagationParams {
    /// Maximum number of slices added on each side of the seed slice.
    pub max_depth: usize,
    /// Extra pixels added to the window size for propagation windows.
    pub window_padding: usize,
    pub rigid: RigidSearch,
    pub polish: PatternSearch,
    /// A step is abandoned when its centroid moved less than this fraction of
    /// the translation length.
    pub min_progress: f32,
}

impl Default for PropagationParams {
    fn default() -> Self {
        Self {
            max_depth: 15,
            window_padding: 10,
            rigid: RigidSearch::default(),
            polish: PatternSearch::fine(),
            min_progress: 0.5,
        }
    }
}

/// Side of the seed slice being walked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Towards the seed slice's top edge.
    Forward,
    /// Towards its bottom edge.
    Backward,
}

impl Direction {
    fn sign(self) -> f32 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }
}

/// One accepted slice of a propagation chain (global coordinates).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainLink {
    pub quad: Quad,
    pub fit: u32,
}

/// Ordered chain plus the number of slices found on each side.
#[derive(Clone, Debug, Default)]
pub struct Propagation {
    pub slices: Vec<ChainLink>,
    pub forward: usize,
    pub backward: usize,
}

/// Unit vector perpendicular to the mean direction of the top and bottom
/// edges, pointing from the bottom edge towards the top edge.
pub fn ribbon_axis(quad: &Quad) -> Option<[f32; 2]> {
    let along = mean_direction(quad.top().direction()?, quad.bottom().direction()?)?;
    let axis = [along[1], -along[0]];
    let towards_top = dot(
        crate::geometry::sub(quad.top().midpoint(), quad.bottom().midpoint()),
        axis,
    );
    Some(if towards_top < 0.0 {
        scale(axis, -1.0)
    } else {
        axis
    })
}

/// Shift from one slice to its neighbour on the top side: the ribbon axis
/// scaled by the trapezoid height `2·area / (top + bottom)`.
pub fn translation_vector(quad: &Quad) -> Option<[f32; 2]> {
    let axis = ribbon_axis(quad)?;
    let parallel = quad.top().length() + quad.bottom().length();
    if parallel <= crate::geometry::EPS {
        return None;
    }
    let height = 2.0 * quad.area() / parallel;
    height
        .is_finite()
        .then_some(scale(axis, height))
        .filter(|v| norm(*v) >= 1.0)
}

#[derive(Clone, Copy)]
struct Step {
    link: ChainLink,
    shift: [f32; 2],
}

/// Walks from `start` in `direction` and returns the accepted slices in walk
/// order (nearest first). `start` itself is not included.
pub fn walk(
    edges: &EdgeMap<'_>,
    start: ChainLink,
    direction: Direction,
    options: &ProcessingOptions,
    params: &PropagationParams,
) -> Vec<ChainLink> {
    let Some(shift) = translation_vector(&start.quad) else {
        return Vec::new();
    };
    let first = Step {
        link: start,
        shift: scale(shift, direction.sign()),
    };
    std::iter::successors(Some(first), |prev| {
        next_step(edges, prev, options, params)
    })
    .skip(1)
    .take(params.max_depth)
    .map(|step| step.link)
    .collect()
}

fn next_step(
    edges: &EdgeMap<'_>,
    prev: &Step,
    options: &ProcessingOptions,
    params: &PropagationParams,
) -> Option<Step> {
    let guess = prev.link.quad.translated(prev.shift);
    let size = options.window_size + params.window_padding;
    let window = Window::extract(edges, guess.centroid(), size);

    let rigid = optimize_rigid(&window, &guess, &params.rigid);
    let polished = optimize_corners(&window, &rigid.quad, &params.polish);
    if (polished.fit as f32) < options.minimum_fit {
        trace!(
            "propagation stops: fit {} below {}",
            polished.fit,
            options.minimum_fit
        );
        return None;
    }
    let quad = canonicalize(&polished.quad)?;
    if !quad.within_bounds(edges.w, edges.h) {
        trace!("propagation stops: slice leaves the image");
        return None;
    }
    let step_len = norm(prev.shift);
    let moved = distance(quad.centroid(), prev.link.quad.centroid());
    if moved < params.min_progress * step_len {
        trace!("propagation stops: moved {moved:.1} of {step_len:.1}");
        return None;
    }
    let fit = fit_score(&window, &quad);

    // keep walking the same way even when the new slice's axis flips
    let next = translation_vector(&quad)?;
    let shift = if dot(next, prev.shift) < 0.0 {
        scale(next, -1.0)
    } else {
        next
    };
    trace!(
        "propagation step: fit {fit}, centroid ({:.1}, {:.1})",
        quad.centroid()[0],
        quad.centroid()[1]
    );
    Some(Step {
        link: ChainLink { quad, fit },
        shift,
    })
}

/// Walks both ways from `seed` and returns every slice ordered along the
/// ribbon axis, top-most first.
pub fn propagate(
    edges: &EdgeMap<'_>,
    seed: ChainLink,
    options: &ProcessingOptions,
    params: &PropagationParams,
) -> Propagation {
    let forward = walk(edges, seed, Direction::Forward, options, params);
    let backward = walk(edges, seed, Direction::Backward, options, params);
    let (n_forward, n_backward) = (forward.len(), backward.len());

    let mut slices: Vec<ChainLink> = backward
        .into_iter()
        .rev()
        .chain(std::iter::once(seed))
        .chain(forward)
        .collect();
    if let Some(axis) = ribbon_axis(&seed.quad) {
        slices.sort_by(|a, b| {
            let pa = dot(a.quad.centroid(), axis);
            let pb = dot(b.quad.centroid(), axis);
            pb.total_cmp(&pa)
        });
    }
    Propagation {
        slices,
        forward: n_forward,
        backward: n_backward,
    }
}
