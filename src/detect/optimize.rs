//! Derivative-free refinement of slice corners against the fit score.
//!
//! - [`PatternSearch`] moves one corner at a time along 16 compass directions
//!   with a cyclic step schedule and keeps the best strictly improving move
//!   per corner and round.
//! - [`RigidSearch`] moves the whole shape: every compass shift is combined
//!   with small rotations about the window centre.
//!
//! Corner roles stay fixed during both searches. Every candidate vertex must
//! lie on a window pixel; moves that leave the window are skipped. Corners
//! are kept on the integer pixel grid.
use super::fit::fit_score;
use crate::angle::unit_from_deg;
use crate::geometry::{add, rotate_about, round_point, scale, Corner, Quad};
use crate::window::Window;
use log::trace;
use serde::{Deserialize, Serialize};

/// Number of compass directions, 22.5° apart.
pub const DIRECTIONS: usize = 16;

fn compass() -> [[f32; 2]; DIRECTIONS] {
    std::array::from_fn(|j| unit_from_deg(j as f32 * 360.0 / DIRECTIONS as f32))
}

/// Per-corner compass search. Round `k` uses step
/// `step_scale · ((k mod step_cycle) + 1)` pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatternSearch {
    pub rounds: usize,
    pub step_cycle: usize,
    pub step_scale: f32,
}

impl PatternSearch {
    /// Schedule used right after structured detection: steps 2..=12 px.
    pub fn coarse() -> Self {
        Self {
            rounds: 27,
            step_cycle: 6,
            step_scale: 2.0,
        }
    }

    /// Short-range polish: steps 1..=3 px.
    pub fn fine() -> Self {
        Self {
            rounds: 16,
            step_cycle: 3,
            step_scale: 1.0,
        }
    }

    fn step(&self, round: usize) -> f32 {
        self.step_scale * ((round % self.step_cycle.max(1)) + 1) as f32
    }
}

impl Default for PatternSearch {
    fn default() -> Self {
        Self::coarse()
    }
}

/// Whole-shape search: round `k` shifts by `(k mod step_cycle) + 1` pixels in
/// each compass direction, each shift combined with rotations of
/// `0, ±1°, …, ±max_rotation_deg` about the window centre.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RigidSearch {
    pub rounds: usize,
    pub step_cycle: usize,
    pub max_rotation_deg: u32,
}

impl Default for RigidSearch {
    fn default() -> Self {
        Self {
            rounds: 9,
            step_cycle: 8,
            max_rotation_deg: 9,
        }
    }
}

/// Refined shape in global coordinates together with its fit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Optimized {
    pub quad: Quad,
    pub fit: u32,
}

/// Rounds every corner and pulls it onto the window.
fn snap(window: &Window, quad: &Quad) -> Quad {
    quad.map(|p| window.clamp_global(round_point(p)))
}

pub fn optimize_corners(window: &Window, seed: &Quad, search: &PatternSearch) -> Optimized {
    let dirs = compass();
    let mut quad = snap(window, seed);
    let mut best_fit = fit_score(window, &quad);

    for round in 0..search.rounds {
        let step = search.step(round);
        for corner in Corner::ALL {
            let current = quad.corner(corner);
            let mut best_move: Option<[f32; 2]> = None;
            for d in &dirs {
                let moved = round_point(add(current, scale(*d, step)));
                if !window.contains_global(moved) {
                    continue;
                }
                let fit = fit_score(window, &quad.with_corner(corner, moved));
                if fit > best_fit {
                    best_fit = fit;
                    best_move = Some(moved);
                }
            }
            if let Some(p) = best_move {
                quad = quad.with_corner(corner, p);
            }
        }
        trace!("pattern search round {round} step {step}: fit {best_fit}");
    }

    Optimized {
        quad,
        fit: best_fit,
    }
}

pub fn optimize_rigid(window: &Window, seed: &Quad, search: &RigidSearch) -> Optimized {
    let dirs = compass();
    let center = window.center();
    let max_rot = search.max_rotation_deg as i32;
    let angles: Vec<f32> = std::iter::once(0)
        .chain((1..=max_rot).flat_map(|a| [a, -a]))
        .map(|a| (a as f32).to_radians())
        .collect();

    let mut best = snap(window, seed);
    let mut best_fit = fit_score(window, &best);

    for round in 0..search.rounds {
        let step = ((round % search.step_cycle.max(1)) + 1) as f32;
        let base = best;
        for d in &dirs {
            let shifted = base.translated(scale(*d, step));
            for &angle in &angles {
                let cand = shifted.map(|p| round_point(rotate_about(p, center, angle)));
                if !cand.vertices().iter().all(|p| window.contains_global(*p)) {
                    continue;
                }
                let fit = fit_score(window, &cand);
                if fit > best_fit {
                    best_fit = fit;
                    best = cand;
                }
            }
        }
        trace!("rigid search round {round} step {step}: fit {best_fit}");
    }

    Optimized {
        quad: best,
        fit: best_fit,
    }
}
