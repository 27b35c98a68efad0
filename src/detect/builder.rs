//! Quadrilateral construction from corner candidates.
use super::fit::fit_score;
use super::validate::{validate_slice, Validation};
use super::ProcessingOptions;
use crate::geometry::{assign_roles, Quad};
use crate::window::Window;
use rayon::prelude::*;

/// Candidates beyond this count are ignored when enumerating 4-subsets.
pub const MAX_VERTEX_CANDIDATES: usize = 16;

/// Scored slice hypothesis in global coordinates.
#[derive(Clone, Copy, Debug)]
pub struct Candidate {
    pub quad: Quad,
    pub fit: u32,
    pub validation: Validation,
}

/// Labels four window-local points and moves them to global coordinates.
pub fn build_quad(window: &Window, points: [[f32; 2]; 4]) -> Option<Quad> {
    assign_roles(points).map(|q| window.quad_to_global(&q))
}

fn score(window: &Window, quad: Quad, seed: [f32; 2], options: &ProcessingOptions) -> Candidate {
    let fit = fit_score(window, &quad);
    Candidate {
        quad,
        fit,
        validation: validate_slice(&quad, fit, seed, options),
    }
}

/// Builds the structured candidate from window-local corner candidates.
///
/// - fewer than 4 vertices: no shape;
/// - exactly 4: the labeled quad, valid or not;
/// - more than 4: the best-fitting valid quad over all 4-subsets of the
///   first [`MAX_VERTEX_CANDIDATES`] vertices (ties keep the earlier subset),
///   or no shape when none validates.
pub fn best_candidate(
    window: &Window,
    vertices: &[[f32; 2]],
    seed: [f32; 2],
    options: &ProcessingOptions,
) -> Option<Candidate> {
    match vertices.len() {
        0..=3 => None,
        4 => {
            let quad = build_quad(window, [vertices[0], vertices[1], vertices[2], vertices[3]])?;
            Some(score(window, quad, seed, options))
        }
        _ => {
            let pool = &vertices[..vertices.len().min(MAX_VERTEX_CANDIDATES)];
            combinations4(pool.len())
                .into_par_iter()
                .enumerate()
                .filter_map(|(index, [a, b, c, d])| {
                    let quad = build_quad(window, [pool[a], pool[b], pool[c], pool[d]])?;
                    let cand = score(window, quad, seed, options);
                    cand.validation.is_valid().then_some((index, cand))
                })
                .max_by(|(ia, a), (ib, b)| a.fit.cmp(&b.fit).then(ib.cmp(ia)))
                .map(|(_, cand)| cand)
        }
    }
}

/// All 4-subsets of `0..n` in lexicographic order.
fn combinations4(n: usize) -> Vec<[usize; 4]> {
    let mut out = Vec::new();
    for a in 0..n {
        for b in (a + 1)..n {
            for c in (b + 1)..n {
                for d in (c + 1)..n {
                    out.push([a, b, c, d]);
                }
            }
        }
    }
    out
}
