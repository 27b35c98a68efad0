//! Randomized quadrilateral search used when structured detection fails.
//!
//! Each trial draws one corner per window quadrant, labels the four points,
//! gates the result on its area and scores it with [`fit_score`]. Corners
//! already found by the structured stage are reused for their quadrant on
//! half of the trials, which biases the search towards them without pinning
//! it there.
use super::fit::fit_score;
use crate::budget::SearchBudget;
use crate::geometry::{assign_roles, Quad};
use crate::window::Window;
use log::{debug, trace};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Trials between two budget checks.
const BUDGET_CHECK_INTERVAL: usize = 1024;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RansacParams {
    pub max_trials: usize,
    /// Expected slice area in px²; `None` uses `default_area_band`.
    pub reference_area: Option<f32>,
    /// Relative tolerance around `reference_area`.
    pub area_tolerance: f32,
    /// Accepted area range as fractions of window² without a reference.
    pub default_area_band: (f32, f32),
    /// Probability of reusing a known corner in its quadrant.
    pub reuse_probability: f64,
}

impl Default for RansacParams {
    fn default() -> Self {
        Self {
            max_trials: 75_000,
            reference_area: None,
            area_tolerance: 0.1,
            default_area_band: (0.25, 0.81),
            reuse_probability: 0.5,
        }
    }
}

impl RansacParams {
    fn area_range(&self, window_size: usize) -> (f32, f32) {
        match self.reference_area {
            Some(a) => (a * (1.0 - self.area_tolerance), a * (1.0 + self.area_tolerance)),
            None => {
                let w2 = (window_size * window_size) as f32;
                (self.default_area_band.0 * w2, self.default_area_band.1 * w2)
            }
        }
    }
}

/// Best hypothesis found, in global coordinates.
#[derive(Clone, Copy, Debug)]
pub struct RansacHit {
    pub quad: Quad,
    pub fit: u32,
    pub trials: usize,
}

/// Runs the randomized search. `known` holds window-local corners from the
/// structured stage. Returns `None` when no trial passed the area gate.
pub fn ransac_quad<R: Rng>(
    window: &Window,
    known: &[[f32; 2]],
    params: &RansacParams,
    rng: &mut R,
    budget: &SearchBudget,
) -> Option<RansacHit> {
    let size = window.size();
    let half = (size / 2).max(1);
    let (min_area, max_area) = params.area_range(size);

    // quadrant order: top-left, top-right, bottom-right, bottom-left
    let origins = [[0, 0], [half, 0], [half, half], [0, half]];
    let mut by_quadrant: [Vec<[f32; 2]>; 4] = Default::default();
    for &p in known {
        let h = half as f32;
        let q = match (p[0] < h, p[1] < h) {
            (true, true) => 0,
            (false, true) => 1,
            (false, false) => 2,
            (true, false) => 3,
        };
        by_quadrant[q].push(p);
    }

    let mut best: Option<RansacHit> = None;
    let mut trials = 0usize;
    while trials < params.max_trials {
        if trials % BUDGET_CHECK_INTERVAL == 0 && budget.is_exhausted() {
            debug!("ransac: budget exhausted after {trials} trials");
            break;
        }
        trials += 1;

        let points: [[f32; 2]; 4] = std::array::from_fn(|q| {
            let reuse = !by_quadrant[q].is_empty() && rng.gen_bool(params.reuse_probability.clamp(0.0, 1.0));
            if reuse {
                by_quadrant[q][rng.gen_range(0..by_quadrant[q].len())]
            } else {
                let [ox, oy] = origins[q];
                [
                    (ox + rng.gen_range(0..half)) as f32,
                    (oy + rng.gen_range(0..half)) as f32,
                ]
            }
        });

        let Some(local) = assign_roles(points) else {
            continue;
        };
        let area = local.area();
        if area < min_area || area > max_area {
            continue;
        }
        let quad = window.quad_to_global(&local);
        let fit = fit_score(window, &quad);
        if best.map_or(true, |b| fit > b.fit) {
            trace!("ransac: trial {trials} improves fit to {fit}");
            best = Some(RansacHit { quad, fit, trials });
        }
    }

    debug!(
        "ransac: {} trials, best fit {:?}",
        trials,
        best.map(|b| b.fit)
    );
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::CancelToken;
    use crate::image::{EdgeMap, EDGE};
    use rand::prelude::*;

    #[test]
    fn reference_area_narrows_the_gate() {
        let params = RansacParams {
            reference_area: Some(1000.0),
            ..Default::default()
        };
        let (lo, hi) = params.area_range(64);
        assert!((lo - 900.0).abs() < 1e-3 && (hi - 1100.0).abs() < 1e-3);
        let (lo, hi) = RansacParams::default().area_range(100);
        assert!((lo - 2500.0).abs() < 1e-3 && (hi - 8100.0).abs() < 1e-3);
    }

    #[test]
    fn blank_window_still_returns_a_gated_hypothesis() {
        let data = vec![0u8; 32 * 32];
        let map = EdgeMap::new(32, 32, &data).unwrap();
        let win = Window::extract(&map, [16.0, 16.0], 32);
        let mut rng = StdRng::seed_from_u64(3);
        let params = RansacParams {
            max_trials: 2_000,
            ..Default::default()
        };
        let hit = ransac_quad(&win, &[], &params, &mut rng, &SearchBudget::unlimited()).unwrap();
        assert_eq!(hit.fit, 0);
        let area = hit.quad.area();
        assert!(area >= 0.25 * 1024.0 && area <= 0.81 * 1024.0);
    }

    #[test]
    fn impossible_gate_finds_nothing() {
        let data = vec![EDGE; 32 * 32];
        let map = EdgeMap::new(32, 32, &data).unwrap();
        let win = Window::extract(&map, [16.0, 16.0], 32);
        let mut rng = StdRng::seed_from_u64(5);
        let params = RansacParams {
            max_trials: 500,
            reference_area: Some(1.0e6),
            ..Default::default()
        };
        assert!(ransac_quad(&win, &[], &params, &mut rng, &SearchBudget::unlimited()).is_none());
    }

    #[test]
    fn cancelled_budget_stops_immediately() {
        let data = vec![EDGE; 32 * 32];
        let map = EdgeMap::new(32, 32, &data).unwrap();
        let win = Window::extract(&map, [16.0, 16.0], 32);
        let token = CancelToken::new();
        token.cancel();
        let budget = SearchBudget::unlimited().with_cancel(token);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(ransac_quad(&win, &[], &RansacParams::default(), &mut rng, &budget).is_none());
    }

    #[test]
    fn same_seed_same_result() {
        let data = vec![EDGE; 48 * 48];
        let map = EdgeMap::new(48, 48, &data).unwrap();
        let win = Window::extract(&map, [24.0, 24.0], 48);
        let params = RansacParams {
            max_trials: 3_000,
            ..Default::default()
        };
        let known = [[5.0, 5.0], [40.0, 42.0]];
        let a = ransac_quad(
            &win,
            &known,
            &params,
            &mut StdRng::seed_from_u64(9),
            &SearchBudget::unlimited(),
        )
        .unwrap();
        let b = ransac_quad(
            &win,
            &known,
            &params,
            &mut StdRng::seed_from_u64(9),
            &SearchBudget::unlimited(),
        )
        .unwrap();
        assert_eq!(a.quad, b.quad);
        assert_eq!(a.fit, b.fit);
    }
}
