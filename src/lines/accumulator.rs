use crate::window::Window;
use rayon::prelude::*;
use serde::Serialize;

/// Number of integer-degree angle bins.
pub const THETA_BINS: usize = 180;
/// Half-width of the non-maximum-suppression neighbourhood.
const NMS_RADIUS: i64 = 2;

/// Accumulator cell kept after thresholding and non-maximum suppression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoughPeak {
    pub theta_deg: usize,
    pub r: i64,
    pub votes: u32,
}

/// Smoothed vote counts indexed by `(θ in degrees, r)`.
#[derive(Clone, Debug)]
pub struct HoughAccumulator {
    /// Index of `r = 0` within a row.
    offset: i64,
    n_r: usize,
    votes: Vec<u32>,
}

impl HoughAccumulator {
    /// Votes every edge pixel of the window. Each pixel adds one vote at
    /// `(θ, r)` and one at each of `(θ, r ± 1)` and `(θ ± 1, r)`; the θ
    /// neighbours do not wrap around.
    pub fn accumulate(window: &Window) -> Self {
        let max_dist = (std::f32::consts::SQRT_2 * window.size() as f32).ceil() as i64;
        let offset = max_dist + 1;
        let n_r = (2 * max_dist + 3) as usize;
        let pixels = window.edge_pixels();

        let mut raw = vec![0u32; THETA_BINS * n_r];
        raw.par_chunks_mut(n_r).enumerate().for_each(|(t, row)| {
            let theta = (t as f32).to_radians();
            let (sin, cos) = theta.sin_cos();
            for &[x, y] in &pixels {
                let r = (x as f32 * cos + y as f32 * sin).round() as i64;
                row[(r + offset) as usize] += 1;
            }
        });

        let mut votes = vec![0u32; THETA_BINS * n_r];
        votes.par_chunks_mut(n_r).enumerate().for_each(|(t, row)| {
            let at = |tt: usize, i: usize| raw[tt * n_r + i];
            for (i, cell) in row.iter_mut().enumerate() {
                let mut v = at(t, i);
                if i > 0 {
                    v += at(t, i - 1);
                }
                if i + 1 < n_r {
                    v += at(t, i + 1);
                }
                if t > 0 {
                    v += at(t - 1, i);
                }
                if t + 1 < THETA_BINS {
                    v += at(t + 1, i);
                }
                *cell = v;
            }
        });

        Self {
            offset,
            n_r,
            votes,
        }
    }

    /// Votes at `(theta_deg, r)`; zero outside the accumulator.
    pub fn votes(&self, theta_deg: usize, r: i64) -> u32 {
        let i = r + self.offset;
        if theta_deg >= THETA_BINS || i < 0 || i >= self.n_r as i64 {
            return 0;
        }
        self.votes[theta_deg * self.n_r + i as usize]
    }

    pub fn max_votes(&self) -> u32 {
        self.votes.iter().copied().max().unwrap_or(0)
    }

    /// Cells with more than `fraction × max` votes that no cell in their
    /// ±2 × ±2 neighbourhood beats. Sorted by θ, then r.
    pub fn peaks(&self, fraction: f32) -> Vec<HoughPeak> {
        let max = self.max_votes();
        if max == 0 {
            return Vec::new();
        }
        let cut = max as f32 * fraction;
        let mut out = Vec::new();
        for t in 0..THETA_BINS {
            for i in 0..self.n_r {
                let v = self.votes[t * self.n_r + i];
                if v == 0 || v as f32 <= cut {
                    continue;
                }
                let r = i as i64 - self.offset;
                if self.is_local_max(t, r, v) {
                    out.push(HoughPeak {
                        theta_deg: t,
                        r,
                        votes: v,
                    });
                }
            }
        }
        out
    }

    fn is_local_max(&self, t: usize, r: i64, v: u32) -> bool {
        for dt in -NMS_RADIUS..=NMS_RADIUS {
            let tt = t as i64 + dt;
            if tt < 0 || tt >= THETA_BINS as i64 {
                continue;
            }
            for dr in -NMS_RADIUS..=NMS_RADIUS {
                if self.votes(tt as usize, r + dr) > v {
                    return false;
                }
            }
        }
        true
    }
}
