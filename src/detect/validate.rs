//! Sanity gate for structured slice candidates.
use super::ProcessingOptions;
use crate::geometry::{distance, Quad};
use serde::Serialize;

/// Minimum area as a fraction of window².
pub const MIN_AREA_FRACTION: f32 = 0.2;
/// Minimum side length as a fraction of the window size.
pub const MIN_SIDE_FRACTION: f32 = 0.1;
/// Interior angles must lie strictly inside this range (degrees).
pub const ANGLE_RANGE_DEG: (f32, f32) = (20.0, 160.0);
/// Largest distance between slice centroid and seed, as a fraction of the
/// window size.
pub const MAX_CENTER_OFFSET_FRACTION: f32 = 0.25;

/// Outcome of each individual check.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Validation {
    pub area: f32,
    pub fit: u32,
    pub area_ok: bool,
    pub fit_ok: bool,
    pub sides_ok: bool,
    pub angles_ok: bool,
    pub centered_ok: bool,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.area_ok && self.fit_ok && self.sides_ok && self.angles_ok && self.centered_ok
    }
}

/// Checks a global-coordinate candidate with fit `fit` found around `seed`.
pub fn validate_slice(
    quad: &Quad,
    fit: u32,
    seed: [f32; 2],
    options: &ProcessingOptions,
) -> Validation {
    let s = options.window_size as f32;
    let area = quad.area();
    let angles_ok = quad.interior_angles_deg().is_some_and(|angles| {
        angles
            .iter()
            .all(|&a| a > ANGLE_RANGE_DEG.0 && a < ANGLE_RANGE_DEG.1)
    });
    Validation {
        area,
        fit,
        area_ok: area > MIN_AREA_FRACTION * s * s,
        fit_ok: fit as f32 > options.first_fit,
        sides_ok: quad
            .side_lengths()
            .iter()
            .all(|&l| l > MIN_SIDE_FRACTION * s),
        angles_ok,
        centered_ok: distance(quad.centroid(), seed) <= MAX_CENTER_OFFSET_FRACTION * s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> ProcessingOptions {
        ProcessingOptions::for_window(64)
    }

    #[test]
    fn centred_rectangle_passes() {
        let q = Quad::new([12.0, 17.0], [52.0, 17.0], [52.0, 47.0], [12.0, 47.0]);
        let v = validate_slice(&q, 140, [32.0, 32.0], &opts());
        assert!(v.is_valid(), "{v:?}");
    }

    #[test]
    fn each_gate_can_fail() {
        let q = Quad::new([12.0, 17.0], [52.0, 17.0], [52.0, 47.0], [12.0, 47.0]);
        assert!(!validate_slice(&q, 20, [32.0, 32.0], &opts()).fit_ok);
        assert!(!validate_slice(&q, 140, [2.0, 2.0], &opts()).centered_ok);

        let small = Quad::new([28.0, 28.0], [36.0, 28.0], [36.0, 36.0], [28.0, 36.0]);
        let v = validate_slice(&small, 140, [32.0, 32.0], &opts());
        assert!(!v.area_ok);
        assert!(v.sides_ok);

        let short_bottom = Quad::new([5.0, 10.0], [60.0, 10.0], [60.0, 60.0], [55.0, 60.0]);
        let v = validate_slice(&short_bottom, 140, [32.0, 32.0], &opts());
        assert!(!v.sides_ok);
        assert!(v.angles_ok);
        assert!(!v.is_valid());

        // 14° at the top-left corner, 170° at the bottom-left
        let spike = Quad::new([4.0, 30.0], [60.0, 22.0], [60.0, 40.0], [40.0, 34.0]);
        let v = validate_slice(&spike, 140, [32.0, 32.0], &opts());
        assert!(!v.angles_ok);
    }
}
