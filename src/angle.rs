//! Angle helpers for edge directions.
use std::f32::consts::{FRAC_PI_2, PI};

/// Wraps an angle into `[0, π)`, folding antipodal directions together.
#[inline]
pub fn normalize_half_pi(angle: f32) -> f32 {
    let norm = angle.rem_euclid(PI);
    if norm >= PI - 1e-6 {
        0.0
    } else {
        norm
    }
}

/// Smallest unsigned difference between two line orientations, treating
/// directions π apart as equal. Result in `[0, π/2]`.
#[inline]
pub fn angular_difference(a: f32, b: f32) -> f32 {
    let diff = (a - b).abs().rem_euclid(PI);
    if diff > FRAC_PI_2 {
        PI - diff
    } else {
        diff
    }
}

/// Signed difference `to - from` wrapped into `(-π, π]`.
#[inline]
pub fn signed_difference(from: f32, to: f32) -> f32 {
    let d = (to - from).rem_euclid(2.0 * PI);
    if d > PI {
        d - 2.0 * PI
    } else {
        d
    }
}

/// Bisector of two unit directions. `b` is flipped first when it points
/// against `a`, so opposite edge directions of the same shape average to a
/// common axis instead of cancelling. `None` when the inputs cancel anyway.
pub fn mean_direction(a: [f32; 2], b: [f32; 2]) -> Option<[f32; 2]> {
    let b = if a[0] * b[0] + a[1] * b[1] < 0.0 {
        [-b[0], -b[1]]
    } else {
        b
    };
    let sum = [a[0] + b[0], a[1] + b[1]];
    let n = (sum[0] * sum[0] + sum[1] * sum[1]).sqrt();
    (n > 1e-6).then(|| [sum[0] / n, sum[1] / n])
}

/// Unit vector for the direction `deg` degrees from the +x axis.
#[inline]
pub fn unit_from_deg(deg: f32) -> [f32; 2] {
    let r = deg.to_radians();
    [r.cos(), r.sin()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn normalize_folds_into_half_turn() {
        assert_relative_eq!(normalize_half_pi(0.5), 0.5, epsilon = 1e-5);
        assert_relative_eq!(normalize_half_pi(-PI / 4.0), 3.0 * PI / 4.0, epsilon = 1e-5);
        assert_relative_eq!(normalize_half_pi(PI), 0.0, epsilon = 1e-5);
        assert_relative_eq!(normalize_half_pi(3.0 * PI), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn difference_ignores_direction() {
        assert_relative_eq!(angular_difference(0.1, PI + 0.1), 0.0, epsilon = 1e-5);
        assert_relative_eq!(angular_difference(0.0, FRAC_PI_2), FRAC_PI_2, epsilon = 1e-5);
        assert_relative_eq!(
            angular_difference(0.2, -0.2),
            angular_difference(-0.2, 0.2),
            epsilon = 1e-6
        );
    }

    #[test]
    fn signed_difference_wraps() {
        assert_relative_eq!(signed_difference(PI - 0.1, -PI + 0.1), 0.2, epsilon = 1e-5);
        assert_relative_eq!(signed_difference(0.3, 0.1), -0.2, epsilon = 1e-5);
    }

    #[test]
    fn mean_direction_handles_opposite_edges() {
        let m = mean_direction([1.0, 0.0], [-1.0, 0.0]).unwrap();
        assert_relative_eq!(m[0], 1.0, epsilon = 1e-6);
        let a = unit_from_deg(10.0);
        let b = unit_from_deg(-10.0);
        let m = mean_direction(a, b).unwrap();
        assert_relative_eq!(m[1], 0.0, epsilon = 1e-6);
        assert!(mean_direction([0.0, 0.0], [0.0, 0.0]).is_none());
    }
}
