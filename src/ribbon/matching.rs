//! Reference-point transfer between slices.
use crate::angle::signed_difference;
use crate::geometry::{add, rotate_about, sub, Quad};

/// Maps `point`, given relative to `source`, onto `target`: its offset from
/// the source centroid is rotated by the change in top-edge angle and
/// re-applied at the target centroid.
pub fn transfer_point(source: &Quad, target: &Quad, point: [f32; 2]) -> [f32; 2] {
    let offset = sub(point, source.centroid());
    let center = target.centroid();
    let turn = signed_difference(source.top().angle(), target.top().angle());
    rotate_about(add(center, offset), center, turn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rotation_follows_the_top_edge() {
        let source = Quad::new([0.0, 0.0], [40.0, 0.0], [40.0, 20.0], [0.0, 20.0]);
        let target = source.map(|p| rotate_about(p, [20.0, 10.0], 0.5)).translated([100.0, 50.0]);
        let point = [30.0, 10.0];
        let moved = transfer_point(&source, &target, point);
        let expected = add(rotate_about(point, [20.0, 10.0], 0.5), [100.0, 50.0]);
        assert_relative_eq!(moved[0], expected[0], epsilon = 1e-3);
        assert_relative_eq!(moved[1], expected[1], epsilon = 1e-3);
    }

    #[test]
    fn identity_on_the_same_slice() {
        let q = Quad::new([3.0, 4.0], [50.0, 6.0], [48.0, 30.0], [5.0, 28.0]);
        let p = transfer_point(&q, &q, [20.0, 15.0]);
        assert_relative_eq!(p[0], 20.0, epsilon = 1e-4);
        assert_relative_eq!(p[1], 15.0, epsilon = 1e-4);
    }
}
