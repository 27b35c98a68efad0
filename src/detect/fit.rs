//! Boundary fit score.
use crate::geometry::{add, scale, Quad};
use crate::window::Window;

/// Counts boundary samples that sit on edge pixels.
///
/// Each side (top, bottom, left, right) is walked from its first endpoint in
/// unit steps `j = 0, 1, … < length`. A sample counts when its rounded
/// position or one of its four neighbours is an edge pixel. Samples outside
/// the open window square are skipped. `quad` is in global coordinates.
pub fn fit_score(window: &Window, quad: &Quad) -> u32 {
    quad.edges()
        .iter()
        .map(|edge| {
            let Some(dir) = edge.direction() else {
                return 0;
            };
            let p1 = window.to_local(edge.p1);
            let len = edge.length();
            let mut hits = 0u32;
            let mut j = 0.0f32;
            while j < len {
                let p = add(p1, scale(dir, j));
                if window.contains_local(p) && window.stencil_hit(p) {
                    hits += 1;
                }
                j += 1.0;
            }
            hits
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{EdgeMap, EDGE};

    fn outline_window() -> (Vec<u8>, Quad) {
        let size = 64usize;
        let mut data = vec![0u8; size * size];
        for x in 12..=52 {
            data[17 * size + x] = EDGE;
            data[47 * size + x] = EDGE;
        }
        for y in 17..=47 {
            data[y * size + 12] = EDGE;
            data[y * size + 52] = EDGE;
        }
        let q = Quad::new([12.0, 17.0], [52.0, 17.0], [52.0, 47.0], [12.0, 47.0]);
        (data, q)
    }

    #[test]
    fn exact_outline_scores_its_sample_count() {
        let (data, q) = outline_window();
        let map = EdgeMap::new(64, 64, &data).unwrap();
        let win = Window::extract(&map, [32.0, 32.0], 64);
        assert_eq!(fit_score(&win, &q), 40 + 40 + 30 + 30);
    }

    #[test]
    fn fit_is_deterministic_and_local() {
        let (data, q) = outline_window();
        let map = EdgeMap::new(64, 64, &data).unwrap();
        let win = Window::extract(&map, [32.0, 32.0], 64);
        assert_eq!(fit_score(&win, &q), fit_score(&win, &q));
        // shifted 8 px down: only the overlapping stretches of the legs and
        // three samples of the top edge near the legs still hit
        assert_eq!(fit_score(&win, &q.translated([0.0, 8.0])), 24 + 24 + 3);
        // one-pixel offsets are tolerated by the stencil
        assert_eq!(fit_score(&win, &q.translated([1.0, 0.0])), 140);
    }

    #[test]
    fn samples_outside_the_window_are_skipped() {
        let data = vec![EDGE; 16 * 16];
        let map = EdgeMap::new(16, 16, &data).unwrap();
        let win = Window::extract(&map, [8.0, 8.0], 16);
        let q = Quad::new([-10.0, -10.0], [30.0, -10.0], [30.0, 30.0], [-10.0, 30.0]);
        assert_eq!(fit_score(&win, &q), 0);
        let degenerate = Quad::new([4.0, 4.0], [4.0, 4.0], [4.0, 4.0], [4.0, 4.0]);
        assert_eq!(fit_score(&win, &degenerate), 0);
    }
}
