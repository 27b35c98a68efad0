//! Assigning four loose points to labeled corners.
//!
//! All 24 orderings are enumerated as (top-left, top-right, bottom-right,
//! bottom-left). An ordering is admissible when top and bottom do not cross,
//! left and right do not cross, and the top edge runs left to right. Among
//! the admissible orderings the preference is, in order:
//!
//! 1. the largest polygon area (selects the simple, non-folded outline);
//! 2. the opposite pair of edges that is closest to parallel becomes
//!    top/bottom;
//! 3. the larger combined top + bottom length;
//! 4. the top edge with the smaller mean y.
//!
//! The points are sorted before enumeration, so the labeling depends only on
//! the point set. Running the assignment on the vertices of its own output
//! reproduces the output.
use super::{distance, Quad, EPS};
use crate::angle::angular_difference;

/// Relative tolerance under which two areas or lengths count as equal.
const REL_TOL: f32 = 1e-3;
/// Parallelism differences below this many radians count as equal.
const PARALLEL_TOL: f32 = 2.0 * std::f32::consts::PI / 180.0;

#[derive(Clone, Copy, Debug)]
struct Score {
    area: f32,
    skew: f32,
    span: f32,
    top_y: f32,
}

impl Score {
    fn of(q: &Quad) -> Self {
        let top = q.top();
        let bottom = q.bottom();
        Self {
            area: q.signed_area().abs(),
            skew: angular_difference(top.angle(), bottom.angle()),
            span: top.length() + bottom.length(),
            top_y: top.midpoint()[1] - bottom.midpoint()[1],
        }
    }

    fn beats(&self, other: &Score) -> bool {
        let area_tol = REL_TOL * self.area.max(other.area).max(1.0);
        if (self.area - other.area).abs() > area_tol {
            return self.area > other.area;
        }
        if (self.skew - other.skew).abs() > PARALLEL_TOL {
            return self.skew < other.skew;
        }
        let span_tol = REL_TOL * self.span.max(other.span).max(1.0);
        if (self.span - other.span).abs() > span_tol {
            return self.span > other.span;
        }
        if (self.top_y - other.top_y).abs() > EPS {
            return self.top_y < other.top_y;
        }
        false
    }
}

/// Heap's algorithm over 4 indices; yields all 24 orderings deterministically.
fn permutations4() -> Vec<[usize; 4]> {
    let mut out = Vec::with_capacity(24);
    let mut a = [0usize, 1, 2, 3];
    let mut c = [0usize; 4];
    out.push(a);
    let mut i = 0;
    while i < 4 {
        if c[i] < i {
            if i % 2 == 0 {
                a.swap(0, i);
            } else {
                a.swap(c[i], i);
            }
            out.push(a);
            c[i] += 1;
            i = 0;
        } else {
            c[i] = 0;
            i += 1;
        }
    }
    out
}

fn admissible(q: &Quad) -> bool {
    if q.top_left[0] > q.top_right[0] {
        return false;
    }
    q.is_simple()
}

/// Labels four points as a quadrilateral, or `None` when the points are
/// degenerate (coincident, non-finite, or with no admissible ordering of
/// positive area).
pub fn assign_roles(points: [[f32; 2]; 4]) -> Option<Quad> {
    let mut pts = points;
    if pts.iter().any(|p| !p[0].is_finite() || !p[1].is_finite()) {
        return None;
    }
    pts.sort_by(|a, b| a[0].total_cmp(&b[0]).then(a[1].total_cmp(&b[1])));
    for i in 0..4 {
        for j in (i + 1)..4 {
            if distance(pts[i], pts[j]) <= EPS {
                return None;
            }
        }
    }

    let mut best: Option<(Quad, Score)> = None;
    for perm in permutations4() {
        let q = Quad::from_vertices(perm.map(|k| pts[k]));
        if !admissible(&q) {
            continue;
        }
        let score = Score::of(&q);
        if score.area <= EPS {
            continue;
        }
        match &best {
            Some((_, current)) if !score.beats(current) => {}
            _ => best = Some((q, score)),
        }
    }
    best.map(|(q, _)| q)
}
