//! Corner candidates from extracted lines.
use crate::geometry::{distance, line_intersection, midpoint, round_point};
use crate::lines::SupportedLine;

/// Intersection parameters accepted along each full-window line.
const SEGMENT_PARAM_RANGE: std::ops::RangeInclusive<f32> = -0.5..=1.5;

/// Resolves window-local corner candidates.
///
/// 1. Pairwise intersections of the lines' full-window extents that fall
///    strictly inside the window, skipping any within `size / 6` of an
///    accepted one.
/// 2. Supported endpoints not within `size / 8` of an intersection; endpoints
///    within `size / 10` of each other are averaged.
///
/// Intersections come first. Every candidate is rounded and lies strictly
/// inside `(0, size)²`.
pub fn resolve_vertices(lines: &[SupportedLine], size: usize) -> Vec<[f32; 2]> {
    let s = size as f32;
    let inside = |p: [f32; 2]| p[0] > 0.0 && p[1] > 0.0 && p[0] < s && p[1] < s;

    let mut intersections: Vec<[f32; 2]> = Vec::new();
    for (i, a) in lines.iter().enumerate() {
        for b in &lines[i + 1..] {
            let Some((p, ua, ub)) =
                line_intersection(a.extent.p0, a.extent.p1, b.extent.p0, b.extent.p1)
            else {
                continue;
            };
            if !SEGMENT_PARAM_RANGE.contains(&ua) || !SEGMENT_PARAM_RANGE.contains(&ub) {
                continue;
            }
            if !inside(p) || intersections.iter().any(|q| distance(p, *q) < s / 6.0) {
                continue;
            }
            intersections.push(p);
        }
    }

    let mut endpoints: Vec<[f32; 2]> = Vec::new();
    for line in lines {
        for p in [line.segment.p0, line.segment.p1] {
            if intersections.iter().any(|q| distance(p, *q) < s / 8.0) {
                continue;
            }
            match endpoints.iter_mut().find(|q| distance(p, **q) < s / 10.0) {
                Some(q) => *q = midpoint(*q, p),
                None => endpoints.push(p),
            }
        }
    }

    intersections
        .into_iter()
        .chain(endpoints)
        .map(round_point)
        .filter(|p| inside(*p))
        .collect()
}
