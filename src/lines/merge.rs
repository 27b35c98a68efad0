use super::LineSegment;
use crate::geometry::distance;

/// Fuses segments whose endpoints both lie within `merge_distance` of an
/// already accepted segment (in either orientation). Fused endpoints are the
/// running average over all contributors. Results not longer than
/// `min_length` are dropped.
pub fn merge_lines(
    lines: &[LineSegment],
    merge_distance: f32,
    min_length: f32,
) -> Vec<LineSegment> {
    struct Acc {
        p0: [f32; 2],
        p1: [f32; 2],
        count: f32,
    }

    let mut merged: Vec<Acc> = Vec::new();
    for line in lines {
        let target = merged.iter_mut().find_map(|m| {
            if distance(line.p0, m.p0) < merge_distance && distance(line.p1, m.p1) < merge_distance
            {
                Some((m, line.p0, line.p1))
            } else if distance(line.p0, m.p1) < merge_distance
                && distance(line.p1, m.p0) < merge_distance
            {
                Some((m, line.p1, line.p0))
            } else {
                None
            }
        });
        match target {
            Some((m, a, b)) => {
                let n = m.count;
                m.p0 = [
                    (m.p0[0] * n + a[0]) / (n + 1.0),
                    (m.p0[1] * n + a[1]) / (n + 1.0),
                ];
                m.p1 = [
                    (m.p1[0] * n + b[0]) / (n + 1.0),
                    (m.p1[1] * n + b[1]) / (n + 1.0),
                ];
                m.count = n + 1.0;
            }
            None => merged.push(Acc {
                p0: line.p0,
                p1: line.p1,
                count: 1.0,
            }),
        }
    }

    merged
        .into_iter()
        .filter(|m| distance(m.p0, m.p1) > min_length)
        .filter_map(|m| LineSegment::through(m.p0, m.p1))
        .collect()
}
