use super::{LineSegment, SupportedLine};
use crate::geometry::{add, distance, scale};
use crate::window::Window;

/// Walks every line in unit steps and keeps the span between the first and
/// last samples whose 5-point stencil touches an edge pixel. Lines whose
/// supported span is not longer than `min_length` are dropped; the rest are
/// ranked by support (stable for ties) and capped at `max_lines`.
pub fn trim_to_support(
    window: &Window,
    lines: &[LineSegment],
    min_length: f32,
    max_lines: usize,
) -> Vec<SupportedLine> {
    let mut out: Vec<SupportedLine> = lines
        .iter()
        .filter_map(|line| substantiate(window, line))
        .filter(|s| s.segment.length() > min_length)
        .collect();
    out.sort_by(|a, b| b.support.cmp(&a.support));
    out.truncate(max_lines);
    out
}

fn substantiate(window: &Window, line: &LineSegment) -> Option<SupportedLine> {
    let dir = line.direction()?;
    let len = line.length();
    let mut first: Option<[f32; 2]> = None;
    let mut last = line.p0;
    let mut support = 0usize;
    let mut j = 0.0f32;
    while j < len {
        let p = add(line.p0, scale(dir, j));
        if window.stencil_hit(p) {
            first.get_or_insert(p);
            last = p;
            support += 1;
        }
        j += 1.0;
    }
    let first = first?;
    if distance(first, last) <= 0.0 {
        return None;
    }
    let mut segment = LineSegment::through(first, last)?;
    // keep the Hough parameters of the supporting line
    segment.theta_deg = line.theta_deg;
    segment.r = line.r;
    Some(SupportedLine {
        extent: *line,
        segment,
        support,
    })
}
