use super::*;
use crate::detect::ProcessingOptions;
use crate::image::{EdgeMap, EDGE};
use crate::window::Window;
use approx::assert_relative_eq;

fn window_from_pixels(size: usize, pixels: &[[usize; 2]]) -> Window {
    let mut data = vec![0u8; size * size];
    for &[x, y] in pixels {
        data[y * size + x] = EDGE;
    }
    let map = EdgeMap::new(size, size, &data).unwrap();
    Window::extract(&map, [(size / 2) as f32, (size / 2) as f32], size)
}

fn rectangle_outline(size: usize, x0: usize, y0: usize, x1: usize, y1: usize) -> Window {
    let mut pixels = Vec::new();
    for x in x0..=x1 {
        pixels.push([x, y0]);
        pixels.push([x, y1]);
    }
    for y in (y0 + 1)..y1 {
        pixels.push([x0, y]);
        pixels.push([x1, y]);
    }
    window_from_pixels(size, &pixels)
}

#[test]
fn horizontal_run_peaks_at_ninety_degrees() {
    let pixels: Vec<[usize; 2]> = (4..=28).map(|x| [x, 10]).collect();
    let win = window_from_pixels(32, &pixels);
    let acc = HoughAccumulator::accumulate(&win);
    // 25 own votes plus 25 from each θ neighbour
    assert_eq!(acc.votes(90, 10), 75);
    assert_eq!(acc.max_votes(), 75);
    let peaks = acc.peaks(0.5);
    assert!(
        peaks.iter().any(|p| p.theta_deg == 90 && p.r == 10),
        "peaks: {peaks:?}"
    );
    assert!(peaks.iter().all(|p| p.votes as f32 > 37.5));
}

#[test]
fn empty_window_has_no_peaks() {
    let win = window_from_pixels(16, &[]);
    let acc = HoughAccumulator::accumulate(&win);
    assert_eq!(acc.max_votes(), 0);
    assert!(acc.peaks(0.1).is_empty());
}

#[test]
fn clipping_handles_axis_aligned_lines() {
    let v = clip_to_window(0.0, 5.0, 20).unwrap();
    assert_eq!(v.p0, [5.0, 0.0]);
    assert_eq!(v.p1, [5.0, 20.0]);

    let h = clip_to_window(90.0, 7.0, 20).unwrap();
    assert_relative_eq!(h.p0[0], 0.0, epsilon = 1e-4);
    assert_relative_eq!(h.p0[1], 7.0, epsilon = 1e-4);
    assert_relative_eq!(h.p1[0], 20.0, epsilon = 1e-4);
    assert_relative_eq!(h.p1[1], 7.0, epsilon = 1e-3);
}

#[test]
fn clipping_diagonals_and_misses() {
    let d = clip_to_window(45.0, 20.0 / std::f32::consts::SQRT_2, 20).unwrap();
    assert_relative_eq!(d.p0[0], 0.0, epsilon = 1e-3);
    assert_relative_eq!(d.p0[1], 20.0, epsilon = 1e-3);
    assert_relative_eq!(d.length(), 20.0 * std::f32::consts::SQRT_2, epsilon = 1e-2);

    // touches the (0, 0) corner only
    assert!(clip_to_window(45.0, 0.0, 20).is_none());
    // entirely left of the window
    assert!(clip_to_window(0.0, -5.0, 20).is_none());
}

#[test]
fn merging_averages_reversed_duplicates_and_drops_short_lines() {
    let a = LineSegment::through([0.0, 10.0], [20.0, 10.0]).unwrap();
    let b = LineSegment::through([20.0, 12.0], [0.0, 12.0]).unwrap();
    let c = LineSegment::through([0.0, 0.0], [3.0, 0.0]).unwrap();
    let merged = merge::merge_lines(&[a, b, c], 5.0, 5.0);
    assert_eq!(merged.len(), 1);
    let m = merged[0];
    assert_relative_eq!(m.p0[0], 0.0, epsilon = 1e-4);
    assert_relative_eq!(m.p0[1], 11.0, epsilon = 1e-4);
    assert_relative_eq!(m.p1[0], 20.0, epsilon = 1e-4);
    assert_relative_eq!(m.p1[1], 11.0, epsilon = 1e-4);
    assert_relative_eq!(m.theta_deg, 90.0, epsilon = 1e-3);
    assert_relative_eq!(m.r, 11.0, epsilon = 1e-3);
}

#[test]
fn trimming_keeps_only_the_supported_span() {
    let pixels: Vec<[usize; 2]> = (8..=20).map(|x| [x, 10]).collect();
    let win = window_from_pixels(32, &pixels);
    let extent = LineSegment::through([0.0, 10.0], [32.0, 10.0]).unwrap();
    let kept = trim::trim_to_support(&win, &[extent], 3.2, 6);
    assert_eq!(kept.len(), 1);
    let line = kept[0];
    assert_eq!(line.segment.p0, [7.0, 10.0]);
    assert_eq!(line.segment.p1, [21.0, 10.0]);
    assert_eq!(line.support, 15);
    assert_eq!(line.extent, extent);

    // same line but demanding a longer span than is supported
    assert!(trim::trim_to_support(&win, &[extent], 20.0, 6).is_empty());
}

#[test]
fn trimming_ranks_by_support_and_caps() {
    let mut pixels: Vec<[usize; 2]> = (2..30).map(|x| [x, 5]).collect();
    pixels.extend((10..20).map(|x| [x, 20]));
    let win = window_from_pixels(32, &pixels);
    let short = LineSegment::through([0.0, 20.0], [32.0, 20.0]).unwrap();
    let long = LineSegment::through([0.0, 5.0], [32.0, 5.0]).unwrap();
    let kept = trim::trim_to_support(&win, &[short, long], 3.2, 1);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].extent, long);
}

#[test]
fn rectangle_outline_yields_four_lines() {
    let win = rectangle_outline(64, 12, 17, 52, 47);
    let options = ProcessingOptions::for_window(64).with_vote_threshold(0.5);
    let out = LineExtractor::new(&win, &options).extract();
    assert!(out.raw.len() >= 4, "raw lines: {}", out.raw.len());
    assert_eq!(out.lines.len(), 4, "kept lines: {:?}", out.lines);
    let horizontal = out
        .lines
        .iter()
        .filter(|l| (l.extent.theta_deg - 90.0).abs() < 5.0)
        .count();
    assert_eq!(horizontal, 2);
}
