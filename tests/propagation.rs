mod common;

use common::synthetic_edges::{centroid, max_corner_error, to_quad, Ladder};
use rand::{rngs::StdRng, SeedableRng};
use ribbon_detector::budget::SearchBudget;
use ribbon_detector::image::EdgeMap;
use ribbon_detector::ribbon::{ChainLink, GeneticParams, Ribbon, RibbonEnd};
use ribbon_detector::{ProcessingOptions, SliceDetector};

fn ladder(angle_deg: f64, width: usize, height: usize, x0: f64) -> Ladder {
    Ladder {
        width,
        height,
        count: 7,
        top: 70.0,
        bottom: 80.0,
        rung_height: 40.0,
        gap: 0.0,
        origin: [x0, 50.0],
        angle_deg,
    }
}

fn options() -> ProcessingOptions {
    ProcessingOptions::for_window(96)
        .with_merge_distance(8.0)
        .with_minimum_fit(150.0)
}

fn walk_ladder(layout: Ladder, seed_rung: usize) {
    let _ = env_logger::builder().is_test(true).try_init();
    let (raster, rungs) = layout.render();
    let edges = EdgeMap::new(layout.width, layout.height, &raster).unwrap();
    let detector = SliceDetector::new(options()).unwrap();

    let found = detector.detect_ribbon(&edges, centroid(&rungs[seed_rung]));
    assert_eq!(
        found.slices.len(),
        rungs.len(),
        "slices: {:?}",
        found.slices.iter().map(|s| s.quad.centroid()).collect::<Vec<_>>()
    );
    for (link, rung) in found.slices.iter().zip(&rungs) {
        let err = max_corner_error(&link.quad, rung);
        assert!(err <= 5.0, "corner error {err}: {:?} vs {rung:?}", link.quad);
        assert!(link.fit >= 150);
    }
    let stage = found.report.propagation.unwrap();
    assert_eq!(stage.forward, seed_rung);
    assert_eq!(stage.backward, rungs.len() - 1 - seed_rung);
}

#[test]
fn axis_aligned_ladder_is_walked_both_ways() {
    walk_ladder(ladder(0.0, 200, 360, 100.0), 3);
}

#[test]
fn tilted_ladder_is_walked_both_ways() {
    walk_ladder(ladder(10.0, 300, 400, 180.0), 3);
}

#[test]
fn axis_aligned_ladder_is_walked_from_either_end() {
    walk_ladder(ladder(0.0, 200, 360, 100.0), 0);
    walk_ladder(ladder(0.0, 200, 360, 100.0), 6);
}

#[test]
fn tilted_ladder_is_walked_from_either_end() {
    walk_ladder(ladder(10.0, 300, 400, 180.0), 0);
    walk_ladder(ladder(10.0, 300, 400, 180.0), 6);
}

#[test]
fn ribbon_detection_is_reproducible() {
    let layout = ladder(0.0, 200, 360, 100.0);
    let (raster, rungs) = layout.render();
    let edges = EdgeMap::new(layout.width, layout.height, &raster).unwrap();
    let detector = SliceDetector::new(options()).unwrap().with_rng_seed(11);
    let a = detector.detect_ribbon(&edges, centroid(&rungs[2]));
    let b = detector.detect_ribbon(&edges, centroid(&rungs[2]));
    assert_eq!(a.slices, b.slices);
}

#[test]
fn appended_slice_lands_on_the_next_rung() {
    let layout = ladder(0.0, 200, 360, 100.0);
    let (raster, rungs) = layout.render();
    let edges = EdgeMap::new(layout.width, layout.height, &raster).unwrap();

    // slightly misplaced neighbours give a rough extrapolation
    let a = to_quad(rungs[2]).translated([2.0, 1.0]);
    let b = to_quad(rungs[3]).translated([1.0, -1.0]);
    let mut ribbon = Ribbon::from_links(&[
        ChainLink { quad: a, fit: 0 },
        ChainLink { quad: b, fit: 0 },
    ]);

    let params = GeneticParams {
        population: 120,
        elite: 12,
        stall_generations: 30,
        max_generations: 150,
        area_floor: 0.25,
        ..GeneticParams::default()
    };
    let mut rng = StdRng::seed_from_u64(3);
    let id = ribbon
        .append_slice(
            &edges,
            RibbonEnd::Tail,
            &options(),
            &params,
            &mut rng,
            &SearchBudget::unlimited(),
        )
        .unwrap();

    assert_eq!(ribbon.len(), 3);
    let last = &ribbon.slices()[2];
    assert_eq!(last.id, id);
    assert!(last.fit >= 180, "fit {}", last.fit);
    let err = max_corner_error(&last.quad, &rungs[4]);
    assert!(err < 8.0, "corner error {err}: {:?}", last.quad);
}
