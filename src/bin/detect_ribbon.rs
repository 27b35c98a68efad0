use ribbon_detector::budget::SearchBudget;
use ribbon_detector::config::detect::{load_config, DetectToolConfig};
use ribbon_detector::diagnostics::DetectionReport;
use ribbon_detector::image::io::{load_edge_map, save_grayscale_u8, write_json_file, GrayImageU8};
use ribbon_detector::ribbon::Ribbon;
use ribbon_detector::SliceDetector;
use serde::Serialize;
use std::env;
use std::path::Path;
use std::time::Duration;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let raster = load_edge_map(&config.input, config.binarize_threshold)?;
    let edges = raster.as_edge_map();
    let detector = build_detector(&config)?;

    let mut results = Vec::with_capacity(config.seeds.len());
    for &seed in &config.seeds {
        let detector = match config.timeout_ms {
            Some(ms) => detector
                .clone()
                .with_budget(SearchBudget::unlimited().with_timeout(Duration::from_millis(ms))),
            None => detector.clone(),
        };
        let found = detector.detect_ribbon(&edges, seed);
        println!(
            "seed ({:.1}, {:.1}): {} slices in {:.1} ms{}",
            seed[0],
            seed[1],
            found.slices.len(),
            found.report.timings.total_ms,
            found
                .report
                .miss
                .as_deref()
                .map(|m| format!(" ({m})"))
                .unwrap_or_default()
        );
        results.push(SeedResult {
            seed,
            ribbon: Ribbon::from_links(&found.slices),
            report: found.report,
        });
    }

    if let Some(path) = &config.output.ribbons_json {
        let summary = DetectionSummary {
            width: raster.width(),
            height: raster.height(),
            edge_pixels: edges.edge_count(),
            results: &results,
        };
        write_json_file(path, &summary)?;
        println!("Ribbons written to {}", path.display());
    }

    if let Some(path) = &config.output.overlay_image {
        let overlay = render_overlay(&raster, &results);
        save_grayscale_u8(&overlay, path)?;
        println!("Overlay written to {}", path.display());
    }

    Ok(())
}

fn build_detector(config: &DetectToolConfig) -> Result<SliceDetector, String> {
    let detector = SliceDetector::new(config.options.clone())
        .map_err(|e| format!("Invalid processing options: {e}"))?;
    Ok(detector
        .with_ransac(config.ransac.clone())
        .with_propagation(config.propagation.clone())
        .with_rng_seed(config.rng_seed))
}

fn render_overlay(raster: &GrayImageU8, results: &[SeedResult]) -> GrayImageU8 {
    let mut overlay = raster.clone();
    overlay.dim(0.35);
    for result in results {
        for slice in result.ribbon.slices() {
            for edge in slice.quad.edges() {
                overlay.draw_segment(edge.p1, edge.p2, 255);
            }
        }
    }
    overlay
}

fn usage() -> String {
    "Usage: detect_ribbon <config.json>".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SeedResult {
    seed: [f32; 2],
    ribbon: Ribbon,
    report: DetectionReport,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DetectionSummary<'a> {
    width: usize,
    height: usize,
    edge_pixels: usize,
    results: &'a [SeedResult],
}
