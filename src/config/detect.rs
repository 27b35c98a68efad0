use crate::detect::{ProcessingOptions, RansacParams};
use crate::ribbon::PropagationParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Detected ribbons and per-seed reports.
    pub ribbons_json: Option<PathBuf>,
    /// Edge map with the slice outlines drawn on top.
    pub overlay_image: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DetectToolConfig {
    pub input: PathBuf,
    /// Gray values above this become edge pixels.
    #[serde(default = "default_binarize_threshold")]
    pub binarize_threshold: u8,
    /// One ribbon is detected per seed point (global pixel coordinates).
    pub seeds: Vec<[f32; 2]>,
    #[serde(default)]
    pub options: ProcessingOptions,
    #[serde(default)]
    pub ransac: RansacParams,
    #[serde(default)]
    pub propagation: PropagationParams,
    #[serde(default)]
    pub rng_seed: u64,
    /// Per-seed search budget in milliseconds.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_binarize_threshold() -> u8 {
    127
}

pub fn load_config(path: &Path) -> Result<DetectToolConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: DetectToolConfig = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    Ok(config)
}
