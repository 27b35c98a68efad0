//! I/O helpers for edge rasters and JSON.
//!
//! - `load_edge_map`: read a PNG/JPEG/etc. and binarize it into an owned raster.
//! - `save_grayscale_u8`: write an owned 8-bit gray buffer to a PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{EdgeMap, EDGE};
use image::{DynamicImage, ImageBuffer, Luma};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Owned 8-bit grayscale buffer with a borrowed edge-map view.
#[derive(Clone, Debug)]
pub struct GrayImageU8 {
    width: usize,
    height: usize,
    stride: usize,
    data: Vec<u8>,
}

impl GrayImageU8 {
    /// Construct an owned grayscale buffer given raw bytes.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Self {
        let stride = width;
        Self {
            width,
            height,
            stride,
            data,
        }
    }

    /// Image width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Borrow as a read-only `EdgeMap` view
    pub fn as_edge_map(&self) -> EdgeMap<'_> {
        EdgeMap {
            w: self.width,
            h: self.height,
            stride: self.stride,
            data: &self.data,
        }
    }

    /// Sets a pixel if it lies inside the buffer.
    pub fn put(&mut self, x: i64, y: i64, value: u8) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.data[y as usize * self.stride + x as usize] = value;
        }
    }

    /// Rasterizes the segment `a → b` with two samples per pixel of length.
    pub fn draw_segment(&mut self, a: [f32; 2], b: [f32; 2], value: u8) {
        let len = ((b[0] - a[0]).powi(2) + (b[1] - a[1]).powi(2)).sqrt();
        let n = ((len * 2.0).ceil() as usize).max(1);
        for i in 0..=n {
            let t = i as f32 / n as f32;
            let x = a[0] + (b[0] - a[0]) * t;
            let y = a[1] + (b[1] - a[1]) * t;
            self.put(x.round() as i64, y.round() as i64, value);
        }
    }

    /// Scales every pixel value by `factor`.
    pub fn dim(&mut self, factor: f32) {
        for v in &mut self.data {
            *v = (*v as f32 * factor).round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Load an image from disk, convert to grayscale and binarize it: pixels
/// strictly above `threshold` become edges.
pub fn load_edge_map(path: &Path, threshold: u8) -> Result<GrayImageU8, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_luma8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    let data = img
        .into_raw()
        .into_iter()
        .map(|v| if v > threshold { EDGE } else { 0 })
        .collect();
    Ok(GrayImageU8::new(width, height, data))
}

/// Save an 8-bit grayscale buffer to a PNG.
pub fn save_grayscale_u8(buffer: &GrayImageU8, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let data = buffer.data.clone();
    let image: ImageBuffer<Luma<u8>, Vec<u8>> =
        ImageBuffer::from_raw(buffer.width as u32, buffer.height as u32, data)
            .ok_or_else(|| "Failed to create image buffer".to_string())?;
    DynamicImage::ImageLuma8(image)
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
