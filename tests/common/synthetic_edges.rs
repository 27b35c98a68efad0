#![allow(dead_code)]

use ribbon_detector::geometry::Quad;

/// Blank edge raster.
pub fn blank(width: usize, height: usize) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    vec![0u8; width * height]
}

/// Marks the segment `a → b` with two samples per pixel of length, rounding
/// half away from zero.
pub fn draw_line(raster: &mut [u8], width: usize, a: [f64; 2], b: [f64; 2]) {
    let height = raster.len() / width;
    let len = ((b[0] - a[0]).powi(2) + (b[1] - a[1]).powi(2)).sqrt();
    let n = ((len * 2.0).ceil() as usize).max(1);
    for i in 0..=n {
        let t = i as f64 / n as f64;
        let x = (a[0] + (b[0] - a[0]) * t).round();
        let y = (a[1] + (b[1] - a[1]) * t).round();
        if x >= 0.0 && y >= 0.0 && (x as usize) < width && (y as usize) < height {
            raster[y as usize * width + x as usize] = 255;
        }
    }
}

/// Outline of a polygon given as `[top-left, top-right, bottom-right,
/// bottom-left]`.
pub fn draw_quad(raster: &mut [u8], width: usize, corners: [[f64; 2]; 4]) {
    for i in 0..4 {
        draw_line(raster, width, corners[i], corners[(i + 1) % 4]);
    }
}

pub fn to_quad(corners: [[f64; 2]; 4]) -> Quad {
    Quad::from_vertices(corners.map(|p| [p[0] as f32, p[1] as f32]))
}

/// Stack of `count` trapezoids (top width, bottom width, height) one below the
/// other, `gap` pixels apart, rotated by `angle_deg` about `origin`, which is
/// the centre of the first rung. Returns the raster and the rung corners.
pub struct Ladder {
    pub width: usize,
    pub height: usize,
    pub count: usize,
    pub top: f64,
    pub bottom: f64,
    pub rung_height: f64,
    pub gap: f64,
    pub origin: [f64; 2],
    pub angle_deg: f64,
}

impl Ladder {
    pub fn rungs(&self) -> Vec<[[f64; 2]; 4]> {
        let (s, c) = self.angle_deg.to_radians().sin_cos();
        let h = self.rung_height / 2.0;
        (0..self.count)
            .map(|i| {
                let dy = i as f64 * (self.rung_height + self.gap);
                let local = [
                    [-self.top / 2.0, -h + dy],
                    [self.top / 2.0, -h + dy],
                    [self.bottom / 2.0, h + dy],
                    [-self.bottom / 2.0, h + dy],
                ];
                local.map(|[x, y]| [self.origin[0] + x * c - y * s, self.origin[1] + x * s + y * c])
            })
            .collect()
    }

    pub fn render(&self) -> (Vec<u8>, Vec<[[f64; 2]; 4]>) {
        let mut raster = blank(self.width, self.height);
        let rungs = self.rungs();
        for rung in &rungs {
            draw_quad(&mut raster, self.width, *rung);
        }
        (raster, rungs)
    }
}

pub fn centroid(corners: &[[f64; 2]; 4]) -> [f32; 2] {
    let x = corners.iter().map(|p| p[0]).sum::<f64>() / 4.0;
    let y = corners.iter().map(|p| p[1]).sum::<f64>() / 4.0;
    [x as f32, y as f32]
}

/// Largest corner distance between `quad` and the expected corners.
pub fn max_corner_error(quad: &Quad, expected: &[[f64; 2]; 4]) -> f32 {
    quad.vertices()
        .iter()
        .zip(expected.iter())
        .map(|(a, b)| ((a[0] - b[0] as f32).powi(2) + (a[1] - b[1] as f32).powi(2)).sqrt())
        .fold(0.0, f32::max)
}
