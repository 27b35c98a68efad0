//! Square sub-rasters of the edge map.
//!
//! A [`Window`] copies `size × size` pixels of the edge map around a centre
//! point. Source pixels outside the image read as background. The window
//! remembers its origin so callers can move between window-local and global
//! image coordinates explicitly.
use crate::geometry::{Quad, EPS};
use crate::image::{EdgeMap, ImageView};

#[derive(Clone, Debug)]
pub struct Window {
    size: usize,
    origin: [i64; 2],
    data: Vec<u8>,
}

impl Window {
    /// Copies the `size × size` region whose centre is closest to `center`.
    pub fn extract(edges: &EdgeMap<'_>, center: [f32; 2], size: usize) -> Self {
        let half = (size / 2) as i64;
        let origin = [
            center[0].round() as i64 - half,
            center[1].round() as i64 - half,
        ];
        let mut data = vec![0u8; size * size];

        let x0 = origin[0].max(0);
        let x1 = (origin[0] + size as i64).min(edges.width() as i64);
        if x0 < x1 {
            for wy in 0..size {
                let gy = origin[1] + wy as i64;
                if gy < 0 || gy >= edges.height() as i64 {
                    continue;
                }
                let src = &edges.row(gy as usize)[x0 as usize..x1 as usize];
                let dst_start = wy * size + (x0 - origin[0]) as usize;
                data[dst_start..dst_start + src.len()].copy_from_slice(src);
            }
        }

        Self { size, origin, data }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Global coordinates of local pixel `(0, 0)`.
    #[inline]
    pub fn origin(&self) -> [i64; 2] {
        self.origin
    }

    /// Global coordinates of the window centre.
    pub fn center(&self) -> [f32; 2] {
        let half = self.size as f32 * 0.5;
        [self.origin[0] as f32 + half, self.origin[1] as f32 + half]
    }

    /// Local pixel value; outside the window reads as background.
    #[inline]
    pub fn get(&self, x: i64, y: i64) -> u8 {
        let s = self.size as i64;
        if x < 0 || y < 0 || x >= s || y >= s {
            0
        } else {
            self.data[y as usize * self.size + x as usize]
        }
    }

    #[inline]
    pub fn is_edge(&self, x: i64, y: i64) -> bool {
        self.get(x, y) != 0
    }

    /// Edge test at the rounded local point `p` and its four neighbours.
    #[inline]
    pub fn stencil_hit(&self, p: [f32; 2]) -> bool {
        let x = p[0].round() as i64;
        let y = p[1].round() as i64;
        self.is_edge(x, y)
            || self.is_edge(x + 1, y)
            || self.is_edge(x - 1, y)
            || self.is_edge(x, y + 1)
            || self.is_edge(x, y - 1)
    }

    /// Local coordinates of all edge pixels, row-major.
    pub fn edge_pixels(&self) -> Vec<[usize; 2]> {
        let mut out = Vec::new();
        for (y, row) in self.rows().enumerate() {
            for (x, &v) in row.iter().enumerate() {
                if v != 0 {
                    out.push([x, y]);
                }
            }
        }
        out
    }

    #[inline]
    pub fn to_local(&self, p: [f32; 2]) -> [f32; 2] {
        [p[0] - self.origin[0] as f32, p[1] - self.origin[1] as f32]
    }

    #[inline]
    pub fn to_global(&self, p: [f32; 2]) -> [f32; 2] {
        [p[0] + self.origin[0] as f32, p[1] + self.origin[1] as f32]
    }

    pub fn quad_to_global(&self, q: &Quad) -> Quad {
        q.map(|p| self.to_global(p))
    }

    /// True for local points strictly inside the open square `(0, size)²`.
    #[inline]
    pub fn contains_local(&self, p: [f32; 2]) -> bool {
        let s = self.size as f32;
        p[0] > 0.0 && p[1] > 0.0 && p[0] < s && p[1] < s
    }

    /// True for global points on a window pixel, `[origin, origin + size)`.
    #[inline]
    pub fn contains_global(&self, p: [f32; 2]) -> bool {
        let l = self.to_local(p);
        let s = self.size as f32;
        l[0] >= -EPS && l[1] >= -EPS && l[0] < s && l[1] < s
    }

    /// Moves a global point onto the nearest window pixel.
    pub fn clamp_global(&self, p: [f32; 2]) -> [f32; 2] {
        let max = (self.size.saturating_sub(1)) as f32;
        let l = self.to_local(p);
        self.to_global([l[0].clamp(0.0, max), l[1].clamp(0.0, max)])
    }
}

impl crate::image::traits::ImageView for Window {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.size
    }
    #[inline]
    fn height(&self) -> usize {
        self.size
    }
    #[inline]
    fn stride(&self) -> usize {
        self.size
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.size;
        &self.data[start..start + self.size]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::EDGE;

    #[test]
    fn window_copies_and_pads_with_background() {
        let (w, h) = (10usize, 8usize);
        let mut data = vec![0u8; w * h];
        data[2 * w + 3] = EDGE;
        data[7 * w + 9] = EDGE;
        let map = EdgeMap::new(w, h, &data).unwrap();

        let win = Window::extract(&map, [3.0, 2.0], 6);
        assert_eq!(win.origin(), [0, -1]);
        assert!(win.is_edge(3, 3));
        // rows above the image are padding
        assert_eq!(win.row(0), &[0u8; 6]);
        assert_eq!(win.edge_pixels(), vec![[3, 3]]);
        assert_eq!(win.to_global([3.0, 3.0]), [3.0, 2.0]);
    }

    #[test]
    fn window_entirely_outside_is_empty() {
        let data = vec![EDGE; 16];
        let map = EdgeMap::new(4, 4, &data).unwrap();
        let win = Window::extract(&map, [100.0, 100.0], 8);
        assert!(win.edge_pixels().is_empty());
    }

    #[test]
    fn stencil_tolerates_one_pixel_offsets() {
        let mut data = vec![0u8; 25];
        data[2 * 5 + 2] = EDGE;
        let map = EdgeMap::new(5, 5, &data).unwrap();
        let win = Window::extract(&map, [2.0, 2.0], 5);
        assert_eq!(win.origin(), [0, 0]);
        assert!(win.stencil_hit([2.0, 2.0]));
        assert!(win.stencil_hit([3.2, 2.0]));
        assert!(!win.stencil_hit([3.0, 3.0]));
    }

    #[test]
    fn clamping_and_containment() {
        let data = vec![0u8; 100];
        let map = EdgeMap::new(10, 10, &data).unwrap();
        let win = Window::extract(&map, [5.0, 5.0], 6);
        assert_eq!(win.origin(), [2, 2]);
        assert!(win.contains_global([2.0, 7.0]));
        assert!(!win.contains_global([8.0, 7.0]));
        assert_eq!(win.clamp_global([-3.0, 20.0]), [2.0, 7.0]);
    }
}
