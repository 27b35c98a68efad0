/// Pixel value marking an edge in the binary raster.
pub const EDGE: u8 = 255;

/// Borrowed view of a binary edge raster (`0` = background, non-zero = edge).
#[derive(Clone, Debug)]
pub struct EdgeMap<'a> {
    pub w: usize,
    pub h: usize,
    pub stride: usize, // bytes between rows
    pub data: &'a [u8],
}

impl<'a> EdgeMap<'a> {
    /// Contiguous view over `data`; `None` if the buffer is too short.
    pub fn new(w: usize, h: usize, data: &'a [u8]) -> Option<Self> {
        (data.len() >= w * h).then_some(Self {
            w,
            h,
            stride: w,
            data,
        })
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.stride + x]
    }

    /// Reads a pixel with signed coordinates; anything outside the raster is
    /// background.
    #[inline]
    pub fn get_or_zero(&self, x: i64, y: i64) -> u8 {
        if x < 0 || y < 0 || x >= self.w as i64 || y >= self.h as i64 {
            0
        } else {
            self.get(x as usize, y as usize)
        }
    }

    #[inline]
    pub fn is_edge(&self, x: i64, y: i64) -> bool {
        self.get_or_zero(x, y) != 0
    }

    pub fn edge_count(&self) -> usize {
        (0..self.h)
            .map(|y| self.row_slice(y).iter().filter(|&&v| v != 0).count())
            .sum()
    }

    #[inline]
    fn row_slice(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
}

impl<'a> crate::image::traits::ImageView for EdgeMap<'a> {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        self.row_slice(y)
    }
}
