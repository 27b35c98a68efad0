//! Labeled quadrilateral.
//!
//! A [`Quad`] stores its four corners and derives the labeled edges from them,
//! so adjacent edges always share endpoints:
//!
//! - top: top-left → top-right
//! - bottom: bottom-left → bottom-right
//! - left: top-left → bottom-left
//! - right: top-right → bottom-right
use super::{
    add, distance, midpoint, normalized, segments_cross, signed_area, sub, triangle_area, EPS,
};
use serde::{Deserialize, Serialize};

/// Corner labels, in perimeter order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomRight,
        Corner::BottomLeft,
    ];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Corner::TopLeft => 0,
            Corner::TopRight => 1,
            Corner::BottomRight => 2,
            Corner::BottomLeft => 3,
        }
    }
}

/// Directed edge between two corners.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub p1: [f32; 2],
    pub p2: [f32; 2],
}

impl Edge {
    pub fn new(p1: [f32; 2], p2: [f32; 2]) -> Self {
        Self { p1, p2 }
    }

    pub fn length(&self) -> f32 {
        distance(self.p1, self.p2)
    }

    /// Unit direction from `p1` to `p2`, `None` for a zero-length edge.
    pub fn direction(&self) -> Option<[f32; 2]> {
        normalized(sub(self.p2, self.p1))
    }

    /// Orientation of the edge in radians, in `(-π, π]`.
    pub fn angle(&self) -> f32 {
        let d = sub(self.p2, self.p1);
        d[1].atan2(d[0])
    }

    pub fn midpoint(&self) -> [f32; 2] {
        midpoint(self.p1, self.p2)
    }

    pub fn crosses(&self, other: &Edge) -> bool {
        segments_cross(self.p1, self.p2, other.p1, other.p2)
    }
}

/// Quadrilateral with labeled corners; vertex order is top-left, top-right,
/// bottom-right, bottom-left.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quad {
    pub top_left: [f32; 2],
    pub top_right: [f32; 2],
    pub bottom_right: [f32; 2],
    pub bottom_left: [f32; 2],
}

impl Quad {
    pub fn new(
        top_left: [f32; 2],
        top_right: [f32; 2],
        bottom_right: [f32; 2],
        bottom_left: [f32; 2],
    ) -> Self {
        Self {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        }
    }

    /// Builds a quad from vertices in perimeter order (tl, tr, br, bl).
    pub fn from_vertices(v: [[f32; 2]; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }

    pub fn vertices(&self) -> [[f32; 2]; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    pub fn corner(&self, corner: Corner) -> [f32; 2] {
        self.vertices()[corner.index()]
    }

    /// Copy of this quad with one corner replaced; other roles are kept.
    pub fn with_corner(&self, corner: Corner, p: [f32; 2]) -> Self {
        let mut v = self.vertices();
        v[corner.index()] = p;
        Self::from_vertices(v)
    }

    pub fn top(&self) -> Edge {
        Edge::new(self.top_left, self.top_right)
    }

    pub fn bottom(&self) -> Edge {
        Edge::new(self.bottom_left, self.bottom_right)
    }

    pub fn left(&self) -> Edge {
        Edge::new(self.top_left, self.bottom_left)
    }

    pub fn right(&self) -> Edge {
        Edge::new(self.top_right, self.bottom_right)
    }

    /// Edges in the order top, bottom, left, right.
    pub fn edges(&self) -> [Edge; 4] {
        [self.top(), self.bottom(), self.left(), self.right()]
    }

    pub fn side_lengths(&self) -> [f32; 4] {
        self.edges().map(|e| e.length())
    }

    /// Mean of the four corners.
    pub fn centroid(&self) -> [f32; 2] {
        let v = self.vertices();
        [
            (v[0][0] + v[1][0] + v[2][0] + v[3][0]) * 0.25,
            (v[0][1] + v[1][1] + v[2][1] + v[3][1]) * 0.25,
        ]
    }

    /// Area as the sum of the two triangles on either side of a diagonal,
    /// each evaluated with Brahmagupta's formula (Heron form). Both diagonal
    /// splits are computed and the larger is returned, which equals the
    /// polygon area for convex shapes and stays positive for concave ones.
    pub fn area(&self) -> f32 {
        let [tl, tr, br, bl] = self.vertices();
        let via_tl_br = triangle_area(tl, tr, br) + triangle_area(tl, br, bl);
        let via_tr_bl = triangle_area(tl, tr, bl) + triangle_area(tr, br, bl);
        via_tl_br.max(via_tr_bl)
    }

    /// Shoelace area in perimeter order; negative when the labels run
    /// counter-clockwise.
    pub fn signed_area(&self) -> f32 {
        signed_area(&self.vertices())
    }

    /// True when neither top/bottom nor left/right cross each other.
    pub fn is_simple(&self) -> bool {
        !self.top().crosses(&self.bottom()) && !self.left().crosses(&self.right())
    }

    /// Interior angles in degrees at tl, tr, br, bl. `None` when two
    /// consecutive corners coincide.
    pub fn interior_angles_deg(&self) -> Option<[f32; 4]> {
        let v = self.vertices();
        let mut out = [0.0f32; 4];
        for i in 0..4 {
            let prev = v[(i + 3) % 4];
            let next = v[(i + 1) % 4];
            let a = normalized(sub(prev, v[i]))?;
            let b = normalized(sub(next, v[i]))?;
            let cos = (a[0] * b[0] + a[1] * b[1]).clamp(-1.0, 1.0);
            out[i] = cos.acos().to_degrees();
        }
        Some(out)
    }

    /// Point-in-quad test: the four triangles spanned by `p` and each edge
    /// add up to the quad's area within a relative tolerance.
    pub fn contains(&self, p: [f32; 2]) -> bool {
        let area = self.area();
        if area <= EPS {
            return false;
        }
        let [tl, tr, br, bl] = self.vertices();
        let sum = triangle_area(p, tl, tr)
            + triangle_area(p, tr, br)
            + triangle_area(p, br, bl)
            + triangle_area(p, bl, tl);
        (sum - area).abs() <= area * 1e-3 + 0.5
    }

    pub fn translated(&self, delta: [f32; 2]) -> Self {
        self.map(|p| add(p, delta))
    }

    pub fn map(&self, f: impl FnMut([f32; 2]) -> [f32; 2]) -> Self {
        Self::from_vertices(self.vertices().map(f))
    }

    /// True when every vertex lies in `[0, width) × [0, height)`.
    pub fn within_bounds(&self, width: usize, height: usize) -> bool {
        self.vertices().iter().all(|p| {
            p[0] >= 0.0 && p[1] >= 0.0 && p[0] < width as f32 && p[1] < height as f32
        })
    }

    /// True when any vertex is non-finite.
    pub fn has_non_finite(&self) -> bool {
        self.vertices()
            .iter()
            .any(|p| !p[0].is_finite() || !p[1].is_finite())
    }
}
