//! Hit testing across ribbons.
use super::{Ribbon, SliceId};
use crate::geometry::{distance, Corner, Quad};
use serde::Serialize;

/// Corner closest to a query point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VertexHit {
    pub ribbon: usize,
    pub slice: SliceId,
    pub corner: Corner,
    pub distance: f32,
}

/// Slice whose outline encloses a query point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SliceHit {
    pub ribbon: usize,
    pub slice: SliceId,
}

/// Nearest corner over all slices of all ribbons; the first one wins ties.
pub fn nearest_vertex(ribbons: &[Ribbon], point: [f32; 2]) -> Option<VertexHit> {
    let mut best: Option<VertexHit> = None;
    for (ribbon, r) in ribbons.iter().enumerate() {
        for slice in r.slices() {
            for corner in Corner::ALL {
                let d = distance(slice.quad.corner(corner), point);
                if best.map_or(true, |b| d < b.distance) {
                    best = Some(VertexHit {
                        ribbon,
                        slice: slice.id,
                        corner,
                        distance: d,
                    });
                }
            }
        }
    }
    best
}

/// First slice, in ribbon order, that contains `point`.
pub fn containing_slice(ribbons: &[Ribbon], point: [f32; 2]) -> Option<SliceHit> {
    ribbons.iter().enumerate().find_map(|(ribbon, r)| {
        r.slices()
            .iter()
            .find(|s| s.quad.contains(point))
            .map(|s| SliceHit {
                ribbon,
                slice: s.id,
            })
    })
}

/// True when any corner lies outside the `width × height` image.
pub fn is_out_of_bounds(quad: &Quad, width: usize, height: usize) -> bool {
    !quad.within_bounds(width, height)
}
