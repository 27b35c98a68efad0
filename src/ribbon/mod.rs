//! Ribbon model: ordered slices, their per-slice settings and the editing
//! status machine.
//!
//! Slices are kept top-most first, the order produced by
//! [`propagate`](propagate::propagate). Ids are unique within a ribbon and
//! never reused.
pub mod append;
pub mod genetic;
pub mod hit;
pub mod matching;
pub mod propagate;

pub use append::{extrapolate, RibbonEnd};
pub use genetic::{refine_genetic, GeneticOutcome, GeneticParams};
pub use hit::{containing_slice, is_out_of_bounds, nearest_vertex, SliceHit, VertexHit};
pub use matching::transfer_point;
pub use propagate::{propagate, translation_vector, ChainLink, Direction, PropagationParams};

use crate::error::RibbonError;
use crate::geometry::{add, Corner, Quad};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SliceId(pub u32);

/// How a clicked reference point is distributed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchMode {
    /// Transfer the point to every slice of the ribbon.
    All,
    /// Set it on the clicked slice only.
    One,
}

/// `Editing → Matching → Saved`; matching may return to editing and
/// `Saved` is final.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RibbonStatus {
    Editing,
    Matching(MatchMode),
    Saved,
}

impl RibbonStatus {
    pub fn can_transition_to(self, to: RibbonStatus) -> bool {
        use RibbonStatus::*;
        matches!(
            (self, to),
            (Editing, Matching(_)) | (Matching(_), Matching(_)) | (Matching(_), Editing) | (Matching(_), Saved)
        )
    }
}

/// Optional per-slice imaging settings; `None` uses the session value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagingOverrides {
    pub brightness: Option<f32>,
    pub contrast: Option<f32>,
    pub focus: Option<f32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slice {
    pub id: SliceId,
    pub quad: Quad,
    pub fit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_point: Option<[f32; 2]>,
    pub overrides: ImagingOverrides,
}

/// Outcome of dragging one corner.
#[derive(Clone, Debug, PartialEq)]
pub enum VertexDrag {
    Moved(Quad),
    /// The corner left the image and the slice was dropped from the ribbon.
    Removed(Slice),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ribbon {
    slices: Vec<Slice>,
    status: RibbonStatus,
    next_id: u32,
}

impl Default for Ribbon {
    fn default() -> Self {
        Self::new()
    }
}

impl Ribbon {
    pub fn new() -> Self {
        Self {
            slices: Vec::new(),
            status: RibbonStatus::Editing,
            next_id: 0,
        }
    }

    /// Ribbon holding the slices of a detection run, in order.
    pub fn from_links(links: &[ChainLink]) -> Self {
        let mut ribbon = Self::new();
        for link in links {
            ribbon.insert(ribbon.slices.len(), link.quad, link.fit);
        }
        ribbon
    }

    pub fn status(&self) -> RibbonStatus {
        self.status
    }

    pub fn slices(&self) -> &[Slice] {
        &self.slices
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn slice(&self, id: SliceId) -> Option<&Slice> {
        self.slices.iter().find(|s| s.id == id)
    }

    fn position(&self, id: SliceId) -> Result<usize, RibbonError> {
        self.slices
            .iter()
            .position(|s| s.id == id)
            .ok_or(RibbonError::UnknownSlice(id))
    }

    pub(crate) fn insert(&mut self, index: usize, quad: Quad, fit: u32) -> SliceId {
        let id = SliceId(self.next_id);
        self.next_id += 1;
        self.slices.insert(
            index,
            Slice {
                id,
                quad,
                fit,
                reference_point: None,
                overrides: ImagingOverrides::default(),
            },
        );
        id
    }

    pub fn transition(&mut self, to: RibbonStatus) -> Result<(), RibbonError> {
        if !self.status.can_transition_to(to) {
            return Err(RibbonError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        debug!("ribbon status {:?} -> {:?}", self.status, to);
        self.status = to;
        Ok(())
    }

    pub fn start_matching(&mut self, mode: MatchMode) -> Result<(), RibbonError> {
        self.transition(RibbonStatus::Matching(mode))
    }

    pub fn resume_editing(&mut self) -> Result<(), RibbonError> {
        self.transition(RibbonStatus::Editing)
    }

    pub fn save(&mut self) -> Result<(), RibbonError> {
        self.transition(RibbonStatus::Saved)
    }

    pub(crate) fn ensure_editable(&self) -> Result<(), RibbonError> {
        match self.status {
            RibbonStatus::Editing => Ok(()),
            status => Err(RibbonError::NotEditable { status }),
        }
    }

    pub fn remove_slice(&mut self, id: SliceId) -> Result<Slice, RibbonError> {
        self.ensure_editable()?;
        let index = self.position(id)?;
        Ok(self.slices.remove(index))
    }

    /// Replaces the outline of a slice, e.g. after a manual edit.
    pub fn set_quad(&mut self, id: SliceId, quad: Quad, fit: u32) -> Result<(), RibbonError> {
        self.ensure_editable()?;
        let index = self.position(id)?;
        let slice = &mut self.slices[index];
        slice.quad = quad;
        slice.fit = fit;
        Ok(())
    }

    /// Moves one corner by `delta`. A slice whose corners no longer all lie in
    /// the `width × height` image is removed.
    pub fn move_vertex(
        &mut self,
        id: SliceId,
        corner: Corner,
        delta: [f32; 2],
        width: usize,
        height: usize,
    ) -> Result<VertexDrag, RibbonError> {
        self.ensure_editable()?;
        let index = self.position(id)?;
        let current = self.slices[index].quad;
        let quad = current.with_corner(corner, add(current.corner(corner), delta));
        if is_out_of_bounds(&quad, width, height) {
            debug!("slice {} dragged out of the image, removing it", id.0);
            return Ok(VertexDrag::Removed(self.slices.remove(index)));
        }
        self.slices[index].quad = quad;
        Ok(VertexDrag::Moved(quad))
    }

    pub fn set_overrides(
        &mut self,
        id: SliceId,
        overrides: ImagingOverrides,
    ) -> Result<(), RibbonError> {
        if self.status == RibbonStatus::Saved {
            return Err(RibbonError::NotEditable {
                status: self.status,
            });
        }
        let index = self.position(id)?;
        self.slices[index].overrides = overrides;
        Ok(())
    }

    /// Sets the reference point clicked inside slice `id`. In
    /// [`MatchMode::All`] every other slice receives the transferred point.
    pub fn match_reference_point(
        &mut self,
        id: SliceId,
        point: [f32; 2],
    ) -> Result<(), RibbonError> {
        let RibbonStatus::Matching(mode) = self.status else {
            return Err(RibbonError::NotMatching {
                status: self.status,
            });
        };
        let index = self.position(id)?;
        let source = self.slices[index].quad;
        if !source.contains(point) {
            return Err(RibbonError::PointOutsideSlice { slice: id, point });
        }
        match mode {
            MatchMode::One => self.slices[index].reference_point = Some(point),
            MatchMode::All => {
                for slice in &mut self.slices {
                    slice.reference_point = Some(if slice.id == id {
                        point
                    } else {
                        transfer_point(&source, &slice.quad, point)
                    });
                }
            }
        }
        Ok(())
    }
}
