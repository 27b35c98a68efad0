//! Planar geometry shared by the line extractor, the detector and the ribbon
//! model.
//!
//! Points are plain `[f32; 2]` arrays in pixel units. Whether a point lives in
//! window-local or global image coordinates is tracked by the caller; the
//! [`Window`](crate::window::Window) owns the conversion between both.
//!
//! - [`quad`] – the labeled quadrilateral (`Quad`) and its edges.
//! - [`roles`] – assignment of four loose points to top/right/bottom/left
//!   corners, shared by construction and canonicalization.

pub mod quad;
pub mod roles;

pub use quad::{Corner, Edge, Quad};
pub use roles::assign_roles;

use nalgebra::{Rotation2, Vector2, Vector3};

/// Tolerance used for every degenerate-geometry guard in the crate.
pub const EPS: f32 = 1e-6;

#[inline]
pub fn add(a: [f32; 2], b: [f32; 2]) -> [f32; 2] {
    [a[0] + b[0], a[1] + b[1]]
}

#[inline]
pub fn sub(a: [f32; 2], b: [f32; 2]) -> [f32; 2] {
    [a[0] - b[0], a[1] - b[1]]
}

#[inline]
pub fn scale(a: [f32; 2], s: f32) -> [f32; 2] {
    [a[0] * s, a[1] * s]
}

#[inline]
pub fn dot(a: [f32; 2], b: [f32; 2]) -> f32 {
    a[0] * b[0] + a[1] * b[1]
}

#[inline]
pub fn cross(a: [f32; 2], b: [f32; 2]) -> f32 {
    a[0] * b[1] - a[1] * b[0]
}

#[inline]
pub fn norm(a: [f32; 2]) -> f32 {
    (a[0] * a[0] + a[1] * a[1]).sqrt()
}

#[inline]
pub fn distance(a: [f32; 2], b: [f32; 2]) -> f32 {
    norm(sub(a, b))
}

#[inline]
pub fn midpoint(a: [f32; 2], b: [f32; 2]) -> [f32; 2] {
    [(a[0] + b[0]) * 0.5, (a[1] + b[1]) * 0.5]
}

/// Unit vector along `v`, or `None` for a (near) zero vector.
#[inline]
pub fn normalized(v: [f32; 2]) -> Option<[f32; 2]> {
    let n = norm(v);
    (n > EPS).then(|| [v[0] / n, v[1] / n])
}

/// Rounds both coordinates half away from zero.
#[inline]
pub fn round_point(p: [f32; 2]) -> [f32; 2] {
    [p[0].round(), p[1].round()]
}

/// Rotates `p` by `angle` radians about `center`.
pub fn rotate_about(p: [f32; 2], center: [f32; 2], angle: f32) -> [f32; 2] {
    let rot = Rotation2::new(angle);
    let v = rot * Vector2::new(p[0] - center[0], p[1] - center[1]);
    [center[0] + v.x, center[1] + v.y]
}

/// Orientation of the triangle `(a, b, c)`: `1` counter-clockwise in image
/// coordinates (y down), `-1` clockwise, `0` collinear within [`EPS`].
fn orientation(a: [f32; 2], b: [f32; 2], c: [f32; 2]) -> i8 {
    let v = cross(sub(b, a), sub(c, a));
    if v.abs() <= EPS {
        0
    } else if v > 0.0 {
        1
    } else {
        -1
    }
}

fn within_box(a: [f32; 2], b: [f32; 2], p: [f32; 2]) -> bool {
    p[0] >= a[0].min(b[0]) - EPS
        && p[0] <= a[0].max(b[0]) + EPS
        && p[1] >= a[1].min(b[1]) - EPS
        && p[1] <= a[1].max(b[1]) + EPS
}

/// True when the closed segments `a1-a2` and `b1-b2` share at least one
/// point (proper crossings and touching endpoints both count).
pub fn segments_cross(a1: [f32; 2], a2: [f32; 2], b1: [f32; 2], b2: [f32; 2]) -> bool {
    let o1 = orientation(a1, a2, b1);
    let o2 = orientation(a1, a2, b2);
    let o3 = orientation(b1, b2, a1);
    let o4 = orientation(b1, b2, a2);
    if o1 != o2 && o3 != o4 {
        return true;
    }
    (o1 == 0 && within_box(a1, a2, b1))
        || (o2 == 0 && within_box(a1, a2, b2))
        || (o3 == 0 && within_box(b1, b2, a1))
        || (o4 == 0 && within_box(b1, b2, a2))
}

/// Intersection of the lines through `a1-a2` and `b1-b2`, computed with
/// homogeneous coordinates. Returns the point together with its parameters
/// along both segments (`0` at the first endpoint, `1` at the second), or
/// `None` for parallel or degenerate inputs.
pub fn line_intersection(
    a1: [f32; 2],
    a2: [f32; 2],
    b1: [f32; 2],
    b2: [f32; 2],
) -> Option<([f32; 2], f32, f32)> {
    let la = Vector3::new(a1[0], a1[1], 1.0).cross(&Vector3::new(a2[0], a2[1], 1.0));
    let lb = Vector3::new(b1[0], b1[1], 1.0).cross(&Vector3::new(b2[0], b2[1], 1.0));
    let x = la.cross(&lb);
    let da = sub(a2, a1);
    let db = sub(b2, b1);
    let scale_ref = norm(da).max(1.0) * norm(db).max(1.0);
    if x.z.abs() <= EPS * scale_ref {
        return None;
    }
    let p = [x.x / x.z, x.y / x.z];
    let ua = dot(sub(p, a1), da) / dot(da, da).max(EPS);
    let ub = dot(sub(p, b1), db) / dot(db, db).max(EPS);
    Some((p, ua, ub))
}

/// Heron's formula: Brahmagupta's cyclic-quadrilateral formula with one side
/// collapsed to zero.
pub fn triangle_area(a: [f32; 2], b: [f32; 2], c: [f32; 2]) -> f32 {
    brahmagupta(distance(a, b), distance(b, c), distance(c, a), 0.0)
}

/// Brahmagupta's formula for the area of a cyclic quadrilateral with side
/// lengths `a`, `b`, `c`, `d`. Negative radicands from rounding clamp to 0.
pub fn brahmagupta(a: f32, b: f32, c: f32, d: f32) -> f32 {
    let s = (a + b + c + d) * 0.5;
    ((s - a) * (s - b) * (s - c) * (s - d)).max(0.0).sqrt()
}

/// Shoelace area of a closed polygon; positive for clockwise order in image
/// coordinates.
pub fn signed_area(points: &[[f32; 2]]) -> f32 {
    let n = points.len();
    let mut acc = 0.0f32;
    for i in 0..n {
        acc += cross(points[i], points[(i + 1) % n]);
    }
    acc * 0.5
}
