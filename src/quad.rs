//! Quadrilaterals produced by transforming rectangles, and their
//! classification.
//!
//! A rectangle transformed by a matrix becomes one of four shapes, ordered
//! from most specific to most general by [`QuadType`]. Renderers pick shader
//! variants and anti-aliasing strategies from that type, so it is computed
//! once from the matrix with [`quad_type_for_transformed_rect`] and carried
//! alongside the quad rather than re-derived from the points.
//!
//! Points are stored as 4-wide coordinate arrays in triangle-strip order
//! with CCW triangles: top-left, bottom-left, top-right, bottom-right.

use crate::basics::{Point3F, PointF, RectF};
use crate::error::{QuadError, Result};
use crate::trans_affine::TransAffine;
use crate::trans_perspective::TransPerspective;

/// Largest `|cos|` of the corner angle that the point-based rectilinear
/// check still treats as a right angle, on top of f32 rounding.
pub const QUAD_POINT_TOLERANCE: f64 = 1e-6;

/// Multiple of `f32::EPSILON * max|coord|` allowed for the rounding of a
/// single stored coordinate difference.
const QUAD_ROUNDING_ULPS: f64 = 4.0;

/// w values of a quad without perspective.
pub(crate) const NO_PERSPECTIVE_WS: [f32; 4] = [1.0; 4];

// ============================================================================
// QuadType
// ============================================================================

/// The most specific shape a transformed rectangle takes, ordered by
/// generality: `Rect < Rectilinear < Standard < Perspective`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum QuadType {
    /// Still an axis-aligned rectangle (scale, translate, mirror, or a
    /// multiple-of-90° rotation).
    #[default]
    Rect,
    /// Right angles preserved but rotated.
    Rectilinear,
    /// Affine: may be rotated and skewed.
    Standard,
    /// Projective: needs the homogeneous w coordinate.
    Perspective,
}

pub const QUAD_TYPE_COUNT: usize = 4;

impl QuadType {
    /// All quad types, least general first.
    pub const ALL: [QuadType; QUAD_TYPE_COUNT] = [
        QuadType::Rect,
        QuadType::Rectilinear,
        QuadType::Standard,
        QuadType::Perspective,
    ];

    #[inline]
    pub fn has_perspective(self) -> bool {
        self == QuadType::Perspective
    }
}

/// What class of quad is required to represent any rectangle transformed by
/// `matrix`.
///
/// This is the classification production code should use: it is cheap and
/// is not subject to the rounding that re-classifying the transformed points
/// would see.
pub fn quad_type_for_transformed_rect(matrix: &TransPerspective) -> QuadType {
    if matrix.rect_stays_rect() {
        QuadType::Rect
    } else if matrix.preserves_right_angles() {
        QuadType::Rectilinear
    } else if matrix.has_perspective() {
        QuadType::Perspective
    } else {
        QuadType::Standard
    }
}

// ============================================================================
// Lane helpers
// ============================================================================

#[inline]
fn min4(v: &[f32; 4]) -> f32 {
    v[0].min(v[1]).min(v[2].min(v[3]))
}

#[inline]
fn max4(v: &[f32; 4]) -> f32 {
    v[0].max(v[1]).max(v[2].max(v[3]))
}

#[inline]
fn mul4(a: &[f32; 4], b: &[f32; 4]) -> [f32; 4] {
    [a[0] * b[0], a[1] * b[1], a[2] * b[2], a[3] * b[3]]
}

#[inline]
fn is_int(v: f32) -> bool {
    v == v.trunc()
}

fn rect_xs_ys(r: &RectF) -> ([f32; 4], [f32; 4]) {
    ([r.x1, r.x1, r.x2, r.x2], [r.y1, r.y2, r.y1, r.y2])
}

// ============================================================================
// Point classification
// ============================================================================

fn is_rect_quad(x: &[f32; 4], y: &[f32; 4]) -> bool {
    (x[0] == x[1] && x[2] == x[3] && y[0] == y[2] && y[1] == y[3])
        // transposed by a quarter turn or mirror
        || (x[0] == x[2] && x[1] == x[3] && y[0] == y[1] && y[2] == y[3])
}

fn is_rectilinear_quad(x: &[f32; 4], y: &[f32; 4]) -> bool {
    let x = x.map(f64::from);
    let y = y.map(f64::from);
    let mag = x
        .iter()
        .chain(y.iter())
        .fold(0.0_f64, |m, v| m.max(v.abs()));
    // Absolute error of a stored coordinate; grows with distance from the
    // origin, not with the quad's size.
    let round = QUAD_ROUNDING_ULPS * f64::from(f32::EPSILON) * mag;

    // Opposite corners must share a midpoint.
    if (x[0] + x[3] - x[1] - x[2]).abs() > round || (y[0] + y[3] - y[1] - y[2]).abs() > round {
        return false;
    }

    let (ex1, ey1) = (x[1] - x[0], y[1] - y[0]);
    let (ex2, ey2) = (x[2] - x[0], y[2] - y[0]);
    let (len1, len2) = (ex1.hypot(ey1), ex2.hypot(ey2));
    let dot = ex1 * ex2 + ey1 * ey2;
    dot.abs() <= QUAD_POINT_TOLERANCE * len1 * len2 + round * (len1 + len2 + round)
}

fn classify_points(x: &[f32; 4], y: &[f32; 4], w: Option<&[f32; 4]>) -> QuadType {
    if w.is_some_and(|w| w.iter().any(|&w| w != 1.0)) {
        QuadType::Perspective
    } else if is_rect_quad(x, y) {
        QuadType::Rect
    } else if is_rectilinear_quad(x, y) {
        QuadType::Rectilinear
    } else {
        QuadType::Standard
    }
}

// ============================================================================
// QuadGeometry trait
// ============================================================================

/// Read access shared by [`Quad`] and [`PerspQuad`], so that lists and the
/// anti-aliasing hook accept either representation.
pub trait QuadGeometry {
    fn xs(&self) -> &[f32; 4];
    fn ys(&self) -> &[f32; 4];

    /// Explicit w values, or `None` when they are implicitly all 1.
    fn ws(&self) -> Option<&[f32; 4]>;

    /// Classify the quad from its points.
    ///
    /// Intended for consistency checks only. Use
    /// [`quad_type_for_transformed_rect`] on the matrix that produced the
    /// quad instead.
    fn quad_type(&self) -> QuadType {
        classify_points(self.xs(), self.ys(), self.ws())
    }

    /// True if anti-aliasing would change how this rectangle renders, i.e.
    /// any of its edges is off the integer pixel grid.
    ///
    /// Requires `quad_type() == QuadType::Rect`. The precondition is
    /// asserted in debug builds and with the `checked` feature; otherwise a
    /// non-rect quad yields an arbitrary answer.
    fn aa_has_effect_on_rect(&self) -> bool {
        quad_assert!(
            self.quad_type() == QuadType::Rect,
            "aa_has_effect_on_rect called on a {:?} quad",
            self.quad_type()
        );
        let (x, y) = (self.xs(), self.ys());
        let (l, t, r, b) = match self.ws() {
            Some(w) => (x[0] / w[0], y[0] / w[0], x[3] / w[3], y[3] / w[3]),
            None => (x[0], y[0], x[3], y[3]),
        };
        !is_int(l) || !is_int(t) || !is_int(r) || !is_int(b)
    }

    /// Checked form of [`aa_has_effect_on_rect`](Self::aa_has_effect_on_rect).
    fn try_aa_has_effect_on_rect(&self) -> Result<bool> {
        match self.quad_type() {
            QuadType::Rect => Ok(self.aa_has_effect_on_rect()),
            other => Err(QuadError::NotRect(other)),
        }
    }
}

// ============================================================================
// Quad
// ============================================================================

/// Four 2D points describing an arbitrary non-perspective quadrilateral.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Quad {
    x: [f32; 4],
    y: [f32; 4],
}

impl Quad {
    /// From coordinate arrays in strip order.
    pub fn new(xs: [f32; 4], ys: [f32; 4]) -> Self {
        Self { x: xs, y: ys }
    }

    /// The rectangle itself.
    pub fn from_rect(rect: &RectF) -> Self {
        let (x, y) = rect_xs_ys(rect);
        Self { x, y }
    }

    /// From four points; the caller supplies them in strip order.
    pub fn from_points(pts: &[PointF; 4]) -> Self {
        Self {
            x: pts.map(|p| p.x),
            y: pts.map(|p| p.y),
        }
    }

    /// The rectangle transformed by `matrix`.
    pub fn from_transformed_rect(rect: &RectF, matrix: &TransAffine) -> Self {
        let (rx, ry) = rect_xs_ys(rect);
        let mut q = Self::default();
        for i in 0..4 {
            let (mut x, mut y) = (f64::from(rx[i]), f64::from(ry[i]));
            matrix.transform(&mut x, &mut y);
            q.x[i] = x as f32;
            q.y[i] = y as f32;
        }
        q
    }

    /// Point `i` in strip order.
    pub fn point(&self, i: usize) -> PointF {
        PointF::new(self.x[i], self.y[i])
    }

    /// x of point `i`.
    pub fn x(&self, i: usize) -> f32 {
        self.x[i]
    }

    /// y of point `i`.
    pub fn y(&self, i: usize) -> f32 {
        self.y[i]
    }

    /// Axis-aligned bounds of the four points.
    pub fn bounds(&self) -> RectF {
        RectF::new(min4(&self.x), min4(&self.y), max4(&self.x), max4(&self.y))
    }
}

impl QuadGeometry for Quad {
    fn xs(&self) -> &[f32; 4] {
        &self.x
    }

    fn ys(&self) -> &[f32; 4] {
        &self.y
    }

    fn ws(&self) -> Option<&[f32; 4]> {
        None
    }
}

// ============================================================================
// PerspQuad
// ============================================================================

/// Four homogeneous points `(x, y, w)`; a superset of [`Quad`] able to
/// represent rectangles under projective transforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspQuad {
    x: [f32; 4],
    y: [f32; 4],
    w: [f32; 4],
}

impl PerspQuad {
    /// From coordinate arrays in strip order.
    pub fn new(xs: [f32; 4], ys: [f32; 4], ws: [f32; 4]) -> Self {
        Self {
            x: xs,
            y: ys,
            w: ws,
        }
    }

    /// The rectangle itself, with w = 1.
    pub fn from_rect(rect: &RectF) -> Self {
        let (x, y) = rect_xs_ys(rect);
        Self::new(x, y, NO_PERSPECTIVE_WS)
    }

    /// From four homogeneous points in strip order.
    pub fn from_points(pts: &[Point3F; 4]) -> Self {
        Self::new(pts.map(|p| p.x), pts.map(|p| p.y), pts.map(|p| p.w))
    }

    /// The rectangle transformed by `matrix`, keeping the homogeneous w of
    /// each corner. Affine matrices give w = 1 everywhere.
    pub fn from_transformed_rect(rect: &RectF, matrix: &TransPerspective) -> Self {
        let (rx, ry) = rect_xs_ys(rect);
        let mut q = Self::from_rect(rect);
        for i in 0..4 {
            let (mut x, mut y) = (f64::from(rx[i]), f64::from(ry[i]));
            let w = matrix.transform_homogeneous(&mut x, &mut y);
            q.x[i] = x as f32;
            q.y[i] = y as f32;
            q.w[i] = w as f32;
        }
        q
    }

    /// Homogeneous point `i` in strip order.
    pub fn point(&self, i: usize) -> Point3F {
        Point3F::new(self.x[i], self.y[i], self.w[i])
    }

    /// x of point `i`.
    pub fn x(&self, i: usize) -> f32 {
        self.x[i]
    }

    /// y of point `i`.
    pub fn y(&self, i: usize) -> f32 {
        self.y[i]
    }

    /// w of point `i`.
    pub fn w(&self, i: usize) -> f32 {
        self.w[i]
    }

    /// `1 / w` with IEEE semantics (w = 0 gives infinity).
    pub fn iw(&self, i: usize) -> f32 {
        1.0 / self.w[i]
    }

    /// [`iw`](Self::iw) for all four points.
    pub fn iws(&self) -> [f32; 4] {
        self.w.map(|w| 1.0 / w)
    }

    /// True if any w differs from 1.
    pub fn has_perspective(&self) -> bool {
        self.w != NO_PERSPECTIVE_WS
    }

    /// Bounds of the projected quad.
    ///
    /// `known` must be the type computed for the matrix that produced this
    /// quad. Only `QuadType::Perspective` divides by w; any other type skips
    /// the division even if w values are present.
    pub fn bounds(&self, known: QuadType) -> RectF {
        quad_assert!(
            self.quad_type() <= known,
            "quad bounds requested as {:?} but points classify as {:?}",
            known,
            self.quad_type()
        );
        if known == QuadType::Perspective {
            let iw = self.iws();
            let x = mul4(&self.x, &iw);
            let y = mul4(&self.y, &iw);
            RectF::new(min4(&x), min4(&y), max4(&x), max4(&y))
        } else {
            RectF::new(min4(&self.x), min4(&self.y), max4(&self.x), max4(&self.y))
        }
    }
}

impl Default for PerspQuad {
    fn default() -> Self {
        Self::new([0.0; 4], [0.0; 4], NO_PERSPECTIVE_WS)
    }
}

impl From<Quad> for PerspQuad {
    fn from(q: Quad) -> Self {
        Self::new(q.x, q.y, NO_PERSPECTIVE_WS)
    }
}

impl QuadGeometry for PerspQuad {
    fn xs(&self) -> &[f32; 4] {
        &self.x
    }

    fn ys(&self) -> &[f32; 4] {
        &self.y
    }

    fn ws(&self) -> Option<&[f32; 4]> {
        Some(&self.w)
    }
}

// ============================================================================
// Tests
// ============================================================================
