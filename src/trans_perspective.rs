//! Perspective 2D transformations.
//!
//! Full 3×3 projective matrix with homogeneous point transforms and the
//! structural predicates used to classify what a rectangle becomes under
//! the transform.

use crate::trans_affine::TransAffine;

/// Relative tolerance for treating the columns of the 2×2 part as
/// orthogonal. Only absorbs rounding from composing rotations and scales.
pub const RIGHT_ANGLE_EPSILON: f64 = 1e-9;

// ============================================================================
// TransPerspective
// ============================================================================

/// Perspective 2D transformation (3×3 projective matrix).
///
/// ```text
/// | sx  shy  w0 |
/// | shx  sy  w1 |
/// | tx   ty  w2 |
/// ```
///
/// Homogeneous transform: `x' = x*sx + y*shx + tx`,
/// `y' = x*shy + y*sy + ty`, `w' = x*w0 + y*w1 + w2`; the projected point is
/// `(x'/w', y'/w')`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransPerspective {
    pub sx: f64,
    pub shy: f64,
    pub w0: f64,
    pub shx: f64,
    pub sy: f64,
    pub w1: f64,
    pub tx: f64,
    pub ty: f64,
    pub w2: f64,
}

impl TransPerspective {
    /// Identity matrix.
    pub fn new() -> Self {
        Self::new_from_array(&[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0])
    }

    /// Matrix from 9 values in `[sx, shy, w0, shx, sy, w1, tx, ty, w2]` order.
    pub fn new_from_array(m: &[f64; 9]) -> Self {
        Self {
            sx: m[0],
            shy: m[1],
            w0: m[2],
            shx: m[3],
            sy: m[4],
            w1: m[5],
            tx: m[6],
            ty: m[7],
            w2: m[8],
        }
    }

    /// From an affine transformation (w0=0, w1=0, w2=1).
    pub fn new_from_affine(a: &TransAffine) -> Self {
        Self::new_from_array(&[a.sx, a.shy, 0.0, a.shx, a.sy, 0.0, a.tx, a.ty, 1.0])
    }

    // -----------------------------------------------------------------------
    // Transformations
    // -----------------------------------------------------------------------

    /// Homogeneous transform without the divide. Writes `x'` and `y'` and
    /// returns `w'`.
    #[inline]
    pub fn transform_homogeneous(&self, x: &mut f64, y: &mut f64) -> f64 {
        let (px, py) = (*x, *y);
        *x = px * self.sx + py * self.shx + self.tx;
        *y = px * self.shy + py * self.sy + self.ty;
        px * self.w0 + py * self.w1 + self.w2
    }

    /// Direct transformation of x and y with perspective divide.
    #[inline]
    pub fn transform(&self, x: &mut f64, y: &mut f64) {
        let m = 1.0 / self.transform_homogeneous(x, y);
        *x *= m;
        *y *= m;
    }

    // -----------------------------------------------------------------------
    // Structural queries
    // -----------------------------------------------------------------------

    /// True if the bottom row is anything other than `[0, 0, 1]`.
    #[inline]
    pub fn has_perspective(&self) -> bool {
        self.w0 != 0.0 || self.w1 != 0.0 || self.w2 != 1.0
    }

    /// True if every axis-aligned rectangle maps to an axis-aligned
    /// rectangle: scale/translate/mirror with non-zero scales, or a
    /// multiple-of-90° rotation (zero scales, non-zero skews).
    pub fn rect_stays_rect(&self) -> bool {
        if self.has_perspective() {
            return false;
        }
        if self.shx != 0.0 || self.shy != 0.0 {
            self.sx == 0.0 && self.sy == 0.0 && self.shx != 0.0 && self.shy != 0.0
        } else {
            self.sx != 0.0 && self.sy != 0.0
        }
    }

    /// True if right angles survive the transform: no perspective, a
    /// non-degenerate 2×2 part, and orthogonal columns.
    pub fn preserves_right_angles(&self) -> bool {
        if self.has_perspective() {
            return false;
        }
        let len0 = self.sx.hypot(self.shy);
        let len1 = self.shx.hypot(self.sy);
        let scale = len0 * len1;
        if !scale.is_finite() || scale <= 0.0 {
            return false;
        }
        if (self.determinant_2x2() / scale).abs() <= RIGHT_ANGLE_EPSILON {
            return false;
        }
        let dot = self.sx * self.shx + self.shy * self.sy;
        (dot / scale).abs() <= RIGHT_ANGLE_EPSILON
    }

    /// Determinant of the 2×2 linear part.
    #[inline]
    pub fn determinant_2x2(&self) -> f64 {
        self.sx * self.sy - self.shy * self.shx
    }
}

impl Default for TransPerspective {
    fn default() -> Self {
        Self::new()
    }
}

impl From<TransAffine> for TransPerspective {
    fn from(a: TransAffine) -> Self {
        Self::new_from_affine(&a)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_identity() {
        let t = TransPerspective::new();
        assert!(!t.has_perspective());
        assert!(t.rect_stays_rect());
        assert!(t.preserves_right_angles());

        let (mut x, mut y) = (5.0, 10.0);
        t.transform(&mut x, &mut y);
        assert_eq!((x, y), (5.0, 10.0));
    }

    #[test]
    fn test_from_affine() {
        let t: TransPerspective = TransAffine::new_scaling(2.0, 3.0).into();
        let (mut x, mut y) = (5.0, 10.0);
        let w = t.transform_homogeneous(&mut x, &mut y);
        assert_eq!((x, y, w), (10.0, 30.0, 1.0));
    }

    #[test]
    fn test_homogeneous_transform() {
        let mut t = TransPerspective::new();
        t.w0 = 0.5;
        t.tx = 1.0;
        let (mut x, mut y) = (2.0, 4.0);
        let w = t.transform_homogeneous(&mut x, &mut y);
        assert_eq!((x, y, w), (3.0, 4.0, 2.0));

        let (mut x, mut y) = (2.0, 4.0);
        t.transform(&mut x, &mut y);
        assert_eq!((x, y), (1.5, 2.0));
    }

    #[test]
    fn test_rect_stays_rect() {
        assert!(TransPerspective::from(TransAffine::new_scaling(-2.0, 3.0)).rect_stays_rect());
        let quarter = TransAffine::new_custom(0.0, 1.0, -1.0, 0.0, 4.0, 4.0);
        assert!(TransPerspective::from(quarter).rect_stays_rect());
        assert!(!TransPerspective::from(TransAffine::new_scaling(0.0, 3.0)).rect_stays_rect());
        assert!(!TransPerspective::from(TransAffine::new_rotation(0.3)).rect_stays_rect());
    }

    #[test]
    fn test_preserves_right_angles() {
        let mut m = TransAffine::new_scaling(2.0, 5.0);
        m.rotate(PI / 6.0);
        assert!(TransPerspective::from(m).preserves_right_angles());

        // Non-uniform scale after rotation shears the rectangle.
        let mut m = TransAffine::new_rotation(PI / 6.0);
        m.multiply(&TransAffine::new_scaling(2.0, 5.0));
        assert!(!TransPerspective::from(m).preserves_right_angles());

        assert!(!TransPerspective::from(TransAffine::new_skewing(0.2, 0.0))
            .preserves_right_angles());
        assert!(!TransPerspective::from(TransAffine::new_scaling(0.0, 0.0))
            .preserves_right_angles());
    }

    #[test]
    fn test_w2_only_is_perspective() {
        let t = TransPerspective::new_from_array(&[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 2.0]);
        assert!(t.has_perspective());
        assert!(!t.rect_stays_rect());
        assert!(!t.preserves_right_angles());
    }
}
