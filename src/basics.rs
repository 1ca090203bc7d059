//! Foundation types: points, rectangles, path commands and the vertex
//! source interface that the path and scene modules build on.

// ============================================================================
// Point
// ============================================================================

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointBase<T: Copy> {
    pub x: T,
    pub y: T,
}

impl<T: Copy> PointBase<T> {
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

pub type PointF = PointBase<f32>;

/// A homogeneous 2D point `(x, y, w)`. The projected position is
/// `(x / w, y / w)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point3Base<T: Copy> {
    pub x: T,
    pub y: T,
    pub w: T,
}

impl<T: Copy> Point3Base<T> {
    pub fn new(x: T, y: T, w: T) -> Self {
        Self { x, y, w }
    }
}

pub type Point3F = Point3Base<f32>;

// ============================================================================
// Rect
// ============================================================================

/// A rectangle defined by two corner points. `(x1, y1)` is the top-left
/// corner when the rectangle is normalized.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect<T: Copy> {
    pub x1: T,
    pub y1: T,
    pub x2: T,
    pub y2: T,
}

impl<T: Copy + PartialOrd> Rect<T> {
    pub fn new(x1: T, y1: T, x2: T, y2: T) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Normalize so that x1 <= x2 and y1 <= y2, swapping if needed.
    pub fn normalize(&mut self) -> &Self {
        if self.x1 > self.x2 {
            core::mem::swap(&mut self.x1, &mut self.x2);
        }
        if self.y1 > self.y2 {
            core::mem::swap(&mut self.y1, &mut self.y2);
        }
        self
    }
}

/// Rectangle with `f32` coordinates (device/GPU space).
pub type RectF = Rect<f32>;
/// Rectangle with `f64` coordinates (geometry space).
pub type RectD = Rect<f64>;

impl From<RectD> for RectF {
    fn from(r: RectD) -> Self {
        RectF::new(r.x1 as f32, r.y1 as f32, r.x2 as f32, r.y2 as f32)
    }
}

// ============================================================================
// Path commands
// ============================================================================

pub const PATH_CMD_STOP: u32 = 0;
pub const PATH_CMD_MOVE_TO: u32 = 1;
pub const PATH_CMD_LINE_TO: u32 = 2;
pub const PATH_CMD_END_POLY: u32 = 0x0F;
pub const PATH_CMD_MASK: u32 = 0x0F;

pub const PATH_FLAGS_CLOSE: u32 = 0x40;

/// Returns `true` if `c` carries a coordinate (move_to or line_to).
#[inline]
pub fn is_vertex(c: u32) -> bool {
    (PATH_CMD_MOVE_TO..PATH_CMD_END_POLY).contains(&c)
}

/// Returns `true` if `c` is the stop command.
#[inline]
pub fn is_stop(c: u32) -> bool {
    c == PATH_CMD_STOP
}

/// Returns `true` if `c` is an end_poly command (with any flags).
#[inline]
pub fn is_end_poly(c: u32) -> bool {
    (c & PATH_CMD_MASK) == PATH_CMD_END_POLY
}

/// Returns `true` if `c` has the close flag set.
#[inline]
pub fn is_closed(c: u32) -> bool {
    (c & PATH_FLAGS_CLOSE) != 0
}

/// A vertex with coordinates and a path command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexD {
    pub x: f64,
    pub y: f64,
    pub cmd: u32,
}

impl VertexD {
    pub fn new(x: f64, y: f64, cmd: u32) -> Self {
        Self { x, y, cmd }
    }
}

// ============================================================================
// VertexSource trait
// ============================================================================

/// A rewindable stream of path vertices.
pub trait VertexSource {
    /// Reset the vertex source to the beginning of the given path.
    fn rewind(&mut self, path_id: u32);

    /// Return the next vertex. Writes coordinates to `x` and `y`, returns a
    /// path command. Returns `PATH_CMD_STOP` when iteration is complete.
    fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32;
}

impl<T: VertexSource> VertexSource for &mut T {
    fn rewind(&mut self, path_id: u32) {
        (*self).rewind(path_id);
    }

    fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32 {
        (*self).vertex(x, y)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_normalize() {
        let mut r = RectF::new(30.0, 40.0, 10.0, 20.0);
        r.normalize();
        assert_eq!(r, RectF::new(10.0, 20.0, 30.0, 40.0));

        let mut r = RectD::new(1.0, 5.0, 3.0, 2.0);
        r.normalize();
        assert_eq!(r, RectD::new(1.0, 2.0, 3.0, 5.0));
    }

    #[test]
    fn test_rect_narrowing() {
        let r: RectF = RectD::new(0.5, 1.5, 2.5, 3.5).into();
        assert_eq!(r, RectF::new(0.5, 1.5, 2.5, 3.5));
    }

    #[test]
    fn test_path_commands() {
        assert!(is_stop(PATH_CMD_STOP));
        assert!(is_vertex(PATH_CMD_MOVE_TO));
        assert!(is_vertex(PATH_CMD_LINE_TO));
        assert!(!is_vertex(PATH_CMD_END_POLY));
        assert!(is_end_poly(PATH_CMD_END_POLY | PATH_FLAGS_CLOSE));
        assert!(is_closed(PATH_CMD_END_POLY | PATH_FLAGS_CLOSE));
        assert!(!is_closed(PATH_CMD_END_POLY));
    }
}
