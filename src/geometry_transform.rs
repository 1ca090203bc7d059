//! Scene-graph geometry nodes and the transform node that binds a matrix
//! to a child geometry.
//!
//! A [`GeometryTransform`] caches the child's path mapped through its
//! matrix along with the resulting bounds. Changing the matrix or touching
//! the child marks the cache dirty; [`GeometryNode::revalidate`] rebuilds
//! it. When the child is a plain rectangle the node can also hand out the
//! transformed rectangle as a quad, classified from the matrix, ready for a
//! [`QuadList`](crate::quad_list::QuadList).

use crate::basics::{RectD, RectF};
use crate::bounding_rect::bounding_rect_single;
use crate::path_storage::PathStorage;
use crate::quad::{quad_type_for_transformed_rect, PerspQuad, QuadType};
use crate::trans_perspective::TransPerspective;

/// A node producing geometry: a path and its bounds.
pub trait GeometryNode {
    /// Bring cached state up to date and return the bounds.
    fn revalidate(&mut self) -> RectD;

    /// The node's geometry as a path.
    fn as_path(&self) -> PathStorage;

    /// The geometry as an axis-aligned rectangle, if it is exactly one.
    fn as_rect(&self) -> Option<RectD> {
        None
    }
}

// ============================================================================
// Leaves
// ============================================================================

/// A rectangle leaf.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectGeometry {
    rect: RectD,
}

impl RectGeometry {
    /// `rect` is normalized so that `x1 <= x2` and `y1 <= y2`.
    pub fn new(rect: RectD) -> Self {
        let mut rect = rect;
        rect.normalize();
        Self { rect }
    }

    pub fn rect(&self) -> RectD {
        self.rect
    }

    pub fn set_rect(&mut self, rect: RectD) {
        *self = Self::new(rect);
    }
}

impl GeometryNode for RectGeometry {
    fn revalidate(&mut self) -> RectD {
        self.rect
    }

    fn as_path(&self) -> PathStorage {
        PathStorage::from_rect(&self.rect)
    }

    fn as_rect(&self) -> Option<RectD> {
        Some(self.rect)
    }
}

/// An arbitrary path leaf.
#[derive(Debug, Clone, Default)]
pub struct PathGeometry {
    path: PathStorage,
}

impl PathGeometry {
    pub fn new(path: PathStorage) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathStorage {
        &self.path
    }

    pub fn path_mut(&mut self) -> &mut PathStorage {
        &mut self.path
    }
}

impl GeometryNode for PathGeometry {
    fn revalidate(&mut self) -> RectD {
        bounding_rect_single(&mut self.path, 0).unwrap_or_default()
    }

    fn as_path(&self) -> PathStorage {
        self.path.clone()
    }

    /// A closed four-vertex polygon with axis-aligned edges, in either
    /// winding.
    fn as_rect(&self) -> Option<RectD> {
        let [a, b, c, d] = self.path.as_closed_quad()?;
        let row_first = a.1 == b.1 && b.0 == c.0 && c.1 == d.1 && d.0 == a.0;
        let column_first = a.0 == b.0 && b.1 == c.1 && c.0 == d.0 && d.1 == a.1;
        if !(row_first || column_first) {
            return None;
        }
        let mut rect = RectD::new(a.0, a.1, c.0, c.1);
        rect.normalize();
        Some(rect)
    }
}

// ============================================================================
// GeometryTransform
// ============================================================================

/// A child geometry seen through a [`TransPerspective`].
#[derive(Debug, Clone)]
pub struct GeometryTransform<G> {
    child: G,
    transform: TransPerspective,
    transformed_path: PathStorage,
    bounds: RectD,
    dirty: bool,
}

impl<G: GeometryNode> GeometryTransform<G> {
    pub fn new(child: G, transform: TransPerspective) -> Self {
        Self {
            child,
            transform,
            transformed_path: PathStorage::new(),
            bounds: RectD::default(),
            dirty: true,
        }
    }

    pub fn transform(&self) -> &TransPerspective {
        &self.transform
    }

    pub fn set_transform(&mut self, transform: TransPerspective) {
        self.transform = transform;
        self.dirty = true;
    }

    pub fn child(&self) -> &G {
        &self.child
    }

    /// Mutable access to the child. Marks the node dirty.
    pub fn child_mut(&mut self) -> &mut G {
        self.dirty = true;
        &mut self.child
    }

    /// True if the cached path and bounds are stale.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Class of quad the matrix turns a rectangle into.
    pub fn quad_type(&self) -> QuadType {
        quad_type_for_transformed_rect(&self.transform)
    }

    /// The child rectangle mapped through the matrix, with its type, or
    /// `None` if the child is not a rectangle.
    pub fn to_quad(&self) -> Option<(PerspQuad, QuadType)> {
        let rect = RectF::from(self.child.as_rect()?);
        Some((
            PerspQuad::from_transformed_rect(&rect, &self.transform),
            self.quad_type(),
        ))
    }

    fn transformed_child_path(&self) -> PathStorage {
        let m = self.transform;
        let mut path = self.child.as_path();
        path.transform_all_paths(&|x, y| {
            let (mut x, mut y) = (x, y);
            m.transform(&mut x, &mut y);
            (x, y)
        });
        path
    }
}

impl<G: GeometryNode> GeometryNode for GeometryTransform<G> {
    fn revalidate(&mut self) -> RectD {
        if !self.dirty {
            return self.bounds;
        }
        self.child.revalidate();
        self.transformed_path = self.transformed_child_path();
        self.bounds = bounding_rect_single(&mut self.transformed_path, 0).unwrap_or_default();
        self.dirty = false;
        log::debug!(
            "geometry transform revalidated as {:?}: bounds ({}, {}, {}, {})",
            self.quad_type(),
            self.bounds.x1,
            self.bounds.y1,
            self.bounds.x2,
            self.bounds.y2
        );
        self.bounds
    }

    /// The transformed path. Computed fresh while the node is dirty.
    fn as_path(&self) -> PathStorage {
        if self.dirty {
            self.transformed_child_path()
        } else {
            self.transformed_path.clone()
        }
    }

    /// The transformed child rectangle when the matrix keeps rects as
    /// rects.
    fn as_rect(&self) -> Option<RectD> {
        if self.quad_type() != QuadType::Rect {
            return None;
        }
        let r = self.child.as_rect()?;
        let (mut x1, mut y1, mut x2, mut y2) = (r.x1, r.y1, r.x2, r.y2);
        self.transform.transform(&mut x1, &mut y1);
        self.transform.transform(&mut x2, &mut y2);
        let mut out = RectD::new(x1, y1, x2, y2);
        out.normalize();
        Some(out)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quad::QuadGeometry;
    use crate::quad_list::QuadList;
    use crate::trans_affine::TransAffine;

    fn scale_translate() -> TransPerspective {
        let mut m = TransAffine::new_scaling(2.0, 2.0);
        m.translate(10.0, 0.0);
        m.into()
    }

    #[test]
    fn test_rect_leaf() {
        let mut leaf = RectGeometry::new(RectD::new(3.0, 4.0, 1.0, 2.0));
        assert_eq!(leaf.revalidate(), RectD::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(leaf.as_rect(), Some(RectD::new(1.0, 2.0, 3.0, 4.0)));
        assert_eq!(leaf.as_path().vertices().len(), 5);
    }

    #[test]
    fn test_path_leaf_bounds() {
        let mut path = PathStorage::new();
        path.move_to(1.0, 5.0);
        path.line_to(-2.0, 3.0);
        let mut leaf = PathGeometry::new(path);
        assert_eq!(leaf.revalidate(), RectD::new(-2.0, 3.0, 1.0, 5.0));
        assert_eq!(leaf.as_rect(), None);
        assert_eq!(PathGeometry::default().revalidate(), RectD::default());
    }

    #[test]
    fn test_closed_rect_path_is_rect() {
        // Column-first winding, starting at the bottom-right corner.
        let mut path = PathStorage::new();
        path.move_to(3.0, 4.0);
        path.line_to(3.0, 2.0);
        path.line_to(1.0, 2.0);
        path.line_to(1.0, 4.0);
        path.close_polygon();
        let leaf = PathGeometry::new(path);
        assert_eq!(leaf.as_rect(), Some(RectD::new(1.0, 2.0, 3.0, 4.0)));

        let node = GeometryTransform::new(leaf, scale_translate());
        assert_eq!(node.as_rect(), Some(RectD::new(12.0, 4.0, 16.0, 8.0)));

        let mut diamond = PathStorage::new();
        diamond.move_to(0.0, 1.0);
        diamond.line_to(1.0, 0.0);
        diamond.line_to(2.0, 1.0);
        diamond.line_to(1.0, 2.0);
        diamond.close_polygon();
        assert_eq!(PathGeometry::new(diamond).as_rect(), None);
    }

    #[test]
    fn test_revalidate_scale_translate() {
        let mut node = GeometryTransform::new(
            RectGeometry::new(RectD::new(1.0, 1.0, 3.0, 2.0)),
            scale_translate(),
        );
        assert!(node.is_dirty());
        assert_eq!(node.revalidate(), RectD::new(12.0, 2.0, 16.0, 4.0));
        assert!(!node.is_dirty());
        assert_eq!(node.quad_type(), QuadType::Rect);
        assert_eq!(node.as_rect(), Some(RectD::new(12.0, 2.0, 16.0, 4.0)));
    }

    #[test]
    fn test_quarter_turn_keeps_rect() {
        let m = TransAffine::new_custom(0.0, 1.0, -1.0, 0.0, 0.0, 0.0);
        let mut node =
            GeometryTransform::new(RectGeometry::new(RectD::new(0.0, 0.0, 2.0, 1.0)), m.into());
        assert_eq!(node.revalidate(), RectD::new(-1.0, 0.0, 0.0, 2.0));
        assert_eq!(node.as_rect(), Some(RectD::new(-1.0, 0.0, 0.0, 2.0)));
    }

    #[test]
    fn test_perspective_divide() {
        let mut m = TransPerspective::new();
        m.w0 = 0.5;
        let mut node = GeometryTransform::new(RectGeometry::new(RectD::new(0.0, 0.0, 2.0, 2.0)), m);
        assert_eq!(node.revalidate(), RectD::new(0.0, 0.0, 1.0, 2.0));
        assert_eq!(node.quad_type(), QuadType::Perspective);
        assert_eq!(node.as_rect(), None);

        let (quad, ty) = node.to_quad().unwrap();
        assert_eq!(ty, QuadType::Perspective);
        assert!(quad.has_perspective());
        let b = quad.bounds(ty);
        assert_eq!(
            RectD::new(b.x1.into(), b.y1.into(), b.x2.into(), b.y2.into()),
            node.revalidate()
        );
    }

    #[test]
    fn test_set_transform_invalidates() {
        let mut node = GeometryTransform::new(
            RectGeometry::new(RectD::new(0.0, 0.0, 1.0, 1.0)),
            TransPerspective::new(),
        );
        assert_eq!(node.revalidate(), RectD::new(0.0, 0.0, 1.0, 1.0));

        node.set_transform(scale_translate());
        assert!(node.is_dirty());
        assert_eq!(node.revalidate(), RectD::new(10.0, 0.0, 12.0, 2.0));
    }

    #[test]
    fn test_child_mut_invalidates() {
        let mut node = GeometryTransform::new(
            RectGeometry::new(RectD::new(0.0, 0.0, 1.0, 1.0)),
            scale_translate(),
        );
        node.revalidate();
        node.child_mut().set_rect(RectD::new(0.0, 0.0, 5.0, 5.0));
        assert!(node.is_dirty());
        assert_eq!(node.revalidate(), RectD::new(10.0, 0.0, 20.0, 10.0));
        assert_eq!(node.child().rect(), RectD::new(0.0, 0.0, 5.0, 5.0));
    }

    #[test]
    fn test_as_path_before_and_after_revalidate() {
        let mut node = GeometryTransform::new(
            RectGeometry::new(RectD::new(0.0, 0.0, 1.0, 1.0)),
            scale_translate(),
        );
        let fresh = node.as_path();
        node.revalidate();
        assert_eq!(node.as_path().vertices(), fresh.vertices());
        assert_eq!(fresh.as_closed_quad().unwrap()[2], (12.0, 2.0));
    }

    #[test]
    fn test_nested_transforms() {
        let inner = GeometryTransform::new(
            RectGeometry::new(RectD::new(0.0, 0.0, 1.0, 1.0)),
            TransAffine::new_scaling(3.0, 3.0).into(),
        );
        let mut outer =
            GeometryTransform::new(inner, TransAffine::new_translation(1.0, 1.0).into());
        assert_eq!(outer.revalidate(), RectD::new(1.0, 1.0, 4.0, 4.0));
        assert_eq!(outer.as_rect(), Some(RectD::new(1.0, 1.0, 4.0, 4.0)));
        assert!(!outer.child().is_dirty());
    }

    #[test]
    fn test_to_quad_feeds_quad_list() {
        let rotated = GeometryTransform::new(
            RectGeometry::new(RectD::new(0.0, 0.0, 4.0, 2.0)),
            TransAffine::new_rotation(0.3).into(),
        );
        let (quad, ty) = rotated.to_quad().unwrap();
        assert_eq!(ty, QuadType::Rectilinear);
        assert!(quad.quad_type() <= ty);

        let mut list = QuadList::new();
        list.push_back(&quad, ty);
        assert_eq!(list.quad_type(), QuadType::Rectilinear);
        assert!(list.ws().is_empty());

        let path_node = GeometryTransform::new(PathGeometry::default(), TransPerspective::new());
        assert!(path_node.to_quad().is_none());
    }
}
