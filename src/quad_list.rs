//! Batched quad storage.
//!
//! [`QuadStorage`] is a growable list of (possibly perspective) quads that
//! tracks the most general [`QuadType`] ever added. x and y are always
//! stored, interleaved with optional per-quad metadata so that everything a
//! draw needs for one quad is in one record. The w channel lives in a
//! separate array that stays empty until the first perspective quad
//! arrives; at that point every earlier quad is back-filled with w = 1.
//!
//! Two facades wrap the engine: [`QuadList`] for bare quads and
//! [`QuadListWithMetadata`] for quads carrying a colour, texture domain or
//! similar payload.
//!
//! Preconditions (index range, declared type at least as general as the
//! quad) are asserted in debug builds and with the `checked` feature. The
//! `try_*` methods check them in every build.

use crate::error::{QuadError, Result};
use crate::quad::{PerspQuad, QuadGeometry, QuadType, NO_PERSPECTIVE_WS};

// ============================================================================
// QuadRecord
// ============================================================================

/// One stored quad: x, y and metadata together. `T = ()` adds no storage.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QuadRecord<T> {
    pub x: [f32; 4],
    pub y: [f32; 4],
    pub metadata: T,
}

// ============================================================================
// QuadStorage
// ============================================================================

/// Quad storage engine shared by [`QuadList`] and [`QuadListWithMetadata`].
///
/// State machine over one variable, the tracked type, which starts at
/// `Rect` and only ever increases. Once it reaches `Perspective`,
/// `ws().len() == 4 * len()` holds after every operation.
#[derive(Debug, Clone)]
pub struct QuadStorage<T> {
    records: Vec<QuadRecord<T>>,
    // Empty unless quad_type is Perspective.
    ws: Vec<f32>,
    quad_type: QuadType,
}

impl<T> QuadStorage<T> {
    /// Empty storage with tracked type `Rect`.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            ws: Vec::new(),
            quad_type: QuadType::Rect,
        }
    }

    /// Number of stored quads.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most general type of any quad ever added.
    #[inline]
    pub fn quad_type(&self) -> QuadType {
        self.quad_type
    }

    /// Reserve room for `count` more quads of type `for_type`. Also reserves
    /// the w channel if either `for_type` or the list is perspective.
    pub fn reserve(&mut self, count: usize, for_type: QuadType) {
        self.records.reserve(count);
        if for_type.has_perspective() || self.quad_type.has_perspective() {
            self.ws.reserve(4 * count);
        }
    }

    /// Append a quad and return its record so metadata can be set in place.
    ///
    /// `ty` must be at least as general as the quad's true type; it is
    /// trusted rather than re-derived. A too-specific `ty` is not detected
    /// in release builds and leads to the wrong shader being chosen
    /// downstream.
    pub fn push_back<Q: QuadGeometry>(
        &mut self,
        quad: &Q,
        ty: QuadType,
        metadata: T,
    ) -> &mut QuadRecord<T> {
        quad_assert!(
            quad.quad_type() <= ty,
            "quad pushed as {:?} but points classify as {:?}",
            ty,
            quad.quad_type()
        );
        self.push_back_unchecked(quad, ty, metadata)
    }

    /// [`push_back`](Self::push_back) that validates `ty` against the
    /// quad's points in every build.
    pub fn try_push_back<Q: QuadGeometry>(
        &mut self,
        quad: &Q,
        ty: QuadType,
        metadata: T,
    ) -> Result<&mut QuadRecord<T>> {
        let actual = quad.quad_type();
        if actual > ty {
            return Err(QuadError::TypeTooSpecific {
                declared: ty,
                actual,
            });
        }
        Ok(self.push_back_unchecked(quad, ty, metadata))
    }

    fn push_back_unchecked<Q: QuadGeometry>(
        &mut self,
        quad: &Q,
        ty: QuadType,
        metadata: T,
    ) -> &mut QuadRecord<T> {
        self.upgrade_type(ty);
        if self.quad_type.has_perspective() {
            self.ws
                .extend_from_slice(quad.ws().unwrap_or(&NO_PERSPECTIVE_WS));
        }
        self.records.push(QuadRecord {
            x: *quad.xs(),
            y: *quad.ys(),
            metadata,
        });
        let last = self.records.len() - 1;
        &mut self.records[last]
    }

    /// Quad `i`, always as a [`PerspQuad`]. Non-perspective lists report
    /// w = 1 for every point.
    ///
    /// Panics if `i` is out of range; debug builds name the index.
    pub fn quad(&self, i: usize) -> PerspQuad {
        quad_assert!(
            i < self.len(),
            "quad index {} out of range (len {})",
            i,
            self.len()
        );
        self.quad_at(i)
    }

    /// Quad `i`, or `None` if out of range.
    pub fn get(&self, i: usize) -> Option<PerspQuad> {
        (i < self.len()).then(|| self.quad_at(i))
    }

    /// Quad `i`, or [`QuadError::IndexOutOfRange`].
    pub fn try_quad(&self, i: usize) -> Result<PerspQuad> {
        self.get(i).ok_or(QuadError::IndexOutOfRange {
            index: i,
            len: self.len(),
        })
    }

    fn quad_at(&self, i: usize) -> PerspQuad {
        let item = &self.records[i];
        if self.quad_type.has_perspective() {
            let mut w = [0.0; 4];
            w.copy_from_slice(&self.ws[4 * i..4 * i + 4]);
            PerspQuad::new(item.x, item.y, w)
        } else {
            PerspQuad::new(item.x, item.y, NO_PERSPECTIVE_WS)
        }
    }

    /// Metadata of quad `i`.
    pub fn metadata(&self, i: usize) -> &T {
        &self.records[i].metadata
    }

    /// Mutable metadata of quad `i`.
    pub fn metadata_mut(&mut self, i: usize) -> &mut T {
        &mut self.records[i].metadata
    }

    /// All records in insertion order.
    pub fn records(&self) -> &[QuadRecord<T>] {
        &self.records
    }

    /// The w channel, four values per quad, or empty if the list is not
    /// perspective.
    pub fn ws(&self) -> &[f32] {
        &self.ws
    }

    /// Iterate quads with their metadata.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            storage: self,
            index: 0,
        }
    }

    /// Remove all quads. The tracked type is kept, so it never decreases
    /// over the list's lifetime.
    pub fn clear(&mut self) {
        self.records.clear();
        self.ws.clear();
    }

    fn upgrade_type(&mut self, ty: QuadType) {
        if ty <= self.quad_type {
            return;
        }
        log::trace!(
            "quad list upgraded from {:?} to {:?} at {} quads",
            self.quad_type,
            ty,
            self.len()
        );
        self.quad_type = ty;
        if ty.has_perspective() {
            // Every quad stored so far was 2D.
            self.ws.resize(4 * self.records.len(), 1.0);
        }
    }
}

impl<T: Clone> QuadStorage<T> {
    /// Append all quads of `other`, upgrading this list to the more general
    /// of the two types first.
    pub fn concat(&mut self, other: &QuadStorage<T>) {
        self.upgrade_type(other.quad_type);
        self.records.extend_from_slice(&other.records);
        if self.quad_type.has_perspective() {
            if other.quad_type.has_perspective() {
                self.ws.extend_from_slice(&other.ws);
            } else {
                // other's ws were implicit
                self.ws.resize(4 * self.records.len(), 1.0);
            }
        }
    }
}

impl<T> Default for QuadStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over `(quad, metadata)` pairs of a [`QuadStorage`].
pub struct Iter<'a, T> {
    storage: &'a QuadStorage<T>,
    index: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (PerspQuad, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let storage = self.storage;
        if self.index >= storage.len() {
            return None;
        }
        let i = self.index;
        self.index += 1;
        Some((storage.quad_at(i), &storage.records[i].metadata))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.storage.len() - self.index;
        (n, Some(n))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

// ============================================================================
// QuadList
// ============================================================================

/// A list of quads without metadata.
#[derive(Debug, Clone, Default)]
pub struct QuadList {
    storage: QuadStorage<()>,
}

impl QuadList {
    /// Empty list with tracked type `Rect`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored quads.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// True if no quads are stored.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Most general type of any quad ever added.
    pub fn quad_type(&self) -> QuadType {
        self.storage.quad_type()
    }

    /// See [`QuadStorage::reserve`].
    pub fn reserve(&mut self, count: usize, for_type: QuadType) {
        self.storage.reserve(count, for_type);
    }

    /// Append a [`Quad`](crate::quad::Quad) or [`PerspQuad`]; see
    /// [`QuadStorage::push_back`] for the `ty` contract.
    pub fn push_back<Q: QuadGeometry>(&mut self, quad: &Q, ty: QuadType) {
        self.storage.push_back(quad, ty, ());
    }

    pub fn try_push_back<Q: QuadGeometry>(&mut self, quad: &Q, ty: QuadType) -> Result<()> {
        self.storage.try_push_back(quad, ty, ()).map(|_| ())
    }

    /// Append all quads of `other`; see [`QuadStorage::concat`].
    pub fn concat(&mut self, other: &QuadList) {
        self.storage.concat(&other.storage);
    }

    /// Quad `i`; panics if out of range.
    pub fn quad(&self, i: usize) -> PerspQuad {
        self.storage.quad(i)
    }

    /// Quad `i`, or `None` if out of range.
    pub fn get(&self, i: usize) -> Option<PerspQuad> {
        self.storage.get(i)
    }

    /// Quad `i`, or [`QuadError::IndexOutOfRange`].
    pub fn try_quad(&self, i: usize) -> Result<PerspQuad> {
        self.storage.try_quad(i)
    }

    /// The w channel; empty unless the list is perspective.
    pub fn ws(&self) -> &[f32] {
        self.storage.ws()
    }

    /// Iterate quads in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = PerspQuad> + '_ {
        self.storage.iter().map(|(quad, _)| quad)
    }

    /// Remove all quads, keeping the tracked type.
    pub fn clear(&mut self) {
        self.storage.clear();
    }

    /// The underlying engine.
    pub fn storage(&self) -> &QuadStorage<()> {
        &self.storage
    }
}

// ============================================================================
// QuadListWithMetadata
// ============================================================================

/// A list of quads each carrying a `T` (colour, texture domain, ...) stored
/// inline with its coordinates.
#[derive(Debug, Clone)]
pub struct QuadListWithMetadata<T> {
    storage: QuadStorage<T>,
}

impl<T> QuadListWithMetadata<T> {
    /// Empty list with tracked type `Rect`.
    pub fn new() -> Self {
        Self {
            storage: QuadStorage::new(),
        }
    }

    /// Number of stored quads.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// True if no quads are stored.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Most general type of any quad ever added.
    pub fn quad_type(&self) -> QuadType {
        self.storage.quad_type()
    }

    /// See [`QuadStorage::reserve`].
    pub fn reserve(&mut self, count: usize, for_type: QuadType) {
        self.storage.reserve(count, for_type);
    }

    /// Append a quad with its metadata; see [`QuadStorage::push_back`] for
    /// the `ty` contract.
    pub fn push_back<Q: QuadGeometry>(&mut self, quad: &Q, ty: QuadType, metadata: T) {
        self.storage.push_back(quad, ty, metadata);
    }

    /// Append after checking `ty` against the quad's points.
    pub fn try_push_back<Q: QuadGeometry>(
        &mut self,
        quad: &Q,
        ty: QuadType,
        metadata: T,
    ) -> Result<()> {
        self.storage.try_push_back(quad, ty, metadata).map(|_| ())
    }

    /// Quad `i`; panics if out of range.
    pub fn quad(&self, i: usize) -> PerspQuad {
        self.storage.quad(i)
    }

    /// Quad `i`, or `None` if out of range.
    pub fn get(&self, i: usize) -> Option<PerspQuad> {
        self.storage.get(i)
    }

    /// Quad `i`, or [`QuadError::IndexOutOfRange`].
    pub fn try_quad(&self, i: usize) -> Result<PerspQuad> {
        self.storage.try_quad(i)
    }

    /// Metadata of quad `i`.
    pub fn metadata(&self, i: usize) -> &T {
        self.storage.metadata(i)
    }

    /// Mutable metadata of quad `i`.
    pub fn metadata_mut(&mut self, i: usize) -> &mut T {
        self.storage.metadata_mut(i)
    }

    /// The w channel; empty unless the list is perspective.
    pub fn ws(&self) -> &[f32] {
        self.storage.ws()
    }

    /// Iterate quads with their metadata.
    pub fn iter(&self) -> Iter<'_, T> {
        self.storage.iter()
    }

    /// Remove all quads, keeping the tracked type.
    pub fn clear(&mut self) {
        self.storage.clear();
    }

    /// The underlying engine.
    pub fn storage(&self) -> &QuadStorage<T> {
        &self.storage
    }
}

impl<T: Clone> QuadListWithMetadata<T> {
    /// Append all quads and metadata of `other`; see [`QuadStorage::concat`].
    pub fn concat(&mut self, other: &QuadListWithMetadata<T>) {
        self.storage.concat(&other.storage);
    }
}

impl<T> Default for QuadListWithMetadata<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
