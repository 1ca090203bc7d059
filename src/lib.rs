//! # quad-batch
//!
//! Batched storage and classification of quadrilaterals for a 2D GPU
//! renderer.
//!
//! Rectangles drawn through a matrix become quads. A renderer that batches
//! many of them wants to know the most general shape in the batch, because
//! that picks the shader: axis-aligned rects are cheapest, perspective
//! quads need a homogeneous w per vertex.
//!
//! ## Architecture
//!
//! 1. **Transforms** ([`trans_affine`], [`trans_perspective`]) and the
//!    matrix classifier [`quad_type_for_transformed_rect`]
//! 2. **Quads** ([`quad`]): [`Quad`] and [`PerspQuad`] in triangle-strip
//!    order, with bounds and anti-aliasing relevance
//! 3. **Lists** ([`quad_list`]): [`QuadList`] and [`QuadListWithMetadata`]
//!    over one storage engine that allocates w only once a perspective quad
//!    is added
//! 4. **AA resolution** ([`aa`]): reconciles requested AA with the quad
//! 5. **Scene graph** ([`geometry_transform`]): a transform node that
//!    produces paths, bounds and quads for its child
//!
//! Preconditions are asserted in debug builds. Enable the `checked` feature
//! to keep them in release builds, or use the `try_*` methods which report
//! [`QuadError`] in every build.

/// Precondition check, active in debug builds and with the `checked`
/// feature.
macro_rules! quad_assert {
    ($($arg:tt)+) => {
        if cfg!(any(debug_assertions, feature = "checked")) {
            assert!($($arg)+);
        }
    };
}

// Geometry primitives
pub mod basics;
pub mod bounding_rect;
pub mod path_storage;
pub mod trans_affine;
pub mod trans_perspective;

// Quads
pub mod aa;
pub mod error;
pub mod quad;
pub mod quad_list;

// Scene graph
pub mod geometry_transform;

pub use aa::{
    resolve_aa_type_for_quad, AaResolution, AaResolver, AaType, PixelAlignedAaResolver,
    QuadAaFlags,
};
pub use error::{QuadError, Result};
pub use geometry_transform::{GeometryNode, GeometryTransform, PathGeometry, RectGeometry};
pub use quad::{quad_type_for_transformed_rect, PerspQuad, Quad, QuadGeometry, QuadType};
pub use quad_list::{QuadList, QuadListWithMetadata, QuadRecord, QuadStorage};
pub use trans_affine::TransAffine;
pub use trans_perspective::TransPerspective;
