//! Anti-aliasing resolution for quads.
//!
//! A draw request carries an overall anti-aliasing mode and per-edge flags.
//! These can disagree (coverage AA with no AA edges, MSAA with partial edge
//! flags), and some quads do not need AA at all. An [`AaResolver`] reconciles
//! the two for a quad whose type is already known; the default
//! [`PixelAlignedAaResolver`] only drops AA where doing so is invisible.

use bitflags::bitflags;

use crate::quad::{QuadGeometry, QuadType};

/// Overall anti-aliasing mode of a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AaType {
    /// No anti-aliasing.
    None,
    /// Analytic coverage computed in the shader, per edge.
    Coverage,
    /// Multisampled render target; all edges are sampled.
    Msaa,
}

bitflags! {
    /// Which edges of a quad request anti-aliasing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct QuadAaFlags: u8 {
        const LEFT = 0b0001;
        const BOTTOM = 0b0010;
        const RIGHT = 0b0100;
        const TOP = 0b1000;

        const ALL = Self::LEFT.bits() | Self::BOTTOM.bits() | Self::RIGHT.bits() | Self::TOP.bits();
    }
}

/// The reconciled AA mode and edge flags for one quad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AaResolution {
    pub aa_type: AaType,
    pub edge_flags: QuadAaFlags,
}

impl AaResolution {
    pub fn new(aa_type: AaType, edge_flags: QuadAaFlags) -> Self {
        Self {
            aa_type,
            edge_flags,
        }
    }
}

/// Strategy that reconciles a requested AA mode with requested edge flags.
///
/// `known_type` must come from
/// [`quad_type_for_transformed_rect`](crate::quad::quad_type_for_transformed_rect)
/// for the same matrix that produced `quad`.
pub trait AaResolver {
    fn resolve<Q: QuadGeometry>(
        &self,
        requested_aa: AaType,
        requested_edge_flags: QuadAaFlags,
        quad: &Q,
        known_type: QuadType,
    ) -> AaResolution;
}

/// Default policy: never change what renders, only what it costs.
///
/// - Coverage AA with no AA edges turns AA off.
/// - Coverage AA on a rect whose edges sit on the pixel grid turns AA and
///   all edge flags off.
/// - No AA clears the edge flags; they only mean something for coverage.
/// - MSAA samples every edge, so all edge flags are set.
#[derive(Debug, Clone, Copy, Default)]
pub struct PixelAlignedAaResolver;

impl AaResolver for PixelAlignedAaResolver {
    fn resolve<Q: QuadGeometry>(
        &self,
        requested_aa: AaType,
        requested_edge_flags: QuadAaFlags,
        quad: &Q,
        known_type: QuadType,
    ) -> AaResolution {
        match requested_aa {
            AaType::Coverage if requested_edge_flags.is_empty() => {
                log::debug!("coverage AA requested without AA edges; disabling AA");
                AaResolution::new(AaType::None, requested_edge_flags)
            }
            AaType::Coverage if known_type == QuadType::Rect && !quad.aa_has_effect_on_rect() => {
                log::debug!("pixel-aligned rect; disabling coverage AA");
                AaResolution::new(AaType::None, QuadAaFlags::empty())
            }
            AaType::Coverage => AaResolution::new(AaType::Coverage, requested_edge_flags),
            AaType::None => AaResolution::new(AaType::None, QuadAaFlags::empty()),
            AaType::Msaa => AaResolution::new(AaType::Msaa, QuadAaFlags::ALL),
        }
    }
}

/// Resolve AA for `quad` with the default [`PixelAlignedAaResolver`] policy.
pub fn resolve_aa_type_for_quad<Q: QuadGeometry>(
    requested_aa: AaType,
    requested_edge_flags: QuadAaFlags,
    quad: &Q,
    known_type: QuadType,
) -> AaResolution {
    PixelAlignedAaResolver.resolve(requested_aa, requested_edge_flags, quad, known_type)
}

// ============================================================================
// Tests
// ============================================================================
