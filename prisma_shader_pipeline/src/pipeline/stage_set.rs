/// Stage marker types and compile-time stage-set validation
///
/// A pipeline's stage set is a tuple of zero-sized marker types, one per
/// stage kind. Validation (no duplicate kind, vertex and pixel mandatory)
/// runs in `const` context, so a malformed set is rejected when the
/// pipeline type is instantiated - it never reaches runtime.

use crate::gpu::StageKind;

/// Marker trait tying a zero-sized stage tag to its [`StageKind`]
pub trait StageSlot {
    /// The stage kind this marker selects
    const KIND: StageKind;
}

/// Vertex stage marker
pub struct VertexStage;
/// Pixel stage marker
pub struct PixelStage;
/// Geometry stage marker
pub struct GeometryStage;
/// Hull stage marker
pub struct HullStage;
/// Domain stage marker
pub struct DomainStage;

impl StageSlot for VertexStage {
    const KIND: StageKind = StageKind::Vertex;
}

impl StageSlot for PixelStage {
    const KIND: StageKind = StageKind::Pixel;
}

impl StageSlot for GeometryStage {
    const KIND: StageKind = StageKind::Geometry;
}

impl StageSlot for HullStage {
    const KIND: StageKind = StageKind::Hull;
}

impl StageSlot for DomainStage {
    const KIND: StageKind = StageKind::Domain;
}

/// An ordered, compile-time list of stage kinds
///
/// Implemented for tuples of [`StageSlot`] markers up to the full set of
/// five programmable graphics stages. The tuple order is the bind order.
pub trait StageList {
    /// The stage kinds in declaration order
    const KINDS: &'static [StageKind];
}

macro_rules! impl_stage_list {
    ($($slot:ident),+) => {
        impl<$($slot: StageSlot),+> StageList for ($($slot,)+) {
            const KINDS: &'static [StageKind] = &[$($slot::KIND),+];
        }
    };
}

impl_stage_list!(A);
impl_stage_list!(A, B);
impl_stage_list!(A, B, C);
impl_stage_list!(A, B, C, D);
impl_stage_list!(A, B, C, D, E);

// ===== CONST VALIDATION =====
//
// These run during constant evaluation; enum comparison goes through the
// discriminant because trait calls are unavailable in const fn.

/// True if `kind` appears in `kinds`
pub(crate) const fn contains_kind(kinds: &[StageKind], kind: StageKind) -> bool {
    let mut i = 0;
    while i < kinds.len() {
        if kinds[i] as u32 == kind as u32 {
            return true;
        }
        i += 1;
    }
    false
}

/// True if any stage kind appears more than once
pub(crate) const fn has_duplicate_kind(kinds: &[StageKind]) -> bool {
    let mut i = 0;
    while i < kinds.len() {
        let mut j = i + 1;
        while j < kinds.len() {
            if kinds[i] as u32 == kinds[j] as u32 {
                return true;
            }
            j += 1;
        }
        i += 1;
    }
    false
}

/// Index of `kind` in `kinds`; compile-time panic when absent
pub(crate) const fn position_of_kind(kinds: &[StageKind], kind: StageKind) -> usize {
    let mut i = 0;
    while i < kinds.len() {
        if kinds[i] as u32 == kind as u32 {
            return i;
        }
        i += 1;
    }
    panic!("stage kind is not part of this pipeline's stage list");
}

#[cfg(test)]
#[path = "stage_set_tests.rs"]
mod tests;
