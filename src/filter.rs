//! Object Filtering
//!
//! Selects which scene objects take part in the masked geometry draw: an
//! object is drawn when its render layer is in the [`LayerMask`] **and** its
//! shading technique tag is one of the recognized [`ShaderTag`]s.

use bitflags::bitflags;
use smallvec::SmallVec;

bitflags! {
    /// Set of render layers (32 layers, one bit each).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LayerMask: u32 {
        const DEFAULT = 1 << 0;
        const TRANSPARENT_FX = 1 << 1;
        const IGNORE_RAYCAST = 1 << 2;
        const WATER = 1 << 4;
        const UI = 1 << 5;

        // Layers are user-defined beyond the built-in ones.
        const _ = !0;
    }
}

impl LayerMask {
    /// Mask containing a single layer.
    ///
    /// Layers outside `0..32` yield an empty mask.
    #[inline]
    #[must_use]
    pub const fn from_layer(layer: u8) -> Self {
        if layer < 32 {
            Self::from_bits_retain(1 << layer)
        } else {
            Self::empty()
        }
    }

    #[inline]
    #[must_use]
    pub const fn contains_layer(self, layer: u8) -> bool {
        layer < 32 && self.bits() & (1 << layer) != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::all()
    }
}

/// Raw-bits serde representation for [`LayerMask`].
pub(crate) mod layer_mask_bits {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::LayerMask;

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(mask: &LayerMask, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(mask.bits())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<LayerMask, D::Error> {
        u32::deserialize(deserializer).map(LayerMask::from_bits_retain)
    }
}

/// Identifier of a shading technique (the "light mode" of a shader pass).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderTag(pub &'static str);

impl ShaderTag {
    pub const SRP_DEFAULT_UNLIT: Self = Self("SRPDefaultUnlit");
    pub const UNIVERSAL_FORWARD: Self = Self("UniversalForward");
    pub const UNIVERSAL_FORWARD_ONLY: Self = Self("UniversalForwardOnly");
    pub const LIGHTWEIGHT_FORWARD: Self = Self("LightweightForward");

    /// Techniques recognized by the masked geometry draw.
    pub const RECOGNIZED: [Self; 4] = [
        Self::SRP_DEFAULT_UNLIT,
        Self::UNIVERSAL_FORWARD,
        Self::UNIVERSAL_FORWARD_ONLY,
        Self::LIGHTWEIGHT_FORWARD,
    ];

    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.0
    }
}

/// Layer mask plus technique whitelist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub layer_mask: LayerMask,
    pub shader_tags: SmallVec<[ShaderTag; 4]>,
}

impl FilterSpec {
    /// Filter over `layer_mask` with the recognized technique tags.
    #[must_use]
    pub fn new(layer_mask: LayerMask) -> Self {
        Self {
            layer_mask,
            shader_tags: SmallVec::from_slice(&ShaderTag::RECOGNIZED),
        }
    }

    #[inline]
    #[must_use]
    pub fn matches(&self, layer: u8, tag: ShaderTag) -> bool {
        self.layer_mask.contains_layer(layer) && self.shader_tags.contains(&tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_layer_masks() {
        let mask = LayerMask::from_layer(8) | LayerMask::DEFAULT;
        assert!(mask.contains_layer(8));
        assert!(mask.contains_layer(0));
        assert!(!mask.contains_layer(4));
        assert!(!mask.contains_layer(40));
        assert!(LayerMask::from_layer(40).is_empty());
    }

    #[test]
    fn filter_requires_layer_and_tag() {
        let filter = FilterSpec::new(LayerMask::from_layer(3));
        assert!(filter.matches(3, ShaderTag::UNIVERSAL_FORWARD));
        assert!(!filter.matches(2, ShaderTag::UNIVERSAL_FORWARD));
        assert!(!filter.matches(3, ShaderTag("DepthOnly")));
    }
}
