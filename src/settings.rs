//! Pixelation Feature Settings
//!
//! Pure configuration data for [`PixelationFeature`](crate::feature::PixelationFeature).
//! Settings are read once when the feature is created; passes get copies of the
//! values they need.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use myth_pixelation::{PixelationSettings, OverrideMaterial, LayerMask, InjectionPoint};
//!
//! let settings = PixelationSettings {
//!     layer_mask: LayerMask::from_layer(8),
//!     injection_point: InjectionPoint::BeforeRenderingPostProcessing,
//!     material: Some(OverrideMaterial::pixelation(1, "Pixelation")),
//!     pyramid_depth: 4,
//!     ..Default::default()
//! };
//! ```
//!
//! Settings deserialize from any serde format; missing fields take their
//! defaults and `layer_mask` is stored as its raw `u32`.

use serde::{Deserialize, Serialize};

use crate::errors::{PixelationError, Result};
use crate::filter::{LayerMask, layer_mask_bits};
use crate::graph::InjectionPoint;
use crate::material::{MaterialPass, OverrideMaterial};

/// Largest supported pyramid depth.
pub const MAX_PYRAMID_DEPTH: u32 = 5;

/// Pixelation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PixelationSettings {
    /// Whether the feature creates and enqueues its passes.
    ///
    /// Default: `true`
    pub enabled: bool,

    /// Whether the effect also renders for non-game views (scene view, previews).
    ///
    /// Default: `false`
    pub enable_in_scene_view: bool,

    /// Layers whose objects are pixelated.
    ///
    /// Default: every layer
    #[serde(with = "layer_mask_bits")]
    pub layer_mask: LayerMask,

    /// Where in the host pipeline both passes are inserted.
    ///
    /// Default: [`InjectionPoint::AfterRendering`]
    pub injection_point: InjectionPoint,

    /// Material providing the mesh draw and composite sub-passes.
    ///
    /// Default: `None` (feature stays inert)
    pub material: Option<OverrideMaterial>,

    /// Maximum number of downsample levels, `0..=5`.
    ///
    /// Default: `3`
    pub pyramid_depth: u32,
}

impl Default for PixelationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            enable_in_scene_view: false,
            layer_mask: LayerMask::all(),
            injection_point: InjectionPoint::AfterRendering,
            material: None,
            pyramid_depth: 3,
        }
    }
}

impl PixelationSettings {
    /// Returns the material if it exposes every sub-pass the feature uses.
    pub fn validated_material(&self) -> Result<&OverrideMaterial> {
        let material = self
            .material
            .as_ref()
            .ok_or(PixelationError::MissingMaterial)?;
        material.require(MaterialPass::MeshDraw)?;
        material.require(MaterialPass::PixelationToTarget)?;
        Ok(material)
    }

    /// Pyramid depth clamped to `0..=MAX_PYRAMID_DEPTH`.
    #[must_use]
    pub fn effective_pyramid_depth(&self) -> u32 {
        if self.pyramid_depth > MAX_PYRAMID_DEPTH {
            log::warn!(
                "Pyramid depth {} exceeds the supported maximum, clamping to {MAX_PYRAMID_DEPTH}",
                self.pyramid_depth
            );
        }
        self.pyramid_depth.min(MAX_PYRAMID_DEPTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = PixelationSettings::default();
        assert!(settings.enabled);
        assert!(!settings.enable_in_scene_view);
        assert_eq!(settings.layer_mask, LayerMask::all());
        assert_eq!(settings.injection_point, InjectionPoint::AfterRendering);
        assert_eq!(settings.pyramid_depth, 3);
        assert_eq!(
            settings.validated_material(),
            Err(PixelationError::MissingMaterial)
        );
    }

    #[test]
    fn depth_is_clamped() {
        let settings = PixelationSettings {
            pyramid_depth: 9,
            ..Default::default()
        };
        assert_eq!(settings.effective_pyramid_depth(), MAX_PYRAMID_DEPTH);
    }

    #[test]
    fn material_without_composite_is_rejected() {
        let settings = PixelationSettings {
            material: Some(OverrideMaterial::new(
                3,
                "MeshOnly",
                vec!["MeshDraw".into(), "VerticalBlur".into()],
            )),
            ..Default::default()
        };
        assert!(matches!(
            settings.validated_material(),
            Err(PixelationError::InvalidSubPass { index: 5, available: 2, .. })
        ));
    }
}
