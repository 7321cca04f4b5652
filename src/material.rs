//! Override Material
//!
//! The pixelation feature draws masked geometry and runs its composite through
//! a single host material that exposes several named sub-passes. The material
//! itself (shader code, pipeline state) lives in the host; this crate only
//! holds an opaque handle plus the sub-pass names, and addresses sub-passes by
//! index.
//!
//! # Sub-pass Table
//!
//! | Index | Sub-pass | Used by |
//! |-------|----------|---------|
//! | 0 | `MeshDraw` | [`MaskedGeometryPass`](crate::passes::MaskedGeometryPass) |
//! | 1 | `VerticalBlur` | reserved |
//! | 2 | `HorizontalBlur` | reserved |
//! | 3 | `Downsample` | reserved |
//! | 4 | `ResolveDownsample` | reserved |
//! | 5 | `PixelationToTarget` | [`PixelationPass`](crate::passes::PixelationPass) |

use serde::{Deserialize, Serialize};

use crate::errors::{PixelationError, Result};

/// Addressable sub-passes of the pixelation material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MaterialPass {
    /// Flat draw of masked geometry into the offscreen buffer.
    MeshDraw = 0,
    VerticalBlur = 1,
    HorizontalBlur = 2,
    Downsample = 3,
    ResolveDownsample = 4,
    /// Final pixelation composite sampling the camera color.
    PixelationToTarget = 5,
}

impl MaterialPass {
    /// All sub-passes in index order.
    pub const ALL: [Self; 6] = [
        Self::MeshDraw,
        Self::VerticalBlur,
        Self::HorizontalBlur,
        Self::Downsample,
        Self::ResolveDownsample,
        Self::PixelationToTarget,
    ];

    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self as u32
    }

    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MeshDraw => "MeshDraw",
            Self::VerticalBlur => "VerticalBlur",
            Self::HorizontalBlur => "HorizontalBlur",
            Self::Downsample => "Downsample",
            Self::ResolveDownsample => "ResolveDownsample",
            Self::PixelationToTarget => "PixelationToTarget",
        }
    }
}

/// Opaque handle to a host material with named sub-passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideMaterial {
    /// Host-side material identifier.
    pub id: u64,
    /// Human-readable name, used in logs and errors.
    pub name: String,
    /// Sub-pass names in index order.
    pub sub_passes: Vec<String>,
}

impl OverrideMaterial {
    /// Creates a material handle with explicit sub-pass names.
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>, sub_passes: Vec<String>) -> Self {
        Self {
            id,
            name: name.into(),
            sub_passes,
        }
    }

    /// Creates a material handle exposing the canonical pixelation sub-pass table.
    #[must_use]
    pub fn pixelation(id: u64, name: impl Into<String>) -> Self {
        Self::new(
            id,
            name,
            MaterialPass::ALL.iter().map(|p| p.name().to_owned()).collect(),
        )
    }

    #[inline]
    #[must_use]
    pub fn pass_count(&self) -> u32 {
        self.sub_passes.len() as u32
    }

    /// Returns the sub-pass name at `index`, if present.
    #[must_use]
    pub fn pass_name(&self, index: u32) -> Option<&str> {
        self.sub_passes.get(index as usize).map(String::as_str)
    }

    /// Checks that the material exposes `pass`.
    pub fn require(&self, pass: MaterialPass) -> Result<()> {
        if pass.index() < self.pass_count() {
            Ok(())
        } else {
            Err(PixelationError::InvalidSubPass {
                material: self.name.clone(),
                role: pass.name(),
                index: pass.index(),
                available: self.pass_count(),
            })
        }
    }
}

/// A material bound to one of its sub-passes for a single draw or blit.
#[derive(Debug, Clone, Copy)]
pub struct MaterialBinding<'a> {
    pub material: &'a OverrideMaterial,
    pub pass: u32,
}

impl<'a> MaterialBinding<'a> {
    #[inline]
    #[must_use]
    pub fn new(material: &'a OverrideMaterial, pass: MaterialPass) -> Self {
        Self {
            material,
            pass: pass.index(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_table_matches_indices() {
        let material = OverrideMaterial::pixelation(7, "Pixelation");
        assert_eq!(material.pass_count(), 6);
        for pass in MaterialPass::ALL {
            assert_eq!(material.pass_name(pass.index()), Some(pass.name()));
        }
    }

    #[test]
    fn require_reports_missing_composite() {
        let material = OverrideMaterial::new(1, "Partial", vec!["MeshDraw".into()]);
        assert!(material.require(MaterialPass::MeshDraw).is_ok());
        assert_eq!(
            material.require(MaterialPass::PixelationToTarget),
            Err(PixelationError::InvalidSubPass {
                material: "Partial".into(),
                role: "PixelationToTarget",
                index: 5,
                available: 1,
            })
        );
    }
}
