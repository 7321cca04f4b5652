//! Masked Geometry Pass
//!
//! Draws the objects selected by a [`FilterSpec`] into the shared offscreen
//! buffer, replacing each object's own material with sub-pass 0 of the
//! pixelation material.
//!
//! # Data Flow
//!
//! ```text
//! visible objects ──(layer mask + tag whitelist)──► override material #0
//!                                                        │
//!                     camera depth (test only) ──────────┤
//!                                                        ▼
//!                                        shared offscreen buffer (cleared)
//! ```

use crate::errors::{PixelationError, Result};
use crate::filter::FilterSpec;
use crate::graph::{PassContext, RenderPass};
use crate::host::{BufferId, ClearFlags, DrawRenderersDesc, SortingCriteria};
use crate::material::{MaterialBinding, MaterialPass, OverrideMaterial};

/// Renders masked geometry into the shared offscreen buffer.
pub struct MaskedGeometryPass {
    filter: FilterSpec,
    material: OverrideMaterial,
    /// Shared offscreen buffer, injected by the feature each frame
    target: Option<BufferId>,
    /// Objects drawn during the last execute
    last_drawn: usize,
}

impl MaskedGeometryPass {
    pub const NAME: &'static str = "MaskedGeometryPass";

    #[must_use]
    pub fn new(filter: FilterSpec, material: OverrideMaterial) -> Self {
        Self {
            filter,
            material,
            target: None,
            last_drawn: 0,
        }
    }

    /// Binds the shared offscreen buffer this pass writes into.
    pub fn set_target(&mut self, target: BufferId) {
        self.target = Some(target);
    }

    /// Forgets the shared buffer. The owner releases it.
    pub fn release_handles(&mut self) {
        self.target = None;
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> Option<BufferId> {
        self.target
    }

    #[inline]
    #[must_use]
    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    #[inline]
    #[must_use]
    pub fn last_drawn(&self) -> usize {
        self.last_drawn
    }

    fn bound_target(&self) -> Result<BufferId> {
        self.target.ok_or(PixelationError::UnboundResource {
            pass: Self::NAME,
            resource: "a shared offscreen buffer",
        })
    }
}

impl RenderPass for MaskedGeometryPass {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn setup(&mut self, ctx: &mut PassContext<'_>) -> Result<()> {
        let target = self.bound_target()?;
        ctx.host.set_render_target(target, Some(ctx.camera.depth))?;
        ctx.host.clear(ClearFlags::COLOR, wgpu::Color::TRANSPARENT)
    }

    fn execute(&mut self, ctx: &mut PassContext<'_>) -> Result<()> {
        let desc = DrawRenderersDesc {
            filter: &self.filter,
            sorting: SortingCriteria::CommonOpaque,
            override_material: MaterialBinding::new(&self.material, MaterialPass::MeshDraw),
        };
        self.last_drawn = ctx.host.draw_renderers(&desc)?;
        log::trace!("{}: drew {} objects", Self::NAME, self.last_drawn);
        Ok(())
    }
}
