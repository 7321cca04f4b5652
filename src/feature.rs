//! Pixelation Feature
//!
//! Wires [`MaskedGeometryPass`] and [`PixelationPass`] together and owns the
//! offscreen buffer they share.
//!
//! # Frame Lifecycle
//!
//! ```text
//! setup_render_passes(host)      gate → (re)allocate shared buffer → inject
//! add_render_passes(builder)     [MaskedGeometryPass, PixelationPass] @ injection point
//! builder.execute(host, env)     setup/execute/cleanup per pass
//! ...
//! dispose(host)                  release shared buffer, unbind passes
//! ```
//!
//! [`render_frame`](PixelationFeature::render_frame) performs the three frame
//! steps in one call.
//!
//! # Gating
//!
//! The feature is *inert* (no passes, no allocations) when it is disabled or
//! its material is unusable; those are decided once at creation. Per frame, it
//! also stays out of non-game views unless `enable_in_scene_view` is set.

use crate::errors::Result;
use crate::filter::FilterSpec;
use crate::graph::{FrameBuilder, InjectionPoint};
use crate::host::{BufferDesc, BufferId, PublishedEnvironment, RenderHost};
use crate::passes::{MaskedGeometryPass, PixelationPass};
use crate::settings::PixelationSettings;

/// The two passes, created only for a usable configuration.
struct FeaturePasses {
    masked: MaskedGeometryPass,
    pixelation: PixelationPass,
}

/// The shared offscreen buffer and the descriptor it was created with.
#[derive(Debug, Clone, Copy)]
struct SharedBuffer {
    id: BufferId,
    desc: BufferDesc,
}

/// Masked-geometry pixelation render feature.
pub struct PixelationFeature {
    settings: PixelationSettings,
    passes: Option<FeaturePasses>,
    shared: Option<SharedBuffer>,
    /// Whether the passes take part in the current frame.
    active_this_frame: bool,
}

impl PixelationFeature {
    /// Label of the shared masked geometry buffer.
    pub const SHARED_BUFFER_LABEL: &'static str = "Pixelation Mesh Buffer";

    /// Creates the feature.
    ///
    /// An unusable configuration does not fail: the feature is created inert
    /// and the problem is logged.
    #[must_use]
    pub fn new(settings: PixelationSettings) -> Self {
        let passes = if settings.enabled {
            match settings.validated_material() {
                Ok(material) => {
                    let filter = FilterSpec::new(settings.layer_mask);
                    Some(FeaturePasses {
                        masked: MaskedGeometryPass::new(filter, material.clone()),
                        pixelation: PixelationPass::new(
                            material.clone(),
                            settings.effective_pyramid_depth(),
                        ),
                    })
                }
                Err(err) => {
                    log::warn!("Pixelation feature disabled: {err}");
                    None
                }
            }
        } else {
            None
        };

        Self {
            settings,
            passes,
            shared: None,
            active_this_frame: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &PixelationSettings {
        &self.settings
    }

    /// Whether the feature has passes at all.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.passes.is_some()
    }

    #[inline]
    #[must_use]
    pub fn injection_point(&self) -> InjectionPoint {
        self.settings.injection_point
    }

    /// The shared masked geometry buffer, once allocated.
    #[inline]
    #[must_use]
    pub fn shared_buffer(&self) -> Option<BufferId> {
        self.shared.map(|s| s.id)
    }

    #[must_use]
    pub fn masked_pass(&self) -> Option<&MaskedGeometryPass> {
        self.passes.as_ref().map(|p| &p.masked)
    }

    #[must_use]
    pub fn pixelation_pass(&self) -> Option<&PixelationPass> {
        self.passes.as_ref().map(|p| &p.pixelation)
    }

    /// Prepares the feature for the host's current camera.
    ///
    /// Returns whether the passes take part in this frame. When they do, the
    /// shared buffer matches the camera target and both passes are bound to it.
    pub fn setup_render_passes(&mut self, host: &mut dyn RenderHost) -> Result<bool> {
        self.active_this_frame = false;
        if self.passes.is_none() {
            return Ok(false);
        }

        let camera = host.camera_target();
        if !camera.kind.is_game() && !self.settings.enable_in_scene_view {
            return Ok(false);
        }

        let desc = camera.color_desc(Self::SHARED_BUFFER_LABEL);
        let shared = self.reallocate_if_needed(host, desc)?;

        if let Some(passes) = self.passes.as_mut() {
            passes.masked.set_target(shared);
            passes.pixelation.set_source(shared);
        }
        self.active_this_frame = true;
        Ok(true)
    }

    /// Enqueues the passes prepared by [`setup_render_passes`](Self::setup_render_passes).
    ///
    /// Returns the number of passes added.
    pub fn add_render_passes<'a>(&'a mut self, builder: &mut FrameBuilder<'a>) -> usize {
        if !self.active_this_frame {
            return 0;
        }
        let point = self.settings.injection_point;
        match self.passes.as_mut() {
            Some(passes) => {
                builder
                    .add_pass(point, &mut passes.masked)
                    .add_pass(point, &mut passes.pixelation);
                2
            }
            None => 0,
        }
    }

    /// Sets up, enqueues and runs the feature's passes for one frame.
    ///
    /// Returns the number of passes executed.
    pub fn render_frame(
        &mut self,
        host: &mut dyn RenderHost,
        environment: &mut PublishedEnvironment,
    ) -> Result<usize> {
        if !self.setup_render_passes(&mut *host)? {
            return Ok(0);
        }
        let mut builder = FrameBuilder::new();
        self.add_render_passes(&mut builder);
        builder.execute(host, environment)
    }

    /// Releases the shared buffer and unbinds both passes.
    ///
    /// Safe to call more than once.
    pub fn dispose(&mut self, host: &mut dyn RenderHost) -> Result<()> {
        if let Some(passes) = self.passes.as_mut() {
            passes.masked.release_handles();
            passes.pixelation.release_handles();
        }
        self.active_this_frame = false;
        match self.shared.take() {
            Some(shared) => host.release_buffer(shared.id),
            None => Ok(()),
        }
    }

    /// Keeps the shared buffer when the camera target is unchanged, otherwise
    /// replaces it.
    fn reallocate_if_needed(
        &mut self,
        host: &mut dyn RenderHost,
        desc: BufferDesc,
    ) -> Result<BufferId> {
        if let Some(shared) = self.shared {
            if shared.desc == desc {
                return Ok(shared.id);
            }
            self.shared = None;
            host.release_buffer(shared.id)?;
        }

        let id = host.create_buffer(&desc)?;
        log::debug!(
            "Allocated pixelation mesh buffer {}x{} ({:?})",
            desc.width,
            desc.height,
            desc.format
        );
        self.shared = Some(SharedBuffer { id, desc });
        Ok(id)
    }
}

impl Drop for PixelationFeature {
    fn drop(&mut self) {
        if let Some(shared) = self.shared {
            log::warn!(
                "PixelationFeature dropped without dispose(); shared buffer {:?} leaked",
                shared.id
            );
        }
    }
}
