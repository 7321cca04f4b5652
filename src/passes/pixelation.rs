//! Pixelation Pass
//!
//! Turns the masked geometry buffer into a blurred, low-frequency source image
//! and composites the pixelation effect onto the camera's live color buffer.
//!
//! # Algorithm
//!
//! 1. **Setup**: plan the pyramid for the camera size, acquire one bilinear
//!    temporary per level plus a full-size "downsample result" buffer and a
//!    full-size "blit scratch" buffer. Publish the coarsest level's sample
//!    spacing and the downsample result as the pixelation source.
//!
//! 2. **Downsample**: masked buffer → level 0 → level 1 → … (plain copies;
//!    the bilinear filter does the box shrink).
//!
//! 3. **Upsample**: … → level 1 → level 0.
//!
//! 4. **Composite**: level 0 (or the masked buffer when the pyramid is empty)
//!    → downsample result; camera color → blit scratch through the
//!    `PixelationToTarget` sub-pass; blit scratch → camera color.
//!
//! 5. **Cleanup**: release both full-size buffers and exactly the levels
//!    acquired in step 1, and withdraw the published source.
//!
//! # Data Flow
//!
//! ```text
//! masked ─► L0 ─► L1 ─► … ─► Ln-1
//!           ▲     │           │
//!           └─────┴─── … ◄────┘
//!           │
//!           ▼
//!   downsample result ══(published)══╗
//!                                    ▼
//! camera color ──[PixelationToTarget]──► blit scratch ──► camera color
//! ```
//!
//! The composite never writes the camera color while sampling it; the scratch
//! buffer keeps read and write on different resources.

use crate::errors::{PixelationError, Result};
use crate::graph::{PassContext, RenderPass, TransientBufferPool};
use crate::host::environment::{PIXELATION_SOURCE, PIXELATION_SOURCE_RESOLUTION};
use crate::host::{BlitMaterial, BufferDesc, BufferId, PassInputs};
use crate::material::{MaterialBinding, MaterialPass, OverrideMaterial};
use crate::pyramid::PyramidPlan;

/// Per-frame full-resolution buffers.
#[derive(Debug, Clone, Copy)]
struct FrameTargets {
    downsample_result: BufferId,
    blit_scratch: BufferId,
}

/// Pyramid blur + pixelation composite pass.
pub struct PixelationPass {
    material: OverrideMaterial,
    max_levels: u32,

    /// Masked geometry buffer, injected by the feature each frame
    source: Option<BufferId>,

    // === Per-frame state (setup → cleanup) ===
    plan: Option<PyramidPlan>,
    /// Pyramid levels, index-aligned with `plan.levels()`
    levels: TransientBufferPool,
    downsample_result: Option<BufferId>,
    blit_scratch: Option<BufferId>,
}

impl PixelationPass {
    pub const NAME: &'static str = "PixelationPass";

    #[must_use]
    pub fn new(material: OverrideMaterial, max_levels: u32) -> Self {
        Self {
            material,
            max_levels,
            source: None,
            plan: None,
            levels: TransientBufferPool::new(),
            downsample_result: None,
            blit_scratch: None,
        }
    }

    /// Binds the masked geometry buffer this pass reads from.
    pub fn set_source(&mut self, source: BufferId) {
        self.source = Some(source);
    }

    /// Forgets the shared buffer. The owner releases it.
    pub fn release_handles(&mut self) {
        self.source = None;
    }

    #[inline]
    #[must_use]
    pub fn source(&self) -> Option<BufferId> {
        self.source
    }

    #[inline]
    #[must_use]
    pub fn max_levels(&self) -> u32 {
        self.max_levels
    }

    /// Number of pyramid levels currently acquired.
    #[inline]
    #[must_use]
    pub fn real_level_count(&self) -> usize {
        self.levels.len()
    }

    /// The plan computed by the last setup, until cleanup.
    #[inline]
    #[must_use]
    pub fn plan(&self) -> Option<&PyramidPlan> {
        self.plan.as_ref()
    }

    fn bound_source(&self) -> Result<BufferId> {
        self.source.ok_or(PixelationError::UnboundResource {
            pass: Self::NAME,
            resource: "a masked geometry source buffer",
        })
    }

    fn frame_targets(&self) -> Result<FrameTargets> {
        match (self.downsample_result, self.blit_scratch) {
            (Some(downsample_result), Some(blit_scratch)) => Ok(FrameTargets {
                downsample_result,
                blit_scratch,
            }),
            _ => Err(PixelationError::UnboundResource {
                pass: Self::NAME,
                resource: "buffers from this frame's setup",
            }),
        }
    }

    fn level(&self, index: usize) -> Result<BufferId> {
        self.levels.get(index).ok_or(PixelationError::UnboundResource {
            pass: Self::NAME,
            resource: "a pyramid level from this frame's setup",
        })
    }

    /// Runs the down/up chain and returns the buffer holding the blurred image.
    fn blur_chain(&self, ctx: &mut PassContext<'_>, source: BufferId) -> Result<BufferId> {
        let count = self.levels.len();
        if count == 0 {
            return Ok(source);
        }

        ctx.host.blit(source, self.level(0)?, None)?;
        for i in 1..count {
            ctx.host.blit(self.level(i - 1)?, self.level(i)?, None)?;
        }
        for i in (1..count).rev() {
            ctx.host.blit(self.level(i)?, self.level(i - 1)?, None)?;
        }

        self.level(0)
    }
}

impl RenderPass for PixelationPass {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn required_inputs(&self) -> PassInputs {
        PassInputs::COLOR
    }

    fn setup(&mut self, ctx: &mut PassContext<'_>) -> Result<()> {
        self.bound_source()?;
        let camera = *ctx.camera;

        let plan = PyramidPlan::new(camera.width, camera.height, self.max_levels);
        for level in plan.levels() {
            let desc = BufferDesc::color(level.width, level.height, camera.format, "Pixelation Pyramid")
                .with_filter(wgpu::FilterMode::Linear);
            self.levels.allocate(&mut *ctx.host, &desc)?;
        }

        let downsample_result = ctx
            .host
            .acquire_temporary(&camera.color_desc("Pixelation Downsample Result"))?;
        self.downsample_result = Some(downsample_result);
        self.blit_scratch = Some(
            ctx.host
                .acquire_temporary(&camera.color_desc("Pixelation Blit Scratch"))?,
        );

        let coarsest = plan.coarsest();
        ctx.environment
            .set_vector(PIXELATION_SOURCE_RESOLUTION, coarsest.texel_size());
        ctx.environment
            .set_buffer(PIXELATION_SOURCE, downsample_result);

        log::debug!(
            "{}: {}x{} target, {} of {} pyramid levels, coarsest {}x{}",
            Self::NAME,
            camera.width,
            camera.height,
            plan.real_level_count(),
            self.max_levels,
            coarsest.width,
            coarsest.height,
        );
        self.plan = Some(plan);
        Ok(())
    }

    fn execute(&mut self, ctx: &mut PassContext<'_>) -> Result<()> {
        let source = self.bound_source()?;
        let targets = self.frame_targets()?;

        let blurred = self.blur_chain(ctx, source)?;
        ctx.host.blit(blurred, targets.downsample_result, None)?;

        let camera_color = ctx.camera.color;
        let composite = BlitMaterial {
            binding: MaterialBinding::new(&self.material, MaterialPass::PixelationToTarget),
            environment: ctx.environment,
        };
        ctx.host
            .blit(camera_color, targets.blit_scratch, Some(composite))?;
        ctx.host.blit(targets.blit_scratch, camera_color, None)
    }

    fn cleanup(&mut self, ctx: &mut PassContext<'_>) -> Result<()> {
        ctx.environment.remove(PIXELATION_SOURCE);
        self.plan = None;

        let mut result = Ok(());
        for id in [self.downsample_result.take(), self.blit_scratch.take()]
            .into_iter()
            .flatten()
        {
            if let Err(err) = ctx.host.release_temporary(id) {
                result = result.and(Err(err));
            }
        }

        let released = self.levels.release_all(&mut *ctx.host);
        log::trace!("{}: released {:?} pyramid levels", Self::NAME, released);
        result.and(released.map(|_| ()))
    }
}
