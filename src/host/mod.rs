//! Host Render Capabilities
//!
//! The pixelation feature never touches a graphics device directly. Everything
//! it needs from the surrounding renderer is expressed by the [`RenderHost`]
//! trait:
//!
//! | Capability | Methods |
//! |------------|---------|
//! | Persistent offscreen buffers | [`create_buffer`](RenderHost::create_buffer), [`release_buffer`](RenderHost::release_buffer) |
//! | Per-frame temporary buffers | [`acquire_temporary`](RenderHost::acquire_temporary), [`release_temporary`](RenderHost::release_temporary) |
//! | Copy / material blit | [`blit`](RenderHost::blit) |
//! | Filtered scene draw | [`set_render_target`](RenderHost::set_render_target), [`clear`](RenderHost::clear), [`draw_renderers`](RenderHost::draw_renderers) |
//! | Camera query | [`camera_target`](RenderHost::camera_target) |
//!
//! Shader-visible globals are not a host capability: passes write them into a
//! [`PublishedEnvironment`] which is handed to the host together with every
//! material blit.
//!
//! [`HeadlessHost`] is a complete in-memory implementation that records every
//! command; it backs the test-suite.

pub mod environment;
pub mod headless;

pub use environment::{GlobalValue, PublishedEnvironment};
pub use headless::{HeadlessHost, HostCommand, SceneObject};

use std::cmp::Ordering;

use bitflags::bitflags;

use crate::errors::Result;
use crate::filter::FilterSpec;
use crate::material::MaterialBinding;

slotmap::new_key_type! {
    /// Stable logical identifier of a host-side offscreen buffer.
    pub struct BufferId;
}

/// Format used for every offscreen color buffer of the feature when the
/// camera does not dictate one.
pub const DEFAULT_COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Descriptor for a 2D color buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferDesc {
    pub width: u32,
    pub height: u32,
    pub format: wgpu::TextureFormat,
    pub filter: wgpu::FilterMode,
    /// Whether a depth attachment is allocated alongside the color image.
    pub depth: bool,
    pub label: &'static str,
}

impl BufferDesc {
    /// Color-only, point-filtered buffer.
    #[must_use]
    pub const fn color(
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        label: &'static str,
    ) -> Self {
        Self {
            width,
            height,
            format,
            filter: wgpu::FilterMode::Nearest,
            depth: false,
            label,
        }
    }

    #[must_use]
    pub const fn with_filter(mut self, filter: wgpu::FilterMode) -> Self {
        self.filter = filter;
        self
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Kind of view the camera renders for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CameraKind {
    /// In-game camera.
    #[default]
    Game,
    /// Editor scene view.
    SceneView,
    /// Asset / material preview.
    Preview,
}

impl CameraKind {
    #[inline]
    #[must_use]
    pub const fn is_game(self) -> bool {
        matches!(self, Self::Game)
    }
}

/// The active camera's render target as seen by the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraTarget {
    pub width: u32,
    pub height: u32,
    pub format: wgpu::TextureFormat,
    /// Live color buffer (read by the composite, overwritten by the final copy).
    pub color: BufferId,
    /// Camera depth buffer.
    pub depth: BufferId,
    pub kind: CameraKind,
}

impl CameraTarget {
    /// Descriptor of a color-only buffer matching the camera target.
    #[must_use]
    pub const fn color_desc(&self, label: &'static str) -> BufferDesc {
        BufferDesc::color(self.width, self.height, self.format, label)
    }
}

bitflags! {
    /// Which attachments of the bound render target a clear affects.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearFlags: u8 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
        const STENCIL = 1 << 2;
    }
}

bitflags! {
    /// Camera resources a pass samples and the host must make available.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PassInputs: u8 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
        const NORMAL = 1 << 2;
        const MOTION = 1 << 3;
    }
}

/// Draw ordering for filtered scene draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortingCriteria {
    /// Front-to-back, for opaque geometry.
    #[default]
    CommonOpaque,
    /// Back-to-front, for blended geometry.
    CommonTransparent,
}

impl SortingCriteria {
    /// Compares two view-space depths under this ordering.
    #[must_use]
    pub fn compare(self, a: f32, b: f32) -> Ordering {
        match self {
            Self::CommonOpaque => a.total_cmp(&b),
            Self::CommonTransparent => b.total_cmp(&a),
        }
    }
}

/// A filtered scene draw using an override material.
#[derive(Debug, Clone, Copy)]
pub struct DrawRenderersDesc<'a> {
    pub filter: &'a FilterSpec,
    pub sorting: SortingCriteria,
    pub override_material: MaterialBinding<'a>,
}

/// Material sub-pass applied during a blit, with the globals it may sample.
#[derive(Debug, Clone, Copy)]
pub struct BlitMaterial<'a> {
    pub binding: MaterialBinding<'a>,
    pub environment: &'a PublishedEnvironment,
}

/// Rendering capabilities the feature consumes from the host pipeline.
///
/// All methods are invoked on the graphics submission thread, in the order the
/// frame driver runs the passes. Commands are assumed to execute in submission
/// order on a single queue.
pub trait RenderHost {
    /// The active camera's target for the current frame.
    fn camera_target(&self) -> CameraTarget;

    /// Allocates a buffer that lives until [`release_buffer`](Self::release_buffer).
    fn create_buffer(&mut self, desc: &BufferDesc) -> Result<BufferId>;

    fn release_buffer(&mut self, id: BufferId) -> Result<()>;

    /// Allocates a buffer scoped to the current frame.
    fn acquire_temporary(&mut self, desc: &BufferDesc) -> Result<BufferId>;

    fn release_temporary(&mut self, id: BufferId) -> Result<()>;

    /// Binds `color` (and optionally `depth`) as the active render target.
    fn set_render_target(&mut self, color: BufferId, depth: Option<BufferId>) -> Result<()>;

    /// Clears the bound render target.
    fn clear(&mut self, flags: ClearFlags, color: wgpu::Color) -> Result<()>;

    /// Draws visible objects accepted by `desc.filter` into the bound target.
    ///
    /// Returns the number of objects drawn.
    fn draw_renderers(&mut self, desc: &DrawRenderersDesc<'_>) -> Result<usize>;

    /// Copies `source` into `destination`, optionally through a material sub-pass.
    fn blit(
        &mut self,
        source: BufferId,
        destination: BufferId,
        material: Option<BlitMaterial<'_>>,
    ) -> Result<()>;

    /// Declares the camera resources the enqueued passes sample.
    fn configure_inputs(&mut self, _inputs: PassInputs) {}

    fn push_debug_group(&mut self, _label: &str) {}

    fn pop_debug_group(&mut self) {}
}
