//! Headless Render Host
//!
//! An in-memory [`RenderHost`] that performs no GPU work. It keeps a record of
//! every buffer, validates each command against the lifecycle rules a real
//! backend enforces, and logs the accepted commands so callers can inspect the
//! exact sequence a frame produced.
//!
//! # Validation
//!
//! - Releasing an unknown or already released buffer fails.
//! - Temporary and persistent buffers must be released through their own
//!   channel; camera buffers cannot be released at all.
//! - Temporary buffers start with undefined content: sampling one before it
//!   was written fails with [`PixelationError::UninitializedRead`].
//! - Material blits check the sub-pass index and every buffer published in the
//!   environment they receive.
//! - Color and depth attachments must have matching sizes.

use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use super::{
    BlitMaterial, BufferDesc, BufferId, CameraKind, CameraTarget, ClearFlags, DEFAULT_COLOR_FORMAT,
    DrawRenderersDesc, GlobalValue, PassInputs, RenderHost,
};
use crate::errors::{PixelationError, Result};
use crate::filter::ShaderTag;
use crate::material::MaterialBinding;

/// A drawable object registered with the headless scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub name: String,
    pub layer: u8,
    pub shader_tag: ShaderTag,
    /// View-space depth used for sorting.
    pub depth: f32,
}

impl SceneObject {
    #[must_use]
    pub fn new(name: impl Into<String>, layer: u8, shader_tag: ShaderTag, depth: f32) -> Self {
        Self {
            name: name.into(),
            layer,
            shader_tag,
            depth,
        }
    }
}

/// A command accepted by the headless host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    CreateBuffer {
        id: BufferId,
        width: u32,
        height: u32,
    },
    ReleaseBuffer {
        id: BufferId,
    },
    AcquireTemporary {
        id: BufferId,
        width: u32,
        height: u32,
        filter: wgpu::FilterMode,
    },
    ReleaseTemporary {
        id: BufferId,
    },
    SetRenderTarget {
        color: BufferId,
        depth: Option<BufferId>,
    },
    Clear {
        target: BufferId,
        flags: ClearFlags,
    },
    DrawRenderers {
        target: BufferId,
        pass: u32,
        objects: Vec<String>,
    },
    Blit {
        source: BufferId,
        destination: BufferId,
        pass: Option<u32>,
    },
    ConfigureInputs(PassInputs),
    PushDebugGroup(String),
    PopDebugGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifetime {
    Camera,
    Persistent,
    Temporary,
}

#[derive(Debug)]
struct BufferRecord {
    desc: BufferDesc,
    lifetime: Lifetime,
    /// Whether anything has been written since allocation.
    initialized: bool,
}

/// Recording, validating render host without a GPU.
pub struct HeadlessHost {
    buffers: SlotMap<BufferId, BufferRecord>,
    camera: CameraTarget,
    objects: Vec<SceneObject>,
    commands: Vec<HostCommand>,
    /// Writes per buffer since the last [`begin_frame`](Self::begin_frame).
    writes: FxHashMap<BufferId, u32>,
    bound_target: Option<BufferId>,
    frame: u64,
}

impl HeadlessHost {
    /// Creates a host whose game camera renders at `width`×`height`.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let mut buffers: SlotMap<BufferId, BufferRecord> = SlotMap::with_key();
        let color = buffers.insert(BufferRecord {
            desc: BufferDesc::color(width, height, DEFAULT_COLOR_FORMAT, "Camera Color"),
            lifetime: Lifetime::Camera,
            initialized: true,
        });
        let depth = buffers.insert(BufferRecord {
            desc: BufferDesc {
                depth: true,
                ..BufferDesc::color(width, height, wgpu::TextureFormat::Depth32Float, "Camera Depth")
            },
            lifetime: Lifetime::Camera,
            initialized: true,
        });

        Self {
            buffers,
            camera: CameraTarget {
                width,
                height,
                format: DEFAULT_COLOR_FORMAT,
                color,
                depth,
                kind: CameraKind::Game,
            },
            objects: Vec::new(),
            commands: Vec::new(),
            writes: FxHashMap::default(),
            bound_target: None,
            frame: 0,
        }
    }

    #[must_use]
    pub fn with_camera_kind(mut self, kind: CameraKind) -> Self {
        self.camera.kind = kind;
        self
    }

    pub fn set_camera_kind(&mut self, kind: CameraKind) {
        self.camera.kind = kind;
    }

    /// Resizes the camera target. Camera buffer ids stay stable.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.width = width;
        self.camera.height = height;
        for id in [self.camera.color, self.camera.depth] {
            if let Some(record) = self.buffers.get_mut(id) {
                record.desc.width = width;
                record.desc.height = height;
            }
        }
    }

    pub fn add_object(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    /// Starts a new frame: the camera color holds freshly rendered scene content
    /// and per-frame write counters are reset.
    pub fn begin_frame(&mut self) {
        self.frame += 1;
        self.writes.clear();
        self.bound_target = None;
        if let Some(record) = self.buffers.get_mut(self.camera.color) {
            record.initialized = true;
        }
    }

    #[inline]
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    #[inline]
    #[must_use]
    pub fn commands(&self) -> &[HostCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<HostCommand> {
        std::mem::take(&mut self.commands)
    }

    #[must_use]
    pub fn is_live(&self, id: BufferId) -> bool {
        self.buffers.contains_key(id)
    }

    #[must_use]
    pub fn buffer_size(&self, id: BufferId) -> Option<(u32, u32)> {
        self.buffers.get(id).map(|r| r.desc.size())
    }

    #[must_use]
    pub fn buffer_desc(&self, id: BufferId) -> Option<BufferDesc> {
        self.buffers.get(id).map(|r| r.desc)
    }

    /// Number of live temporary buffers.
    #[must_use]
    pub fn temporary_count(&self) -> usize {
        self.count(Lifetime::Temporary)
    }

    /// Number of live persistent buffers (camera buffers excluded).
    #[must_use]
    pub fn persistent_count(&self) -> usize {
        self.count(Lifetime::Persistent)
    }

    /// Number of writes into `id` during the current frame.
    #[must_use]
    pub fn writes(&self, id: BufferId) -> u32 {
        self.writes.get(&id).copied().unwrap_or(0)
    }

    fn count(&self, lifetime: Lifetime) -> usize {
        self.buffers.values().filter(|r| r.lifetime == lifetime).count()
    }

    fn allocate(&mut self, desc: &BufferDesc, lifetime: Lifetime) -> Result<BufferId> {
        if desc.width == 0 || desc.height == 0 {
            return Err(PixelationError::InvalidBufferSize {
                width: desc.width,
                height: desc.height,
            });
        }
        Ok(self.buffers.insert(BufferRecord {
            desc: *desc,
            lifetime,
            initialized: false,
        }))
    }

    fn release(&mut self, id: BufferId, lifetime: Lifetime) -> Result<()> {
        let record = self
            .buffers
            .get(id)
            .ok_or(PixelationError::UnknownBuffer(id))?;
        match record.lifetime {
            Lifetime::Camera => return Err(PixelationError::CameraBufferRelease(id)),
            actual if actual != lifetime => {
                return Err(PixelationError::LifetimeMismatch {
                    id,
                    expected: match lifetime {
                        Lifetime::Temporary => "temporary",
                        _ => "persistent",
                    },
                });
            }
            _ => {}
        }
        self.buffers.remove(id);
        self.writes.remove(&id);
        if self.bound_target == Some(id) {
            self.bound_target = None;
        }
        Ok(())
    }

    fn readable(&self, id: BufferId) -> Result<()> {
        let record = self
            .buffers
            .get(id)
            .ok_or(PixelationError::UnknownBuffer(id))?;
        if record.initialized {
            Ok(())
        } else {
            Err(PixelationError::UninitializedRead(id))
        }
    }

    fn mark_written(&mut self, id: BufferId) -> Result<()> {
        let record = self
            .buffers
            .get_mut(id)
            .ok_or(PixelationError::UnknownBuffer(id))?;
        record.initialized = true;
        *self.writes.entry(id).or_insert(0) += 1;
        Ok(())
    }

    fn check_material(binding: MaterialBinding<'_>) -> Result<()> {
        let material = binding.material;
        if binding.pass < material.pass_count() {
            Ok(())
        } else {
            Err(PixelationError::InvalidSubPass {
                material: material.name.clone(),
                role: "blit",
                index: binding.pass,
                available: material.pass_count(),
            })
        }
    }
}

impl RenderHost for HeadlessHost {
    fn camera_target(&self) -> CameraTarget {
        self.camera
    }

    fn create_buffer(&mut self, desc: &BufferDesc) -> Result<BufferId> {
        let id = self.allocate(desc, Lifetime::Persistent)?;
        self.commands.push(HostCommand::CreateBuffer {
            id,
            width: desc.width,
            height: desc.height,
        });
        Ok(id)
    }

    fn release_buffer(&mut self, id: BufferId) -> Result<()> {
        self.release(id, Lifetime::Persistent)?;
        self.commands.push(HostCommand::ReleaseBuffer { id });
        Ok(())
    }

    fn acquire_temporary(&mut self, desc: &BufferDesc) -> Result<BufferId> {
        let id = self.allocate(desc, Lifetime::Temporary)?;
        self.commands.push(HostCommand::AcquireTemporary {
            id,
            width: desc.width,
            height: desc.height,
            filter: desc.filter,
        });
        Ok(id)
    }

    fn release_temporary(&mut self, id: BufferId) -> Result<()> {
        self.release(id, Lifetime::Temporary)?;
        self.commands.push(HostCommand::ReleaseTemporary { id });
        Ok(())
    }

    fn set_render_target(&mut self, color: BufferId, depth: Option<BufferId>) -> Result<()> {
        let color_size = self
            .buffer_size(color)
            .ok_or(PixelationError::UnknownBuffer(color))?;
        if let Some(depth) = depth {
            let depth_size = self
                .buffer_size(depth)
                .ok_or(PixelationError::UnknownBuffer(depth))?;
            if depth_size != color_size {
                return Err(PixelationError::AttachmentMismatch {
                    color: color_size,
                    depth: depth_size,
                });
            }
        }
        self.bound_target = Some(color);
        self.commands
            .push(HostCommand::SetRenderTarget { color, depth });
        Ok(())
    }

    fn clear(&mut self, flags: ClearFlags, _color: wgpu::Color) -> Result<()> {
        let target = self.bound_target.ok_or(PixelationError::NoRenderTarget)?;
        if flags.contains(ClearFlags::COLOR) {
            self.mark_written(target)?;
        }
        self.commands.push(HostCommand::Clear { target, flags });
        Ok(())
    }

    fn draw_renderers(&mut self, desc: &DrawRenderersDesc<'_>) -> Result<usize> {
        let target = self.bound_target.ok_or(PixelationError::NoRenderTarget)?;
        Self::check_material(desc.override_material)?;

        let mut visible: Vec<&SceneObject> = self
            .objects
            .iter()
            .filter(|o| desc.filter.matches(o.layer, o.shader_tag))
            .collect();
        visible.sort_by(|a, b| desc.sorting.compare(a.depth, b.depth));
        let objects: Vec<String> = visible.iter().map(|o| o.name.clone()).collect();
        let drawn = objects.len();

        self.mark_written(target)?;
        self.commands.push(HostCommand::DrawRenderers {
            target,
            pass: desc.override_material.pass,
            objects,
        });
        Ok(drawn)
    }

    fn blit(
        &mut self,
        source: BufferId,
        destination: BufferId,
        material: Option<BlitMaterial<'_>>,
    ) -> Result<()> {
        self.readable(source)?;
        if !self.is_live(destination) {
            return Err(PixelationError::UnknownBuffer(destination));
        }
        if let Some(material) = material {
            Self::check_material(material.binding)?;
            for (_, value) in material.environment.iter() {
                if let GlobalValue::Buffer(id) = value {
                    self.readable(id)?;
                }
            }
        }

        self.mark_written(destination)?;
        self.commands.push(HostCommand::Blit {
            source,
            destination,
            pass: material.map(|m| m.binding.pass),
        });
        Ok(())
    }

    fn configure_inputs(&mut self, inputs: PassInputs) {
        self.commands.push(HostCommand::ConfigureInputs(inputs));
    }

    fn push_debug_group(&mut self, label: &str) {
        self.commands
            .push(HostCommand::PushDebugGroup(label.to_owned()));
    }

    fn pop_debug_group(&mut self) {
        self.commands.push(HostCommand::PopDebugGroup);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_release_is_rejected() {
        let mut host = HeadlessHost::new(64, 64);
        let id = host
            .acquire_temporary(&BufferDesc::color(32, 32, DEFAULT_COLOR_FORMAT, "tmp"))
            .unwrap();

        host.release_temporary(id).unwrap();
        assert_eq!(
            host.release_temporary(id),
            Err(PixelationError::UnknownBuffer(id))
        );
    }

    #[test]
    fn release_channel_must_match_lifetime() {
        let mut host = HeadlessHost::new(64, 64);
        let id = host
            .create_buffer(&BufferDesc::color(64, 64, DEFAULT_COLOR_FORMAT, "persistent"))
            .unwrap();

        assert!(matches!(
            host.release_temporary(id),
            Err(PixelationError::LifetimeMismatch { .. })
        ));
        let camera = host.camera_target();
        assert_eq!(
            host.release_buffer(camera.color),
            Err(PixelationError::CameraBufferRelease(camera.color))
        );
        host.release_buffer(id).unwrap();
        assert_eq!(host.persistent_count(), 0);
    }

    #[test]
    fn fresh_temporaries_cannot_be_sampled() {
        let mut host = HeadlessHost::new(64, 64);
        let desc = BufferDesc::color(64, 64, DEFAULT_COLOR_FORMAT, "tmp");
        let a = host.acquire_temporary(&desc).unwrap();
        let b = host.acquire_temporary(&desc).unwrap();

        assert_eq!(host.blit(a, b, None), Err(PixelationError::UninitializedRead(a)));

        let camera = host.camera_target().color;
        host.blit(camera, a, None).unwrap();
        host.blit(a, b, None).unwrap();
        assert_eq!(host.writes(b), 1);
    }

    #[test]
    fn zero_sized_buffers_are_rejected() {
        let mut host = HeadlessHost::new(64, 64);
        assert_eq!(
            host.acquire_temporary(&BufferDesc::color(0, 1, DEFAULT_COLOR_FORMAT, "tmp")),
            Err(PixelationError::InvalidBufferSize {
                width: 0,
                height: 1
            })
        );
    }
}
