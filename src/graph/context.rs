//! Pass Context
//!
//! [`PassContext`] bundles what a pass may touch during one phase: the host's
//! render capabilities, the camera target snapshot taken at the start of the
//! frame, and the published shader environment.

use crate::host::{CameraTarget, PublishedEnvironment, RenderHost};

/// Per-phase context handed to [`RenderPass`](super::RenderPass) methods.
pub struct PassContext<'a> {
    /// Host render capabilities
    pub host: &'a mut dyn RenderHost,
    /// Active camera target for this frame
    pub camera: &'a CameraTarget,
    /// Globals visible to material blits
    pub environment: &'a mut PublishedEnvironment,
}

impl<'a> PassContext<'a> {
    pub fn new(
        host: &'a mut dyn RenderHost,
        camera: &'a CameraTarget,
        environment: &'a mut PublishedEnvironment,
    ) -> Self {
        Self {
            host,
            camera,
            environment,
        }
    }
}
