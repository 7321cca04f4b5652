//! Frame Builder
//!
//! `FrameBuilder` collects the passes enqueued for one frame, orders them by
//! [`InjectionPoint`], and drives each through its three phases.
//!
//! # Execution Model
//!
//! ```text
//! for pass in sorted(passes):        // (point, insertion order)
//!     push_debug_group(pass.name)
//!     setup → execute                // execute skipped if setup failed
//!     cleanup                        // always
//!     pop_debug_group
//! ```
//!
//! A pass error aborts the rest of the frame after that pass has cleaned up.
//! Nothing carries over to the next frame, which starts from scratch.

use smallvec::SmallVec;

use super::context::PassContext;
use super::node::RenderPass;
use super::stage::InjectionPoint;
use crate::errors::Result;
use crate::host::{PassInputs, PublishedEnvironment, RenderHost};

/// A pass reference with its injection point.
struct PassEntry<'a> {
    point: InjectionPoint,
    /// Insertion order within the frame (stable sort key)
    order: u16,
    pass: &'a mut dyn RenderPass,
}

/// Frame builder.
///
/// Does not own passes; they are borrowed for the frame and stay with their
/// owner (usually a feature) between frames.
pub struct FrameBuilder<'a> {
    passes: SmallVec<[PassEntry<'a>; 8]>,
    next_order: u16,
}

impl Default for FrameBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> FrameBuilder<'a> {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            passes: SmallVec::new(),
            next_order: 0,
        }
    }

    /// Enqueues a pass at `point`.
    ///
    /// Passes at the same point execute in the order they were added.
    #[inline]
    pub fn add_pass(&mut self, point: InjectionPoint, pass: &'a mut dyn RenderPass) -> &mut Self {
        self.passes.push(PassEntry {
            point,
            order: self.next_order,
            pass,
        });
        self.next_order = self.next_order.wrapping_add(1);
        self
    }

    #[inline]
    #[must_use]
    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    /// Checks whether any pass is enqueued at `point`.
    #[inline]
    #[must_use]
    pub fn has_point(&self, point: InjectionPoint) -> bool {
        self.passes.iter().any(|e| e.point == point)
    }

    /// Pass names in execution order.
    #[must_use]
    pub fn pass_names(&self) -> Vec<&'static str> {
        let mut entries: Vec<(u8, u16, &'static str)> = self
            .passes
            .iter()
            .map(|e| (e.point.order(), e.order, e.pass.name()))
            .collect();
        entries.sort_unstable_by_key(|&(point, order, _)| (point, order));
        entries.into_iter().map(|(_, _, name)| name).collect()
    }

    /// Runs every enqueued pass against `host`.
    ///
    /// Returns the number of passes that completed all three phases.
    pub fn execute(
        mut self,
        host: &mut dyn RenderHost,
        environment: &mut PublishedEnvironment,
    ) -> Result<usize> {
        self.passes
            .sort_unstable_by_key(|e| (e.point.order(), e.order));

        let camera = host.camera_target();

        let inputs = self
            .passes
            .iter()
            .fold(PassInputs::empty(), |acc, e| acc | e.pass.required_inputs());
        if !inputs.is_empty() {
            host.configure_inputs(inputs);
        }

        let mut completed = 0;
        for entry in &mut self.passes {
            let name = entry.pass.name();
            host.push_debug_group(name);

            let mut ctx = PassContext::new(&mut *host, &camera, &mut *environment);
            let result = entry
                .pass
                .setup(&mut ctx)
                .and_then(|()| entry.pass.execute(&mut ctx));
            let cleanup = entry.pass.cleanup(&mut ctx);

            host.pop_debug_group();

            if let Err(err) = result.and(cleanup) {
                log::error!(
                    "Pass '{name}' at {} failed, aborting frame: {err}",
                    entry.point.name()
                );
                return Err(err);
            }
            completed += 1;
        }

        Ok(completed)
    }
}
