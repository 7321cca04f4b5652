//! Render Pass Trait
//!
//! Defines the phase interface the frame driver invokes on every enqueued pass.

use super::context::PassContext;
use crate::errors::Result;
use crate::host::PassInputs;

/// A pass of the host render pipeline.
///
/// The driver calls, once per rendered frame and for each pass in insertion
/// order: [`setup`](Self::setup), [`execute`](Self::execute),
/// [`cleanup`](Self::cleanup). `cleanup` runs even if `setup` or `execute`
/// failed, so it must release exactly what `setup` managed to acquire.
pub trait RenderPass {
    /// Returns the pass name, used for debug groups and logs.
    fn name(&self) -> &'static str;

    /// Camera resources this pass samples.
    fn required_inputs(&self) -> PassInputs {
        PassInputs::empty()
    }

    /// Acquire per-frame resources and configure render targets.
    fn setup(&mut self, _ctx: &mut PassContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Record rendering commands.
    fn execute(&mut self, ctx: &mut PassContext<'_>) -> Result<()>;

    /// Release per-frame resources.
    fn cleanup(&mut self, _ctx: &mut PassContext<'_>) -> Result<()> {
        Ok(())
    }
}
