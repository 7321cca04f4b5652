//! Render pipeline organisation
//!
//! Provides:
//! - InjectionPoint: ordered points at which passes are inserted
//! - RenderPass: three-phase pass interface
//! - PassContext: per-phase access to host, camera and environment
//! - TransientBufferPool: per-frame temporary buffer arena
//! - FrameBuilder: orders and drives the passes of one frame

pub mod builder;
pub mod context;
pub mod node;
pub mod stage;
pub mod transient_pool;

pub use builder::FrameBuilder;
pub use context::PassContext;
pub use node::RenderPass;
pub use stage::InjectionPoint;
pub use transient_pool::TransientBufferPool;
