#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! Masked-geometry pixelation for the Myth render pipeline.
//!
//! The feature renders a filtered subset of the scene into an offscreen
//! buffer, blurs it through a halving pyramid, and composites a pixelation
//! pass back onto the camera's color buffer.
//!
//! ```rust,ignore
//! use myth_pixelation::{HeadlessHost, OverrideMaterial, PixelationFeature,
//!     PixelationSettings, PublishedEnvironment};
//!
//! let mut host = HeadlessHost::new(1280, 720);
//! let mut env = PublishedEnvironment::new();
//! let mut feature = PixelationFeature::new(PixelationSettings {
//!     material: Some(OverrideMaterial::pixelation(1, "Pixelation")),
//!     ..Default::default()
//! });
//!
//! host.begin_frame();
//! feature.render_frame(&mut host, &mut env)?;
//! feature.dispose(&mut host)?;
//! ```

pub mod errors;
pub mod feature;
pub mod filter;
pub mod graph;
pub mod host;
pub mod material;
pub mod passes;
pub mod pyramid;
pub mod settings;

pub use errors::{PixelationError, Result};
pub use feature::PixelationFeature;
pub use filter::{FilterSpec, LayerMask, ShaderTag};
pub use graph::{FrameBuilder, InjectionPoint, PassContext, RenderPass, TransientBufferPool};
pub use host::{
    BufferDesc, BufferId, CameraKind, CameraTarget, GlobalValue, HeadlessHost, HostCommand,
    PublishedEnvironment, RenderHost, SceneObject,
};
pub use material::{MaterialPass, OverrideMaterial};
pub use passes::{MaskedGeometryPass, PixelationPass};
pub use pyramid::{BufferPyramidPlanner, PyramidPlan, Resolution};
pub use settings::PixelationSettings;
