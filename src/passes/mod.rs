//! Render Pass Implementations
//!
//! The two passes of the pixelation feature, in execution order.

mod masked_geometry;
mod pixelation;

pub use masked_geometry::MaskedGeometryPass;
pub use pixelation::PixelationPass;
