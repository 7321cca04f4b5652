//! Error Types
//!
//! This module defines the error types used by the pixelation feature.
//!
//! # Overview
//!
//! The main error type [`PixelationError`] covers:
//! - Configuration errors (missing override material, missing sub-passes)
//! - Resource lifecycle errors reported by the host (unknown buffers,
//!   double releases, reads of never-written buffers)
//! - Phase ordering errors (a pass executed without its bound resources)
//!
//! Configuration errors never escape [`PixelationFeature::new`]: they turn the
//! feature inert and are logged instead.
//!
//! [`PixelationFeature::new`]: crate::feature::PixelationFeature::new

use thiserror::Error;

use crate::host::BufferId;

/// The main error type for the pixelation feature.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PixelationError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// No override material is assigned in the settings.
    #[error("Override material is not assigned")]
    MissingMaterial,

    /// The override material does not expose a required sub-pass.
    #[error("Material '{material}' has {available} sub-passes, but {role} needs sub-pass {index}")]
    InvalidSubPass {
        /// Material name
        material: String,
        /// What the sub-pass is used for
        role: &'static str,
        /// The required sub-pass index
        index: u32,
        /// Number of sub-passes the material actually has
        available: u32,
    },

    // ========================================================================
    // Resource Lifecycle Errors
    // ========================================================================
    /// The buffer id does not refer to a live buffer.
    #[error("Unknown or already released buffer: {0:?}")]
    UnknownBuffer(BufferId),

    /// A buffer was requested with a zero dimension.
    #[error("Invalid buffer size: {width}x{height}")]
    InvalidBufferSize {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },

    /// A buffer was released through the wrong lifetime channel
    /// (temporary vs. persistent).
    #[error("Buffer {id:?} is not a {expected} buffer")]
    LifetimeMismatch {
        /// The offending buffer
        id: BufferId,
        /// The lifetime the caller assumed
        expected: &'static str,
    },

    /// The camera's own color/depth buffers belong to the host.
    #[error("Camera buffer {0:?} is owned by the host and cannot be released")]
    CameraBufferRelease(BufferId),

    /// A buffer was sampled before anything was written to it.
    #[error("Buffer {0:?} was read before it was written")]
    UninitializedRead(BufferId),

    // ========================================================================
    // Render Target Errors
    // ========================================================================
    /// A draw or clear was issued with no render target bound.
    #[error("No render target is bound")]
    NoRenderTarget,

    /// Color and depth attachments differ in size.
    #[error("Attachment size mismatch: color {color:?}, depth {depth:?}")]
    AttachmentMismatch {
        /// Color attachment size
        color: (u32, u32),
        /// Depth attachment size
        depth: (u32, u32),
    },

    // ========================================================================
    // Phase Errors
    // ========================================================================
    /// A pass phase ran without a resource that an earlier phase provides.
    #[error("Pass '{pass}' ran without {resource}")]
    UnboundResource {
        /// Pass name
        pass: &'static str,
        /// Missing resource description
        resource: &'static str,
    },
}

/// Alias for `Result<T, PixelationError>`.
pub type Result<T> = std::result::Result<T, PixelationError>;
