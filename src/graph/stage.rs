//! Injection Point Definitions
//!
//! `InjectionPoint` names the fixed, ordered set of points of the host render
//! pipeline at which feature passes can be inserted.

use serde::{Deserialize, Serialize};

/// Pipeline injection point.
///
/// Passes enqueued at an earlier point run before passes at a later point;
/// passes at the same point run in insertion order.
///
/// | Point | Runs |
/// |-------|------|
/// | `BeforeRendering` | before anything is drawn for the camera |
/// | `BeforeRenderingShadows` / `AfterRenderingShadows` | around shadow maps |
/// | `BeforeRenderingPrePasses` / `AfterRenderingPrePasses` | around depth/normal pre-passes |
/// | `BeforeRenderingOpaques` / `AfterRenderingOpaques` | around opaque geometry |
/// | `BeforeRenderingSkybox` / `AfterRenderingSkybox` | around the skybox |
/// | `BeforeRenderingTransparents` / `AfterRenderingTransparents` | around blended geometry |
/// | `BeforeRenderingPostProcessing` / `AfterRenderingPostProcessing` | around the post stack |
/// | `AfterRendering` | after everything else |
#[derive(
    Debug, Hash, PartialEq, Eq, Clone, Copy, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum InjectionPoint {
    BeforeRendering = 0,
    BeforeRenderingShadows = 1,
    AfterRenderingShadows = 2,
    BeforeRenderingPrePasses = 3,
    AfterRenderingPrePasses = 4,
    BeforeRenderingOpaques = 5,
    AfterRenderingOpaques = 6,
    BeforeRenderingSkybox = 7,
    AfterRenderingSkybox = 8,
    BeforeRenderingTransparents = 9,
    AfterRenderingTransparents = 10,
    BeforeRenderingPostProcessing = 11,
    AfterRenderingPostProcessing = 12,
    #[default]
    AfterRendering = 13,
}

impl InjectionPoint {
    /// Returns the numeric index of the point (used for sorting).
    #[inline]
    #[must_use]
    pub const fn order(self) -> u8 {
        self as u8
    }

    /// Point name (for debugging).
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BeforeRendering => "BeforeRendering",
            Self::BeforeRenderingShadows => "BeforeRenderingShadows",
            Self::AfterRenderingShadows => "AfterRenderingShadows",
            Self::BeforeRenderingPrePasses => "BeforeRenderingPrePasses",
            Self::AfterRenderingPrePasses => "AfterRenderingPrePasses",
            Self::BeforeRenderingOpaques => "BeforeRenderingOpaques",
            Self::AfterRenderingOpaques => "AfterRenderingOpaques",
            Self::BeforeRenderingSkybox => "BeforeRenderingSkybox",
            Self::AfterRenderingSkybox => "AfterRenderingSkybox",
            Self::BeforeRenderingTransparents => "BeforeRenderingTransparents",
            Self::AfterRenderingTransparents => "AfterRenderingTransparents",
            Self::BeforeRenderingPostProcessing => "BeforeRenderingPostProcessing",
            Self::AfterRenderingPostProcessing => "AfterRenderingPostProcessing",
            Self::AfterRendering => "AfterRendering",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_injection_point_ordering() {
        assert!(InjectionPoint::BeforeRendering < InjectionPoint::AfterRenderingShadows);
        assert!(InjectionPoint::AfterRenderingOpaques < InjectionPoint::BeforeRenderingSkybox);
        assert!(
            InjectionPoint::AfterRenderingTransparents
                < InjectionPoint::BeforeRenderingPostProcessing
        );
        assert!(InjectionPoint::AfterRenderingPostProcessing < InjectionPoint::AfterRendering);
        assert_eq!(InjectionPoint::default(), InjectionPoint::AfterRendering);
    }
}
