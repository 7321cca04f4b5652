//! Buffer Pyramid Planning
//!
//! Computes the resolutions of the downsample pyramid for a render target.
//!
//! Starting from the base resolution, both dimensions are halved (integer
//! division) once per level. A level whose width or height would drop below
//! [`MIN_LEVEL_DIMENSION`] is not produced and planning stops there, so tiny
//! targets yield fewer levels than requested, possibly none.
//!
//! ```text
//! 256×256, max 3  →  128×128, 64×64, 32×32
//! 3×3,     max 5  →  (empty: the first halving gives 1×1)
//! ```

use smallvec::SmallVec;

/// Smallest width/height a pyramid level may have.
pub const MIN_LEVEL_DIMENSION: u32 = 2;

/// Width and height of a buffer in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    #[inline]
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Both dimensions halved, rounding down.
    #[inline]
    #[must_use]
    pub const fn halved(self) -> Self {
        Self::new(self.width / 2, self.height / 2)
    }

    /// `(1/w, 1/h, w, h)`, the layout shaders use for sample spacing.
    #[must_use]
    pub fn texel_size(self) -> glam::Vec4 {
        let w = self.width as f32;
        let h = self.height as f32;
        glam::Vec4::new(1.0 / w, 1.0 / h, w, h)
    }
}

impl From<(u32, u32)> for Resolution {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

/// Ordered pyramid levels for one frame, finest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PyramidPlan {
    base: Resolution,
    levels: SmallVec<[Resolution; 6]>,
}

impl PyramidPlan {
    /// Plans up to `max_levels` halvings of `base_width`×`base_height`.
    #[must_use]
    pub fn new(base_width: u32, base_height: u32, max_levels: u32) -> Self {
        let base = Resolution::new(base_width, base_height);
        let mut levels = SmallVec::new();

        let mut current = base;
        for _ in 0..max_levels {
            current = current.halved();
            if current.width < MIN_LEVEL_DIMENSION || current.height < MIN_LEVEL_DIMENSION {
                break;
            }
            levels.push(current);
        }

        Self { base, levels }
    }

    /// The resolution the plan was computed from.
    #[inline]
    #[must_use]
    pub fn base(&self) -> Resolution {
        self.base
    }

    #[inline]
    #[must_use]
    pub fn levels(&self) -> &[Resolution] {
        &self.levels
    }

    /// Number of levels that are actually allocated.
    #[inline]
    #[must_use]
    pub fn real_level_count(&self) -> usize {
        self.levels.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// The coarsest resolution in use: the last level, or the base when the
    /// plan is empty.
    #[must_use]
    pub fn coarsest(&self) -> Resolution {
        self.levels.last().copied().unwrap_or(self.base)
    }
}

/// Stateless planner front-end.
pub struct BufferPyramidPlanner;

impl BufferPyramidPlanner {
    /// Ordered list of halved resolutions, finest first.
    #[must_use]
    pub fn plan(base_width: u32, base_height: u32, max_levels: u32) -> Vec<Resolution> {
        PyramidPlan::new(base_width, base_height, max_levels)
            .levels()
            .to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_levels_requested() {
        assert!(PyramidPlan::new(1920, 1080, 0).is_empty());
        assert_eq!(PyramidPlan::new(1920, 1080, 0).coarsest(), Resolution::new(1920, 1080));
    }

    #[test]
    fn stops_at_dimension_floor() {
        // 10×4 → 5×2 → (2×1 rejected)
        let plan = PyramidPlan::new(10, 4, 5);
        assert_eq!(plan.levels(), &[Resolution::new(5, 2)]);
        assert_eq!(plan.coarsest(), Resolution::new(5, 2));
    }

    #[test]
    fn texel_size_layout() {
        let v = Resolution::new(4, 2).texel_size();
        assert_eq!(v, glam::Vec4::new(0.25, 0.5, 4.0, 2.0));
    }
}
