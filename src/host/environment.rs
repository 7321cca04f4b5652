//! Published Shader Environment
//!
//! Named values that passes publish for shaders to sample (sample spacing
//! vectors, the pixelation source buffer). The map is owned by whoever drives
//! the frame and is passed explicitly to each pass; the host receives it with
//! every material blit, which is the only point where shaders observe it.

use glam::Vec4;
use rustc_hash::FxHashMap;

use super::BufferId;

/// Global shader-visible name for the pixelation source buffer.
pub const PIXELATION_SOURCE: &str = "pixelation_source";

/// Global shader-visible name for `(1/w, 1/h, w, h)` of the coarsest pyramid level.
pub const PIXELATION_SOURCE_RESOLUTION: &str = "pixelation_source_resolution";

/// A value published under a global name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GlobalValue {
    Float(f32),
    Vector(Vec4),
    Buffer(BufferId),
}

/// Name → value map of globals visible to material blits.
#[derive(Debug, Default, Clone)]
pub struct PublishedEnvironment {
    values: FxHashMap<&'static str, GlobalValue>,
}

impl PublishedEnvironment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn set(&mut self, name: &'static str, value: GlobalValue) {
        self.values.insert(name, value);
    }

    #[inline]
    pub fn set_vector(&mut self, name: &'static str, value: Vec4) {
        self.set(name, GlobalValue::Vector(value));
    }

    #[inline]
    pub fn set_buffer(&mut self, name: &'static str, id: BufferId) {
        self.set(name, GlobalValue::Buffer(id));
    }

    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<GlobalValue> {
        self.values.get(name).copied()
    }

    #[must_use]
    pub fn vector(&self, name: &str) -> Option<Vec4> {
        match self.get(name)? {
            GlobalValue::Vector(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn buffer(&self, name: &str) -> Option<BufferId> {
        match self.get(name)? {
            GlobalValue::Buffer(id) => Some(id),
            _ => None,
        }
    }

    /// Withdraws a value; used when the referenced resource goes away.
    pub fn remove(&mut self, name: &str) -> Option<GlobalValue> {
        self.values.remove(name)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, GlobalValue)> + '_ {
        self.values.iter().map(|(name, value)| (*name, *value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_accessors_reject_other_kinds() {
        let mut env = PublishedEnvironment::new();
        env.set_vector(PIXELATION_SOURCE_RESOLUTION, Vec4::new(0.5, 0.25, 2.0, 4.0));
        env.set("strength", GlobalValue::Float(1.0));

        assert_eq!(
            env.vector(PIXELATION_SOURCE_RESOLUTION),
            Some(Vec4::new(0.5, 0.25, 2.0, 4.0))
        );
        assert_eq!(env.buffer(PIXELATION_SOURCE_RESOLUTION), None);
        assert_eq!(env.vector("strength"), None);
        assert_eq!(env.len(), 2);

        env.remove("strength");
        assert_eq!(env.get("strength"), None);
        assert_eq!(env.len(), 1);
    }
}
