//! Identifiers and a simple allocator for parameters.

use serde::{Deserialize, Serialize};

/// Handle to a parameter within its animation. Keyframe values store this as
/// their owner instead of a pointer back to the parameter.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParameterId(pub u32);

/// Monotonic allocator for ParameterId.
#[derive(Default, Debug, Clone)]
pub struct IdAllocator {
    next_parameter: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_parameter(&mut self) -> ParameterId {
        let id = ParameterId(self.next_parameter);
        self.next_parameter = self.next_parameter.wrapping_add(1);
        id
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_monotonic() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.alloc_parameter(), ParameterId(0));
        assert_eq!(alloc.alloc_parameter(), ParameterId(1));
        alloc.reset();
        assert_eq!(alloc.alloc_parameter(), ParameterId(0));
    }
}
