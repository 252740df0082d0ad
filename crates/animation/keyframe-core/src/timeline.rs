//! Frame-ordered keyframe storage and the before/after lookups that
//! evaluation and Bezier locking are driven by.

use std::collections::BTreeMap;
use std::ops::Bound;

use log::trace;

use crate::value::NumericValue;
use crate::Frame;

/// Lookups a parameter's timeline must answer.
pub trait KeyframeTimeline {
    /// Latest keyframe at or before (`inclusive`) / strictly before `frame`.
    fn keyframe_before(&self, frame: Frame, inclusive: bool) -> Option<&NumericValue>;

    /// Earliest keyframe at or after (`inclusive`) / strictly after `frame`.
    fn keyframe_after(&self, frame: Frame, inclusive: bool) -> Option<&NumericValue>;

    /// Keyframes strictly before and strictly after `frame`.
    fn neighbors(&self, frame: Frame) -> Neighbors {
        Neighbors {
            previous: self.keyframe_before(frame, false).map(KeyPoint::from),
            next: self.keyframe_after(frame, false).map(KeyPoint::from),
        }
    }
}

/// A `(frame, value)` anchor of a neighbouring keyframe.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct KeyPoint {
    pub frame: Frame,
    pub value: f64,
}

impl From<&NumericValue> for KeyPoint {
    fn from(v: &NumericValue) -> Self {
        KeyPoint {
            frame: v.frame(),
            value: v.value(),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Neighbors {
    pub previous: Option<KeyPoint>,
    pub next: Option<KeyPoint>,
}

/// At most one value per frame, iterated in frame order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Keyframes {
    map: BTreeMap<Frame, NumericValue>,
}

impl Keyframes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert keyed by the value's own frame, returning any value it replaced.
    pub fn insert(&mut self, value: NumericValue) -> Option<NumericValue> {
        self.map.insert(value.frame(), value)
    }

    pub fn remove(&mut self, frame: Frame) -> Option<NumericValue> {
        self.map.remove(&frame)
    }

    #[inline]
    pub fn get(&self, frame: Frame) -> Option<&NumericValue> {
        self.map.get(&frame)
    }

    #[inline]
    pub fn get_mut(&mut self, frame: Frame) -> Option<&mut NumericValue> {
        self.map.get_mut(&frame)
    }

    pub fn contains(&self, frame: Frame) -> bool {
        self.map.contains_key(&frame)
    }

    pub fn frames(&self) -> impl Iterator<Item = Frame> + '_ {
        self.map.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NumericValue> + '_ {
        self.map.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn first(&self) -> Option<&NumericValue> {
        self.map.values().next()
    }

    pub fn last(&self) -> Option<&NumericValue> {
        self.map.values().next_back()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Move every keyframe at or after `from` by `delta` frames.
    ///
    /// With a negative delta the frames in `[from + delta, from)` are
    /// overwritten, so keyframes there are dropped. Frames clamp at the ends
    /// of the frame range; keyframes that clamp onto the same frame collapse
    /// into the last of them. Returns the number of keyframes dropped.
    pub fn shift_from(&mut self, from: Frame, delta: Frame) -> usize {
        if delta == 0 {
            return 0;
        }
        let mut dropped = 0;
        if delta < 0 {
            let doomed: Vec<Frame> = self
                .map
                .range(from.saturating_add(delta)..from)
                .map(|(f, _)| *f)
                .collect();
            for f in doomed {
                self.map.remove(&f);
                dropped += 1;
            }
        }
        let tail = self.map.split_off(&from);
        for (frame, mut value) in tail {
            let moved = frame.saturating_add(delta);
            value.set_frame(moved);
            if self.map.insert(moved, value).is_some() {
                dropped += 1;
            }
        }
        trace!("shifted keyframes from {from} by {delta} ({dropped} dropped)");
        dropped
    }
}

impl KeyframeTimeline for Keyframes {
    fn keyframe_before(&self, frame: Frame, inclusive: bool) -> Option<&NumericValue> {
        let upper = if inclusive {
            Bound::Included(frame)
        } else {
            Bound::Excluded(frame)
        };
        self.map
            .range((Bound::Unbounded, upper))
            .next_back()
            .map(|(_, v)| v)
    }

    fn keyframe_after(&self, frame: Frame, inclusive: bool) -> Option<&NumericValue> {
        let lower = if inclusive {
            Bound::Included(frame)
        } else {
            Bound::Excluded(frame)
        };
        self.map
            .range((lower, Bound::Unbounded))
            .next()
            .map(|(_, v)| v)
    }
}
