//! Animatable scalar parameters and their keyframes.
//!
//! A `Parameter` owns its keyframe values outright; values refer back to the
//! parameter only through its `ParameterId`. Queries (`value_at_frame`,
//! `values_between_frames`) borrow immutably and never fail. Edits go through
//! [`KeyframeEditor`], which carries the neighbouring keyframes needed for
//! Bezier locking and smoothing.

use log::{debug, trace};

use crate::config::Config;
use crate::error::KeyframeError;
use crate::ids::ParameterId;
use crate::interp::Interpolator;
use crate::timeline::{KeyframeTimeline, Keyframes, Neighbors};
use crate::value::{BezierValue, NumericValue, ValueType};
use crate::Frame;

#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    id: ParameterId,
    pub name: String,
    /// Participates in playback.
    pub enabled: bool,
    /// Participates in keyframe recording.
    pub armed: bool,
    /// Value reported when no keyframe exists.
    pub default_value: f64,
    /// Live value pushed by the host (e.g. the camera); recorded on demand.
    current_value: Option<f64>,
    keyframes: Keyframes,
}

impl Parameter {
    pub fn new(id: ParameterId, name: impl Into<String>, default_value: f64) -> Self {
        Self {
            id,
            name: name.into(),
            enabled: true,
            armed: true,
            default_value,
            current_value: None,
            keyframes: Keyframes::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> ParameterId {
        self.id
    }

    /// Live host value, falling back to the default.
    pub fn current_value(&self) -> f64 {
        self.current_value.unwrap_or(self.default_value)
    }

    pub fn set_current_value(&mut self, value: f64) {
        self.current_value = Some(value);
    }

    pub fn keyframes(&self) -> &Keyframes {
        &self.keyframes
    }

    pub fn keyframe(&self, frame: Frame) -> Option<&NumericValue> {
        self.keyframes.get(frame)
    }

    pub fn keyframe_frames(&self) -> Vec<Frame> {
        self.keyframes.frames().collect()
    }

    pub fn has_keyframes(&self) -> bool {
        !self.keyframes.is_empty()
    }

    /// Record `value` at `frame`. An existing keyframe keeps its variant and
    /// handles and only takes the new value; otherwise `cfg` decides the
    /// variant. Returns true when a new keyframe was created.
    pub fn record_value(&mut self, cfg: &Config, frame: Frame, value: f64) -> bool {
        if let Some(existing) = self.keyframes.get_mut(frame) {
            existing.set_value(value);
            trace!("{}: updated keyframe at {frame} to {value}", self.name);
            return false;
        }
        self.keyframes.insert(cfg.new_value(self.id, frame, value));
        trace!("{}: recorded keyframe at {frame} = {value}", self.name);
        true
    }

    /// Record the live host value at `frame`.
    pub fn record_current(&mut self, cfg: &Config, frame: Frame) -> bool {
        let value = self.current_value();
        self.record_value(cfg, frame, value)
    }

    /// Insert a fully formed value (e.g. from a stored animation), replacing
    /// any keyframe at the same frame.
    pub fn insert_value(
        &mut self,
        value: NumericValue,
    ) -> Result<Option<NumericValue>, KeyframeError> {
        if value.owner() != self.id {
            return Err(KeyframeError::invalid_argument(format!(
                "value at frame {} is owned by {:?}, not {:?}",
                value.frame(),
                value.owner(),
                self.id
            )));
        }
        Ok(self.keyframes.insert(value))
    }

    pub fn remove_keyframe(&mut self, frame: Frame) -> Option<NumericValue> {
        self.keyframes.remove(frame)
    }

    pub fn clear_keyframes(&mut self) {
        self.keyframes.clear();
    }

    /// Move keyframes at or after `from` by `delta` frames; see
    /// [`Keyframes::shift_from`].
    pub fn shift_keyframes(&mut self, from: Frame, delta: Frame) -> usize {
        let dropped = self.keyframes.shift_from(from, delta);
        if dropped > 0 {
            debug!(
                "{}: {dropped} keyframe(s) dropped shifting from {from} by {delta}",
                self.name
            );
        }
        dropped
    }

    /// Editor for the keyframe at `frame`, if one exists.
    pub fn keyframe_mut(&mut self, frame: Frame) -> Option<KeyframeEditor<'_>> {
        let neighbors = self.keyframes.neighbors(frame);
        let value = self.keyframes.get_mut(frame)?;
        Some(KeyframeEditor { value, neighbors })
    }

    /// Like [`Parameter::keyframe_mut`] but reports a missing keyframe.
    pub fn edit(&mut self, frame: Frame) -> Result<KeyframeEditor<'_>, KeyframeError> {
        let id = self.id;
        self.keyframe_mut(frame)
            .ok_or(KeyframeError::KeyframeNotFound {
                parameter: id,
                frame,
            })
    }

    /// Value of this parameter at `frame`.
    ///
    /// Exact keyframe hits and frames outside the recorded range return the
    /// recorded keyframe unchanged; frames strictly between two keyframes are
    /// interpolated; without keyframes the default value is returned.
    pub fn value_at_frame(&self, frame: Frame) -> NumericValue {
        let (previous, next) = bracket(&self.keyframes, frame);
        self.resolve(frame, previous, next)
    }

    /// One value per frame in `[start, end]`, identical to calling
    /// [`Parameter::value_at_frame`] for each frame. Empty when `start > end`.
    pub fn values_between_frames(&self, start: Frame, end: Frame) -> Vec<NumericValue> {
        if start > end {
            return Vec::new();
        }
        let count = (i64::from(end) - i64::from(start) + 1) as usize;
        let mut out = Vec::with_capacity(count);
        let (mut previous, mut next) = bracket(&self.keyframes, start);
        for frame in start..=end {
            if next.is_some_and(|n| frame >= n.frame()) {
                (previous, next) = bracket(&self.keyframes, frame);
            }
            out.push(self.resolve(frame, previous, next));
        }
        out
    }

    fn resolve(
        &self,
        frame: Frame,
        previous: Option<&NumericValue>,
        next: Option<&NumericValue>,
    ) -> NumericValue {
        match (previous, next) {
            (None, None) => NumericValue::linear(self.id, frame, self.default_value),
            (None, Some(n)) => *n,
            (Some(p), None) => *p,
            (Some(p), Some(n)) => {
                if frame <= p.frame() {
                    *p
                } else if frame >= n.frame() {
                    *n
                } else {
                    let p_frame = f64::from(p.frame());
                    let t = (f64::from(frame) - p_frame) / (f64::from(n.frame()) - p_frame);
                    let value = Interpolator::new(p, n).evaluate(t);
                    NumericValue::linear(self.id, frame, value)
                }
            }
        }
    }
}

/// Latest keyframe at or before `frame`, and the first keyframe after it
/// (or the first at or after `frame` when nothing precedes it).
fn bracket<T: KeyframeTimeline>(
    timeline: &T,
    frame: Frame,
) -> (Option<&NumericValue>, Option<&NumericValue>) {
    let previous = timeline.keyframe_before(frame, true);
    let next = match previous {
        Some(p) => timeline.keyframe_after(p.frame(), false),
        None => timeline.keyframe_after(frame, true),
    };
    (previous, next)
}

/// Mutable access to one keyframe together with its neighbours.
#[derive(Debug)]
pub struct KeyframeEditor<'a> {
    value: &'a mut NumericValue,
    neighbors: Neighbors,
}

impl KeyframeEditor<'_> {
    pub fn value(&self) -> &NumericValue {
        self.value
    }

    pub fn neighbors(&self) -> Neighbors {
        self.neighbors
    }

    /// Move the keyframe value; Bezier handles move with it.
    pub fn set_value(&mut self, value: f64) {
        self.value.set_value(value);
    }

    pub fn set_in_value(&mut self, value: f64) -> Result<(), KeyframeError> {
        let neighbors = self.neighbors;
        self.bezier()?.set_in_value(value, &neighbors);
        Ok(())
    }

    pub fn set_out_value(&mut self, value: f64) -> Result<(), KeyframeError> {
        let neighbors = self.neighbors;
        self.bezier()?.set_out_value(value, &neighbors);
        Ok(())
    }

    pub fn set_in_percent(&mut self, percent: f64) -> Result<(), KeyframeError> {
        let neighbors = self.neighbors;
        self.bezier()?.set_in_percent(percent, &neighbors)
    }

    pub fn set_out_percent(&mut self, percent: f64) -> Result<(), KeyframeError> {
        let neighbors = self.neighbors;
        self.bezier()?.set_out_percent(percent, &neighbors)
    }

    pub fn set_locked(&mut self, locked: bool) -> Result<(), KeyframeError> {
        let neighbors = self.neighbors;
        let b = self.bezier()?;
        b.set_locked(locked, &neighbors);
        if locked && (neighbors.previous.is_none() || neighbors.next.is_none()) {
            debug!("keyframe at {} is a boundary; lock left handles as is", b.frame);
        }
        Ok(())
    }

    pub fn smooth(&mut self) -> Result<(), KeyframeError> {
        let neighbors = self.neighbors;
        self.bezier()?.smooth(&neighbors);
        Ok(())
    }

    /// Convert the keyframe between linear and Bezier.
    pub fn set_value_type(&mut self, value_type: ValueType) {
        *self.value = self.value.converted(value_type);
    }

    fn bezier(&mut self) -> Result<&mut BezierValue, KeyframeError> {
        let frame = self.value.frame();
        self.value
            .as_bezier_mut()
            .ok_or(KeyframeError::NotBezier { frame })
    }
}
