//! Animation timeline: a set of parameters sharing one frame axis.
//!
//! A key frame is the set of parameter values recorded at one frame. Key
//! frames are not stored separately; they are assembled on demand from the
//! parameters' own keyframes.

use std::collections::BTreeSet;
use std::ops::Bound;

use log::{debug, warn};

use crate::config::Config;
use crate::error::KeyframeError;
use crate::ids::{IdAllocator, ParameterId};
use crate::parameter::Parameter;
use crate::value::NumericValue;
use crate::Frame;

/// Values of every parameter that has a keyframe at `frame`.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyFrame {
    pub frame: Frame,
    pub values: Vec<NumericValue>,
}

impl KeyFrame {
    pub fn value_for_parameter(&self, id: ParameterId) -> Option<&NumericValue> {
        self.values.iter().find(|v| v.owner() == id)
    }

    pub fn has_value_for_parameter(&self, id: ParameterId) -> bool {
        self.value_for_parameter(id).is_some()
    }
}

#[derive(Clone, Debug)]
pub struct Animation {
    pub name: String,
    frame_count: Frame,
    config: Config,
    parameters: Vec<Parameter>,
    ids: IdAllocator,
}

impl Animation {
    pub fn new(name: impl Into<String>, config: Config) -> Self {
        Self {
            name: name.into(),
            frame_count: config.default_frame_count,
            config,
            parameters: Vec::new(),
            ids: IdAllocator::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn frame_count(&self) -> Frame {
        self.frame_count
    }

    pub fn set_frame_count(&mut self, frame_count: Frame) -> Result<(), KeyframeError> {
        if frame_count < 0 {
            return Err(KeyframeError::invalid_argument(format!(
                "frame count must not be negative, got {frame_count}"
            )));
        }
        self.frame_count = frame_count;
        Ok(())
    }

    pub fn add_parameter(&mut self, name: impl Into<String>, default_value: f64) -> ParameterId {
        let id = self.ids.alloc_parameter();
        let parameter = Parameter::new(id, name, default_value);
        debug!("animation '{}': added parameter '{}' as {id:?}", self.name, parameter.name);
        self.parameters.push(parameter);
        id
    }

    pub fn remove_parameter(&mut self, id: ParameterId) -> Result<Parameter, KeyframeError> {
        let pos = self
            .parameters
            .iter()
            .position(|p| p.id() == id)
            .ok_or(KeyframeError::ParameterNotFound { id })?;
        Ok(self.parameters.remove(pos))
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn parameter(&self, id: ParameterId) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.id() == id)
    }

    pub fn parameter_mut(&mut self, id: ParameterId) -> Option<&mut Parameter> {
        self.parameters.iter_mut().find(|p| p.id() == id)
    }

    pub fn try_parameter_mut(&mut self, id: ParameterId) -> Result<&mut Parameter, KeyframeError> {
        self.parameter_mut(id)
            .ok_or(KeyframeError::ParameterNotFound { id })
    }

    pub fn parameter_by_name(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Record the current value of every enabled, armed parameter at `frame`.
    /// Recording past the end extends the animation. Returns the number of
    /// parameters recorded.
    pub fn record_key_frame(&mut self, frame: Frame) -> usize {
        let mut recorded = 0;
        for p in self.parameters.iter_mut().filter(|p| p.enabled && p.armed) {
            p.record_current(&self.config, frame);
            recorded += 1;
        }
        if recorded > 0 && frame >= self.frame_count {
            self.frame_count = frame.saturating_add(1);
        }
        debug!(
            "animation '{}': recorded {recorded} value(s) at frame {frame}",
            self.name
        );
        recorded
    }

    /// Delete every parameter's keyframe at `frame`.
    pub fn remove_key_frame(&mut self, frame: Frame) -> Option<KeyFrame> {
        let values: Vec<NumericValue> = self
            .parameters
            .iter_mut()
            .filter_map(|p| p.remove_keyframe(frame))
            .collect();
        if values.is_empty() {
            None
        } else {
            Some(KeyFrame { frame, values })
        }
    }

    fn key_frame_indices(&self) -> BTreeSet<Frame> {
        self.parameters
            .iter()
            .flat_map(|p| p.keyframes().frames())
            .collect()
    }

    pub fn key_frame_at(&self, frame: Frame) -> Option<KeyFrame> {
        let values: Vec<NumericValue> = self
            .parameters
            .iter()
            .filter_map(|p| p.keyframe(frame).copied())
            .collect();
        if values.is_empty() {
            None
        } else {
            Some(KeyFrame { frame, values })
        }
    }

    /// All key frames in frame order.
    pub fn key_frames(&self) -> Vec<KeyFrame> {
        self.key_frame_indices()
            .into_iter()
            .filter_map(|f| self.key_frame_at(f))
            .collect()
    }

    pub fn key_frame_before(&self, frame: Frame, inclusive: bool) -> Option<KeyFrame> {
        let frames = self.key_frame_indices();
        let found = if inclusive {
            frames.range(..=frame).next_back()
        } else {
            frames.range(..frame).next_back()
        };
        found.and_then(|f| self.key_frame_at(*f))
    }

    pub fn key_frame_after(&self, frame: Frame, inclusive: bool) -> Option<KeyFrame> {
        let frames = self.key_frame_indices();
        let found = if inclusive {
            frames.range(frame..).next()
        } else {
            frames
                .range((Bound::Excluded(frame), Bound::Unbounded))
                .next()
        };
        found.and_then(|f| self.key_frame_at(*f))
    }

    /// Open `count` empty frames at `at`, pushing later key frames back.
    pub fn insert_frames(&mut self, at: Frame, count: Frame) -> Result<(), KeyframeError> {
        if count < 0 {
            return Err(KeyframeError::invalid_argument(format!(
                "cannot insert a negative number of frames ({count})"
            )));
        }
        for p in &mut self.parameters {
            p.shift_keyframes(at, count);
        }
        self.frame_count = self.frame_count.saturating_add(count);
        Ok(())
    }

    /// Delete frames `[at, at + count)`, dropping their key frames and
    /// pulling later ones forward. Returns the number of keyframe values
    /// dropped.
    pub fn remove_frames(&mut self, at: Frame, count: Frame) -> Result<usize, KeyframeError> {
        if count < 0 {
            return Err(KeyframeError::invalid_argument(format!(
                "cannot remove a negative number of frames ({count})"
            )));
        }
        let end = at.saturating_add(count);
        let dropped: usize = self
            .parameters
            .iter_mut()
            .map(|p| p.shift_keyframes(end, -count))
            .sum();
        if dropped > 0 {
            warn!(
                "animation '{}': removing frames {at}..{end} dropped {dropped} keyframe value(s)",
                self.name
            );
        }
        self.frame_count = (self.frame_count - count).max(0);
        Ok(dropped)
    }

    /// Evaluate every enabled parameter at `frame`.
    pub fn values_at_frame(&self, frame: Frame) -> Vec<(ParameterId, f64)> {
        self.parameters
            .iter()
            .filter(|p| p.enabled)
            .map(|p| (p.id(), p.value_at_frame(frame).value()))
            .collect()
    }

    /// Push a live host value into a parameter.
    pub fn set_current_value(&mut self, id: ParameterId, value: f64) -> Result<(), KeyframeError> {
        self.try_parameter_mut(id)?.set_current_value(value);
        Ok(())
    }

    /// Adopt a parameter whose id came from [`Animation::alloc_parameter_id`].
    pub(crate) fn push_parameter(&mut self, parameter: Parameter) {
        self.parameters.push(parameter);
    }

    pub(crate) fn alloc_parameter_id(&mut self) -> ParameterId {
        self.ids.alloc_parameter()
    }
}
