//! Keyframe values: a plain linear value or a Bezier value with in/out
//! control points.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KeyframeError;
use crate::ids::ParameterId;
use crate::interp::functions::lerp;
use crate::timeline::Neighbors;
use crate::Frame;

/// Default fraction of the inter-keyframe interval covered by a control point.
pub const DEFAULT_CONTROL_PERCENT: f64 = 0.4;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValueType {
    #[default]
    Linear,
    Bezier,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Linear => f.write_str("LINEAR"),
            ValueType::Bezier => f.write_str("BEZIER"),
        }
    }
}

impl FromStr for ValueType {
    type Err = KeyframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LINEAR" => Ok(ValueType::Linear),
            "BEZIER" => Ok(ValueType::Bezier),
            other => Err(KeyframeError::invalid_argument(format!(
                "unknown parameter value type '{other}'"
            ))),
        }
    }
}

/// Tangent handle of a Bezier keyframe.
///
/// `percent` is the fraction of the interval to the neighbouring keyframe
/// that the handle spans on the frame axis. `value` is unset until the handle
/// is first placed; an unset handle is drawn `percent` of the way toward the
/// neighbouring keyframe value (see [`BezierValue::resolved_in`]).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ControlPoint {
    pub value: Option<f64>,
    pub percent: f64,
}

impl Default for ControlPoint {
    fn default() -> Self {
        Self {
            value: None,
            percent: DEFAULT_CONTROL_PERCENT,
        }
    }
}

impl ControlPoint {
    pub fn new(value: f64, percent: f64) -> Self {
        Self {
            value: Some(value),
            percent,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LinearValue {
    pub owner: ParameterId,
    pub frame: Frame,
    pub value: f64,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BezierValue {
    pub owner: ParameterId,
    pub frame: Frame,
    pub value: f64,
    pub r#in: ControlPoint,
    pub out: ControlPoint,
    /// Keep `in`, `value` and `out` colinear when a handle moves.
    pub locked: bool,
}

impl BezierValue {
    pub fn new(owner: ParameterId, frame: Frame, value: f64) -> Self {
        Self {
            owner,
            frame,
            value,
            r#in: ControlPoint::default(),
            out: ControlPoint::default(),
            locked: true,
        }
    }

    /// Placed incoming handle value, or the keyframe value while unset.
    #[inline]
    pub fn in_value(&self) -> f64 {
        self.r#in.value.unwrap_or(self.value)
    }

    #[inline]
    pub fn out_value(&self) -> f64 {
        self.out.value.unwrap_or(self.value)
    }

    /// Incoming handle value as drawn against a previous keyframe holding
    /// `previous`. An unset handle lies `in.percent` of the way toward it.
    #[inline]
    pub fn resolved_in(&self, previous: f64) -> f64 {
        self.r#in
            .value
            .unwrap_or_else(|| lerp(self.value, previous, self.r#in.percent))
    }

    /// Outgoing handle value as drawn against a next keyframe holding `next`.
    #[inline]
    pub fn resolved_out(&self, next: f64) -> f64 {
        self.out
            .value
            .unwrap_or_else(|| lerp(self.value, next, self.out.percent))
    }

    /// Move the keyframe value; placed handles move with it.
    pub fn set_value(&mut self, value: f64) {
        let delta = value - self.value;
        self.value = value;
        if let Some(v) = self.r#in.value.as_mut() {
            *v += delta;
        }
        if let Some(v) = self.out.value.as_mut() {
            *v += delta;
        }
    }

    pub fn set_in_value(&mut self, value: f64, neighbors: &Neighbors) {
        self.r#in.value = Some(value);
        if self.locked {
            self.lock_out(neighbors);
        }
    }

    pub fn set_out_value(&mut self, value: f64, neighbors: &Neighbors) {
        self.out.value = Some(value);
        if self.locked {
            self.lock_in(neighbors);
        }
    }

    pub fn set_in_percent(
        &mut self,
        percent: f64,
        neighbors: &Neighbors,
    ) -> Result<(), KeyframeError> {
        self.r#in.percent = validate_percent(percent)?;
        if self.locked {
            self.lock_out(neighbors);
        }
        Ok(())
    }

    pub fn set_out_percent(
        &mut self,
        percent: f64,
        neighbors: &Neighbors,
    ) -> Result<(), KeyframeError> {
        self.out.percent = validate_percent(percent)?;
        if self.locked {
            self.lock_in(neighbors);
        }
        Ok(())
    }

    /// Locking re-derives the out handle from the in handle.
    pub fn set_locked(&mut self, locked: bool, neighbors: &Neighbors) {
        self.locked = locked;
        if locked {
            self.lock_out(neighbors);
        }
    }

    /// Recompute `out` so that `in`, `value` and `out` are colinear, with
    /// each handle scaled by its percent of the gap to its neighbour. An
    /// unset `in` is first placed where interpolation would draw it.
    /// Returns false (and leaves both handles untouched) on the first/last
    /// keyframe.
    pub fn lock_out(&mut self, neighbors: &Neighbors) -> bool {
        let (Some(prev), Some(next)) = (neighbors.previous, neighbors.next) else {
            return false;
        };
        let delta_prev = f64::from(self.frame - prev.frame);
        let delta_next = f64::from(next.frame - self.frame);
        let denom = delta_prev * self.r#in.percent;
        if denom == 0.0 {
            return false;
        }
        let scale = (delta_next * self.out.percent) / denom;
        let in_value = self.resolved_in(prev.value);
        self.r#in.value = Some(in_value);
        self.out.value = Some(self.value + scale * (self.value - in_value));
        true
    }

    /// Mirror of [`BezierValue::lock_out`]: recompute `in` from `out`.
    pub fn lock_in(&mut self, neighbors: &Neighbors) -> bool {
        let (Some(prev), Some(next)) = (neighbors.previous, neighbors.next) else {
            return false;
        };
        let delta_prev = f64::from(self.frame - prev.frame);
        let delta_next = f64::from(next.frame - self.frame);
        let denom = delta_next * self.out.percent;
        if denom == 0.0 {
            return false;
        }
        let scale = (delta_prev * self.r#in.percent) / denom;
        let out_value = self.resolved_out(next.value);
        self.out.value = Some(out_value);
        self.r#in.value = Some(self.value + scale * (self.value - out_value));
        true
    }

    /// Place both handles along the slope joining the neighbours when this
    /// keyframe lies between them; flatten them at a peak, a trough, or on
    /// the first/last keyframe.
    pub fn smooth(&mut self, neighbors: &Neighbors) {
        let was_locked = self.locked;
        self.locked = false;

        match (neighbors.previous, neighbors.next) {
            (Some(prev), Some(next))
                if sign(self.value - prev.value) != sign(self.value - next.value) =>
            {
                let m = (next.value - prev.value) / f64::from(next.frame - prev.frame);
                let x_in = f64::from(self.frame - prev.frame) * self.r#in.percent;
                let x_out = f64::from(next.frame - self.frame) * self.out.percent;
                self.r#in.value = Some(self.value - m * x_in);
                self.out.value = Some(self.value + m * x_out);
            }
            _ => {
                self.r#in.value = Some(self.value);
                self.out.value = Some(self.value);
            }
        }

        self.locked = was_locked;
    }
}

fn sign(x: f64) -> i8 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}

fn validate_percent(percent: f64) -> Result<f64, KeyframeError> {
    if percent.is_finite() && percent > 0.0 && percent <= 1.0 {
        Ok(percent)
    } else {
        Err(KeyframeError::invalid_argument(format!(
            "control point percent must be in (0, 1], got {percent}"
        )))
    }
}

/// A keyframe value owned by one parameter.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum NumericValue {
    Linear(LinearValue),
    Bezier(BezierValue),
}

impl NumericValue {
    pub fn linear(owner: ParameterId, frame: Frame, value: f64) -> Self {
        NumericValue::Linear(LinearValue {
            owner,
            frame,
            value,
        })
    }

    pub fn bezier(owner: ParameterId, frame: Frame, value: f64) -> Self {
        NumericValue::Bezier(BezierValue::new(owner, frame, value))
    }

    #[inline]
    pub fn value(&self) -> f64 {
        match self {
            NumericValue::Linear(v) => v.value,
            NumericValue::Bezier(v) => v.value,
        }
    }

    #[inline]
    pub fn frame(&self) -> Frame {
        match self {
            NumericValue::Linear(v) => v.frame,
            NumericValue::Bezier(v) => v.frame,
        }
    }

    #[inline]
    pub fn owner(&self) -> ParameterId {
        match self {
            NumericValue::Linear(v) => v.owner,
            NumericValue::Bezier(v) => v.owner,
        }
    }

    #[inline]
    pub fn value_type(&self) -> ValueType {
        match self {
            NumericValue::Linear(_) => ValueType::Linear,
            NumericValue::Bezier(_) => ValueType::Bezier,
        }
    }

    pub fn as_bezier(&self) -> Option<&BezierValue> {
        match self {
            NumericValue::Bezier(b) => Some(b),
            NumericValue::Linear(_) => None,
        }
    }

    pub fn as_bezier_mut(&mut self) -> Option<&mut BezierValue> {
        match self {
            NumericValue::Bezier(b) => Some(b),
            NumericValue::Linear(_) => None,
        }
    }

    /// Set the scalar value. Bezier handles follow the value.
    pub fn set_value(&mut self, value: f64) {
        match self {
            NumericValue::Linear(v) => v.value = value,
            NumericValue::Bezier(v) => v.set_value(value),
        }
    }

    pub(crate) fn set_frame(&mut self, frame: Frame) {
        match self {
            NumericValue::Linear(v) => v.frame = frame,
            NumericValue::Bezier(v) => v.frame = frame,
        }
    }

    /// Convert to another variant. Converting to Bezier starts with unset
    /// handles; converting to Linear drops them.
    pub fn converted(&self, value_type: ValueType) -> NumericValue {
        match (self, value_type) {
            (NumericValue::Linear(v), ValueType::Bezier) => {
                NumericValue::bezier(v.owner, v.frame, v.value)
            }
            (NumericValue::Bezier(v), ValueType::Linear) => {
                NumericValue::linear(v.owner, v.frame, v.value)
            }
            _ => *self,
        }
    }
}
