use log::debug;
use serde::{Deserialize, Serialize};

use crate::animation::Animation;
use crate::config::Config;
use crate::error::KeyframeError;
use crate::ids::ParameterId;
use crate::parameter::Parameter;
use crate::value::{BezierValue, ControlPoint, NumericValue, ValueType};
use crate::Frame;

/// Public API: parse a stored animation document into an [`Animation`].
///
/// Notes:
/// - `frameCount` and `config` are optional; omitted values take the defaults.
/// - Each `parameterValue` carries `type` (`LINEAR` | `BEZIER`), `frame` and
///   `value`; Bezier values add `inValue`, `inPercent`, `outValue`,
///   `outPercent` and `locked`.
/// - Two values at the same frame of one parameter are rejected.
/// - Text that is not a stored animation document is a
///   `SerializationError`; a malformed `parameterValue` record inside an
///   otherwise valid document is an `InvalidArgument`.
pub fn parse_stored_animation_json(s: &str) -> Result<Animation, KeyframeError> {
    let stored: StoredAnimation = serde_json::from_str(s)?;
    let config = stored.config.unwrap_or_default();
    config.validate()?;

    let mut animation = Animation::new(stored.name, config);
    if let Some(frame_count) = stored.frame_count {
        animation.set_frame_count(frame_count)?;
    }

    for sp in stored.parameters {
        let id = animation.alloc_parameter_id();
        let mut parameter = Parameter::new(id, sp.name, sp.default_value);
        parameter.enabled = sp.enabled;
        parameter.armed = sp.armed;
        for raw in sp.values {
            let value = StoredParameterValue::from_json(raw)?.into_value(Some(id))?;
            if parameter.insert_value(value)?.is_some() {
                return Err(KeyframeError::invalid_argument(format!(
                    "parameter '{}' has two values at frame {}",
                    parameter.name,
                    value.frame()
                )));
            }
        }
        debug!(
            "loaded parameter '{}' with {} keyframe(s)",
            parameter.name,
            parameter.keyframes().len()
        );
        animation.push_parameter(parameter);
    }
    Ok(animation)
}

/// Serialize an animation to the stored document form.
pub fn to_stored_animation_json(animation: &Animation) -> Result<String, KeyframeError> {
    let mut parameters = Vec::with_capacity(animation.parameters().len());
    for p in animation.parameters() {
        let values = p
            .keyframes()
            .iter()
            .map(|v| serde_json::to_value(StoredParameterValue::from_value(v)))
            .collect::<Result<Vec<_>, _>>()?;
        parameters.push(StoredParameter {
            name: p.name.clone(),
            enabled: p.enabled,
            armed: p.armed,
            default_value: p.default_value,
            values,
        });
    }
    let stored = StoredAnimation {
        name: animation.name.clone(),
        frame_count: Some(animation.frame_count()),
        config: Some(animation.config().clone()),
        parameters,
    };
    Ok(serde_json::to_string_pretty(&stored)?)
}

/// Flatten a value to its `parameterValue` attributes. Unset control point
/// values are omitted.
pub fn value_to_attributes(value: &NumericValue) -> Vec<(&'static str, String)> {
    let s = StoredParameterValue::from_value(value);
    let mut attrs = vec![
        ("type", s.value_type.to_string()),
        ("frame", s.frame.to_string()),
        ("value", s.value.to_string()),
    ];
    if let Some(v) = s.in_value {
        attrs.push(("inValue", v.to_string()));
    }
    if let Some(v) = s.in_percent {
        attrs.push(("inPercent", v.to_string()));
    }
    if let Some(v) = s.out_value {
        attrs.push(("outValue", v.to_string()));
    }
    if let Some(v) = s.out_percent {
        attrs.push(("outPercent", v.to_string()));
    }
    if let Some(v) = s.locked {
        attrs.push(("locked", v.to_string()));
    }
    attrs
}

/// Rebuild a value from `parameterValue` attributes. `owner` is the
/// enclosing parameter; a missing owner or a malformed attribute is an
/// `InvalidArgument` error. Unknown attributes are ignored.
pub fn value_from_attributes<I, K, V>(
    owner: Option<ParameterId>,
    attrs: I,
) -> Result<NumericValue, KeyframeError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut value_type = None;
    let mut frame = None;
    let mut value = None;
    let mut s = StoredParameterValue::default();

    for (k, v) in attrs {
        let (k, v) = (k.as_ref(), v.as_ref());
        match k {
            "type" => value_type = Some(v.parse::<ValueType>()?),
            "frame" => frame = Some(parse_attr::<Frame>(k, v)?),
            "value" => value = Some(parse_attr::<f64>(k, v)?),
            "inValue" => s.in_value = Some(parse_attr(k, v)?),
            "inPercent" => s.in_percent = Some(parse_attr(k, v)?),
            "outValue" => s.out_value = Some(parse_attr(k, v)?),
            "outPercent" => s.out_percent = Some(parse_attr(k, v)?),
            "locked" => s.locked = Some(parse_attr(k, v)?),
            _ => {}
        }
    }

    s.value_type = value_type.ok_or_else(|| missing("type"))?;
    s.frame = frame.ok_or_else(|| missing("frame"))?;
    s.value = value.ok_or_else(|| missing("value"))?;
    s.into_value(owner)
}

fn missing(attr: &str) -> KeyframeError {
    KeyframeError::invalid_argument(format!("parameterValue is missing '{attr}'"))
}

fn parse_attr<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, KeyframeError> {
    raw.trim().parse::<T>().map_err(|_| {
        KeyframeError::invalid_argument(format!("attribute '{name}' has unparsable value '{raw}'"))
    })
}

// ----- JSON schema (serde) -----

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredAnimation {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    frame_count: Option<Frame>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    config: Option<Config>,
    #[serde(default)]
    parameters: Vec<StoredParameter>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredParameter {
    name: String,
    #[serde(default = "default_true")]
    enabled: bool,
    #[serde(default = "default_true")]
    armed: bool,
    #[serde(rename = "default", default)]
    default_value: f64,
    /// Records are checked one by one so a bad record reports as
    /// `InvalidArgument` rather than failing the whole document parse.
    #[serde(default)]
    values: Vec<serde_json::Value>,
}

/// One `parameterValue` record.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredParameterValue {
    #[serde(rename = "type")]
    value_type: ValueType,
    frame: Frame,
    value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    in_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    in_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    out_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    out_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    locked: Option<bool>,
}

impl StoredParameterValue {
    fn from_json(raw: serde_json::Value) -> Result<Self, KeyframeError> {
        serde_json::from_value(raw).map_err(|e| {
            KeyframeError::invalid_argument(format!("malformed parameterValue: {e}"))
        })
    }

    fn from_value(value: &NumericValue) -> Self {
        match value {
            NumericValue::Linear(v) => Self {
                value_type: ValueType::Linear,
                frame: v.frame,
                value: v.value,
                ..Self::default()
            },
            NumericValue::Bezier(b) => Self {
                value_type: ValueType::Bezier,
                frame: b.frame,
                value: b.value,
                in_value: b.r#in.value,
                in_percent: Some(b.r#in.percent),
                out_value: b.out.value,
                out_percent: Some(b.out.percent),
                locked: Some(b.locked),
            },
        }
    }

    fn into_value(self, owner: Option<ParameterId>) -> Result<NumericValue, KeyframeError> {
        let owner = owner.ok_or_else(|| {
            KeyframeError::invalid_argument(format!(
                "parameterValue at frame {} has no owning parameter",
                self.frame
            ))
        })?;
        check_finite("value", Some(self.value))?;
        check_finite("inValue", self.in_value)?;
        check_finite("outValue", self.out_value)?;

        match self.value_type {
            ValueType::Linear => Ok(NumericValue::linear(owner, self.frame, self.value)),
            ValueType::Bezier => {
                let mut b = BezierValue::new(owner, self.frame, self.value);
                b.r#in = control_point("inPercent", self.in_value, self.in_percent)?;
                b.out = control_point("outPercent", self.out_value, self.out_percent)?;
                b.locked = self.locked.unwrap_or(true);
                Ok(NumericValue::Bezier(b))
            }
        }
    }
}

fn check_finite(name: &str, v: Option<f64>) -> Result<(), KeyframeError> {
    match v {
        Some(x) if !x.is_finite() => Err(KeyframeError::invalid_argument(format!(
            "attribute '{name}' must be finite, got {x}"
        ))),
        _ => Ok(()),
    }
}

fn control_point(
    name: &str,
    value: Option<f64>,
    percent: Option<f64>,
) -> Result<ControlPoint, KeyframeError> {
    let mut cp = ControlPoint {
        value,
        ..ControlPoint::default()
    };
    if let Some(p) = percent {
        if !(p.is_finite() && p > 0.0 && p <= 1.0) {
            return Err(KeyframeError::invalid_argument(format!(
                "attribute '{name}' must be in (0, 1], got {p}"
            )));
        }
        cp.percent = p;
    }
    Ok(cp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_owner_is_invalid_argument() {
        let err = value_from_attributes(None, [("type", "LINEAR"), ("frame", "1"), ("value", "2")])
            .unwrap_err();
        assert!(matches!(err, KeyframeError::InvalidArgument { .. }));
    }

    #[test]
    fn unparsable_numbers_are_rejected() {
        let owner = Some(ParameterId(0));
        for attrs in [
            [("type", "LINEAR"), ("frame", "1.5"), ("value", "2")],
            [("type", "BEZIER"), ("frame", "1"), ("value", "two")],
            [("type", "CUBIC"), ("frame", "1"), ("value", "2")],
            [("type", "LINEAR"), ("frame", "1"), ("value", "NaN")],
        ] {
            assert!(value_from_attributes(owner, attrs).is_err(), "{attrs:?}");
        }
    }

    #[test]
    fn linear_attributes_have_no_handles() {
        let v = NumericValue::linear(ParameterId(0), -4, 0.25);
        let attrs = value_to_attributes(&v);
        let keys: Vec<&str> = attrs.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["type", "frame", "value"]);
        assert_eq!(value_from_attributes(Some(ParameterId(0)), attrs).unwrap(), v);
    }
}
