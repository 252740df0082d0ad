//! Animation session configuration.
//!
//! Decides what kind of value a newly recorded keyframe gets; passed to
//! whatever records keyframes instead of living in process-wide state.

use serde::{Deserialize, Serialize};

use crate::error::KeyframeError;
use crate::ids::ParameterId;
use crate::value::{BezierValue, NumericValue, ValueType, DEFAULT_CONTROL_PERCENT};
use crate::Frame;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Variant given to newly recorded keyframes.
    pub default_value_type: ValueType,
    /// Initial in/out percent of new Bezier keyframes.
    pub default_control_percent: f64,
    /// Frame count of a freshly created animation.
    pub default_frame_count: Frame,
    pub lock_new_bezier_values: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_value_type: ValueType::Linear,
            default_control_percent: DEFAULT_CONTROL_PERCENT,
            default_frame_count: 100,
            lock_new_bezier_values: true,
        }
    }
}

impl Config {
    /// Parse a JSON config document; omitted fields take their defaults.
    pub fn from_json(s: &str) -> Result<Self, KeyframeError> {
        let cfg: Config = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), KeyframeError> {
        let p = self.default_control_percent;
        if !(p.is_finite() && p > 0.0 && p <= 1.0) {
            return Err(KeyframeError::invalid_argument(format!(
                "defaultControlPercent must be in (0, 1], got {p}"
            )));
        }
        if self.default_frame_count < 0 {
            return Err(KeyframeError::invalid_argument(
                "defaultFrameCount must not be negative",
            ));
        }
        Ok(())
    }

    /// Create the value for a keyframe recorded under this configuration.
    pub fn new_value(&self, owner: ParameterId, frame: Frame, value: f64) -> NumericValue {
        match self.default_value_type {
            ValueType::Linear => NumericValue::linear(owner, frame, value),
            ValueType::Bezier => {
                let mut b = BezierValue::new(owner, frame, value);
                b.r#in.percent = self.default_control_percent;
                b.out.percent = self.default_control_percent;
                b.locked = self.lock_new_bezier_values;
                NumericValue::Bezier(b)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = Config::default();
        assert_eq!(cfg.default_value_type, ValueType::Linear);
        assert_eq!(cfg.default_control_percent, 0.4);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg = Config::from_json(r#"{ "defaultValueType": "BEZIER" }"#).unwrap();
        assert_eq!(cfg.default_value_type, ValueType::Bezier);
        assert_eq!(cfg.default_frame_count, 100);
        let v = cfg.new_value(ParameterId(1), 4, 2.0);
        let b = v.as_bezier().expect("bezier value");
        assert!(b.locked);
        assert_eq!(b.r#in.percent, 0.4);
    }

    #[test]
    fn rejects_bad_percent() {
        let err = Config::from_json(r#"{ "defaultControlPercent": 0.0 }"#).unwrap_err();
        assert!(matches!(err, KeyframeError::InvalidArgument { .. }));
    }
}
