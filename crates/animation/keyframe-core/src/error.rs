//! Error types for keyframe editing and loading.
//!
//! Evaluation has no error path; these errors only surface from edits and
//! from loading stored animations.

use crate::ids::ParameterId;
use crate::Frame;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum KeyframeError {
    /// Malformed input (missing owner, unparsable number, unknown type tag)
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("Parameter not found: {id:?}")]
    ParameterNotFound { id: ParameterId },

    #[error("No keyframe at frame {frame} for parameter {parameter:?}")]
    KeyframeNotFound { parameter: ParameterId, frame: Frame },

    /// A Bezier-only edit was applied to a linear keyframe.
    #[error("Keyframe at frame {frame} is not a Bezier value")]
    NotBezier { frame: Frame },

    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl KeyframeError {
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "validation",
            Self::ParameterNotFound { .. } | Self::KeyframeNotFound { .. } => "data",
            Self::NotBezier { .. } => "edit",
            Self::SerializationError { .. } => "serialization",
        }
    }
}

impl From<serde_json::Error> for KeyframeError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories() {
        assert_eq!(
            KeyframeError::invalid_argument("bad frame").category(),
            "validation"
        );
        assert_eq!(KeyframeError::NotBezier { frame: 3 }.category(), "edit");
        let missing = KeyframeError::KeyframeNotFound {
            parameter: ParameterId(2),
            frame: 7,
        };
        assert_eq!(missing.category(), "data");
    }

    #[test]
    fn display_includes_reason() {
        let err = KeyframeError::invalid_argument("frame is not an integer");
        assert_eq!(err.to_string(), "Invalid argument: frame is not an integer");
    }

    #[test]
    fn json_errors_convert() {
        let err: KeyframeError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, KeyframeError::SerializationError { .. }));
    }
}
