//! Keyframe Core (host-agnostic)
//!
//! Sparse keyframed scalar parameters evaluated at arbitrary frames with
//! linear or cubic-Bezier interpolation. Bezier keyframes carry lockable
//! in/out control points that can be kept colinear or smoothed from their
//! neighbours.
//!
//! Evaluation (`Parameter::value_at_frame`) never fails: frames outside the
//! recorded range clamp to the first/last keyframe, and a parameter without
//! keyframes yields its default value.

pub mod animation;
pub mod baking;
pub mod camera;
pub mod config;
pub mod error;
pub mod ids;
pub mod interp;
pub mod parameter;
pub mod stored_animation;
pub mod timeline;
pub mod value;

// Re-exports for consumers (renderers, editors)
pub use animation::{Animation, KeyFrame};
pub use baking::{
    bake_animation, export_baked_json, BakedAnimation, BakedParameter, BakingConfig,
};
pub use camera::{Camera, CameraParameter, CameraState};
pub use config::Config;
pub use error::KeyframeError;
pub use ids::{IdAllocator, ParameterId};
pub use interp::Interpolator;
pub use parameter::{KeyframeEditor, Parameter};
pub use stored_animation::{
    parse_stored_animation_json, to_stored_animation_json, value_from_attributes,
    value_to_attributes,
};
pub use timeline::{KeyPoint, Keyframes, KeyframeTimeline, Neighbors};
pub use value::{BezierValue, ControlPoint, LinearValue, NumericValue, ValueType};

/// Frame index on an animation timeline. May be negative.
pub type Frame = i32;
