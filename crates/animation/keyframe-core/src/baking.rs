//! Baking API: evaluate every enabled parameter of an animation over a frame
//! window.

use serde::{Deserialize, Serialize};

use crate::animation::Animation;
use crate::ids::ParameterId;
use crate::Frame;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BakingConfig {
    pub start_frame: Frame,
    /// Last frame (inclusive); if None, uses the animation's last frame.
    pub end_frame: Option<Frame>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BakedParameter {
    pub parameter: ParameterId,
    pub name: String,
    /// One value per frame of the window.
    pub values: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BakedAnimation {
    pub name: String,
    pub start_frame: Frame,
    pub end_frame: Frame,
    pub parameters: Vec<BakedParameter>,
}

/// Bake an animation using the provided config. An empty window
/// (`end < start`) bakes no frames.
pub fn bake_animation(animation: &Animation, cfg: &BakingConfig) -> BakedAnimation {
    let start = cfg.start_frame;
    let end = cfg
        .end_frame
        .unwrap_or_else(|| animation.frame_count().saturating_sub(1));

    let parameters = animation
        .parameters()
        .iter()
        .filter(|p| p.enabled)
        .map(|p| BakedParameter {
            parameter: p.id(),
            name: p.name.clone(),
            values: p
                .values_between_frames(start, end)
                .iter()
                .map(|v| v.value())
                .collect(),
        })
        .collect();

    BakedAnimation {
        name: animation.name.clone(),
        start_frame: start,
        end_frame: end,
        parameters,
    }
}

/// Export baked data as serde_json::Value (stable schema for FFI/serialization).
pub fn export_baked_json(baked: &BakedAnimation) -> serde_json::Value {
    serde_json::to_value(baked).unwrap_or(serde_json::Value::Null)
}
