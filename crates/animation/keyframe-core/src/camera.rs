//! Animatable camera: the standard set of camera parameters on an animation.

use serde::{Deserialize, Serialize};

use crate::animation::Animation;
use crate::error::KeyframeError;
use crate::ids::ParameterId;
use crate::Frame;

/// One of the nine animatable camera parameters, in registration order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CameraParameter {
    EyeLat,
    EyeLon,
    EyeElevation,
    LookAtLat,
    LookAtLon,
    LookAtElevation,
    FieldOfView,
    NearClip,
    FarClip,
}

impl CameraParameter {
    pub const ALL: [CameraParameter; 9] = [
        CameraParameter::EyeLat,
        CameraParameter::EyeLon,
        CameraParameter::EyeElevation,
        CameraParameter::LookAtLat,
        CameraParameter::LookAtLon,
        CameraParameter::LookAtElevation,
        CameraParameter::FieldOfView,
        CameraParameter::NearClip,
        CameraParameter::FarClip,
    ];

    /// Parameter name as registered on the animation.
    pub fn name(self) -> &'static str {
        match self {
            CameraParameter::EyeLat => "Camera Eye Lat",
            CameraParameter::EyeLon => "Camera Eye Lon",
            CameraParameter::EyeElevation => "Camera Eye Elevation",
            CameraParameter::LookAtLat => "Camera Look-at Lat",
            CameraParameter::LookAtLon => "Camera Look-at Lon",
            CameraParameter::LookAtElevation => "Camera Look-at Elevation",
            CameraParameter::FieldOfView => "Camera Field of View",
            CameraParameter::NearClip => "Camera Near Clip",
            CameraParameter::FarClip => "Camera Far Clip",
        }
    }
}

/// Eye and look-at positions in degrees/metres plus lens settings.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraState {
    pub eye_lat: f64,
    pub eye_lon: f64,
    pub eye_elevation: f64,
    pub look_at_lat: f64,
    pub look_at_lon: f64,
    pub look_at_elevation: f64,
    pub field_of_view: f64,
    pub near_clip: f64,
    pub far_clip: f64,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            eye_lat: 0.0,
            eye_lon: 0.0,
            eye_elevation: 1.0e7,
            look_at_lat: 0.0,
            look_at_lon: 0.0,
            look_at_elevation: 0.0,
            field_of_view: 45.0,
            near_clip: 1.0,
            far_clip: 1.0e9,
        }
    }
}

impl CameraState {
    pub fn get(&self, which: CameraParameter) -> f64 {
        self.to_array()[which as usize]
    }

    fn to_array(self) -> [f64; 9] {
        [
            self.eye_lat,
            self.eye_lon,
            self.eye_elevation,
            self.look_at_lat,
            self.look_at_lon,
            self.look_at_elevation,
            self.field_of_view,
            self.near_clip,
            self.far_clip,
        ]
    }

    fn from_array(a: [f64; 9]) -> Self {
        Self {
            eye_lat: a[0],
            eye_lon: a[1],
            eye_elevation: a[2],
            look_at_lat: a[3],
            look_at_lon: a[4],
            look_at_elevation: a[5],
            field_of_view: a[6],
            near_clip: a[7],
            far_clip: a[8],
        }
    }
}

/// Handles to the camera parameters registered on one animation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    ids: [ParameterId; 9],
    defaults: CameraState,
}

impl Camera {
    /// Register the camera parameters on `animation`, defaulting to `defaults`.
    pub fn attach(animation: &mut Animation, defaults: CameraState) -> Self {
        let values = defaults.to_array();
        let ids = std::array::from_fn(|i| {
            animation.add_parameter(CameraParameter::ALL[i].name(), values[i])
        });
        Self { ids, defaults }
    }

    /// Handles in [`CameraParameter::ALL`] order.
    pub fn parameter_ids(&self) -> [ParameterId; 9] {
        self.ids
    }

    pub fn parameter(&self, which: CameraParameter) -> ParameterId {
        self.ids[which as usize]
    }

    /// Camera state at `frame`. Disabled or removed parameters hold their
    /// default.
    pub fn state_at_frame(&self, animation: &Animation, frame: Frame) -> CameraState {
        let defaults = self.defaults.to_array();
        let mut out = defaults;
        for (i, id) in self.ids.iter().enumerate() {
            if let Some(p) = animation.parameter(*id).filter(|p| p.enabled) {
                out[i] = p.value_at_frame(frame).value();
            }
        }
        CameraState::from_array(out)
    }

    /// Push the live view state so the next recorded key frame captures it.
    pub fn set_current_state(
        &self,
        animation: &mut Animation,
        state: CameraState,
    ) -> Result<(), KeyframeError> {
        for (id, value) in self.ids.iter().zip(state.to_array()) {
            animation.set_current_value(*id, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn interpolates_between_recorded_views() {
        let mut anim = Animation::new("flyby", Config::default());
        let cam = Camera::attach(&mut anim, CameraState::default());
        assert_eq!(anim.parameters().len(), 9);

        let start = CameraState::default();
        let end = CameraState {
            eye_lat: -30.0,
            field_of_view: 60.0,
            ..start
        };
        cam.set_current_state(&mut anim, start).unwrap();
        anim.record_key_frame(0);
        cam.set_current_state(&mut anim, end).unwrap();
        anim.record_key_frame(10);

        let mid = cam.state_at_frame(&anim, 5);
        assert_eq!(mid.eye_lat, -15.0);
        assert_eq!(mid.field_of_view, 52.5);
        assert_eq!(mid.far_clip, start.far_clip);
        assert_eq!(cam.state_at_frame(&anim, 40), end);
    }

    #[test]
    fn disabled_parameter_holds_default() {
        let mut anim = Animation::new("still", Config::default());
        let cam = Camera::attach(&mut anim, CameraState::default());
        let fov = cam.parameter(CameraParameter::FieldOfView);
        anim.set_current_value(fov, 10.0).unwrap();
        anim.record_key_frame(0);
        anim.parameter_mut(fov).unwrap().enabled = false;
        assert_eq!(cam.state_at_frame(&anim, 0).field_of_view, 45.0);
    }

    #[test]
    fn every_parameter_is_reachable_by_name() {
        let mut anim = Animation::new("named", Config::default());
        let defaults = CameraState::default();
        let cam = Camera::attach(&mut anim, defaults);
        for (i, which) in CameraParameter::ALL.into_iter().enumerate() {
            let id = cam.parameter(which);
            assert_eq!(id, cam.parameter_ids()[i]);
            let p = anim.parameter(id).unwrap();
            assert_eq!(p.name, which.name());
            assert_eq!(p.default_value, defaults.get(which));
        }
        assert_eq!(defaults.get(CameraParameter::NearClip), defaults.near_clip);
        assert_eq!(defaults.get(CameraParameter::LookAtLon), defaults.look_at_lon);
    }
}
