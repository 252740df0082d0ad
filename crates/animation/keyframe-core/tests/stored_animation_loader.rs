use keyframe_core::{
    animation::Animation,
    config::Config,
    ids::ParameterId,
    parse_stored_animation_json, to_stored_animation_json, value_from_attributes,
    value_to_attributes,
    value::{BezierValue, ControlPoint, NumericValue, ValueType},
    KeyframeError,
};

fn approx(a: f64, b: f64, eps: f64) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn load(name: &str) -> Animation {
    let json = keyframe_test_fixtures::animations::json(name).expect("load fixture");
    parse_stored_animation_json(&json).expect("parse stored animation")
}

#[test]
fn parses_camera_fixture_and_preserves_bezier_handles() {
    let anim = load("camera-flyby");
    assert_eq!(anim.name, "Camera flyby");
    assert_eq!(anim.frame_count(), 101);
    assert_eq!(anim.parameters().len(), 3);

    let lat = anim.parameter_by_name("Camera Eye Lat").expect("eye lat");
    assert_eq!(lat.keyframe_frames(), vec![0, 50, 100]);
    let b = lat
        .keyframe(50)
        .and_then(|v| v.as_bezier())
        .expect("bezier at 50");
    assert_eq!(b.r#in, ControlPoint::new(8.0, 0.4));
    assert_eq!(b.out, ControlPoint::new(12.0, 0.4));
    assert!(b.locked);
    assert_eq!(b.owner, lat.id());

    // Frame 25 sits at t = 0.5 of the first segment: control values 0, 4, 8, 10.
    approx(lat.value_at_frame(25).value(), 5.75, 1e-12);

    let fov = anim.parameter_by_name("Camera Field of View").expect("fov");
    assert!(fov.enabled && fov.armed);
    assert_eq!(fov.value_at_frame(60).value(), 45.0);

    let opacity = anim.parameter_by_name("Layer Opacity").expect("opacity");
    assert!(!opacity.enabled);
    let evaluated: Vec<ParameterId> = anim.values_at_frame(0).iter().map(|(id, _)| *id).collect();
    assert!(!evaluated.contains(&opacity.id()));
}

#[test]
fn duplicate_frames_are_rejected() {
    let json = keyframe_test_fixtures::animations::json("duplicate-frame").unwrap();
    let err = parse_stored_animation_json(&json).unwrap_err();
    assert!(matches!(err, KeyframeError::InvalidArgument { .. }), "{err}");
}

#[test]
fn malformed_documents_surface_errors() {
    let err = parse_stored_animation_json(r#"{ "name": 3 }"#).unwrap_err();
    assert_eq!(err.category(), "serialization");

    let bad_type = r#"{
        "name": "x",
        "parameters": [
            { "name": "p", "values": [ { "type": "CUBIC", "frame": 0, "value": 1.0 } ] }
        ]
    }"#;
    assert!(matches!(
        parse_stored_animation_json(bad_type),
        Err(KeyframeError::InvalidArgument { .. })
    ));

    let bad_frame = r#"{
        "name": "x",
        "parameters": [
            { "name": "p", "values": [ { "type": "LINEAR", "frame": "abc", "value": 1.0 } ] }
        ]
    }"#;
    let err = parse_stored_animation_json(bad_frame).unwrap_err();
    assert!(matches!(err, KeyframeError::InvalidArgument { .. }), "{err}");
    assert_eq!(err.category(), "validation");

    let not_json = parse_stored_animation_json("{ \"name\": ").unwrap_err();
    assert_eq!(not_json.category(), "serialization");

    let bad_percent = r#"{
        "name": "x",
        "parameters": [
            { "name": "p", "values": [
                { "type": "BEZIER", "frame": 0, "value": 1.0, "inPercent": 0.0 }
            ] }
        ]
    }"#;
    assert!(matches!(
        parse_stored_animation_json(bad_percent),
        Err(KeyframeError::InvalidArgument { .. })
    ));
}

#[test]
fn bezier_attributes_round_trip() {
    let owner = ParameterId(4);
    let samples = [
        (0.1 + 0.2, -12, -3.75e-9, 0.4, 1.0e12, 1.0, true),
        (-0.0, 0, 7.0, 0.05, -7.0, 0.333_333_333_333_333_3, false),
        (123_456.789, 99_999, 1.0 / 3.0, 1.0, 2.0 / 3.0, 0.001, true),
    ];
    for (value, frame, in_value, in_percent, out_value, out_percent, locked) in samples {
        let original = NumericValue::Bezier(BezierValue {
            owner,
            frame,
            value,
            r#in: ControlPoint::new(in_value, in_percent),
            out: ControlPoint::new(out_value, out_percent),
            locked,
        });
        let attrs = value_to_attributes(&original);
        let names: Vec<&str> = attrs.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            names,
            vec![
                "type",
                "frame",
                "value",
                "inValue",
                "inPercent",
                "outValue",
                "outPercent",
                "locked"
            ]
        );
        assert_eq!(attrs[0].1, "BEZIER");
        let restored = value_from_attributes(Some(owner), attrs).unwrap();
        assert_eq!(restored, original);
    }
}

#[test]
fn unset_handles_round_trip_as_unset() {
    let original = NumericValue::bezier(ParameterId(0), 3, 1.5);
    let attrs = value_to_attributes(&original);
    assert!(attrs.iter().all(|(k, _)| *k != "inValue" && *k != "outValue"));
    assert_eq!(
        value_from_attributes(Some(ParameterId(0)), attrs).unwrap(),
        original
    );
}

#[test]
fn saved_animation_reloads_identically() {
    let anim = load("camera-flyby");
    let json = to_stored_animation_json(&anim).unwrap();
    let reloaded = parse_stored_animation_json(&json).unwrap();

    assert_eq!(reloaded.name, anim.name);
    assert_eq!(reloaded.frame_count(), anim.frame_count());
    assert_eq!(reloaded.config(), anim.config());
    assert_eq!(reloaded.parameters(), anim.parameters());
}

#[test]
fn config_fixture_drives_new_keyframes() {
    let json = keyframe_test_fixtures::configs::json("bezier-session").unwrap();
    let cfg = Config::from_json(&json).unwrap();
    let mut anim = Animation::new("session", cfg);
    let id = anim.add_parameter("Camera Near Clip", 1.0);
    anim.record_key_frame(0);

    let v = anim.parameter(id).and_then(|p| p.keyframe(0)).copied().unwrap();
    assert_eq!(v.value_type(), ValueType::Bezier);
    let b = v.as_bezier().unwrap();
    assert!(!b.locked);
    assert_eq!(b.r#in.percent, 0.3);
}
