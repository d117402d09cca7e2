use showcase_engine::camera_rig::SegmentEase;
use showcase_engine::config::ShowcaseConfig;
use std::io::Write;

#[test]
fn fixture_config_builds_both_interpolators() {
    let config = ShowcaseConfig::load("fixtures/camera_paths/showcase.json").expect("load fixture");

    assert_eq!(config.showcase.scroll_pages, 3.0);
    assert_eq!(config.flythrough.min_progress_delta, 0.001);
    assert_eq!(config.starfield.density, 0.5);
    assert!(!config.starfield.warp_effect);

    let rig = config.camera_rig().expect("fixture waypoints are valid");
    assert_eq!(rig.ease(), SegmentEase::Linear);
    assert_eq!(rig.waypoints().len(), 3);

    let driver = config.flythrough_driver().expect("fixture map table is valid");
    assert_eq!(driver.path().segments(), 4, "three waypoints pad to seven control points");
}

#[test]
fn missing_fields_fall_back_to_defaults() {
    let config: ShowcaseConfig = serde_json::from_str("{}").expect("empty object parses");
    assert_eq!(config.starfield.speed, 0.7);
    assert_eq!(config.showcase.scroll_pages, 4.0);
    assert_eq!(config.flythrough.waypoints.len(), 19);
    config.camera_rig().expect("default showcase table is valid");
}

#[test]
fn load_or_default_survives_a_missing_file() {
    let config = ShowcaseConfig::load_or_default("does/not/exist.json");
    assert_eq!(config.showcase.waypoints.len(), 4);
}

#[test]
fn malformed_json_reports_the_path() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(b"{ not json").expect("write");
    let err = ShowcaseConfig::load(file.path()).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("Failed to parse"), "unexpected error: {message}");
}

#[test]
fn unsorted_waypoint_table_is_rejected_at_build_time() {
    let json = r#"{
        "showcase": {
            "waypoints": [
                { "progress": 0.8, "position": [0, 0, 0], "look_at": [0, 0, 0] },
                { "progress": 0.2, "position": [1, 1, 1], "look_at": [0, 0, 0] }
            ]
        }
    }"#;
    let config: ShowcaseConfig = serde_json::from_str(json).expect("structurally valid");
    let err = config.camera_rig().unwrap_err();
    assert!(err.to_string().contains("sorted"), "unexpected error: {err}");
}

#[test]
fn single_map_waypoint_is_rejected() {
    let json = r#"{
        "flythrough": {
            "waypoints": [
                { "center": [17.6, 59.8], "zoom": 12.0, "pitch": 24.0, "bearing": 17.0 }
            ]
        }
    }"#;
    let config: ShowcaseConfig = serde_json::from_str(json).expect("structurally valid");
    assert!(config.flythrough_driver().is_err());
}
