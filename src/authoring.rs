use crate::flythrough::MapPose;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, Serialize)]
struct RecordedWaypoint {
    center: [f64; 2],
    zoom: f64,
    pitch: f64,
    bearing: f64,
}

/// Authoring-only tool: collect live map poses into a waypoint table and
/// export it as config JSON. Kept out of playback builds entirely; the
/// runtime interpolators never reference it.
#[derive(Debug, Default)]
pub struct WaypointRecorder {
    recorded: Vec<RecordedWaypoint>,
}

impl WaypointRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots the current view pose as the next waypoint.
    pub fn capture(&mut self, pose: &MapPose) {
        self.recorded.push(RecordedWaypoint {
            center: [pose.center.x, pose.center.y],
            zoom: pose.zoom,
            pitch: pose.pitch,
            bearing: pose.bearing,
        });
    }

    pub fn len(&self) -> usize {
        self.recorded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recorded.is_empty()
    }

    pub fn clear(&mut self) {
        self.recorded.clear();
    }

    /// Waypoint table as pretty JSON, ready to paste into a config file.
    pub fn export_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.recorded).context("Serializing recorded waypoints")
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = self.export_json()?;
        std::fs::write(path, json).with_context(|| format!("Writing {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    #[test]
    fn captured_poses_export_as_a_table() {
        let mut recorder = WaypointRecorder::new();
        recorder.capture(&MapPose { center: DVec2::new(17.64, 59.84), zoom: 12.0, pitch: 24.0, bearing: 17.0 });
        recorder.capture(&MapPose { center: DVec2::new(17.65, 59.85), zoom: 15.0, pitch: 60.0, bearing: 94.0 });
        let json = recorder.export_json().expect("serializes");
        assert!(json.contains("17.64"));
        assert_eq!(recorder.len(), 2);
    }
}
