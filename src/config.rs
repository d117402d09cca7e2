use crate::camera_rig::{CameraRig, PathWaypoint, SegmentEase};
use crate::flythrough::{FlythroughDriver, FlythroughPath, MapWaypoint};
use crate::starfield::StarfieldOptions;
use anyhow::{ensure, Context, Result};
use glam::{DVec2, Vec3};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PathWaypointFile {
    pub progress: f32,
    pub position: [f32; 3],
    pub look_at: [f32; 3],
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MapWaypointFile {
    pub center: [f64; 2],
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentEaseFile {
    Linear,
    SmoothStep,
}

fn convert_ease(file: SegmentEaseFile) -> SegmentEase {
    match file {
        SegmentEaseFile::Linear => SegmentEase::Linear,
        SegmentEaseFile::SmoothStep => SegmentEase::SmoothStep,
    }
}

/// Exploded-view showcase section: a sticky section `scroll_pages` viewports
/// tall driving the linear camera rig.
#[derive(Debug, Clone, Deserialize)]
pub struct ShowcaseSectionConfig {
    #[serde(default = "ShowcaseSectionConfig::default_scroll_pages")]
    pub scroll_pages: f32,
    #[serde(default = "ShowcaseSectionConfig::default_ease")]
    pub ease: SegmentEaseFile,
    #[serde(default = "ShowcaseSectionConfig::default_waypoints")]
    pub waypoints: Vec<PathWaypointFile>,
}

impl ShowcaseSectionConfig {
    const fn default_scroll_pages() -> f32 {
        4.0
    }

    const fn default_ease() -> SegmentEaseFile {
        SegmentEaseFile::SmoothStep
    }

    fn default_waypoints() -> Vec<PathWaypointFile> {
        vec![
            PathWaypointFile { progress: 0.0, position: [2.0, 2.0, 4.0], look_at: [0.0, 0.23, 0.0] },
            PathWaypointFile { progress: 0.33, position: [-0.17, 0.98, 2.04], look_at: [0.0, 0.23, 0.0] },
            PathWaypointFile { progress: 0.66, position: [-0.32, 0.49, -1.96], look_at: [0.0, 0.23, 0.0] },
            PathWaypointFile { progress: 1.0, position: [2.46, 0.87, -3.29], look_at: [0.0, 0.23, 0.0] },
        ]
    }
}

impl Default for ShowcaseSectionConfig {
    fn default() -> Self {
        Self {
            scroll_pages: Self::default_scroll_pages(),
            ease: Self::default_ease(),
            waypoints: Self::default_waypoints(),
        }
    }
}

/// Venue-map flythrough section: the spline path, its sticky scroll height
/// and the redundant-update gate for applying poses to the map view.
#[derive(Debug, Clone, Deserialize)]
pub struct FlythroughSectionConfig {
    #[serde(default = "FlythroughSectionConfig::default_scroll_pages")]
    pub scroll_pages: f32,
    /// Progress moves smaller than this skip the map jump for the frame.
    #[serde(default = "FlythroughSectionConfig::default_min_progress_delta")]
    pub min_progress_delta: f32,
    #[serde(default = "FlythroughSectionConfig::default_waypoints")]
    pub waypoints: Vec<MapWaypointFile>,
}

impl FlythroughSectionConfig {
    const fn default_scroll_pages() -> f32 {
        5.0
    }

    const fn default_min_progress_delta() -> f32 {
        5e-4
    }

    fn default_waypoints() -> Vec<MapWaypointFile> {
        vec![
            MapWaypointFile { center: [17.634663, 59.845666], zoom: 12.0, pitch: 24.0, bearing: 17.0 },
            MapWaypointFile { center: [17.633594, 59.849386], zoom: 12.8, pitch: 30.0, bearing: 45.0 },
            MapWaypointFile { center: [17.632487, 59.851849], zoom: 13.6, pitch: 48.0, bearing: 94.0 },
            MapWaypointFile { center: [17.637732, 59.849341], zoom: 15.1, pitch: 59.0, bearing: 119.0 },
            MapWaypointFile { center: [17.638425, 59.84686], zoom: 15.9, pitch: 63.0, bearing: 152.0 },
            MapWaypointFile { center: [17.637819, 59.844697], zoom: 16.9, pitch: 76.0, bearing: 170.0 },
            MapWaypointFile { center: [17.638519, 59.842928], zoom: 17.4, pitch: 80.0, bearing: 171.0 },
            MapWaypointFile { center: [17.639496, 59.840328], zoom: 17.7, pitch: 80.0, bearing: 171.0 },
            MapWaypointFile { center: [17.640123, 59.838603], zoom: 17.7, pitch: 80.0, bearing: 171.0 },
            MapWaypointFile { center: [17.644568, 59.839801], zoom: 17.7, pitch: 83.0, bearing: 77.0 },
            MapWaypointFile { center: [17.647874, 59.840329], zoom: 17.7, pitch: 83.0, bearing: 77.0 },
            MapWaypointFile { center: [17.648445, 59.839723], zoom: 17.7, pitch: 82.0, bearing: 133.0 },
            MapWaypointFile { center: [17.648402, 59.83919], zoom: 18.0, pitch: 84.0, bearing: 166.0 },
            MapWaypointFile { center: [17.648867, 59.83844], zoom: 18.0, pitch: 85.0, bearing: 163.0 },
            MapWaypointFile { center: [17.648706, 59.837716], zoom: 18.0, pitch: 84.0, bearing: 179.0 },
            MapWaypointFile { center: [17.648527, 59.837459], zoom: 18.4, pitch: 84.0, bearing: -162.0 },
            MapWaypointFile { center: [17.647161, 59.837425], zoom: 18.1, pitch: 84.0, bearing: -128.0 },
            MapWaypointFile { center: [17.646647, 59.837886], zoom: 18.1, pitch: 83.0, bearing: -98.0 },
            MapWaypointFile { center: [17.647362, 59.837941], zoom: 19.0, pitch: 83.0, bearing: -98.0 },
        ]
    }
}

impl Default for FlythroughSectionConfig {
    fn default() -> Self {
        Self {
            scroll_pages: Self::default_scroll_pages(),
            min_progress_delta: Self::default_min_progress_delta(),
            waypoints: Self::default_waypoints(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ShowcaseConfig {
    #[serde(default)]
    pub starfield: StarfieldOptions,
    #[serde(default)]
    pub showcase: ShowcaseSectionConfig,
    #[serde(default)]
    pub flythrough: FlythroughSectionConfig,
}

impl ShowcaseConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
        let cfg: Self = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(cfg)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                eprintln!("[config] load error: {err:?}. Falling back to defaults.");
                Self::default()
            }
        }
    }

    /// Validated linear rig for the showcase section.
    pub fn camera_rig(&self) -> Result<CameraRig> {
        let waypoints = build_path_waypoints(&self.showcase.waypoints)?;
        Ok(CameraRig::new(waypoints, convert_ease(self.showcase.ease)))
    }

    /// Validated spline driver for the flythrough section.
    pub fn flythrough_driver(&self) -> Result<FlythroughDriver> {
        let path = build_flythrough_path(&self.flythrough.waypoints)?;
        Ok(FlythroughDriver::new(path, self.flythrough.min_progress_delta))
    }
}

pub fn build_path_waypoints(raw: &[PathWaypointFile]) -> Result<Vec<PathWaypoint>> {
    ensure!(raw.len() >= 2, "showcase path needs at least two waypoints, got {}", raw.len());
    let mut waypoints: Vec<PathWaypoint> = Vec::with_capacity(raw.len());
    for (index, wp) in raw.iter().enumerate() {
        let progress = wp.progress;
        let position = Vec3::from_array(wp.position);
        let look_at = Vec3::from_array(wp.look_at);
        ensure!(
            progress.is_finite() && position.is_finite() && look_at.is_finite(),
            "showcase waypoint {index} contains a non-finite value"
        );
        if let Some(previous) = waypoints.last() {
            ensure!(
                previous.progress <= progress,
                "showcase waypoints must be sorted ascending by progress (index {index})"
            );
        }
        waypoints.push(PathWaypoint { progress, position, look_at });
    }
    Ok(waypoints)
}

pub fn build_flythrough_path(raw: &[MapWaypointFile]) -> Result<FlythroughPath> {
    let waypoints = raw
        .iter()
        .map(|wp| MapWaypoint {
            center: DVec2::from_array(wp.center),
            zoom: wp.zoom,
            pitch: wp.pitch,
            bearing: wp.bearing,
        })
        .collect();
    FlythroughPath::new(waypoints)
}
