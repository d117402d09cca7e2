use anyhow::{ensure, Result};
use glam::DVec2;
use std::sync::Arc;

/// One control point of the map flythrough: geographic center (lng, lat),
/// zoom level, pitch and bearing in degrees. Bearings may wrap at +/-180.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapWaypoint {
    pub center: DVec2,
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
}

/// Interpolated map camera pose for a single frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapPose {
    pub center: DVec2,
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
}

/// Seam to the host map widget: an instantaneous pose set, not an animated
/// transition.
pub trait MapView {
    fn jump_to(&mut self, pose: &MapPose);
}

/// Uniform cubic B-spline basis. Approximating, not interpolating: interior
/// control points pull the curve without lying on it, trading positional
/// precision for C2 continuity. Acceptable for an aesthetic camera path.
#[inline]
fn bspline(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    ((1.0 - t) * (1.0 - t) * (1.0 - t) * p0
        + (3.0 * t3 - 6.0 * t2 + 4.0) * p1
        + (-3.0 * t3 + 3.0 * t2 + 3.0 * t + 1.0) * p2
        + t3 * p3)
        / 6.0
}

/// Rewrites a bearing sequence into a continuous (non-modular) one: each
/// value keeps the representation within 180 degrees of its predecessor, so
/// interpolation never takes the long way around a 360 wrap.
fn unwrap_bearings(bearings: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(bearings.len());
    let Some(&first) = bearings.first() else {
        return out;
    };
    out.push(first);
    for (i, &raw) in bearings.iter().enumerate().skip(1) {
        let mut diff = raw - bearings[i - 1];
        while diff > 180.0 {
            diff -= 360.0;
        }
        while diff < -180.0 {
            diff += 360.0;
        }
        let prev = out[i - 1];
        out.push(prev + diff);
    }
    out
}

/// Clamped cubic B-spline over a map waypoint table.
///
/// The control sequence is padded by duplicating the first and last waypoint
/// twice each so the curve starts and ends exactly on the real endpoints.
/// Bearings are unwrapped over the padded sequence up front; the duplicated
/// endpoints contribute a zero step, so they repeat the unwrapped value.
#[derive(Debug, Clone)]
pub struct FlythroughPath {
    padded: Arc<[MapWaypoint]>,
    bearings: Arc<[f64]>,
    first: MapWaypoint,
}

impl FlythroughPath {
    pub fn new(waypoints: Vec<MapWaypoint>) -> Result<Self> {
        ensure!(waypoints.len() >= 2, "flythrough needs at least two waypoints, got {}", waypoints.len());
        for (index, wp) in waypoints.iter().enumerate() {
            ensure!(
                wp.center.is_finite() && wp.zoom.is_finite() && wp.pitch.is_finite() && wp.bearing.is_finite(),
                "flythrough waypoint {index} contains a non-finite value"
            );
        }

        let first = waypoints[0];
        let last = waypoints[waypoints.len() - 1];
        let mut padded = Vec::with_capacity(waypoints.len() + 4);
        padded.push(first);
        padded.push(first);
        padded.extend(waypoints);
        padded.push(last);
        padded.push(last);

        let raw: Vec<f64> = padded.iter().map(|wp| wp.bearing).collect();
        let bearings = unwrap_bearings(&raw);

        Ok(Self { padded: padded.into(), bearings: bearings.into(), first })
    }

    /// Number of spline segments spanning progress [0, 1].
    pub fn segments(&self) -> usize {
        self.padded.len() - 3
    }

    /// Pose of the first real waypoint, for the initial map view.
    pub fn start_pose(&self) -> MapPose {
        MapPose {
            center: self.first.center,
            zoom: self.first.zoom,
            pitch: self.first.pitch,
            bearing: self.first.bearing,
        }
    }

    /// Evaluates the padded spline at `progress` (clamped to [0, 1]). Every
    /// channel, including the unwrapped bearing, blends the same four
    /// control points with the same local parameter.
    pub fn sample(&self, progress: f32) -> MapPose {
        let segments = self.segments();
        let u = f64::from(progress.clamp(0.0, 1.0)) * segments as f64;
        let seg = (u as usize).min(segments - 1);
        let t = u - seg as f64;

        let w = &self.padded[seg..seg + 4];
        let b = &self.bearings[seg..seg + 4];
        MapPose {
            center: DVec2::new(
                bspline(w[0].center.x, w[1].center.x, w[2].center.x, w[3].center.x, t),
                bspline(w[0].center.y, w[1].center.y, w[2].center.y, w[3].center.y, t),
            ),
            zoom: bspline(w[0].zoom, w[1].zoom, w[2].zoom, w[3].zoom, t),
            pitch: bspline(w[0].pitch, w[1].pitch, w[2].pitch, w[3].pitch, t),
            bearing: bspline(b[0], b[1], b[2], b[3], t),
        }
    }
}

/// Applies sampled poses to a map view once per tick, suppressing jumps when
/// progress has not moved past the configured threshold. The very first
/// drive always applies so the view starts on the path.
#[derive(Debug, Clone)]
pub struct FlythroughDriver {
    path: FlythroughPath,
    min_progress_delta: f32,
    last_applied: Option<f32>,
}

impl FlythroughDriver {
    pub fn new(path: FlythroughPath, min_progress_delta: f32) -> Self {
        Self { path, min_progress_delta: min_progress_delta.max(0.0), last_applied: None }
    }

    pub fn path(&self) -> &FlythroughPath {
        &self.path
    }

    /// Reads progress once and either jumps the view to the sampled pose or
    /// skips the frame as redundant. Returns whether a jump was applied.
    pub fn drive(&mut self, progress: f32, view: &mut impl MapView) -> bool {
        if let Some(last) = self.last_applied {
            if (progress - last).abs() <= self.min_progress_delta {
                return false;
            }
        }
        let pose = self.path.sample(progress);
        view.jump_to(&pose);
        self.last_applied = Some(progress);
        true
    }
}
