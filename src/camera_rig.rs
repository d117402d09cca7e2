use crate::camera3d::Camera3D;
use glam::Vec3;
use std::sync::Arc;

/// One control point of the showcase camera journey: at `progress` along the
/// scroll the camera sits at `position` looking at `look_at`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathWaypoint {
    pub progress: f32,
    pub position: Vec3,
    pub look_at: Vec3,
}

/// Interpolated camera pose for a single frame. Never persisted; the caller
/// owns the buffer and passes it back every tick to keep the hot path free
/// of allocation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

/// Blend curve applied within each waypoint segment. `Linear` is the plain
/// piecewise contract; `SmoothStep` eases the blend factor with
/// `t * t * (3 - 2t)` so the camera settles into each waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentEase {
    Linear,
    #[default]
    SmoothStep,
}

impl SegmentEase {
    #[inline]
    fn blend(self, t: f32) -> f32 {
        match self {
            SegmentEase::Linear => t,
            SegmentEase::SmoothStep => t * t * (3.0 - 2.0 * t),
        }
    }
}

/// Piecewise interpolator over an ordered waypoint table.
///
/// The table is read-only for the lifetime of the rig. It must hold at least
/// two waypoints sorted ascending by `progress`; that is a configuration
/// contract checked by `debug_assert!` here and validated with real errors
/// at the config-load boundary. Out-of-range progress clamps to the nearest
/// endpoint segment.
#[derive(Debug, Clone)]
pub struct CameraRig {
    waypoints: Arc<[PathWaypoint]>,
    ease: SegmentEase,
}

impl CameraRig {
    pub fn new(waypoints: impl Into<Arc<[PathWaypoint]>>, ease: SegmentEase) -> Self {
        let waypoints = waypoints.into();
        debug_assert!(waypoints.len() >= 2, "camera rig needs at least two waypoints");
        debug_assert!(
            waypoints.windows(2).all(|pair| pair[0].progress <= pair[1].progress),
            "camera rig waypoints must be sorted ascending by progress"
        );
        debug_assert!(
            waypoints
                .iter()
                .all(|wp| wp.progress.is_finite() && wp.position.is_finite() && wp.look_at.is_finite()),
            "camera rig waypoints must be finite"
        );
        Self { waypoints, ease }
    }

    pub fn waypoints(&self) -> &[PathWaypoint] {
        &self.waypoints
    }

    pub fn ease(&self) -> SegmentEase {
        self.ease
    }

    /// Writes the pose for `progress` into `out`. Position and look-at are
    /// interpolated independently per axis between the two bounding
    /// waypoints; a zero-width segment snaps to the later waypoint.
    pub fn sample_into(&self, progress: f32, out: &mut CameraPose) {
        let last = self.waypoints.len().saturating_sub(2);
        let mut index = 0;
        while index < last && progress > self.waypoints[index + 1].progress {
            index += 1;
        }

        let a = &self.waypoints[index];
        let b = &self.waypoints[(index + 1).min(self.waypoints.len() - 1)];
        let range = b.progress - a.progress;
        let t = if range <= 0.0 { 1.0 } else { ((progress - a.progress) / range).clamp(0.0, 1.0) };
        let blend = self.ease.blend(t);

        out.position = a.position + (b.position - a.position) * blend;
        out.look_at = a.look_at + (b.look_at - a.look_at) * blend;
    }

    /// Allocating convenience wrapper around [`CameraRig::sample_into`].
    pub fn sample(&self, progress: f32) -> CameraPose {
        let mut pose = CameraPose::default();
        self.sample_into(progress, &mut pose);
        pose
    }

    /// Applies the pose for `progress` onto the camera. Both fields come
    /// from the same progress read, so downstream consumers never see a
    /// position paired with a stale look-at.
    pub fn apply(&self, progress: f32, camera: &mut Camera3D) {
        let mut pose = CameraPose::default();
        self.sample_into(progress, &mut pose);
        camera.set_pose(pose.position, pose.look_at);
    }

    /// Pose of the first waypoint, used to seed the camera before the first
    /// scroll event arrives.
    pub fn start_pose(&self) -> CameraPose {
        let first = &self.waypoints[0];
        CameraPose { position: first.position, look_at: first.look_at }
    }

    /// Scroll-snap fractions for a sticky section `pages` viewports tall.
    /// The first waypoint is skipped (it is the section start); the rest map
    /// to fractions of the section's scrollable height.
    pub fn snap_progress_points(&self, pages: f32) -> Vec<f32> {
        if pages <= 1.0 {
            return Vec::new();
        }
        self.waypoints.iter().skip(1).map(|wp| wp.progress * (pages - 1.0) / pages).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_line() -> CameraRig {
        CameraRig::new(
            vec![
                PathWaypoint { progress: 0.0, position: Vec3::ZERO, look_at: Vec3::ZERO },
                PathWaypoint { progress: 1.0, position: Vec3::new(10.0, 0.0, 0.0), look_at: Vec3::ZERO },
            ],
            SegmentEase::Linear,
        )
    }

    #[test]
    fn midpoint_of_straight_segment() {
        let pose = straight_line().sample(0.5);
        assert_eq!(pose.position, Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn out_of_range_progress_clamps_to_endpoints() {
        let rig = straight_line();
        assert_eq!(rig.sample(-0.5).position, Vec3::ZERO);
        assert_eq!(rig.sample(1.5).position, Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn smoothstep_preserves_waypoint_endpoints() {
        let rig = CameraRig::new(
            vec![
                PathWaypoint { progress: 0.0, position: Vec3::ZERO, look_at: Vec3::ZERO },
                PathWaypoint { progress: 0.5, position: Vec3::Y, look_at: Vec3::ZERO },
                PathWaypoint { progress: 1.0, position: Vec3::X, look_at: Vec3::ZERO },
            ],
            SegmentEase::SmoothStep,
        );
        assert!(rig.sample(0.5).position.distance(Vec3::Y) < 1e-6);
    }

    #[test]
    fn snap_points_skip_first_waypoint() {
        let points = straight_line().snap_progress_points(4.0);
        assert_eq!(points.len(), 1);
        assert!((points[0] - 0.75).abs() < 1e-6);
    }
}
