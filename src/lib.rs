#[cfg(feature = "authoring")]
pub mod authoring;
pub mod camera3d;
pub mod camera_rig;
pub mod config;
pub mod flythrough;
pub mod paint;
pub mod scroll;
pub mod starfield;
pub mod time;

pub use camera3d::Camera3D;
pub use camera_rig::{CameraPose, CameraRig, PathWaypoint, SegmentEase};
pub use config::ShowcaseConfig;
pub use flythrough::{FlythroughDriver, FlythroughPath, MapPose, MapView, MapWaypoint};
pub use paint::{Pixmap, StarPainter};
pub use scroll::{ScrollRange, ScrollTimeline};
pub use starfield::{Star, Starfield, StarfieldOptions, StarShape};
pub use time::FrameClock;
