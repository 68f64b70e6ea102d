//! Camera session management
//!
//! This module provides:
//! - The capture device boundary (`CaptureDevice`, `MediaStream`, `MediaRecorder`)
//! - `CameraSession`, owner of the single live stream and the timestamp ticker
//! - `SyntheticCamera`, a generated-frame device for the demo and tests

mod device;
mod session;
mod synthetic;
mod ticker;

pub use device::{
    CaptureDevice, CaptureError, MediaConstraints, MediaRecorder, MediaStream, RecorderError,
    RecorderState, TrackInfo, TrackKind, VideoDimensions,
};
pub use session::{CameraSession, CameraStatus, PendingRequest};
pub use synthetic::{DeviceStats, PermissionDecision, PermissionPrompt, SyntheticCamera};
pub use ticker::{overlay_text, TickerStats, TimestampTicker};
