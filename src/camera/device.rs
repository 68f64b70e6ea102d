use image::RgbImage;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};

/// Requested stream shape (combined audio+video)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaConstraints {
    /// Video width in pixels
    pub width: u32,
    /// Video height in pixels
    pub height: u32,
    /// Request a microphone track too
    pub audio: bool,
}

impl Default for MediaConstraints {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            audio: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackKind {
    Audio,
    Video,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackInfo {
    pub kind: TrackKind,
    pub label: String,
    pub live: bool,
}

/// Native resolution reported by a stream once its metadata is loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoDimensions {
    pub width: u32,
    pub height: u32,
}

/// Why a capture device refused to hand out a stream
///
/// The variants mirror the failure categories reported by platform media
/// APIs. Behaviorally they are all the same (no stream is stored); the
/// category only feeds the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    #[error("permission to use the camera or microphone was denied")]
    NotAllowed,
    #[error("no camera or microphone is available")]
    NotFound,
    #[error("the camera is in use or could not be read")]
    NotReadable,
    #[error("no device satisfies the requested constraints")]
    Overconstrained,
    #[error("media capture is blocked in an insecure context")]
    Security,
    #[error("the capture request was aborted")]
    Aborted,
    #[error("{name}: {message}")]
    Other { name: String, message: String },
}

impl CaptureError {
    /// Failure category as platform media APIs name it
    pub fn name(&self) -> &str {
        match self {
            CaptureError::NotAllowed => "NotAllowedError",
            CaptureError::NotFound => "NotFoundError",
            CaptureError::NotReadable => "NotReadableError",
            CaptureError::Overconstrained => "OverconstrainedError",
            CaptureError::Security => "SecurityError",
            CaptureError::Aborted => "AbortError",
            CaptureError::Other { name, .. } => name.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecorderError {
    #[error("recording is not supported: {0}")]
    Unsupported(String),
    #[error("stream has no live tracks")]
    InactiveStream,
    #[error("recorder was already started")]
    AlreadyStarted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecorderState {
    Inactive,
    Recording,
}

/// Capture device backend
///
/// Implementations:
/// - `SyntheticCamera`: generated frames and recorder chunks (demo, tests)
#[async_trait::async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Ask for a stream. Resolves once the user grants or denies access.
    async fn open(
        &self,
        constraints: &MediaConstraints,
    ) -> Result<Box<dyn MediaStream>, CaptureError>;

    /// Get device name for logging
    fn name(&self) -> &str;
}

/// A live audio+video stream handed out by a `CaptureDevice`
pub trait MediaStream: Send + Sync {
    fn id(&self) -> &str;

    fn tracks(&self) -> Vec<TrackInfo>;

    /// Stop every track. Stopping twice is harmless.
    fn stop_tracks(&mut self);

    fn is_live(&self) -> bool {
        self.tracks().iter().any(|t| t.live)
    }

    /// Resolves to `Some` once the stream knows its native resolution
    fn dimensions(&self) -> watch::Receiver<Option<VideoDimensions>>;

    /// Current video frame at native resolution
    fn current_frame(&self) -> Option<RgbImage>;

    /// Build a recorder bound to this stream
    fn create_recorder(&self) -> Result<Box<dyn MediaRecorder>, RecorderError>;
}

/// Encodes a stream into container fragments
pub trait MediaRecorder: Send + Sync {
    /// Begin recording. Fragments arrive on the returned channel, which is
    /// closed after `stop` once the last fragment has been flushed.
    fn start(&mut self) -> Result<mpsc::Receiver<Vec<u8>>, RecorderError>;

    fn stop(&mut self);

    fn state(&self) -> RecorderState;

    /// Container type of the produced fragments
    fn mime_type(&self) -> &str;
}
