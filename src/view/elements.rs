use serde::Serialize;

use crate::camera::VideoDimensions;

pub const STATUS_IDLE: &str = "Camera Feed Not Started/Loading...";
pub const STATUS_REQUESTING: &str = "Awaiting camera permission...";
pub const STATUS_FAILED: &str = "Camera access denied or failed.";

/// Overlay text shown on top of the live preview
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusText {
    pub text: String,
    pub visible: bool,
}

impl Default for StatusText {
    fn default() -> Self {
        Self {
            text: STATUS_IDLE.to_string(),
            visible: true,
        }
    }
}

impl StatusText {
    pub fn show(&mut self, text: &str) {
        self.text = text.to_string();
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}

/// Media element readiness, ordered like `HTMLMediaElement.readyState`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
pub enum ReadyState {
    #[default]
    HaveNothing,
    HaveMetadata,
    HaveEnoughData,
}

/// Live preview element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VideoElement {
    /// Id of the attached stream
    pub source: Option<String>,
    pub ready_state: ReadyState,
    pub dimensions: Option<VideoDimensions>,
    pub playing: bool,
}

impl VideoElement {
    pub fn attach(&mut self, stream_id: &str) {
        self.source = Some(stream_id.to_string());
        self.ready_state = ReadyState::HaveNothing;
        self.dimensions = None;
        self.playing = false;
    }

    /// Metadata loaded and playback started
    pub fn play(&mut self, dimensions: VideoDimensions) {
        self.dimensions = Some(dimensions);
        self.ready_state = ReadyState::HaveEnoughData;
        self.playing = true;
    }

    pub fn detach(&mut self) {
        *self = Self::default();
    }

    pub fn is_ready(&self) -> bool {
        self.source.is_some() && self.ready_state == ReadyState::HaveEnoughData
    }
}

/// The single record/stop toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RecordButton {
    pub recording: bool,
}

impl RecordButton {
    pub fn label(&self) -> &'static str {
        if self.recording {
            "STOP Recording"
        } else {
            "Record Video"
        }
    }

    pub fn class(&self) -> &'static str {
        if self.recording {
            "btn-dark"
        } else {
            "btn-red"
        }
    }
}
