pub mod camera;
pub mod capture;
pub mod config;
pub mod dashboard;
pub mod history;
pub mod navigation;
pub mod notify;
pub mod timestamp;
pub mod view;

pub use camera::{
    CameraSession, CameraStatus, CaptureDevice, CaptureError, MediaConstraints, MediaRecorder,
    MediaStream, PermissionPrompt, RecorderError, SyntheticCamera,
};
pub use capture::{CaptureController, CaptureKind, CaptureOutcome, RecordedClip};
pub use config::Config;
pub use dashboard::Dashboard;
pub use history::{MediaHistory, MediaItem, MediaKind, MediaResource};
pub use navigation::{LinkId, NavigationError, NavigationMap, SectionId};
pub use notify::{Notification, Notifier, Severity};
pub use timestamp::CaptureTimestamp;
pub use view::{SidebarState, ViewState};
