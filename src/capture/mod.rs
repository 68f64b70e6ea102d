//! Picture snapshots and video recording
//!
//! Both operations need an active camera session. A picture grabs the current
//! frame, stamps it with the capture time, and encodes it as JPEG. Video is a
//! single toggle: the first call starts a recorder on the live stream, the
//! next one finalizes the buffered fragments into one clip. Every outcome is
//! reported through the notifier; results land in the media history.

mod picture;
mod recording;
mod stamp;

pub use picture::{stamp_and_encode, stamp_label, PictureError, PICTURE_MIME};
pub use recording::{ActiveRecording, RecordedClip};
pub use stamp::{draw_text, fill_rect, stamp};

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::camera::CameraSession;
use crate::config::CaptureConfig;
use crate::history::{MediaHistory, MediaKind, MediaResource};
use crate::notify::{Notifier, Severity};
use crate::timestamp::CaptureTimestamp;
use crate::view::ViewState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureKind {
    Picture,
    Video,
}

/// What a capture request ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    PictureSaved,
    RecordingStarted,
    RecordingSaved,
    Rejected,
}

/// Recorder lifecycle; `Finalizing` covers the wait for the last fragment
enum RecordingSlot {
    Idle,
    Recording(ActiveRecording),
    Finalizing,
}

#[derive(Clone)]
pub struct CaptureController {
    config: CaptureConfig,
    camera: CameraSession,
    view: Arc<Mutex<ViewState>>,
    history: MediaHistory,
    notifier: Notifier,
    recording: Arc<Mutex<RecordingSlot>>,
    /// Held while a clip is being finalized
    finishing: Arc<Mutex<()>>,
}

impl CaptureController {
    pub fn new(
        config: CaptureConfig,
        camera: CameraSession,
        view: Arc<Mutex<ViewState>>,
        history: MediaHistory,
        notifier: Notifier,
    ) -> Self {
        Self {
            config,
            camera,
            view,
            history,
            notifier,
            recording: Arc::new(Mutex::new(RecordingSlot::Idle)),
            finishing: Arc::new(Mutex::new(())),
        }
    }

    /// Entry point of the capture buttons
    pub async fn handle(&self, kind: CaptureKind) -> CaptureOutcome {
        if !self.camera.is_active().await {
            self.notifier
                .notify(
                    "Camera stream is not active. Please wait or ensure permissions are granted.",
                    Severity::Error,
                )
                .await;
            return CaptureOutcome::Rejected;
        }

        match kind {
            CaptureKind::Picture => self.capture_picture().await,
            CaptureKind::Video => self.toggle_recording().await,
        }
    }

    pub async fn capture_picture(&self) -> CaptureOutcome {
        if !self.view.lock().await.video.is_ready() {
            self.notifier
                .notify("Camera feed not ready.", Severity::Error)
                .await;
            return CaptureOutcome::Rejected;
        }

        let frame = self
            .camera
            .with_stream(|stream| stream.current_frame())
            .await
            .flatten();

        let ts = CaptureTimestamp::now();
        let label = stamp_label(&ts.formatted);

        let encoded = match frame {
            Some(frame) => stamp_and_encode(frame, &label, self.config.jpeg_quality),
            None => Err(PictureError::NoFrame),
        };

        match encoded {
            Ok(jpeg) => {
                let resource = MediaResource::data_url(PICTURE_MIME, jpeg);
                self.history
                    .add(resource, MediaKind::Picture, &ts.formatted)
                    .await;
                self.notifier
                    .notify("Picture captured and stamped!", Severity::Success)
                    .await;
                CaptureOutcome::PictureSaved
            }
            Err(e) => {
                error!("Picture capture failed: {}", e);
                self.notifier
                    .notify(format!("Picture capture failed: {}", e), Severity::Error)
                    .await;
                CaptureOutcome::Rejected
            }
        }
    }

    /// Record button: start when idle, save when recording, ignore while saving
    async fn toggle_recording(&self) -> CaptureOutcome {
        let slot = self.recording.lock().await;
        match *slot {
            RecordingSlot::Idle => {
                drop(slot);
                self.start_recording().await
            }
            RecordingSlot::Recording(_) => {
                drop(slot);
                self.stop_recording().await
            }
            RecordingSlot::Finalizing => {
                debug!("Ignoring record toggle while the clip is being saved");
                CaptureOutcome::Rejected
            }
        }
    }

    pub async fn start_recording(&self) -> CaptureOutcome {
        let mut slot = self.recording.lock().await;
        if !matches!(*slot, RecordingSlot::Idle) {
            warn!("Recording already in progress");
            return CaptureOutcome::Rejected;
        }

        let started = self
            .camera
            .with_stream(|stream| stream.create_recorder())
            .await
            .map(|recorder| recorder.and_then(ActiveRecording::start));

        match started {
            Some(Ok(active)) => {
                *slot = RecordingSlot::Recording(active);
                drop(slot);

                self.view.lock().await.record_button.recording = true;
                // Red matches the recording indicator
                self.notifier
                    .notify("Video recording started...", Severity::Error)
                    .await;
                CaptureOutcome::RecordingStarted
            }
            Some(Err(e)) => {
                drop(slot);
                error!("Recorder setup failed: {}", e);
                self.view.lock().await.record_button.recording = false;
                self.notifier
                    .notify(
                        format!(
                            "Video recording failed: {}. Recording is likely unsupported on this device.",
                            e
                        ),
                        Severity::Error,
                    )
                    .await;
                CaptureOutcome::Rejected
            }
            None => {
                drop(slot);
                self.notifier
                    .notify(
                        "Camera stream is not active. Please wait or ensure permissions are granted.",
                        Severity::Error,
                    )
                    .await;
                CaptureOutcome::Rejected
            }
        }
    }

    /// Finalize the running recording into a history clip
    ///
    /// No-op when idle. If another caller is already saving the clip, this
    /// waits for that to finish.
    pub async fn stop_recording(&self) -> CaptureOutcome {
        let finishing = self.finishing.lock().await;

        let active = {
            let mut slot = self.recording.lock().await;
            match std::mem::replace(&mut *slot, RecordingSlot::Finalizing) {
                RecordingSlot::Recording(active) => active,
                other => {
                    *slot = other;
                    return CaptureOutcome::Rejected;
                }
            }
        };

        let clip = active.finish().await;
        let ts = CaptureTimestamp::now();
        let resource = MediaResource::blob(&clip.mime, clip.bytes);

        self.history
            .add(resource, MediaKind::Video, &ts.formatted)
            .await;

        {
            // Button and slot flip together
            let mut slot = self.recording.lock().await;
            self.view.lock().await.record_button.recording = false;
            *slot = RecordingSlot::Idle;
        }
        drop(finishing);

        info!(
            "Video clip saved ({} fragments, {} ms)",
            clip.fragments,
            (clip.stopped_at - clip.started_at).num_milliseconds()
        );
        self.notifier
            .notify("Video recording stopped and saved.", Severity::Success)
            .await;

        CaptureOutcome::RecordingSaved
    }

    /// True from start until the clip is saved
    pub async fn is_recording(&self) -> bool {
        !matches!(*self.recording.lock().await, RecordingSlot::Idle)
    }
}
