// Shared helpers for dashboard integration tests

#![allow(dead_code)]

use anyhow::Result;
use estate_keeper::camera::{
    CaptureDevice, CaptureError, MediaConstraints, MediaRecorder, MediaStream, RecorderError,
    TrackInfo, TrackKind, VideoDimensions,
};
use estate_keeper::{CameraStatus, Config, Dashboard, Notification, Severity};
use image::RgbImage;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

pub const CAPTURE: &str = "media-capture-page";
pub const LANDING: &str = "dashboard";

pub async fn dashboard_with(device: impl CaptureDevice + 'static) -> Dashboard {
    Dashboard::new(Config::default(), Arc::new(device)).await
}

/// Wait until the camera session publishes `Active`
pub async fn wait_active(dashboard: &Dashboard) -> Result<()> {
    let mut status = dashboard.camera().subscribe();
    status.wait_for(|s| *s == CameraStatus::Active).await?;
    Ok(())
}

/// Poll `check` every 10ms (virtual time) until it holds
pub async fn wait_until<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    while !check().await {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

pub async fn errors(dashboard: &Dashboard) -> Vec<Notification> {
    dashboard
        .notifier()
        .visible()
        .await
        .into_iter()
        .filter(|n| n.severity == Severity::Error)
        .collect()
}

pub async fn last_notification(dashboard: &Dashboard) -> Option<Notification> {
    dashboard.notifier().visible().await.pop()
}

/// Device whose streams never report their dimensions
pub struct StalledCamera {
    dimensions: watch::Sender<Option<VideoDimensions>>,
}

impl StalledCamera {
    pub fn new() -> Self {
        Self {
            dimensions: watch::Sender::new(None),
        }
    }
}

#[async_trait::async_trait]
impl CaptureDevice for StalledCamera {
    async fn open(
        &self,
        _constraints: &MediaConstraints,
    ) -> Result<Box<dyn MediaStream>, CaptureError> {
        Ok(Box::new(StalledStream {
            dimensions: self.dimensions.subscribe(),
            live: true,
        }))
    }

    fn name(&self) -> &str {
        "stalled-camera"
    }
}

struct StalledStream {
    dimensions: watch::Receiver<Option<VideoDimensions>>,
    live: bool,
}

impl MediaStream for StalledStream {
    fn id(&self) -> &str {
        "stalled"
    }

    fn tracks(&self) -> Vec<TrackInfo> {
        vec![TrackInfo {
            kind: TrackKind::Video,
            label: "Stalled Video".to_string(),
            live: self.live,
        }]
    }

    fn stop_tracks(&mut self) {
        self.live = false;
    }

    fn dimensions(&self) -> watch::Receiver<Option<VideoDimensions>> {
        self.dimensions.clone()
    }

    fn current_frame(&self) -> Option<RgbImage> {
        None
    }

    fn create_recorder(&self) -> Result<Box<dyn MediaRecorder>, RecorderError> {
        Err(RecorderError::InactiveStream)
    }
}
