//! Transient user-facing notifications
//!
//! Every user action ends in a banner posted here. Banners are appended in
//! call order, stay visible for a fixed delay, fade, and are then removed.
//! Each banner runs on its own timer task.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::config::NotificationConfig;

/// Banner color scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Blue
    Info,
    /// Green
    Success,
    /// Red
    Error,
}

impl Severity {
    /// Parse a color name; anything unrecognized is treated as info
    pub fn from_color(color: &str) -> Self {
        match color.trim().to_ascii_lowercase().as_str() {
            "green" => Severity::Success,
            "red" => Severity::Error,
            _ => Severity::Info,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Severity::Info => "blue",
            Severity::Success => "green",
            Severity::Error => "red",
        }
    }

    /// Background color of the banner
    pub fn background(&self) -> &'static str {
        match self {
            Severity::Info => "#3b82f6",
            Severity::Success => "#10b981",
            Severity::Error => "#ef4444",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Visible,
    Fading,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub severity: Severity,
    pub phase: Phase,
    #[serde(skip)]
    pub posted_at: Instant,
}

#[derive(Clone)]
pub struct Notifier {
    config: NotificationConfig,
    area: Arc<Mutex<Vec<Notification>>>,
    shutdown: CancellationToken,
}

impl Notifier {
    pub fn new(config: NotificationConfig) -> Self {
        Self {
            config,
            area: Arc::new(Mutex::new(Vec::new())),
            shutdown: CancellationToken::new(),
        }
    }

    /// Append a banner and schedule its removal
    pub async fn notify(&self, message: impl Into<String>, severity: Severity) -> Uuid {
        let message = message.into();
        let id = Uuid::new_v4();

        match severity {
            Severity::Error => error!("[notify] {}", message),
            _ => info!("[notify] {}", message),
        }

        {
            let mut area = self.area.lock().await;
            area.push(Notification {
                id,
                message,
                severity,
                phase: Phase::Visible,
                posted_at: Instant::now(),
            });
        }

        let area = Arc::clone(&self.area);
        let shutdown = self.shutdown.clone();
        let visible = self.config.visible();
        let fade = self.config.fade();

        tokio::spawn(async move {
            tokio::select! {
                _ = shutdown.cancelled() => return,
                _ = Self::dismiss(area, id, visible, fade) => {}
            }
        });

        id
    }

    async fn dismiss(
        area: Arc<Mutex<Vec<Notification>>>,
        id: Uuid,
        visible: Duration,
        fade: Duration,
    ) {
        tokio::time::sleep(visible).await;
        {
            let mut area = area.lock().await;
            if let Some(n) = area.iter_mut().find(|n| n.id == id) {
                n.phase = Phase::Fading;
            }
        }

        tokio::time::sleep(fade).await;
        let mut area = area.lock().await;
        area.retain(|n| n.id != id);
        debug!("Notification {} removed", id);
    }

    /// Banners currently in the notification area, oldest first
    pub async fn visible(&self) -> Vec<Notification> {
        self.area.lock().await.clone()
    }

    /// Cancel all pending dismissal timers; banners stay where they are
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}
