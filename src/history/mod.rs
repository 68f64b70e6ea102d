//! In-memory media history
//!
//! Captured pictures and clips are shown newest first as cards with a
//! preview and a download link. Nothing is persisted; the list lives as long
//! as the dashboard.

use base64::Engine;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::timestamp::CaptureTimestamp;

pub const PLACEHOLDER: &str = "No media captured yet.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MediaKind {
    Picture,
    Video,
}

impl MediaKind {
    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Picture => "Picture",
            MediaKind::Video => "Video",
        }
    }

    /// Extension of downloaded files
    pub fn extension(&self) -> &'static str {
        match self {
            MediaKind::Picture => "jpeg",
            MediaKind::Video => "webm",
        }
    }
}

/// Displayable media payload and the URL that refers to it
#[derive(Debug, Clone, Serialize)]
pub struct MediaResource {
    pub url: String,
    pub mime: String,
    #[serde(skip)]
    pub bytes: Arc<Vec<u8>>,
}

impl MediaResource {
    /// Inline `data:` URL carrying the bytes as base64
    pub fn data_url(mime: &str, bytes: Vec<u8>) -> Self {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
        Self {
            url: format!("data:{};base64,{}", mime, encoded),
            mime: mime.to_string(),
            bytes: Arc::new(bytes),
        }
    }

    /// Opaque `blob:` URL; the bytes stay in memory behind it
    pub fn blob(mime: &str, bytes: Vec<u8>) -> Self {
        Self {
            url: format!("blob:estate-keeper/{}", Uuid::new_v4()),
            mime: mime.to_string(),
            bytes: Arc::new(bytes),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Preview {
    Image { src: String, alt: String },
    Player { src: String, controls: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadLink {
    pub href: String,
    pub filename: String,
    pub label: String,
}

/// Presentation card for one history entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaCard {
    pub title: String,
    pub caption: String,
    pub preview: Preview,
    pub download: DownloadLink,
}

#[derive(Debug, Clone, Serialize)]
pub struct MediaItem {
    pub kind: MediaKind,
    pub resource: MediaResource,
    /// Human-readable capture time
    pub captured_at: String,
    pub card: MediaCard,
}

/// Download name: `<prefix>_<filesystem-safe timestamp>.<ext>`
pub fn download_name(prefix: &str, kind: MediaKind, ts: &CaptureTimestamp) -> String {
    format!("{}_{}.{}", prefix, ts.filename, kind.extension())
}

fn build_card(prefix: &str, kind: MediaKind, resource: &MediaResource, captured_at: &str) -> MediaCard {
    let href = resource.url.clone();
    let filename = download_name(prefix, kind, &CaptureTimestamp::now());

    let (preview, label) = match kind {
        MediaKind::Picture => (
            Preview::Image {
                src: href.clone(),
                alt: "Captured Image".to_string(),
            },
            "Download Image",
        ),
        MediaKind::Video => (
            Preview::Player {
                src: href.clone(),
                controls: true,
            },
            "Download Video",
        ),
    };

    MediaCard {
        title: kind.label().to_string(),
        caption: format!("Captured: {}", captured_at),
        preview,
        download: DownloadLink {
            href,
            filename,
            label: label.to_string(),
        },
    }
}

#[derive(Debug)]
struct HistoryState {
    placeholder: bool,
    items: VecDeque<MediaItem>,
}

#[derive(Clone)]
pub struct MediaHistory {
    prefix: String,
    state: Arc<Mutex<HistoryState>>,
}

impl MediaHistory {
    pub fn new(filename_prefix: impl Into<String>) -> Self {
        Self {
            prefix: filename_prefix.into(),
            state: Arc::new(Mutex::new(HistoryState {
                placeholder: true,
                items: VecDeque::new(),
            })),
        }
    }

    /// Prepend a card for `resource`; the first insert clears the placeholder
    pub async fn add(&self, resource: MediaResource, kind: MediaKind, captured_at: &str) -> MediaItem {
        let card = build_card(&self.prefix, kind, &resource, captured_at);
        let item = MediaItem {
            kind,
            resource,
            captured_at: captured_at.to_string(),
            card,
        };

        let mut state = self.state.lock().await;
        state.placeholder = false;
        state.items.push_front(item.clone());

        info!(
            "{} added to history ({} bytes, {} items)",
            kind.label(),
            item.resource.len(),
            state.items.len()
        );

        item
    }

    /// Items newest first
    pub async fn items(&self) -> Vec<MediaItem> {
        self.state.lock().await.items.iter().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.items.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.items.is_empty()
    }

    /// Placeholder text while nothing has been captured
    pub async fn placeholder(&self) -> Option<&'static str> {
        if self.state.lock().await.placeholder {
            Some(PLACEHOLDER)
        } else {
            None
        }
    }

    /// Cards newest first, as JSON
    pub async fn to_json(&self) -> serde_json::Result<String> {
        let state = self.state.lock().await;
        let cards: Vec<&MediaCard> = state.items.iter().map(|i| &i.card).collect();
        serde_json::to_string_pretty(&cards)
    }
}
