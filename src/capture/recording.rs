use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::camera::{MediaRecorder, RecorderError, RecorderState};

/// One finished recording, fragments concatenated in arrival order
#[derive(Debug, Clone)]
pub struct RecordedClip {
    pub bytes: Vec<u8>,
    pub mime: String,
    pub fragments: usize,
    pub started_at: DateTime<Utc>,
    pub stopped_at: DateTime<Utc>,
}

/// A recorder plus the task draining its fragments into a fresh buffer
pub struct ActiveRecording {
    recorder: Box<dyn MediaRecorder>,
    drain: JoinHandle<Vec<Vec<u8>>>,
    started_at: DateTime<Utc>,
}

impl ActiveRecording {
    pub fn start(mut recorder: Box<dyn MediaRecorder>) -> Result<Self, RecorderError> {
        let rx = recorder.start()?;
        let drain = tokio::spawn(Self::drain(rx));

        info!("Recording started ({})", recorder.mime_type());

        Ok(Self {
            recorder,
            drain,
            started_at: Utc::now(),
        })
    }

    async fn drain(mut rx: mpsc::Receiver<Vec<u8>>) -> Vec<Vec<u8>> {
        let mut chunks = Vec::new();
        while let Some(chunk) = rx.recv().await {
            if !chunk.is_empty() {
                chunks.push(chunk);
            }
        }
        chunks
    }

    /// Stop the recorder and wait for the last fragment
    pub async fn finish(mut self) -> RecordedClip {
        if self.recorder.state() == RecorderState::Recording {
            self.recorder.stop();
        }

        let chunks = match self.drain.await {
            Ok(chunks) => chunks,
            Err(e) => {
                error!("Recording drain task failed: {}", e);
                Vec::new()
            }
        };

        let clip = RecordedClip {
            fragments: chunks.len(),
            bytes: chunks.concat(),
            mime: self.recorder.mime_type().to_string(),
            started_at: self.started_at,
            stopped_at: Utc::now(),
        };

        info!(
            "Recording finished: {} fragments, {} bytes",
            clip.fragments,
            clip.bytes.len()
        );

        clip
    }
}
