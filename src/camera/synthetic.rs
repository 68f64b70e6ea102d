// Synthetic capture device
//
// Stands in for a real camera: frames are a generated test pattern and the
// recorder emits small fake container fragments on a fixed interval.
// Permission can be granted automatically, denied with a fixed category, or
// held until a `PermissionPrompt` answers, which lets callers reproduce
// grants that arrive late.

use image::{Rgb, RgbImage};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

use super::device::{
    CaptureDevice, CaptureError, MediaConstraints, MediaRecorder, MediaStream, RecorderError,
    RecorderState, TrackInfo, TrackKind, VideoDimensions,
};

/// EBML magic that opens every WebM file
const WEBM_HEADER: [u8; 4] = [0x1A, 0x45, 0xDF, 0xA3];

/// Answer to a pending permission request
#[derive(Debug, Clone)]
pub enum PermissionDecision {
    Grant,
    Deny(CaptureError),
}

/// Answers permission requests of a prompted `SyntheticCamera`
#[derive(Clone)]
pub struct PermissionPrompt {
    tx: mpsc::UnboundedSender<PermissionDecision>,
}

impl PermissionPrompt {
    pub fn grant(&self) {
        let _ = self.tx.send(PermissionDecision::Grant);
    }

    pub fn deny(&self, error: CaptureError) {
        let _ = self.tx.send(PermissionDecision::Deny(error));
    }
}

/// Counters shared by a device and every stream it hands out
#[derive(Debug, Default)]
pub struct DeviceStats {
    requests: AtomicUsize,
    granted: AtomicUsize,
    live_tracks: AtomicUsize,
}

impl DeviceStats {
    /// Number of `open` calls received
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Number of streams handed out
    pub fn granted(&self) -> usize {
        self.granted.load(Ordering::SeqCst)
    }

    /// Tracks not yet stopped, across all streams
    pub fn live_tracks(&self) -> usize {
        self.live_tracks.load(Ordering::SeqCst)
    }
}

enum Policy {
    Grant,
    Deny(CaptureError),
    Prompt(Mutex<mpsc::UnboundedReceiver<PermissionDecision>>),
}

pub struct SyntheticCamera {
    name: String,
    policy: Policy,
    recorder_supported: bool,
    chunk_interval: Duration,
    stats: Arc<DeviceStats>,
}

impl SyntheticCamera {
    /// Device that grants every request immediately
    pub fn granting() -> Self {
        Self::with_policy(Policy::Grant)
    }

    /// Device that rejects every request with `error`
    pub fn denying(error: CaptureError) -> Self {
        Self::with_policy(Policy::Deny(error))
    }

    /// Device whose requests wait for an answer on the returned prompt
    pub fn prompted() -> (Self, PermissionPrompt) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self::with_policy(Policy::Prompt(Mutex::new(rx))),
            PermissionPrompt { tx },
        )
    }

    fn with_policy(policy: Policy) -> Self {
        Self {
            name: "synthetic-camera".to_string(),
            policy,
            recorder_supported: true,
            chunk_interval: Duration::from_millis(250),
            stats: Arc::new(DeviceStats::default()),
        }
    }

    /// Streams from this device refuse to build recorders
    pub fn without_recorder(mut self) -> Self {
        self.recorder_supported = false;
        self
    }

    /// Period between recorder fragments
    pub fn with_chunk_interval(mut self, interval: Duration) -> Self {
        self.chunk_interval = interval;
        self
    }

    pub fn stats(&self) -> Arc<DeviceStats> {
        Arc::clone(&self.stats)
    }

    async fn decide(&self) -> PermissionDecision {
        match &self.policy {
            Policy::Grant => PermissionDecision::Grant,
            Policy::Deny(error) => PermissionDecision::Deny(error.clone()),
            Policy::Prompt(rx) => {
                let mut rx = rx.lock().await;
                rx.recv()
                    .await
                    .unwrap_or(PermissionDecision::Deny(CaptureError::Aborted))
            }
        }
    }
}

#[async_trait::async_trait]
impl CaptureDevice for SyntheticCamera {
    async fn open(
        &self,
        constraints: &MediaConstraints,
    ) -> Result<Box<dyn MediaStream>, CaptureError> {
        self.stats.requests.fetch_add(1, Ordering::SeqCst);
        debug!(
            "Synthetic camera request: {}x{} (audio={})",
            constraints.width, constraints.height, constraints.audio
        );

        match self.decide().await {
            PermissionDecision::Grant => {
                self.stats.granted.fetch_add(1, Ordering::SeqCst);
                let stream = SyntheticStream::new(
                    constraints,
                    self.recorder_supported,
                    self.chunk_interval,
                    Arc::clone(&self.stats),
                );
                info!("Synthetic camera granted stream {}", stream.id);
                Ok(Box::new(stream))
            }
            PermissionDecision::Deny(error) => Err(error),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

struct SyntheticStream {
    id: String,
    tracks: Vec<TrackInfo>,
    /// Cleared once the tracks are stopped; recorders watch it
    live: Arc<AtomicBool>,
    dimensions: watch::Sender<Option<VideoDimensions>>,
    size: VideoDimensions,
    recorder_supported: bool,
    chunk_interval: Duration,
    stats: Arc<DeviceStats>,
}

impl SyntheticStream {
    fn new(
        constraints: &MediaConstraints,
        recorder_supported: bool,
        chunk_interval: Duration,
        stats: Arc<DeviceStats>,
    ) -> Self {
        let mut tracks = vec![TrackInfo {
            kind: TrackKind::Video,
            label: "Synthetic Video".to_string(),
            live: true,
        }];
        if constraints.audio {
            tracks.push(TrackInfo {
                kind: TrackKind::Audio,
                label: "Synthetic Microphone".to_string(),
                live: true,
            });
        }
        stats.live_tracks.fetch_add(tracks.len(), Ordering::SeqCst);

        let size = VideoDimensions {
            width: constraints.width.max(1),
            height: constraints.height.max(1),
        };

        Self {
            id: Uuid::new_v4().to_string(),
            tracks,
            live: Arc::new(AtomicBool::new(true)),
            dimensions: watch::Sender::new(Some(size)),
            size,
            recorder_supported,
            chunk_interval,
            stats,
        }
    }
}

impl MediaStream for SyntheticStream {
    fn id(&self) -> &str {
        &self.id
    }

    fn tracks(&self) -> Vec<TrackInfo> {
        self.tracks.clone()
    }

    fn stop_tracks(&mut self) {
        for track in self.tracks.iter_mut().filter(|t| t.live) {
            track.live = false;
            self.stats.live_tracks.fetch_sub(1, Ordering::SeqCst);
        }
        self.live.store(false, Ordering::SeqCst);
    }

    fn dimensions(&self) -> watch::Receiver<Option<VideoDimensions>> {
        self.dimensions.subscribe()
    }

    fn current_frame(&self) -> Option<RgbImage> {
        if !self.is_live() {
            return None;
        }

        let VideoDimensions { width, height } = self.size;
        Some(RgbImage::from_fn(width, height, |x, y| {
            Rgb([
                (x * 255 / width) as u8,
                (y * 255 / height) as u8,
                ((x + y) % 256) as u8,
            ])
        }))
    }

    fn create_recorder(&self) -> Result<Box<dyn MediaRecorder>, RecorderError> {
        if !self.recorder_supported {
            return Err(RecorderError::Unsupported(
                "synthetic device built without a recorder".to_string(),
            ));
        }
        if !self.is_live() {
            return Err(RecorderError::InactiveStream);
        }

        Ok(Box::new(SyntheticRecorder {
            stream_id: self.id.clone(),
            stream_live: Arc::clone(&self.live),
            chunk_interval: self.chunk_interval,
            state: RecorderState::Inactive,
            stop: CancellationToken::new(),
        }))
    }
}

struct SyntheticRecorder {
    stream_id: String,
    stream_live: Arc<AtomicBool>,
    chunk_interval: Duration,
    state: RecorderState,
    stop: CancellationToken,
}

impl MediaRecorder for SyntheticRecorder {
    fn start(&mut self) -> Result<mpsc::Receiver<Vec<u8>>, RecorderError> {
        if self.state == RecorderState::Recording {
            return Err(RecorderError::AlreadyStarted);
        }

        let (tx, rx) = mpsc::channel(64);
        let stop = self.stop.clone();
        let interval = self.chunk_interval;
        let stream_id = self.stream_id.clone();
        let stream_live = Arc::clone(&self.stream_live);

        tokio::spawn(async move {
            let mut sequence = 0u32;
            let mut ticker =
                tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);

            if tx.send(WEBM_HEADER.to_vec()).await.is_err() {
                return;
            }

            loop {
                tokio::select! {
                    _ = stop.cancelled() => break,
                    _ = ticker.tick() => {
                        if !stream_live.load(Ordering::SeqCst) {
                            break;
                        }
                        let fragment = format!("{}:{};", stream_id, sequence).into_bytes();
                        sequence += 1;
                        if tx.send(fragment).await.is_err() {
                            return;
                        }
                    }
                }
            }

            // A stream stopped under the recorder loses its final flush.
            // Dropping `tx` closes the channel either way.
            if stream_live.load(Ordering::SeqCst) {
                let _ = tx.send(format!("{}:end;", stream_id).into_bytes()).await;
                debug!("Synthetic recorder flushed {} fragments", sequence);
            } else {
                debug!("Stream {} stopped before the recorder flushed", stream_id);
            }
        });

        self.state = RecorderState::Recording;
        Ok(rx)
    }

    fn stop(&mut self) {
        self.stop.cancel();
        self.state = RecorderState::Inactive;
    }

    fn state(&self) -> RecorderState {
        self.state
    }

    fn mime_type(&self) -> &str {
        "video/webm"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn open_stream(camera: &SyntheticCamera) -> Box<dyn MediaStream> {
        match camera.open(&MediaConstraints::default()).await {
            Ok(stream) => stream,
            Err(e) => panic!("synthetic camera refused: {}", e),
        }
    }

    async fn collect(mut rx: mpsc::Receiver<Vec<u8>>) -> Vec<Vec<u8>> {
        let mut chunks = Vec::new();
        while let Some(chunk) = rx.recv().await {
            chunks.push(chunk);
        }
        chunks
    }

    #[tokio::test(start_paused = true)]
    async fn test_recorder_emits_one_fragment_per_interval() {
        let camera = SyntheticCamera::granting().with_chunk_interval(Duration::from_millis(100));
        let stream = open_stream(&camera).await;
        let mut recorder = stream.create_recorder().unwrap();
        assert_eq!(recorder.state(), RecorderState::Inactive);

        let rx = recorder.start().unwrap();
        assert_eq!(recorder.state(), RecorderState::Recording);
        assert_eq!(recorder.start().unwrap_err(), RecorderError::AlreadyStarted);

        tokio::time::sleep(Duration::from_millis(350)).await;
        recorder.stop();
        assert_eq!(recorder.state(), RecorderState::Inactive);

        let chunks = collect(rx).await;
        assert_eq!(chunks[0], WEBM_HEADER.to_vec());
        // Header, three fragments, final flush
        assert_eq!(chunks.len(), 5);
        assert!(String::from_utf8_lossy(&chunks[4]).ends_with(":end;"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_stream_loses_final_flush() {
        let camera = SyntheticCamera::granting();
        let mut stream = open_stream(&camera).await;
        let mut recorder = stream.create_recorder().unwrap();
        let rx = recorder.start().unwrap();

        stream.stop_tracks();
        recorder.stop();

        let chunks = collect(rx).await;
        assert!(chunks
            .iter()
            .all(|c| !String::from_utf8_lossy(c).ends_with(":end;")));
        assert_eq!(camera.stats().live_tracks(), 0);
    }

    #[tokio::test]
    async fn test_stopped_stream_refuses_recorder() {
        let camera = SyntheticCamera::granting();
        let mut stream = open_stream(&camera).await;
        stream.stop_tracks();

        assert!(stream.current_frame().is_none());
        assert_eq!(
            stream.create_recorder().err(),
            Some(RecorderError::InactiveStream)
        );
    }
}
