use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::device::{CaptureDevice, MediaConstraints, MediaStream};
use super::ticker::{TickerStats, TimestampTicker};
use crate::config::CameraConfig;
use crate::notify::{Notifier, Severity};
use crate::view::{ViewState, STATUS_FAILED, STATUS_IDLE, STATUS_REQUESTING};

/// Observable lifecycle of the camera session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraStatus {
    Inactive,
    /// Permission request in flight
    Requesting,
    /// Stream attached and playing
    Active,
    /// Last request failed with this category
    Failed(String),
}

/// A registered permission request, answered by `CameraSession::complete`
#[derive(Debug)]
pub struct PendingRequest {
    token: CancellationToken,
}

#[derive(Default)]
struct SessionState {
    stream: Option<Box<dyn MediaStream>>,
    ticker: Option<TimestampTicker>,
    /// Present from the moment a request is issued until teardown
    token: Option<CancellationToken>,
}

/// Owns the single camera+microphone stream and the timestamp ticker
#[derive(Clone)]
pub struct CameraSession {
    config: CameraConfig,
    device: Arc<dyn CaptureDevice>,
    view: Arc<Mutex<ViewState>>,
    notifier: Notifier,
    state: Arc<Mutex<SessionState>>,
    status: Arc<watch::Sender<CameraStatus>>,
    tickers: Arc<TickerStats>,
}

impl CameraSession {
    pub fn new(
        config: CameraConfig,
        device: Arc<dyn CaptureDevice>,
        view: Arc<Mutex<ViewState>>,
        notifier: Notifier,
    ) -> Self {
        Self {
            config,
            device,
            view,
            notifier,
            state: Arc::new(Mutex::new(SessionState::default())),
            status: Arc::new(watch::Sender::new(CameraStatus::Inactive)),
            tickers: Arc::new(TickerStats::default()),
        }
    }

    pub fn constraints(&self) -> MediaConstraints {
        MediaConstraints {
            width: self.config.width,
            height: self.config.height,
            audio: self.config.audio,
        }
    }

    /// Start the session and wait for the permission answer
    ///
    /// Idempotent: while a stream is active or a request is pending nothing new
    /// is requested and no second ticker is spawned. Returns once the request
    /// has resolved and, on success, the preview is playing.
    pub async fn start(&self) {
        if let Some(pending) = self.begin().await {
            self.complete(pending).await;
        }
    }

    /// First half of `start`: spawn the ticker and register a request
    ///
    /// Returns `None` when a stream is active or a request is already in
    /// flight. Once this returns, `stop` will see and cancel the request.
    pub async fn begin(&self) -> Option<PendingRequest> {
        let mut state = self.state.lock().await;

        if state.ticker.is_none() {
            state.ticker = Some(
                TimestampTicker::spawn(
                    Arc::clone(&self.view),
                    self.config.ticker_interval(),
                    Arc::clone(&self.tickers),
                )
                .await,
            );
        }

        if state.stream.is_some() {
            debug!("Camera already running");
            return None;
        }

        self.view
            .lock()
            .await
            .camera_status
            .show(STATUS_REQUESTING);

        if state.token.is_some() {
            debug!("Camera permission request already pending");
            return None;
        }

        let token = CancellationToken::new();
        state.token = Some(token.clone());
        drop(state);

        self.status.send_replace(CameraStatus::Requesting);
        Some(PendingRequest { token })
    }

    /// Second half of `start`: ask the device and attach the stream
    pub async fn complete(&self, pending: PendingRequest) {
        let PendingRequest { token } = pending;

        let constraints = self.constraints();
        info!(
            "Requesting camera stream from {}: {}x{} (audio={})",
            self.device.name(),
            constraints.width,
            constraints.height,
            constraints.audio
        );

        // The request itself is never cancelled; a late answer is discarded below
        let result = self.device.open(&constraints).await;

        let mut state = self.state.lock().await;
        if token.is_cancelled() {
            drop(state);
            match result {
                Ok(mut stream) => {
                    warn!(
                        "Discarding stream {} granted after the session was stopped",
                        stream.id()
                    );
                    stream.stop_tracks();
                }
                Err(e) => debug!("Ignoring failure of a cancelled camera request: {}", e),
            }
            return;
        }

        let stream = match result {
            Ok(stream) => stream,
            Err(e) => {
                state.token = None;
                state.ticker = None;
                drop(state);

                error!("Camera access error ({}): {}", e.name(), e);
                self.view.lock().await.camera_status.show(STATUS_FAILED);
                self.status
                    .send_replace(CameraStatus::Failed(e.name().to_string()));
                self.notifier
                    .notify(
                        format!(
                            "Error accessing camera: {}. Please ensure camera permission is granted and the page is served over a secure connection (HTTPS).",
                            e.name()
                        ),
                        Severity::Error,
                    )
                    .await;
                return;
            }
        };

        let stream_id = stream.id().to_string();
        let mut dimensions = stream.dimensions();
        state.stream = Some(stream);
        self.view.lock().await.video.attach(&stream_id);
        drop(state);

        info!("Camera stream {} attached, waiting for metadata", stream_id);

        let loaded = loop {
            let current = *dimensions.borrow_and_update();
            if let Some(d) = current {
                break Some(d);
            }
            tokio::select! {
                _ = token.cancelled() => break None,
                changed = dimensions.changed() => {
                    if changed.is_err() {
                        break None;
                    }
                }
            }
        };

        let Some(loaded) = loaded else {
            warn!("Camera stream {} closed before its metadata loaded", stream_id);
            return;
        };

        {
            // Lock order is state, then view
            let state = self.state.lock().await;
            if token.is_cancelled() || state.stream.is_none() {
                return;
            }
            let mut view = self.view.lock().await;
            view.video.play(loaded);
            view.camera_status.hide();
        }

        self.status.send_replace(CameraStatus::Active);
        info!(
            "Camera stream {} playing at {}x{}",
            stream_id, loaded.width, loaded.height
        );
        self.notifier
            .notify("Camera feed started successfully.", Severity::Success)
            .await;
    }

    /// Tear the session down: cancel a pending request, stop every track,
    /// stop the ticker, detach the preview
    ///
    /// Returns false when there was nothing to stop. Recordings are not
    /// touched here; finalize them before calling this.
    pub async fn stop(&self) -> bool {
        let mut state = self.state.lock().await;
        if state.stream.is_none() && state.token.is_none() {
            return false;
        }

        if let Some(token) = state.token.take() {
            token.cancel();
        }

        if let Some(mut stream) = state.stream.take() {
            let tracks = stream.tracks().len();
            stream.stop_tracks();
            info!("Camera stream {} stopped ({} tracks)", stream.id(), tracks);
        } else {
            info!("Pending camera request cancelled");
        }

        state.ticker = None;

        {
            let mut view = self.view.lock().await;
            view.video.detach();
            view.camera_status.show(STATUS_IDLE);
        }
        drop(state);

        self.status.send_replace(CameraStatus::Inactive);
        true
    }

    /// Whether a stream is held (it may still be loading metadata)
    pub async fn is_active(&self) -> bool {
        self.state.lock().await.stream.is_some()
    }

    /// Run `f` against the active stream, if any
    pub async fn with_stream<R>(&self, f: impl FnOnce(&dyn MediaStream) -> R) -> Option<R> {
        let state = self.state.lock().await;
        state.stream.as_deref().map(|stream| f(stream))
    }

    pub fn status(&self) -> CameraStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CameraStatus> {
        self.status.subscribe()
    }

    /// Number of timestamp tickers alive; 0 or 1
    pub fn live_tickers(&self) -> usize {
        self.tickers.live()
    }

    /// Timestamp overlay writes since the session was created
    pub fn ticker_refreshes(&self) -> usize {
        self.tickers.refreshes()
    }
}
