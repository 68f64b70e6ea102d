use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::camera::{CameraSession, CaptureDevice};
use crate::capture::{CaptureController, CaptureKind, CaptureOutcome};
use crate::config::Config;
use crate::history::MediaHistory;
use crate::navigation::{NavigationError, NavigationMap, NavigationTarget};
use crate::notify::{Notifier, Severity};
use crate::view::{SidebarState, ViewState};

/// One page load of the estate dashboard
///
/// Owns the view model, the camera session, capture state, the media history
/// and the notification area. Construct it on load, call `shutdown` on unload.
#[derive(Clone)]
pub struct Dashboard {
    config: Arc<Config>,
    navigation: Arc<NavigationMap>,
    view: Arc<Mutex<ViewState>>,
    notifier: Notifier,
    camera: CameraSession,
    capture: CaptureController,
    history: MediaHistory,
}

impl Dashboard {
    /// Build the dashboard and show the landing section
    pub async fn new(config: Config, device: Arc<dyn CaptureDevice>) -> Self {
        let navigation = NavigationMap::from_config(&config.navigation);
        Self::with_navigation(config, navigation, device).await
    }

    pub async fn with_navigation(
        config: Config,
        navigation: NavigationMap,
        device: Arc<dyn CaptureDevice>,
    ) -> Self {
        info!(
            "Loading {} dashboard (device: {})",
            config.service.name,
            device.name()
        );

        let view = Arc::new(Mutex::new(ViewState::new(
            &navigation,
            config.navigation.viewport_width,
        )));
        let notifier = Notifier::new(config.notifications.clone());
        let history = MediaHistory::new(config.capture.filename_prefix.clone());
        let camera = CameraSession::new(
            config.camera.clone(),
            device,
            Arc::clone(&view),
            notifier.clone(),
        );
        let capture = CaptureController::new(
            config.capture.clone(),
            camera.clone(),
            Arc::clone(&view),
            history.clone(),
            notifier.clone(),
        );

        let dashboard = Self {
            config: Arc::new(config),
            navigation: Arc::new(navigation),
            view,
            notifier,
            camera,
            capture,
            history,
        };

        let landing = dashboard.navigation.landing().clone();
        if let Err(e) = dashboard.show_section(landing.as_str()).await {
            warn!("Landing section is not navigable: {}", e);
        }

        dashboard
    }

    /// Navigate to `id`
    ///
    /// Entering the capture page starts the camera in the background; any
    /// other destination stops it (finalizing a running recording first).
    pub async fn show_section(&self, id: &str) -> Result<(), NavigationError> {
        let target = match self.navigation.resolve(id) {
            Ok(target) => target,
            Err(e) => {
                warn!("Ignoring navigation: {}", e);
                return Err(e);
            }
        };

        let section = match target {
            NavigationTarget::Login => {
                debug!("Login is disabled; stopping camera only");
                self.stop_camera().await;
                return Ok(());
            }
            NavigationTarget::Capture(section) => {
                self.start_camera_in_background().await;
                section
            }
            NavigationTarget::Section(section) => {
                self.stop_camera().await;
                section
            }
        };

        let close_sidebar = {
            let mut view = self.view.lock().await;
            self.navigation.apply(&mut view, &section);
            view.viewport_width < self.config.navigation.mobile_breakpoint && view.sidebar.is_open()
        };

        if close_sidebar {
            self.toggle_mobile_menu().await;
        }

        debug!("Showing section {}", section);
        Ok(())
    }

    pub async fn toggle_mobile_menu(&self) -> SidebarState {
        let mut view = self.view.lock().await;
        view.sidebar = view.sidebar.toggled();
        debug!("Mobile sidebar {:?}", view.sidebar);
        view.sidebar
    }

    pub async fn set_viewport_width(&self, width: u32) {
        self.view.lock().await.viewport_width = width;
    }

    /// Start the camera without waiting for the permission answer
    ///
    /// The request is registered before this returns, so a `stop_camera`
    /// issued right after cancels it. `None` if nothing new was requested.
    pub async fn start_camera_in_background(&self) -> Option<JoinHandle<()>> {
        let pending = self.camera.begin().await?;
        let camera = self.camera.clone();
        Some(tokio::spawn(async move { camera.complete(pending).await }))
    }

    pub async fn start_camera(&self) {
        self.camera.start().await;
    }

    /// Stop the camera session; a running recording is saved before the
    /// stream goes away. No-op when the camera is already stopped.
    pub async fn stop_camera(&self) {
        if self.capture.is_recording().await {
            self.capture.stop_recording().await;
        }
        self.camera.stop().await;
    }

    pub async fn handle_capture(&self, kind: CaptureKind) -> CaptureOutcome {
        self.capture.handle(kind).await
    }

    /// Mock logout: clears the session flag and stops the camera
    pub async fn handle_logout(&self) {
        self.view.lock().await.authenticated = false;
        self.stop_camera().await;
        self.notifier
            .notify("Mock Logout: Application state reset.", Severity::Info)
            .await;
    }

    /// Mock export; only reports what it would do
    pub async fn handle_export(&self, kind: &str) {
        self.notifier
            .notify(
                format!(
                    "Mock: Preparing to export all estate data to {}...",
                    kind.to_uppercase()
                ),
                Severity::Info,
            )
            .await;
    }

    /// Page unload: release the camera and cancel notification timers
    pub async fn shutdown(&self) {
        info!("Unloading dashboard");
        self.stop_camera().await;
        self.notifier.shutdown();
    }

    /// Snapshot of the view model
    pub async fn view(&self) -> ViewState {
        self.view.lock().await.clone()
    }

    pub fn navigation(&self) -> &NavigationMap {
        &self.navigation
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn camera(&self) -> &CameraSession {
        &self.camera
    }

    pub fn capture(&self) -> &CaptureController {
        &self.capture
    }

    pub fn history(&self) -> &MediaHistory {
        &self.history
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
