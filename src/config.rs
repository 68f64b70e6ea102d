use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub camera: CameraConfig,
    pub capture: CaptureConfig,
    pub navigation: NavigationConfig,
    pub notifications: NotificationConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "estate-keeper".to_string(),
        }
    }
}

/// Constraints for the combined audio+video capture stream
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Requested video width in pixels
    pub width: u32,
    /// Requested video height in pixels
    pub height: u32,
    /// Whether to request a microphone track alongside the camera
    pub audio: bool,
    /// Refresh period of the timestamp overlay
    pub ticker_interval_ms: u64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            audio: true,
            ticker_interval_ms: 1000,
        }
    }
}

impl CameraConfig {
    pub fn ticker_interval(&self) -> Duration {
        Duration::from_millis(self.ticker_interval_ms.max(1))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// JPEG quality (1-100) for picture snapshots
    pub jpeg_quality: u8,
    /// Prefix for generated download file names
    pub filename_prefix: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: 92,
            filename_prefix: "EstateKeeper".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Section shown on load; the back button is hidden only here
    pub landing_section: String,
    /// Section hosting the live camera preview
    pub capture_section: String,
    /// Reserved identifier of the removed login screen
    pub login_section: String,
    /// Viewports narrower than this close the open sidebar on navigation
    pub mobile_breakpoint: u32,
    /// Initial viewport width in logical pixels
    pub viewport_width: u32,
    /// Every navigable section, in sidebar order
    pub sections: Vec<String>,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            landing_section: "dashboard".to_string(),
            capture_section: "media-capture-page".to_string(),
            login_section: "login".to_string(),
            mobile_breakpoint: 1024,
            viewport_width: 1280,
            sections: [
                "dashboard",
                "properties",
                "tenants",
                "maintenance",
                "media-capture-page",
                "reports",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl NavigationConfig {
    /// Landing and capture must be navigable sections; login must not be
    pub fn validate(&self) -> Result<()> {
        for (role, id) in [
            ("landing_section", &self.landing_section),
            ("capture_section", &self.capture_section),
        ] {
            anyhow::ensure!(
                self.sections.contains(id),
                "{} '{}' is not listed in navigation.sections",
                role,
                id
            );
        }
        anyhow::ensure!(
            !self.sections.contains(&self.login_section),
            "login_section '{}' must not be a navigable section",
            self.login_section
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// How long a banner stays fully visible
    pub visible_ms: u64,
    /// Fade-out duration before the banner is removed
    pub fade_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            visible_ms: 3000,
            fade_ms: 500,
        }
    }
}

impl NotificationConfig {
    pub fn visible(&self) -> Duration {
        Duration::from_millis(self.visible_ms)
    }

    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()
            .with_context(|| format!("Failed to read config: {}", path))?;

        Self::from_settings(settings, path)
    }

    /// Load `path` if it exists, otherwise fall back to built-in defaults
    pub fn load_or_default(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .build()
            .with_context(|| format!("Failed to read config: {}", path))?;

        Self::from_settings(settings, path)
    }

    fn from_settings(settings: config::Config, path: &str) -> Result<Self> {
        let cfg: Self = settings
            .try_deserialize()
            .context("Failed to parse config")?;

        cfg.navigation
            .validate()
            .with_context(|| format!("Invalid navigation config: {}", path))?;

        Ok(cfg)
    }
}
