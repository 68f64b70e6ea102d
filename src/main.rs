use anyhow::{Context, Result};
use clap::Parser;
use estate_keeper::{CameraStatus, CaptureKind, Config, Dashboard, SyntheticCamera};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Drive the estate dashboard against a synthetic camera
#[derive(Debug, Parser)]
#[command(name = "estate-keeper", version)]
struct Args {
    /// Config file (without extension); built-in defaults when missing
    #[arg(long, default_value = "config/estate-keeper")]
    config: String,

    /// How long to record the demo clip, in milliseconds
    #[arg(long, default_value_t = 1500)]
    record_ms: u64,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load_or_default(&args.config)?;

    info!("Estate Keeper v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded config: {}", cfg.service.name);
    info!(
        "Camera: {}x{} (audio={})",
        cfg.camera.width, cfg.camera.height, cfg.camera.audio
    );

    let capture_section = cfg.navigation.capture_section.clone();
    let landing_section = cfg.navigation.landing_section.clone();

    let dashboard = Dashboard::new(cfg, Arc::new(SyntheticCamera::granting())).await;

    dashboard
        .show_section(&capture_section)
        .await
        .context("Failed to open the capture page")?;

    let mut status = dashboard.camera().subscribe();
    status
        .wait_for(|s| matches!(s, CameraStatus::Active | CameraStatus::Failed(_)))
        .await
        .context("Camera session went away")?;

    dashboard.handle_capture(CaptureKind::Picture).await;
    dashboard.handle_capture(CaptureKind::Video).await;
    tokio::time::sleep(Duration::from_millis(args.record_ms)).await;
    dashboard.handle_capture(CaptureKind::Video).await;

    dashboard
        .show_section(&landing_section)
        .await
        .context("Failed to return to the landing section")?;

    info!("History holds {} items", dashboard.history().len().await);
    println!("{}", dashboard.history().to_json().await?);

    dashboard.shutdown().await;
    Ok(())
}
