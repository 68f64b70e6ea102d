// End-to-end dashboard scenarios: permission grant, captures, history order,
// mock logout and export

mod common;

use anyhow::Result;
use common::{dashboard_with, last_notification, wait_active, CAPTURE};
use estate_keeper::history::{Preview, PLACEHOLDER};
use estate_keeper::{CameraStatus, CaptureKind, MediaKind, Severity, SyntheticCamera};
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn test_grant_then_picture_then_video() -> Result<()> {
    let (camera, prompt) = SyntheticCamera::prompted();
    let dashboard = dashboard_with(camera).await;
    assert_eq!(dashboard.history().placeholder().await, Some(PLACEHOLDER));

    dashboard.show_section(CAPTURE).await?;
    assert_eq!(dashboard.camera().status(), CameraStatus::Requesting);

    prompt.grant();
    wait_active(&dashboard).await?;

    dashboard.handle_capture(CaptureKind::Picture).await;
    let items = dashboard.history().items().await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].card.title, "Picture");
    assert!(!items[0].resource.is_empty());
    assert!(!items[0].captured_at.is_empty());
    assert_eq!(dashboard.history().placeholder().await, None);

    dashboard.handle_capture(CaptureKind::Video).await;
    tokio::time::sleep(Duration::from_millis(750)).await;
    dashboard.handle_capture(CaptureKind::Video).await;

    let items = dashboard.history().items().await;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].kind, MediaKind::Video);
    assert!(!items[0].resource.url.is_empty());
    assert!(matches!(items[0].card.preview, Preview::Player { controls: true, .. }));
    assert_eq!(items[1].kind, MediaKind::Picture, "Picture is second-most-recent");
    assert!(matches!(items[1].card.preview, Preview::Image { .. }));

    dashboard.shutdown().await;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_cards_carry_download_links() -> Result<()> {
    let dashboard = dashboard_with(SyntheticCamera::granting()).await;
    dashboard.start_camera().await;

    dashboard.handle_capture(CaptureKind::Picture).await;
    dashboard.handle_capture(CaptureKind::Video).await;
    dashboard.handle_capture(CaptureKind::Video).await;

    let items = dashboard.history().items().await;
    let video = &items[0].card;
    let picture = &items[1].card;

    assert!(picture.download.filename.starts_with("EstateKeeper_"));
    assert!(picture.download.filename.ends_with(".jpeg"));
    assert_eq!(picture.download.label, "Download Image");
    assert_eq!(picture.download.href, items[1].resource.url);
    assert!(picture.caption.starts_with("Captured: "));

    assert!(video.download.filename.starts_with("EstateKeeper_"));
    assert!(video.download.filename.ends_with(".webm"));
    assert_eq!(video.download.label, "Download Video");

    for card in [video, picture] {
        let stem = card.download.filename.trim_start_matches("EstateKeeper_");
        let stem = stem.rsplit_once('.').unwrap().0;
        assert!(!stem.contains(':') && !stem.contains('.'), "{}", stem);
    }

    let json = dashboard.history().to_json().await?;
    assert!(json.contains("Download Video"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_mock_logout_resets_state() -> Result<()> {
    let camera = SyntheticCamera::granting();
    let stats = camera.stats();
    let dashboard = dashboard_with(camera).await;
    dashboard.start_camera().await;

    dashboard.handle_logout().await;

    assert!(!dashboard.view().await.authenticated);
    assert!(!dashboard.camera().is_active().await);
    assert_eq!(stats.live_tracks(), 0);

    let last = last_notification(&dashboard).await.unwrap();
    assert_eq!(last.severity, Severity::Info);
    assert_eq!(last.message, "Mock Logout: Application state reset.");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_mock_export_notifies() {
    let dashboard = dashboard_with(SyntheticCamera::granting()).await;

    dashboard.handle_export("pdf").await;

    let last = last_notification(&dashboard).await.unwrap();
    assert_eq!(last.severity, Severity::Info);
    assert_eq!(
        last.message,
        "Mock: Preparing to export all estate data to PDF..."
    );
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_saves_running_recording() -> Result<()> {
    let camera = SyntheticCamera::granting();
    let stats = camera.stats();
    let dashboard = dashboard_with(camera).await;
    dashboard.start_camera().await;
    dashboard.handle_capture(CaptureKind::Video).await;

    dashboard.shutdown().await;

    assert_eq!(dashboard.history().len().await, 1);
    assert_eq!(stats.live_tracks(), 0);
    assert_eq!(dashboard.camera().live_tickers(), 0);
    Ok(())
}
