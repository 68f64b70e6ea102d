// Integration tests for section navigation and the mobile sidebar

mod common;

use anyhow::Result;
use common::{dashboard_with, wait_active, CAPTURE, LANDING};
use estate_keeper::{LinkId, NavigationError, SectionId, SidebarState, SyntheticCamera};

#[tokio::test(start_paused = true)]
async fn test_landing_section_on_load() {
    let dashboard = dashboard_with(SyntheticCamera::granting()).await;
    let view = dashboard.view().await;

    assert_eq!(view.visible_sections(), vec![&SectionId::from(LANDING)]);
    assert_eq!(view.active_links(), vec![&LinkId::new("dashboard-link")]);
    assert!(!view.back_button_visible, "Back button hidden on landing");
    assert!(view.authenticated);
}

#[tokio::test(start_paused = true)]
async fn test_exactly_one_section_visible_for_every_target() -> Result<()> {
    let dashboard = dashboard_with(SyntheticCamera::granting()).await;
    let sections: Vec<SectionId> = dashboard.navigation().sections().cloned().collect();

    for section in &sections {
        dashboard.show_section(section.as_str()).await?;
        let view = dashboard.view().await;

        assert_eq!(view.visible_sections(), vec![section], "after {}", section);
        assert_eq!(view.active_links().len(), 1, "after {}", section);
        assert_eq!(
            view.active_links()[0],
            dashboard.navigation().link_for(section).unwrap()
        );
        assert_eq!(view.back_button_visible, section.as_str() != LANDING);
    }

    dashboard.shutdown().await;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_login_target_leaves_view_unchanged() -> Result<()> {
    let dashboard = dashboard_with(SyntheticCamera::granting()).await;
    dashboard.show_section("reports").await?;

    dashboard.show_section("login").await?;

    let view = dashboard.view().await;
    assert_eq!(view.visible_sections(), vec![&SectionId::from("reports")]);
    assert!(view.back_button_visible);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_login_target_stops_camera() -> Result<()> {
    let dashboard = dashboard_with(SyntheticCamera::granting()).await;
    dashboard.show_section(CAPTURE).await?;
    wait_active(&dashboard).await?;

    dashboard.show_section("login").await?;

    assert!(!dashboard.camera().is_active().await);
    let view = dashboard.view().await;
    assert_eq!(view.visible_sections(), vec![&SectionId::from(CAPTURE)]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_unknown_section_rejected() -> Result<()> {
    let dashboard = dashboard_with(SyntheticCamera::granting()).await;
    dashboard.show_section("tenants").await?;

    let result = dashboard.show_section("no-such-page").await;
    assert_eq!(
        result,
        Err(NavigationError::UnknownSection("no-such-page".to_string()))
    );

    let view = dashboard.view().await;
    assert_eq!(view.visible_sections(), vec![&SectionId::from("tenants")]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_leaving_capture_page_stops_camera() -> Result<()> {
    let dashboard = dashboard_with(SyntheticCamera::granting()).await;

    dashboard.show_section(CAPTURE).await?;
    wait_active(&dashboard).await?;
    assert!(dashboard.camera().is_active().await);

    dashboard.show_section("maintenance").await?;
    assert!(!dashboard.camera().is_active().await);

    let view = dashboard.view().await;
    assert!(view.video.source.is_none());
    assert!(view.camera_status.visible);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_toggle_twice_restores_closed_flags() {
    let dashboard = dashboard_with(SyntheticCamera::granting()).await;
    let before = dashboard.view().await.sidebar;
    assert_eq!(before, SidebarState::Closed);

    assert_eq!(dashboard.toggle_mobile_menu().await, SidebarState::Open);
    let open = dashboard.view().await.sidebar;
    assert_eq!(open.sidebar_class(), "translate-x-0");
    assert!(!open.overlay_hidden());
    assert!(open.body_scroll_locked());

    assert_eq!(dashboard.toggle_mobile_menu().await, SidebarState::Closed);
    let after = dashboard.view().await.sidebar;
    assert_eq!(after.sidebar_class(), before.sidebar_class());
    assert_eq!(after.overlay_hidden(), before.overlay_hidden());
    assert_eq!(after.body_scroll_locked(), before.body_scroll_locked());
}

#[tokio::test(start_paused = true)]
async fn test_navigation_closes_sidebar_on_narrow_viewport() -> Result<()> {
    let dashboard = dashboard_with(SyntheticCamera::granting()).await;
    dashboard.set_viewport_width(800).await;
    dashboard.toggle_mobile_menu().await;

    dashboard.show_section("properties").await?;

    assert_eq!(dashboard.view().await.sidebar, SidebarState::Closed);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_navigation_keeps_sidebar_on_wide_viewport() -> Result<()> {
    let dashboard = dashboard_with(SyntheticCamera::granting()).await;
    dashboard.set_viewport_width(1440).await;
    dashboard.toggle_mobile_menu().await;

    dashboard.show_section("properties").await?;

    assert_eq!(dashboard.view().await.sidebar, SidebarState::Open);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_navigation_leaves_closed_sidebar_closed() -> Result<()> {
    let dashboard = dashboard_with(SyntheticCamera::granting()).await;
    dashboard.set_viewport_width(600).await;

    dashboard.show_section("reports").await?;

    assert_eq!(dashboard.view().await.sidebar, SidebarState::Closed);
    Ok(())
}
