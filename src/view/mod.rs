//! In-memory page model
//!
//! `ViewState` stands in for the markup the controller drives: which section
//! and sidebar link are marked active, the back button, the mobile sidebar,
//! and the capture page widgets. Nothing here talks to devices; the
//! dashboard and camera session mutate it and tests read it back.

mod elements;
mod sidebar;

pub use elements::{
    ReadyState, RecordButton, StatusText, VideoElement, STATUS_FAILED, STATUS_IDLE,
    STATUS_REQUESTING,
};
pub use sidebar::SidebarState;

use serde::Serialize;

use crate::navigation::{LinkId, NavigationMap, SectionId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionView {
    pub id: SectionId,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkView {
    pub id: LinkId,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewState {
    pub sections: Vec<SectionView>,
    pub links: Vec<LinkView>,
    pub back_button_visible: bool,
    pub sidebar: SidebarState,
    pub viewport_width: u32,
    pub authenticated: bool,
    pub camera_status: StatusText,
    /// Text of the live timestamp overlay; empty until a session starts
    pub timestamp_overlay: String,
    pub video: VideoElement,
    pub record_button: RecordButton,
}

impl ViewState {
    pub fn new(navigation: &NavigationMap, viewport_width: u32) -> Self {
        Self {
            sections: navigation
                .sections()
                .map(|id| SectionView {
                    id: id.clone(),
                    visible: false,
                })
                .collect(),
            links: navigation
                .links()
                .map(|id| LinkView {
                    id: id.clone(),
                    active: false,
                })
                .collect(),
            back_button_visible: false,
            sidebar: SidebarState::Closed,
            viewport_width,
            authenticated: true,
            camera_status: StatusText::default(),
            timestamp_overlay: String::new(),
            video: VideoElement::default(),
            record_button: RecordButton::default(),
        }
    }

    pub fn visible_sections(&self) -> Vec<&SectionId> {
        self.sections
            .iter()
            .filter(|s| s.visible)
            .map(|s| &s.id)
            .collect()
    }

    pub fn active_links(&self) -> Vec<&LinkId> {
        self.links
            .iter()
            .filter(|l| l.active)
            .map(|l| &l.id)
            .collect()
    }

    pub fn set_visible_section(&mut self, target: &SectionId) {
        for section in &mut self.sections {
            section.visible = &section.id == target;
        }
    }

    pub fn set_active_link(&mut self, target: Option<&LinkId>) {
        for link in &mut self.links {
            link.active = Some(&link.id) == target;
        }
    }
}
