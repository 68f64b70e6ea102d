use serde::{Deserialize, Serialize};

/// Mobile sidebar position
///
/// The visual classes are derived from this value, never read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SidebarState {
    /// Off-canvas
    #[default]
    Closed,
    Open,
}

impl SidebarState {
    pub fn toggled(self) -> Self {
        match self {
            SidebarState::Closed => SidebarState::Open,
            SidebarState::Open => SidebarState::Closed,
        }
    }

    pub fn is_open(self) -> bool {
        self == SidebarState::Open
    }

    /// Transform class applied to the sidebar panel
    pub fn sidebar_class(self) -> &'static str {
        match self {
            SidebarState::Closed => "-translate-x-full",
            SidebarState::Open => "translate-x-0",
        }
    }

    /// Whether the dimming overlay carries the `hidden` class
    pub fn overlay_hidden(self) -> bool {
        !self.is_open()
    }

    /// Whether background scrolling is disabled (`overflow-hidden` on body)
    pub fn body_scroll_locked(self) -> bool {
        self.is_open()
    }
}
