use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::NavigationConfig;
use crate::view::ViewState;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SectionId(String);

impl SectionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkId(String);

impl LinkId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("unknown section: {0}")]
    UnknownSection(String),
}

/// Where a navigation request leads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTarget {
    /// The removed login screen; only stops the camera
    Login,
    /// The live camera page
    Capture(SectionId),
    Section(SectionId),
}

/// Sections in sidebar order, each with its sidebar link
#[derive(Debug, Clone)]
pub struct NavigationMap {
    entries: Vec<(SectionId, LinkId)>,
    landing: SectionId,
    capture: SectionId,
    login: String,
}

impl NavigationMap {
    /// Build from explicit (section, link) pairs
    pub fn new(
        entries: Vec<(SectionId, LinkId)>,
        landing: SectionId,
        capture: SectionId,
        login: impl Into<String>,
    ) -> Self {
        Self {
            entries,
            landing,
            capture,
            login: login.into(),
        }
    }

    /// One link per configured section, named `<section>-link`
    pub fn from_config(config: &NavigationConfig) -> Self {
        let entries = config
            .sections
            .iter()
            .map(|s| (SectionId::new(s.as_str()), LinkId::new(format!("{}-link", s))))
            .collect();

        Self::new(
            entries,
            SectionId::new(config.landing_section.as_str()),
            SectionId::new(config.capture_section.as_str()),
            config.login_section.as_str(),
        )
    }

    pub fn sections(&self) -> impl Iterator<Item = &SectionId> {
        self.entries.iter().map(|(s, _)| s)
    }

    pub fn links(&self) -> impl Iterator<Item = &LinkId> {
        self.entries.iter().map(|(_, l)| l)
    }

    pub fn link_for(&self, section: &SectionId) -> Option<&LinkId> {
        self.entries
            .iter()
            .find(|(s, _)| s == section)
            .map(|(_, l)| l)
    }

    pub fn landing(&self) -> &SectionId {
        &self.landing
    }

    pub fn capture(&self) -> &SectionId {
        &self.capture
    }

    pub fn resolve(&self, id: &str) -> Result<NavigationTarget, NavigationError> {
        if id == self.login {
            return Ok(NavigationTarget::Login);
        }

        let section = self
            .sections()
            .find(|s| s.as_str() == id)
            .cloned()
            .ok_or_else(|| NavigationError::UnknownSection(id.to_string()))?;

        if section == self.capture {
            Ok(NavigationTarget::Capture(section))
        } else {
            Ok(NavigationTarget::Section(section))
        }
    }

    /// Mark `section` visible, its link active, and set the back button
    pub fn apply(&self, view: &mut ViewState, section: &SectionId) {
        view.set_visible_section(section);
        view.set_active_link(self.link_for(section));
        view.back_button_visible = section != &self.landing;
    }
}
