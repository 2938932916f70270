//! Navigation bar state.

use crate::models::CurrentSession;

/// What the navigation bar needs to render.
#[derive(Debug, Clone, Default)]
pub struct NavBar {
    /// Signed-in user's display name; `None` renders the guest bar.
    pub viewer: Option<String>,
    /// Whether the bar scrolls with the page instead of staying fixed.
    pub not_fixed: bool,
}

impl NavBar {
    /// Bar for pages that are reachable without a session.
    #[must_use]
    pub fn guest() -> Self {
        Self::default()
    }

    /// Bar for signed-in pages.
    #[must_use]
    pub fn dashboard(session: &CurrentSession) -> Self {
        Self {
            viewer: Some(session.display_name()),
            not_fixed: false,
        }
    }

    #[must_use]
    pub const fn scrolling(mut self) -> Self {
        self.not_fixed = true;
        self
    }
}
