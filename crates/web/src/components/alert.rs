//! Dismissible alert shown in the page corner.

/// Visual style of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Error,
    Info,
}

impl AlertKind {
    /// CSS class used by `partials/alert.html`.
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

/// A title plus a one-line description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub title: String,
    pub description: String,
}

impl Alert {
    #[must_use]
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Error,
            title: title.into(),
            description: description.into(),
        }
    }

    #[must_use]
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Info,
            title: title.into(),
            description: description.into(),
        }
    }
}
