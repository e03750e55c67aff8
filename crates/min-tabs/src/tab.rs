//! Tab data structure

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque tab identifier, stable for the tab's lifetime
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(String);

impl TabId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TabId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TabId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for TabId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    /// Unique identifier
    pub id: TabId,
    /// Current URL, empty for a blank tab
    pub url: String,
    /// Page title
    pub title: String,
    /// Private tabs are never persisted
    pub private: bool,
    /// Last time the tab was selected
    pub last_activity: DateTime<Utc>,
    /// Whether the page is currently playing audio
    pub has_audio: bool,
}

impl Tab {
    pub fn new(init: NewTab) -> Self {
        Self {
            id: TabId::generate(),
            url: init.url,
            title: String::new(),
            private: init.private,
            last_activity: Utc::now(),
            has_audio: false,
        }
    }

    pub fn blank() -> Self {
        Self::new(NewTab::default())
    }

    /// Record that the user looked at this tab
    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    pub fn is_blank(&self) -> bool {
        self.url.is_empty()
    }

    /// Title with a fallback to the URL
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.url
        } else {
            &self.title
        }
    }

    pub(crate) fn apply(&mut self, update: TabUpdate) {
        if let Some(url) = update.url {
            self.url = url;
        }
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(has_audio) = update.has_audio {
            self.has_audio = has_audio;
        }
    }
}

/// Initial data for a freshly created tab
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTab {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub private: bool,
}

impl NewTab {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            private: false,
        }
    }

    pub fn private() -> Self {
        Self {
            url: String::new(),
            private: true,
        }
    }
}

/// Partial update of a tab's mutable fields. Privacy is fixed at creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabUpdate {
    pub url: Option<String>,
    pub title: Option<String>,
    pub has_audio: Option<bool>,
}
