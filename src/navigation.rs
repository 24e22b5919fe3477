//! Page navigation probing
//!
//! Components restore persisted state only when the current load is a reload
//! of the same page, so the host environment has to tell us how the page was
//! reached.

use serde::{Deserialize, Serialize};

/// How the current page load was initiated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationType {
    /// Fresh navigation (link, address bar, first launch)
    #[default]
    Navigate,
    /// The same page was reloaded
    Reload,
    /// History traversal
    BackForward,
    /// Page was prerendered before being shown
    Prerender,
}

impl NavigationType {
    /// Parse the names used by the browser navigation timing API
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "navigate" => Some(NavigationType::Navigate),
            "reload" => Some(NavigationType::Reload),
            "back_forward" => Some(NavigationType::BackForward),
            "prerender" => Some(NavigationType::Prerender),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NavigationType::Navigate => "navigate",
            NavigationType::Reload => "reload",
            NavigationType::BackForward => "back_forward",
            NavigationType::Prerender => "prerender",
        }
    }
}

impl std::fmt::Display for NavigationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reports how the current page was loaded
pub trait NavigationProbe: Send + Sync {
    fn navigation_type(&self) -> NavigationType;

    /// Whether the current load is a reload of the same page
    fn is_page_reload(&self) -> bool {
        self.navigation_type() == NavigationType::Reload
    }
}

/// A fixed answer, for hosts that know the navigation type up front
impl NavigationProbe for NavigationType {
    fn navigation_type(&self) -> NavigationType {
        *self
    }
}
