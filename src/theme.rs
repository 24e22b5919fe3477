//! Theme colours consumed by components when the app leaves a colour unset

use serde::{Deserialize, Serialize};

/// Fallback main button background when neither the app nor the theme sets one
pub const DEFAULT_BUTTON_COLOR: &str = "#2481cc";
/// Fallback main button text colour
pub const DEFAULT_BUTTON_TEXT_COLOR: &str = "#ffffff";

/// Subset of host theme parameters relevant to buttons
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_text_color: Option<String>,
}

impl ThemeColors {
    /// Background colour to use, falling back to the built-in default
    pub fn button_color_or_default(&self) -> &str {
        self.button_color
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_BUTTON_COLOR)
    }

    /// Text colour to use, falling back to the built-in default
    pub fn button_text_color_or_default(&self) -> &str {
        self.button_text_color
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_BUTTON_TEXT_COLOR)
    }
}
