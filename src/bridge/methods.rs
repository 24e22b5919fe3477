//! Outbound host methods and their wire payloads

use serde::{Deserialize, Serialize};

/// Host method that (re)draws the main button
pub const SETUP_MAIN_BUTTON: &str = "web_app_setup_main_button";

/// Field table between main button state (camelCase) and the wire (snake_case)
///
/// The wire names are part of the host contract and must not follow renames
/// of the Rust fields. `SetupMainButtonParams` is checked against this table
/// in tests.
pub const MAIN_BUTTON_FIELDS: [(&str, &str); 7] = [
    ("hasShineEffect", "has_shine_effect"),
    ("isVisible", "is_visible"),
    ("isEnabled", "is_active"),
    ("isLoaderVisible", "is_progress_visible"),
    ("text", "text"),
    ("backgroundColor", "color"),
    ("textColor", "text_color"),
];

/// Wire name for a state field
pub fn wire_field(state_field: &str) -> Option<&'static str> {
    MAIN_BUTTON_FIELDS
        .iter()
        .find(|(state, _)| *state == state_field)
        .map(|(_, wire)| *wire)
}

/// State field for a wire name
pub fn state_field(wire_field: &str) -> Option<&'static str> {
    MAIN_BUTTON_FIELDS
        .iter()
        .find(|(_, wire)| *wire == wire_field)
        .map(|(state, _)| *state)
}

/// Payload of `web_app_setup_main_button`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupMainButtonParams {
    #[serde(rename = "has_shine_effect")]
    pub has_shine_effect: bool,
    #[serde(rename = "is_visible")]
    pub is_visible: bool,
    #[serde(rename = "is_active")]
    pub is_active: bool,
    #[serde(rename = "is_progress_visible")]
    pub is_progress_visible: bool,
    #[serde(rename = "text")]
    pub text: String,
    #[serde(rename = "color")]
    pub color: String,
    #[serde(rename = "text_color")]
    pub text_color: String,
}
