//! Main button state types

use crate::bridge::SetupMainButtonParams;
use crate::theme::ThemeColors;
use serde::{Deserialize, Serialize};

/// Text shown on a freshly created button
pub const DEFAULT_TEXT: &str = "Continue";

/// Application-controlled button state
///
/// Every field is optional: unset fields fall back to defaults when the
/// committed state is derived. The same type doubles as the partial update
/// accepted by `MainButton::set_params`, where `None` means "leave as is".
/// Stored with camelCase keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_loader_visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_shine_effect: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

impl ButtonState {
    /// Empty update, for use with the builder methods
    pub fn new() -> Self {
        Self::default()
    }

    /// State a button starts with before anything is set or restored
    pub fn initial() -> Self {
        Self {
            is_visible: Some(false),
            is_enabled: Some(true),
            is_loader_visible: Some(false),
            has_shine_effect: Some(false),
            text: Some(DEFAULT_TEXT.to_string()),
            background_color: None,
            text_color: None,
        }
    }

    pub fn visible(mut self, value: bool) -> Self {
        self.is_visible = Some(value);
        self
    }

    pub fn enabled(mut self, value: bool) -> Self {
        self.is_enabled = Some(value);
        self
    }

    pub fn loader_visible(mut self, value: bool) -> Self {
        self.is_loader_visible = Some(value);
        self
    }

    pub fn shine_effect(mut self, value: bool) -> Self {
        self.has_shine_effect = Some(value);
        self
    }

    pub fn text(mut self, value: impl Into<String>) -> Self {
        self.text = Some(value.into());
        self
    }

    pub fn background_color(mut self, value: impl Into<String>) -> Self {
        self.background_color = Some(value.into());
        self
    }

    pub fn text_color(mut self, value: impl Into<String>) -> Self {
        self.text_color = Some(value.into());
        self
    }

    /// Whether no field is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overlay the fields that are set in `updates`
    pub fn merge(&mut self, updates: ButtonState) {
        let ButtonState {
            is_visible,
            is_enabled,
            is_loader_visible,
            has_shine_effect,
            text,
            background_color,
            text_color,
        } = updates;

        if is_visible.is_some() {
            self.is_visible = is_visible;
        }
        if is_enabled.is_some() {
            self.is_enabled = is_enabled;
        }
        if is_loader_visible.is_some() {
            self.is_loader_visible = is_loader_visible;
        }
        if has_shine_effect.is_some() {
            self.has_shine_effect = has_shine_effect;
        }
        if text.is_some() {
            self.text = text;
        }
        if background_color.is_some() {
            self.background_color = background_color;
        }
        if text_color.is_some() {
            self.text_color = text_color;
        }
    }
}

/// Fully resolved state, the one sent to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommittedState {
    pub is_visible: bool,
    pub is_enabled: bool,
    pub is_loader_visible: bool,
    pub has_shine_effect: bool,
    pub text: String,
    pub background_color: String,
    pub text_color: String,
}

impl CommittedState {
    /// Resolve `internal` against defaults and the theme
    pub fn derive(internal: &ButtonState, theme: &ThemeColors) -> Self {
        let initial = ButtonState::initial();
        let flag = |value: Option<bool>, fallback: Option<bool>| {
            value.or(fallback).unwrap_or_default()
        };

        Self {
            is_visible: flag(internal.is_visible, initial.is_visible),
            is_enabled: flag(internal.is_enabled, initial.is_enabled),
            is_loader_visible: flag(internal.is_loader_visible, initial.is_loader_visible),
            has_shine_effect: flag(internal.has_shine_effect, initial.has_shine_effect),
            text: internal.text.clone().unwrap_or_default(),
            background_color: internal
                .background_color
                .clone()
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| theme.button_color_or_default().to_string()),
            text_color: internal
                .text_color
                .clone()
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| theme.button_text_color_or_default().to_string()),
        }
    }
}

impl From<&CommittedState> for SetupMainButtonParams {
    fn from(state: &CommittedState) -> Self {
        Self {
            has_shine_effect: state.has_shine_effect,
            is_visible: state.is_visible,
            is_active: state.is_enabled,
            is_progress_visible: state.is_loader_visible,
            text: state.text.clone(),
            color: state.background_color.clone(),
            text_color: state.text_color.clone(),
        }
    }
}

impl From<SetupMainButtonParams> for CommittedState {
    fn from(params: SetupMainButtonParams) -> Self {
        Self {
            is_visible: params.is_visible,
            is_enabled: params.is_active,
            is_loader_visible: params.is_progress_visible,
            has_shine_effect: params.has_shine_effect,
            text: params.text,
            background_color: params.color,
            text_color: params.text_color,
        }
    }
}
