//! Main button component
//!
//! The main button is a native control drawn by the host at the bottom of the
//! mini app. The component keeps two signals:
//!
//! - the internal state, written by `set_params` and persisted to storage so a
//!   reloaded page can pick up where it left off;
//! - the committed state, derived from the internal state and the theme, and
//!   pushed to the host with `web_app_setup_main_button`.
//!
//! Both synchronizations are only active while the component is mounted.
//! Click listeners talk to the bridge directly and live independently of the
//! mount state.

mod types;

#[cfg(test)]
mod tests;

pub use types::{ButtonState, CommittedState, DEFAULT_TEXT};

use crate::bridge::{
    post_method, Bridge, EventListener, SetupMainButtonParams, Unsubscribe, MAIN_BUTTON_PRESSED,
    SETUP_MAIN_BUTTON,
};
use crate::error::{BridgeError, Result, StorageError};
use crate::navigation::NavigationProbe;
use crate::signal::{Signal, SubscriptionId};
use crate::storage::{self, Storage};
use crate::theme::ThemeColors;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Storage key the internal state is persisted under
pub const STORAGE_KEY: &str = "mainButton";

/// Subscriptions installed by `mount` and removed by `unmount`
struct MountedSubscriptions {
    internal_state: SubscriptionId,
    state: SubscriptionId,
}

/// Handle to the host's main button
pub struct MainButton {
    bridge: Arc<dyn Bridge>,
    storage: Arc<dyn Storage>,
    navigation: Arc<dyn NavigationProbe>,
    internal_state: Signal<ButtonState>,
    theme: Signal<ThemeColors>,
    state: Signal<CommittedState>,
    is_mounted: Signal<bool>,
    mounted: Mutex<Option<MountedSubscriptions>>,
}

impl MainButton {
    /// Create an unmounted main button using the default theme
    pub fn new(
        bridge: Arc<dyn Bridge>,
        storage: Arc<dyn Storage>,
        navigation: Arc<dyn NavigationProbe>,
    ) -> Self {
        let internal_state = Signal::new(ButtonState::initial());
        let theme = Signal::new(ThemeColors::default());
        let state = Signal::new(CommittedState::derive(
            &internal_state.get(),
            &theme.get(),
        ));

        // Committed state follows both of its inputs for the whole lifetime
        // of the component, mounted or not.
        {
            let theme = theme.clone();
            let state = state.clone();
            internal_state.sub(move |internal| {
                state.set(CommittedState::derive(internal, &theme.get()));
            });
        }
        {
            let internal_state = internal_state.clone();
            let state = state.clone();
            theme.sub(move |theme| {
                state.set(CommittedState::derive(&internal_state.get(), theme));
            });
        }

        Self {
            bridge,
            storage,
            navigation,
            internal_state,
            theme,
            state,
            is_mounted: Signal::new(false),
            mounted: Mutex::new(None),
        }
    }

    /// Replace the theme before the button is used
    pub fn with_theme(self, theme: ThemeColors) -> Self {
        self.theme.set(theme);
        self
    }

    /// Start synchronizing state to storage and to the host
    ///
    /// On a page reload, the previously persisted internal state is restored
    /// first. A stored value that no longer decodes is discarded. Only a
    /// failing storage backend aborts the mount. Calling `mount` on a mounted
    /// button does nothing.
    pub fn mount(&self) -> Result<()> {
        // Held until the subscriptions are in place so concurrent mounts
        // cannot both attach listeners.
        let mut mounted = self.mounted.lock();
        if mounted.is_some() {
            return Ok(());
        }

        if self.navigation.is_page_reload() {
            if let Some(previous) = self.restore_state()? {
                debug!(state = ?previous, "Restoring main button state after reload");
                self.internal_state.set(previous);
            }
        }

        let internal_state = {
            let storage = Arc::clone(&self.storage);
            self.internal_state.sub(move |state| {
                if let Err(e) = persist_state(storage.as_ref(), state) {
                    warn!("Failed to persist main button state: {}", e);
                }
            })
        };
        let state = {
            let bridge = Arc::clone(&self.bridge);
            self.state.sub(move |state| {
                if let Err(e) = commit_state(bridge.as_ref(), state) {
                    warn!("Failed to commit main button state: {}", e);
                }
            })
        };

        *mounted = Some(MountedSubscriptions {
            internal_state,
            state,
        });
        self.is_mounted.set(true);

        info!("Main button mounted");
        Ok(())
    }

    /// Stop synchronizing state
    ///
    /// Listeners added with [`MainButton::on_click`] stay registered.
    pub fn unmount(&self) {
        let mut mounted = self.mounted.lock();
        if let Some(subscriptions) = mounted.take() {
            self.internal_state.unsub(subscriptions.internal_state);
            self.state.unsub(subscriptions.state);
            info!("Main button unmounted");
        }
        self.is_mounted.set(false);
    }

    /// Read the persisted internal state, dropping values that fail to decode
    fn restore_state(&self) -> Result<Option<ButtonState>> {
        match storage::get_value::<ButtonState>(self.storage.as_ref(), STORAGE_KEY) {
            Ok(previous) => Ok(previous),
            Err(StorageError::Serialization { source, .. }) => {
                warn!("Discarding unreadable main button state: {}", source);
                if let Err(e) = self.storage.remove(&storage::namespaced(STORAGE_KEY)) {
                    warn!("Failed to remove unreadable main button state: {}", e);
                }
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Apply the fields that are set in `updates`
    ///
    /// Storage and host are updated synchronously when mounted.
    pub fn set_params(&self, updates: ButtonState) {
        if updates.is_empty() {
            return;
        }
        self.internal_state.update(|state| state.merge(updates));
    }

    /// Replace the theme colours used for unset button colours
    pub fn set_theme(&self, theme: ThemeColors) {
        self.theme.set(theme);
    }

    /// Add a click listener; the returned handle removes it again
    pub fn on_click(&self, listener: EventListener) -> Unsubscribe {
        self.bridge.on(MAIN_BUTTON_PRESSED, Arc::clone(&listener));

        let bridge = Arc::clone(&self.bridge);
        Unsubscribe::new(move || {
            bridge.off(MAIN_BUTTON_PRESSED, &listener);
        })
    }

    /// Remove a click listener added with [`MainButton::on_click`]
    pub fn off_click(&self, listener: &EventListener) -> bool {
        self.bridge.off(MAIN_BUTTON_PRESSED, listener)
    }

    pub fn is_mounted(&self) -> bool {
        self.is_mounted.get()
    }

    /// State as set by the application
    pub fn internal_state(&self) -> ButtonState {
        self.internal_state.get()
    }

    /// State as it is (or would be) shown by the host
    pub fn state(&self) -> CommittedState {
        self.state.get()
    }

    pub fn theme(&self) -> ThemeColors {
        self.theme.get()
    }

    pub fn text(&self) -> String {
        self.state.with(|s| s.text.clone())
    }

    pub fn is_visible(&self) -> bool {
        self.state.with(|s| s.is_visible)
    }

    pub fn is_enabled(&self) -> bool {
        self.state.with(|s| s.is_enabled)
    }

    pub fn is_loader_visible(&self) -> bool {
        self.state.with(|s| s.is_loader_visible)
    }

    pub fn has_shine_effect(&self) -> bool {
        self.state.with(|s| s.has_shine_effect)
    }

    pub fn background_color(&self) -> String {
        self.state.with(|s| s.background_color.clone())
    }

    pub fn text_color(&self) -> String {
        self.state.with(|s| s.text_color.clone())
    }

    /// Underlying signals, for observers that need change notifications
    pub fn internal_state_signal(&self) -> &Signal<ButtonState> {
        &self.internal_state
    }

    pub fn state_signal(&self) -> &Signal<CommittedState> {
        &self.state
    }

    /// Mount state changes; subscribers must not call `mount` or `unmount`
    pub fn mounted_signal(&self) -> &Signal<bool> {
        &self.is_mounted
    }
}

fn persist_state(storage: &dyn Storage, state: &ButtonState) -> Result<(), StorageError> {
    storage::set_value(storage, STORAGE_KEY, state)
}

/// Post the committed state to the host
///
/// Returns `false` without posting while the text is empty; some host
/// versions crash when asked to draw a button without text.
fn commit_state(bridge: &dyn Bridge, state: &CommittedState) -> Result<bool, BridgeError> {
    if state.text.is_empty() {
        debug!("Main button text is empty, not committing");
        return Ok(false);
    }

    post_method(bridge, SETUP_MAIN_BUTTON, &SetupMainButtonParams::from(state))?;
    Ok(true)
}
