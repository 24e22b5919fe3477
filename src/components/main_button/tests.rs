//! Tests for the main button component

use super::*;
use crate::bridge::{listener, LocalBridge};
use crate::error::SdkError;
use crate::navigation::NavigationType;
use crate::storage::MemoryStorage;
use serde_json::{json, Value};

struct Harness {
    bridge: Arc<LocalBridge>,
    storage: Arc<MemoryStorage>,
    button: MainButton,
}

fn make_harness(navigation: NavigationType) -> Harness {
    make_harness_with_storage(navigation, Arc::new(MemoryStorage::new()))
}

fn make_harness_with_storage(navigation: NavigationType, storage: Arc<MemoryStorage>) -> Harness {
    let bridge = Arc::new(LocalBridge::new());
    let button = MainButton::new(bridge.clone(), storage.clone(), Arc::new(navigation));
    Harness {
        bridge,
        storage,
        button,
    }
}

fn setup_events(bridge: &LocalBridge) -> Vec<Value> {
    bridge
        .sent_events()
        .into_iter()
        .filter(|e| e.method == SETUP_MAIN_BUTTON)
        .filter_map(|e| e.params)
        .collect()
}

fn stored_state(storage: &MemoryStorage) -> Option<ButtonState> {
    storage::get_value(storage, STORAGE_KEY).unwrap()
}

/// Storage whose writes always fail
struct BrokenStorage;

impl Storage for BrokenStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Backend("disk full".to_string()))
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Storage whose reads always fail
struct UnreadableStorage;

impl Storage for UnreadableStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Backend("io error".to_string()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Ok(())
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Ok(())
    }
}

#[test]
fn test_mount_twice_registers_listeners_once() {
    let h = make_harness(NavigationType::Navigate);

    // The committed-state derivation is always subscribed
    assert_eq!(h.button.internal_state_signal().subscriber_count(), 1);
    assert_eq!(h.button.state_signal().subscriber_count(), 0);

    h.button.mount().unwrap();
    h.button.mount().unwrap();
    assert!(h.button.is_mounted());
    assert_eq!(h.button.internal_state_signal().subscriber_count(), 2);
    assert_eq!(h.button.state_signal().subscriber_count(), 1);

    h.button.set_params(ButtonState::new().text("Buy"));
    assert_eq!(setup_events(&h.bridge).len(), 1);

    h.button.unmount();
    h.button.unmount();
    assert!(!h.button.is_mounted());
    assert_eq!(h.button.internal_state_signal().subscriber_count(), 1);
    assert_eq!(h.button.state_signal().subscriber_count(), 0);
}

#[test]
fn test_set_params_posts_renamed_payload() {
    let h = make_harness(NavigationType::Navigate);
    h.button.mount().unwrap();

    h.button
        .set_params(ButtonState::new().text("Pay").visible(true).loader_visible(true));

    assert_eq!(
        setup_events(&h.bridge),
        vec![json!({
            "has_shine_effect": false,
            "is_visible": true,
            "is_active": true,
            "is_progress_visible": true,
            "text": "Pay",
            "color": "#2481cc",
            "text_color": "#ffffff",
        })]
    );
}

#[test]
fn test_undefined_text_leaves_text_unchanged() {
    let h = make_harness(NavigationType::Navigate);
    h.button.mount().unwrap();

    h.button.set_params(ButtonState::new().text("Buy"));
    h.button.set_params(ButtonState {
        text: None,
        is_enabled: Some(false),
        ..ButtonState::default()
    });

    assert_eq!(h.button.text(), "Buy");
    assert!(!h.button.is_enabled());
    assert_eq!(h.button.internal_state().text.as_deref(), Some("Buy"));
}

#[test]
fn test_empty_text_suppresses_commit_until_text_returns() {
    let h = make_harness(NavigationType::Navigate);
    h.button.mount().unwrap();

    h.button.set_params(ButtonState::new().text(""));
    assert_eq!(h.button.text(), "");
    assert!(setup_events(&h.bridge).is_empty());

    h.button.set_params(ButtonState::new().visible(true));
    assert!(setup_events(&h.bridge).is_empty());

    h.button.set_params(ButtonState::new().text("Checkout"));
    let events = setup_events(&h.bridge);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["text"], "Checkout");
    assert_eq!(events[0]["is_visible"], true);
}

#[test]
fn test_reload_restores_stored_state() {
    let storage = Arc::new(MemoryStorage::new());
    storage::set_value(storage.as_ref(), STORAGE_KEY, &json!({"text": "Buy"})).unwrap();

    let h = make_harness_with_storage(NavigationType::Reload, storage);
    h.button.mount().unwrap();

    assert_eq!(h.button.internal_state(), ButtonState::new().text("Buy"));
    assert_eq!(h.button.text(), "Buy");
    // Restoring happens before the listeners are attached
    assert!(h.bridge.sent_events().is_empty());
}

#[test]
fn test_fresh_navigation_ignores_stored_state() {
    let storage = Arc::new(MemoryStorage::new());
    storage::set_value(storage.as_ref(), STORAGE_KEY, &json!({"text": "Buy"})).unwrap();

    let h = make_harness_with_storage(NavigationType::Navigate, storage);
    h.button.mount().unwrap();

    assert_eq!(h.button.internal_state(), ButtonState::initial());
}

#[test]
fn test_unreadable_stored_state_is_discarded_on_mount() {
    for raw in ["null", "[1, 2", "\"Buy\""] {
        let storage = Arc::new(MemoryStorage::new());
        storage.set("tapps/mainButton", raw).unwrap();

        let h = make_harness_with_storage(NavigationType::Reload, storage);
        h.button.mount().unwrap();

        assert!(h.button.is_mounted(), "mount failed for {}", raw);
        assert_eq!(h.button.internal_state(), ButtonState::initial());
        assert!(h.storage.get("tapps/mainButton").unwrap().is_none());

        h.button.set_params(ButtonState::new().text("Pay"));
        assert_eq!(setup_events(&h.bridge).len(), 1);
        assert_eq!(stored_state(&h.storage).unwrap().text.as_deref(), Some("Pay"));
    }
}

#[test]
fn test_storage_read_failure_fails_mount() {
    let bridge = Arc::new(LocalBridge::new());
    let button = MainButton::new(
        bridge.clone(),
        Arc::new(UnreadableStorage),
        Arc::new(NavigationType::Reload),
    );

    let err = button.mount().unwrap_err();
    assert!(matches!(err, SdkError::Storage(StorageError::Backend(_))));
    assert!(!button.is_mounted());
    assert_eq!(button.state_signal().subscriber_count(), 0);
}

#[test]
fn test_concurrent_mounts_attach_listeners_once() {
    let h = make_harness(NavigationType::Navigate);
    let button = Arc::new(h.button);
    let barrier = Arc::new(std::sync::Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let button = Arc::clone(&button);
            let barrier = Arc::clone(&barrier);
            std::thread::spawn(move || {
                barrier.wait();
                button.mount().unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(button.internal_state_signal().subscriber_count(), 2);
    assert_eq!(button.state_signal().subscriber_count(), 1);

    button.set_params(ButtonState::new().text("Buy"));
    assert_eq!(setup_events(&h.bridge).len(), 1);
}

#[test]
fn test_concurrent_set_params_keep_every_field() {
    for _ in 0..50 {
        let h = make_harness(NavigationType::Navigate);
        let button = Arc::new(h.button);
        button.mount().unwrap();
        let barrier = Arc::new(std::sync::Barrier::new(2));

        let updates = [
            ButtonState::new().text("Pay"),
            ButtonState::new().visible(true).background_color("#000000"),
        ];
        let handles: Vec<_> = updates
            .into_iter()
            .map(|update| {
                let button = Arc::clone(&button);
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    button.set_params(update);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let state = button.internal_state();
        assert_eq!(state.text.as_deref(), Some("Pay"));
        assert_eq!(state.is_visible, Some(true));
        assert_eq!(state.background_color.as_deref(), Some("#000000"));
        assert_eq!(stored_state(&h.storage).unwrap(), state);
    }
}

#[test]
fn test_state_persisted_only_while_mounted() {
    let h = make_harness(NavigationType::Navigate);

    h.button.set_params(ButtonState::new().text("Early"));
    assert!(stored_state(&h.storage).is_none());

    h.button.mount().unwrap();
    h.button.set_params(ButtonState::new().visible(true));

    let stored = stored_state(&h.storage).unwrap();
    assert_eq!(stored.text.as_deref(), Some("Early"));
    assert_eq!(stored.is_visible, Some(true));

    h.button.unmount();
    h.button.set_params(ButtonState::new().text("Late"));
    assert_eq!(stored_state(&h.storage).unwrap().text.as_deref(), Some("Early"));
    assert_eq!(setup_events(&h.bridge).len(), 1);
}

#[test]
fn test_unchanged_params_do_not_repost() {
    let h = make_harness(NavigationType::Navigate);
    h.button.mount().unwrap();

    h.button.set_params(ButtonState::new().text("Buy"));
    h.button.set_params(ButtonState::new().text("Buy"));
    h.button.set_params(ButtonState::new());

    assert_eq!(setup_events(&h.bridge).len(), 1);
}

#[test]
fn test_click_listeners_survive_unmount() {
    let h = make_harness(NavigationType::Navigate);
    let clicks = Arc::new(Mutex::new(0));

    let counter = Arc::clone(&clicks);
    let _handle = h.button.on_click(listener(move |_| *counter.lock() += 1));

    h.button.mount().unwrap();
    h.bridge.emit(MAIN_BUTTON_PRESSED, Value::Null);
    h.button.unmount();
    h.bridge.emit(MAIN_BUTTON_PRESSED, Value::Null);

    assert_eq!(*clicks.lock(), 2);
}

#[test]
fn test_click_unsubscribe_and_off_click() {
    let h = make_harness(NavigationType::Navigate);
    let clicks = Arc::new(Mutex::new(Vec::new()));

    let first = Arc::clone(&clicks);
    let handle = h.button.on_click(listener(move |_| first.lock().push("a")));

    let second = Arc::clone(&clicks);
    let b = listener(move |_| second.lock().push("b"));
    h.button.on_click(Arc::clone(&b));

    h.bridge.emit(MAIN_BUTTON_PRESSED, Value::Null);
    handle.unsubscribe();
    h.bridge.emit(MAIN_BUTTON_PRESSED, Value::Null);
    assert!(h.button.off_click(&b));
    assert!(!h.button.off_click(&b));
    h.bridge.emit(MAIN_BUTTON_PRESSED, Value::Null);

    assert_eq!(*clicks.lock(), vec!["a", "b", "b"]);
    assert_eq!(h.bridge.listener_count(MAIN_BUTTON_PRESSED), 0);
}

#[test]
fn test_theme_change_recommits_colors() {
    let h = make_harness(NavigationType::Navigate);
    h.button.mount().unwrap();
    h.button.set_params(ButtonState::new().text("Buy"));

    h.button.set_theme(ThemeColors {
        button_color: Some("#ff0000".to_string()),
        button_text_color: None,
    });

    let events = setup_events(&h.bridge);
    assert_eq!(events.len(), 2);
    assert_eq!(events[1]["color"], "#ff0000");
    assert_eq!(h.button.background_color(), "#ff0000");

    // App-set colours win over the theme, so a theme change is a no-op
    h.button.set_params(ButtonState::new().background_color("#00ff00"));
    h.button.set_theme(ThemeColors {
        button_color: Some("#0000ff".to_string()),
        button_text_color: None,
    });
    assert_eq!(setup_events(&h.bridge).len(), 3);
}

#[test]
fn test_sink_failures_do_not_break_the_other_sink() {
    let bridge = Arc::new(LocalBridge::new());
    let button = MainButton::new(
        bridge.clone(),
        Arc::new(BrokenStorage),
        Arc::new(NavigationType::Navigate),
    );
    button.mount().unwrap();

    button.set_params(ButtonState::new().text("Buy"));
    assert_eq!(setup_events(&bridge).len(), 1);

    bridge.close();
    button.set_params(ButtonState::new().text("Sold out"));
    assert_eq!(button.text(), "Sold out");
    assert_eq!(setup_events(&bridge).len(), 1);
}

#[test]
fn test_rejected_commit_still_persists_state() {
    let h = make_harness(NavigationType::Navigate);
    h.button.mount().unwrap();
    h.bridge.reject(SETUP_MAIN_BUTTON, "button not supported");

    h.button.set_params(ButtonState::new().text("Buy"));
    assert!(setup_events(&h.bridge).is_empty());
    assert_eq!(stored_state(&h.storage).unwrap().text.as_deref(), Some("Buy"));

    h.bridge.accept(SETUP_MAIN_BUTTON);
    h.button.set_params(ButtonState::new().visible(true));
    let events = setup_events(&h.bridge);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["text"], "Buy");
}

#[test]
fn test_mounted_signal_reports_transitions() {
    let h = make_harness(NavigationType::Navigate);
    let transitions = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&transitions);
    h.button.mounted_signal().sub(move |m| sink.lock().push(*m));

    h.button.mount().unwrap();
    h.button.mount().unwrap();
    h.button.unmount();

    assert_eq!(*transitions.lock(), vec![true, false]);
}
