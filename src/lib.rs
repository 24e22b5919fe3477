//! Mini App SDK
//!
//! Typed access to host-drawn mini app controls and a few styling helpers.
//!
//! - [`components::MainButton`]: the host's main button, with state persisted
//!   across page reloads and committed to the host through a [`bridge::Bridge`].
//! - [`classnames`]: join and merge class-name values.
//!
//! The host transport, persistent storage and navigation probing are traits,
//! so the SDK can run inside a webview shell, a test harness or the bundled
//! playground alike.

pub mod bridge;
pub mod classnames;
pub mod components;
pub mod error;
pub mod navigation;
pub mod signal;
pub mod storage;
pub mod theme;

pub use bridge::{Bridge, EventListener, LocalBridge, Unsubscribe};
pub use classnames::{class_names, merge_class_names, ClassNameSet};
pub use components::{ButtonState, CommittedState, MainButton};
pub use error::{BridgeError, SdkError, StorageError};
pub use navigation::{NavigationProbe, NavigationType};
pub use signal::{Signal, SubscriptionId};
pub use storage::{MemoryStorage, SledStorage, Storage};
pub use theme::ThemeColors;
