//! Host-drawn UI components

pub mod main_button;

pub use main_button::{ButtonState, CommittedState, MainButton};
