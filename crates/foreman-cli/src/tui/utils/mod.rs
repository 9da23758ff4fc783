//! Utilities for the TUI
//!
//! Common helper functions and types used throughout the TUI.

mod channels;
mod text;

pub use channels::{
    control_channel, ActionFailure, ActionOutcome, ControlEvent, DetailOutcome, EventReceiver,
    EventSender, RefreshOutcome,
};
pub use text::{format_elapsed, truncate_ellipsis};
