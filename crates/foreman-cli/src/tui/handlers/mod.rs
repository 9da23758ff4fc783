//! Event handlers
//!
//! Each file extends [`ControlState`](crate::tui::state::ControlState) (or
//! [`App`](crate::tui::app::App) for rendering) with one concern.

mod cascade;
mod dispatch;
mod event_loop;
mod keyboard;
mod modal_keys;
mod refresh;
mod rendering;
