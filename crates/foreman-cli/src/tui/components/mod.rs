//! UI components for the Foreman TUI
//!
//! Reusable rendering components: header, key hints, status line.

pub mod status;
pub mod status_bar;

pub use status::{render_status_line, Severity, StatusLine};
pub use status_bar::{render_header, render_key_hints, HeaderInfo};
