//! Terminal User Interface for Foreman

pub mod app;
pub mod components;
pub mod handlers;
pub mod modals;
pub mod runtime;
pub mod state;
pub mod themes;
pub mod utils;

// Re-exports
pub use app::App;
