//! Color theme
//!
//! Foreman ships a single dark palette. Every widget reads its colors from
//! [`Theme`] so the palette can be swapped in one place.

use ratatui::style::Color;

use foreman_core::snapshot::{QueueState, WorkerState};

/// Theme color palette
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg_color: Color,
    pub text_color: Color,
    pub dim_color: Color,
    pub accent_color: Color,
    pub border_color: Color,
    pub title_color: Color,
    pub highlight_bg: Color,
    pub success_color: Color,
    pub warning_color: Color,
    pub error_color: Color,
    pub status_bar_bg_color: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg_color: Color::Rgb(22, 24, 30),
            text_color: Color::Rgb(220, 223, 228),
            dim_color: Color::Rgb(110, 118, 129),
            accent_color: Color::Rgb(97, 175, 239),
            border_color: Color::Rgb(62, 68, 81),
            title_color: Color::Rgb(229, 192, 123),
            highlight_bg: Color::Rgb(44, 49, 60),
            success_color: Color::Rgb(152, 195, 121),
            warning_color: Color::Rgb(229, 192, 123),
            error_color: Color::Rgb(224, 108, 117),
            status_bar_bg_color: Color::Rgb(33, 37, 43),
        }
    }
}

impl Theme {
    pub fn worker_state_color(&self, state: WorkerState) -> Color {
        match state {
            WorkerState::Working => self.success_color,
            WorkerState::Idle => self.accent_color,
            WorkerState::Stalled => self.warning_color,
            WorkerState::Stopped => self.dim_color,
            WorkerState::Unknown => self.error_color,
        }
    }

    pub fn queue_state_color(&self, state: QueueState) -> Color {
        match state {
            QueueState::Queued => self.text_color,
            QueueState::Merging => self.accent_color,
            QueueState::Conflicted => self.warning_color,
            QueueState::Failed => self.error_color,
            QueueState::Unknown => self.dim_color,
        }
    }
}
