//! Main TUI application
//!
//! Owns the terminal, the control state, and the effect runtime.
//! Handler implementations are in the handlers/ module.

use anyhow::Result;
use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    io,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::time::MissedTickBehavior;

use foreman_core::{CommandExecutor, ForemanConfig, SnapshotSource};

use crate::tui::runtime::Runtime;
use crate::tui::state::ControlState;
use crate::tui::themes::Theme;
use crate::tui::utils::{control_channel, ControlEvent, EventReceiver};

/// Redraw cadence for time-based UI (status expiry, "refreshed Ns ago")
const FRAME_INTERVAL: Duration = Duration::from_millis(250);

pub struct App {
    pub state: ControlState,
    pub theme: Theme,
    /// Platform tool name shown in the header
    pub bin: String,
    runtime: Runtime,
    events: EventReceiver,
    refresh_interval: Duration,
    needs_redraw: bool,
}

impl App {
    pub fn new(
        config: &ForemanConfig,
        source: Arc<dyn SnapshotSource>,
        executor: Arc<dyn CommandExecutor>,
    ) -> Self {
        let (tx, rx) = control_channel();
        let workspace_hint = config
            .workspace
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        Self {
            state: ControlState::new(
                config.timeouts(),
                config.status_durations(),
                workspace_hint,
                Instant::now(),
            ),
            theme: Theme::default(),
            bin: config.bin.clone(),
            runtime: Runtime::new(source, executor, tx),
            events: rx,
            refresh_interval: config.refresh_interval(),
            needs_redraw: true,
        }
    }

    /// Run the application
    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal).await;

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        result
    }

    /// Feed one event through the state machine and start its effects
    fn dispatch(&mut self, event: ControlEvent) {
        let effects = self.state.handle_event(event, Instant::now());
        self.runtime.apply(effects);
        self.needs_redraw = true;
    }

    /// Main event loop
    async fn main_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // First tick fires immediately, giving the initial refresh
        let mut refresh_ticker = tokio::time::interval(self.refresh_interval);
        refresh_ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut frame_ticker = tokio::time::interval(FRAME_INTERVAL);
        frame_ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(interval_ms = self.refresh_interval.as_millis() as u64, "Control loop started");

        loop {
            if self.needs_redraw {
                terminal.draw(|f| self.ui(f))?;
                self.needs_redraw = false;
            }

            tokio::select! {
                biased; // Keys first so input never waits behind completions

                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(Event::Key(key))) => {
                            self.dispatch(ControlEvent::Key(key));
                        }
                        Some(Ok(Event::Resize(_, _))) => {
                            self.needs_redraw = true;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            tracing::warn!("Terminal event error: {}", e);
                        }
                        None => {
                            tracing::info!("Terminal event stream closed");
                            break;
                        }
                    }
                }
                Some(event) = self.events.recv() => {
                    self.dispatch(event);
                }
                _ = refresh_ticker.tick() => {
                    self.dispatch(ControlEvent::RefreshTick);
                }
                _ = frame_ticker.tick() => {
                    if self.state.status.tick(Instant::now()) || self.state.refresh.last_refresh.is_some() {
                        self.needs_redraw = true;
                    }
                }
            }

            if self.state.should_quit {
                tracing::info!(pending = self.state.pending.len(), "Quitting");
                break;
            }
        }
        Ok(())
    }
}
