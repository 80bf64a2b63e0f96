use std::{
    cell::Cell,
    fmt::Display,
    future::Future,
    io::Stdout,
    time::Duration,
};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::info;

use crate::{
    db::RecordStore,
    engine::{EngineConfig, SessionEngine},
    mode::Mode,
    record::ResultRecord,
};

use super::{
    history::{HistoryData, HistoryViewMode},
    types::{LogBuffer, Screen, SessionSummary},
};

/// How long the UI waits for input before redrawing the clock.
const FRAME_INTERVAL: Duration = Duration::from_millis(50);

/// Main application state container.
pub struct App {
    pub(in crate::ui) engine: SessionEngine,
    pub(in crate::ui) store: RecordStore,
    pub(in crate::ui) mode: Mode,
    pub(in crate::ui) screen: Screen,
    pub(in crate::ui) cursor: (usize, usize),
    pub(in crate::ui) replay_of: Option<i64>,
    pub(in crate::ui) last_summary: Option<SessionSummary>,
    pub(in crate::ui) timeout_tx: UnboundedSender<ResultRecord>,
    pub(in crate::ui) timeout_rx: UnboundedReceiver<ResultRecord>,
    pub(in crate::ui) logs: LogBuffer,
    pub(in crate::ui) history_data: Option<HistoryData>,
    pub(in crate::ui) history_view_mode: HistoryViewMode,
    pub(in crate::ui) history_page: usize,
    pub(in crate::ui) clear_pending: bool,
    pub(in crate::ui) grid_area: Cell<Option<Rect>>,
}

impl App {
    pub fn new(store: RecordStore, config: EngineConfig, mode: Mode, logs: LogBuffer) -> Self {
        let engine = SessionEngine::new(config);
        let (timeout_tx, timeout_rx) = unbounded_channel();

        let tx = timeout_tx.clone();
        engine.on_timeout(move |record| {
            // Fails only once the App has been dropped.
            let _ = tx.send(record);
        });

        Self {
            engine,
            store,
            mode,
            screen: Screen::Training,
            cursor: (0, 0),
            replay_of: None,
            last_summary: None,
            timeout_tx,
            timeout_rx,
            logs,
            history_data: None,
            history_view_mode: HistoryViewMode::Stats,
            history_page: 0,
            clear_pending: false,
            grid_area: Cell::new(None),
        }
    }

    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        info!("UI started");
        self.log(format!(
            "Loaded {} record(s). Mode: {}. Press Enter to start.",
            self.store.history().len(),
            self.mode.display_name()
        ));

        let result = self.event_loop(terminal);
        self.engine.close();
        result
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            super::handlers::GameHandler::new(self).poll_timeouts();

            terminal.draw(|f| self.draw(f))?;

            if !event::poll(FRAME_INTERVAL)? {
                continue;
            }

            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if super::handlers::InputHandler::new(self).handle_key(key) {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => {
                    super::handlers::InputHandler::new(self).handle_mouse(mouse);
                }
                _ => {}
            }
        }
    }

    pub(in crate::ui) fn log(&self, msg: impl Into<String> + Display) {
        tracing::info!("{}", &msg);
        self.logs.push(msg.into());
    }
}

/// Execute an async store operation from the synchronous UI loop
pub(in crate::ui) fn block_on<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
