mod app;
mod handlers;
mod history;
mod rendering;
mod types;

pub use app::App;
pub use handlers::cell_at;
pub use types::{LogBuffer, Screen};

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::stdout;

use crate::{db::RecordStore, engine::EngineConfig, mode::Mode};

/// Entry point for running the UI.
pub fn run_ui(store: RecordStore, config: EngineConfig, mode: Mode) -> Result<()> {
    let logs = LogBuffer::new();
    let mut app = App::new(store, config, mode, logs);

    let mut stdout = stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}
