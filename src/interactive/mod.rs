//! Interactive terminal UI
//!
//! A single apartment-number input with the weighted progress summary and the
//! activity comparison table underneath.

pub mod app;
pub mod events;
pub mod messages;
pub mod ui;
pub mod utils;

pub use app::App;
pub use events::EventHandler;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::context::AppContext;
use crate::error::{ProgressError, Result};
use crate::loader::LoadSummary;
use crate::report::render_load_summary;

use messages::Message;

/// Run the interactive UI application
pub fn run_interactive(ctx: &AppContext) -> Result<()> {
    let mut app = App::new(ctx)?;
    for message in load_messages(ctx.summary()) {
        app.push_message(message);
    }

    // Setup terminal
    enable_raw_mode().map_err(|e| ProgressError::Terminal(e.to_string()))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

/// Startup messages describing the load
fn load_messages(summary: &LoadSummary) -> Vec<Message> {
    let mut messages = vec![Message::info(render_load_summary(summary))];
    if !summary.mixed_scale_columns.is_empty() {
        messages.push(Message::warning(format!(
            "Columns rescaled as percentages despite 0-1 values: {}",
            summary.mixed_scale_columns.join(", ")
        )));
    }
    if !summary.out_of_range_columns.is_empty() {
        messages.push(Message::warning(format!(
            "Columns with values outside 0-100%: {}",
            summary.out_of_range_columns.join(", ")
        )));
    }
    messages
}

/// Main application loop
fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let event_handler = EventHandler::new();

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if let Some(event) = event_handler.next()? {
            if !app.handle_event(event)? {
                break;
            }
        }
    }

    Ok(())
}
