//! Application state and key handling for the interactive UI

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use tui_input::backend::crossterm::EventHandler as _;
use tui_input::Input;

use crate::context::AppContext;
use crate::error::Result;
use crate::progress::{self, ProgressReport};

use super::messages::Message;

const PAGE_STEP: i64 = 10;
const MAX_MESSAGES: usize = 20;

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Apartment input and results
    Normal,
    /// Help screen
    Help,
}

/// Main application state
pub struct App<'a> {
    pub ctx: &'a AppContext,
    /// Apartment number being typed
    pub input: Input,
    /// Last applied apartment number, always within the dataset range
    pub selected: u32,
    /// Result for `selected`; `None` when the apartment has no row
    pub report: Option<ProgressReport>,
    pub mode: AppMode,
    pub messages: Vec<Message>,
}

impl<'a> App<'a> {
    /// Start on the lowest apartment number, like the original number input
    pub fn new(ctx: &'a AppContext) -> Result<Self> {
        let (min, _) = ctx.apartment_range();
        let mut app = App {
            ctx,
            input: Input::default(),
            selected: min,
            report: None,
            mode: AppMode::Normal,
            messages: Vec::new(),
        };
        app.select(min)?;
        Ok(app)
    }

    pub fn range(&self) -> (u32, u32) {
        self.ctx.apartment_range()
    }

    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
        if self.messages.len() > MAX_MESSAGES {
            self.messages.remove(0);
        }
    }

    /// Show `apartment`; a gap in the numbering becomes an error message
    pub fn select(&mut self, apartment: u32) -> Result<()> {
        self.selected = apartment;
        self.input = Input::new(apartment.to_string());

        match progress::compute_progress(self.ctx.dataset(), self.ctx.weights(), apartment) {
            Ok(report) => {
                tracing::debug!(apartment, overall = report.apartment_overall, "Selected apartment");
                self.report = Some(report);
                Ok(())
            }
            Err(e) if e.is_recoverable() => {
                tracing::debug!(apartment, "Apartment not in dataset");
                self.report = None;
                self.push_message(Message::error(format!(
                    "Apartment {} not found in data.",
                    apartment
                )));
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Clamp to the dataset range, the way the number input bounds its value
    fn clamp(&self, value: i64) -> u32 {
        let (min, max) = self.range();
        value.clamp(i64::from(min), i64::from(max)) as u32
    }

    fn step(&mut self, delta: i64) -> Result<()> {
        let target = self.clamp(i64::from(self.selected) + delta);
        self.select(target)
    }

    /// Apply whatever is typed in the input box
    fn submit(&mut self) -> Result<()> {
        let text = self.input.value().trim().to_string();
        let Ok(value) = text.parse::<i64>() else {
            self.push_message(Message::warning("Enter a whole apartment number"));
            self.input = Input::new(self.selected.to_string());
            return Ok(());
        };

        let target = self.clamp(value);
        if i64::from(target) != value {
            let (min, max) = self.range();
            self.push_message(Message::warning(format!(
                "{} is outside {}..={}, showing {}",
                value, min, max, target
            )));
        }
        self.select(target)
    }

    /// Returns `false` when the application should exit
    pub fn handle_event(&mut self, event: KeyEvent) -> Result<bool> {
        if event.modifiers.contains(KeyModifiers::CONTROL) && event.code == KeyCode::Char('c') {
            return Ok(false);
        }

        match self.mode {
            AppMode::Help => {
                self.mode = AppMode::Normal;
                Ok(true)
            }
            AppMode::Normal => self.handle_normal_mode(event),
        }
    }

    fn handle_normal_mode(&mut self, event: KeyEvent) -> Result<bool> {
        let (min, max) = self.range();
        match event.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(false),
            KeyCode::Char('?') => self.mode = AppMode::Help,
            KeyCode::Enter => self.submit()?,
            KeyCode::Up => self.step(1)?,
            KeyCode::Down => self.step(-1)?,
            KeyCode::PageUp => self.step(PAGE_STEP)?,
            KeyCode::PageDown => self.step(-PAGE_STEP)?,
            KeyCode::Home => self.select(min)?,
            KeyCode::End => self.select(max)?,
            KeyCode::Char('n') | KeyCode::Char('N') => {
                match self.ctx.dataset().next_apartment(self.selected) {
                    Some(next) => self.select(next)?,
                    None => self.push_message(Message::info("Already at the last apartment")),
                }
            }
            KeyCode::Char('p') | KeyCode::Char('P') => {
                match self.ctx.dataset().previous_apartment(self.selected) {
                    Some(prev) => self.select(prev)?,
                    None => self.push_message(Message::info("Already at the first apartment")),
                }
            }
            KeyCode::Char(c) if !c.is_ascii_digit() => {}
            KeyCode::Char(_)
            | KeyCode::Backspace
            | KeyCode::Delete
            | KeyCode::Left
            | KeyCode::Right => {
                self.input.handle_event(&Event::Key(event));
            }
            _ => {}
        }
        Ok(true)
    }
}
