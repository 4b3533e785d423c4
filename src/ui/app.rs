//! Main TUI application state and logic

use super::panes::{
    render_calls_pane, render_evaluated_pane, render_source_pane, render_status_bar, render_terminal_pane,
    render_variables_pane, SourceScrollState, StatusRenderData,
};
use crate::constants::AUTO_PLAY_INTERVAL_MS;
use crate::errors::ReconstructError;
use crate::producer::Producer;
use crate::replay::predicates::StepMode;
use crate::session::Simulation;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Evaluated,
    Output,
    Variables,
    Calls,
}

impl FocusedPane {
    /// Move focus clockwise: source -> evaluated -> output -> variables -> calls
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Evaluated,
            FocusedPane::Evaluated => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Variables,
            FocusedPane::Variables => FocusedPane::Calls,
            FocusedPane::Calls => FocusedPane::Source,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Calls,
            FocusedPane::Evaluated => FocusedPane::Source,
            FocusedPane::Output => FocusedPane::Evaluated,
            FocusedPane::Variables => FocusedPane::Output,
            FocusedPane::Calls => FocusedPane::Variables,
        }
    }
}

fn next_mode(mode: StepMode) -> StepMode {
    match mode {
        StepMode::Break => StepMode::Statement,
        StepMode::Statement => StepMode::Expression,
        StepMode::Expression => StepMode::Break,
    }
}

/// The main application state
pub struct App<P: Producer> {
    pub simulation: Simulation<P>,

    /// Granularity used by the step keys
    pub mode: StepMode,

    pub focused_pane: FocusedPane,

    /// Per-pane scroll state
    pub source_scroll: SourceScrollState,
    pub evaluated_scroll: SourceScrollState,
    pub variables_scroll: usize,
    pub calls_scroll: usize,
    pub output_scroll: usize,

    pub should_quit: bool,
    pub status_message: String,

    /// Set when a query for the current position failed
    pub query_error: Option<String>,

    pub is_playing: bool,
    pub last_play_time: Instant,
    pub last_space_press: Instant,
}

impl<P: Producer> App<P> {
    /// Wrap a simulation that has already been run
    pub fn new(simulation: Simulation<P>) -> Self {
        let mode = simulation.config().step_mode;
        let long_ago = Instant::now()
            .checked_sub(Duration::from_secs(1))
            .unwrap_or_else(Instant::now);

        App {
            simulation,
            mode,
            focused_pane: FocusedPane::Source,
            source_scroll: SourceScrollState::default(),
            evaluated_scroll: SourceScrollState::default(),
            variables_scroll: 0,
            calls_scroll: 0,
            output_scroll: usize::MAX,
            should_quit: false,
            status_message: String::from("Ready!"),
            query_error: None,
            is_playing: false,
            last_play_time: Instant::now(),
            last_space_press: long_ago,
        }
    }

    /// Run the event loop until the user quits
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= Duration::from_millis(AUTO_PLAY_INTERVAL_MS) {
                if self.simulation.step_forward_by(self.mode) {
                    self.status_message = "Playing...".to_string();
                    self.output_scroll = usize::MAX;
                } else {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                }
                self.last_play_time = Instant::now();
            }

            // Poll with a timeout so auto-play keeps ticking
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[0]);

        // Left column: source | evaluated | output
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(40),
                Constraint::Percentage(35),
                Constraint::Percentage(25),
            ])
            .split(columns[0]);

        // Right column: variables | calls
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(columns[1]);

        self.query_error = None;
        let sim = &self.simulation;

        let statement = sim.current_statement().and_then(|step| step.range);
        let evaluated = match sim.evaluated_code() {
            Ok(code) => code,
            Err(err) => {
                self.query_error = Some(err.to_string());
                sim.code().to_string()
            }
        };
        let mask = match sim.highlighted_code() {
            Ok(mask) => mask,
            // The source pane still shades multi-line statements
            Err(ReconstructError::MultiLineHighlight { .. }) => None,
            Err(err) => {
                self.query_error = Some(err.to_string());
                None
            }
        };
        let tree = match sim.current_call_tree() {
            Ok(tree) => tree,
            Err(err) => {
                self.query_error = Some(err.to_string());
                None
            }
        };

        render_source_pane(
            frame,
            left_rows[0],
            sim.code(),
            statement,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        render_evaluated_pane(
            frame,
            left_rows[1],
            &evaluated,
            mask.as_deref(),
            sim.config().highlight_block,
            self.focused_pane == FocusedPane::Evaluated,
            &mut self.evaluated_scroll,
        );

        render_terminal_pane(
            frame,
            left_rows[2],
            &sim.output(),
            self.focused_pane == FocusedPane::Output,
            &mut self.output_scroll,
        );

        render_variables_pane(
            frame,
            right_rows[0],
            &sim.variables(),
            self.focused_pane == FocusedPane::Variables,
            &mut self.variables_scroll,
        );

        render_calls_pane(
            frame,
            right_rows[1],
            tree.as_ref(),
            self.focused_pane == FocusedPane::Calls,
            &mut self.calls_scroll,
        );

        let mode = self.mode;
        let is_at_start = sim.is_at_start_by(mode);
        let is_at_end = sim.is_at_end();

        let status = StatusRenderData {
            message: self.query_error.as_deref().unwrap_or(&self.status_message),
            cursor: sim.cursor(),
            total_steps: sim.total_steps(),
            statement_ref: sim.current_statement_ref(),
            mode,
            is_playing: self.is_playing,
            is_at_start,
            is_at_end,
            is_error: self.query_error.is_some(),
        };
        render_status_bar(frame, main_chunks[1], &status);
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c.to_digit(10).map_or(1, |d| d as usize);
                let stepped = (0..n)
                    .take_while(|_| self.simulation.step_forward_by(self.mode))
                    .count();
                self.status_message = format!("Stepped forward {} step(s)", stepped);
                self.output_scroll = usize::MAX;
            }
            KeyCode::Char('m') => {
                self.mode = next_mode(self.mode);
                self.status_message = format!("Stepping by {:?}", self.mode).to_lowercase();
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Left => {
                self.is_playing = false;
                self.step_backward();
            }
            KeyCode::Right => {
                self.is_playing = false;
                self.step_forward();
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Source => self.source_scroll.scroll_up(),
                FocusedPane::Evaluated => self.evaluated_scroll.scroll_up(),
                FocusedPane::Output => self.output_scroll = self.output_scroll.saturating_sub(1),
                FocusedPane::Variables => self.variables_scroll = self.variables_scroll.saturating_sub(1),
                FocusedPane::Calls => self.calls_scroll = self.calls_scroll.saturating_sub(1),
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Source => self.source_scroll.scroll_down(),
                FocusedPane::Evaluated => self.evaluated_scroll.scroll_down(),
                FocusedPane::Output => self.output_scroll = self.output_scroll.saturating_add(1),
                FocusedPane::Variables => self.variables_scroll = self.variables_scroll.saturating_add(1),
                FocusedPane::Calls => self.calls_scroll = self.calls_scroll.saturating_add(1),
            },
            KeyCode::Char(' ') => {
                // Debounce key repeat
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    if self.is_playing {
                        self.last_play_time = Instant::now()
                            .checked_sub(Duration::from_millis(AUTO_PLAY_INTERVAL_MS))
                            .unwrap_or_else(Instant::now);
                        self.status_message = "Playing...".to_string();
                    } else {
                        self.status_message = "Paused".to_string();
                    }
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                while self.simulation.step_forward_by(self.mode) {}
                self.status_message = "Jumped to end".to_string();
                self.output_scroll = usize::MAX;
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                while self.simulation.step_backward_by(self.mode) {}
                self.status_message = "Jumped to start".to_string();
                self.output_scroll = usize::MAX;
            }
            _ => {}
        }
    }

    fn step_forward(&mut self) {
        if self.simulation.step_forward_by(self.mode) {
            self.status_message = "Stepped forward".to_string();
            self.output_scroll = usize::MAX;
        } else {
            self.status_message = "Cannot step forward: end of trace".to_string();
        }
    }

    fn step_backward(&mut self) {
        if self.simulation.step_backward_by(self.mode) {
            self.status_message = "Stepped backward".to_string();
            self.output_scroll = usize::MAX;
        } else {
            self.status_message = "Cannot step backward: start of trace".to_string();
        }
    }
}
