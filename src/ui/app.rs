//! Main TUI application state and logic

use crate::board::Board;
use crate::config::Settings;
use crate::content::{Advance, Course, Exercise, Level, Progress};
use crate::interpreter::events::{ExecutionEvent, Side};
use crate::interpreter::runner::Runner;
use crate::interpreter::walker::{Cue, Outcome, RunReport};
use crate::validator::Feedback;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Which source pane is focused for scrolling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Example,
    Student,
}

impl FocusedPane {
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Example => FocusedPane::Student,
            FocusedPane::Student => FocusedPane::Example,
        }
    }
}

/// The main application state
pub struct App {
    settings: Settings,
    course: Course,
    progress: Progress,
    runner: Runner,

    example_board: Board,
    student_board: Board,

    /// File the learner's program is read from, if any
    student_path: Option<PathBuf>,
    student_source: String,

    focused_pane: FocusedPane,
    example_scroll: super::panes::SourceScrollState,
    student_scroll: super::panes::SourceScrollState,

    /// Feedback of the last check of the current exercise
    feedback: Option<Feedback>,
    /// The current exercise has been checked successfully
    passed: bool,
    show_popup: bool,

    /// End of the pause cue being honoured
    resume_at: Option<Instant>,

    should_quit: bool,
    status_message: String,
    status_is_error: bool,
}

impl App {
    pub fn new(
        settings: Settings,
        course: Course,
        student_path: Option<PathBuf>,
        student_source: String,
    ) -> Self {
        let progress = Progress::default();
        let status_message = if student_path.is_some() {
            "Prêt !".to_string()
        } else {
            "Aucun fichier: lance pinquest <programme.pin>".to_string()
        };
        App {
            runner: Runner::new(settings.timing),
            settings,
            show_popup: progress.shows_popup(&course),
            course,
            progress,
            example_board: Board::new(Side::Example),
            student_board: Board::new(Side::Student),
            student_path,
            student_source,
            focused_pane: FocusedPane::Student,
            example_scroll: Default::default(),
            student_scroll: Default::default(),
            feedback: None,
            passed: false,
            resume_at: None,
            should_quit: false,
            status_message,
            status_is_error: false,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            self.tick(Instant::now());
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            // Wake up for the end of a pause even without input
            let timeout = self
                .resume_at
                .map(|deadline| deadline.saturating_duration_since(Instant::now()))
                .map_or(POLL_INTERVAL, |left| left.min(POLL_INTERVAL));

            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        self.runner.stop();
        Ok(())
    }

    fn level(&self) -> &Level {
        self.course.level(self.progress)
    }

    fn exercise(&self) -> &Exercise {
        self.course.exercise(self.progress)
    }

    /// Deliver cues of the active run until one asks to wait
    fn tick(&mut self, now: Instant) {
        if let Some(deadline) = self.resume_at {
            if now < deadline {
                return;
            }
            self.resume_at = None;
        }

        while let Some(cue) = self.runner.next_cue() {
            match cue {
                Cue::Emit(event) => self.apply_event(&event),
                Cue::Pause(duration) => {
                    self.resume_at = Some(now + duration);
                    return;
                }
            }
        }

        if let Some(report) = self.runner.take_report() {
            self.finish_run(report);
        }
    }

    fn apply_event(&mut self, event: &ExecutionEvent) {
        self.example_board.apply(event);
        self.student_board.apply(event);
    }

    fn finish_run(&mut self, report: RunReport) {
        let (message, is_error) = match &report.outcome {
            Outcome::Completed => ("Exécution terminée".to_string(), false),
            Outcome::Cancelled => ("Exécution arrêtée".to_string(), false),
            Outcome::Failed(error) => (format!("Erreur à la {}", error), true),
        };
        self.status_message = message;
        self.status_is_error = is_error;
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(35),
                Constraint::Percentage(35),
                Constraint::Percentage(30),
            ])
            .split(main_chunks[1]);

        let example_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(columns[0]);
        let student_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(columns[1]);

        let level = self.course.level(self.progress);
        let exercise = self.course.exercise(self.progress);

        super::panes::render_header(
            frame,
            main_chunks[0],
            level,
            self.progress.fraction(&self.course),
        );

        super::panes::render_source_pane(
            frame,
            example_rows[0],
            "Exemple",
            &exercise.example_code,
            self.example_board.highlighted(),
            self.example_board.error(),
            self.focused_pane == FocusedPane::Example,
            &mut self.example_scroll,
        );
        super::panes::render_board_pane(frame, example_rows[1], "Carte exemple", &self.example_board);

        let student_title = match &self.student_path {
            Some(path) => format!("Ton code ({})", path.display()),
            None => "Ton code".to_string(),
        };
        super::panes::render_source_pane(
            frame,
            student_rows[0],
            &student_title,
            &self.student_source,
            self.student_board.highlighted(),
            self.student_board.error(),
            self.focused_pane == FocusedPane::Student,
            &mut self.student_scroll,
        );
        super::panes::render_board_pane(frame, student_rows[1], "Ta carte", &self.student_board);

        super::panes::render_challenge_pane(
            frame,
            columns[2],
            &exercise.challenge,
            self.feedback.as_ref(),
            self.passed,
        );

        super::panes::render_status_bar(
            frame,
            main_chunks[2],
            &self.status_message,
            self.runner.active_side(),
            self.status_is_error,
        );

        if self.show_popup {
            super::panes::render_popup(frame, size, &level.popup);
        }
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        if self.show_popup {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('h') | KeyCode::Char('H')
            ) {
                self.show_popup = false;
            }
            if !matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q')) {
                return;
            }
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.runner.stop();
                self.should_quit = true;
            }
            KeyCode::Char('x') | KeyCode::Char('X') => self.run_example(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.run_student(),
            KeyCode::Char('s') | KeyCode::Char('S') => {
                if self.runner.is_busy() {
                    self.runner.stop();
                    self.set_status("Arrêt demandé...");
                }
            }
            KeyCode::Char('c') | KeyCode::Char('C') => self.check(),
            KeyCode::Char('n') | KeyCode::Char('N') => self.next_exercise(),
            KeyCode::Char('l') | KeyCode::Char('L') => self.reload(),
            KeyCode::Char('h') | KeyCode::Char('H') => self.show_popup = true,
            KeyCode::Tab => self.focused_pane = self.focused_pane.next(),
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Example => self.example_scroll.scroll_up(),
                FocusedPane::Student => self.student_scroll.scroll_up(),
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Example => self.example_scroll.scroll_down(),
                FocusedPane::Student => self.student_scroll.scroll_down(),
            },
            _ => {}
        }
    }

    fn run_example(&mut self) {
        let code = self.exercise().example_code.clone();
        if self.runner.start(&code, Side::Example, false) {
            self.example_board.reset();
            self.resume_at = None;
            self.set_status("Exemple en cours...");
        } else {
            self.set_status("Une exécution est déjà en cours");
        }
    }

    fn run_student(&mut self) {
        if self
            .runner
            .start(&self.student_source, Side::Student, self.settings.looping)
        {
            self.student_board.reset();
            self.resume_at = None;
            self.set_status("Ton code s'exécute...");
        } else {
            self.set_status("Une exécution est déjà en cours");
        }
    }

    fn check(&mut self) {
        let exercise = self.exercise();
        let Some(outcome) = self.runner.check(
            &self.student_source,
            &exercise.expected_state,
            exercise.validate_loop,
        ) else {
            self.set_status("Attends la fin de l'exécution pour vérifier");
            return;
        };

        let completed = outcome.completed(self.progress.is_last_exercise(&self.course));
        info!(
            level = self.level().number,
            exercise = exercise.number,
            success = completed.success,
            "exercise checked"
        );
        self.feedback = Some(outcome.feedback());
        self.passed = completed.success;
        if completed.last_exercise {
            self.set_status("Niveau terminé ! Appuie sur n pour continuer");
        } else if completed.success {
            self.set_status("Bravo ! Appuie sur n pour l'exercice suivant");
        } else {
            self.set_status("Corrige ton code puis vérifie encore");
        }
    }

    fn next_exercise(&mut self) {
        if !self.passed {
            self.set_status("Réussis d'abord cet exercice (c pour vérifier)");
            return;
        }
        if self.runner.is_busy() {
            self.set_status("Une exécution est déjà en cours");
            return;
        }
        match self.progress.advance(&self.course) {
            Advance::Exercise | Advance::Level => {
                debug!(
                    level = self.progress.level_index(),
                    exercise = self.progress.exercise_index(),
                    "exercise loaded"
                );
                self.load_exercise();
                let (current, total) = self.progress.fraction(&self.course);
                let message = format!("Exercice {}/{}", current, total);
                self.set_status(&message);
            }
            Advance::Complete => self.set_status("Bravo ! Tu as terminé toutes les quêtes !"),
        }
    }

    fn load_exercise(&mut self) {
        self.example_board.reset();
        self.student_board.reset();
        self.example_scroll = Default::default();
        self.student_scroll = Default::default();
        self.feedback = None;
        self.passed = false;
        self.show_popup = self.progress.shows_popup(&self.course);
    }

    fn reload(&mut self) {
        if self.runner.is_busy() {
            self.set_status("Une exécution est déjà en cours");
            return;
        }
        let Some(path) = &self.student_path else {
            self.set_status("Aucun fichier à recharger");
            return;
        };
        match fs::read_to_string(path) {
            Ok(source) => {
                self.student_source = source;
                self.student_board.reset();
                self.feedback = None;
                self.passed = false;
                self.set_status("Fichier rechargé");
            }
            Err(err) => {
                let message = format!("Lecture impossible: {}", err);
                self.set_status(&message);
                self.status_is_error = true;
            }
        }
    }

    fn set_status(&mut self, message: &str) {
        self.status_message = message.to_string();
        self.status_is_error = false;
    }
}
