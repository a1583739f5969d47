use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::color::{Color, ColorSource};
use crate::config::Config;
use crate::record::{settle_round, RecordOutcome, RecordStore};
use crate::round::{RoundEngine, RoundError, RoundEvent, TickResult};
use crate::session::SessionHistory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Welcome,
    Rules,
    Playing,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Incorrect,
}

/// What the event loop should do after a key was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    None,
    RoundStarted,
    Quit,
}

/// Result screen data for the round that just ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSummary {
    pub final_score: u32,
    /// None when the record store could not be reached
    pub record: Option<RecordOutcome>,
}

/// Screen flow around a [`RoundEngine`]: owns the session history and hands
/// every final score to it and to the record store.
pub struct App {
    pub config: Config,
    screen: Screen,
    engine: RoundEngine<Box<dyn ColorSource>>,
    history: SessionHistory,
    store: Box<dyn RecordStore>,
    feedback: Option<Feedback>,
    last_summary: Option<RoundSummary>,
}

impl App {
    pub fn new(
        config: Config,
        source: Box<dyn ColorSource>,
        store: Box<dyn RecordStore>,
    ) -> Self {
        Self {
            config,
            screen: Screen::Welcome,
            engine: RoundEngine::new(source),
            history: SessionHistory::new(),
            store,
            feedback: None,
            last_summary: None,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn engine(&self) -> &RoundEngine<Box<dyn ColorSource>> {
        &self.engine
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback
    }

    pub fn last_summary(&self) -> Option<RoundSummary> {
        self.last_summary
    }

    pub fn is_low_time(&self) -> bool {
        self.engine.is_low_time(self.config.warning_secs)
    }

    pub fn start_round(&mut self) -> Result<(), RoundError> {
        self.engine.start(self.config.round_secs)?;
        self.feedback = None;
        self.last_summary = None;
        self.screen = Screen::Playing;
        self.dispatch_events();
        Ok(())
    }

    /// One elapsed second of the countdown
    pub fn on_tick(&mut self) {
        if self.screen != Screen::Playing {
            return;
        }
        // feedback stays up for about one tick
        self.feedback = None;

        match self.engine.tick() {
            Ok(TickResult::Running(_)) | Ok(TickResult::Finished(_)) => self.dispatch_events(),
            Ok(TickResult::AlreadyFinished) => {}
            Err(e) => tracing::warn!("tick ignored: {e}"),
        }
    }

    pub fn answer(&mut self, selected: Color) {
        match self.engine.submit_answer(selected) {
            Ok(_) => self.dispatch_events(),
            // a late press after the round ended
            Err(RoundError::Inactive) => {}
            Err(e) => tracing::warn!("answer ignored: {e}"),
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> AppAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return AppAction::Quit;
        }

        match self.screen {
            Screen::Welcome => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => self.begin(),
                KeyCode::Char('?') | KeyCode::Char('h') => {
                    self.screen = Screen::Rules;
                    AppAction::None
                }
                KeyCode::Esc | KeyCode::Char('q') => AppAction::Quit,
                _ => AppAction::None,
            },
            Screen::Rules => match key.code {
                KeyCode::Enter => self.begin(),
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.screen = Screen::Welcome;
                    AppAction::None
                }
                _ => AppAction::None,
            },
            Screen::Playing => match key.code {
                KeyCode::Esc => {
                    // leaving mid-round drops it without recording a score
                    tracing::info!(score = self.engine.score(), "round abandoned");
                    self.engine.take_events();
                    self.feedback = None;
                    self.screen = Screen::Welcome;
                    AppAction::None
                }
                KeyCode::Char(c) => {
                    if let Some(color) = Color::from_key(c) {
                        self.answer(color);
                    }
                    AppAction::None
                }
                _ => AppAction::None,
            },
            Screen::Results => match key.code {
                KeyCode::Enter | KeyCode::Char('r') => self.begin(),
                KeyCode::Char('m') => {
                    self.screen = Screen::Welcome;
                    AppAction::None
                }
                KeyCode::Esc | KeyCode::Char('q') => AppAction::Quit,
                _ => AppAction::None,
            },
        }
    }

    fn begin(&mut self) -> AppAction {
        match self.start_round() {
            Ok(()) => AppAction::RoundStarted,
            Err(e) => {
                tracing::error!("could not start round: {e}");
                AppAction::None
            }
        }
    }

    fn dispatch_events(&mut self) {
        for event in self.engine.take_events() {
            match event {
                RoundEvent::AnswerCorrect { .. } => self.feedback = Some(Feedback::Correct),
                RoundEvent::AnswerIncorrect { .. } => self.feedback = Some(Feedback::Incorrect),
                RoundEvent::Finished { final_score } => self.finish_round(final_score),
                RoundEvent::TargetChanged(color) => tracing::trace!(%color, "target changed"),
                RoundEvent::TimeRemaining(secs) => tracing::trace!(secs, "time remaining"),
            }
        }
    }

    fn finish_round(&mut self, final_score: u32) {
        self.history.record(final_score);

        let record = match settle_round(self.store.as_mut(), final_score) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                tracing::warn!("best-ever record unavailable: {e}");
                None
            }
        };

        self.last_summary = Some(RoundSummary {
            final_score,
            record,
        });
        self.feedback = None;
        self.screen = Screen::Results;
    }
}
