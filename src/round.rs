use crate::color::{Color, ColorSource};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundPhase {
    NotStarted,
    Running,
    Finished,
}

/// Misuse of the engine by its driver
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundError {
    #[error("round has not been started")]
    NotStarted,
    #[error("round is no longer running")]
    Inactive,
    #[error("round duration must be at least one second")]
    InvalidDuration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickResult {
    Running(u32),
    Finished(u32),
    AlreadyFinished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnswerResult {
    Correct(Color),
    Incorrect,
}

/// Notifications for the presentation layer, drained with [`RoundEngine::take_events`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundEvent {
    TargetChanged(Color),
    AnswerCorrect { score: u32, next: Color },
    AnswerIncorrect { selected: Color },
    TimeRemaining(u32),
    Finished { final_score: u32 },
}

/// Snapshot of an armed round
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundState {
    pub score: u32,
    pub target: Color,
    pub remaining_secs: u32,
    pub is_running: bool,
}

/// represents one countdown round
///
/// The engine never reads a clock: every [`tick`](RoundEngine::tick) counts as
/// exactly one elapsed second, and the driver decides when to deliver them.
#[derive(Debug)]
pub struct RoundEngine<S: ColorSource> {
    source: S,
    phase: RoundPhase,
    score: u32,
    target: Option<Color>,
    remaining_secs: u32,
    duration_secs: u32,
    events: Vec<RoundEvent>,
}

impl<S: ColorSource> RoundEngine<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            phase: RoundPhase::NotStarted,
            score: 0,
            target: None,
            remaining_secs: 0,
            duration_secs: 0,
            events: vec![],
        }
    }

    /// Arms a fresh round, discarding whatever state the previous one left.
    pub fn start(&mut self, duration_secs: u32) -> Result<(), RoundError> {
        if duration_secs == 0 {
            return Err(RoundError::InvalidDuration);
        }

        let target = self.source.next_color();
        self.phase = RoundPhase::Running;
        self.score = 0;
        self.target = Some(target);
        self.remaining_secs = duration_secs;
        self.duration_secs = duration_secs;
        self.events.clear();
        self.events.push(RoundEvent::TargetChanged(target));

        tracing::debug!(duration_secs, %target, "round started");
        Ok(())
    }

    pub fn tick(&mut self) -> Result<TickResult, RoundError> {
        match self.phase {
            RoundPhase::NotStarted => Err(RoundError::NotStarted),
            RoundPhase::Finished => Ok(TickResult::AlreadyFinished),
            RoundPhase::Running => {
                self.remaining_secs = self.remaining_secs.saturating_sub(1);
                self.events
                    .push(RoundEvent::TimeRemaining(self.remaining_secs));

                if self.remaining_secs > 0 {
                    return Ok(TickResult::Running(self.remaining_secs));
                }

                self.phase = RoundPhase::Finished;
                self.events.push(RoundEvent::Finished {
                    final_score: self.score,
                });
                tracing::info!(final_score = self.score, "round finished");
                Ok(TickResult::Finished(self.score))
            }
        }
    }

    /// Checks `selected` against the current target.
    ///
    /// A wrong answer neither costs points nor moves on to another color; only a
    /// correct one re-rolls the target, which may come up the same again.
    pub fn submit_answer(&mut self, selected: Color) -> Result<AnswerResult, RoundError> {
        let target = match (self.phase, self.target) {
            (RoundPhase::NotStarted, _) => return Err(RoundError::NotStarted),
            (RoundPhase::Finished, _) => return Err(RoundError::Inactive),
            (RoundPhase::Running, None) => return Err(RoundError::NotStarted),
            (RoundPhase::Running, Some(target)) => target,
        };

        if selected != target {
            self.events.push(RoundEvent::AnswerIncorrect { selected });
            tracing::trace!(%selected, %target, "incorrect answer");
            return Ok(AnswerResult::Incorrect);
        }

        let next = self.source.next_color();
        self.score += 1;
        self.target = Some(next);
        self.events.push(RoundEvent::AnswerCorrect {
            score: self.score,
            next,
        });
        self.events.push(RoundEvent::TargetChanged(next));
        tracing::trace!(score = self.score, %next, "correct answer");
        Ok(AnswerResult::Correct(next))
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == RoundPhase::Running
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn target(&self) -> Option<Color> {
        self.target
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn state(&self) -> Option<RoundState> {
        self.target.map(|target| RoundState {
            score: self.score,
            target,
            remaining_secs: self.remaining_secs,
            is_running: self.is_running(),
        })
    }

    /// True while running with `threshold` seconds or fewer left
    pub fn is_low_time(&self, threshold: u32) -> bool {
        self.is_running() && self.remaining_secs <= threshold
    }

    pub fn take_events(&mut self) -> Vec<RoundEvent> {
        std::mem::take(&mut self.events)
    }
}
