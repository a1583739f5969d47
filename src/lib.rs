// Library surface for headless/integration tests and reuse.
// The binary in main.rs only wires the terminal, config and stores together.
pub mod app;
pub mod app_dirs;
pub mod color;
pub mod config;
pub mod logging;
pub mod record;
pub mod round;
pub mod runtime;
pub mod session;
pub mod ui;

pub use color::Color;
pub use record::{reconcile, RecordOutcome};
pub use round::{AnswerResult, RoundEngine, RoundError, RoundPhase, TickResult};
pub use session::SessionHistory;
