mod progress;
mod runner;
mod service;
mod timer;
mod view;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use runner::{SessionRunner, TickOutcome};
pub use service::{AssessmentSession, SessionPhase};
pub use timer::{CountdownTimer, TimerEvent, TimerState, WARNING_THRESHOLD_SECS};
pub use view::{IndicatorState, QuestionView, QuestionWidget, ResultView};
