#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod notify;
pub mod sessions;

pub use ems_core::Clock;

pub use catalog::{AssessmentCatalogService, CatalogItem};
pub use error::SessionError;
pub use notify::{Notifier, RecordingNotifier};

pub use sessions::{
    AssessmentSession, CountdownTimer, IndicatorState, QuestionView, QuestionWidget, ResultView,
    SessionPhase, SessionProgress, SessionRunner, TickOutcome, TimerEvent, TimerState,
};
