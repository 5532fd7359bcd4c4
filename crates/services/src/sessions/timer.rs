use std::fmt;

/// Seconds remaining at which the one-time warning fires.
pub const WARNING_THRESHOLD_SECS: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Running,
    Expired,
    Stopped,
}

/// What a single one-second tick produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Tick { remaining: u64 },
    /// Remaining time crossed the warning threshold; emitted at most once.
    Warning { remaining: u64 },
    /// Remaining time reached zero; the timer no longer ticks.
    Expired,
}

/// Countdown over a fixed allotment, advanced by explicit one-second ticks.
///
/// The tick cadence is owned by the caller (an interval task, a UI loop, or a
/// test), which keeps the state machine deterministic. The warning latches on
/// crossing the threshold instead of an exact equality check, so an uneven
/// cadence cannot skip it; a session whose whole allotment is below the
/// threshold never warns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownTimer {
    remaining: u64,
    state: TimerState,
    warned: bool,
}

impl CountdownTimer {
    /// Arm a running timer with `time_limit_minutes * 60` seconds.
    #[must_use]
    pub fn new(time_limit_minutes: u32) -> Self {
        let remaining = u64::from(time_limit_minutes) * 60;
        Self {
            remaining,
            state: TimerState::Running,
            // Short assessments start below the threshold; warning them
            // immediately would be noise.
            warned: remaining <= WARNING_THRESHOLD_SECS,
        }
    }

    #[must_use]
    pub fn state(&self) -> TimerState {
        self.state
    }

    #[must_use]
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    /// Advance the countdown by one second.
    ///
    /// Returns `None` once the timer is expired or stopped; `Expired` is
    /// reported exactly once, on the tick that reaches zero.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if self.state != TimerState::Running {
            return None;
        }

        self.remaining = self.remaining.saturating_sub(1);

        if self.remaining == 0 {
            self.state = TimerState::Expired;
            return Some(TimerEvent::Expired);
        }

        if !self.warned && self.remaining <= WARNING_THRESHOLD_SECS {
            self.warned = true;
            return Some(TimerEvent::Warning {
                remaining: self.remaining,
            });
        }

        Some(TimerEvent::Tick {
            remaining: self.remaining,
        })
    }

    /// Halt ticking without triggering expiry behavior. Idempotent; an
    /// expired timer stays expired.
    pub fn stop(&mut self) {
        if self.state == TimerState::Running {
            self.state = TimerState::Stopped;
        }
    }
}

impl fmt::Display for CountdownTimer {
    /// Zero-padded `MM:SS` of the remaining time.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = self.remaining / 60;
        let seconds = self.remaining % 60;
        write!(f, "{minutes:02}:{seconds:02}")
    }
}
