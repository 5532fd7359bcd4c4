use std::sync::Mutex;

/// User-notification seam with block-until-dismissed semantics.
///
/// Stands in for the browser's `alert`/`confirm` pair so the session flow can
/// be exercised headless: the timer warning, the expiry notice, and the
/// leave-page confirmation all go through this trait.
pub trait Notifier: Send + Sync {
    /// Show a blocking message.
    fn alert(&self, message: &str);

    /// Ask a yes/no question; returns the user's choice.
    fn confirm(&self, message: &str) -> bool;
}

/// Test double that records every prompt and answers confirms with a preset
/// choice.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    alerts: Mutex<Vec<String>>,
    confirms: Mutex<Vec<String>>,
    confirm_response: bool,
}

impl RecordingNotifier {
    /// A notifier that declines every confirmation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier that accepts every confirmation.
    #[must_use]
    pub fn accepting() -> Self {
        Self {
            confirm_response: true,
            ..Self::default()
        }
    }

    /// Every alert shown so far, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if the backing lock is poisoned.
    #[must_use]
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().expect("notifier lock poisoned").clone()
    }

    /// Every confirmation asked so far, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if the backing lock is poisoned.
    #[must_use]
    pub fn confirms(&self) -> Vec<String> {
        self.confirms.lock().expect("notifier lock poisoned").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        if let Ok(mut alerts) = self.alerts.lock() {
            alerts.push(message.to_owned());
        }
    }

    fn confirm(&self, message: &str) -> bool {
        if let Ok(mut confirms) = self.confirms.lock() {
            confirms.push(message.to_owned());
        }
        self.confirm_response
    }
}
