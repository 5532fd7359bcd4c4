/// Aggregated view of session progress, shown in the progress bar and the
/// submit confirmation prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub unanswered: usize,
    /// Zero-based index of the question currently displayed.
    pub current: usize,
    /// Progress-bar fraction `(current + 1) / total`.
    pub fraction: f64,
}

impl SessionProgress {
    /// Progress-bar width as a percentage.
    #[must_use]
    pub fn percent(&self) -> f64 {
        self.fraction * 100.0
    }
}
