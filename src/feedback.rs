use std::time::{Duration, Instant};

/// How long a transient success message ("Copied!") stays visible
pub const FLASH_DURATION: Duration = Duration::from_millis(2000);

/// Error, success and stats lines shown under the panes.
///
/// Error and success are kept mutually exclusive: reporting one clears the other.
#[derive(Debug, Default, Clone)]
pub struct Feedback {
    error: Option<String>,
    success: Option<String>,
    stats: Option<String>,
    success_deadline: Option<Instant>,
}

impl Feedback {
    pub fn report_error(&mut self, message: impl Into<String>) {
        self.clear_success();
        self.error = Some(message.into());
    }

    pub fn report_success(&mut self, message: impl Into<String>) {
        self.error = None;
        self.success = Some(message.into());
        self.success_deadline = None;
    }

    /// Success message that disappears once `FLASH_DURATION` has passed
    pub fn flash_success(&mut self, message: impl Into<String>, now: Instant) {
        self.report_success(message);
        self.success_deadline = Some(now + FLASH_DURATION);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn clear_success(&mut self) {
        self.success = None;
        self.success_deadline = None;
    }

    pub fn set_stats(&mut self, stats: Option<String>) {
        self.stats = stats;
    }

    pub fn clear_all(&mut self) {
        self.clear_error();
        self.clear_success();
        self.stats = None;
    }

    /// Drop a flashed success message whose deadline has passed
    pub fn expire(&mut self, now: Instant) {
        if self.success_deadline.is_some_and(|deadline| now >= deadline) {
            self.clear_success();
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    pub fn stats(&self) -> Option<&str> {
        self.stats.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.error.is_none() && self.success.is_none() && self.stats.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_and_success_are_exclusive() {
        let mut feedback = Feedback::default();
        feedback.report_success("ok");
        feedback.report_error("bad");
        assert_eq!(feedback.error(), Some("bad"));
        assert_eq!(feedback.success(), None);

        feedback.report_success("ok again");
        assert_eq!(feedback.error(), None);
        assert_eq!(feedback.success(), Some("ok again"));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut feedback = Feedback::default();
        feedback.clear_error();
        feedback.clear_success();
        feedback.clear_error();
        assert!(feedback.is_empty());
    }

    #[test]
    fn test_stats_independent_of_messages() {
        let mut feedback = Feedback::default();
        feedback.set_stats(Some("From 5 to 3 characters".to_string()));
        feedback.report_error("bad");
        assert_eq!(feedback.stats(), Some("From 5 to 3 characters"));
        feedback.set_stats(None);
        assert_eq!(feedback.stats(), None);
    }

    #[test]
    fn test_flash_expires_after_deadline() {
        let mut feedback = Feedback::default();
        let start = Instant::now();
        feedback.flash_success("Copied!", start);

        feedback.expire(start + Duration::from_millis(1999));
        assert_eq!(feedback.success(), Some("Copied!"));

        feedback.expire(start + FLASH_DURATION);
        assert_eq!(feedback.success(), None);
    }

    #[test]
    fn test_plain_success_does_not_expire() {
        let mut feedback = Feedback::default();
        let start = Instant::now();
        feedback.flash_success("Copied!", start);
        feedback.report_success("Conversion successful!");

        feedback.expire(start + Duration::from_secs(10));
        assert_eq!(feedback.success(), Some("Conversion successful!"));
    }
}
