//! Email capture for the detailed pricing guide
//!
//! There is no subscription backend: a submission is logged and completes
//! after a short simulated delay. The delivery step is pluggable so a real
//! endpoint can replace the logging stub.

use std::time::Duration;

use tracing::{info, warn};

use crate::error::LeadError;

/// Delay of the simulated submission
pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_millis(800);

type DeliverFn = Box<dyn Fn(&str) -> Result<(), String> + Send + Sync>;

/// Client-side check: non-empty after trimming and contains `@`
pub fn validate_email(email: &str) -> Result<&str, LeadError> {
    let trimmed = email.trim();
    if trimmed.is_empty() || !trimmed.contains('@') {
        return Err(LeadError::InvalidEmail(
            "Please enter a valid email address.".to_string(),
        ));
    }
    Ok(trimmed)
}

pub struct LeadCapture {
    delay: Duration,
    deliver: DeliverFn,
}

impl LeadCapture {
    pub fn new() -> Self {
        Self::with_delay(DEFAULT_SUBMIT_DELAY)
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            deliver: Box::new(|email| {
                info!(email = %email, "Email captured");
                Ok(())
            }),
        }
    }

    /// Replace the delivery step
    pub fn with_deliver<F>(mut self, deliver: F) -> Self
    where
        F: Fn(&str) -> Result<(), String> + Send + Sync + 'static,
    {
        self.deliver = Box::new(deliver);
        self
    }

    /// Validate and submit an email, calling `on_success` once delivered
    ///
    /// Validation failures are returned before any delay. Either error
    /// leaves the capture usable for another attempt.
    pub async fn submit<F>(&self, email: &str, on_success: F) -> Result<(), LeadError>
    where
        F: FnOnce(&str),
    {
        let email = validate_email(email)?;

        tokio::time::sleep(self.delay).await;

        if let Err(e) = (self.deliver)(email) {
            warn!(error = %e, "Error submitting email");
            return Err(LeadError::Submission(
                "We couldn't process your request. Please try again.".to_string(),
            ));
        }

        on_success(email);
        Ok(())
    }
}

impl Default for LeadCapture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_validate_email() {
        assert_eq!(validate_email("  founder@example.com ").unwrap(), "founder@example.com");
        assert!(validate_email("").is_err());
        assert!(validate_email("   ").is_err());
        assert!(validate_email("founder.example.com").is_err());
    }

    #[tokio::test]
    async fn test_submit_calls_back_with_email() {
        let capture = LeadCapture::with_delay(Duration::ZERO);
        let mut received = None;

        capture
            .submit("founder@example.com", |email| received = Some(email.to_string()))
            .await
            .unwrap();

        assert_eq!(received.as_deref(), Some("founder@example.com"));
    }

    #[tokio::test]
    async fn test_invalid_email_skips_delivery() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let capture = LeadCapture::with_delay(Duration::ZERO).with_deliver(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let result = capture.submit("not-an-email", |_| panic!("should not be called")).await;

        assert!(matches!(result, Err(LeadError::InvalidEmail(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_submission_failure_is_recoverable() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        let capture = LeadCapture::with_delay(Duration::ZERO).with_deliver(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err("connection reset".to_string())
            } else {
                Ok(())
            }
        });

        let first = capture.submit("a@b.co", |_| panic!("should not be called")).await;
        assert!(matches!(first, Err(LeadError::Submission(_))));

        let mut delivered = false;
        capture.submit("a@b.co", |_| delivered = true).await.unwrap();
        assert!(delivered);
    }
}
