//! # Mock Mailer
//!
//! [`MockMailer`] stands in for a real [`Outbox`](super::Outbox): it hands out an
//! ordinary [`OutboxClient`], answers each envelope from a queue of
//! expectations, and lets the test [`verify`](MockMailer::verify) that every
//! expectation was used.
//!
//! | Feature | MockMailer | Outbox + transport |
//! |---------|------------|--------------------|
//! | **Speed** | Instant (in-memory) | Depends on the transport |
//! | **Determinism** | Fully scripted | Subject to the transport |
//! | **Error Injection** | Easy (`return_err`) | Needs a failing transport |
//!
//! ```rust
//! use callbacks_recipe::mailer::mock::MockMailer;
//! use callbacks_recipe::mailer::{Envelope, Mailer, MailerError};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockMailer::new();
//!     mock.expect_deliver().to("contact@example.com").return_ok();
//!     mock.expect_deliver().return_err(MailerError::Unavailable);
//!
//!     let mailer = mock.mailer();
//!     let envelope = Envelope {
//!         to: "contact@example.com".into(),
//!         reply_to: "ada@example.com".into(),
//!         subject: "Hi".into(),
//!         body: "Hello".into(),
//!     };
//!     assert!(mailer.deliver(envelope.clone()).await.is_ok());
//!     assert_eq!(mailer.deliver(envelope).await, Err(MailerError::Unavailable));
//!
//!     mock.verify();
//! }
//! ```

use super::outbox::{MailRequest, OutboxClient};
use super::{Envelope, MailerError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

struct Expectation {
    to: Option<String>,
    response: Result<(), MailerError>,
}

#[derive(Default)]
struct Recorded {
    delivered: Vec<Envelope>,
    unexpected: Vec<String>,
}

/// An outbox whose answers are scripted by the test.
pub struct MockMailer {
    client: OutboxClient,
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
    recorded: Arc<Mutex<Recorded>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl Default for MockMailer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMailer {
    /// Creates a mock with no expectations. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<MailRequest>(100);
        let expectations = Arc::new(Mutex::new(VecDeque::<Expectation>::new()));
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let expectations_clone = expectations.clone();
        let recorded_clone = recorded.clone();

        let handle = tokio::spawn(async move {
            while let Some(MailRequest {
                envelope,
                respond_to,
            }) = receiver.recv().await
            {
                let expectation = expectations_clone.lock().unwrap().pop_front();
                let mut recorded = recorded_clone.lock().unwrap();

                let response = match expectation {
                    Some(Expectation { to: Some(to), .. }) if to != envelope.to => {
                        recorded
                            .unexpected
                            .push(format!("expected delivery to {to}, got {}", envelope.to));
                        Err(MailerError::Rejected(envelope.to.clone()))
                    }
                    Some(Expectation { response, .. }) => response,
                    None => {
                        recorded
                            .unexpected
                            .push(format!("unexpected delivery to {}", envelope.to));
                        Err(MailerError::Rejected(envelope.to.clone()))
                    }
                };

                if response.is_ok() {
                    recorded.delivered.push(envelope);
                }
                drop(recorded);
                let _ = respond_to.send(response);
            }
        });

        Self {
            client: OutboxClient::new(sender),
            expectations,
            recorded,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn mailer(&self) -> OutboxClient {
        self.client.clone()
    }

    /// Expects one more delivery.
    pub fn expect_deliver(&mut self) -> DeliverExpectationBuilder {
        DeliverExpectationBuilder {
            to: None,
            expectations: self.expectations.clone(),
        }
    }

    /// Envelopes that were answered with `Ok`, oldest first.
    pub fn delivered(&self) -> Vec<Envelope> {
        self.recorded.lock().unwrap().delivered.clone()
    }

    /// Verifies that all expectations were met and nothing unexpected arrived.
    pub fn verify(&self) {
        let recorded = self.recorded.lock().unwrap();
        if !recorded.unexpected.is_empty() {
            panic!("Unexpected deliveries: {}", recorded.unexpected.join("; "));
        }
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

/// Builder for `deliver` expectations.
pub struct DeliverExpectationBuilder {
    to: Option<String>,
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl DeliverExpectationBuilder {
    /// Only accept envelopes addressed to `to`.
    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    /// Sets the expectation to return a successful result.
    pub fn return_ok(self) {
        self.push(Ok(()));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: MailerError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<(), MailerError>) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation {
            to: self.to,
            response,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailer::Mailer;

    fn envelope(to: &str) -> Envelope {
        Envelope {
            to: to.into(),
            reply_to: "ada@example.com".into(),
            subject: "Hi".into(),
            body: "Hello".into(),
        }
    }

    #[tokio::test]
    async fn test_expectations_answer_in_order() {
        let mut mock = MockMailer::new();
        mock.expect_deliver().return_ok();
        mock.expect_deliver().return_err(MailerError::Unavailable);

        let mailer = mock.mailer();
        assert_eq!(mailer.deliver(envelope("a@b.io")).await, Ok(()));
        assert_eq!(
            mailer.deliver(envelope("a@b.io")).await,
            Err(MailerError::Unavailable)
        );

        assert_eq!(mock.delivered().len(), 1);
        mock.verify();
    }

    #[tokio::test]
    #[should_panic(expected = "Not all expectations were met")]
    async fn test_verify_reports_unused_expectations() {
        let mut mock = MockMailer::new();
        mock.expect_deliver().return_ok();
        mock.verify();
    }

    #[tokio::test]
    #[should_panic(expected = "expected delivery to x@y.io")]
    async fn test_wrong_recipient_fails_verification() {
        let mut mock = MockMailer::new();
        mock.expect_deliver().to("x@y.io").return_ok();

        let result = mock.mailer().deliver(envelope("a@b.io")).await;
        assert_eq!(result, Err(MailerError::Rejected("a@b.io".into())));
        mock.verify();
    }
}
