//! # Mailer
//!
//! The async edge of the app. Callback chains are synchronous; the controller
//! runs `EmailContact#deliver` first and hands the resulting [`Envelope`] to a
//! [`Mailer`] afterwards.
//!
//! | Type | Role |
//! |------|------|
//! | [`LogMailer`] | Transport that logs instead of sending |
//! | [`Outbox`] / [`OutboxClient`] | Task that owns a transport; the client is a cheap, cloneable `Mailer` |
//! | [`mock::MockMailer`] | Expectation-driven outbox for tests |

pub mod mock;
pub mod outbox;

pub use outbox::{Outbox, OutboxClient};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// A message ready to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub to: String,
    pub reply_to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MailerError {
    #[error("Recipient rejected: {0}")]
    Rejected(String),
    #[error("Mail transport unavailable")]
    Unavailable,
    #[error("Outbox closed")]
    OutboxClosed,
    #[error("Outbox dropped the response channel")]
    OutboxDropped,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn deliver(&self, envelope: Envelope) -> Result<(), MailerError>;
}

/// Transport that writes every envelope to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    #[tracing::instrument(skip(self, envelope), fields(to = %envelope.to))]
    async fn deliver(&self, envelope: Envelope) -> Result<(), MailerError> {
        info!(
            reply_to = %envelope.reply_to,
            subject = %envelope.subject,
            "Delivered message"
        );
        Ok(())
    }
}
