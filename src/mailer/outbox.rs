//! # Outbox
//!
//! A single task owns the mail transport and sends envelopes one at a time.
//! Callers talk to it through [`OutboxClient`], which forwards each envelope
//! over an mpsc channel and waits for the transport's answer on a oneshot.
//!
//! ```rust
//! use callbacks_recipe::mailer::{Envelope, LogMailer, Mailer, Outbox};
//!
//! #[tokio::main]
//! async fn main() {
//!     let (outbox, client) = Outbox::new(8);
//!     let handle = tokio::spawn(outbox.run(LogMailer));
//!
//!     let envelope = Envelope {
//!         to: "contact@example.com".into(),
//!         reply_to: "ada@example.com".into(),
//!         subject: "Hi".into(),
//!         body: "Hello".into(),
//!     };
//!     client.deliver(envelope).await.unwrap();
//!
//!     drop(client);
//!     assert_eq!(handle.await.unwrap(), 1);
//! }
//! ```

use super::{Envelope, Mailer, MailerError};
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

pub(crate) struct MailRequest {
    pub(crate) envelope: Envelope,
    pub(crate) respond_to: oneshot::Sender<Result<(), MailerError>>,
}

/// The server half: owns the receiver and drives a transport.
pub struct Outbox {
    receiver: mpsc::Receiver<MailRequest>,
}

impl Outbox {
    pub fn new(buffer_size: usize) -> (Self, OutboxClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        (Self { receiver }, OutboxClient::new(sender))
    }

    /// Sends every queued envelope through `transport` until all clients are
    /// dropped. Returns how many envelopes were delivered.
    pub async fn run<T: Mailer>(mut self, transport: T) -> usize {
        info!("Outbox started");
        let mut delivered = 0;

        while let Some(MailRequest {
            envelope,
            respond_to,
        }) = self.receiver.recv().await
        {
            debug!(to = %envelope.to, "Sending");
            let result = transport.deliver(envelope).await;
            match &result {
                Ok(()) => delivered += 1,
                Err(e) => warn!(error = %e, "Delivery failed"),
            }
            let _ = respond_to.send(result);
        }

        info!(delivered, "Outbox shutting down");
        delivered
    }
}

/// Cloneable handle to an [`Outbox`].
#[derive(Debug, Clone)]
pub struct OutboxClient {
    sender: mpsc::Sender<MailRequest>,
}

impl OutboxClient {
    pub(crate) fn new(sender: mpsc::Sender<MailRequest>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl Mailer for OutboxClient {
    async fn deliver(&self, envelope: Envelope) -> Result<(), MailerError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(MailRequest {
                envelope,
                respond_to,
            })
            .await
            .map_err(|_| MailerError::OutboxClosed)?;
        response.await.map_err(|_| MailerError::OutboxDropped)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailer::LogMailer;

    fn envelope() -> Envelope {
        Envelope {
            to: "contact@example.com".into(),
            reply_to: "ada@example.com".into(),
            subject: "Hi".into(),
            body: "Hello".into(),
        }
    }

    struct FailingTransport;

    #[async_trait]
    impl Mailer for FailingTransport {
        async fn deliver(&self, _: Envelope) -> Result<(), MailerError> {
            Err(MailerError::Unavailable)
        }
    }

    #[tokio::test]
    async fn test_outbox_counts_deliveries() {
        let (outbox, client) = Outbox::new(4);
        let handle = tokio::spawn(outbox.run(LogMailer));

        client.deliver(envelope()).await.unwrap();
        client.clone().deliver(envelope()).await.unwrap();
        drop(client);

        assert_eq!(handle.await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_transport_errors_reach_the_caller() {
        let (outbox, client) = Outbox::new(4);
        tokio::spawn(outbox.run(FailingTransport));

        assert_eq!(
            client.deliver(envelope()).await,
            Err(MailerError::Unavailable)
        );
    }

    #[tokio::test]
    async fn test_closed_outbox() {
        let (outbox, client) = Outbox::new(4);
        drop(outbox);

        assert_eq!(
            client.deliver(envelope()).await,
            Err(MailerError::OutboxClosed)
        );
    }
}
