//! # Contacts Controller
//!
//! Turns a contact-form submission into an [`EmailContact`], runs its
//! `deliver` chain and, when the chain completes, hands the envelope to the
//! injected [`Mailer`].
//!
//! | Chain outcome | Mailer | Response |
//! |---------------|--------|----------|
//! | `Completed` | `Ok` | [`ContactResponse::Delivered`] |
//! | `Completed` | `Err` | [`ContactResponse::Failed`] |
//! | `Aborted` / `Skipped` | not called | [`ContactResponse::Rejected`] |
//! | `Err` | not called | [`ContactResponse::Failed`] |

use crate::mailer::{Mailer, MailerError};
use crate::model::{ContactError, ContactParams, ContactStatus, EmailContact};
use model_callbacks::Outcome;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument, warn};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ContactsControllerError {
    #[error(transparent)]
    Contact(#[from] ContactError),
    #[error(transparent)]
    Mailer(#[from] MailerError),
}

/// What `create` tells the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ContactResponse {
    /// The message went out.
    Delivered { contact: EmailContact },
    /// A `before deliver` hook refused the submission; nothing was sent.
    Rejected { contact: EmailContact },
    /// The chain or the mailer raised an error.
    Failed { error: String },
}

impl ContactResponse {
    pub fn is_delivered(&self) -> bool {
        matches!(self, ContactResponse::Delivered { .. })
    }
}

/// Handles contact-form submissions.
pub struct ContactsController<M: Mailer> {
    mailer: M,
}

impl<M: Mailer> ContactsController<M> {
    pub fn new(mailer: M) -> Self {
        Self { mailer }
    }

    /// Runs `EmailContact#deliver` and, when the chain completes, sends the
    /// envelope it produced.
    #[instrument(skip(self, params), fields(email = %params.email))]
    pub async fn create(&self, params: ContactParams) -> ContactResponse {
        let mut contact = EmailContact::from(params);
        match self.deliver(&mut contact).await {
            Ok(true) => {
                info!("Contact delivered");
                ContactResponse::Delivered { contact }
            }
            Ok(false) => {
                info!("Contact rejected");
                ContactResponse::Rejected { contact }
            }
            Err(e) => {
                warn!(error = %e, "Contact failed");
                ContactResponse::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    async fn deliver(&self, contact: &mut EmailContact) -> Result<bool, ContactsControllerError> {
        let envelope = match contact.deliver()? {
            Outcome::Completed(envelope) => envelope,
            Outcome::Aborted | Outcome::Skipped => return Ok(false),
        };
        self.mailer.deliver(envelope).await?;
        contact.status = ContactStatus::Sent;
        Ok(true)
    }
}
