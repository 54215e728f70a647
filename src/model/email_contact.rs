//! # EmailContact
//!
//! A contact-form submission. `deliver` builds the outgoing [`Envelope`];
//! the actual sending is left to a [`Mailer`](crate::mailer::Mailer), which the
//! [`ContactsController`](crate::controllers::ContactsController) drives.
//!
//! - `before deliver`: normalizes the address and aborts when it is unusable.
//! - `after deliver`: marks the contact as queued.

use crate::mailer::Envelope;
use model_callbacks::{CallbackError, CallbackModel, Callbacks, Flow, Outcome, SharedCallbacks};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Address every contact message is sent to.
pub const CONTACT_INBOX: &str = "contact@example.com";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ContactError {
    #[error(transparent)]
    Callbacks(#[from] CallbackError),
    #[error("Contact message cannot be empty")]
    EmptyMessage,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    #[default]
    Draft,
    Queued,
    Sent,
}

/// Parameters submitted through the contact form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactParams {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailContact {
    pub name: String,
    pub email: String,
    pub message: String,
    pub status: ContactStatus,
}

impl From<ContactParams> for EmailContact {
    fn from(params: ContactParams) -> Self {
        Self {
            name: params.name,
            email: params.email,
            message: params.message,
            status: ContactStatus::Draft,
        }
    }
}

impl EmailContact {
    /// Runs the `deliver` chain and returns the envelope to send.
    pub fn deliver(&mut self) -> Result<Outcome<Envelope>, ContactError> {
        self.run_callbacks("deliver", |contact| {
            if contact.message.trim().is_empty() {
                return Err(ContactError::EmptyMessage);
            }
            Ok(Envelope {
                to: CONTACT_INBOX.to_string(),
                reply_to: contact.email.clone(),
                subject: format!("Contact from {}", contact.name),
                body: contact.message.clone(),
            })
        })
    }

    fn normalize_email(&mut self) -> Result<Flow, ContactError> {
        self.email = self.email.trim().to_lowercase();
        if !is_deliverable(&self.email) {
            info!(email = %self.email, "Rejecting contact without a usable address");
            return Ok(Flow::Abort);
        }
        Ok(Flow::Continue)
    }

    fn mark_queued(&mut self) -> Result<(), ContactError> {
        self.status = ContactStatus::Queued;
        Ok(())
    }
}

fn is_deliverable(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.contains('@'),
        None => false,
    }
}

static CONTACT_CALLBACKS: SharedCallbacks<EmailContact, ContactError> = SharedCallbacks::new();

impl CallbackModel for EmailContact {
    type Error = ContactError;

    fn callbacks() -> Result<&'static Callbacks<Self, Self::Error>, CallbackError> {
        CONTACT_CALLBACKS.get_or_build(|callbacks| {
            callbacks.define_model_callbacks(&["deliver"])?;
            callbacks.before("deliver", "normalize_email", EmailContact::normalize_email)?;
            callbacks.after("deliver", "mark_queued", EmailContact::mark_queued)
        })
    }
}
