//! # Controllers
//!
//! Request handlers that drive models and the async [`Mailer`](crate::mailer::Mailer).
//! A controller is generic over its mailer, so tests hand it a
//! [`MockMailer`](crate::mailer::mock::MockMailer) client and production hands
//! it an [`OutboxClient`](crate::mailer::OutboxClient).

pub mod contacts_controller;

pub use contacts_controller::{ContactResponse, ContactsController, ContactsControllerError};
