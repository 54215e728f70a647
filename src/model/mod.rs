//! # Models
//!
//! Plain data objects with lifecycle callbacks. Each model owns a
//! [`SharedCallbacks`](model_callbacks::SharedCallbacks) static, implements
//! [`CallbackModel`](model_callbacks::CallbackModel), and wraps its chains in
//! ordinary methods (`Person::update`, `Book::publish`, ...).
//!
//! | Model | Event | Shows |
//! |-------|-------|-------|
//! | [`Person`] | `create`, `update` | restricted kinds, the full walk-through, abort |
//! | [`Book`] | `publish` | delegate hooks through [`PublishCallbacks`] |
//! | [`User`] | `save` | guards, abort, an `around` hook that skips |
//! | [`EmailContact`] | `deliver` | a chain that feeds an async mailer |

pub mod book;
pub mod email_contact;
pub mod person;
pub mod user;

pub use book::{Book, BookError, Catalog, PublishCallbacks};
pub use email_contact::{ContactError, ContactParams, ContactStatus, EmailContact, CONTACT_INBOX};
pub use person::{Person, PersonError, PersonUpdate};
pub use user::{User, UserError};
