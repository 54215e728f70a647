//! # User
//!
//! `save` shows the three ways a chain can end early:
//!
//! - `normalize_name` is guarded and only runs when the name has padding.
//! - `ensure_name` aborts a save whose name is blank.
//! - `guard_read_only` never resumes the chain for read-only users, so the save
//!   is skipped and no `after` hook sees it.

use model_callbacks::{
    CallbackError, CallbackModel, Callbacks, Flow, Hook, Outcome, Proceed, SharedCallbacks,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserError {
    #[error(transparent)]
    Callbacks(#[from] CallbackError),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
    pub read_only: bool,
    /// Number of completed saves.
    pub revision: u32,
    /// Name as of the last completed save.
    pub saved_name: Option<String>,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    /// Saves the user and returns the new revision.
    pub fn save(&mut self) -> Result<Outcome<u32>, UserError> {
        self.run_callbacks("save", |user| {
            user.revision += 1;
            Ok(user.revision)
        })
    }

    fn normalize_name(&mut self) -> Result<Flow, UserError> {
        let normalized = self.name.split_whitespace().collect::<Vec<_>>().join(" ");
        debug!(from = %self.name, to = %normalized, "Normalized name");
        self.name = normalized;
        Ok(Flow::Continue)
    }

    fn ensure_name(&mut self) -> Result<Flow, UserError> {
        if self.name.is_empty() {
            info!(email = %self.email, "Refusing to save a user without a name");
            return Ok(Flow::Abort);
        }
        Ok(Flow::Continue)
    }

    fn guard_read_only(&mut self, next: Proceed<'_, User, UserError>) -> Result<Flow, UserError> {
        if self.read_only {
            info!(email = %self.email, "User is read-only, skipping save");
            return Ok(Flow::Continue);
        }
        next.run(self)
    }

    fn remember_name(&mut self) -> Result<(), UserError> {
        self.saved_name = Some(self.name.clone());
        Ok(())
    }
}

fn has_padding(user: &User) -> bool {
    user.name.split_whitespace().collect::<Vec<_>>().join(" ") != user.name
}

static USER_CALLBACKS: SharedCallbacks<User, UserError> = SharedCallbacks::new();

impl CallbackModel for User {
    type Error = UserError;

    fn callbacks() -> Result<&'static Callbacks<Self, Self::Error>, CallbackError> {
        USER_CALLBACKS.get_or_build(|callbacks| {
            callbacks.define_model_callbacks(&["save"])?;
            callbacks.register(
                "save",
                Hook::before("normalize_name", User::normalize_name).when(has_padding),
            )?;
            callbacks.before("save", "ensure_name", User::ensure_name)?;
            callbacks.around("save", "guard_read_only", User::guard_read_only)?;
            callbacks.after("save", "remember_name", User::remember_name)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_normalizes_padded_names() {
        let mut user = User::new("  Ada   Lovelace ", "ada@example.com");
        assert_eq!(user.save().unwrap(), Outcome::Completed(1));
        assert_eq!(user.name, "Ada Lovelace");
        assert_eq!(user.saved_name.as_deref(), Some("Ada Lovelace"));
    }

    #[test]
    fn test_blank_name_aborts() {
        let mut user = User::new("   ", "nobody@example.com");
        assert!(user.save().unwrap().is_aborted());
        assert_eq!(user.revision, 0);
        assert_eq!(user.saved_name, None);
    }

    #[test]
    fn test_read_only_user_is_skipped() {
        let mut user = User {
            read_only: true,
            ..User::new("Grace", "grace@example.com")
        };
        assert!(user.save().unwrap().is_skipped());
        assert_eq!(user.revision, 0);
        assert_eq!(user.saved_name, None);
    }

    #[test]
    fn test_has_padding() {
        assert!(has_padding(&User::new(" a", "")));
        assert!(has_padding(&User::new("a  b", "")));
        assert!(!has_padding(&User::new("a b", "")));
    }
}
