//! # Person
//!
//! The walk-through model. `create` enables `before` and `after` hooks only;
//! `update` enables all three kinds and runs:
//!
//! ```text
//! reset_me -> log_me (pre) -> update -> log_me (post) -> finalize_me
//! ```
//!
//! A frozen person refuses updates: `reset_me` aborts and nothing else runs.

use model_callbacks::{
    CallbackError, CallbackModel, Callbacks, Flow, Hook, HookKind, KindSet, Outcome, Proceed,
    SharedCallbacks,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PersonError {
    #[error(transparent)]
    Callbacks(#[from] CallbackError),
    #[error("Person name cannot be blank")]
    BlankName,
}

/// Attributes accepted by [`Person::update`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonUpdate {
    pub name: Option<String>,
    pub age: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub age: u32,
    pub frozen: bool,
    pub version: u32,
    /// Steps taken by the last runs, oldest first.
    #[serde(skip)]
    pub history: Vec<String>,
}

impl Person {
    pub fn new(name: impl Into<String>, age: u32) -> Self {
        Self {
            name: name.into(),
            age,
            ..Self::default()
        }
    }

    fn record(&mut self, step: &str) {
        self.history.push(step.to_string());
    }

    /// Runs the `create` chain around stamping the first version.
    pub fn create(&mut self) -> Result<Outcome<u32>, PersonError> {
        self.run_callbacks("create", |person| {
            person.record("create method called");
            person.version = 1;
            Ok(person.version)
        })
    }

    /// Applies `attrs` inside the `update` chain and returns the new version.
    pub fn update(&mut self, attrs: PersonUpdate) -> Result<Outcome<u32>, PersonError> {
        self.run_callbacks("update", move |person| {
            person.record("update method called");
            if let Some(name) = attrs.name {
                if name.trim().is_empty() {
                    return Err(PersonError::BlankName);
                }
                person.name = name;
            }
            if let Some(age) = attrs.age {
                person.age = age;
            }
            person.version += 1;
            Ok(person.version)
        })
    }

    fn strip_name(&mut self) -> Result<Flow, PersonError> {
        self.name = self.name.trim().to_string();
        self.record("strip_name");
        Ok(Flow::Continue)
    }

    fn welcome(&mut self) -> Result<(), PersonError> {
        self.record("welcome");
        info!(name = %self.name, "Welcome aboard");
        Ok(())
    }

    fn reset_me(&mut self) -> Result<Flow, PersonError> {
        self.record("reset_me");
        if self.frozen {
            info!(name = %self.name, "Person is frozen, refusing update");
            return Ok(Flow::Abort);
        }
        Ok(Flow::Continue)
    }

    fn log_me(&mut self, next: Proceed<'_, Person, PersonError>) -> Result<Flow, PersonError> {
        self.record("log_me (pre)");
        debug!(version = self.version, "Before update");
        let flow = next.run(self)?;
        debug!(version = self.version, "After update");
        self.record("log_me (post)");
        Ok(flow)
    }

    fn finalize_me(&mut self) -> Result<(), PersonError> {
        self.record("finalize_me");
        Ok(())
    }
}

static PERSON_CALLBACKS: SharedCallbacks<Person, PersonError> = SharedCallbacks::new();

impl CallbackModel for Person {
    type Error = PersonError;

    fn callbacks() -> Result<&'static Callbacks<Self, Self::Error>, CallbackError> {
        PERSON_CALLBACKS.get_or_build(|callbacks| {
            callbacks.define_event("create", KindSet::only(&[HookKind::Before, HookKind::After]))?;
            callbacks.define_event("update", KindSet::all())?;

            callbacks.register(
                "create",
                Hook::before("strip_name", Person::strip_name)
                    .when(|person: &Person| person.name.trim() != person.name),
            )?;
            callbacks.after("create", "welcome", Person::welcome)?;

            callbacks.before("update", "reset_me", Person::reset_me)?;
            callbacks.around("update", "log_me", Person::log_me)?;
            callbacks.after("update", "finalize_me", Person::finalize_me)
        })
    }
}
