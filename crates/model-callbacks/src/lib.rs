//! # Model Callbacks
//!
//! Lifecycle callbacks for plain data objects: named events, `before` /
//! `around` / `after` hooks, and a run that wraps a unit of work with the chain.
//! This is the `define_model_callbacks` / `run_callbacks` pattern, without any
//! persistence attached.
//!
//! ## Core Abstractions
//!
//! - [`Callbacks`] - the per-type registry: event definitions, hook chains, and [`Callbacks::run`]
//! - [`Hook`] - one registrable callback, with optional `when` / `unless` guards
//! - [`Proceed`] - the continuation an `around` hook invokes to let the chain go on
//! - [`CallbackModel`] - the trait an owning type implements to get `run_callbacks`
//! - [`SharedCallbacks`] - a registry built once and shared by every instance
//! - [`callback_delegate!`] - declares a delegate trait with `<kind>_<event>` methods
//!
//! ## Three Outcomes
//!
//! A run ends in exactly one of:
//!
//! | Result | Meaning |
//! |--------|---------|
//! | `Ok(Outcome::Completed(r))` | every hook let the unit of work run; `r` is its result |
//! | `Ok(Outcome::Aborted)` / `Ok(Outcome::Skipped)` | a hook stopped the chain; not an error |
//! | `Err(e)` | a hook or the unit failed, or the registry was misused |
//!
//! Aborting is a value ([`Flow::Abort`]), not an error, so `?` never swallows it.
//!
//! ## Execution Order
//!
//! ```text
//! before_1 .. before_n
//!   around_1 (pre)
//!     around_2 (pre)
//!       unit of work
//!     around_2 (post)
//!   around_1 (post)
//! after_1 .. after_n
//! ```
//!
//! ## Concurrency
//!
//! Runs are synchronous and execute in the calling thread. A registry is
//! mutated only through `&mut`, so once it is shared (for example from a
//! [`SharedCallbacks`] static) it is read-only. The engine does not serialize
//! concurrent runs on the same instance; callers that need that hold their own lock.
//!
//! ## Testing
//!
//! Each module carries unit tests; `tests/integration_test.rs` walks the
//! `update` / `create` scenarios end to end.

pub mod callbacks;
pub mod delegate;
pub mod error;
pub mod hook;
pub mod kind;
pub mod model;
pub mod tracing;

// Re-export core types for convenience
pub use callbacks::{Callbacks, EventSummary, SharedCallbacks};
pub use error::CallbackError;
pub use hook::{Hook, HookId, Proceed};
pub use kind::{Flow, HookKind, KindSet, Outcome};
pub use model::CallbackModel;

#[doc(hidden)]
pub use paste::paste as __paste;
