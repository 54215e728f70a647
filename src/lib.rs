#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Callbacks Recipe
//!
//! > **A Recipe for Model Lifecycle Callbacks in Rust.**
//!
//! This crate shows how plain data objects get `before`, `around` and `after`
//! hooks on their lifecycle events using the [`model_callbacks`] engine. Each
//! model names its events once, registers its hooks once, and wraps each unit of
//! work (save, publish, deliver) in a chain run.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Why explicit registries?
//!
//! Every model owns one process-wide [`Callbacks`](model_callbacks::Callbacks)
//! registry, built lazily by a [`SharedCallbacks`](model_callbacks::SharedCallbacks)
//! static. Hooks are function values captured at registration time:
//! - **No lookup by name at run time**: a typo is a compile error, not a runtime surprise.
//! - **Configuration errors surface early**: registering on an undefined event or a
//!   disabled kind fails while the registry is being built.
//! - **Independent copies**: cloning a registry gives a derived chain that can be
//!   extended or trimmed without touching the original.
//!
//! ## 🚀 Core Concepts
//!
//! ### Outcomes instead of `false`
//! A run ends in [`Outcome::Completed`](model_callbacks::Outcome::Completed) with
//! the unit's result, [`Outcome::Aborted`](model_callbacks::Outcome::Aborted) when
//! a `before` hook halted, or [`Outcome::Skipped`](model_callbacks::Outcome::Skipped)
//! when an `around` hook never resumed the chain. Errors from hooks or the unit
//! travel separately as `Err`.
//!
//! ### Delegates
//! Hooks can live on another object. [`model::Catalog`] numbers books through the
//! [`PublishCallbacks`](model::PublishCallbacks) trait generated by
//! [`callback_delegate!`](model_callbacks::callback_delegate).
//!
//! ### Async at the edges
//! Chains are synchronous. The [`ContactsController`](controllers::ContactsController)
//! runs `EmailContact#deliver` and then awaits a [`Mailer`](mailer::Mailer).
//! In tests the mailer is a [`MockMailer`](mailer::mock::MockMailer).
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Models ([`model`])
//! - **Role**: Plain data plus callback chains.
//! - **Key items**: [`Person`](model::Person), [`Book`](model::Book),
//!   [`User`](model::User), [`EmailContact`](model::EmailContact).
//!
//! ### 2. The Mail Edge ([`mailer`])
//! - **Role**: Sends what the `deliver` chain produced.
//! - **Key items**: [`Outbox`](mailer::Outbox), [`OutboxClient`](mailer::OutboxClient),
//!   [`LogMailer`](mailer::LogMailer).
//!
//! ### 3. The Handlers ([`controllers`])
//! - **Role**: Turn a request into a chain run plus an async side effect.
//! - **Key items**: [`ContactsController`](controllers::ContactsController).
//!
//! ## 🚀 Quick Start
//!
//! ### Running the Demo
//!
//! ```bash
//! # Outcomes only
//! RUST_LOG=info cargo run
//!
//! # Every hook
//! RUST_LOG=debug cargo run
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test --workspace
//! ```

pub mod controllers;
pub mod mailer;
pub mod model;
