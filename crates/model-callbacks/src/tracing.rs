//! # Observability & Tracing
//!
//! Every run opens a `run_callbacks` span carrying the event name. Inside it:
//!
//! - `DEBUG` one line per hook (`before`, `around`, `after`) and for the unit of work
//! - `INFO` when a chain aborts or is skipped
//! - `WARN` when redefining an event throws away registered hooks
//! - `TRACE` when a guard keeps a hook from running
//!
//! ```bash
//! # Outcomes only
//! RUST_LOG=info cargo run
//!
//! # Every hook, inside its run_callbacks span
//! RUST_LOG=model_callbacks=debug cargo run
//! ```
//!
//! With `RUST_LOG=debug` the `Person#update` walk-through reads:
//!
//! ```text
//! DEBUG run_callbacks: before event="update" hook=reset_me
//! DEBUG run_callbacks: around event="update" hook=log_me
//! DEBUG run_callbacks: unit of work event="update"
//! DEBUG run_callbacks: after event="update" hook=finalize_me
//! DEBUG run_callbacks: Completed event="update"
//! ```

/// Installs the process-wide subscriber: `RUST_LOG` filtering, compact lines,
/// no module targets. Call once, from `main`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
