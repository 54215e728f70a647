//! # Callback Registry
//!
//! [`Callbacks<M, E>`] is the per-type callback configuration: it maps event
//! names to an enabled [`KindSet`] and the ordered hook lists for each kind, and
//! runs a chain around a unit of work.
//!
//! ## Building
//!
//! A registry is built once, while the owning type is set up, and then shared
//! immutably by every instance (see [`SharedCallbacks`]). Mutation needs
//! `&mut Callbacks`, so registration can never race a run.
//!
//! ## Running
//!
//! [`Callbacks::run`] walks one event's chain:
//!
//! ```text
//! Idle -> RunningBefore -> RunningAround -> RunningUnit -> RunningAfter -> Completed
//!              |                 |
//!              +-----------------+--> Aborted
//! ```
//!
//! 1. `before` hooks in registration order. `Flow::Abort` ends the run.
//! 2. `around` hooks outer to inner; the innermost continuation runs the unit of work.
//! 3. `after` hooks in registration order, only when the unit ran and nothing aborted.
//!
//! Errors from hooks or the unit propagate unchanged. Nothing already executed is
//! rolled back.

use crate::error::CallbackError;
use crate::hook::{Hook, HookId, Proceed, Resume};
use crate::kind::{Flow, HookKind, KindSet, Outcome};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;
use tracing::{debug, debug_span, info, trace, warn};

/// Event names may not end in these; hook method names are derived from them.
const RESERVED_SUFFIXES: [char; 3] = ['!', '?', '='];

struct EventSpec<M, E> {
    kinds: KindSet,
    chains: [Vec<Hook<M, E>>; 3],
}

impl<M, E> EventSpec<M, E> {
    fn new(kinds: KindSet) -> Self {
        Self {
            kinds,
            chains: [Vec::new(), Vec::new(), Vec::new()],
        }
    }

    fn chain(&self, kind: HookKind) -> &[Hook<M, E>] {
        &self.chains[kind.index()]
    }

    fn chain_mut(&mut self, kind: HookKind) -> &mut Vec<Hook<M, E>> {
        &mut self.chains[kind.index()]
    }

    fn hook_count(&self) -> usize {
        self.chains.iter().map(Vec::len).sum()
    }
}

impl<M, E> Clone for EventSpec<M, E> {
    fn clone(&self) -> Self {
        Self {
            kinds: self.kinds,
            chains: self.chains.clone(),
        }
    }
}

/// Named callback chains for one owning type `M` whose hooks fail with `E`.
///
/// ```rust
/// use model_callbacks::{CallbackError, Callbacks, Flow, KindSet, Outcome};
///
/// #[derive(Debug, thiserror::Error)]
/// enum PersonError {
///     #[error(transparent)]
///     Callbacks(#[from] CallbackError),
/// }
///
/// #[derive(Default)]
/// struct Person { log: Vec<&'static str> }
///
/// let mut callbacks = Callbacks::<Person, PersonError>::new();
/// callbacks.define_event("update", KindSet::all()).unwrap();
/// callbacks.before("update", "reset_me", |p: &mut Person| {
///     p.log.push("reset_me");
///     Ok(Flow::Continue)
/// }).unwrap();
/// callbacks.around("update", "log_me", |p: &mut Person, next| {
///     p.log.push("log_me:pre");
///     let flow = next.run(p)?;
///     p.log.push("log_me:post");
///     Ok(flow)
/// }).unwrap();
/// callbacks.after("update", "finalize_me", |p: &mut Person| {
///     p.log.push("finalize_me");
///     Ok(())
/// }).unwrap();
///
/// let mut person = Person::default();
/// let outcome = callbacks.run("update", &mut person, |p| {
///     p.log.push("update");
///     Ok(42)
/// }).unwrap();
///
/// assert_eq!(outcome, Outcome::Completed(42));
/// assert_eq!(
///     person.log,
///     ["reset_me", "log_me:pre", "update", "log_me:post", "finalize_me"]
/// );
/// ```
pub struct Callbacks<M, E> {
    events: BTreeMap<String, EventSpec<M, E>>,
}

impl<M, E> Callbacks<M, E> {
    pub fn new() -> Self {
        Self {
            events: BTreeMap::new(),
        }
    }

    // --- Definition ---

    /// Creates or replaces the event `name` with empty hook lists for `kinds`.
    ///
    /// Redefining an existing event discards every hook registered on it.
    pub fn define_event(&mut self, name: &str, kinds: KindSet) -> Result<(), CallbackError> {
        validate_event_name(name)?;
        let previous = self.events.insert(name.to_string(), EventSpec::new(kinds));
        match previous {
            Some(old) if old.hook_count() > 0 => {
                warn!(
                    event = name,
                    discarded = old.hook_count(),
                    "Event redefined, hooks discarded"
                );
            }
            Some(_) => debug!(event = name, "Event redefined"),
            None => debug!(event = name, ?kinds, "Event defined"),
        }
        Ok(())
    }

    /// Defines each of `names` with all three kinds enabled.
    pub fn define_model_callbacks(&mut self, names: &[&str]) -> Result<(), CallbackError> {
        for name in names {
            self.define_event(name, KindSet::all())?;
        }
        Ok(())
    }

    // --- Registration ---

    /// Adds `hook` to the end of its (event, kind) chain, or replaces the entry
    /// with the same identity in place.
    pub fn register(&mut self, event: &str, hook: Hook<M, E>) -> Result<(), CallbackError> {
        let kind = hook.kind();
        self.ensure_enabled(event, kind)?;
        let spec = self
            .events
            .get_mut(event)
            .ok_or_else(|| CallbackError::undefined(event))?;

        let chain = spec.chain_mut(kind);
        match chain.iter().position(|existing| existing.id() == hook.id()) {
            Some(index) => {
                debug!(event, %kind, hook = %hook.id(), index, "Hook replaced");
                chain[index] = hook;
            }
            None => {
                debug!(event, %kind, hook = %hook.id(), "Hook registered");
                chain.push(hook);
            }
        }
        Ok(())
    }

    /// Checks that `event` is defined and accepts `kind` hooks, without
    /// registering anything.
    pub fn ensure_enabled(&self, event: &str, kind: HookKind) -> Result<(), CallbackError> {
        let spec = self
            .events
            .get(event)
            .ok_or_else(|| CallbackError::undefined(event))?;
        if !spec.kinds.contains(kind) {
            return Err(CallbackError::KindNotEnabled {
                event: event.to_string(),
                kind,
            });
        }
        Ok(())
    }

    pub fn before<F>(
        &mut self,
        event: &str,
        id: impl Into<HookId>,
        f: F,
    ) -> Result<(), CallbackError>
    where
        F: Fn(&mut M) -> Result<Flow, E> + Send + Sync + 'static,
    {
        self.register(event, Hook::before(id, f))
    }

    pub fn around<F>(
        &mut self,
        event: &str,
        id: impl Into<HookId>,
        f: F,
    ) -> Result<(), CallbackError>
    where
        F: for<'p> Fn(&mut M, Proceed<'p, M, E>) -> Result<Flow, E> + Send + Sync + 'static,
    {
        self.register(event, Hook::around(id, f))
    }

    pub fn after<F>(
        &mut self,
        event: &str,
        id: impl Into<HookId>,
        f: F,
    ) -> Result<(), CallbackError>
    where
        F: Fn(&mut M) -> Result<(), E> + Send + Sync + 'static,
    {
        self.register(event, Hook::after(id, f))
    }

    /// Removes the hook `id` from the (event, kind) chain (`skip_callback`).
    pub fn skip(
        &mut self,
        event: &str,
        kind: HookKind,
        id: impl Into<HookId>,
    ) -> Result<(), CallbackError> {
        let id = id.into();
        let spec = self
            .events
            .get_mut(event)
            .ok_or_else(|| CallbackError::undefined(event))?;
        let chain = spec.chain_mut(kind);
        match chain.iter().position(|hook| hook.id() == &id) {
            Some(index) => {
                chain.remove(index);
                debug!(event, %kind, hook = %id, "Hook skipped");
                Ok(())
            }
            None => Err(CallbackError::UnknownHook {
                event: event.to_string(),
                kind,
                hook: id,
            }),
        }
    }

    /// Clears every hook of `event`, keeping its enabled kinds.
    pub fn reset(&mut self, event: &str) -> Result<(), CallbackError> {
        let spec = self
            .events
            .get_mut(event)
            .ok_or_else(|| CallbackError::undefined(event))?;
        *spec = EventSpec::new(spec.kinds);
        debug!(event, "Callbacks reset");
        Ok(())
    }

    // --- Introspection ---

    /// Defined event names, sorted.
    pub fn events(&self) -> Vec<&str> {
        self.events.keys().map(String::as_str).collect()
    }

    pub fn is_defined(&self, event: &str) -> bool {
        self.events.contains_key(event)
    }

    pub fn enabled_kinds(&self, event: &str) -> Option<KindSet> {
        self.events.get(event).map(|spec| spec.kinds)
    }

    /// Hook identities of one chain in execution order. Empty when the event is
    /// undefined or the kind is not enabled.
    pub fn hooks(&self, event: &str, kind: HookKind) -> Vec<&HookId> {
        self.events
            .get(event)
            .map(|spec| spec.chain(kind).iter().map(Hook::id).collect())
            .unwrap_or_default()
    }

    /// Serializable snapshot of every chain.
    pub fn describe(&self) -> Vec<EventSummary> {
        self.events
            .iter()
            .map(|(name, spec)| {
                let ids = |kind: HookKind| -> Vec<HookId> {
                    spec.chain(kind).iter().map(|h| h.id().clone()).collect()
                };
                EventSummary {
                    name: name.clone(),
                    kinds: spec.kinds,
                    before: ids(HookKind::Before),
                    around: ids(HookKind::Around),
                    after: ids(HookKind::After),
                }
            })
            .collect()
    }

    // --- Execution ---

    /// Runs the `event` chain around `unit` on `model`.
    ///
    /// Returns `Outcome::Completed` with the unit's result, `Outcome::Aborted`
    /// when a `before`/`around` hook aborted, or `Outcome::Skipped` when an
    /// `around` hook never continued. Hook and unit errors are returned as-is;
    /// an undefined event is a [`CallbackError`] converted into `E`.
    pub fn run<R, U>(&self, event: &str, model: &mut M, unit: U) -> Result<Outcome<R>, E>
    where
        U: FnOnce(&mut M) -> Result<R, E>,
        E: From<CallbackError>,
    {
        let spec = self
            .events
            .get(event)
            .ok_or_else(|| CallbackError::undefined(event))?;
        let span = debug_span!("run_callbacks", event);
        let _enter = span.enter();

        for hook in spec.chain(HookKind::Before) {
            let Some(before) = hook.as_before() else { continue };
            if !hook.applies_to(model) {
                trace!(hook = %hook.id(), "before skipped by guard");
                continue;
            }
            debug!(hook = %hook.id(), "before");
            if before(model)?.is_abort() {
                info!(hook = %hook.id(), "Aborted in before");
                return Ok(Outcome::Aborted);
            }
        }

        let mut unit = Some(unit);
        let mut result = None;
        let aborted = {
            let mut run_unit = |model: &mut M| -> Result<(), E> {
                if let Some(unit) = unit.take() {
                    debug!("unit of work");
                    result = Some(unit(model)?);
                }
                Ok(())
            };
            let mut chain = AroundChain {
                hooks: spec.chain(HookKind::Around),
                unit: &mut run_unit,
                aborted: false,
            };
            let flow = chain.resume(0, model)?;
            chain.aborted || flow.is_abort()
        };

        if aborted {
            return Ok(Outcome::Aborted);
        }
        let Some(result) = result else {
            info!("Skipped: around hook did not continue");
            return Ok(Outcome::Skipped);
        };

        for hook in spec.chain(HookKind::After) {
            let Some(after) = hook.as_after() else { continue };
            if !hook.applies_to(model) {
                trace!(hook = %hook.id(), "after skipped by guard");
                continue;
            }
            debug!(hook = %hook.id(), "after");
            after(model)?;
        }

        debug!("Completed");
        Ok(Outcome::Completed(result))
    }
}

/// The `around` stage of one run: the remaining around hooks and the unit of
/// work at the bottom.
///
/// `aborted` latches as soon as any around hook returns `Flow::Abort`, so an
/// outer hook that drops its continuation's `Flow` cannot turn the abort into
/// a completed or skipped run.
struct AroundChain<'r, M, E> {
    hooks: &'r [Hook<M, E>],
    unit: &'r mut dyn FnMut(&mut M) -> Result<(), E>,
    aborted: bool,
}

impl<M, E> Resume<M, E> for AroundChain<'_, M, E> {
    fn resume(&mut self, index: usize, model: &mut M) -> Result<Flow, E> {
        let hooks = self.hooks;
        for (position, hook) in hooks.iter().enumerate().skip(index) {
            let Some(around) = hook.as_around() else { continue };
            if !hook.applies_to(model) {
                trace!(hook = %hook.id(), "around skipped by guard");
                continue;
            }
            debug!(hook = %hook.id(), "around");
            let flow = around(model, Proceed::new(&mut *self, position + 1))?;
            if flow.is_abort() {
                info!(hook = %hook.id(), "Aborted in around");
                self.aborted = true;
            }
            if self.aborted {
                return Ok(Flow::Abort);
            }
            return Ok(flow);
        }
        (self.unit)(model)?;
        Ok(Flow::Continue)
    }
}

impl<M, E> Default for Callbacks<M, E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloning gives an independent registry a derived type can extend.
impl<M, E> Clone for Callbacks<M, E> {
    fn clone(&self) -> Self {
        Self {
            events: self.events.clone(),
        }
    }
}

impl<M, E> fmt::Debug for Callbacks<M, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.describe()).finish()
    }
}

/// One event's chain, as reported by [`Callbacks::describe`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventSummary {
    pub name: String,
    pub kinds: KindSet,
    pub before: Vec<HookId>,
    pub around: Vec<HookId>,
    pub after: Vec<HookId>,
}

fn validate_event_name(name: &str) -> Result<(), CallbackError> {
    match name.chars().last() {
        Some(last) if !RESERVED_SUFFIXES.contains(&last) => Ok(()),
        _ => Err(CallbackError::InvalidEventName(name.to_string())),
    }
}

/// A [`Callbacks`] registry built on first use and then shared by every instance.
///
/// ```rust
/// use model_callbacks::{CallbackError, Callbacks, SharedCallbacks};
///
/// struct Book;
///
/// static BOOK_CALLBACKS: SharedCallbacks<Book, CallbackError> = SharedCallbacks::new();
///
/// fn book_callbacks() -> Result<&'static Callbacks<Book, CallbackError>, CallbackError> {
///     BOOK_CALLBACKS.get_or_build(|callbacks| callbacks.define_model_callbacks(&["publish"]))
/// }
///
/// assert_eq!(book_callbacks().unwrap().events(), ["publish"]);
/// ```
pub struct SharedCallbacks<M, E> {
    cell: OnceLock<Result<Callbacks<M, E>, CallbackError>>,
}

impl<M, E> SharedCallbacks<M, E> {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Returns the registry, running `build` on the first call only.
    ///
    /// A failed build is remembered: every later call returns the same error.
    pub fn get_or_build<B>(&self, build: B) -> Result<&Callbacks<M, E>, CallbackError>
    where
        B: FnOnce(&mut Callbacks<M, E>) -> Result<(), CallbackError>,
    {
        self.cell
            .get_or_init(|| {
                let mut callbacks = Callbacks::new();
                build(&mut callbacks).map(|()| callbacks)
            })
            .as_ref()
            .map_err(|err| err.clone())
    }
}

impl<M, E> Default for SharedCallbacks<M, E> {
    fn default() -> Self {
        Self::new()
    }
}
