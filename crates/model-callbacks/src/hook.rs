//! # Hooks
//!
//! A [`Hook`] is one entry of a callback chain: an identity ([`HookId`]), the
//! callable captured at registration time, and optional guards.
//!
//! Hooks are plain function values. A method on the owning type is registered
//! as `Person::reset_me`; an external delegate is registered through the trait
//! generated by [`callback_delegate!`](crate::callback_delegate). Nothing is
//! looked up by name when the chain runs.
//!
//! ## Hook signatures
//!
//! | Kind | Callable |
//! |------|----------|
//! | `before` | `Fn(&mut M) -> Result<Flow, E>` |
//! | `around` | `Fn(&mut M, Proceed<'_, M, E>) -> Result<Flow, E>` |
//! | `after`  | `Fn(&mut M) -> Result<(), E>` |
//!
//! An `around` hook resumes the chain by calling [`Proceed::run`]. `Proceed` is
//! consumed by that call, so the continuation can run at most once.

use crate::kind::{Flow, HookKind};
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

pub(crate) type BeforeFn<M, E> = Arc<dyn Fn(&mut M) -> Result<Flow, E> + Send + Sync>;
pub(crate) type AroundFn<M, E> =
    Arc<dyn for<'p> Fn(&mut M, Proceed<'p, M, E>) -> Result<Flow, E> + Send + Sync>;
pub(crate) type AfterFn<M, E> = Arc<dyn Fn(&mut M) -> Result<(), E> + Send + Sync>;

/// Identity of a hook inside one (event, kind) chain.
///
/// Registering a second hook with the same identity replaces the first in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct HookId(Cow<'static, str>);

impl HookId {
    /// Identity of a method hook, usually the method's name.
    pub fn method(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Identity of a delegate hook: the delegate's type name without its module
    /// path or generic arguments (`Auditor<billing::Ledger>` is `Auditor`).
    pub fn delegate<D: ?Sized>() -> Self {
        let full = std::any::type_name::<D>();
        let base = full.split('<').next().unwrap_or(full);
        let name = base.rsplit("::").next().unwrap_or("Unknown");
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for HookId {
    fn from(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }
}

impl From<String> for HookId {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

/// Continuation handed to an `around` hook.
///
/// Calling [`run`](Proceed::run) executes the inner `around` hooks and then the
/// unit of work, and returns the inner chain's [`Flow`]. Dropping it without
/// calling `run` suppresses the unit of work and every `after` hook; the run then
/// reports [`Outcome::Skipped`](crate::Outcome::Skipped).
///
/// Once any `around` hook returns [`Flow::Abort`], `run` returns `Flow::Abort`
/// to every enclosing hook and the run reports
/// [`Outcome::Aborted`](crate::Outcome::Aborted), whatever those hooks return.
pub struct Proceed<'a, M, E> {
    chain: &'a mut dyn Resume<M, E>,
    index: usize,
}

impl<'a, M, E> Proceed<'a, M, E> {
    pub(crate) fn new(chain: &'a mut dyn Resume<M, E>, index: usize) -> Self {
        Self { chain, index }
    }

    /// Resumes the chain on `model`.
    pub fn run(self, model: &mut M) -> Result<Flow, E> {
        self.chain.resume(self.index, model)
    }
}

impl<M, E> fmt::Debug for Proceed<'_, M, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proceed").field("index", &self.index).finish()
    }
}

/// The part of a run that an `around` continuation re-enters.
pub(crate) trait Resume<M, E> {
    fn resume(&mut self, index: usize, model: &mut M) -> Result<Flow, E>;
}

pub(crate) enum HookBody<M, E> {
    Before(BeforeFn<M, E>),
    Around(AroundFn<M, E>),
    After(AfterFn<M, E>),
}

impl<M, E> Clone for HookBody<M, E> {
    fn clone(&self) -> Self {
        match self {
            HookBody::Before(f) => HookBody::Before(Arc::clone(f)),
            HookBody::Around(f) => HookBody::Around(Arc::clone(f)),
            HookBody::After(f) => HookBody::After(Arc::clone(f)),
        }
    }
}

struct Guard<M> {
    condition: Arc<dyn Fn(&M) -> bool + Send + Sync>,
    expected: bool,
}

impl<M> Clone for Guard<M> {
    fn clone(&self) -> Self {
        Self {
            condition: Arc::clone(&self.condition),
            expected: self.expected,
        }
    }
}

/// One registrable callback.
///
/// ```rust
/// use model_callbacks::{Flow, Hook, HookKind};
///
/// struct Person { name: String }
///
/// let hook: Hook<Person, std::convert::Infallible> =
///     Hook::before("strip_name", |person: &mut Person| {
///         person.name = person.name.trim().to_string();
///         Ok(Flow::Continue)
///     })
///     .when(|person| person.name.starts_with(' '));
///
/// assert_eq!(hook.kind(), HookKind::Before);
/// assert_eq!(hook.id().as_str(), "strip_name");
/// ```
pub struct Hook<M, E> {
    id: HookId,
    body: HookBody<M, E>,
    guards: Vec<Guard<M>>,
}

impl<M, E> Hook<M, E> {
    fn from_body(id: impl Into<HookId>, body: HookBody<M, E>) -> Self {
        Self {
            id: id.into(),
            body,
            guards: Vec::new(),
        }
    }

    pub fn before<F>(id: impl Into<HookId>, f: F) -> Self
    where
        F: Fn(&mut M) -> Result<Flow, E> + Send + Sync + 'static,
    {
        Self::from_body(id, HookBody::Before(Arc::new(f)))
    }

    pub fn around<F>(id: impl Into<HookId>, f: F) -> Self
    where
        F: for<'p> Fn(&mut M, Proceed<'p, M, E>) -> Result<Flow, E> + Send + Sync + 'static,
    {
        Self::from_body(id, HookBody::Around(Arc::new(f)))
    }

    pub fn after<F>(id: impl Into<HookId>, f: F) -> Self
    where
        F: Fn(&mut M) -> Result<(), E> + Send + Sync + 'static,
    {
        Self::from_body(id, HookBody::After(Arc::new(f)))
    }

    /// Only run this hook when `condition` holds for the model (`if:`).
    pub fn when<C>(mut self, condition: C) -> Self
    where
        C: Fn(&M) -> bool + Send + Sync + 'static,
    {
        self.guards.push(Guard {
            condition: Arc::new(condition),
            expected: true,
        });
        self
    }

    /// Skip this hook when `condition` holds for the model (`unless:`).
    pub fn unless<C>(mut self, condition: C) -> Self
    where
        C: Fn(&M) -> bool + Send + Sync + 'static,
    {
        self.guards.push(Guard {
            condition: Arc::new(condition),
            expected: false,
        });
        self
    }

    pub fn id(&self) -> &HookId {
        &self.id
    }

    pub fn kind(&self) -> HookKind {
        match self.body {
            HookBody::Before(_) => HookKind::Before,
            HookBody::Around(_) => HookKind::Around,
            HookBody::After(_) => HookKind::After,
        }
    }

    pub fn is_guarded(&self) -> bool {
        !self.guards.is_empty()
    }

    pub(crate) fn applies_to(&self, model: &M) -> bool {
        self.guards
            .iter()
            .all(|guard| (guard.condition)(model) == guard.expected)
    }

    pub(crate) fn as_before(&self) -> Option<&BeforeFn<M, E>> {
        match &self.body {
            HookBody::Before(f) => Some(f),
            _ => None,
        }
    }

    pub(crate) fn as_around(&self) -> Option<&AroundFn<M, E>> {
        match &self.body {
            HookBody::Around(f) => Some(f),
            _ => None,
        }
    }

    pub(crate) fn as_after(&self) -> Option<&AfterFn<M, E>> {
        match &self.body {
            HookBody::After(f) => Some(f),
            _ => None,
        }
    }
}

impl<M, E> Clone for Hook<M, E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            body: self.body.clone(),
            guards: self.guards.clone(),
        }
    }
}

impl<M, E> fmt::Debug for Hook<M, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("guards", &self.guards.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        value: i32,
    }

    mod billing {
        pub struct InvoiceAuditor;
    }

    #[test]
    fn test_delegate_id_drops_module_path() {
        assert_eq!(
            HookId::delegate::<billing::InvoiceAuditor>().as_str(),
            "InvoiceAuditor"
        );
    }

    #[test]
    fn test_delegate_id_drops_generic_arguments() {
        #[allow(dead_code)]
        struct Auditor<T>(T);
        assert_eq!(
            HookId::delegate::<Auditor<billing::InvoiceAuditor>>().as_str(),
            "Auditor"
        );
    }

    #[test]
    fn test_guards_combine() {
        let hook: Hook<Counter, ()> = Hook::after("log", |_: &mut Counter| Ok(()))
            .when(|c| c.value > 0)
            .unless(|c| c.value > 10);

        assert!(hook.is_guarded());
        assert!(!hook.applies_to(&Counter { value: 0 }));
        assert!(hook.applies_to(&Counter { value: 5 }));
        assert!(!hook.applies_to(&Counter { value: 11 }));
    }

    #[test]
    fn test_unguarded_hook_always_applies() {
        let hook: Hook<Counter, ()> = Hook::before("noop", |_: &mut Counter| Ok(Flow::Continue));
        assert!(hook.applies_to(&Counter { value: -1 }));
        assert!(hook.as_before().is_some());
        assert!(hook.as_after().is_none());
    }
}
