//! # Hook Kinds, Flow and Outcome
//!
//! The small value types that describe a callback chain:
//!
//! - [`HookKind`]: where a hook sits relative to the unit of work.
//! - [`KindSet`]: the subset of kinds an event accepts, fixed when the event is defined.
//! - [`Flow`]: what `before` and `around` hooks answer (keep going, or abort).
//! - [`Outcome`]: how a run ended when no error was raised.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Position of a hook relative to the unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HookKind {
    Before,
    Around,
    After,
}

impl HookKind {
    /// All kinds, in execution order.
    pub const ALL: [HookKind; 3] = [HookKind::Before, HookKind::Around, HookKind::After];

    pub fn as_str(self) -> &'static str {
        match self {
            HookKind::Before => "before",
            HookKind::Around => "around",
            HookKind::After => "after",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            HookKind::Before => 0,
            HookKind::Around => 1,
            HookKind::After => 2,
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HookKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "before" => Ok(HookKind::Before),
            "around" => Ok(HookKind::Around),
            "after" => Ok(HookKind::After),
            other => Err(format!("Unknown hook kind: {other}")),
        }
    }
}

/// The hook kinds enabled for one event.
///
/// Defaults to all three, matching `define_model_callbacks :event` without `only:`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindSet {
    before: bool,
    around: bool,
    after: bool,
}

impl KindSet {
    pub const fn all() -> Self {
        Self {
            before: true,
            around: true,
            after: true,
        }
    }

    pub const fn empty() -> Self {
        Self {
            before: false,
            around: false,
            after: false,
        }
    }

    /// A set holding exactly `kinds`.
    pub fn only(kinds: &[HookKind]) -> Self {
        kinds.iter().copied().collect()
    }

    pub fn with(mut self, kind: HookKind) -> Self {
        match kind {
            HookKind::Before => self.before = true,
            HookKind::Around => self.around = true,
            HookKind::After => self.after = true,
        }
        self
    }

    pub fn contains(self, kind: HookKind) -> bool {
        match kind {
            HookKind::Before => self.before,
            HookKind::Around => self.around,
            HookKind::After => self.after,
        }
    }

    pub fn is_empty(self) -> bool {
        !(self.before || self.around || self.after)
    }

    /// Enabled kinds in execution order.
    pub fn iter(self) -> impl Iterator<Item = HookKind> {
        HookKind::ALL.into_iter().filter(move |kind| self.contains(*kind))
    }
}

impl Default for KindSet {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<HookKind> for KindSet {
    fn from_iter<I: IntoIterator<Item = HookKind>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), KindSet::with)
    }
}

/// Answer of a `before` or `around` hook.
///
/// `Abort` is the cooperative stop signal: the rest of the chain is skipped and
/// the run reports [`Outcome::Aborted`]. It is an expected protocol outcome, not
/// an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Abort,
}

impl Flow {
    pub fn is_abort(self) -> bool {
        self == Flow::Abort
    }
}

/// How a callback run ended when nothing failed.
///
/// Callers distinguish three results of a run: `Ok(Outcome::Completed(r))`,
/// an abort (`Ok(Outcome::Aborted)`), and a propagated failure (`Err(e)`).
/// `Skipped` is the silent variant of "did not complete": an `around` hook
/// returned without invoking its continuation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Outcome<R> {
    /// The unit of work ran and every hook let it through.
    Completed(R),
    /// A `before` or `around` hook returned [`Flow::Abort`].
    Aborted,
    /// An `around` hook never invoked its continuation.
    Skipped,
}

impl<R> Outcome<R> {
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed(_))
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, Outcome::Aborted)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Outcome::Skipped)
    }

    /// The unit of work's result, if it completed.
    pub fn completed(self) -> Option<R> {
        match self {
            Outcome::Completed(value) => Some(value),
            Outcome::Aborted | Outcome::Skipped => None,
        }
    }

    pub fn map<T>(self, f: impl FnOnce(R) -> T) -> Outcome<T> {
        match self {
            Outcome::Completed(value) => Outcome::Completed(f(value)),
            Outcome::Aborted => Outcome::Aborted,
            Outcome::Skipped => Outcome::Skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_set_only_keeps_listed_kinds() {
        let kinds = KindSet::only(&[HookKind::Before, HookKind::After]);
        assert!(kinds.contains(HookKind::Before));
        assert!(!kinds.contains(HookKind::Around));
        assert!(kinds.contains(HookKind::After));
        assert_eq!(
            kinds.iter().collect::<Vec<_>>(),
            vec![HookKind::Before, HookKind::After]
        );
    }

    #[test]
    fn test_kind_set_defaults_to_all() {
        assert_eq!(KindSet::default(), KindSet::all());
        assert!(KindSet::only(&[]).is_empty());
    }

    #[test]
    fn test_hook_kind_parses_lowercase_names() {
        assert_eq!("around".parse::<HookKind>(), Ok(HookKind::Around));
        assert!("later".parse::<HookKind>().is_err());
    }

    #[test]
    fn test_outcome_completed_value() {
        assert_eq!(Outcome::Completed(3).map(|n| n * 2).completed(), Some(6));
        assert_eq!(Outcome::<u8>::Aborted.completed(), None);
        assert!(Outcome::<()>::Skipped.is_skipped());
    }
}
