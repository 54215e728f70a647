use model_callbacks::{
    callback_delegate, CallbackError, CallbackModel, Callbacks, Flow, HookKind, KindSet, Outcome,
    Proceed, SharedCallbacks,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// --- Test Model ---

#[derive(Debug, thiserror::Error, PartialEq)]
enum PersonError {
    #[error(transparent)]
    Callbacks(#[from] CallbackError),
    #[error("finalize failed")]
    Finalize,
}

#[derive(Debug, Default)]
struct Person {
    calls: Vec<&'static str>,
    block_reset: bool,
    fail_finalize: bool,
}

impl Person {
    fn reset_me(&mut self) -> Result<Flow, PersonError> {
        self.calls.push("reset_me");
        if self.block_reset {
            return Ok(Flow::Abort);
        }
        Ok(Flow::Continue)
    }

    fn log_me(&mut self, next: Proceed<'_, Person, PersonError>) -> Result<Flow, PersonError> {
        self.calls.push("log_me:pre");
        let flow = next.run(self)?;
        self.calls.push("log_me:post");
        Ok(flow)
    }

    fn finalize_me(&mut self) -> Result<(), PersonError> {
        if self.fail_finalize {
            return Err(PersonError::Finalize);
        }
        self.calls.push("finalize_me");
        Ok(())
    }

    fn update(&mut self) -> Result<Outcome<&'static str>, PersonError> {
        self.run_callbacks("update", |person| {
            person.calls.push("update method called");
            Ok("updated")
        })
    }
}

static PERSON_CALLBACKS: SharedCallbacks<Person, PersonError> = SharedCallbacks::new();

impl CallbackModel for Person {
    type Error = PersonError;

    fn callbacks() -> Result<&'static Callbacks<Self, Self::Error>, CallbackError> {
        PERSON_CALLBACKS.get_or_build(|callbacks| {
            callbacks.define_event("update", KindSet::all())?;
            callbacks.define_event("create", KindSet::only(&[HookKind::Before, HookKind::After]))?;
            callbacks.before("update", "reset_me", Person::reset_me)?;
            callbacks.around("update", "log_me", Person::log_me)?;
            callbacks.after("update", "finalize_me", Person::finalize_me)
        })
    }
}

// --- Tests ---

#[test]
fn test_update_runs_hooks_in_order() {
    let mut person = Person::default();
    let outcome = person.update().unwrap();

    assert_eq!(outcome, Outcome::Completed("updated"));
    assert_eq!(
        person.calls,
        [
            "reset_me",
            "log_me:pre",
            "update method called",
            "log_me:post",
            "finalize_me"
        ]
    );
}

#[test]
fn test_abort_in_reset_me_stops_the_chain() {
    let mut person = Person {
        block_reset: true,
        ..Person::default()
    };
    let outcome = person.update().unwrap();

    assert!(outcome.is_aborted());
    assert_eq!(person.calls, ["reset_me"]);
}

#[test]
fn test_after_hook_failure_keeps_unit_effects() {
    let mut person = Person {
        fail_finalize: true,
        ..Person::default()
    };
    assert_eq!(person.update(), Err(PersonError::Finalize));
    assert!(person.calls.contains(&"update method called"));
}

#[test]
fn test_create_rejects_around_hooks() {
    let mut callbacks = Person::callbacks().unwrap().clone();
    let err = callbacks
        .around("create", "log_me", Person::log_me)
        .unwrap_err();
    assert!(matches!(
        err,
        CallbackError::KindNotEnabled {
            kind: HookKind::Around,
            ..
        }
    ));
}

#[test]
fn test_create_without_hooks_returns_unit_result() {
    let mut person = Person::default();
    let outcome = person.run_callbacks("create", |_| Ok(7)).unwrap();
    assert_eq!(outcome, Outcome::Completed(7));
    assert!(person.calls.is_empty());
}

#[test]
fn test_running_an_undefined_event() {
    let mut person = Person::default();
    let err = person.run_callbacks("destroy", |_| Ok(())).unwrap_err();
    assert_eq!(
        err,
        PersonError::Callbacks(CallbackError::UndefinedEvent("destroy".into()))
    );
}

#[test]
fn test_cloned_registry_is_independent() {
    let mut derived = Person::callbacks().unwrap().clone();
    derived.skip("update", HookKind::Before, "reset_me").unwrap();

    let shared = Person::callbacks().unwrap();
    assert_eq!(shared.hooks("update", HookKind::Before).len(), 1);
    assert!(derived.hooks("update", HookKind::Before).is_empty());
}

#[test]
fn test_describe_serializes_chains() {
    let summary = Person::callbacks().unwrap().describe();
    let json = serde_json::to_value(&summary).unwrap();

    assert_eq!(json[0]["name"], "create");
    assert_eq!(json[1]["name"], "update");
    assert_eq!(json[1]["around"][0], "log_me");
    assert_eq!(json[0]["kinds"]["around"], false);
}

// --- Delegates ---

callback_delegate! {
    trait AuditCallbacks for Person, error = PersonError {
        before: [update],
        around: [update],
        after: [update],
    }
}

#[derive(Default)]
struct Auditor {
    seen: AtomicUsize,
}

impl AuditCallbacks for Auditor {
    fn before_update(&self, person: &mut Person) -> Result<Flow, PersonError> {
        self.seen.fetch_add(1, Ordering::SeqCst);
        person.calls.push("audit:before");
        Ok(Flow::Continue)
    }

    fn around_update(
        &self,
        person: &mut Person,
        next: Proceed<'_, Person, PersonError>,
    ) -> Result<Flow, PersonError> {
        person.calls.push("audit:around");
        next.run(person)
    }

    fn after_update(&self, person: &mut Person) -> Result<(), PersonError> {
        person.calls.push("audit:after");
        Ok(())
    }
}

#[test]
fn test_delegate_hooks_join_the_chain() {
    let mut callbacks = Person::callbacks().unwrap().clone();
    let auditor = Arc::new(Auditor::default());
    Arc::clone(&auditor).register_callbacks(&mut callbacks).unwrap();

    assert_eq!(
        callbacks.hooks("update", HookKind::Before)[1].as_str(),
        "Auditor"
    );

    let mut person = Person::default();
    let outcome = callbacks
        .run("update", &mut person, |p| {
            p.calls.push("unit");
            Ok(())
        })
        .unwrap();

    assert!(outcome.is_completed());
    assert_eq!(auditor.seen.load(Ordering::SeqCst), 1);
    assert_eq!(
        person.calls,
        [
            "reset_me",
            "audit:before",
            "log_me:pre",
            "audit:around",
            "unit",
            "log_me:post",
            "finalize_me",
            "audit:after"
        ]
    );
}

#[test]
fn test_delegate_on_disabled_kind_fails() {
    let mut callbacks = Callbacks::<Person, PersonError>::new();
    callbacks
        .define_event("update", KindSet::only(&[HookKind::Before]))
        .unwrap();

    let err = Arc::new(Auditor::default())
        .register_callbacks(&mut callbacks)
        .unwrap_err();
    assert_eq!(
        err,
        CallbackError::KindNotEnabled {
            event: "update".into(),
            kind: HookKind::Around
        }
    );
    assert!(callbacks.hooks("update", HookKind::Before).is_empty());
}
