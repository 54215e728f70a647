//! # Delegate Hooks
//!
//! Some callbacks belong to an object other than the model: an auditor, a
//! mailer, a catalog. [`callback_delegate!`](crate::callback_delegate) declares
//! a capability trait with one method per (kind, event) pair the delegate
//! supports, named `<kind>_<event>`. The generated trait also provides
//! `register_callbacks`, which installs exactly those methods on a registry
//! under the delegate's type name.
//!
//! ```rust
//! use model_callbacks::{callback_delegate, CallbackError, Callbacks, Flow, HookKind};
//! use std::sync::Arc;
//!
//! #[derive(Default)]
//! struct Book { catalog_number: Option<u32>, published: bool }
//!
//! callback_delegate! {
//!     /// Catalog bookkeeping around publication.
//!     pub trait PublishCallbacks for Book, error = CallbackError {
//!         before: [publish],
//!         after: [publish],
//!     }
//! }
//!
//! struct Catalog { next: u32 }
//!
//! impl PublishCallbacks for Catalog {
//!     fn before_publish(&self, book: &mut Book) -> Result<Flow, CallbackError> {
//!         book.catalog_number = Some(self.next);
//!         Ok(Flow::Continue)
//!     }
//!
//!     fn after_publish(&self, book: &mut Book) -> Result<(), CallbackError> {
//!         assert!(book.published);
//!         Ok(())
//!     }
//! }
//!
//! let mut callbacks = Callbacks::<Book, CallbackError>::new();
//! callbacks.define_model_callbacks(&["publish"]).unwrap();
//! Arc::new(Catalog { next: 7 }).register_callbacks(&mut callbacks).unwrap();
//! assert_eq!(callbacks.hooks("publish", HookKind::Before)[0].as_str(), "Catalog");
//!
//! let mut book = Book::default();
//! let outcome = callbacks.run("publish", &mut book, |b| { b.published = true; Ok(()) }).unwrap();
//! assert!(outcome.is_completed());
//! assert_eq!(book.catalog_number, Some(7));
//! ```

/// Declares a delegate capability trait for a model's callback chains.
///
/// Sections are optional but must appear in `before`, `around`, `after` order.
#[macro_export]
macro_rules! callback_delegate {
    (
        $(#[$meta:meta])*
        $vis:vis trait $name:ident for $model:ty, error = $error:ty {
            $(before: [$($before:ident),* $(,)?] $(,)?)?
            $(around: [$($around:ident),* $(,)?] $(,)?)?
            $(after: [$($after:ident),* $(,)?] $(,)?)?
        }
    ) => {
        $crate::__paste! {
            $(#[$meta])*
            $vis trait $name: ::core::marker::Send + ::core::marker::Sync + 'static {
                $($(
                    fn [<before_ $before>](
                        &self,
                        model: &mut $model,
                    ) -> ::core::result::Result<$crate::Flow, $error>;
                )*)?
                $($(
                    fn [<around_ $around>](
                        &self,
                        model: &mut $model,
                        next: $crate::Proceed<'_, $model, $error>,
                    ) -> ::core::result::Result<$crate::Flow, $error>;
                )*)?
                $($(
                    fn [<after_ $after>](
                        &self,
                        model: &mut $model,
                    ) -> ::core::result::Result<(), $error>;
                )*)?

                /// Installs every hook of this delegate on `callbacks`.
                ///
                /// Nothing is installed unless every listed (kind, event) pair is enabled.
                fn register_callbacks(
                    self: ::std::sync::Arc<Self>,
                    callbacks: &mut $crate::Callbacks<$model, $error>,
                ) -> ::core::result::Result<(), $crate::CallbackError>
                where
                    Self: Sized,
                {
                    $($(
                        callbacks.ensure_enabled(stringify!($before), $crate::HookKind::Before)?;
                    )*)?
                    $($(
                        callbacks.ensure_enabled(stringify!($around), $crate::HookKind::Around)?;
                    )*)?
                    $($(
                        callbacks.ensure_enabled(stringify!($after), $crate::HookKind::After)?;
                    )*)?

                    let id = $crate::HookId::delegate::<Self>();
                    $($(
                        let delegate = ::std::sync::Arc::clone(&self);
                        callbacks.register(
                            stringify!($before),
                            $crate::Hook::before(id.clone(), move |model: &mut $model| delegate.[<before_ $before>](model)),
                        )?;
                    )*)?
                    $($(
                        let delegate = ::std::sync::Arc::clone(&self);
                        callbacks.register(
                            stringify!($around),
                            $crate::Hook::around(id.clone(), move |model: &mut $model, next| delegate.[<around_ $around>](model, next)),
                        )?;
                    )*)?
                    $($(
                        let delegate = ::std::sync::Arc::clone(&self);
                        callbacks.register(
                            stringify!($after),
                            $crate::Hook::after(id.clone(), move |model: &mut $model| delegate.[<after_ $after>](model)),
                        )?;
                    )*)?
                    ::core::result::Result::Ok(())
                }
            }
        }
    };
}
