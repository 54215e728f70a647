//! # Book
//!
//! A model whose `publish` hooks live on another object. The [`Catalog`]
//! assigns catalog numbers before publication and keeps the list of published
//! titles afterwards; it plugs into the chain through the
//! [`PublishCallbacks`] delegate trait.
//!
//! | Kind | Hook | Effect |
//! |------|------|--------|
//! | before | `require_title` | aborts untitled books |
//! | before | `Catalog` | assigns the next catalog number |
//! | after | `Catalog` | records the published title |

use model_callbacks::{
    callback_delegate, CallbackError, CallbackModel, Callbacks, Flow, Outcome, SharedCallbacks,
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BookError {
    #[error(transparent)]
    Callbacks(#[from] CallbackError),
    #[error("Catalog is unavailable")]
    CatalogUnavailable,
    #[error("Book {0:?} is already published")]
    AlreadyPublished(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub catalog_number: Option<u32>,
    pub published: bool,
}

impl Book {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            ..Self::default()
        }
    }

    /// Publishes the book and returns its catalog number.
    pub fn publish(&mut self) -> Result<Outcome<u32>, BookError> {
        self.run_callbacks("publish", |book| {
            if book.published {
                return Err(BookError::AlreadyPublished(book.title.clone()));
            }
            book.published = true;
            book.catalog_number.ok_or(BookError::CatalogUnavailable)
        })
    }

    fn require_title(&mut self) -> Result<Flow, BookError> {
        if self.title.trim().is_empty() {
            info!(author = %self.author, "Refusing to publish an untitled book");
            return Ok(Flow::Abort);
        }
        Ok(Flow::Continue)
    }
}

callback_delegate! {
    /// Hooks an external object runs around `Book#publish`.
    pub trait PublishCallbacks for Book, error = BookError {
        before: [publish],
        after: [publish],
    }
}

/// Hands out catalog numbers and remembers what has been published.
#[derive(Debug)]
pub struct Catalog {
    next_number: AtomicU32,
    published: Mutex<Vec<String>>,
}

impl Catalog {
    pub fn starting_at(first_number: u32) -> Self {
        Self {
            next_number: AtomicU32::new(first_number),
            published: Mutex::new(Vec::new()),
        }
    }

    /// The catalog wired into `Book`'s shared registry.
    pub fn shared() -> &'static Arc<Catalog> {
        static CATALOG: OnceLock<Arc<Catalog>> = OnceLock::new();
        CATALOG.get_or_init(|| Arc::new(Catalog::starting_at(1000)))
    }

    pub fn published_titles(&self) -> Result<Vec<String>, BookError> {
        self.published
            .lock()
            .map(|titles| titles.clone())
            .map_err(|_| BookError::CatalogUnavailable)
    }
}

impl PublishCallbacks for Catalog {
    fn before_publish(&self, book: &mut Book) -> Result<Flow, BookError> {
        if book.catalog_number.is_none() {
            let number = self.next_number.fetch_add(1, Ordering::SeqCst);
            debug!(title = %book.title, number, "Assigned catalog number");
            book.catalog_number = Some(number);
        }
        Ok(Flow::Continue)
    }

    fn after_publish(&self, book: &mut Book) -> Result<(), BookError> {
        let mut titles = self
            .published
            .lock()
            .map_err(|_| BookError::CatalogUnavailable)?;
        titles.push(book.title.clone());
        info!(title = %book.title, total = titles.len(), "Book published");
        Ok(())
    }
}

static BOOK_CALLBACKS: SharedCallbacks<Book, BookError> = SharedCallbacks::new();

impl CallbackModel for Book {
    type Error = BookError;

    fn callbacks() -> Result<&'static Callbacks<Self, Self::Error>, CallbackError> {
        BOOK_CALLBACKS.get_or_build(|callbacks| {
            callbacks.define_model_callbacks(&["publish"])?;
            callbacks.before("publish", "require_title", Book::require_title)?;
            Arc::clone(Catalog::shared()).register_callbacks(callbacks)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model_callbacks::HookKind;

    #[test]
    fn test_publish_assigns_catalog_number() {
        let mut book = Book::new("Dune", "Frank Herbert");
        let number = book.publish().unwrap().completed().unwrap();

        assert!(number >= 1000);
        assert_eq!(book.catalog_number, Some(number));
        assert!(book.published);
        assert!(Catalog::shared()
            .published_titles()
            .unwrap()
            .contains(&"Dune".to_string()));
    }

    #[test]
    fn test_untitled_book_is_aborted_before_the_catalog() {
        let mut book = Book::new("  ", "Anonymous");
        let outcome = book.publish().unwrap();

        assert!(outcome.is_aborted());
        assert_eq!(book.catalog_number, None);
        assert!(!book.published);
    }

    #[test]
    fn test_publishing_twice_fails_in_the_unit() {
        let mut book = Book::new("Emma", "Jane Austen");
        book.publish().unwrap();
        let err = book.publish().unwrap_err();
        assert_eq!(err, BookError::AlreadyPublished("Emma".into()));
    }

    #[test]
    fn test_catalog_is_registered_under_its_type_name() {
        let callbacks = Book::callbacks().unwrap();
        let before: Vec<&str> = callbacks
            .hooks("publish", HookKind::Before)
            .into_iter()
            .map(|id| id.as_str())
            .collect();
        assert_eq!(before, ["require_title", "Catalog"]);
        assert_eq!(callbacks.hooks("publish", HookKind::After)[0].as_str(), "Catalog");
    }

    #[test]
    fn test_private_catalog_counts_from_its_own_start() {
        let mut callbacks = Callbacks::<Book, BookError>::new();
        callbacks.define_model_callbacks(&["publish"]).unwrap();
        let catalog = Arc::new(Catalog::starting_at(1));
        Arc::clone(&catalog).register_callbacks(&mut callbacks).unwrap();

        let mut book = Book::new("Beloved", "Toni Morrison");
        let outcome = callbacks
            .run("publish", &mut book, |b| {
                b.published = true;
                Ok(())
            })
            .unwrap();

        assert!(outcome.is_completed());
        assert_eq!(book.catalog_number, Some(1));
        assert_eq!(catalog.published_titles().unwrap(), ["Beloved"]);
    }
}
