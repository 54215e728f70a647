//! # Callbacks Recipe Demo
//!
//! Walks through every model once:
//! 1.  `Person#update`, then the same update on a frozen person.
//! 2.  `Book#publish` with the catalog delegate.
//! 3.  `User#save` completing, aborting and being skipped.
//! 4.  Two contact-form submissions through the [`ContactsController`].

use callbacks_recipe::controllers::ContactsController;
use callbacks_recipe::mailer::{LogMailer, Outbox};
use callbacks_recipe::model::{Book, Catalog, ContactParams, Person, PersonUpdate, User};
use model_callbacks::tracing::setup_tracing;
use tracing::{info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    info!("Starting callbacks demo");

    // Person
    let span = tracing::info_span!("person");
    let _enter = span.enter();
    let mut person = Person::new("Ada", 36);
    let outcome = person
        .update(PersonUpdate {
            age: Some(37),
            ..PersonUpdate::default()
        })
        .map_err(|e| e.to_string())?;
    info!(?outcome, steps = ?person.history, "Person updated");

    let mut frozen = Person {
        frozen: true,
        ..Person::new("Grace", 45)
    };
    let outcome = frozen
        .update(PersonUpdate::default())
        .map_err(|e| e.to_string())?;
    info!(?outcome, "Frozen person update");
    drop(_enter);

    // Book
    let span = tracing::info_span!("book");
    let _enter = span.enter();
    let mut book = Book::new("Dune", "Frank Herbert");
    let outcome = book.publish().map_err(|e| e.to_string())?;
    info!(?outcome, catalog_number = ?book.catalog_number, "Book publish");
    let titles = Catalog::shared()
        .published_titles()
        .map_err(|e| e.to_string())?;
    info!(?titles, "Catalog");
    drop(_enter);

    // User
    let span = tracing::info_span!("user");
    let _enter = span.enter();
    let users = [
        User::new("  Ada   Lovelace ", "ada@example.com"),
        User::new("   ", "nobody@example.com"),
        User {
            read_only: true,
            ..User::new("Grace", "grace@example.com")
        },
    ];
    for mut user in users {
        let outcome = user.save().map_err(|e| e.to_string())?;
        info!(?outcome, name = %user.name, "User save");
    }
    drop(_enter);

    // Contacts
    let (outbox, mailer) = Outbox::new(16);
    let outbox_handle = tokio::spawn(outbox.run(LogMailer));
    let controller = ContactsController::new(mailer);

    let submissions = [
        ContactParams {
            name: "Ada".to_string(),
            email: " Ada@Example.com ".to_string(),
            message: "Loved the talk on engines.".to_string(),
        },
        ContactParams {
            name: "Anonymous".to_string(),
            email: "not-an-address".to_string(),
            message: "Hello?".to_string(),
        },
    ];
    for params in submissions {
        let response = controller
            .create(params)
            .instrument(tracing::info_span!("contact"))
            .await;
        info!(delivered = response.is_delivered(), "Contact response");
    }

    drop(controller);
    let delivered = outbox_handle.await.map_err(|e| e.to_string())?;
    info!(delivered, "Demo finished");

    Ok(())
}
