use callbacks_recipe::controllers::{ContactResponse, ContactsController};
use callbacks_recipe::mailer::mock::MockMailer;
use callbacks_recipe::mailer::{LogMailer, MailerError, Outbox};
use callbacks_recipe::model::{ContactParams, ContactStatus, CONTACT_INBOX};

fn params(email: &str, message: &str) -> ContactParams {
    ContactParams {
        name: "Ada".to_string(),
        email: email.to_string(),
        message: message.to_string(),
    }
}

#[tokio::test]
async fn test_valid_contact_is_delivered() {
    let mut mock = MockMailer::new();
    mock.expect_deliver().to(CONTACT_INBOX).return_ok();
    let controller = ContactsController::new(mock.mailer());

    let response = controller
        .create(params(" Ada@Example.com ", "Hello there"))
        .await;

    match response {
        ContactResponse::Delivered { contact } => {
            assert_eq!(contact.email, "ada@example.com");
            assert_eq!(contact.status, ContactStatus::Sent);
        }
        other => panic!("expected delivery, got {other:?}"),
    }

    let delivered = mock.delivered();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].reply_to, "ada@example.com");
    assert_eq!(delivered[0].subject, "Contact from Ada");
    mock.verify();
}

#[tokio::test]
async fn test_invalid_address_is_rejected_without_mail() {
    let mock = MockMailer::new();
    let controller = ContactsController::new(mock.mailer());

    let response = controller.create(params("not-an-address", "Hi")).await;

    match response {
        ContactResponse::Rejected { contact } => {
            assert_eq!(contact.status, ContactStatus::Draft);
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    assert!(mock.delivered().is_empty());
    mock.verify();
}

#[tokio::test]
async fn test_mailer_failure_is_reported() {
    let mut mock = MockMailer::new();
    mock.expect_deliver().return_err(MailerError::Unavailable);
    let controller = ContactsController::new(mock.mailer());

    let response = controller.create(params("ada@example.com", "Hi")).await;

    assert_eq!(
        response,
        ContactResponse::Failed {
            error: "Mail transport unavailable".to_string()
        }
    );
    mock.verify();
}

#[tokio::test]
async fn test_empty_message_fails_before_the_mailer() {
    let mock = MockMailer::new();
    let controller = ContactsController::new(mock.mailer());

    let response = controller.create(params("ada@example.com", "   ")).await;

    assert_eq!(
        response,
        ContactResponse::Failed {
            error: "Contact message cannot be empty".to_string()
        }
    );
    mock.verify();
}

#[tokio::test]
async fn test_response_serializes_with_status_tag() {
    let mut mock = MockMailer::new();
    mock.expect_deliver().return_ok();
    let controller = ContactsController::new(mock.mailer());

    let response = controller.create(params("ada@example.com", "Hi")).await;
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["status"], "delivered");
    assert_eq!(json["contact"]["status"], "sent");
}

#[tokio::test]
async fn test_full_contact_flow_through_the_outbox() {
    let (outbox, mailer) = Outbox::new(8);
    let handle = tokio::spawn(outbox.run(LogMailer));
    let controller = ContactsController::new(mailer);

    let mut delivered = 0;
    for email in ["a@example.com", "b@example.com", "broken"] {
        if controller.create(params(email, "Hi")).await.is_delivered() {
            delivered += 1;
        }
    }
    drop(controller);

    assert_eq!(delivered, 2);
    assert_eq!(handle.await.unwrap(), 2);
}
