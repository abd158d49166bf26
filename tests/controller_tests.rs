//! Tests for controller handler shapes and request claiming.

use std::cell::RefCell;
use std::rc::Rc;

use busbar::message::{event_type, request_type};
use busbar::{MessageQueue, QueueController, Request, Status, StatusCode};

mod common;

use common::{new_log, record_deliveries, AuditNote, Delivery, UserRecord};
use tracing_util::TestTracing;

#[test]
fn test_typed_handler_receives_the_downcast_payload() {
    let _tracing = TestTracing::init();
    let queue = MessageQueue::new();

    let users = queue.create_controller("users");
    users.add_on_request_with::<UserRecord, _>(request_type::CREATE, |record| {
        Box::new(UserRecord::named(&format!("created-{}", record.name)))
    });

    let client = queue.create_client("c1");
    let names = Rc::new(RefCell::new(Vec::new()));
    let sink = names.clone();
    client.set_on_response(move |response| {
        let record = response
            .content()
            .downcast_ref::<UserRecord>()
            .expect("user record content");
        sink.borrow_mut().push(record.name.clone());
    });

    client
        .send_request(
            request_type::CREATE,
            "users",
            Some(Box::new(UserRecord::named("a"))),
        )
        .expect("enqueue");
    queue.idle();

    assert_eq!(names.borrow().as_slice(), ["created-a".to_string()]);
}

#[test]
fn test_mismatched_content_type_is_not_claimed() {
    let _tracing = TestTracing::init();
    let queue = MessageQueue::new();

    let users = queue.create_controller("users");
    users.add_on_request_with::<UserRecord, _>(request_type::CREATE, |record| {
        Box::new(UserRecord::named(&record.name))
    });

    let client = queue.create_client("c1");
    let codes = Rc::new(RefCell::new(Vec::new()));
    let sink = codes.clone();
    client.set_on_response(move |response| {
        let status = response
            .content()
            .downcast_ref::<Status>()
            .expect("status content");
        sink.borrow_mut().push(status.code());
    });

    client
        .send_request(
            request_type::CREATE,
            "users",
            Some(Box::new(AuditNote {
                text: "wrong payload".to_string(),
            })),
        )
        .expect("enqueue");
    queue.idle();

    assert_eq!(codes.borrow().as_slice(), [StatusCode::NotFound]);
}

#[test]
fn test_payload_type_selects_between_controllers() {
    let _tracing = TestTracing::init();
    let queue = MessageQueue::new();

    let records = queue.create_controller("users");
    records.add_on_request_with::<UserRecord, _>(request_type::CREATE, |_| {
        Box::new(UserRecord::named("record-path"))
    });

    let notes = queue.create_controller("users");
    notes.add_on_request_with::<AuditNote, _>(request_type::CREATE, |_| {
        Box::new(UserRecord::named("note-path"))
    });

    let client = queue.create_client("c1");
    let names = Rc::new(RefCell::new(Vec::new()));
    let sink = names.clone();
    client.set_on_response(move |response| {
        let record = response
            .content()
            .downcast_ref::<UserRecord>()
            .expect("user record content");
        sink.borrow_mut().push(record.name.clone());
    });

    // The first controller is registered earlier but cannot decode the
    // note, so the request falls through to the second one.
    client
        .send_request(
            request_type::CREATE,
            "users",
            Some(Box::new(AuditNote {
                text: "x".to_string(),
            })),
        )
        .expect("enqueue");
    queue.idle();

    assert_eq!(names.borrow().as_slice(), ["note-path".to_string()]);
}

#[test]
fn test_no_payload_handler_ignores_requests_with_content() {
    let _tracing = TestTracing::init();
    let queue = MessageQueue::new();

    let users = queue.create_controller("users");
    users.add_on_request(request_type::READ, || Box::new(UserRecord::named("a")));

    let request = Request::new(
        "c1",
        request_type::READ,
        "users",
        Some(Box::new(UserRecord::named("payload"))),
    );
    assert!(!users.can_process(&request));

    let content_less = Request::new("c1", request_type::READ, "users", None);
    assert!(users.can_process(&content_less));
}

#[test]
fn test_claims_are_scoped_to_the_owned_resource() {
    let queue = MessageQueue::new();

    let users = queue.create_controller("users");
    users.add_on_request(request_type::READ, || Box::new(UserRecord::named("a")));

    let request = Request::new("c1", request_type::READ, "groups", None);
    assert!(!users.can_process(&request));
}

#[test]
fn test_processing_without_a_handler_reports_not_implemented() {
    let queue = MessageQueue::new();
    let users = queue.create_controller("users");

    let request = Request::new("c1", request_type::DELETE, "users", None);
    let result = users.process(&request);

    let status = result.downcast_ref::<Status>().expect("status content");
    assert_eq!(status.code(), StatusCode::NotImplemented);
}

#[test]
fn test_send_event_reaches_registered_clients() {
    let _tracing = TestTracing::init();
    let queue = MessageQueue::new();

    let users = queue.create_controller("users");

    let log = new_log();
    let client = queue.create_client("c1");
    record_deliveries(&client, &log);

    users
        .send_event(event_type::CREATED, Some(Rc::new(UserRecord::named("a"))))
        .expect("send event");
    queue.idle();

    assert_eq!(
        log.borrow().as_slice(),
        [Delivery::Event("created".to_string())]
    );
}

#[test]
fn test_send_event_fails_once_the_bus_is_gone() {
    let queue = MessageQueue::new();
    let users = queue.create_controller("users");
    drop(queue);

    let result = users.send_event(event_type::CREATED, None);

    let status = result.expect_err("bus is gone");
    assert_eq!(status.code(), StatusCode::InternalServerError);
}
