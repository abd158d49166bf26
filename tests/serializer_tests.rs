//! Tests for the serialization boundary contract.
//!
//! A recording context stands in for the wire format: it captures the
//! fields a serializer writes, in order, and can be told to fail a given
//! key so the short-circuit behavior is observable.

use std::rc::Rc;

use busbar::message::{event_type, request_type};
use busbar::serialization::{
    DeserializationContext, EventSerializer, ResponseSerializer, SerializationContext, Serializer,
};
use busbar::{Entity, Event, RequestId, Response, Status, StatusCode};

mod common;

use common::UserRecord;

#[derive(Default)]
struct RecordingContext {
    strings: Vec<(String, String)>,
    entities: Vec<(String, String)>,
    fail_on: Option<&'static str>,
}

impl RecordingContext {
    fn failing_on(key: &'static str) -> Self {
        Self {
            fail_on: Some(key),
            ..Self::default()
        }
    }
}

impl SerializationContext for RecordingContext {
    fn set_string(&mut self, key: &str, value: &str) -> Result<(), Status> {
        if self.fail_on == Some(key) {
            return Err(Status::not_implemented("set_string unsupported"));
        }
        self.strings.push((key.to_string(), value.to_string()));
        Ok(())
    }

    fn set_entity(&mut self, key: &str, entity: &dyn Entity) -> Result<(), Status> {
        if self.fail_on == Some(key) {
            return Err(Status::not_implemented("set_entity unsupported"));
        }
        self.entities
            .push((key.to_string(), entity.entity_type().to_string()));
        Ok(())
    }
}

struct EmptyContext;

impl DeserializationContext for EmptyContext {
    fn get_string(&mut self, key: &str) -> Result<String, Status> {
        Err(Status::not_found(format!("no field '{key}'")))
    }
}

fn sample_response() -> Response {
    Response::new(
        RequestId::new(),
        "rec",
        request_type::READ,
        "res",
        Box::new(UserRecord::named("a")),
    )
}

#[test]
fn test_serializes_a_response() {
    let response = sample_response();
    let mut context = RecordingContext::default();

    ResponseSerializer
        .serialize(&mut context, &response)
        .expect("serialize");

    assert_eq!(
        context.strings,
        vec![
            ("id".to_string(), response.id().to_string()),
            ("requestType".to_string(), "read".to_string()),
            ("resource".to_string(), "res".to_string()),
        ]
    );
    assert_eq!(
        context.entities,
        vec![("content".to_string(), "user".to_string())]
    );
}

#[test]
fn test_response_serialization_short_circuits_on_the_first_failure() {
    for failing_key in ["id", "requestType", "resource", "content"] {
        let response = sample_response();
        let mut context = RecordingContext::failing_on(failing_key);

        let status = ResponseSerializer
            .serialize(&mut context, &response)
            .expect_err("serialization fails");

        assert_eq!(status.code(), StatusCode::InternalServerError);
        let inner = status.inner().expect("inner status");
        assert_eq!(inner.code(), StatusCode::NotImplemented);

        // Nothing past the failing field was written.
        let written: Vec<&str> = context
            .strings
            .iter()
            .map(|(key, _)| key.as_str())
            .chain(context.entities.iter().map(|(key, _)| key.as_str()))
            .collect();
        let expected: Vec<&str> = ["id", "requestType", "resource", "content"]
            .into_iter()
            .take_while(|key| *key != failing_key)
            .collect();
        assert_eq!(written, expected);
    }
}

#[test]
fn test_response_deserialization_is_not_implemented() {
    let status = ResponseSerializer
        .deserialize(&mut EmptyContext)
        .expect_err("unsupported");

    assert_eq!(status.code(), StatusCode::InternalServerError);
    let inner = status.inner().expect("inner status");
    assert_eq!(inner.code(), StatusCode::NotImplemented);
}

#[test]
fn test_serializes_an_event() {
    let event = Event::new(
        event_type::UPDATED,
        "users",
        Some(Rc::new(UserRecord::named("a"))),
    );
    let mut context = RecordingContext::default();

    EventSerializer
        .serialize(&mut context, &event)
        .expect("serialize");

    assert_eq!(
        context.strings,
        vec![
            ("eventType".to_string(), "updated".to_string()),
            ("resource".to_string(), "users".to_string()),
        ]
    );
    assert_eq!(
        context.entities,
        vec![("content".to_string(), "user".to_string())]
    );
}

#[test]
fn test_content_less_events_skip_the_content_field() {
    let event = Event::new(event_type::DELETED, "users", None);
    let mut context = RecordingContext::default();

    EventSerializer
        .serialize(&mut context, &event)
        .expect("serialize");

    assert!(context.entities.is_empty());
}

#[test]
fn test_event_deserialization_is_not_implemented() {
    let status = EventSerializer
        .deserialize(&mut EmptyContext)
        .expect_err("unsupported");

    assert_eq!(status.code(), StatusCode::InternalServerError);
    let inner = status.inner().expect("inner status");
    assert_eq!(inner.code(), StatusCode::NotImplemented);
}
