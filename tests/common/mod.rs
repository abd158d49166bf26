#![allow(dead_code)]

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use busbar::Entity;
use serde::{Deserialize, Serialize};

/// Payload used by most tests: the record a "users" controller answers
/// with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub name: String,
}

impl UserRecord {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl Entity for UserRecord {
    fn entity_type(&self) -> &'static str {
        "user"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A second payload type, for tests that need a mismatching content type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditNote {
    pub text: String,
}

impl Entity for AuditNote {
    fn entity_type(&self) -> &'static str {
        "audit_note"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// What a client observed, in delivery order.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    /// A response, tagged with its request type.
    Response(String),
    /// An event, tagged with its event type.
    Event(String),
}

pub type DeliveryLog = Rc<RefCell<Vec<Delivery>>>;

pub fn new_log() -> DeliveryLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Wires a client's hooks to push into the log.
pub fn record_deliveries(client: &Rc<busbar::GenericClient>, log: &DeliveryLog) {
    let sink = log.clone();
    client.set_on_response(move |response| {
        sink.borrow_mut()
            .push(Delivery::Response(response.request_type().to_string()));
    });
    let sink = log.clone();
    client.set_on_event(move |event| {
        sink.borrow_mut()
            .push(Delivery::Event(event.event_type().to_string()));
    });
}
