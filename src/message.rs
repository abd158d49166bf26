//! Message envelopes: [`Request`], [`Response`] and [`Event`].
//!
//! Envelopes are immutable value objects describing an action plus an
//! optional payload. A `Request` is created by a client and consumed exactly
//! once by the bus; the bus builds the paired `Response` by copying the
//! request's id, sender, type and resource. An `Event` has no addressed
//! receiver and is broadcast to every registered client, so its content is
//! reference counted and shared read-only across recipients.

use std::rc::Rc;

use crate::entity::Entity;
use crate::ids::RequestId;

/// Conventional request type tags.
pub mod request_type {
    pub const CREATE: &str = "create";
    pub const READ: &str = "read";
    pub const UPDATE: &str = "update";
    pub const DELETE: &str = "delete";
}

/// Conventional event type tags.
pub mod event_type {
    pub const CREATED: &str = "created";
    pub const UPDATED: &str = "updated";
    pub const DELETED: &str = "deleted";
}

/// A message asking a resource owning controller to perform an action.
#[derive(Debug)]
pub struct Request {
    id: RequestId,
    sender: String,
    request_type: String,
    resource: String,
    content: Option<Box<dyn Entity>>,
}

impl Request {
    /// Builds a request and stamps it with a fresh correlation id.
    pub fn new(
        sender: impl Into<String>,
        request_type: impl Into<String>,
        resource: impl Into<String>,
        content: Option<Box<dyn Entity>>,
    ) -> Self {
        Self {
            id: RequestId::new(),
            sender: sender.into(),
            request_type: request_type.into(),
            resource: resource.into(),
            content,
        }
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Identifier of the client that issued this request.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn request_type(&self) -> &str {
        &self.request_type
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn content(&self) -> Option<&dyn Entity> {
        self.content.as_deref()
    }
}

/// The result of a previously dispatched request, addressed back to the
/// originating sender.
#[derive(Debug)]
pub struct Response {
    id: RequestId,
    receiver: String,
    request_type: String,
    resource: String,
    content: Box<dyn Entity>,
}

impl Response {
    pub fn new(
        id: RequestId,
        receiver: impl Into<String>,
        request_type: impl Into<String>,
        resource: impl Into<String>,
        content: Box<dyn Entity>,
    ) -> Self {
        Self {
            id,
            receiver: receiver.into(),
            request_type: request_type.into(),
            resource: resource.into(),
            content,
        }
    }

    /// Pairs a result with the request that produced it, copying the
    /// request's id, sender, type and resource.
    pub(crate) fn for_request(request: &Request, content: Box<dyn Entity>) -> Self {
        Self::new(
            request.id(),
            request.sender(),
            request.request_type(),
            request.resource(),
            content,
        )
    }

    /// Correlation id copied from the originating request.
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Identifier of the client this response is addressed to.
    pub fn receiver(&self) -> &str {
        &self.receiver
    }

    pub fn request_type(&self) -> &str {
        &self.request_type
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// The domain result, or an error status entity.
    pub fn content(&self) -> &dyn Entity {
        &*self.content
    }
}

/// A broadcast notification with no addressed receiver.
#[derive(Debug, Clone)]
pub struct Event {
    event_type: String,
    resource: String,
    content: Option<Rc<dyn Entity>>,
}

impl Event {
    pub fn new(
        event_type: impl Into<String>,
        resource: impl Into<String>,
        content: Option<Rc<dyn Entity>>,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            resource: resource.into(),
            content,
        }
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Shared read-only content, cloneable by any recipient.
    pub fn content(&self) -> Option<&Rc<dyn Entity>> {
        self.content.as_ref()
    }
}
