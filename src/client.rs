//! Client participants: callback targets for responses and events.
//!
//! A client owns no queue state. The bus holds a weak reference to it and
//! calls back into [`QueueClient::on_response`] for responses addressed to
//! its id and [`QueueClient::on_event`] for every broadcast event. Both
//! callbacks run on the thread draining the bus and must not re-enter
//! [`MessageQueue::idle`]; work they want to trigger should be enqueued and
//! picked up by a later drain pass.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::dispatcher::MessageQueue;
use crate::entity::Entity;
use crate::ids::RequestId;
use crate::message::{Event, Request, Response};
use crate::status::Status;

type ResponseHook = Rc<dyn Fn(&Response)>;
type EventHook = Rc<dyn Fn(&Event)>;

/// Capability interface the bus dispatches through.
pub trait QueueClient {
    /// Unique identifier responses are addressed by.
    fn client_id(&self) -> &str;

    /// Called once per response addressed to this client's id.
    fn on_response(&self, response: &Response);

    /// Called once per broadcast event.
    fn on_event(&self, event: &Event);
}

/// A client interested in arbitrary resources.
///
/// Created through [`MessageQueue::create_client`]. Dropping the handle
/// deregisters it; [`MessageQueue::remove_client`] does so explicitly.
pub struct GenericClient {
    client_id: String,
    queue: Weak<MessageQueue>,
    response_hook: RefCell<Option<ResponseHook>>,
    event_hook: RefCell<Option<EventHook>>,
}

impl GenericClient {
    pub(crate) fn new(client_id: String, queue: Weak<MessageQueue>) -> Rc<Self> {
        Rc::new(Self {
            client_id,
            queue,
            response_hook: RefCell::new(None),
            event_hook: RefCell::new(None),
        })
    }

    /// Installs the response callback, replacing any previous one.
    pub fn set_on_response(&self, hook: impl Fn(&Response) + 'static) {
        *self.response_hook.borrow_mut() = Some(Rc::new(hook));
    }

    /// Installs the event callback, replacing any previous one.
    pub fn set_on_event(&self, hook: impl Fn(&Event) + 'static) {
        *self.event_hook.borrow_mut() = Some(Rc::new(hook));
    }

    /// Builds a request with this client as the sender and enqueues it.
    /// Returns the correlation id the eventual response will carry.
    ///
    /// # Errors
    ///
    /// Returns an `InternalServerError` status when the bus has been
    /// dropped.
    pub fn send_request(
        &self,
        request_type: &str,
        resource: &str,
        content: Option<Box<dyn Entity>>,
    ) -> Result<RequestId, Status> {
        let queue = self
            .queue
            .upgrade()
            .ok_or_else(|| Status::internal("message queue is gone"))?;
        let request = Request::new(self.client_id.clone(), request_type, resource, content);
        let id = request.id();
        queue.add_request(request)?;
        Ok(id)
    }
}

impl QueueClient for GenericClient {
    fn client_id(&self) -> &str {
        &self.client_id
    }

    fn on_response(&self, response: &Response) {
        let hook = self.response_hook.borrow().clone();
        match hook {
            Some(hook) => hook(response),
            None => debug!(
                client_id = %self.client_id,
                request_id = %response.id(),
                "no response hook installed, dropping response"
            ),
        }
    }

    fn on_event(&self, event: &Event) {
        let hook = self.event_hook.borrow().clone();
        if let Some(hook) = hook {
            hook(event);
        }
    }
}

/// A client scoped to a single resource.
///
/// Created through [`MessageQueue::create_resource_client`]. The scoping is
/// client side only: the bus still broadcasts every event to every client,
/// and this type filters out messages for other resources before
/// dispatching to the hooks registered per request type and per event type.
pub struct ResourceClient {
    client_id: String,
    resource: String,
    queue: Weak<MessageQueue>,
    response_hooks: RefCell<HashMap<String, ResponseHook>>,
    event_hooks: RefCell<HashMap<String, EventHook>>,
}

impl ResourceClient {
    pub(crate) fn new(client_id: String, resource: String, queue: Weak<MessageQueue>) -> Rc<Self> {
        Rc::new(Self {
            client_id,
            resource,
            queue,
            response_hooks: RefCell::new(HashMap::new()),
            event_hooks: RefCell::new(HashMap::new()),
        })
    }

    /// The resource this client is scoped to.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Registers a callback for responses of the given request type,
    /// replacing any previous one for that type.
    pub fn add_on_response(&self, request_type: &str, hook: impl Fn(&Response) + 'static) {
        self.response_hooks
            .borrow_mut()
            .insert(request_type.to_string(), Rc::new(hook));
    }

    /// Registers a callback for events of the given event type, replacing
    /// any previous one for that type.
    pub fn add_on_event(&self, event_type: &str, hook: impl Fn(&Event) + 'static) {
        self.event_hooks
            .borrow_mut()
            .insert(event_type.to_string(), Rc::new(hook));
    }

    /// Enqueues a request against the scoped resource.
    ///
    /// # Errors
    ///
    /// Returns an `InternalServerError` status when the bus has been
    /// dropped.
    pub fn send_request(
        &self,
        request_type: &str,
        content: Option<Box<dyn Entity>>,
    ) -> Result<RequestId, Status> {
        let queue = self
            .queue
            .upgrade()
            .ok_or_else(|| Status::internal("message queue is gone"))?;
        let request = Request::new(
            self.client_id.clone(),
            request_type,
            self.resource.clone(),
            content,
        );
        let id = request.id();
        queue.add_request(request)?;
        Ok(id)
    }
}

impl QueueClient for ResourceClient {
    fn client_id(&self) -> &str {
        &self.client_id
    }

    fn on_response(&self, response: &Response) {
        if response.resource() != self.resource {
            return;
        }
        let hook = self
            .response_hooks
            .borrow()
            .get(response.request_type())
            .cloned();
        match hook {
            Some(hook) => hook(response),
            None => debug!(
                client_id = %self.client_id,
                request_type = %response.request_type(),
                "no response hook for request type"
            ),
        }
    }

    fn on_event(&self, event: &Event) {
        if event.resource() != self.resource {
            return;
        }
        let hook = self.event_hooks.borrow().get(event.event_type()).cloned();
        if let Some(hook) = hook {
            hook(event);
        }
    }
}
