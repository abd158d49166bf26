//! Controller participants: resource owners that answer requests.
//!
//! A controller wraps resource specific handlers behind the capability pair
//! the bus consumes during resolution: [`QueueController::can_process`] is a
//! pure predicate safe to call speculatively for every pending request, and
//! [`QueueController::process`] performs the work. Failures are returned as
//! status entities, never propagated as panics, so a drain pass cannot be
//! aborted mid queue by a misbehaving handler.

use std::any::TypeId;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::dispatcher::MessageQueue;
use crate::entity::Entity;
use crate::message::{Event, Request};
use crate::status::Status;

/// Capability interface the bus resolves requests through.
pub trait QueueController {
    /// The resource this controller owns.
    fn resource(&self) -> &str;

    /// Whether this controller claims the request. Must be side effect
    /// free.
    fn can_process(&self, request: &Request) -> bool;

    /// Performs the work for a claimed request. The result is either a
    /// domain entity or an error status entity.
    fn process(&self, request: &Request) -> Box<dyn Entity>;
}

/// A request handler in one of the two recognized shapes: content-less, or
/// taking one payload whose concrete type selects the decode path.
#[derive(Clone)]
enum RequestHandler {
    NoPayload(Rc<dyn Fn() -> Box<dyn Entity>>),
    Typed {
        content: TypeId,
        run: Rc<dyn Fn(&dyn Entity) -> Box<dyn Entity>>,
    },
}

impl RequestHandler {
    fn matches(&self, request: &Request) -> bool {
        match (self, request.content()) {
            (RequestHandler::NoPayload(_), None) => true,
            (RequestHandler::Typed { content, .. }, Some(payload)) => {
                payload.as_any().type_id() == *content
            }
            _ => false,
        }
    }
}

/// A controller created through [`MessageQueue::create_controller`].
///
/// Handlers are registered per request type. Dropping the handle
/// deregisters the controller; [`MessageQueue::remove_controller`] does so
/// explicitly.
pub struct ResourceController {
    resource: String,
    queue: Weak<MessageQueue>,
    handlers: RefCell<HashMap<String, RequestHandler>>,
}

impl ResourceController {
    pub(crate) fn new(resource: String, queue: Weak<MessageQueue>) -> Rc<Self> {
        Rc::new(Self {
            resource,
            queue,
            handlers: RefCell::new(HashMap::new()),
        })
    }

    /// Registers a handler for content-less requests of the given type,
    /// replacing any previous handler for that type.
    pub fn add_on_request(
        &self,
        request_type: &str,
        handler: impl Fn() -> Box<dyn Entity> + 'static,
    ) {
        self.handlers.borrow_mut().insert(
            request_type.to_string(),
            RequestHandler::NoPayload(Rc::new(handler)),
        );
    }

    /// Registers a handler for requests of the given type carrying a `T`
    /// payload. The controller claims such a request only when its content
    /// actually is a `T`, so a payload of any other type falls through to
    /// other controllers.
    pub fn add_on_request_with<T, F>(&self, request_type: &str, handler: F)
    where
        T: Entity,
        F: Fn(&T) -> Box<dyn Entity> + 'static,
    {
        let run = Rc::new(move |payload: &dyn Entity| -> Box<dyn Entity> {
            match payload.downcast_ref::<T>() {
                Some(content) => handler(content),
                None => Box::new(Status::not_implemented("unexpected request content type")),
            }
        });
        self.handlers.borrow_mut().insert(
            request_type.to_string(),
            RequestHandler::Typed {
                content: TypeId::of::<T>(),
                run,
            },
        );
    }

    /// Pushes an event stamped with this controller's resource onto the
    /// bus, for broadcast during the next event drain.
    ///
    /// # Errors
    ///
    /// Returns an `InternalServerError` status when the bus has been
    /// dropped.
    pub fn send_event(
        &self,
        event_type: &str,
        content: Option<Rc<dyn Entity>>,
    ) -> Result<(), Status> {
        let queue = self
            .queue
            .upgrade()
            .ok_or_else(|| Status::internal("message queue is gone"))?;
        queue.add_event(Event::new(event_type, self.resource.clone(), content))
    }
}

impl QueueController for ResourceController {
    fn resource(&self) -> &str {
        &self.resource
    }

    fn can_process(&self, request: &Request) -> bool {
        if request.resource() != self.resource {
            return false;
        }
        self.handlers
            .borrow()
            .get(request.request_type())
            .is_some_and(|handler| handler.matches(request))
    }

    fn process(&self, request: &Request) -> Box<dyn Entity> {
        let handler = self.handlers.borrow().get(request.request_type()).cloned();
        match (handler, request.content()) {
            (Some(RequestHandler::NoPayload(run)), None) => run(),
            (Some(RequestHandler::Typed { run, .. }), Some(payload)) => run(payload),
            _ => Box::new(Status::not_implemented("no handler for request")),
        }
    }
}
