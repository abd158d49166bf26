//! Dispatcher core: the queues, the registries and the drain loop.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use tracing::{debug, error, info, warn};

use crate::client::{GenericClient, QueueClient, ResourceClient};
use crate::controller::{QueueController, ResourceController};
use crate::entity::Entity;
use crate::message::{Event, Request, Response};
use crate::registry::Registry;
use crate::runtime_config::RuntimeConfig;
use crate::status::Status;

/// The dispatch engine.
///
/// Owns the request, response and event queues plus the registries of live
/// clients and controllers, and performs all work inside [`idle`].
/// Everything else only mutates queues or registries.
///
/// Participants are handed out as [`Rc`] handles and tracked with weak
/// references, so dropping a handle deregisters it and the engine can
/// never dispatch into a destroyed participant.
///
/// # Example
///
/// ```
/// use busbar::{MessageQueue, message::request_type};
/// use serde_json::json;
///
/// let queue = MessageQueue::new();
///
/// let users = queue.create_controller("users");
/// users.add_on_request(request_type::READ, || Box::new(json!({"name": "a"})));
///
/// let client = queue.create_client("c1");
/// client.set_on_response(|response| {
///     println!("got a response for {}", response.resource());
/// });
///
/// client
///     .send_request(request_type::READ, "users", None)
///     .expect("enqueue");
/// queue.idle();
/// ```
///
/// [`idle`]: MessageQueue::idle
pub struct MessageQueue {
    config: RuntimeConfig,
    requests: RefCell<VecDeque<Request>>,
    responses: RefCell<VecDeque<Response>>,
    events: RefCell<VecDeque<Event>>,
    clients: Registry<dyn QueueClient>,
    controllers: Registry<dyn QueueController>,
}

impl MessageQueue {
    /// Creates a bus configured from the environment.
    pub fn new() -> Rc<Self> {
        Self::with_config(RuntimeConfig::from_env())
    }

    /// Creates a bus with an explicit runtime configuration.
    pub fn with_config(config: RuntimeConfig) -> Rc<Self> {
        Rc::new(Self {
            config,
            requests: RefCell::new(VecDeque::new()),
            responses: RefCell::new(VecDeque::new()),
            events: RefCell::new(VecDeque::new()),
            clients: Registry::new(),
            controllers: Registry::new(),
        })
    }

    /// Enqueues a request at the tail of the request queue.
    ///
    /// Fire and forget: resolution failures are communicated through the
    /// response channel, never to this caller.
    ///
    /// # Errors
    ///
    /// Never fails in the current design; the `Result` is the contract for
    /// callers composing with `?`.
    pub fn add_request(&self, request: Request) -> Result<(), Status> {
        let depth = {
            let mut requests = self.requests.borrow_mut();
            requests.push_back(request);
            requests.len()
        };
        self.warn_depth("request", depth);
        Ok(())
    }

    /// Enqueues an event at the tail of the event queue.
    ///
    /// # Errors
    ///
    /// Never fails in the current design; the `Result` is the contract for
    /// callers composing with `?`.
    pub fn add_event(&self, event: Event) -> Result<(), Status> {
        let depth = {
            let mut events = self.events.borrow_mut();
            events.push_back(event);
            events.len()
        };
        self.warn_depth("event", depth);
        Ok(())
    }

    /// Registers a generic client under the given id and returns its
    /// handle. Dropping the handle deregisters it.
    pub fn create_client(self: &Rc<Self>, client_id: impl Into<String>) -> Rc<GenericClient> {
        let client_id = client_id.into();
        self.warn_duplicate_id(&client_id);
        let client = GenericClient::new(client_id, Rc::downgrade(self));
        let entry: Rc<dyn QueueClient> = client.clone();
        self.clients.add(&entry);
        info!(client_id = %client.client_id(), "client registered");
        client
    }

    /// Registers a client scoped to one resource. The scoping is client
    /// side: events are still broadcast to every registered client.
    pub fn create_resource_client(
        self: &Rc<Self>,
        client_id: impl Into<String>,
        resource: impl Into<String>,
    ) -> Rc<ResourceClient> {
        let client_id = client_id.into();
        self.warn_duplicate_id(&client_id);
        let client = ResourceClient::new(client_id, resource.into(), Rc::downgrade(self));
        let entry: Rc<dyn QueueClient> = client.clone();
        self.clients.add(&entry);
        info!(
            client_id = %client.client_id(),
            resource = %client.resource(),
            "resource client registered"
        );
        client
    }

    /// Registers a controller for the given resource and returns its
    /// handle. Controllers are offered requests in registration order.
    pub fn create_controller(self: &Rc<Self>, resource: impl Into<String>) -> Rc<ResourceController> {
        let controller = ResourceController::new(resource.into(), Rc::downgrade(self));
        let entry: Rc<dyn QueueController> = controller.clone();
        self.controllers.add(&entry);
        info!(resource = %controller.resource(), "controller registered");
        controller
    }

    /// Deregisters a client. A no-op when the client is not registered.
    pub fn remove_client<C: QueueClient + 'static>(&self, client: &Rc<C>) {
        self.clients.remove(Rc::as_ptr(client) as *const ());
    }

    /// Deregisters a controller. A no-op when the controller is not
    /// registered.
    pub fn remove_controller<C: QueueController + 'static>(&self, controller: &Rc<C>) {
        self.controllers.remove(Rc::as_ptr(controller) as *const ());
    }

    /// Drains the queues: every pending request is resolved into a
    /// response, then every pending response is delivered, then every
    /// pending event is broadcast.
    ///
    /// Queue emptiness is re-checked after each pop, so messages enqueued
    /// by a handler land in the same pass when their queue has not been
    /// fully drained yet, and in the next pass otherwise. Safe to call
    /// with everything empty.
    pub fn idle(&self) {
        while let Some(request) = self.pop_request() {
            self.process_request(request);
        }
        while let Some(response) = self.pop_response() {
            self.process_response(response);
        }
        while let Some(event) = self.pop_event() {
            self.process_event(event);
        }
    }

    fn pop_request(&self) -> Option<Request> {
        self.requests.borrow_mut().pop_front()
    }

    fn pop_response(&self) -> Option<Response> {
        self.responses.borrow_mut().pop_front()
    }

    fn pop_event(&self) -> Option<Event> {
        self.events.borrow_mut().pop_front()
    }

    /// Resolves the request to the first claiming controller, wraps the
    /// result into a response and enqueues it.
    fn process_request(&self, request: Request) {
        debug!(
            request_id = %request.id(),
            sender = %request.sender(),
            request_type = %request.request_type(),
            resource = %request.resource(),
            "processing request"
        );
        let content: Box<dyn Entity> = match self.resolve(&request) {
            Some(controller) => controller.process(&request),
            None => {
                error!(
                    request_type = %request.request_type(),
                    resource = %request.resource(),
                    "no controller claims the request"
                );
                Box::new(Status::not_found("no controller claims the request"))
            }
        };
        self.responses
            .borrow_mut()
            .push_back(Response::for_request(&request, content));
    }

    /// Delivers the response to the client matching its receiver, or logs
    /// and drops it.
    fn process_response(&self, response: Response) {
        debug!(
            request_id = %response.id(),
            receiver = %response.receiver(),
            "processing response"
        );
        match self.find_client(response.receiver()) {
            Some(client) => client.on_response(&response),
            None => error!(
                receiver = %response.receiver(),
                "no client registered for response receiver"
            ),
        }
    }

    /// Broadcasts the event to every client live at this moment.
    fn process_event(&self, event: Event) {
        debug!(event_type = %event.event_type(), resource = %event.resource(), "broadcasting event");
        for client in self.clients.snapshot() {
            client.on_event(&event);
        }
    }

    /// First registered controller claiming the request, if any.
    fn resolve(&self, request: &Request) -> Option<Rc<dyn QueueController>> {
        self.controllers
            .snapshot()
            .into_iter()
            .find(|controller| controller.can_process(request))
    }

    fn find_client(&self, client_id: &str) -> Option<Rc<dyn QueueClient>> {
        self.clients
            .snapshot()
            .into_iter()
            .find(|client| client.client_id() == client_id)
    }

    fn warn_duplicate_id(&self, client_id: &str) {
        if self.find_client(client_id).is_some() {
            warn!(
                client_id = %client_id,
                "client id already registered, responses go to the earlier registration"
            );
        }
    }

    fn warn_depth(&self, queue: &str, depth: usize) {
        if depth > self.config.queue_warn_depth {
            warn!(
                queue = queue,
                depth = depth,
                threshold = self.config.queue_warn_depth,
                "queue depth above threshold, is anyone calling idle()?"
            );
        }
    }
}
