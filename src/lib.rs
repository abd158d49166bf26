//! # busbar
//!
//! **busbar** is an in-process message bus for applications built from
//! loosely coupled modules: controllers that own a resource, and clients
//! that consume it, with neither holding a direct reference to the other.
//! All interaction goes through a single dispatch point, the
//! [`MessageQueue`].
//!
//! ## Overview
//!
//! Three message kinds flow through the bus:
//!
//! - [`Request`]: a client asks the controller owning a resource to
//!   perform an action
//! - [`Response`]: the result of a request, addressed back to the sender
//!   and correlated by an explicit [`RequestId`]
//! - [`Event`]: a broadcast notification delivered to every registered
//!   client
//!
//! Enqueueing is fire and forget. All actual work happens when the owning
//! thread calls [`MessageQueue::idle`], which drains pending requests into
//! responses, delivers the responses, and fans out the events, strictly in
//! that order and strictly FIFO within each queue.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - **[`dispatcher`]** - the [`MessageQueue`]: queues, registries and the
//!   drain loop
//! - **[`message`]** - the [`Request`], [`Response`] and [`Event`]
//!   envelopes
//! - **[`client`]** - callback participants: [`GenericClient`] and the
//!   resource scoped [`ResourceClient`]
//! - **[`controller`]** - resource owners answering requests:
//!   [`ResourceController`] and its handler shapes
//! - **[`entity`]** - the opaque [`Entity`] payload contract
//! - **[`status`]** - the [`Status`] taxonomy failures travel as
//! - **[`serialization`]** - the key/value boundary contract for encoding
//!   messages at the edge of the process
//! - **[`ids`]** - ULID backed request correlation ids
//! - **[`runtime_config`]** - environment driven tuning
//!
//! ## Example
//!
//! ```
//! use busbar::{MessageQueue, message::request_type};
//! use serde_json::json;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let queue = MessageQueue::new();
//!
//! // A controller owning the "users" resource.
//! let users = queue.create_controller("users");
//! users.add_on_request(request_type::READ, || Box::new(json!({"name": "a"})));
//!
//! // A client that records what it receives.
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let client = queue.create_client("c1");
//! let sink = seen.clone();
//! client.set_on_response(move |response| {
//!     sink.borrow_mut().push(response.request_type().to_string());
//! });
//!
//! client
//!     .send_request(request_type::READ, "users", None)
//!     .expect("enqueue");
//! queue.idle();
//!
//! assert_eq!(seen.borrow().as_slice(), ["read".to_string()]);
//! ```
//!
//! ## Concurrency Model
//!
//! Single threaded and cooperative: queues and registries are owned by the
//! bus, all callbacks run on the thread calling `idle()`, and there is no
//! internal locking. Callbacks must not re-enter `idle()`; work triggered
//! from inside a callback should be enqueued instead, to be picked up
//! later in the same pass or by the next one.

pub mod client;
pub mod controller;
pub mod dispatcher;
pub mod entity;
pub mod ids;
pub mod message;
mod registry;
pub mod runtime_config;
pub mod serialization;
pub mod status;

pub use client::{GenericClient, QueueClient, ResourceClient};
pub use controller::{QueueController, ResourceController};
pub use dispatcher::MessageQueue;
pub use entity::Entity;
pub use ids::RequestId;
pub use message::{Event, Request, Response};
pub use runtime_config::RuntimeConfig;
pub use status::{Status, StatusCode};
