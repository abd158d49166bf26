//! # Dispatcher Module
//!
//! The dispatcher module provides the message queue at the center of the
//! bus: three FIFO queues (requests, responses, events), the registries of
//! live participants, and the drain loop that moves messages between them.
//!
//! ## Overview
//!
//! The [`MessageQueue`] is the single dispatch point decoupled modules talk
//! through. It:
//! - Accepts requests and events from any participant, fire and forget
//! - Resolves each request to the first registered controller claiming it
//! - Pairs every request with exactly one response, addressed back to the
//!   sender
//! - Fans each event out to every client registered at delivery time
//!
//! ## Message Flow
//!
//! 1. A client enqueues a request with `add_request` (or its
//!    `send_request` convenience)
//! 2. A later `idle()` call drains the request queue: each request is
//!    offered to the controllers in registration order, the first claimant
//!    processes it, and the result is wrapped into a response
//! 3. The same `idle()` call drains the response queue, delivering each
//!    response to the client whose id matches its receiver
//! 4. Finally the event queue is drained, broadcasting each event to every
//!    registered client
//!
//! Responses produced while draining requests are delivered within the
//! same pass, because responses are processed after requests. Work pushed
//! into a queue that was already drained waits for the next pass.
//!
//! ## Error Handling
//!
//! Enqueue operations always succeed; failures travel as status entities
//! inside the eventual response:
//! - A request no controller claims comes back as a `NotFound` status
//! - A response whose receiver is gone is logged and dropped
//!
//! ## Concurrency
//!
//! Single threaded and cooperative. All callbacks run on the thread
//! calling `idle()`, and callbacks must not re-enter `idle()`.

mod core;

pub use core::MessageQueue;
