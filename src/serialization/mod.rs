//! # Serialization Module
//!
//! Boundary contract between the bus and whatever encodes messages for the
//! outside world. The bus itself needs none of this to dispatch; an
//! embedding application implements [`SerializationContext`] over its wire
//! format and feeds messages through the serializers.
//!
//! A serializer writes a message as named string fields plus one entity
//! field ("content") into a generic key/value context, short-circuiting on
//! the first failed field and reporting it as an `InternalServerError`
//! status wrapping the inner cause. Directions that make no sense are
//! reported, not silent: responses and events travel server to client
//! only, so deserializing one yields an `InternalServerError` wrapping
//! `NotImplemented`.

mod context;
mod event;
mod response;

pub use context::{DeserializationContext, SerializationContext};
pub use event::EventSerializer;
pub use response::ResponseSerializer;

use crate::status::Status;

/// Encodes messages of one envelope type into serialization contexts and,
/// where supported, decodes them back.
pub trait Serializer {
    /// The envelope type this serializer understands.
    type Message;

    /// Writes the message into the context.
    ///
    /// # Errors
    ///
    /// An `InternalServerError` status wrapping the first field failure.
    fn serialize(
        &self,
        context: &mut dyn SerializationContext,
        message: &Self::Message,
    ) -> Result<(), Status>;

    /// Reconstructs a message from the context.
    ///
    /// # Errors
    ///
    /// An `InternalServerError` status wrapping `NotImplemented` when the
    /// envelope type cannot be deserialized.
    fn deserialize(&self, context: &mut dyn DeserializationContext)
        -> Result<Self::Message, Status>;
}
