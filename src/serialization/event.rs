use super::{DeserializationContext, SerializationContext, Serializer};
use crate::message::Event;
use crate::status::Status;

/// Serializer for [`Event`] envelopes.
///
/// Writes the event type and resource as string fields, then the content
/// entity when the event carries one.
pub struct EventSerializer;

impl Serializer for EventSerializer {
    type Message = Event;

    fn serialize(
        &self,
        context: &mut dyn SerializationContext,
        message: &Event,
    ) -> Result<(), Status> {
        write_fields(context, message)
            .map_err(|inner| Status::internal("failed to serialize the event").wrapping(inner))
    }

    fn deserialize(&self, _context: &mut dyn DeserializationContext) -> Result<Event, Status> {
        Err(Status::internal("failed to deserialize the event").wrapping(
            Status::not_implemented("events travel server to client only"),
        ))
    }
}

fn write_fields(context: &mut dyn SerializationContext, event: &Event) -> Result<(), Status> {
    context.set_string("eventType", event.event_type())?;
    context.set_string("resource", event.resource())?;
    if let Some(content) = event.content() {
        context.set_entity("content", &**content)?;
    }
    Ok(())
}
