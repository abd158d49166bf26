use super::{DeserializationContext, SerializationContext, Serializer};
use crate::message::Response;
use crate::status::Status;

/// Serializer for [`Response`] envelopes.
///
/// Writes the correlation id, request type and resource as string fields,
/// then the content entity. The receiver is transport addressing, not
/// payload, and is not written.
pub struct ResponseSerializer;

impl Serializer for ResponseSerializer {
    type Message = Response;

    fn serialize(
        &self,
        context: &mut dyn SerializationContext,
        message: &Response,
    ) -> Result<(), Status> {
        write_fields(context, message)
            .map_err(|inner| Status::internal("failed to serialize the response").wrapping(inner))
    }

    fn deserialize(
        &self,
        _context: &mut dyn DeserializationContext,
    ) -> Result<Response, Status> {
        Err(
            Status::internal("failed to deserialize the response").wrapping(
                Status::not_implemented("responses travel server to client only"),
            ),
        )
    }
}

fn write_fields(
    context: &mut dyn SerializationContext,
    response: &Response,
) -> Result<(), Status> {
    context.set_string("id", &response.id().to_string())?;
    context.set_string("requestType", response.request_type())?;
    context.set_string("resource", response.resource())?;
    context.set_entity("content", response.content())?;
    Ok(())
}
