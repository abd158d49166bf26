use crate::entity::Entity;
use crate::status::Status;

/// Generic key/value sink a message is serialized into.
///
/// Implementations own the concrete encoding (JSON, a key/value store,
/// whatever the transport needs); the serializers only name fields.
pub trait SerializationContext {
    /// Sets a named string field.
    ///
    /// # Errors
    ///
    /// Any non-ok status; the serializer stops at the first failure.
    fn set_string(&mut self, key: &str, value: &str) -> Result<(), Status>;

    /// Sets a named entity field. The context decides how the entity's
    /// concrete type is encoded, typically keyed off
    /// [`Entity::entity_type`].
    ///
    /// # Errors
    ///
    /// Any non-ok status; the serializer stops at the first failure.
    fn set_entity(&mut self, key: &str, entity: &dyn Entity) -> Result<(), Status>;
}

/// Generic key/value source a message is deserialized from.
pub trait DeserializationContext {
    /// Reads a named string field.
    ///
    /// # Errors
    ///
    /// `NotFound` when the field is absent, or any context specific
    /// failure.
    fn get_string(&mut self, key: &str) -> Result<String, Status>;
}
