//! Opaque payload types carried by requests, responses and events.
//!
//! The bus never inspects content, it only forwards it. Payload types are
//! defined by the application and implement [`Entity`], which exposes just
//! enough for dispatch to work: a short string tag for logs and serialized
//! forms, and an [`Any`] view so typed request handlers can pick the decode
//! path that matches the payload's concrete type.

use std::any::Any;
use std::fmt;

/// An opaque payload with a discoverable type identifier.
///
/// # Example
///
/// ```
/// use std::any::Any;
/// use busbar::Entity;
///
/// #[derive(Debug)]
/// struct Pet {
///     name: String,
/// }
///
/// impl Entity for Pet {
///     fn entity_type(&self) -> &'static str {
///         "pet"
///     }
///
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
/// ```
pub trait Entity: Any + fmt::Debug {
    /// Short type tag used in logs and by serialization contexts.
    fn entity_type(&self) -> &'static str;

    /// View of the payload for downcasting to its concrete type.
    fn as_any(&self) -> &dyn Any;
}

impl dyn Entity {
    /// Returns a reference to the concrete payload type, if it matches.
    pub fn downcast_ref<T: Entity>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Returns `true` if the payload is of type `T`.
    pub fn is<T: Entity>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

/// JSON documents are first-class payloads, so callers without bespoke
/// payload types can send `serde_json::json!` values directly.
impl Entity for serde_json::Value {
    fn entity_type(&self) -> &'static str {
        "json"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
