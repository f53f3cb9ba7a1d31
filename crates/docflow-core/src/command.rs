//! Command abstractions.

use uuid::Uuid;

use crate::collection::CollectionName;

/// Trait that all workflow commands implement.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// The type name for this command (for logging/routing).
    fn command_type(&self) -> &'static str;

    /// Correlation ID to trace this command through the system.
    fn correlation_id(&self) -> Uuid;

    /// The collection whose record the command acts on.
    fn collection(&self) -> CollectionName;
}
