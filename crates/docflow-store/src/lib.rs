//! Docflow — realtime entity store.
//!
//! [`EntityStore`] is the typed, actor-scoped entry point used by the
//! workflow. It sits on top of a [`DocumentBackend`] implementation:
//! [`memory::InMemoryBackend`] for single-process use and tests, or
//! [`pg::PgBackend`] for PostgreSQL with `LISTEN`/`NOTIFY` change feeds.
//!
//! [`DocumentBackend`]: docflow_core::backend::DocumentBackend

pub mod codec;
pub mod entity_store;
pub mod memory;
pub mod pg;
pub mod subscription;

pub use entity_store::EntityStore;
pub use subscription::Subscription;
