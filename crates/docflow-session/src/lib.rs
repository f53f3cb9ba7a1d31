//! Docflow — session context.
//!
//! [`SessionCoordinator`] owns the actor identity. [`Workspace`] is the
//! context constructed once at start and passed to every consumer: it
//! wires the entity store to the coordinator's scope, keeps a live
//! [`Ledger`](docflow_records::Ledger) in sync with the store, runs the
//! lifecycle commands and turns their outcomes into notices.

pub mod coordinator;
pub mod notices;
pub mod workspace;

pub use coordinator::{SessionCoordinator, SessionState};
pub use notices::{Notice, NoticeBoard, NoticeKind};
pub use workspace::{Workspace, WorkspaceConfig};
