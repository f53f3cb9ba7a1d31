//! Application services: command handlers that apply lifecycle rules and
//! write through the entity store, and read-only queries over a ledger.

pub mod command_handlers;
pub mod query_handlers;
