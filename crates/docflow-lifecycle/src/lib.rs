//! Docflow — document lifecycle engine.
//!
//! Governs how a record moves through its status set and how an
//! appointment becomes a quotation draft, an accepted quotation an invoice
//! draft, and a pending invoice a receipt draft. The `domain` module holds
//! the pure rules; `application` wires them to the entity store.

pub mod application;
pub mod domain;
