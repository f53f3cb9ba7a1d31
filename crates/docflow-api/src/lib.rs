//! Docflow — HTTP API.
//!
//! Exposes the workflow core over JSON. The binary wires the production
//! backend, identity provider and calendar; integration tests build the
//! same router over in-memory doubles.

pub mod calendar;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
