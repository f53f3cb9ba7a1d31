//! Docflow Core — shared domain abstractions.
//!
//! This crate defines the ports and types that every workflow crate depends
//! on: actor scoping, collection names, the document backend contract, the
//! clock, calendar and identity capabilities, and the domain error. It
//! contains no infrastructure code.

pub mod actor;
pub mod availability;
pub mod backend;
pub mod clock;
pub mod collection;
pub mod command;
pub mod error;
pub mod identity;
pub mod record;
