//! Pure lifecycle rules. Nothing here performs I/O or mutates its inputs.

pub mod commands;
pub mod derivations;
pub mod links;
pub mod transitions;
