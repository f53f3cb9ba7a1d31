//! Shared test mocks and utilities for the Docflow workflow engine.

mod backend;
mod calendar;
mod clock;
mod identity;

pub use backend::{FailingBackend, ManualFeedBackend};
pub use calendar::{FixedCalendar, SequenceCalendar};
pub use clock::FixedClock;
pub use identity::{FailingIdentityProvider, StaticIdentityProvider};
