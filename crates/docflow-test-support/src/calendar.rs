//! Test calendars — deterministic `AvailabilityCalendar` implementations.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use docflow_core::availability::{Availability, AvailabilityCalendar};

/// A calendar that gives the same answer for every slot.
#[derive(Debug, Clone, Copy)]
pub struct FixedCalendar(pub Availability);

#[async_trait]
impl AvailabilityCalendar for FixedCalendar {
    async fn check_availability(&self, _date: NaiveDate, _time: &str) -> Availability {
        self.0
    }
}

/// A calendar that answers from a predetermined sequence and records the
/// slots it was asked about. Panics if the sequence is exhausted.
#[derive(Debug)]
pub struct SequenceCalendar {
    answers: Mutex<Vec<Availability>>,
    asked: Mutex<Vec<(NaiveDate, String)>>,
}

impl SequenceCalendar {
    /// Create a new `SequenceCalendar` with the given answers, returned in
    /// order.
    #[must_use]
    pub fn new(mut answers: Vec<Availability>) -> Self {
        answers.reverse();
        Self {
            answers: Mutex::new(answers),
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Returns every slot checked so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn asked(&self) -> Vec<(NaiveDate, String)> {
        self.asked.lock().unwrap().clone()
    }
}

#[async_trait]
impl AvailabilityCalendar for SequenceCalendar {
    async fn check_availability(&self, date: NaiveDate, time: &str) -> Availability {
        self.asked.lock().unwrap().push((date, time.to_owned()));
        self.answers
            .lock()
            .unwrap()
            .pop()
            .expect("SequenceCalendar exhausted")
    }
}
