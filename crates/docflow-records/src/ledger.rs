//! Latest known snapshot of every collection.

use docflow_core::record::{Record, Stored, find};
use serde::Serialize;
use uuid::Uuid;

use crate::appointment::Appointment;
use crate::invoice::Invoice;
use crate::quotation::Quotation;
use crate::receipt::Receipt;

/// The four collections as last delivered by their subscriptions.
///
/// A ledger is a plain value: workflow rules read it, and the sync layer
/// replaces one collection at a time as new snapshots arrive.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ledger {
    /// Appointments snapshot.
    pub appointments: Vec<Stored<Appointment>>,
    /// Quotations snapshot.
    pub quotations: Vec<Stored<Quotation>>,
    /// Invoices snapshot.
    pub invoices: Vec<Stored<Invoice>>,
    /// Receipts snapshot.
    pub receipts: Vec<Stored<Receipt>>,
}

impl Ledger {
    /// Returns the snapshot for record kind `R`.
    #[must_use]
    pub fn snapshot<R: LedgerEntry>(&self) -> &[Stored<R>] {
        R::slice(self)
    }

    /// Replaces the snapshot for record kind `R`.
    pub fn replace<R: LedgerEntry>(&mut self, snapshot: Vec<Stored<R>>) {
        *R::slot(self) = snapshot;
    }

    /// Looks up a record of kind `R` by id.
    #[must_use]
    pub fn get<R: LedgerEntry>(&self, id: Uuid) -> Option<&Stored<R>> {
        find(R::slice(self), id)
    }

    /// Mutably borrows a record of kind `R` by id.
    pub fn get_mut<R: LedgerEntry>(&mut self, id: Uuid) -> Option<&mut Stored<R>> {
        R::slot(self).iter_mut().find(|stored| stored.id == id)
    }
}

/// Record kinds that have a slot in the [`Ledger`].
pub trait LedgerEntry: Record {
    /// Borrows this kind's snapshot.
    fn slice(ledger: &Ledger) -> &[Stored<Self>];

    /// Mutably borrows this kind's snapshot.
    fn slot(ledger: &mut Ledger) -> &mut Vec<Stored<Self>>;
}

impl LedgerEntry for Appointment {
    fn slice(ledger: &Ledger) -> &[Stored<Self>] {
        &ledger.appointments
    }

    fn slot(ledger: &mut Ledger) -> &mut Vec<Stored<Self>> {
        &mut ledger.appointments
    }
}

impl LedgerEntry for Quotation {
    fn slice(ledger: &Ledger) -> &[Stored<Self>] {
        &ledger.quotations
    }

    fn slot(ledger: &mut Ledger) -> &mut Vec<Stored<Self>> {
        &mut ledger.quotations
    }
}

impl LedgerEntry for Invoice {
    fn slice(ledger: &Ledger) -> &[Stored<Self>] {
        &ledger.invoices
    }

    fn slot(ledger: &mut Ledger) -> &mut Vec<Stored<Self>> {
        &mut ledger.invoices
    }
}

impl LedgerEntry for Receipt {
    fn slice(ledger: &Ledger) -> &[Stored<Self>] {
        &ledger.receipts
    }

    fn slot(ledger: &mut Ledger) -> &mut Vec<Stored<Self>> {
        &mut ledger.receipts
    }
}
