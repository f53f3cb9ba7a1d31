//! The injected session context.
//!
//! A [`Workspace`] is built once at process start and shared by reference.
//! Signing in tears down the previous actor's subscriptions and ledger,
//! establishes the new identity, then opens one subscription per
//! collection. Each subscription runs on its own task and replaces its
//! slice of the ledger whenever a snapshot arrives; a sync failure keeps
//! the last snapshot and posts an error notice.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::TimeDelta;
use docflow_core::actor::ActorId;
use docflow_core::availability::{Availability, AvailabilityCalendar};
use docflow_core::backend::{DocumentBackend, Fields};
use docflow_core::clock::Clock;
use docflow_core::collection::CollectionName;
use docflow_core::error::DomainError;
use docflow_core::identity::{Credential, IdentityProvider};
use docflow_core::record::{Record, Stored};
use docflow_export::{CsvExport, export_collection};
use docflow_lifecycle::application::command_handlers::{
    handle_change_status, handle_check_availability, handle_create, handle_delete,
    handle_draft_invoice, handle_draft_quotation, handle_record_payment,
    handle_save_appointment_form, handle_update_fields,
};
use docflow_lifecycle::application::query_handlers::{get_record, resolve_source};
use docflow_lifecycle::domain::commands::{
    ChangeStatus, CheckAvailability, CreateRecord, DeleteRecord, DraftInvoice, DraftQuotation,
    RecordPayment, SaveAppointmentForm, UpdateFields,
};
use docflow_lifecycle::domain::derivations::PaymentIntent;
use docflow_lifecycle::domain::transitions::{Lifecycle, NO_STATUS, check_transition_by_name};
use docflow_records::{
    Appointment, AppointmentForm, Invoice, InvoiceStatus, Ledger, LedgerEntry, Quotation, Receipt,
};
use docflow_reminders::{Reminder, derive_reminders};
use docflow_store::{EntityStore, Subscription};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::coordinator::{SessionCoordinator, SessionState};
use crate::notices::{Notice, NoticeBoard};

/// Shown whenever an operation is attempted without an actor.
pub const NOT_READY_NOTICE: &str = "Authentication not ready. Please wait.";

const SLOT_AVAILABLE_NOTICE: &str =
    "Time slot is available and tentatively booked! (A real integration would send the invite now)";
const SLOT_BUSY_NOTICE: &str =
    "This time slot is busy on your calendar. Please select an alternative time.";

/// Runs `$body` with `$kind` bound to the record type of `$collection`.
macro_rules! by_collection {
    ($collection:expr, $kind:ident => $body:expr) => {
        match $collection {
            CollectionName::Appointments => {
                type $kind = Appointment;
                $body
            }
            CollectionName::Quotations => {
                type $kind = Quotation;
                $body
            }
            CollectionName::Invoices => {
                type $kind = Invoice;
                $body
            }
            CollectionName::Receipts => {
                type $kind = Receipt;
                $body
            }
        }
    };
}

/// Settings for a [`Workspace`].
#[derive(Debug, Clone)]
pub struct WorkspaceConfig {
    /// Application partition identifier.
    pub app_id: String,
    /// Lifetime of notices.
    pub notice_ttl: TimeDelta,
}

#[derive(Debug, Default)]
struct LiveLedger {
    actor: Option<ActorId>,
    ledger: Ledger,
}

/// Session context shared by every consumer of the workflow.
pub struct Workspace {
    coordinator: SessionCoordinator,
    store: EntityStore,
    clock: Arc<dyn Clock>,
    calendar: Arc<dyn AvailabilityCalendar>,
    live: Arc<RwLock<LiveLedger>>,
    notices: Arc<NoticeBoard>,
    sync_tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl fmt::Debug for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workspace")
            .field("coordinator", &self.coordinator)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl Workspace {
    /// Wires a workspace over `backend`. No actor is established yet.
    #[must_use]
    pub fn new(
        backend: Arc<dyn DocumentBackend>,
        identity: Arc<dyn IdentityProvider>,
        clock: Arc<dyn Clock>,
        calendar: Arc<dyn AvailabilityCalendar>,
        config: WorkspaceConfig,
    ) -> Self {
        let coordinator = SessionCoordinator::new(identity);
        let store = EntityStore::new(backend, config.app_id, coordinator.scope());
        Self {
            coordinator,
            store,
            clock,
            calendar,
            live: Arc::new(RwLock::new(LiveLedger::default())),
            notices: Arc::new(NoticeBoard::new(config.notice_ttl)),
            sync_tasks: Mutex::new(Vec::new()),
        }
    }

    fn tasks(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.sync_tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn require_actor(&self) -> Result<ActorId, DomainError> {
        self.coordinator.actor().ok_or(DomainError::NotReady)
    }

    fn notify<T>(
        &self,
        result: Result<T, DomainError>,
        success: impl FnOnce(&T) -> String,
        failure: &str,
    ) -> Result<T, DomainError> {
        let now = self.clock.now();
        match &result {
            Ok(value) => self.notices.success(success(value), now),
            Err(DomainError::NotReady) => self.notices.error(NOT_READY_NOTICE, now),
            Err(DomainError::Validation(message)) => self.notices.error(message.clone(), now),
            Err(_) => self.notices.error(failure, now),
        }
        result
    }

    // ---- session ----

    /// Returns the session lifecycle state.
    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.coordinator.state()
    }

    /// Signs in, replacing any current actor, and starts syncing the four
    /// collections. Returns once every collection has delivered its first
    /// snapshot (or failed to).
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotReady` if another sign-in is in flight, or
    /// `DomainError::SignInFailed`.
    pub async fn sign_in(&self, credential: &Credential) -> Result<ActorId, DomainError> {
        self.teardown().await;
        let actor = match self.coordinator.establish(credential).await {
            Ok(actor) => actor,
            Err(e) => {
                self.notices
                    .error(format!("Sign-in failed: {e}"), self.clock.now());
                return Err(e);
            }
        };

        self.live.write().await.actor = Some(actor);
        self.start_sync::<Appointment>(actor).await;
        self.start_sync::<Quotation>(actor).await;
        self.start_sync::<Invoice>(actor).await;
        self.start_sync::<Receipt>(actor).await;
        info!(%actor, "workspace ready");
        Ok(actor)
    }

    /// Signs out and drops the actor's ledger.
    pub async fn sign_out(&self) {
        self.coordinator.sign_out();
        self.teardown().await;
    }

    async fn teardown(&self) {
        let tasks = std::mem::take(&mut *self.tasks());
        for task in &tasks {
            task.abort();
        }
        *self.live.write().await = LiveLedger::default();
        if !tasks.is_empty() {
            debug!(tasks = tasks.len(), "sync tasks stopped");
        }
    }

    async fn start_sync<R: LedgerEntry>(&self, actor: ActorId) {
        let mut subscription = match self.store.subscribe::<R>().await {
            Ok(subscription) => subscription,
            Err(e) => {
                report_sync_failure::<R>(&self.notices, self.clock.as_ref(), &e);
                return;
            }
        };
        if let Some(first) = subscription.next().await {
            apply(&self.live, &self.notices, self.clock.as_ref(), actor, first).await;
        }
        let task = tokio::spawn(run_sync(
            subscription,
            Arc::clone(&self.live),
            Arc::clone(&self.notices),
            Arc::clone(&self.clock),
        ));
        self.tasks().push(task);
    }

    // ---- reads ----

    /// Returns a copy of the ledger as last synced.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotReady` without an actor.
    pub async fn ledger(&self) -> Result<Ledger, DomainError> {
        self.require_actor()?;
        Ok(self.live.read().await.ledger.clone())
    }

    /// Returns the last synced snapshot of `collection` as JSON.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotReady` without an actor.
    pub async fn list(&self, collection: CollectionName) -> Result<Value, DomainError> {
        self.require_actor()?;
        let live = self.live.read().await;
        by_collection!(collection, R => to_json(live.ledger.snapshot::<R>()))
    }

    /// Returns one record of `collection` as JSON.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotReady` without an actor or
    /// `DomainError::RecordNotFound`.
    pub async fn get(&self, collection: CollectionName, id: Uuid) -> Result<Value, DomainError> {
        self.require_actor()?;
        let live = self.live.read().await;
        by_collection!(collection, R => to_json(&get_record::<R>(&live.ledger, id)?))
    }

    /// Follows the back-reference of record `id` in `collection`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotReady` without an actor,
    /// `DomainError::RecordNotFound` if the record itself is missing, or
    /// `DomainError::Validation` for appointments, which have no source.
    pub async fn resolve_source(
        &self,
        collection: CollectionName,
        id: Uuid,
    ) -> Result<Value, DomainError> {
        self.require_actor()?;
        let live = self.live.read().await;
        let ledger = &live.ledger;
        match collection {
            CollectionName::Appointments => Err(DomainError::Validation(
                "appointments have no source record".to_owned(),
            )),
            CollectionName::Quotations => to_json(&resolve_source::<Quotation>(ledger, id)?),
            CollectionName::Invoices => to_json(&resolve_source::<Invoice>(ledger, id)?),
            CollectionName::Receipts => to_json(&resolve_source::<Receipt>(ledger, id)?),
        }
    }

    /// Computes the due reminders for today.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotReady` without an actor.
    pub async fn reminders(&self) -> Result<Vec<Reminder>, DomainError> {
        self.require_actor()?;
        let live = self.live.read().await;
        let ledger = &live.ledger;
        Ok(derive_reminders(
            ledger.snapshot::<Appointment>(),
            ledger.snapshot::<Invoice>(),
            self.clock.today(),
        ))
    }

    /// Exports the last synced snapshot of `collection` as CSV.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotReady` without an actor.
    pub async fn export(&self, collection: CollectionName) -> Result<CsvExport, DomainError> {
        let result = match self.require_actor() {
            Ok(_) => {
                let live = self.live.read().await;
                by_collection!(collection, R => export_collection(live.ledger.snapshot::<R>()))
            }
            Err(e) => Err(e),
        };
        self.notify(
            result,
            |_| format!("Generated CSV data for {collection}. Ready to copy."),
            "Failed to export data.",
        )
    }

    /// Returns the notices that have not expired yet.
    #[must_use]
    pub fn active_notices(&self) -> Vec<Notice> {
        self.notices.active(self.clock.now())
    }

    // ---- writes ----

    /// Persists a new record of kind `R`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotReady` without an actor,
    /// `DomainError::Validation` for a malformed record, or a sync failure.
    pub async fn create_record<R: LedgerEntry + fmt::Debug>(
        &self,
        record: R,
    ) -> Result<Uuid, DomainError> {
        let command = CreateRecord {
            correlation_id: Uuid::new_v4(),
            record,
        };
        let result = handle_create(&command, &self.store).await;
        self.notify(
            result,
            |_| format!("{} added successfully!", R::COLLECTION.singular()),
            &format!("Failed to save {}.", R::COLLECTION.singular()),
        )
    }

    /// Persists an edited appointment form.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for an unconfirmed online meeting,
    /// plus the errors of [`Workspace::create_record`].
    pub async fn save_appointment_form(&self, form: AppointmentForm) -> Result<Uuid, DomainError> {
        let command = SaveAppointmentForm {
            correlation_id: Uuid::new_v4(),
            form,
        };
        let result = handle_save_appointment_form(&command, &self.store).await;
        self.notify(
            result,
            |_| "appointment added successfully!".to_owned(),
            "Failed to save appointment.",
        )
    }

    /// Creates a record from its JSON form. Appointments are read as an
    /// [`AppointmentForm`], so an online meeting needs a confirmed slot.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `body` is not a valid record,
    /// plus the errors of [`Workspace::create_record`].
    pub async fn create(
        &self,
        collection: CollectionName,
        body: Value,
    ) -> Result<Uuid, DomainError> {
        match collection {
            CollectionName::Appointments => {
                let form = self.decode_body::<AppointmentForm>(collection, body)?;
                self.save_appointment_form(form).await
            }
            CollectionName::Quotations => {
                let record = self.decode_body::<Quotation>(collection, body)?;
                self.create_record(record).await
            }
            CollectionName::Invoices => {
                let record = self.decode_body::<Invoice>(collection, body)?;
                self.create_record(record).await
            }
            CollectionName::Receipts => {
                let record = self.decode_body::<Receipt>(collection, body)?;
                self.create_record(record).await
            }
        }
    }

    fn decode_body<T: DeserializeOwned>(
        &self,
        collection: CollectionName,
        body: Value,
    ) -> Result<T, DomainError> {
        let result = serde_json::from_value(body).map_err(|e| {
            DomainError::Validation(format!("malformed {}: {e}", collection.singular()))
        });
        if result.is_err() {
            self.notices.error(
                format!("Failed to save {}.", collection.singular()),
                self.clock.now(),
            );
        }
        result
    }

    /// Changes non-status, non-link fields of record `id`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotReady` without an actor,
    /// `DomainError::Validation` for a protected field or an invalid merged
    /// record, `DomainError::RecordNotFound`, or a sync failure.
    pub async fn update_fields(
        &self,
        collection: CollectionName,
        id: Uuid,
        patch: Fields,
    ) -> Result<(), DomainError> {
        let command = UpdateFields {
            correlation_id: Uuid::new_v4(),
            collection,
            id,
            patch,
        };
        let result = match self.require_actor() {
            Ok(_) => {
                let _writing = self.live.write().await;
                by_collection!(collection, R => {
                    handle_update_fields::<R>(&command, &self.store).await
                })
            }
            Err(e) => Err(e),
        };
        self.notify(
            result,
            |_| format!("{} updated successfully!", collection.singular()),
            &format!("Failed to save {}.", collection.singular()),
        )
    }

    /// Deletes record `id`. Records linking to it keep their
    /// back-reference.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotReady` without an actor, or a sync failure.
    pub async fn delete(&self, collection: CollectionName, id: Uuid) -> Result<(), DomainError> {
        let command = DeleteRecord {
            correlation_id: Uuid::new_v4(),
            collection,
            id,
        };
        let result = by_collection!(collection, R => {
            handle_delete::<R>(&command, &self.store).await
        });
        self.notify(
            result,
            |_| format!("{} deleted successfully!", collection.singular()),
            &format!("Failed to delete {}.", collection.singular()),
        )
    }

    /// Moves record `id` to `status`. Returns the new status.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotReady` without an actor,
    /// `DomainError::InvalidTransition` if the state machine forbids it
    /// (receipts have none), `DomainError::RecordNotFound`, or a sync
    /// failure.
    pub async fn change_status(
        &self,
        collection: CollectionName,
        id: Uuid,
        status: String,
    ) -> Result<String, DomainError> {
        let command = ChangeStatus {
            correlation_id: Uuid::new_v4(),
            collection,
            id,
            status,
        };
        let result = match self.require_actor() {
            Ok(_) => {
                let mut live = self.live.write().await;
                let ledger = &mut live.ledger;
                match collection {
                    CollectionName::Appointments => {
                        self.transition::<Appointment>(&command, ledger).await
                    }
                    CollectionName::Quotations => {
                        self.transition::<Quotation>(&command, ledger).await
                    }
                    CollectionName::Invoices => self.transition::<Invoice>(&command, ledger).await,
                    CollectionName::Receipts => {
                        check_transition_by_name(collection, NO_STATUS, &command.status)
                            .map(|()| command.status.clone())
                    }
                }
            }
            Err(e) => Err(e),
        };
        self.notify(
            result,
            |status| {
                format!(
                    "Status of {} {}... updated to {status}.",
                    collection.singular(),
                    short_id(id)
                )
            },
            "Failed to update status.",
        )
    }

    // Callers hold the live ledger's write lock, so the check against the
    // committed record and the write happen with no other write between.
    async fn transition<R: Lifecycle>(
        &self,
        command: &ChangeStatus,
        ledger: &mut Ledger,
    ) -> Result<String, DomainError> {
        let status = handle_change_status::<R>(command, &self.store).await?;
        if let Some(stored) = ledger.get_mut::<R>(command.id) {
            stored.record.set_status(status);
        }
        Ok(status.to_string())
    }

    /// Drafts a quotation from scheduled appointment `appointment_id`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotReady` without an actor,
    /// `DomainError::RecordNotFound`, or `DomainError::InvalidTransition`.
    pub async fn draft_quotation(&self, appointment_id: Uuid) -> Result<Quotation, DomainError> {
        let command = DraftQuotation {
            correlation_id: Uuid::new_v4(),
            appointment_id,
        };
        let result = match self.require_actor() {
            Ok(_) => handle_draft_quotation(
                &command,
                &self.live.read().await.ledger,
                self.clock.as_ref(),
            ),
            Err(e) => Err(e),
        };
        self.notify(
            result,
            |draft| {
                format!(
                    "Drafting Quotation for {} based on Appointment {}...",
                    draft.client_name,
                    short_id(appointment_id)
                )
            },
            "Failed to draft quotation.",
        )
    }

    /// Drafts an invoice from accepted quotation `quotation_id`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotReady` without an actor,
    /// `DomainError::RecordNotFound`, or `DomainError::InvalidTransition`.
    pub async fn draft_invoice(&self, quotation_id: Uuid) -> Result<Invoice, DomainError> {
        let command = DraftInvoice {
            correlation_id: Uuid::new_v4(),
            quotation_id,
        };
        let result = match self.require_actor() {
            Ok(_) => handle_draft_invoice(
                &command,
                &self.live.read().await.ledger,
                self.clock.as_ref(),
            ),
            Err(e) => Err(e),
        };
        self.notify(
            result,
            |draft| {
                format!(
                    "Drafting Invoice for {} based on Quote {}...",
                    draft.client_name,
                    short_id(quotation_id)
                )
            },
            "Failed to draft invoice.",
        )
    }

    /// Marks pending invoice `invoice_id` paid and returns the receipt
    /// draft.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotReady` without an actor,
    /// `DomainError::RecordNotFound`, `DomainError::InvalidTransition`, or a
    /// sync failure.
    pub async fn record_payment(&self, invoice_id: Uuid) -> Result<PaymentIntent, DomainError> {
        let command = RecordPayment {
            correlation_id: Uuid::new_v4(),
            invoice_id,
        };
        let result = match self.require_actor() {
            Ok(_) => {
                let mut live = self.live.write().await;
                let paid =
                    handle_record_payment(&command, &live.ledger, self.clock.as_ref(), &self.store)
                        .await;
                if let (Ok(_), Some(stored)) = (&paid, live.ledger.get_mut::<Invoice>(invoice_id))
                {
                    stored.record.status = InvoiceStatus::Paid;
                }
                paid
            }
            Err(e) => Err(e),
        };
        self.notify(
            result,
            |_| format!("Recording payment for Invoice {}...", short_id(invoice_id)),
            "Failed to record payment.",
        )
    }

    /// Checks the calendar for the form's slot and returns the form with
    /// its confirmation updated.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the meeting is not online or has
    /// no time.
    pub async fn check_availability(
        &self,
        form: AppointmentForm,
    ) -> Result<AppointmentForm, DomainError> {
        let command = CheckAvailability {
            correlation_id: Uuid::new_v4(),
            form,
        };
        let result = handle_check_availability(&command, self.calendar.as_ref()).await;
        let now = self.clock.now();
        match &result {
            Ok(form) if form.is_confirmed() => self.notices.success(SLOT_AVAILABLE_NOTICE, now),
            Ok(_) => self.notices.error(SLOT_BUSY_NOTICE, now),
            Err(e) => {
                let message = match e {
                    DomainError::Validation(message) => message.clone(),
                    other => other.to_string(),
                };
                self.notices.error(message, now);
            }
        }
        result
    }

    /// The availability reported for a confirmed or unconfirmed form.
    #[must_use]
    pub fn availability_of(form: &AppointmentForm) -> Availability {
        if form.is_confirmed() {
            Availability::Available
        } else {
            Availability::Busy
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        for task in self.tasks().drain(..) {
            task.abort();
        }
    }
}

async fn run_sync<R: LedgerEntry>(
    mut subscription: Subscription<R>,
    live: Arc<RwLock<LiveLedger>>,
    notices: Arc<NoticeBoard>,
    clock: Arc<dyn Clock>,
) {
    let actor = subscription.actor();
    while let Some(item) = subscription.next().await {
        apply(&live, &notices, clock.as_ref(), actor, item).await;
    }
    debug!(collection = %R::COLLECTION, %actor, "sync ended");
}

async fn apply<R: LedgerEntry>(
    live: &RwLock<LiveLedger>,
    notices: &NoticeBoard,
    clock: &dyn Clock,
    actor: ActorId,
    item: Result<Vec<Stored<R>>, DomainError>,
) {
    match item {
        Ok(snapshot) => {
            let mut live = live.write().await;
            if live.actor == Some(actor) {
                debug!(collection = %R::COLLECTION, records = snapshot.len(), "snapshot applied");
                live.ledger.replace(snapshot);
            }
        }
        Err(e) => report_sync_failure::<R>(notices, clock, &e),
    }
}

fn report_sync_failure<R: Record>(notices: &NoticeBoard, clock: &dyn Clock, error: &DomainError) {
    warn!(collection = %R::COLLECTION, %error, "sync failure, keeping last snapshot");
    notices.error(format!("Failed to load {}.", R::COLLECTION), clock.now());
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Value, DomainError> {
    serde_json::to_value(value)
        .map_err(|e| DomainError::Validation(format!("response encoding failed: {e}")))
}

fn short_id(id: Uuid) -> String {
    id.to_string().chars().take(4).collect()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::NaiveDate;
    use docflow_core::identity::AnonymousIdentityProvider;
    use docflow_records::{AppointmentStatus, QuotationStatus};
    use docflow_store::memory::InMemoryBackend;
    use docflow_test_support::{FailingBackend, FixedCalendar, FixedClock};
    use serde_json::json;

    use super::*;
    use crate::notices::NoticeKind;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn workspace_over(backend: Arc<dyn DocumentBackend>) -> Workspace {
        Workspace::new(
            backend,
            Arc::new(AnonymousIdentityProvider),
            Arc::new(FixedClock::on(today())),
            Arc::new(FixedCalendar(Availability::Available)),
            WorkspaceConfig {
                app_id: "test-app".to_owned(),
                notice_ttl: TimeDelta::seconds(3),
            },
        )
    }

    fn workspace() -> Workspace {
        workspace_over(Arc::new(InMemoryBackend::new()))
    }

    async fn eventually(workspace: &Workspace, predicate: impl Fn(&Ledger) -> bool) -> Ledger {
        for _ in 0..200 {
            let ledger = workspace.ledger().await.unwrap();
            if predicate(&ledger) {
                return ledger;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("ledger never reached the expected state");
    }

    fn messages(workspace: &Workspace) -> Vec<String> {
        workspace
            .active_notices()
            .into_iter()
            .map(|notice| notice.message)
            .collect()
    }

    #[tokio::test]
    async fn test_operations_before_sign_in_are_not_ready() {
        // Arrange
        let workspace = workspace();

        // Act
        let created = workspace
            .create_record(Quotation::template(today()))
            .await;
        let listed = workspace.list(CollectionName::Invoices).await;

        // Assert
        assert_eq!(created, Err(DomainError::NotReady));
        assert_eq!(listed, Err(DomainError::NotReady));
        assert_eq!(messages(&workspace), vec![NOT_READY_NOTICE.to_owned()]);
        assert_eq!(workspace.session_state(), SessionState::Uninitialized);
    }

    #[tokio::test]
    async fn test_created_record_reaches_ledger_through_subscription() {
        // Arrange
        let workspace = workspace();
        workspace.sign_in(&Credential::Anonymous).await.unwrap();

        // Act
        let id = workspace
            .create(
                CollectionName::Appointments,
                json!({
                    "clientName": "Ada",
                    "title": "Content Protection",
                    "date": "2026-03-02",
                    "time": "10:30",
                    "status": "Scheduled",
                    "meetingType": "In-Person meeting",
                    "isConfirmed": true
                }),
            )
            .await
            .unwrap();

        // Assert
        let ledger = eventually(&workspace, |l| l.appointments.len() == 1).await;
        assert_eq!(ledger.appointments[0].id, id);
        assert!(messages(&workspace).contains(&"appointment added successfully!".to_owned()));
        let reminders = workspace.reminders().await.unwrap();
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].details, "Today at 10:30 for Content Protection");
    }

    #[tokio::test]
    async fn test_full_workflow_from_appointment_to_receipt() {
        // Arrange
        let workspace = workspace();
        workspace.sign_in(&Credential::Anonymous).await.unwrap();
        let mut appointment = Appointment::template(today());
        appointment.client_name = "Grace".to_owned();
        let appointment_id = workspace.create_record(appointment).await.unwrap();
        eventually(&workspace, |l| l.appointments.len() == 1).await;

        // Act: appointment -> quotation
        let quotation = workspace.draft_quotation(appointment_id).await.unwrap();
        let quotation_id = workspace.create_record(quotation).await.unwrap();
        eventually(&workspace, |l| l.quotations.len() == 1).await;
        workspace
            .change_status(CollectionName::Quotations, quotation_id, "Accepted".to_owned())
            .await
            .unwrap();
        eventually(&workspace, |l| {
            l.get::<Quotation>(quotation_id)
                .is_some_and(|q| q.record.status == QuotationStatus::Accepted)
        })
        .await;

        // Act: quotation -> invoice -> payment
        let invoice = workspace.draft_invoice(quotation_id).await.unwrap();
        let invoice_id = workspace.create_record(invoice).await.unwrap();
        eventually(&workspace, |l| l.invoices.len() == 1).await;
        let intent = workspace.record_payment(invoice_id).await.unwrap();
        let receipt_id = workspace.create_record(intent.receipt).await.unwrap();

        // Assert
        let ledger = eventually(&workspace, |l| {
            l.receipts.len() == 1
                && l.get::<Invoice>(invoice_id)
                    .is_some_and(|i| i.record.status == InvoiceStatus::Paid)
        })
        .await;
        let receipt = ledger.get::<Receipt>(receipt_id).unwrap();
        assert_eq!(receipt.record.invoice_id, Some(invoice_id));
        assert_eq!(receipt.record.client_name, "Grace");
        assert!(
            receipt
                .record
                .description
                .starts_with("Content Protection services for the period outlined in Quotation ")
        );
        assert_eq!(
            ledger.get::<Appointment>(appointment_id).unwrap().record.status,
            AppointmentStatus::Scheduled
        );
    }

    #[tokio::test]
    async fn test_second_payment_is_rejected_without_waiting_for_sync() {
        // Arrange
        let workspace = workspace();
        workspace.sign_in(&Credential::Anonymous).await.unwrap();
        let invoice_id = workspace
            .create_record(Invoice::template(today()))
            .await
            .unwrap();
        eventually(&workspace, |l| l.invoices.len() == 1).await;

        // Act
        let first = workspace.record_payment(invoice_id).await;
        let second = workspace.record_payment(invoice_id).await;

        // Assert
        assert!(first.is_ok());
        assert!(matches!(
            second,
            Err(DomainError::InvalidTransition { .. })
        ));
        let ledger = workspace.ledger().await.unwrap();
        assert_eq!(
            ledger.get::<Invoice>(invoice_id).unwrap().record.status,
            InvoiceStatus::Paid
        );
        assert!(messages(&workspace).contains(&"Failed to record payment.".to_owned()));
    }

    #[tokio::test]
    async fn test_completed_appointment_cannot_be_cancelled_before_sync() {
        // Arrange
        let workspace = workspace();
        workspace.sign_in(&Credential::Anonymous).await.unwrap();
        let id = workspace
            .create_record(Appointment::template(today()))
            .await
            .unwrap();
        eventually(&workspace, |l| l.appointments.len() == 1).await;

        // Act
        let completed = workspace
            .change_status(CollectionName::Appointments, id, "Completed".to_owned())
            .await;
        let cancelled = workspace
            .change_status(CollectionName::Appointments, id, "Cancelled".to_owned())
            .await;

        // Assert
        assert_eq!(completed, Ok("Completed".to_owned()));
        assert!(matches!(
            cancelled,
            Err(DomainError::InvalidTransition { .. })
        ));
        let ledger = eventually(&workspace, |l| {
            l.get::<Appointment>(id)
                .is_some_and(|a| a.record.status == AppointmentStatus::Completed)
        })
        .await;
        assert_eq!(ledger.appointments.len(), 1);
    }

    #[tokio::test]
    async fn test_update_fields_right_after_create_applies_to_committed_record() {
        // Arrange
        let workspace = workspace();
        workspace.sign_in(&Credential::Anonymous).await.unwrap();
        let id = workspace
            .create_record(Appointment::template(today()))
            .await
            .unwrap();
        let patch = match json!({ "clientName": "Ada", "time": "09:15" }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };

        // Act
        let result = workspace
            .update_fields(CollectionName::Appointments, id, patch)
            .await;

        // Assert
        assert_eq!(result, Ok(()));
        eventually(&workspace, |l| {
            l.get::<Appointment>(id)
                .is_some_and(|a| a.record.client_name == "Ada" && a.record.time == "09:15")
        })
        .await;
    }

    #[tokio::test]
    async fn test_receipts_have_no_status_transitions() {
        let workspace = workspace();
        workspace.sign_in(&Credential::Anonymous).await.unwrap();

        let result = workspace
            .change_status(CollectionName::Receipts, Uuid::new_v4(), "Paid".to_owned())
            .await;

        assert!(matches!(
            result,
            Err(DomainError::InvalidTransition {
                collection: CollectionName::Receipts,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_new_actor_never_sees_previous_actors_records() {
        // Arrange
        let workspace = workspace();
        let first = workspace.sign_in(&Credential::Anonymous).await.unwrap();
        workspace
            .create_record(Receipt::template(today()))
            .await
            .unwrap();
        eventually(&workspace, |l| l.receipts.len() == 1).await;

        // Act
        let second = workspace.sign_in(&Credential::Anonymous).await.unwrap();

        // Assert
        assert_ne!(first, second);
        let ledger = workspace.ledger().await.unwrap();
        assert!(ledger.receipts.is_empty());
        assert_eq!(workspace.session_state(), SessionState::Established(second));
    }

    #[tokio::test]
    async fn test_sign_out_drops_ledger_and_requires_new_sign_in() {
        let workspace = workspace();
        workspace.sign_in(&Credential::Anonymous).await.unwrap();

        workspace.sign_out().await;

        assert_eq!(workspace.ledger().await, Err(DomainError::NotReady));
        assert_eq!(workspace.session_state(), SessionState::Uninitialized);
    }

    #[tokio::test]
    async fn test_sync_failure_becomes_notice_and_keeps_session() {
        // Arrange
        let workspace = workspace_over(Arc::new(FailingBackend));

        // Act
        let signed_in = workspace.sign_in(&Credential::Anonymous).await;

        // Assert
        assert!(signed_in.is_ok());
        let notices = workspace.active_notices();
        assert!(notices.iter().all(|n| n.kind == NoticeKind::Error));
        let texts: Vec<&str> = notices.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "Failed to load appointments.",
                "Failed to load quotations.",
                "Failed to load invoices.",
                "Failed to load receipts.",
            ]
        );
        assert_eq!(workspace.ledger().await, Ok(Ledger::default()));
    }

    #[tokio::test]
    async fn test_protected_field_update_posts_validation_notice() {
        // Arrange
        let workspace = workspace();
        workspace.sign_in(&Credential::Anonymous).await.unwrap();
        let id = workspace
            .create_record(Invoice::template(today()))
            .await
            .unwrap();
        eventually(&workspace, |l| l.invoices.len() == 1).await;
        let patch = match json!({ "status": "Paid" }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };

        // Act
        let result = workspace
            .update_fields(CollectionName::Invoices, id, patch)
            .await;

        // Assert
        assert!(matches!(result, Err(DomainError::Validation(_))));
        let notices = workspace.active_notices();
        let last = notices.last().unwrap();
        assert_eq!(last.kind, NoticeKind::Error);
        assert!(last.message.contains("status"));
    }

    #[tokio::test]
    async fn test_check_availability_posts_outcome_notice() {
        let workspace = workspace();
        let mut form = AppointmentForm::new(Appointment::template(today()));
        form.set_meeting_type(docflow_records::MeetingType::Online);
        form.appointment.time = "16:00".to_owned();

        let checked = workspace.check_availability(form).await.unwrap();

        assert_eq!(Workspace::availability_of(&checked), Availability::Available);
        assert_eq!(messages(&workspace), vec![SLOT_AVAILABLE_NOTICE.to_owned()]);
    }

    #[tokio::test]
    async fn test_export_of_empty_collection_returns_no_data_message() {
        let workspace = workspace();
        workspace.sign_in(&Credential::Anonymous).await.unwrap();

        let export = workspace.export(CollectionName::Quotations).await.unwrap();

        assert_eq!(export.content, "No quotations data available for export.");
        assert_eq!(export.filename, "Quotations_Export.csv");
    }
}
