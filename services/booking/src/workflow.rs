//! Client booking workflow: compose, submit, list and edit own bookings

use api::ApiState;
use api::models::{
    Booking, BookingChanges, BookingStatus, ClientRef, NewBooking, Service, ServiceRef,
    total_price,
};
use api::sequencing::Latest;
use auth::validation::ValidationError;
use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::error::{WorkflowError, WorkflowResult};
use crate::policy::{EditWindow, first_in_same_week};

/// Booking being composed or edited
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingDraft {
    pub scheduled_date: Option<NaiveDateTime>,
    pub notes: String,
    services: Vec<Service>,
}

impl BookingDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-fill a draft from an existing booking
    pub fn from_booking(booking: &Booking) -> Self {
        Self {
            scheduled_date: Some(booking.scheduled_date),
            notes: booking.notes.clone(),
            services: booking.services.clone(),
        }
    }

    /// Select the service if absent, deselect it otherwise
    pub fn toggle(&mut self, service: &Service) {
        if self.is_selected(service.id) {
            self.deselect(service.id);
        } else {
            self.services.push(service.clone());
        }
    }

    pub fn select(&mut self, service: &Service) {
        if !self.is_selected(service.id) {
            self.services.push(service.clone());
        }
    }

    pub fn deselect(&mut self, service_id: i64) {
        self.services.retain(|s| s.id != service_id);
    }

    pub fn clear_services(&mut self) {
        self.services.clear();
    }

    pub fn is_selected(&self, service_id: i64) -> bool {
        self.services.iter().any(|s| s.id == service_id)
    }

    pub fn selected(&self) -> &[Service] {
        &self.services
    }

    pub fn total(&self) -> f64 {
        total_price(&self.services)
    }

    /// Replace selected services with their current catalog entries; services
    /// no longer offered are dropped
    pub fn reprice(&mut self, catalog: &[Service]) {
        self.services = self
            .services
            .iter()
            .filter_map(|selected| catalog.iter().find(|s| s.id == selected.id).cloned())
            .collect();
    }

    /// Scheduled date of a submittable draft
    pub fn validate(&self) -> Result<NaiveDateTime, ValidationError> {
        let date = self
            .scheduled_date
            .ok_or(ValidationError::Required("scheduled date"))?;
        if self.services.is_empty() {
            return Err(ValidationError::Required("services"));
        }
        Ok(date)
    }
}

/// Another booking of the client falls in the same week
#[derive(Debug, Clone, PartialEq)]
pub struct SameWeekWarning {
    pub booking_id: i64,
    pub scheduled_date: NaiveDateTime,
}

impl SameWeekWarning {
    pub fn message(&self) -> &'static str {
        "You already have another booking this week. The new one was still sent."
    }
}

/// Result of a successful submission
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub warning: Option<SameWeekWarning>,
    pub bookings: Vec<Booking>,
}

/// Booking page of a client
pub struct BookingWorkflow {
    state: ApiState,
    policy: EditWindow,
    catalog: Latest<Vec<Service>>,
    bookings: Latest<Vec<Booking>>,
}

impl BookingWorkflow {
    pub fn new(state: ApiState, policy: EditWindow) -> Self {
        Self {
            state,
            policy,
            catalog: Latest::new(),
            bookings: Latest::new(),
        }
    }

    fn client_id(&self) -> WorkflowResult<i64> {
        let user = self
            .state
            .session
            .user()
            .ok_or(WorkflowError::NotAuthenticated)?;
        user.id.ok_or(WorkflowError::MissingIdentity)
    }

    /// Fetch the catalog and the client's bookings concurrently
    pub async fn load(&self) -> WorkflowResult<()> {
        let (catalog, bookings) = tokio::join!(self.refresh_catalog(), self.refresh_bookings());
        catalog?;
        bookings?;
        Ok(())
    }

    pub async fn refresh_catalog(&self) -> WorkflowResult<Vec<Service>> {
        let ticket = self.catalog.begin();
        let services = self.state.services.list().await?;
        Ok(self.catalog.settle(ticket, services))
    }

    pub async fn refresh_bookings(&self) -> WorkflowResult<Vec<Booking>> {
        let client_id = self.client_id()?;
        let ticket = self.bookings.begin();
        let bookings = self.state.bookings.list_for_client(client_id).await?;
        Ok(self.bookings.settle(ticket, bookings))
    }

    pub fn catalog(&self) -> Vec<Service> {
        self.catalog.get().unwrap_or_default()
    }

    pub fn bookings(&self) -> Vec<Booking> {
        self.bookings.get().unwrap_or_default()
    }

    pub fn find_booking(&self, id: i64) -> Option<Booking> {
        self.bookings().into_iter().find(|b| b.id == id)
    }

    /// Same-week advisory against the loaded bookings, skipping `exclude`
    pub fn same_week_warning(
        &self,
        date: NaiveDateTime,
        exclude: Option<i64>,
    ) -> Option<SameWeekWarning> {
        let bookings = self.bookings();
        first_in_same_week(&bookings, date, exclude).map(|b| SameWeekWarning {
            booking_id: b.id,
            scheduled_date: b.scheduled_date,
        })
    }

    /// Send a new booking request and reload the client's bookings
    ///
    /// The same-week advisory is computed before sending and never blocks
    /// the request.
    pub async fn submit(&self, draft: &BookingDraft) -> WorkflowResult<SubmitOutcome> {
        let scheduled_date = draft.validate()?;
        let client_id = self.client_id()?;

        if self.bookings.get().is_none() {
            self.refresh_bookings().await?;
        }
        let warning = self.same_week_warning(scheduled_date, None);
        if let Some(w) = &warning {
            warn!(
                "Booking for {} shares a week with booking {}",
                scheduled_date, w.booking_id
            );
        }

        let payload = NewBooking {
            scheduled_date,
            notes: draft.notes.clone(),
            status: BookingStatus::Requested,
            client: ClientRef::id(client_id),
            services: draft.selected().iter().map(ServiceRef::with_price).collect(),
        };
        self.state.bookings.create(&payload).await?;
        info!(
            "Requested booking for {} with {} service(s)",
            scheduled_date,
            payload.services.len()
        );

        let bookings = self.refresh_bookings().await?;
        Ok(SubmitOutcome { warning, bookings })
    }

    /// Open a booking for editing if the edit window allows it
    pub fn open_edit(&self, booking: &Booking, now: NaiveDateTime) -> WorkflowResult<BookingDraft> {
        self.policy.check(booking.scheduled_date, now)?;
        Ok(BookingDraft::from_booking(booking))
    }

    /// Save an edited booking and reload the client's bookings
    pub async fn save_edit(
        &self,
        booking_id: i64,
        draft: &BookingDraft,
    ) -> WorkflowResult<Vec<Booking>> {
        let scheduled_date = draft.validate()?;
        let client_id = self.client_id()?;

        let changes = BookingChanges {
            scheduled_date,
            notes: draft.notes.clone(),
            client: ClientRef::id(client_id),
            services: draft.selected().iter().map(ServiceRef::with_price).collect(),
        };
        self.state.bookings.update(booking_id, &changes).await?;
        info!("Updated booking {}", booking_id);

        self.refresh_bookings().await
    }
}
