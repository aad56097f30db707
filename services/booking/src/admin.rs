//! Administrative views: booking details editor and service manager

use api::ApiState;
use api::models::{
    Booking, BookingReplacement, BookingStatus, ClientRef, Service, ServiceDraft, ServiceRef,
    total_price,
};
use api::sequencing::Latest;
use auth::View;
use auth::validation::ValidationError;
use chrono::NaiveDateTime;
use tracing::{error, info};

use crate::error::{WorkflowError, WorkflowResult};

fn require_admin(state: &ApiState) -> WorkflowResult<()> {
    let session = state.session.snapshot();
    if !session.is_authenticated() {
        return Err(WorkflowError::NotAuthenticated);
    }
    if !session.is_admin() {
        return Err(WorkflowError::Forbidden);
    }
    Ok(())
}

/// Edit form of the booking details view
#[derive(Debug, Clone, PartialEq)]
pub struct BookingForm {
    pub scheduled_date: NaiveDateTime,
    pub status: BookingStatus,
    pub notes: String,
    services: Vec<Service>,
    total_amount: f64,
}

impl BookingForm {
    pub fn from_booking(booking: &Booking) -> Self {
        Self {
            scheduled_date: booking.scheduled_date,
            status: booking.status,
            notes: booking.notes.clone(),
            services: booking.services.clone(),
            total_amount: booking.total_amount(),
        }
    }

    /// Add or remove a service; the total always follows the selection
    pub fn toggle_service(&mut self, service: &Service) {
        if self.services.iter().any(|s| s.id == service.id) {
            self.services.retain(|s| s.id != service.id);
        } else {
            self.services.push(service.clone());
        }
        self.total_amount = total_price(&self.services);
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn total_amount(&self) -> f64 {
        self.total_amount
    }

    fn replacement(&self, client_id: i64) -> BookingReplacement {
        BookingReplacement {
            scheduled_date: self.scheduled_date,
            status: self.status,
            notes: self.notes.clone(),
            services: self.services.iter().map(ServiceRef::id_only).collect(),
            total_amount: self.total_amount,
            client: ClientRef::id(client_id),
        }
    }
}

/// One booking with its edit and delete flows
pub struct BookingDetails {
    state: ApiState,
    booking_id: i64,
    booking: Option<Booking>,
    catalog: Vec<Service>,
    form: Option<BookingForm>,
    confirming_delete: bool,
}

impl BookingDetails {
    pub fn new(state: ApiState, booking_id: i64) -> Self {
        Self {
            state,
            booking_id,
            booking: None,
            catalog: Vec::new(),
            form: None,
            confirming_delete: false,
        }
    }

    /// Fetch the booking and the catalog together
    ///
    /// A missing booking is not an error: the view shows "Booking not found".
    pub async fn load(&mut self) -> WorkflowResult<Option<&Booking>> {
        let (booking, catalog) = tokio::join!(
            self.state.bookings.get(self.booking_id),
            self.state.services.list()
        );

        self.booking = match booking {
            Ok(booking) => Some(booking),
            Err(e) if e.is_not_found() => None,
            Err(e) => {
                error!("Failed to load booking {}: {}", self.booking_id, e);
                return Err(e.into());
            }
        };
        self.catalog = catalog?;
        self.form = None;
        self.confirming_delete = false;

        Ok(self.booking.as_ref())
    }

    pub fn booking(&self) -> Option<&Booking> {
        self.booking.as_ref()
    }

    pub fn catalog(&self) -> &[Service] {
        &self.catalog
    }

    pub fn form(&self) -> Option<&BookingForm> {
        self.form.as_ref()
    }

    pub fn is_confirming_delete(&self) -> bool {
        self.confirming_delete
    }

    pub fn start_edit(&mut self) -> WorkflowResult<&mut BookingForm> {
        require_admin(&self.state)?;
        let booking = self.booking.as_ref().ok_or(WorkflowError::NotFound)?;
        Ok(self.form.insert(BookingForm::from_booking(booking)))
    }

    pub fn cancel_edit(&mut self) {
        self.form = None;
    }

    /// Send the full replacement and adopt the backend's version
    pub async fn save(&mut self) -> WorkflowResult<&Booking> {
        require_admin(&self.state)?;
        let booking = self.booking.as_ref().ok_or(WorkflowError::NotFound)?;
        let form = self
            .form
            .as_ref()
            .ok_or_else(|| WorkflowError::InvalidInput("Booking is not being edited".to_string()))?;
        let client_id = booking.client_id().ok_or(WorkflowError::MissingIdentity)?;

        let updated = self
            .state
            .bookings
            .replace(self.booking_id, &form.replacement(client_id))
            .await?;
        info!("Saved booking {}", self.booking_id);

        self.form = None;
        Ok(self.booking.insert(updated))
    }

    pub fn request_delete(&mut self) -> WorkflowResult<()> {
        require_admin(&self.state)?;
        if self.booking.is_none() {
            return Err(WorkflowError::NotFound);
        }
        self.confirming_delete = true;
        Ok(())
    }

    pub fn cancel_delete(&mut self) {
        self.confirming_delete = false;
    }

    /// Delete after confirmation; the caller navigates to the returned view
    pub async fn confirm_delete(&mut self) -> WorkflowResult<View> {
        require_admin(&self.state)?;
        if !self.confirming_delete {
            return Err(WorkflowError::ConfirmationRequired);
        }

        self.state.bookings.delete(self.booking_id).await?;
        info!("Deleted booking {}", self.booking_id);

        self.booking = None;
        self.form = None;
        self.confirming_delete = false;
        Ok(View::Dashboard)
    }
}

fn service_draft(name: &str, price: f64) -> WorkflowResult<ServiceDraft> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::Required("name").into());
    }
    if !price.is_finite() || price < 0.0 {
        return Err(WorkflowError::InvalidInput(
            "Price must be a non-negative number".to_string(),
        ));
    }
    Ok(ServiceDraft::new(name, price))
}

/// Catalog maintenance for administrators
pub struct ServiceManager {
    state: ApiState,
    services: Latest<Vec<Service>>,
}

impl ServiceManager {
    pub fn new(state: ApiState) -> Self {
        Self {
            state,
            services: Latest::new(),
        }
    }

    pub async fn refresh(&self) -> WorkflowResult<Vec<Service>> {
        let ticket = self.services.begin();
        let services = self.state.services.list().await?;
        Ok(self.services.settle(ticket, services))
    }

    pub fn services(&self) -> Vec<Service> {
        self.services.get().unwrap_or_default()
    }

    pub async fn create(&self, name: &str, price: f64) -> WorkflowResult<Vec<Service>> {
        require_admin(&self.state)?;
        let draft = service_draft(name, price)?;
        self.state.services.create(&draft).await?;
        info!("Created service {}", draft.name);
        self.refresh().await
    }

    pub async fn update(&self, id: i64, name: &str, price: f64) -> WorkflowResult<Vec<Service>> {
        require_admin(&self.state)?;
        let draft = service_draft(name, price)?;
        self.state.services.update(id, &draft).await?;
        info!("Updated service {}", id);
        self.refresh().await
    }

    pub async fn delete(&self, id: i64) -> WorkflowResult<Vec<Service>> {
        require_admin(&self.state)?;
        self.state.services.delete(id).await?;
        info!("Deleted service {}", id);
        self.refresh().await
    }
}
