//! Booking repository

use tracing::info;

use crate::client::HttpClient;
use crate::error::ApiResult;
use crate::models::{Booking, BookingChanges, BookingReplacement, NewBooking};

/// Booking endpoints
#[derive(Clone)]
pub struct BookingRepository {
    client: HttpClient,
}

impl BookingRepository {
    /// Create a new booking repository
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Get every booking (administrators)
    pub async fn list_all(&self) -> ApiResult<Vec<Booking>> {
        self.client.get("/bookings").await
    }

    /// Get the bookings of one client
    pub async fn list_for_client(&self, client_id: i64) -> ApiResult<Vec<Booking>> {
        self.client
            .get(&format!("/bookings/client/{}", client_id))
            .await
    }

    /// Get a booking by ID
    pub async fn get(&self, id: i64) -> ApiResult<Booking> {
        self.client.get(&format!("/bookings/{}", id)).await
    }

    /// Request a new booking
    pub async fn create(&self, booking: &NewBooking) -> ApiResult<()> {
        info!(
            "Requesting booking for client {} at {}",
            booking.client.id, booking.scheduled_date
        );
        self.client.post_unit("/bookings", booking).await
    }

    /// Apply a client's own changes
    pub async fn update(&self, id: i64, changes: &BookingChanges) -> ApiResult<()> {
        info!("Updating booking {}", id);
        self.client
            .put_unit(&format!("/bookings/{}", id), changes)
            .await
    }

    /// Replace a booking entirely and return the stored version
    pub async fn replace(&self, id: i64, replacement: &BookingReplacement) -> ApiResult<Booking> {
        info!("Replacing booking {} (status {})", id, replacement.status);
        self.client
            .put(&format!("/bookings/{}", id), replacement)
            .await
    }

    /// Delete a booking
    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        info!("Deleting booking {}", id);
        self.client.delete(&format!("/bookings/{}", id)).await
    }
}
