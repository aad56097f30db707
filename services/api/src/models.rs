//! Backend entities and request payloads

use serde::{Deserialize, Serialize};

pub mod booking;
pub mod datetime;
pub mod revenue;

pub use booking::{
    Booking, BookingChanges, BookingReplacement, BookingStatus, ClientRef, NewBooking, ServiceRef,
};
pub use revenue::{RevenueEntry, RevenueQuery, RevenueReport, RevenueResponse};

/// Priced offering from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub name: String,
    pub price: f64,
}

/// Service creation and update payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDraft {
    pub name: String,
    pub price: f64,
}

impl ServiceDraft {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

/// Sum of the prices of `services`; zero when empty
pub fn total_price<'a>(services: impl IntoIterator<Item = &'a Service>) -> f64 {
    services.into_iter().map(|s| s.price).sum()
}
