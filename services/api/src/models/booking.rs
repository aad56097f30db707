//! Booking models

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{Service, datetime, total_price};

/// Lifecycle status of a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Requested,
    Pending,
    Confirmed,
    Cancelled,
}

/// Display tone attached to a status label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Primary,
    Warning,
    Success,
    Error,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 4] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Cancelled,
        BookingStatus::Requested,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Requested => "REQUESTED",
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn tone(&self) -> StatusTone {
        match self {
            BookingStatus::Requested => StatusTone::Primary,
            BookingStatus::Pending => StatusTone::Warning,
            BookingStatus::Confirmed => StatusTone::Success,
            BookingStatus::Cancelled => StatusTone::Error,
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        BookingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| format!("unknown booking status: {}", s))
    }
}

/// Reference to the client owning a booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRef {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ClientRef {
    pub fn id(id: i64) -> Self {
        Self {
            id,
            name: None,
            email: None,
            phone: None,
        }
    }
}

/// Service reference sent with a booking; the price is a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRef {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl ServiceRef {
    pub fn with_price(service: &Service) -> Self {
        Self {
            id: service.id,
            price: Some(service.price),
        }
    }

    pub fn id_only(service: &Service) -> Self {
        Self {
            id: service.id,
            price: None,
        }
    }
}

/// Booking as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    #[serde(with = "datetime")]
    pub scheduled_date: NaiveDateTime,
    pub status: BookingStatus,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub client: Option<ClientRef>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub client_email: Option<String>,
    #[serde(default)]
    pub client_phone: Option<String>,
    /// Length in minutes
    #[serde(default)]
    pub duration: Option<u32>,
}

impl Booking {
    /// Backend total, or the sum of the attached services when absent
    pub fn total_amount(&self) -> f64 {
        self.total_amount
            .unwrap_or_else(|| total_price(&self.services))
    }

    pub fn client_id(&self) -> Option<i64> {
        self.client.as_ref().map(|c| c.id)
    }

    pub fn client_name(&self) -> Option<&str> {
        self.client_name
            .as_deref()
            .or_else(|| self.client.as_ref().and_then(|c| c.name.as_deref()))
    }

    pub fn client_email(&self) -> Option<&str> {
        self.client_email
            .as_deref()
            .or_else(|| self.client.as_ref().and_then(|c| c.email.as_deref()))
    }

    pub fn client_phone(&self) -> Option<&str> {
        self.client_phone
            .as_deref()
            .or_else(|| self.client.as_ref().and_then(|c| c.phone.as_deref()))
    }
}

/// Creation payload for `POST /bookings`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    #[serde(with = "datetime")]
    pub scheduled_date: NaiveDateTime,
    pub notes: String,
    pub status: BookingStatus,
    pub client: ClientRef,
    pub services: Vec<ServiceRef>,
}

/// Client self-edit payload for `PUT /bookings/{id}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingChanges {
    #[serde(with = "datetime")]
    pub scheduled_date: NaiveDateTime,
    pub notes: String,
    pub client: ClientRef,
    pub services: Vec<ServiceRef>,
}

/// Administrative full replacement for `PUT /bookings/{id}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingReplacement {
    #[serde(with = "datetime")]
    pub scheduled_date: NaiveDateTime,
    pub status: BookingStatus,
    pub notes: String,
    pub services: Vec<ServiceRef>,
    pub total_amount: f64,
    pub client: ClientRef,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_booking_defaults_missing_fields() {
        let booking: Booking = serde_json::from_value(json!({
            "id": 4,
            "scheduledDate": "2025-06-02T10:00:00",
            "status": "PENDING",
            "services": [{"id": 1, "name": "Corte", "price": 50.0}]
        }))
        .unwrap();

        assert_eq!(booking.notes, "");
        assert_eq!(booking.total_amount(), 50.0);
        assert_eq!(booking.client_id(), None);
        assert_eq!(booking.client_name(), None);
    }

    #[test]
    fn test_backend_total_wins() {
        let booking: Booking = serde_json::from_value(json!({
            "id": 4,
            "scheduledDate": "2025-06-02T10:00",
            "status": "CONFIRMED",
            "notes": "franja",
            "services": [{"id": 1, "name": "Corte", "price": 50.0}],
            "totalAmount": 45.0,
            "client": {"id": 8, "name": "Bia"}
        }))
        .unwrap();

        assert_eq!(booking.total_amount(), 45.0);
        assert_eq!(booking.client_id(), Some(8));
        assert_eq!(booking.client_name(), Some("Bia"));
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let result = serde_json::from_value::<Booking>(json!({
            "id": 4,
            "scheduledDate": "2025-06-02T10:00:00",
            "status": "DONE"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_new_booking_wire_shape() {
        let service = Service {
            id: 3,
            name: "Hidratação".into(),
            price: 70.5,
        };
        let payload = NewBooking {
            scheduled_date: chrono::NaiveDate::from_ymd_opt(2025, 6, 2)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            notes: String::new(),
            status: BookingStatus::Requested,
            client: ClientRef::id(5),
            services: vec![ServiceRef::with_price(&service)],
        };

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "scheduledDate": "2025-06-02T09:30:00",
                "notes": "",
                "status": "REQUESTED",
                "client": {"id": 5},
                "services": [{"id": 3, "price": 70.5}]
            })
        );
    }

    #[test]
    fn test_status_parsing_and_tone() {
        assert_eq!("confirmed".parse(), Ok(BookingStatus::Confirmed));
        assert!("done".parse::<BookingStatus>().is_err());
        assert_eq!(BookingStatus::Cancelled.tone(), StatusTone::Error);
        assert_eq!(BookingStatus::Requested.tone(), StatusTone::Primary);
    }
}
