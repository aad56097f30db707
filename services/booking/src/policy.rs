//! Booking policies: the client edit window and the same-week advisory

use api::models::Booking;
use chrono::{Datelike, NaiveDateTime};
use common::ClientConfig;

use crate::error::{WorkflowError, WorkflowResult};

/// Minimum lead time before a client may edit their own booking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditWindow {
    pub min_days: i64,
    pub contact_message: String,
}

impl EditWindow {
    pub fn new(min_days: i64, contact_message: impl Into<String>) -> Self {
        Self {
            min_days,
            contact_message: contact_message.into(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.edit_window_days, config.contact_message.clone())
    }

    /// Whole days from `now` until `scheduled`, truncated toward zero
    pub fn days_until(scheduled: NaiveDateTime, now: NaiveDateTime) -> i64 {
        (scheduled - now).num_days()
    }

    pub fn allows(&self, scheduled: NaiveDateTime, now: NaiveDateTime) -> bool {
        Self::days_until(scheduled, now) >= self.min_days
    }

    /// Refuse with the contact message when the window has closed
    pub fn check(&self, scheduled: NaiveDateTime, now: NaiveDateTime) -> WorkflowResult<()> {
        let days_left = Self::days_until(scheduled, now);
        if days_left < self.min_days {
            return Err(WorkflowError::EditWindowClosed {
                days_left,
                message: self.contact_message.clone(),
            });
        }
        Ok(())
    }
}

/// Whether two date-times share an ISO week (ISO year and week number)
pub fn same_iso_week(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a.iso_week() == b.iso_week()
}

/// First booking in the same ISO week as `date`, ignoring `exclude`
pub fn first_in_same_week(
    bookings: &[Booking],
    date: NaiveDateTime,
    exclude: Option<i64>,
) -> Option<&Booking> {
    bookings
        .iter()
        .filter(|b| Some(b.id) != exclude)
        .find(|b| same_iso_week(b.scheduled_date, date))
}
