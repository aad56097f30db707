//! Role-dependent booking dashboard and calendar

use api::ApiState;
use api::models::Booking;
use api::sequencing::Latest;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use crate::error::{WorkflowError, WorkflowResult};

/// Inclusive date filter; the end date covers its whole day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> WorkflowResult<Self> {
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(WorkflowError::InvalidInput(format!(
                    "Start date {} is after end date {}",
                    start, end
                )));
            }
        }
        Ok(Self { start, end })
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        if let Some(start) = self.start {
            if at < start.and_time(NaiveTime::MIN) {
                return false;
            }
        }
        if let Some(end) = self.end {
            if at.date() > end {
                return false;
            }
        }
        true
    }
}

pub fn filter_bookings(bookings: &[Booking], range: &DateRange) -> Vec<Booking> {
    bookings
        .iter()
        .filter(|b| range.contains(b.scheduled_date))
        .cloned()
        .collect()
}

/// Booking shown as a dated calendar event
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub booking_id: i64,
    pub title: String,
    pub start: NaiveDateTime,
}

/// Events titled with the booking's service names, ordered by start
pub fn calendar_events(bookings: &[Booking]) -> Vec<CalendarEvent> {
    let mut events: Vec<CalendarEvent> = bookings
        .iter()
        .map(|b| CalendarEvent {
            booking_id: b.id,
            title: b
                .services
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            start: b.scheduled_date,
        })
        .collect();
    events.sort_by_key(|e| e.start);
    events
}

/// Bookings visible to the current user: all of them for an administrator,
/// the user's own otherwise
pub struct Dashboard {
    state: ApiState,
    bookings: Latest<Vec<Booking>>,
}

impl Dashboard {
    pub fn new(state: ApiState) -> Self {
        Self {
            state,
            bookings: Latest::new(),
        }
    }

    pub async fn refresh(&self) -> WorkflowResult<Vec<Booking>> {
        let user = self
            .state
            .session
            .user()
            .ok_or(WorkflowError::NotAuthenticated)?;

        let ticket = self.bookings.begin();
        let bookings = if user.role.is_admin() {
            self.state.bookings.list_all().await?
        } else {
            let id = user.id.ok_or(WorkflowError::MissingIdentity)?;
            self.state.bookings.list_for_client(id).await?
        };
        debug!("Dashboard fetched {} booking(s)", bookings.len());

        Ok(self.bookings.settle(ticket, bookings))
    }

    pub fn bookings(&self) -> Vec<Booking> {
        self.bookings.get().unwrap_or_default()
    }

    pub fn filtered(&self, range: &DateRange) -> Vec<Booking> {
        filter_bookings(&self.bookings(), range)
    }

    pub fn events(&self) -> Vec<CalendarEvent> {
        calendar_events(&self.bookings())
    }
}
