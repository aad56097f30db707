//! Plain-text rendering of views for the terminal

use std::fmt::Write;

use api::models::{Booking, BookingStatus, RevenueReport, Service};
use api::models::booking::StatusTone;
use auth::UserClaims;
use auth::navigation::MenuEntry;
use chrono::NaiveDateTime;

use crate::admin::BookingForm;
use crate::dashboard::CalendarEvent;
use crate::workflow::BookingDraft;

/// Display format of booking dates
pub const DATETIME_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Minutes assumed when the backend gives no duration
pub const DEFAULT_DURATION_MINUTES: u32 = 60;

const NOT_PROVIDED: &str = "not provided";

/// Amount with two decimals; multi-character symbols are separated by a space
pub fn format_amount(symbol: &str, amount: f64) -> String {
    if symbol.chars().count() == 1 {
        format!("{}{:.2}", symbol, amount)
    } else {
        format!("{} {:.2}", symbol, amount)
    }
}

pub fn format_datetime(at: &NaiveDateTime) -> String {
    at.format(DATETIME_FORMAT).to_string()
}

/// Status label with its tone, e.g. `CONFIRMED (success)`
pub fn status_label(status: BookingStatus) -> String {
    let tone = match status.tone() {
        StatusTone::Primary => "primary",
        StatusTone::Warning => "warning",
        StatusTone::Success => "success",
        StatusTone::Error => "error",
    };
    format!("{} ({})", status, tone)
}

fn service_names(services: &[Service]) -> String {
    if services.is_empty() {
        return "-".to_string();
    }
    services
        .iter()
        .map(|s| s.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn render_bookings(bookings: &[Booking], symbol: &str) -> String {
    if bookings.is_empty() {
        return "No bookings found.".to_string();
    }

    let mut out = String::new();
    for booking in bookings {
        let _ = writeln!(
            out,
            "#{:<5} {}  {:<22} {:>12}  {}",
            booking.id,
            format_datetime(&booking.scheduled_date),
            status_label(booking.status),
            format_amount(symbol, booking.total_amount()),
            service_names(&booking.services)
        );
    }
    out.trim_end().to_string()
}

pub fn render_booking(booking: &Booking, symbol: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Booking #{}", booking.id);
    let _ = writeln!(out, "Date:     {}", format_datetime(&booking.scheduled_date));
    let _ = writeln!(out, "Status:   {}", status_label(booking.status));
    let _ = writeln!(
        out,
        "Duration: {} min",
        booking.duration.unwrap_or(DEFAULT_DURATION_MINUTES)
    );
    let _ = writeln!(
        out,
        "Client:   {}",
        booking.client_name().unwrap_or(NOT_PROVIDED)
    );
    let _ = writeln!(
        out,
        "Email:    {}",
        booking.client_email().unwrap_or(NOT_PROVIDED)
    );
    let _ = writeln!(
        out,
        "Phone:    {}",
        booking.client_phone().unwrap_or(NOT_PROVIDED)
    );
    let _ = writeln!(
        out,
        "Notes:    {}",
        if booking.notes.is_empty() { "-" } else { &booking.notes }
    );
    let _ = writeln!(out, "Services:");
    for service in &booking.services {
        let _ = writeln!(
            out,
            "  - {} {}",
            service.name,
            format_amount(symbol, service.price)
        );
    }
    let _ = write!(
        out,
        "Total:    {}",
        format_amount(symbol, booking.total_amount())
    );
    out
}

pub fn render_services(services: &[Service], symbol: &str) -> String {
    if services.is_empty() {
        return "No services registered.".to_string();
    }
    services
        .iter()
        .map(|s| format!("#{:<5} {:<30} {}", s.id, s.name, format_amount(symbol, s.price)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_draft(draft: &BookingDraft, symbol: &str) -> String {
    let mut out = String::new();
    if let Some(date) = &draft.scheduled_date {
        let _ = writeln!(out, "Date:     {}", format_datetime(date));
    }
    let _ = writeln!(out, "Services: {}", service_names(draft.selected()));
    if !draft.notes.is_empty() {
        let _ = writeln!(out, "Notes:    {}", draft.notes);
    }
    let _ = write!(out, "Total: {}", format_amount(symbol, draft.total()));
    out
}

pub fn render_form(form: &BookingForm, symbol: &str) -> String {
    format!(
        "Date:     {}\nStatus:   {}\nServices: {}\nNotes:    {}\nTotal: {}",
        format_datetime(&form.scheduled_date),
        status_label(form.status),
        service_names(form.services()),
        if form.notes.is_empty() { "-" } else { &form.notes },
        format_amount(symbol, form.total_amount())
    )
}

pub fn render_calendar(events: &[CalendarEvent]) -> String {
    if events.is_empty() {
        return "No bookings found.".to_string();
    }
    events
        .iter()
        .map(|e| format!("{}  #{:<5} {}", format_datetime(&e.start), e.booking_id, e.title))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_revenue(report: &RevenueReport, symbol: &str) -> String {
    let mut out = String::new();
    for entry in &report.entries {
        let label = entry
            .date
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| "Total".to_string());
        let _ = writeln!(out, "{:<12} {}", label, format_amount(symbol, entry.revenue));
    }
    let _ = write!(out, "Total revenue: {}", format_amount(symbol, report.total));
    out
}

pub fn render_menu(entries: &[MenuEntry]) -> String {
    entries
        .iter()
        .map(|entry| match entry {
            MenuEntry::Go { label, view } => format!("{:<12} {}", label, view.path()),
            MenuEntry::Logout => entry.label().to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_user(user: &UserClaims) -> String {
    let mut out = format!("{} <{}> [{}]", user.display_name(), user.sub, user.role);
    if let Some(id) = user.id {
        let _ = write!(out, " id={}", id);
    }
    out
}
