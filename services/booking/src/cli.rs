//! Command-line surface of the `salon` binary

use std::path::PathBuf;

use api::models::BookingStatus;
use api::models::datetime::{parse_local_date, parse_local_datetime};
use auth::Role;
use chrono::{NaiveDate, NaiveDateTime};
use clap::{ArgAction, Parser, Subcommand};

fn datetime_arg(value: &str) -> Result<NaiveDateTime, String> {
    parse_local_datetime(value)
        .ok_or_else(|| format!("expected YYYY-MM-DDTHH:MM[:SS], got {}", value))
}

fn date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_local_date(value).ok_or_else(|| format!("expected YYYY-MM-DD, got {}", value))
}

/// Salon booking client
#[derive(Parser, Debug)]
#[command(name = "salon", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (TOML); `SALON_*` variables still take precedence
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Answer yes to every confirmation prompt
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and show the dashboard
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "USER")]
        role: Role,
    },
    /// Forget the stored token
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Show the navigation menu for the current user
    Menu,
    /// Open a view by path, e.g. /dashboard or /admin/reports
    Open { path: String },
    /// List bookings, optionally within an inclusive date range
    Dashboard {
        #[arg(long, value_parser = date_arg)]
        start: Option<NaiveDate>,
        #[arg(long, value_parser = date_arg)]
        end: Option<NaiveDate>,
    },
    /// List bookings as calendar events
    Calendar,
    /// Request a new booking
    Book {
        #[arg(long, value_parser = datetime_arg)]
        date: Option<NaiveDateTime>,
        /// Service id; repeat for several services
        #[arg(long = "service")]
        services: Vec<i64>,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Work with a single booking
    Bookings {
        #[command(subcommand)]
        command: BookingCommand,
    },
    /// Browse or manage the service catalog
    Services {
        #[command(subcommand)]
        command: ServiceCommand,
    },
    /// Revenue report (administrators)
    Revenue {
        #[arg(long, value_parser = date_arg)]
        start: Option<NaiveDate>,
        #[arg(long, value_parser = date_arg)]
        end: Option<NaiveDate>,
    },
    /// Manage the profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },
    /// Manage the account
    Account {
        #[command(subcommand)]
        command: AccountCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum BookingCommand {
    /// Edit one of your bookings; without changes, show the pre-filled form
    Edit {
        id: i64,
        #[arg(long, value_parser = datetime_arg)]
        date: Option<NaiveDateTime>,
        /// Replace the selected services; repeat for several
        #[arg(long = "service")]
        services: Vec<i64>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Show booking details
    Show { id: i64 },
    /// Change any field of a booking (administrators)
    Update {
        id: i64,
        #[arg(long, value_parser = datetime_arg)]
        date: Option<NaiveDateTime>,
        #[arg(long)]
        status: Option<BookingStatus>,
        #[arg(long)]
        notes: Option<String>,
        /// Add the service if absent, remove it otherwise; repeatable
        #[arg(long = "toggle-service")]
        toggle: Vec<i64>,
    },
    /// Delete a booking after confirmation (administrators)
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum ServiceCommand {
    List,
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        price: f64,
    },
    Update {
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        price: f64,
    },
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Change name and email; the password only when given
    Update {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum AccountCommand {
    /// Permanently delete the account and log out
    Delete,
}
