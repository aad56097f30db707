//! Booking views of the salon client
//!
//! Client booking workflow with its edit-window and same-week policies, the
//! role-dependent dashboard and calendar, administrative booking and service
//! management, revenue reports and account flows. The `salon` binary drives
//! these views from the command line.

pub mod account;
pub mod admin;
pub mod cli;
pub mod commands;
pub mod dashboard;
pub mod error;
pub mod policy;
pub mod revenue;
pub mod views;
pub mod workflow;

pub use commands::{App, AssumeYes, Confirm, StdinConfirm};
pub use error::{WorkflowError, WorkflowResult};
pub use policy::EditWindow;
pub use workflow::{BookingDraft, BookingWorkflow};
