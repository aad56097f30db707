//! Command dispatch: every command enters its view through the route guard

use std::io::{self, BufRead, Write};

use api::ApiState;
use api::models::Service;
use auth::guard;
use auth::models::{LoginCredentials, ProfileUpdate, Registration};
use auth::navigation::menu_for;
use auth::View;
use chrono::{Local, NaiveDateTime};
use common::ClientConfig;
use tracing::{info, warn};

use crate::account::Account;
use crate::admin::{BookingDetails, ServiceManager};
use crate::cli::{AccountCommand, BookingCommand, Command, ProfileCommand, ServiceCommand};
use crate::dashboard::{Dashboard, DateRange};
use crate::error::{WorkflowError, WorkflowResult};
use crate::policy::EditWindow;
use crate::revenue::RevenueView;
use crate::views;
use crate::workflow::{BookingDraft, BookingWorkflow};

const LOGIN_HINT: &str = "You need to log in first. Run `salon login --email <email> --password <password>`.";

/// Asks the user to confirm a destructive step
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Prompt on stderr and read the answer from stdin
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        eprint!("{} [y/N] ", prompt);
        let _ = io::stderr().flush();

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

/// Accept every confirmation (`--yes`)
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

fn pick_services(catalog: &[Service], ids: &[i64]) -> WorkflowResult<Vec<Service>> {
    ids.iter()
        .map(|id| {
            catalog
                .iter()
                .find(|s| s.id == *id)
                .cloned()
                .ok_or_else(|| WorkflowError::InvalidInput(format!("Unknown service {}", id)))
        })
        .collect()
}

/// The client application behind the `salon` binary
pub struct App {
    state: ApiState,
    config: ClientConfig,
    confirm: Box<dyn Confirm>,
}

impl App {
    pub fn new(state: ApiState, config: ClientConfig, confirm: Box<dyn Confirm>) -> Self {
        Self {
            state,
            config,
            confirm,
        }
    }

    fn symbol(&self) -> &str {
        &self.config.currency_symbol
    }

    fn now() -> NaiveDateTime {
        Local::now().naive_local()
    }

    /// Guard entry to `view`; `Some` carries the output of the redirect
    async fn enter(&self, view: View) -> WorkflowResult<Option<String>> {
        let session = self.state.session.snapshot();
        let settled = guard::settle(&session, &view.path());
        if settled == view {
            return Ok(None);
        }

        warn!("Access to {} redirected to {}", view.path(), settled.path());
        let output = match settled {
            View::Login => LOGIN_HINT.to_string(),
            other => format!(
                "{} is restricted to administrators.\n\n{}",
                view.path(),
                self.render_view(other).await?
            ),
        };
        Ok(Some(output))
    }

    /// Render a view that the guard already admitted
    async fn render_view(&self, view: View) -> WorkflowResult<String> {
        match view {
            View::Login => Ok(LOGIN_HINT.to_string()),
            View::Register => Ok(
                "Create an account with `salon register --name <name> --email <email> --password <password>`."
                    .to_string(),
            ),
            View::Dashboard => self.dashboard(DateRange::default()).await,
            View::Calendar => {
                let dashboard = Dashboard::new(self.state.clone());
                dashboard.refresh().await?;
                Ok(views::render_calendar(&dashboard.events()))
            }
            View::Book => {
                let workflow = self.workflow();
                workflow.load().await?;
                Ok(format!(
                    "Services:\n{}\n\nYour bookings:\n{}",
                    views::render_services(&workflow.catalog(), self.symbol()),
                    views::render_bookings(&workflow.bookings(), self.symbol())
                ))
            }
            View::BookingDetails(id) => {
                let mut details = BookingDetails::new(self.state.clone(), id);
                Ok(match details.load().await? {
                    Some(booking) => views::render_booking(booking, self.symbol()),
                    None => WorkflowError::NotFound.to_string(),
                })
            }
            View::Profile => self
                .state
                .session
                .user()
                .map(|user| views::render_user(&user))
                .ok_or(WorkflowError::NotAuthenticated),
            View::Settings => Ok(format!(
                "Backend:      {}\nToken file:   {}\nEdit window:  {} day(s)\nCurrency:     {}",
                self.config.base_url,
                self.config.token_path.display(),
                self.config.edit_window_days,
                self.config.currency_symbol
            )),
            View::ServiceManager => {
                let manager = ServiceManager::new(self.state.clone());
                Ok(views::render_services(&manager.refresh().await?, self.symbol()))
            }
            View::Reports => {
                let report = RevenueView::new(self.state.clone())
                    .fetch(&DateRange::default())
                    .await?;
                Ok(views::render_revenue(&report, self.symbol()))
            }
        }
    }

    fn workflow(&self) -> BookingWorkflow {
        BookingWorkflow::new(self.state.clone(), EditWindow::from_config(&self.config))
    }

    fn account(&self) -> Account {
        Account::new(self.state.clone())
    }

    async fn dashboard(&self, range: DateRange) -> WorkflowResult<String> {
        let dashboard = Dashboard::new(self.state.clone());
        dashboard.refresh().await?;
        Ok(views::render_bookings(&dashboard.filtered(&range), self.symbol()))
    }

    /// Run one command and return what it prints
    pub async fn run(&self, command: Command) -> WorkflowResult<String> {
        match command {
            Command::Login { email, password } => {
                let user = self
                    .account()
                    .login(&LoginCredentials { email, password })
                    .await?;
                Ok(format!(
                    "Welcome, {}!\n\n{}",
                    user.display_name(),
                    self.render_view(View::Dashboard).await?
                ))
            }
            Command::Register {
                name,
                email,
                password,
                role,
            } => {
                let registration = Registration {
                    name,
                    email,
                    password,
                    role,
                };
                self.account().register(&registration).await?;
                Ok("Account created. You can now log in.".to_string())
            }
            Command::Logout => {
                self.account().logout()?;
                Ok("Logged out.".to_string())
            }
            Command::Whoami => self.open(View::Profile).await,
            Command::Menu => {
                let entries = menu_for(&self.state.session.snapshot());
                if entries.is_empty() {
                    return Ok(LOGIN_HINT.to_string());
                }
                Ok(views::render_menu(&entries))
            }
            Command::Open { path } => {
                let view = guard::settle(&self.state.session.snapshot(), &path);
                info!("Opening {} as {}", path, view);
                self.render_view(view).await
            }
            Command::Dashboard { start, end } => {
                if let Some(redirect) = self.enter(View::Dashboard).await? {
                    return Ok(redirect);
                }
                self.dashboard(DateRange::new(start, end)?).await
            }
            Command::Calendar => self.open(View::Calendar).await,
            Command::Book {
                date,
                services,
                notes,
            } => self.book(date, &services, notes).await,
            Command::Bookings { command } => self.bookings(command).await,
            Command::Services { command } => self.services(command).await,
            Command::Revenue { start, end } => {
                if let Some(redirect) = self.enter(View::Reports).await? {
                    return Ok(redirect);
                }
                let report = RevenueView::new(self.state.clone())
                    .fetch(&DateRange::new(start, end)?)
                    .await?;
                Ok(views::render_revenue(&report, self.symbol()))
            }
            Command::Profile {
                command:
                    ProfileCommand::Update {
                        name,
                        email,
                        password,
                    },
            } => {
                if let Some(redirect) = self.enter(View::Profile).await? {
                    return Ok(redirect);
                }
                self.account()
                    .update_profile(&ProfileUpdate::new(name, email, password))
                    .await?;
                Ok("Profile updated.".to_string())
            }
            Command::Account {
                command: AccountCommand::Delete,
            } => {
                if let Some(redirect) = self.enter(View::Settings).await? {
                    return Ok(redirect);
                }
                let confirmed = self
                    .confirm
                    .confirm("Delete your account? This cannot be undone.");
                if !confirmed {
                    return Ok("Account deletion cancelled.".to_string());
                }
                self.account().delete_account(confirmed).await?;
                Ok("Account deleted.".to_string())
            }
        }
    }

    async fn open(&self, view: View) -> WorkflowResult<String> {
        if let Some(redirect) = self.enter(view).await? {
            return Ok(redirect);
        }
        self.render_view(view).await
    }

    async fn book(
        &self,
        date: Option<NaiveDateTime>,
        service_ids: &[i64],
        notes: String,
    ) -> WorkflowResult<String> {
        if let Some(redirect) = self.enter(View::Book).await? {
            return Ok(redirect);
        }

        let workflow = self.workflow();
        workflow.load().await?;

        let mut draft = BookingDraft::new();
        draft.scheduled_date = date;
        draft.notes = notes;
        for service in pick_services(&workflow.catalog(), service_ids)? {
            draft.select(&service);
        }

        let outcome = workflow.submit(&draft).await?;
        let mut output = format!(
            "{}\nBooking requested.",
            views::render_draft(&draft, self.symbol())
        );
        if let Some(warning) = &outcome.warning {
            output.push('\n');
            output.push_str(warning.message());
        }
        output.push_str("\n\nYour bookings:\n");
        output.push_str(&views::render_bookings(&outcome.bookings, self.symbol()));
        Ok(output)
    }

    async fn bookings(&self, command: BookingCommand) -> WorkflowResult<String> {
        match command {
            BookingCommand::Edit {
                id,
                date,
                services,
                notes,
            } => {
                if let Some(redirect) = self.enter(View::Book).await? {
                    return Ok(redirect);
                }
                let workflow = self.workflow();
                workflow.load().await?;
                let booking = workflow.find_booking(id).ok_or(WorkflowError::NotFound)?;
                let mut draft = workflow.open_edit(&booking, Self::now())?;

                if date.is_none() && services.is_empty() && notes.is_none() {
                    return Ok(views::render_draft(&draft, self.symbol()));
                }

                let catalog = workflow.catalog();
                if let Some(date) = date {
                    draft.scheduled_date = Some(date);
                }
                if let Some(notes) = notes {
                    draft.notes = notes;
                }
                if services.is_empty() {
                    draft.reprice(&catalog);
                } else {
                    draft.clear_services();
                    for service in pick_services(&catalog, &services)? {
                        draft.select(&service);
                    }
                }

                let mut output = String::new();
                if let Some(date) = draft.scheduled_date {
                    if let Some(warning) = workflow.same_week_warning(date, Some(id)) {
                        output.push_str(warning.message());
                        output.push('\n');
                    }
                }
                workflow.save_edit(id, &draft).await?;
                output.push_str(&views::render_draft(&draft, self.symbol()));
                output.push_str("\nBooking updated.");
                Ok(output)
            }
            BookingCommand::Show { id } => self.open(View::BookingDetails(id)).await,
            BookingCommand::Update {
                id,
                date,
                status,
                notes,
                toggle,
            } => {
                if let Some(redirect) = self.enter(View::BookingDetails(id)).await? {
                    return Ok(redirect);
                }
                let mut details = BookingDetails::new(self.state.clone(), id);
                if details.load().await?.is_none() {
                    return Err(WorkflowError::NotFound);
                }
                let toggled = pick_services(details.catalog(), &toggle)?;

                let form = details.start_edit()?;
                if let Some(date) = date {
                    form.scheduled_date = date;
                }
                if let Some(status) = status {
                    form.status = status;
                }
                if let Some(notes) = notes {
                    form.notes = notes;
                }
                for service in &toggled {
                    form.toggle_service(service);
                }
                let sent = views::render_form(form, self.symbol());

                let booking = details.save().await?;
                Ok(format!(
                    "Sending:\n{}\n\n{}\nBooking saved.",
                    sent,
                    views::render_booking(booking, self.symbol())
                ))
            }
            BookingCommand::Delete { id } => {
                if let Some(redirect) = self.enter(View::BookingDetails(id)).await? {
                    return Ok(redirect);
                }
                let mut details = BookingDetails::new(self.state.clone(), id);
                if details.load().await?.is_none() {
                    return Err(WorkflowError::NotFound);
                }
                details.request_delete()?;

                if !self.confirm.confirm(&format!("Delete booking #{}?", id)) {
                    details.cancel_delete();
                    return Ok("Deletion cancelled.".to_string());
                }
                let next = details.confirm_delete().await?;
                Ok(format!(
                    "Booking deleted.\n\n{}",
                    self.render_view(next).await?
                ))
            }
        }
    }

    async fn services(&self, command: ServiceCommand) -> WorkflowResult<String> {
        let view = match command {
            ServiceCommand::List => View::Book,
            _ => View::ServiceManager,
        };
        if let Some(redirect) = self.enter(view).await? {
            return Ok(redirect);
        }

        let manager = ServiceManager::new(self.state.clone());
        let services = match command {
            ServiceCommand::List => manager.refresh().await?,
            ServiceCommand::Add { name, price } => manager.create(&name, price).await?,
            ServiceCommand::Update { id, name, price } => {
                manager.update(id, &name, price).await?
            }
            ServiceCommand::Delete { id } => manager.delete(id).await?,
        };
        Ok(views::render_services(&services, self.symbol()))
    }
}
