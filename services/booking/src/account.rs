//! Account flows: registration, login, logout, profile and account removal

use api::ApiState;
use auth::models::{LoginCredentials, ProfileUpdate, Registration};
use auth::validation::{validate_credentials, validate_profile_update, validate_registration};
use auth::{UserClaims, View};
use tracing::{error, info};

use crate::error::{WorkflowError, WorkflowResult};

pub struct Account {
    state: ApiState,
}

impl Account {
    pub fn new(state: ApiState) -> Self {
        Self { state }
    }

    /// Register a new user; the caller continues on the login view
    pub async fn register(&self, registration: &Registration) -> WorkflowResult<View> {
        validate_registration(registration)?;
        self.state
            .auth
            .register(registration)
            .await
            .map_err(|e| {
                error!("Registration of {} failed: {}", registration.email, e);
                WorkflowError::RegistrationFailed(e)
            })?;
        info!("Registered {}", registration.email);
        Ok(View::Login)
    }

    /// Exchange credentials for a token and start the session
    pub async fn login(&self, credentials: &LoginCredentials) -> WorkflowResult<UserClaims> {
        validate_credentials(credentials)?;
        let response = self.state.auth.login(credentials).await.map_err(|e| {
            error!("Login of {} failed: {}", credentials.email, e);
            WorkflowError::LoginFailed(e)
        })?;
        Ok(self.state.session.login(&response.token)?)
    }

    pub fn logout(&self) -> WorkflowResult<View> {
        self.state.session.logout()?;
        Ok(View::Login)
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> WorkflowResult<()> {
        if !self.state.session.snapshot().is_authenticated() {
            return Err(WorkflowError::NotAuthenticated);
        }
        validate_profile_update(update)?;
        self.state.auth.update_profile(update).await?;
        info!("Updated profile of {}", update.email);
        Ok(())
    }

    /// Delete the current account and end the session
    pub async fn delete_account(&self, confirmed: bool) -> WorkflowResult<View> {
        let user = self
            .state
            .session
            .user()
            .ok_or(WorkflowError::NotAuthenticated)?;
        if !confirmed {
            return Err(WorkflowError::ConfirmationRequired);
        }
        let id = user.id.ok_or(WorkflowError::MissingIdentity)?;

        self.state.auth.delete_account(id).await?;
        info!("Deleted account {}", user.sub);

        self.logout()
    }
}
