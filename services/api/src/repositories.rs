//! Repositories wrapping the backend endpoints

use auth::models::{LoginCredentials, ProfileUpdate, Registration, TokenResponse};
use serde::Serialize;
use tracing::info;

use crate::client::HttpClient;
use crate::error::ApiResult;
use crate::models::{Service, ServiceDraft};

pub mod booking;
pub mod revenue;

pub use booking::BookingRepository;
pub use revenue::RevenueRepository;

/// Account endpoints under `/auth`
#[derive(Clone)]
pub struct AuthRepository {
    client: HttpClient,
}

impl AuthRepository {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for a token
    pub async fn login(&self, credentials: &LoginCredentials) -> ApiResult<TokenResponse> {
        info!("Login attempt for user: {}", credentials.email);
        self.client.post("/auth/login", credentials).await
    }

    /// Create an account
    pub async fn register(&self, registration: &Registration) -> ApiResult<()> {
        info!("Registering user: {}", registration.email);
        self.client.post_unit("/auth/register", registration).await
    }

    /// Update the current user's profile
    pub async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<()> {
        self.client.post_unit("/auth/update", update).await
    }

    /// Delete an account
    pub async fn delete_account(&self, user_id: i64) -> ApiResult<()> {
        info!("Deleting account {}", user_id);
        self.client
            .delete(&format!("/auth/delete/{}", user_id))
            .await
    }
}

/// Upsert body: the backend treats a `POST /services` carrying an id as an
/// update
#[derive(Serialize)]
struct ServiceUpsert<'a> {
    id: i64,
    name: &'a str,
    price: f64,
}

/// Service catalog endpoints
#[derive(Clone)]
pub struct ServiceRepository {
    client: HttpClient,
}

impl ServiceRepository {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Get the full catalog
    pub async fn list(&self) -> ApiResult<Vec<Service>> {
        self.client.get("/services").await
    }

    /// Create a new service
    pub async fn create(&self, draft: &ServiceDraft) -> ApiResult<()> {
        info!("Creating service {}", draft.name);
        self.client.post_unit("/services", draft).await
    }

    /// Update an existing service
    pub async fn update(&self, id: i64, draft: &ServiceDraft) -> ApiResult<()> {
        info!("Updating service {}", id);
        let body = ServiceUpsert {
            id,
            name: &draft.name,
            price: draft.price,
        };
        self.client.post_unit("/services", &body).await
    }

    /// Delete a service
    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        info!("Deleting service {}", id);
        self.client.delete(&format!("/services/{}", id)).await
    }
}
