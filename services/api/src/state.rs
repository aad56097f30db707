//! Client state shared across views

use std::time::Duration;

use auth::SessionStore;
use common::ClientConfig;
use common::config::DEFAULT_REQUEST_TIMEOUT_SECS;

use crate::client::HttpClient;
use crate::error::ApiResult;
use crate::repositories::{AuthRepository, BookingRepository, RevenueRepository, ServiceRepository};

/// Session plus one repository per backend area, all sharing one client
#[derive(Clone)]
pub struct ApiState {
    pub session: SessionStore,
    pub auth: AuthRepository,
    pub services: ServiceRepository,
    pub bookings: BookingRepository,
    pub revenue: RevenueRepository,
}

impl ApiState {
    pub fn new(base_url: &str, session: SessionStore) -> ApiResult<Self> {
        Self::with_timeout(
            base_url,
            session,
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    pub fn with_timeout(
        base_url: &str,
        session: SessionStore,
        timeout: Duration,
    ) -> ApiResult<Self> {
        let client = HttpClient::new(base_url, session.clone(), timeout)?;

        Ok(Self {
            session,
            auth: AuthRepository::new(client.clone()),
            services: ServiceRepository::new(client.clone()),
            bookings: BookingRepository::new(client.clone()),
            revenue: RevenueRepository::new(client),
        })
    }

    pub fn from_config(config: &ClientConfig, session: SessionStore) -> ApiResult<Self> {
        Self::with_timeout(
            &config.base_url,
            session,
            Duration::from_secs(config.request_timeout_secs),
        )
    }
}
