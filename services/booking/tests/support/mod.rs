//! In-process salon backend used by the integration tests
//!
//! Keeps services and bookings in memory, mints HS256 tokens on login and
//! checks the bearer token of every protected route.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use chrono::{Local, NaiveDateTime};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const PASSWORD: &str = "secret1";
pub const ADMIN_EMAIL: &str = "leila@salon.com";
pub const ADMIN_ID: i64 = 1;
pub const CLIENT_EMAIL: &str = "ana@mail.com";
pub const CLIENT_ID: i64 = 7;
pub const OTHER_CLIENT_ID: i64 = 8;

const SECRET: &[u8] = b"backend-secret";
const WIRE: &str = "%Y-%m-%dT%H:%M:%S";

pub fn token_for(email: &str, role: &str, id: i64) -> String {
    encode(
        &Header::default(),
        &json!({"sub": email, "role": role, "id": id, "name": email.split('@').next()}),
        &EncodingKey::from_secret(SECRET),
    )
    .unwrap()
}

pub fn admin_token() -> String {
    token_for(ADMIN_EMAIL, "ADMIN", ADMIN_ID)
}

pub fn client_token() -> String {
    token_for(CLIENT_EMAIL, "USER", CLIENT_ID)
}

/// Local date-time `days` and one hour from now, at whole seconds
pub fn days_from_now(days: i64) -> NaiveDateTime {
    let now = Local::now().naive_local() + chrono::Duration::days(days) + chrono::Duration::hours(1);
    NaiveDateTime::parse_from_str(&now.format(WIRE).to_string(), WIRE).unwrap()
}

#[derive(Debug, Clone, Deserialize)]
struct Caller {
    sub: String,
    role: String,
    id: i64,
}

impl Caller {
    fn is_admin(&self) -> bool {
        self.role == "ADMIN"
    }
}

#[derive(Default)]
pub struct Backend {
    pub services: Vec<Value>,
    pub bookings: Vec<Value>,
    pub registered: Vec<String>,
    pub deleted_accounts: Vec<i64>,
    pub profile_updates: Vec<Value>,
    pub last_booking_request: Option<Value>,
    pub last_replacement: Option<Value>,
    /// When set, the first client booking fetch is answered after this delay
    /// with the bookings as they were when it arrived
    pub slow_first_client_fetch: Option<Duration>,
    client_fetches: usize,
    next_id: i64,
}

pub type Shared = Arc<Mutex<Backend>>;

fn lock(shared: &Shared) -> MutexGuard<'_, Backend> {
    shared.lock().unwrap()
}

fn service_json(id: i64, name: &str, price: f64) -> Value {
    json!({"id": id, "name": name, "price": price})
}

impl Backend {
    /// Catalog of three services and bookings one, three and five days out
    pub fn seeded() -> Self {
        let mut backend = Backend {
            services: vec![
                service_json(1, "Corte", 50.0),
                service_json(2, "Escova", 30.0),
                service_json(3, "Manicure", 35.0),
            ],
            next_id: 100,
            ..Default::default()
        };
        backend.insert_booking(10, CLIENT_ID, days_from_now(1), &[1]);
        backend.insert_booking(11, CLIENT_ID, days_from_now(3), &[1, 2]);
        backend.insert_booking(12, OTHER_CLIENT_ID, days_from_now(5), &[3]);
        backend
    }

    fn service(&self, id: i64) -> Option<Value> {
        self.services.iter().find(|s| s["id"] == id).cloned()
    }

    pub fn insert_booking(&mut self, id: i64, client: i64, at: NaiveDateTime, services: &[i64]) {
        let services: Vec<Value> = services.iter().filter_map(|id| self.service(*id)).collect();
        let total: f64 = services.iter().filter_map(|s| s["price"].as_f64()).sum();
        self.bookings.push(json!({
            "id": id,
            "scheduledDate": at.format(WIRE).to_string(),
            "status": "CONFIRMED",
            "notes": "",
            "services": services,
            "totalAmount": total,
            "client": {"id": client, "name": format!("Client {}", client)},
        }));
    }

    pub fn booking(&self, id: i64) -> Option<&Value> {
        self.bookings.iter().find(|b| b["id"] == id)
    }

    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn resolve_services(&self, refs: &Value) -> Vec<Value> {
        refs.as_array()
            .map(|refs| {
                refs.iter()
                    .filter_map(|r| r["id"].as_i64())
                    .filter_map(|id| self.service(id))
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn caller(bearer: Option<TypedHeader<Authorization<Bearer>>>) -> Result<Caller, StatusCode> {
    let TypedHeader(auth) = bearer.ok_or(StatusCode::UNAUTHORIZED)?;
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.required_spec_claims.clear();
    decode::<Caller>(auth.token(), &DecodingKey::from_secret(SECRET), &validation)
        .map(|data| data.claims)
        .map_err(|_| StatusCode::UNAUTHORIZED)
}

fn admin(bearer: Option<TypedHeader<Authorization<Bearer>>>) -> Result<Caller, StatusCode> {
    let caller = caller(bearer)?;
    if !caller.is_admin() {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(caller)
}

type MaybeBearer = Option<TypedHeader<Authorization<Bearer>>>;

async fn login(Json(body): Json<Value>) -> Result<Json<Value>, StatusCode> {
    if body["password"] != PASSWORD {
        return Err(StatusCode::UNAUTHORIZED);
    }
    match body["email"].as_str() {
        Some(ADMIN_EMAIL) => Ok(Json(json!({"token": admin_token()}))),
        Some(CLIENT_EMAIL) => Ok(Json(json!({"token": client_token()}))),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

async fn register(State(shared): State<Shared>, Json(body): Json<Value>) -> StatusCode {
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let mut backend = lock(&shared);
    if email == ADMIN_EMAIL || email == CLIENT_EMAIL || backend.registered.contains(&email) {
        return StatusCode::CONFLICT;
    }
    backend.registered.push(email);
    StatusCode::CREATED
}

async fn update_profile(
    State(shared): State<Shared>,
    bearer: MaybeBearer,
    Json(body): Json<Value>,
) -> StatusCode {
    if caller(bearer).is_err() {
        return StatusCode::UNAUTHORIZED;
    }
    lock(&shared).profile_updates.push(body);
    StatusCode::OK
}

async fn delete_account(
    State(shared): State<Shared>,
    bearer: MaybeBearer,
    Path(id): Path<i64>,
) -> StatusCode {
    match caller(bearer) {
        Ok(caller) if caller.id == id => {
            lock(&shared).deleted_accounts.push(id);
            StatusCode::NO_CONTENT
        }
        Ok(_) => StatusCode::FORBIDDEN,
        Err(status) => status,
    }
}

async fn list_services(
    State(shared): State<Shared>,
    bearer: MaybeBearer,
) -> Result<Json<Value>, StatusCode> {
    caller(bearer)?;
    Ok(Json(Value::Array(lock(&shared).services.clone())))
}

async fn upsert_service(
    State(shared): State<Shared>,
    bearer: MaybeBearer,
    Json(body): Json<Value>,
) -> Result<StatusCode, StatusCode> {
    admin(bearer)?;
    let mut backend = lock(&shared);
    match body["id"].as_i64() {
        Some(id) => {
            let service = backend
                .services
                .iter_mut()
                .find(|s| s["id"] == id)
                .ok_or(StatusCode::NOT_FOUND)?;
            *service = body;
            Ok(StatusCode::OK)
        }
        None => {
            let id = backend.next_id();
            let mut service = body;
            service["id"] = json!(id);
            backend.services.push(service);
            Ok(StatusCode::CREATED)
        }
    }
}

async fn delete_service(
    State(shared): State<Shared>,
    bearer: MaybeBearer,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    admin(bearer)?;
    let mut backend = lock(&shared);
    let before = backend.services.len();
    backend.services.retain(|s| s["id"] != id);
    if backend.services.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn list_bookings(
    State(shared): State<Shared>,
    bearer: MaybeBearer,
) -> Result<Json<Value>, StatusCode> {
    admin(bearer)?;
    Ok(Json(Value::Array(lock(&shared).bookings.clone())))
}

async fn client_bookings(
    State(shared): State<Shared>,
    bearer: MaybeBearer,
    Path(client_id): Path<i64>,
) -> Result<Json<Value>, StatusCode> {
    let caller = caller(bearer)?;
    if caller.id != client_id && !caller.is_admin() {
        return Err(StatusCode::FORBIDDEN);
    }

    let (own, delay) = {
        let mut backend = lock(&shared);
        backend.client_fetches += 1;
        let delay = if backend.client_fetches == 1 {
            backend.slow_first_client_fetch
        } else {
            None
        };
        let own: Vec<Value> = backend
            .bookings
            .iter()
            .filter(|b| b["client"]["id"] == client_id)
            .cloned()
            .collect();
        (own, delay)
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    Ok(Json(Value::Array(own)))
}

async fn create_booking(
    State(shared): State<Shared>,
    bearer: MaybeBearer,
    Json(body): Json<Value>,
) -> Result<StatusCode, StatusCode> {
    let caller = caller(bearer)?;
    if body["client"]["id"] != caller.id {
        return Err(StatusCode::FORBIDDEN);
    }

    let mut backend = lock(&shared);
    let id = backend.next_id();
    let services = backend.resolve_services(&body["services"]);
    let total: f64 = body["services"]
        .as_array()
        .map(|refs| refs.iter().filter_map(|r| r["price"].as_f64()).sum())
        .unwrap_or_default();
    backend.bookings.push(json!({
        "id": id,
        "scheduledDate": body["scheduledDate"],
        "status": body["status"],
        "notes": body["notes"],
        "services": services,
        "totalAmount": total,
        "client": {"id": caller.id},
    }));
    backend.last_booking_request = Some(body);
    Ok(StatusCode::CREATED)
}

async fn get_booking(
    State(shared): State<Shared>,
    bearer: MaybeBearer,
    Path(id): Path<i64>,
) -> Result<Json<Value>, StatusCode> {
    caller(bearer)?;
    lock(&shared)
        .booking(id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn put_booking(
    State(shared): State<Shared>,
    bearer: MaybeBearer,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    caller(bearer)?;
    let mut backend = lock(&shared);
    let services = backend.resolve_services(&body["services"]);
    let booking = backend
        .bookings
        .iter_mut()
        .find(|b| b["id"] == id)
        .ok_or(StatusCode::NOT_FOUND)?;

    booking["scheduledDate"] = body["scheduledDate"].clone();
    booking["notes"] = body["notes"].clone();
    booking["services"] = json!(services);
    if body.get("status").is_some() {
        booking["status"] = body["status"].clone();
        booking["totalAmount"] = body["totalAmount"].clone();
    }
    let updated = booking.clone();
    if body.get("totalAmount").is_some() {
        backend.last_replacement = Some(body);
    }
    Ok(Json(updated))
}

async fn delete_booking(
    State(shared): State<Shared>,
    bearer: MaybeBearer,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    admin(bearer)?;
    let mut backend = lock(&shared);
    let before = backend.bookings.len();
    backend.bookings.retain(|b| b["id"] != id);
    if backend.bookings.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn revenue(
    State(shared): State<Shared>,
    bearer: MaybeBearer,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    admin(bearer)?;
    let backend = lock(&shared);

    let day = |b: &Value| b["scheduledDate"].as_str().unwrap_or_default()[..10].to_string();
    let amount = |b: &Value| b["totalAmount"].as_f64().unwrap_or_default();

    if params.is_empty() {
        let total: f64 = backend.bookings.iter().map(amount).sum();
        return Ok(Json(json!(total)));
    }

    let start = params.get("startDate").map(|s| s[..10].to_string());
    let end = params.get("endDate").map(|s| s[..10].to_string());
    let mut per_day: BTreeMap<String, f64> = BTreeMap::new();
    for booking in &backend.bookings {
        let date = day(booking);
        if start.as_ref().is_some_and(|s| &date < s) || end.as_ref().is_some_and(|e| &date > e) {
            continue;
        }
        *per_day.entry(date).or_default() += amount(booking);
    }
    Ok(Json(Value::Array(
        per_day
            .into_iter()
            .map(|(date, revenue)| json!({"date": date, "revenue": revenue}))
            .collect(),
    )))
}

/// Serve `backend` on an ephemeral port; returns its base URL and state
pub async fn spawn(backend: Backend) -> (String, Shared) {
    let shared: Shared = Arc::new(Mutex::new(backend));
    let app = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/update", post(update_profile))
        .route("/auth/delete/:id", delete(delete_account))
        .route("/services", get(list_services).post(upsert_service))
        .route("/services/:id", delete(delete_service))
        .route("/bookings", get(list_bookings).post(create_booking))
        .route("/bookings/revenue", get(revenue))
        .route("/bookings/client/:id", get(client_bookings))
        .route(
            "/bookings/:id",
            get(get_booking).put(put_booking).delete(delete_booking),
        )
        .with_state(shared.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), shared)
}
