//! In-memory stand-in for the lost-found listings service.
//!
//! Every response uses the service's envelope,
//! `{"success": bool, "message": string, "data": ...}`. Postings are listed
//! newest first. Only a posting's owner may update or delete it.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{FromRequestParts, Path, Query, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub mod config;

pub use config::{ConfigError, ServerConfig};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LostFound {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub status: String,
    pub is_completed: i32,
    pub cover: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub photo: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LostFoundForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: Option<String>,
}

/// Query string of `PUT /lost-founds/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateQuery {
    pub status: Option<String>,
    pub is_completed: Option<i32>,
}

/// Query string of `GET /lost-founds`.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub is_completed: Option<i32>,
    pub status: Option<String>,
}

/// Error responses, rendered as a failed envelope.
#[derive(Debug, thiserror::Error)]
pub enum Failure {
    #[error("{message}")]
    Invalid { field: &'static str, message: String },
    #[error("{0}")]
    Unauthorized(String),
    #[error("You can only change your own postings")]
    Forbidden,
    #[error("Lost-found not found")]
    NotFound,
}

impl Failure {
    fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Failure::Invalid {
            field,
            message: message.into(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Failure::Invalid { .. } => StatusCode::BAD_REQUEST,
            Failure::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Failure::Forbidden => StatusCode::FORBIDDEN,
            Failure::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let data = match &self {
            Failure::Invalid { field, .. } => json!({ "field": field }),
            _ => Value::Null,
        };
        tracing::debug!(error = %self, "request rejected");
        let body = json!({ "success": false, "message": self.to_string(), "data": data });
        (self.status(), Json(body)).into_response()
    }
}

fn ok(message: &str, data: Value) -> Json<Value> {
    Json(json!({ "success": true, "message": message, "data": data }))
}

struct Account {
    user: User,
    password: String,
}

#[derive(Default)]
struct Store {
    accounts: Vec<Account>,
    tokens: HashMap<String, i64>,
    lost_founds: BTreeMap<i64, LostFound>,
    next_user_id: i64,
    next_lost_found_id: i64,
}

impl Store {
    fn user(&self, id: i64) -> Option<&User> {
        self.accounts.iter().map(|a| &a.user).find(|u| u.id == id)
    }

    /// The posting, if it exists and `user_id` owns it.
    fn owned_mut(&mut self, id: i64, user_id: i64) -> Result<&mut LostFound, Failure> {
        let item = self.lost_founds.get_mut(&id).ok_or(Failure::NotFound)?;
        if item.user_id != user_id {
            return Err(Failure::Forbidden);
        }
        Ok(item)
    }
}

#[derive(Clone, Default)]
pub struct AppState {
    store: Arc<RwLock<Store>>,
}

/// The user a bearer token belongs to.
pub struct AuthUser(pub i64);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = Failure;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| Failure::Unauthorized("Missing bearer token".to_string()))?;
        let store = state.store.read().await;
        store
            .tokens
            .get(token)
            .copied()
            .map(AuthUser)
            .ok_or_else(|| Failure::Unauthorized("Token expired".to_string()))
    }
}

fn now() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn require(field: &'static str, label: &str, value: &str) -> Result<String, Failure> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Failure::invalid(field, format!("{label} is required")));
    }
    Ok(value.to_string())
}

/// Status is an open vocabulary stored as submitted; comparisons elsewhere
/// ignore case. Only a blank value is rejected.
fn check_status(status: Option<&str>) -> Result<Option<String>, Failure> {
    match status.map(str::trim) {
        None => Ok(None),
        Some("") => Err(Failure::invalid("status", "Status must not be blank")),
        Some(s) => Ok(Some(s.to_string())),
    }
}

pub fn app() -> Router {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/users/me", get(me))
        .route("/lost-founds", get(list_lost_founds).post(create_lost_found))
        .route(
            "/lost-founds/{id}",
            get(get_lost_found).put(update_lost_found).delete(delete_lost_found),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::default())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "mock server listening");
    }
    axum::serve(listener, app()).await
}

async fn register(
    State(state): State<AppState>,
    Form(input): Form<RegisterForm>,
) -> Result<Json<Value>, Failure> {
    let name = require("name", "Name", &input.name)?;
    let email = require("email", "Email", &input.email)?;
    if input.password.is_empty() {
        return Err(Failure::invalid("password", "Password is required"));
    }

    let mut store = state.store.write().await;
    if store.accounts.iter().any(|a| a.user.email == email) {
        return Err(Failure::invalid("email", "Email is already registered"));
    }
    store.next_user_id += 1;
    let id = store.next_user_id;
    store.accounts.push(Account {
        user: User {
            id,
            name,
            email,
            photo: None,
        },
        password: input.password,
    });
    Ok(ok("User registered", json!({ "user_id": id })))
}

async fn login(
    State(state): State<AppState>,
    Form(input): Form<LoginForm>,
) -> Result<Json<Value>, Failure> {
    let mut store = state.store.write().await;
    let user_id = store
        .accounts
        .iter()
        .find(|a| a.user.email == input.email.trim() && a.password == input.password)
        .map(|a| a.user.id)
        .ok_or_else(|| Failure::invalid("email", "Email or password is incorrect"))?;
    let token = Uuid::new_v4().to_string();
    store.tokens.insert(token.clone(), user_id);
    Ok(ok("Logged in", json!({ "token": token })))
}

async fn me(State(state): State<AppState>, AuthUser(user_id): AuthUser) -> Result<Json<Value>, Failure> {
    let store = state.store.read().await;
    let user = store
        .user(user_id)
        .ok_or_else(|| Failure::Unauthorized("Token expired".to_string()))?;
    Ok(ok("ok", json!({ "user": user })))
}

async fn create_lost_found(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Form(input): Form<LostFoundForm>,
) -> Result<Json<Value>, Failure> {
    let title = require("title", "Title", &input.title)?;
    let description = require("description", "Description", &input.description)?;
    let status = check_status(input.status.as_deref())?.unwrap_or_else(|| "lost".to_string());

    let mut store = state.store.write().await;
    store.next_lost_found_id += 1;
    let id = store.next_lost_found_id;
    store.lost_founds.insert(
        id,
        LostFound {
            id,
            user_id,
            title,
            description,
            status,
            is_completed: 0,
            cover: None,
            created_at: now(),
            updated_at: None,
        },
    );
    tracing::debug!(id, user_id, "lost-found created");
    Ok(ok("Lost-found created", json!({ "lost_found_id": id })))
}

async fn list_lost_founds(
    State(state): State<AppState>,
    _: AuthUser,
    Query(query): Query<ListQuery>,
) -> Json<Value> {
    let store = state.store.read().await;
    let items: Vec<&LostFound> = store
        .lost_founds
        .values()
        .rev()
        .filter(|item| {
            query
                .is_completed
                .map_or(true, |wanted| (item.is_completed == 1) == (wanted == 1))
        })
        .filter(|item| query.status.as_deref().map_or(true, |s| item.status.eq_ignore_ascii_case(s)))
        .collect();
    ok("ok", json!({ "lost_founds": items }))
}

async fn get_lost_found(
    State(state): State<AppState>,
    _: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>, Failure> {
    let store = state.store.read().await;
    let item = store.lost_founds.get(&id).ok_or(Failure::NotFound)?;
    Ok(ok("ok", json!({ "lost_found": item })))
}

async fn update_lost_found(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
    Query(query): Query<UpdateQuery>,
    Form(input): Form<LostFoundForm>,
) -> Result<Json<Value>, Failure> {
    let mut store = state.store.write().await;
    let item = store.owned_mut(id, user_id)?;
    let title = require("title", "Title", &input.title)?;
    let description = require("description", "Description", &input.description)?;
    let status = check_status(query.status.as_deref())?;

    item.title = title;
    item.description = description;
    if let Some(status) = status {
        item.status = status;
    }
    if let Some(completed) = query.is_completed {
        item.is_completed = i32::from(completed == 1);
    }
    item.updated_at = Some(now());
    tracing::debug!(id, is_completed = item.is_completed, "lost-found updated");
    Ok(ok("Lost-found updated", Value::Null))
}

async fn delete_lost_found(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>, Failure> {
    let mut store = state.store.write().await;
    store.owned_mut(id, user_id)?;
    store.lost_founds.remove(&id);
    tracing::debug!(id, "lost-found deleted");
    Ok(ok("Lost-found deleted", Value::Null))
}
