//! Stateless HTTP request builder and response parser for the lost-found API.
//!
//! # Design
//! `LostFoundClient` holds a `base_url` and an optional bearer token and
//! carries no other state between calls. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`. Bodies are form-encoded; update puts
//! status and completion in the query string, which is what the service
//! expects.

use serde::de::{DeserializeOwned, IgnoredAny};
use url::form_urlencoded;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    CreateLostFound, CreatedData, Envelope, ListFilter, LoginData, LoginRequest, LostFound,
    LostFoundData, LostFoundsData, RegisterRequest, UpdateLostFound, User, UserData,
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Synchronous, stateless client for the lost-found API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LostFoundClient {
    base_url: String,
    token: Option<String>,
}

impl LostFoundClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token.filter(|t| !t.is_empty());
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // --- auth ---

    pub fn build_register(&self, input: &RegisterRequest) -> HttpRequest {
        let body = encode_pairs(&[
            ("name", input.name.as_str()),
            ("email", input.email.as_str()),
            ("password", input.password.as_str()),
        ]);
        self.form_request(HttpMethod::Post, "auth/register", body, false)
    }

    pub fn build_login(&self, input: &LoginRequest) -> HttpRequest {
        let body = encode_pairs(&[
            ("email", input.email.as_str()),
            ("password", input.password.as_str()),
        ]);
        self.form_request(HttpMethod::Post, "auth/login", body, false)
    }

    pub fn build_me(&self) -> HttpRequest {
        self.plain_request(HttpMethod::Get, "users/me".to_string())
    }

    // --- lost-founds ---

    pub fn build_create_lost_found(&self, input: &CreateLostFound) -> HttpRequest {
        let mut pairs = vec![
            ("title", input.title.as_str()),
            ("description", input.description.as_str()),
        ];
        if let Some(status) = input.status.as_deref() {
            pairs.push(("status", status));
        }
        self.form_request(HttpMethod::Post, "lost-founds", encode_pairs(&pairs), true)
    }

    pub fn build_update_lost_found(&self, id: i64, input: &UpdateLostFound) -> HttpRequest {
        let body = encode_pairs(&[
            ("title", input.title.as_str()),
            ("description", input.description.as_str()),
        ]);
        let completed = input.is_completed.map(flag);
        let mut query = Vec::new();
        if let Some(status) = input.status.as_deref() {
            query.push(("status", status));
        }
        if let Some(completed) = completed {
            query.push(("is_completed", completed));
        }
        let path = with_query(format!("lost-founds/{id}"), &query);
        self.form_request(HttpMethod::Put, &path, body, true)
    }

    pub fn build_list_lost_founds(&self, filter: &ListFilter) -> HttpRequest {
        let completed = filter.is_completed.map(flag);
        let mut query = Vec::new();
        if let Some(completed) = completed {
            query.push(("is_completed", completed));
        }
        if let Some(status) = filter.status.as_deref() {
            query.push(("status", status));
        }
        self.plain_request(HttpMethod::Get, with_query("lost-founds".to_string(), &query))
    }

    pub fn build_get_lost_found(&self, id: i64) -> HttpRequest {
        self.plain_request(HttpMethod::Get, format!("lost-founds/{id}"))
    }

    pub fn build_delete_lost_found(&self, id: i64) -> HttpRequest {
        self.plain_request(HttpMethod::Delete, format!("lost-founds/{id}"))
    }

    // --- parsing ---

    pub fn parse_register(&self, response: HttpResponse) -> Result<(), ApiError> {
        parse_status(&response)
    }

    /// Returns the bearer token issued by the server.
    pub fn parse_login(&self, response: HttpResponse) -> Result<String, ApiError> {
        parse_data::<LoginData>(&response).map(|data| data.token)
    }

    pub fn parse_me(&self, response: HttpResponse) -> Result<User, ApiError> {
        parse_data::<UserData>(&response).map(|data| data.user)
    }

    /// Returns the id the server assigned to the new posting.
    pub fn parse_create_lost_found(&self, response: HttpResponse) -> Result<i64, ApiError> {
        parse_data::<CreatedData>(&response).map(|data| data.lost_found_id)
    }

    pub fn parse_update_lost_found(&self, response: HttpResponse) -> Result<(), ApiError> {
        parse_status(&response)
    }

    pub fn parse_list_lost_founds(&self, response: HttpResponse) -> Result<Vec<LostFound>, ApiError> {
        parse_data::<LostFoundsData>(&response).map(|data| data.lost_founds)
    }

    pub fn parse_get_lost_found(&self, response: HttpResponse) -> Result<LostFound, ApiError> {
        parse_data::<LostFoundData>(&response).map(|data| data.lost_found)
    }

    pub fn parse_delete_lost_found(&self, response: HttpResponse) -> Result<(), ApiError> {
        parse_status(&response)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    fn auth_headers(&self) -> Vec<(String, String)> {
        match &self.token {
            Some(token) => vec![("authorization".to_string(), format!("Bearer {token}"))],
            None => Vec::new(),
        }
    }

    fn plain_request(&self, method: HttpMethod, path: String) -> HttpRequest {
        HttpRequest {
            method,
            path: self.url(&path),
            headers: self.auth_headers(),
            body: None,
        }
    }

    fn form_request(&self, method: HttpMethod, path: &str, body: String, authed: bool) -> HttpRequest {
        let mut headers = if authed { self.auth_headers() } else { Vec::new() };
        headers.push(("content-type".to_string(), FORM_CONTENT_TYPE.to_string()));
        HttpRequest {
            method,
            path: self.url(path),
            headers,
            body: Some(body),
        }
    }
}

fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

fn encode_pairs(pairs: &[(&str, &str)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

fn with_query(path: String, query: &[(&str, &str)]) -> String {
    if query.is_empty() {
        return path;
    }
    format!("{path}?{}", encode_pairs(query))
}

fn parse_envelope<T: DeserializeOwned>(response: &HttpResponse) -> Result<Envelope<T>, ApiError> {
    check_status(response)?;
    let envelope: Envelope<T> = serde_json::from_str(&response.body)
        .map_err(|e| ApiError::Deserialization(e.to_string()))?;
    if !envelope.success {
        return Err(ApiError::Validation {
            status: response.status,
            field: None,
            message: envelope.message,
        });
    }
    Ok(envelope)
}

fn parse_data<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    parse_envelope::<T>(response)?
        .data
        .ok_or_else(|| ApiError::Deserialization("response envelope carried no data".to_string()))
}

fn parse_status(response: &HttpResponse) -> Result<(), ApiError> {
    parse_envelope::<IgnoredAny>(response).map(|_| ())
}

/// Map non-success status codes to the appropriate `ApiError` variant,
/// preferring the message from the server's error envelope.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let parsed: Option<serde_json::Value> = serde_json::from_str(&response.body).ok();
    let server_message = parsed
        .as_ref()
        .and_then(|v| v.get("message"))
        .and_then(|m| m.as_str())
        .map(str::to_string);
    let field = parsed
        .as_ref()
        .and_then(|v| v.get("data"))
        .and_then(|d| d.get("field"))
        .and_then(|f| f.as_str())
        .map(str::to_string);
    let message = server_message.unwrap_or_else(|| {
        if response.body.trim().is_empty() {
            default_message(response.status).to_string()
        } else {
            response.body.clone()
        }
    });

    Err(match response.status {
        status @ (400 | 422) => ApiError::Validation { status, field, message },
        status @ (401 | 403) => ApiError::Unauthorized { status, message },
        404 => ApiError::NotFound(message),
        status => ApiError::Unknown { status, message },
    })
}

fn default_message(status: u16) -> &'static str {
    match status {
        401 | 403 => "not authorized",
        404 => "resource not found",
        400 | 422 => "invalid request",
        _ => "request failed",
    }
}
