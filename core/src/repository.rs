//! Turns API calls into observable results.
//!
//! # Design
//! Each repository method is one operation and returns one `LiveResult`.
//! The result is set to `Loading` before the method returns; the HTTP
//! round-trip then runs on a background thread through the injected
//! `Transport`, and the terminal value is posted to the UI thread's
//! `Looper`. Screens receive the repository through their constructors.

use std::sync::{Arc, RwLock};
use std::thread;

use crate::client::LostFoundClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::live::LiveResult;
use crate::looper::LooperHandle;
use crate::result::AsyncResult;
use crate::types::{
    CreateLostFound, ListFilter, LoginRequest, LostFound, RegisterRequest, UpdateLostFound, User,
};

/// Executes an `HttpRequest`. Implementations report failures that never
/// produced a response as `ApiError::Network`; every HTTP status, including
/// 4xx/5xx, is returned as an `HttpResponse`.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

#[derive(Clone)]
pub struct LostFoundRepository {
    client: Arc<RwLock<LostFoundClient>>,
    transport: Arc<dyn Transport>,
    looper: LooperHandle,
}

impl LostFoundRepository {
    pub fn new(client: LostFoundClient, transport: Arc<dyn Transport>, looper: LooperHandle) -> Self {
        Self {
            client: Arc::new(RwLock::new(client)),
            transport,
            looper,
        }
    }

    /// Snapshot of the client, including the current token.
    pub fn client(&self) -> LostFoundClient {
        self.client
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.client().token().is_some()
    }

    pub fn logout(&self) {
        self.set_token(None);
    }

    fn set_token(&self, token: Option<String>) {
        self.client
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .set_token(token);
    }

    pub fn register(&self, input: RegisterRequest) -> LiveResult<()> {
        self.launch("register", move |client, transport| {
            let response = transport.execute(client.build_register(&input))?;
            client.parse_register(response)
        })
    }

    /// Log in and keep the issued token for every later operation.
    pub fn login(&self, input: LoginRequest) -> LiveResult<String> {
        let shared = Arc::clone(&self.client);
        self.launch("login", move |client, transport| {
            let response = transport.execute(client.build_login(&input))?;
            let token = client.parse_login(response)?;
            shared
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .set_token(Some(token.clone()));
            Ok(token)
        })
    }

    pub fn me(&self) -> LiveResult<User> {
        self.launch("me", |client, transport| {
            let response = transport.execute(client.build_me())?;
            client.parse_me(response)
        })
    }

    /// Resolves to the id the server assigned.
    pub fn create_lost_found(&self, input: CreateLostFound) -> LiveResult<i64> {
        self.launch("create_lost_found", move |client, transport| {
            let response = transport.execute(client.build_create_lost_found(&input))?;
            client.parse_create_lost_found(response)
        })
    }

    pub fn update_lost_found(&self, id: i64, input: UpdateLostFound) -> LiveResult<()> {
        self.launch("update_lost_found", move |client, transport| {
            let response = transport.execute(client.build_update_lost_found(id, &input))?;
            client.parse_update_lost_found(response)
        })
    }

    pub fn list_lost_founds(&self, filter: ListFilter) -> LiveResult<Vec<LostFound>> {
        self.launch("list_lost_founds", move |client, transport| {
            let response = transport.execute(client.build_list_lost_founds(&filter))?;
            client.parse_list_lost_founds(response)
        })
    }

    pub fn get_lost_found(&self, id: i64) -> LiveResult<LostFound> {
        self.launch("get_lost_found", move |client, transport| {
            let response = transport.execute(client.build_get_lost_found(id))?;
            client.parse_get_lost_found(response)
        })
    }

    pub fn delete_lost_found(&self, id: i64) -> LiveResult<()> {
        self.launch("delete_lost_found", move |client, transport| {
            let response = transport.execute(client.build_delete_lost_found(id))?;
            client.parse_delete_lost_found(response)
        })
    }

    fn launch<T, F>(&self, operation: &'static str, work: F) -> LiveResult<T>
    where
        T: Clone + Send + 'static,
        F: FnOnce(&LostFoundClient, &dyn Transport) -> Result<T, ApiError> + Send + 'static,
    {
        let live = LiveResult::loading();
        let publisher = live.clone();
        let client = self.client();
        let transport = Arc::clone(&self.transport);
        let looper = self.looper.clone();

        tracing::debug!(operation, "starting request");
        thread::spawn(move || {
            let outcome = work(&client, transport.as_ref());
            if let Err(err) = &outcome {
                tracing::warn!(operation, error = %err, "request failed");
            }
            let result = AsyncResult::from(outcome);
            if !looper.post(move || publisher.set_value(result)) {
                tracing::debug!(operation, "looper closed; dropping result");
            }
        });
        live
    }
}
