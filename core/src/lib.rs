//! Client core for the lost-found listings service.
//!
//! # Overview
//! `client` builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network (host-does-IO pattern). On top of it,
//! `repository` runs operations through an injected `Transport` and exposes
//! each one as a `LiveResult` that moves from `Loading` to `Success` or
//! `Error`. Results are delivered on the UI thread's `Looper` and observed at
//! most once per subscription.
//!
//! # Design
//! - `LostFoundClient` holds only `base_url` and the bearer token.
//! - `detail::DetailScreen` and `list::ListSession` hold screen state; the
//!   detail machine is pure and returns effects for its driver to run.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod detail;
pub mod error;
pub mod highlight;
pub mod http;
pub mod list;
pub mod live;
pub mod looper;
pub mod repository;
pub mod result;
pub mod types;

pub use client::LostFoundClient;
pub use config::ClientConfig;
pub use detail::{
    ChangeTracking, DetailEffect, DetailEvent, DetailScreen, DetailSession, ScreenResult,
    RESULT_CANCELED, RESULT_CODE,
};
pub use error::ApiError;
pub use highlight::{highlight_status, Color, HighlightedText, StatusTone};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use list::ListSession;
pub use live::{Lifecycle, LiveResult};
pub use looper::{Looper, LooperHandle};
pub use repository::{LostFoundRepository, Transport};
pub use result::AsyncResult;
pub use types::{
    CreateLostFound, ListFilter, LoginRequest, LostFound, LostFoundItem, RegisterRequest,
    UpdateLostFound, User,
};
