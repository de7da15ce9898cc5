//! SpEd Connect core library.
//!
//! Provides the authenticated API client, the session store it reads the
//! credential from, and the models for every backend payload.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod navigation;
pub mod utils;

pub use api::{ApiClient, ApiError, ApiRequest, AuthScheme, Payload};
pub use auth::{CredentialStore, Session, SessionData, SessionReset, UnauthorizedHandler};
pub use config::Config;
pub use navigation::{History, Navigator, Route};
