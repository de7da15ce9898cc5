//! Authentication module for managing the user session and credentials.
//!
//! This module provides:
//! - `Session`: the single bearer credential and profile, persisted to disk
//! - `UnauthorizedHandler` / `SessionReset`: what happens when the server
//!   rejects the credential
//! - `CredentialStore`: remembered login passwords via the OS keyring
//!
//! Tokens do not expire client-side; the server decides, and a 401 clears
//! the session.

pub mod credentials;
pub mod session;
pub mod unauthorized;

pub use credentials::CredentialStore;
pub use session::{Session, SessionData};
pub use unauthorized::{SessionReset, UnauthorizedHandler};
