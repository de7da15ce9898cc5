//! REST API client module for SpEd Connect services.
//!
//! This module provides the `ApiClient` through which every backend call is
//! made, plus typed wrappers for each endpoint.
//!
//! The API authenticates with an opaque token sent in the `Authorization`
//! header; the token is obtained from the login endpoint.

pub mod calls;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod payload;

pub use calls::DEFAULT_PER_PAGE;
pub use client::{ApiClient, ApiRequest, AuthScheme};
pub use error::ApiError;
pub use payload::Payload;
