//! Authenticated HTTP client for the SpEd Connect REST API.
//!
//! Every call goes through [`ApiClient::send`], which applies the same
//! policy to all of them:
//!
//! - the `Authorization` header is filled from the caller, then the session,
//!   then left empty (the login endpoint is never decorated),
//! - a successful response yields only the `data` member of its JSON body,
//! - a 401 runs the injected [`UnauthorizedHandler`] and is still returned
//!   to the caller. Nothing is retried.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Client, Method, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::{Session, UnauthorizedHandler};

use super::{endpoints, ApiError};

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// How the stored token is written into the `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthScheme {
    /// The token verbatim, as the SpEd Connect backend expects
    #[default]
    Raw,
    /// `Bearer <token>`
    Bearer,
}

impl AuthScheme {
    fn header_value(self, token: &str) -> String {
        match self {
            AuthScheme::Raw => token.to_string(),
            AuthScheme::Bearer => format!("Bearer {}", token),
        }
    }
}

/// A single outbound call, described relative to the API base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    body: Option<Value>,
    authorization: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            segments: Vec::new(),
            query: Vec::new(),
            body: None,
            authorization: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Append one path segment, such as a record id. It is percent-encoded,
    /// so `/`, `?` and dot segments stay inside it.
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Send this exact `Authorization` value instead of the session token.
    /// An empty value counts as not supplied.
    pub fn authorization(mut self, value: impl Into<String>) -> Self {
        self.authorization = Some(value.into());
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// API client for SpEd Connect.
/// Clone is cheap - reqwest::Client and the session are shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    login_path: String,
    scheme: AuthScheme,
    session: Arc<Session>,
    on_unauthorized: Arc<dyn UnauthorizedHandler>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("login_path", &self.login_path)
            .field("scheme", &self.scheme)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new API client
    pub fn new(
        base_url: &str,
        session: Arc<Session>,
        on_unauthorized: impl UnauthorizedHandler + 'static,
    ) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url,
            login_path: endpoints::LOGIN.to_string(),
            scheme: AuthScheme::default(),
            session,
            on_unauthorized: Arc::new(on_unauthorized),
        })
    }

    pub fn with_scheme(mut self, scheme: AuthScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Override the path exempt from token attachment.
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Resolve a request against the base URL, one encoded segment at a time.
    fn url(&self, request: &ApiRequest) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ApiError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase)
            })?;
            segments.pop_if_empty();
            for segment in request.path.split('/').filter(|s| !s.is_empty()) {
                segments.push(segment);
            }
            for segment in &request.segments {
                segments.push(segment);
            }
        }
        Ok(url)
    }

    /// Compare resolved paths so nothing but the login endpoint itself is exempt.
    fn is_login(&self, url: &Url) -> bool {
        match self.url(&ApiRequest::post(self.login_path.as_str())) {
            Ok(login) => url.path().trim_end_matches('/') == login.path().trim_end_matches('/'),
            Err(_) => false,
        }
    }

    /// Resolve the `Authorization` value for an outbound request.
    ///
    /// `None` leaves the header off entirely, which only happens for a login
    /// request without an explicit value.
    pub fn authorization_for(&self, request: &ApiRequest) -> Result<Option<String>, ApiError> {
        let url = self.url(request)?;
        Ok(self.resolve_authorization(request, &url))
    }

    fn resolve_authorization(&self, request: &ApiRequest, url: &Url) -> Option<String> {
        if self.is_login(url) {
            return request.authorization.clone();
        }
        let explicit = request.authorization.as_deref().filter(|v| !v.is_empty());
        let value = match explicit {
            Some(value) => value.to_string(),
            None => self
                .session
                .token()
                .map(|token| self.scheme.header_value(&token))
                .unwrap_or_default(),
        };
        Some(value)
    }

    /// Send a request and deserialize the `data` member of the response.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let path = request.path.clone();
        let data = self.send_value(request).await?;
        serde_json::from_value(data).map_err(|e| {
            ApiError::InvalidResponse(format!("Unexpected payload from {}: {}", path, e))
        })
    }

    /// Send a request and return the `data` member of the response untyped.
    pub async fn send_value(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let url = self.url(&request)?;
        let authorization = self.resolve_authorization(&request, &url);
        let mut builder = self.client.request(request.method.clone(), url);

        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, header::HeaderValue::from_str(&value)?);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        debug!(method = %request.method, path = %request.path, "Sending request");
        let response = builder.send().await?;
        let response = self.check_response(&request, response).await?;
        let body = response.text().await?;
        Self::unwrap_data(&request.path, &body)
    }

    /// Check if response is successful, returning an error with body if not.
    /// A 401 additionally runs the unauthorized handler.
    async fn check_response(
        &self,
        request: &ApiRequest,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        debug!(
            method = %request.method,
            path = %request.path,
            status = %status,
            "Response received"
        );
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = ApiError::from_status(status, &body);
        if error.is_unauthorized() {
            warn!(path = %request.path, "Server rejected credential, resetting session");
            self.on_unauthorized.on_unauthorized();
        }
        Err(error)
    }

    /// Strip the response envelope, keeping only `data`.
    fn unwrap_data(path: &str, body: &str) -> Result<Value, ApiError> {
        let mut envelope: Value = serde_json::from_str(body).map_err(|e| {
            ApiError::InvalidResponse(format!("Response from {} is not JSON: {}", path, e))
        })?;
        envelope
            .as_object_mut()
            .and_then(|obj| obj.remove("data"))
            .ok_or_else(|| {
                ApiError::InvalidResponse(format!("Response from {} has no data member", path))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SessionData;
    use crate::models::LoginDetails;

    fn client_with_token(token: Option<&str>) -> ApiClient {
        let session = Arc::new(Session::in_memory());
        if let Some(token) = token {
            session.update(SessionData::from_login(LoginDetails {
                token: token.into(),
                ..Default::default()
            }));
        }
        ApiClient::new("https://api.example.com/v1/", session, || {}).unwrap()
    }

    #[test]
    fn test_stored_token_attached() {
        let client = client_with_token(Some("abc123"));
        let request = ApiRequest::get(endpoints::SERVICE_LIST);
        assert_eq!(client.authorization_for(&request).unwrap().as_deref(), Some("abc123"));
    }

    #[test]
    fn test_explicit_header_wins() {
        let client = client_with_token(Some("abc123"));
        let request = ApiRequest::put(endpoints::RESET_PASSWORD).authorization("reset-token");
        assert_eq!(client.authorization_for(&request).unwrap().as_deref(), Some("reset-token"));
    }

    #[test]
    fn test_empty_explicit_header_falls_back_to_session() {
        let client = client_with_token(Some("abc123"));
        let request = ApiRequest::get(endpoints::PROVIDERS).authorization("");
        assert_eq!(client.authorization_for(&request).unwrap().as_deref(), Some("abc123"));
    }

    #[test]
    fn test_no_token_sends_empty_value() {
        let client = client_with_token(None);
        let request = ApiRequest::get(endpoints::PROVIDERS);
        assert_eq!(client.authorization_for(&request).unwrap().as_deref(), Some(""));
    }

    #[test]
    fn test_login_is_never_decorated() {
        let client = client_with_token(Some("abc123"));
        assert_eq!(client.authorization_for(&ApiRequest::post(endpoints::LOGIN)).unwrap(), None);
        assert_eq!(client.authorization_for(&ApiRequest::post("/auth/login/")).unwrap(), None);
        // Only the login endpoint is exempt, not every path mentioning it
        let social = ApiRequest::post(endpoints::SOCIAL_SIGN_IN);
        assert_eq!(client.authorization_for(&social).unwrap().as_deref(), Some("abc123"));
    }

    #[test]
    fn test_bearer_scheme_only_decorates_stored_token() {
        let client = client_with_token(Some("abc123")).with_scheme(AuthScheme::Bearer);
        let stored = ApiRequest::get(endpoints::USER_PROFILE);
        assert_eq!(client.authorization_for(&stored).unwrap().as_deref(), Some("Bearer abc123"));
        let explicit = ApiRequest::get(endpoints::USER_PROFILE).authorization("raw");
        assert_eq!(client.authorization_for(&explicit).unwrap().as_deref(), Some("raw"));
    }

    #[test]
    fn test_url_joins_base_and_path() {
        let client = client_with_token(None);
        let url = client.url(&ApiRequest::post(endpoints::LOGIN)).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/auth/login");
    }

    #[test]
    fn test_segments_are_encoded() {
        let client = client_with_token(None);
        let request = ApiRequest::get(endpoints::PROVIDER_BY_ID).segment("../../auth/login");
        let url = client.url(&request).unwrap();
        assert_eq!(url.path(), "/v1/user/get_provider_by_id/..%2F..%2Fauth%2Flogin");

        let request = ApiRequest::get(endpoints::PROVIDER_BY_ID).segment("x?evil=1");
        let url = client.url(&request).unwrap();
        assert_eq!(url.path(), "/v1/user/get_provider_by_id/x%3Fevil=1");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_dot_segments_cannot_reach_login() {
        let client = client_with_token(Some("abc123"));
        let request = ApiRequest::get(endpoints::PROVIDER_BY_ID).segment("..");
        assert_eq!(client.authorization_for(&request).unwrap().as_deref(), Some("abc123"));

        let request = ApiRequest::get("/user/../auth/login");
        let url = client.url(&request).unwrap();
        assert_eq!(url.path(), "/v1/user/auth/login");
        assert_eq!(client.authorization_for(&request).unwrap().as_deref(), Some("abc123"));
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let result = ApiClient::new("not a url", Arc::new(Session::in_memory()), || {});
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn test_unwrap_data() {
        let data = ApiClient::unwrap_data("/x", r#"{"status":1,"data":{"a":1}}"#).unwrap();
        assert_eq!(data, serde_json::json!({"a": 1}));

        let missing = ApiClient::unwrap_data("/x", r#"{"status":1}"#);
        assert!(matches!(missing, Err(ApiError::InvalidResponse(_))));

        let not_json = ApiClient::unwrap_data("/x", "<html>");
        assert!(matches!(not_json, Err(ApiError::InvalidResponse(_))));
    }
}
