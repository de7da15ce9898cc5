//! Typed calls for each SpEd Connect endpoint.
//!
//! All of them go through [`ApiClient::send`], so token attachment and the
//! 401 policy apply uniformly. Directory calls take the visitor's token
//! explicitly because directory links carry their own token.

use serde_json::{json, Value};
use tracing::info;

use crate::auth::SessionData;
use crate::models::{
    ContactKind, CouponCreate, CouponPage, LoginDetails, LoginRequest, NamedOption, PlanOverview,
    ProfileUpdate, ProviderDetails, ProviderPage, ProviderQuery, RatingInput, ServiceInput,
    ServicePage, SignUpRequest, SocialSignInRequest,
};

use super::endpoints;
use super::{ApiClient, ApiError, ApiRequest, Payload};

/// Default page size used by the list screens
pub const DEFAULT_PER_PAGE: u32 = 10;

fn with_token(request: ApiRequest, token: Option<&str>) -> ApiRequest {
    match token {
        Some(token) => request.authorization(token),
        None => request,
    }
}

impl ApiClient {
    // ===== Auth =====

    /// Log in and make the returned credential the current session.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Payload<LoginDetails>, ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let payload: Payload<LoginDetails> =
            self.send(ApiRequest::post(endpoints::LOGIN).json(&body)?).await?;
        self.start_session(&payload.result);
        Ok(payload)
    }

    /// Register a new account; the backend signs the user in immediately.
    pub async fn sign_up(
        &self,
        request: &SignUpRequest,
    ) -> Result<Payload<LoginDetails>, ApiError> {
        let payload: Payload<LoginDetails> =
            self.send(ApiRequest::post(endpoints::SIGN_UP).json(request)?).await?;
        self.start_session(&payload.result);
        Ok(payload)
    }

    pub async fn social_sign_in(
        &self,
        request: &SocialSignInRequest,
    ) -> Result<Payload<LoginDetails>, ApiError> {
        let payload: Payload<LoginDetails> = self
            .send(ApiRequest::post(endpoints::SOCIAL_SIGN_IN).json(request)?)
            .await?;
        self.start_session(&payload.result);
        Ok(payload)
    }

    fn start_session(&self, details: &LoginDetails) {
        if details.token.is_empty() {
            return;
        }
        self.session().update(SessionData::from_login(details.clone()));
        info!(user = %details.id, "Session started");
    }

    pub async fn forgot_password(&self, email: &str) -> Result<Payload<Value>, ApiError> {
        self.send(ApiRequest::post(endpoints::FORGOT_PASSWORD).json(&json!({ "email": email }))?)
            .await
    }

    /// Set a new password using the token from the reset email.
    pub async fn reset_password(
        &self,
        reset_token: &str,
        password: &str,
    ) -> Result<Payload<Value>, ApiError> {
        let request = ApiRequest::put(endpoints::RESET_PASSWORD)
            .json(&json!({ "password": password }))?
            .authorization(reset_token);
        self.send(request).await
    }

    /// Tell the backend to drop the current token. The local session is left
    /// to the caller, which clears it whether or not this succeeds.
    pub async fn logout(&self) -> Result<Payload<Value>, ApiError> {
        let token = self.session().token();
        self.send(ApiRequest::post(endpoints::LOGOUT).json(&json!({ "token": token }))?)
            .await
    }

    pub async fn insurance_list(&self) -> Result<Payload<Vec<NamedOption>>, ApiError> {
        self.send(ApiRequest::get(endpoints::INSURANCE)).await
    }

    pub async fn occupation_list(&self) -> Result<Payload<Vec<NamedOption>>, ApiError> {
        self.send(ApiRequest::get(endpoints::OCCUPATION)).await
    }

    // ===== Profile =====

    /// Upload a profile photo (data URL or already-hosted URL).
    pub async fn upload_profile_photo(&self, photo: &str) -> Result<Payload<Value>, ApiError> {
        self.send(ApiRequest::post(endpoints::USER_FILE_UPLOAD).json(photo)?)
            .await
    }

    pub async fn profile(&self) -> Result<Payload<LoginDetails>, ApiError> {
        self.send(ApiRequest::get(endpoints::USER_PROFILE)).await
    }

    /// Update the profile and refresh the stored copy of it.
    pub async fn update_profile(
        &self,
        update: &ProfileUpdate,
    ) -> Result<Payload<LoginDetails>, ApiError> {
        let payload: Payload<LoginDetails> = self
            .send(ApiRequest::put(endpoints::UPDATE_USER_PROFILE).json(update)?)
            .await?;
        self.session().set_profile(payload.result.clone());
        Ok(payload)
    }

    // ===== Services =====

    pub async fn add_service(&self, service: &ServiceInput) -> Result<Payload<Value>, ApiError> {
        self.send(ApiRequest::post(endpoints::ADD_SERVICE).json(service)?)
            .await
    }

    pub async fn own_services(
        &self,
        page: u32,
        per_page: u32,
        search: &str,
    ) -> Result<Payload<ServicePage>, ApiError> {
        let request = ApiRequest::get(endpoints::SERVICE_LIST)
            .query("page", page)
            .query("perPage", per_page)
            .query("search", search);
        self.send(request).await
    }

    pub async fn update_service(
        &self,
        id: &str,
        service: &ServiceInput,
    ) -> Result<Payload<Value>, ApiError> {
        self.send(ApiRequest::put(endpoints::UPDATE_SERVICE).segment(id).json(service)?)
            .await
    }

    /// Soft-delete a service (the backend models deletion as a PUT).
    pub async fn delete_service(&self, id: &str) -> Result<Payload<Value>, ApiError> {
        self.send(ApiRequest::put(endpoints::DELETE_SERVICE).segment(id))
            .await
    }

    // ===== Plans and coupons =====

    /// Available plans; the active one is remembered in the session.
    pub async fn subscription_plans(&self) -> Result<Payload<PlanOverview>, ApiError> {
        let payload: Payload<PlanOverview> =
            self.send(ApiRequest::get(endpoints::SUBSCRIPTION)).await?;
        self.session().set_active_plan(payload.result.active_plan());
        Ok(payload)
    }

    /// Start a Stripe checkout for a plan. The payload is the checkout page/URL.
    pub async fn stripe_payment(&self, plan_id: &str) -> Result<Value, ApiError> {
        self.send_value(ApiRequest::get(endpoints::STRIPE_PAYMENT).query("id", plan_id))
            .await
    }

    pub async fn create_coupons(&self, request: &CouponCreate) -> Result<Payload<Value>, ApiError> {
        self.send(ApiRequest::post(endpoints::COUPON_CREATE).json(request)?)
            .await
    }

    pub async fn coupons(&self, page: u32, per_page: u32) -> Result<Payload<CouponPage>, ApiError> {
        let request = ApiRequest::get(endpoints::COUPON_LIST)
            .query("page", page)
            .query("perPage", per_page);
        self.send(request).await
    }

    pub async fn set_coupon_active(
        &self,
        id: &str,
        is_active: bool,
    ) -> Result<Payload<Value>, ApiError> {
        let request = ApiRequest::put(endpoints::COUPON_DEACTIVATE).segment(id)
            .json(&json!({ "isActive": is_active }))?;
        self.send(request).await
    }

    // ===== Directory =====

    pub async fn providers(
        &self,
        query: &ProviderQuery,
        token: Option<&str>,
    ) -> Result<Payload<ProviderPage>, ApiError> {
        let request = ApiRequest::get(endpoints::PROVIDERS)
            .query("page", query.page)
            .query("perPage", query.per_page)
            .query("search", &query.search)
            .query("ratingRange", query.rating.as_query())
            .query("insurance", &query.insurance);
        self.send(with_token(request, token)).await
    }

    pub async fn provider(
        &self,
        id: &str,
        token: Option<&str>,
    ) -> Result<Payload<ProviderDetails>, ApiError> {
        let request = ApiRequest::get(endpoints::PROVIDER_BY_ID).segment(id);
        self.send(with_token(request, token)).await
    }

    pub async fn add_rating(
        &self,
        rating: &RatingInput,
        token: Option<&str>,
    ) -> Result<Payload<Value>, ApiError> {
        let request = ApiRequest::post(endpoints::ADD_RATING).json(rating)?;
        self.send(with_token(request, token)).await
    }

    /// Record that a visitor called or emailed a provider.
    pub async fn track_contact(
        &self,
        provider_id: &str,
        kind: ContactKind,
        token: Option<&str>,
    ) -> Result<Payload<Value>, ApiError> {
        let request = ApiRequest::put(endpoints::USER_TRACK).segment(provider_id)
            .json(&json!({ "type": kind }))?;
        self.send(with_token(request, token)).await
    }
}
