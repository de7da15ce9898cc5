//! Data models for SpEd Connect API payloads.
//!
//! These are plain request/response shapes passed through to and from the
//! backend, which owns every invariant on them:
//!
//! - `LoginDetails`, `ProfileUpdate`, sign-up and social sign-in requests
//! - `ServiceDetails`, `ServicePage`: a provider's service catalog
//! - `ProviderSummary`, `ProviderDetails`, `ProviderQuery`: the public directory
//! - `Plan`, `ActivePlan`, `Coupon`: subscription and coupon billing

pub mod plan;
pub mod provider;
pub mod service;
pub mod user;

pub use plan::{ActivePlan, Coupon, CouponCreate, CouponPage, Plan, PlanOverview, MAX_COUPONS};
pub use provider::{
    ContactKind, ProviderDetails, ProviderPage, ProviderQuery, ProviderSummary, RatingInput,
    RatingRange,
};
pub use service::{ServiceDetails, ServiceInput, ServicePage};
pub use user::{
    LoginDetails, LoginRequest, Location, NamedOption, ProfileUpdate, SignUpRequest,
    SocialSignInRequest,
};
