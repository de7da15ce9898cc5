//! Endpoint paths, relative to the configured API base URL.

// Auth
pub const LOGIN: &str = "/auth/login";
pub const SIGN_UP: &str = "/auth/signup";
pub const FORGOT_PASSWORD: &str = "/auth/forgot_password";
pub const RESET_PASSWORD: &str = "/auth/reset_password";
pub const SOCIAL_SIGN_IN: &str = "/auth/providers/social_sign_in";
pub const LOGOUT: &str = "/auth/logout";
pub const INSURANCE: &str = "/insurance/all";
pub const OCCUPATION: &str = "/occupations/all";

// Profile
pub const USER_FILE_UPLOAD: &str = "/user/file_upload";
pub const USER_PROFILE: &str = "/user/get_profile";
pub const UPDATE_USER_PROFILE: &str = "/user/update_profile";

// Services
pub const ADD_SERVICE: &str = "/service/providers/add";
pub const SERVICE_LIST: &str = "/service/providers/get_own_services";
pub const UPDATE_SERVICE: &str = "/service/providers/update";
pub const DELETE_SERVICE: &str = "/service/providers/delete";

// Plan subscription
pub const SUBSCRIPTION: &str = "/subscription";
pub const STRIPE_PAYMENT: &str = "/stripe/payment";

// Coupon codes
pub const COUPON_CREATE: &str = "/coupon/create";
pub const COUPON_LIST: &str = "/coupon";
pub const COUPON_DEACTIVATE: &str = "/coupon/deactivate";

// Providers
pub const PROVIDERS: &str = "/user/all_providers";
pub const PROVIDER_BY_ID: &str = "/user/get_provider_by_id";

// Rating
pub const ADD_RATING: &str = "/rating/parents/add";

// Call / visit tracking
pub const USER_TRACK: &str = "/user/user_track";
