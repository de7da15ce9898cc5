//! Application routes and the navigator the session-reset procedure drives.

use std::fmt;
use std::sync::{PoisonError, RwLock};

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    SignUp,
    ResetPassword,
    Profile,
    Service,
    Subscription,
    PaymentSuccess,
    PaymentFailed,
    CouponCode,
    Directory,
    DirectoryDetails,
}

impl Route {
    pub const ALL: [Route; 11] = [
        Route::Login,
        Route::SignUp,
        Route::ResetPassword,
        Route::Profile,
        Route::Service,
        Route::Subscription,
        Route::PaymentSuccess,
        Route::PaymentFailed,
        Route::CouponCode,
        Route::Directory,
        Route::DirectoryDetails,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::SignUp => "/signUp",
            Route::ResetPassword => "/reset-password",
            Route::Profile => "/profile",
            Route::Service => "/service",
            Route::Subscription => "/subscription",
            Route::PaymentSuccess => "/payment-success",
            Route::PaymentFailed => "/payment-failed",
            Route::CouponCode => "/coupon-code",
            Route::Directory => "/directory",
            Route::DirectoryDetails => "/directory-details",
        }
    }

    /// Resolve a location path. The root and unknown paths land on the login screen.
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        Route::ALL
            .into_iter()
            .find(|r| r.path() == path)
            .unwrap_or(Route::Login)
    }

    /// Routes only reachable with a session.
    pub fn requires_session(&self) -> bool {
        matches!(
            self,
            Route::Profile
                | Route::Service
                | Route::Subscription
                | Route::PaymentSuccess
                | Route::PaymentFailed
                | Route::CouponCode
        )
    }

    /// Visitor-only routes a signed-in user is moved away from. The
    /// directory is reached through emailed links carrying their own token.
    pub fn is_visitor_only(&self) -> bool {
        matches!(
            self,
            Route::Login
                | Route::SignUp
                | Route::ResetPassword
                | Route::Directory
                | Route::DirectoryDetails
        )
    }

    /// Where a visitor asking for this route actually ends up.
    pub fn guard(self, authenticated: bool) -> Route {
        if self.requires_session() && !authenticated {
            Route::Login
        } else if self.is_visitor_only() && authenticated {
            Route::Profile
        } else {
            self
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
    fn location(&self) -> Route;
}

/// In-memory navigator holding the current location.
///
/// Navigating to the route already shown is a no-op.
#[derive(Debug)]
pub struct History {
    current: RwLock<Route>,
}

impl History {
    pub fn new(start: Route) -> Self {
        Self {
            current: RwLock::new(start),
        }
    }

    /// Move to `route`, returning whether the location changed. The check and
    /// the move happen under one lock, so of several concurrent callers
    /// heading to the same route exactly one sees `true`.
    pub fn replace(&self, route: Route) -> bool {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if *current == route {
            return false;
        }
        debug!(from = %*current, to = %route, "Navigating");
        *current = route;
        true
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(Route::Directory)
    }
}

impl Navigator for History {
    fn navigate(&self, route: Route) {
        self.replace(route);
    }

    fn location(&self) -> Route {
        *self.current.read().unwrap_or_else(PoisonError::into_inner)
    }
}
