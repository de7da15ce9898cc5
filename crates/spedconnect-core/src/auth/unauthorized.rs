use std::sync::Arc;

use tracing::{info, warn};

use super::Session;
use crate::navigation::{Navigator, Route};

/// Side effect run by the API client when the server answers 401.
///
/// Several in-flight calls may fail together, so implementations must leave
/// the same end state however often they are invoked.
pub trait UnauthorizedHandler: Send + Sync {
    fn on_unauthorized(&self);
}

impl<F> UnauthorizedHandler for F
where
    F: Fn() + Send + Sync,
{
    fn on_unauthorized(&self) {
        self()
    }
}

/// Default handler: drop the session and send the user to the login screen.
pub struct SessionReset {
    session: Arc<Session>,
    navigator: Arc<dyn Navigator>,
}

impl SessionReset {
    pub fn new(session: Arc<Session>, navigator: Arc<dyn Navigator>) -> Self {
        Self { session, navigator }
    }
}

impl UnauthorizedHandler for SessionReset {
    fn on_unauthorized(&self) {
        if self.session.is_authenticated() {
            info!("Session rejected by server, signing out");
        }
        if let Err(e) = self.session.clear() {
            warn!(error = %e, "Failed to clear persisted session");
        }
        self.navigator.navigate(Route::Login);
    }
}
