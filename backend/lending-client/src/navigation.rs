//! Route changes requested by the client, delivered to whatever plays the UI.

use log::debug;

/// Receives route changes on session expiry and logout.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

/// Navigator for headless use: logs and drops every route change.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, route: &str) {
        debug!("Navigation to {} ignored (no UI attached)", route);
    }
}
