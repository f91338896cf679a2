use crate::error::LoanAdminError;
use crate::paths::AppPaths;

use lending_client::{
    ApiClient, ClientConfig, FileStore, KeyValueStore, Navigator, Notification, NotificationBoard,
    Subscription,
};

use std::sync::{Arc, PoisonError, RwLock};

use log::info;

const INITIAL_ROUTE: &str = "/";

/// The console's stand-in for client-side routing.
///
/// Records every route the client asks for so commands can react to a forced
/// trip to the login screen.
#[derive(Debug)]
pub struct RouteTracker {
    history: RwLock<Vec<String>>,
}

impl RouteTracker {
    pub fn new() -> Self {
        Self {
            history: RwLock::new(vec![INITIAL_ROUTE.to_string()]),
        }
    }

    pub fn current(&self) -> String {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
            .unwrap_or_else(|| INITIAL_ROUTE.to_string())
    }

    /// Every route visited, oldest first, starting with `/`.
    pub fn history(&self) -> Vec<String> {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for RouteTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for RouteTracker {
    fn navigate(&self, route: &str) {
        info!("Navigating to {}", route);
        self.history
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route.to_string());
    }
}

/// Everything a command needs: the API client, the banner board fed by its
/// notifier, and the route tracker it navigates through.
#[derive(Clone)]
pub struct AppState {
    client: ApiClient,
    board: NotificationBoard,
    routes: Arc<RouteTracker>,
    _subscription: Arc<Subscription>,
}

impl AppState {
    pub fn new(
        config: ClientConfig,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, LoanAdminError> {
        let routes = Arc::new(RouteTracker::new());
        let board = NotificationBoard::new(config.notification_ttl());

        let client = ApiClient::builder(config)
            .store(store)
            .navigator(routes.clone())
            .build()?;
        let subscription = board.attach(client.notifier());

        Ok(Self {
            client,
            board,
            routes,
            _subscription: Arc::new(subscription),
        })
    }

    /// State backed by the on-disk session file under `paths`.
    pub fn open(config: ClientConfig, paths: &AppPaths) -> Result<Self, LoanAdminError> {
        let store = FileStore::open(paths.session_file())?;
        info!("Session store: {}", store.path().display());
        Self::new(config, Arc::new(store))
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn board(&self) -> &NotificationBoard {
        &self.board
    }

    pub fn routes(&self) -> &RouteTracker {
        &self.routes
    }

    pub fn on_login_route(&self) -> bool {
        self.routes.current() == self.client.config().login_route
    }

    /// Lines to show the operator after a command: active banners, then a
    /// sign-in hint when the session was ended.
    pub fn report(&self) -> Vec<String> {
        let mut lines: Vec<String> = self.board.active().iter().map(render).collect();
        if self.on_login_route() {
            lines.push("Session ended. Run `loan-admin login` to sign in again.".to_string());
        }
        lines
    }
}

fn render(notification: &Notification) -> String {
    let level = notification.level.as_str().to_uppercase();
    match &notification.detail {
        Some(detail) if detail != &notification.message => {
            format!("[{level}] {} ({detail})", notification.message)
        }
        _ => format!("[{level}] {}", notification.message),
    }
}
