//! Test helpers for client integration tests.
//!
//! Every test gets its own wiremock server, an in-memory store, a navigator
//! that records routes and a capture of everything published.

use lending_client::{
    ApiClient, ClientConfig, KeyValueStore, MemoryStore, Navigator, StructuredError,
};

use std::sync::{Arc, Mutex};
use std::time::Duration;

use wiremock::MockServer;

pub const OLD_ACCESS: &str = "access-old";
pub const NEW_ACCESS: &str = "access-new";
pub const REFRESH: &str = "refresh-1";

/// Redirect delay used by tests; short so assertions need not wait long.
pub const TEST_REDIRECT_DELAY: Duration = Duration::from_millis(20);

#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().expect("navigator lock").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        self.routes.lock().expect("navigator lock").push(route.to_string());
    }
}

pub struct Harness {
    pub server: MockServer,
    pub client: ApiClient,
    pub store: Arc<MemoryStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub published: Arc<Mutex<Vec<StructuredError>>>,
}

impl Harness {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let config = config_for(&format!("{}/api/", server.uri()));
        Self::with_server(server, config)
    }

    pub fn with_server(server: MockServer, config: ClientConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let navigator = Arc::new(RecordingNavigator::default());

        let client = ApiClient::builder(config)
            .store(store.clone())
            .navigator(navigator.clone())
            .build()
            .expect("client builds");

        let published = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&published);
        let _subscription = client.notifier().subscribe(move |error| {
            sink.lock().expect("published lock").push(error.clone());
        });

        Self {
            server,
            client,
            store,
            navigator,
            published,
        }
    }

    pub fn seed_session(&self, access: &str, refresh: &str) {
        self.store.set("access_token", access).expect("seed access");
        self.store.set("refresh_token", refresh).expect("seed refresh");
    }

    pub fn store_access_only(&self, access: &str) {
        self.store.set("access_token", access).expect("seed access");
    }

    pub fn stored(&self, key: &str) -> Option<String> {
        self.store.get(key).expect("store read")
    }

    pub fn published(&self) -> Vec<StructuredError> {
        self.published.lock().expect("published lock").clone()
    }

    /// Routes recorded after any scheduled redirect has had time to fire.
    pub async fn routes_after_redirect(&self) -> Vec<String> {
        tokio::time::sleep(TEST_REDIRECT_DELAY * 5).await;
        self.navigator.routes()
    }
}

pub fn config_for(base_url: &str) -> ClientConfig {
    ClientConfig {
        base_url: base_url.to_string(),
        session_expired_redirect_delay_ms: TEST_REDIRECT_DELAY.as_millis() as u64,
        ..ClientConfig::default()
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
