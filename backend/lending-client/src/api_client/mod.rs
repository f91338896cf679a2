//! HTTP client core.
//!
//! Every call goes through [`ApiClient::send`]: read the current access token,
//! attach it with a fresh `X-Request-ID`, dispatch, and on failure either
//! recover a 401 through the refresh coordinator (one replay at most) or
//! classify, publish and reject.

mod refresh;
pub mod request;

pub use request::{AuthMode, generate_request_id};

use refresh::RefreshCoordinator;
use request::OutboundRequest;

use crate::classifier::{
    SESSION_EXPIRED_LOGIN_AGAIN_MESSAGE, SESSION_EXPIRED_MESSAGE, StructuredError,
    TransportFailure, classify_response, classify_transport,
};
use crate::config::ClientConfig;
use crate::error::{ApiClientError, CoreError};
use crate::navigation::{Navigator, NoopNavigator};
use crate::notifier::ErrorNotifier;
use crate::storage::{CredentialStore, KeyValueStore, MemoryStore, TokenKind};
use crate::{AUTH_REFRESH_ENDPOINT, REQUEST_ID_HEADER};

use common::{HttpStatusCode, RedactedToken};

use std::sync::Arc;

use log::{debug, warn};
use reqwest::Method;
use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

/// Outcome of one dispatch.
enum Attempt {
    Delivered(Vec<u8>),
    Rejected {
        status: HttpStatusCode,
        body: Option<Value>,
    },
    Unreachable(TransportFailure),
}

struct ClientInner {
    http: reqwest::Client,
    base_url: Url,
    config: ClientConfig,
    credentials: CredentialStore,
    notifier: ErrorNotifier,
    navigator: Arc<dyn Navigator>,
    refresh: Arc<RefreshCoordinator>,
}

/// Authenticated client for the lending backend. Clones share state,
/// including the pending refresh.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

pub struct ApiClientBuilder {
    config: ClientConfig,
    store: Option<Arc<dyn KeyValueStore>>,
    navigator: Option<Arc<dyn Navigator>>,
    notifier: Option<ErrorNotifier>,
}

impl ApiClientBuilder {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            store: None,
            navigator: None,
            notifier: None,
        }
    }

    /// Backing store for tokens. Defaults to a [`MemoryStore`].
    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Share an existing notifier instead of creating a fresh one.
    pub fn notifier(mut self, notifier: ErrorNotifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn build(self) -> Result<ApiClient, CoreError> {
        self.config.validate()?;
        let base_url = self.config.base_url()?;
        let refresh_url = base_url
            .join(AUTH_REFRESH_ENDPOINT)
            .map_err(ApiClientError::from)?;

        let http = reqwest::Client::builder()
            .timeout(self.config.request_timeout())
            .build()
            .map_err(|e| ApiClientError::http(e.to_string()))?;
        let refresh_http = reqwest::Client::builder()
            .timeout(self.config.refresh_timeout())
            .build()
            .map_err(|e| ApiClientError::http(e.to_string()))?;

        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()) as Arc<dyn KeyValueStore>);
        let credentials = CredentialStore::new(store);
        let notifier = self.notifier.unwrap_or_default();
        let navigator = self
            .navigator
            .unwrap_or_else(|| Arc::new(NoopNavigator) as Arc<dyn Navigator>);

        let refresh = Arc::new(RefreshCoordinator::new(
            refresh_http,
            refresh_url,
            credentials.clone(),
            notifier.clone(),
            Arc::clone(&navigator),
            self.config.login_route.clone(),
            self.config.redirect_delay(),
        ));

        Ok(ApiClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                config: self.config,
                credentials,
                notifier,
                navigator,
                refresh,
            }),
        })
    }
}

impl ApiClient {
    pub fn builder(config: ClientConfig) -> ApiClientBuilder {
        ApiClientBuilder::new(config)
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.inner.credentials
    }

    pub fn notifier(&self) -> &ErrorNotifier {
        &self.inner.notifier
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    pub(crate) fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.inner.navigator
    }

    /// Refresh exchanges issued by this client so far.
    pub fn refresh_exchange_count(&self) -> usize {
        self.inner.refresh.exchange_count()
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, ApiClientError> {
        Ok(self.inner.base_url.join(path.trim_start_matches('/'))?)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiClientError> {
        self.send(Method::GET, path, None, AuthMode::Bearer).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.send(Method::POST, path, Some(body), AuthMode::Bearer).await
    }

    /// Dispatch one call and decode its JSON payload. An empty success body
    /// decodes as `null`.
    pub async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        auth: AuthMode,
    ) -> Result<T, ApiClientError> {
        let url = self.endpoint(path)?;
        let mut request = OutboundRequest::new(method, url, body, auth);
        let bytes = self.execute(&mut request).await?;

        if bytes.is_empty() {
            return Ok(serde_json::from_value(Value::Null)?);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn execute(&self, request: &mut OutboundRequest) -> Result<Vec<u8>, ApiClientError> {
        loop {
            // Re-read per dispatch: a concurrent refresh may have rotated it.
            let sent_with = match request.auth {
                AuthMode::Bearer => self.inner.credentials.get(TokenKind::Access)?,
                AuthMode::Anonymous => None,
            };

            let (status, body) = match self.attempt(request, sent_with.as_ref()).await {
                Attempt::Delivered(bytes) => return Ok(bytes),
                Attempt::Unreachable(failure) => {
                    let error = classify_transport(
                        &failure,
                        Some(request.method.as_str()),
                        Some(request.url.as_str()),
                    );
                    return Err(self.reject(error));
                }
                Attempt::Rejected { status, body } => (status, body),
            };

            let error = classify_response(
                status,
                body.as_ref(),
                Some(request.method.as_str()),
                Some(request.url.as_str()),
            );

            // Any failure of the refresh endpoint itself ends the session.
            if self.is_refresh_endpoint(&request.url) {
                let expired = error.into_session_expired(SESSION_EXPIRED_LOGIN_AGAIN_MESSAGE);
                return Err(self.reject(expired));
            }
            if !status.is_unauthorized() {
                return Err(self.reject(error));
            }
            if request.auth == AuthMode::Anonymous {
                return Err(self.reject(error.into_invalid_credentials()));
            }
            if request.retried {
                debug!("Replay of {} answered 401 again", request.url.path());
                return Err(self.reject(error));
            }

            request.retried = true;
            self.recover(error, sent_with).await?;
        }
    }

    async fn attempt(&self, request: &OutboundRequest, bearer: Option<&RedactedToken>) -> Attempt {
        let request_id = generate_request_id();
        debug!(
            "{} {} [{}: {}]",
            request.method,
            request.url.path(),
            REQUEST_ID_HEADER,
            request_id
        );

        let mut builder = self
            .inner
            .http
            .request(request.method.clone(), request.url.clone())
            .header(REQUEST_ID_HEADER, request_id);
        if let Some(token) = bearer {
            builder = builder.header(AUTHORIZATION, token.bearer_header());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => return Attempt::Unreachable(TransportFailure::from_reqwest(&e)),
        };

        let status = response.status();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return Attempt::Unreachable(TransportFailure::from_reqwest(&e)),
        };

        if status.is_success() {
            Attempt::Delivered(bytes.to_vec())
        } else {
            Attempt::Rejected {
                status: HttpStatusCode::from(status.as_u16()),
                body: serde_json::from_slice(&bytes).ok(),
            }
        }
    }

    /// Decide whether a first 401 can be replayed.
    ///
    /// `Ok(())` means the stored access token is now usable and the request
    /// should be dispatched again.
    async fn recover(
        &self,
        original: StructuredError,
        sent_with: Option<RedactedToken>,
    ) -> Result<(), ApiClientError> {
        let credentials = &self.inner.credentials;

        if credentials.get(TokenKind::Refresh)?.is_none() {
            warn!("401 without a refresh token; ending session");
            credentials.clear()?;
            let error = self.reject(original.into_session_expired(SESSION_EXPIRED_MESSAGE));
            self.inner.navigator.navigate(&self.inner.config.login_route);
            return Err(error);
        }

        if let Some(current) = credentials.get(TokenKind::Access)?
            && sent_with.as_ref() != Some(&current)
        {
            debug!("Access token already rotated; replaying without a new exchange");
            return Ok(());
        }

        match self.inner.refresh.refreshed_access().await {
            Ok(_) => Ok(()),
            Err(_) => {
                // The refresh failure was already published; callers get their own 401.
                warn!("Refresh failed; rejecting {}", original);
                Err(ApiClientError::api(original))
            }
        }
    }

    fn is_refresh_endpoint(&self, url: &Url) -> bool {
        url.path() == self.inner.refresh.refresh_url().path()
    }

    /// Log and publish a classified failure, then wrap it for the caller.
    #[track_caller]
    fn reject(&self, error: StructuredError) -> ApiClientError {
        warn!("Request failed ({}): {}", error.kind, error);
        self.inner.notifier.publish(&error);
        ApiClientError::api(error)
    }
}
