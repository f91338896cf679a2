//! Single-flight access token refresh.
//!
//! The pending exchange is a shared future kept in a slot owned by the
//! coordinator. Every caller that needs a new access token while the slot is
//! occupied awaits a clone of the same future, so one burst of 401s produces
//! one exchange. The exchange empties the slot itself when it settles.

use super::request::generate_request_id;
use crate::REQUEST_ID_HEADER;
use crate::classifier::{
    SESSION_EXPIRED_REDIRECT_MESSAGE, StructuredError, TransportFailure, classify_response,
    classify_transport,
};
use crate::navigation::Navigator;
use crate::notifier::ErrorNotifier;
use crate::storage::{CredentialStore, TokenKind};

use common::models::RefreshedAccess;
use common::{HttpStatusCode, RedactedToken};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use log::{error, info, warn};
use serde_json::{Value, json};
use url::Url;

pub(crate) type RefreshOutcome = Result<RedactedToken, StructuredError>;
pub(crate) type PendingRefresh = Shared<BoxFuture<'static, RefreshOutcome>>;

pub(crate) struct RefreshCoordinator {
    /// Dedicated client: never routed through 401 interception.
    http: reqwest::Client,
    refresh_url: Url,
    credentials: CredentialStore,
    notifier: ErrorNotifier,
    navigator: Arc<dyn Navigator>,
    login_route: String,
    redirect_delay: Duration,
    pending: Mutex<Option<PendingRefresh>>,
    exchanges: AtomicUsize,
}

impl RefreshCoordinator {
    pub fn new(
        http: reqwest::Client,
        refresh_url: Url,
        credentials: CredentialStore,
        notifier: ErrorNotifier,
        navigator: Arc<dyn Navigator>,
        login_route: String,
        redirect_delay: Duration,
    ) -> Self {
        Self {
            http,
            refresh_url,
            credentials,
            notifier,
            navigator,
            login_route,
            redirect_delay,
            pending: Mutex::new(None),
            exchanges: AtomicUsize::new(0),
        }
    }

    pub fn refresh_url(&self) -> &Url {
        &self.refresh_url
    }

    /// Exchanges started since construction.
    pub fn exchange_count(&self) -> usize {
        self.exchanges.load(Ordering::SeqCst)
    }

    /// Join the in-flight exchange, or start one if none is pending.
    pub fn refreshed_access(self: &Arc<Self>) -> PendingRefresh {
        let mut slot = self.slot();
        if let Some(pending) = slot.as_ref() {
            info!("Joining in-flight token refresh");
            return pending.clone();
        }

        let coordinator = Arc::clone(self);
        let pending = async move {
            let outcome = coordinator.exchange().await;
            *coordinator.slot() = None;
            outcome
        }
        .boxed()
        .shared();

        *slot = Some(pending.clone());
        pending
    }

    fn slot(&self) -> MutexGuard<'_, Option<PendingRefresh>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn exchange(&self) -> RefreshOutcome {
        self.exchanges.fetch_add(1, Ordering::SeqCst);
        info!("Refreshing access token");

        let refresh = match self.credentials.get(TokenKind::Refresh) {
            Ok(Some(token)) => token,
            Ok(None) => {
                let failure = self.failure(
                    HttpStatusCode::UNAUTHORIZED,
                    "no refresh token stored".to_string(),
                );
                return Err(self.expire_session(failure));
            }
            Err(e) => {
                let failure = self.failure(
                    HttpStatusCode::NO_RESPONSE,
                    format!("refresh token unreadable: {e}"),
                );
                return Err(self.expire_session(failure));
            }
        };

        match self.request_access(&refresh).await {
            Ok(access) => {
                info!("Access token refreshed ({} chars)", access.len());
                Ok(access)
            }
            Err(failure) => Err(self.expire_session(failure)),
        }
    }

    async fn request_access(&self, refresh: &RedactedToken) -> RefreshOutcome {
        let method = reqwest::Method::POST;
        let url = self.refresh_url.as_str();

        let response = self
            .http
            .post(self.refresh_url.clone())
            .header(REQUEST_ID_HEADER, generate_request_id())
            .json(&json!({ "refresh": refresh.as_str() }))
            .send()
            .await
            .map_err(|e| {
                classify_transport(
                    &TransportFailure::from_reqwest(&e),
                    Some(method.as_str()),
                    Some(url),
                )
            })?;

        let status = HttpStatusCode::from(response.status().as_u16());
        let bytes = response.bytes().await.map_err(|e| {
            classify_transport(
                &TransportFailure::from_reqwest(&e),
                Some(method.as_str()),
                Some(url),
            )
        })?;

        if !response_ok(status) {
            let body: Option<Value> = serde_json::from_slice(&bytes).ok();
            return Err(classify_response(
                status,
                body.as_ref(),
                Some(method.as_str()),
                Some(url),
            ));
        }

        let refreshed: RefreshedAccess = serde_json::from_slice(&bytes).map_err(|e| {
            self.failure(status, format!("malformed refresh payload: {e}"))
        })?;

        let stored = self
            .credentials
            .set(TokenKind::Access, &refreshed.access)
            .and_then(|()| match &refreshed.refresh {
                Some(rotated) => self.credentials.set(TokenKind::Refresh, rotated),
                None => Ok(()),
            });
        if let Err(e) = stored {
            return Err(self.failure(status, format!("token not stored: {e}")));
        }

        Ok(refreshed.access)
    }

    /// Clear the session, publish the expiry and schedule one redirect.
    fn expire_session(&self, failure: StructuredError) -> StructuredError {
        let failure = failure.into_session_expired(SESSION_EXPIRED_REDIRECT_MESSAGE);
        warn!("Token refresh failed: {}", failure);

        if let Err(e) = self.credentials.clear() {
            error!("Failed to clear session after refresh failure: {}", e);
        }
        self.notifier.publish(&failure);

        let navigator = Arc::clone(&self.navigator);
        let route = self.login_route.clone();
        let delay = self.redirect_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            info!("Redirecting to {}", route);
            navigator.navigate(&route);
        });

        failure
    }

    /// Failure record for problems detected locally during the exchange.
    fn failure(&self, status: HttpStatusCode, detail: String) -> StructuredError {
        let mut failure = classify_response(
            status,
            None,
            Some(reqwest::Method::POST.as_str()),
            Some(self.refresh_url.as_str()),
        );
        failure.detail = Some(detail);
        failure
    }
}

fn response_ok(status: HttpStatusCode) -> bool {
    (200..300).contains(&status.as_u16())
}
