use reqwest::Method;
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};
use url::Url;
use uuid::Uuid;

const REQUEST_ID_SUFFIX_LEN: usize = 9;

/// Whether a request carries the stored bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// Attach `Authorization: Bearer <access>` and recover a 401 through the
    /// refresh coordinator.
    #[default]
    Bearer,
    /// Credential exchanges (login): no bearer header and no refresh
    /// recovery. A 401 here means the submitted credentials were wrong.
    Anonymous,
}

/// One logical call. Rebuilt into a fresh `reqwest` request on every
/// dispatch, so the replay picks up the new token and a new request id.
#[derive(Debug, Clone)]
pub(crate) struct OutboundRequest {
    pub method: Method,
    pub url: Url,
    pub body: Option<Value>,
    pub auth: AuthMode,
    pub retried: bool,
}

impl OutboundRequest {
    pub fn new(method: Method, url: Url, body: Option<Value>, auth: AuthMode) -> Self {
        Self {
            method,
            url,
            body,
            auth,
            retried: false,
        }
    }
}

/// Correlation id: `<unix millis>-<9 lowercase alphanumerics>`.
pub fn generate_request_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{millis}-{}", &suffix[..REQUEST_ID_SUFFIX_LEN])
}
