//! HTTP status code utilities for error classification and retry logic.

/// HTTP status code for error categorization.
///
/// Stored directly rather than parsed from error messages. The value `0`
/// stands for "no HTTP response was received" (connectivity loss, DNS
/// failure, timeout).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HttpStatusCode(pub u16);

impl HttpStatusCode {
    /// Sentinel for failures that never produced a response.
    pub const NO_RESPONSE: HttpStatusCode = HttpStatusCode(0);
    pub const BAD_REQUEST: HttpStatusCode = HttpStatusCode(400);
    pub const UNAUTHORIZED: HttpStatusCode = HttpStatusCode(401);
    pub const FORBIDDEN: HttpStatusCode = HttpStatusCode(403);
    pub const NOT_FOUND: HttpStatusCode = HttpStatusCode(404);
    pub const CONFLICT: HttpStatusCode = HttpStatusCode(409);
    pub const UNPROCESSABLE_ENTITY: HttpStatusCode = HttpStatusCode(422);
    pub const TOO_MANY_REQUESTS: HttpStatusCode = HttpStatusCode(429);

    pub fn as_u16(&self) -> u16 {
        self.0
    }

    /// True when no response arrived at all.
    pub fn is_no_response(&self) -> bool {
        self.0 == 0
    }

    /// 4xx client errors.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.0)
    }

    /// 5xx server errors.
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.0)
    }

    pub fn is_unauthorized(&self) -> bool {
        *self == Self::UNAUTHORIZED
    }

    pub fn is_rate_limited(&self) -> bool {
        *self == Self::TOO_MANY_REQUESTS
    }

    /// Transient failures worth another attempt: no response, 429, any 5xx.
    ///
    /// Every other 4xx is final.
    pub fn is_retryable(&self) -> bool {
        self.is_no_response() || self.is_rate_limited() || self.is_server_error()
    }
}

impl From<u16> for HttpStatusCode {
    fn from(code: u16) -> Self {
        HttpStatusCode(code)
    }
}

impl std::fmt::Display for HttpStatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
