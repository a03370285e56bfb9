use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::HeaderValue;
use reqwest::Url;
use tracing::{debug, info};

use super::client::{Credentials, ExchangeClient, ExchangeRequest};
use crate::constants::{protocol, transfer};
use crate::errors::{ExchangeError, Result};

/// Authentication state established by `checkauth`.
///
/// Built once and only read afterwards; every later request borrows it.
pub struct Session {
    cookie_jar: Jar,
    cookie_name: String,
    session_param: Option<(String, String)>,
    server_time: Option<String>,
}

impl Session {
    /// Seed a cookie store scoped to the endpoint host with the session cookie
    pub fn new(
        endpoint: &Url,
        cookie_name: &str,
        cookie_value: &str,
        session_param: Option<(String, String)>,
        server_time: Option<String>,
    ) -> Self {
        let jar = Jar::default();
        jar.add_cookie_str(&format!("{}={}; Path=/", cookie_name, cookie_value), endpoint);
        Self {
            cookie_jar: jar,
            cookie_name: cookie_name.to_string(),
            session_param,
            server_time,
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// `Cookie` header value for a request to `url`
    pub fn cookie_header(&self, url: &Url) -> Option<HeaderValue> {
        self.cookie_jar.cookies(url)
    }

    pub fn session_param(&self) -> Option<(&str, &str)> {
        self.session_param
            .as_ref()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn server_time(&self) -> Option<&str> {
        self.server_time.as_deref()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("cookie_name", &self.cookie_name)
            .field("session_param", &self.session_param)
            .field("server_time", &self.server_time)
            .finish()
    }
}

/// Upload rules negotiated through `init`, constant for the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferPolicy {
    pub use_archive: bool,
    pub chunk_size_bytes: usize,
}

impl Default for TransferPolicy {
    fn default() -> Self {
        Self {
            use_archive: false,
            chunk_size_bytes: transfer::DEFAULT_CHUNK_SIZE,
        }
    }
}

impl TransferPolicy {
    /// Chunk size from the server's value; never zero or negative
    pub fn chunk_size_from(value: Option<&str>) -> usize {
        value
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|size| *size > 0)
            .and_then(|size| usize::try_from(size).ok())
            .unwrap_or(transfer::DEFAULT_CHUNK_SIZE)
    }
}

/// Run the `checkauth` handshake.
///
/// Response layout on success: line 1 cookie name, line 2 cookie value,
/// line 3 `sessparam=value` and line 4 `key=servertime`. Lines 3 and 4 may be
/// absent; when present they must be well-formed.
pub async fn authenticate(client: &ExchangeClient, credentials: &Credentials) -> Result<Session> {
    let resp = client
        .send(ExchangeRequest::new(protocol::MODE_CHECKAUTH).with_credentials(credentials))
        .await?;

    if !resp.status.is_success() {
        return Err(ExchangeError::authentication(resp.message()));
    }

    let cookie_name = resp
        .field(1)
        .map_err(|e| ExchangeError::authentication(e.to_string()))?;
    let cookie_value = resp
        .field(2)
        .map_err(|e| ExchangeError::authentication(e.to_string()))?;
    if cookie_name.is_empty() {
        return Err(ExchangeError::authentication("server issued no session cookie"));
    }

    // A parameter with an empty name or value is not sent at all
    let session_param = match resp.lines().get(3) {
        Some(line) if !line.is_empty() => {
            let (name, value) = resp.pair(3)?;
            (!name.is_empty() && !value.is_empty())
                .then(|| (name.to_string(), value.to_string()))
        }
        _ => None,
    };

    let server_time = match resp.lines().get(4) {
        Some(line) if !line.is_empty() => Some(resp.param(4)?.to_string()),
        _ => None,
    };

    let session = Session::new(
        client.endpoint(),
        cookie_name,
        cookie_value,
        session_param,
        server_time,
    );

    info!(
        "Authenticated as {} (cookie {}, session param {})",
        credentials.login,
        session.cookie_name(),
        session.session_param().map(|(name, _)| name).unwrap_or("none")
    );
    if let Some(time) = session.server_time() {
        debug!("Server time: {}", time);
    }

    Ok(session)
}

/// Run the `init` exchange and derive the transfer policy.
///
/// The archive flag on line 0 is mandatory. The chunk size on line 1 falls
/// back to the default when missing or unusable.
pub async fn negotiate_transfer(client: &ExchangeClient, session: &Session) -> Result<TransferPolicy> {
    let resp = client
        .send(ExchangeRequest::new(protocol::MODE_INIT).with_session(session))
        .await?;

    let archive_flag = resp
        .param(0)
        .map_err(|e| ExchangeError::policy(e.to_string()))?;
    let use_archive = archive_flag.trim() == protocol::ARCHIVE_ENABLED;

    let chunk_size_bytes = TransferPolicy::chunk_size_from(resp.param(1).ok());

    let policy = TransferPolicy {
        use_archive,
        chunk_size_bytes,
    };
    info!(
        "Transfer policy: archive={}, chunk size={} bytes",
        policy.use_archive, policy.chunk_size_bytes
    );
    Ok(policy)
}
