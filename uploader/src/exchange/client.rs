use reqwest::header::COOKIE;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::response::ProtocolResponse;
use super::session::Session;
use crate::config::ClientConfig;
use crate::constants::protocol;
use crate::errors::{ExchangeError, Result, TransportError};

/// Login and password sent through HTTP basic auth on `checkauth`
#[derive(Clone)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

impl Credentials {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"***")
            .finish()
    }
}

/// A single exchange request before decoration
pub struct ExchangeRequest<'a> {
    mode: &'a str,
    session: Option<&'a Session>,
    credentials: Option<&'a Credentials>,
    filename: Option<&'a str>,
    body: Option<Vec<u8>>,
}

impl<'a> ExchangeRequest<'a> {
    pub fn new(mode: &'a str) -> Self {
        Self {
            mode,
            session: None,
            credentials: None,
            filename: None,
            body: None,
        }
    }

    pub fn with_session(mut self, session: &'a Session) -> Self {
        self.session = Some(session);
        self
    }

    pub fn with_credentials(mut self, credentials: &'a Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_filename(mut self, filename: &'a str) -> Self {
        self.filename = Some(filename);
        self
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }
}

/// HTTP side of the exchange: one endpoint, one exchange type, one client.
pub struct ExchangeClient {
    client: Client,
    endpoint: Url,
    exchange_type: String,
}

impl ExchangeClient {
    pub fn new(endpoint: &str, exchange_type: &str, config: &ClientConfig) -> Result<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| TransportError::InvalidEndpoint {
            url: endpoint.to_string(),
            reason: e.to_string(),
        })?;
        if endpoint.host_str().is_none() {
            return Err(TransportError::InvalidEndpoint {
                url: endpoint.to_string(),
                reason: "endpoint has no host".to_string(),
            }
            .into());
        }

        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(secs) = config.request_timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| TransportError::ClientBuild {
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            endpoint,
            exchange_type: exchange_type.to_string(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Send one decorated request and decode the answer.
    ///
    /// Decoration is applied here and nowhere else: `type`, `mode`, the
    /// session parameter and the session cookie whenever a session is given.
    pub async fn send(&self, request: ExchangeRequest<'_>) -> Result<ProtocolResponse> {
        let mode = request.mode;

        let mut query: Vec<(&str, &str)> = vec![
            (protocol::TYPE_PARAM, self.exchange_type.as_str()),
            (protocol::MODE_PARAM, mode),
        ];
        if let Some((name, value)) = request.session.and_then(Session::session_param) {
            query.push((name, value));
        }
        if let Some(filename) = request.filename {
            query.push((protocol::FILENAME_PARAM, filename));
        }

        let mut builder = self.client.post(self.endpoint.clone()).query(&query);

        if let Some(session) = request.session {
            if let Some(cookie) = session.cookie_header(&self.endpoint) {
                builder = builder.header(COOKIE, cookie);
            }
        }
        if let Some(credentials) = request.credentials {
            builder = builder.basic_auth(&credentials.login, Some(&credentials.password));
        }
        if let Some(body) = request.body {
            debug!("mode={} sending {} body bytes", mode, body.len());
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::RequestFailed {
                mode: mode.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        let raw = response
            .bytes()
            .await
            .map_err(|e| TransportError::RequestFailed {
                mode: mode.to_string(),
                reason: format!("failed to read response body: {}", e),
            })?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&raw).into_owned();
            warn!("mode={} status {}\n{}", mode, status, body);
            return Err(ExchangeError::Transport(TransportError::ServerError {
                mode: mode.to_string(),
                status: status.as_u16(),
                body,
            }));
        }

        let decoded = ProtocolResponse::parse(mode, &raw);
        info!("mode={}\n{}", mode, decoded.text());
        Ok(decoded)
    }
}
