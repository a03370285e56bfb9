//! Mock exchange server for testing
//!
//! Answers the four exchange modes with line-oriented bodies encoded in
//! Windows-1251, the way a real exchange endpoint does, and records every
//! request so tests can inspect query parameters, cookies and bodies.

use encoding_rs::WINDOWS_1251;
use wiremock::{
    matchers::{basic_auth, method, path, query_param},
    Mock, MockServer, Request, ResponseTemplate,
};

pub const EXCHANGE_PATH: &str = "/bitrix/admin/1c_exchange.php";

/// Encode a response body the way the server sends it
pub fn cp1251(text: &str) -> Vec<u8> {
    WINDOWS_1251.encode(text).0.into_owned()
}

fn line_body(status_lines: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_bytes(cp1251(status_lines))
}

pub struct MockExchangeServer {
    pub server: MockServer,
    pub base_url: String,
}

impl MockExchangeServer {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let base_url = server.uri();
        Self { server, base_url }
    }

    /// Full endpoint URL passed to the client
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, EXCHANGE_PATH)
    }

    fn mode(mode: &str) -> wiremock::MockBuilder {
        Mock::given(method("POST"))
            .and(path(EXCHANGE_PATH))
            .and(query_param("mode", mode))
    }

    /// `checkauth` accepting the given credentials and issuing a session
    pub async fn mock_checkauth_success(
        &self,
        login: &str,
        password: &str,
        cookie: (&str, &str),
        session_param: Option<(&str, &str)>,
    ) {
        let mut body = format!("success\n{}\n{}", cookie.0, cookie.1);
        if let Some((name, value)) = session_param {
            body.push_str(&format!("\n{}={}\ntimestamp=1700000000", name, value));
        }
        Self::mode("checkauth")
            .and(basic_auth(login, password))
            .respond_with(line_body(&body))
            .mount(&self.server)
            .await;
    }

    /// `checkauth` answered with an arbitrary body
    pub async fn mock_checkauth_body(&self, body: &str) {
        Self::mode("checkauth")
            .respond_with(line_body(body))
            .mount(&self.server)
            .await;
    }

    /// `checkauth` rejecting everyone with a localized message
    pub async fn mock_checkauth_failure(&self, message: &str) {
        self.mock_checkauth_body(&format!("failure\n{}", message))
            .await;
    }

    /// `init` answered with archive flag and chunk size lines
    pub async fn mock_init(&self, zip: &str, file_limit: &str) {
        self.mock_init_body(&format!("zip={}\nfile_limit={}", zip, file_limit))
            .await;
    }

    pub async fn mock_init_body(&self, body: &str) {
        Self::mode("init")
            .respond_with(line_body(body))
            .mount(&self.server)
            .await;
    }

    /// Every `file` chunk accepted
    pub async fn mock_file_success(&self) {
        Self::mode("file")
            .respond_with(line_body("success"))
            .mount(&self.server)
            .await;
    }

    /// First `accepted` chunks succeed, then every chunk is refused
    pub async fn mock_file_failure_after(&self, accepted: u64, message: &str) {
        if accepted > 0 {
            Self::mode("file")
                .respond_with(line_body("success"))
                .up_to_n_times(accepted)
                .mount(&self.server)
                .await;
        }
        Self::mode("file")
            .respond_with(line_body(&format!("failure\n{}", message)))
            .mount(&self.server)
            .await;
    }

    /// `import` for one filename answering the given status lines in order,
    /// each exactly once
    pub async fn mock_import_sequence(&self, filename: &str, responses: &[&str]) {
        for body in responses {
            Self::mode("import")
                .and(query_param("filename", filename))
                .respond_with(line_body(body))
                .up_to_n_times(1)
                .mount(&self.server)
                .await;
        }
    }

    /// `import` that never leaves progress
    pub async fn mock_import_endless_progress(&self) {
        Self::mode("import")
            .respond_with(line_body("progress\nStill working"))
            .mount(&self.server)
            .await;
    }

    /// Any request for `mode` answered with an HTTP error
    pub async fn mock_server_error(&self, mode: &str, status: u16, body: &str) {
        Self::mode(mode)
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Every request received so far, in arrival order
    pub async fn requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// Requests received for one mode
    pub async fn requests_for_mode(&self, mode: &str) -> Vec<Request> {
        self.requests()
            .await
            .into_iter()
            .filter(|req| query_value(req, "mode").as_deref() == Some(mode))
            .collect()
    }
}

/// Value of a query parameter on a recorded request
pub fn query_value(req: &Request, name: &str) -> Option<String> {
    req.url
        .query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// `Cookie` header of a recorded request
pub fn cookie_header(req: &Request) -> Option<String> {
    req.headers
        .get("cookie")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
