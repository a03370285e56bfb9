//! Common test data and constants

use uploader::{ClientConfig, Credentials, ExchangeClient, Session};

pub const LOGIN: &str = "exchange";
pub const PASSWORD: &str = "s3cret";
pub const EXCHANGE_TYPE: &str = "catalog";

pub const COOKIE_NAME: &str = "PHPSESSID";
pub const COOKIE_VALUE: &str = "9f2c1b7e";
pub const SESSION_PARAM: (&str, &str) = ("sessid", "a1b2c3d4");

pub fn credentials() -> Credentials {
    Credentials::new(LOGIN, PASSWORD)
}

/// Client pointed at the mock endpoint with default settings
pub fn client_for(endpoint: &str) -> ExchangeClient {
    ExchangeClient::new(endpoint, EXCHANGE_TYPE, &ClientConfig::default()).unwrap()
}

/// Session as the mock `checkauth` would establish it
pub fn session_for(client: &ExchangeClient) -> Session {
    Session::new(
        client.endpoint(),
        COOKIE_NAME,
        COOKIE_VALUE,
        Some((SESSION_PARAM.0.to_string(), SESSION_PARAM.1.to_string())),
        None,
    )
}

pub fn expected_cookie() -> String {
    format!("{}={}", COOKIE_NAME, COOKIE_VALUE)
}
