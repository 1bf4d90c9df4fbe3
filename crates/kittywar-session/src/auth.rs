//! Registration and login against the KittyWar web server.
//!
//! The web server is a small JSON API:
//!
//! | Endpoint                      | Request body                     | Success       |
//! |-------------------------------|----------------------------------|---------------|
//! | `kittywar/register/mobile/`   | `{username, password, email}`    | status `201`  |
//! | `kittywar/login/mobile/`      | `{username, password}`           | status `200` + `token` |
//!
//! The interesting status lives in the JSON body's `status` field, not in
//! the HTTP status line. Older server builds send it as a string (`"201"`),
//! newer ones as a number, so both are accepted.

use serde::{Deserialize, Serialize};

use kittywar_protocol::AuthToken;

use crate::{Credentials, SessionError};

const REGISTER_PATH: &str = "kittywar/register/mobile/";
const LOGIN_PATH: &str = "kittywar/login/mobile/";

const REGISTER_CREATED: u16 = 201;
const REGISTER_TAKEN: u16 = 409;
const LOGIN_OK: u16 = 200;
const LOGIN_FAILED: u16 = 400;

/// Obtains game credentials for a player.
///
/// # Example
///
/// ```rust
/// use kittywar_protocol::AuthToken;
/// use kittywar_session::{Authenticator, Credentials, SessionError};
///
/// /// Hands out a fixed token. Only for local testing.
/// struct FixedAuthenticator;
///
/// impl Authenticator for FixedAuthenticator {
///     async fn register(&self, _: &str, _: &str, _: &str) -> Result<(), SessionError> {
///         Ok(())
///     }
///
///     async fn login(&self, username: &str, _: &str) -> Result<Credentials, SessionError> {
///         let token = AuthToken::new("000000000000000000000000")?;
///         Ok(Credentials::new(username, token))
///     }
/// }
/// ```
pub trait Authenticator: Send + Sync + 'static {
    /// Creates an account.
    ///
    /// # Errors
    /// - `UsernameTaken` if the name is in use.
    fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<(), SessionError>> + Send;

    /// Logs in and returns the username paired with a fresh session token.
    ///
    /// # Errors
    /// - `LoginRejected` for bad credentials.
    fn login(
        &self,
        username: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<Credentials, SessionError>> + Send;
}

// ---------------------------------------------------------------------------
// WebConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebConfig {
    /// Base URL of the web server, with a trailing slash.
    pub base_url: String,
}

impl WebConfig {
    fn url(&self, path: &str) -> String {
        if self.base_url.ends_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// WebAuthenticator
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    password: &'a str,
    email: &'a str,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StatusField {
    Number(u16),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct WebResponse {
    status: StatusField,
    #[serde(default)]
    token: Option<String>,
}

impl WebResponse {
    fn status(&self) -> Result<u16, SessionError> {
        match &self.status {
            StatusField::Number(code) => Ok(*code),
            StatusField::Text(text) => text.trim().parse().map_err(|_| {
                SessionError::MalformedResponse(format!("status {text:?} is not a number"))
            }),
        }
    }
}

/// [`Authenticator`] backed by the KittyWar web server.
#[derive(Debug, Clone)]
pub struct WebAuthenticator {
    config: WebConfig,
    client: reqwest::Client,
}

impl WebAuthenticator {
    pub fn new(config: WebConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &WebConfig {
        &self.config
    }

    async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<WebResponse, SessionError> {
        let url = self.config.url(path);
        let response = self.client.post(&url).json(body).send().await?;
        let http_status = response.status();
        let bytes = response.bytes().await?;

        serde_json::from_slice(&bytes).map_err(|e| {
            if http_status.is_success() {
                SessionError::MalformedResponse(e.to_string())
            } else {
                SessionError::UnexpectedStatus(http_status.as_u16())
            }
        })
    }
}

impl Default for WebAuthenticator {
    fn default() -> Self {
        Self::new(WebConfig::default())
    }
}

impl Authenticator for WebAuthenticator {
    async fn register(&self, username: &str, email: &str, password: &str) -> Result<(), SessionError> {
        let request = RegisterRequest {
            username,
            password,
            email,
        };
        let response = self.post(REGISTER_PATH, &request).await?;

        match response.status()? {
            REGISTER_CREATED => {
                tracing::info!(username, "account registered");
                Ok(())
            }
            REGISTER_TAKEN => Err(SessionError::UsernameTaken(username.to_string())),
            other => Err(SessionError::UnexpectedStatus(other)),
        }
    }

    async fn login(&self, username: &str, password: &str) -> Result<Credentials, SessionError> {
        let request = LoginRequest { username, password };
        let response = self.post(LOGIN_PATH, &request).await?;

        match response.status()? {
            LOGIN_OK => {
                let token = response.token.ok_or_else(|| {
                    SessionError::MalformedResponse("login succeeded without a token".into())
                })?;
                let token = AuthToken::new(token)?;
                tracing::info!(username, "logged in");
                Ok(Credentials::new(username, token))
            }
            LOGIN_FAILED => Err(SessionError::LoginRejected),
            other => Err(SessionError::UnexpectedStatus(other)),
        }
    }
}
