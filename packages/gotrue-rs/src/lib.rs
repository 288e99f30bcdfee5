// Minimal client for a GoTrue-style auth service (Supabase auth API).
//
// Covers the four calls the catalog core needs: building an OAuth authorize
// URL, sending a magic-link email, fetching the user behind an access token,
// and revoking a session.

pub mod models;

use reqwest::{header, Client, StatusCode};
use thiserror::Error;

use crate::models::{AuthUser, ErrorBody};

#[derive(Debug, Error)]
pub enum GoTrueError {
    #[error("request to auth service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("auth service returned {status}: {message}")]
    Service {
        status: StatusCode,
        message: String,
    },

    #[error("session is invalid or expired")]
    InvalidSession,
}

#[derive(Debug, Clone)]
pub struct GoTrueOptions {
    /// Base URL of the auth service, e.g. "https://abc.supabase.co"
    pub base_url: String,
    /// Public (anon) API key sent with every request
    pub anon_key: String,
    /// Where the provider should redirect after a successful OAuth exchange
    pub redirect_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GoTrueService {
    options: GoTrueOptions,
    client: Client,
}

impl GoTrueService {
    pub fn new(options: GoTrueOptions) -> Self {
        Self {
            options,
            client: Client::new(),
        }
    }

    /// Build the authorize URL for an OAuth provider (e.g. "google").
    ///
    /// The caller opens this URL in a browser; no request is made here.
    pub fn authorize_url(&self, provider: &str) -> String {
        let mut url = format!(
            "{}/auth/v1/authorize?provider={}",
            self.options.base_url.trim_end_matches('/'),
            urlencoding::encode(provider)
        );
        if let Some(redirect) = &self.options.redirect_url {
            url.push_str("&redirect_to=");
            url.push_str(&urlencoding::encode(redirect));
        }
        url
    }

    /// Send a magic-link sign-in email.
    pub async fn send_magic_link(&self, email: &str) -> Result<(), GoTrueError> {
        let url = format!(
            "{}/auth/v1/otp",
            self.options.base_url.trim_end_matches('/')
        );

        let mut body = serde_json::json!({
            "email": email,
            "create_user": false,
        });
        if let Some(redirect) = &self.options.redirect_url {
            body["options"] = serde_json::json!({ "email_redirect_to": redirect });
        }

        let response = self
            .client
            .post(url)
            .header("apikey", &self.options.anon_key)
            .json(&body)
            .send()
            .await?;

        Self::check_status(response).await.map(|_| ())
    }

    /// Fetch the user behind an access token.
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser, GoTrueError> {
        let url = format!(
            "{}/auth/v1/user",
            self.options.base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .get(url)
            .header("apikey", &self.options.anon_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", access_token))
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(GoTrueError::InvalidSession);
        }

        let response = Self::check_status(response).await?;
        Ok(response.json::<AuthUser>().await?)
    }

    /// Revoke the session behind an access token (global sign-out).
    pub async fn sign_out(&self, access_token: &str) -> Result<(), GoTrueError> {
        let url = format!(
            "{}/auth/v1/logout",
            self.options.base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .post(url)
            .header("apikey", &self.options.anon_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", access_token))
            .send()
            .await?;

        // GoTrue answers 204 on success; an already-dead session is fine too.
        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(());
        }

        Self::check_status(response).await.map(|_| ())
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, GoTrueError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.message(),
            Err(_) => "unreadable error body".to_string(),
        };

        Err(GoTrueError::Service { status, message })
    }
}
