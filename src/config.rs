//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup and carried in `AppState`; the relay
//! never reads ambient process state after boot, so tests can run it with
//! fake credentials.

use std::env;

/// Application configuration, loaded once at startup.
///
/// Google OAuth credentials are allowed to be absent: the OAuth routes
/// answer `configuration_error` themselves so the rest of the relay (health,
/// CORS preflight) keeps working on an unconfigured deployment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Google OAuth client ID (empty when not configured)
    pub google_client_id: String,
    /// Google OAuth client secret (empty when not configured)
    pub google_client_secret: String,
    /// Fixed OAuth redirect URI; derived from the request Host when unset
    pub google_redirect_uri: Option<String>,
    /// HMAC key for signing the OAuth state parameter
    pub oauth_state_key: Vec<u8>,
    /// Web build origin, used for CORS
    pub frontend_url: String,
    /// API key for the quote content API (empty: fallback quotes only)
    pub quotes_api_key: String,
    /// Supabase project URL (empty when the remote DB is not configured)
    pub supabase_url: String,
    /// Supabase service role key
    pub supabase_service_role_key: String,
    /// openId that gets promoted to the admin role on upsert
    pub owner_open_id: String,
    /// Server port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            google_client_id: env::var("GOOGLE_CLIENT_ID").unwrap_or_default(),
            google_client_secret: env::var("GOOGLE_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .unwrap_or_default(),
            google_redirect_uri: env::var("GOOGLE_REDIRECT_URI").ok(),
            oauth_state_key: env::var("OAUTH_STATE_KEY")
                .map_err(|_| ConfigError::Missing("OAUTH_STATE_KEY"))?
                .into_bytes(),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:8081".to_string()),
            quotes_api_key: env::var("QUOTES_API_KEY").unwrap_or_default(),
            supabase_url: env::var("SUPABASE_URL").unwrap_or_default(),
            supabase_service_role_key: env::var("SUPABASE_SERVICE_ROLE_KEY")
                .map(|v| v.trim().to_string())
                .unwrap_or_default(),
            owner_open_id: env::var("OWNER_OPEN_ID").unwrap_or_default(),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
        })
    }

    /// True when both Google OAuth credentials are present.
    pub fn google_oauth_configured(&self) -> bool {
        !self.google_client_id.is_empty() && !self.google_client_secret.is_empty()
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            google_client_id: "test_client_id".to_string(),
            google_client_secret: "test_secret".to_string(),
            google_redirect_uri: None,
            oauth_state_key: b"test_state_key_32_bytes_minimum!".to_vec(),
            frontend_url: "http://localhost:8081".to_string(),
            quotes_api_key: String::new(),
            supabase_url: String::new(),
            supabase_service_role_key: String::new(),
            owner_open_id: String::new(),
            port: 8080,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
