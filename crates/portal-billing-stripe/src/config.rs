//! Stripe client configuration.

use serde::Deserialize;
use std::fmt;
use std::path::Path;

use crate::error::StripeError;

/// Stripe API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.stripe.com/v1";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

const SECRET_PATHS: [&str; 3] = [
    ".secrets/stripe.json",
    "portal-billing/.secrets/stripe.json",
    "../.secrets/stripe.json",
];

/// Configuration for a [`StripeClient`](crate::StripeClient).
///
/// Built once and handed to the client; the credential and content type
/// derived from it are fixed for the client's lifetime.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (`sk_test_...` or `sk_live_...`).
    pub api_key: String,

    /// API base URL without a trailing slash.
    pub base_url: String,

    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

/// Stripe secrets file structure.
#[derive(Debug, Deserialize)]
struct StripeSecrets {
    api_key: String,
}

impl StripeConfig {
    /// Create a configuration for the live Stripe API.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }

    /// Point the client at a different API base (stripe-mock, test servers).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the request timeout.
    #[must_use]
    pub fn with_timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Load configuration from a secrets file or environment variables.
    ///
    /// The key comes from the first `.secrets/stripe.json` found, otherwise
    /// from `STRIPE_PRIVATE_KEY` or `STRIPE_API_KEY`. `STRIPE_API_BASE` and
    /// `STRIPE_TIMEOUT_SECONDS` override the remaining fields.
    ///
    /// # Errors
    ///
    /// Returns [`StripeError::Configuration`] if no API key is available.
    pub fn from_env() -> Result<Self, StripeError> {
        Self::from_sources(first_secrets_key(&SECRET_PATHS[..]), |name| {
            std::env::var(name).ok()
        })
    }

    /// Load configuration from an explicit secrets file, with the other
    /// fields still taken from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`StripeError::Configuration`] if the file cannot be read or
    /// does not contain an `api_key`.
    pub fn from_secrets_file(path: impl AsRef<Path>) -> Result<Self, StripeError> {
        let path = path.as_ref();
        let secrets = load_secrets_file(path).map_err(|e| {
            StripeError::Configuration(format!(
                "failed to load Stripe secrets from {}: {e}",
                path.display()
            ))
        })?;

        Self::from_sources(Some(secrets.api_key), |name| std::env::var(name).ok())
    }

    fn from_sources(
        file_key: Option<String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, StripeError> {
        let api_key = match file_key {
            Some(key) => key,
            None => {
                tracing::debug!("Stripe secrets file not found, using environment variables");
                env("STRIPE_PRIVATE_KEY")
                    .or_else(|| env("STRIPE_API_KEY"))
                    .ok_or_else(|| {
                        StripeError::Configuration(
                            "STRIPE_PRIVATE_KEY is not set and no secrets file was found".into(),
                        )
                    })?
            }
        };

        if api_key.trim().is_empty() {
            return Err(StripeError::Configuration("Stripe API key is empty".into()));
        }

        let mut config = Self::new(api_key);

        if let Some(base_url) = env("STRIPE_API_BASE") {
            config = config.with_base_url(base_url);
        }
        if let Some(timeout) = env("STRIPE_TIMEOUT_SECONDS").and_then(|s| s.parse().ok()) {
            config = config.with_timeout_seconds(timeout);
        }

        Ok(config)
    }

    /// Value of the `Authorization` header sent with every request.
    ///
    /// Keys that already carry a `Bearer ` prefix are used verbatim.
    #[must_use]
    pub fn authorization(&self) -> String {
        if self.api_key.starts_with("Bearer ") {
            self.api_key.clone()
        } else {
            format!("Bearer {}", self.api_key)
        }
    }
}

impl fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StripeConfig")
            .field("api_key", &"[redacted]")
            .field("base_url", &self.base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Key from the first readable secrets file among `paths`.
///
/// A file that exists but cannot be parsed is skipped with a warning.
fn first_secrets_key<P: AsRef<Path>>(paths: &[P]) -> Option<String> {
    paths.iter().find_map(|path| {
        let path = path.as_ref();
        match load_secrets_file(path) {
            Ok(secrets) => {
                tracing::info!(path = %path.display(), "Loaded Stripe secrets from file");
                Some(secrets.api_key)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Ignoring unreadable Stripe secrets file"
                );
                None
            }
        }
    })
}

/// Load secrets from a JSON file.
fn load_secrets_file(path: impl AsRef<Path>) -> Result<StripeSecrets, std::io::Error> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}
