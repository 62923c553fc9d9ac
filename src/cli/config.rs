use anyhow::{anyhow, bail, Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::{fmt, time::Duration};
use url::Url;

/// Process-wide settings, built once at startup and never mutated.
#[derive(Clone)]
pub struct Config {
    port: u16,
    database_url: String,
    jwt_secret: SecretString,
    token_ttl: Option<Duration>,
}

impl Config {
    /// Validate the raw CLI values.
    ///
    /// `token_ttl_seconds == 0` means issued tokens never expire.
    ///
    /// # Errors
    /// Returns an error if the database URL is not a Postgres URL or the JWT
    /// secret is empty.
    pub fn new(
        port: u16,
        database_url: &str,
        jwt_secret: SecretString,
        token_ttl_seconds: u64,
    ) -> Result<Self> {
        let parsed = Url::parse(database_url)
            .with_context(|| format!("Invalid database URL: {}", redact_dsn(database_url)))?;
        if !matches!(parsed.scheme(), "postgres" | "postgresql") {
            return Err(anyhow!(
                "Database URL must use the postgres scheme, got: {}",
                parsed.scheme()
            ));
        }

        if jwt_secret.expose_secret().trim().is_empty() {
            bail!("JWT secret must not be empty");
        }

        Ok(Self {
            port,
            database_url: database_url.to_string(),
            jwt_secret,
            token_ttl: (token_ttl_seconds > 0).then(|| Duration::from_secs(token_ttl_seconds)),
        })
    }

    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    #[must_use]
    pub const fn jwt_secret(&self) -> &SecretString {
        &self.jwt_secret
    }

    #[must_use]
    pub const fn token_ttl(&self) -> Option<Duration> {
        self.token_ttl
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("database_url", &redact_dsn(&self.database_url))
            .field("jwt_secret", &"[REDACTED]")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

/// Strip the password from a DSN before it reaches the logs.
#[must_use]
pub fn redact_dsn(dsn: &str) -> String {
    match Url::parse(dsn) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("REDACTED"));
            }
            parsed.to_string()
        }
        Err(_) => "invalid-dsn".to_string(),
    }
}
