//! Server configuration read from the environment.

use std::net::SocketAddr;

use chrono::TimeDelta;
use docflow_core::identity::Credential;
use docflow_session::WorkspaceConfig;

use crate::error::AppError;

/// Partition used when `DOCFLOW_APP_ID` is unset.
pub const DEFAULT_APP_ID: &str = "default-app-id";

/// Runtime settings for the API server.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Application partition identifier.
    pub app_id: String,
    /// Postgres connection string; in-memory storage when absent.
    pub database_url: Option<String>,
    /// Socket the server listens on.
    pub addr: SocketAddr,
    /// How long a notice stays visible.
    pub notice_ttl: TimeDelta,
    /// Token for the startup sign-in; anonymous when absent.
    pub auth_token: Option<String>,
}

impl Config {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value of
    /// a variable if it is set.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let app_id = non_empty("DOCFLOW_APP_ID").unwrap_or_else(|| DEFAULT_APP_ID.to_owned());
        let host = non_empty("HOST").unwrap_or_else(|| "0.0.0.0".to_owned());
        let port: u16 = non_empty("PORT")
            .unwrap_or_else(|| "3000".to_owned())
            .parse()
            .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;
        let addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
        let ttl_secs: i64 = non_empty("DOCFLOW_NOTICE_TTL_SECS")
            .unwrap_or_else(|| "3".to_owned())
            .parse()
            .map_err(|e| {
                AppError::Config(format!("DOCFLOW_NOTICE_TTL_SECS must be an integer: {e}"))
            })?;
        if ttl_secs <= 0 {
            return Err(AppError::Config(
                "DOCFLOW_NOTICE_TTL_SECS must be positive".to_owned(),
            ));
        }

        Ok(Self {
            app_id,
            database_url: non_empty("DATABASE_URL"),
            addr,
            notice_ttl: TimeDelta::seconds(ttl_secs),
            auth_token: non_empty("DOCFLOW_AUTH_TOKEN"),
        })
    }

    /// Workspace settings derived from this configuration.
    #[must_use]
    pub fn workspace(&self) -> WorkspaceConfig {
        WorkspaceConfig {
            app_id: self.app_id.clone(),
            notice_ttl: self.notice_ttl,
        }
    }

    /// Credential for the startup sign-in.
    #[must_use]
    pub fn credential(&self) -> Credential {
        self.auth_token
            .clone()
            .map_or(Credential::Anonymous, Credential::CustomToken)
    }
}
