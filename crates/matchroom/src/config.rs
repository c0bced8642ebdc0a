//! Service configuration.
//!
//! Everything is read from environment variables; unset variables fall
//! back to [`ServerConfig::default`].
//!
//! | Variable                          | Default        |
//! |-----------------------------------|----------------|
//! | `MATCHROOM_BIND`                  | `0.0.0.0:9090` |
//! | `MATCHROOM_SESSION_URL`           | unset          |
//! | `MATCHROOM_IDLE_TIMEOUT_SECS`     | `60`           |
//! | `MATCHROOM_SESSION_TIMEOUT_SECS`  | `5`            |

use std::time::Duration;

use crate::MatchroomError;

pub const BIND_VAR: &str = "MATCHROOM_BIND";
pub const SESSION_URL_VAR: &str = "MATCHROOM_SESSION_URL";
pub const IDLE_TIMEOUT_VAR: &str = "MATCHROOM_IDLE_TIMEOUT_SECS";
pub const SESSION_TIMEOUT_VAR: &str = "MATCHROOM_SESSION_TIMEOUT_SECS";

/// Settings for one server process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the RPC listener binds to.
    pub bind_addr: String,

    /// WebSocket URL of the session backend. `None` runs without one:
    /// joins still pair participants but never carry a session id.
    pub session_url: Option<String>,

    /// A client connection that sends nothing for this long is closed.
    pub idle_timeout: Duration,

    /// Upper bound on one session-backend round trip.
    pub session_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:9090".to_string(),
            session_url: None,
            idle_timeout: Duration::from_secs(60),
            session_timeout: Duration::from_secs(5),
        }
    }
}

impl ServerConfig {
    /// Loads the configuration from the process environment.
    pub fn from_env() -> Result<Self, MatchroomError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration from an arbitrary key lookup.
    ///
    /// Values are trimmed; empty values are treated as unset.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, MatchroomError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut config = Self::default();

        if let Some(addr) = get(BIND_VAR) {
            config.bind_addr = addr;
        }
        config.session_url = get(SESSION_URL_VAR);
        if let Some(raw) = get(IDLE_TIMEOUT_VAR) {
            config.idle_timeout = parse_secs(IDLE_TIMEOUT_VAR, &raw)?;
        }
        if let Some(raw) = get(SESSION_TIMEOUT_VAR) {
            config.session_timeout = parse_secs(SESSION_TIMEOUT_VAR, &raw)?;
        }

        Ok(config)
    }
}

fn parse_secs(key: &str, raw: &str) -> Result<Duration, MatchroomError> {
    let secs: u64 = raw.parse().map_err(|_| {
        MatchroomError::Config(format!("{key} must be a whole number of seconds, got {raw:?}"))
    })?;
    if secs == 0 {
        return Err(MatchroomError::Config(format!("{key} must be greater than zero")));
    }
    Ok(Duration::from_secs(secs))
}
