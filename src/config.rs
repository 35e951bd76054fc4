//! Environment-backed configuration.
//!
//! All keys are read from `LOCKBOX_*` environment variables (a `.env` file is
//! honored via dotenvy in `main`). The engines never touch this global: token
//! timing reaches `AuthEngine` as an explicit [`TokenPolicy`].

use chrono::Duration;
use figment::{Figment, providers::Env};
use serde::Deserialize;
use std::sync::LazyLock;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default = "default_loglevel")]
    pub loglevel: String,
    /// Seconds a freshly issued token stays valid.
    #[serde(default = "default_token_lifetime_secs")]
    pub token_lifetime_secs: u32,
    /// Remaining-lifetime threshold below which authentication reissues.
    #[serde(default = "default_token_min_time_left_secs")]
    pub token_min_time_left_secs: u32,
    /// When set and the account table is empty, an ADMIN account `admin`
    /// with this password is seeded at startup.
    #[serde(default)]
    pub bootstrap_admin_password: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            listen_addr: default_listen_addr(),
            loglevel: default_loglevel(),
            token_lifetime_secs: default_token_lifetime_secs(),
            token_min_time_left_secs: default_token_min_time_left_secs(),
            bootstrap_admin_password: None,
        }
    }
}

impl Config {
    pub fn token_policy(&self) -> TokenPolicy {
        TokenPolicy::new(
            Duration::seconds(i64::from(self.token_lifetime_secs)),
            Duration::seconds(i64::from(self.token_min_time_left_secs)),
        )
    }
}

/// Token timing handed to the auth engine at construction.
///
/// `lifetime < min_time_left` is accepted: it simply means every
/// authentication reissues a token.
#[derive(Debug, Clone)]
pub struct TokenPolicy {
    pub lifetime: Duration,
    pub min_time_left: Duration,
}

impl TokenPolicy {
    /// Panics when either duration is not positive; both values are
    /// deployment configuration and a zero or negative TTL is a broken
    /// deployment, not a runtime condition.
    pub fn new(lifetime: Duration, min_time_left: Duration) -> Self {
        assert!(
            lifetime > Duration::zero(),
            "token lifetime must be positive"
        );
        assert!(
            min_time_left > Duration::zero(),
            "token min_time_left must be positive"
        );
        Self {
            lifetime,
            min_time_left,
        }
    }
}

pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Figment::new()
        .merge(Env::prefixed("LOCKBOX_"))
        .extract()
        .expect("FATAL: invalid LOCKBOX_* environment configuration")
});

fn default_database_url() -> String {
    "sqlite:lockbox.sqlite".to_string()
}

fn default_listen_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_loglevel() -> String {
    "info".to_string()
}

fn default_token_lifetime_secs() -> u32 {
    60
}

fn default_token_min_time_left_secs() -> u32 {
    15
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_positive() {
        let policy = Config::default().token_policy();
        assert!(policy.lifetime > Duration::zero());
        assert!(policy.min_time_left > Duration::zero());
    }

    #[test]
    #[should_panic(expected = "token lifetime must be positive")]
    fn zero_lifetime_is_rejected() {
        let _ = TokenPolicy::new(Duration::zero(), Duration::seconds(15));
    }
}
