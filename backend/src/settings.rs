//! Application settings loaded via OrthoConfig (`REUNION_*` variables,
//! config files and CLI flags).

use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::TimeDelta;
use mockable::Env;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{ClaimSettings, NameMatchPolicy};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_CLAIM_TOKEN_TTL_DAYS: i64 = 7;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid bind address `{value}`")]
    BindAddr { value: String },
    #[error("claim token TTL must be between 1 and 365 days, got {days}")]
    TokenTtl { days: i64 },
    #[error("{0}")]
    NameMatch(String),
    #[error("public base URL `{value}` is not an absolute http(s) URL")]
    PublicBaseUrl { value: String },
    #[error("revoke_previous_tokens must be true or false, got `{value}`")]
    RevokePrevious { value: String },
}

/// Server settings. Every field is optional and has a defaulted accessor.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "REUNION")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without one the server runs on the in-memory store.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Origin used when building claim links.
    pub public_base_url: Option<String>,
    /// Lifetime of newly issued claim tokens, in days.
    pub claim_token_ttl_days: Option<i64>,
    /// `first_match` or `unambiguous`.
    pub name_match: Option<String>,
    /// Revoke earlier unused tokens when a new one is issued for a profile.
    /// Read as text so the environment value is not treated as a CLI switch.
    pub revoke_previous_tokens: Option<String>,
    /// Shared secret the identity proxy presents on `/auth/external`.
    pub identity_proxy_secret: Option<String>,
    /// JSON roster imported on startup.
    pub roster_path: Option<PathBuf>,
}

impl AppSettings {
    /// Listen address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.trim().parse().map_err(|_| SettingsError::BindAddr {
            value: raw.to_owned(),
        })
    }

    /// Database URL from `REUNION_DATABASE_URL`, else plain `DATABASE_URL`.
    pub fn database_url(&self, env: &impl Env) -> Option<String> {
        self.database_url
            .clone()
            .or_else(|| env.string(DATABASE_URL_ENV))
            .filter(|url| !url.trim().is_empty())
    }

    /// Pool cap, defaulting to ten connections.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Claim link origin without a trailing slash.
    pub fn public_base_url(&self) -> Result<String, SettingsError> {
        let raw = self
            .public_base_url
            .as_deref()
            .unwrap_or(DEFAULT_PUBLIC_BASE_URL)
            .trim();
        match url::Url::parse(raw) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {
                Ok(raw.trim_end_matches('/').to_owned())
            }
            _ => Err(SettingsError::PublicBaseUrl {
                value: raw.to_owned(),
            }),
        }
    }

    /// Claim token lifetime, defaulting to seven days.
    pub fn claim_token_ttl(&self) -> Result<TimeDelta, SettingsError> {
        let days = self
            .claim_token_ttl_days
            .unwrap_or(DEFAULT_CLAIM_TOKEN_TTL_DAYS);
        if !(1..=365).contains(&days) {
            return Err(SettingsError::TokenTtl { days });
        }
        Ok(TimeDelta::days(days))
    }

    /// Fuzzy name policy, defaulting to first match.
    pub fn name_match(&self) -> Result<NameMatchPolicy, SettingsError> {
        self.name_match
            .as_deref()
            .map_or(Ok(NameMatchPolicy::default()), str::parse)
            .map_err(SettingsError::NameMatch)
    }

    /// Token revocation flag, off unless set.
    pub fn revoke_previous_tokens(&self) -> Result<bool, SettingsError> {
        let Some(raw) = self.revoke_previous_tokens.as_deref() else {
            return Ok(false);
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" | "" => Ok(false),
            _ => Err(SettingsError::RevokePrevious {
                value: raw.to_owned(),
            }),
        }
    }

    /// Everything the claim service needs from configuration.
    pub fn claim_settings(&self) -> Result<ClaimSettings, SettingsError> {
        Ok(ClaimSettings {
            token_ttl: self.claim_token_ttl()?,
            public_base_url: self.public_base_url()?,
            revoke_previous: self.revoke_previous_tokens()?,
            name_match: self.name_match()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use mockable::MockEnv;
    use rstest::rstest;

    const VARS: [&str; 9] = [
        "REUNION_BIND_ADDR",
        "REUNION_DATABASE_URL",
        "REUNION_DB_MAX_CONNECTIONS",
        "REUNION_PUBLIC_BASE_URL",
        "REUNION_CLAIM_TOKEN_TTL_DAYS",
        "REUNION_NAME_MATCH",
        "REUNION_REVOKE_PREVIOUS_TOKENS",
        "REUNION_IDENTITY_PROXY_SECRET",
        "REUNION_ROSTER_PATH",
    ];

    fn load() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("reunion-backend")])
            .expect("config should load")
    }

    fn env_with(database_url: Option<&'static str>) -> MockEnv {
        let mut env = MockEnv::new();
        env.expect_string()
            .returning(move |name| (name == DATABASE_URL_ENV).then_some(database_url?.to_owned()));
        env
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load();

        assert_eq!(
            settings.bind_addr(),
            Ok(SocketAddr::from(([0, 0, 0, 0], 8080)))
        );
        let claim = settings.claim_settings().expect("claim settings");
        assert_eq!(claim.token_ttl, TimeDelta::days(7));
        assert_eq!(claim.public_base_url, "http://localhost:8080");
        assert!(!claim.revoke_previous);
        assert_eq!(claim.name_match, NameMatchPolicy::FirstMatch);
        assert!(settings.identity_proxy_secret.is_none());
        assert!(settings.roster_path.is_none());
        assert_eq!(settings.db_max_connections(), 10);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("REUNION_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            ("REUNION_DATABASE_URL", None),
            ("REUNION_DB_MAX_CONNECTIONS", Some("4".to_owned())),
            ("REUNION_PUBLIC_BASE_URL", Some("https://reunion.example/".to_owned())),
            ("REUNION_CLAIM_TOKEN_TTL_DAYS", Some("14".to_owned())),
            ("REUNION_NAME_MATCH", Some("unambiguous".to_owned())),
            ("REUNION_REVOKE_PREVIOUS_TOKENS", Some("true".to_owned())),
            ("REUNION_IDENTITY_PROXY_SECRET", Some("s3cret".to_owned())),
            ("REUNION_ROSTER_PATH", Some("/srv/roster.json".to_owned())),
        ]);

        let settings = load();

        assert_eq!(
            settings.bind_addr(),
            Ok(SocketAddr::from(([127, 0, 0, 1], 9000)))
        );
        let claim = settings.claim_settings().expect("claim settings");
        assert_eq!(claim.token_ttl, TimeDelta::days(14));
        assert_eq!(claim.public_base_url, "https://reunion.example");
        assert!(claim.revoke_previous);
        assert_eq!(claim.name_match, NameMatchPolicy::Unambiguous);
        assert_eq!(settings.identity_proxy_secret.as_deref(), Some("s3cret"));
        assert_eq!(settings.roster_path, Some(PathBuf::from("/srv/roster.json")));
        assert_eq!(settings.db_max_connections(), 4);
    }

    #[rstest]
    #[case(Some(0))]
    #[case(Some(-3))]
    #[case(Some(400))]
    fn out_of_range_ttl_is_rejected(#[case] days: Option<i64>) {
        let settings = AppSettings {
            claim_token_ttl_days: days,
            ..AppSettings::default()
        };
        assert!(matches!(
            settings.claim_token_ttl(),
            Err(SettingsError::TokenTtl { .. })
        ));
    }

    #[rstest]
    #[case("not a url")]
    #[case("ftp://reunion.example")]
    fn public_base_url_must_be_http(#[case] raw: &str) {
        let settings = AppSettings {
            public_base_url: Some(raw.to_owned()),
            ..AppSettings::default()
        };
        assert!(settings.public_base_url().is_err());
    }

    #[rstest]
    #[case(None, Ok(false))]
    #[case(Some("true"), Ok(true))]
    #[case(Some(" YES "), Ok(true))]
    #[case(Some("0"), Ok(false))]
    #[case(Some("sometimes"), Err(SettingsError::RevokePrevious { value: "sometimes".to_owned() }))]
    fn revoke_previous_tokens_parses_flag_text(
        #[case] raw: Option<&str>,
        #[case] expected: Result<bool, SettingsError>,
    ) {
        let settings = AppSettings {
            revoke_previous_tokens: raw.map(str::to_owned),
            ..AppSettings::default()
        };
        assert_eq!(settings.revoke_previous_tokens(), expected);
    }

    #[rstest]
    fn revoke_previous_tokens_loads_from_environment() {
        let mut vars = VARS.map(|name| (name, None::<String>));
        vars[6].1 = Some("true".to_owned());
        let _guard = lock_env(vars);

        let claim = load().claim_settings().expect("claim settings");

        assert!(claim.revoke_previous);
    }

    #[rstest]
    fn unknown_name_policy_is_rejected() {
        let settings = AppSettings {
            name_match: Some("closest".to_owned()),
            ..AppSettings::default()
        };
        assert!(matches!(settings.name_match(), Err(SettingsError::NameMatch(_))));
    }

    #[rstest]
    #[case(None, None, None)]
    #[case(None, Some("postgres://fallback"), Some("postgres://fallback"))]
    #[case(Some("postgres://primary"), Some("postgres://fallback"), Some("postgres://primary"))]
    #[case(Some("  "), None, None)]
    fn database_url_prefers_prefixed_setting(
        #[case] configured: Option<&str>,
        #[case] fallback: Option<&'static str>,
        #[case] expected: Option<&str>,
    ) {
        let settings = AppSettings {
            database_url: configured.map(str::to_owned),
            ..AppSettings::default()
        };
        assert_eq!(
            settings.database_url(&env_with(fallback)).as_deref(),
            expected
        );
    }
}
