//! Harness configuration.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use vetbuddy_core::Credentials;

use crate::error::ConfigError;

/// Demo clinic seeded in every preview environment.
pub const DEFAULT_CLINIC_EMAIL: &str = "demo@vetbuddy.it";
/// Password of the demo clinic.
pub const DEFAULT_CLINIC_PASSWORD: &str = "DemoVet2025!";
/// Demo owner seeded in every preview environment.
pub const DEFAULT_OWNER_EMAIL: &str = "anna.bianchi@email.com";
/// Password of the demo owner.
pub const DEFAULT_OWNER_PASSWORD: &str = "Password123!";

/// Places searched for the secrets file, first hit wins.
const SECRET_PATHS: [&str; 3] = [
    ".secrets/vetbuddy.json",
    "../.secrets/vetbuddy.json",
    "../../.secrets/vetbuddy.json",
];

/// Harness configuration loaded from environment variables and secrets files.
#[derive(Debug, Clone)]
pub struct SmokeConfig {
    /// Deployment root (default: `http://localhost:3000`). `/api` is appended per request.
    pub base_url: String,

    /// Per-request timeout in seconds (default: 30).
    pub timeout_seconds: u64,

    /// Pause between consecutive checks (default: none).
    pub pause: Duration,

    /// Demo clinic account.
    pub clinic: Credentials,

    /// Demo owner account.
    pub owner: Credentials,

    /// Appointment used for payment checks; one is created when absent or unknown.
    pub appointment_id: Option<String>,

    /// Origin sent with checkout requests (default: the base URL).
    pub origin_url: String,

    /// Delete records created during the run.
    pub cleanup: bool,
}

/// Secrets file structure.
#[derive(Debug, Default, Deserialize)]
struct VetBuddySecrets {
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    clinic: Option<Credentials>,
    #[serde(default)]
    owner: Option<Credentials>,
}

impl Default for SmokeConfig {
    fn default() -> Self {
        let base_url = "http://localhost:3000".to_string();
        Self {
            origin_url: base_url.clone(),
            base_url,
            timeout_seconds: 30,
            pause: Duration::ZERO,
            clinic: Credentials::new(DEFAULT_CLINIC_EMAIL, DEFAULT_CLINIC_PASSWORD),
            owner: Credentials::new(DEFAULT_OWNER_EMAIL, DEFAULT_OWNER_PASSWORD),
            appointment_id: None,
            cleanup: false,
        }
    }
}

impl SmokeConfig {
    /// Load configuration from the secrets file, then environment variables.
    ///
    /// Environment variables win over the file; unparsable numbers fall back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let secrets = find_secrets();
        Self::from_sources(secrets, |key| std::env::var(key).ok())
    }

    fn from_sources(secrets: VetBuddySecrets, env: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let base_url = env("VETBUDDY_BASE_URL")
            .or(secrets.base_url)
            .unwrap_or(defaults.base_url)
            .trim_end_matches('/')
            .to_string();

        let clinic = credentials_from(
            &env,
            "VETBUDDY_CLINIC_EMAIL",
            "VETBUDDY_CLINIC_PASSWORD",
            secrets.clinic.unwrap_or(defaults.clinic),
        );
        let owner = credentials_from(
            &env,
            "VETBUDDY_OWNER_EMAIL",
            "VETBUDDY_OWNER_PASSWORD",
            secrets.owner.unwrap_or(defaults.owner),
        );

        Self {
            origin_url: env("VETBUDDY_ORIGIN_URL").unwrap_or_else(|| base_url.clone()),
            base_url,
            timeout_seconds: env("VETBUDDY_TIMEOUT_SECONDS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.timeout_seconds),
            pause: env("VETBUDDY_PAUSE_MS")
                .and_then(|s| s.parse().ok())
                .map_or(defaults.pause, Duration::from_millis),
            clinic,
            owner,
            appointment_id: env("VETBUDDY_APPOINTMENT_ID").filter(|s| !s.is_empty()),
            cleanup: env("VETBUDDY_CLEANUP").is_some_and(|s| matches!(s.as_str(), "1" | "true")),
        }
    }

    /// Reject settings no run can succeed with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }
        if self.timeout_seconds == 0 || self.timeout_seconds > 600 {
            return Err(ConfigError::InvalidTimeout(self.timeout_seconds));
        }
        Ok(())
    }
}

fn credentials_from(
    env: &impl Fn(&str) -> Option<String>,
    email_key: &str,
    password_key: &str,
    fallback: Credentials,
) -> Credentials {
    Credentials {
        email: env(email_key).unwrap_or(fallback.email),
        password: env(password_key).unwrap_or(fallback.password),
    }
}

fn load_secrets(path: &Path) -> Result<VetBuddySecrets, ConfigError> {
    let secrets_error = |reason: String| ConfigError::Secrets {
        path: path.display().to_string(),
        reason,
    };
    let contents = std::fs::read_to_string(path).map_err(|e| secrets_error(e.to_string()))?;
    serde_json::from_str(&contents).map_err(|e| secrets_error(e.to_string()))
}

fn find_secrets() -> VetBuddySecrets {
    for path in SECRET_PATHS {
        let path = Path::new(path);
        if !path.exists() {
            continue;
        }
        match load_secrets(path) {
            Ok(secrets) => {
                tracing::info!(path = %path.display(), "Loaded VetBuddy secrets");
                return secrets;
            }
            Err(e) => tracing::warn!(error = %e, "Ignoring unreadable secrets file"),
        }
    }
    VetBuddySecrets::default()
}
