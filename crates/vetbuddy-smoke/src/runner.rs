//! Check execution: suites, per-run context and outcome recording.

use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};
use vetbuddy_client::{ClientOptions, Session, VetBuddyClient};

use crate::config::SmokeConfig;
use crate::error::{CheckError, ConfigError};
use crate::report::Report;

/// Result type of a single check body.
pub type Check = Result<(), CheckError>;

/// How a check ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum Outcome {
    /// Every assertion held.
    Passed,
    /// An assertion or request failed.
    Failed(String),
    /// A prerequisite was missing.
    Skipped(String),
}

impl Outcome {
    /// Passed.
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Skipped.
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }

    /// Reason for a failure or skip.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Passed => None,
            Self::Failed(reason) | Self::Skipped(reason) => Some(reason),
        }
    }
}

impl From<Check> for Outcome {
    fn from(check: Check) -> Self {
        match check {
            Ok(()) => Self::Passed,
            Err(CheckError::Skipped(reason)) => Self::Skipped(reason),
            Err(e) => Self::Failed(e.to_string()),
        }
    }
}

/// One recorded check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    /// Suite the check belongs to.
    pub suite: String,
    /// Check name.
    pub name: String,
    /// How it ended.
    pub outcome: Outcome,
    /// Wall-clock time spent, in milliseconds.
    pub elapsed_ms: u64,
}

/// A group of checks covering one API area.
#[async_trait]
pub trait Suite: Send + Sync {
    /// Stable suite name used in reports and on the command line.
    fn name(&self) -> &'static str;

    /// Run every check of the suite in order.
    async fn run(&self, ctx: &mut Context) -> Vec<CheckResult>;
}

/// Collects the results of one suite.
pub struct Recorder {
    suite: &'static str,
    pause: Duration,
    results: Vec<CheckResult>,
}

impl Recorder {
    /// Start recording for `suite`.
    #[must_use]
    pub fn new(suite: &'static str, ctx: &Context) -> Self {
        Self {
            suite,
            pause: ctx.config.pause,
            results: Vec::new(),
        }
    }

    /// Run one check, time it and record the outcome.
    pub async fn check<F>(&mut self, name: &str, check: F) -> &Outcome
    where
        F: Future<Output = Check>,
    {
        if !self.results.is_empty() && !self.pause.is_zero() {
            tokio::time::sleep(self.pause).await;
        }

        let started = Instant::now();
        let outcome = Outcome::from(check.await);
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match &outcome {
            Outcome::Passed => {
                tracing::info!(suite = self.suite, check = name, elapsed_ms, "Check passed");
            }
            Outcome::Failed(reason) => {
                tracing::error!(suite = self.suite, check = name, elapsed_ms, %reason, "Check failed");
            }
            Outcome::Skipped(reason) => {
                tracing::warn!(suite = self.suite, check = name, %reason, "Check skipped");
            }
        }

        self.results.push(CheckResult {
            suite: self.suite.to_string(),
            name: name.to_string(),
            outcome,
            elapsed_ms,
        });
        &self.results[self.results.len() - 1].outcome
    }

    /// Hand over everything recorded.
    #[must_use]
    pub fn finish(self) -> Vec<CheckResult> {
        self.results
    }
}

/// Accounts the harness signs in as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Account {
    /// Clinic registered during this run.
    Registered,
    /// Configured demo clinic.
    Clinic,
    /// Configured demo owner.
    Owner,
}

impl Account {
    /// Label used in skip reasons.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Registered => "registered clinic",
            Self::Clinic => "demo clinic",
            Self::Owner => "demo owner",
        }
    }
}

/// Records created by earlier checks, consumed by later ones and by cleanup.
#[derive(Debug, Clone, Default)]
pub struct Fixtures {
    /// Email of the clinic registered in this run.
    pub registered_email: Option<String>,
    /// Appointment created in this run.
    pub appointment_id: Option<String>,
    /// Appointment the payment checks used.
    pub payment_appointment_id: Option<String>,
    /// Whether that appointment was created by this run.
    pub payment_appointment_created: bool,
    /// Document created in this run.
    pub document_id: Option<String>,
    /// Staff member created in this run.
    pub staff_id: Option<String>,
    /// Pet created in this run.
    pub pet_id: Option<String>,
    /// Invoice issued in this run.
    pub invoice_id: Option<String>,
    /// Price-list service created in this run.
    pub service_id: Option<String>,
}

/// State shared by all suites of one run.
pub struct Context {
    /// Effective configuration.
    pub config: SmokeConfig,
    /// Ids captured by earlier checks.
    pub fixtures: Fixtures,
    client: VetBuddyClient,
    sessions: HashMap<Account, Result<Session, String>>,
}

impl Context {
    /// Build the unauthenticated client for `config`.
    pub fn new(config: SmokeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let client = VetBuddyClient::with_options(
            config.base_url.clone(),
            ClientOptions::with_timeout(config.timeout_seconds),
        )?;
        Ok(Self {
            config,
            fixtures: Fixtures::default(),
            client,
            sessions: HashMap::new(),
        })
    }

    /// Client without a token.
    #[must_use]
    pub fn client(&self) -> &VetBuddyClient {
        &self.client
    }

    /// Remember a session obtained by a check.
    pub fn store_session(&mut self, account: Account, session: Session) {
        self.sessions.insert(account, Ok(session));
    }

    /// Session for `account`, signing in on first use.
    ///
    /// A failed sign-in is remembered so dependent checks skip instead of
    /// retrying the login.
    pub async fn session(&mut self, account: Account) -> Result<Session, CheckError> {
        if !self.sessions.contains_key(&account) {
            let credentials = match account {
                Account::Registered => {
                    return Err(CheckError::Skipped(
                        "no clinic was registered in this run".to_string(),
                    ))
                }
                Account::Clinic => self.config.clinic.clone(),
                Account::Owner => self.config.owner.clone(),
            };
            let attempt = self
                .client
                .sign_in(&credentials)
                .await
                .map_err(|e| e.to_string());
            if let Err(reason) = &attempt {
                tracing::warn!(account = account.label(), %reason, "Sign-in failed");
            }
            self.sessions.insert(account, attempt);
        }

        match self.sessions.get(&account) {
            Some(Ok(session)) => Ok(session.clone()),
            Some(Err(reason)) => Err(CheckError::Skipped(format!(
                "{} login failed: {reason}",
                account.label()
            ))),
            None => Err(CheckError::Skipped(format!(
                "{} has no session",
                account.label()
            ))),
        }
    }

    /// Client carrying the token of `account`.
    pub async fn client_as(&mut self, account: Account) -> Result<VetBuddyClient, CheckError> {
        let session = self.session(account).await?;
        Ok(self.client.authenticated(&session.token))
    }

    /// Clinic used for record-creating checks: the registered one, else the demo clinic.
    pub async fn workspace(&mut self) -> Result<VetBuddyClient, CheckError> {
        if matches!(self.sessions.get(&Account::Registered), Some(Ok(_))) {
            self.client_as(Account::Registered).await
        } else {
            self.client_as(Account::Clinic).await
        }
    }
}

/// Runs suites in order against one deployment.
pub struct Runner {
    suites: Vec<Box<dyn Suite>>,
}

impl Runner {
    /// Runner over `suites`, executed in the given order.
    #[must_use]
    pub fn new(suites: Vec<Box<dyn Suite>>) -> Self {
        Self { suites }
    }

    /// Run every suite and collect the report.
    pub async fn run(&self, ctx: &mut Context) -> Report {
        let started_at = chrono::Utc::now();
        tracing::info!(
            base_url = %ctx.config.base_url,
            suites = self.suites.len(),
            "Starting VetBuddy smoke run"
        );

        let mut results = Vec::new();
        for suite in &self.suites {
            tracing::info!(suite = suite.name(), "Running suite");
            results.extend(suite.run(ctx).await);
        }

        Report {
            base_url: ctx.config.base_url.clone(),
            started_at,
            finished_at: chrono::Utc::now(),
            results,
        }
    }
}
