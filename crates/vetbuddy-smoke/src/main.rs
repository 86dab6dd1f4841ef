//! VetBuddy smoke runner.
//!
//! ```bash
//! # Every suite against a local dev server
//! vetbuddy-smoke
//!
//! # Selected suites against a preview deployment, JSON report
//! vetbuddy-smoke --base-url https://preview.vetbuddy.it --suite invoices --suite payments --format json
//!
//! # Remove created records afterwards
//! vetbuddy-smoke --cleanup
//! ```

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vetbuddy_smoke::suites::{self, SuiteKind};
use vetbuddy_smoke::{Context, ReportFormat, Runner, SmokeConfig};

#[derive(Parser)]
#[command(
    name = "vetbuddy-smoke",
    version,
    about = "Black-box smoke checks for the VetBuddy API",
    long_about = "Runs suites of HTTP checks against a deployed VetBuddy environment and reports pass, fail and skip per check."
)]
struct Cli {
    /// Deployment root, without /api
    #[arg(long, env = "VETBUDDY_BASE_URL")]
    base_url: Option<String>,

    /// Origin sent with checkout requests (default: the base URL)
    #[arg(long, env = "VETBUDDY_ORIGIN_URL")]
    origin_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Pause between checks in milliseconds
    #[arg(long)]
    pause_ms: Option<u64>,

    /// Appointment to pay for in the payment suite
    #[arg(long)]
    appointment_id: Option<String>,

    /// Suite to run; repeat for several (default: all)
    #[arg(long = "suite", value_enum)]
    suites: Vec<SuiteKind>,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,

    /// Delete records created during the run
    #[arg(long)]
    cleanup: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn apply(&self, config: &mut SmokeConfig) {
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        match (&self.origin_url, &self.base_url) {
            (Some(origin), _) => config.origin_url = origin.trim_end_matches('/').to_string(),
            (None, Some(_)) => config.origin_url.clone_from(&config.base_url),
            (None, None) => {}
        }
        if let Some(timeout) = self.timeout {
            config.timeout_seconds = timeout;
        }
        if let Some(pause_ms) = self.pause_ms {
            config.pause = Duration::from_millis(pause_ms);
        }
        if let Some(id) = &self.appointment_id {
            config.appointment_id = Some(id.clone());
        }
        config.cleanup |= self.cleanup;
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "debug"
    } else {
        "info,vetbuddy=debug,hyper=warn,reqwest=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = SmokeConfig::from_env();
    cli.apply(&mut config);

    tracing::info!(
        base_url = %config.base_url,
        timeout_seconds = config.timeout_seconds,
        pause_ms = u64::try_from(config.pause.as_millis()).unwrap_or(u64::MAX),
        clinic = %config.clinic.email,
        owner = %config.owner.email,
        cleanup = config.cleanup,
        "Configuration loaded"
    );

    let mut ctx = match Context::new(config) {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return Ok(ExitCode::from(2));
        }
    };

    let kinds = suites::plan(&cli.suites, ctx.config.cleanup);
    let runner = Runner::new(kinds.into_iter().map(SuiteKind::build).collect());
    let report = runner.run(&mut ctx).await;

    println!("{}", report.render(cli.format)?);

    let tally = report.tally();
    tracing::info!(
        passed = tally.passed,
        failed = tally.failed,
        skipped = tally.skipped,
        "Smoke run finished"
    );

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let argv = std::iter::once("vetbuddy-smoke").chain(args.iter().copied());
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn origin_url_survives_base_url_override() {
        let mut config = SmokeConfig::default();
        cli(&[
            "--base-url",
            "https://preview.vetbuddy.it/",
            "--origin-url",
            "https://app.vetbuddy.it",
        ])
        .apply(&mut config);
        assert_eq!(config.base_url, "https://preview.vetbuddy.it");
        assert_eq!(config.origin_url, "https://app.vetbuddy.it");
    }

    #[test]
    fn origin_url_follows_base_url_when_unset() {
        let mut config = SmokeConfig::default();
        let mut parsed = cli(&["--base-url", "https://preview.vetbuddy.it"]);
        parsed.origin_url = None;
        parsed.apply(&mut config);
        assert_eq!(config.origin_url, "https://preview.vetbuddy.it");
    }

    #[test]
    fn flags_override_config() {
        let mut config = SmokeConfig::default();
        cli(&[
            "--timeout",
            "5",
            "--pause-ms",
            "250",
            "--appointment-id",
            "apt-9",
            "--cleanup",
        ])
        .apply(&mut config);
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.pause, Duration::from_millis(250));
        assert_eq!(config.appointment_id.as_deref(), Some("apt-9"));
        assert!(config.cleanup);
    }
}
