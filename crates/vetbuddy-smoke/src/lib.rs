//! Black-box smoke harness for the VetBuddy REST API.
//!
//! Suites of checks run against a deployed environment through
//! [`vetbuddy_client::VetBuddyClient`] and produce a [`Report`].
//!
//! ```no_run
//! use vetbuddy_smoke::{suites, Context, Runner, SmokeConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut ctx = Context::new(SmokeConfig::from_env())?;
//! let kinds = suites::plan(&[suites::SuiteKind::Health], false);
//! let runner = Runner::new(kinds.into_iter().map(suites::SuiteKind::build).collect());
//! let report = runner.run(&mut ctx).await;
//! println!("{}", report.render_text());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod error;
pub mod fixtures;
pub mod report;
pub mod runner;
pub mod suites;

pub use config::SmokeConfig;
pub use error::{CheckError, ConfigError};
pub use report::{Report, ReportFormat, Tally};
pub use runner::{Account, Check, CheckResult, Context, Fixtures, Outcome, Recorder, Runner, Suite};
