//! VetBuddy API client.
//!
//! A thin async client over the VetBuddy REST API. Responses are returned as
//! [`ApiResponse`] whatever their status, because callers routinely assert on
//! 4xx answers; transport failures are the only errors at this layer.
//!
//! # Example
//!
//! ```no_run
//! use vetbuddy_client::VetBuddyClient;
//! use vetbuddy_core::Credentials;
//!
//! # async fn example() -> Result<(), vetbuddy_client::ClientError> {
//! let client = VetBuddyClient::new("https://vetbuddy.example.com")?;
//! let session = client
//!     .sign_in(&Credentials::new("demo@vetbuddy.it", "DemoVet2025!"))
//!     .await?;
//!
//! let clinic = client.authenticated(&session.token);
//! let pets = clinic.list_pets().await?;
//! println!("{} -> {}", pets.status, pets.summary(200));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)] // every endpoint fails only on transport errors

mod client;
mod endpoints;
mod error;
mod response;
mod types;

pub use client::{ClientOptions, VetBuddyClient};
pub use error::ClientError;
pub use response::{ApiResponse, Body};
pub use types::*;
