//! Client library for Apple's App Store Connect API
//!
//! Covers the release pipeline of an app:
//!
//! - **Builds**: resolve build IDs, read processing state, wait for processing
//! - **Releases**: create versions, attach builds, set localizations and
//!   review details, submit for review
//! - **TestFlight**: external beta groups, adding builds, notifying testers
//! - **Sales**: summary sales reports, downloads per app, in-app purchases
//!
//! Requests are authorized with a bearer token from a [`TokenProvider`].
//! Signing the token is left to the provider.
//!
//! ## Usage
//!
//! ```ignore
//! use appstore_connect::{AppStoreConnect, PlatformType, StaticTokenProvider};
//! use appstore_connect::build::WaitForProcessingOptions;
//!
//! let client = AppStoreConnect::new(StaticTokenProvider::from_env()?)?;
//!
//! client
//!     .wait_for_build_processing_to_complete(
//!         "1234567890",
//!         PlatformType::Ios,
//!         "1.2.0",
//!         "42",
//!         &WaitForProcessingOptions::default(),
//!     )
//!     .await?;
//! ```

pub mod auth;
pub mod build;
pub mod client;
pub mod config;
pub mod error;
pub mod release;
pub mod sales;
pub mod testflight;
pub mod types;

mod http;

pub use auth::{StaticTokenProvider, TokenProvider};
pub use client::AppStoreConnect;
pub use config::{ClientConfig, API_HOST};
pub use error::{ConnectError, Result};
pub use http::ApiClient;
pub use types::{AppStoreState, BuildProcessingState, PlatformType, ReleaseType};
