//! TestFlight beta groups and tester notifications

mod client;
mod options;

pub use client::TestFlightClient;
pub use options::{AddBuildToExternalGroupOptions, CreateGroupOptions, NotifyBetaTestersOptions};
