//! App store versions and review submission

mod client;
mod types;

pub use client::ReleaseClient;
pub use types::{
    CreateVersionOptions, EnsureVersionOptions, Localization, LocalizedText, ReleaseNotes,
    ReviewDetails, SubmitForReviewOptions, VersionUpdate, DEFAULT_RELEASE_NOTES_LOCALE,
};
