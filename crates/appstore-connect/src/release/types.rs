//! Release option and payload types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::ReleaseType;

/// Locale used for release notes given as plain text
pub const DEFAULT_RELEASE_NOTES_LOCALE: &str = "en-US";

/// Options for creating a new app store version
#[derive(Debug, Clone, Default)]
pub struct CreateVersionOptions {
    /// Release automatically once approved (`AFTER_APPROVAL`), otherwise `MANUAL`
    pub auto_release: bool,
    pub copyright: String,
    pub uses_idfa: bool,
}

/// Options for [`ReleaseClient::ensure_version_exists`](super::ReleaseClient::ensure_version_exists)
#[derive(Debug, Clone, Default)]
pub struct EnsureVersionOptions {
    /// When creating the version conflicts with an existing unreleased
    /// version, rename that version instead of failing
    pub update_version_string_if_unreleased_version_exists: bool,
    pub create_options: CreateVersionOptions,
}

/// Version attributes to change; `None` fields are left untouched
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_type: Option<ReleaseType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earliest_release_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uses_idfa: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downloadable: Option<bool>,
}

/// Store listing text for one locale of a version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Localization {
    /// Locale tag, e.g. `en-US`. Matched exactly, case included.
    #[serde(skip_serializing)]
    pub locale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marketing_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotional_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whats_new: Option<String>,
}

impl Localization {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            ..Default::default()
        }
    }

    pub fn with_whats_new(mut self, whats_new: impl Into<String>) -> Self {
        self.whats_new = Some(whats_new.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Release notes text for one language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedText {
    pub lang: String,
    pub text: String,
}

impl LocalizedText {
    pub fn new(lang: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            text: text.into(),
        }
    }
}

/// "What's new" text for a version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseNotes {
    /// Text for `en-US`
    Text(String),
    /// Text for a single language
    Localized(LocalizedText),
    /// Text for several languages
    Many(Vec<LocalizedText>),
}

impl ReleaseNotes {
    /// Localizations carrying only the `whats_new` field
    pub fn into_localizations(self) -> Vec<Localization> {
        let texts = match self {
            ReleaseNotes::Text(text) => vec![LocalizedText::new(DEFAULT_RELEASE_NOTES_LOCALE, text)],
            ReleaseNotes::Localized(text) => vec![text],
            ReleaseNotes::Many(texts) => texts,
        };

        texts
            .into_iter()
            .map(|t| Localization::new(t.lang).with_whats_new(t.text))
            .collect()
    }
}

impl From<String> for ReleaseNotes {
    fn from(text: String) -> Self {
        ReleaseNotes::Text(text)
    }
}

impl From<&str> for ReleaseNotes {
    fn from(text: &str) -> Self {
        ReleaseNotes::Text(text.to_string())
    }
}

impl From<LocalizedText> for ReleaseNotes {
    fn from(text: LocalizedText) -> Self {
        ReleaseNotes::Localized(text)
    }
}

impl From<Vec<LocalizedText>> for ReleaseNotes {
    fn from(texts: Vec<LocalizedText>) -> Self {
        ReleaseNotes::Many(texts)
    }
}

/// Information for the App Review team
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_account_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_account_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_account_required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Options for submitting a version for review.
///
/// Every optional step runs before the submission itself, in field order.
#[derive(Debug, Clone, Default)]
pub struct SubmitForReviewOptions {
    /// Create the version first if it does not exist
    pub auto_create_version: bool,
    pub version_create_options: CreateVersionOptions,

    /// Update the release type. Any `Some` triggers the update, and
    /// `Some(false)` switches the version to manual release.
    pub auto_release_on_approval: Option<bool>,

    /// Attach this build before submitting
    pub build_id: Option<String>,
    pub localizations: Option<Vec<Localization>>,
    pub release_notes: Option<ReleaseNotes>,
    pub review_details: Option<ReviewDetails>,
}
