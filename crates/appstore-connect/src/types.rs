//! Common types shared by the App Store Connect clients

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Platform a version or build targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlatformType {
    #[serde(rename = "IOS")]
    Ios,
    #[serde(rename = "MAC_OS")]
    MacOs,
    #[serde(rename = "TV_OS")]
    TvOs,
}

impl PlatformType {
    /// Wire representation used in filters and payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformType::Ios => "IOS",
            PlatformType::MacOs => "MAC_OS",
            PlatformType::TvOs => "TV_OS",
        }
    }
}

impl std::fmt::Display for PlatformType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Processing state of an uploaded build
///
/// `Unknown` is also used locally for a build that has not appeared yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildProcessingState {
    Unknown,
    Processing,
    Valid,
    Invalid,
    Failed,
}

impl BuildProcessingState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildProcessingState::Unknown => "UNKNOWN",
            BuildProcessingState::Processing => "PROCESSING",
            BuildProcessingState::Valid => "VALID",
            BuildProcessingState::Invalid => "INVALID",
            BuildProcessingState::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for BuildProcessingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of an app store version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppStoreState {
    Accepted,
    DeveloperRemovedFromSale,
    DeveloperRejected,
    InReview,
    InvalidBinary,
    MetadataRejected,
    NotApplicable,
    PendingAppleRelease,
    PendingContract,
    PendingDeveloperRelease,
    PrepareForSubmission,
    PreorderReadyForSale,
    ProcessingForAppStore,
    ReadyForReview,
    ReadyForSale,
    Rejected,
    RemovedFromSale,
    ReplacedWithNewVersion,
    WaitingForExportCompliance,
    WaitingForReview,
}

impl AppStoreState {
    /// States in which an unreleased version may still have its version
    /// string changed
    pub const RENAMEABLE: [AppStoreState; 10] = [
        AppStoreState::DeveloperRemovedFromSale,
        AppStoreState::DeveloperRejected,
        AppStoreState::InvalidBinary,
        AppStoreState::MetadataRejected,
        AppStoreState::PendingContract,
        AppStoreState::PendingDeveloperRelease,
        AppStoreState::PrepareForSubmission,
        AppStoreState::Rejected,
        AppStoreState::RemovedFromSale,
        AppStoreState::WaitingForExportCompliance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppStoreState::Accepted => "ACCEPTED",
            AppStoreState::DeveloperRemovedFromSale => "DEVELOPER_REMOVED_FROM_SALE",
            AppStoreState::DeveloperRejected => "DEVELOPER_REJECTED",
            AppStoreState::InReview => "IN_REVIEW",
            AppStoreState::InvalidBinary => "INVALID_BINARY",
            AppStoreState::MetadataRejected => "METADATA_REJECTED",
            AppStoreState::NotApplicable => "NOT_APPLICABLE",
            AppStoreState::PendingAppleRelease => "PENDING_APPLE_RELEASE",
            AppStoreState::PendingContract => "PENDING_CONTRACT",
            AppStoreState::PendingDeveloperRelease => "PENDING_DEVELOPER_RELEASE",
            AppStoreState::PrepareForSubmission => "PREPARE_FOR_SUBMISSION",
            AppStoreState::PreorderReadyForSale => "PREORDER_READY_FOR_SALE",
            AppStoreState::ProcessingForAppStore => "PROCESSING_FOR_APP_STORE",
            AppStoreState::ReadyForReview => "READY_FOR_REVIEW",
            AppStoreState::ReadyForSale => "READY_FOR_SALE",
            AppStoreState::Rejected => "REJECTED",
            AppStoreState::RemovedFromSale => "REMOVED_FROM_SALE",
            AppStoreState::ReplacedWithNewVersion => "REPLACED_WITH_NEW_VERSION",
            AppStoreState::WaitingForExportCompliance => "WAITING_FOR_EXPORT_COMPLIANCE",
            AppStoreState::WaitingForReview => "WAITING_FOR_REVIEW",
        }
    }
}

impl std::fmt::Display for AppStoreState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a version is released once approved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReleaseType {
    Manual,
    AfterApproval,
    Scheduled,
}

impl ReleaseType {
    /// Release type implied by an auto-release flag
    pub fn from_auto_release(auto_release: bool) -> Self {
        if auto_release {
            ReleaseType::AfterApproval
        } else {
            ReleaseType::Manual
        }
    }
}

/// JSON:API top-level document
#[derive(Debug, Deserialize)]
pub(crate) struct Document<T> {
    pub data: T,
}

/// A resource reduced to its identifier
#[derive(Debug, Deserialize)]
pub(crate) struct ResourceId {
    pub id: String,
}

/// Resource identifier object used in relationship payloads
pub(crate) fn resource_identifier(resource_type: &str, id: &str) -> Value {
    json!({
        "type": resource_type,
        "id": id
    })
}

/// A to-one relationship wrapper: `{"data": {"type": .., "id": ..}}`
pub(crate) fn to_one(resource_type: &str, id: &str) -> Value {
    json!({ "data": resource_identifier(resource_type, id) })
}
