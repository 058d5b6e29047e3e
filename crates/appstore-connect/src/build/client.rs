//! Build lookup, status and metadata

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, instrument};

use super::processing::{wait_for_processing, WaitForProcessingOptions};
use crate::error::{ConnectError, Result};
use crate::http::ApiClient;
use crate::types::{BuildProcessingState, Document, PlatformType, ResourceId};

/// Processing status of a build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildStatus {
    pub processing_state: BuildProcessingState,
}

/// Build information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Build {
    /// Build ID
    pub id: String,
    /// Build number
    pub version: String,
    /// Processing state
    pub processing_state: BuildProcessingState,
    /// Whether the build has expired
    pub expired: bool,
    /// Export compliance answer, if given
    pub uses_non_exempt_encryption: Option<bool>,
    /// Upload timestamp
    pub uploaded_date: Option<DateTime<Utc>>,
    /// Minimum OS version
    pub min_os_version: Option<String>,
}

/// Mutable build attributes; `None` fields are left untouched
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uses_non_exempt_encryption: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProcessingStateAttributes {
    processing_state: BuildProcessingState,
}

#[derive(Deserialize)]
struct BuildStateData {
    attributes: ProcessingStateAttributes,
}

/// Client for the `/v1/builds` endpoints
#[derive(Debug, Clone)]
pub struct BuildClient {
    api: ApiClient,
}

impl BuildClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Query filtering builds by app, marketing version, platform and
    /// optional build number
    fn natural_key_query(
        app_id: &str,
        version: &str,
        platform: PlatformType,
        build_number: Option<&str>,
        fields: &str,
    ) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("fields[builds]", fields.to_string()),
            ("filter[app]", app_id.to_string()),
            ("filter[preReleaseVersion.version]", version.to_string()),
            ("filter[preReleaseVersion.platform]", platform.as_str().to_string()),
        ];
        if let Some(build_number) = build_number {
            query.push(("filter[version]", build_number.to_string()));
        }
        query
    }

    fn describe(
        app_id: &str,
        version: &str,
        platform: PlatformType,
        build_number: Option<&str>,
    ) -> String {
        format!(
            "app {} with build number (version): {}, version: {}, platform: {}",
            app_id,
            build_number.unwrap_or("<any>"),
            version,
            platform
        )
    }

    /// Get the ID of the single build matching the natural key
    #[instrument(skip(self))]
    pub async fn get_build_id(
        &self,
        app_id: &str,
        version: &str,
        platform: PlatformType,
        build_number: Option<&str>,
    ) -> Result<String> {
        let query = Self::natural_key_query(app_id, version, platform, build_number, "version");
        let response: Document<Vec<ResourceId>> = self
            .api
            .get_json("/v1/builds", &query, || {
                format!(
                    "Error fetching build for {}",
                    Self::describe(app_id, version, platform, build_number)
                )
            })
            .await?;

        match response.data.as_slice() {
            [build] => Ok(build.id.clone()),
            builds => Err(ConnectError::cardinality(
                format!(
                    "build for {}",
                    Self::describe(app_id, version, platform, build_number)
                ),
                builds.len(),
            )),
        }
    }

    /// Get the processing status of a build by its ID
    #[instrument(skip(self))]
    pub async fn get_build_status_from_build_id(&self, build_id: &str) -> Result<BuildStatus> {
        let query = [
            ("fields[builds]", "processingState".to_string()),
            ("filter[id]", build_id.to_string()),
        ];
        let response: Document<Vec<BuildStateData>> = self
            .api
            .get_json("/v1/builds", &query, || {
                format!("Error fetching build for build id: {}", build_id)
            })
            .await?;

        match response.data.as_slice() {
            [build] => Ok(BuildStatus {
                processing_state: build.attributes.processing_state,
            }),
            builds => Err(ConnectError::cardinality(
                format!("build with id {}", build_id),
                builds.len(),
            )),
        }
    }

    /// Get the processing status of a build by its natural key.
    ///
    /// A build that has not appeared yet reports `UNKNOWN` instead of failing.
    #[instrument(skip(self))]
    pub async fn get_build_status(
        &self,
        app_id: &str,
        version: &str,
        platform: PlatformType,
        build_number: Option<&str>,
    ) -> Result<BuildStatus> {
        let query =
            Self::natural_key_query(app_id, version, platform, build_number, "processingState");
        let response: Document<Vec<BuildStateData>> = self
            .api
            .get_json("/v1/builds", &query, || {
                format!(
                    "Error fetching build for {}",
                    Self::describe(app_id, version, platform, build_number)
                )
            })
            .await?;

        match response.data.as_slice() {
            [] => Ok(BuildStatus {
                processing_state: BuildProcessingState::Unknown,
            }),
            [build] => Ok(BuildStatus {
                processing_state: build.attributes.processing_state,
            }),
            builds => Err(ConnectError::cardinality(
                format!(
                    "build for {}",
                    Self::describe(app_id, version, platform, build_number)
                ),
                builds.len(),
            )),
        }
    }

    /// Wait until the build is processed.
    ///
    /// Fails with `ProcessingFailed` if the build turns out invalid and with
    /// `Timeout` after `max_tries` polls. A build that never appears is only
    /// bounded by `max_tries`.
    #[instrument(skip(self, options))]
    pub async fn wait_for_build_processing_to_complete(
        &self,
        app_id: &str,
        platform: PlatformType,
        version: &str,
        build_number: &str,
        options: &WaitForProcessingOptions,
    ) -> Result<()> {
        wait_for_processing(
            move || async move {
                self.get_build_status(app_id, version, platform, Some(build_number))
                    .await
                    .map(|status| status.processing_state)
            },
            options,
        )
        .await?;

        info!("Build {} ({}) finished processing", version, build_number);
        Ok(())
    }

    /// Get a build by ID
    #[instrument(skip(self))]
    pub async fn get_build(&self, build_id: &str) -> Result<Build> {
        #[derive(Deserialize)]
        struct BuildData {
            id: String,
            attributes: BuildAttributes,
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct BuildAttributes {
            version: String,
            processing_state: BuildProcessingState,
            #[serde(default)]
            expired: bool,
            uses_non_exempt_encryption: Option<bool>,
            uploaded_date: Option<DateTime<Utc>>,
            min_os_version: Option<String>,
        }

        let endpoint = format!("/v1/builds/{}", build_id);
        let response: Document<BuildData> = self
            .api
            .get_json(&endpoint, &[], || {
                format!("Error fetching build with id: {}", build_id)
            })
            .await?;

        let b = response.data;
        Ok(Build {
            id: b.id,
            version: b.attributes.version,
            processing_state: b.attributes.processing_state,
            expired: b.attributes.expired,
            uses_non_exempt_encryption: b.attributes.uses_non_exempt_encryption,
            uploaded_date: b.attributes.uploaded_date,
            min_os_version: b.attributes.min_os_version,
        })
    }

    /// Update build attributes, e.g. the export compliance answer
    #[instrument(skip(self))]
    pub async fn update_build(&self, build_id: &str, update: &BuildUpdate) -> Result<()> {
        let body = json!({
            "data": {
                "type": "builds",
                "id": build_id,
                "attributes": update
            }
        });

        let endpoint = format!("/v1/builds/{}", build_id);
        self.api
            .send(Method::PATCH, &endpoint, &[], Some(&body))
            .await?
            .error_for_status(|| format!("Error updating build with id: {}", build_id))?;

        Ok(())
    }
}
