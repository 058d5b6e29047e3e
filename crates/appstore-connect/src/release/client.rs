//! App store version lifecycle: creation, build attachment, metadata and
//! review submission

use futures::future::try_join_all;
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, instrument};

use super::types::{
    CreateVersionOptions, EnsureVersionOptions, Localization, ReviewDetails,
    SubmitForReviewOptions, VersionUpdate,
};
use crate::error::{ConnectError, Result};
use crate::http::ApiClient;
use crate::types::{to_one, AppStoreState, Document, PlatformType, ReleaseType, ResourceId};

/// A localization that already exists on a version
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RemoteLocalization {
    pub id: String,
    pub attributes: RemoteLocalizationAttributes,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RemoteLocalizationAttributes {
    pub locale: String,
}

/// Split requested localizations into those to create and those to update
/// (paired with the remote localization id). Locales match exactly.
pub(crate) fn partition_localizations<'a>(
    requested: &'a [Localization],
    existing: &[RemoteLocalization],
) -> (Vec<&'a Localization>, Vec<(String, &'a Localization)>) {
    let mut missing = Vec::new();
    let mut present = Vec::new();

    for localization in requested {
        match existing
            .iter()
            .find(|remote| remote.attributes.locale == localization.locale)
        {
            Some(remote) => present.push((remote.id.clone(), localization)),
            None => missing.push(localization),
        }
    }

    (missing, present)
}

/// Client for app store versions and their metadata
#[derive(Debug, Clone)]
pub struct ReleaseClient {
    api: ApiClient,
}

impl ReleaseClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    async fn find_versions(
        &self,
        app_id: &str,
        version: &str,
        platform: PlatformType,
    ) -> Result<Vec<ResourceId>> {
        let endpoint = format!("/v1/apps/{}/appStoreVersions", app_id);
        let query = [
            ("filter[versionString]", version.to_string()),
            ("filter[platform]", platform.as_str().to_string()),
        ];

        let response: Document<Vec<ResourceId>> = self
            .api
            .get_json(&endpoint, &query, || {
                format!(
                    "Error fetching version for app {} with version: {}, platform: {}",
                    app_id, version, platform
                )
            })
            .await?;

        Ok(response.data)
    }

    /// Create the version unless it already exists, returning its ID.
    ///
    /// If creation conflicts (409) and
    /// `update_version_string_if_unreleased_version_exists` is set, the one
    /// unreleased version still in an editable state is renamed instead.
    #[instrument(skip(self, options))]
    pub async fn ensure_version_exists(
        &self,
        app_id: &str,
        version: &str,
        platform: PlatformType,
        options: &EnsureVersionOptions,
    ) -> Result<String> {
        let existing = self.find_versions(app_id, version, platform).await?;

        match existing.as_slice() {
            [] => {}
            [found] => {
                debug!("Version {} already exists", version);
                return Ok(found.id.clone());
            }
            found => {
                return Err(ConnectError::cardinality(
                    format!(
                        "version for app {}, version: {}, platform: {}",
                        app_id, version, platform
                    ),
                    found.len(),
                ))
            }
        }

        match self
            .create_version(app_id, version, platform, &options.create_options)
            .await
        {
            Ok(version_id) => Ok(version_id),
            Err(e) if e.is_conflict() && options.update_version_string_if_unreleased_version_exists => {
                self.rename_unreleased_version(app_id, version, platform)
                    .await
            }
            Err(e) => Err(e),
        }
    }

    /// Give the single editable version of the app the new version string
    async fn rename_unreleased_version(
        &self,
        app_id: &str,
        version: &str,
        platform: PlatformType,
    ) -> Result<String> {
        let states = AppStoreState::RENAMEABLE
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(",");

        let endpoint = format!("/v1/apps/{}/appStoreVersions", app_id);
        let query = [
            ("filter[platform]", platform.as_str().to_string()),
            ("filter[appStoreState]", states),
        ];

        let response: Document<Vec<ResourceId>> = self
            .api
            .get_json(&endpoint, &query, || {
                format!(
                    "Error fetching version for app {} with version: {}, platform: {}",
                    app_id, version, platform
                )
            })
            .await?;

        let version_id = match response.data.as_slice() {
            [existing] => existing.id.clone(),
            found => {
                return Err(ConnectError::cardinality(
                    format!(
                        "unreleased version for app {}, platform: {} to rename to {}",
                        app_id, platform, version
                    ),
                    found.len(),
                ))
            }
        };

        let update = VersionUpdate {
            version_string: Some(version.to_string()),
            ..Default::default()
        };
        self.update_version_by_version_id(&version_id, &update)
            .await?;

        info!("Renamed version {} to {}", version_id, version);
        Ok(version_id)
    }

    /// Create a new version, returning its ID
    #[instrument(skip(self, options))]
    pub async fn create_version(
        &self,
        app_id: &str,
        version: &str,
        platform: PlatformType,
        options: &CreateVersionOptions,
    ) -> Result<String> {
        let body = json!({
            "data": {
                "type": "appStoreVersions",
                "attributes": {
                    "platform": platform,
                    "versionString": version,
                    "copyright": options.copyright,
                    "releaseType": ReleaseType::from_auto_release(options.auto_release),
                    "usesIdfa": options.uses_idfa
                },
                "relationships": {
                    "app": to_one("apps", app_id)
                }
            }
        });

        let response: Document<ResourceId> = self
            .api
            .send(Method::POST, "/v1/appStoreVersions", &[], Some(&body))
            .await?
            .error_for_status(|| {
                format!(
                    "Error creating version for app {}, version: {}, platform: {}",
                    app_id, version, platform
                )
            })?
            .json()?;

        info!("Created version {} ({}) for app {}", version, platform, app_id);
        Ok(response.data.id)
    }

    /// Get the ID of the version matching the version string and platform
    #[instrument(skip(self))]
    pub async fn get_version_id(
        &self,
        app_id: &str,
        version: &str,
        platform: PlatformType,
    ) -> Result<String> {
        let versions = self.find_versions(app_id, version, platform).await?;

        match versions.as_slice() {
            [found] => Ok(found.id.clone()),
            found => Err(ConnectError::cardinality(
                format!(
                    "version for app {} with version: {}, platform: {}",
                    app_id, version, platform
                ),
                found.len(),
            )),
        }
    }

    /// Attach a build to the version matching the version string and platform
    #[instrument(skip(self))]
    pub async fn attach_build_id_to_version(
        &self,
        app_id: &str,
        version: &str,
        platform: PlatformType,
        build_id: &str,
    ) -> Result<()> {
        let version_id = self.get_version_id(app_id, version, platform).await?;
        self.attach_build_id_to_version_by_version_id(&version_id, build_id)
            .await
    }

    /// Attach a build to a version
    #[instrument(skip(self))]
    pub async fn attach_build_id_to_version_by_version_id(
        &self,
        version_id: &str,
        build_id: &str,
    ) -> Result<()> {
        let endpoint = format!("/v1/appStoreVersions/{}/relationships/build", version_id);
        let body = to_one("builds", build_id);

        self.api
            .send(Method::PATCH, &endpoint, &[], Some(&body))
            .await?
            .error_for_status(|| {
                format!(
                    "Error when trying to update version id: {} with build id: {}",
                    version_id, build_id
                )
            })?;

        info!("Attached build {} to version {}", build_id, version_id);
        Ok(())
    }

    /// Update version attributes
    #[instrument(skip(self))]
    pub async fn update_version_by_version_id(
        &self,
        version_id: &str,
        update: &VersionUpdate,
    ) -> Result<()> {
        let endpoint = format!("/v1/appStoreVersions/{}", version_id);
        let body = json!({
            "data": {
                "type": "appStoreVersions",
                "id": version_id,
                "attributes": update
            }
        });

        self.api
            .send(Method::PATCH, &endpoint, &[], Some(&body))
            .await?
            .error_for_status(|| format!("Error updating version id: {}", version_id))?;

        Ok(())
    }

    /// Submit the version matching the version string and platform for review
    #[instrument(skip(self, options))]
    pub async fn submit_for_review(
        &self,
        app_id: &str,
        version: &str,
        platform: PlatformType,
        options: &SubmitForReviewOptions,
    ) -> Result<()> {
        let version_id = if options.auto_create_version {
            let ensure = EnsureVersionOptions {
                update_version_string_if_unreleased_version_exists: false,
                create_options: options.version_create_options.clone(),
            };
            self.ensure_version_exists(app_id, version, platform, &ensure)
                .await?
        } else {
            self.get_version_id(app_id, version, platform).await?
        };

        self.submit_for_review_by_version_id(&version_id, options)
            .await
    }

    /// Run the requested pre-steps, then submit the version for review
    #[instrument(skip(self, options))]
    pub async fn submit_for_review_by_version_id(
        &self,
        version_id: &str,
        options: &SubmitForReviewOptions,
    ) -> Result<()> {
        if let Some(auto_release) = options.auto_release_on_approval {
            let update = VersionUpdate {
                release_type: Some(ReleaseType::from_auto_release(auto_release)),
                ..Default::default()
            };
            self.update_version_by_version_id(version_id, &update)
                .await?;
        }

        if let Some(build_id) = &options.build_id {
            self.attach_build_id_to_version_by_version_id(version_id, build_id)
                .await?;
        }

        if let Some(localizations) = &options.localizations {
            self.set_version_localizations_by_version_id(version_id, localizations)
                .await?;
        }

        if let Some(release_notes) = &options.release_notes {
            let localizations = release_notes.clone().into_localizations();
            self.set_version_localizations_by_version_id(version_id, &localizations)
                .await?;
        }

        if let Some(review_details) = &options.review_details {
            self.set_version_review_detail_attributes_by_version_id(version_id, review_details)
                .await?;
        }

        let body = json!({
            "data": {
                "type": "appStoreVersionSubmissions",
                "relationships": {
                    "appStoreVersion": to_one("appStoreVersions", version_id)
                }
            }
        });

        self.api
            .send(Method::POST, "/v1/appStoreVersionSubmissions", &[], Some(&body))
            .await?
            .error_for_status(|| {
                format!("Error submit app for approval for version id: {}", version_id)
            })?;

        info!("Submitted version {} for review", version_id);
        Ok(())
    }

    /// Create missing localizations and update existing ones.
    ///
    /// Creates run concurrently, then updates run concurrently.
    #[instrument(skip(self, localizations), fields(count = localizations.len()))]
    pub async fn set_version_localizations_by_version_id(
        &self,
        version_id: &str,
        localizations: &[Localization],
    ) -> Result<()> {
        let endpoint = format!(
            "/v1/appStoreVersions/{}/appStoreVersionLocalizations",
            version_id
        );
        let query = [("fields[appStoreVersionLocalizations]", "locale".to_string())];
        let existing: Document<Vec<RemoteLocalization>> = self
            .api
            .get_json(&endpoint, &query, || {
                format!("Error fetching localizations for version id: {}", version_id)
            })
            .await?;

        let (missing, present) = partition_localizations(localizations, &existing.data);
        debug!(
            create = missing.len(),
            update = present.len(),
            "Reconciling version localizations"
        );

        try_join_all(
            missing
                .into_iter()
                .map(|localization| self.create_version_localization(version_id, localization)),
        )
        .await?;

        try_join_all(
            present
                .iter()
                .map(|(id, localization)| self.update_version_localization(id, localization)),
        )
        .await?;

        Ok(())
    }

    async fn create_version_localization(
        &self,
        version_id: &str,
        localization: &Localization,
    ) -> Result<()> {
        let mut attributes = serde_json::to_value(localization)?;
        if let Value::Object(map) = &mut attributes {
            map.insert("locale".to_string(), json!(localization.locale));
        }

        let body = json!({
            "data": {
                "type": "appStoreVersionLocalizations",
                "attributes": attributes,
                "relationships": {
                    "appStoreVersion": to_one("appStoreVersions", version_id)
                }
            }
        });

        self.api
            .send(Method::POST, "/v1/appStoreVersionLocalizations", &[], Some(&body))
            .await?
            .error_for_status(|| {
                format!(
                    "Error creating localization {} for version id: {}",
                    localization.locale, version_id
                )
            })?;

        Ok(())
    }

    async fn update_version_localization(
        &self,
        localization_id: &str,
        localization: &Localization,
    ) -> Result<()> {
        let endpoint = format!("/v1/appStoreVersionLocalizations/{}", localization_id);
        let body = json!({
            "data": {
                "type": "appStoreVersionLocalizations",
                "id": localization_id,
                "attributes": localization
            }
        });

        self.api
            .send(Method::PATCH, &endpoint, &[], Some(&body))
            .await?
            .error_for_status(|| {
                format!(
                    "Error updating localization {} with id: {}",
                    localization.locale, localization_id
                )
            })?;

        Ok(())
    }

    /// Create or update the version's review details
    #[instrument(skip(self, review_details))]
    pub async fn set_version_review_detail_attributes_by_version_id(
        &self,
        version_id: &str,
        review_details: &ReviewDetails,
    ) -> Result<()> {
        let endpoint = format!("/v1/appStoreVersions/{}/appStoreReviewDetail", version_id);
        let response = self.api.send(Method::GET, &endpoint, &[], None).await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return self
                .create_version_review_detail(version_id, review_details)
                .await;
        }

        let existing: Document<ResourceId> = response
            .error_for_status(|| {
                format!("Error fetching review details for version id: {}", version_id)
            })?
            .json()?;

        self.update_version_review_detail(&existing.data.id, review_details)
            .await
    }

    async fn create_version_review_detail(
        &self,
        version_id: &str,
        review_details: &ReviewDetails,
    ) -> Result<()> {
        let body = json!({
            "data": {
                "type": "appStoreReviewDetails",
                "attributes": review_details,
                "relationships": {
                    "appStoreVersion": to_one("appStoreVersions", version_id)
                }
            }
        });

        self.api
            .send(Method::POST, "/v1/appStoreReviewDetails", &[], Some(&body))
            .await?
            .error_for_status(|| {
                format!("Error creating review details for version id: {}", version_id)
            })?;

        Ok(())
    }

    async fn update_version_review_detail(
        &self,
        review_detail_id: &str,
        review_details: &ReviewDetails,
    ) -> Result<()> {
        let endpoint = format!("/v1/appStoreReviewDetails/{}", review_detail_id);
        let body = json!({
            "data": {
                "type": "appStoreReviewDetails",
                "id": review_detail_id,
                "attributes": review_details
            }
        });

        self.api
            .send(Method::PATCH, &endpoint, &[], Some(&body))
            .await?
            .error_for_status(|| {
                format!("Error updating review details with id: {}", review_detail_id)
            })?;

        Ok(())
    }
}
