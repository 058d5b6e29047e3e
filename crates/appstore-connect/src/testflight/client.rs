//! External beta groups and build distribution

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, instrument};

use super::options::{AddBuildToExternalGroupOptions, CreateGroupOptions, NotifyBetaTestersOptions};
use crate::build::BuildClient;
use crate::error::{ConnectError, Result};
use crate::http::ApiClient;
use crate::types::{resource_identifier, to_one, Document, PlatformType, ResourceId};

#[derive(Deserialize)]
struct GroupData {
    id: String,
    attributes: GroupAttributes,
}

#[derive(Deserialize)]
struct GroupAttributes {
    name: String,
}

/// Pick the one group named exactly `name`
fn single_group_named(groups: Vec<GroupData>, app_id: &str, name: &str) -> Result<String> {
    let mut matching: Vec<GroupData> = groups
        .into_iter()
        .filter(|g| g.attributes.name == name)
        .collect();

    match matching.len() {
        0 => Err(ConnectError::NotFound(format!(
            "external beta group '{}' for app {}",
            name, app_id
        ))),
        1 => Ok(matching.remove(0).id),
        found => Err(ConnectError::cardinality(
            format!("external beta group '{}' for app {}", name, app_id),
            found,
        )),
    }
}

/// Client for TestFlight beta groups and notifications
#[derive(Debug, Clone)]
pub struct TestFlightClient {
    api: ApiClient,
    builds: BuildClient,
}

impl TestFlightClient {
    pub fn new(api: ApiClient, builds: BuildClient) -> Self {
        Self { api, builds }
    }

    /// Add the build identified by version and build number to a group
    #[instrument(skip(self, options))]
    pub async fn add_build_to_external_group_by_group_id(
        &self,
        app_id: &str,
        version: &str,
        platform: PlatformType,
        build_number: &str,
        group_id: &str,
        options: &AddBuildToExternalGroupOptions,
    ) -> Result<()> {
        let build_id = self
            .builds
            .get_build_id(app_id, version, platform, Some(build_number))
            .await?;

        self.add_build_to_external_group_by_group_id_and_build_id(&build_id, group_id, options)
            .await
    }

    /// Add a build to a group, notifying testers if requested
    #[instrument(skip(self, options))]
    pub async fn add_build_to_external_group_by_group_id_and_build_id(
        &self,
        build_id: &str,
        group_id: &str,
        options: &AddBuildToExternalGroupOptions,
    ) -> Result<()> {
        let endpoint = format!("/v1/builds/{}/relationships/betaGroups", build_id);
        let body = json!({
            "data": [resource_identifier("betaGroups", group_id)]
        });

        self.api
            .send(Method::POST, &endpoint, &[], Some(&body))
            .await?
            .error_for_status(|| {
                format!(
                    "Error adding build to group for group {} with build id: {}",
                    group_id, build_id
                )
            })?;

        info!("Added build {} to beta group {}", build_id, group_id);

        if options.notify_beta_testers {
            self.notify_beta_testers_of_new_build_by_build_id(build_id, &options.notify_options)
                .await?;
        }

        Ok(())
    }

    /// Add a build to the group with the given name, creating the group
    /// first when `create_group_if_missing` is set
    #[instrument(skip(self, options))]
    pub async fn add_build_to_external_group_by_build_id(
        &self,
        app_id: &str,
        build_id: &str,
        group_name: &str,
        options: &AddBuildToExternalGroupOptions,
    ) -> Result<()> {
        let group_id = if options.create_group_if_missing {
            self.create_external_beta_testers_group(app_id, group_name, &CreateGroupOptions::default())
                .await?
        } else {
            self.get_external_beta_testers_group_id(app_id, group_name)
                .await?
        };

        self.add_build_to_external_group_by_group_id_and_build_id(build_id, &group_id, options)
            .await
    }

    /// Tell testers a new build is available
    #[instrument(skip(self))]
    pub async fn notify_beta_testers_of_new_build_by_build_id(
        &self,
        build_id: &str,
        options: &NotifyBetaTestersOptions,
    ) -> Result<()> {
        let body = json!({
            "data": {
                "type": "buildBetaNotifications",
                "relationships": {
                    "build": to_one("builds", build_id)
                }
            }
        });

        let response = self
            .api
            .send(Method::POST, "/v1/buildBetaNotifications", &[], Some(&body))
            .await?;

        if response.status() == StatusCode::CONFLICT && options.ignore_if_enabled {
            debug!("Notification for build {} already pending", build_id);
            return Ok(());
        }

        response.error_for_status(|| {
            format!("Error sending notification for build id: {}", build_id)
        })?;

        info!("Notified beta testers of build {}", build_id);
        Ok(())
    }

    /// Create an external group and return its ID.
    ///
    /// Unless `allow_duplicates` is set, an existing group with the same name
    /// is returned instead of creating another.
    #[instrument(skip(self))]
    pub async fn create_external_beta_testers_group(
        &self,
        app_id: &str,
        name: &str,
        options: &CreateGroupOptions,
    ) -> Result<String> {
        if !options.allow_duplicates {
            match self.get_external_beta_testers_group_id(app_id, name).await {
                Ok(group_id) => {
                    debug!("Beta group '{}' already exists", name);
                    return Ok(group_id);
                }
                Err(ConnectError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct NewGroupAttributes<'a> {
            name: &'a str,
            public_link_enabled: bool,
            public_link_limit_enabled: bool,
            #[serde(skip_serializing_if = "Option::is_none")]
            public_link_limit: Option<u32>,
            feedback_enabled: bool,
        }

        let attributes = NewGroupAttributes {
            name,
            public_link_enabled: options.public_link_enabled,
            public_link_limit_enabled: options.public_link_limit.is_some(),
            public_link_limit: options.public_link_limit,
            feedback_enabled: options.feedback_enabled,
        };

        let body = json!({
            "data": {
                "type": "betaGroups",
                "attributes": attributes,
                "relationships": {
                    "app": to_one("apps", app_id)
                }
            }
        });

        let response: Document<ResourceId> = self
            .api
            .send(Method::POST, "/v1/betaGroups", &[], Some(&body))
            .await?
            .error_for_status(|| {
                format!("Error creating beta group '{}' for app {}", name, app_id)
            })?
            .json()?;

        info!("Created beta group '{}' ({})", name, response.data.id);
        Ok(response.data.id)
    }

    /// Get the ID of the external group with exactly this name.
    ///
    /// Fails with [`ConnectError::NotFound`] if there is none.
    #[instrument(skip(self))]
    pub async fn get_external_beta_testers_group_id(
        &self,
        app_id: &str,
        name: &str,
    ) -> Result<String> {
        let query = [
            ("fields[betaGroups]", "name".to_string()),
            ("filter[app]", app_id.to_string()),
            ("filter[name]", name.to_string()),
            ("filter[isInternalGroup]", "false".to_string()),
        ];

        let response: Document<Vec<GroupData>> = self
            .api
            .get_json("/v1/betaGroups", &query, || {
                format!("Error fetching beta group '{}' for app {}", name, app_id)
            })
            .await?;

        single_group_named(response.data, app_id, name)
    }
}
