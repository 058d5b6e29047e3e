//! Single entry point over all App Store Connect clients

use std::sync::Arc;

use crate::auth::TokenProvider;
use crate::build::{Build, BuildClient, BuildStatus, BuildUpdate, WaitForProcessingOptions};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::ApiClient;
use crate::release::{
    CreateVersionOptions, EnsureVersionOptions, Localization, ReleaseClient, ReviewDetails,
    SubmitForReviewOptions, VersionUpdate,
};
use crate::sales::{
    DownloadSalesReportSummaryOptions, GetAppDownloadsResult, InAppProductClient, InAppProducts,
    SalesClient, SalesReportRow,
};
use crate::testflight::{
    AddBuildToExternalGroupOptions, CreateGroupOptions, NotifyBetaTestersOptions,
    TestFlightClient,
};
use crate::types::PlatformType;

/// App Store Connect API client
///
/// All sub-clients share one connection pool and token provider.
#[derive(Debug, Clone)]
pub struct AppStoreConnect {
    builds: BuildClient,
    releases: ReleaseClient,
    testflight: TestFlightClient,
    sales: SalesClient,
    in_app_products: InAppProductClient,
}

impl AppStoreConnect {
    /// Create a client for the production API
    pub fn new(tokens: impl TokenProvider + 'static) -> Result<Self> {
        Self::with_config(ClientConfig::default(), tokens)
    }

    /// Create a client with custom connection settings
    pub fn with_config(config: ClientConfig, tokens: impl TokenProvider + 'static) -> Result<Self> {
        let api = ApiClient::new(&config, Arc::new(tokens))?;
        let builds = BuildClient::new(api.clone());

        Ok(Self {
            releases: ReleaseClient::new(api.clone()),
            testflight: TestFlightClient::new(api.clone(), builds.clone()),
            sales: SalesClient::new(api.clone()),
            in_app_products: InAppProductClient::new(api),
            builds,
        })
    }

    pub fn builds(&self) -> &BuildClient {
        &self.builds
    }

    pub fn releases(&self) -> &ReleaseClient {
        &self.releases
    }

    pub fn testflight(&self) -> &TestFlightClient {
        &self.testflight
    }

    pub fn sales(&self) -> &SalesClient {
        &self.sales
    }

    pub fn in_app_products(&self) -> &InAppProductClient {
        &self.in_app_products
    }

    // Builds

    pub async fn get_build_id(
        &self,
        app_id: &str,
        version: &str,
        platform: PlatformType,
        build_number: Option<&str>,
    ) -> Result<String> {
        self.builds
            .get_build_id(app_id, version, platform, build_number)
            .await
    }

    pub async fn get_build_status(
        &self,
        app_id: &str,
        version: &str,
        platform: PlatformType,
        build_number: Option<&str>,
    ) -> Result<BuildStatus> {
        self.builds
            .get_build_status(app_id, version, platform, build_number)
            .await
    }

    pub async fn get_build_status_from_build_id(&self, build_id: &str) -> Result<BuildStatus> {
        self.builds.get_build_status_from_build_id(build_id).await
    }

    pub async fn wait_for_build_processing_to_complete(
        &self,
        app_id: &str,
        platform: PlatformType,
        version: &str,
        build_number: &str,
        options: &WaitForProcessingOptions,
    ) -> Result<()> {
        self.builds
            .wait_for_build_processing_to_complete(app_id, platform, version, build_number, options)
            .await
    }

    pub async fn get_build(&self, build_id: &str) -> Result<Build> {
        self.builds.get_build(build_id).await
    }

    pub async fn update_build(&self, build_id: &str, update: &BuildUpdate) -> Result<()> {
        self.builds.update_build(build_id, update).await
    }

    // Releases

    pub async fn ensure_version_exists(
        &self,
        app_id: &str,
        version: &str,
        platform: PlatformType,
        options: &EnsureVersionOptions,
    ) -> Result<String> {
        self.releases
            .ensure_version_exists(app_id, version, platform, options)
            .await
    }

    pub async fn create_version(
        &self,
        app_id: &str,
        version: &str,
        platform: PlatformType,
        options: &CreateVersionOptions,
    ) -> Result<String> {
        self.releases
            .create_version(app_id, version, platform, options)
            .await
    }

    pub async fn get_version_id(
        &self,
        app_id: &str,
        version: &str,
        platform: PlatformType,
    ) -> Result<String> {
        self.releases.get_version_id(app_id, version, platform).await
    }

    pub async fn attach_build_id_to_version(
        &self,
        app_id: &str,
        version: &str,
        platform: PlatformType,
        build_id: &str,
    ) -> Result<()> {
        self.releases
            .attach_build_id_to_version(app_id, version, platform, build_id)
            .await
    }

    pub async fn attach_build_id_to_version_by_version_id(
        &self,
        version_id: &str,
        build_id: &str,
    ) -> Result<()> {
        self.releases
            .attach_build_id_to_version_by_version_id(version_id, build_id)
            .await
    }

    pub async fn update_version_by_version_id(
        &self,
        version_id: &str,
        update: &VersionUpdate,
    ) -> Result<()> {
        self.releases
            .update_version_by_version_id(version_id, update)
            .await
    }

    pub async fn submit_for_review(
        &self,
        app_id: &str,
        version: &str,
        platform: PlatformType,
        options: &SubmitForReviewOptions,
    ) -> Result<()> {
        self.releases
            .submit_for_review(app_id, version, platform, options)
            .await
    }

    pub async fn submit_for_review_by_version_id(
        &self,
        version_id: &str,
        options: &SubmitForReviewOptions,
    ) -> Result<()> {
        self.releases
            .submit_for_review_by_version_id(version_id, options)
            .await
    }

    pub async fn set_version_localizations_by_version_id(
        &self,
        version_id: &str,
        localizations: &[Localization],
    ) -> Result<()> {
        self.releases
            .set_version_localizations_by_version_id(version_id, localizations)
            .await
    }

    pub async fn set_version_review_detail_attributes_by_version_id(
        &self,
        version_id: &str,
        review_details: &ReviewDetails,
    ) -> Result<()> {
        self.releases
            .set_version_review_detail_attributes_by_version_id(version_id, review_details)
            .await
    }

    // TestFlight

    pub async fn add_build_to_external_group_by_group_id(
        &self,
        app_id: &str,
        version: &str,
        platform: PlatformType,
        build_number: &str,
        group_id: &str,
        options: &AddBuildToExternalGroupOptions,
    ) -> Result<()> {
        self.testflight
            .add_build_to_external_group_by_group_id(
                app_id,
                version,
                platform,
                build_number,
                group_id,
                options,
            )
            .await
    }

    pub async fn add_build_to_external_group_by_group_id_and_build_id(
        &self,
        build_id: &str,
        group_id: &str,
        options: &AddBuildToExternalGroupOptions,
    ) -> Result<()> {
        self.testflight
            .add_build_to_external_group_by_group_id_and_build_id(build_id, group_id, options)
            .await
    }

    pub async fn add_build_to_external_group_by_build_id(
        &self,
        app_id: &str,
        build_id: &str,
        group_name: &str,
        options: &AddBuildToExternalGroupOptions,
    ) -> Result<()> {
        self.testflight
            .add_build_to_external_group_by_build_id(app_id, build_id, group_name, options)
            .await
    }

    pub async fn notify_beta_testers_of_new_build_by_build_id(
        &self,
        build_id: &str,
        options: &NotifyBetaTestersOptions,
    ) -> Result<()> {
        self.testflight
            .notify_beta_testers_of_new_build_by_build_id(build_id, options)
            .await
    }

    pub async fn create_external_beta_testers_group(
        &self,
        app_id: &str,
        name: &str,
        options: &CreateGroupOptions,
    ) -> Result<String> {
        self.testflight
            .create_external_beta_testers_group(app_id, name, options)
            .await
    }

    pub async fn get_external_beta_testers_group_id(
        &self,
        app_id: &str,
        name: &str,
    ) -> Result<String> {
        self.testflight
            .get_external_beta_testers_group_id(app_id, name)
            .await
    }

    // Sales

    pub async fn download_sales_report_summary(
        &self,
        options: &DownloadSalesReportSummaryOptions,
    ) -> Result<Vec<SalesReportRow>> {
        self.sales.download_sales_report_summary(options).await
    }

    pub async fn get_app_downloads(
        &self,
        options: &DownloadSalesReportSummaryOptions,
    ) -> Result<GetAppDownloadsResult> {
        self.sales.get_app_downloads(options).await
    }

    pub async fn get_in_app_products(&self, app_id: &str) -> Result<Option<InAppProducts>> {
        self.in_app_products.get_in_app_products(app_id).await
    }
}
