//! Sales report downloads

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, instrument};

use super::report::{decode_report, SalesReportFrequency, SalesReportRow};
use crate::error::Result;
use crate::http::ApiClient;

/// Decides which report rows are kept
#[async_trait]
pub trait RowFilter: Send + Sync {
    async fn accept(&self, row: &SalesReportRow) -> bool;
}

#[async_trait]
impl<F> RowFilter for F
where
    F: Fn(&SalesReportRow) -> bool + Send + Sync,
{
    async fn accept(&self, row: &SalesReportRow) -> bool {
        self(row)
    }
}

/// Options for downloading a summary sales report
#[derive(Clone)]
pub struct DownloadSalesReportSummaryOptions {
    pub vendor_id: String,
    /// Day inside the reporting period; defaults to today (UTC)
    pub date: Option<NaiveDate>,
    pub frequency: SalesReportFrequency,
    /// Keep only rows this filter accepts; all rows when `None`
    pub filter: Option<Arc<dyn RowFilter>>,
}

impl DownloadSalesReportSummaryOptions {
    pub fn new(vendor_id: impl Into<String>) -> Self {
        Self {
            vendor_id: vendor_id.into(),
            date: None,
            frequency: SalesReportFrequency::default(),
            filter: None,
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_frequency(mut self, frequency: SalesReportFrequency) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn with_filter(mut self, filter: impl RowFilter + 'static) -> Self {
        self.filter = Some(Arc::new(filter));
        self
    }
}

impl std::fmt::Debug for DownloadSalesReportSummaryOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadSalesReportSummaryOptions")
            .field("vendor_id", &self.vendor_id)
            .field("date", &self.date)
            .field("frequency", &self.frequency)
            .field("filter", &self.filter.is_some())
            .finish()
    }
}

/// Downloads of one app
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AppDownloads {
    pub downloads: i64,
}

/// Downloads per SKU
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GetAppDownloadsResult {
    pub apps: BTreeMap<String, AppDownloads>,
}

impl GetAppDownloadsResult {
    /// Sum units per SKU
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a SalesReportRow>) -> Self {
        let mut apps: BTreeMap<String, AppDownloads> = BTreeMap::new();
        for row in rows {
            let app = apps.entry(row.sku.clone()).or_default();
            app.downloads = app.downloads.saturating_add(row.unit_count());
        }
        Self { apps }
    }
}

/// Client for `/v1/salesReports`
#[derive(Debug, Clone)]
pub struct SalesClient {
    api: ApiClient,
}

impl SalesClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Download and parse the summary sales report for the period around
    /// `options.date`. A report that does not exist (404) yields no rows.
    #[instrument(skip(self))]
    pub async fn download_sales_report_summary(
        &self,
        options: &DownloadSalesReportSummaryOptions,
    ) -> Result<Vec<SalesReportRow>> {
        let date = options
            .date
            .unwrap_or_else(|| Utc::now().date_naive());
        let report_date = options.frequency.report_date(date);

        let query = [
            ("filter[frequency]", options.frequency.as_str().to_string()),
            ("filter[reportDate]", report_date.clone()),
            ("filter[reportType]", "SALES".to_string()),
            ("filter[reportSubType]", "SUMMARY".to_string()),
            ("filter[vendorNumber]", options.vendor_id.clone()),
        ];

        let response = self.api.download("/v1/salesReports", &query).await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!("No {} sales report for {}", options.frequency, report_date);
            return Ok(Vec::new());
        }

        let response = response.error_for_status(|| {
            format!(
                "Error downloading {} sales report for vendor {}, date: {}",
                options.frequency, options.vendor_id, report_date
            )
        })?;

        let rows = decode_report(response.body())?;
        let Some(filter) = &options.filter else {
            return Ok(rows);
        };

        let mut accepted = Vec::with_capacity(rows.len());
        for row in rows {
            if filter.accept(&row).await {
                accepted.push(row);
            }
        }
        Ok(accepted)
    }

    /// Units per SKU over the summary sales report
    #[instrument(skip(self))]
    pub async fn get_app_downloads(
        &self,
        options: &DownloadSalesReportSummaryOptions,
    ) -> Result<GetAppDownloadsResult> {
        let rows = self.download_sales_report_summary(options).await?;
        Ok(GetAppDownloadsResult::from_rows(&rows))
    }
}
