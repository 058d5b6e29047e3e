//! Sales reports and in-app purchases

mod client;
mod in_app;
mod report;

pub use client::{
    AppDownloads, DownloadSalesReportSummaryOptions, GetAppDownloadsResult, RowFilter,
    SalesClient,
};
pub use in_app::{
    InAppProduct, InAppProductAttributes, InAppProductClient, InAppProducts, Paging, PagingMeta,
};
pub use report::{decode_report, parse_report, parse_units, SalesReportFrequency, SalesReportRow};
