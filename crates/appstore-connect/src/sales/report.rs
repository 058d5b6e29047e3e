//! Sales report rows and decoding

use std::io::Read;

use chrono::{Datelike, Days, NaiveDate};
use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Reporting period of a sales report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SalesReportFrequency {
    Daily,
    #[default]
    Weekly,
    Monthly,
    Yearly,
}

impl SalesReportFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            SalesReportFrequency::Daily => "DAILY",
            SalesReportFrequency::Weekly => "WEEKLY",
            SalesReportFrequency::Monthly => "MONTHLY",
            SalesReportFrequency::Yearly => "YEARLY",
        }
    }

    /// `filter[reportDate]` value for a report covering `date`.
    ///
    /// Weekly reports are addressed by the last day (Sunday) of the ISO week.
    pub fn report_date(&self, date: NaiveDate) -> String {
        match self {
            SalesReportFrequency::Daily => date.format("%Y-%m-%d").to_string(),
            SalesReportFrequency::Weekly => {
                let to_sunday = 6 - u64::from(date.weekday().num_days_from_monday());
                date.checked_add_days(Days::new(to_sunday))
                    .unwrap_or(date)
                    .format("%Y-%m-%d")
                    .to_string()
            }
            SalesReportFrequency::Monthly => date.format("%Y-%m").to_string(),
            SalesReportFrequency::Yearly => date.format("%Y").to_string(),
        }
    }
}

impl std::fmt::Display for SalesReportFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of a summary sales report. Columns absent from the report are
/// left empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalesReportRow {
    #[serde(rename = "Provider")]
    pub provider: String,
    #[serde(rename = "Provider Country")]
    pub provider_country: String,
    #[serde(rename = "SKU")]
    pub sku: String,
    #[serde(rename = "Developer")]
    pub developer: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "Product Type Identifier")]
    pub product_type_identifier: String,
    #[serde(rename = "Units")]
    pub units: String,
    #[serde(rename = "Developer Proceeds")]
    pub developer_proceeds: String,
    #[serde(rename = "Begin Date")]
    pub begin_date: String,
    #[serde(rename = "End Date")]
    pub end_date: String,
    #[serde(rename = "Customer Currency")]
    pub customer_currency: String,
    #[serde(rename = "Country Code")]
    pub country_code: String,
    #[serde(rename = "Currency of Proceeds")]
    pub currency_of_proceeds: String,
    #[serde(rename = "Apple Identifier")]
    pub apple_identifier: String,
    #[serde(rename = "Customer Price")]
    pub customer_price: String,
    #[serde(rename = "Promo Code")]
    pub promo_code: String,
    #[serde(rename = "Parent Identifier")]
    pub parent_identifier: String,
    #[serde(rename = "Subscription")]
    pub subscription: String,
    #[serde(rename = "Period")]
    pub period: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "CMB")]
    pub cmb: String,
    #[serde(rename = "Device")]
    pub device: String,
    #[serde(rename = "Supported Platforms")]
    pub supported_platforms: String,
    #[serde(rename = "Proceeds Reason")]
    pub proceeds_reason: String,
    #[serde(rename = "Preserved Pricing")]
    pub preserved_pricing: String,
    #[serde(rename = "Client")]
    pub client: String,
    #[serde(rename = "Order Type")]
    pub order_type: String,
}

impl SalesReportRow {
    /// Units as a number; see [`parse_units`]
    pub fn unit_count(&self) -> i64 {
        parse_units(&self.units)
    }
}

/// Leading integer of `value`, or 0 when there is none. Values outside the
/// `i64` range clamp to its bounds.
pub fn parse_units(value: &str) -> i64 {
    let trimmed = value.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    match digits[..end].parse::<i64>() {
        Ok(n) if negative => -n,
        Ok(n) => n,
        Err(_) if end == 0 => 0,
        Err(_) if negative => i64::MIN,
        Err(_) => i64::MAX,
    }
}

/// Gunzip a report payload and parse its tab-separated rows
pub fn decode_report(payload: &[u8]) -> Result<Vec<SalesReportRow>> {
    let mut text = String::new();
    GzDecoder::new(payload).read_to_string(&mut text)?;
    parse_report(&text)
}

/// Parse tab-separated report text with a header line
pub fn parse_report(text: &str) -> Result<Vec<SalesReportRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for row in reader.deserialize::<SalesReportRow>() {
        rows.push(row?);
    }
    Ok(rows)
}
