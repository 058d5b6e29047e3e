//! In-app purchase listing

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::http::ApiClient;

/// In-app purchases of an app
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InAppProducts {
    pub data: Vec<InAppProduct>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PagingMeta>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagingMeta {
    pub paging: Paging,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Paging {
    pub total: u32,
    pub limit: u32,
}

/// A single in-app purchase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InAppProduct {
    pub id: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub attributes: InAppProductAttributes,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InAppProductAttributes {
    pub reference_name: String,
    pub product_id: String,
    pub in_app_purchase_type: String,
    pub state: String,
}

/// Client for an app's in-app purchases
#[derive(Debug, Clone)]
pub struct InAppProductClient {
    api: ApiClient,
}

impl InAppProductClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// List the app's in-app purchases; `None` if the app is unknown
    #[instrument(skip(self))]
    pub async fn get_in_app_products(&self, app_id: &str) -> Result<Option<InAppProducts>> {
        let endpoint = format!("/v1/apps/{}/inAppPurchases", app_id);
        let response = self.api.send(Method::GET, &endpoint, &[], None).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let products = response
            .error_for_status(|| format!("Error fetching in-app purchases for app {}", app_id))?
            .json()?;
        Ok(Some(products))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_products() {
        let products: InAppProducts = serde_json::from_value(json!({
            "data": [{
                "type": "inAppPurchases",
                "id": "iap-1",
                "attributes": {
                    "referenceName": "Coins",
                    "productId": "com.example.coins",
                    "inAppPurchaseType": "CONSUMABLE",
                    "state": "APPROVED"
                },
                "links": {"self": "https://example.com"}
            }],
            "meta": {"paging": {"total": 1, "limit": 50}},
            "links": {"self": "https://example.com"}
        }))
        .unwrap();

        assert_eq!(products.data.len(), 1);
        assert_eq!(products.data[0].attributes.product_id, "com.example.coins");
        assert_eq!(products.meta.map(|m| m.paging.total), Some(1));
    }
}
