use crate::config::FieldMap;
use crate::domain::model::SourceRow;
use crate::domain::ports::ProductSource;
use crate::source::{price_from_json, quantity_from_json};
use crate::utils::error::{Result, SyncError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// 分頁的 POS REST API 來源
///
/// 逐頁抓到短頁或空頁為止，頁與頁之間固定延遲。
pub struct RestSource {
    client: Client,
    endpoint: String,
    token: Option<String>,
    fields: FieldMap,
    per_page: usize,
    page_delay: Duration,
}

impl RestSource {
    pub fn new(
        endpoint: String,
        token: Option<String>,
        fields: FieldMap,
        per_page: usize,
        page_delay: Duration,
    ) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            token,
            fields,
            per_page,
            page_delay,
        }
    }

    fn json_field<'a>(
        obj: &'a serde_json::Map<String, serde_json::Value>,
        wanted: &str,
    ) -> Option<&'a serde_json::Value> {
        obj.iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(wanted))
            .map(|(_, value)| value)
    }

    fn row_from_object(&self, obj: &serde_json::Map<String, serde_json::Value>) -> SourceRow {
        // 有些 POS 的 SKU 是數字欄位
        let sku = match Self::json_field(obj, &self.fields.sku) {
            Some(serde_json::Value::String(s)) => s.trim().to_string(),
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };

        let title = Self::json_field(obj, &self.fields.title)
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(&sku)
            .to_string();

        let price = self
            .fields
            .price
            .as_deref()
            .and_then(|name| Self::json_field(obj, name))
            .and_then(price_from_json);

        let quantity = Self::json_field(obj, &self.fields.quantity)
            .map(quantity_from_json)
            .unwrap_or(0);

        SourceRow {
            sku,
            title,
            price,
            quantity,
        }
    }

    /// 回應可能是裸陣列，也可能包在 products/items/data 底下
    fn unwrap_items(payload: serde_json::Value) -> Result<Vec<serde_json::Value>> {
        match payload {
            serde_json::Value::Array(items) => Ok(items),
            serde_json::Value::Object(mut obj) => {
                for key in ["products", "items", "data"] {
                    if let Some(serde_json::Value::Array(items)) = obj.remove(key) {
                        return Ok(items);
                    }
                }
                Err(SyncError::ProcessingError {
                    message: "Source API response has no product array".to_string(),
                })
            }
            _ => Err(SyncError::ProcessingError {
                message: "Source API response is neither an array nor an object".to_string(),
            }),
        }
    }

    async fn fetch_page(&self, page: usize) -> Result<Vec<serde_json::Value>> {
        let mut request = self.client.get(&self.endpoint).query(&[
            ("page", page.to_string()),
            ("per_page", self.per_page.to_string()),
        ]);

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        tracing::debug!("📡 Fetching source page {} from {}", page, self.endpoint);
        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(SyncError::ProcessingError {
                message: format!(
                    "Source API request failed with status: {}",
                    response.status()
                ),
            });
        }

        let payload: serde_json::Value = response.json().await?;
        Self::unwrap_items(payload)
    }
}

#[async_trait]
impl ProductSource for RestSource {
    async fn fetch(&self) -> Result<Vec<SourceRow>> {
        let mut rows = Vec::new();
        let mut page = 1;

        loop {
            let items = self.fetch_page(page).await?;
            let item_count = items.len();

            for item in items {
                if let serde_json::Value::Object(obj) = item {
                    rows.push(self.row_from_object(&obj));
                }
            }

            tracing::debug!("📡 Page {}: {} items", page, item_count);

            // 短頁或空頁表示到底了
            if item_count < self.per_page {
                break;
            }

            page += 1;
            if !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }
        }

        tracing::info!("📡 Fetched {} rows from source API", rows.len());
        Ok(rows)
    }

    fn describe(&self) -> String {
        format!("POS REST API {}", self.endpoint)
    }
}
