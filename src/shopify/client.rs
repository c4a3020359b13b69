use crate::config::ShopConfig;
use crate::domain::model::{CatalogVariant, SourceRow};
use crate::domain::ports::Catalog;
use crate::shopify::graphql::{
    sku_search_query, GraphqlResponse, InventorySetData, ProductCreateData, UserError,
    VariantBySkuData, VariantPriceUpdateData, INVENTORY_SET_MUTATION, PRODUCT_CREATE_MUTATION,
    VARIANT_BY_SKU_QUERY, VARIANT_PRICE_UPDATE_MUTATION,
};
use crate::shopify::location_gid;
use crate::utils::error::{Result, SyncError};
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Shopify Admin GraphQL API client
pub struct AdminClient {
    client: Client,
    endpoint: String,
    access_token: String,
    location_gid: String,
}

impl AdminClient {
    pub fn new(config: &ShopConfig) -> Result<Self> {
        let endpoint = format!(
            "https://{}/admin/api/{}/graphql.json",
            config.shop_domain, config.api_version
        );
        Ok(Self::with_endpoint(
            endpoint,
            config.access_token.clone(),
            location_gid(&config.location_id)?,
        ))
    }

    /// 測試時直接指到 mock server
    pub fn with_endpoint(endpoint: String, access_token: String, location_gid: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            access_token,
            location_gid,
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("X-Shopify-Access-Token", &self.access_token)
            .json(&serde_json::json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::GraphqlError {
                message: format!("Admin API returned HTTP {}", status),
            });
        }

        let body: GraphqlResponse<T> = response.json().await?;

        if let Some(errors) = body.errors {
            if !errors.is_empty() {
                let message = errors
                    .into_iter()
                    .map(|e| e.message)
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(SyncError::GraphqlError { message });
            }
        }

        body.data.ok_or_else(|| SyncError::GraphqlError {
            message: "Admin API response carried no data".to_string(),
        })
    }

    fn check_user_errors(operation: &str, errors: Vec<UserError>) -> Result<()> {
        if errors.is_empty() {
            return Ok(());
        }

        let message = errors
            .into_iter()
            .map(|e| match e.field {
                Some(field) => format!("{} ({})", e.message, field.join(".")),
                None => e.message,
            })
            .collect::<Vec<_>>()
            .join("; ");

        Err(SyncError::GraphqlError {
            message: format!("{}: {}", operation, message),
        })
    }
}

impl Catalog for AdminClient {
    async fn find_variant_by_sku(&self, sku: &str) -> Result<Option<CatalogVariant>> {
        let variables = serde_json::json!({ "query": sku_search_query(sku) });
        let data: VariantBySkuData = self.execute(VARIANT_BY_SKU_QUERY, variables).await?;

        let Some(edge) = data.product_variants.edges.into_iter().next() else {
            return Ok(None);
        };

        let node = edge.node;
        // search 是模糊比對，回來的 SKU 要完全一致才算命中
        match node.sku.as_deref() {
            Some(found) if found.trim() == sku => Ok(Some(CatalogVariant {
                variant_id: node.id,
                product_id: node.product.id,
                inventory_item_id: node.inventory_item.id,
                sku: sku.to_string(),
                price: node.price,
            })),
            other => {
                tracing::debug!(
                    "🔍 SKU search for '{}' returned non-matching variant ({:?})",
                    sku,
                    other
                );
                Ok(None)
            }
        }
    }

    async fn create_product(&self, row: &SourceRow) -> Result<CatalogVariant> {
        let mut variant = serde_json::json!({
            "sku": row.sku,
            "inventoryManagement": "SHOPIFY",
        });
        if let Some(price) = &row.price {
            variant["price"] = serde_json::Value::String(price.clone());
        }

        let variables = serde_json::json!({
            "input": {
                "title": row.title,
                "status": "ACTIVE",
                "variants": [variant],
            }
        });

        let data: ProductCreateData = self.execute(PRODUCT_CREATE_MUTATION, variables).await?;
        Self::check_user_errors("productCreate", data.product_create.user_errors)?;

        let product = data
            .product_create
            .product
            .ok_or_else(|| SyncError::GraphqlError {
                message: "productCreate returned no product".to_string(),
            })?;

        let node = product
            .variants
            .edges
            .into_iter()
            .next()
            .map(|edge| edge.node)
            .ok_or_else(|| SyncError::GraphqlError {
                message: "productCreate returned a product without variants".to_string(),
            })?;

        Ok(CatalogVariant {
            variant_id: node.id,
            product_id: product.id,
            inventory_item_id: node.inventory_item.id,
            sku: node.sku.unwrap_or_else(|| row.sku.clone()),
            price: node.price,
        })
    }

    async fn set_on_hand_quantity(&self, inventory_item_id: &str, quantity: i64) -> Result<()> {
        let variables = serde_json::json!({
            "input": {
                "reason": "correction",
                "setQuantities": [{
                    "inventoryItemId": inventory_item_id,
                    "locationId": self.location_gid,
                    "quantity": quantity,
                }],
            }
        });

        let data: InventorySetData = self.execute(INVENTORY_SET_MUTATION, variables).await?;
        Self::check_user_errors(
            "inventorySetOnHandQuantities",
            data.inventory_set_on_hand_quantities.user_errors,
        )
    }

    async fn update_variant_price(&self, variant_id: &str, price: &str) -> Result<()> {
        let variables = serde_json::json!({
            "input": { "id": variant_id, "price": price }
        });

        let data: VariantPriceUpdateData = self
            .execute(VARIANT_PRICE_UPDATE_MUTATION, variables)
            .await?;
        Self::check_user_errors(
            "productVariantUpdate",
            data.product_variant_update.user_errors,
        )
    }
}
