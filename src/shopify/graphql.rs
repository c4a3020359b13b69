use serde::Deserialize;

/// 以 SKU 查 variant。search query 是模糊比對，呼叫端要再核對 SKU。
pub const VARIANT_BY_SKU_QUERY: &str = r#"
query VariantBySku($query: String!) {
  productVariants(first: 1, query: $query) {
    edges {
      node {
        id
        sku
        price
        product { id }
        inventoryItem { id }
      }
    }
  }
}
"#;

pub const PRODUCT_CREATE_MUTATION: &str = r#"
mutation ProductCreate($input: ProductInput!) {
  productCreate(input: $input) {
    product {
      id
      variants(first: 1) {
        edges {
          node {
            id
            sku
            price
            inventoryItem { id }
          }
        }
      }
    }
    userErrors { field message }
  }
}
"#;

pub const INVENTORY_SET_MUTATION: &str = r#"
mutation InventorySet($input: InventorySetOnHandQuantitiesInput!) {
  inventorySetOnHandQuantities(input: $input) {
    userErrors { field message }
  }
}
"#;

pub const VARIANT_PRICE_UPDATE_MUTATION: &str = r#"
mutation VariantPriceUpdate($input: ProductVariantInput!) {
  productVariantUpdate(input: $input) {
    productVariant { id price }
    userErrors { field message }
  }
}
"#;

/// search syntax 的 sku: 子句，引號跟反斜線要跳脫
pub fn sku_search_query(sku: &str) -> String {
    let escaped = sku.replace('\\', "\\\\").replace('"', "\\\"");
    format!("sku:\"{}\"", escaped)
}

#[derive(Debug, Deserialize)]
pub struct GraphqlResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<TopLevelError>>,
}

#[derive(Debug, Deserialize)]
pub struct TopLevelError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct UserError {
    pub field: Option<Vec<String>>,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

#[derive(Debug, Deserialize)]
pub struct IdRef {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct VariantBySkuData {
    #[serde(rename = "productVariants")]
    pub product_variants: Connection<VariantNode>,
}

#[derive(Debug, Deserialize)]
pub struct VariantNode {
    pub id: String,
    pub sku: Option<String>,
    pub price: String,
    pub product: IdRef,
    #[serde(rename = "inventoryItem")]
    pub inventory_item: IdRef,
}

#[derive(Debug, Deserialize)]
pub struct ProductCreateData {
    #[serde(rename = "productCreate")]
    pub product_create: ProductCreatePayload,
}

#[derive(Debug, Deserialize)]
pub struct ProductCreatePayload {
    pub product: Option<CreatedProduct>,
    #[serde(rename = "userErrors")]
    pub user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
pub struct CreatedProduct {
    pub id: String,
    pub variants: Connection<CreatedVariantNode>,
}

#[derive(Debug, Deserialize)]
pub struct CreatedVariantNode {
    pub id: String,
    pub sku: Option<String>,
    pub price: String,
    #[serde(rename = "inventoryItem")]
    pub inventory_item: IdRef,
}

#[derive(Debug, Deserialize)]
pub struct InventorySetData {
    #[serde(rename = "inventorySetOnHandQuantities")]
    pub inventory_set_on_hand_quantities: InventorySetPayload,
}

#[derive(Debug, Deserialize)]
pub struct InventorySetPayload {
    #[serde(rename = "userErrors")]
    pub user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
pub struct VariantPriceUpdateData {
    #[serde(rename = "productVariantUpdate")]
    pub product_variant_update: VariantPriceUpdatePayload,
}

#[derive(Debug, Deserialize)]
pub struct VariantPriceUpdatePayload {
    #[serde(rename = "productVariant")]
    pub product_variant: Option<IdRef>,
    #[serde(rename = "userErrors")]
    pub user_errors: Vec<UserError>,
}
