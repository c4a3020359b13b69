use crate::utils::error::{Result, SyncError};
use crate::utils::validation::{
    validate_non_empty_string, validate_shop_domain, validate_url, Validate,
};

/// 沒指定 SHOPIFY_API_VERSION 時用的版本
///
/// 釘在 2024-01：productCreate 在這一版還接受內嵌 variants，
/// 之後的版本要改走 productVariantsBulkCreate。
pub const DEFAULT_API_VERSION: &str = "2024-01";

/// 從環境變數載入的店鋪與來源設定
#[derive(Debug, Clone)]
pub struct ShopConfig {
    pub shop_domain: String,
    pub access_token: String,
    pub api_version: String,
    pub location_id: String,
    pub source_api_url: Option<String>,
    pub source_api_token: Option<String>,
}

fn required_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(SyncError::MissingConfigError {
            field: name.to_string(),
        }),
    }
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl ShopConfig {
    /// 從環境變數載入，缺必填值直接失敗
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            shop_domain: required_env("SHOPIFY_SHOP_DOMAIN")?,
            access_token: required_env("SHOPIFY_ACCESS_TOKEN")?,
            api_version: optional_env("SHOPIFY_API_VERSION")
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            location_id: required_env("SHOPIFY_LOCATION_ID")?,
            source_api_url: optional_env("SOURCE_API_URL"),
            source_api_token: optional_env("SOURCE_API_TOKEN"),
        })
    }

    /// REST 來源需要 SOURCE_API_URL，CSV 來源不用
    pub fn require_source_api_url(&self) -> Result<&str> {
        self.source_api_url
            .as_deref()
            .ok_or_else(|| SyncError::MissingConfigError {
                field: "SOURCE_API_URL".to_string(),
            })
    }
}

impl Validate for ShopConfig {
    fn validate(&self) -> Result<()> {
        validate_shop_domain("SHOPIFY_SHOP_DOMAIN", &self.shop_domain)?;
        validate_non_empty_string("SHOPIFY_ACCESS_TOKEN", &self.access_token)?;
        validate_non_empty_string("SHOPIFY_API_VERSION", &self.api_version)?;
        validate_non_empty_string("SHOPIFY_LOCATION_ID", &self.location_id)?;

        if let Some(url) = &self.source_api_url {
            validate_url("SOURCE_API_URL", url)?;
        }

        Ok(())
    }
}
