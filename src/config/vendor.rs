use crate::utils::error::{Result, SyncError};
use crate::utils::validation::{validate_non_empty_string, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Vendor feed 的欄位對應
///
/// key 比對不分大小寫，CSV 標頭與 REST JSON 欄位都走這份對應。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldMap {
    pub sku: String,
    pub title: String,
    pub price: Option<String>,
    pub quantity: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorInfo {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CsvOptions {
    /// 分隔符，沒給就由 sep= 提示或標頭列自動判斷
    pub delimiter: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncOptions {
    pub update_prices: Option<bool>,
    pub create_missing: Option<bool>,
    pub row_delay_ms: Option<u64>,
    pub error_backoff_ms: Option<u64>,
}

/// 每個 vendor 一份的 TOML 設定檔
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorProfile {
    pub vendor: VendorInfo,
    #[serde(default)]
    pub csv: CsvOptions,
    #[serde(default)]
    pub fields: FieldMap,
    #[serde(default)]
    pub sync: SyncOptions,
}

impl Default for FieldMap {
    fn default() -> Self {
        Self {
            sku: "sku".to_string(),
            title: "name".to_string(),
            price: Some("price".to_string()),
            quantity: "quantity".to_string(),
        }
    }
}

impl VendorProfile {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SyncError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析設定
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| SyncError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SOURCE_API_TOKEN})
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    /// 分隔符設定轉成 csv crate 要的單一 byte
    pub fn delimiter_byte(&self) -> Result<Option<u8>> {
        match &self.csv.delimiter {
            None => Ok(None),
            Some(d) => {
                let mut chars = d.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii() => Ok(Some(c as u8)),
                    _ => Err(SyncError::InvalidConfigValueError {
                        field: "csv.delimiter".to_string(),
                        value: d.clone(),
                        reason: "Delimiter must be a single ASCII character".to_string(),
                    }),
                }
            }
        }
    }
}

impl Validate for VendorProfile {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("vendor.name", &self.vendor.name)?;
        validate_non_empty_string("fields.sku", &self.fields.sku)?;
        validate_non_empty_string("fields.title", &self.fields.title)?;
        validate_non_empty_string("fields.quantity", &self.fields.quantity)?;
        if let Some(price) = &self.fields.price {
            validate_non_empty_string("fields.price", price)?;
        }
        self.delimiter_byte()?;
        Ok(())
    }
}
