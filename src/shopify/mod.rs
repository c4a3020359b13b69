pub mod client;
pub mod graphql;

pub use client::AdminClient;

use crate::utils::error::{Result, SyncError};

/// 把數字的 location id 放寬成 GID；已是 GID 就原樣通過
pub fn location_gid(raw: &str) -> Result<String> {
    let trimmed = raw.trim();

    if trimmed.starts_with("gid://") {
        return Ok(trimmed.to_string());
    }

    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Ok(format!("gid://shopify/Location/{}", trimmed));
    }

    Err(SyncError::InvalidConfigValueError {
        field: "SHOPIFY_LOCATION_ID".to_string(),
        value: raw.to_string(),
        reason: "Expected a numeric location id or a gid:// identifier".to_string(),
    })
}
