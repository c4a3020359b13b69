#[cfg(feature = "cli")]
pub mod cli;
pub mod shop;
pub mod vendor;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, SourceKind};
pub use shop::ShopConfig;
pub use vendor::{FieldMap, VendorProfile};

use std::time::Duration;

pub const DEFAULT_ROW_DELAY_MS: u64 = 500;
pub const DEFAULT_ERROR_BACKOFF_MS: u64 = 2_000;

/// 解析完的同步節奏與行為設定
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub row_delay: Duration,
    pub error_backoff: Duration,
    pub update_prices: bool,
    pub create_missing: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            row_delay: Duration::from_millis(DEFAULT_ROW_DELAY_MS),
            error_backoff: Duration::from_millis(DEFAULT_ERROR_BACKOFF_MS),
            update_prices: false,
            create_missing: true,
        }
    }
}

/// 優先序：CLI 明確給的 > vendor profile > 內建預設
#[cfg(feature = "cli")]
pub fn resolve_sync_settings(
    config: &CliConfig,
    profile: Option<&VendorProfile>,
) -> SyncSettings {
    let sync = profile.map(|p| &p.sync);

    let row_delay_ms = config
        .row_delay_ms
        .or_else(|| sync.and_then(|s| s.row_delay_ms))
        .unwrap_or(DEFAULT_ROW_DELAY_MS);

    let error_backoff_ms = config
        .error_backoff_ms
        .or_else(|| sync.and_then(|s| s.error_backoff_ms))
        .unwrap_or(DEFAULT_ERROR_BACKOFF_MS);

    let update_prices = if config.update_prices {
        true
    } else {
        sync.and_then(|s| s.update_prices).unwrap_or(false)
    };

    let create_missing = sync.and_then(|s| s.create_missing).unwrap_or(true);

    SyncSettings {
        row_delay: Duration::from_millis(row_delay_ms),
        error_backoff: Duration::from_millis(error_backoff_ms),
        update_prices,
        create_missing,
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    fn cli_defaults() -> CliConfig {
        CliConfig {
            source: SourceKind::Rest,
            csv_file: None,
            profile: None,
            per_page: 100,
            page_delay_ms: 200,
            row_delay_ms: None,
            error_backoff_ms: None,
            update_prices: false,
            verbose: false,
            monitor: false,
        }
    }

    #[test]
    fn test_builtin_defaults() {
        let settings = resolve_sync_settings(&cli_defaults(), None);
        assert_eq!(settings.row_delay, Duration::from_millis(500));
        assert_eq!(settings.error_backoff, Duration::from_millis(2_000));
        assert!(!settings.update_prices);
        assert!(settings.create_missing);
    }

    #[test]
    fn test_profile_overrides_defaults() {
        let profile = VendorProfile::from_toml_str(
            r#"
[vendor]
name = "acme"

[sync]
update_prices = true
create_missing = false
row_delay_ms = 1000
"#,
        )
        .unwrap();

        let settings = resolve_sync_settings(&cli_defaults(), Some(&profile));
        assert_eq!(settings.row_delay, Duration::from_millis(1_000));
        assert!(settings.update_prices);
        assert!(!settings.create_missing);
    }

    #[test]
    fn test_cli_overrides_profile() {
        let profile = VendorProfile::from_toml_str(
            r#"
[vendor]
name = "acme"

[sync]
row_delay_ms = 1000
"#,
        )
        .unwrap();

        let mut config = cli_defaults();
        config.row_delay_ms = Some(50);
        config.update_prices = true;

        let settings = resolve_sync_settings(&config, Some(&profile));
        assert_eq!(settings.row_delay, Duration::from_millis(50));
        assert!(settings.update_prices);
    }
}
