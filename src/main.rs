use clap::Parser;
use shopsync::config::{resolve_sync_settings, CliConfig, ShopConfig, SourceKind, VendorProfile};
use shopsync::utils::error::SyncError;
use shopsync::utils::{logger, validation::Validate};
use shopsync::{AdminClient, CsvSource, ProductSource, RestSource, SyncEngine};
use std::time::Duration;

fn fail(e: SyncError) -> ! {
    tracing::error!("❌ {}", e);
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    // .env 要在讀環境變數前載入
    dotenvy::dotenv().ok();

    tracing::info!("🚀 Starting shopsync");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證 CLI 參數
    if let Err(e) = config.validate() {
        fail(e);
    }

    // 載入 vendor profile（有給才載）
    let profile = match &config.profile {
        Some(path) => match VendorProfile::from_file(path) {
            Ok(profile) => {
                if let Err(e) = profile.validate() {
                    fail(e);
                }
                tracing::info!("📦 Using vendor profile '{}'", profile.vendor.name);
                Some(profile)
            }
            Err(e) => {
                eprintln!("❌ Failed to load vendor profile '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => None,
    };

    // 店鋪設定全部來自環境變數，缺了就是啟動失敗
    let shop = match ShopConfig::from_env() {
        Ok(shop) => shop,
        Err(e) => fail(e),
    };
    if let Err(e) = shop.validate() {
        fail(e);
    }

    let settings = resolve_sync_settings(&config, profile.as_ref());
    let fields = profile
        .as_ref()
        .map(|p| p.fields.clone())
        .unwrap_or_default();

    let run_id = format!("sync_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"));
    tracing::info!("🎬 Run {} against {}", run_id, shop.shop_domain);

    // 選來源：POS REST API 或 vendor CSV
    let source: Box<dyn ProductSource> = match config.source {
        SourceKind::Rest => {
            let endpoint = match shop.require_source_api_url() {
                Ok(url) => url.to_string(),
                Err(e) => fail(e),
            };
            Box::new(RestSource::new(
                endpoint,
                shop.source_api_token.clone(),
                fields,
                config.per_page,
                Duration::from_millis(config.page_delay_ms),
            ))
        }
        SourceKind::Csv => {
            // validate() 已保證 csv_file 有值
            let path = match config.csv_file.clone() {
                Some(path) => path,
                None => fail(SyncError::MissingConfigError {
                    field: "csv_file".to_string(),
                }),
            };
            let delimiter = match profile.as_ref().map(|p| p.delimiter_byte()).transpose() {
                Ok(delimiter) => delimiter.flatten(),
                Err(e) => fail(e),
            };
            Box::new(CsvSource::new(path, fields, delimiter))
        }
    };

    let catalog = match AdminClient::new(&shop) {
        Ok(client) => client,
        Err(e) => fail(e),
    };

    let engine = SyncEngine::new_with_monitoring(source, catalog, settings, config.monitor);

    match engine.run().await {
        Ok(report) => {
            tracing::info!(
                "✅ Sync finished: {} created, {} updated, {} skipped, {} failed",
                report.created,
                report.updated,
                report.skipped,
                report.failed
            );
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Sync failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                shopsync::utils::error::ErrorSeverity::Low => 0,
                shopsync::utils::error::ErrorSeverity::Medium => 2,
                shopsync::utils::error::ErrorSeverity::High => 1,
                shopsync::utils::error::ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
