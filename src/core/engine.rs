use crate::config::SyncSettings;
use crate::domain::model::{RowOutcome, SourceRow, SyncReport};
use crate::domain::ports::{Catalog, ProductSource};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use crate::utils::progress::ProgressLine;
use std::time::Instant;

/// 整條同步流程：抓來源 → 逐列比對 SKU → 建立或更新
///
/// 嚴格循序，一次只有一個遠端請求在途，列與列之間固定延遲。
pub struct SyncEngine<C: Catalog> {
    source: Box<dyn ProductSource>,
    catalog: C,
    settings: SyncSettings,
    monitor: SystemMonitor,
}

impl<C: Catalog> SyncEngine<C> {
    pub fn new(source: Box<dyn ProductSource>, catalog: C, settings: SyncSettings) -> Self {
        Self {
            source,
            catalog,
            settings,
            monitor: SystemMonitor::new(false),
        }
    }

    pub fn new_with_monitoring(
        source: Box<dyn ProductSource>,
        catalog: C,
        settings: SyncSettings,
        monitor_enabled: bool,
    ) -> Self {
        Self {
            source,
            catalog,
            settings,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<SyncReport> {
        let started = Instant::now();
        let mut report = SyncReport::new();

        println!("Starting catalog sync from {}...", self.source.describe());

        let rows = self.source.fetch().await?;
        report.fetched = rows.len();
        println!("Fetched {} rows", rows.len());
        self.monitor.log_stats("Fetch");

        let total = rows.len();
        let mut progress = ProgressLine::new(total);

        for (index, row) in rows.iter().enumerate() {
            let label = if row.sku.is_empty() {
                "(no sku)"
            } else {
                row.sku.as_str()
            };
            progress.update(index + 1, label);

            match self.sync_row(row).await {
                Ok(outcome) => report.record(outcome),
                Err(e) => {
                    // 單列失敗：記下來、退避一下、繼續下一列
                    report.failed += 1;
                    tracing::error!("❌ Sync failed for SKU '{}': {}", row.sku, e);
                    if !self.settings.error_backoff.is_zero() {
                        tokio::time::sleep(self.settings.error_backoff).await;
                    }
                }
            }

            if index + 1 < total && !self.settings.row_delay.is_zero() {
                tokio::time::sleep(self.settings.row_delay).await;
            }
        }

        progress.finish();
        report.duration = started.elapsed();
        self.monitor.log_final_stats();

        println!("{}", report.summary_line());
        Ok(report)
    }

    async fn sync_row(&self, row: &SourceRow) -> Result<RowOutcome> {
        if row.sku.is_empty() {
            tracing::warn!("🔶 Skipping row without SKU (title: '{}')", row.title);
            return Ok(RowOutcome::Skipped);
        }

        match self.catalog.find_variant_by_sku(&row.sku).await? {
            Some(variant) => {
                self.catalog
                    .set_on_hand_quantity(&variant.inventory_item_id, row.quantity)
                    .await?;

                let mut price_changed = false;
                if self.settings.update_prices {
                    if let Some(price) = &row.price {
                        if *price != variant.price {
                            self.catalog
                                .update_variant_price(&variant.variant_id, price)
                                .await?;
                            price_changed = true;
                        }
                    }
                }

                tracing::debug!("🔄 '{}': set {} on hand", row.sku, row.quantity);
                Ok(RowOutcome::Updated { price_changed })
            }
            None => {
                if !self.settings.create_missing {
                    tracing::debug!("🔶 '{}' not in catalog, create_missing is off", row.sku);
                    return Ok(RowOutcome::Skipped);
                }

                let variant = self.catalog.create_product(row).await?;
                self.catalog
                    .set_on_hand_quantity(&variant.inventory_item_id, row.quantity)
                    .await?;

                tracing::info!("🆕 Created '{}' as {}", row.sku, variant.product_id);
                Ok(RowOutcome::Created)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::CatalogVariant;
    use crate::utils::error::SyncError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    struct MockSource {
        rows: Vec<SourceRow>,
    }

    #[async_trait]
    impl ProductSource for MockSource {
        async fn fetch(&self) -> Result<Vec<SourceRow>> {
            Ok(self.rows.clone())
        }

        fn describe(&self) -> String {
            "mock source".to_string()
        }
    }

    #[derive(Clone)]
    struct MockCatalog {
        existing: Arc<Mutex<HashMap<String, CatalogVariant>>>,
        calls: Arc<Mutex<Vec<String>>>,
        fail_lookup_for: Option<String>,
    }

    impl MockCatalog {
        fn new(existing: Vec<CatalogVariant>) -> Self {
            let map = existing.into_iter().map(|v| (v.sku.clone(), v)).collect();
            Self {
                existing: Arc::new(Mutex::new(map)),
                calls: Arc::new(Mutex::new(Vec::new())),
                fail_lookup_for: None,
            }
        }

        fn failing_lookup_for(mut self, sku: &str) -> Self {
            self.fail_lookup_for = Some(sku.to_string());
            self
        }

        async fn calls(&self) -> Vec<String> {
            self.calls.lock().await.clone()
        }
    }

    fn variant(sku: &str, price: &str) -> CatalogVariant {
        CatalogVariant {
            variant_id: format!("gid://shopify/ProductVariant/{}", sku),
            product_id: format!("gid://shopify/Product/{}", sku),
            inventory_item_id: format!("gid://shopify/InventoryItem/{}", sku),
            sku: sku.to_string(),
            price: price.to_string(),
        }
    }

    impl Catalog for MockCatalog {
        async fn find_variant_by_sku(&self, sku: &str) -> Result<Option<CatalogVariant>> {
            self.calls.lock().await.push(format!("lookup:{}", sku));
            if self.fail_lookup_for.as_deref() == Some(sku) {
                return Err(SyncError::GraphqlError {
                    message: "Throttled".to_string(),
                });
            }
            Ok(self.existing.lock().await.get(sku).cloned())
        }

        async fn create_product(&self, row: &SourceRow) -> Result<CatalogVariant> {
            self.calls.lock().await.push(format!("create:{}", row.sku));
            let created = variant(&row.sku, row.price.as_deref().unwrap_or("0.00"));
            self.existing
                .lock()
                .await
                .insert(row.sku.clone(), created.clone());
            Ok(created)
        }

        async fn set_on_hand_quantity(&self, inventory_item_id: &str, quantity: i64) -> Result<()> {
            self.calls
                .lock()
                .await
                .push(format!("set:{}={}", inventory_item_id, quantity));
            Ok(())
        }

        async fn update_variant_price(&self, variant_id: &str, price: &str) -> Result<()> {
            self.calls
                .lock()
                .await
                .push(format!("price:{}={}", variant_id, price));
            Ok(())
        }
    }

    fn row(sku: &str, quantity: i64, price: Option<&str>) -> SourceRow {
        SourceRow {
            sku: sku.to_string(),
            title: format!("Product {}", sku),
            price: price.map(String::from),
            quantity,
        }
    }

    fn fast_settings() -> SyncSettings {
        SyncSettings {
            row_delay: std::time::Duration::ZERO,
            error_backoff: std::time::Duration::ZERO,
            update_prices: false,
            create_missing: true,
        }
    }

    fn engine_with(
        rows: Vec<SourceRow>,
        catalog: MockCatalog,
        settings: SyncSettings,
    ) -> SyncEngine<MockCatalog> {
        SyncEngine::new(Box::new(MockSource { rows }), catalog, settings)
    }

    #[tokio::test]
    async fn test_missing_sku_is_created_then_stocked() {
        let catalog = MockCatalog::new(vec![]);
        let engine = engine_with(
            vec![row("NEW-1", 5, Some("9.99"))],
            catalog.clone(),
            fast_settings(),
        );

        let report = engine.run().await.unwrap();

        assert_eq!(report.fetched, 1);
        assert_eq!(report.created, 1);
        assert_eq!(report.failed, 0);
        assert_eq!(
            catalog.calls().await,
            vec![
                "lookup:NEW-1",
                "create:NEW-1",
                "set:gid://shopify/InventoryItem/NEW-1=5",
            ]
        );
    }

    #[tokio::test]
    async fn test_existing_sku_gets_inventory_set_only() {
        let catalog = MockCatalog::new(vec![variant("OLD-1", "4.50")]);
        let engine = engine_with(
            vec![row("OLD-1", 12, Some("4.50"))],
            catalog.clone(),
            fast_settings(),
        );

        let report = engine.run().await.unwrap();

        assert_eq!(report.updated, 1);
        assert_eq!(report.created, 0);
        assert_eq!(report.price_updates, 0);
        assert_eq!(
            catalog.calls().await,
            vec!["lookup:OLD-1", "set:gid://shopify/InventoryItem/OLD-1=12"]
        );
    }

    #[tokio::test]
    async fn test_price_update_only_when_enabled_and_different() {
        let catalog = MockCatalog::new(vec![variant("OLD-1", "4.50"), variant("OLD-2", "7.00")]);
        let mut settings = fast_settings();
        settings.update_prices = true;

        let engine = engine_with(
            vec![row("OLD-1", 1, Some("5.00")), row("OLD-2", 2, Some("7.00"))],
            catalog.clone(),
            settings,
        );

        let report = engine.run().await.unwrap();

        assert_eq!(report.updated, 2);
        assert_eq!(report.price_updates, 1);
        let calls = catalog.calls().await;
        assert!(calls.contains(&"price:gid://shopify/ProductVariant/OLD-1=5.00".to_string()));
        assert!(!calls.iter().any(|c| c.starts_with("price:") && c.contains("OLD-2")));
    }

    #[tokio::test]
    async fn test_row_error_logs_and_continues() {
        let catalog = MockCatalog::new(vec![variant("OK-1", "1.00")]).failing_lookup_for("BAD-1");
        let engine = engine_with(
            vec![row("BAD-1", 1, None), row("OK-1", 3, None)],
            catalog.clone(),
            fast_settings(),
        );

        let report = engine.run().await.unwrap();

        assert_eq!(report.failed, 1);
        assert_eq!(report.updated, 1);
        // 失敗的那列之後還是繼續跑
        assert_eq!(
            catalog.calls().await,
            vec![
                "lookup:BAD-1",
                "lookup:OK-1",
                "set:gid://shopify/InventoryItem/OK-1=3",
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_sku_rows_are_skipped() {
        let catalog = MockCatalog::new(vec![]);
        let engine = engine_with(vec![row("", 4, None)], catalog.clone(), fast_settings());

        let report = engine.run().await.unwrap();

        assert_eq!(report.skipped, 1);
        assert_eq!(report.created, 0);
        assert!(catalog.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_missing_disabled_skips_unknown_skus() {
        let catalog = MockCatalog::new(vec![]);
        let mut settings = fast_settings();
        settings.create_missing = false;

        let engine = engine_with(vec![row("NEW-1", 5, None)], catalog.clone(), settings);

        let report = engine.run().await.unwrap();

        assert_eq!(report.skipped, 1);
        assert_eq!(report.created, 0);
        assert_eq!(catalog.calls().await, vec!["lookup:NEW-1"]);
    }
}
