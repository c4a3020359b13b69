use serde::{Deserialize, Serialize};

/// 正規化後的來源商品列
///
/// price 一律是小數點格式的字串（Shopify money 形式），
/// 來源端的逗號小數在 extract 階段就轉換掉。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRow {
    pub sku: String,
    pub title: String,
    pub price: Option<String>,
    pub quantity: i64,
}

/// 目標平台上以 SKU 配對到的 variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogVariant {
    pub variant_id: String,
    pub product_id: String,
    pub inventory_item_id: String,
    pub sku: String,
    pub price: String,
}

/// 單列同步的結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    Created,
    Updated { price_changed: bool },
    Skipped,
}

/// 整次同步的計數結果
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub duration: std::time::Duration,
    pub fetched: usize,
    pub created: usize,
    pub updated: usize,
    pub price_updates: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl SyncReport {
    pub fn new() -> Self {
        Self {
            started_at: chrono::Utc::now(),
            duration: std::time::Duration::ZERO,
            fetched: 0,
            created: 0,
            updated: 0,
            price_updates: 0,
            skipped: 0,
            failed: 0,
        }
    }

    pub fn record(&mut self, outcome: RowOutcome) {
        match outcome {
            RowOutcome::Created => self.created += 1,
            RowOutcome::Updated { price_changed } => {
                self.updated += 1;
                if price_changed {
                    self.price_updates += 1;
                }
            }
            RowOutcome::Skipped => self.skipped += 1,
        }
    }

    pub fn summary_line(&self) -> String {
        format!(
            "✅ Sync complete: {} fetched, {} created, {} updated ({} price changes), {} skipped, {} failed in {:.1}s",
            self.fetched,
            self.created,
            self.updated,
            self.price_updates,
            self.skipped,
            self.failed,
            self.duration.as_secs_f64()
        )
    }
}

impl Default for SyncReport {
    fn default() -> Self {
        Self::new()
    }
}
