use crate::domain::model::{CatalogVariant, SourceRow};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 來源端（POS REST API 或 vendor CSV），執行期才決定用哪個
#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<SourceRow>>;

    fn describe(&self) -> String;
}

/// 目標端商品目錄
pub trait Catalog: Send + Sync {
    fn find_variant_by_sku(
        &self,
        sku: &str,
    ) -> impl std::future::Future<Output = Result<Option<CatalogVariant>>> + Send;

    fn create_product(
        &self,
        row: &SourceRow,
    ) -> impl std::future::Future<Output = Result<CatalogVariant>> + Send;

    fn set_on_hand_quantity(
        &self,
        inventory_item_id: &str,
        quantity: i64,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    fn update_variant_price(
        &self,
        variant_id: &str,
        price: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}
