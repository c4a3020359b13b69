pub mod engine;

pub use crate::domain::model::{CatalogVariant, RowOutcome, SourceRow, SyncReport};
pub use crate::domain::ports::{Catalog, ProductSource};
pub use engine::SyncEngine;
