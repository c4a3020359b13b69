pub mod config;
pub mod core;
pub mod domain;
pub mod shopify;
pub mod source;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, SourceKind};
pub use config::{ShopConfig, SyncSettings, VendorProfile};
pub use core::SyncEngine;
pub use domain::model::{SourceRow, SyncReport};
pub use domain::ports::{Catalog, ProductSource};
pub use shopify::AdminClient;
pub use source::{CsvSource, RestSource};
pub use utils::error::{Result, SyncError};
