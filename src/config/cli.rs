use crate::utils::error::Result;
use crate::utils::validation::{
    self, validate_file_extensions, validate_positive_number, validate_range, Validate,
};
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// 分頁的 POS REST API
    Rest,
    /// Vendor CSV 檔
    Csv,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "shopsync")]
#[command(about = "One-way catalog/inventory sync into a Shopify store")]
pub struct CliConfig {
    /// Which source feed to pull from
    #[arg(long, value_enum, default_value = "rest")]
    pub source: SourceKind,

    /// Vendor CSV file (required with --source csv)
    #[arg(long)]
    pub csv_file: Option<String>,

    /// Vendor profile TOML (column mapping, delimiter, sync options)
    #[arg(long)]
    pub profile: Option<String>,

    /// Page size for the REST source
    #[arg(long, default_value = "100")]
    pub per_page: usize,

    /// Delay between source pages in milliseconds
    #[arg(long, default_value = "200")]
    pub page_delay_ms: u64,

    /// Delay between per-row remote calls in milliseconds
    #[arg(long)]
    pub row_delay_ms: Option<u64>,

    /// Flat backoff after a failed row in milliseconds
    #[arg(long)]
    pub error_backoff_ms: Option<u64>,

    /// Also push source prices onto existing variants
    #[arg(long)]
    pub update_prices: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log process resource usage during the run")]
    pub monitor: bool,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if self.source == SourceKind::Csv {
            let csv_file = validation::validate_required_field("csv_file", &self.csv_file)?;
            validate_file_extensions("csv_file", std::slice::from_ref(csv_file), &["csv", "tsv", "txt"])?;
        }

        // Shopify productVariants 查詢單頁上限就是 250
        validate_positive_number("per_page", self.per_page, 1)?;
        validate_range("per_page", self.per_page, 1, 250)?;
        validate_range("page_delay_ms", self.page_delay_ms, 0, 60_000)?;

        if let Some(delay) = self.row_delay_ms {
            validate_range("row_delay_ms", delay, 0, 60_000)?;
        }
        if let Some(backoff) = self.error_backoff_ms {
            validate_range("error_backoff_ms", backoff, 0, 300_000)?;
        }

        Ok(())
    }
}
