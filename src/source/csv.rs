use crate::config::FieldMap;
use crate::domain::model::SourceRow;
use crate::domain::ports::ProductSource;
use crate::source::{normalize_price, parse_quantity};
use crate::utils::error::{Result, SyncError};
use async_trait::async_trait;

/// Vendor CSV 檔來源
///
/// 分隔符優先序：檔案開頭的 sep= 提示 > profile 設定 > 標頭列自動判斷。
pub struct CsvSource {
    path: String,
    fields: FieldMap,
    delimiter: Option<u8>,
}

impl CsvSource {
    pub fn new(path: String, fields: FieldMap, delimiter: Option<u8>) -> Self {
        Self {
            path,
            fields,
            delimiter,
        }
    }

    /// Excel 慣例：第一行 "sep=;" 宣告分隔符
    fn split_sep_hint(content: &str) -> (Option<u8>, &str) {
        let first_line = content.lines().next().unwrap_or("").trim();

        if let Some(rest_of_line) = first_line
            .get(..4)
            .filter(|prefix| prefix.eq_ignore_ascii_case("sep="))
            .map(|_| &first_line[4..])
        {
            if let Some(c) = rest_of_line.chars().next() {
                if c.is_ascii() {
                    let rest = match content.find('\n') {
                        Some(pos) => &content[pos + 1..],
                        None => "",
                    };
                    return (Some(c as u8), rest);
                }
            }
        }

        (None, content)
    }

    /// 標頭列裡哪個分隔符出現最多次就用哪個
    fn sniff_delimiter(header_line: &str) -> u8 {
        let candidates = [b';', b',', b'\t'];
        candidates
            .into_iter()
            .max_by_key(|&d| header_line.bytes().filter(|&b| b == d).count())
            .unwrap_or(b',')
    }

    fn column_index(headers: &csv::StringRecord, wanted: &str) -> Option<usize> {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(wanted.trim()))
    }

    fn parse(&self, content: &str) -> Result<Vec<SourceRow>> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let (hint, body) = Self::split_sep_hint(content);

        let delimiter = hint
            .or(self.delimiter)
            .unwrap_or_else(|| Self::sniff_delimiter(body.lines().next().unwrap_or("")));

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(body.as_bytes());

        let headers = reader.headers()?.clone();

        let sku_idx = Self::column_index(&headers, &self.fields.sku).ok_or_else(|| {
            SyncError::ProcessingError {
                message: format!(
                    "CSV is missing the SKU column '{}' (headers: {:?})",
                    self.fields.sku,
                    headers.iter().collect::<Vec<_>>()
                ),
            }
        })?;
        let title_idx = Self::column_index(&headers, &self.fields.title);
        let price_idx = self
            .fields
            .price
            .as_deref()
            .and_then(|name| Self::column_index(&headers, name));
        let quantity_idx = Self::column_index(&headers, &self.fields.quantity);

        if quantity_idx.is_none() {
            tracing::warn!(
                "🔶 CSV has no quantity column '{}', all quantities default to 0",
                self.fields.quantity
            );
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;

            let sku = record.get(sku_idx).unwrap_or("").trim().to_string();
            let title = title_idx
                .and_then(|i| record.get(i))
                .map(str::trim)
                .filter(|t| !t.is_empty())
                // 沒有品名欄就拿 SKU 當標題
                .unwrap_or(&sku)
                .to_string();
            let price = price_idx
                .and_then(|i| record.get(i))
                .and_then(normalize_price);
            let quantity = quantity_idx
                .and_then(|i| record.get(i))
                .map(parse_quantity)
                .unwrap_or(0);

            rows.push(SourceRow {
                sku,
                title,
                price,
                quantity,
            });
        }

        Ok(rows)
    }
}

#[async_trait]
impl ProductSource for CsvSource {
    async fn fetch(&self) -> Result<Vec<SourceRow>> {
        tracing::debug!("📥 Reading vendor CSV from: {}", self.path);
        let content = std::fs::read_to_string(&self.path)?;
        let rows = self.parse(&content)?;
        tracing::info!("📥 Parsed {} rows from {}", rows.len(), self.path);
        Ok(rows)
    }

    fn describe(&self) -> String {
        format!("vendor CSV {}", self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source_with_defaults() -> CsvSource {
        CsvSource::new("unused.csv".to_string(), FieldMap::default(), None)
    }

    #[test]
    fn test_parse_comma_csv_with_default_fields() {
        let content = "sku,name,price,quantity\nACME-1,Widget,9.99,3\nACME-2,Gadget,19.99,0\n";
        let rows = source_with_defaults().parse(content).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].sku, "ACME-1");
        assert_eq!(rows[0].title, "Widget");
        assert_eq!(rows[0].price.as_deref(), Some("9.99"));
        assert_eq!(rows[0].quantity, 3);
        assert_eq!(rows[1].quantity, 0);
    }

    #[test]
    fn test_sep_hint_wins_over_sniffing() {
        let content = "sep=;\nsku;name;price;quantity\nA-1;Thing, with comma;12,50;7\n";
        let rows = source_with_defaults().parse(content).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].sku, "A-1");
        assert_eq!(rows[0].title, "Thing, with comma");
        assert_eq!(rows[0].price.as_deref(), Some("12.50"));
        assert_eq!(rows[0].quantity, 7);
    }

    #[test]
    fn test_semicolon_sniffed_from_header() {
        let content = "sku;name;price;quantity\nB-1;Bolt;0,55;100\n";
        let rows = source_with_defaults().parse(content).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].price.as_deref(), Some("0.55"));
        assert_eq!(rows[0].quantity, 100);
    }

    #[test]
    fn test_vendor_column_mapping() {
        let fields = FieldMap {
            sku: "Artikelnummer".to_string(),
            title: "Bezeichnung".to_string(),
            price: Some("VK-Preis".to_string()),
            quantity: "Bestand".to_string(),
        };
        let source = CsvSource::new("unused.csv".to_string(), fields, Some(b';'));

        let content = "Artikelnummer;Bezeichnung;VK-Preis;Bestand\n4711;Schraube M4;1,20;250\n";
        let rows = source.parse(content).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].sku, "4711");
        assert_eq!(rows[0].title, "Schraube M4");
        assert_eq!(rows[0].price.as_deref(), Some("1.20"));
        assert_eq!(rows[0].quantity, 250);
    }

    #[test]
    fn test_missing_sku_column_is_an_error() {
        let content = "code,name\nX,Thing\n";
        let err = source_with_defaults().parse(content).unwrap_err();
        assert!(matches!(err, SyncError::ProcessingError { .. }));
    }

    #[test]
    fn test_missing_title_column_falls_back_to_sku() {
        let content = "sku,quantity\nACME-9,4\n";
        let rows = source_with_defaults().parse(content).unwrap();
        assert_eq!(rows[0].title, "ACME-9");
        assert_eq!(rows[0].price, None);
    }

    #[test]
    fn test_empty_sku_rows_are_kept_for_the_engine_to_skip() {
        let content = "sku,name,quantity\n,No sku,1\nACME-1,Widget,2\n";
        let rows = source_with_defaults().parse(content).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].sku.is_empty());
    }

    #[test]
    fn test_bom_before_sep_hint() {
        let content = "\u{feff}sep=,\nsku,name,quantity\nZ-1,Zed,5\n";
        let rows = source_with_defaults().parse(content).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].sku, "Z-1");
    }
}
