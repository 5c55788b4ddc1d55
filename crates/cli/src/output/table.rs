//! Table formatting utilities

use anyhow::Result;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, *};

/// Table formatter
pub struct TableFormatter;

impl TableFormatter {
    /// Create a new table with default styling
    pub fn new() -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table
    }

    /// Create a simple table with headers and rows
    pub fn simple(headers: Vec<&str>, rows: Vec<Vec<String>>) -> Result<String> {
        let mut table = Self::new();
        table.set_header(headers);

        for row in rows {
            table.add_row(row);
        }

        Ok(table.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_table_renders_rows() {
        let headers = vec!["Tool", "Prompt"];
        let rows = vec![
            vec!["storage_blob_list".to_string(), "List my blobs".to_string()],
            vec!["keyvault_secret_list".to_string(), "List secrets".to_string()],
        ];
        let rendered = TableFormatter::simple(headers, rows).unwrap();
        assert!(rendered.contains("storage_blob_list"));
        assert!(rendered.contains("List secrets"));
    }

    #[test]
    fn test_empty_table_keeps_headers() {
        let rendered = TableFormatter::simple(vec!["Name"], vec![]).unwrap();
        assert!(rendered.contains("Name"));
    }
}
