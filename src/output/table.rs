use comfy_table::{Table, presets::NOTHING};

use super::{ActionTable, COLUMNS};

pub struct TableFormatter;

impl TableFormatter {
    pub fn format(result: &ActionTable, no_headers: bool) -> String {
        if result.is_empty() {
            return "(0 actions)".to_string();
        }

        let mut table = Table::new();
        // Borderless, like kubectl/argocd output
        table.load_preset(NOTHING);

        if !no_headers {
            table.set_header(COLUMNS);
        }

        for row in result.rows() {
            table.add_row(row);
        }

        let output = table.to_string();
        let lines: Vec<&str> = output.lines().map(str::trim_end).collect();
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::sample;

    #[test]
    fn test_empty() {
        assert_eq!(
            TableFormatter::format(&ActionTable::default(), false),
            "(0 actions)"
        );
    }

    #[test]
    fn test_header_and_rows() {
        let output = TableFormatter::format(&sample(), false);
        let header = output.lines().next().unwrap();
        for col in COLUMNS {
            assert!(header.contains(col));
        }
        let rows: Vec<&str> = output.lines().filter(|l| l.contains("Deployment")).collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].contains("x") && rows[0].contains("restart"));
        assert!(rows[1].contains("pause"));
        assert!(rows[2].contains("y") && rows[2].ends_with("false"));
    }

    #[test]
    fn test_no_headers() {
        let output = TableFormatter::format(&sample(), true);
        assert!(!output.contains("AVAILABLE"));
        assert_eq!(output.lines().filter(|l| l.contains("Deployment")).count(), 3);
    }

    #[test]
    fn test_no_trailing_whitespace() {
        let output = TableFormatter::format(&sample(), false);
        assert!(output.lines().all(|l| l == l.trim_end()));
    }
}
