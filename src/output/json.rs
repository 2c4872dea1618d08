use super::ActionTable;

pub struct JsonFormatter;

impl JsonFormatter {
    pub fn format(result: &ActionTable) -> String {
        let map = result.to_keyed_map();
        serde_json::to_string_pretty(&map).unwrap_or_else(|_| "{}".to_string())
    }
}
