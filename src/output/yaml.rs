use super::ActionTable;

pub struct YamlFormatter;

impl YamlFormatter {
    pub fn format(result: &ActionTable) -> String {
        let map = result.to_keyed_map();
        serde_yaml::to_string(&map).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_yaml_parses_back() {
        let output = YamlFormatter::format(&crate::output::tests::sample());
        let parsed: BTreeMap<String, Vec<crate::actions::ActionRecord>> =
            serde_yaml::from_str(&output).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed["apps\tDeployment\ty"][0].name, "restart");
        assert!(!parsed["apps\tDeployment\ty"][0].available);
    }
}
