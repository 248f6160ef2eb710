//! Document acquisition: local files, JSON or YAML, auto-detected.

use anyhow::{Context, anyhow};
use serde_json::Value;
use std::path::Path;

/// Deserializes document content, trying JSON first and falling back to
/// YAML.
pub fn parse_content(content: &str) -> anyhow::Result<Value> {
    match serde_json::from_str(content) {
        Ok(value) => Ok(value),
        Err(json_err) => serde_yaml::from_str::<Value>(content).map_err(|yaml_err| {
            anyhow!("document is neither valid JSON ({json_err}) nor valid YAML ({yaml_err})")
        }),
    }
}

/// Reads and deserializes a document from a local file.
pub fn load_document<P: AsRef<Path>>(path: P) -> anyhow::Result<Value> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file '{}'", path.display()))?;
    parse_content(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_and_yaml_parse_to_the_same_value() {
        let json = r#"{ "openapi": "3.0.0", "info": { "title": "Pets" } }"#;
        let yaml = "openapi: \"3.0.0\"\ninfo:\n  title: Pets\n";

        let from_json = parse_content(json).expect("json should parse");
        let from_yaml = parse_content(yaml).expect("yaml should parse");
        assert_eq!(from_json, from_yaml);
    }

    #[test]
    fn test_garbage_content_is_rejected() {
        let err = parse_content("{ \"title\": [unclosed").expect_err("should fail");
        assert!(err.to_string().contains("neither valid JSON"));
    }
}
