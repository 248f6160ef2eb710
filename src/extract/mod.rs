//! Dialect-specific extraction of the canonical model.
//!
//! Two structurally parallel extractors share this contract and the field
//! flattener; the normalizer picks one after dialect detection.

pub mod fields;
pub mod openapi3;
pub mod swagger2;

pub use openapi3::OpenApi3Extractor;
pub use swagger2::Swagger2Extractor;

use crate::canonical::{CanonicalApi, HttpMethod};
use serde_json::Value;

/// Base URL used when a document declares no server or host at all.
pub const DEFAULT_BASE_URL: &str = "http://localhost";

/// One extraction pipeline per supported dialect.
///
/// Warnings go to the sink; the returned model carries an empty warning list
/// and the normalizer installs the accumulated sink at the end. Returning
/// `Err` aborts the whole document; per-operation problems must instead be
/// recorded in the sink and the offending action omitted.
pub trait DialectExtractor {
    fn extract(&self, document: &Value, warnings: &mut Vec<String>)
    -> anyhow::Result<CanonicalApi>;
}

/// Lower-cases the input and collapses every non-alphanumeric run into a
/// single hyphen, with leading/trailing hyphens stripped.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

/// Stable action identifier: the slugified operation id when one is declared,
/// otherwise synthesized from method + path.
pub fn action_slug(operation_id: Option<&str>, method: HttpMethod, path: &str) -> String {
    match operation_id {
        Some(id) if !id.trim().is_empty() => slugify(id),
        _ => slugify(&format!("{} {}", method.as_key(), path)),
    }
}

/// Display label: the operation summary when present, otherwise the
/// title-cased slug.
pub fn action_label(summary: Option<&str>, slug: &str) -> String {
    match summary {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => title_case(slug),
    }
}

/// `"list-all-pets"` -> `"List All Pets"`.
pub fn title_case(slug: &str) -> String {
    slug.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Operation description, falling back to the summary.
pub fn action_description(operation: &serde_json::Map<String, Value>) -> String {
    operation
        .get("description")
        .and_then(Value::as_str)
        .or_else(|| operation.get("summary").and_then(Value::as_str))
        .unwrap_or_default()
        .to_string()
}

/// Optional list of tag strings; non-string entries are dropped.
pub fn action_tags(operation: &serde_json::Map<String, Value>) -> Option<Vec<String>> {
    let tags: Vec<String> = operation
        .get("tags")?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect();
    if tags.is_empty() { None } else { Some(tags) }
}

/// `deprecated: true` becomes `Some(true)`; everything else is absent.
pub fn action_deprecated(operation: &serde_json::Map<String, Value>) -> Option<bool> {
    match operation.get("deprecated").and_then(Value::as_bool) {
        Some(true) => Some(true),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_collapses_runs() {
        assert_eq!(slugify("List  All__Pets!"), "list-all-pets");
        assert_eq!(slugify("get /pets/{petId}"), "get-pets-petid");
        assert_eq!(slugify("---x---"), "x");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_action_slug_falls_back_to_method_path() {
        assert_eq!(
            action_slug(None, HttpMethod::Get, "/pets/{petId}"),
            "get-pets-petid"
        );
        assert_eq!(
            action_slug(Some("listPets"), HttpMethod::Get, "/pets"),
            "listpets"
        );
        assert_eq!(action_slug(Some("  "), HttpMethod::Delete, "/pets"), "delete-pets");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("list-all-pets"), "List All Pets");
        assert_eq!(title_case("x"), "X");
    }
}
