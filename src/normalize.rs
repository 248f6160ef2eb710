//! Converts a raw, already-deserialized API description document into the
//! canonical [`CanonicalApi`] representation: validation, dialect detection,
//! and dispatch to the matching extraction pipeline.

use crate::canonical::CanonicalApi;
use crate::error::NormalizeError;
use crate::extract::{DialectExtractor, OpenApi3Extractor, Swagger2Extractor};
use crate::validation::{DocumentValidator, SchemaValidator, ValidationError};
use serde_json::Value;

/// The two supported API-description schema families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    OpenApi3,
    Swagger2,
}

/// Detects the dialect by its structural marker: `openapi: "3.x"` or
/// `swagger: "2.0"`.
pub fn detect_dialect(document: &Value) -> Option<Dialect> {
    if let Some(version) = document.get("openapi").and_then(Value::as_str)
        && version.starts_with('3')
    {
        return Some(Dialect::OpenApi3);
    }
    if document.get("swagger").and_then(Value::as_str) == Some("2.0") {
        return Some(Dialect::Swagger2);
    }
    None
}

/// Normalizes a document using the built-in [`DocumentValidator`].
pub fn normalize(document: &Value) -> Result<CanonicalApi, NormalizeError> {
    normalize_document(document, &DocumentValidator::new())
}

/// Normalizes a document with an injected validation capability.
///
/// Strict validation runs first. When it reports only unresolved references,
/// the reference-tolerant parse is retried and a warning is recorded instead
/// of failing; any other validation failure aborts. Per-operation extraction
/// failures never surface here; they degrade to warnings inside the
/// extractors.
pub fn normalize_document(
    document: &Value,
    validator: &dyn SchemaValidator,
) -> Result<CanonicalApi, NormalizeError> {
    let mut warnings = Vec::new();

    let validated = match validator.validate(document) {
        Ok(validated) => validated,
        Err(ValidationError::UnresolvedRefs(refs)) => {
            warnings.push(format!(
                "unresolved references ({}); continuing with a reference-tolerant parse",
                refs.join(", ")
            ));
            validator
                .parse(document)
                .map_err(|err| NormalizeError::invalid_spec(err.to_string()))?
        }
        Err(ValidationError::Structural(message)) => {
            return Err(NormalizeError::invalid_spec(message));
        }
    };

    let dialect = detect_dialect(&validated)
        .ok_or_else(|| NormalizeError::UnsupportedVersion(version_marker(&validated)))?;

    let extractor: &dyn DialectExtractor = match dialect {
        Dialect::OpenApi3 => &OpenApi3Extractor,
        Dialect::Swagger2 => &Swagger2Extractor,
    };

    let mut api = extractor
        .extract(&validated, &mut warnings)
        .map_err(|err| NormalizeError::Extraction(err.to_string()))?;
    api.warnings = warnings;
    Ok(api)
}

/// Human-readable description of whatever version marker the document does
/// carry, for the `UnsupportedVersion` error.
fn version_marker(document: &Value) -> String {
    if let Some(version) = document.get("openapi").and_then(Value::as_str) {
        return format!("openapi {version}");
    }
    if let Some(version) = document.get("swagger").and_then(Value::as_str) {
        return format!("swagger {version}");
    }
    "no openapi/swagger version marker".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dialect_detection() {
        assert_eq!(
            detect_dialect(&json!({ "openapi": "3.0.3" })),
            Some(Dialect::OpenApi3)
        );
        assert_eq!(
            detect_dialect(&json!({ "openapi": "3.1.0" })),
            Some(Dialect::OpenApi3)
        );
        assert_eq!(
            detect_dialect(&json!({ "swagger": "2.0" })),
            Some(Dialect::Swagger2)
        );
        assert_eq!(detect_dialect(&json!({ "swagger": "1.2" })), None);
        assert_eq!(detect_dialect(&json!({ "openapi": "4.0.0" })), None);
        assert_eq!(detect_dialect(&json!({})), None);
    }

    #[test]
    fn test_unrecognized_dialect_is_unsupported_version() {
        let doc = json!({ "info": { "title": "X", "version": "1.0.0" }, "paths": {} });
        match normalize(&doc) {
            Err(NormalizeError::UnsupportedVersion(marker)) => {
                assert!(marker.contains("no openapi/swagger"));
            }
            other => panic!("expected UnsupportedVersion, got {other:?}"),
        }
    }

    #[test]
    fn test_structural_failure_is_invalid_spec() {
        let doc = json!({ "openapi": "3.0.0", "paths": "not-an-object" });
        match normalize(&doc) {
            Err(NormalizeError::InvalidSpec { message, .. }) => {
                assert!(message.contains("paths"));
            }
            other => panic!("expected InvalidSpec, got {other:?}"),
        }
    }

    #[test]
    fn test_unresolved_refs_downgrade_to_warning() {
        let doc = json!({
            "openapi": "3.0.0",
            "info": { "title": "Pets", "version": "1.0.0" },
            "paths": {
                "/pets": {
                    "get": {
                        "responses": {
                            "200": {
                                "content": { "application/json": {
                                    "schema": { "$ref": "#/components/schemas/Missing" }
                                }}
                            }
                        }
                    }
                }
            }
        });

        let api = normalize(&doc).expect("tolerant retry should succeed");
        assert_eq!(api.actions.len(), 1);
        assert!(
            api.warnings
                .iter()
                .any(|w| w.contains("unresolved references"))
        );
    }
}
