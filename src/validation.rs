//! Structural validation and internal reference resolution.
//!
//! The normalizer consumes validation through the narrow [`SchemaValidator`]
//! trait, so any compliant validator implementation can be substituted. The
//! built-in [`DocumentValidator`] checks top-level document shape and inlines
//! internal `#/` JSON-pointer references, with a depth cap so cyclic schema
//! graphs stay bounded.

use serde_json::{Map, Value};
use thiserror::Error;

/// Inlined references deeper than this are replaced with an empty schema.
/// Keeps eager resolution finite on self-referential documents; the field
/// flattener applies its own, much tighter bound afterwards.
const MAX_REF_DEPTH: usize = 16;

/// Validation failure, split so the normalizer can distinguish the one
/// recoverable case (unresolved references) from everything else.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Every error was an unresolved `$ref`; the caller may retry with the
    /// reference-tolerant [`SchemaValidator::parse`].
    #[error("unresolved references: {}", .0.join(", "))]
    UnresolvedRefs(Vec<String>),

    /// The document is structurally invalid.
    #[error("{0}")]
    Structural(String),
}

/// The two-method contract the normalizer consumes.
///
/// `validate` is strict: any structural problem or unresolved reference is an
/// error. `parse` is reference-tolerant: unresolved references are replaced
/// with empty schemas and the document is returned anyway.
pub trait SchemaValidator {
    fn validate(&self, document: &Value) -> Result<Value, ValidationError>;
    fn parse(&self, document: &Value) -> Result<Value, ValidationError>;
}

/// Built-in validator: structural shape checks plus internal `#/` reference
/// inlining. External and remote references are never resolved here; in
/// strict mode they count as unresolved.
#[derive(Debug, Default)]
pub struct DocumentValidator;

impl DocumentValidator {
    pub fn new() -> Self {
        DocumentValidator
    }

    fn check_structure(&self, document: &Value) -> Result<(), ValidationError> {
        let root = document
            .as_object()
            .ok_or_else(|| ValidationError::Structural("document is not an object".to_string()))?;

        if let Some(info) = root.get("info")
            && !info.is_object()
        {
            return Err(ValidationError::Structural(
                "\"info\" must be an object".to_string(),
            ));
        }

        if let Some(paths) = root.get("paths")
            && !paths.is_object()
        {
            return Err(ValidationError::Structural(
                "\"paths\" must be an object".to_string(),
            ));
        }

        Ok(())
    }
}

impl SchemaValidator for DocumentValidator {
    fn validate(&self, document: &Value) -> Result<Value, ValidationError> {
        self.check_structure(document)?;

        let mut unresolved = Vec::new();
        let resolved = resolve_refs(document, document, 0, &mut unresolved);
        if !unresolved.is_empty() {
            unresolved.sort();
            unresolved.dedup();
            return Err(ValidationError::UnresolvedRefs(unresolved));
        }
        Ok(resolved)
    }

    fn parse(&self, document: &Value) -> Result<Value, ValidationError> {
        self.check_structure(document)?;

        let mut unresolved = Vec::new();
        Ok(resolve_refs(document, document, 0, &mut unresolved))
    }
}

/// Recursively replaces `{"$ref": "#/..."}` nodes with their targets.
/// Unresolvable references are recorded and replaced with an empty object.
fn resolve_refs(value: &Value, root: &Value, depth: usize, unresolved: &mut Vec<String>) -> Value {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(reference)) = map.get("$ref") {
                if depth >= MAX_REF_DEPTH {
                    return Value::Object(Map::new());
                }
                return match lookup_pointer(root, reference) {
                    Some(target) => resolve_refs(target, root, depth + 1, unresolved),
                    None => {
                        unresolved.push(reference.clone());
                        Value::Object(Map::new())
                    }
                };
            }
            let mut out = Map::with_capacity(map.len());
            for (key, child) in map {
                out.insert(key.clone(), resolve_refs(child, root, depth, unresolved));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| resolve_refs(item, root, depth, unresolved))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Resolves an internal `#/a/b` pointer against the document root. Returns
/// `None` for external references and missing targets alike.
fn lookup_pointer<'a>(root: &'a Value, reference: &str) -> Option<&'a Value> {
    let pointer = reference.strip_prefix('#')?;
    if pointer.is_empty() {
        return Some(root);
    }

    let mut current = root;
    for raw_segment in pointer.split('/').skip(1) {
        let segment = raw_segment.replace("~1", "/").replace("~0", "~");
        current = match current {
            Value::Object(map) => map.get(&segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}
