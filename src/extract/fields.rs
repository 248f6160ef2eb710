//! Recursive, depth-bounded flattening of schema nodes into canonical fields.

use crate::canonical::{Field, FieldType};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Object-nesting bound for flattening. A call at this depth or beyond
/// returns an empty list, which silently truncates documentation depth for
/// deeply nested payloads. The off-by-one is load-bearing: nested fields two
/// object levels below the top-level call are the last ones emitted.
pub const MAX_DEPTH: u32 = 2;

/// Maps a declared schema type onto the closed canonical set. Anything
/// unrecognized, including a missing type, becomes `string`.
pub fn map_type(raw: Option<&str>) -> FieldType {
    match raw {
        Some("string") => FieldType::String,
        Some("number") | Some("integer") => FieldType::Number,
        Some("boolean") => FieldType::Boolean,
        Some("array") => FieldType::Array,
        Some("object") => FieldType::Object,
        _ => FieldType::String,
    }
}

/// Flattens a schema node into a list of typed field descriptors.
///
/// Object schemas emit one field per declared property, recursing into
/// object-typed properties at `depth + 1`. An array node flattens its item
/// schema at the *same* depth; only object nesting consumes a level. A
/// malformed subtree degrades to an empty list plus a warning rather than
/// failing the caller.
pub fn flatten_fields(schema: &Value, warnings: &mut Vec<String>, depth: u32) -> Vec<Field> {
    if depth >= MAX_DEPTH {
        return Vec::new();
    }

    let Some(node) = schema.as_object() else {
        if !schema.is_null() {
            warnings.push("schema node is not an object; skipping".to_string());
        }
        return Vec::new();
    };

    // An array node delegates to its element schema without consuming depth.
    if node.get("type").and_then(Value::as_str) == Some("array") {
        return match node.get("items") {
            Some(items) => flatten_fields(items, warnings, depth),
            None => Vec::new(),
        };
    }

    let properties = match node.get("properties") {
        Some(Value::Object(props)) => props,
        Some(_) => {
            warnings.push("schema \"properties\" is not an object; skipping".to_string());
            return Vec::new();
        }
        None => return Vec::new(),
    };

    let required: HashSet<&str> = node
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let mut fields = Vec::with_capacity(properties.len());
    for (key, prop) in properties {
        let Some(prop_node) = prop.as_object() else {
            warnings.push(format!("property \"{key}\" is not a schema object; skipping"));
            continue;
        };

        let mut field = field_from_schema(key, prop_node, required.contains(key.as_str()));
        match field.field_type {
            FieldType::Object => {
                let nested = flatten_fields(prop, warnings, depth + 1);
                if !nested.is_empty() {
                    field.properties = Some(nested);
                }
            }
            FieldType::Array => {
                if let Some(items) = prop_node.get("items")
                    && let Some(item_node) = items.as_object()
                {
                    let mut item = field_from_schema("item", item_node, false);
                    if item.field_type == FieldType::Object {
                        let nested = flatten_fields(items, warnings, depth + 1);
                        if !nested.is_empty() {
                            item.properties = Some(nested);
                        }
                    }
                    field.items = Some(Box::new(item));
                }
            }
            _ => {}
        }
        fields.push(field);
    }
    fields
}

/// Builds one field from a property schema, without recursing.
pub fn field_from_schema(key: &str, schema: &Map<String, Value>, required: bool) -> Field {
    let mut field = Field::new(key, map_type(schema.get("type").and_then(Value::as_str)));
    if let Some(title) = schema.get("title").and_then(Value::as_str) {
        field.label = title.to_string();
    }
    field.required = required;
    field.enum_values = schema.get("enum").and_then(Value::as_array).cloned();
    field.default = schema.get("default").cloned();
    field.format = schema
        .get("format")
        .and_then(Value::as_str)
        .map(str::to_string);
    field.example = schema.get("example").cloned();
    field
}
