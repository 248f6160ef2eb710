use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

//==============================================================================
// Canonical API Model
//==============================================================================

/// The unified, dialect-independent representation of an API description.
///
/// Produced exclusively by the normalizer and immutable once returned. The
/// serialized JSON field names are stable and consumed by downstream display,
/// preview, and publish collaborators.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalApi {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub description: String,
    pub base_url: String,
    pub version: String,
    pub auth: AuthDescriptor,
    pub actions: Vec<Action>,
    /// Non-fatal issues accumulated during extraction.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<String>,
}

/// One canonical endpoint record.
///
/// Identity for comparison purposes is the `(method, path)` pair, not the
/// slug: slugs are display identifiers and may be synthesized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub slug: String,
    pub label: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub description: String,
    pub method: HttpMethod,
    pub path: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub path_params: Vec<Field>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub query_params: Vec<Field>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub request_body: Vec<Field>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub response_body: Vec<Field>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
}

impl Action {
    /// The lookup key used by the diff engine: `"METHOD path"`.
    pub fn key(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

/// The fixed set of HTTP methods an action may carry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// All supported methods, in the order operations are walked per path.
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
    ];

    /// The lowercase key the method appears under in a path item.
    pub fn as_key(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_key().to_uppercase())
    }
}

/// One canonical, possibly-nested schema property descriptor.
///
/// Nesting is depth-bounded by the flattener, so a `Field` tree is always
/// finite even for self-referential source schemas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub required: bool,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    /// Nested object fields, present only for object-typed fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<Field>>,
    /// Element descriptor, present only for array-typed fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Field>>,
}

impl Field {
    /// A bare field with just a key and type; the label defaults to the key.
    pub fn new(key: impl Into<String>, field_type: FieldType) -> Self {
        let key = key.into();
        Field {
            label: key.clone(),
            key,
            field_type,
            required: false,
            enum_values: None,
            default: None,
            format: None,
            example: None,
            properties: None,
            items: None,
        }
    }
}

/// The closed set of canonical field types. Unrecognized source types map to
/// `String`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Array,
    Object,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Array => "array",
            FieldType::Object => "object",
        };
        write!(f, "{s}")
    }
}

//==============================================================================
// Authentication Descriptor
//==============================================================================

/// The resolved authentication scheme of an API, one variant active at a
/// time, each carrying only its own configuration.
///
/// Swagger-dialect `basic` auth is mapped onto the `Bearer` variant with
/// scheme name `"basic"` for model uniformity.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum AuthDescriptor {
    #[serde(rename = "apiKey")]
    ApiKey {
        name: String,
        /// Where the key is sent: `"header"` or `"query"`.
        #[serde(rename = "in")]
        location: String,
    },
    #[serde(rename = "bearer")]
    Bearer { scheme: String },
    #[serde(rename = "oauth2", rename_all = "camelCase")]
    OAuth2 {
        #[serde(skip_serializing_if = "Option::is_none")]
        authorization_url: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        token_url: Option<String>,
        #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
        scopes: BTreeMap<String, String>,
    },
    #[default]
    #[serde(rename = "none")]
    None,
}

impl AuthDescriptor {
    /// The serialized tag of the active variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            AuthDescriptor::ApiKey { .. } => "apiKey",
            AuthDescriptor::Bearer { .. } => "bearer",
            AuthDescriptor::OAuth2 { .. } => "oauth2",
            AuthDescriptor::None => "none",
        }
    }
}
