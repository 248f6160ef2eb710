//! Extraction pipeline for Swagger 2.0 documents.
//!
//! Structurally parallel to the OpenAPI 3 pipeline; the differences are where
//! parameters carry their type (inline, not under `schema`), the body schema
//! (a `body` parameter rather than `requestBody`), and the host/basePath
//! split of the base URL.

use crate::canonical::{Action, AuthDescriptor, CanonicalApi, Field, HttpMethod};
use crate::extract::fields::{field_from_schema, flatten_fields};
use crate::extract::openapi3::scopes_map;
use crate::extract::{
    DEFAULT_BASE_URL, DialectExtractor, action_deprecated, action_description, action_label,
    action_slug, action_tags,
};
use anyhow::bail;
use serde_json::{Map, Value};

pub struct Swagger2Extractor;

impl DialectExtractor for Swagger2Extractor {
    fn extract(
        &self,
        document: &Value,
        warnings: &mut Vec<String>,
    ) -> anyhow::Result<CanonicalApi> {
        let root = match document.as_object() {
            Some(root) => root,
            None => bail!("document is not an object"),
        };
        let info = root.get("info").and_then(Value::as_object);

        let auth = resolve_auth(root.get("securityDefinitions"));

        let mut actions = Vec::new();
        match root.get("paths").and_then(Value::as_object) {
            Some(paths) => {
                for (path, path_item) in paths {
                    let Some(item) = path_item.as_object() else {
                        warnings.push(format!("path item \"{path}\" is not an object; skipping"));
                        continue;
                    };
                    for method in HttpMethod::ALL {
                        let Some(operation) = item.get(method.as_key()).and_then(Value::as_object)
                        else {
                            continue;
                        };
                        match extract_operation(method, path, operation, warnings) {
                            Ok(action) => actions.push(action),
                            Err(err) => {
                                warnings.push(format!("skipped {method} {path}: {err}"));
                            }
                        }
                    }
                }
            }
            None => warnings.push("document declares no paths".to_string()),
        }

        Ok(CanonicalApi {
            name: info_str(info, "title").unwrap_or_else(|| "Untitled API".to_string()),
            description: info_str(info, "description").unwrap_or_default(),
            base_url: base_url(root),
            version: info_str(info, "version").unwrap_or_else(|| "0.0.0".to_string()),
            auth,
            actions,
            warnings: Vec::new(),
        })
    }
}

fn info_str(info: Option<&Map<String, Value>>, key: &str) -> Option<String> {
    info?.get(key)?.as_str().map(str::to_string)
}

/// First declared scheme + host + basePath; without a host the document gets
/// the placeholder URL.
fn base_url(root: &Map<String, Value>) -> String {
    let Some(host) = root.get("host").and_then(Value::as_str) else {
        return DEFAULT_BASE_URL.to_string();
    };
    let scheme = root
        .get("schemes")
        .and_then(Value::as_array)
        .and_then(|schemes| schemes.first())
        .and_then(Value::as_str)
        .unwrap_or("https");
    let base_path = root.get("basePath").and_then(Value::as_str).unwrap_or("");
    format!("{scheme}://{host}{base_path}")
}

fn extract_operation(
    method: HttpMethod,
    path: &str,
    operation: &Map<String, Value>,
    warnings: &mut Vec<String>,
) -> anyhow::Result<Action> {
    let slug = action_slug(
        operation.get("operationId").and_then(Value::as_str),
        method,
        path,
    );
    let label = action_label(operation.get("summary").and_then(Value::as_str), &slug);

    let (path_params, query_params, request_body) = extract_parameters(operation, warnings)?;

    let response_body = match operation
        .get("responses")
        .and_then(Value::as_object)
        .and_then(success_response_schema)
    {
        Some(schema) => flatten_fields(schema, warnings, 0),
        None => Vec::new(),
    };

    Ok(Action {
        slug,
        label,
        description: action_description(operation),
        method,
        path: path.to_string(),
        path_params,
        query_params,
        request_body,
        response_body,
        tags: action_tags(operation),
        deprecated: action_deprecated(operation),
    })
}

/// Splits the parameter list into path fields, query fields, and the body
/// schema's flattened fields. Swagger parameters carry their type inline;
/// only the `body` parameter nests a schema.
fn extract_parameters(
    operation: &Map<String, Value>,
    warnings: &mut Vec<String>,
) -> anyhow::Result<(Vec<Field>, Vec<Field>, Vec<Field>)> {
    let mut path_params = Vec::new();
    let mut query_params = Vec::new();
    let mut request_body = Vec::new();

    let Some(parameters) = operation.get("parameters") else {
        return Ok((path_params, query_params, request_body));
    };
    let Some(parameters) = parameters.as_array() else {
        bail!("\"parameters\" is not an array");
    };

    for parameter in parameters {
        let Some(parameter) = parameter.as_object() else {
            warnings.push("parameter entry is not an object; skipping".to_string());
            continue;
        };

        if parameter.get("in").and_then(Value::as_str) == Some("body") {
            if request_body.is_empty()
                && let Some(schema) = parameter.get("schema")
            {
                request_body = flatten_fields(schema, warnings, 0);
            }
            continue;
        }

        let Some(name) = parameter.get("name").and_then(Value::as_str) else {
            warnings.push("parameter without a name; skipping".to_string());
            continue;
        };

        // The type lives directly on the parameter object in this dialect.
        let mut field = field_from_schema(name, parameter, false);
        field.required = parameter
            .get("required")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        match parameter.get("in").and_then(Value::as_str) {
            Some("path") => path_params.push(field),
            Some("query") => query_params.push(field),
            _ => {}
        }
    }

    Ok((path_params, query_params, request_body))
}

/// The first of the 200/201/2XX entries that declares a schema.
fn success_response_schema(responses: &Map<String, Value>) -> Option<&Value> {
    ["200", "201", "2XX"]
        .iter()
        .find_map(|code| responses.get(*code)?.get("schema"))
}

/// Security definitions by priority: API key first, then basic (mapped onto
/// the bearer variant), then OAuth2.
fn resolve_auth(definitions: Option<&Value>) -> AuthDescriptor {
    let Some(definitions) = definitions.and_then(Value::as_object) else {
        return AuthDescriptor::None;
    };

    for definition in definitions.values().filter_map(Value::as_object) {
        if definition.get("type").and_then(Value::as_str) == Some("apiKey") {
            return AuthDescriptor::ApiKey {
                name: definition
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                location: definition
                    .get("in")
                    .and_then(Value::as_str)
                    .unwrap_or("header")
                    .to_string(),
            };
        }
    }

    for definition in definitions.values().filter_map(Value::as_object) {
        if definition.get("type").and_then(Value::as_str) == Some("basic") {
            return AuthDescriptor::Bearer {
                scheme: "basic".to_string(),
            };
        }
    }

    for definition in definitions.values().filter_map(Value::as_object) {
        if definition.get("type").and_then(Value::as_str) == Some("oauth2") {
            return AuthDescriptor::OAuth2 {
                authorization_url: definition
                    .get("authorizationUrl")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                token_url: definition
                    .get("tokenUrl")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                scopes: scopes_map(definition.get("scopes")),
            };
        }
    }

    AuthDescriptor::None
}
