//! Extraction pipeline for OpenAPI 3.x documents.

use crate::canonical::{Action, AuthDescriptor, CanonicalApi, Field, HttpMethod};
use crate::extract::fields::{field_from_schema, flatten_fields, map_type};
use crate::extract::{
    DEFAULT_BASE_URL, DialectExtractor, action_deprecated, action_description, action_label,
    action_slug, action_tags,
};
use anyhow::bail;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub struct OpenApi3Extractor;

impl DialectExtractor for OpenApi3Extractor {
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

        let base_url = root
            .get("servers")
            .and_then(Value::as_array)
            .and_then(|servers| servers.first())
            .and_then(|server| server.get("url"))
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_BASE_URL)
            .to_string();

        let auth = resolve_auth(
            root.get("components")
                .and_then(|components| components.get("securitySchemes")),
        );

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
            base_url,
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

    let (path_params, query_params) = extract_parameters(operation, warnings)?;

    let request_body = match operation
        .get("requestBody")
        .and_then(|body| body.get("content"))
        .and_then(Value::as_object)
        .and_then(body_schema)
    {
        Some(schema) => flatten_fields(schema, warnings, 0),
        None => Vec::new(),
    };

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

/// Splits the operation's parameter list into path and query fields. The
/// parameter schema carries the type; other locations (header, cookie) are
/// outside the canonical model and skipped.
fn extract_parameters(
    operation: &Map<String, Value>,
    warnings: &mut Vec<String>,
) -> anyhow::Result<(Vec<Field>, Vec<Field>)> {
    let mut path_params = Vec::new();
    let mut query_params = Vec::new();

    let Some(parameters) = operation.get("parameters") else {
        return Ok((path_params, query_params));
    };
    let Some(parameters) = parameters.as_array() else {
        bail!("\"parameters\" is not an array");
    };

    for parameter in parameters {
        let Some(parameter) = parameter.as_object() else {
            warnings.push("parameter entry is not an object; skipping".to_string());
            continue;
        };
        let Some(name) = parameter.get("name").and_then(Value::as_str) else {
            warnings.push("parameter without a name; skipping".to_string());
            continue;
        };

        let mut field = match parameter.get("schema").and_then(Value::as_object) {
            Some(schema) => field_from_schema(name, schema, false),
            None => Field::new(name, map_type(None)),
        };
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

    Ok((path_params, query_params))
}

/// First JSON-compatible media type in a content map: any `*json*` media
/// type, then the form-encoded fallback.
fn body_schema(content: &Map<String, Value>) -> Option<&Value> {
    content
        .iter()
        .find(|(media_type, _)| media_type.contains("json"))
        .or_else(|| content.get_key_value("application/x-www-form-urlencoded"))
        .and_then(|(_, media)| media.get("schema"))
}

/// The first of the 200/201/2XX entries that declares a JSON schema.
fn success_response_schema(responses: &Map<String, Value>) -> Option<&Value> {
    ["200", "201", "2XX"].iter().find_map(|code| {
        responses
            .get(*code)?
            .get("content")
            .and_then(Value::as_object)
            .and_then(body_schema)
    })
}

/// Resolves the document's security schemes by priority: API key first, then
/// HTTP bearer/basic, then OAuth2. First match wins; anything else is `None`.
fn resolve_auth(schemes: Option<&Value>) -> AuthDescriptor {
    let Some(schemes) = schemes.and_then(Value::as_object) else {
        return AuthDescriptor::None;
    };

    for scheme in schemes.values().filter_map(Value::as_object) {
        if scheme.get("type").and_then(Value::as_str) == Some("apiKey") {
            return AuthDescriptor::ApiKey {
                name: scheme
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                location: scheme
                    .get("in")
                    .and_then(Value::as_str)
                    .unwrap_or("header")
                    .to_string(),
            };
        }
    }

    for scheme in schemes.values().filter_map(Value::as_object) {
        if scheme.get("type").and_then(Value::as_str) == Some("http") {
            return AuthDescriptor::Bearer {
                scheme: scheme
                    .get("scheme")
                    .and_then(Value::as_str)
                    .unwrap_or("bearer")
                    .to_string(),
            };
        }
    }

    for scheme in schemes.values().filter_map(Value::as_object) {
        if scheme.get("type").and_then(Value::as_str) == Some("oauth2") {
            return oauth2_from_flows(scheme.get("flows").and_then(Value::as_object));
        }
    }

    AuthDescriptor::None
}

/// Picks the first declared flow in a fixed order and lifts its URLs and
/// scope map into the descriptor.
fn oauth2_from_flows(flows: Option<&Map<String, Value>>) -> AuthDescriptor {
    let flow = flows.and_then(|flows| {
        ["authorizationCode", "implicit", "password", "clientCredentials"]
            .iter()
            .find_map(|name| flows.get(*name).and_then(Value::as_object))
    });

    let Some(flow) = flow else {
        return AuthDescriptor::OAuth2 {
            authorization_url: None,
            token_url: None,
            scopes: BTreeMap::new(),
        };
    };

    AuthDescriptor::OAuth2 {
        authorization_url: flow
            .get("authorizationUrl")
            .and_then(Value::as_str)
            .map(str::to_string),
        token_url: flow
            .get("tokenUrl")
            .and_then(Value::as_str)
            .map(str::to_string),
        scopes: scopes_map(flow.get("scopes")),
    }
}

pub(crate) fn scopes_map(scopes: Option<&Value>) -> BTreeMap<String, String> {
    scopes
        .and_then(Value::as_object)
        .map(|scopes| {
            scopes
                .iter()
                .map(|(scope, desc)| (scope.clone(), desc.as_str().unwrap_or_default().to_string()))
                .collect()
        })
        .unwrap_or_default()
}
