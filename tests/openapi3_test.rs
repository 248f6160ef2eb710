use api_sign::canonical::{AuthDescriptor, FieldType, HttpMethod};
use api_sign::loader::parse_content;
use api_sign::normalize::normalize;

fn normalize_str(content: &str) -> api_sign::canonical::CanonicalApi {
    let document = parse_content(content).expect("Failed to parse document");
    normalize(&document).expect("Failed to normalize document")
}

#[test]
fn test_basic_document_extraction() {
    let api = normalize_str(
        r#"
{
  "openapi": "3.0.3",
  "info": {
    "title": "Inventory API",
    "version": "1.2.3",
    "description": "Warehouse inventory"
  },
  "servers": [
    { "url": "https://inventory.example.com/api" },
    { "url": "https://backup.example.com/api" }
  ],
  "paths": {
    "/items": {
      "get": {
        "operationId": "listItems",
        "summary": "List items",
        "tags": ["items"],
        "responses": { "200": { "description": "ok" } }
      },
      "post": {
        "responses": { "201": { "description": "created" } }
      }
    }
  }
}
"#,
    );

    assert_eq!(api.name, "Inventory API");
    assert_eq!(api.version, "1.2.3");
    assert_eq!(api.description, "Warehouse inventory");
    assert_eq!(api.base_url, "https://inventory.example.com/api");
    assert_eq!(api.auth, AuthDescriptor::None);
    assert_eq!(api.actions.len(), 2);

    let list = &api.actions[0];
    assert_eq!(list.slug, "listitems");
    assert_eq!(list.label, "List items");
    assert_eq!(list.method, HttpMethod::Get);
    assert_eq!(list.tags.as_deref(), Some(&["items".to_string()][..]));

    // No operationId: slug is synthesized from method + path, label from it.
    let create = &api.actions[1];
    assert_eq!(create.slug, "post-items");
    assert_eq!(create.label, "Post Items");
    assert_eq!(create.method, HttpMethod::Post);
}

#[test]
fn test_missing_server_defaults_to_placeholder() {
    let api = normalize_str(
        r#"
{
  "openapi": "3.0.0",
  "info": { "title": "Bare", "version": "0.1.0" },
  "paths": {}
}
"#,
    );
    assert_eq!(api.base_url, "http://localhost");
}

#[test]
fn test_api_key_wins_over_bearer_and_oauth2() {
    let api = normalize_str(
        r#"
{
  "openapi": "3.0.0",
  "info": { "title": "Secured", "version": "1.0.0" },
  "paths": {},
  "components": {
    "securitySchemes": {
      "bearer_auth": { "type": "http", "scheme": "bearer" },
      "oauth": {
        "type": "oauth2",
        "flows": {
          "authorizationCode": {
            "authorizationUrl": "https://auth.example.com/authorize",
            "tokenUrl": "https://auth.example.com/token",
            "scopes": { "read": "Read access" }
          }
        }
      },
      "key_auth": { "type": "apiKey", "name": "X-Api-Key", "in": "header" }
    }
  }
}
"#,
    );

    assert_eq!(api.auth.type_name(), "apiKey");
    assert_eq!(
        api.auth,
        AuthDescriptor::ApiKey {
            name: "X-Api-Key".to_string(),
            location: "header".to_string(),
        }
    );
}

#[test]
fn test_oauth2_flow_is_lifted_into_descriptor() {
    let api = normalize_str(
        r#"
{
  "openapi": "3.0.0",
  "info": { "title": "OAuth only", "version": "1.0.0" },
  "paths": {},
  "components": {
    "securitySchemes": {
      "oauth": {
        "type": "oauth2",
        "flows": {
          "authorizationCode": {
            "authorizationUrl": "https://auth.example.com/authorize",
            "tokenUrl": "https://auth.example.com/token",
            "scopes": { "read": "Read access", "write": "Write access" }
          }
        }
      }
    }
  }
}
"#,
    );

    match &api.auth {
        AuthDescriptor::OAuth2 {
            authorization_url,
            token_url,
            scopes,
        } => {
            assert_eq!(
                authorization_url.as_deref(),
                Some("https://auth.example.com/authorize")
            );
            assert_eq!(token_url.as_deref(), Some("https://auth.example.com/token"));
            assert_eq!(scopes.len(), 2);
            assert_eq!(scopes.get("read").map(String::as_str), Some("Read access"));
        }
        other => panic!("expected oauth2 descriptor, got {other:?}"),
    }
}

#[test]
fn test_parameters_are_partitioned_and_typed() {
    let api = normalize_str(
        r#"
{
  "openapi": "3.0.0",
  "info": { "title": "Params", "version": "1.0.0" },
  "paths": {
    "/items/{itemId}": {
      "get": {
        "operationId": "getItem",
        "parameters": [
          { "name": "itemId", "in": "path", "required": true, "schema": { "type": "integer" } },
          { "name": "verbose", "in": "query", "schema": { "type": "boolean" } },
          { "name": "X-Trace", "in": "header", "schema": { "type": "string" } }
        ],
        "responses": { "200": { "description": "ok" } }
      }
    }
  }
}
"#,
    );

    let action = &api.actions[0];
    assert_eq!(action.path_params.len(), 1);
    assert_eq!(action.path_params[0].key, "itemId");
    assert!(action.path_params[0].required);
    assert_eq!(action.path_params[0].field_type, FieldType::Number);

    assert_eq!(action.query_params.len(), 1);
    assert_eq!(action.query_params[0].key, "verbose");
    assert!(!action.query_params[0].required);
    assert_eq!(action.query_params[0].field_type, FieldType::Boolean);
}

#[test]
fn test_request_body_prefers_json_then_form_encoding() {
    let api = normalize_str(
        r#"
{
  "openapi": "3.0.0",
  "info": { "title": "Bodies", "version": "1.0.0" },
  "paths": {
    "/json": {
      "post": {
        "requestBody": {
          "content": {
            "text/plain": { "schema": { "type": "string" } },
            "application/json": {
              "schema": {
                "type": "object",
                "required": ["name"],
                "properties": { "name": { "type": "string" } }
              }
            }
          }
        },
        "responses": { "200": { "description": "ok" } }
      }
    },
    "/form": {
      "post": {
        "requestBody": {
          "content": {
            "application/x-www-form-urlencoded": {
              "schema": {
                "type": "object",
                "properties": { "token": { "type": "string" } }
              }
            }
          }
        },
        "responses": { "200": { "description": "ok" } }
      }
    }
  }
}
"#,
    );

    let json_action = &api.actions[0];
    assert_eq!(json_action.request_body.len(), 1);
    assert_eq!(json_action.request_body[0].key, "name");
    assert!(json_action.request_body[0].required);

    let form_action = &api.actions[1];
    assert_eq!(form_action.request_body.len(), 1);
    assert_eq!(form_action.request_body[0].key, "token");
}

#[test]
fn test_response_falls_back_to_201_and_2xx() {
    let api = normalize_str(
        r#"
{
  "openapi": "3.0.0",
  "info": { "title": "Responses", "version": "1.0.0" },
  "paths": {
    "/created": {
      "post": {
        "responses": {
          "201": {
            "description": "created",
            "content": {
              "application/json": {
                "schema": { "type": "object", "properties": { "id": { "type": "integer" } } }
              }
            }
          }
        }
      }
    },
    "/wildcard": {
      "get": {
        "responses": {
          "2XX": {
            "description": "ok",
            "content": {
              "application/json": {
                "schema": { "type": "object", "properties": { "ok": { "type": "boolean" } } }
              }
            }
          }
        }
      }
    }
  }
}
"#,
    );

    assert_eq!(api.actions[0].response_body[0].key, "id");
    assert_eq!(api.actions[0].response_body[0].field_type, FieldType::Number);
    assert_eq!(api.actions[1].response_body[0].key, "ok");
}

#[test]
fn test_deprecated_flag_is_carried() {
    let api = normalize_str(
        r#"
{
  "openapi": "3.0.0",
  "info": { "title": "Dep", "version": "1.0.0" },
  "paths": {
    "/old": {
      "get": { "deprecated": true, "responses": { "200": { "description": "ok" } } },
      "delete": { "responses": { "200": { "description": "ok" } } }
    }
  }
}
"#,
    );

    assert_eq!(api.actions[0].deprecated, Some(true));
    assert_eq!(api.actions[1].deprecated, None);
}

#[test]
fn test_malformed_operation_degrades_to_warning() {
    let api = normalize_str(
        r#"
{
  "openapi": "3.0.0",
  "info": { "title": "Partial", "version": "1.0.0" },
  "paths": {
    "/bad": {
      "get": {
        "parameters": "not-an-array",
        "responses": { "200": { "description": "ok" } }
      }
    },
    "/good": {
      "get": { "responses": { "200": { "description": "ok" } } }
    }
  }
}
"#,
    );

    // The malformed operation is omitted; the rest of the document survives.
    assert_eq!(api.actions.len(), 1);
    assert_eq!(api.actions[0].path, "/good");
    assert!(
        api.warnings
            .iter()
            .any(|w| w.contains("skipped GET /bad")),
        "warnings were: {:?}",
        api.warnings
    );
}
