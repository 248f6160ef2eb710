use api_sign::loader::load_document;
use api_sign::normalize::normalize;
use api_sign::spec::{ApiSpec, Compatibility};

const ORDERS_V1: &str = r#"
{
  "openapi": "3.0.0",
  "info": { "title": "Orders", "version": "1.0.0" },
  "paths": {
    "/orders": {
      "get": {
        "operationId": "listOrders",
        "responses": { "200": { "description": "ok" } }
      }
    }
  }
}
"#;

#[test]
fn test_identical_documents_are_green() {
    // Same semantics, different formatting.
    let reformatted = r#"
{
  "info": { "title": "Orders", "version": "1.0.0" },
  "openapi": "3.0.0",
  "paths": {
    "/orders": { "get": { "operationId": "listOrders", "responses": { "200": { "description": "ok" } } } }
  }
}
"#;

    let old_spec = ApiSpec::try_from(ORDERS_V1).expect("Failed to parse old spec");
    let new_spec = ApiSpec::try_from(reformatted).expect("Failed to parse new spec");
    assert_eq!(old_spec.compare_with(&new_spec), Compatibility::Green);
}

#[test]
fn test_added_endpoint_is_yellow() {
    let extended = r#"
{
  "openapi": "3.0.0",
  "info": { "title": "Orders", "version": "1.1.0" },
  "paths": {
    "/orders": {
      "get": {
        "operationId": "listOrders",
        "responses": { "200": { "description": "ok" } }
      },
      "post": {
        "operationId": "createOrder",
        "responses": { "201": { "description": "created" } }
      }
    }
  }
}
"#;

    let old_spec = ApiSpec::try_from(ORDERS_V1).expect("Failed to parse old spec");
    let new_spec = ApiSpec::try_from(extended).expect("Failed to parse new spec");
    assert_eq!(old_spec.compare_with(&new_spec), Compatibility::Yellow);
}

#[test]
fn test_removed_endpoint_is_red() {
    let emptied = r#"
{
  "openapi": "3.0.0",
  "info": { "title": "Orders", "version": "2.0.0" },
  "paths": {}
}
"#;

    let old_spec = ApiSpec::try_from(ORDERS_V1).expect("Failed to parse old spec");
    let new_spec = ApiSpec::try_from(emptied).expect("Failed to parse new spec");
    assert_eq!(old_spec.compare_with(&new_spec), Compatibility::Red);
}

#[test]
fn test_cross_dialect_comparison_is_possible() {
    // The same API described in the Swagger 2.0 dialect still diffs cleanly
    // against the OpenAPI 3 version at the action level.
    let swagger = r#"
{
  "swagger": "2.0",
  "info": { "title": "Orders", "version": "1.0.0" },
  "paths": {
    "/orders": {
      "get": {
        "operationId": "listOrders",
        "responses": { "200": { "description": "ok" } }
      }
    }
  }
}
"#;

    let old_spec = ApiSpec::try_from(ORDERS_V1).expect("Failed to parse OpenAPI spec");
    let new_spec = ApiSpec::try_from(swagger).expect("Failed to parse Swagger spec");

    let result = old_spec.diff(&new_spec);
    assert!(result.changes.is_empty());
}

#[test]
fn test_documents_load_from_files() {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("orders.json");
    std::fs::write(&path, ORDERS_V1).expect("Failed to write spec file");

    let document = load_document(&path).expect("Failed to load document");
    let api = normalize(&document).expect("Failed to normalize document");
    assert_eq!(api.name, "Orders");
    assert_eq!(api.actions.len(), 1);
}
