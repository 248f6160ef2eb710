//! Display-ready aggregation over one canonical model.

use crate::canonical::CanonicalApi;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Counts and collections downstream display consumers depend on; the field
/// set and names are stable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub title: String,
    pub version: String,
    pub base_url: String,
    pub auth_type: String,
    pub endpoint_count: usize,
    pub endpoints_by_method: BTreeMap<String, usize>,
    pub tags: Vec<String>,
    /// Always empty for a successfully normalized model; kept so the output
    /// shape matches what callers gate on.
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub deprecated: usize,
}

/// Builds the summary: per-method counts, sorted tag union, deprecated tally.
pub fn build_summary(api: &CanonicalApi) -> Summary {
    let mut endpoints_by_method = BTreeMap::new();
    let mut tags = BTreeSet::new();
    let mut deprecated = 0;

    for action in &api.actions {
        *endpoints_by_method
            .entry(action.method.to_string())
            .or_insert(0) += 1;
        if let Some(action_tags) = &action.tags {
            tags.extend(action_tags.iter().cloned());
        }
        if action.deprecated == Some(true) {
            deprecated += 1;
        }
    }

    Summary {
        title: api.name.clone(),
        version: api.version.clone(),
        base_url: api.base_url.clone(),
        auth_type: api.auth.type_name().to_string(),
        endpoint_count: api.actions.len(),
        endpoints_by_method,
        tags: tags.into_iter().collect(),
        errors: Vec::new(),
        warnings: api.warnings.clone(),
        deprecated,
    }
}
