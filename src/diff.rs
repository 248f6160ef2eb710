//! Classification of differences between two canonical action lists.
//!
//! The walk order is part of the observable contract: removed endpoints,
//! then added endpoints, then the per-action comparison for every surviving
//! key, each in its fixed sub-order. CI pipelines gate on the resulting
//! breaking count, so the breaking/non-breaking semantics here are fixed.

use crate::canonical::{Action, Field};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

//==============================================================================
// Change Types
//==============================================================================

/// Whether a change is expected to break existing API consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeType {
    #[serde(rename = "breaking")]
    Breaking,
    #[serde(rename = "non-breaking")]
    NonBreaking,
}

/// The fixed category set of detectable changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeCategory {
    EndpointRemoved,
    EndpointAdded,
    RequiredParamAdded,
    OptionalParamAdded,
    ParamRemoved,
    ParamTypeChanged,
    RequiredBodyFieldAdded,
    ResponseFieldRemoved,
    DescriptionChanged,
}

impl ChangeCategory {
    /// The string identifier for this category, as serialized.
    pub fn id(&self) -> &'static str {
        match self {
            ChangeCategory::EndpointRemoved => "endpoint-removed",
            ChangeCategory::EndpointAdded => "endpoint-added",
            ChangeCategory::RequiredParamAdded => "required-param-added",
            ChangeCategory::OptionalParamAdded => "optional-param-added",
            ChangeCategory::ParamRemoved => "param-removed",
            ChangeCategory::ParamTypeChanged => "param-type-changed",
            ChangeCategory::RequiredBodyFieldAdded => "required-body-field-added",
            ChangeCategory::ResponseFieldRemoved => "response-field-removed",
            ChangeCategory::DescriptionChanged => "description-changed",
        }
    }

    /// Parse a category from its string ID.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::all().into_iter().find(|category| category.id() == id)
    }

    /// All categories, in emission order.
    pub fn all() -> Vec<Self> {
        vec![
            ChangeCategory::EndpointRemoved,
            ChangeCategory::EndpointAdded,
            ChangeCategory::RequiredParamAdded,
            ChangeCategory::OptionalParamAdded,
            ChangeCategory::ParamRemoved,
            ChangeCategory::ParamTypeChanged,
            ChangeCategory::RequiredBodyFieldAdded,
            ChangeCategory::ResponseFieldRemoved,
            ChangeCategory::DescriptionChanged,
        ]
    }
}

impl std::fmt::Display for ChangeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl std::str::FromStr for ChangeCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| format!("Unknown change category: {s}"))
    }
}

/// One classified difference between two canonical models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    pub category: ChangeCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Change {
    fn breaking(category: ChangeCategory, message: String, action: &Action) -> Self {
        Change {
            change_type: ChangeType::Breaking,
            category,
            message,
            method: Some(action.method.to_string()),
            path: Some(action.path.clone()),
        }
    }

    fn non_breaking(category: ChangeCategory, message: String, action: &Action) -> Self {
        Change {
            change_type: ChangeType::NonBreaking,
            category,
            message,
            method: Some(action.method.to_string()),
            path: Some(action.path.clone()),
        }
    }
}

/// Result of a diff run: the ordered change list plus classification tallies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffResult {
    pub changes: Vec<Change>,
    pub breaking_count: usize,
    pub non_breaking_count: usize,
}

impl DiffResult {
    pub fn has_breaking_changes(&self) -> bool {
        self.breaking_count > 0
    }
}

//==============================================================================
// Configuration
//==============================================================================

/// Configuration for a diff run. The default suppresses nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiffConfig {
    /// Category ids whose changes are dropped from the result.
    #[serde(default)]
    pub except_categories: Vec<String>,
    /// Shorthand for suppressing `description-changed`.
    #[serde(default)]
    pub ignore_description_changes: bool,
}

impl DiffConfig {
    /// Load configuration from a YAML file with a top-level `diff:` key.
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        #[derive(serde::Deserialize)]
        struct ConfigFile {
            diff: Option<DiffConfig>,
        }

        let config_file: ConfigFile = serde_yaml::from_str(yaml)?;
        Ok(config_file.diff.unwrap_or_default())
    }

    fn suppresses(&self, category: ChangeCategory) -> bool {
        if self.ignore_description_changes && category == ChangeCategory::DescriptionChanged {
            return true;
        }
        self.except_categories
            .iter()
            .any(|id| id == category.id())
    }
}

//==============================================================================
// Diff Engine
//==============================================================================

/// Diffs two canonical action lists with the default configuration.
pub fn diff_actions(old: &[Action], new: &[Action]) -> DiffResult {
    diff_actions_with_config(old, new, &DiffConfig::default())
}

/// Diffs two canonical action lists, then applies category suppression from
/// the configuration. Counts are tallied over the filtered list.
///
/// Keys are `"METHOD path"` pairs; when a document yields duplicate keys the
/// last-seen action is authoritative. Missing or empty collections are the
/// empty case, never an error.
pub fn diff_actions_with_config(
    old: &[Action],
    new: &[Action],
    config: &DiffConfig,
) -> DiffResult {
    let old_map = action_map(old);
    let new_map = action_map(new);
    let old_keys = ordered_keys(old);
    let new_keys = ordered_keys(new);

    let mut changes = Vec::new();

    for key in &old_keys {
        if !new_map.contains_key(key.as_str()) {
            let action = old_map[key.as_str()];
            changes.push(Change::breaking(
                ChangeCategory::EndpointRemoved,
                format!("Removed endpoint {key}"),
                action,
            ));
        }
    }

    for key in &new_keys {
        if !old_map.contains_key(key.as_str()) {
            let action = new_map[key.as_str()];
            changes.push(Change::non_breaking(
                ChangeCategory::EndpointAdded,
                format!("Added endpoint {key}"),
                action,
            ));
        }
    }

    for key in &old_keys {
        if let Some(new_action) = new_map.get(key.as_str()).copied() {
            compare_actions(old_map[key.as_str()], new_action, &mut changes);
        }
    }

    let changes: Vec<Change> = changes
        .into_iter()
        .filter(|change| !config.suppresses(change.category))
        .collect();

    let breaking_count = changes
        .iter()
        .filter(|change| change.change_type == ChangeType::Breaking)
        .count();
    let non_breaking_count = changes.len() - breaking_count;

    DiffResult {
        changes,
        breaking_count,
        non_breaking_count,
    }
}

/// Lookup map from `"METHOD path"` to action; last entry per key wins.
fn action_map(actions: &[Action]) -> HashMap<String, &Action> {
    let mut map = HashMap::with_capacity(actions.len());
    for action in actions {
        map.insert(action.key(), action);
    }
    map
}

/// Unique keys in first-seen list order.
fn ordered_keys(actions: &[Action]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(actions.len());
    let mut keys = Vec::with_capacity(actions.len());
    for action in actions {
        let key = action.key();
        if seen.insert(key.clone()) {
            keys.push(key);
        }
    }
    keys
}

/// Path and query parameters, compared as one list (path first).
fn all_params(action: &Action) -> Vec<&Field> {
    action
        .path_params
        .iter()
        .chain(action.query_params.iter())
        .collect()
}

fn compare_actions(old: &Action, new: &Action, changes: &mut Vec<Change>) {
    let key = old.key();
    let old_params = all_params(old);
    let new_params = all_params(new);

    let old_param_keys: HashSet<&str> = old_params.iter().map(|p| p.key.as_str()).collect();
    let old_required_keys: HashSet<&str> = old_params
        .iter()
        .filter(|p| p.required)
        .map(|p| p.key.as_str())
        .collect();
    let new_param_keys: HashSet<&str> = new_params.iter().map(|p| p.key.as_str()).collect();

    // A parameter that was merely optional before is deliberately classified
    // the same as a brand-new required one: membership is checked against
    // the old *required* key set only.
    for param in &new_params {
        if param.required && !old_required_keys.contains(param.key.as_str()) {
            changes.push(Change::breaking(
                ChangeCategory::RequiredParamAdded,
                format!("Required parameter \"{}\" added to {key}", param.key),
                new,
            ));
        }
    }

    for param in &new_params {
        if !param.required && !old_param_keys.contains(param.key.as_str()) {
            changes.push(Change::non_breaking(
                ChangeCategory::OptionalParamAdded,
                format!("Optional parameter \"{}\" added to {key}", param.key),
                new,
            ));
        }
    }

    for param in &old_params {
        if !new_param_keys.contains(param.key.as_str()) {
            changes.push(Change::breaking(
                ChangeCategory::ParamRemoved,
                format!("Parameter \"{}\" removed from {key}", param.key),
                new,
            ));
        }
    }

    for param in &new_params {
        if let Some(old_param) = old_params.iter().find(|p| p.key == param.key)
            && old_param.field_type != param.field_type
        {
            changes.push(Change::breaking(
                ChangeCategory::ParamTypeChanged,
                format!(
                    "Parameter \"{}\" on {key} changed type: was \"{}\", now \"{}\"",
                    param.key, old_param.field_type, param.field_type
                ),
                new,
            ));
        }
    }

    // Body and response comparison is intentionally shallow: top-level field
    // presence only, nested changes are not inspected.
    let old_body_keys: HashSet<&str> = old.request_body.iter().map(|f| f.key.as_str()).collect();
    for field in &new.request_body {
        if field.required && !old_body_keys.contains(field.key.as_str()) {
            changes.push(Change::breaking(
                ChangeCategory::RequiredBodyFieldAdded,
                format!("Required body field \"{}\" added to {key}", field.key),
                new,
            ));
        }
    }

    let new_response_keys: HashSet<&str> =
        new.response_body.iter().map(|f| f.key.as_str()).collect();
    for field in &old.response_body {
        if !new_response_keys.contains(field.key.as_str()) {
            changes.push(Change::breaking(
                ChangeCategory::ResponseFieldRemoved,
                format!("Response field \"{}\" removed from {key}", field.key),
                new,
            ));
        }
    }

    if !old.description.is_empty()
        && !new.description.is_empty()
        && old.description != new.description
    {
        changes.push(Change::non_breaking(
            ChangeCategory::DescriptionChanged,
            format!("Description changed for {key}"),
            new,
        ));
    }
}
