//! Provides the high-level Spec API for comparing API descriptions.

use crate::canonical::CanonicalApi;
use crate::diff::{DiffConfig, DiffResult, diff_actions, diff_actions_with_config};
use crate::summary::{Summary, build_summary};
use crate::{fingerprint_model, loader, normalize};
use serde_json::Value;

/// The result of a compatibility comparison between two API specifications.
#[derive(Debug, PartialEq, Eq)]
pub enum Compatibility {
    /// The two specifications are semantically identical.
    Green,
    /// The new specification differs but contains no breaking change (e.g., a
    /// new endpoint was added).
    Yellow,
    /// The new specification is not backward-compatible with the old one
    /// (e.g., an endpoint was removed or a required parameter was added).
    Red,
}

/// Represents a single API specification, holding its canonical model and
/// semantic fingerprint for comparison.
pub struct ApiSpec {
    /// The canonical model extracted from the document.
    pub model: CanonicalApi,
    /// The exact semantic fingerprint.
    pub fingerprint: String,
}

impl ApiSpec {
    /// Creates a new `ApiSpec` from document content (JSON or YAML).
    ///
    /// This parses and normalizes the content and computes the fingerprint,
    /// so it should be called once per document.
    pub fn try_from(content: &str) -> anyhow::Result<Self> {
        let document = loader::parse_content(content)?;
        Self::try_from_document(&document)
    }

    /// Creates a new `ApiSpec` from an already-deserialized document.
    pub fn try_from_document(document: &Value) -> anyhow::Result<Self> {
        let model = normalize::normalize(document)?;
        let fingerprint = fingerprint_model(&model)?;
        Ok(ApiSpec { model, fingerprint })
    }

    /// Compares this `ApiSpec` (the "old" version) with another (the "new"
    /// version) to determine their compatibility level.
    pub fn compare_with(&self, new_spec: &ApiSpec) -> Compatibility {
        // If the exact fingerprints are identical, the documents are
        // semantically identical.
        if self.fingerprint == new_spec.fingerprint {
            return Compatibility::Green;
        }

        // If the fingerprints differ, classify the differences.
        if self.diff(new_spec).has_breaking_changes() {
            Compatibility::Red
        } else {
            Compatibility::Yellow
        }
    }

    /// The full classified change list against a newer specification.
    pub fn diff(&self, new_spec: &ApiSpec) -> DiffResult {
        diff_actions(&self.model.actions, &new_spec.model.actions)
    }

    /// Same as [`ApiSpec::diff`], with category suppression applied.
    pub fn diff_with_config(&self, new_spec: &ApiSpec, config: &DiffConfig) -> DiffResult {
        diff_actions_with_config(&self.model.actions, &new_spec.model.actions, config)
    }

    /// Display-ready counts for this specification.
    pub fn summary(&self) -> Summary {
        build_summary(&self.model)
    }
}
