pub mod canonical;
pub mod diff;
pub mod error;
pub mod extract;
pub mod loader;
pub mod normalize;
pub mod spec;
pub mod summary;
pub mod validation;

pub use canonical::{Action, AuthDescriptor, CanonicalApi, Field, FieldType, HttpMethod};
pub use error::NormalizeError;
pub use spec::{ApiSpec, Compatibility};

use anyhow::Context;
use sha2::{Digest, Sha256};

/// Generates a semantic fingerprint for a given API description document.
///
/// The fingerprint is a SHA-256 hash of the document's canonical, semantic
/// representation. This means it is insensitive to changes in comments,
/// formatting, key ordering, or the serialization (JSON vs. YAML) of the
/// source document.
///
/// # Arguments
///
/// * `content` - A string slice that holds the document content.
///
/// # Returns
///
/// A `Result` containing the hex-encoded SHA-256 fingerprint string,
/// or an error if parsing or normalization fails.
pub fn generate_fingerprint(content: &str) -> anyhow::Result<String> {
    // 1. Deserialize the content (JSON or YAML).
    let document = loader::parse_content(content)?;

    // 2. Normalize into the canonical representation.
    let model = normalize::normalize(&document)?;

    // 3. Hash the stable serialization of the model.
    fingerprint_model(&model)
}

/// Fingerprints an already-normalized canonical model.
///
/// Warnings are excluded from the hash so diagnostics never perturb the
/// semantic identity of a document.
pub fn fingerprint_model(model: &canonical::CanonicalApi) -> anyhow::Result<String> {
    let mut semantic = model.clone();
    semantic.warnings.clear();
    // Declaration order of paths is not semantically significant.
    semantic.actions.sort_by(|a, b| a.key().cmp(&b.key()));

    let json_string = serde_json::to_string_pretty(&semantic)
        .context("Failed to serialize canonical representation to JSON")?;

    let mut hasher = Sha256::new();
    hasher.update(json_string.as_bytes());
    let hash_result = hasher.finalize();

    Ok(format!("{:x}", hash_result))
}
