//! Model descriptor

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A backend model as listed by the gateway's model directory.
///
/// Equality, hashing and ordering only look at `id`, so a `Model` fetched
/// twice from an unchanged catalog is the same map key both times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    /// Catalog-wide unique identifier, e.g. `openai/gpt-4o`
    pub id: String,
    /// Human readable name
    pub name: String,
    /// USD per prompt token
    pub pricing_prompt: f64,
    /// USD per completion token
    pub pricing_completion: f64,
    pub context_length: u64,
    /// `None` when the top provider does not publish a limit
    pub max_completion_tokens: Option<u64>,
    pub tokenizer: String,
    pub instruct_type: Option<String>,
}

impl Model {
    /// Minimal descriptor for callers that only know the identifier
    pub fn from_id(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            pricing_prompt: 0.0,
            pricing_completion: 0.0,
            context_length: 0,
            max_completion_tokens: None,
            tokenizer: String::new(),
            instruct_type: None,
        }
    }

    /// Estimated USD cost of a call with the given token counts
    pub fn estimate_cost(&self, prompt_tokens: u64, completion_tokens: u64) -> f64 {
        self.pricing_prompt * prompt_tokens as f64
            + self.pricing_completion * completion_tokens as f64
    }
}

impl PartialEq for Model {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Model {}

impl Hash for Model {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Model {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Model {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Sort by display name, then id, which is the order results are shown in
pub fn sort_by_name(models: &mut [Model]) {
    models.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
}
