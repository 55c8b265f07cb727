//! Generative study assistant backed by the Gemini REST API.
//!
//! Three requests are supported: a pomodoro-style day plan, a tutoring plan
//! for a weak topic, and a free-form reading of the phone survey. Each public
//! call logs failures and falls back to an empty result.

mod gemini;

pub use gemini::GeminiClient;

use serde::{Deserialize, Serialize};

use crate::error::AiError;
use crate::storage::keyring_store;
use crate::survey::{RoadmapPhase, StudyMethod};

/// Environment variable checked before the keyring.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Keyring entry holding the API key.
pub const API_KEY_ENTRY: &str = "gemini_api_key";

/// Find the API key: environment first, then the OS keyring.
pub fn resolve_api_key() -> Result<String, AiError> {
    if let Ok(key) = std::env::var(API_KEY_ENV) {
        if !key.trim().is_empty() {
            return Ok(key);
        }
    }
    match keyring_store::get(API_KEY_ENTRY) {
        Ok(Some(key)) if !key.trim().is_empty() => Ok(key),
        Ok(_) => Err(AiError::MissingApiKey),
        Err(e) => {
            tracing::warn!(error = %e, "keyring lookup failed");
            Err(AiError::MissingApiKey)
        }
    }
}

/// A tutor's plan for fixing one weakness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemediationPlan {
    pub topic: String,
    pub explanation: String,
    #[serde(default)]
    pub steps: Vec<RemediationStep>,
    #[serde(default)]
    pub quiz_question: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemediationStep {
    pub step: u32,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UsageLevel {
    Reasonable,
    AtRisk,
    Excessive,
}

/// The model's reading of a phone-usage survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInsight {
    pub usage_level: UsageLevel,
    #[serde(default)]
    pub usage_level_label: String,
    #[serde(default)]
    pub usage_summary: String,
    #[serde(default)]
    pub advice_list: Vec<String>,
    pub study_method_recommendation: StudyMethod,
    #[serde(default)]
    pub roadmap: Vec<RoadmapPhase>,
}
