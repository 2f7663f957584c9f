//! Resume customization: tailors a CV to a job through the text generator.
//!
//! Flow: validate → build prompt → generate → normalize → markup preview.
//! The generator is passed in explicitly; nothing here owns a client.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::layout::serialize_markup;
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, NO_FABRICATION_INSTRUCTION};
use crate::llm_client::TextGenerator;
use crate::models::Document;
use crate::normalizer::{normalize, Encoding, StructuralWarning};
use crate::resume::prompts::{CUSTOMIZE_PERSONA, CUSTOMIZE_PROMPT_TEMPLATE};

/// Request body for resume customization.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomizeRequest {
    pub job_role: String,
    pub job_description: String,
    pub original_cv: String,
}

impl CustomizeRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        for (field, value) in [
            ("job_role", &self.job_role),
            ("job_description", &self.job_description),
            ("original_cv", &self.original_cv),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("{field} cannot be empty")));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomizeResponse {
    pub document: Document,
    /// The document re-serialized as markup, for review before rendering.
    pub preview: String,
    pub encoding: Encoding,
    pub warnings: Vec<StructuralWarning>,
    pub file_name: String,
}

pub fn build_customize_prompt(request: &CustomizeRequest) -> String {
    CUSTOMIZE_PROMPT_TEMPLATE
        .replace("{no_fabrication}", NO_FABRICATION_INSTRUCTION)
        .replace("{job_role}", request.job_role.trim())
        .replace("{job_description}", request.job_description.trim())
        .replace("{original_cv}", request.original_cv.trim())
}

pub fn customize_system_prompt() -> String {
    format!("{CUSTOMIZE_PERSONA} {JSON_ONLY_SYSTEM}")
}

/// `Customized_Resume_<role>.pdf`, spaces in the role turned into underscores.
/// Characters that are unsafe in a download header are dropped.
pub fn download_file_name(job_role: &str) -> String {
    let role: String = job_role
        .trim()
        .chars()
        .map(|c| if c == ' ' { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        .collect();
    if role.is_empty() {
        "Customized_Resume.pdf".to_string()
    } else {
        format!("Customized_Resume_{role}.pdf")
    }
}

/// Runs one customization. Generator failures and unparseable output are
/// errors; nothing is substituted for them.
pub async fn customize(
    request: &CustomizeRequest,
    generator: &dyn TextGenerator,
) -> Result<CustomizeResponse, AppError> {
    request.validate()?;

    let prompt = build_customize_prompt(request);
    info!(job_role = %request.job_role.trim(), prompt_chars = prompt.len(), "Customizing resume");

    let raw = generator
        .generate(&prompt, &customize_system_prompt())
        .await
        .map_err(|e| AppError::Llm(format!("Customization LLM call failed: {e}")))?;

    let normalized = normalize(&raw)?;
    info!(
        encoding = ?normalized.encoding,
        warnings = normalized.warnings.len(),
        name = %normalized.document.name,
        "Generated resume normalized"
    );

    Ok(CustomizeResponse {
        preview: serialize_markup(&normalized.document),
        document: normalized.document,
        encoding: normalized.encoding,
        warnings: normalized.warnings,
        file_name: download_file_name(&request.job_role),
    })
}
