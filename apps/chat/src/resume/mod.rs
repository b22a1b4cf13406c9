// Resume grounding data: the document model, its loader, and the flattening
// into prompt context.

pub mod context;
pub mod models;
pub mod validation;

use std::path::Path;

use thiserror::Error;
use tracing::info;

pub use context::build_context;
pub use models::ResumeDocument;

#[derive(Debug, Error)]
pub enum ResumeError {
    #[error("failed to read resume file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("resume JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("resume failed validation: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

impl ResumeDocument {
    /// Reads, parses and validates the resume document at `path`.
    /// The resume is a build artifact, so any error here is fatal at startup.
    pub fn load(path: &Path) -> Result<Self, ResumeError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ResumeError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let resume = Self::from_json(&raw)?;
        info!(
            "Loaded resume for {} ({} roles, {} skill groups)",
            resume.personal.name,
            resume.experience.len(),
            resume.skills.len()
        );
        Ok(resume)
    }

    pub fn from_json(raw: &str) -> Result<Self, ResumeError> {
        let resume: ResumeDocument = serde_json::from_str(raw)?;
        let problems = validation::validate_resume(&resume);
        if !problems.is_empty() {
            return Err(ResumeError::Invalid(problems));
        }
        Ok(resume)
    }
}
