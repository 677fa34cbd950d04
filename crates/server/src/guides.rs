//! Study-guide PDFs, one per skill category.

use std::path::{Path, PathBuf};

use skill_analyzer::SkillCategory;

use crate::error::AppError;

const GUIDE_NOT_FOUND: &str = "PDF file not found for the player's category.";

pub fn guide_file_name(category: SkillCategory) -> &'static str {
    match category {
        SkillCategory::Beginner => "Beginners Guide.pdf",
        SkillCategory::Intermediate => "INTERMEDIATE Guide.pdf",
        SkillCategory::Expert => "EXPERT Guide.pdf",
        SkillCategory::Professional => "Professional Guide.pdf",
    }
}

/// Resolve a raw `category` query value to an existing guide file.
///
/// Missing, unrecognized, or absent-on-disk all map to a client error.
pub async fn resolve_guide(guides_dir: &Path, category: Option<&str>) -> Result<PathBuf, AppError> {
    let category: SkillCategory = category
        .and_then(|c| c.parse().ok())
        .ok_or_else(|| AppError::BadRequest(GUIDE_NOT_FOUND.to_string()))?;

    let path = guides_dir.join(guide_file_name(category));
    match tokio::fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => Ok(path),
        _ => {
            tracing::warn!(path = %path.display(), %category, "Guide file missing");
            Err(AppError::BadRequest(GUIDE_NOT_FOUND.to_string()))
        }
    }
}
