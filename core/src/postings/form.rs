//! Editable posting model used by create and edit screens.

use super::types::{EmploymentType, PostingAttributes, PostingCreate, PostingStatus, PostingUpdate, Source, WorkMode};
use crate::error::ApiError;

pub const INCOMPLETE_DROPDOWNS: &str = "Please complete all required dropdown fields.";

/// Form state; enumerations stay `None` until the user picks a value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostingForm {
    pub source: Option<Source>,
    pub employment_type: Option<EmploymentType>,
    pub work_mode: Option<WorkMode>,
    pub status: Option<PostingStatus>,
    pub source_id: String,
    pub url: String,
    pub company: String,
    pub title: String,
    pub description: String,
    pub cover_letter: Option<String>,
}

impl From<&PostingAttributes> for PostingForm {
    fn from(a: &PostingAttributes) -> Self {
        Self {
            source: Some(a.source),
            employment_type: Some(a.employment_type),
            work_mode: Some(a.work_mode),
            status: Some(a.status),
            source_id: a.source_id.clone(),
            url: a.url.clone(),
            company: a.company.clone(),
            title: a.title.clone(),
            description: a.description.clone(),
            cover_letter: a.cover_letter.clone(),
        }
    }
}

impl PostingForm {
    /// Create attributes, or a validation error if any dropdown is unset.
    pub fn to_create(&self) -> Result<PostingCreate, ApiError> {
        let (Some(source), Some(employment_type), Some(work_mode), Some(status)) =
            (self.source, self.employment_type, self.work_mode, self.status)
        else {
            return Err(ApiError::Validation(INCOMPLETE_DROPDOWNS.to_string()));
        };
        Ok(PostingCreate {
            source,
            employment_type,
            work_mode,
            status,
            source_id: self.source_id.clone(),
            url: self.url.clone(),
            company: self.company.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            cover_letter: self.cover_letter.clone(),
        })
    }

    /// Full replacement of every editable attribute.
    pub fn to_update(&self) -> Result<PostingUpdate, ApiError> {
        self.to_create().map(PostingUpdate::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_form() -> PostingForm {
        PostingForm {
            source: Some(Source::LinkedIn),
            employment_type: Some(EmploymentType::FullTime),
            work_mode: Some(WorkMode::Remote),
            status: Some(PostingStatus::New),
            source_id: "li-1".to_string(),
            url: "https://example.com/job/1".to_string(),
            company: "Acme".to_string(),
            title: "Engineer".to_string(),
            description: "Build things".to_string(),
            cover_letter: None,
        }
    }

    #[test]
    fn complete_form_converts() {
        let create = complete_form().to_create().unwrap();
        assert_eq!(create.status, PostingStatus::New);
        assert_eq!(create.company, "Acme");
    }

    #[test]
    fn missing_status_fails_validation() {
        let form = PostingForm {
            status: None,
            ..complete_form()
        };
        let err = form.to_create().unwrap_err();
        assert_eq!(err, ApiError::Validation(INCOMPLETE_DROPDOWNS.to_string()));
    }

    #[test]
    fn default_form_is_incomplete() {
        assert!(PostingForm::default().to_create().is_err());
    }

    #[test]
    fn update_from_form_sets_every_field() {
        let update = complete_form().to_update().unwrap();
        assert_eq!(update.title.as_deref(), Some("Engineer"));
        assert_eq!(update.cover_letter, Some(None));
    }
}
