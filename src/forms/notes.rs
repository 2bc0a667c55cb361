use serde::Deserialize;
use validator::Validate;

use crate::domain::note::{NewNote, NoteType, UpdateNote};
use crate::domain::types::{ApplicationId, CandidateId, NoteContent, Rating, UserId};
use crate::forms::{FormError, parse_optional};
use crate::repository::NoteListQuery;

/// Query string of `GET /api/notes/candidate/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct NoteListParams {
    #[serde(rename = "type")]
    pub note_type: Option<String>,
    pub application_id: Option<i32>,
}

impl NoteListParams {
    pub fn into_query(self, candidate_id: CandidateId) -> Result<NoteListQuery, FormError> {
        let mut query = NoteListQuery::new(candidate_id);
        if let Some(note_type) = parse_optional::<NoteType>(self.note_type.as_deref())? {
            query = query.note_type(note_type);
        }
        if let Some(application_id) = self.application_id {
            query = query.application(ApplicationId::new(application_id)?);
        }
        Ok(query)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateNoteForm {
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    #[serde(rename = "type", alias = "note_type")]
    pub note_type: Option<String>,
    pub candidate_id: i32,
    pub application_id: Option<i32>,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i32>,
}

impl CreateNoteForm {
    pub fn into_domain(self, author_id: UserId) -> Result<NewNote, FormError> {
        self.validate()?;
        Ok(NewNote::new(
            author_id,
            CandidateId::new(self.candidate_id)?,
            self.application_id.map(ApplicationId::new).transpose()?,
            NoteContent::new(self.content)?,
            parse_optional(self.note_type.as_deref())?,
            self.rating.map(Rating::new).transpose()?,
        ))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateNoteForm {
    pub content: Option<String>,
    #[serde(rename = "type", alias = "note_type")]
    pub note_type: Option<String>,
    pub rating: Option<i32>,
}

impl TryFrom<UpdateNoteForm> for UpdateNote {
    type Error = FormError;

    fn try_from(form: UpdateNoteForm) -> Result<Self, Self::Error> {
        Ok(UpdateNote {
            content: form.content.map(NoteContent::new).transpose()?,
            note_type: parse_optional(form.note_type.as_deref())?,
            rating: form.rating.map(Rating::new).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_form(content: &str, rating: Option<i32>) -> CreateNoteForm {
        CreateNoteForm {
            content: content.into(),
            note_type: None,
            candidate_id: 3,
            application_id: None,
            rating,
        }
    }

    #[test]
    fn markup_is_stripped_from_content() {
        let note = create_form("<script>alert(1)</script>Solid <b>Rust</b>", None)
            .into_domain(UserId::new(1).unwrap())
            .unwrap();
        assert_eq!(note.content.as_str(), "Solid <b>Rust</b>");
        assert_eq!(note.note_type, NoteType::Private);
    }

    #[test]
    fn content_that_sanitizes_to_nothing_is_rejected() {
        let result = create_form("<script>alert(1)</script>", None).into_domain(UserId::new(1).unwrap());
        assert!(result.is_err());
    }

    #[test]
    fn rating_must_be_within_range() {
        assert!(create_form("ok", Some(6)).into_domain(UserId::new(1).unwrap()).is_err());
        assert!(create_form("ok", Some(0)).into_domain(UserId::new(1).unwrap()).is_err());
        let note = create_form("ok", Some(5)).into_domain(UserId::new(1).unwrap()).unwrap();
        assert_eq!(note.rating.map(Rating::get), Some(5));
    }

    #[test]
    fn type_is_read_from_json() {
        let form: CreateNoteForm = serde_json::from_str(
            r#"{"content":"Great","type":"PUBLIC","candidate_id":2}"#,
        )
        .unwrap();
        let note = form.into_domain(UserId::new(1).unwrap()).unwrap();
        assert_eq!(note.note_type, NoteType::Public);
    }

    #[test]
    fn list_params_reject_unknown_type() {
        let params = NoteListParams {
            note_type: Some("SECRET".into()),
            application_id: None,
        };
        assert!(params.into_query(CandidateId::new(1).unwrap()).is_err());
    }
}
