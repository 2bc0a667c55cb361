//! Evaluation notes written by the hiring team about candidates.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    ApplicationId, CandidateId, NoteContent, NoteId, Rating, UserId, text_enum,
};

text_enum! {
    /// Visibility of a note. Candidates only ever see public notes.
    NoteType {
        Private => "PRIVATE",
        Public => "PUBLIC",
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Note {
    pub id: NoteId,
    pub author_id: UserId,
    pub candidate_id: CandidateId,
    pub application_id: Option<ApplicationId>,
    pub content: NoteContent,
    pub note_type: NoteType,
    pub rating: Option<Rating>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewNote {
    pub author_id: UserId,
    pub candidate_id: CandidateId,
    pub application_id: Option<ApplicationId>,
    pub content: NoteContent,
    pub note_type: NoteType,
    pub rating: Option<Rating>,
}

impl NewNote {
    #[must_use]
    pub fn new(
        author_id: UserId,
        candidate_id: CandidateId,
        application_id: Option<ApplicationId>,
        content: NoteContent,
        note_type: Option<NoteType>,
        rating: Option<Rating>,
    ) -> Self {
        Self {
            author_id,
            candidate_id,
            application_id,
            content,
            note_type: note_type.unwrap_or(NoteType::Private),
            rating,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct UpdateNote {
    pub content: Option<NoteContent>,
    pub note_type: Option<NoteType>,
    pub rating: Option<Rating>,
}
