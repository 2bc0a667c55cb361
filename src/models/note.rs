//! Diesel models for notes.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::note::{
    NewNote as DomainNewNote, Note as DomainNote, NoteType, UpdateNote as DomainUpdateNote,
};
use crate::domain::types::{
    ApplicationId, CandidateId, NoteContent, NoteId, Rating, TypeConstraintError, UserId,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::notes)]
/// Diesel model for [`crate::domain::note::Note`].
pub struct Note {
    pub id: i32,
    pub author_id: i32,
    pub candidate_id: i32,
    pub application_id: Option<i32>,
    pub content: String,
    pub note_type: String,
    pub rating: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::notes)]
pub struct NewNote<'a> {
    pub author_id: i32,
    pub candidate_id: i32,
    pub application_id: Option<i32>,
    pub content: &'a str,
    pub note_type: &'static str,
    pub rating: Option<i32>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::notes)]
pub struct UpdateNote<'a> {
    pub content: Option<&'a str>,
    pub note_type: Option<&'static str>,
    pub rating: Option<i32>,
}

impl TryFrom<Note> for DomainNote {
    type Error = TypeConstraintError;

    fn try_from(note: Note) -> Result<Self, Self::Error> {
        Ok(Self {
            id: NoteId::try_from(note.id)?,
            author_id: UserId::try_from(note.author_id)?,
            candidate_id: CandidateId::try_from(note.candidate_id)?,
            application_id: note.application_id.map(ApplicationId::try_from).transpose()?,
            content: NoteContent::new(note.content)?,
            note_type: note.note_type.parse::<NoteType>()?,
            rating: note.rating.map(Rating::new).transpose()?,
            created_at: note.created_at,
            updated_at: note.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewNote> for NewNote<'a> {
    fn from(note: &'a DomainNewNote) -> Self {
        Self {
            author_id: note.author_id.get(),
            candidate_id: note.candidate_id.get(),
            application_id: note.application_id.map(ApplicationId::get),
            content: note.content.as_str(),
            note_type: note.note_type.as_str(),
            rating: note.rating.map(Rating::get),
        }
    }
}

impl<'a> From<&'a DomainUpdateNote> for UpdateNote<'a> {
    fn from(note: &'a DomainUpdateNote) -> Self {
        Self {
            content: note.content.as_ref().map(NoteContent::as_str),
            note_type: note.note_type.map(NoteType::as_str),
            rating: note.rating.map(Rating::get),
        }
    }
}
