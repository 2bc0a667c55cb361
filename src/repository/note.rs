//! Repository implementation for notes.

use chrono::Utc;
use diesel::prelude::*;

use crate::{
    domain::{
        note::{NewNote, Note, UpdateNote},
        types::{HubId, NoteId},
    },
    models::note::{NewNote as DbNewNote, Note as DbNote, UpdateNote as DbUpdateNote},
    repository::{
        DieselRepository, NoteListQuery, NoteReader, NoteWriter,
        errors::{RepositoryError, RepositoryResult},
    },
    schema::{candidates, notes},
};

impl NoteReader for DieselRepository {
    fn get_note_by_id(&self, id: NoteId, hub_id: HubId) -> RepositoryResult<Option<Note>> {
        let mut conn = self.conn()?;
        let db_note = notes::table
            .inner_join(candidates::table)
            .filter(notes::id.eq(id.get()))
            .filter(candidates::hub_id.eq(hub_id.get()))
            .select(notes::all_columns)
            .first::<DbNote>(&mut conn)
            .optional()?;

        db_note.map(Note::try_from).transpose().map_err(RepositoryError::from)
    }

    fn list_notes(&self, query: NoteListQuery) -> RepositoryResult<Vec<Note>> {
        let mut conn = self.conn()?;
        let mut items = notes::table
            .filter(notes::candidate_id.eq(query.candidate_id.get()))
            .into_boxed();
        if let Some(note_type) = query.note_type {
            items = items.filter(notes::note_type.eq(note_type.as_str()));
        }
        if let Some(application_id) = query.application_id {
            items = items.filter(notes::application_id.eq(application_id.get()));
        }

        items
            .order((notes::created_at.desc(), notes::id.desc()))
            .load::<DbNote>(&mut conn)?
            .into_iter()
            .map(|n| Note::try_from(n).map_err(RepositoryError::from))
            .collect()
    }
}

impl NoteWriter for DieselRepository {
    fn create_note(&self, note: &NewNote) -> RepositoryResult<Note> {
        let mut conn = self.conn()?;
        let db_note = diesel::insert_into(notes::table)
            .values(&DbNewNote::from(note))
            .get_result::<DbNote>(&mut conn)?;

        Ok(Note::try_from(db_note)?)
    }

    fn update_note(&self, id: NoteId, updates: &UpdateNote) -> RepositoryResult<Note> {
        let mut conn = self.conn()?;
        let db_updates = DbUpdateNote::from(updates);
        let db_note = diesel::update(notes::table.find(id.get()))
            .set((&db_updates, notes::updated_at.eq(Utc::now().naive_utc())))
            .get_result::<DbNote>(&mut conn)?;

        Ok(Note::try_from(db_note)?)
    }

    fn delete_note(&self, id: NoteId) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let deleted = diesel::delete(notes::table.find(id.get())).execute(&mut conn)?;
        Ok(deleted)
    }
}
