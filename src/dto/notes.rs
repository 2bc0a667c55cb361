use serde::Serialize;

use crate::domain::note::Note;
use crate::domain::user::User;
use crate::dto::UserSummary;

/// A note with a summary of its author, when the author still exists.
#[derive(Debug, Serialize)]
pub struct NoteView {
    #[serde(flatten)]
    pub note: Note,
    pub author: Option<UserSummary>,
}

impl NoteView {
    /// Pairs every note with its author from `users`.
    pub fn with_authors(notes: Vec<Note>, users: &[User]) -> Vec<Self> {
        notes
            .into_iter()
            .map(|note| {
                let author = users
                    .iter()
                    .find(|user| user.id == note.author_id)
                    .map(UserSummary::from);
                Self { note, author }
            })
            .collect()
    }
}
