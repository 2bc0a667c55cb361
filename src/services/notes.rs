//! Evaluation notes written by the hiring team.

use crate::domain::auth::AuthenticatedUser;
use crate::domain::note::{Note, UpdateNote};
use crate::domain::types::{CandidateId, HubId, NoteId, UserId};
use crate::domain::user::{HIRING_TEAM_ROLES, User, UserRole};
use crate::dto::notes::NoteView;
use crate::forms::notes::{CreateNoteForm, NoteListParams, UpdateNoteForm};
use crate::repository::{ApplicationReader, CandidateReader, NoteReader, NoteWriter, UserReader};
use crate::services::{ServiceError, ServiceResult, ensure_role};

/// Loads the authors of `notes` in one query.
pub(crate) fn note_authors<R>(repo: &R, notes: &[Note], hub_id: HubId) -> ServiceResult<Vec<User>>
where
    R: UserReader + ?Sized,
{
    let mut ids: Vec<UserId> = notes.iter().map(|note| note.author_id).collect();
    ids.sort();
    ids.dedup();
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(repo.get_users_by_ids(&ids, hub_id)?)
}

/// Notes the author wrote, or any note for an admin.
fn editable_note<R>(repo: &R, user: &AuthenticatedUser, note_id: i32) -> ServiceResult<Note>
where
    R: NoteReader + ?Sized,
{
    ensure_role(user, HIRING_TEAM_ROLES)?;
    let note = repo
        .get_note_by_id(NoteId::new(note_id)?, user.hub_id()?)?
        .ok_or(ServiceError::NotFound)?;
    if note.author_id != user.user_id()? && user.role != UserRole::RecruitmentAdmin {
        return Err(ServiceError::Forbidden);
    }
    Ok(note)
}

pub fn list_candidate_notes<R>(
    repo: &R,
    user: &AuthenticatedUser,
    candidate_id: i32,
    params: NoteListParams,
) -> ServiceResult<Vec<NoteView>>
where
    R: CandidateReader + NoteReader + UserReader + ?Sized,
{
    ensure_role(user, HIRING_TEAM_ROLES)?;
    let hub_id = user.hub_id()?;
    let candidate = repo
        .get_candidate_by_id(CandidateId::new(candidate_id)?, hub_id)?
        .ok_or(ServiceError::NotFound)?;

    let notes = repo.list_notes(params.into_query(candidate.id)?).map_err(|err| {
        log::error!("Failed to list notes of candidate {}: {err}", candidate.id);
        err
    })?;
    let authors = note_authors(repo, &notes, hub_id)?;
    Ok(NoteView::with_authors(notes, &authors))
}

/// Adds a note to a candidate, optionally tied to one of their applications.
pub fn create_note<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: CreateNoteForm,
) -> ServiceResult<NoteView>
where
    R: CandidateReader + ApplicationReader + NoteWriter + UserReader + ?Sized,
{
    ensure_role(user, HIRING_TEAM_ROLES)?;
    let hub_id = user.hub_id()?;
    let new_note = form.into_domain(user.user_id()?)?;

    repo.get_candidate_by_id(new_note.candidate_id, hub_id)?
        .ok_or(ServiceError::NotFound)?;
    if let Some(application_id) = new_note.application_id {
        let application = repo
            .get_application_by_id(application_id, hub_id)?
            .ok_or(ServiceError::NotFound)?;
        if application.candidate_id != new_note.candidate_id {
            return Err(ServiceError::Validation(
                "Application does not belong to this candidate".to_string(),
            ));
        }
    }

    let note = repo.create_note(&new_note).map_err(|err| {
        log::error!("Failed to create note: {err}");
        err
    })?;
    let authors = note_authors(repo, std::slice::from_ref(&note), hub_id)?;
    NoteView::with_authors(vec![note], &authors)
        .pop()
        .ok_or(ServiceError::Internal)
}

pub fn update_note<R>(
    repo: &R,
    user: &AuthenticatedUser,
    note_id: i32,
    form: UpdateNoteForm,
) -> ServiceResult<Note>
where
    R: NoteReader + NoteWriter + ?Sized,
{
    let note = editable_note(repo, user, note_id)?;
    let updates = UpdateNote::try_from(form)?;

    let updated = repo.update_note(note.id, &updates).map_err(|err| {
        log::error!("Failed to update note {}: {err}", note.id);
        err
    })?;
    Ok(updated)
}

pub fn delete_note<R>(repo: &R, user: &AuthenticatedUser, note_id: i32) -> ServiceResult<()>
where
    R: NoteReader + NoteWriter + ?Sized,
{
    let note = editable_note(repo, user, note_id)?;

    let deleted = repo.delete_note(note.id).map_err(|err| {
        log::error!("Failed to delete note {}: {err}", note.id);
        err
    })?;
    if deleted == 0 {
        return Err(ServiceError::NotFound);
    }
    Ok(())
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::note::NoteType;
    use crate::domain::types::{ApplicationId, NoteContent};
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{application, auth_user, candidate, ts, user};

    fn note(id: i32, author: i32) -> Note {
        Note {
            id: NoteId::new(id).unwrap(),
            author_id: UserId::new(author).unwrap(),
            candidate_id: CandidateId::new(10).unwrap(),
            application_id: None,
            content: NoteContent::new("Good culture fit").unwrap(),
            note_type: NoteType::Private,
            rating: None,
            created_at: ts(),
            updated_at: ts(),
        }
    }

    fn create_form(application_id: Option<i32>) -> CreateNoteForm {
        CreateNoteForm {
            content: "Strong system design".into(),
            note_type: None,
            candidate_id: 10,
            application_id,
            rating: Some(4),
        }
    }

    #[test]
    fn candidates_cannot_read_notes() {
        let repo = MockRepository::new();
        let result = list_candidate_notes(
            &repo,
            &auth_user(3, UserRole::Candidate),
            10,
            NoteListParams::default(),
        );
        assert!(matches!(result, Err(ServiceError::Forbidden)));
    }

    #[test]
    fn notes_come_with_author_summary() {
        let mut repo = MockRepository::new();
        repo.expect_get_candidate_by_id()
            .returning(|_, _| Ok(Some(candidate(10, "jane@example.com"))));
        repo.expect_list_notes()
            .returning(|_| Ok(vec![note(1, 2), note(2, 2)]));
        repo.expect_get_users_by_ids()
            .withf(|ids, _| ids.len() == 1 && ids[0].get() == 2)
            .times(1)
            .returning(|_, _| Ok(vec![user(2, UserRole::HiringManager)]));

        let notes = list_candidate_notes(
            &repo,
            &auth_user(2, UserRole::HiringManager),
            10,
            NoteListParams::default(),
        )
        .unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].author.as_ref().unwrap().name, "Test User2");
    }

    #[test]
    fn note_application_must_belong_to_candidate() {
        let mut repo = MockRepository::new();
        repo.expect_get_candidate_by_id()
            .returning(|_, _| Ok(Some(candidate(10, "jane@example.com"))));
        repo.expect_get_application_by_id()
            .withf(|id, _| *id == ApplicationId::new(5).unwrap())
            .returning(|_, _| Ok(Some(application(5, 99, 2))));
        repo.expect_create_note().times(0);

        let result = create_note(&repo, &auth_user(2, UserRole::HrEmployee), create_form(Some(5)));
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn create_note_records_author() {
        let mut repo = MockRepository::new();
        repo.expect_get_candidate_by_id()
            .returning(|_, _| Ok(Some(candidate(10, "jane@example.com"))));
        repo.expect_create_note()
            .withf(|new_note| new_note.author_id.get() == 2 && new_note.note_type == NoteType::Private)
            .returning(|_| Ok(note(7, 2)));
        repo.expect_get_users_by_ids()
            .returning(|_, _| Ok(vec![user(2, UserRole::HrEmployee)]));

        let view = create_note(&repo, &auth_user(2, UserRole::HrEmployee), create_form(None)).unwrap();
        assert_eq!(view.note.id.get(), 7);
        assert!(view.author.is_some());
    }

    #[test]
    fn only_author_or_admin_may_edit() {
        let mut repo = MockRepository::new();
        repo.expect_get_note_by_id()
            .returning(|_, _| Ok(Some(note(1, 2))));
        repo.expect_update_note().times(0);
        let result = update_note(
            &repo,
            &auth_user(3, UserRole::HrEmployee),
            1,
            UpdateNoteForm::default(),
        );
        assert!(matches!(result, Err(ServiceError::Forbidden)));

        let mut repo = MockRepository::new();
        repo.expect_get_note_by_id()
            .returning(|_, _| Ok(Some(note(1, 2))));
        repo.expect_delete_note().times(1).returning(|_| Ok(1));
        assert!(delete_note(&repo, &auth_user(9, UserRole::RecruitmentAdmin), 1).is_ok());
    }
}
