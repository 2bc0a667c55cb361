//! Interview scheduling for the hiring team.

use crate::domain::auth::AuthenticatedUser;
use crate::domain::interview::{
    Interview, InterviewParticipant, InterviewResponse, NewInterview, UpdateInterview,
};
use crate::domain::notification::{NewNotification, NotificationType};
use crate::domain::types::{HubId, InterviewId, UserId};
use crate::domain::user::HIRING_TEAM_ROLES;
use crate::dto::interviews::{FormattedInterview, InterviewList, InterviewListMeta};
use crate::forms::interviews::{
    CancelInterviewForm, InterviewListParams, RespondForm, SchedulePayload, ScheduleInterviewForm,
    UpdateInterviewForm,
};
use crate::repository::{
    ApplicationReader, CandidateReader, InterviewReader, InterviewWriter, JobReader,
    NotificationWriter, UserReader,
};
use crate::services::{ServiceError, ServiceResult, ensure_role, notify};

fn load_interview<R>(repo: &R, id: i32, hub_id: HubId) -> ServiceResult<Interview>
where
    R: InterviewReader + ?Sized,
{
    repo.get_interview_by_id(InterviewId::new(id)?, hub_id)?
        .ok_or(ServiceError::NotFound)
}

fn staff_ids(participants: &[InterviewParticipant]) -> Vec<UserId> {
    let mut ids: Vec<UserId> = participants.iter().filter_map(|p| p.user_id).collect();
    ids.sort();
    ids.dedup();
    ids
}

/// Resolves candidate, job and staff for the interview view.
fn format_interview<R>(
    repo: &R,
    interview: Interview,
    hub_id: HubId,
) -> ServiceResult<FormattedInterview>
where
    R: InterviewReader + ApplicationReader + CandidateReader + JobReader + UserReader + ?Sized,
{
    let participants = repo.list_participants(interview.id)?;
    let staff = staff_ids(&participants);
    let users = if staff.is_empty() {
        Vec::new()
    } else {
        repo.get_users_by_ids(&staff, hub_id)?
    };

    let application = repo.get_application_by_id(interview.application_id, hub_id)?;
    let (candidate, job) = match &application {
        Some(application) => (
            repo.get_candidate_by_id(application.candidate_id, hub_id)?,
            repo.get_job_by_id(application.job_id, hub_id)?,
        ),
        None => (None, None),
    };

    Ok(FormattedInterview::new(
        interview,
        &participants,
        &users,
        candidate.as_ref(),
        job.as_ref(),
    ))
}

fn notify_staff<R>(
    repo: &R,
    hub_id: HubId,
    staff: &[UserId],
    notification_type: NotificationType,
    title: &str,
    message: &str,
) where
    R: NotificationWriter + ?Sized,
{
    let notifications: Vec<NewNotification> = staff
        .iter()
        .map(|user_id| {
            NewNotification::for_user(hub_id, *user_id, notification_type, title, message)
        })
        .collect();
    notify(repo, &notifications);
}

/// Interviews of the hub ordered by start time.
pub fn list_interviews<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: InterviewListParams,
) -> ServiceResult<InterviewList>
where
    R: InterviewReader + ApplicationReader + CandidateReader + JobReader + UserReader + ?Sized,
{
    ensure_role(user, HIRING_TEAM_ROLES)?;
    let hub_id = user.hub_id()?;

    let interviews = repo
        .list_interviews(params.into_query(hub_id)?)
        .map_err(|err| {
            log::error!("Failed to list interviews: {err}");
            err
        })?;

    let items = interviews
        .into_iter()
        .map(|interview| format_interview(repo, interview, hub_id))
        .collect::<ServiceResult<Vec<_>>>()?;

    Ok(InterviewList {
        meta: InterviewListMeta { total: items.len() },
        items,
    })
}

/// Schedules an interview for an application and invites the listed staff.
pub fn schedule_interview<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: ScheduleInterviewForm,
) -> ServiceResult<FormattedInterview>
where
    R: InterviewReader
        + InterviewWriter
        + ApplicationReader
        + CandidateReader
        + JobReader
        + UserReader
        + NotificationWriter
        + ?Sized,
{
    ensure_role(user, HIRING_TEAM_ROLES)?;
    let hub_id = user.hub_id()?;
    let payload = SchedulePayload::try_from(form)?;

    let application = repo
        .get_application_by_id(payload.application_id, hub_id)?
        .ok_or(ServiceError::NotFound)?;

    let staff = payload.staff();
    if !staff.is_empty() {
        let found = repo.get_users_by_ids(&staff, hub_id)?;
        if found.len() < staff.len() {
            return Err(ServiceError::NotFound);
        }
    }

    let new_interview = NewInterview::try_new(
        application.id,
        application.candidate_id,
        payload.title,
        (payload.start_time, payload.end_time),
        payload.description,
        payload.location,
        &payload.interviewers,
        &payload.observers,
    )?;

    let interview = repo.create_interview(&new_interview).map_err(|err| {
        log::error!("Failed to schedule interview: {err}");
        err
    })?;

    notify_staff(
        repo,
        hub_id,
        &staff,
        NotificationType::InterviewScheduled,
        "Interview scheduled",
        &format!(
            "{} on {}",
            interview.title,
            interview.start_time.format("%Y-%m-%d %H:%M UTC")
        ),
    );

    format_interview(repo, interview, hub_id)
}

pub fn get_interview<R>(
    repo: &R,
    user: &AuthenticatedUser,
    interview_id: i32,
) -> ServiceResult<FormattedInterview>
where
    R: InterviewReader + ApplicationReader + CandidateReader + JobReader + UserReader + ?Sized,
{
    ensure_role(user, HIRING_TEAM_ROLES)?;
    let hub_id = user.hub_id()?;
    let interview = load_interview(repo, interview_id, hub_id)?;
    format_interview(repo, interview, hub_id)
}

pub fn update_interview<R>(
    repo: &R,
    user: &AuthenticatedUser,
    interview_id: i32,
    form: UpdateInterviewForm,
) -> ServiceResult<FormattedInterview>
where
    R: InterviewReader
        + InterviewWriter
        + ApplicationReader
        + CandidateReader
        + JobReader
        + UserReader
        + ?Sized,
{
    ensure_role(user, HIRING_TEAM_ROLES)?;
    let hub_id = user.hub_id()?;
    let updates = UpdateInterview::try_from(form)?;
    let current = load_interview(repo, interview_id, hub_id)?;
    updates.validate_against(&current)?;

    let updated = repo.update_interview(current.id, &updates).map_err(|err| {
        log::error!("Failed to update interview {}: {err}", current.id);
        err
    })?;
    format_interview(repo, updated, hub_id)
}

/// Cancels an interview, keeping the reason in its description.
pub fn cancel_interview<R>(
    repo: &R,
    user: &AuthenticatedUser,
    interview_id: i32,
    form: CancelInterviewForm,
) -> ServiceResult<FormattedInterview>
where
    R: InterviewReader
        + InterviewWriter
        + ApplicationReader
        + CandidateReader
        + JobReader
        + UserReader
        + NotificationWriter
        + ?Sized,
{
    ensure_role(user, HIRING_TEAM_ROLES)?;
    let hub_id = user.hub_id()?;
    let current = load_interview(repo, interview_id, hub_id)?;

    let updates = UpdateInterview::cancel(&current, form.reason.as_deref());
    let cancelled = repo.update_interview(current.id, &updates).map_err(|err| {
        log::error!("Failed to cancel interview {}: {err}", current.id);
        err
    })?;

    let staff = staff_ids(&repo.list_participants(cancelled.id)?);
    notify_staff(
        repo,
        hub_id,
        &staff,
        NotificationType::InterviewCancelled,
        "Interview cancelled",
        &format!("{} has been cancelled", cancelled.title),
    );

    format_interview(repo, cancelled, hub_id)
}

/// Records the signed-in user's answer to an interview invitation.
pub fn respond<R>(
    repo: &R,
    user: &AuthenticatedUser,
    interview_id: i32,
    form: RespondForm,
) -> ServiceResult<InterviewParticipant>
where
    R: InterviewReader + InterviewWriter + ?Sized,
{
    let response = InterviewResponse::try_from(form)?;
    let user_id = user.user_id()?;
    let interview = load_interview(repo, interview_id, user.hub_id()?)?;

    let participant = repo
        .list_participants(interview.id)?
        .into_iter()
        .find(|p| p.user_id == Some(user_id))
        .ok_or(ServiceError::Forbidden)?;

    let updated = repo
        .update_participant_response(participant.id, response)
        .map_err(|err| {
            log::error!("Failed to record response of participant {}: {err}", participant.id);
            err
        })?;
    Ok(updated)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use chrono::{Duration, NaiveDateTime};

    use super::*;
    use crate::domain::interview::{InterviewStatus, ParticipantRole};
    use crate::domain::job::JobStatus;
    use crate::domain::types::{CandidateId, InterviewTitle, ParticipantId};
    use crate::domain::user::UserRole;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{application, auth_user, candidate, job, ts, user};

    fn interview(id: i32, description: Option<&str>) -> Interview {
        Interview {
            id: InterviewId::new(id).unwrap(),
            application_id: crate::domain::types::ApplicationId::new(5).unwrap(),
            title: InterviewTitle::new("Technical interview").unwrap(),
            description: description.map(str::to_string),
            start_time: ts() + Duration::hours(1),
            end_time: ts() + Duration::hours(2),
            location: None,
            status: InterviewStatus::Scheduled,
            created_at: ts(),
            updated_at: ts(),
        }
    }

    fn participant(id: i32, user_id: Option<i32>, role: ParticipantRole) -> InterviewParticipant {
        InterviewParticipant {
            id: ParticipantId::new(id).unwrap(),
            interview_id: InterviewId::new(1).unwrap(),
            user_id: user_id.map(|id| UserId::new(id).unwrap()),
            candidate_id: user_id
                .is_none()
                .then(|| CandidateId::new(10).unwrap()),
            role,
            response: InterviewResponse::Pending,
        }
    }

    fn expect_formatting(repo: &mut MockRepository) {
        repo.expect_list_participants().returning(|_| {
            Ok(vec![
                participant(1, None, ParticipantRole::Candidate),
                participant(2, Some(2), ParticipantRole::Interviewer),
            ])
        });
        repo.expect_get_users_by_ids()
            .returning(|_, _| Ok(vec![user(2, UserRole::HiringManager)]));
        repo.expect_get_application_by_id()
            .returning(|_, _| Ok(Some(application(5, 10, 2))));
        repo.expect_get_candidate_by_id()
            .returning(|_, _| Ok(Some(candidate(10, "jane@example.com"))));
        repo.expect_get_job_by_id()
            .returning(|_, _| Ok(Some(job(2, JobStatus::Published))));
    }

    fn schedule_form(end: &str) -> ScheduleInterviewForm {
        ScheduleInterviewForm {
            application_id: Some(5),
            title: Some("Technical interview".into()),
            start_time: Some("2024-06-03T10:00:00Z".into()),
            end_time: Some(end.into()),
            participant_ids: vec![2],
            ..ScheduleInterviewForm::default()
        }
    }

    #[test]
    fn schedule_rejects_inverted_window() {
        let mut repo = MockRepository::new();
        repo.expect_get_application_by_id()
            .returning(|_, _| Ok(Some(application(5, 10, 2))));
        repo.expect_get_users_by_ids()
            .returning(|_, _| Ok(vec![user(2, UserRole::HiringManager)]));
        repo.expect_create_interview().times(0);

        let result = schedule_interview(
            &repo,
            &auth_user(1, UserRole::HrEmployee),
            schedule_form("2024-06-03T09:00:00Z"),
        );
        assert!(matches!(result, Err(ServiceError::TypeConstraint(_))));
    }

    #[test]
    fn schedule_rejects_unknown_participant() {
        let mut repo = MockRepository::new();
        repo.expect_get_application_by_id()
            .returning(|_, _| Ok(Some(application(5, 10, 2))));
        repo.expect_get_users_by_ids().returning(|_, _| Ok(vec![]));
        repo.expect_create_interview().times(0);

        let result = schedule_interview(
            &repo,
            &auth_user(1, UserRole::HrEmployee),
            schedule_form("2024-06-03T11:00:00Z"),
        );
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn schedule_creates_participants_and_notifies_staff() {
        let mut repo = MockRepository::new();
        expect_formatting(&mut repo);
        repo.expect_create_interview()
            .withf(|new_interview| {
                new_interview.participants.len() == 2
                    && new_interview.participants[0].role == ParticipantRole::Candidate
                    && new_interview.participants[1].role == ParticipantRole::Interviewer
            })
            .times(1)
            .returning(|_| Ok(interview(1, None)));
        repo.expect_create_notifications()
            .withf(|items| {
                items.len() == 1
                    && items[0].user_id == Some(UserId::new(2).unwrap())
                    && items[0].notification_type == NotificationType::InterviewScheduled
            })
            .times(1)
            .returning(|items| Ok(items.len()));

        let formatted = schedule_interview(
            &repo,
            &auth_user(1, UserRole::HrEmployee),
            schedule_form("2024-06-03T11:00:00Z"),
        )
        .unwrap();
        assert_eq!(formatted.candidate_name, "Jane Doe");
        assert_eq!(formatted.position.as_deref(), Some("Backend Engineer"));
        assert_eq!(formatted.interviewers.len(), 1);
    }

    #[test]
    fn candidates_cannot_schedule() {
        let repo = MockRepository::new();
        let result = schedule_interview(
            &repo,
            &auth_user(3, UserRole::Candidate),
            schedule_form("2024-06-03T11:00:00Z"),
        );
        assert!(matches!(result, Err(ServiceError::Forbidden)));
    }

    #[test]
    fn update_checks_resulting_window() {
        let mut repo = MockRepository::new();
        repo.expect_get_interview_by_id()
            .returning(|_, _| Ok(Some(interview(1, None))));
        repo.expect_update_interview().times(0);

        let too_early: NaiveDateTime = ts();
        let result = update_interview(
            &repo,
            &auth_user(1, UserRole::HiringManager),
            1,
            UpdateInterviewForm {
                end_time: Some(too_early.format("%Y-%m-%dT%H:%M:%S").to_string()),
                ..UpdateInterviewForm::default()
            },
        );
        assert!(matches!(result, Err(ServiceError::TypeConstraint(_))));
    }

    #[test]
    fn cancel_appends_reason_and_notifies() {
        let mut repo = MockRepository::new();
        expect_formatting(&mut repo);
        repo.expect_get_interview_by_id()
            .returning(|_, _| Ok(Some(interview(1, Some("Bring laptop")))));
        repo.expect_update_interview()
            .withf(|_, updates| {
                updates.status == Some(InterviewStatus::Cancelled)
                    && updates.description.as_deref()
                        == Some("Bring laptop\n\nCancelled: Candidate withdrew")
            })
            .times(1)
            .returning(|_, updates| {
                let mut cancelled = interview(1, None);
                cancelled.status = InterviewStatus::Cancelled;
                cancelled.description = updates.description.clone();
                Ok(cancelled)
            });
        repo.expect_create_notifications()
            .withf(|items| {
                items.len() == 1 && items[0].notification_type == NotificationType::InterviewCancelled
            })
            .times(1)
            .returning(|items| Ok(items.len()));

        let formatted = cancel_interview(
            &repo,
            &auth_user(1, UserRole::HrEmployee),
            1,
            CancelInterviewForm {
                reason: Some("Candidate withdrew".into()),
            },
        )
        .unwrap();
        assert_eq!(formatted.status, InterviewStatus::Cancelled);
    }

    #[test]
    fn only_participants_may_respond() {
        let mut repo = MockRepository::new();
        repo.expect_get_interview_by_id()
            .returning(|_, _| Ok(Some(interview(1, None))));
        repo.expect_list_participants()
            .returning(|_| Ok(vec![participant(2, Some(2), ParticipantRole::Interviewer)]));
        repo.expect_update_participant_response().times(0);

        let result = respond(
            &repo,
            &auth_user(7, UserRole::HiringManager),
            1,
            RespondForm {
                response: "ACCEPTED".into(),
            },
        );
        assert!(matches!(result, Err(ServiceError::Forbidden)));
    }

    #[test]
    fn participant_response_is_recorded() {
        let mut repo = MockRepository::new();
        repo.expect_get_interview_by_id()
            .returning(|_, _| Ok(Some(interview(1, None))));
        repo.expect_list_participants()
            .returning(|_| Ok(vec![participant(2, Some(2), ParticipantRole::Interviewer)]));
        repo.expect_update_participant_response()
            .withf(|id, response| id.get() == 2 && *response == InterviewResponse::Declined)
            .times(1)
            .returning(|_, response| {
                let mut updated = participant(2, Some(2), ParticipantRole::Interviewer);
                updated.response = response;
                Ok(updated)
            });

        let updated = respond(
            &repo,
            &auth_user(2, UserRole::HiringManager),
            1,
            RespondForm {
                response: "DECLINED".into(),
            },
        )
        .unwrap();
        assert_eq!(updated.response, InterviewResponse::Declined);
    }
}
