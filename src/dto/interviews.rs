use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::candidate::Candidate;
use crate::domain::interview::{
    Interview, InterviewParticipant, InterviewResponse, InterviewStatus, ParticipantRole,
};
use crate::domain::job::Job;
use crate::domain::types::{ApplicationId, CandidateId, InterviewId, ParticipantId, UserId};
use crate::domain::user::User;
use crate::dto::{CandidateSummary, UserSummary};

const MISSING_CANDIDATE: &str = "N/A";
const UNKNOWN_USER: &str = "Unknown User";

/// Interview with its raw participant rows.
#[derive(Debug, Serialize)]
pub struct InterviewWithParticipants {
    #[serde(flatten)]
    pub interview: Interview,
    pub participants: Vec<InterviewParticipant>,
}

/// Staff member attending an interview.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InterviewPerson {
    pub id: Option<UserId>,
    pub name: String,
    pub email: Option<String>,
    pub role: ParticipantRole,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ParticipantView {
    pub id: ParticipantId,
    pub role: ParticipantRole,
    pub response: InterviewResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate: Option<CandidateSummary>,
}

/// Interview flattened with candidate, job and participant details.
#[derive(Debug, Serialize)]
pub struct FormattedInterview {
    pub id: InterviewId,
    pub title: String,
    pub description: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub status: InterviewStatus,
    pub location: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub application_id: ApplicationId,
    pub candidate_id: Option<CandidateId>,
    pub candidate_name: String,
    pub candidate_email: Option<String>,
    pub candidate_phone: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub job_location: Option<String>,
    pub interviewers: Vec<InterviewPerson>,
    pub observers: Vec<InterviewPerson>,
    pub participants: Vec<ParticipantView>,
}

impl FormattedInterview {
    /// Builds the view. `users` should hold every staff participant; missing
    /// ones are shown as "Unknown User".
    pub fn new(
        interview: Interview,
        participants: &[InterviewParticipant],
        users: &[User],
        candidate: Option<&Candidate>,
        job: Option<&Job>,
    ) -> Self {
        let find_user = |id: Option<UserId>| id.and_then(|id| users.iter().find(|u| u.id == id));

        let people = |role: ParticipantRole| -> Vec<InterviewPerson> {
            participants
                .iter()
                .filter(|p| p.role == role)
                .map(|p| match find_user(p.user_id) {
                    Some(user) => InterviewPerson {
                        id: Some(user.id),
                        name: user.full_name(),
                        email: Some(user.email.as_str().to_string()),
                        role,
                    },
                    None => InterviewPerson {
                        id: p.user_id,
                        name: UNKNOWN_USER.to_string(),
                        email: None,
                        role,
                    },
                })
                .collect()
        };

        let participant_views = participants
            .iter()
            .map(|p| ParticipantView {
                id: p.id,
                role: p.role,
                response: p.response,
                user: find_user(p.user_id).map(UserSummary::from),
                candidate: candidate
                    .filter(|c| p.candidate_id == Some(c.id))
                    .map(CandidateSummary::from),
            })
            .collect();

        Self {
            interviewers: people(ParticipantRole::Interviewer),
            observers: people(ParticipantRole::Observer),
            participants: participant_views,
            id: interview.id,
            title: interview.title.into_inner(),
            description: interview.description,
            start_time: interview.start_time,
            end_time: interview.end_time,
            status: interview.status,
            location: interview.location,
            created_at: interview.created_at,
            updated_at: interview.updated_at,
            application_id: interview.application_id,
            candidate_id: candidate.map(|c| c.id),
            candidate_name: candidate
                .map(Candidate::full_name)
                .unwrap_or_else(|| MISSING_CANDIDATE.to_string()),
            candidate_email: candidate.map(|c| c.email.as_str().to_string()),
            candidate_phone: candidate.and_then(|c| c.phone.as_ref().map(|p| p.as_str().to_string())),
            position: job.map(|j| j.title.as_str().to_string()),
            department: job.map(|j| j.department.as_str().to_string()),
            job_location: job.and_then(|j| j.location.clone()),
        }
    }
}

/// `GET /api/interviews` body.
#[derive(Debug, Serialize)]
pub struct InterviewList {
    pub items: Vec<FormattedInterview>,
    pub meta: InterviewListMeta,
}

#[derive(Debug, Serialize)]
pub struct InterviewListMeta {
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::domain::job::JobStatus;
    use crate::domain::types::{
        CandidateEmail, DepartmentName, HubId, InterviewTitle, JobId, JobTitle, PersonName,
        UserEmail,
    };
    use crate::domain::user::UserRole;

    fn ts(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn interview() -> Interview {
        Interview {
            id: InterviewId::new(1).unwrap(),
            application_id: ApplicationId::new(2).unwrap(),
            title: InterviewTitle::new("Tech screen").unwrap(),
            description: None,
            start_time: ts(10),
            end_time: ts(11),
            location: Some("Room 1".into()),
            status: InterviewStatus::Scheduled,
            created_at: ts(8),
            updated_at: ts(8),
        }
    }

    fn participant(id: i32, user: Option<i32>, candidate: Option<i32>, role: ParticipantRole) -> InterviewParticipant {
        InterviewParticipant {
            id: ParticipantId::new(id).unwrap(),
            interview_id: InterviewId::new(1).unwrap(),
            user_id: user.map(|u| UserId::new(u).unwrap()),
            candidate_id: candidate.map(|c| CandidateId::new(c).unwrap()),
            role,
            response: InterviewResponse::Pending,
        }
    }

    fn staff(id: i32) -> User {
        User {
            id: UserId::new(id).unwrap(),
            hub_id: HubId::new(1).unwrap(),
            email: UserEmail::new(format!("staff{id}@example.com")).unwrap(),
            role: UserRole::HiringManager,
            first_name: PersonName::new("Sam").unwrap(),
            last_name: PersonName::new("Staff").unwrap(),
            is_active: true,
            last_login_at: None,
            created_at: ts(0),
            updated_at: ts(0),
        }
    }

    fn candidate() -> Candidate {
        Candidate {
            id: CandidateId::new(3).unwrap(),
            hub_id: HubId::new(1).unwrap(),
            first_name: PersonName::new("Jane").unwrap(),
            last_name: PersonName::new("Doe").unwrap(),
            email: CandidateEmail::new("jane@example.com").unwrap(),
            phone: None,
            source: None,
            created_at: ts(0),
            updated_at: ts(0),
        }
    }

    fn job() -> Job {
        Job {
            id: JobId::new(4).unwrap(),
            hub_id: HubId::new(1).unwrap(),
            title: JobTitle::new("Engineer").unwrap(),
            description: "Code".into(),
            department: DepartmentName::new("R&D").unwrap(),
            location: Some("Berlin".into()),
            status: JobStatus::Published,
            published_at: Some(ts(0)),
            created_at: ts(0),
            updated_at: ts(0),
        }
    }

    #[test]
    fn formats_candidate_job_and_people() {
        let participants = vec![
            participant(1, None, Some(3), ParticipantRole::Candidate),
            participant(2, Some(10), None, ParticipantRole::Interviewer),
            participant(3, Some(11), None, ParticipantRole::Observer),
        ];
        let candidate = candidate();
        let job = job();

        let view = FormattedInterview::new(
            interview(),
            &participants,
            &[staff(10), staff(11)],
            Some(&candidate),
            Some(&job),
        );

        assert_eq!(view.candidate_name, "Jane Doe");
        assert_eq!(view.candidate_email.as_deref(), Some("jane@example.com"));
        assert_eq!(view.position.as_deref(), Some("Engineer"));
        assert_eq!(view.department.as_deref(), Some("R&D"));
        assert_eq!(view.job_location.as_deref(), Some("Berlin"));
        assert_eq!(view.interviewers.len(), 1);
        assert_eq!(view.interviewers[0].name, "Sam Staff");
        assert_eq!(view.observers.len(), 1);
        assert_eq!(view.participants.len(), 3);
        assert!(view.participants[0].candidate.is_some());
        assert!(view.participants[1].user.is_some());
    }

    #[test]
    fn falls_back_when_records_are_missing() {
        let participants = vec![participant(2, Some(99), None, ParticipantRole::Interviewer)];

        let view = FormattedInterview::new(interview(), &participants, &[], None, None);

        assert_eq!(view.candidate_name, "N/A");
        assert_eq!(view.candidate_id, None);
        assert_eq!(view.position, None);
        assert_eq!(view.interviewers[0].name, "Unknown User");
        assert_eq!(view.interviewers[0].id, Some(UserId::new(99).unwrap()));
        assert_eq!(view.interviewers[0].email, None);
    }
}
