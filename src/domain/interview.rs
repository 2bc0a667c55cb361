//! Interviews scheduled for applications and the people taking part in them.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    ApplicationId, CandidateId, InterviewId, InterviewTitle, ParticipantId, TypeConstraintError,
    UserId, text_enum,
};

text_enum! {
    /// Lifecycle of an interview.
    InterviewStatus {
        Scheduled => "SCHEDULED",
        Completed => "COMPLETED",
        Cancelled => "CANCELLED",
        NoShow => "NO_SHOW",
    }
}

text_enum! {
    /// Part a participant plays in an interview.
    ParticipantRole {
        Interviewer => "INTERVIEWER",
        Candidate => "CANDIDATE",
        Observer => "OBSERVER",
    }
}

text_enum! {
    /// Participant answer to an interview invitation.
    InterviewResponse {
        Pending => "PENDING",
        Accepted => "ACCEPTED",
        Declined => "DECLINED",
        Tentative => "TENTATIVE",
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Interview {
    pub id: InterviewId,
    pub application_id: ApplicationId,
    pub title: InterviewTitle,
    pub description: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub location: Option<String>,
    pub status: InterviewStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct InterviewParticipant {
    pub id: ParticipantId,
    pub interview_id: InterviewId,
    pub user_id: Option<UserId>,
    pub candidate_id: Option<CandidateId>,
    pub role: ParticipantRole,
    pub response: InterviewResponse,
}

/// Who a participant row points at. Exactly one of user or candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Attendee {
    User(UserId),
    Candidate(CandidateId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NewParticipant {
    pub attendee: Attendee,
    pub role: ParticipantRole,
}

impl NewParticipant {
    pub fn candidate(candidate_id: CandidateId) -> Self {
        Self {
            attendee: Attendee::Candidate(candidate_id),
            role: ParticipantRole::Candidate,
        }
    }

    pub fn interviewer(user_id: UserId) -> Self {
        Self {
            attendee: Attendee::User(user_id),
            role: ParticipantRole::Interviewer,
        }
    }

    pub fn observer(user_id: UserId) -> Self {
        Self {
            attendee: Attendee::User(user_id),
            role: ParticipantRole::Observer,
        }
    }
}

#[derive(Clone, Debug)]
pub struct NewInterview {
    pub application_id: ApplicationId,
    pub title: InterviewTitle,
    pub description: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub location: Option<String>,
    pub participants: Vec<NewParticipant>,
}

impl NewInterview {
    /// Builds a scheduled interview with the candidate, interviewers and observers attached.
    ///
    /// A user listed both as interviewer and observer is kept as interviewer only.
    #[allow(clippy::too_many_arguments)]
    pub fn try_new(
        application_id: ApplicationId,
        candidate_id: CandidateId,
        title: InterviewTitle,
        (start_time, end_time): (NaiveDateTime, NaiveDateTime),
        description: Option<String>,
        location: Option<String>,
        interviewers: &[UserId],
        observers: &[UserId],
    ) -> Result<Self, TypeConstraintError> {
        ensure_time_window(start_time, end_time)?;

        let mut participants = vec![NewParticipant::candidate(candidate_id)];
        let mut seen: Vec<UserId> = Vec::new();
        for user_id in interviewers {
            if !seen.contains(user_id) {
                seen.push(*user_id);
                participants.push(NewParticipant::interviewer(*user_id));
            }
        }
        for user_id in observers {
            if !seen.contains(user_id) {
                seen.push(*user_id);
                participants.push(NewParticipant::observer(*user_id));
            }
        }

        Ok(Self {
            application_id,
            title,
            description,
            start_time,
            end_time,
            location,
            participants,
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct UpdateInterview {
    pub title: Option<InterviewTitle>,
    pub description: Option<String>,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub location: Option<String>,
    pub status: Option<InterviewStatus>,
}

impl UpdateInterview {
    /// Checks the time window that results from applying this update to `current`.
    pub fn validate_against(&self, current: &Interview) -> Result<(), TypeConstraintError> {
        let start = self.start_time.unwrap_or(current.start_time);
        let end = self.end_time.unwrap_or(current.end_time);
        ensure_time_window(start, end)
    }

    /// Update cancelling `current`, recording the reason in its description.
    pub fn cancel(current: &Interview, reason: Option<&str>) -> Self {
        Self {
            status: Some(InterviewStatus::Cancelled),
            description: Some(cancelled_description(
                current.description.as_deref(),
                reason,
            )),
            ..Self::default()
        }
    }
}

pub fn ensure_time_window(
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<(), TypeConstraintError> {
    if end <= start {
        return Err(TypeConstraintError::InvalidValue(
            "end time must be after start time".into(),
        ));
    }
    Ok(())
}

fn cancelled_description(existing: Option<&str>, reason: Option<&str>) -> String {
    let reason = reason
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or("No reason provided");
    match existing.map(str::trim_end).filter(|d| !d.is_empty()) {
        Some(description) => format!("{description}\n\nCancelled: {reason}"),
        None => format!("Cancelled: {reason}"),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use super::*;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn interview(description: Option<&str>) -> Interview {
        Interview {
            id: InterviewId::new(1).unwrap(),
            application_id: ApplicationId::new(1).unwrap(),
            title: InterviewTitle::new("Tech screen").unwrap(),
            description: description.map(str::to_string),
            start_time: at(10),
            end_time: at(11),
            location: None,
            status: InterviewStatus::Scheduled,
            created_at: at(9),
            updated_at: at(9),
        }
    }

    #[test]
    fn end_must_follow_start() {
        assert!(ensure_time_window(at(10), at(11)).is_ok());
        assert!(ensure_time_window(at(10), at(10)).is_err());
        assert!(ensure_time_window(at(11), at(10)).is_err());
    }

    #[test]
    fn participants_include_candidate_once_and_dedupe_users() {
        let u1 = UserId::new(1).unwrap();
        let u2 = UserId::new(2).unwrap();
        let new = NewInterview::try_new(
            ApplicationId::new(5).unwrap(),
            CandidateId::new(7).unwrap(),
            InterviewTitle::new("Onsite").unwrap(),
            (at(10), at(12)),
            None,
            None,
            &[u1, u1],
            &[u1, u2],
        )
        .unwrap();

        assert_eq!(
            new.participants,
            vec![
                NewParticipant::candidate(CandidateId::new(7).unwrap()),
                NewParticipant::interviewer(u1),
                NewParticipant::observer(u2),
            ]
        );
    }

    #[test]
    fn cancel_appends_reason_after_blank_line() {
        let update = UpdateInterview::cancel(&interview(Some("Bring laptop")), Some("Role filled"));
        assert_eq!(update.status, Some(InterviewStatus::Cancelled));
        assert_eq!(
            update.description.as_deref(),
            Some("Bring laptop\n\nCancelled: Role filled")
        );

        let update = UpdateInterview::cancel(&interview(None), None);
        assert_eq!(
            update.description.as_deref(),
            Some("Cancelled: No reason provided")
        );
    }

    #[test]
    fn update_checks_resulting_window() {
        let current = interview(None);
        let update = UpdateInterview {
            end_time: Some(at(9)),
            ..Default::default()
        };
        assert!(update.validate_against(&current).is_err());

        let update = UpdateInterview {
            end_time: Some(at(11) + Duration::minutes(30)),
            ..Default::default()
        };
        assert!(update.validate_against(&current).is_ok());
    }
}
