//! Repository implementation for interviews and participants.
//!
//! Interviews reach their hub through application and job.

use chrono::{Days, NaiveTime, Utc};
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    domain::{
        interview::{
            Interview, InterviewParticipant, InterviewResponse, NewInterview, ParticipantRole,
            UpdateInterview,
        },
        types::{ApplicationId, HubId, InterviewId, ParticipantId},
    },
    models::interview::{
        Interview as DbInterview, InterviewParticipant as DbInterviewParticipant,
        NewInterview as DbNewInterview, NewInterviewParticipant as DbNewInterviewParticipant,
        UpdateInterview as DbUpdateInterview,
    },
    repository::{
        DieselRepository, InterviewListQuery, InterviewReader, InterviewWriter,
        errors::{RepositoryError, RepositoryResult},
    },
    schema::{applications, interview_participants, interviews, jobs},
};

fn hub_interviews(hub_id: HubId) -> interviews::BoxedQuery<'static, Sqlite> {
    let hub_jobs = jobs::table
        .filter(jobs::hub_id.eq(hub_id.get()))
        .select(jobs::id);
    let hub_applications = applications::table
        .filter(applications::job_id.eq_any(hub_jobs))
        .select(applications::id);
    interviews::table
        .filter(interviews::application_id.eq_any(hub_applications))
        .into_boxed()
}

impl InterviewReader for DieselRepository {
    fn get_interview_by_id(
        &self,
        id: InterviewId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<Interview>> {
        let mut conn = self.conn()?;
        let db_interview = hub_interviews(hub_id)
            .filter(interviews::id.eq(id.get()))
            .first::<DbInterview>(&mut conn)
            .optional()?;

        db_interview
            .map(Interview::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_interviews(&self, query: InterviewListQuery) -> RepositoryResult<Vec<Interview>> {
        let mut conn = self.conn()?;
        let mut items = hub_interviews(query.hub_id);

        if let Some(date) = query.date {
            let day_start = date.and_time(NaiveTime::MIN);
            let day_end = day_start
                .checked_add_days(Days::new(1))
                .unwrap_or(day_start);
            items = items
                .filter(interviews::start_time.ge(day_start))
                .filter(interviews::start_time.lt(day_end));
        }
        if let Some(status) = query.status {
            items = items.filter(interviews::status.eq(status.as_str()));
        }
        if let Some(interviewer_id) = query.interviewer_id {
            let interviews_of_user = interview_participants::table
                .filter(interview_participants::user_id.eq(interviewer_id.get()))
                .filter(interview_participants::role.eq(ParticipantRole::Interviewer.as_str()))
                .select(interview_participants::interview_id);
            items = items.filter(interviews::id.eq_any(interviews_of_user));
        }
        if let Some(candidate_id) = query.candidate_id {
            let candidate_applications = applications::table
                .filter(applications::candidate_id.eq(candidate_id.get()))
                .select(applications::id);
            items = items.filter(interviews::application_id.eq_any(candidate_applications));
        }

        items
            .order((interviews::start_time.asc(), interviews::id.asc()))
            .load::<DbInterview>(&mut conn)?
            .into_iter()
            .map(|i| Interview::try_from(i).map_err(RepositoryError::from))
            .collect()
    }

    fn list_application_interviews(
        &self,
        application_id: ApplicationId,
    ) -> RepositoryResult<Vec<Interview>> {
        let mut conn = self.conn()?;
        interviews::table
            .filter(interviews::application_id.eq(application_id.get()))
            .order((interviews::start_time.asc(), interviews::id.asc()))
            .load::<DbInterview>(&mut conn)?
            .into_iter()
            .map(|i| Interview::try_from(i).map_err(RepositoryError::from))
            .collect()
    }

    fn list_participants(
        &self,
        interview_id: InterviewId,
    ) -> RepositoryResult<Vec<InterviewParticipant>> {
        let mut conn = self.conn()?;
        interview_participants::table
            .filter(interview_participants::interview_id.eq(interview_id.get()))
            .order(interview_participants::id.asc())
            .load::<DbInterviewParticipant>(&mut conn)?
            .into_iter()
            .map(|p| InterviewParticipant::try_from(p).map_err(RepositoryError::from))
            .collect()
    }

    fn count_interviews(&self, hub_id: HubId) -> RepositoryResult<i64> {
        let mut conn = self.conn()?;
        let count = hub_interviews(hub_id).count().get_result::<i64>(&mut conn)?;
        Ok(count)
    }
}

impl InterviewWriter for DieselRepository {
    fn create_interview(&self, interview: &NewInterview) -> RepositoryResult<Interview> {
        let mut conn = self.conn()?;

        conn.transaction::<Interview, RepositoryError, _>(|conn| {
            let db_interview = diesel::insert_into(interviews::table)
                .values(&DbNewInterview::from(interview))
                .get_result::<DbInterview>(conn)?;

            let participants = interview
                .participants
                .iter()
                .map(|p| DbNewInterviewParticipant::from_domain(db_interview.id, p))
                .collect::<Vec<_>>();
            if !participants.is_empty() {
                diesel::insert_into(interview_participants::table)
                    .values(&participants)
                    .execute(conn)?;
            }

            Ok(Interview::try_from(db_interview)?)
        })
    }

    fn update_interview(
        &self,
        id: InterviewId,
        updates: &UpdateInterview,
    ) -> RepositoryResult<Interview> {
        let mut conn = self.conn()?;
        let db_updates = DbUpdateInterview::from(updates);
        let db_interview = diesel::update(interviews::table.find(id.get()))
            .set((&db_updates, interviews::updated_at.eq(Utc::now().naive_utc())))
            .get_result::<DbInterview>(&mut conn)?;

        Ok(Interview::try_from(db_interview)?)
    }

    fn update_participant_response(
        &self,
        id: ParticipantId,
        response: InterviewResponse,
    ) -> RepositoryResult<InterviewParticipant> {
        let mut conn = self.conn()?;
        let db_participant = diesel::update(interview_participants::table.find(id.get()))
            .set(interview_participants::response.eq(response.as_str()))
            .get_result::<DbInterviewParticipant>(&mut conn)?;

        Ok(InterviewParticipant::try_from(db_participant)?)
    }
}
