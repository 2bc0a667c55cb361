//! Repository implementation for candidates and CVs.

use chrono::Utc;
use diesel::prelude::*;
use diesel::sql_types::Integer;
use diesel::sqlite::Sqlite;

use crate::{
    domain::{
        candidate::{Candidate, Cv, NewCandidate, NewCv, UpdateCandidate},
        types::{CandidateEmail, CandidateId, CvId, HubId},
    },
    models::candidate::{
        Candidate as DbCandidate, Cv as DbCv, NewCandidate as DbNewCandidate, NewCv as DbNewCv,
        UpdateCandidate as DbUpdateCandidate,
    },
    repository::{
        CandidateListQuery, CandidateReader, CandidateWriter, DieselRepository, LIKE_ESCAPE,
        contains_pattern,
        errors::{RepositoryError, RepositoryResult},
    },
    schema::{applications, candidates, cvs, jobs},
};

/// Candidate ids with at least one application in the hub matching the
/// status, stage and job filters.
fn matching_application_candidates(
    query: &CandidateListQuery,
) -> applications::BoxedQuery<'static, Sqlite, Integer> {
    let hub_jobs = jobs::table
        .filter(jobs::hub_id.eq(query.hub_id.get()))
        .select(jobs::id);
    let mut matching = applications::table
        .filter(applications::job_id.eq_any(hub_jobs))
        .select(applications::candidate_id)
        .into_boxed();
    if let Some(status) = query.status {
        matching = matching.filter(applications::status.eq(status.as_str()));
    }
    if let Some(stage) = query.stage {
        matching = matching.filter(applications::stage.eq(stage.as_str()));
    }
    if let Some(job_id) = query.job_id {
        matching = matching.filter(applications::job_id.eq(job_id.get()));
    }
    matching
}

fn filtered_candidates(query: &CandidateListQuery) -> candidates::BoxedQuery<'static, Sqlite> {
    let mut items = candidates::table
        .filter(candidates::hub_id.eq(query.hub_id.get()))
        .into_boxed();

    if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = contains_pattern(search);
        items = items.filter(
            candidates::first_name
                .like(pattern.clone())
                .escape(LIKE_ESCAPE)
                .or(candidates::last_name.like(pattern.clone()).escape(LIKE_ESCAPE))
                .or(candidates::email.like(pattern).escape(LIKE_ESCAPE)),
        );
    }

    if query.filters_applications() {
        items = items.filter(candidates::id.eq_any(matching_application_candidates(query)));
    }

    items
}

impl CandidateReader for DieselRepository {
    fn get_candidate_by_id(
        &self,
        id: CandidateId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<Candidate>> {
        let mut conn = self.conn()?;
        let db_candidate = candidates::table
            .filter(candidates::id.eq(id.get()))
            .filter(candidates::hub_id.eq(hub_id.get()))
            .first::<DbCandidate>(&mut conn)
            .optional()?;

        db_candidate
            .map(Candidate::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn get_candidate_by_email(
        &self,
        email: &CandidateEmail,
        hub_id: HubId,
    ) -> RepositoryResult<Option<Candidate>> {
        let mut conn = self.conn()?;
        let db_candidate = candidates::table
            .filter(candidates::email.eq(email.as_str()))
            .filter(candidates::hub_id.eq(hub_id.get()))
            .first::<DbCandidate>(&mut conn)
            .optional()?;

        db_candidate
            .map(Candidate::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_candidates(
        &self,
        query: CandidateListQuery,
    ) -> RepositoryResult<(usize, Vec<Candidate>)> {
        let mut conn = self.conn()?;

        let total = filtered_candidates(&query)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered_candidates(&query)
            .order((candidates::created_at.desc(), candidates::id.desc()));
        if let Some(pagination) = &query.pagination {
            items = items.limit(pagination.limit()).offset(pagination.offset());
        }

        let candidates = items
            .load::<DbCandidate>(&mut conn)?
            .into_iter()
            .map(|c| Candidate::try_from(c).map_err(RepositoryError::from))
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok((total, candidates))
    }

    fn count_candidates(&self, hub_id: HubId) -> RepositoryResult<i64> {
        let mut conn = self.conn()?;
        let count = candidates::table
            .filter(candidates::hub_id.eq(hub_id.get()))
            .count()
            .get_result::<i64>(&mut conn)?;
        Ok(count)
    }

    fn list_cvs(&self, candidate_id: CandidateId) -> RepositoryResult<Vec<Cv>> {
        let mut conn = self.conn()?;
        cvs::table
            .filter(cvs::candidate_id.eq(candidate_id.get()))
            .order((cvs::created_at.desc(), cvs::id.desc()))
            .load::<DbCv>(&mut conn)?
            .into_iter()
            .map(|cv| Cv::try_from(cv).map_err(RepositoryError::from))
            .collect()
    }

    fn get_cv(&self, id: CvId, hub_id: HubId) -> RepositoryResult<Option<Cv>> {
        let mut conn = self.conn()?;
        let hub_candidates = candidates::table
            .filter(candidates::hub_id.eq(hub_id.get()))
            .select(candidates::id);
        let db_cv = cvs::table
            .filter(cvs::id.eq(id.get()))
            .filter(cvs::candidate_id.eq_any(hub_candidates))
            .first::<DbCv>(&mut conn)
            .optional()?;

        db_cv.map(Cv::try_from).transpose().map_err(RepositoryError::from)
    }
}

impl CandidateWriter for DieselRepository {
    fn create_candidate(&self, candidate: &NewCandidate) -> RepositoryResult<Candidate> {
        let mut conn = self.conn()?;
        let db_candidate = diesel::insert_into(candidates::table)
            .values(&DbNewCandidate::from(candidate))
            .get_result::<DbCandidate>(&mut conn)?;

        Ok(Candidate::try_from(db_candidate)?)
    }

    fn update_candidate(
        &self,
        id: CandidateId,
        updates: &UpdateCandidate,
    ) -> RepositoryResult<Candidate> {
        let mut conn = self.conn()?;
        let db_updates = DbUpdateCandidate::from(updates);
        let db_candidate = diesel::update(candidates::table.find(id.get()))
            .set((
                &db_updates,
                candidates::updated_at.eq(Utc::now().naive_utc()),
            ))
            .get_result::<DbCandidate>(&mut conn)?;

        Ok(Candidate::try_from(db_candidate)?)
    }

    fn create_cv(&self, cv: &NewCv) -> RepositoryResult<Cv> {
        let mut conn = self.conn()?;
        let db_cv = diesel::insert_into(cvs::table)
            .values(&DbNewCv::from(cv))
            .get_result::<DbCv>(&mut conn)?;

        Ok(Cv::try_from(db_cv)?)
    }
}
