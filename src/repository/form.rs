//! Repository implementation for custom forms and their responses.

use std::collections::HashMap;

use chrono::Utc;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    domain::{
        form::{Form, FormResponse, NewForm, NewFormResponse, UpdateForm},
        types::{ApplicationId, FormId, HubId, JobId},
    },
    models::form::{
        Form as DbForm, FormResponse as DbFormResponse, NewForm as DbNewForm,
        NewFormResponse as DbNewFormResponse, UpdateForm as DbUpdateForm,
    },
    repository::{
        DieselRepository, FormListQuery, FormReader, FormWriter, Pagination,
        errors::{RepositoryError, RepositoryResult},
    },
    schema::{form_responses, forms, jobs},
};

fn filtered_forms(query: &FormListQuery) -> forms::BoxedQuery<'static, Sqlite> {
    let mut items = forms::table
        .filter(forms::hub_id.eq(query.hub_id.get()))
        .filter(forms::is_active.eq(true))
        .into_boxed();
    if let Some(job_id) = query.job_id {
        items = items.filter(forms::job_id.eq(job_id.get()));
    }
    items
}

impl FormReader for DieselRepository {
    fn get_form_by_id(&self, id: FormId, hub_id: HubId) -> RepositoryResult<Option<Form>> {
        let mut conn = self.conn()?;
        let db_form = forms::table
            .filter(forms::id.eq(id.get()))
            .filter(forms::hub_id.eq(hub_id.get()))
            .first::<DbForm>(&mut conn)
            .optional()?;

        db_form.map(Form::try_from).transpose().map_err(RepositoryError::from)
    }

    fn get_form_by_job(&self, job_id: JobId) -> RepositoryResult<Option<Form>> {
        let mut conn = self.conn()?;
        let db_form = forms::table
            .filter(forms::job_id.eq(job_id.get()))
            .first::<DbForm>(&mut conn)
            .optional()?;

        db_form.map(Form::try_from).transpose().map_err(RepositoryError::from)
    }

    fn list_forms(
        &self,
        query: FormListQuery,
    ) -> RepositoryResult<(usize, Vec<(Form, Option<String>, i64)>)> {
        let mut conn = self.conn()?;

        let total = filtered_forms(&query).count().get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered_forms(&query).order((forms::created_at.desc(), forms::id.desc()));
        if let Some(pagination) = &query.pagination {
            items = items.limit(pagination.limit()).offset(pagination.offset());
        }
        let db_forms = items.load::<DbForm>(&mut conn)?;

        let job_ids: Vec<i32> = db_forms.iter().filter_map(|f| f.job_id).collect();
        let job_titles: HashMap<i32, String> = jobs::table
            .filter(jobs::id.eq_any(job_ids))
            .select((jobs::id, jobs::title))
            .load::<(i32, String)>(&mut conn)?
            .into_iter()
            .collect();

        let form_ids: Vec<i32> = db_forms.iter().map(|f| f.id).collect();
        let response_counts: HashMap<i32, i64> = form_responses::table
            .filter(form_responses::form_id.eq_any(form_ids))
            .group_by(form_responses::form_id)
            .select((form_responses::form_id, count_star()))
            .load::<(i32, i64)>(&mut conn)?
            .into_iter()
            .collect();

        let forms = db_forms
            .into_iter()
            .map(|db_form| {
                let job_title = db_form.job_id.and_then(|id| job_titles.get(&id).cloned());
                let responses = response_counts.get(&db_form.id).copied().unwrap_or(0);
                Ok((Form::try_from(db_form)?, job_title, responses))
            })
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok((total, forms))
    }

    fn list_form_responses(
        &self,
        form_id: FormId,
        pagination: Pagination,
    ) -> RepositoryResult<(usize, Vec<FormResponse>)> {
        let mut conn = self.conn()?;

        let total = form_responses::table
            .filter(form_responses::form_id.eq(form_id.get()))
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let responses = form_responses::table
            .filter(form_responses::form_id.eq(form_id.get()))
            .order((form_responses::submitted_at.desc(), form_responses::id.desc()))
            .limit(pagination.limit())
            .offset(pagination.offset())
            .load::<DbFormResponse>(&mut conn)?
            .into_iter()
            .map(|r| FormResponse::try_from(r).map_err(RepositoryError::from))
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok((total, responses))
    }

    fn get_application_form_response(
        &self,
        application_id: ApplicationId,
    ) -> RepositoryResult<Option<FormResponse>> {
        let mut conn = self.conn()?;
        let db_response = form_responses::table
            .filter(form_responses::application_id.eq(application_id.get()))
            .order(form_responses::id.desc())
            .first::<DbFormResponse>(&mut conn)
            .optional()?;

        db_response
            .map(FormResponse::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }
}

impl FormWriter for DieselRepository {
    fn create_form(&self, form: &NewForm) -> RepositoryResult<Form> {
        let mut conn = self.conn()?;
        let db_form = diesel::insert_into(forms::table)
            .values(&DbNewForm::from(form))
            .get_result::<DbForm>(&mut conn)?;

        Ok(Form::try_from(db_form)?)
    }

    fn update_form(&self, id: FormId, updates: &UpdateForm) -> RepositoryResult<Form> {
        let mut conn = self.conn()?;
        let db_updates = DbUpdateForm::from(updates);
        let db_form = diesel::update(forms::table.find(id.get()))
            .set((&db_updates, forms::updated_at.eq(Utc::now().naive_utc())))
            .get_result::<DbForm>(&mut conn)?;

        Ok(Form::try_from(db_form)?)
    }

    fn create_form_response(&self, response: &NewFormResponse) -> RepositoryResult<FormResponse> {
        let mut conn = self.conn()?;
        let db_response = diesel::insert_into(form_responses::table)
            .values(&DbNewFormResponse::from(response))
            .get_result::<DbFormResponse>(&mut conn)?;

        Ok(FormResponse::try_from(db_response)?)
    }
}
