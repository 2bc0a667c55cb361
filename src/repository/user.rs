//! Repository implementation for users and their profiles.

use chrono::Utc;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    domain::{
        candidate::NewCandidate,
        types::{HubId, UserEmail, UserId},
        user::{NewProfile, NewUser, Profile, User, UserCredentials, UserRole, UserWithProfile},
    },
    models::{
        candidate::NewCandidate as DbNewCandidate,
        user::{NewProfile as DbNewProfile, NewUser as DbNewUser, Profile as DbProfile, User as DbUser},
    },
    repository::{
        DieselRepository, UserListQuery, UserReader, UserWriter,
        errors::{RepositoryError, RepositoryResult},
    },
    schema::{candidates, profiles, refresh_tokens, users},
};

fn filtered_users(query: &UserListQuery) -> users::BoxedQuery<'static, Sqlite> {
    let mut items = users::table
        .filter(users::hub_id.eq(query.hub_id.get()))
        .into_boxed();
    if let Some(role) = query.role {
        items = items.filter(users::role.eq(role.as_str()));
    }
    items
}

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: UserId, hub_id: HubId) -> RepositoryResult<Option<User>> {
        let mut conn = self.conn()?;
        let db_user = users::table
            .filter(users::id.eq(id.get()))
            .filter(users::hub_id.eq(hub_id.get()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        db_user
            .map(User::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn get_users_by_ids(&self, ids: &[UserId], hub_id: HubId) -> RepositoryResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let mut conn = self.conn()?;
        let raw_ids: Vec<i32> = ids.iter().map(|id| id.get()).collect();
        users::table
            .filter(users::id.eq_any(raw_ids))
            .filter(users::hub_id.eq(hub_id.get()))
            .load::<DbUser>(&mut conn)?
            .into_iter()
            .map(|u| User::try_from(u).map_err(RepositoryError::from))
            .collect()
    }

    fn get_credentials_by_email(
        &self,
        email: &UserEmail,
    ) -> RepositoryResult<Option<UserCredentials>> {
        let mut conn = self.conn()?;
        let db_user = users::table
            .filter(users::email.eq(email.as_str()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        db_user
            .map(UserCredentials::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn get_credentials_by_id(&self, id: UserId) -> RepositoryResult<Option<UserCredentials>> {
        let mut conn = self.conn()?;
        let db_user = users::table
            .find(id.get())
            .first::<DbUser>(&mut conn)
            .optional()?;

        db_user
            .map(UserCredentials::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn get_profile(&self, user_id: UserId) -> RepositoryResult<Option<Profile>> {
        let mut conn = self.conn()?;
        let db_profile = profiles::table
            .filter(profiles::user_id.eq(user_id.get()))
            .first::<DbProfile>(&mut conn)
            .optional()?;

        db_profile
            .map(Profile::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<UserWithProfile>)> {
        let mut conn = self.conn()?;

        let total = filtered_users(&query).count().get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered_users(&query).order((users::created_at.desc(), users::id.desc()));
        if let Some(pagination) = &query.pagination {
            items = items.limit(pagination.limit()).offset(pagination.offset());
        }
        let db_users = items.load::<DbUser>(&mut conn)?;

        let user_ids: Vec<i32> = db_users.iter().map(|u| u.id).collect();
        let mut db_profiles = profiles::table
            .filter(profiles::user_id.eq_any(user_ids))
            .load::<DbProfile>(&mut conn)?;

        let users = db_users
            .into_iter()
            .map(|db_user| {
                let profile = db_profiles
                    .iter()
                    .position(|p| p.user_id == db_user.id)
                    .map(|index| db_profiles.swap_remove(index))
                    .map(Profile::try_from)
                    .transpose()?;
                Ok(UserWithProfile {
                    user: User::try_from(db_user)?,
                    profile,
                })
            })
            .collect::<Result<Vec<_>, crate::domain::types::TypeConstraintError>>()?;

        Ok((total, users))
    }

    fn count_users_by_role(&self, hub_id: HubId) -> RepositoryResult<Vec<(UserRole, i64)>> {
        let mut conn = self.conn()?;
        users::table
            .filter(users::hub_id.eq(hub_id.get()))
            .group_by(users::role)
            .select((users::role, count_star()))
            .load::<(String, i64)>(&mut conn)?
            .into_iter()
            .map(|(role, count)| Ok((role.parse::<UserRole>()?, count)))
            .collect()
    }
}

impl UserWriter for DieselRepository {
    fn create_user(
        &self,
        new_user: &NewUser,
        profile: Option<NewProfile>,
        candidate: Option<NewCandidate>,
    ) -> RepositoryResult<User> {
        let mut conn = self.conn()?;

        conn.transaction::<User, RepositoryError, _>(|conn| {
            let db_user = diesel::insert_into(users::table)
                .values(&DbNewUser::from(new_user))
                .get_result::<DbUser>(conn)?;
            let user = User::try_from(db_user)?;

            if let Some(profile) = &profile {
                diesel::insert_into(profiles::table)
                    .values(&DbNewProfile::from_domain(user.id, profile))
                    .execute(conn)?;
            }

            if let Some(candidate) = &candidate {
                diesel::insert_into(candidates::table)
                    .values(&DbNewCandidate::from(candidate))
                    .on_conflict((candidates::hub_id, candidates::email))
                    .do_nothing()
                    .execute(conn)?;
            }

            Ok(user)
        })
    }

    fn update_user_role(
        &self,
        id: UserId,
        hub_id: HubId,
        role: UserRole,
    ) -> RepositoryResult<User> {
        let mut conn = self.conn()?;
        let db_user = diesel::update(
            users::table
                .filter(users::id.eq(id.get()))
                .filter(users::hub_id.eq(hub_id.get())),
        )
        .set((
            users::role.eq(role.as_str()),
            users::updated_at.eq(Utc::now().naive_utc()),
        ))
        .get_result::<DbUser>(&mut conn)?;

        Ok(User::try_from(db_user)?)
    }

    fn record_login(&self, id: UserId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;
        diesel::update(users::table.find(id.get()))
            .set(users::last_login_at.eq(Some(Utc::now().naive_utc())))
            .execute(&mut conn)?;
        Ok(())
    }

    fn update_password(
        &self,
        id: UserId,
        password_hash: &str,
        password_salt: &str,
    ) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            let updated = diesel::update(users::table.find(id.get()))
                .set((
                    users::password_hash.eq(password_hash),
                    users::password_salt.eq(password_salt),
                    users::updated_at.eq(Utc::now().naive_utc()),
                ))
                .execute(conn)?;
            if updated == 0 {
                return Err(RepositoryError::NotFound);
            }

            diesel::update(refresh_tokens::table.filter(refresh_tokens::user_id.eq(id.get())))
                .set(refresh_tokens::revoked.eq(true))
                .execute(conn)?;
            Ok(())
        })
    }

    fn delete_user(&self, id: UserId, hub_id: HubId) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            users::table
                .filter(users::id.eq(id.get()))
                .filter(users::hub_id.eq(hub_id.get())),
        )
        .execute(&mut conn)?;
        Ok(deleted)
    }
}
