//! Repository implementation for refresh tokens.

use diesel::prelude::*;

use crate::{
    domain::auth::{NewRefreshToken, RefreshToken},
    models::user::{NewRefreshToken as DbNewRefreshToken, RefreshToken as DbRefreshToken},
    repository::{
        DieselRepository, RefreshTokenReader, RefreshTokenWriter,
        errors::{RepositoryError, RepositoryResult},
    },
    schema::refresh_tokens,
};

impl RefreshTokenReader for DieselRepository {
    fn get_refresh_token(&self, token_hash: &str) -> RepositoryResult<Option<RefreshToken>> {
        let mut conn = self.conn()?;
        let db_token = refresh_tokens::table
            .filter(refresh_tokens::token_hash.eq(token_hash))
            .first::<DbRefreshToken>(&mut conn)
            .optional()?;

        db_token
            .map(RefreshToken::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }
}

impl RefreshTokenWriter for DieselRepository {
    fn create_refresh_token(&self, token: &NewRefreshToken) -> RepositoryResult<RefreshToken> {
        let mut conn = self.conn()?;
        let db_token = diesel::insert_into(refresh_tokens::table)
            .values(&DbNewRefreshToken::from(token))
            .get_result::<DbRefreshToken>(&mut conn)?;

        Ok(RefreshToken::try_from(db_token)?)
    }

    fn revoke_refresh_token(&self, token_hash: &str) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let updated = diesel::update(
            refresh_tokens::table.filter(refresh_tokens::token_hash.eq(token_hash)),
        )
        .set(refresh_tokens::revoked.eq(true))
        .execute(&mut conn)?;
        Ok(updated)
    }
}
