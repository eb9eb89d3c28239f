use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use base64::{engine::general_purpose, Engine as _};
use std::sync::Arc;

use crate::error::Error;
use crate::models::User;

/// Identity of the authenticated caller, resolved per request from Basic
/// auth credentials. Booking creation requires this extractor; a missing or
/// invalid header surfaces as `AuthenticationRequired` (401) so the client
/// can redirect to sign-in.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub email: String,
    pub display_name: String,
    pub is_admin: bool,
}

impl FromRequestParts<Arc<crate::AppState>> for AuthUser {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<crate::AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(Error::AuthenticationRequired)?;

        let encoded = auth_header
            .strip_prefix("Basic ")
            .ok_or(Error::AuthenticationRequired)?;

        let decoded = general_purpose::STANDARD
            .decode(encoded)
            .map_err(|_| Error::AuthenticationRequired)?;

        let credentials =
            String::from_utf8(decoded).map_err(|_| Error::AuthenticationRequired)?;

        let mut parts = credentials.splitn(2, ':');
        let email = parts.next().ok_or(Error::AuthenticationRequired)?;
        let password = parts.next().ok_or(Error::AuthenticationRequired)?;

        let row: Option<User> = sqlx::query_as(
            "SELECT id, email, password_hash, display_name, is_admin, created_at
             FROM users
             WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&state.db.pool)
        .await?;

        let user = row.ok_or(Error::AuthenticationRequired)?;

        let valid = bcrypt::verify(password, &user.password_hash)
            .map_err(|_| Error::AuthenticationRequired)?;
        if !valid {
            return Err(Error::AuthenticationRequired);
        }

        Ok(AuthUser {
            user_id: user.id,
            email: user.email,
            display_name: user.display_name,
            is_admin: user.is_admin,
        })
    }
}

/// Catalog management (movies, halls, showtimes) is admin-only.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl FromRequestParts<Arc<crate::AppState>> for AdminUser {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<crate::AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin {
            return Err(Error::Forbidden);
        }
        Ok(AdminUser(user))
    }
}
