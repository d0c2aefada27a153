use actix_web::HttpRequest;
use chrono::{Duration, Utc};
use tracing::{debug, warn};

use crate::database::Database;
use crate::error::Error;
use crate::user::manager::normalize_email;
use crate::user::password;
use crate::user::User;

use super::{Session, SessionId, SESSION_COOKIE};

#[tracing::instrument(skip(db, password))]
pub async fn login(
    db: &dyn Database,
    email: &str,
    password: &str,
    ttl: Duration,
) -> Result<(Session, User), Error> {
    let email = normalize_email(email);
    let user = match db.users().fetch_user_by_email(&email).await? {
        Some(user) => user,
        None => {
            warn!("login attempt for unknown email");
            return Err(Error::InvalidCredentials);
        }
    };

    let verified =
        password::verify_password_blocking(password.to_string(), user.password_hash.clone())
            .await?;
    if !verified {
        warn!(user_id = %user.id, "login attempt with wrong password");
        return Err(Error::InvalidCredentials);
    }

    let now = Utc::now();
    let session = Session {
        id: SessionId::new(),
        user_id: user.id,
        created_at: now,
        expires_at: now + ttl,
    };

    db.sessions().insert_session(&session).await?;

    Ok((session, user))
}

pub fn session_token(request: &HttpRequest) -> Option<String> {
    request
        .cookie(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

/// Resolves a session token to its live session and user. Anything that
/// doesn't check out yields `None`; expired sessions are removed.
#[tracing::instrument(skip_all)]
pub async fn authenticate(db: &dyn Database, token: &str) -> Result<Option<(Session, User)>, Error> {
    let session_id: SessionId = match token.parse() {
        Ok(session_id) => session_id,
        Err(err) => {
            debug!("ignoring malformed session token: {}", err);
            return Ok(None);
        }
    };

    let session = match db.sessions().fetch_session_by_id(session_id).await? {
        Some(session) => session,
        None => return Ok(None),
    };

    if session.is_expired(Utc::now()) {
        db.sessions().delete_session(session.id).await?;
        return Ok(None);
    }

    let user = match db.users().fetch_user_by_id(session.user_id).await? {
        Some(user) => user,
        None => return Ok(None),
    };

    Ok(Some((session, user)))
}

pub async fn current_user(db: &dyn Database, request: &HttpRequest) -> Result<Option<User>, Error> {
    let token = match session_token(request) {
        Some(token) => token,
        None => return Ok(None),
    };

    let user = authenticate(db, &token).await?.map(|(_, user)| user);

    Ok(user)
}

pub async fn require_user(db: &dyn Database, request: &HttpRequest) -> Result<User, Error> {
    current_user(db, request)
        .await?
        .ok_or(Error::NotAuthenticated)
}

#[tracing::instrument(skip_all)]
pub async fn logout(db: &dyn Database, token: &str) -> Result<(), Error> {
    if let Ok(session_id) = token.parse::<SessionId>() {
        db.sessions().delete_session(session_id).await?;
    }

    Ok(())
}
