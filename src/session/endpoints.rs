use actix_web::cookie::{Cookie, SameSite};
use actix_web::web::{Data, Json};
use actix_web::{get, post, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::database::Database;
use crate::error::Error;
use crate::user::UserBody;

use super::{manager, SESSION_COOKIE};

#[derive(Clone, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginBody")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionBody {
    pub user: UserBody,
    pub expires_at: DateTime<Utc>,
}

fn session_cookie(value: String) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, value)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

#[post("/api/auth/login")]
#[tracing::instrument(skip(db, config))]
pub async fn login(
    db: Data<dyn Database>,
    config: Data<Config>,
    body: Json<LoginBody>,
) -> Result<HttpResponse, Error> {
    let body = body.into_inner();

    let (session, user) =
        manager::login(&**db, &body.email, &body.password, config.session_ttl()).await?;

    let body = SessionBody {
        user: UserBody::render(user),
        expires_at: session.expires_at,
    };

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(session.id.to_string()))
        .json(body))
}

#[post("/api/auth/logout")]
#[tracing::instrument(skip(db, request))]
pub async fn logout(db: Data<dyn Database>, request: HttpRequest) -> Result<HttpResponse, Error> {
    if let Some(token) = manager::session_token(&request) {
        manager::logout(&**db, &token).await?;
    }

    let mut removal = session_cookie(String::new());
    removal.make_removal();

    Ok(HttpResponse::NoContent().cookie(removal).finish())
}

#[get("/api/auth/me")]
#[tracing::instrument(skip(db, request))]
pub async fn get_current_user(
    db: Data<dyn Database>,
    request: HttpRequest,
) -> Result<Json<UserBody>, Error> {
    let user = manager::require_user(&**db, &request).await?;

    Ok(Json(UserBody::render(user)))
}
