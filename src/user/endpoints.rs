use actix_web::web::{Data, Json, Path};
use actix_web::{get, post, HttpRequest};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::Error;
use crate::session::manager::require_user;

use super::manager::{self, NewUser};
use super::{User, UserId, UserRole};

#[derive(Clone, Deserialize)]
pub struct CreateUserBody {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
}

impl std::fmt::Debug for CreateUserBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUserBody")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserBody {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl UserBody {
    pub fn render(user: User) -> UserBody {
        UserBody {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

#[post("/api/users")]
#[tracing::instrument(skip(db, request))]
pub async fn create_user(
    db: Data<dyn Database>,
    request: HttpRequest,
    body: Json<CreateUserBody>,
) -> Result<Json<UserBody>, Error> {
    let actor = require_user(&**db, &request).await?;
    let body = body.into_inner();

    let user = manager::create_user(
        &**db,
        &actor,
        NewUser {
            name: body.name,
            email: body.email,
            password: body.password,
            role: body.role,
        },
    )
    .await?;

    Ok(Json(UserBody::render(user)))
}

#[get("/api/users")]
#[tracing::instrument(skip(db, request))]
pub async fn get_users(
    db: Data<dyn Database>,
    request: HttpRequest,
) -> Result<Json<Vec<UserBody>>, Error> {
    require_user(&**db, &request).await?;

    let users = manager::get_users(&**db).await?;

    let body = users.into_iter().map(UserBody::render).collect();

    Ok(Json(body))
}

#[get("/api/users/{user_id}")]
#[tracing::instrument(skip(db, request))]
pub async fn get_user_by_id(
    db: Data<dyn Database>,
    request: HttpRequest,
    params: Path<UserId>,
) -> Result<Json<UserBody>, Error> {
    require_user(&**db, &request).await?;
    let user_id = params.into_inner();

    let user = manager::get_user_by_id(&**db, user_id).await?;

    Ok(Json(UserBody::render(user)))
}
