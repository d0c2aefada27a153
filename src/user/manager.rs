use chrono::Utc;
use tracing::info;

use crate::config::Config;
use crate::database::Database;
use crate::error::Error;

use super::password::{self, MIN_PASSWORD_LENGTH};
use super::{User, UserId, UserRole};

#[derive(Clone, Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validates and stores a user without checking who is asking.
#[tracing::instrument(skip(db, new_user), fields(email = %new_user.email))]
async fn insert_new_user(db: &dyn Database, new_user: NewUser) -> Result<User, Error> {
    let name = new_user.name.trim().to_string();
    if name.is_empty() {
        return Err(Error::InvalidUserName);
    }

    let email = normalize_email(&new_user.email);
    if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
        return Err(Error::InvalidEmail { email });
    }

    if new_user.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(Error::PasswordTooShort {
            min_length: MIN_PASSWORD_LENGTH,
        });
    }

    if db.users().fetch_user_by_email(&email).await?.is_some() {
        return Err(Error::EmailAlreadyInUse { email });
    }

    let now = Utc::now();
    let user = User {
        id: UserId::new(),
        name,
        email,
        password_hash: password::hash_password_blocking(new_user.password).await?,
        role: new_user.role,
        created_at: now,
        modified_at: now,
    };

    db.users().insert_user(&user).await?;

    Ok(user)
}

#[tracing::instrument(skip(db, new_user), fields(email = %new_user.email))]
pub async fn create_user(db: &dyn Database, actor: &User, new_user: NewUser) -> Result<User, Error> {
    if !actor.is_admin() {
        return Err(Error::NotPermitted { user_id: actor.id });
    }

    insert_new_user(db, new_user).await
}

#[tracing::instrument(skip(db))]
pub async fn get_users(db: &dyn Database) -> Result<Vec<User>, Error> {
    let users = db.users().fetch_users().await?;

    Ok(users)
}

#[tracing::instrument(skip(db))]
pub async fn get_user_by_id(db: &dyn Database, user_id: UserId) -> Result<User, Error> {
    let user = db
        .users()
        .fetch_user_by_id(user_id)
        .await?
        .ok_or(Error::UserNotFound { user_id })?;

    Ok(user)
}

/// Creates the configured initial administrator when nobody can sign in yet.
#[tracing::instrument(skip(db, config))]
pub async fn ensure_admin(db: &dyn Database, config: &Config) -> Result<Option<User>, Error> {
    let (email, password) = match (&config.admin_email, &config.admin_password) {
        (Some(email), Some(password)) => (email.clone(), password.clone()),
        _ => return Ok(None),
    };

    if db.users().fetch_first_user().await?.is_some() {
        return Ok(None);
    }

    let admin = insert_new_user(
        db,
        NewUser {
            name: config.admin_name.clone(),
            email,
            password,
            role: UserRole::Admin,
        },
    )
    .await?;

    info!(user_id = %admin.id, "created initial administrator");

    Ok(Some(admin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test::{sample_user, MockDatabase};
    use std::sync::{Arc, Mutex};

    fn new_user(email: &str, password: &str) -> NewUser {
        NewUser {
            name: "Grace".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: UserRole::Editor,
        }
    }

    #[tokio::test]
    async fn admin_can_create_user() {
        let mut db = MockDatabase::new();
        let called_insert = Arc::new(Mutex::new(false));
        let called_insert_clone = Arc::clone(&called_insert);
        db.users.on_fetch_user_by_email = Box::new(|email| {
            assert_eq!(email, "grace@example.com");
            Ok(None)
        });
        db.users.on_insert_user = Box::new(move |user| {
            *called_insert_clone.lock().unwrap() = true;
            assert!(password::verify_password("hunter2hunter2", &user.password_hash));
            Ok(())
        });

        let user = create_user(
            &db,
            &sample_user(),
            new_user(" Grace@Example.com ", "hunter2hunter2"),
        )
        .await
        .unwrap();

        assert_eq!(user.email, "grace@example.com");
        assert_eq!(user.role, UserRole::Editor);
        assert!(
            *called_insert.lock().unwrap(),
            "db.insert_user was not called"
        );
    }

    #[tokio::test]
    async fn editor_cannot_create_user() {
        let db = MockDatabase::new();
        let mut editor = sample_user();
        editor.role = UserRole::Editor;

        let body = new_user("grace@example.com", "hunter2hunter2");

        let result = create_user(&db, &editor, body).await;

        assert_eq!(result.unwrap_err(), Error::NotPermitted { user_id: editor.id });
    }

    #[tokio::test]
    async fn create_user_validates_email_and_password() {
        let db = MockDatabase::new();
        let admin = sample_user();

        let result = create_user(&db, &admin, new_user("grace", "hunter2hunter2")).await;
        assert_eq!(
            result.unwrap_err(),
            Error::InvalidEmail {
                email: "grace".to_string()
            }
        );

        let result = create_user(&db, &admin, new_user("grace@example.com", "short")).await;
        assert_eq!(
            result.unwrap_err(),
            Error::PasswordTooShort {
                min_length: MIN_PASSWORD_LENGTH
            }
        );
    }

    #[tokio::test]
    async fn create_user_rejects_duplicate_email() {
        let mut db = MockDatabase::new();
        db.users.on_fetch_user_by_email = Box::new(|_| Ok(Some(sample_user())));

        let result = create_user(
            &db,
            &sample_user(),
            new_user("ada@example.com", "hunter2hunter2"),
        )
        .await;

        assert_eq!(
            result.unwrap_err(),
            Error::EmailAlreadyInUse {
                email: "ada@example.com".to_string()
            }
        );
    }

    #[tokio::test]
    async fn ensure_admin_skips_when_users_exist() {
        let mut db = MockDatabase::new();
        db.users.on_fetch_first_user = Box::new(|_| Ok(Some(sample_user())));
        let config = Config {
            admin_email: Some("root@example.com".to_string()),
            admin_password: Some("rootroot".to_string()),
            ..Config::from_lookup(|_| None).unwrap()
        };

        let created = ensure_admin(&db, &config).await.unwrap();

        assert!(created.is_none());
    }

    #[tokio::test]
    async fn ensure_admin_creates_first_admin() {
        let mut db = MockDatabase::new();
        db.users.on_fetch_first_user = Box::new(|_| Ok(None));
        db.users.on_fetch_user_by_email = Box::new(|_| Ok(None));
        db.users.on_insert_user = Box::new(|_| Ok(()));
        let config = Config {
            admin_email: Some("root@example.com".to_string()),
            admin_password: Some("rootroot".to_string()),
            ..Config::from_lookup(|_| None).unwrap()
        };

        let created = ensure_admin(&db, &config).await.unwrap().unwrap();

        assert_eq!(created.role, UserRole::Admin);
        assert_eq!(created.name, "Administrator");
    }

    #[tokio::test]
    async fn ensure_admin_does_nothing_without_credentials() {
        let db = MockDatabase::new();
        let config = Config::from_lookup(|_| None).unwrap();

        assert!(ensure_admin(&db, &config).await.unwrap().is_none());
    }
}
