use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson;
use mongodb::options::{FindOneOptions, FindOptions};

use crate::database::MongoUserStore;
use crate::error::Error;

use super::{User, UserId};

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert_user(&self, user: &User) -> Result<(), Error>;

    async fn fetch_first_user(&self) -> Result<Option<User>, Error>;

    async fn fetch_users(&self) -> Result<Vec<User>, Error>;

    async fn fetch_user_by_id(&self, user_id: UserId) -> Result<Option<User>, Error>;

    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, Error>;
}

#[async_trait]
impl UserStore for MongoUserStore {
    #[tracing::instrument(skip(self))]
    async fn insert_user(&self, user: &User) -> Result<(), Error> {
        self.insert_one(user, None).await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_first_user(&self) -> Result<Option<User>, Error> {
        let options = FindOneOptions::builder()
            .sort(bson::doc! { "created_at": 1 })
            .build();
        let user: Option<User> = self.find_one(bson::doc! {}, options).await?;

        Ok(user)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_users(&self) -> Result<Vec<User>, Error> {
        let options = FindOptions::builder()
            .sort(bson::doc! { "created_at": 1 })
            .build();
        let users: Vec<User> = self
            .find(bson::doc! {}, options)
            .await?
            .try_collect()
            .await?;

        Ok(users)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_user_by_id(&self, user_id: UserId) -> Result<Option<User>, Error> {
        let user: Option<User> = self.find_one(bson::doc! { "_id": user_id }, None).await?;

        Ok(user)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        let user: Option<User> = self.find_one(bson::doc! { "email": email }, None).await?;

        Ok(user)
    }
}
