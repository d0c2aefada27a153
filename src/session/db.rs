use async_trait::async_trait;
use mongodb::bson;

use crate::database::MongoSessionStore;
use crate::error::Error;

use super::{Session, SessionId};

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert_session(&self, session: &Session) -> Result<(), Error>;

    async fn fetch_session_by_id(&self, session_id: SessionId)
        -> Result<Option<Session>, Error>;

    async fn delete_session(&self, session_id: SessionId) -> Result<(), Error>;
}

#[async_trait]
impl SessionStore for MongoSessionStore {
    #[tracing::instrument(skip(self, session), fields(user_id = %session.user_id))]
    async fn insert_session(&self, session: &Session) -> Result<(), Error> {
        self.insert_one(session, None).await?;

        Ok(())
    }

    // session ids are credentials, keep them out of the spans
    #[tracing::instrument(skip_all)]
    async fn fetch_session_by_id(
        &self,
        session_id: SessionId,
    ) -> Result<Option<Session>, Error> {
        let session: Option<Session> = self
            .find_one(bson::doc! { "_id": session_id }, None)
            .await?;

        Ok(session)
    }

    #[tracing::instrument(skip_all)]
    async fn delete_session(&self, session_id: SessionId) -> Result<(), Error> {
        self.delete_one(bson::doc! { "_id": session_id }, None).await?;

        Ok(())
    }
}
