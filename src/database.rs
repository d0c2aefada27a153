use mongodb::bson;
use mongodb::options::IndexOptions;
use mongodb::{Collection, IndexModel};
use tracing::info;

use crate::campaign::db::CampaignStore;
use crate::campaign::Campaign;
use crate::error::Error;
use crate::session::db::SessionStore;
use crate::session::Session;
use crate::user::db::UserStore;
use crate::user::User;

pub type MongoCampaignStore = Collection<Campaign>;
pub type MongoSessionStore = Collection<Session>;
pub type MongoUserStore = Collection<User>;

pub trait Database: Send + Sync {
    fn campaigns(&self) -> &dyn CampaignStore;

    fn sessions(&self) -> &dyn SessionStore;

    fn users(&self) -> &dyn UserStore;
}

#[derive(Debug, Clone)]
pub struct MongoDatabase {
    campaigns: Collection<Campaign>,
    sessions: Collection<Session>,
    users: Collection<User>,
}

impl MongoDatabase {
    /// Checks the connection and makes sure the indexes exist.
    #[tracing::instrument(skip(db), fields(name = db.name()))]
    pub async fn initialize(db: mongodb::Database) -> Result<MongoDatabase, Error> {
        // ping the database to ensure connection is established
        db.run_command(bson::doc! { "ping": 1 }, None).await?;

        let db = MongoDatabase::new(db);

        let email_index = IndexModel::builder()
            .keys(bson::doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        db.users.create_index(email_index, None).await?;

        let session_index = IndexModel::builder()
            .keys(bson::doc! { "user_id": 1 })
            .build();
        db.sessions.create_index(session_index, None).await?;

        info!("database ready");

        Ok(db)
    }

    pub fn new(db: mongodb::Database) -> MongoDatabase {
        MongoDatabase {
            campaigns: db.collection("campaigns"),
            sessions: db.collection("sessions"),
            users: db.collection("users"),
        }
    }
}

impl Database for MongoDatabase {
    fn campaigns(&self) -> &dyn CampaignStore {
        &self.campaigns
    }

    fn sessions(&self) -> &dyn SessionStore {
        &self.sessions
    }

    fn users(&self) -> &dyn UserStore {
        &self.users
    }
}
