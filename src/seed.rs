use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::{error, info};

use crate::campaign::{Campaign, CampaignCategory, CampaignId, CampaignStatus};
use crate::database::Database;
use crate::error::Error;
use crate::user::UserId;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SeedOutcome {
    AlreadySeeded,
    NoUsers,
    Inserted(usize),
    Failed,
}

/// Inserts the sample campaigns into an empty database. Does nothing when
/// any campaign already exists or when there is no user to own them.
pub async fn seed(db: &dyn Database) -> Result<SeedOutcome, Error> {
    if db.campaigns().fetch_any_campaign().await?.is_some() {
        info!("campaigns already exist, skipping seed");
        return Ok(SeedOutcome::AlreadySeeded);
    }

    let creator = match db.users().fetch_first_user().await? {
        Some(user) => user,
        None => {
            info!("no users found, skipping seed");
            return Ok(SeedOutcome::NoUsers);
        }
    };

    let now = Utc::now();
    let campaigns = sample_campaigns(creator.id, now.date_naive(), now);

    // insert failures are reported but never stop startup
    match db.campaigns().insert_campaigns(&campaigns).await {
        Ok(()) => {
            info!(count = campaigns.len(), creator = %creator.id, "seeded sample campaigns");
            Ok(SeedOutcome::Inserted(campaigns.len()))
        }
        Err(err) => {
            error!("failed to seed sample campaigns: {}", err);
            Ok(SeedOutcome::Failed)
        }
    }
}

fn sample_campaigns(created_by: UserId, today: NaiveDate, now: DateTime<Utc>) -> Vec<Campaign> {
    let campaign = |name: &str,
                    category: CampaignCategory,
                    status: CampaignStatus,
                    starts_in: i64,
                    runs_for: i64,
                    scan_count: i64,
                    image_url: Option<&str>| {
        let start_date = today + Duration::days(starts_in);
        Campaign {
            id: CampaignId::new(),
            name: name.to_string(),
            category,
            status,
            start_date,
            end_date: start_date + Duration::days(runs_for),
            created_by,
            scan_count,
            image_url: image_url.map(str::to_string),
            created_at: now,
            modified_at: now,
        }
    };

    vec![
        campaign(
            "Summer Giveaway Contest",
            CampaignCategory::Contest,
            CampaignStatus::Active,
            -14,
            30,
            128,
            Some("/images/summer-giveaway.png"),
        ),
        campaign(
            "Clean Water Donation Drive",
            CampaignCategory::Ngo,
            CampaignStatus::Active,
            -45,
            90,
            342,
            Some("/images/clean-water.png"),
        ),
        campaign(
            "Tap to Pay Launch",
            CampaignCategory::Payment,
            CampaignStatus::Active,
            -7,
            60,
            57,
            None,
        ),
        campaign(
            "Customer Feedback Survey",
            CampaignCategory::Feedback,
            CampaignStatus::Paused,
            -30,
            45,
            89,
            None,
        ),
        campaign(
            "City Marathon Check-in",
            CampaignCategory::Event,
            CampaignStatus::Completed,
            -60,
            2,
            1024,
            Some("/images/marathon.png"),
        ),
        campaign(
            "Holiday Flash Sale",
            CampaignCategory::Promotion,
            CampaignStatus::Draft,
            21,
            7,
            0,
            None,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test::{sample_user, MockDatabase};
    use std::io;
    use std::sync::{Arc, Mutex};

    /// Backs the campaign calls the seed makes with a shared vector.
    fn in_memory(db: &mut MockDatabase) -> Arc<Mutex<Vec<Campaign>>> {
        let rows = Arc::new(Mutex::new(Vec::new()));
        let read = Arc::clone(&rows);
        let write = Arc::clone(&rows);
        db.campaigns.on_fetch_any_campaign =
            Box::new(move |_| Ok(read.lock().unwrap().first().cloned()));
        db.campaigns.on_insert_campaigns = Box::new(move |campaigns| {
            write.lock().unwrap().extend(campaigns);
            Ok(())
        });
        rows
    }

    #[tokio::test]
    async fn seeds_six_campaigns_owned_by_first_user() {
        let mut db = MockDatabase::new();
        let rows = in_memory(&mut db);
        let user = sample_user();
        let user_id = user.id;
        db.users.on_fetch_first_user = Box::new(move |_| Ok(Some(user.clone())));

        let outcome = seed(&db).await.unwrap();

        assert_eq!(outcome, SeedOutcome::Inserted(6));
        let rows = rows.lock().unwrap();
        assert_eq!(rows.len(), 6);
        assert!(rows.iter().all(|c| c.created_by == user_id));
        assert!(rows.iter().all(|c| c.end_date >= c.start_date));
    }

    #[tokio::test]
    async fn seeding_twice_keeps_six_rows() {
        let mut db = MockDatabase::new();
        let rows = in_memory(&mut db);
        let user = sample_user();
        db.users.on_fetch_first_user = Box::new(move |_| Ok(Some(user.clone())));

        assert_eq!(seed(&db).await.unwrap(), SeedOutcome::Inserted(6));
        assert_eq!(seed(&db).await.unwrap(), SeedOutcome::AlreadySeeded);

        assert_eq!(rows.lock().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn does_nothing_without_users() {
        let mut db = MockDatabase::new();
        let rows = in_memory(&mut db);
        db.users.on_fetch_first_user = Box::new(|_| Ok(None));

        let outcome = seed(&db).await.unwrap();

        assert_eq!(outcome, SeedOutcome::NoUsers);
        assert!(rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn insert_failure_is_swallowed() {
        let mut db = MockDatabase::new();
        db.campaigns.on_fetch_any_campaign = Box::new(|_| Ok(None));
        db.users.on_fetch_first_user = Box::new(|_| Ok(Some(sample_user())));
        db.campaigns.on_insert_campaigns =
            Box::new(|_| Err(Error::IoError(io::Error::new(io::ErrorKind::Other, "disk full"))));

        let outcome = seed(&db).await.unwrap();

        assert_eq!(outcome, SeedOutcome::Failed);
    }

    #[test]
    fn sample_rows_cover_distinct_categories() {
        let now = Utc::now();
        let campaigns = sample_campaigns(UserId::new(), now.date_naive(), now);

        let mut categories: Vec<CampaignCategory> = campaigns.iter().map(|c| c.category).collect();
        categories.sort();
        categories.dedup();

        assert_eq!(campaigns.len(), 6);
        assert_eq!(categories.len(), 6);
    }
}
