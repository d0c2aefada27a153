use chrono::{NaiveDate, Utc};

use crate::database::Database;
use crate::error::Error;
use crate::user::User;

use super::{Campaign, CampaignCategory, CampaignFilter, CampaignId, CampaignStatus};

#[derive(Clone, Debug)]
pub struct NewCampaign {
    pub name: String,
    pub category: CampaignCategory,
    pub status: Option<CampaignStatus>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub image_url: Option<String>,
}

/// Fields left as `None` keep their current value. `image_url: Some(None)`
/// removes the image.
#[derive(Clone, Debug, Default)]
pub struct CampaignUpdate {
    pub name: Option<String>,
    pub category: Option<CampaignCategory>,
    pub status: Option<CampaignStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub image_url: Option<Option<String>>,
}

fn validate_name(name: &str) -> Result<String, Error> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidCampaignName);
    }

    Ok(name.to_string())
}

fn validate_dates(start_date: NaiveDate, end_date: NaiveDate) -> Result<(), Error> {
    if end_date < start_date {
        return Err(Error::CampaignEndsBeforeStart {
            start_date,
            end_date,
        });
    }

    Ok(())
}

fn normalize_image_url(image_url: Option<String>) -> Option<String> {
    image_url
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
}

#[tracing::instrument(skip(db))]
pub async fn create_campaign(
    db: &dyn Database,
    creator: &User,
    new_campaign: NewCampaign,
) -> Result<Campaign, Error> {
    let name = validate_name(&new_campaign.name)?;
    validate_dates(new_campaign.start_date, new_campaign.end_date)?;

    let now = Utc::now();
    let campaign = Campaign {
        id: CampaignId::new(),
        name,
        category: new_campaign.category,
        status: new_campaign.status.unwrap_or_default(),
        start_date: new_campaign.start_date,
        end_date: new_campaign.end_date,
        created_by: creator.id,
        scan_count: 0,
        image_url: normalize_image_url(new_campaign.image_url),
        created_at: now,
        modified_at: now,
    };

    db.campaigns().insert_campaign(&campaign).await?;

    Ok(campaign)
}

#[tracing::instrument(skip(db))]
pub async fn get_campaigns(
    db: &dyn Database,
    filter: CampaignFilter,
) -> Result<Vec<Campaign>, Error> {
    let campaigns = db.campaigns().fetch_campaigns(filter).await?;

    Ok(campaigns)
}

#[tracing::instrument(skip(db))]
pub async fn get_campaign_by_id(
    db: &dyn Database,
    campaign_id: CampaignId,
) -> Result<Campaign, Error> {
    let campaign = db
        .campaigns()
        .fetch_campaign_by_id(campaign_id)
        .await?
        .ok_or(Error::CampaignNotFound { campaign_id })?;

    Ok(campaign)
}

#[tracing::instrument(skip(db))]
pub async fn update_campaign(
    db: &dyn Database,
    mut campaign: Campaign,
    update: CampaignUpdate,
) -> Result<Campaign, Error> {
    if campaign.status == CampaignStatus::Archived {
        return Err(Error::CampaignArchived {
            campaign_id: campaign.id,
        });
    }

    if let Some(name) = update.name {
        campaign.name = validate_name(&name)?;
    }
    if let Some(category) = update.category {
        campaign.category = category;
    }
    if let Some(status) = update.status {
        campaign.status = status;
    }
    if let Some(start_date) = update.start_date {
        campaign.start_date = start_date;
    }
    if let Some(end_date) = update.end_date {
        campaign.end_date = end_date;
    }
    if let Some(image_url) = update.image_url {
        campaign.image_url = normalize_image_url(image_url);
    }
    validate_dates(campaign.start_date, campaign.end_date)?;

    let campaign = db.campaigns().update_campaign(campaign).await?;

    Ok(campaign)
}

#[tracing::instrument(skip(db))]
pub async fn archive_campaign(db: &dyn Database, mut campaign: Campaign) -> Result<Campaign, Error> {
    if campaign.status == CampaignStatus::Archived {
        return Ok(campaign);
    }

    campaign.status = CampaignStatus::Archived;
    let campaign = db.campaigns().update_campaign(campaign).await?;

    Ok(campaign)
}

#[tracing::instrument(skip(db))]
pub async fn record_scan(db: &dyn Database, campaign_id: CampaignId) -> Result<Campaign, Error> {
    let campaign = get_campaign_by_id(db, campaign_id).await?;
    if campaign.status != CampaignStatus::Active {
        return Err(Error::CampaignNotActive {
            campaign_id,
            status: campaign.status,
        });
    }

    // the status may have changed between the two calls, so re-check
    match db.campaigns().increment_scan_count(campaign_id).await? {
        Some(campaign) => Ok(campaign),
        None => {
            let campaign = get_campaign_by_id(db, campaign_id).await?;
            Err(Error::CampaignNotActive {
                campaign_id,
                status: campaign.status,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test::{sample_campaign, sample_user, MockDatabase};
    use std::sync::{Arc, Mutex};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn new_campaign(name: &str) -> NewCampaign {
        NewCampaign {
            name: name.to_string(),
            category: CampaignCategory::Contest,
            status: None,
            start_date: date(2026, 1, 1),
            end_date: date(2026, 2, 1),
            image_url: Some("  ".to_string()),
        }
    }

    #[tokio::test]
    async fn can_create_campaign() {
        let mut db = MockDatabase::new();
        let creator = sample_user();
        let called_insert = Arc::new(Mutex::new(false));
        let called_insert_clone = Arc::clone(&called_insert);
        db.campaigns.on_insert_campaign = Box::new(move |campaign| {
            *called_insert_clone.lock().unwrap() = true;
            assert_eq!(campaign.name, "Spring Raffle".to_string());
            assert_eq!(campaign.created_at, campaign.modified_at);
            Ok(())
        });

        let campaign = create_campaign(&db, &creator, new_campaign("  Spring Raffle "))
            .await
            .unwrap();

        assert_eq!(campaign.name, "Spring Raffle".to_string());
        assert_eq!(campaign.status, CampaignStatus::Active);
        assert_eq!(campaign.created_by, creator.id);
        assert_eq!(campaign.scan_count, 0);
        assert_eq!(campaign.image_url, None);
        assert!(
            *called_insert.lock().unwrap(),
            "db.insert_campaign was not called"
        );
    }

    #[tokio::test]
    async fn create_campaign_rejects_blank_name() {
        let db = MockDatabase::new();

        let result = create_campaign(&db, &sample_user(), new_campaign("   ")).await;

        assert_eq!(result.unwrap_err(), Error::InvalidCampaignName);
    }

    #[tokio::test]
    async fn create_campaign_rejects_end_before_start() {
        let db = MockDatabase::new();
        let mut body = new_campaign("Backwards");
        body.start_date = date(2026, 3, 1);
        body.end_date = date(2026, 2, 1);

        let result = create_campaign(&db, &sample_user(), body).await;

        assert_eq!(
            result.unwrap_err(),
            Error::CampaignEndsBeforeStart {
                start_date: date(2026, 3, 1),
                end_date: date(2026, 2, 1),
            }
        );
    }

    #[tokio::test]
    async fn get_campaign_by_id_returns_error_if_doesnt_exist() {
        let mut db = MockDatabase::new();
        let test_campaign_id = CampaignId::new();
        db.campaigns.on_fetch_campaign_by_id = Box::new(move |campaign_id| {
            assert_eq!(campaign_id, test_campaign_id);
            Ok(None)
        });

        let campaign_result = get_campaign_by_id(&db, test_campaign_id).await;

        assert_eq!(
            campaign_result.unwrap_err(),
            Error::CampaignNotFound {
                campaign_id: test_campaign_id
            }
        );
    }

    #[tokio::test]
    async fn update_campaign_applies_only_given_fields() {
        let mut db = MockDatabase::new();
        db.campaigns.on_update_campaign = Box::new(|campaign| Ok(campaign));
        let campaign = sample_campaign(CampaignStatus::Active);
        let original = campaign.clone();

        let update = CampaignUpdate {
            name: Some("Renamed".to_string()),
            image_url: Some(Some("https://cdn.example.com/a.png".to_string())),
            ..CampaignUpdate::default()
        };
        let campaign = update_campaign(&db, campaign, update).await.unwrap();

        assert_eq!(campaign.name, "Renamed");
        assert_eq!(
            campaign.image_url.as_deref(),
            Some("https://cdn.example.com/a.png")
        );
        assert_eq!(campaign.category, original.category);
        assert_eq!(campaign.start_date, original.start_date);
        assert_eq!(campaign.scan_count, original.scan_count);
    }

    #[tokio::test]
    async fn update_campaign_validates_merged_dates() {
        let db = MockDatabase::new();
        let campaign = sample_campaign(CampaignStatus::Active);
        let start_date = campaign.start_date;

        let update = CampaignUpdate {
            end_date: Some(start_date.pred_opt().unwrap()),
            ..CampaignUpdate::default()
        };
        let result = update_campaign(&db, campaign, update).await;

        assert!(matches!(
            result.unwrap_err(),
            Error::CampaignEndsBeforeStart { .. }
        ));
    }

    #[tokio::test]
    async fn update_campaign_rejects_archived() {
        let db = MockDatabase::new();
        let campaign = sample_campaign(CampaignStatus::Archived);
        let campaign_id = campaign.id;

        let result = update_campaign(&db, campaign, CampaignUpdate::default()).await;

        assert_eq!(result.unwrap_err(), Error::CampaignArchived { campaign_id });
    }

    #[tokio::test]
    async fn archive_campaign_sets_archived_status() {
        let mut db = MockDatabase::new();
        db.campaigns.on_update_campaign = Box::new(|campaign| {
            assert_eq!(campaign.status, CampaignStatus::Archived);
            Ok(campaign)
        });

        let campaign = archive_campaign(&db, sample_campaign(CampaignStatus::Paused))
            .await
            .unwrap();

        assert_eq!(campaign.status, CampaignStatus::Archived);
    }

    #[tokio::test]
    async fn record_scan_increments_active_campaign() {
        let mut db = MockDatabase::new();
        let campaign = sample_campaign(CampaignStatus::Active);
        let campaign_id = campaign.id;
        let stored = campaign.clone();
        db.campaigns.on_fetch_campaign_by_id = Box::new(move |_| Ok(Some(stored.clone())));
        db.campaigns.on_increment_scan_count = Box::new(move |_| {
            let mut campaign = campaign.clone();
            campaign.scan_count += 1;
            Ok(Some(campaign))
        });

        let scanned = record_scan(&db, campaign_id).await.unwrap();

        assert_eq!(scanned.scan_count, 1);
    }

    #[tokio::test]
    async fn record_scan_reports_status_changed_before_increment() {
        let mut db = MockDatabase::new();
        let campaign = sample_campaign(CampaignStatus::Active);
        let campaign_id = campaign.id;
        let fetches = Arc::new(Mutex::new(0));
        let fetches_clone = Arc::clone(&fetches);
        db.campaigns.on_fetch_campaign_by_id = Box::new(move |_| {
            let mut fetches = fetches_clone.lock().unwrap();
            *fetches += 1;
            let mut campaign = campaign.clone();
            if *fetches > 1 {
                campaign.status = CampaignStatus::Paused;
            }
            Ok(Some(campaign))
        });
        db.campaigns.on_increment_scan_count = Box::new(|_| Ok(None));

        let result = record_scan(&db, campaign_id).await;

        assert_eq!(
            result.unwrap_err(),
            Error::CampaignNotActive {
                campaign_id,
                status: CampaignStatus::Paused,
            }
        );
        assert_eq!(*fetches.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn record_scan_rejects_paused_campaign() {
        let mut db = MockDatabase::new();
        let campaign = sample_campaign(CampaignStatus::Paused);
        let campaign_id = campaign.id;
        db.campaigns.on_fetch_campaign_by_id = Box::new(move |_| Ok(Some(campaign.clone())));

        let result = record_scan(&db, campaign_id).await;

        assert_eq!(
            result.unwrap_err(),
            Error::CampaignNotActive {
                campaign_id,
                status: CampaignStatus::Paused,
            }
        );
    }
}
