use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::{self, Document};
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};

use crate::database::MongoCampaignStore;
use crate::error::Error;

use super::{Campaign, CampaignFilter, CampaignId, CampaignStatus};

#[async_trait]
pub trait CampaignStore: Send + Sync {
    async fn insert_campaign(&self, campaign: &Campaign) -> Result<(), Error>;

    async fn insert_campaigns(&self, campaigns: &[Campaign]) -> Result<(), Error>;

    async fn fetch_any_campaign(&self) -> Result<Option<Campaign>, Error>;

    async fn fetch_campaigns(&self, filter: CampaignFilter) -> Result<Vec<Campaign>, Error>;

    async fn fetch_campaign_by_id(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<Campaign>, Error>;

    async fn update_campaign(&self, campaign: Campaign) -> Result<Campaign, Error>;

    async fn increment_scan_count(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<Campaign>, Error>;
}

/// With no status given, archived campaigns are left out.
fn filter_document(filter: CampaignFilter) -> Result<Document, Error> {
    let mut query = bson::doc! {};
    match filter.status {
        Some(status) => {
            query.insert("status", bson::to_bson(&status)?);
        }
        None => {
            query.insert(
                "status",
                bson::doc! { "$ne": bson::to_bson(&CampaignStatus::Archived)? },
            );
        }
    }
    if let Some(category) = filter.category {
        query.insert("category", bson::to_bson(&category)?);
    }

    Ok(query)
}

#[async_trait]
impl CampaignStore for MongoCampaignStore {
    #[tracing::instrument(skip(self))]
    async fn insert_campaign(&self, campaign: &Campaign) -> Result<(), Error> {
        self.insert_one(campaign, None).await?;

        Ok(())
    }

    #[tracing::instrument(skip(self, campaigns), fields(count = campaigns.len()))]
    async fn insert_campaigns(&self, campaigns: &[Campaign]) -> Result<(), Error> {
        self.insert_many(campaigns, None).await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_any_campaign(&self) -> Result<Option<Campaign>, Error> {
        let campaign: Option<Campaign> = self.find_one(bson::doc! {}, None).await?;

        Ok(campaign)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaigns(&self, filter: CampaignFilter) -> Result<Vec<Campaign>, Error> {
        let query = filter_document(filter)?;

        let options = FindOptions::builder()
            .sort(bson::doc! { "created_at": -1 })
            .build();
        let campaigns: Vec<Campaign> = self.find(query, options).await?.try_collect().await?;

        Ok(campaigns)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaign_by_id(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<Campaign>, Error> {
        let campaign: Option<Campaign> =
            self.find_one(bson::doc! { "_id": campaign_id }, None).await?;

        Ok(campaign)
    }

    #[tracing::instrument(skip(self))]
    async fn update_campaign(&self, mut campaign: Campaign) -> Result<Campaign, Error> {
        let now = Utc::now();
        let old_modified_at = bson::DateTime::from_chrono(campaign.modified_at);
        let new_modified_at = bson::DateTime::from_chrono(now);

        // scan_count is owned by increment_scan_count and left untouched here
        let result = self
            .update_one(
                bson::doc! { "_id": campaign.id, "modified_at": old_modified_at },
                bson::doc! { "$set": {
                    "name": campaign.name.clone(),
                    "category": bson::to_bson(&campaign.category)?,
                    "status": bson::to_bson(&campaign.status)?,
                    "start_date": bson::to_bson(&campaign.start_date)?,
                    "end_date": bson::to_bson(&campaign.end_date)?,
                    "image_url": bson::to_bson(&campaign.image_url)?,
                    "modified_at": new_modified_at,
                } },
                None,
            )
            .await?;

        if result.matched_count == 0 {
            return Err(Error::ConcurrentModificationDetected);
        }

        campaign.modified_at = now;

        Ok(campaign)
    }

    #[tracing::instrument(skip(self))]
    async fn increment_scan_count(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<Campaign>, Error> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let campaign: Option<Campaign> = self
            .find_one_and_update(
                bson::doc! {
                    "_id": campaign_id,
                    "status": bson::to_bson(&CampaignStatus::Active)?,
                },
                bson::doc! { "$inc": { "scan_count": 1_i64 } },
                options,
            )
            .await?;

        Ok(campaign)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::CampaignCategory;

    #[test]
    fn default_filter_excludes_archived() {
        let query = filter_document(CampaignFilter::default()).unwrap();

        assert_eq!(query, bson::doc! { "status": { "$ne": "archived" } });
    }

    #[test]
    fn archived_status_is_returned_when_asked_for() {
        let filter = CampaignFilter {
            status: Some(CampaignStatus::Archived),
            category: None,
        };

        let query = filter_document(filter).unwrap();

        assert_eq!(query, bson::doc! { "status": "archived" });
    }

    #[test]
    fn category_narrows_the_query() {
        let filter = CampaignFilter {
            status: None,
            category: Some(CampaignCategory::Ngo),
        };

        let query = filter_document(filter).unwrap();

        assert_eq!(
            query,
            bson::doc! { "status": { "$ne": "archived" }, "category": "ngo" }
        );
    }
}
