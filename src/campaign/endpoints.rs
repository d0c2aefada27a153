use actix_web::web::{Data, Json, Path, Query};
use actix_web::{delete, get, post, put, HttpRequest};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::database::Database;
use crate::error::Error;
use crate::session::manager::require_user;
use crate::user::UserId;

use super::manager::{self, CampaignUpdate, NewCampaign};
use super::{Campaign, CampaignCategory, CampaignFilter, CampaignId, CampaignStatus};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateCampaignBody {
    pub name: String,
    pub category: CampaignCategory,
    #[serde(default)]
    pub status: Option<CampaignStatus>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateCampaignBody {
    pub name: Option<String>,
    pub category: Option<CampaignCategory>,
    pub status: Option<CampaignStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    // absent keeps the image, null removes it
    #[serde(default, deserialize_with = "present")]
    pub image_url: Option<Option<String>>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[derive(Clone, Debug, Deserialize)]
pub struct CampaignQuery {
    pub status: Option<CampaignStatus>,
    pub category: Option<CampaignCategory>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CampaignBody {
    pub id: CampaignId,
    pub name: String,
    pub category: CampaignCategory,
    pub status: CampaignStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_by: UserId,
    pub scan_count: i64,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl CampaignBody {
    pub fn render(campaign: Campaign) -> CampaignBody {
        CampaignBody {
            id: campaign.id,
            name: campaign.name,
            category: campaign.category,
            status: campaign.status,
            start_date: campaign.start_date,
            end_date: campaign.end_date,
            created_by: campaign.created_by,
            scan_count: campaign.scan_count,
            image_url: campaign.image_url,
            created_at: campaign.created_at,
            modified_at: campaign.modified_at,
        }
    }
}

#[post("/api/campaigns")]
#[tracing::instrument(skip(db, request))]
pub async fn create_campaign(
    db: Data<dyn Database>,
    request: HttpRequest,
    body: Json<CreateCampaignBody>,
) -> Result<Json<CampaignBody>, Error> {
    let creator = require_user(&**db, &request).await?;
    let body = body.into_inner();

    let campaign = manager::create_campaign(
        &**db,
        &creator,
        NewCampaign {
            name: body.name,
            category: body.category,
            status: body.status,
            start_date: body.start_date,
            end_date: body.end_date,
            image_url: body.image_url,
        },
    )
    .await?;

    Ok(Json(CampaignBody::render(campaign)))
}

#[get("/api/campaigns")]
#[tracing::instrument(skip(db, request))]
pub async fn get_campaigns(
    db: Data<dyn Database>,
    request: HttpRequest,
    query: Query<CampaignQuery>,
) -> Result<Json<Vec<CampaignBody>>, Error> {
    require_user(&**db, &request).await?;
    let query = query.into_inner();

    let filter = CampaignFilter {
        status: query.status,
        category: query.category,
    };
    let campaigns = manager::get_campaigns(&**db, filter).await?;

    let body = campaigns.into_iter().map(CampaignBody::render).collect();

    Ok(Json(body))
}

#[get("/api/campaigns/{campaign_id}")]
#[tracing::instrument(skip(db, request))]
pub async fn get_campaign_by_id(
    db: Data<dyn Database>,
    request: HttpRequest,
    params: Path<CampaignId>,
) -> Result<Json<CampaignBody>, Error> {
    require_user(&**db, &request).await?;
    let campaign_id = params.into_inner();

    let campaign = manager::get_campaign_by_id(&**db, campaign_id).await?;

    Ok(Json(CampaignBody::render(campaign)))
}

#[put("/api/campaigns/{campaign_id}")]
#[tracing::instrument(skip(db, request))]
pub async fn update_campaign(
    db: Data<dyn Database>,
    request: HttpRequest,
    params: Path<CampaignId>,
    body: Json<UpdateCampaignBody>,
) -> Result<Json<CampaignBody>, Error> {
    require_user(&**db, &request).await?;
    let campaign_id = params.into_inner();
    let body = body.into_inner();

    let campaign = manager::get_campaign_by_id(&**db, campaign_id).await?;
    let campaign = manager::update_campaign(
        &**db,
        campaign,
        CampaignUpdate {
            name: body.name,
            category: body.category,
            status: body.status,
            start_date: body.start_date,
            end_date: body.end_date,
            image_url: body.image_url,
        },
    )
    .await?;

    Ok(Json(CampaignBody::render(campaign)))
}

#[delete("/api/campaigns/{campaign_id}")]
#[tracing::instrument(skip(db, request))]
pub async fn archive_campaign(
    db: Data<dyn Database>,
    request: HttpRequest,
    params: Path<CampaignId>,
) -> Result<Json<CampaignBody>, Error> {
    require_user(&**db, &request).await?;
    let campaign_id = params.into_inner();

    let campaign = manager::get_campaign_by_id(&**db, campaign_id).await?;
    let campaign = manager::archive_campaign(&**db, campaign).await?;

    Ok(Json(CampaignBody::render(campaign)))
}
