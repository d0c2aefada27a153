use actix_web::get;
use actix_web::web::{Data, Json, Path};
use actix_web::HttpRequest;
use chrono::Utc;

use crate::campaign::manager as campaign_manager;
use crate::campaign::{CampaignFilter, CampaignId};
use crate::database::Database;
use crate::error::Error;
use crate::session::manager::require_user;

use super::{campaign_stats, summarize, AnalyticsSummary, CampaignStats};

#[get("/api/analytics")]
#[tracing::instrument(skip(db, request))]
pub async fn get_summary(
    db: Data<dyn Database>,
    request: HttpRequest,
) -> Result<Json<AnalyticsSummary>, Error> {
    require_user(&**db, &request).await?;

    // archived campaigns are soft-deleted and stay out of the numbers
    let campaigns = campaign_manager::get_campaigns(&**db, CampaignFilter::default()).await?;

    Ok(Json(summarize(&campaigns)))
}

#[get("/api/analytics/campaigns/{campaign_id}")]
#[tracing::instrument(skip(db, request))]
pub async fn get_campaign_stats(
    db: Data<dyn Database>,
    request: HttpRequest,
    params: Path<CampaignId>,
) -> Result<Json<CampaignStats>, Error> {
    require_user(&**db, &request).await?;
    let campaign_id = params.into_inner();

    let campaign = campaign_manager::get_campaign_by_id(&**db, campaign_id).await?;

    Ok(Json(campaign_stats(&campaign, Utc::now().date_naive())))
}
