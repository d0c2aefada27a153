use actix_web::get;
use actix_web::web::{Data, Json, Path};
use actix_web::HttpRequest;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::campaign::manager as campaign_manager;
use crate::campaign::{CampaignFilter, CampaignId};
use crate::config::Config;
use crate::database::Database;
use crate::error::Error;
use crate::session::manager::require_user;

use super::QrCodeBody;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScanBody {
    pub campaign_id: CampaignId,
    pub campaign_name: String,
    pub scan_count: i64,
}

#[get("/api/qr")]
#[tracing::instrument(skip(db, config, request))]
pub async fn get_qr_codes(
    db: Data<dyn Database>,
    config: Data<Config>,
    request: HttpRequest,
) -> Result<Json<Vec<QrCodeBody>>, Error> {
    require_user(&**db, &request).await?;

    let campaigns = campaign_manager::get_campaigns(&**db, CampaignFilter::default()).await?;

    let body = campaigns
        .into_iter()
        .map(|campaign| QrCodeBody::render(&config.public_url, campaign))
        .collect();

    Ok(Json(body))
}

#[get("/api/qr/{campaign_id}")]
#[tracing::instrument(skip(db, config, request))]
pub async fn get_qr_code(
    db: Data<dyn Database>,
    config: Data<Config>,
    request: HttpRequest,
    params: Path<CampaignId>,
) -> Result<Json<QrCodeBody>, Error> {
    require_user(&**db, &request).await?;
    let campaign_id = params.into_inner();

    let campaign = campaign_manager::get_campaign_by_id(&**db, campaign_id).await?;

    Ok(Json(QrCodeBody::render(&config.public_url, campaign)))
}

/// Public: this is where the printed QR codes point.
#[get("/scan/{campaign_id}")]
#[tracing::instrument(skip(db))]
pub async fn scan_campaign(
    db: Data<dyn Database>,
    params: Path<CampaignId>,
) -> Result<Json<ScanBody>, Error> {
    let campaign_id = params.into_inner();

    let campaign = campaign_manager::record_scan(&**db, campaign_id).await?;
    info!(%campaign_id, scan_count = campaign.scan_count, "recorded scan");

    Ok(Json(ScanBody {
        campaign_id: campaign.id,
        campaign_name: campaign.name,
        scan_count: campaign.scan_count,
    }))
}
