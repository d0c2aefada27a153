//! Aggregates over campaigns for the analytics page. Everything here is
//! computed from campaign documents; there is no separate event log.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::campaign::{Campaign, CampaignCategory, CampaignId, CampaignStatus};

pub mod endpoints;
pub use endpoints::*;

const TOP_CAMPAIGNS: usize = 5;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub campaigns: u64,
    pub scans: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignScans {
    pub id: CampaignId,
    pub name: String,
    pub scan_count: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub total_campaigns: u64,
    pub active_campaigns: u64,
    pub total_scans: i64,
    pub by_category: BTreeMap<CampaignCategory, CategoryStats>,
    pub by_status: BTreeMap<CampaignStatus, u64>,
    pub top_campaigns: Vec<CampaignScans>,
}

pub fn summarize(campaigns: &[Campaign]) -> AnalyticsSummary {
    let mut summary = AnalyticsSummary::default();

    for campaign in campaigns {
        summary.total_campaigns += 1;
        summary.total_scans += campaign.scan_count;
        if campaign.status == CampaignStatus::Active {
            summary.active_campaigns += 1;
        }

        let category = summary.by_category.entry(campaign.category).or_default();
        category.campaigns += 1;
        category.scans += campaign.scan_count;

        *summary.by_status.entry(campaign.status).or_default() += 1;
    }

    let mut ranked: Vec<&Campaign> = campaigns.iter().filter(|c| c.scan_count > 0).collect();
    ranked.sort_by(|a, b| {
        b.scan_count
            .cmp(&a.scan_count)
            .then_with(|| a.name.cmp(&b.name))
    });
    summary.top_campaigns = ranked
        .into_iter()
        .take(TOP_CAMPAIGNS)
        .map(|campaign| CampaignScans {
            id: campaign.id,
            name: campaign.name.clone(),
            scan_count: campaign.scan_count,
        })
        .collect();

    summary
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CampaignStats {
    pub id: CampaignId,
    pub scan_count: i64,
    pub days_running: i64,
    pub average_daily_scans: f64,
}

/// Days are counted inclusively inside `[start_date, end_date]`, so a
/// campaign that started today has run for one day.
pub fn campaign_stats(campaign: &Campaign, today: NaiveDate) -> CampaignStats {
    let days_running = if today < campaign.start_date {
        0
    } else {
        let last_day = today.min(campaign.end_date);
        (last_day - campaign.start_date).num_days() + 1
    };

    let average_daily_scans = if days_running > 0 {
        campaign.scan_count as f64 / days_running as f64
    } else {
        0.0
    };

    CampaignStats {
        id: campaign.id,
        scan_count: campaign.scan_count,
        days_running,
        average_daily_scans,
    }
}
