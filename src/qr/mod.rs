use serde::{Deserialize, Serialize};

use crate::campaign::{Campaign, CampaignId, CampaignStatus};

pub mod endpoints;
pub use endpoints::*;

/// The URL a campaign's QR code encodes. Scanning it lands on the public
/// scan endpoint, which counts the scan.
pub fn scan_url(public_url: &str, campaign_id: CampaignId) -> String {
    format!("{}/scan/{}", public_url.trim_end_matches('/'), campaign_id)
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QrCodeBody {
    pub campaign_id: CampaignId,
    pub campaign_name: String,
    pub status: CampaignStatus,
    pub scan_count: i64,
    pub target_url: String,
}

impl QrCodeBody {
    pub fn render(public_url: &str, campaign: Campaign) -> QrCodeBody {
        QrCodeBody {
            target_url: scan_url(public_url, campaign.id),
            campaign_id: campaign.id,
            campaign_name: campaign.name,
            status: campaign.status,
            scan_count: campaign.scan_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_url_joins_without_double_slash() {
        let campaign_id: CampaignId = "CPN-16E77539-8873-4C8A-BCA3-2036010474AD".parse().unwrap();

        assert_eq!(
            scan_url("https://admin.example.com/", campaign_id),
            "https://admin.example.com/scan/CPN-16E77539-8873-4C8A-BCA3-2036010474AD"
        );
        assert_eq!(
            scan_url("http://localhost:8080", campaign_id),
            "http://localhost:8080/scan/CPN-16E77539-8873-4C8A-BCA3-2036010474AD"
        );
    }
}
