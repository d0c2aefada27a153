//! The app shell: which page a browser path shows, and whether the visitor
//! is allowed to see it.
//!
//! Every page except the sign-in page requires a session. Signed-in users
//! never see the sign-in page or the bare root; both send them home. Paths
//! outside the route table are not-found regardless of the session.

use serde::Serialize;

use crate::campaign::CampaignId;

pub mod endpoints;
pub use endpoints::*;

pub const AUTH_PATH: &str = "/auth";
pub const HOME_PATH: &str = "/home";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Root,
    Auth,
    Home,
    CreateUser,
    Analytics,
    CreateCampaign,
    EditCampaign { campaign_id: CampaignId },
    QrCodes,
    QrCode { campaign_id: CampaignId },
    Profile,
}

impl Route {
    /// Matches a request path against the route table. A single trailing
    /// slash is ignored and campaign ids must be well formed.
    pub fn parse(path: &str) -> Option<Route> {
        if !path.starts_with('/') {
            return None;
        }

        let path = match path.strip_suffix('/') {
            Some(trimmed) if trimmed.len() > 1 => trimmed,
            _ => path,
        };

        let segments: Vec<&str> = path.split('/').skip(1).collect();
        let route = match segments.as_slice() {
            [""] => Route::Root,
            ["auth"] => Route::Auth,
            ["home"] => Route::Home,
            ["create-user"] => Route::CreateUser,
            ["analytics"] => Route::Analytics,
            ["create-campaign"] => Route::CreateCampaign,
            ["edit-campaign", id] => Route::EditCampaign {
                campaign_id: id.parse().ok()?,
            },
            ["qr"] => Route::QrCodes,
            ["qr", id] => Route::QrCode {
                campaign_id: id.parse().ok()?,
            },
            ["profile"] => Route::Profile,
            _ => return None,
        };

        Some(route)
    }

    pub fn path(&self) -> String {
        match self {
            Route::Root => "/".to_string(),
            Route::Auth => AUTH_PATH.to_string(),
            Route::Home => HOME_PATH.to_string(),
            Route::CreateUser => "/create-user".to_string(),
            Route::Analytics => "/analytics".to_string(),
            Route::CreateCampaign => "/create-campaign".to_string(),
            Route::EditCampaign { campaign_id } => format!("/edit-campaign/{}", campaign_id),
            Route::QrCodes => "/qr".to_string(),
            Route::QrCode { campaign_id } => format!("/qr/{}", campaign_id),
            Route::Profile => "/profile".to_string(),
        }
    }

    pub fn page(&self) -> Page {
        match self {
            Route::Root | Route::Home => Page::Home,
            Route::Auth => Page::Auth,
            Route::CreateUser => Page::CreateUser,
            Route::Analytics => Page::Analytics,
            Route::CreateCampaign => Page::CreateCampaign,
            Route::EditCampaign { .. } => Page::EditCampaign,
            Route::QrCodes => Page::QrCodes,
            Route::QrCode { .. } => Page::QrCode,
            Route::Profile => Page::Profile,
        }
    }

    pub fn campaign_id(&self) -> Option<CampaignId> {
        match self {
            Route::EditCampaign { campaign_id } | Route::QrCode { campaign_id } => {
                Some(*campaign_id)
            }
            _ => None,
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Route::Auth)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Auth,
    Home,
    CreateUser,
    Analytics,
    CreateCampaign,
    EditCampaign,
    QrCodes,
    QrCode,
    Profile,
    NotFound,
}

impl Page {
    pub fn title(&self) -> &'static str {
        match self {
            Page::Auth => "Sign in",
            Page::Home => "Campaigns",
            Page::CreateUser => "Create user",
            Page::Analytics => "Analytics",
            Page::CreateCampaign => "Create campaign",
            Page::EditCampaign => "Edit campaign",
            Page::QrCodes => "QR codes",
            Page::QrCode => "QR code",
            Page::Profile => "Profile",
            Page::NotFound => "Page not found",
        }
    }

    pub fn layout(&self) -> Layout {
        match self {
            Page::Auth | Page::NotFound => Layout::Bare,
            _ => Layout::Sidebar,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    Bare,
    Sidebar,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    Redirect(&'static str),
    NotFound,
}

/// Decides what a visitor sees for a matched (or unmatched) route.
pub fn guard(route: Option<Route>, authenticated: bool) -> Navigation {
    let route = match route {
        Some(route) => route,
        None => return Navigation::NotFound,
    };

    match (authenticated, route) {
        (true, Route::Root) | (true, Route::Auth) => Navigation::Redirect(HOME_PATH),
        (false, route) if !route.is_public() => Navigation::Redirect(AUTH_PATH),
        (_, route) => Navigation::Render(route),
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub label: &'static str,
    pub path: &'static str,
}

pub fn sidebar() -> Vec<NavLink> {
    vec![
        NavLink {
            label: "Home",
            path: HOME_PATH,
        },
        NavLink {
            label: "Create user",
            path: "/create-user",
        },
        NavLink {
            label: "Create campaign",
            path: "/create-campaign",
        },
        NavLink {
            label: "Analytics",
            path: "/analytics",
        },
        NavLink {
            label: "QR codes",
            path: "/qr",
        },
        NavLink {
            label: "Profile",
            path: "/profile",
        },
    ]
}
