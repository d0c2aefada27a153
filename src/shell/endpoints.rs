use actix_web::get;
use actix_web::http::header;
use actix_web::web::Data;
use actix_web::{HttpRequest, HttpResponse};
use serde::Serialize;

use crate::campaign::CampaignId;
use crate::database::Database;
use crate::error::Error;
use crate::session::manager::current_user;
use crate::user::{User, UserBody};

use super::{guard, sidebar, Layout, NavLink, Navigation, Page, Route};

#[derive(Clone, Debug, Serialize)]
pub struct PageBody {
    pub page: Page,
    pub title: &'static str,
    pub layout: Layout,
    pub campaign_id: Option<CampaignId>,
    pub navigation: Vec<NavLink>,
    pub user: Option<UserBody>,
}

impl PageBody {
    pub fn render(page: Page, campaign_id: Option<CampaignId>, user: Option<User>) -> PageBody {
        let layout = page.layout();
        PageBody {
            page,
            title: page.title(),
            layout,
            campaign_id,
            navigation: match layout {
                Layout::Sidebar => sidebar(),
                Layout::Bare => vec![],
            },
            user: user.map(UserBody::render),
        }
    }
}

/// Catch-all for browser navigation; must be registered after every other
/// GET endpoint.
#[get("/{tail:.*}")]
#[tracing::instrument(skip(db, request), fields(path = %request.path()))]
pub async fn render_page(
    db: Data<dyn Database>,
    request: HttpRequest,
) -> Result<HttpResponse, Error> {
    let path = request.path();
    if path == "/api" || path.starts_with("/api/") {
        return Err(Error::PathNotFound);
    }

    let route = Route::parse(path);
    let user = match route {
        Some(_) => current_user(&**db, &request).await?,
        None => None,
    };

    let response = match guard(route, user.is_some()) {
        Navigation::Redirect(target) => HttpResponse::Found()
            .insert_header((header::LOCATION, target))
            .finish(),
        Navigation::Render(route) => {
            HttpResponse::Ok().json(PageBody::render(route.page(), route.campaign_id(), user))
        }
        Navigation::NotFound => {
            HttpResponse::NotFound().json(PageBody::render(Page::NotFound, None, None))
        }
    };

    Ok(response)
}
