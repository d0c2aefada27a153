use campaign_admin::campaign::CampaignId;
use campaign_admin::shell::{guard, Navigation, Route, AUTH_PATH, HOME_PATH};

fn protected_paths() -> Vec<String> {
    let campaign_id = CampaignId::new();
    vec![
        "/".to_string(),
        "/home".to_string(),
        "/create-user".to_string(),
        "/analytics".to_string(),
        "/create-campaign".to_string(),
        format!("/edit-campaign/{}", campaign_id),
        "/qr".to_string(),
        format!("/qr/{}", campaign_id),
        "/profile".to_string(),
    ]
}

#[test]
fn signed_out_visitors_are_sent_to_sign_in() {
    for path in protected_paths() {
        let route = Route::parse(&path);
        assert!(route.is_some(), "{} should be routable", path);
        assert_eq!(guard(route, false), Navigation::Redirect(AUTH_PATH), "{}", path);
    }

    assert_eq!(
        guard(Route::parse(AUTH_PATH), false),
        Navigation::Render(Route::Auth)
    );
}

#[test]
fn signed_in_visitors_skip_sign_in_and_root() {
    assert_eq!(guard(Route::parse("/"), true), Navigation::Redirect(HOME_PATH));
    assert_eq!(guard(Route::parse("/auth"), true), Navigation::Redirect(HOME_PATH));
    assert_eq!(guard(Route::parse("/auth/"), true), Navigation::Redirect(HOME_PATH));
}

#[test]
fn signed_in_visitors_see_protected_pages() {
    for path in protected_paths().into_iter().filter(|path| path != "/") {
        let route = Route::parse(&path).unwrap();
        assert_eq!(guard(Some(route), true), Navigation::Render(route), "{}", path);
    }
}

#[test]
fn unknown_paths_are_not_found_either_way() {
    for path in ["/nowhere", "/qr/not-an-id", "/home/extra", "/api", "//"] {
        assert_eq!(guard(Route::parse(path), false), Navigation::NotFound, "{}", path);
        assert_eq!(guard(Route::parse(path), true), Navigation::NotFound, "{}", path);
    }
}
