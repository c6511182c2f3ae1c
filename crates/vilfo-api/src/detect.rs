// ── Login-page detection ──
//
// Some firmware builds answer unauthenticated API requests with the HTML
// login page and HTTP 200 instead of a 403. Spotting that page is the only
// way to classify those responses as authentication failures.

/// Marker substrings taken from the router's login page.
const LOGIN_PAGE_MARKERS: [&str; 2] = [
    "<title>Vilfo - Login</title>",
    "<form class=\"login-form\"",
];

/// Returns `true` if `body` looks like the router's login page.
///
/// A body matches when at least half of the markers are present, so a
/// single marker surviving a markup change is still enough.
pub fn looks_like_login_page(body: &str) -> bool {
    let hits = LOGIN_PAGE_MARKERS
        .iter()
        .filter(|marker| body.contains(**marker))
        .count();
    hits * 2 >= LOGIN_PAGE_MARKERS.len()
}
