//! Static front-end pages served at `/`.

use axum::response::Html;

const JOURNAL_PAGE: &str = include_str!("../assets/journal.html");
const ECHO_PAGE: &str = include_str!("../assets/echo.html");

pub async fn journal_index() -> Html<&'static str> {
    Html(JOURNAL_PAGE)
}

pub async fn echo_index() -> Html<&'static str> {
    Html(ECHO_PAGE)
}
